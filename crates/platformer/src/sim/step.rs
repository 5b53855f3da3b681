use super::geometry::{overlaps, resolve, ContactSide};
use super::world::{Collector, World};

/// Movement intents sampled once per step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepIntents {
    pub move_left: bool,
    pub move_right: bool,
    pub jump_held: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimStage {
    Player,
    Loot,
    Pets,
    Companion,
    Narrative,
    ScrollItem,
    Softening,
    Cleanup,
}

impl SimStage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Loot => "Loot",
            Self::Pets => "Pets",
            Self::Companion => "Companion",
            Self::Narrative => "Narrative",
            Self::ScrollItem => "ScrollItem",
            Self::Softening => "Softening",
            Self::Cleanup => "Cleanup",
        }
    }
}

/// Pets collect loot before cleanup purges it, and narrative timers read
/// companion positions after it has moved.
pub const SIM_STAGE_ORDER: [SimStage; 8] = [
    SimStage::Player,
    SimStage::Loot,
    SimStage::Pets,
    SimStage::Companion,
    SimStage::Narrative,
    SimStage::ScrollItem,
    SimStage::Softening,
    SimStage::Cleanup,
];

/// Clamps a frame delta into `[0, max_step]`; non-finite deltas become zero.
pub fn clamp_step(dt_seconds: f32, max_step_seconds: f32) -> f32 {
    if !dt_seconds.is_finite() {
        return 0.0;
    }
    dt_seconds.clamp(0.0, max_step_seconds)
}

impl World {
    /// Advances the world by one frame. There is no sub-stepping: long frames
    /// are clamped to the step ceiling and the lost time is dropped.
    pub fn step(&mut self, intents: StepIntents, dt_seconds: f32) {
        let dt = clamp_step(dt_seconds, self.tuning.max_step_seconds);
        self.last_step_order.clear();
        for stage in SIM_STAGE_ORDER {
            self.last_step_order.push(stage);
            self.run_stage(stage, intents, dt);
        }
    }

    fn run_stage(&mut self, stage: SimStage, intents: StepIntents, dt: f32) {
        match stage {
            SimStage::Player => self.step_player(intents, dt),
            SimStage::Loot => self.step_loot(dt),
            SimStage::Pets => self.step_pets(dt),
            SimStage::Companion => self.step_companion(dt),
            SimStage::Narrative => self.step_narrative(dt),
            SimStage::ScrollItem => self.step_scroll_item(dt),
            SimStage::Softening => self.soften_overlaps(),
            SimStage::Cleanup => self.loot.retain(|item| !item.collected),
        }
    }

    fn step_player(&mut self, intents: StepIntents, dt: f32) {
        let tuning = &self.tuning;
        let (min_x, max_x) = self.actor_x_bounds(self.player.body.size.x);
        let player = &mut self.player;
        let body = &mut player.body;
        let prior = body.position;
        body.grounded = false;

        if intents.move_left {
            body.velocity.x -= tuning.move_acceleration * dt;
            body.facing = body.facing.toward(-1.0);
        }
        if intents.move_right {
            body.velocity.x += tuning.move_acceleration * dt;
            body.facing = body.facing.toward(1.0);
        }
        body.velocity.x = body.velocity.x.clamp(-tuning.max_speed, tuning.max_speed);
        player.jump.observe(intents.jump_held);

        body.apply_gravity(tuning.gravity, dt);
        body.integrate(dt);
        body.clamp_x(min_x, max_x);
        body.resolve_against(&self.solids, prior);

        let mut struck = Vec::new();
        for (index, loot_box) in self.boxes.iter_mut().enumerate() {
            let side = resolve(body, &loot_box.rect, prior);
            if side == Some(ContactSide::Bottom) && prior.y > body.position.y {
                struck.push(index);
            }
        }

        if body.grounded {
            body.apply_ground_friction(tuning.friction, tuning.friction_stop_speed);
            if player.jump.try_consume() {
                body.launch(tuning.jump_velocity);
            }
        }

        for index in struck {
            self.strike_box(index);
        }
        for loot_box in &mut self.boxes {
            loot_box.bounce_timer = (loot_box.bounce_timer - dt).max(0.0);
        }
    }

    fn step_loot(&mut self, dt: f32) {
        let tuning = &self.tuning;
        let max_x = self.viewport.width;
        for item in self.loot.iter_mut().filter(|item| !item.collected) {
            let body = &mut item.body;
            let prior = body.position;
            item.age += dt;
            body.grounded = false;
            body.apply_gravity(tuning.gravity, dt);
            body.integrate(dt);
            body.clamp_x(0.0, max_x - body.size.x);

            if body.resolve_against(&self.solids, prior) {
                body.apply_ground_friction(tuning.friction, tuning.friction_stop_speed);
                if item.age > tuning.loot_settle_seconds {
                    item.collectable = true;
                }
            }
        }

        let player_rect = self.player.body.rect();
        for index in 0..self.loot.len() {
            if overlaps(&player_rect, &self.loot[index].body.rect()) {
                self.try_collect_loot(index, Collector::Player);
            }
        }
    }

    fn step_scroll_item(&mut self, dt: f32) {
        let tuning = &self.tuning;
        let max_x = self.viewport.width;
        let Some(scroll) = self.scroll.as_mut().filter(|scroll| !scroll.picked) else {
            return;
        };
        let body = &mut scroll.body;
        let prior = body.position;
        body.grounded = false;
        body.apply_gravity(tuning.gravity, dt);
        body.integrate(dt);
        body.clamp_x(0.0, max_x - body.size.x);
        body.resolve_against(&self.solids, prior);
    }
}
