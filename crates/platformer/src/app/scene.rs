use engine::{DrawList, InputAction, InputSnapshot, Rgba, Scene, Viewport};
use platformer::sim::{
    ActorKind, ActorView, Collector, Facing, FrameSnapshot, PetOwner, Rect, SimEvent, StepIntents,
    ViewportSize, World, SIM_STAGE_ORDER,
};
use platformer::Tuning;
use tracing::{debug, info};

const SKY: Rgba = [92, 148, 252, 255];
const GROUND: Rgba = [86, 60, 38, 255];
const GROUND_TOP: Rgba = [74, 160, 64, 255];
const PLATFORM: Rgba = [150, 98, 56, 255];
const BOX_FULL: Rgba = [236, 176, 40, 255];
const BOX_EMPTY: Rgba = [128, 112, 96, 255];
const BOX_EDGE: Rgba = [90, 52, 20, 255];
const LOOT_SETTLED: Rgba = [255, 220, 60, 255];
const LOOT_FALLING: Rgba = [255, 220, 60, 150];
const SCROLL: Rgba = [240, 226, 190, 255];
const PLAYER: Rgba = [232, 96, 150, 255];
const COMPANION: Rgba = [64, 110, 220, 255];
const PLAYER_PET: Rgba = [250, 160, 70, 255];
const COMPANION_PET: Rgba = [120, 200, 200, 255];
const EYE: Rgba = [255, 255, 255, 255];
const BUBBLE: Rgba = [255, 255, 255, 230];
const PROMPT: Rgba = [255, 255, 255, 255];
const DIM: Rgba = [0, 0, 0, 140];
const PANEL: Rgba = [246, 236, 206, 250];
const PANEL_EDGE: Rgba = [120, 84, 40, 255];

const GROUND_TOP_THICKNESS: f32 = 6.0;
const BUBBLE_WIDTH: f32 = 220.0;
const BUBBLE_HEIGHT: f32 = 44.0;
const BUBBLE_OFFSET_Y: f32 = 18.0;
const PROMPT_PULSE_RATE: f32 = 6.0;

pub(crate) struct PlatformerScene {
    tuning: Tuning,
    seed: u64,
    world: Option<World>,
    started: bool,
}

impl PlatformerScene {
    pub(crate) fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            seed,
            world: None,
            started: false,
        }
    }

    fn apply_window_size(world: &mut World, input: &InputSnapshot) {
        let (width, height) = input.window_size();
        if width == 0 || height == 0 {
            return;
        }
        let viewport = ViewportSize::new(width as f32, height as f32);
        if world.resize(viewport) {
            info!(width, height, "viewport_changed");
        }
    }
}

impl Scene for PlatformerScene {
    fn load(&mut self, viewport: Viewport) {
        self.world = Some(World::new(self.tuning.clone(), viewport.into(), self.seed));
        self.started = false;
        let order = SIM_STAGE_ORDER
            .iter()
            .map(|stage| stage.name())
            .collect::<Vec<_>>()
            .join(">");
        info!(
            width = viewport.width,
            height = viewport.height,
            seed = self.seed,
            stages = %order,
            "world_created"
        );
    }

    fn update(&mut self, dt_seconds: f32, input: &InputSnapshot) {
        let Some(world) = self.world.as_mut() else {
            return;
        };
        Self::apply_window_size(world, input);

        if input.was_pressed(InputAction::Reset) {
            world.reset();
            self.started = false;
        }

        if !self.started {
            if !input.was_pressed(InputAction::Jump) {
                log_sim_events(world);
                return;
            }
            self.started = true;
            info!("game_started");
        }

        if input.was_pressed(InputAction::PickUp) {
            world.request_pickup();
        }
        if input.was_pressed(InputAction::ClosePanel) {
            world.request_close_panel();
        }

        let intents = StepIntents {
            move_left: input.is_down(InputAction::MoveLeft),
            move_right: input.is_down(InputAction::MoveRight),
            jump_held: input.is_down(InputAction::Jump),
        };
        world.step(intents, dt_seconds);
        log_sim_events(world);
    }

    fn render(&self, frame: &mut DrawList) {
        let Some(world) = self.world.as_ref() else {
            return;
        };
        let snapshot = world.snapshot();
        frame.set_clear_color(SKY);
        draw_world(frame, &snapshot);
        draw_overlays(frame, &snapshot, self.started);
    }

    fn unload(&mut self) {
        self.world = None;
        info!("world_unloaded");
    }

    fn debug_title(&self) -> Option<String> {
        let world = self.world.as_ref()?;
        let snapshot = world.snapshot();
        let boxes = snapshot
            .hud
            .box_hits_left
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let mut title = format!(
            "Platformer | Score {} | Loot {} | Boxes {}",
            snapshot.hud.score, snapshot.hud.loot, boxes
        );
        if !self.started {
            title.push_str(" | Press Space to start");
        }
        if snapshot.pickup_prompt_visible {
            title.push_str(" | Press P to pick up");
        }
        if let Some(line) = snapshot.dialogue {
            title.push_str(&format!(" | \"{line}\""));
        }
        if let Some(panel) = snapshot.panel {
            title.push_str(&format!(" | {} (X to close)", panel.title));
        }
        Some(title)
    }
}

fn log_sim_events(world: &mut World) {
    for event in world.drain_events() {
        match event {
            SimEvent::WorldReset => info!("world_reset"),
            SimEvent::BoxHit {
                box_index,
                hits_left,
            } => debug!(box_index, hits_left, "box_hit"),
            SimEvent::LootSpawned { box_index } => debug!(box_index, "loot_spawned"),
            SimEvent::LootCollected {
                collector,
                loot_total,
            } => {
                let collector = match collector {
                    Collector::Player => "player",
                    Collector::Pet(_) => "pet",
                };
                info!(collector, loot_total, "loot_collected");
            }
            SimEvent::CompanionSpawned { x } => info!(x, "companion_spawned"),
            SimEvent::PetSpawned { owner } => debug!(?owner, "pet_spawned"),
            SimEvent::CompanionRescued { x, y } => info!(x, y, "companion_rescued"),
            SimEvent::DialogueStarted => info!("dialogue_started"),
            SimEvent::DialogueEnded => debug!("dialogue_ended"),
            SimEvent::ScrollDropped => info!("scroll_dropped"),
            SimEvent::ScrollPicked => info!("scroll_picked"),
            SimEvent::ScrollPanelClosed => debug!("scroll_panel_closed"),
        }
    }
}

fn fill(frame: &mut DrawList, rect: &Rect, color: Rgba) {
    frame.fill_rect(rect.x, rect.y, rect.w, rect.h, color);
}

fn draw_world(frame: &mut DrawList, snapshot: &FrameSnapshot) {
    let view_width = snapshot.viewport.width;
    for (index, solid) in snapshot.solids.iter().enumerate() {
        if index == 0 {
            // The ground slab runs far past both edges; draw only what is on screen.
            let visible = Rect::new(0.0, solid.y, view_width, solid.h);
            fill(frame, &visible, GROUND);
            frame.fill_rect(0.0, solid.y, view_width, GROUND_TOP_THICKNESS, GROUND_TOP);
        } else {
            fill(frame, solid, PLATFORM);
        }
    }

    for loot_box in &snapshot.boxes {
        let mut rect = loot_box.rect;
        rect.y -= loot_box.bounce_offset;
        let color = if loot_box.hits_left > 0 {
            BOX_FULL
        } else {
            BOX_EMPTY
        };
        fill(frame, &rect, color);
        frame.outline_rect(rect.x, rect.y, rect.w, rect.h, 3.0, BOX_EDGE);
    }

    for item in &snapshot.loot {
        let color = if item.collectable {
            LOOT_SETTLED
        } else {
            LOOT_FALLING
        };
        fill(frame, &item.rect, color);
    }

    if let Some(scroll) = snapshot.scroll.filter(|scroll| !scroll.picked) {
        fill(frame, &scroll.rect, SCROLL);
    }

    for actor in &snapshot.actors {
        draw_actor(frame, actor);
    }
}

fn draw_actor(frame: &mut DrawList, actor: &ActorView) {
    let color = match actor.kind {
        ActorKind::Player => PLAYER,
        ActorKind::Companion => COMPANION,
        ActorKind::Pet(PetOwner::Player) => PLAYER_PET,
        ActorKind::Pet(PetOwner::Companion) => COMPANION_PET,
    };
    let rect = actor.rect;
    // Walking actors bob a pixel so movement reads without sprites.
    let bob = if actor.walking { 1.0 } else { 0.0 };
    frame.fill_rect(rect.x, rect.y - bob, rect.w, rect.h, color);

    let eye = (rect.w * 0.18).max(3.0);
    let eye_x = match actor.facing {
        Facing::Left => rect.x + eye,
        Facing::Right => rect.right() - eye * 2.0,
    };
    frame.fill_rect(eye_x, rect.y + rect.h * 0.2 - bob, eye, eye, EYE);
}

fn draw_overlays(frame: &mut DrawList, snapshot: &FrameSnapshot, started: bool) {
    let companion = snapshot
        .actors
        .iter()
        .find(|actor| actor.kind == ActorKind::Companion);
    if let (Some(_), Some(companion)) = (snapshot.dialogue, companion) {
        let center_x = companion.rect.center().x;
        frame.fill_rect(
            center_x - BUBBLE_WIDTH * 0.5,
            companion.rect.y - BUBBLE_OFFSET_Y - BUBBLE_HEIGHT,
            BUBBLE_WIDTH,
            BUBBLE_HEIGHT,
            BUBBLE,
        );
    }

    if let Some(scroll) = snapshot.scroll.filter(|_| snapshot.pickup_prompt_visible) {
        let pulse = 0.5 + 0.5 * (snapshot.prompt_phase * PROMPT_PULSE_RATE).sin();
        let mut color = PROMPT;
        color[3] = (96.0 + 159.0 * pulse) as u8;
        frame.fill_rect(scroll.rect.x, scroll.rect.y - 16.0, scroll.rect.w, 8.0, color);
    }

    let (width, height) = (snapshot.viewport.width, snapshot.viewport.height);
    if snapshot.panel.is_some() {
        frame.fill_rect(0.0, 0.0, width, height, DIM);
        let panel_w = (width * 0.6).max(1.0);
        let panel_h = (height * 0.6).max(1.0);
        let x = (width - panel_w) * 0.5;
        let y = (height - panel_h) * 0.5;
        frame.fill_rect(x, y, panel_w, panel_h, PANEL);
        frame.outline_rect(x, y, panel_w, panel_h, 4.0, PANEL_EDGE);
    }

    if !started {
        frame.fill_rect(0.0, 0.0, width, height, DIM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_scene() -> PlatformerScene {
        let tuning = Tuning {
            pets_per_player: 0,
            ..Tuning::default()
        };
        let mut scene = PlatformerScene::new(tuning, 9);
        scene.load(Viewport {
            width: 1280,
            height: 720,
        });
        scene
    }

    fn world(scene: &PlatformerScene) -> &World {
        scene.world.as_ref().expect("world loaded")
    }

    #[test]
    fn simulation_waits_for_first_jump_press() {
        let mut scene = loaded_scene();
        let right = InputSnapshot::empty().with_action_held(InputAction::MoveRight);
        scene.update(1.0 / 60.0, &right);
        assert!(!scene.started);
        assert!(world(&scene).last_step_order().is_empty());

        let start = InputSnapshot::empty().with_action_down(InputAction::Jump, true);
        scene.update(1.0 / 60.0, &start);
        assert!(scene.started);
        assert_eq!(world(&scene).last_step_order().len(), SIM_STAGE_ORDER.len());
    }

    #[test]
    fn held_direction_moves_player_after_start() {
        let mut scene = loaded_scene();
        scene.started = true;
        let start_x = world(&scene).player().body.position.x;
        let right = InputSnapshot::empty().with_action_held(InputAction::MoveRight);
        for _ in 0..30 {
            scene.update(1.0 / 60.0, &right);
        }
        assert!(world(&scene).player().body.position.x > start_x);
    }

    #[test]
    fn reset_press_rebuilds_world_and_regates_start() {
        let mut scene = loaded_scene();
        scene.started = true;
        let spawn_x = world(&scene).player().body.position.x;
        let right = InputSnapshot::empty().with_action_held(InputAction::MoveRight);
        for _ in 0..30 {
            scene.update(1.0 / 60.0, &right);
        }
        assert!(world(&scene).player().body.position.x > spawn_x);

        let reset = InputSnapshot::empty().with_action_down(InputAction::Reset, true);
        scene.update(1.0 / 60.0, &reset);
        assert!(!scene.started);
        assert_eq!(world(&scene).player().body.position.x, spawn_x);
        assert!(world(&scene).companion().is_none());
    }

    #[test]
    fn window_resize_rebuilds_layout() {
        let mut scene = loaded_scene();
        let resized = InputSnapshot::empty().with_window_size((1280, 900));
        scene.update(1.0 / 60.0, &resized);
        assert_eq!(world(&scene).solids()[0].y, 900.0 - 110.0);
    }

    #[test]
    fn render_draws_world_and_start_overlay() {
        let scene = loaded_scene();
        let mut frame = DrawList::default();
        scene.render(&mut frame);
        assert_eq!(frame.clear_color(), SKY);
        // Ground, its top strip, five platforms, three boxes with outlines,
        // the player with an eye, and the start overlay.
        assert!(frame.len() >= 2 + 5 + 3 + 2 + 1);
        let overlay = frame.rects().last().expect("overlay");
        assert_eq!(overlay.color, DIM);
    }

    #[test]
    fn title_shows_hud_and_start_hint() {
        let scene = loaded_scene();
        let title = scene.debug_title().expect("title");
        assert!(title.contains("Score 0"));
        assert!(title.contains("Boxes 3, 3, 3"));
        assert!(title.contains("Press Space to start"));
    }

    #[test]
    fn unloaded_scene_has_no_title() {
        let mut scene = loaded_scene();
        scene.unload();
        assert!(scene.debug_title().is_none());
    }
}
