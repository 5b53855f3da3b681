//! Companion follow, climb-assist and rescue.

use engine::Vec2;

use super::events::SimEvent;
use super::world::World;

impl World {
    pub(super) fn step_companion(&mut self, dt: f32) {
        let tuning = &self.tuning;
        let player = self.player.body;
        let Some(width) = self.companion.as_ref().map(|c| c.body.size.x) else {
            return;
        };
        let (min_x, max_x) = self.actor_x_bounds(width);
        let Some(companion) = self.companion.as_mut() else {
            return;
        };
        let body = &mut companion.body;
        let prior = body.position;

        body.apply_gravity(tuning.gravity, dt);
        let dx = player.position.x - body.position.x;
        if dx.abs() > tuning.companion_follow_deadband {
            body.velocity.x = dx.signum() * tuning.companion_speed;
            body.facing = body.facing.toward(dx);
        } else {
            body.velocity.x = 0.0;
        }

        body.integrate(dt);
        body.clamp_x(min_x, max_x);
        body.grounded = false;
        body.resolve_against(&self.solids, prior);

        let horizontal = (player.center_x() - body.center_x()).abs();
        // Positive when the player stands higher.
        let height_gap = body.feet_y() - player.feet_y();

        // Both boosts need the player nearby; a distant ledge is left to the rescue.
        if body.grounded && horizontal < tuning.companion_climb_window {
            if height_gap > tuning.companion_high_climb_gap {
                body.launch(tuning.companion_jump * tuning.companion_high_climb_boost);
            } else if height_gap > tuning.companion_climb_gap {
                body.launch(tuning.companion_jump * tuning.companion_climb_boost);
            }
        }

        if height_gap > tuning.companion_stuck_gap
            && horizontal > tuning.companion_rescue_distance
        {
            companion.stuck_timer += dt;
        } else {
            companion.stuck_timer = 0.0;
        }

        if companion.stuck_timer <= tuning.companion_stuck_seconds {
            return;
        }

        let body = &mut companion.body;
        let behind = player.position.x - player.facing.sign() * tuning.companion_rescue_offset_x;
        body.position.x = behind;
        body.clamp_x(min_x, max_x);
        body.position.y = player.position.y - tuning.companion_rescue_lift;
        body.velocity = Vec2::ZERO;
        body.grounded = false;
        let landing = body.position;
        body.resolve_against(&self.solids, landing);
        companion.stuck_timer = 0.0;

        let (x, y) = (body.position.x, body.position.y);
        self.events.emit(SimEvent::CompanionRescued { x, y });
    }
}

#[cfg(test)]
mod tests {
    use crate::sim::body::Facing;
    use crate::sim::geometry::{overlaps, Rect};
    use crate::sim::step::StepIntents;
    use crate::sim::world::{ViewportSize, World};
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    fn world_with_companion(companion_x: f32) -> World {
        let tuning = Tuning {
            pets_per_player: 0,
            pets_per_companion: 0,
            ..Tuning::default()
        };
        let mut world = World::new(tuning, ViewportSize::new(1280.0, 720.0), 11);
        world.spawn_companion();
        let ground_y = world.ground_y();
        let companion = world.companion.as_mut().expect("companion");
        companion.body.position.x = companion_x;
        companion.body.position.y = ground_y - companion.body.size.y;
        world
    }

    #[test]
    fn companion_walks_toward_player_and_stops_in_deadband() {
        let mut world = world_with_companion(700.0);
        for _ in 0..240 {
            world.step(StepIntents::default(), DT);
        }
        let companion = world.companion().expect("companion");
        let dx = world.player().body.position.x - companion.body.position.x;
        assert!(dx.abs() <= 50.0 + 260.0 * DT);
        assert_eq!(companion.body.velocity.x, 0.0);
        assert!(companion.body.grounded);
    }

    #[test]
    fn companion_faces_direction_of_travel() {
        let mut world = world_with_companion(700.0);
        world.step(StepIntents::default(), DT);
        let companion = world.companion().expect("companion");
        assert!(companion.body.velocity.x < 0.0);
        assert_eq!(companion.body.facing, Facing::Left);
    }

    #[test]
    fn companion_hops_toward_higher_player() {
        let mut world = world_with_companion(300.0);
        // Stand the player on the low platform at x = 340.
        let ground_y = world.ground_y();
        world.player.body.position.x = 360.0;
        world.player.body.position.y = ground_y - 130.0 - 60.0;
        world.step(StepIntents::default(), DT);
        let companion = world.companion().expect("companion");
        assert!(companion.body.velocity.y < 0.0);
        assert!(!companion.body.grounded);
    }

    #[test]
    fn stuck_timer_resets_when_gap_closes() {
        let mut world = world_with_companion(100.0);
        world.companion.as_mut().expect("companion").stuck_timer = 0.5;
        world.step(StepIntents::default(), DT);
        assert_eq!(world.companion().expect("companion").stuck_timer, 0.0);
    }

    #[test]
    fn distant_high_player_gets_no_climb_boost() {
        let mut world = world_with_companion(100.0);
        let platform_top = world.ground_y() - 360.0;
        world.player.body.position.x = 900.0;
        world.player.body.position.y = platform_top - 60.0;
        world.step(StepIntents::default(), DT);
        let companion = world.companion().expect("companion");
        assert!(companion.body.grounded);
        assert!(companion.body.velocity.y >= 0.0);
    }

    #[test]
    fn rescue_landing_inside_a_solid_is_pushed_out() {
        let mut world = world_with_companion(10.0);
        let ground_y = world.ground_y();
        world.player.body.position.x = 900.0;
        world.player.body.position.y = ground_y - 360.0 - 60.0;
        // Rescue lands at (820, ground - 540), 20px into this ledge.
        let ledge = Rect::new(800.0, ground_y - 500.0, 100.0, 30.0);
        world.solids.push(ledge);
        world.companion.as_mut().expect("companion").stuck_timer = 1.19;

        world.step(StepIntents::default(), DT);

        let companion = world.companion().expect("companion").body;
        assert_eq!(companion.position.x, 820.0);
        assert_eq!(companion.position.y, ledge.y - companion.size.y);
        assert!(companion.grounded);
        for solid in world.solids() {
            assert!(!overlaps(&companion.rect(), solid), "companion inside {solid:?}");
        }
    }
}
