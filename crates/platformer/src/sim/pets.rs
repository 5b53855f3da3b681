use super::body::Body;
use super::geometry::overlaps;
use super::world::{Collector, PetMode, World};
use crate::tuning::Tuning;

/// Where a pet is heading this step.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PetTarget {
    mode: PetMode,
    x: f32,
    /// Feet line of the loot being chased, for the climb check.
    loot_feet_y: Option<f32>,
}

impl World {
    pub(super) fn step_pets(&mut self, dt: f32) {
        // Pets spawned by a collection during this stage start moving next step.
        let count = self.pets.len();
        for index in 0..count {
            self.step_pet(index, dt);
        }
    }

    fn step_pet(&mut self, index: usize, dt: f32) {
        let owner = self.owner_body(self.pets[index].owner);
        let target = self.pet_target(&self.pets[index].body, &owner);
        let (min_x, max_x) = self.actor_x_bounds(self.pets[index].body.size.x);
        let tuning = &self.tuning;

        let pet = &mut self.pets[index];
        pet.mode = target.mode;
        let body = &mut pet.body;
        let prior = body.position;

        let dx = target.x - body.center_x();
        if dx.abs() > tuning.pet_follow_deadband {
            body.velocity.x = dx.signum() * tuning.pet_speed;
            body.facing = body.facing.toward(dx);
        } else {
            body.apply_ground_friction(tuning.friction, tuning.friction_stop_speed);
        }

        body.grounded = false;
        body.apply_gravity(tuning.gravity, dt);
        body.integrate(dt);
        body.clamp_x(min_x, max_x);
        body.resolve_against(&self.solids, prior);

        if body.grounded && Self::pet_should_jump(body, &owner, &target, tuning) {
            body.launch(tuning.pet_jump);
        }

        let pet_rect = body.rect();
        for loot_index in 0..self.loot.len() {
            if overlaps(&pet_rect, &self.loot[loot_index].body.rect()) {
                self.try_collect_loot(loot_index, Collector::Pet(index));
            }
        }
    }

    /// Nearest settled loot around the owner, if it is close enough to the
    /// pet to be worth chasing; otherwise a spot trailing the owner.
    fn pet_target(&self, pet: &Body, owner: &Body) -> PetTarget {
        let tuning = &self.tuning;
        let owner_center = owner.center();
        let pet_center = pet.center();

        let nearest = self
            .loot
            .iter()
            .filter(|item| item.collectable && !item.collected)
            .filter(|item| owner_center.distance(item.body.center()) <= tuning.pet_owner_loot_radius)
            .map(|item| (pet_center.distance(item.body.center()), item))
            .min_by(|(a, _), (b, _)| a.total_cmp(b));

        match nearest {
            Some((distance, item)) if distance <= tuning.pet_seek_radius => PetTarget {
                mode: PetMode::SeekLoot,
                x: item.body.center_x(),
                loot_feet_y: Some(item.body.feet_y()),
            },
            _ => PetTarget {
                mode: PetMode::FollowOwner,
                x: owner.center_x() - owner.facing.sign() * tuning.pet_trail_offset,
                loot_feet_y: None,
            },
        }
    }

    fn pet_should_jump(
        pet: &Body,
        owner: &Body,
        target: &PetTarget,
        tuning: &Tuning,
    ) -> bool {
        let owner_gap = pet.feet_y() - owner.feet_y();
        let owner_dx = (owner.center_x() - pet.center_x()).abs();
        if owner_gap > tuning.pet_owner_climb_gap && owner_dx < tuning.pet_owner_climb_window {
            return true;
        }

        match target.loot_feet_y {
            Some(loot_feet_y) => {
                let loot_gap = pet.feet_y() - loot_feet_y;
                let loot_dx = (target.x - pet.center_x()).abs();
                loot_gap > tuning.pet_loot_climb_gap && loot_dx < tuning.pet_loot_climb_window
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::step::StepIntents;
    use crate::sim::world::{Loot, PetOwner, ViewportSize};

    const DT: f32 = 1.0 / 60.0;

    fn world() -> World {
        World::new(Tuning::default(), ViewportSize::new(1280.0, 720.0), 5)
    }

    fn settled_loot_at(world: &World, x: f32) -> Loot {
        let size = world.tuning().loot_size;
        let mut body = Body::new(x, world.ground_y() - size, size, size);
        body.grounded = true;
        Loot {
            body,
            age: 1.0,
            collectable: true,
            collected: false,
        }
    }

    #[test]
    fn pet_trails_behind_owner() {
        let mut world = world();
        for _ in 0..180 {
            world.step(StepIntents::default(), DT);
        }
        let pet = &world.pets()[0];
        let player = &world.player().body;
        let target_x = player.center_x() - 56.0;
        assert_eq!(pet.mode, PetMode::FollowOwner);
        assert!((pet.body.center_x() - target_x).abs() <= 24.0 + 300.0 * DT);
        assert!(pet.body.grounded);
    }

    #[test]
    fn pet_seeks_nearby_loot_and_collects_it() {
        let mut world = world();
        let item = settled_loot_at(&world, 20.0);
        world.loot.push(item);

        world.step(StepIntents::default(), DT);
        assert_eq!(world.pets()[0].mode, PetMode::SeekLoot);

        for _ in 0..120 {
            world.step(StepIntents::default(), DT);
        }
        assert!(world.loot().is_empty());
        assert_eq!(world.loot_collected(), 1);
        assert_eq!(world.score(), 25);
    }

    #[test]
    fn loot_far_from_owner_is_ignored() {
        let mut world = world();
        let item = settled_loot_at(&world, 900.0);
        world.loot.push(item);
        world.step(StepIntents::default(), DT);
        assert_eq!(world.pets()[0].mode, PetMode::FollowOwner);
    }

    #[test]
    fn companion_pet_falls_back_to_player_without_companion() {
        let world = world();
        let owner = world.owner_body(PetOwner::Companion);
        assert_eq!(owner, world.player().body);
    }

    #[test]
    fn pet_jumps_when_owner_is_above_and_close() {
        let world = world();
        let tuning = world.tuning().clone();
        let pet = world.pets()[0].body;
        let mut owner = world.player().body;
        owner.position.y -= 100.0;
        let target = PetTarget {
            mode: PetMode::FollowOwner,
            x: owner.center_x(),
            loot_feet_y: None,
        };
        assert!(World::pet_should_jump(&pet, &owner, &target, &tuning));

        owner.position.x += 400.0;
        assert!(!World::pet_should_jump(&pet, &owner, &target, &tuning));
    }
}
