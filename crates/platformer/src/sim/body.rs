use engine::Vec2;

use super::geometry::{resolve, ContactSide, Rect};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Facing toward a horizontal offset; zero keeps the current facing.
    pub fn toward(self, dx: f32) -> Self {
        if dx < 0.0 {
            Self::Left
        } else if dx > 0.0 {
            Self::Right
        } else {
            self
        }
    }
}

/// Kinematic state shared by every moving thing in the world.
///
/// `grounded` is only true in a step where a solid was struck from above;
/// every integrator clears it before resolving collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
    pub facing: Facing,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(w, h),
            velocity: Vec2::ZERO,
            grounded: false,
            facing: Facing::Right,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn center_x(&self) -> f32 {
        self.position.x + self.size.x * 0.5
    }

    pub fn feet_y(&self) -> f32 {
        self.position.y + self.size.y
    }

    pub fn is_settled(&self, settled_speed: f32) -> bool {
        self.velocity.y.abs() < settled_speed
    }

    pub(crate) fn apply_gravity(&mut self, gravity: f32, dt: f32) {
        self.velocity.y += gravity * dt;
    }

    pub(crate) fn integrate(&mut self, dt: f32) {
        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;
    }

    pub(crate) fn clamp_x(&mut self, min_x: f32, max_x: f32) {
        // A viewport narrower than the body pins it to the left bound.
        self.position.x = self.position.x.min(max_x).max(min_x);
    }

    /// Resolves against each solid in order; true if any was landed on.
    pub(crate) fn resolve_against(&mut self, solids: &[Rect], prior: Vec2) -> bool {
        let mut landed = false;
        for solid in solids {
            if resolve(self, solid, prior) == Some(ContactSide::Top) {
                landed = true;
            }
        }
        landed
    }

    pub(crate) fn apply_ground_friction(&mut self, friction: f32, stop_speed: f32) {
        self.velocity.x *= friction;
        if self.velocity.x.abs() < stop_speed {
            self.velocity.x = 0.0;
        }
    }

    pub(crate) fn launch(&mut self, speed: f32) {
        self.velocity.y = -speed;
        self.grounded = false;
    }
}

/// Edge-triggered jump input.
///
/// A fresh press arms the latch; a grounded body consumes it to jump; it
/// stays consumed until the key is released, so holding jump never chains
/// into a second jump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JumpLatch {
    #[default]
    Released,
    Armed,
    Consumed,
}

impl JumpLatch {
    pub fn observe(&mut self, held: bool) {
        *self = match (*self, held) {
            (_, false) => Self::Released,
            (Self::Released, true) => Self::Armed,
            (state, true) => state,
        };
    }

    pub fn try_consume(&mut self) -> bool {
        if *self == Self::Armed {
            *self = Self::Consumed;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_arms_on_press_and_consumes_once() {
        let mut latch = JumpLatch::default();
        latch.observe(true);
        assert_eq!(latch, JumpLatch::Armed);
        assert!(latch.try_consume());
        latch.observe(true);
        assert!(!latch.try_consume());
        latch.observe(false);
        latch.observe(true);
        assert!(latch.try_consume());
    }

    #[test]
    fn press_in_air_stays_armed_until_landing() {
        let mut latch = JumpLatch::default();
        latch.observe(true);
        latch.observe(true);
        latch.observe(true);
        assert_eq!(latch, JumpLatch::Armed);
    }

    #[test]
    fn release_before_landing_disarms() {
        let mut latch = JumpLatch::default();
        latch.observe(true);
        latch.observe(false);
        assert!(!latch.try_consume());
    }

    #[test]
    fn facing_toward_keeps_current_on_zero() {
        assert_eq!(Facing::Left.toward(0.0), Facing::Left);
        assert_eq!(Facing::Left.toward(3.0), Facing::Right);
        assert_eq!(Facing::Right.toward(-0.5), Facing::Left);
    }

    #[test]
    fn friction_snaps_slow_motion_to_rest() {
        let mut body = Body::new(0.0, 0.0, 10.0, 10.0);
        body.velocity.x = 100.0;
        body.apply_ground_friction(0.5, 8.0);
        assert_eq!(body.velocity.x, 50.0);
        body.velocity.x = 12.0;
        body.apply_ground_friction(0.5, 8.0);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn resolve_against_reports_landing() {
        let solids = [Rect::new(0.0, 100.0, 500.0, 50.0)];
        let mut body = Body::new(10.0, 85.0, 10.0, 20.0);
        let prior = Vec2::new(10.0, 70.0);
        assert!(body.resolve_against(&solids, prior));
        assert!(body.grounded);
        assert_eq!(body.feet_y(), 100.0);
    }
}
