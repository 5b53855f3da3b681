use super::input::{ActionStates, InputAction};
use super::rendering::{DrawList, Viewport};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Input sampled once per frame. Held actions report `is_down`; press edges
/// report `was_pressed` for exactly one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        actions: ActionStates,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            actions,
            window_width,
            window_height,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.actions.was_pressed(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    /// Held action without a press edge, as on every frame after the first.
    pub fn with_action_held(mut self, action: InputAction) -> Self {
        self.actions.hold(action);
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

/// A scene is driven once per frame: `update` with the clamped frame delta,
/// then `render` into a fresh draw list.
pub trait Scene {
    fn load(&mut self, viewport: Viewport);
    fn update(&mut self, dt_seconds: f32, input: &InputSnapshot);
    fn render(&self, frame: &mut DrawList);
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_action_has_no_press_edge() {
        let snapshot = InputSnapshot::empty().with_action_held(InputAction::Jump);
        assert!(snapshot.is_down(InputAction::Jump));
        assert!(!snapshot.was_pressed(InputAction::Jump));
    }

    #[test]
    fn held_action_keeps_other_press_edges() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::PickUp, true)
            .with_action_held(InputAction::MoveLeft);
        assert!(snapshot.was_pressed(InputAction::PickUp));
        assert!(snapshot.is_down(InputAction::MoveLeft));
        assert!(!snapshot.was_pressed(InputAction::MoveLeft));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
    }
}
