#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
    PickUp,
    ClosePanel,
    Reset,
    Quit,
}

const ACTION_COUNT: usize = 7;

/// Held state plus a one-frame press edge per action.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
    pressed: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        let index = action.index();
        if is_down && !self.down[index] {
            self.pressed[index] = true;
        }
        self.down[index] = is_down;
    }

    pub(crate) fn hold(&mut self, action: InputAction) {
        self.down[action.index()] = true;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed[action.index()]
    }

    pub(crate) fn clear_pressed(&mut self) {
        self.pressed = [false; ACTION_COUNT];
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveLeft => 0,
            InputAction::MoveRight => 1,
            InputAction::Jump => 2,
            InputAction::PickUp => 3,
            InputAction::ClosePanel => 4,
            InputAction::Reset => 5,
            InputAction::Quit => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_edge_once_while_held() {
        let mut states = ActionStates::default();
        states.set(InputAction::Jump, true);
        assert!(states.was_pressed(InputAction::Jump));
        states.clear_pressed();
        states.set(InputAction::Jump, true);
        assert!(states.is_down(InputAction::Jump));
        assert!(!states.was_pressed(InputAction::Jump));
    }

    #[test]
    fn release_then_press_rearms_edge() {
        let mut states = ActionStates::default();
        states.set(InputAction::PickUp, true);
        states.clear_pressed();
        states.set(InputAction::PickUp, false);
        states.set(InputAction::PickUp, true);
        assert!(states.was_pressed(InputAction::PickUp));
    }

    #[test]
    fn press_and_release_within_one_frame_keeps_edge() {
        let mut states = ActionStates::default();
        states.set(InputAction::ClosePanel, true);
        states.set(InputAction::ClosePanel, false);
        assert!(!states.is_down(InputAction::ClosePanel));
        assert!(states.was_pressed(InputAction::ClosePanel));
    }
}
