//! Per-tick action state resource.
//!
//! The host reports which actions are held each tick; [`ActionState`] keeps
//! the held flag and derives the "started" and "ended" edges against the
//! previous tick, the same way keyboard state is tracked per frame.
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Gameplay actions the host can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Jump,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Left, Action::Right, Action::Jump];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Boolean action state with edge flags.
pub struct BoolState {
    /// Whether the action is held this tick.
    pub active: bool,
    /// Whether the action went from released to held this tick.
    pub just_pressed: bool,
    /// Whether the action went from held to released this tick.
    pub just_released: bool,
}

impl BoolState {
    fn set(&mut self, active: bool) {
        self.just_pressed = active && !self.active;
        self.just_released = !active && self.active;
        self.active = active;
    }
}

/// Resource capturing the per-tick state of every [`Action`].
#[derive(Resource, Debug, Clone, Default)]
pub struct ActionState {
    pub left: BoolState,
    pub right: BoolState,
    pub jump: BoolState,
}

impl ActionState {
    fn state(&self, action: Action) -> &BoolState {
        match action {
            Action::Left => &self.left,
            Action::Right => &self.right,
            Action::Jump => &self.jump,
        }
    }

    fn state_mut(&mut self, action: Action) -> &mut BoolState {
        match action {
            Action::Left => &mut self.left,
            Action::Right => &mut self.right,
            Action::Jump => &mut self.jump,
        }
    }

    /// Start a new tick with exactly the actions in `held` pressed.
    pub fn apply<I: IntoIterator<Item = Action>>(&mut self, held: I) {
        let mut pressed = [false; 3];
        for action in held {
            pressed[action as usize] = true;
        }
        for action in Action::ALL {
            self.state_mut(action).set(pressed[action as usize]);
        }
    }

    pub fn held(&self, action: Action) -> bool {
        self.state(action).active
    }

    pub fn started(&self, action: Action) -> bool {
        self.state(action).just_pressed
    }

    pub fn ended(&self, action: Action) -> bool {
        self.state(action).just_released
    }
}
