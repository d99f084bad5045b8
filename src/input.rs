use crate::types::Control;
use macroquad::input::{KeyCode, is_key_down};

/// Source of the current key-press state.
pub trait InputSource {
    fn is_pressed(&self, control: Control) -> bool;
}

/// Snapshot of every control for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlState {
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub climb: bool,
    pub descend: bool,
    pub thrust: bool,
}

impl ControlState {
    /// Reads every control exactly once.
    pub fn sample(source: &dyn InputSource) -> Self {
        let mut state = ControlState::default();
        for control in Control::ALL {
            state.set(control, source.is_pressed(control));
        }
        state
    }

    /// Builder used by tests and scripted input.
    pub fn with(mut self, control: Control) -> Self {
        self.set(control, true);
        self
    }

    pub fn set(&mut self, control: Control, pressed: bool) {
        match control {
            Control::YawLeft => self.yaw_left = pressed,
            Control::YawRight => self.yaw_right = pressed,
            Control::Climb => self.climb = pressed,
            Control::Descend => self.descend = pressed,
            Control::Thrust => self.thrust = pressed,
        }
    }
}

impl InputSource for ControlState {
    fn is_pressed(&self, control: Control) -> bool {
        match control {
            Control::YawLeft => self.yaw_left,
            Control::YawRight => self.yaw_right,
            Control::Climb => self.climb,
            Control::Descend => self.descend,
            Control::Thrust => self.thrust,
        }
    }
}

/// Key bound to each control.
pub fn key_for(control: Control) -> KeyCode {
    match control {
        Control::YawLeft => KeyCode::Left,
        Control::YawRight => KeyCode::Right,
        Control::Climb => KeyCode::Up,
        Control::Descend => KeyCode::Down,
        Control::Thrust => KeyCode::Space,
    }
}

/// Live keyboard state from macroquad. Only valid inside the window loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyboardInput;

impl InputSource for KeyboardInput {
    fn is_pressed(&self, control: Control) -> bool {
        is_key_down(key_for(control))
    }
}
