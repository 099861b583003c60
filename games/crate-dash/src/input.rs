use std::collections::HashSet;

/// Browser `keyCode` values the game listens to.
pub mod keys {
    pub const ARROW_LEFT: u32 = 37;
    pub const ARROW_UP: u32 = 38;
    pub const ARROW_RIGHT: u32 = 39;
    pub const KEY_A: u32 = 65;
    pub const KEY_D: u32 = 68;
    pub const KEY_W: u32 = 87;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Jump,
}

impl Control {
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            keys::ARROW_LEFT | keys::KEY_A => Some(Control::Left),
            keys::ARROW_RIGHT | keys::KEY_D => Some(Control::Right),
            keys::ARROW_UP | keys::KEY_W => Some(Control::Jump),
            _ => None,
        }
    }
}

/// Which recognised keys are currently held.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<u32>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down. Returns the control on a press edge; auto-repeat
    /// and unrecognised keys return `None`.
    pub fn press(&mut self, key_code: u32) -> Option<Control> {
        let control = Control::from_key_code(key_code)?;
        self.held.insert(key_code).then_some(control)
    }

    pub fn release(&mut self, key_code: u32) {
        self.held.remove(&key_code);
    }

    /// True if any key bound to `control` is down.
    pub fn is_held(&self, control: Control) -> bool {
        self.held
            .iter()
            .any(|&code| Control::from_key_code(code) == Some(control))
    }

    pub fn is_held_code(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}
