use glam::Vec2;

use crate::config::PatrolConfig;
use crate::input::{Control, InputState};

/// Per-round player bookkeeping. Position and velocity are refreshed from
/// the physics body at the start of every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub jump_count: u8,
    pub grounded: bool,
    pub speed_multiplier: f32,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl PlayerState {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            jump_count: 0,
            grounded: false,
            speed_multiplier: 1.0,
            position: spawn,
            velocity: Vec2::ZERO,
        }
    }

    pub fn land(&mut self) {
        self.jump_count = 0;
        self.grounded = true;
    }

    /// Start a jump if any remain. Only the vertical velocity changes.
    pub fn try_jump(&mut self, max_jumps: u8, jump_speed: f32) -> bool {
        if self.jump_count >= max_jumps {
            return false;
        }
        self.velocity.y = -jump_speed;
        self.jump_count += 1;
        self.grounded = false;
        true
    }

    /// Back to the spawn point at rest, with default modifiers.
    pub fn respawn(&mut self, spawn: Vec2) {
        *self = Self::new(spawn);
    }
}

/// Horizontal velocity the player should have this tick, or `None` when the
/// controls leave it to the physics (neither or both directions held).
pub fn steer_horizontal(input: &InputState, base_speed: f32, multiplier: f32) -> Option<f32> {
    match (input.is_held(Control::Left), input.is_held(Control::Right)) {
        (true, false) => Some(-base_speed * multiplier),
        (false, true) => Some(base_speed * multiplier),
        _ => None,
    }
}

/// Back-and-forth motion between two x bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Patrol {
    pub min_x: f32,
    pub max_x: f32,
    pub speed: f32,
    /// -1.0 heading left, 1.0 heading right.
    pub heading: f32,
}

impl Patrol {
    pub fn new(config: &PatrolConfig, heading: f32) -> Self {
        Self {
            min_x: config.min_x,
            max_x: config.max_x,
            speed: config.speed,
            heading: heading.signum(),
        }
    }

    /// Turn around at the bounds. Returns the velocity to force when the
    /// body is outside them; inside, the body is left alone.
    pub fn steer(&mut self, x: f32) -> Option<Vec2> {
        if x < self.min_x {
            self.heading = 1.0;
        } else if x > self.max_x {
            self.heading = -1.0;
        } else {
            return None;
        }
        Some(self.cruise_velocity())
    }

    pub fn cruise_velocity(&self) -> Vec2 {
        Vec2::new(self.speed * self.heading, 0.0)
    }
}
