use thiserror::Error;

/// Failures that stop the engine from starting a game.
///
/// Runtime gameplay never produces these; they surface from setup paths only,
/// so a broken configuration fails fast instead of simulating half a world.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid world size {width}x{height}: both dimensions must be positive and finite")]
    InvalidWorldSize { width: f32, height: f32 },

    #[error("invalid fixed timestep {0}: must be positive and finite")]
    InvalidTimestep(f32),

    #[error("game setup failed: {0}")]
    Setup(String),
}

/// Check a world size coming from the display surface.
pub fn validate_world_size(width: f32, height: f32) -> Result<(), EngineError> {
    let ok = |v: f32| v.is_finite() && v > 0.0;
    if ok(width) && ok(height) {
        Ok(())
    } else {
        Err(EngineError::InvalidWorldSize { width, height })
    }
}
