use rand::Rng;

/// Effects the collectible can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpEffect {
    SpeedBoost,
    SlowFall,
    ExtraTime,
}

impl PowerUpEffect {
    pub const ALL: [PowerUpEffect; 3] = [
        PowerUpEffect::SpeedBoost,
        PowerUpEffect::SlowFall,
        PowerUpEffect::ExtraTime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PowerUpEffect::SpeedBoost => "Speed Boost",
            PowerUpEffect::SlowFall => "Slow Fall",
            PowerUpEffect::ExtraTime => "Extra Time +10s",
        }
    }

    /// Value carried in the `POWER_UP` game event.
    pub fn code(self) -> f32 {
        match self {
            PowerUpEffect::SpeedBoost => 0.0,
            PowerUpEffect::SlowFall => 1.0,
            PowerUpEffect::ExtraTime => 2.0,
        }
    }
}

/// Pick one effect, each with equal probability.
pub fn select_power_up<R: Rng + ?Sized>(rng: &mut R) -> PowerUpEffect {
    PowerUpEffect::ALL[rng.random_range(0..PowerUpEffect::ALL.len())]
}
