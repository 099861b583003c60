//! Collision rules.
//!
//! Every contact pair is classified by role membership into a [`PairKind`],
//! then `(kind, phase)` is looked up in [`DISPATCH`]. Pairs arrive unordered;
//! classification puts the player (or, failing that, the car) first.

use crate::level::{palette, BodyRole};
use crate::round::{Command, RoundOutcome, RoundState, TimedAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// The first step the two bodies touch.
    Began,
    /// Any step the two bodies are still touching.
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    PlayerSurface,
    PlayerHazard,
    PlayerEnemy,
    PlayerBarrel,
    PlayerCollectible,
    CarFallingPlatform,
}

impl PairKind {
    /// Classify an unordered pair. Returns the kind and the role of the
    /// body that is not the subject (the player, or the car).
    pub fn classify(a: BodyRole, b: BodyRole) -> Option<(PairKind, BodyRole)> {
        let (subject, other) = if a == BodyRole::Player {
            (a, b)
        } else if b == BodyRole::Player {
            (b, a)
        } else if a == BodyRole::Car {
            (a, b)
        } else if b == BodyRole::Car {
            (b, a)
        } else {
            return None;
        };

        let kind = match subject {
            BodyRole::Player if other.is_ground_like() => PairKind::PlayerSurface,
            BodyRole::Player if other.is_hazard() => PairKind::PlayerHazard,
            BodyRole::Player if other.is_enemy() => PairKind::PlayerEnemy,
            BodyRole::Player if other == BodyRole::Barrel => PairKind::PlayerBarrel,
            BodyRole::Player if other == BodyRole::Collectible => PairKind::PlayerCollectible,
            BodyRole::Car if other == BodyRole::FallingPlatform => PairKind::CarFallingPlatform,
            _ => return None,
        };
        Some((kind, other))
    }
}

pub type Rule = fn(&mut RoundState, BodyRole, &mut Vec<Command>);

pub const DISPATCH: &[(PairKind, ContactPhase, Rule)] = &[
    (PairKind::PlayerSurface, ContactPhase::Began, land),
    (PairKind::PlayerHazard, ContactPhase::Began, hazard),
    (PairKind::PlayerEnemy, ContactPhase::Began, run_over),
    (PairKind::PlayerBarrel, ContactPhase::Began, knockback),
    (PairKind::PlayerCollectible, ContactPhase::Began, collect),
    (PairKind::CarFallingPlatform, ContactPhase::Active, keep_patrolling),
];

/// Run the rules for one contact pair. A finished round ignores everything.
pub fn dispatch(
    round: &mut RoundState,
    phase: ContactPhase,
    a: BodyRole,
    b: BodyRole,
    commands: &mut Vec<Command>,
) {
    if !round.is_running() {
        return;
    }
    let Some((kind, other)) = PairKind::classify(a, b) else {
        return;
    };
    for (rule_kind, rule_phase, rule) in DISPATCH {
        if *rule_kind == kind && *rule_phase == phase {
            rule(round, other, commands);
        }
    }
}

fn land(round: &mut RoundState, surface: BodyRole, commands: &mut Vec<Command>) {
    round.player.land();
    if surface == BodyRole::FallingPlatform && !round.falling_platform_armed {
        round.falling_platform_armed = true;
        commands.push(Command::Repaint { role: surface, paint: palette::FALLING_ARMED });
        let delay = round.config().platform_fall_delay_secs;
        round.schedule_in(delay, TimedAction::DropPlatform);
        log::debug!("falling platform armed, dropping in {delay}s");
    }
}

fn hazard(round: &mut RoundState, _: BodyRole, commands: &mut Vec<Command>) {
    round.end_round(RoundOutcome::HazardDeath, commands);
}

fn run_over(round: &mut RoundState, _: BodyRole, commands: &mut Vec<Command>) {
    round.end_round(RoundOutcome::EnemyDeath, commands);
}

fn knockback(round: &mut RoundState, _: BodyRole, commands: &mut Vec<Command>) {
    round.player.velocity = round.config().knockback();
    commands.push(Command::SetVelocity { role: BodyRole::Player, velocity: round.player.velocity });
}

fn collect(round: &mut RoundState, _: BodyRole, commands: &mut Vec<Command>) {
    round.collect(commands);
}

/// The car would otherwise stall against the tumbling platform.
fn keep_patrolling(round: &mut RoundState, _: BodyRole, commands: &mut Vec<Command>) {
    commands.push(Command::SetVelocity {
        role: BodyRole::Car,
        velocity: round.car_patrol.cruise_velocity(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashConfig;
    use glam::Vec2;

    fn running() -> (RoundState, Vec<Command>) {
        let mut round = RoundState::new(&DashConfig::default(), Vec2::new(1280.0, 720.0), 3);
        let mut commands = Vec::new();
        round.start(&mut commands);
        commands.clear();
        (round, commands)
    }

    #[test]
    fn classification_is_order_independent() {
        for (a, b, kind) in [
            (BodyRole::Player, BodyRole::Ground, PairKind::PlayerSurface),
            (BodyRole::Platform, BodyRole::Player, PairKind::PlayerSurface),
            (BodyRole::Lava, BodyRole::Player, PairKind::PlayerHazard),
            (BodyRole::Player, BodyRole::KillPart, PairKind::PlayerHazard),
            (BodyRole::Car, BodyRole::Player, PairKind::PlayerEnemy),
            (BodyRole::Barrel, BodyRole::Player, PairKind::PlayerBarrel),
            (BodyRole::Player, BodyRole::Collectible, PairKind::PlayerCollectible),
            (BodyRole::FallingPlatform, BodyRole::Car, PairKind::CarFallingPlatform),
        ] {
            assert_eq!(PairKind::classify(a, b).map(|(k, _)| k), Some(kind), "{a:?} + {b:?}");
            assert_eq!(PairKind::classify(b, a).map(|(k, _)| k), Some(kind), "{b:?} + {a:?}");
        }
    }

    #[test]
    fn unrelated_pairs_are_unclassified() {
        assert_eq!(PairKind::classify(BodyRole::Barrel, BodyRole::Ground), None);
        assert_eq!(PairKind::classify(BodyRole::Car, BodyRole::Ground), None);
        assert_eq!(PairKind::classify(BodyRole::Spikes, BodyRole::KillPart), None);
    }

    #[test]
    fn landing_resets_jumps() {
        for surface in [BodyRole::Ground, BodyRole::Platform, BodyRole::FallingPlatform] {
            let (mut round, mut commands) = running();
            round.player.jump_count = 2;
            dispatch(&mut round, ContactPhase::Began, BodyRole::Player, surface, &mut commands);
            assert_eq!(round.player.jump_count, 0);
            assert!(round.player.grounded);
        }
    }

    #[test]
    fn active_contact_does_not_land() {
        let (mut round, mut commands) = running();
        round.player.jump_count = 1;
        dispatch(&mut round, ContactPhase::Active, BodyRole::Ground, BodyRole::Player, &mut commands);
        assert_eq!(round.player.jump_count, 1);
    }

    #[test]
    fn falling_platform_arms_once() {
        let (mut round, mut commands) = running();
        let pending = round.pending_timers();
        for _ in 0..3 {
            dispatch(
                &mut round,
                ContactPhase::Began,
                BodyRole::FallingPlatform,
                BodyRole::Player,
                &mut commands,
            );
        }
        assert_eq!(round.pending_timers(), pending + 1);
        assert_eq!(
            commands,
            vec![Command::Repaint {
                role: BodyRole::FallingPlatform,
                paint: palette::FALLING_ARMED
            }]
        );

        for _ in 0..60 {
            round.advance(1.0 / 60.0, &mut commands);
        }
        assert!(commands.contains(&Command::Release(BodyRole::FallingPlatform)));
    }

    #[test]
    fn hazard_ends_round_once_per_tick() {
        let (mut round, mut commands) = running();
        for hazard in [BodyRole::Spikes, BodyRole::KillPart, BodyRole::Lava] {
            dispatch(&mut round, ContactPhase::Began, BodyRole::Player, hazard, &mut commands);
        }
        dispatch(&mut round, ContactPhase::Began, BodyRole::Car, BodyRole::Player, &mut commands);
        assert_eq!(round.outcome(), Some(RoundOutcome::HazardDeath));
        assert_eq!(commands, vec![Command::RoundOver(RoundOutcome::HazardDeath)]);
    }

    #[test]
    fn car_contact_is_enemy_death() {
        let (mut round, mut commands) = running();
        dispatch(&mut round, ContactPhase::Began, BodyRole::Car, BodyRole::Player, &mut commands);
        assert_eq!(round.outcome(), Some(RoundOutcome::EnemyDeath));
    }

    #[test]
    fn barrel_knocks_back_without_ending() {
        let (mut round, mut commands) = running();
        dispatch(&mut round, ContactPhase::Began, BodyRole::Player, BodyRole::Barrel, &mut commands);
        assert!(round.is_running());
        assert_eq!(
            commands,
            vec![Command::SetVelocity {
                role: BodyRole::Player,
                velocity: Vec2::new(-300.0, -300.0)
            }]
        );
    }

    #[test]
    fn collectible_grants_one_power_up() {
        let (mut round, mut commands) = running();
        for _ in 0..2 {
            dispatch(
                &mut round,
                ContactPhase::Began,
                BodyRole::Collectible,
                BodyRole::Player,
                &mut commands,
            );
        }
        let banners = commands.iter().filter(|c| matches!(c, Command::ShowBanner(_))).count();
        assert_eq!(banners, 1);
        assert_eq!(commands[0], Command::Remove(BodyRole::Collectible));
    }

    #[test]
    fn car_keeps_its_heading_on_the_fallen_platform() {
        let (mut round, mut commands) = running();
        round.car_patrol.heading = 1.0;
        dispatch(
            &mut round,
            ContactPhase::Active,
            BodyRole::FallingPlatform,
            BodyRole::Car,
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![Command::SetVelocity { role: BodyRole::Car, velocity: Vec2::new(180.0, 0.0) }]
        );

        commands.clear();
        dispatch(
            &mut round,
            ContactPhase::Began,
            BodyRole::FallingPlatform,
            BodyRole::Car,
            &mut commands,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn finished_round_ignores_pairs() {
        let (mut round, mut commands) = running();
        round.end_round(RoundOutcome::TimeExpired, &mut commands);
        commands.clear();
        round.player.jump_count = 2;
        dispatch(&mut round, ContactPhase::Began, BodyRole::Player, BodyRole::Ground, &mut commands);
        dispatch(&mut round, ContactPhase::Began, BodyRole::Player, BodyRole::Spikes, &mut commands);
        assert!(commands.is_empty());
        assert_eq!(round.player.jump_count, 2);
        assert_eq!(round.outcome(), Some(RoundOutcome::TimeExpired));
    }
}
