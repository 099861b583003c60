//! Round state and its clock.
//!
//! [`RoundState`] owns everything that changes during a round: held keys,
//! the player's jump bookkeeping, the countdown, active power-ups, patrols,
//! the random generator and the schedule of delayed actions. It never talks
//! to the physics world; every externally visible change is pushed as a
//! [`Command`] for the game to apply.

use dash_engine::{Due, Paint, Schedule, TimerId};
use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::DashConfig;
use crate::input::{Control, InputState};
use crate::level::{spawn_point, BodyRole};
use crate::movement::{steer_horizontal, Patrol, PlayerState};
use crate::powerup::{select_power_up, PowerUpEffect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    TimeExpired,
    HazardDeath,
    EnemyDeath,
}

impl RoundOutcome {
    pub fn message(self) -> &'static str {
        match self {
            RoundOutcome::TimeExpired => "Game Over! Time Ran Out!",
            RoundOutcome::HazardDeath => "Game Over! You touched a hazard!",
            RoundOutcome::EnemyDeath => "Game Over! You got hit by a car!",
        }
    }

    /// Value carried in the `ROUND_OVER` game event.
    pub fn code(self) -> f32 {
        match self {
            RoundOutcome::TimeExpired => 0.0,
            RoundOutcome::HazardDeath => 1.0,
            RoundOutcome::EnemyDeath => 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Running,
    Over(RoundOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub time_left: i32,
    pub running: bool,
}

/// Work deferred on the round clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedAction {
    CountdownTick,
    EndSpeedBoost,
    EndSlowFall,
    HideBanner,
    DropPlatform,
}

/// A change the round wants made outside itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetVelocity { role: BodyRole, velocity: Vec2 },
    Teleport { role: BodyRole, position: Vec2 },
    LockRotation(BodyRole),
    Remove(BodyRole),
    Repaint { role: BodyRole, paint: Paint },
    /// Turn a fixed body dynamic.
    Release(BodyRole),
    SetGravityFactor(f32),
    TimerText(i32),
    ShowBanner(PowerUpEffect),
    HideBanner,
    RoundOver(RoundOutcome),
}

pub struct RoundState {
    config: DashConfig,
    phase: RoundPhase,
    /// Simulated seconds since the round started.
    clock: f64,
    pub timer: TimerState,
    pub player: PlayerState,
    pub input: InputState,
    pub gravity_factor: f32,
    pub(crate) falling_platform_armed: bool,
    pub(crate) collectible_taken: bool,
    pub car_patrol: Patrol,
    pub barrel_patrol: Patrol,
    rng: Pcg32,
    schedule: Schedule<TimedAction>,
    speed_boost_timer: Option<TimerId>,
    slow_fall_timer: Option<TimerId>,
    banner_timer: Option<TimerId>,
    spawn: Vec2,
    viewport: Vec2,
}

impl RoundState {
    pub fn new(config: &DashConfig, viewport: Vec2, seed: u64) -> Self {
        let spawn = spawn_point(viewport);
        Self {
            config: config.clone(),
            phase: RoundPhase::Running,
            clock: 0.0,
            timer: TimerState { time_left: config.round_secs, running: false },
            player: PlayerState::new(spawn),
            input: InputState::new(),
            gravity_factor: 1.0,
            falling_platform_armed: false,
            collectible_taken: false,
            car_patrol: Patrol::new(&config.car, -1.0),
            barrel_patrol: Patrol::new(&config.barrel, 1.0),
            rng: Pcg32::seed_from_u64(seed),
            schedule: Schedule::new(),
            speed_boost_timer: None,
            slow_fall_timer: None,
            banner_timer: None,
            spawn,
            viewport,
        }
    }

    /// Start the countdown and show the initial time.
    pub fn start(&mut self, commands: &mut Vec<Command>) {
        self.timer = TimerState { time_left: self.config.round_secs, running: true };
        self.schedule.at(self.clock + 1.0, TimedAction::CountdownTick);
        commands.push(Command::TimerText(self.timer.time_left));
        log::info!("round started: {}s on the clock", self.timer.time_left);
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        match self.phase {
            RoundPhase::Over(outcome) => Some(outcome),
            RoundPhase::Running => None,
        }
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Moves the out-of-bounds line. The recorded spawn point stays put.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn pending_timers(&self) -> usize {
        self.schedule.len()
    }

    /// Seed for the next round, drawn from this round's generator.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    pub(crate) fn schedule_in(&mut self, delay: f64, action: TimedAction) -> TimerId {
        self.schedule.at(self.clock + delay, action)
    }

    /// Advance the round clock and fire whatever fell due.
    pub fn advance(&mut self, dt: f32, commands: &mut Vec<Command>) {
        if !self.is_running() {
            return;
        }
        self.clock += dt as f64;
        while let Some(due) = self.schedule.pop_due(self.clock) {
            self.fire(due, commands);
            if !self.is_running() {
                break;
            }
        }
    }

    fn fire(&mut self, due: Due<TimedAction>, commands: &mut Vec<Command>) {
        match due.action {
            TimedAction::CountdownTick => {
                self.timer.time_left -= 1;
                commands.push(Command::TimerText(self.timer.time_left));
                if self.timer.time_left <= 0 {
                    self.end_round(RoundOutcome::TimeExpired, commands);
                } else {
                    // Chained from the due time so the countdown never drifts.
                    self.schedule.at(due.fire_at + 1.0, TimedAction::CountdownTick);
                }
            }
            TimedAction::EndSpeedBoost => {
                self.speed_boost_timer = None;
                self.player.speed_multiplier = 1.0;
            }
            TimedAction::EndSlowFall => {
                self.slow_fall_timer = None;
                self.gravity_factor = 1.0;
                commands.push(Command::SetGravityFactor(1.0));
            }
            TimedAction::HideBanner => {
                self.banner_timer = None;
                commands.push(Command::HideBanner);
            }
            TimedAction::DropPlatform => {
                commands.push(Command::Release(BodyRole::FallingPlatform));
            }
        }
    }

    /// Enter a terminal state. Returns false if the round was already over.
    pub fn end_round(&mut self, outcome: RoundOutcome, commands: &mut Vec<Command>) -> bool {
        if !self.is_running() {
            return false;
        }
        self.phase = RoundPhase::Over(outcome);
        self.timer.running = false;
        self.teardown();
        commands.push(Command::RoundOver(outcome));
        log::info!("round over: {outcome:?} with {}s left", self.timer.time_left);
        true
    }

    /// Cancel everything still scheduled.
    pub fn teardown(&mut self) {
        self.schedule.cancel_all();
        self.speed_boost_timer = None;
        self.slow_fall_timer = None;
        self.banner_timer = None;
    }

    /// Take the collectible, at most once per round.
    pub fn collect(&mut self, commands: &mut Vec<Command>) -> Option<PowerUpEffect> {
        if self.collectible_taken || !self.is_running() {
            return None;
        }
        self.collectible_taken = true;
        commands.push(Command::Remove(BodyRole::Collectible));
        let effect = select_power_up(&mut self.rng);
        self.apply_effect(effect, commands);
        Some(effect)
    }

    pub fn apply_effect(&mut self, effect: PowerUpEffect, commands: &mut Vec<Command>) {
        let duration = self.config.power_ups.duration_secs;
        match effect {
            PowerUpEffect::SpeedBoost => {
                self.player.speed_multiplier = self.config.power_ups.speed_multiplier;
                if let Some(id) = self.speed_boost_timer.take() {
                    self.schedule.cancel(id);
                }
                self.speed_boost_timer = Some(self.schedule_in(duration, TimedAction::EndSpeedBoost));
            }
            PowerUpEffect::SlowFall => {
                self.gravity_factor = self.config.power_ups.slow_fall_gravity;
                commands.push(Command::SetGravityFactor(self.gravity_factor));
                if let Some(id) = self.slow_fall_timer.take() {
                    self.schedule.cancel(id);
                }
                self.slow_fall_timer = Some(self.schedule_in(duration, TimedAction::EndSlowFall));
            }
            PowerUpEffect::ExtraTime => {
                self.timer.time_left += self.config.power_ups.extra_time_secs;
                commands.push(Command::TimerText(self.timer.time_left));
            }
        }

        commands.push(Command::ShowBanner(effect));
        if let Some(id) = self.banner_timer.take() {
            self.schedule.cancel(id);
        }
        let banner_secs = self.config.power_ups.banner_secs;
        self.banner_timer = Some(self.schedule_in(banner_secs, TimedAction::HideBanner));
        log::info!("power-up: {}", effect.label());
    }

    /// Respawn the player if they fell out of the world. Not terminal.
    pub fn check_bounds(&mut self, commands: &mut Vec<Command>) -> bool {
        if self.player.position.y <= self.viewport.y + self.config.fall_margin {
            return false;
        }
        self.player.respawn(self.spawn);
        if let Some(id) = self.speed_boost_timer.take() {
            self.schedule.cancel(id);
        }
        commands.push(Command::Teleport { role: BodyRole::Player, position: self.spawn });
        commands.push(Command::SetVelocity { role: BodyRole::Player, velocity: Vec2::ZERO });
        log::info!("player fell out of the world, respawning");
        true
    }

    pub fn key_down(&mut self, key_code: u32, commands: &mut Vec<Command>) {
        let edge = self.input.press(key_code);
        if edge == Some(Control::Jump)
            && self.is_running()
            && self.player.try_jump(self.config.max_jumps, self.config.jump_speed)
        {
            commands.push(Command::SetVelocity {
                role: BodyRole::Player,
                velocity: self.player.velocity,
            });
        }
    }

    pub fn key_up(&mut self, key_code: u32) {
        self.input.release(key_code);
    }

    /// Per-tick motion: player steering, rotation lock and enemy patrols.
    /// Positions are `None` for bodies that no longer exist.
    pub fn drive(&mut self, car_x: Option<f32>, barrel_x: Option<f32>, commands: &mut Vec<Command>) {
        if !self.is_running() {
            return;
        }
        if let Some(vx) =
            steer_horizontal(&self.input, self.config.base_speed, self.player.speed_multiplier)
        {
            self.player.velocity.x = vx;
            commands.push(Command::SetVelocity {
                role: BodyRole::Player,
                velocity: self.player.velocity,
            });
        }
        commands.push(Command::LockRotation(BodyRole::Player));

        let patrols = [
            (BodyRole::Car, car_x, &mut self.car_patrol),
            (BodyRole::Barrel, barrel_x, &mut self.barrel_patrol),
        ];
        for (role, x, patrol) in patrols {
            if let Some(velocity) = x.and_then(|x| patrol.steer(x)) {
                commands.push(Command::SetVelocity { role, velocity });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keys;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn running() -> (RoundState, Vec<Command>) {
        let mut round = RoundState::new(&DashConfig::default(), Vec2::new(1280.0, 720.0), 1);
        let mut commands = Vec::new();
        round.start(&mut commands);
        (round, commands)
    }

    /// Advance whole seconds of simulated time in fixed steps.
    fn run_secs(round: &mut RoundState, secs: u32, commands: &mut Vec<Command>) {
        for _ in 0..secs * 60 {
            round.advance(DT, commands);
        }
    }

    fn round_overs(commands: &[Command]) -> usize {
        commands.iter().filter(|c| matches!(c, Command::RoundOver(_))).count()
    }

    #[test]
    fn start_shows_full_time() {
        let (round, commands) = running();
        assert_eq!(commands, vec![Command::TimerText(20)]);
        assert!(round.timer.running);
        assert_eq!(round.pending_timers(), 1);
    }

    #[test]
    fn twenty_seconds_expire_exactly_once() {
        let (mut round, mut commands) = running();
        run_secs(&mut round, 19, &mut commands);
        assert_eq!(round.timer.time_left, 1);
        assert!(round.is_running());

        run_secs(&mut round, 5, &mut commands);
        assert_eq!(round.timer.time_left, 0);
        assert_eq!(round.outcome(), Some(RoundOutcome::TimeExpired));
        assert_eq!(round_overs(&commands), 1);
        assert!(!round.timer.running);
        assert_eq!(round.pending_timers(), 0);
    }

    #[test]
    fn countdown_updates_text_every_second() {
        let (mut round, mut commands) = running();
        commands.clear();
        run_secs(&mut round, 3, &mut commands);
        assert_eq!(
            commands,
            vec![Command::TimerText(19), Command::TimerText(18), Command::TimerText(17)]
        );
    }

    #[test]
    fn extra_time_at_five_gives_fifteen() {
        let (mut round, mut commands) = running();
        run_secs(&mut round, 15, &mut commands);
        assert_eq!(round.timer.time_left, 5);

        commands.clear();
        round.apply_effect(PowerUpEffect::ExtraTime, &mut commands);
        assert_eq!(round.timer.time_left, 15);
        assert_eq!(commands[0], Command::TimerText(15));
        assert!(commands.contains(&Command::ShowBanner(PowerUpEffect::ExtraTime)));

        run_secs(&mut round, 14, &mut commands);
        assert!(round.is_running());
        run_secs(&mut round, 1, &mut commands);
        assert_eq!(round.outcome(), Some(RoundOutcome::TimeExpired));
    }

    #[test]
    fn speed_boost_reverts_after_duration() {
        let (mut round, mut commands) = running();
        round.apply_effect(PowerUpEffect::SpeedBoost, &mut commands);
        assert_eq!(round.player.speed_multiplier, 1.5);
        run_secs(&mut round, 4, &mut commands);
        assert_eq!(round.player.speed_multiplier, 1.5);
        run_secs(&mut round, 1, &mut commands);
        assert_eq!(round.player.speed_multiplier, 1.0);
    }

    #[test]
    fn retriggered_speed_boost_restarts_its_expiry() {
        let (mut round, mut commands) = running();
        round.apply_effect(PowerUpEffect::SpeedBoost, &mut commands);
        run_secs(&mut round, 3, &mut commands);
        round.apply_effect(PowerUpEffect::SpeedBoost, &mut commands);
        // The first expiry would have fired at 5 s.
        run_secs(&mut round, 4, &mut commands);
        assert_eq!(round.player.speed_multiplier, 1.5);
        run_secs(&mut round, 1, &mut commands);
        assert_eq!(round.player.speed_multiplier, 1.0);
    }

    #[test]
    fn slow_fall_restores_gravity() {
        let (mut round, mut commands) = running();
        commands.clear();
        round.apply_effect(PowerUpEffect::SlowFall, &mut commands);
        assert_eq!(round.gravity_factor, 0.5);
        assert_eq!(commands[0], Command::SetGravityFactor(0.5));

        round.apply_effect(PowerUpEffect::SpeedBoost, &mut commands);
        run_secs(&mut round, 5, &mut commands);
        assert_eq!(round.gravity_factor, 1.0);
        assert_eq!(round.player.speed_multiplier, 1.0);
        assert!(commands.contains(&Command::SetGravityFactor(1.0)));
    }

    #[test]
    fn banner_hides_after_two_seconds() {
        let (mut round, mut commands) = running();
        round.apply_effect(PowerUpEffect::SlowFall, &mut commands);
        commands.clear();
        run_secs(&mut round, 1, &mut commands);
        assert!(!commands.contains(&Command::HideBanner));
        run_secs(&mut round, 1, &mut commands);
        assert_eq!(commands.iter().filter(|c| **c == Command::HideBanner).count(), 1);
    }

    #[test]
    fn collectible_is_taken_once() {
        let (mut round, mut commands) = running();
        assert!(round.collect(&mut commands).is_some());
        assert!(round.collect(&mut commands).is_none());
        let removals = commands
            .iter()
            .filter(|c| **c == Command::Remove(BodyRole::Collectible))
            .count();
        assert_eq!(removals, 1);
    }

    #[test]
    fn round_over_freezes_time_and_cancels_timers() {
        let (mut round, mut commands) = running();
        round.apply_effect(PowerUpEffect::SpeedBoost, &mut commands);
        run_secs(&mut round, 8, &mut commands);
        assert_eq!(round.timer.time_left, 12);

        assert!(round.end_round(RoundOutcome::HazardDeath, &mut commands));
        assert!(!round.end_round(RoundOutcome::EnemyDeath, &mut commands));
        assert_eq!(round.pending_timers(), 0);

        run_secs(&mut round, 10, &mut commands);
        assert_eq!(round.timer.time_left, 12);
        assert_eq!(round.outcome(), Some(RoundOutcome::HazardDeath));
        assert_eq!(round_overs(&commands), 1);
    }

    #[test]
    fn falling_out_respawns_without_touching_timer() {
        let (mut round, mut commands) = running();
        run_secs(&mut round, 3, &mut commands);
        round.player.position = Vec2::new(640.0, 721.0);
        assert!(!round.check_bounds(&mut commands));

        round.player.position = Vec2::new(640.0, 900.0);
        round.player.velocity = Vec2::new(30.0, 800.0);
        round.player.jump_count = 2;
        round.apply_effect(PowerUpEffect::SpeedBoost, &mut commands);
        let pending = round.pending_timers();
        commands.clear();
        assert!(round.check_bounds(&mut commands));
        assert_eq!(round.player.speed_multiplier, 1.0);
        assert_eq!(round.pending_timers(), pending - 1);
        assert_eq!(round.player.position, Vec2::new(150.0, 620.0));
        assert_eq!(round.player.velocity, Vec2::ZERO);
        assert_eq!(round.player.jump_count, 0);
        assert_eq!(round.timer.time_left, 17);
        assert_eq!(
            commands,
            vec![
                Command::Teleport { role: BodyRole::Player, position: Vec2::new(150.0, 620.0) },
                Command::SetVelocity { role: BodyRole::Player, velocity: Vec2::ZERO },
            ]
        );
    }

    #[test]
    fn resize_moves_the_fall_line_but_not_the_spawn() {
        let (mut round, mut commands) = running();
        round.set_viewport(Vec2::new(800.0, 1000.0));
        round.player.position = Vec2::new(100.0, 900.0);
        assert!(!round.check_bounds(&mut commands));
        assert_eq!(round.spawn(), Vec2::new(150.0, 620.0));
    }

    #[test]
    fn jump_on_edge_only() {
        let (mut round, mut commands) = running();
        commands.clear();
        round.key_down(keys::ARROW_UP, &mut commands);
        round.key_down(keys::ARROW_UP, &mut commands);
        assert_eq!(round.player.jump_count, 1);
        assert_eq!(commands.len(), 1);

        round.key_up(keys::ARROW_UP);
        round.key_down(keys::KEY_W, &mut commands);
        assert_eq!(round.player.jump_count, 2);
        round.key_up(keys::KEY_W);
        round.key_down(keys::KEY_W, &mut commands);
        assert_eq!(round.player.jump_count, 2);
    }

    #[test]
    fn drive_steers_player_and_locks_rotation() {
        let (mut round, mut commands) = running();
        round.player.velocity = Vec2::new(0.0, 50.0);
        round.key_down(keys::KEY_D, &mut commands);
        commands.clear();
        round.drive(None, None, &mut commands);
        assert_eq!(
            commands,
            vec![
                Command::SetVelocity { role: BodyRole::Player, velocity: Vec2::new(300.0, 50.0) },
                Command::LockRotation(BodyRole::Player),
            ]
        );
    }

    #[test]
    fn drive_turns_patrols_at_their_bounds() {
        let (mut round, mut commands) = running();
        commands.clear();
        round.drive(Some(650.0), Some(360.0), &mut commands);
        assert!(commands.contains(&Command::SetVelocity {
            role: BodyRole::Car,
            velocity: Vec2::new(180.0, 0.0)
        }));
        assert!(commands.contains(&Command::SetVelocity {
            role: BodyRole::Barrel,
            velocity: Vec2::new(-120.0, 0.0)
        }));
    }

    #[test]
    fn nothing_moves_after_the_round_ends() {
        let (mut round, mut commands) = running();
        round.end_round(RoundOutcome::EnemyDeath, &mut commands);
        commands.clear();
        round.key_down(keys::ARROW_UP, &mut commands);
        round.drive(Some(0.0), Some(0.0), &mut commands);
        assert!(commands.is_empty());
        assert_eq!(round.player.jump_count, 0);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Down(u32),
        Up(u32),
        Land,
    }

    fn step() -> impl Strategy<Value = Step> {
        let key = prop::sample::select(vec![keys::ARROW_UP, keys::KEY_W, keys::ARROW_LEFT, 13]);
        prop_oneof![
            key.clone().prop_map(Step::Down),
            key.prop_map(Step::Up),
            Just(Step::Land),
        ]
    }

    proptest! {
        #[test]
        fn jump_count_stays_in_range(steps in prop::collection::vec(step(), 0..64)) {
            let (mut round, mut commands) = running();
            for step in steps {
                let before = round.player.jump_count;
                match step {
                    Step::Down(code) => {
                        let edge = Control::from_key_code(code) == Some(Control::Jump)
                            && !round.input.is_held_code(code);
                        round.key_down(code, &mut commands);
                        let honoured = round.player.jump_count == before + 1;
                        prop_assert_eq!(honoured, edge && before < 2);
                    }
                    Step::Up(code) => round.key_up(code),
                    Step::Land => round.player.land(),
                }
                prop_assert!(round.player.jump_count <= 2);
            }
        }
    }
}
