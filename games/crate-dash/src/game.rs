use dash_engine::{
    BodyType, EngineContext, EngineError, Game, GameConfig, GameEvent, InputEvent, InputQueue,
};
use glam::Vec2;

use crate::config::DashConfig;
use crate::hud::{banner_text, timer_text, Hud, Presenter};
use crate::level::{self, BodyRole, Roster};
use crate::round::{Command, RoundState};
use crate::rules::{self, ContactPhase};

/// Game event kinds sent to the page.
pub mod events {
    /// HUD text changed; re-read `get_hud_json()`.
    pub const HUD_CHANGED: f32 = 1.0;
    /// The round ended. `a` = outcome code.
    pub const ROUND_OVER: f32 = 2.0;
    /// A power-up was picked up. `a` = effect code.
    pub const POWER_UP: f32 = 3.0;
}

/// Custom input event kinds the page may send.
pub mod custom {
    pub const RESTART: u32 = 1;
}

pub struct CrateDash<P: Presenter = Hud> {
    config: DashConfig,
    /// Config loaded mid-round, applied by the next restart.
    pending_config: Option<DashConfig>,
    presenter: P,
    round: Option<RoundState>,
    roster: Roster,
    rounds_played: u32,
}

impl CrateDash<Hud> {
    pub fn new() -> Self {
        Self::with_presenter(DashConfig::default(), Hud::default())
    }

    pub fn hud(&self) -> &Hud {
        &self.presenter
    }
}

impl Default for CrateDash<Hud> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Presenter> CrateDash<P> {
    pub fn with_presenter(config: DashConfig, presenter: P) -> Self {
        Self {
            config,
            pending_config: None,
            presenter,
            round: None,
            roster: Roster::default(),
            rounds_played: 0,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn dash_config(&self) -> &DashConfig {
        &self.config
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Use `config` from the next restart on.
    pub fn load_config(&mut self, config: DashConfig) {
        self.pending_config = Some(config);
    }

    fn start_round(&mut self, ctx: &mut EngineContext, seed: u64) {
        let viewport = ctx.world_size();
        self.roster = Roster::spawn(ctx, level::layout(&self.config, viewport));

        let mut round = RoundState::new(&self.config, viewport, seed);
        let mut commands = Vec::new();
        round.start(&mut commands);
        self.round = Some(round);
        self.rounds_played += 1;
        log::info!("round {} in a {}x{} viewport", self.rounds_played, viewport.x, viewport.y);

        self.apply(ctx, commands);
    }

    /// Tear the level down and build a fresh round.
    fn restart(&mut self, ctx: &mut EngineContext) {
        let seed = match self.round.as_mut() {
            Some(round) => {
                round.teardown();
                round.next_seed()
            }
            None => ctx.seed(),
        };
        if let Some(config) = self.pending_config.take() {
            self.config = config;
        }

        ctx.clear_world();
        ctx.set_physics_paused(false);
        ctx.set_gravity(Vec2::new(0.0, self.config.gravity));
        self.presenter.hide_message();
        self.presenter.hide_power_up_banner();

        self.start_round(ctx, seed);
    }

    fn resize(&mut self, ctx: &mut EngineContext, size: Vec2) {
        if let Some(ground) = self.roster.id(BodyRole::Ground) {
            ctx.set_position(ground, level::ground_position(size));
        }
        if let Some(round) = self.round.as_mut() {
            round.set_viewport(size);
        }
    }

    /// Carry out what the round asked for, in order.
    fn apply(&mut self, ctx: &mut EngineContext, commands: Vec<Command>) {
        let mut hud_changed = false;
        for command in commands {
            match command {
                Command::SetVelocity { role, velocity } => {
                    if let Some(id) = self.roster.id(role) {
                        ctx.set_velocity(id, velocity);
                    }
                }
                Command::Teleport { role, position } => {
                    if let Some(id) = self.roster.id(role) {
                        ctx.set_position(id, position);
                    }
                }
                Command::LockRotation(role) => {
                    if let Some(id) = self.roster.id(role) {
                        ctx.set_rotation(id, 0.0);
                    }
                }
                Command::Remove(role) => {
                    if let Some(id) = self.roster.remove(role) {
                        ctx.despawn(id);
                    }
                }
                Command::Repaint { role, paint } => {
                    if let Some(id) = self.roster.id(role) {
                        ctx.set_paint(id, paint);
                    }
                }
                Command::Release(role) => {
                    if let Some(id) = self.roster.id(role) {
                        ctx.set_body_type(id, BodyType::Dynamic);
                    }
                }
                Command::SetGravityFactor(factor) => {
                    ctx.set_gravity(Vec2::new(0.0, self.config.gravity * factor));
                }
                Command::TimerText(seconds) => {
                    self.presenter.update_timer_text(&timer_text(seconds));
                    hud_changed = true;
                }
                Command::ShowBanner(effect) => {
                    self.presenter.show_power_up_banner(&banner_text(effect));
                    ctx.emit_event(GameEvent::new(events::POWER_UP, effect.code()));
                    hud_changed = true;
                }
                Command::HideBanner => {
                    self.presenter.hide_power_up_banner();
                    hud_changed = true;
                }
                Command::RoundOver(outcome) => {
                    ctx.set_physics_paused(true);
                    self.presenter.hide_power_up_banner();
                    self.presenter.show_message(outcome.message());
                    ctx.emit_event(GameEvent::new(events::ROUND_OVER, outcome.code()));
                    hud_changed = true;
                }
            }
        }
        if hud_changed {
            ctx.emit_event(GameEvent::new(events::HUD_CHANGED, 0.0));
        }
    }
}

impl<P: Presenter> Game for CrateDash<P> {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: self.config.viewport_width,
            world_height: self.config.viewport_height,
            gravity: Vec2::new(0.0, self.config.gravity),
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError> {
        self.config
            .validate()
            .map_err(|err| EngineError::Setup(err.to_string()))?;
        let seed = ctx.seed();
        self.start_round(ctx, seed);
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let mut restart = false;
        for event in input.iter() {
            match *event {
                InputEvent::Resize { width, height } => self.resize(ctx, Vec2::new(width, height)),
                InputEvent::Custom { kind: custom::RESTART, .. } => restart = true,
                _ => {}
            }
        }
        if restart {
            if self.round.as_ref().is_some_and(RoundState::is_running) {
                log::debug!("restart ignored while the round is running");
            } else {
                self.restart(ctx);
                return;
            }
        }

        let Some(round) = self.round.as_mut() else {
            return;
        };
        let mut commands = Vec::new();

        if round.is_running() {
            if let Some(player) = self.roster.id(BodyRole::Player) {
                round.player.position = ctx.position(player).unwrap_or(round.player.position);
                round.player.velocity = ctx.velocity(player);
            }

            for pair in ctx.collisions().iter().filter(|pair| pair.started) {
                if let (Some(a), Some(b)) =
                    (self.roster.role_of(pair.entity_a), self.roster.role_of(pair.entity_b))
                {
                    rules::dispatch(round, ContactPhase::Began, a, b, &mut commands);
                }
            }
            for &(a, b) in ctx.active_contacts() {
                if let (Some(a), Some(b)) = (self.roster.role_of(a), self.roster.role_of(b)) {
                    rules::dispatch(round, ContactPhase::Active, a, b, &mut commands);
                }
            }

            round.check_bounds(&mut commands);
            round.advance(ctx.dt(), &mut commands);
        }

        for event in input.iter() {
            match *event {
                InputEvent::KeyDown { key_code } => round.key_down(key_code, &mut commands),
                InputEvent::KeyUp { key_code } => round.key_up(key_code),
                _ => {}
            }
        }

        let x_of = |role: BodyRole| self.roster.id(role).and_then(|id| ctx.position(id)).map(|p| p.x);
        let (car_x, barrel_x) = (x_of(BodyRole::Car), x_of(BodyRole::Barrel));
        round.drive(car_x, barrel_x, &mut commands);

        self.apply(ctx, commands);
    }
}
