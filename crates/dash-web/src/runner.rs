use dash_engine::api::error::validate_world_size;
use dash_engine::glam::Vec2;
use dash_engine::{
    build_render_buffer, EngineContext, EngineError, FixedTimestep, Game, GameConfig,
    InputEvent, InputQueue, RenderBuffer,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]` (see `export_game!`), because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    /// Validate the game's configuration and build the engine around it.
    pub fn new(game: G, seed: u64) -> Result<Self, EngineError> {
        let config = game.config();
        config.validate()?;
        let timestep = FixedTimestep::new(config.fixed_dt)?;

        Ok(Self {
            ctx: EngineContext::new(&config).with_seed(seed),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            input: InputQueue::new(),
            timestep,
            config,
            game,
            initialized: false,
        })
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) -> Result<(), EngineError> {
        self.game.init(&mut self.ctx)?;
        self.initialized = true;
        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);
        Ok(())
    }

    /// Queue an input event for the next simulation step.
    /// Resize events also update the runner's world size right away.
    pub fn push_input(&mut self, event: InputEvent) {
        if let InputEvent::Resize { width, height } = event {
            match validate_world_size(width, height) {
                Ok(()) => {
                    self.config.world_width = width;
                    self.config.world_height = height;
                    self.ctx.set_world_size(Vec2::new(width, height));
                }
                Err(err) => {
                    log::warn!("ignoring resize: {err}");
                    return;
                }
            }
        }
        self.input.push(event);
    }

    /// Run one frame: fixed steps of game update + physics, then rebuild the render buffer.
    /// Input is handed to the first step of the frame; frames that run no step keep it queued.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            self.input.drain();
            self.ctx.step_physics();
        }

        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ---- Pointer accessors for direct wasm-memory reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }
}
