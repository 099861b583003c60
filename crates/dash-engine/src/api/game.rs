use glam::Vec2;

use crate::api::error::{validate_world_size, EngineError};
use crate::api::types::{EntityId, GameEvent};
use crate::components::entity::Entity;
use crate::components::paint::Paint;
use crate::core::physics::{
    BodyDesc, BodyType, ColliderMaterial, CollisionPair, PhysicsWorld,
};
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units. Tracks the display surface on resize.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of render instances (default: 64).
    pub max_instances: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector for physics simulation. Y-down, so positive Y pulls downward.
    pub gravity: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 1280.0,
            world_height: 720.0,
            max_instances: 64,
            max_events: 32,
            gravity: Vec2::ZERO,
        }
    }
}

impl GameConfig {
    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            return Err(EngineError::InvalidTimestep(self.fixed_dt));
        }
        validate_world_size(self.world_width, self.world_height)
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities. An error aborts startup.
    fn init(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError>;

    /// One fixed simulation step. Runs before the physics step; collisions
    /// reported by `ctx.collisions()` come from the previous physics step.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    pub events: Vec<GameEvent>,
    next_id: u32,
    collision_events: Vec<CollisionPair>,
    physics_paused: bool,
    dt: f32,
    seed: u64,
    world_size: Vec2,
}

impl EngineContext {
    pub fn new(config: &GameConfig) -> Self {
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.set_dt(config.fixed_dt);
        Self {
            scene: Scene::new(),
            physics,
            events: Vec::with_capacity(config.max_events),
            next_id: 1,
            collision_events: Vec::new(),
            physics_paused: false,
            dt: config.fixed_dt,
            seed: 0,
            world_size: Vec2::new(config.world_width, config.world_height),
        }
    }

    /// Seed handed to the game for its random number generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Length of one fixed step in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }

    pub fn set_world_size(&mut self, size: Vec2) {
        self.world_size = size;
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to TypeScript.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. Position and outline come from the BodyDesc.
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity
            .with_pos(desc.position)
            .with_collider_shape(&desc.collider)
            .with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity, cleaning up its physics body if present.
    pub fn despawn(&mut self, id: EntityId) {
        if let Some(entity) = self.scene.despawn(id) {
            if let Some(body) = &entity.body {
                self.physics.remove_body(body);
            }
        }
    }

    /// Despawn every entity and drop pending collision reports.
    pub fn clear_world(&mut self) {
        for entity in self.scene.take_all() {
            if let Some(body) = &entity.body {
                self.physics.remove_body(body);
            }
        }
        self.collision_events.clear();
    }

    /// Set the linear velocity of an entity's physics body.
    pub fn set_velocity(&mut self, id: EntityId, vel: Vec2) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.set_velocity(&body, vel);
        }
    }

    /// Get the linear velocity of an entity's physics body.
    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.velocity(body))
            .unwrap_or(Vec2::ZERO)
    }

    /// Teleport an entity (and its body, if any).
    pub fn set_position(&mut self, id: EntityId, pos: Vec2) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.pos = pos;
            if let Some(body) = entity.body {
                self.physics.set_position(&body, pos);
            }
        }
    }

    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.scene.get(id).map(|e| e.pos)
    }

    /// Force an entity's rotation and cancel any spin.
    pub fn set_rotation(&mut self, id: EntityId, rotation: f32) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.rotation = rotation;
            if let Some(body) = entity.body {
                self.physics.set_rotation(&body, rotation);
            }
        }
    }

    /// Switch an entity's body between fixed and dynamic.
    pub fn set_body_type(&mut self, id: EntityId, body_type: BodyType) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.set_body_type(&body, body_type);
        }
    }

    pub fn set_paint(&mut self, id: EntityId, paint: Paint) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.paint = paint;
        }
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.physics.set_gravity(gravity);
    }

    /// Get collision events from the most recent physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Entity pairs touching after the most recent physics step.
    pub fn active_contacts(&self) -> &[(EntityId, EntityId)] {
        self.physics.active_contacts()
    }

    /// Freeze or resume the simulation. While paused, `step_physics` is a no-op.
    pub fn set_physics_paused(&mut self, paused: bool) {
        self.physics_paused = paused;
    }

    pub fn physics_paused(&self) -> bool {
        self.physics_paused
    }

    /// Step the physics simulation and sync positions back to entities.
    /// Called by the game runner after `Game::update()`.
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        if self.physics_paused {
            return;
        }
        self.physics.step_into(&mut self.collision_events);

        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}
