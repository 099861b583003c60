use std::collections::HashMap;

use dash_engine::{
    BodyDesc, ColliderDesc, ColliderMaterial, EngineContext, Entity, EntityId, Paint,
};
use glam::Vec2;

use crate::config::DashConfig;

/// What a body is for. Every body the level creates carries exactly one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRole {
    Player,
    Ground,
    Platform,
    FallingPlatform,
    Spikes,
    Lava,
    KillPart,
    Car,
    Barrel,
    Collectible,
}

impl BodyRole {
    pub fn tag(self) -> &'static str {
        match self {
            BodyRole::Player => "player",
            BodyRole::Ground => "ground",
            BodyRole::Platform => "platform",
            BodyRole::FallingPlatform => "falling_platform",
            BodyRole::Spikes => "spikes",
            BodyRole::Lava => "lava",
            BodyRole::KillPart => "kill_part",
            BodyRole::Car => "car",
            BodyRole::Barrel => "barrel",
            BodyRole::Collectible => "collectible",
        }
    }

    /// Surfaces that restore the player's jumps.
    pub fn is_ground_like(self) -> bool {
        matches!(self, BodyRole::Ground | BodyRole::Platform | BodyRole::FallingPlatform)
    }

    pub fn is_hazard(self) -> bool {
        matches!(self, BodyRole::Spikes | BodyRole::Lava | BodyRole::KillPart)
    }

    pub fn is_enemy(self) -> bool {
        self == BodyRole::Car
    }
}

pub mod palette {
    use dash_engine::Paint;

    pub const PLAYER: Paint = Paint::hex(0x8b5a2b);
    pub const GROUND: Paint = Paint::hex(0x3c8d2f);
    pub const PLATFORM: Paint = Paint::hex(0x6b6b6b);
    pub const FALLING_IDLE: Paint = Paint::hex(0xffff00);
    pub const FALLING_ARMED: Paint = Paint::hex(0xffa500);
    pub const SPIKES: Paint = Paint::hex(0xff0000);
    pub const LAVA: Paint = Paint::hex(0xffa500);
    pub const KILL_PART: Paint = Paint::hex(0xff0000);
    pub const CAR: Paint = Paint::hex(0x000000);
    pub const BARREL: Paint = Paint::hex(0xa52a2a);
    pub const COLLECTIBLE: Paint = Paint::hex(0xffff00);
}

/// Default density for everything except the player (mass per px²).
const DENSITY: f32 = 0.001;

/// One body of the level, ready to spawn.
#[derive(Debug, Clone)]
pub struct BodySpec {
    pub role: BodyRole,
    pub desc: BodyDesc,
    pub material: ColliderMaterial,
    pub paint: Paint,
}

impl BodySpec {
    fn fixed(role: BodyRole, collider: ColliderDesc, pos: Vec2, paint: Paint) -> Self {
        Self {
            role,
            desc: BodyDesc::fixed(collider).with_position(pos),
            material: material(0.0, 0.1, DENSITY),
            paint,
        }
    }
}

fn material(restitution: f32, friction: f32, density: f32) -> ColliderMaterial {
    ColliderMaterial { restitution, friction, density }
}

fn rect(width: f32, height: f32) -> ColliderDesc {
    ColliderDesc::Cuboid { half_width: width / 2.0, half_height: height / 2.0 }
}

/// Where the player starts and respawns.
pub fn spawn_point(viewport: Vec2) -> Vec2 {
    Vec2::new(150.0, viewport.y - 100.0)
}

pub fn ground_position(viewport: Vec2) -> Vec2 {
    Vec2::new(viewport.x / 2.0, viewport.y - 20.0)
}

/// The level, laid out for a viewport. Spawn order is the order of this list.
pub fn layout(config: &DashConfig, viewport: Vec2) -> Vec<BodySpec> {
    let (w, h) = (viewport.x, viewport.y);
    vec![
        BodySpec {
            role: BodyRole::Player,
            desc: BodyDesc::dynamic(rect(50.0, 50.0))
                .with_position(spawn_point(viewport))
                .with_fixed_rotation(true),
            material: material(0.2, 0.8, 0.01),
            paint: palette::PLAYER,
        },
        BodySpec::fixed(BodyRole::Ground, rect(w, 40.0), ground_position(viewport), palette::GROUND),
        BodySpec::fixed(
            BodyRole::Platform,
            rect(300.0, 20.0),
            Vec2::new(w / 2.0, h / 2.0),
            palette::PLATFORM,
        ),
        BodySpec::fixed(
            BodyRole::Collectible,
            ColliderDesc::Ball { radius: 20.0 },
            Vec2::new(w - 100.0, h / 2.0 - 50.0),
            palette::COLLECTIBLE,
        ),
        BodySpec::fixed(BodyRole::Spikes, rect(80.0, 20.0), Vec2::new(400.0, h - 40.0), palette::SPIKES),
        BodySpec {
            role: BodyRole::FallingPlatform,
            // Free to tumble once it is released.
            desc: BodyDesc::fixed(rect(150.0, 20.0))
                .with_position(Vec2::new(600.0, h / 2.0))
                .with_fixed_rotation(false),
            material: material(0.0, 0.1, DENSITY),
            paint: palette::FALLING_IDLE,
        },
        BodySpec {
            role: BodyRole::Car,
            desc: BodyDesc::dynamic(rect(100.0, 40.0))
                .with_position(Vec2::new(800.0, h - 60.0))
                .with_velocity(Vec2::new(-config.car.speed, 0.0))
                .with_fixed_rotation(true),
            material: material(0.0, 0.0, DENSITY),
            paint: palette::CAR,
        },
        BodySpec {
            role: BodyRole::Barrel,
            desc: BodyDesc::dynamic(ColliderDesc::Ball { radius: 25.0 })
                .with_position(Vec2::new(300.0, h - 100.0)),
            material: material(0.5, 0.5, DENSITY),
            paint: palette::BARREL,
        },
        BodySpec::fixed(BodyRole::Lava, rect(200.0, 30.0), Vec2::new(900.0, h - 15.0), palette::LAVA),
        BodySpec::fixed(
            BodyRole::KillPart,
            rect(100.0, 20.0),
            Vec2::new(400.0, h - 50.0),
            palette::KILL_PART,
        ),
    ]
}

/// Two-way map between the level's roles and the entities spawned for them.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    by_role: HashMap<BodyRole, EntityId>,
    by_id: HashMap<EntityId, BodyRole>,
}

impl Roster {
    /// Spawn every body and remember which entity plays which role.
    pub fn spawn(ctx: &mut EngineContext, specs: Vec<BodySpec>) -> Self {
        let mut roster = Self::default();
        for spec in specs {
            let id = ctx.next_id();
            let entity = Entity::new(id).with_tag(spec.role.tag()).with_paint(spec.paint);
            ctx.spawn_with_body(entity, spec.desc, spec.material);
            roster.insert(spec.role, id);
        }
        roster
    }

    fn insert(&mut self, role: BodyRole, id: EntityId) {
        self.by_role.insert(role, id);
        self.by_id.insert(id, role);
    }

    pub fn id(&self, role: BodyRole) -> Option<EntityId> {
        self.by_role.get(&role).copied()
    }

    pub fn role_of(&self, id: EntityId) -> Option<BodyRole> {
        self.by_id.get(&id).copied()
    }

    /// Forget a role, returning the entity that held it.
    pub fn remove(&mut self, role: BodyRole) -> Option<EntityId> {
        let id = self.by_role.remove(&role)?;
        self.by_id.remove(&id);
        Some(id)
    }
}
