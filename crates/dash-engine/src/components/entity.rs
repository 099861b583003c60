use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::paint::{Paint, Shape};
use crate::core::physics::{ColliderDesc, PhysicsBody};

/// Fat Entity: one struct, optional physics body.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Inactive entities are skipped by the renderer.
    pub active: bool,
    /// Position in world space (synced from physics after each step).
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    pub shape: Shape,
    pub paint: Paint,
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            shape: Shape::default(),
            paint: Paint::default(),
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Match the drawn outline to a collider.
    pub fn with_collider_shape(self, collider: &ColliderDesc) -> Self {
        let shape = match *collider {
            ColliderDesc::Ball { radius } => Shape::Circle { radius },
            ColliderDesc::Cuboid { half_width, half_height } => {
                Shape::Rect { half_width, half_height }
            }
        };
        self.with_shape(shape)
    }

    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }
}
