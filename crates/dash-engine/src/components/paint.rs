/// Flat RGBA fill colour, components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Paint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Paint {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }
}

/// Outline the renderer draws for an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect { half_width: f32, half_height: f32 },
    Circle { radius: f32 },
}

impl Shape {
    /// Numeric code written into the render buffer.
    pub fn code(&self) -> f32 {
        match self {
            Shape::Rect { .. } => 0.0,
            Shape::Circle { .. } => 1.0,
        }
    }

    pub fn half_extents(&self) -> (f32, f32) {
        match *self {
            Shape::Rect { half_width, half_height } => (half_width, half_height),
            Shape::Circle { radius } => (radius, radius),
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Rect { half_width: 0.5, half_height: 0.5 }
    }
}
