use crate::components::entity::Entity;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Rebuild the render buffer from a set of entities.
/// Inactive entities are skipped; everything else is drawn in spawn order.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    for entity in entities.filter(|e| e.active) {
        let (half_width, half_height) = entity.shape.half_extents();
        buffer.push(RenderInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            rotation: entity.rotation,
            half_width,
            half_height,
            shape: entity.shape.code(),
            r: entity.paint.r,
            g: entity.paint.g,
            b: entity.paint.b,
            a: entity.paint.a,
        });
    }
}
