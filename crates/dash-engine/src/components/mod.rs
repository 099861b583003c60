pub mod entity;
pub mod paint;
