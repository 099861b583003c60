// extensions/mod.rs
//
// Optional extension modules.
// These are decoupled from core Entity/Scene; games opt in by owning them.

pub mod schedule;

pub use schedule::{Due, Schedule, TimerId};
