//! Domain layer: URL descriptors, workspace layout and clone task results

pub mod entities;
pub mod value_objects;
