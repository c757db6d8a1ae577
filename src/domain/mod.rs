//! Domain layer: target paths, module paths, pseudo-versions and target lists

pub mod entities;
pub mod value_objects;
