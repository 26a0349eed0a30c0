//! Domain layer: the repository registry and the value types it is built from.

pub mod entities;
pub mod value_objects;
