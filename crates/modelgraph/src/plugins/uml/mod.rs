//! UML class-diagram output family

mod emitter;

pub use emitter::{association_key, UmlEmitter};
