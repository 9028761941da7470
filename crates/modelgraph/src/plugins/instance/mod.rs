//! Example instance graph output family

mod emitter;
mod generator;

pub use emitter::InstanceEmitter;
pub use generator::{
    generate_instances, instance_count, sample_value, InstanceEdge, InstanceGenerator,
    InstanceGraph, InstanceNode,
};
