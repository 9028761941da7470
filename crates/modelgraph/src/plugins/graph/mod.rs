//! Property-graph output family
//!
//! Converts a validated domain model into a flat property-graph schema and
//! emits it as PlantUML or Graphviz DOT.

mod converter;
mod dot;
mod emitter;
mod schema;

pub(crate) use converter::concrete_members;
pub use converter::{
    convert, relationship_type_name, Conversion, ConversionWarning, GraphConverter, CONTAINS,
};
pub use dot::DotEmitter;
pub use emitter::GraphEmitter;
pub use schema::{GraphNode, GraphRelationship, PropertyGraphSchema, RelationshipKind};
