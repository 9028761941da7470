//! Core emitter traits for textual diagram descriptions
//!
//! An emitter serializes a diagram source (a property-graph schema, a domain
//! model, an instance graph) into text that an external layout engine can
//! render. Emission is purely textual and must be byte-stable: the same
//! source and the same direction map always produce the same text.

use super::error::Result;
use super::types::{DirectionMap, RelationshipKey};

/// Anything that can be laid out and have its relationship directions resolved
///
/// The pipeline needs to know which nodes must appear in the rendered
/// artifact and which relationships need a direction glyph.
pub trait DiagramSource {
    /// Names of every node expected in the rendered layout, in emission order
    fn node_names(&self) -> Vec<String>;

    /// Identity keys of every relationship, in emission order
    fn relationship_keys(&self) -> Vec<RelationshipKey>;
}

/// Core trait for diagram emitters
///
/// # Example
/// ```
/// use modelgraph::core::{DirectionMap, Emitter};
/// use modelgraph::plugins::graph::{GraphEmitter, PropertyGraphSchema};
///
/// let schema = PropertyGraphSchema::default();
/// let text = GraphEmitter::new().emit(&schema, &DirectionMap::new()).unwrap();
/// assert!(text.starts_with("@startuml"));
/// ```
pub trait Emitter<S: DiagramSource + ?Sized>: Send + Sync {
    /// Serialize the source, embedding glyphs for every key in `directions`
    fn emit(&self, source: &S, directions: &DirectionMap) -> Result<String>;

    /// Get the name of this emitter
    fn name(&self) -> &'static str;

    /// Get the diagram language produced
    fn format(&self) -> &'static str;
}
