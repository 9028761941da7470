//! Modelgraph - Turn UML-style domain models into property graphs and diagrams
//!
//! A library for validating domain models (classes, enumerations,
//! associations, generalizations), flattening them into property-graph
//! schemas, and emitting PlantUML / DOT diagrams whose relationship labels
//! carry a glyph pointing at the target node in the rendered layout.
//!
//! # Quick Start
//!
//! ```rust
//! use modelgraph::convert_document;
//!
//! let yaml = r#"
//! name: Shop
//! classes:
//!   ShoppingCart:
//!   Product:
//!     attributes: ["+ price : Float"]
//! associations:
//!   - from: ShoppingCart
//!     to: Product
//!     fromRole: cart
//!     toRole: products
//!     toMultiplicity: "*"
//! "#;
//!
//! let conversion = convert_document(yaml).unwrap();
//! assert_eq!(conversion.schema.relationships[0].type_name, "HAS_PRODUCT");
//! ```
//!
//! # Two-pass rendering
//!
//! Glyphs need the layout of a first render. [`plugins::Pipeline`] runs both
//! passes against any [`LayoutRenderer`]; a closure works for tests:
//!
//! ```rust
//! use modelgraph::prelude::*;
//!
//! let model = modelgraph::load_model("classes:\n  A:\n  B:\nassociations:\n  - {from: A, to: B, fromRole: a, toRole: b}\n").unwrap();
//! let schema = convert(&model).schema;
//!
//! let svg = |_: &str| -> modelgraph::Result<String> {
//!     Ok(r#"<svg><g id="elem_A"><rect x="0" y="0" width="10" height="10"/></g><g id="elem_B"><rect x="0" y="100" width="10" height="10"/></g></svg>"#.to_string())
//! };
//! let output = Pipeline::new(svg, PlantUmlSvgExtractor::new())
//!     .run(&GraphEmitter::new(), &schema)
//!     .unwrap();
//! assert!(output.final_text.contains("A -- B : HAS_B ▼"));
//! ```

pub mod core;
pub mod model;
pub mod plugins;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        DiagramSource, DirectionMap, DirectionSymbol, Emitter, EmitterConfig, GeometryExtractor,
        LayoutPoint, LayoutRenderer, ModelError, PositionMap, RelationshipKey, Result,
        ValidationError,
    };
    pub use crate::model::{
        AssociationDef, AssociationKind, AttributeDef, AttributeType, ClassEntity, DomainModel,
        EnumerationDef, ModelDocument, Multiplicity, PrimitiveType, Visibility,
    };
    pub use crate::plugins::graph::{
        convert, DotEmitter, GraphEmitter, GraphNode, GraphRelationship, PropertyGraphSchema,
    };
    pub use crate::plugins::layout::{
        resolve_directions, GraphvizPlainExtractor, PlantUmlSvgExtractor,
    };
    pub use crate::plugins::orchestrator::{LayoutEngine, Pipeline, PipelineOptions};
    pub use crate::plugins::uml::UmlEmitter;
}

/// Load and validate a YAML (or JSON) model document
///
/// # Example
/// ```rust
/// let model = modelgraph::load_model("name: Clinic\nclasses:\n  Patient:\n").unwrap();
/// assert_eq!(model.name(), "Clinic");
/// assert!(modelgraph::load_model("classes:\n  A:\ngeneralizations:\n  - {parent: A, child: Z}\n").is_err());
/// ```
pub fn load_model(input: &str) -> Result<model::DomainModel> {
    model::DomainModel::from_yaml_str(input)
}

/// Load a model document and convert it to a property-graph schema
pub fn convert_document(input: &str) -> Result<plugins::graph::Conversion> {
    let model = load_model(input)?;
    Ok(plugins::graph::convert(&model))
}

/// Pass-one PlantUML graph diagram for a model document, without glyphs
///
/// # Example
/// ```rust
/// let text = modelgraph::graph_diagram("classes:\n  Order:\n").unwrap();
/// assert!(text.contains("class \"Order\" as Order"));
/// ```
pub fn graph_diagram(input: &str) -> Result<String> {
    use crate::core::Emitter as _;

    let conversion = convert_document(input)?;
    plugins::graph::GraphEmitter::new().emit(&conversion.schema, &DirectionMap::new())
}

/// Pass-one PlantUML class diagram for a model document
pub fn uml_diagram(input: &str) -> Result<String> {
    use crate::core::Emitter as _;

    let model = load_model(input)?;
    plugins::uml::UmlEmitter::new().emit(&model, &DirectionMap::new())
}

/// SQL DDL for a model document
///
/// # Example
/// ```rust
/// let sql = modelgraph::sql_ddl("classes:\n  Invoice:\n    attributes: [\"total : Float\"]\n").unwrap();
/// assert!(sql.contains("CREATE TABLE invoice ("));
/// assert!(sql.contains("total DOUBLE PRECISION"));
/// ```
pub fn sql_ddl(input: &str) -> Result<String> {
    let model = load_model(input)?;
    Ok(plugins::relational::ddl(&model))
}
