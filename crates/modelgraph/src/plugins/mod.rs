//! Output families and the two-pass pipeline
//!
//! Each family turns a validated domain model (or something derived from it)
//! into text: a property-graph schema and its diagrams, a UML class diagram,
//! relational DDL and mapping tables, XMI, and example instance graphs.

pub mod graph;
pub mod instance;
pub mod layout;
pub mod orchestrator;
pub mod plantuml;
pub mod relational;
pub mod uml;
pub mod xmi;

pub use graph::*;
pub use instance::*;
pub use layout::*;
pub use orchestrator::*;
pub use relational::*;
pub use uml::*;
pub use xmi::*;
