//! Domain model: classes, attributes, enumerations, associations and
//! generalizations, plus the document layer that loads them

mod association;
mod class;
mod document;
mod domain;
mod forest;
pub mod notation;

pub use association::*;
pub use class::*;
pub use document::*;
pub use domain::*;
pub use forest::*;
