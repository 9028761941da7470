//! Layout geometry extractors and direction resolution
//!
//! Extractors turn a rendered artifact into anchor points; the resolver turns
//! anchor points into one direction glyph per relationship.

mod direction;
mod graphviz_plain;
mod plantuml_svg;

pub use direction::{classify, resolve_directions, DirectionResolution, DirectionResolver};
pub use graphviz_plain::GraphvizPlainExtractor;
pub use plantuml_svg::PlantUmlSvgExtractor;
