//! Layout geometry extracted from rendered artifacts
//!
//! A [`GeometryExtractor`] reads the vector output of one render pass and
//! returns an anchor point per node. Extractors are swappable so the layout
//! engine can change without touching direction resolution.
//!
//! Every extractor in this crate uses the centre of the node's bounding box
//! as its anchor.

use indexmap::IndexMap;
use serde::Serialize;

use super::error::{ModelError, Result};
use super::naming::diagram_alias;

/// Anchor point of one node in screen coordinates (`y` grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Centre of an axis-aligned box given its top-left corner and size
    pub fn center_of(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x + width / 2.0, y + height / 2.0)
    }

    /// Displacement vector from `self` to `other`
    pub fn displacement_to(&self, other: &LayoutPoint) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }
}

/// Node name to anchor point, in document order
pub type PositionMap = IndexMap<String, LayoutPoint>;

/// Core trait for geometry extractors
pub trait GeometryExtractor: Send + Sync {
    /// Parse a rendered artifact into per-element anchor points
    ///
    /// Keys are the element names found in the artifact, which are the
    /// diagram aliases the emitters wrote.
    fn extract_positions(&self, artifact: &str) -> Result<PositionMap>;

    /// Get the name of this extractor
    fn name(&self) -> &'static str;

    /// Get the artifact format this extractor understands
    fn format(&self) -> &'static str;
}

/// Re-key alias positions by node name
///
/// Returns the positions found and the names that have no element in the
/// artifact.
pub fn positions_by_name(
    extracted: &PositionMap,
    node_names: &[String],
) -> (PositionMap, Vec<String>) {
    let mut positions = PositionMap::new();
    let mut missing = Vec::new();

    for name in node_names {
        let point = extracted
            .get(name.as_str())
            .or_else(|| extracted.get(diagram_alias(name).as_str()));
        match point {
            Some(point) => {
                positions.insert(name.clone(), *point);
            }
            None => missing.push(name.clone()),
        }
    }

    (positions, missing)
}

/// Like [`positions_by_name`], but a missing node is a [`ModelError::LayoutParse`]
pub fn require_positions(extracted: &PositionMap, node_names: &[String]) -> Result<PositionMap> {
    let (positions, missing) = positions_by_name(extracted, node_names);
    if missing.is_empty() {
        Ok(positions)
    } else {
        Err(ModelError::missing_nodes(missing))
    }
}
