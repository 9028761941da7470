//! Direction resolution from layout geometry
//!
//! For a relationship `from -> to` with anchors `p(from)` and `p(to)`:
//!
//! - `from == to` resolves to [`DirectionSymbol::SelfLoop`]
//! - otherwise `(dx, dy) = p(to) - p(from)` in screen coordinates; the
//!   horizontal axis wins ties (`|dx| >= |dy|`), giving `►` for `dx > 0` and
//!   `◄` otherwise; the vertical axis gives `▼` for `dy > 0` and `▲` otherwise
//! - coincident anchors of distinct nodes resolve to `►`
//!
//! An endpoint without a (finite) anchor leaves the relationship unresolved.
//! Nothing is ever defaulted.

use tracing::{debug, span, trace, warn, Level};

use crate::core::{
    DirectionMap, DirectionSymbol, LayoutPoint, ModelError, PositionMap, RelationshipKey, Result,
};

/// Classify the direction from one anchor to another
pub fn classify(from: LayoutPoint, to: LayoutPoint) -> DirectionSymbol {
    let (dx, dy) = from.displacement_to(&to);
    if dx.abs() >= dy.abs() {
        if dx > 0.0 || (dx == 0.0 && dy == 0.0) {
            DirectionSymbol::Right
        } else {
            DirectionSymbol::Left
        }
    } else if dy > 0.0 {
        DirectionSymbol::Down
    } else {
        DirectionSymbol::Up
    }
}

/// Resolved glyphs plus every relationship that could not be resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionResolution {
    pub directions: DirectionMap,
    pub unresolved: Vec<RelationshipKey>,
}

impl DirectionResolution {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// The direction map, or [`ModelError::UnresolvedDirections`] if any key is missing
    pub fn into_complete(self) -> Result<DirectionMap> {
        if self.unresolved.is_empty() {
            Ok(self.directions)
        } else {
            Err(ModelError::UnresolvedDirections {
                unresolved: self.unresolved,
            })
        }
    }
}

fn anchor<'a>(positions: &'a PositionMap, node: &str) -> Option<&'a LayoutPoint> {
    positions
        .get(node)
        .filter(|p| p.x.is_finite() && p.y.is_finite())
}

/// Resolve every relationship against the positions of one render pass
///
/// `positions` must be keyed by node name, as returned by
/// [`positions_by_name`](crate::core::positions_by_name).
pub fn resolve_directions(
    positions: &PositionMap,
    relationships: &[RelationshipKey],
) -> DirectionResolution {
    let resolve_span = span!(
        Level::INFO,
        "resolve_directions",
        positions = positions.len(),
        relationships = relationships.len()
    );
    let _enter = resolve_span.enter();

    let mut resolution = DirectionResolution::default();

    for key in relationships {
        // Self relationships need no geometry
        let symbol = if key.is_self_loop() {
            DirectionSymbol::SelfLoop
        } else {
            let (Some(from), Some(to)) =
                (anchor(positions, &key.from), anchor(positions, &key.to))
            else {
                warn!(relationship = %key, "Relationship endpoint has no layout position");
                resolution.unresolved.push(key.clone());
                continue;
            };
            classify(*from, *to)
        };
        trace!(relationship = %key, direction = %symbol, "Resolved direction");
        resolution.directions.insert(key.clone(), symbol);
    }

    debug!(
        resolved = resolution.directions.len(),
        unresolved = resolution.unresolved.len(),
        "Direction resolution completed"
    );
    resolution
}

/// Stateless resolver handle for callers that prefer a value over a function
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionResolver;

impl DirectionResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(
        &self,
        positions: &PositionMap,
        relationships: &[RelationshipKey],
    ) -> DirectionResolution {
        resolve_directions(positions, relationships)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(points: &[(&str, f64, f64)]) -> PositionMap {
        points
            .iter()
            .map(|(name, x, y)| (name.to_string(), LayoutPoint::new(*x, *y)))
            .collect()
    }

    #[test]
    fn test_four_axes() {
        let origin = LayoutPoint::new(100.0, 100.0);
        assert_eq!(classify(origin, LayoutPoint::new(200.0, 110.0)), DirectionSymbol::Right);
        assert_eq!(classify(origin, LayoutPoint::new(0.0, 90.0)), DirectionSymbol::Left);
        assert_eq!(classify(origin, LayoutPoint::new(110.0, 300.0)), DirectionSymbol::Down);
        assert_eq!(classify(origin, LayoutPoint::new(90.0, -50.0)), DirectionSymbol::Up);
    }

    #[test]
    fn test_ties_go_horizontal() {
        let origin = LayoutPoint::new(0.0, 0.0);
        assert_eq!(classify(origin, LayoutPoint::new(10.0, 10.0)), DirectionSymbol::Right);
        assert_eq!(classify(origin, LayoutPoint::new(-10.0, -10.0)), DirectionSymbol::Left);
        assert_eq!(classify(origin, origin), DirectionSymbol::Right);
    }

    #[test]
    fn test_self_loop() {
        let pos = positions(&[("A", 0.0, 0.0)]);
        let key = RelationshipKey::new("A", "A", "HAS_FRIEND");
        let resolution = resolve_directions(&pos, &[key.clone()]);
        assert_eq!(resolution.directions[&key], DirectionSymbol::SelfLoop);
    }

    #[test]
    fn test_self_loop_without_position() {
        let key = RelationshipKey::new("A", "A", "HAS_FRIEND");
        let resolution = resolve_directions(&PositionMap::new(), std::slice::from_ref(&key));
        assert!(resolution.is_complete());
        assert_eq!(resolution.directions.get(&key), Some(&DirectionSymbol::SelfLoop));
    }

    #[test]
    fn test_missing_endpoint_is_unresolved() {
        let pos = positions(&[("A", 0.0, 0.0)]);
        let good = RelationshipKey::new("A", "A", "HAS_A");
        let bad = RelationshipKey::new("A", "Ghost", "HAS_GHOST");
        let resolution = resolve_directions(&pos, &[good.clone(), bad.clone()]);
        assert!(!resolution.is_complete());
        assert_eq!(resolution.unresolved, vec![bad]);
        assert!(!resolution.directions.contains_key(&RelationshipKey::new("A", "Ghost", "HAS_GHOST")));
        assert!(resolution.directions.contains_key(&good));

        match resolution.into_complete().unwrap_err() {
            ModelError::UnresolvedDirections { unresolved } => assert_eq!(unresolved.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_anchor_is_unresolved() {
        let pos = positions(&[("A", 0.0, 0.0), ("B", f64::NAN, 1.0)]);
        let resolution = resolve_directions(&pos, &[RelationshipKey::new("A", "B", "HAS_B")]);
        assert_eq!(resolution.unresolved.len(), 1);
    }

    #[test]
    fn test_distinct_labels_resolve_independently() {
        let pos = positions(&[("A", 0.0, 0.0), ("B", 0.0, 50.0)]);
        let keys = [
            RelationshipKey::new("A", "B", "HAS_B"),
            RelationshipKey::new("B", "A", "HAS_A"),
        ];
        let resolution = DirectionResolver::new().resolve(&pos, &keys);
        assert_eq!(resolution.directions[&keys[0]], DirectionSymbol::Down);
        assert_eq!(resolution.directions[&keys[1]], DirectionSymbol::Up);
    }
}
