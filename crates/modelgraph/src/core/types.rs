//! Core type definitions shared by emitters, extractors and the resolver
//!
//! This module contains the relationship identity key, the direction glyphs
//! and the map that carries resolved glyphs from the resolver back into the
//! emitters.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Geometric direction of a relationship's far endpoint
///
/// Screen coordinates are used throughout: `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionSymbol {
    /// Far endpoint lies to the right: `►`
    Right,
    /// Far endpoint lies below: `▼`
    Down,
    /// Far endpoint lies to the left: `◄`
    Left,
    /// Far endpoint lies above: `▲`
    Up,
    /// Relationship loops back onto its own node: `↻`
    SelfLoop,
}

impl DirectionSymbol {
    /// The glyph embedded into relationship labels
    pub fn glyph(&self) -> char {
        match self {
            DirectionSymbol::Right => '►',
            DirectionSymbol::Down => '▼',
            DirectionSymbol::Left => '◄',
            DirectionSymbol::Up => '▲',
            DirectionSymbol::SelfLoop => '↻',
        }
    }

    /// All symbols in declaration order
    pub fn all() -> [DirectionSymbol; 5] {
        [
            DirectionSymbol::Right,
            DirectionSymbol::Down,
            DirectionSymbol::Left,
            DirectionSymbol::Up,
            DirectionSymbol::SelfLoop,
        ]
    }
}

impl fmt::Display for DirectionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionSymbol::Right => write!(f, "right"),
            DirectionSymbol::Down => write!(f, "down"),
            DirectionSymbol::Left => write!(f, "left"),
            DirectionSymbol::Up => write!(f, "up"),
            DirectionSymbol::SelfLoop => write!(f, "self"),
        }
    }
}

/// Identity of a relationship across both render passes
///
/// Emitters and the direction resolver must build the same key for the same
/// relationship, otherwise pass-two lookups miss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RelationshipKey {
    pub from: String,
    pub to: String,
    pub label: String,
}

impl RelationshipKey {
    pub fn new(from: impl Into<String>, to: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: label.into(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for RelationshipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.from, self.label, self.to)
    }
}

/// Resolved glyphs keyed by relationship identity, in resolution order
pub type DirectionMap = IndexMap<RelationshipKey, DirectionSymbol>;
