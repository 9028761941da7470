//! Property-graph schema derived from a domain model
//!
//! The schema has no inheritance: every node is a concrete class carrying
//! its full attribute set, and every relationship names two concrete nodes.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::{DiagramSource, DirectionMap, DirectionSymbol, RelationshipKey};
use crate::model::{AttributeType, EnumerationDef};

/// A node label of the property graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub name: String,
    /// Own attributes first, then inherited ones from nearest ancestor up
    pub attributes: IndexMap<String, AttributeType>,
}

impl GraphNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

/// Naming family of a relationship type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelationshipKind {
    /// Composition, always typed `CONTAINS`
    Contains,
    /// Any other association, typed `HAS_<ROLE>`
    Has,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::Contains => write!(f, "CONTAINS"),
            RelationshipKind::Has => write!(f, "HAS"),
        }
    }
}

/// A directed relationship type between two node labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphRelationship {
    pub from_node: String,
    pub to_node: String,
    pub type_name: String,
    pub kind: RelationshipKind,
    /// `None` until resolved from a rendered layout
    pub direction: Option<DirectionSymbol>,
}

impl GraphRelationship {
    pub fn new(
        from_node: impl Into<String>,
        to_node: impl Into<String>,
        type_name: impl Into<String>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            to_node: to_node.into(),
            type_name: type_name.into(),
            kind,
            direction: None,
        }
    }

    /// Identity used by the emitters and the direction resolver
    pub fn key(&self) -> RelationshipKey {
        RelationshipKey::new(&self.from_node, &self.to_node, &self.type_name)
    }
}

/// Flattened property-graph schema
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyGraphSchema {
    pub name: String,
    pub nodes: IndexMap<String, GraphNode>,
    pub relationships: Vec<GraphRelationship>,
    pub enumerations: Vec<EnumerationDef>,
}

impl PropertyGraphSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.get(name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Relationships leaving `node`
    pub fn relationships_from<'a>(
        &'a self,
        node: &'a str,
    ) -> impl Iterator<Item = &'a GraphRelationship> + 'a {
        self.relationships.iter().filter(move |r| r.from_node == node)
    }

    pub fn find_relationship(&self, from: &str, to: &str, type_name: &str) -> Option<&GraphRelationship> {
        self.relationships
            .iter()
            .find(|r| r.from_node == from && r.to_node == to && r.type_name == type_name)
    }

    /// Record resolved directions on the relationships they belong to
    pub fn apply_directions(&mut self, directions: &DirectionMap) {
        for relationship in &mut self.relationships {
            if let Some(symbol) = directions.get(&relationship.key()) {
                relationship.direction = Some(*symbol);
            }
        }
    }

    /// Relationships that still have no direction
    pub fn unresolved(&self) -> Vec<RelationshipKey> {
        self.relationships
            .iter()
            .filter(|r| r.direction.is_none())
            .map(GraphRelationship::key)
            .collect()
    }
}

impl DiagramSource for PropertyGraphSchema {
    fn node_names(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    fn relationship_keys(&self) -> Vec<RelationshipKey> {
        self.relationships.iter().map(GraphRelationship::key).collect()
    }
}
