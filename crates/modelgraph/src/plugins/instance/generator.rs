//! Example instance graphs
//!
//! An [`InstanceGraph`] is a small set of sample objects and links that
//! illustrates a property-graph schema. It can be loaded from YAML/JSON or
//! generated from a schema with [`InstanceGenerator`].

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, span, trace, Level};

use crate::core::naming::snake_case;
use crate::core::{DiagramSource, ModelError, RelationshipKey, Result};
use crate::model::{AttributeType, PrimitiveType};
use crate::plugins::graph::{GraphNode, PropertyGraphSchema};

/// Labels that get two instances so relationships between peers show up
const PEER_LABELS: &[&str] = &["person", "user", "customer", "patient", "doctor"];

const SAMPLE_NAMES: &[&str] = &["John", "Alice", "Bob", "Carol", "David"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub properties: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl InstanceEdge {
    pub fn key(&self) -> RelationshipKey {
        RelationshipKey::new(&self.from, &self.to, &self.type_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceGraph {
    #[serde(default = "default_graph_name")]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<InstanceNode>,
    #[serde(default)]
    pub edges: Vec<InstanceEdge>,
}

fn default_graph_name() -> String {
    "Example Graph".to_string()
}

impl InstanceGraph {
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        serde_yaml::from_str(input)
            .map_err(|e| ModelError::document(format!("invalid instance YAML: {}", e)))
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| ModelError::document(format!("invalid instance JSON: {}", e)))
    }

    pub fn node(&self, id: &str) -> Option<&InstanceNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn instances_of<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a InstanceNode> + 'a {
        self.nodes.iter().filter(move |n| n.label == label)
    }
}

impl DiagramSource for InstanceGraph {
    fn node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    fn relationship_keys(&self) -> Vec<RelationshipKey> {
        self.edges.iter().map(InstanceEdge::key).collect()
    }
}

/// Number of sample instances generated for a node label
pub fn instance_count(label: &str) -> usize {
    if PEER_LABELS.contains(&label.to_lowercase().as_str()) {
        2
    } else {
        1
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Sample value for the `index`-th instance (zero based)
pub fn sample_value(
    attribute: &str,
    ty: &AttributeType,
    index: usize,
    schema: &PropertyGraphSchema,
) -> String {
    let ordinal = index + 1;
    match ty {
        AttributeType::Enum(name) => schema
            .enumerations
            .iter()
            .find(|e| &e.name == name)
            .filter(|e| !e.values.is_empty())
            .map(|e| e.values[index % e.values.len()].clone())
            .unwrap_or_else(|| "VALUE".to_string()),
        AttributeType::Primitive(PrimitiveType::Integer) => (ordinal * 100).to_string(),
        AttributeType::Primitive(PrimitiveType::Float) => format!("{}.99", ordinal * 100 - 1),
        AttributeType::Primitive(PrimitiveType::Date) => format!("2026-0{}-15", ordinal),
        AttributeType::Primitive(PrimitiveType::DateTime) => {
            format!("2026-0{}-15T10:00:00", ordinal)
        }
        AttributeType::Primitive(PrimitiveType::Time) => format!("1{}:30", index),
        AttributeType::Primitive(PrimitiveType::Boolean) => (index % 2 == 0).to_string(),
        AttributeType::Primitive(PrimitiveType::String) => {
            let lower = attribute.to_lowercase();
            if lower.contains("name") {
                SAMPLE_NAMES[index % SAMPLE_NAMES.len()].to_string()
            } else if lower.contains("email") {
                format!("user{}@example.com", ordinal)
            } else {
                format!("{}{}", capitalize(attribute), ordinal)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceGenerator;

impl InstanceGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, schema: &PropertyGraphSchema) -> InstanceGraph {
        let generate_span = span!(
            Level::INFO,
            "generate_instances",
            nodes = schema.node_count(),
            relationships = schema.relationship_count()
        );
        let _enter = generate_span.enter();

        let mut graph = InstanceGraph {
            name: schema.name.clone(),
            ..InstanceGraph::default()
        };
        let mut ids_by_label: IndexMap<&str, Vec<String>> = IndexMap::new();

        for node in schema.nodes.values() {
            let ids = ids_by_label.entry(node.name.as_str()).or_default();
            for index in 0..instance_count(&node.name) {
                let instance = self.instance(node, index, schema);
                ids.push(instance.id.clone());
                graph.nodes.push(instance);
            }
        }

        let mut seen: IndexSet<InstanceEdge> = IndexSet::new();
        for relationship in &schema.relationships {
            let (Some(sources), Some(targets)) = (
                ids_by_label.get(relationship.from_node.as_str()),
                ids_by_label.get(relationship.to_node.as_str()),
            ) else {
                continue;
            };

            let mut pairs = Vec::new();
            if relationship.from_node == relationship.to_node {
                let second = sources.get(1).unwrap_or(&sources[0]);
                pairs.push((&sources[0], second));
            } else {
                pairs.push((&sources[0], &targets[0]));
                if sources.len() > 1 && targets.len() > 1 {
                    pairs.push((&sources[1], &targets[1]));
                }
            }

            for (from, to) in pairs {
                let edge = InstanceEdge {
                    from: from.clone(),
                    to: to.clone(),
                    type_name: relationship.type_name.clone(),
                };
                if seen.insert(edge.clone()) {
                    trace!(edge = %edge.key(), "Example edge");
                    graph.edges.push(edge);
                }
            }
        }

        debug!(
            instances = graph.nodes.len(),
            edges = graph.edges.len(),
            "Example instances generated"
        );
        graph
    }

    fn instance(&self, node: &GraphNode, index: usize, schema: &PropertyGraphSchema) -> InstanceNode {
        let properties = node
            .attributes
            .iter()
            .map(|(name, ty)| (name.clone(), sample_value(name, ty, index, schema)))
            .collect();
        InstanceNode {
            id: format!("{}{}", snake_case(&node.name), index + 1),
            label: node.name.clone(),
            properties,
        }
    }
}

/// Generate with the default generator
pub fn generate_instances(schema: &PropertyGraphSchema) -> InstanceGraph {
    InstanceGenerator::new().generate(schema)
}
