//! Domain model to property-graph schema conversion
//!
//! The conversion runs in explicit passes over the validated model:
//!
//! 1. every concrete class becomes a node; attributes are merged from the
//!    class itself and then from each ancestor, nearest first, skipping
//!    names already present
//! 2. every association endpoint is expanded to the concrete members of
//!    its subtree (the class itself when concrete, then its concrete
//!    descendants in preorder), so abstract endpoints fan out and
//!    relationships on an ancestor are copied onto every descendant
//! 3. each (from, to) pair of the cross product gets a typed relationship,
//!    and identical (from, to, type) triples are kept once, first wins
//!
//! An endpoint whose subtree has no concrete member drops the association
//! with a [`ConversionWarning`].

use std::fmt;

use indexmap::IndexSet;
use tracing::{debug, info, span, trace, warn, Level};

use crate::core::naming::{singularize, upper_snake_case};
use crate::model::{AssociationDef, AssociationKind, DomainModel};

use super::schema::{GraphNode, GraphRelationship, PropertyGraphSchema, RelationshipKind};

/// Relationship type used for every composition
pub const CONTAINS: &str = "CONTAINS";

/// Non-fatal finding reported alongside the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    /// An association endpoint had no concrete class to attach to
    DroppedAssociation {
        from_class: String,
        to_class: String,
        to_role: String,
        endpoint: String,
    },
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionWarning::DroppedAssociation {
                from_class,
                to_class,
                to_role,
                endpoint,
            } => write!(
                f,
                "association {} -> {} ({}) dropped: '{}' has no concrete descendants",
                from_class, to_class, to_role, endpoint
            ),
        }
    }
}

/// Result of a conversion: the schema plus every warning raised
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub schema: PropertyGraphSchema,
    pub warnings: Vec<ConversionWarning>,
}

/// Relationship type name for an association
///
/// Compositions are always `CONTAINS`; anything else is `HAS_` followed by
/// the singularized target role in upper snake case.
pub fn relationship_type_name(association: &AssociationDef) -> String {
    if association.kind == AssociationKind::Composition {
        return CONTAINS.to_string();
    }
    let role = upper_snake_case(singularize(&association.to_role));
    if role.is_empty() {
        format!("HAS_{}", upper_snake_case(&association.to_class))
    } else {
        format!("HAS_{}", role)
    }
}

/// Converter from domain models to property-graph schemas
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphConverter;

impl GraphConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert a validated model; pure and deterministic
    pub fn convert(&self, model: &DomainModel) -> Conversion {
        let convert_span = span!(
            Level::INFO,
            "convert_model",
            model = model.name(),
            classes = model.class_count(),
            associations = model.associations().len()
        );
        let _enter = convert_span.enter();

        let mut schema = PropertyGraphSchema::new(model.name());
        schema.enumerations = model.enumerations().cloned().collect();

        self.flatten_nodes(model, &mut schema);
        let warnings = self.fan_out_relationships(model, &mut schema);

        info!(
            nodes = schema.node_count(),
            relationships = schema.relationship_count(),
            warnings = warnings.len(),
            "Conversion completed"
        );

        Conversion { schema, warnings }
    }

    fn flatten_nodes(&self, model: &DomainModel, schema: &mut PropertyGraphSchema) {
        let flatten_span = span!(Level::DEBUG, "flatten_nodes");
        let _enter = flatten_span.enter();

        for class in model.classes().filter(|c| !c.is_abstract) {
            let mut node = GraphNode::new(&class.name);
            let lineage = std::iter::once(class.name.as_str())
                .chain(model.forest().ancestors(&class.name));

            for owner in lineage {
                let Some(owner) = model.class(owner) else {
                    continue;
                };
                for attribute in &owner.attributes {
                    if !node.attributes.contains_key(&attribute.name) {
                        node.attributes
                            .insert(attribute.name.clone(), attribute.ty.clone());
                    }
                }
            }

            trace!(node = %node.name, attributes = node.attribute_count(), "Flattened node");
            schema.nodes.insert(node.name.clone(), node);
        }

        debug!(nodes = schema.node_count(), "Nodes flattened");
    }

    fn fan_out_relationships(
        &self,
        model: &DomainModel,
        schema: &mut PropertyGraphSchema,
    ) -> Vec<ConversionWarning> {
        let fan_out_span = span!(Level::DEBUG, "fan_out_relationships");
        let _enter = fan_out_span.enter();

        let mut warnings = Vec::new();
        let mut seen: IndexSet<(String, String, String)> = IndexSet::new();
        let mut duplicates = 0usize;

        for association in model.associations() {
            let sources = concrete_members(model, &association.from_class);
            let targets = concrete_members(model, &association.to_class);

            let empty_endpoint = if sources.is_empty() {
                Some(&association.from_class)
            } else if targets.is_empty() {
                Some(&association.to_class)
            } else {
                None
            };
            if let Some(endpoint) = empty_endpoint {
                let warning = ConversionWarning::DroppedAssociation {
                    from_class: association.from_class.clone(),
                    to_class: association.to_class.clone(),
                    to_role: association.to_role.clone(),
                    endpoint: endpoint.clone(),
                };
                warn!(%warning, "Association dropped");
                warnings.push(warning);
                continue;
            }

            let type_name = relationship_type_name(association);
            let kind = match association.kind {
                AssociationKind::Composition => RelationshipKind::Contains,
                _ => RelationshipKind::Has,
            };

            for from in &sources {
                for to in &targets {
                    let triple = (from.to_string(), to.to_string(), type_name.clone());
                    if !seen.insert(triple) {
                        duplicates += 1;
                        continue;
                    }
                    schema
                        .relationships
                        .push(GraphRelationship::new(*from, *to, &type_name, kind));
                }
            }
        }

        debug!(
            relationships = schema.relationship_count(),
            duplicates, "Relationships fanned out"
        );
        warnings
    }
}

/// Concrete classes that stand in for `class` as an association endpoint
pub(crate) fn concrete_members<'a>(model: &'a DomainModel, class: &'a str) -> Vec<&'a str> {
    model
        .forest()
        .subtree(class)
        .into_iter()
        .filter(|name| !model.is_abstract(name))
        .collect()
}

/// Convert with the default converter
pub fn convert(model: &DomainModel) -> Conversion {
    GraphConverter::new().convert(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeDef, ClassEntity, PrimitiveType};

    #[test]
    fn test_type_names() {
        let assoc = AssociationDef::new("Person", "buyer", "Purchase", "purchases");
        assert_eq!(relationship_type_name(&assoc), "HAS_PURCHASE");

        let assoc = AssociationDef::new("Person", "owner", "Location", "homeLocation");
        assert_eq!(relationship_type_name(&assoc), "HAS_HOME_LOCATION");

        let assoc = AssociationDef::new("Order", "order", "Line", "lines").composition();
        assert_eq!(relationship_type_name(&assoc), CONTAINS);

        let assoc = AssociationDef::new("Order", "order", "Line", "--");
        assert_eq!(relationship_type_name(&assoc), "HAS_LINE");
    }

    #[test]
    fn test_deep_attribute_inheritance() {
        let model = DomainModel::builder("Deep")
            .class(ClassEntity::abstract_class("A").with_attribute(AttributeDef::string("a")))
            .class(ClassEntity::abstract_class("B").with_attribute(AttributeDef::string("b")))
            .class(
                ClassEntity::new("C")
                    .with_attribute(AttributeDef::string("c"))
                    .with_attribute(AttributeDef::new("a", PrimitiveType::Integer)),
            )
            .generalization("A", "B")
            .generalization("B", "C")
            .build()
            .unwrap();

        let conversion = convert(&model);
        let schema = conversion.schema;
        assert_eq!(schema.node_count(), 1);
        let c = schema.node("C").unwrap();
        let names: Vec<&str> = c.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(c.attributes["a"], PrimitiveType::Integer.into());
    }

    #[test]
    fn test_concrete_parent_shares_relationships_with_children() {
        let model = DomainModel::builder("Zoo")
            .class(ClassEntity::new("Keeper"))
            .class(ClassEntity::new("Animal"))
            .class(ClassEntity::new("Lion"))
            .generalization("Animal", "Lion")
            .association(AssociationDef::new("Keeper", "keeper", "Animal", "animals"))
            .build()
            .unwrap();

        let schema = convert(&model).schema;
        assert_eq!(schema.node_count(), 3);
        assert!(schema.find_relationship("Keeper", "Animal", "HAS_ANIMAL").is_some());
        assert!(schema.find_relationship("Keeper", "Lion", "HAS_ANIMAL").is_some());
    }

    #[test]
    fn test_both_ends_abstract_cross_product() {
        let model = DomainModel::builder("X")
            .class(ClassEntity::abstract_class("P"))
            .class(ClassEntity::new("P1"))
            .class(ClassEntity::new("P2"))
            .class(ClassEntity::abstract_class("Q"))
            .class(ClassEntity::new("Q1"))
            .class(ClassEntity::new("Q2"))
            .generalization("P", "P1")
            .generalization("P", "P2")
            .generalization("Q", "Q1")
            .generalization("Q", "Q2")
            .association(AssociationDef::new("P", "p", "Q", "qs"))
            .build()
            .unwrap();

        let schema = convert(&model).schema;
        let pairs: Vec<(&str, &str)> = schema
            .relationships
            .iter()
            .map(|r| (r.from_node.as_str(), r.to_node.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("P1", "Q1"), ("P1", "Q2"), ("P2", "Q1"), ("P2", "Q2")]
        );
    }

    #[test]
    fn test_duplicates_removed_first_wins() {
        let model = DomainModel::builder("Dup")
            .class(ClassEntity::abstract_class("Base"))
            .class(ClassEntity::new("Leaf"))
            .class(ClassEntity::new("Tag"))
            .generalization("Base", "Leaf")
            .association(AssociationDef::new("Base", "base", "Tag", "tags"))
            .association(AssociationDef::new("Leaf", "leaf", "Tag", "tag").named("again"))
            .build()
            .unwrap();

        let schema = convert(&model).schema;
        assert_eq!(schema.relationship_count(), 1);
        assert_eq!(schema.relationships[0].type_name, "HAS_TAG");
    }

    #[test]
    fn test_abstract_without_descendants_warns() {
        let model = DomainModel::builder("Empty")
            .class(ClassEntity::new("Holder"))
            .class(ClassEntity::abstract_class("Ghost"))
            .association(AssociationDef::new("Holder", "holder", "Ghost", "ghosts"))
            .build()
            .unwrap();

        let conversion = convert(&model);
        assert_eq!(conversion.schema.relationship_count(), 0);
        assert_eq!(conversion.warnings.len(), 1);
        let message = conversion.warnings[0].to_string();
        assert!(message.contains("Ghost"));
        assert!(message.contains("dropped"));
    }

    #[test]
    fn test_every_direction_starts_unresolved() {
        let model = DomainModel::builder("S")
            .class(ClassEntity::new("A"))
            .association(AssociationDef::new("A", "self", "A", "friends"))
            .build()
            .unwrap();
        let schema = convert(&model).schema;
        assert!(schema.relationships.iter().all(|r| r.direction.is_none()));
        assert_eq!(schema.relationships[0].key().label, "HAS_FRIEND");
    }
}
