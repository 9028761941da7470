//! PlantUML class-diagram emitter for the domain model

use tracing::{debug, span, Level};

use crate::core::naming::diagram_alias;
use crate::core::{DiagramSource, DirectionMap, Emitter, EmitterConfig, RelationshipKey, Result};
use crate::model::{AssociationDef, AssociationKind, ClassEntity, DomainModel};
use crate::plugins::plantuml::{label_with_glyph, quoted, PlantUmlDocument};

/// Identity of an association in the class diagram
pub fn association_key(association: &AssociationDef) -> RelationshipKey {
    RelationshipKey::new(
        &association.from_class,
        &association.to_class,
        association.label(),
    )
}

impl DiagramSource for DomainModel {
    fn node_names(&self) -> Vec<String> {
        self.classes().map(|c| c.name.clone()).collect()
    }

    fn relationship_keys(&self) -> Vec<RelationshipKey> {
        self.associations().iter().map(association_key).collect()
    }
}

fn arrow(kind: AssociationKind) -> &'static str {
    match kind {
        AssociationKind::Composition => "*--",
        AssociationKind::Aggregation => "o--",
        AssociationKind::Association => "--",
    }
}

#[derive(Debug, Clone, Default)]
pub struct UmlEmitter {
    config: EmitterConfig,
}

impl UmlEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        Self { config }
    }

    fn class_header(&self, class: &ClassEntity) -> String {
        let alias = diagram_alias(&class.name);
        if class.is_abstract {
            format!(
                "abstract class {} as {} {}",
                quoted(&class.name),
                alias,
                self.config.palette.abstract_background
            )
        } else {
            format!("class {} as {}", quoted(&class.name), alias)
        }
    }
}

impl Emitter<DomainModel> for UmlEmitter {
    fn emit(&self, model: &DomainModel, directions: &DirectionMap) -> Result<String> {
        let emit_span = span!(
            Level::INFO,
            "emit_uml",
            classes = model.class_count(),
            associations = model.associations().len(),
            resolved = directions.len()
        );
        let _enter = emit_span.enter();

        let config = &self.config;
        let mut doc = PlantUmlDocument::new(model.name());
        doc.skin(config, "class", &config.palette.class_background);
        doc.blank();

        let framed = config.package_frame && !model.name().trim().is_empty();
        if framed {
            doc.open(format!("package {}", quoted(model.name())));
        }

        for enumeration in model.enumerations() {
            doc.open(format!(
                "enum {} as {} {}",
                quoted(&enumeration.name),
                diagram_alias(&enumeration.name),
                config.palette.enumeration_background
            ));
            for value in &enumeration.values {
                doc.line(value);
            }
            doc.close();
        }

        for class in model.classes() {
            let header = self.class_header(class);
            if class.attributes.is_empty() {
                doc.line(header);
                continue;
            }
            doc.open(header);
            for attribute in &class.attributes {
                doc.line(format!(
                    "{} {} : {}",
                    attribute.visibility.symbol(),
                    attribute.name,
                    attribute.ty
                ));
            }
            doc.close();
        }

        if framed {
            doc.close();
        }
        doc.blank();

        for generalization in model.generalizations() {
            doc.line(format!(
                "{} <|-- {}",
                diagram_alias(&generalization.parent),
                diagram_alias(&generalization.child)
            ));
        }

        for association in model.associations() {
            let key = association_key(association);
            let label = label_with_glyph(association.label(), &key, directions, config);
            doc.line(format!(
                "{} \"{}\" {} \"{}\" {} : {}",
                diagram_alias(&association.from_class),
                association.from_multiplicity,
                arrow(association.kind),
                association.to_multiplicity,
                diagram_alias(&association.to_class),
                label
            ));
        }

        let text = doc.finish();
        debug!(output_len = text.len(), "UML diagram emitted");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "uml-plantuml"
    }

    fn format(&self) -> &'static str {
        "plantuml"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DirectionSymbol;
    use crate::model::{AttributeDef, EnumerationDef, Multiplicity, PrimitiveType, Visibility};

    fn model() -> DomainModel {
        DomainModel::builder("Shop")
            .enumeration(EnumerationDef::new("Status", ["OPEN", "PAID"]))
            .class(
                ClassEntity::new("Order")
                    .with_attribute(AttributeDef::enumerated("status", "Status"))
                    .with_attribute(
                        AttributeDef::new("total", PrimitiveType::Float)
                            .with_visibility(Visibility::Public),
                    ),
            )
            .class(ClassEntity::abstract_class("Product"))
            .class(ClassEntity::new("Book"))
            .generalization("Product", "Book")
            .association(
                AssociationDef::new("Order", "order", "Product", "products")
                    .with_multiplicities(Multiplicity::many(), Multiplicity::at_least(1))
                    .aggregation(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_class_diagram_lines() {
        let text = UmlEmitter::new().emit(&model(), &DirectionMap::new()).unwrap();
        assert!(text.contains("  enum \"Status\" as Status #"));
        assert!(text.contains("    OPEN\n"));
        assert!(text.contains("  class \"Order\" as Order {"));
        assert!(text.contains("    - status : Status"));
        assert!(text.contains("    + total : Float"));
        assert!(text.contains("  abstract class \"Product\" as Product #"));
        assert!(text.contains("Product <|-- Book\n"));
        assert!(text.contains("Order \"*\" o-- \"1..*\" Product : products\n"));
    }

    #[test]
    fn test_keys_follow_labels() {
        let model = model();
        assert_eq!(model.node_names(), vec!["Order", "Product", "Book"]);
        assert_eq!(
            model.relationship_keys(),
            vec![RelationshipKey::new("Order", "Product", "products")]
        );
    }

    #[test]
    fn test_glyph_on_association() {
        let mut directions = DirectionMap::new();
        directions.insert(
            RelationshipKey::new("Order", "Product", "products"),
            DirectionSymbol::Right,
        );
        let text = UmlEmitter::new().emit(&model(), &directions).unwrap();
        assert!(text.contains(": products ►\n"));
    }

    #[test]
    fn test_zero_to_many_end_prints_star() {
        let model = DomainModel::builder("Ward")
            .class(ClassEntity::new("Ward"))
            .class(ClassEntity::new("Patient"))
            .association(
                AssociationDef::new("Ward", "ward", "Patient", "patients")
                    .with_multiplicities(Multiplicity::one(), "0..*".parse().unwrap())
                    .composition(),
            )
            .build()
            .unwrap();
        let text = UmlEmitter::new().emit(&model, &DirectionMap::new()).unwrap();
        assert!(text.contains("Ward \"1\" *-- \"*\" Patient : patients\n"));
    }

    #[test]
    fn test_composition_arrow() {
        assert_eq!(arrow(AssociationKind::Composition), "*--");
        assert_eq!(arrow(AssociationKind::Association), "--");
    }
}
