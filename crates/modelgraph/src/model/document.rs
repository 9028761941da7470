//! Serde mapping of YAML / JSON model documents
//!
//! ```yaml
//! name: Online Shop
//! enumerations:
//!   OrderStatus: [OPEN, PAID, SHIPPED]
//! classes:
//!   Product:
//!     abstract: true
//!     attributes:
//!       - name: title
//!         type: String
//!       - "+ price : Float"
//! associations:
//!   - from: ShoppingCart
//!     to: Product
//!     fromRole: cart
//!     toRole: products
//!     toMultiplicity: "0..*"
//!     type: aggregation
//! generalizations:
//!   - parent: Product
//!     child: PhysicalProduct
//! ```
//!
//! Attributes accept either the long form or the shorthand notation.
//! Multiplicities default to `1`, attribute types to `String`, visibility
//! to private and association kind to a plain association.

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::core::{ModelError, Result, ValidationError};

use super::association::{AssociationDef, AssociationKind, Multiplicity};
use super::class::{AttributeDef, AttributeType, ClassEntity, EnumerationDef, Visibility};
use super::domain::DomainModel;
use super::notation::{parse_attribute, parse_multiplicity};

const DEFAULT_MODEL_NAME: &str = "DomainModel";

fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.to_string()
}

/// Root of a model document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDocument {
    #[serde(default = "default_model_name")]
    pub name: String,
    #[serde(default)]
    pub enumerations: IndexMap<String, Vec<Scalar>>,
    #[serde(default)]
    pub classes: IndexMap<String, Option<ClassDocument>>,
    #[serde(default)]
    pub associations: Vec<AssociationDocument>,
    #[serde(default)]
    pub generalizations: Vec<GeneralizationDocument>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ClassDocument {
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeDocument>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttributeDocument {
    Shorthand(String),
    Full {
        name: String,
        #[serde(default, rename = "type")]
        ty: Option<String>,
        #[serde(default)]
        visibility: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssociationDocument {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "fromRole")]
    pub from_role: Option<String>,
    #[serde(default, rename = "toRole")]
    pub to_role: Option<String>,
    #[serde(default, rename = "fromMultiplicity")]
    pub from_multiplicity: Option<Scalar>,
    #[serde(default, rename = "toMultiplicity")]
    pub to_multiplicity: Option<Scalar>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneralizationDocument {
    pub parent: String,
    pub child: String,
}

/// A YAML scalar that may have been written with or without quotes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(u64),
    Boolean(bool),
}

impl Scalar {
    pub fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Boolean(b) => b.to_string(),
        }
    }
}

impl ModelDocument {
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        serde_yaml::from_str(input)
            .map_err(|e| ModelError::document(format!("invalid YAML model: {}", e)))
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| ModelError::document(format!("invalid JSON model: {}", e)))
    }

    /// Map the document onto the domain model, failing on the first problem
    pub fn into_model(self) -> std::result::Result<DomainModel, ValidationError> {
        self.into_model_all().map_err(|mut errors| errors.remove(0))
    }

    /// Map the document onto the domain model, reporting every problem
    pub fn into_model_all(self) -> std::result::Result<DomainModel, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut builder = DomainModel::builder(self.name);

        for (name, values) in self.enumerations {
            builder = builder.enumeration(EnumerationDef::new(
                name,
                values.into_iter().map(Scalar::into_text),
            ));
        }

        for (name, class) in self.classes {
            let class = class.unwrap_or_default();
            let mut entity = ClassEntity::new(name);
            entity.is_abstract = class.is_abstract;
            for attribute in class.attributes {
                match attribute.into_def() {
                    Ok(def) => entity.attributes.push(def),
                    Err(e) => errors.push(e),
                }
            }
            builder = builder.class(entity);
        }

        for association in self.associations {
            match association.into_def() {
                Ok(def) => builder = builder.association(def),
                Err(mut problems) => errors.append(&mut problems),
            }
        }

        for generalization in self.generalizations {
            builder = builder.generalization(generalization.parent, generalization.child);
        }

        match builder.build_all() {
            Ok(model) if errors.is_empty() => {
                debug!(classes = model.class_count(), "Model document loaded");
                Ok(model)
            }
            Ok(_) => Err(errors),
            Err(mut problems) => {
                errors.append(&mut problems);
                Err(errors)
            }
        }
    }
}

impl AttributeDocument {
    fn into_def(self) -> std::result::Result<AttributeDef, ValidationError> {
        match self {
            AttributeDocument::Shorthand(text) => parse_attribute(&text),
            AttributeDocument::Full {
                name,
                ty,
                visibility,
            } => {
                let ty = ty.as_deref().map(AttributeType::parse).unwrap_or_default();
                let visibility = visibility
                    .as_deref()
                    .map(Visibility::parse_lenient)
                    .unwrap_or_default();
                Ok(AttributeDef::new(name, ty).with_visibility(visibility))
            }
        }
    }
}

impl AssociationDocument {
    fn into_def(self) -> std::result::Result<AssociationDef, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let mut multiplicity = |value: Option<Scalar>| match value {
            None => Multiplicity::one(),
            Some(value) => parse_multiplicity(&value.into_text()).unwrap_or_else(|e| {
                errors.push(e);
                Multiplicity::one()
            }),
        };
        let from_multiplicity = multiplicity(self.from_multiplicity);
        let to_multiplicity = multiplicity(self.to_multiplicity);

        let kind = match self.kind.as_deref() {
            None => AssociationKind::Association,
            Some(text) => text.parse().unwrap_or_else(|_| {
                errors.push(ValidationError::UnknownAssociationKind {
                    from: self.from.clone(),
                    to: self.to.clone(),
                    kind: text.to_string(),
                });
                AssociationKind::Association
            }),
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut def = AssociationDef::new(
            self.from,
            self.from_role.unwrap_or_default(),
            self.to,
            self.to_role.unwrap_or_default(),
        )
        .with_multiplicities(from_multiplicity, to_multiplicity)
        .with_kind(kind);
        def.name = self.name.filter(|n| !n.trim().is_empty());
        Ok(def)
    }
}

impl DomainModel {
    /// Load and validate a YAML model document
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        Ok(ModelDocument::from_yaml_str(input)?.into_model()?)
    }

    /// Load and validate a JSON model document
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(ModelDocument::from_json_str(input)?.into_model()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrimitiveType;

    const SHOP: &str = r##"
name: Online Shop
enumerations:
  OrderStatus: [OPEN, PAID]
classes:
  Customer:
    attributes:
      - name: email
      - name: age
        type: Integer
        visibility: public
  Order:
    attributes:
      - "+ status : OrderStatus"
      - "# total : Float"
  Archive:
associations:
  - from: Customer
    to: Order
    fromRole: customer
    toRole: orders
    fromMultiplicity: 1
    toMultiplicity: "0..*"
  - from: Order
    to: Archive
    fromRole: order
    toRole: archive
    type: Composition
"##;

    #[test]
    fn test_yaml_document() {
        let model = DomainModel::from_yaml_str(SHOP).unwrap();
        assert_eq!(model.name(), "Online Shop");
        assert_eq!(model.class_count(), 3);

        let customer = model.class("Customer").unwrap();
        assert_eq!(customer.attributes[0].ty, PrimitiveType::String.into());
        assert_eq!(customer.attributes[1].visibility, Visibility::Public);

        let order = model.class("Order").unwrap();
        assert_eq!(order.attributes[0].ty, AttributeType::Enum("OrderStatus".to_string()));
        assert_eq!(order.attributes[1].visibility, Visibility::Protected);

        let assocs = model.associations();
        assert_eq!(assocs[0].from_multiplicity, Multiplicity::one());
        assert_eq!(assocs[0].to_multiplicity, Multiplicity::many());
        assert_eq!(assocs[1].kind, AssociationKind::Composition);
    }

    #[test]
    fn test_json_document() {
        let json = r#"{
            "classes": {"A": {"abstract": true}, "B": {}},
            "generalizations": [{"parent": "A", "child": "B"}]
        }"#;
        let model = DomainModel::from_json_str(json).unwrap();
        assert_eq!(model.name(), DEFAULT_MODEL_NAME);
        assert!(model.is_abstract("A"));
        assert_eq!(model.parent_of("B"), Some("A"));
    }

    #[test]
    fn test_missing_role_is_validation_error() {
        let yaml = r#"
classes:
  A:
  B:
associations:
  - from: A
    to: B
    fromRole: a
"#;
        let err = DomainModel::from_yaml_str(yaml).unwrap_err();
        assert_eq!(err.stage(), "validation");
        assert!(err.to_string().contains("toRole"));
    }

    #[test]
    fn test_collects_notation_and_model_errors() {
        let yaml = r#"
classes:
  A:
    attributes: ["not valid !"]
associations:
  - from: A
    to: Ghost
    fromRole: a
    toRole: ghosts
    toMultiplicity: "3..1"
    type: friendship
"#;
        let errors = ModelDocument::from_yaml_str(yaml)
            .unwrap()
            .into_model_all()
            .unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidAttribute { .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidMultiplicity { .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnknownAssociationKind { .. })));
    }

    #[test]
    fn test_malformed_yaml_is_document_error() {
        let err = ModelDocument::from_yaml_str("classes: [unclosed").unwrap_err();
        assert_eq!(err.stage(), "document");
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let err = ModelDocument::from_yaml_str("name: x\nclasess: {}\n").unwrap_err();
        assert!(err.to_string().contains("clasess"));
    }
}
