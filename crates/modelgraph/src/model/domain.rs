//! The validated domain model
//!
//! A [`DomainModel`] can only be obtained through [`DomainModelBuilder::build`],
//! which runs every structural check. Downstream converters and emitters can
//! therefore rely on resolved class and enumeration references and on a
//! well-formed inheritance forest.

use indexmap::IndexMap;
use tracing::{debug, span, Level};

use crate::core::{AssociationEnd, ValidationError};

use super::association::{AssociationDef, GeneralizationDef};
use super::class::{ClassEntity, EnumerationDef};
use super::forest::InheritanceForest;

#[derive(Debug, Clone, PartialEq)]
pub struct DomainModel {
    name: String,
    classes: IndexMap<String, ClassEntity>,
    enumerations: IndexMap<String, EnumerationDef>,
    associations: Vec<AssociationDef>,
    generalizations: Vec<GeneralizationDef>,
    forest: InheritanceForest,
}

impl DomainModel {
    pub fn builder(name: impl Into<String>) -> DomainModelBuilder {
        DomainModelBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classes in declaration order
    pub fn classes(&self) -> impl Iterator<Item = &ClassEntity> {
        self.classes.values()
    }

    pub fn class(&self, name: &str) -> Option<&ClassEntity> {
        self.classes.get(name)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn enumerations(&self) -> impl Iterator<Item = &EnumerationDef> {
        self.enumerations.values()
    }

    pub fn enumeration(&self, name: &str) -> Option<&EnumerationDef> {
        self.enumerations.get(name)
    }

    pub fn associations(&self) -> &[AssociationDef] {
        &self.associations
    }

    pub fn generalizations(&self) -> &[GeneralizationDef] {
        &self.generalizations
    }

    pub fn forest(&self) -> &InheritanceForest {
        &self.forest
    }

    pub fn parent_of(&self, class: &str) -> Option<&str> {
        self.forest.parent(class)
    }

    pub fn is_abstract(&self, class: &str) -> bool {
        self.classes.get(class).is_some_and(|c| c.is_abstract)
    }
}

/// Collects model elements and validates them into a [`DomainModel`]
#[derive(Debug, Clone, Default)]
pub struct DomainModelBuilder {
    name: String,
    classes: Vec<ClassEntity>,
    enumerations: Vec<EnumerationDef>,
    associations: Vec<AssociationDef>,
    generalizations: Vec<GeneralizationDef>,
}

impl DomainModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn class(mut self, class: ClassEntity) -> Self {
        self.classes.push(class);
        self
    }

    pub fn enumeration(mut self, enumeration: EnumerationDef) -> Self {
        self.enumerations.push(enumeration);
        self
    }

    pub fn association(mut self, association: AssociationDef) -> Self {
        self.associations.push(association);
        self
    }

    pub fn generalization(mut self, parent: impl Into<String>, child: impl Into<String>) -> Self {
        self.generalizations.push(GeneralizationDef::new(parent, child));
        self
    }

    /// Validate and build, failing on the first problem found
    pub fn build(self) -> Result<DomainModel, ValidationError> {
        self.build_all().map_err(|mut errors| errors.remove(0))
    }

    /// Validate and build, reporting every problem found
    ///
    /// The error vector is never empty.
    pub fn build_all(self) -> Result<DomainModel, Vec<ValidationError>> {
        let validate_span = span!(
            Level::INFO,
            "validate_model",
            model = %self.name,
            classes = self.classes.len(),
            associations = self.associations.len()
        );
        let _enter = validate_span.enter();

        let mut errors = Vec::new();

        let mut enumerations = IndexMap::new();
        for enumeration in self.enumerations {
            if enumeration.name.trim().is_empty() {
                errors.push(ValidationError::EmptyName { kind: "enumeration" });
            } else if enumerations.contains_key(&enumeration.name) {
                errors.push(ValidationError::DuplicateEnumeration {
                    name: enumeration.name,
                });
            } else {
                enumerations.insert(enumeration.name.clone(), enumeration);
            }
        }

        let mut classes = IndexMap::new();
        for class in self.classes {
            if class.name.trim().is_empty() {
                errors.push(ValidationError::EmptyName { kind: "class" });
            } else if classes.contains_key(&class.name) {
                errors.push(ValidationError::DuplicateClass { name: class.name });
            } else {
                classes.insert(class.name.clone(), class);
            }
        }

        for class in classes.values() {
            check_attributes(class, &enumerations, &mut errors);
        }

        for association in &self.associations {
            check_association(association, &classes, &mut errors);
        }

        for generalization in &self.generalizations {
            for (end, name) in [
                ("generalization parent", &generalization.parent),
                ("generalization child", &generalization.child),
            ] {
                if !classes.contains_key(name) {
                    errors.push(ValidationError::unknown_class(name.as_str(), end));
                }
            }
        }

        let forest = match InheritanceForest::build(&self.generalizations) {
            Ok(forest) => forest,
            Err(e) => {
                errors.push(e);
                InheritanceForest::default()
            }
        };

        if !errors.is_empty() {
            debug!(error_count = errors.len(), "Model validation failed");
            return Err(errors);
        }

        debug!(
            classes = classes.len(),
            enumerations = enumerations.len(),
            generalizations = forest.generalization_count(),
            "Model validated"
        );

        Ok(DomainModel {
            name: self.name,
            classes,
            enumerations,
            associations: self.associations,
            generalizations: self.generalizations,
            forest,
        })
    }
}

fn check_attributes(
    class: &ClassEntity,
    enumerations: &IndexMap<String, EnumerationDef>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen: Vec<&str> = Vec::with_capacity(class.attributes.len());
    for attribute in &class.attributes {
        if attribute.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { kind: "attribute" });
            continue;
        }
        if seen.contains(&attribute.name.as_str()) {
            errors.push(ValidationError::DuplicateAttribute {
                class: class.name.clone(),
                attribute: attribute.name.clone(),
            });
        }
        seen.push(&attribute.name);

        if let Some(enumeration) = attribute.ty.enumeration() {
            if !enumerations.contains_key(enumeration) {
                errors.push(ValidationError::UnknownEnumeration {
                    class: class.name.clone(),
                    attribute: attribute.name.clone(),
                    name: enumeration.to_string(),
                });
            }
        }
    }
}

fn check_association(
    association: &AssociationDef,
    classes: &IndexMap<String, ClassEntity>,
    errors: &mut Vec<ValidationError>,
) {
    let context = format!(
        "association {} -> {}",
        association.from_class, association.to_class
    );
    for name in [&association.from_class, &association.to_class] {
        if !classes.contains_key(name) {
            errors.push(ValidationError::unknown_class(name.as_str(), context.as_str()));
        }
    }

    for (end, role) in [
        (AssociationEnd::From, &association.from_role),
        (AssociationEnd::To, &association.to_role),
    ] {
        if role.trim().is_empty() {
            errors.push(ValidationError::MissingRole {
                from: association.from_class.clone(),
                to: association.to_class.clone(),
                end,
            });
        }
    }
}
