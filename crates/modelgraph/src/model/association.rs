//! Associations, multiplicities and generalizations

use std::fmt;
use std::str::FromStr;

use crate::core::ValidationError;

use super::notation::parse_multiplicity;

/// Structural kind of an association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssociationKind {
    #[default]
    Association,
    Composition,
    Aggregation,
}

impl FromStr for AssociationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "association" => Ok(AssociationKind::Association),
            "composition" => Ok(AssociationKind::Composition),
            "aggregation" => Ok(AssociationKind::Aggregation),
            _ => Err(format!("Unknown association kind: {}", s)),
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssociationKind::Association => write!(f, "association"),
            AssociationKind::Composition => write!(f, "composition"),
            AssociationKind::Aggregation => write!(f, "aggregation"),
        }
    }
}

/// Multiplicity range of an association end; `upper == None` is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Multiplicity {
    pub lower: u32,
    pub upper: Option<u32>,
}

impl Multiplicity {
    pub fn exactly(n: u32) -> Self {
        Self {
            lower: n,
            upper: Some(n),
        }
    }

    pub fn range(lower: u32, upper: u32) -> Self {
        Self {
            lower,
            upper: Some(upper),
        }
    }

    pub fn at_least(lower: u32) -> Self {
        Self { lower, upper: None }
    }

    /// `1`
    pub fn one() -> Self {
        Self::exactly(1)
    }

    /// `0..1`
    pub fn optional() -> Self {
        Self::range(0, 1)
    }

    /// `*`
    pub fn many() -> Self {
        Self::at_least(0)
    }

    /// More than one target instance is allowed
    pub fn is_to_many(&self) -> bool {
        self.upper.map_or(true, |upper| upper > 1)
    }

    pub fn is_optional(&self) -> bool {
        self.lower == 0
    }
}

impl Default for Multiplicity {
    fn default() -> Self {
        Self::one()
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (0, None) => write!(f, "*"),
            (lower, None) => write!(f, "{}..*", lower),
            (lower, Some(upper)) if lower == upper => write!(f, "{}", lower),
            (lower, Some(upper)) => write!(f, "{}..{}", lower, upper),
        }
    }
}

impl FromStr for Multiplicity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_multiplicity(s)
    }
}

/// A binary association between two classes
///
/// Both roles are mandatory; an empty role fails validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationDef {
    pub from_class: String,
    pub to_class: String,
    pub from_role: String,
    pub to_role: String,
    pub from_multiplicity: Multiplicity,
    pub to_multiplicity: Multiplicity,
    pub kind: AssociationKind,
    /// Documentation label shown by the UML emitter and the XMI export
    pub name: Option<String>,
}

impl AssociationDef {
    pub fn new(
        from_class: impl Into<String>,
        from_role: impl Into<String>,
        to_class: impl Into<String>,
        to_role: impl Into<String>,
    ) -> Self {
        Self {
            from_class: from_class.into(),
            to_class: to_class.into(),
            from_role: from_role.into(),
            to_role: to_role.into(),
            from_multiplicity: Multiplicity::one(),
            to_multiplicity: Multiplicity::one(),
            kind: AssociationKind::Association,
            name: None,
        }
    }

    pub fn with_multiplicities(mut self, from: Multiplicity, to: Multiplicity) -> Self {
        self.from_multiplicity = from;
        self.to_multiplicity = to;
        self
    }

    pub fn with_kind(mut self, kind: AssociationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn composition(self) -> Self {
        self.with_kind(AssociationKind::Composition)
    }

    pub fn aggregation(self) -> Self {
        self.with_kind(AssociationKind::Aggregation)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Label used in class diagrams: the association name, else the target role
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.to_role)
    }
}

/// `child` specializes `parent`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneralizationDef {
    pub parent: String,
    pub child: String,
}

impl GeneralizationDef {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}
