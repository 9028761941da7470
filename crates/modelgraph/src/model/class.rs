//! Classes, attributes and enumerations

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// UML attribute visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Private,
    Public,
    Protected,
}

impl Visibility {
    /// PlantUML / UML prefix symbol
    pub fn symbol(&self) -> char {
        match self {
            Visibility::Private => '-',
            Visibility::Public => '+',
            Visibility::Protected => '#',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '-' => Some(Visibility::Private),
            '+' => Some(Visibility::Public),
            '#' => Some(Visibility::Protected),
            _ => None,
        }
    }

    /// Lenient lookup by word or symbol; anything unrecognised is private
    pub fn parse_lenient(text: &str) -> Self {
        text.parse().unwrap_or_default()
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(visibility) = Visibility::from_symbol(c) {
                return Ok(visibility);
            }
        }
        match trimmed.to_lowercase().as_str() {
            "private" => Ok(Visibility::Private),
            "public" => Ok(Visibility::Public),
            "protected" => Ok(Visibility::Protected),
            _ => Err(format!("Unknown visibility: {}", s)),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Private => write!(f, "private"),
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
        }
    }
}

/// Built-in attribute value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Time,
}

impl PrimitiveType {
    /// Recognise a primitive by name or common alias, ignoring case
    pub fn lookup(name: &str) -> Option<Self> {
        let primitive = match name.trim().to_lowercase().as_str() {
            "string" | "str" | "text" => PrimitiveType::String,
            "integer" | "int" | "long" | "number" => PrimitiveType::Integer,
            "float" | "double" | "decimal" | "real" => PrimitiveType::Float,
            "boolean" | "bool" => PrimitiveType::Boolean,
            "date" => PrimitiveType::Date,
            "datetime" | "timestamp" => PrimitiveType::DateTime,
            "time" => PrimitiveType::Time,
            _ => return None,
        };
        Some(primitive)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "String",
            PrimitiveType::Integer => "Integer",
            PrimitiveType::Float => "Float",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Date => "Date",
            PrimitiveType::DateTime => "DateTime",
            PrimitiveType::Time => "Time",
        }
    }
}

/// Type tag of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Primitive(PrimitiveType),
    /// Reference to an enumeration, resolved by name during validation
    Enum(String),
}

impl AttributeType {
    /// Primitive when the name is a known primitive, otherwise an enumeration reference
    pub fn parse(name: &str) -> Self {
        match PrimitiveType::lookup(name) {
            Some(primitive) => AttributeType::Primitive(primitive),
            None => AttributeType::Enum(name.trim().to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AttributeType::Primitive(p) => p.name(),
            AttributeType::Enum(name) => name,
        }
    }

    pub fn enumeration(&self) -> Option<&str> {
        match self {
            AttributeType::Enum(name) => Some(name),
            AttributeType::Primitive(_) => None,
        }
    }
}

impl Default for AttributeType {
    fn default() -> Self {
        AttributeType::Primitive(PrimitiveType::String)
    }
}

impl From<PrimitiveType> for AttributeType {
    fn from(primitive: PrimitiveType) -> Self {
        AttributeType::Primitive(primitive)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for AttributeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A named, typed attribute owned by one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
    pub name: String,
    pub ty: AttributeType,
    pub visibility: Visibility,
}

impl AttributeDef {
    pub fn new(name: impl Into<String>, ty: impl Into<AttributeType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            visibility: Visibility::default(),
        }
    }

    /// String-typed attribute
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, PrimitiveType::String)
    }

    /// Attribute typed by an enumeration
    pub fn enumerated(name: impl Into<String>, enumeration: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Enum(enumeration.into()))
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// Named, ordered set of literal values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumerationDef {
    pub name: String,
    pub values: Vec<String>,
}

impl EnumerationDef {
    /// Build an enumeration; repeated literals keep their first position
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let mut literals: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !literals.contains(&value) {
                literals.push(value);
            }
        }
        Self {
            name: name.into(),
            values: literals,
        }
    }

    pub fn contains(&self, literal: &str) -> bool {
        self.values.iter().any(|v| v == literal)
    }
}

/// A class of the domain model
///
/// The parent relationship lives in the model's generalizations; children
/// are derived by [`InheritanceForest`](super::InheritanceForest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntity {
    pub name: String,
    pub attributes: Vec<AttributeDef>,
    pub is_abstract: bool,
}

impl ClassEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            is_abstract: false,
        }
    }

    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self {
            is_abstract: true,
            ..Self::new(name)
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeDef) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_parsing() {
        assert_eq!("+".parse::<Visibility>().unwrap(), Visibility::Public);
        assert_eq!("Protected".parse::<Visibility>().unwrap(), Visibility::Protected);
        assert_eq!(Visibility::parse_lenient("package"), Visibility::Private);
        assert_eq!(Visibility::Protected.symbol(), '#');
    }

    #[test]
    fn test_attribute_type_aliases() {
        assert_eq!(AttributeType::parse("int"), PrimitiveType::Integer.into());
        assert_eq!(AttributeType::parse("Double"), PrimitiveType::Float.into());
        assert_eq!(AttributeType::parse("BOOLEAN"), PrimitiveType::Boolean.into());
        assert_eq!(AttributeType::parse("DateTime"), PrimitiveType::DateTime.into());
        assert_eq!(
            AttributeType::parse(" OrderStatus "),
            AttributeType::Enum("OrderStatus".to_string())
        );
    }

    #[test]
    fn test_attribute_type_serializes_as_name() {
        let json = serde_json::to_string(&AttributeType::Enum("Status".to_string())).unwrap();
        assert_eq!(json, "\"Status\"");
        let json = serde_json::to_string(&AttributeType::from(PrimitiveType::Time)).unwrap();
        assert_eq!(json, "\"Time\"");
    }

    #[test]
    fn test_enumeration_literals_are_a_set() {
        let status = EnumerationDef::new("Status", ["OPEN", "CLOSED", "OPEN"]);
        assert_eq!(status.values, vec!["OPEN", "CLOSED"]);
        assert!(status.contains("CLOSED"));
    }

    #[test]
    fn test_class_builder() {
        let class = ClassEntity::abstract_class("Product")
            .with_attribute(AttributeDef::string("name"))
            .with_attribute(AttributeDef::new("price", PrimitiveType::Float));
        assert!(class.is_abstract);
        assert_eq!(class.attributes.len(), 2);
        assert_eq!(class.attribute("price").unwrap().ty.name(), "Float");
    }
}
