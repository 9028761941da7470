//! Core error types for model processing
//!
//! This module defines the error taxonomy shared by every pipeline stage:
//! model validation, layout geometry parsing, direction resolution and the
//! external renderer.

use thiserror::Error;

use super::types::RelationshipKey;

/// Which end of an association a role belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationEnd {
    From,
    To,
}

impl std::fmt::Display for AssociationEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssociationEnd::From => write!(f, "fromRole"),
            AssociationEnd::To => write!(f, "toRole"),
        }
    }
}

/// Structural problems found in a domain model before any transformation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("association {from} -> {to} is missing its {end}")]
    MissingRole {
        from: String,
        to: String,
        end: AssociationEnd,
    },

    #[error("unknown class '{name}' referenced by {context}")]
    UnknownClass { name: String, context: String },

    #[error("attribute '{class}.{attribute}' references unknown enumeration '{name}'")]
    UnknownEnumeration {
        class: String,
        attribute: String,
        name: String,
    },

    #[error("generalization cycle through class '{class}'")]
    GeneralizationCycle { class: String },

    #[error("class '{child}' has more than one parent ('{first}' and '{second}')")]
    MultipleParents {
        child: String,
        first: String,
        second: String,
    },

    #[error("class '{name}' is defined more than once")]
    DuplicateClass { name: String },

    #[error("enumeration '{name}' is defined more than once")]
    DuplicateEnumeration { name: String },

    #[error("class '{class}' declares attribute '{attribute}' more than once")]
    DuplicateAttribute { class: String, attribute: String },

    #[error("{kind} with an empty name")]
    EmptyName { kind: &'static str },

    #[error("invalid multiplicity '{text}': {reason}")]
    InvalidMultiplicity { text: String, reason: String },

    #[error("invalid attribute notation '{text}'")]
    InvalidAttribute { text: String },

    #[error("association {from} -> {to} has unknown kind '{kind}'")]
    UnknownAssociationKind {
        from: String,
        to: String,
        kind: String,
    },
}

impl ValidationError {
    /// Create an unknown-class error for the given referencing context
    pub fn unknown_class(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownClass {
            name: name.into(),
            context: context.into(),
        }
    }

    /// Create an invalid-multiplicity error
    pub fn invalid_multiplicity(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMultiplicity {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level error type for the conversion and rendering pipeline
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Layout parse error: {message}")]
    LayoutParse {
        message: String,
        missing_nodes: Vec<String>,
    },

    #[error("Direction resolution failed: {} relationship(s) unresolved", .unresolved.len())]
    UnresolvedDirections { unresolved: Vec<RelationshipKey> },

    #[error("Renderer error ({program}): {message}")]
    Renderer { program: String, message: String },

    #[error("Renderer '{program}' timed out after {timeout_ms} ms")]
    RendererTimeout { program: String, timeout_ms: u64 },

    #[error("Emit error: {message}")]
    Emit { message: String },

    #[error("Document error: {message}")]
    Document { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ModelError {
    /// Create a layout parse error for nodes the artifact does not contain
    pub fn missing_nodes(missing_nodes: Vec<String>) -> Self {
        Self::LayoutParse {
            message: format!(
                "rendered artifact has no element for node(s): {}",
                missing_nodes.join(", ")
            ),
            missing_nodes,
        }
    }

    /// Create a layout parse error for a malformed artifact
    pub fn layout_parse(message: impl Into<String>) -> Self {
        Self::LayoutParse {
            message: message.into(),
            missing_nodes: Vec::new(),
        }
    }

    /// Create a renderer error
    pub fn renderer(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Renderer {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Create an emit error
    pub fn emit(message: impl Into<String>) -> Self {
        Self::Emit {
            message: message.into(),
        }
    }

    /// Create a document error
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }

    /// Short name of the pipeline stage that produced this error
    pub fn stage(&self) -> &'static str {
        match self {
            ModelError::Validation(_) => "validation",
            ModelError::LayoutParse { .. } => "geometry",
            ModelError::UnresolvedDirections { .. } => "direction",
            ModelError::Renderer { .. } | ModelError::RendererTimeout { .. } => "renderer",
            ModelError::Emit { .. } => "emit",
            ModelError::Document { .. } => "document",
            ModelError::Io { .. } => "io",
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_role_message() {
        let error = ValidationError::MissingRole {
            from: "Person".to_string(),
            to: "Purchase".to_string(),
            end: AssociationEnd::To,
        };
        let msg = error.to_string();
        assert!(msg.contains("Person -> Purchase"));
        assert!(msg.contains("toRole"));
    }

    #[test]
    fn test_validation_wraps_into_model_error() {
        let error: ModelError = ValidationError::unknown_class("Ghost", "association").into();
        let msg = error.to_string();
        assert!(msg.starts_with("Validation error"));
        assert!(msg.contains("Ghost"));
        assert_eq!(error.stage(), "validation");
    }

    #[test]
    fn test_missing_nodes_lists_names() {
        let error = ModelError::missing_nodes(vec!["A".to_string(), "B".to_string()]);
        let msg = error.to_string();
        assert!(msg.contains("Layout parse error"));
        assert!(msg.contains("A, B"));
        assert_eq!(error.stage(), "geometry");
    }

    #[test]
    fn test_unresolved_count() {
        let error = ModelError::UnresolvedDirections {
            unresolved: vec![RelationshipKey::new("A", "B", "HAS_B")],
        };
        assert!(error.to_string().contains("1 relationship(s) unresolved"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: ModelError = io_err.into();
        let msg = format!("{}", error);
        assert!(msg.contains("IO error"));
        assert!(msg.contains("File not found"));
    }
}
