//! Query-domain error types.

use thiserror::Error;

use super::fields::FieldType;

/// Errors raised while turning raw search criteria into a query string.
///
/// All of these are synchronous validation failures returned to the caller
/// before anything reaches the network; nothing here is retried or fatal.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The criteria value cannot be interpreted as any supported shape.
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    /// No field metadata is registered for the entity.
    #[error("Unknown entity '{entity}'. Known entities: {known}")]
    UnknownEntity { entity: String, known: String },

    /// A WHERE field is not filterable for the entity.
    #[error("Field '{field}' cannot be used to filter {entity}. Filterable fields: {allowed}")]
    NotFilterable {
        entity: String,
        field: String,
        allowed: String,
    },

    /// An asc/desc target is not sortable for the entity.
    #[error("Cannot sort {entity} by '{field}'. Sortable fields: {allowed}")]
    NotSortable {
        entity: String,
        field: String,
        allowed: String,
    },

    /// A filter value cannot be converted to the field's declared type.
    #[error("Value for field '{field}' is not a valid {expected}")]
    TypeMismatch { field: String, expected: FieldType },
}

impl QueryError {
    /// Create a new "invalid criteria" error.
    pub fn invalid_criteria(msg: impl Into<String>) -> Self {
        Self::InvalidCriteria(msg.into())
    }

    /// Create a new "unknown entity" error listing the registered entities.
    pub fn unknown_entity(entity: &str, known: &[&str]) -> Self {
        Self::UnknownEntity {
            entity: entity.to_string(),
            known: known.join(", "),
        }
    }

    /// Create a new "not filterable" error listing the allowed fields.
    pub fn not_filterable(entity: &str, field: &str, allowed: &[&str]) -> Self {
        Self::NotFilterable {
            entity: entity.to_string(),
            field: field.to_string(),
            allowed: allowed.join(", "),
        }
    }

    /// Create a new "not sortable" error listing the allowed fields.
    pub fn not_sortable(entity: &str, field: &str, allowed: &[&str]) -> Self {
        Self::NotSortable {
            entity: entity.to_string(),
            field: field.to_string(),
            allowed: allowed.join(", "),
        }
    }

    /// Create a new "type mismatch" error for the offending field.
    pub fn type_mismatch(field: &str, expected: FieldType) -> Self {
        Self::TypeMismatch {
            field: field.to_string(),
            expected,
        }
    }
}
