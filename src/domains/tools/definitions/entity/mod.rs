//! Generic entity tools.
//!
//! Read and write access to individual records of any supported entity,
//! plus a raw query escape hatch. Unlike the per-entity search tools these
//! take the entity name as a parameter; they share none of the criteria
//! pipeline because the API addresses single records by ID.

mod create;
mod delete;
mod get;
mod query;
mod update;

pub use create::EntityCreateTool;
pub use delete::EntityDeleteTool;
pub use get::EntityGetTool;
pub use query::RawQueryTool;
pub use update::EntityUpdateTool;

use crate::domains::query::known_entities;

/// Reject entity names outside the supported set before any API call.
/// Entity names are case-sensitive PascalCase, matching the API.
pub(crate) fn validate_entity(entity: &str) -> Result<(), String> {
    if known_entities().contains(&entity) {
        Ok(())
    } else {
        Err(format!(
            "Unknown entity '{}'. Known entities: {}",
            entity,
            known_entities().join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_entity_is_case_sensitive() {
        assert!(validate_entity("Customer").is_ok());
        assert!(validate_entity("CreditMemo").is_ok());
        assert!(validate_entity("customer").is_err());
        assert!(validate_entity("TimeActivity").is_err());
    }

    #[test]
    fn test_validate_entity_error_lists_supported_set() {
        let err = validate_entity("Widget").unwrap_err();
        assert!(err.contains("'Widget'"));
        assert!(err.contains("Customer"));
        assert!(err.contains("Vendor"));
    }
}
