//! Resource Registry - central registration of all resources.
//!
//! This module provides dynamic resource registration without modifying service.rs.
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_resources()`

use rmcp::model::{AnnotateAble, RawResource, RawResourceTemplate, ResourceTemplate};

use super::definitions::{
    ResourceDefinition, SearchCriteriaDocsResource, ServerInfoResource, field_catalog_entries,
};
use super::service::ResourceEntry;

/// Helper function to create an annotated resource from a definition.
fn build_resource<R: ResourceDefinition>() -> ResourceEntry {
    let mut raw = RawResource::new(R::URI, R::NAME);
    raw.description = Some(R::DESCRIPTION.to_string());
    raw.mime_type = Some(R::MIME_TYPE.to_string());

    ResourceEntry {
        resource: raw.no_annotation(),
        content: R::content(),
    }
}

/// Get all registered resources as ResourceEntries.
///
/// This is the central place where all resources are registered.
/// When adding a new resource, add it here.
pub fn get_all_resources() -> Vec<ResourceEntry> {
    let mut resources = vec![
        build_resource::<ServerInfoResource>(),
        build_resource::<SearchCriteriaDocsResource>(),
    ];
    resources.extend(field_catalog_entries());
    resources
}

/// Get all registered resource templates.
///
/// Resource templates use URI templates (RFC 6570) to describe
/// parameterized resources that clients can fill in.
pub fn get_all_resource_templates() -> Vec<ResourceTemplate> {
    vec![
        RawResourceTemplate {
            uri_template: "qbo://fields/{entity}".to_string(),
            name: "Entity Field Catalogs".to_string(),
            title: Some("Entity Field Catalogs".to_string()),
            description: Some(
                "Queryable fields of a QuickBooks entity, addressed by its exact name \
                 (e.g. qbo://fields/Invoice)"
                    .to_string(),
            ),
            mime_type: Some("application/json".to_string()),
        }
        .no_annotation(),
    ]
}

/// Get the list of all resource URIs.
pub fn resource_uris() -> Vec<String> {
    get_all_resources()
        .into_iter()
        .map(|entry| entry.resource.raw.uri)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::query::known_entities;

    #[test]
    fn test_get_all_resources() {
        let resources = get_all_resources();
        assert_eq!(resources.len(), 2 + known_entities().len());

        let uris: Vec<_> = resources
            .iter()
            .map(|r| r.resource.raw.uri.as_str())
            .collect();
        assert!(uris.contains(&"qbo://server/info"));
        assert!(uris.contains(&"qbo://docs/search-criteria"));
        assert!(uris.contains(&"qbo://fields/Invoice"));
        assert!(uris.contains(&"qbo://fields/Vendor"));
    }

    #[test]
    fn test_get_all_resource_templates() {
        let templates = get_all_resource_templates();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].raw.uri_template, "qbo://fields/{entity}");
    }

    #[test]
    fn test_resource_uris_are_unique() {
        let uris = resource_uris();
        let mut deduped = uris.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(uris.len(), deduped.len());
    }
}
