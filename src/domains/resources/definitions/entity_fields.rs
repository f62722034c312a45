//! Per-entity field catalog resources.
//!
//! One resource per supported entity, generated from the query field
//! registry so the catalogs never drift from what validation accepts.
//! URIs follow `qbo://fields/{Entity}` with the exact entity casing.

use rmcp::model::{AnnotateAble, RawResource};
use serde_json::json;

use crate::domains::query::{entity_fields, known_entities};
use crate::domains::resources::service::{ResourceContent, ResourceEntry};

/// Build one field catalog entry per known entity.
pub fn field_catalog_entries() -> Vec<ResourceEntry> {
    known_entities()
        .iter()
        .map(|entity| {
            let mut raw = RawResource::new(
                format!("qbo://fields/{entity}"),
                format!("{entity} Fields"),
            );
            raw.description = Some(format!(
                "Queryable fields of the {entity} entity with types and sort support"
            ));
            raw.mime_type = Some("application/json".to_string());

            ResourceEntry {
                resource: raw.no_annotation(),
                content: ResourceContent::Text(render_catalog(entity)),
            }
        })
        .collect()
}

/// Render the field table of one entity as pretty JSON.
fn render_catalog(entity: &str) -> String {
    let fields: Vec<_> = entity_fields(entity)
        .unwrap_or_default()
        .iter()
        .map(|spec| {
            json!({
                "name": spec.name,
                "type": spec.kind.to_string(),
                "filterable": spec.filterable,
                "sortable": spec.sortable,
            })
        })
        .collect();

    let catalog = json!({
        "entity": entity,
        "fields": fields,
    });

    serde_json::to_string_pretty(&catalog).unwrap_or_else(|_| catalog.to_string())
}
