//! Search planning.
//!
//! The seam between raw tool input and the HTTP dispatcher: normalize the
//! criteria, validate every field reference against the registry, coerce
//! the values, and compile the query string. All caller mistakes surface
//! here, before anything touches the network.

use serde_json::Value;

use super::coerce::coerce_criteria;
use super::criteria::{normalize, CanonicalCriteria, Directives, FilterValue};
use super::error::QueryError;
use super::fields;
use super::sql::compile;

/// A compiled query plus the directive summary the dispatch layer acts on.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuery {
    pub entity: String,
    pub sql: String,
    /// Coerced canonical criteria. The fetch-all loop recompiles one query
    /// per page window from these.
    pub criteria: CanonicalCriteria,
    /// The query counts matching records instead of returning them.
    pub count_only: bool,
    /// The dispatcher should page through every matching record.
    pub fetch_all: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Run the full normalize, validate, coerce, compile pipeline.
pub fn plan(entity: &str, raw: &Value) -> Result<PreparedQuery, QueryError> {
    if fields::entity_fields(entity).is_none() {
        return Err(QueryError::unknown_entity(entity, fields::known_entities()));
    }

    let criteria = normalize(raw)?;
    validate(entity, &criteria)?;
    let criteria = coerce_criteria(entity, &criteria)?;
    let sql = compile(entity, &criteria);
    let Directives {
        count,
        fetch_all,
        limit,
        offset,
    } = criteria.directives();

    Ok(PreparedQuery {
        entity: entity.to_string(),
        sql,
        criteria,
        count_only: count,
        fetch_all,
        limit,
        offset,
    })
}

/// Check every field reference before compilation. Directive values other
/// than sort targets are not validated here; an unusable `limit` simply
/// drops out of the compiled query.
fn validate(entity: &str, criteria: &CanonicalCriteria) -> Result<(), QueryError> {
    match criteria {
        CanonicalCriteria::Simple(pairs) => {
            for (field, _) in pairs {
                ensure_filterable(entity, field)?;
            }
        }
        CanonicalCriteria::Filters(entries) => {
            for entry in entries {
                match entry.field.as_str() {
                    "asc" | "desc" => ensure_sortable(entity, &entry.value)?,
                    "limit" | "offset" | "count" | "fetchAll" => {}
                    field => ensure_filterable(entity, field)?,
                }
            }
        }
    }
    Ok(())
}

fn ensure_filterable(entity: &str, field: &str) -> Result<(), QueryError> {
    match fields::field_spec(entity, field) {
        Some(spec) if spec.filterable => Ok(()),
        _ => Err(QueryError::not_filterable(
            entity,
            field,
            &fields::filterable_fields(entity),
        )),
    }
}

fn ensure_sortable(entity: &str, target: &FilterValue) -> Result<(), QueryError> {
    let name = target.as_str().unwrap_or_default();
    match fields::field_spec(entity, name) {
        Some(spec) if spec.sortable => Ok(()),
        _ => Err(QueryError::not_sortable(
            entity,
            name,
            &fields::sortable_fields(entity),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_for_empty_criteria() {
        let prepared = plan("Customer", &json!({})).unwrap();
        assert_eq!(prepared.sql, "SELECT * FROM Customer");
        assert!(!prepared.count_only);
        assert!(!prepared.fetch_all);
        assert_eq!(prepared.limit, None);
        assert_eq!(prepared.offset, None);
    }

    #[test]
    fn test_string_value_is_coerced_before_compilation() {
        let raw = json!([{"field": "Balance", "value": "0", "operator": ">"}]);
        let prepared = plan("Invoice", &raw).unwrap();
        assert_eq!(prepared.sql, "SELECT * FROM Invoice WHERE Balance > 0");
    }

    #[test]
    fn test_unknown_entity_is_rejected_with_known_list() {
        let err = plan("TimeActivity", &json!({})).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("TimeActivity"));
        assert!(message.contains("Customer"));
    }

    #[test]
    fn test_unknown_field_is_rejected_with_allowed_list() {
        let err = plan("Customer", &json!({"Nickname": "Ace"})).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'Nickname'"));
        assert!(message.contains("DisplayName"));
    }

    #[test]
    fn test_unknown_field_in_filter_array_is_rejected() {
        let raw = json!([{"field": "Nickname", "value": "Ace"}]);
        assert!(plan("Customer", &raw).is_err());
    }

    #[test]
    fn test_sort_target_must_be_sortable() {
        let err = plan("Customer", &json!({"asc": "Active"})).unwrap_err();
        assert!(matches!(err, QueryError::NotSortable { .. }));
        let err = plan("Customer", &json!({"desc": "Nope"})).unwrap_err();
        assert!(err.to_string().contains("Sortable fields"));
    }

    #[test]
    fn test_non_string_sort_target_is_rejected() {
        let raw = json!([{"field": "asc", "value": 5}]);
        assert!(matches!(
            plan("Customer", &raw).unwrap_err(),
            QueryError::NotSortable { .. }
        ));
    }

    #[test]
    fn test_non_string_sort_target_rejected_in_every_shape() {
        // The advanced and mixed shapes route sort targets through the same
        // validation as the filter array.
        let advanced = plan("Customer", &json!({"filters": [], "asc": 5})).unwrap_err();
        assert!(matches!(advanced, QueryError::NotSortable { .. }));

        let mixed = plan("Customer", &json!({"DisplayName": "x", "desc": 5})).unwrap_err();
        assert!(matches!(mixed, QueryError::NotSortable { .. }));
    }

    #[test]
    fn test_type_mismatch_surfaces_from_coercion() {
        let err = plan("Invoice", &json!({"Balance": "overdue"})).unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { .. }));
    }

    #[test]
    fn test_count_plan_short_circuits() {
        let raw = json!({"filters": [{"field": "Active", "value": true}], "count": true});
        let prepared = plan("Customer", &raw).unwrap();
        assert!(prepared.count_only);
        assert_eq!(prepared.sql, "SELECT COUNT(*) FROM Customer");
    }

    #[test]
    fn test_fetch_all_plan_keeps_criteria_for_paging() {
        let raw = json!({"filters": [{"field": "Active", "value": true}], "fetchAll": "1", "limit": 200});
        let prepared = plan("Customer", &raw).unwrap();
        assert!(prepared.fetch_all);
        assert_eq!(prepared.limit, Some(200));
        assert!(!prepared.sql.contains("fetchAll"));
        assert!(!prepared.criteria.is_empty());
    }

    #[test]
    fn test_window_directives_are_reported() {
        let prepared = plan("Customer", &json!({"limit": 25, "offset": 50})).unwrap();
        assert_eq!(prepared.limit, Some(25));
        assert_eq!(prepared.offset, Some(50));
        assert_eq!(
            prepared.sql,
            "SELECT * FROM Customer MAXRESULTS 25 STARTPOSITION 51"
        );
    }

    #[test]
    fn test_validation_runs_even_when_count_wins() {
        let raw = json!([
            {"field": "Nickname", "value": "Ace"},
            {"field": "count", "value": true}
        ]);
        assert!(matches!(
            plan("Customer", &raw).unwrap_err(),
            QueryError::NotFilterable { .. }
        ));
    }

    #[test]
    fn test_mixed_shape_plans_end_to_end() {
        let prepared = plan("Customer", &json!({"Active": "1", "limit": 3})).unwrap();
        assert_eq!(
            prepared.sql,
            "SELECT * FROM Customer WHERE Active = true MAXRESULTS 3"
        );
        assert_eq!(prepared.limit, Some(3));
    }
}
