//! Query-string compilation.
//!
//! Renders canonical criteria into the QuickBooks Online Data Query
//! Language. The clause order (WHERE, then ORDER BY, then MAXRESULTS, then
//! STARTPOSITION) is a wire contract with the remote query engine and must
//! not change. Compilation is infallible and pure: the registry has already
//! vetted field names and value types by the time criteria land here.

use super::criteria::{CanonicalCriteria, FilterValue};

/// Sort direction for the ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Default)]
struct Clauses {
    conditions: Vec<String>,
    order_by: Option<(String, SortDir)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

/// Compile canonical criteria into a query string for `entity`.
///
/// A truthy `count` directive wins over everything else and collapses the
/// whole query to `SELECT COUNT(*)`, wherever it sits in the entry list.
/// When `asc` and `desc` both appear, the last one wins.
pub fn compile(entity: &str, criteria: &CanonicalCriteria) -> String {
    let mut clauses = Clauses::default();

    match criteria {
        CanonicalCriteria::Simple(pairs) => {
            for (field, value) in pairs {
                clauses
                    .conditions
                    .push(format!("{} = {}", field, render_value(value)));
            }
        }
        CanonicalCriteria::Filters(entries) => {
            for entry in entries {
                match entry.field.as_str() {
                    "asc" => clauses.order_by = Some((render_bare(&entry.value), SortDir::Asc)),
                    "desc" => clauses.order_by = Some((render_bare(&entry.value), SortDir::Desc)),
                    "limit" => clauses.limit = entry.value.as_i64(),
                    "offset" => clauses.offset = entry.value.as_i64(),
                    "count" if entry.value.is_truthy() => {
                        return format!("SELECT COUNT(*) FROM {entity}");
                    }
                    "count" => {}
                    // Paging directive for the dispatcher; no clause of its own.
                    "fetchAll" => {}
                    field => clauses.conditions.push(format!(
                        "{} {} {}",
                        field,
                        entry.operator(),
                        render_value(&entry.value)
                    )),
                }
            }
        }
    }

    render(entity, &clauses)
}

/// Render a literal value: strings single-quoted with embedded quotes
/// escaped as `\'`, numbers and booleans bare, lists parenthesized for IN.
///
/// The single-character escape is deliberately minimal. The string goes to
/// a constrained vendor query endpoint, and its exact shape is part of the
/// wire contract.
pub fn render_value(value: &FilterValue) -> String {
    match value {
        FilterValue::String(s) => format!("'{}'", s.replace('\'', "\\'")),
        FilterValue::Number(n) => n.to_string(),
        FilterValue::Bool(b) => b.to_string(),
        FilterValue::List(items) => {
            let rendered: Vec<String> = items.iter().map(render_value).collect();
            format!("({})", rendered.join(", "))
        }
    }
}

/// Unquoted rendering, for places where a value names a field rather than
/// a literal.
fn render_bare(value: &FilterValue) -> String {
    match value {
        FilterValue::String(s) => s.clone(),
        FilterValue::Number(n) => n.to_string(),
        FilterValue::Bool(b) => b.to_string(),
        FilterValue::List(items) => items
            .iter()
            .map(render_bare)
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn render(entity: &str, clauses: &Clauses) -> String {
    let mut sql = format!("SELECT * FROM {entity}");
    if !clauses.conditions.is_empty() {
        sql.push_str(&format!(" WHERE {}", clauses.conditions.join(" AND ")));
    }
    if let Some((field, dir)) = &clauses.order_by {
        sql.push_str(&format!(" ORDER BY {} {}", field, dir.as_sql()));
    }
    if let Some(limit) = clauses.limit {
        sql.push_str(&format!(" MAXRESULTS {limit}"));
    }
    if let Some(offset) = clauses.offset {
        // The remote position argument is 1-indexed; offsets arrive 0-based
        // and can already sit at the integer ceiling after coercion.
        sql.push_str(&format!(" STARTPOSITION {}", offset.saturating_add(1)));
    }
    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::query::criteria::{normalize, Filter, Operator};
    use serde_json::json;

    fn compiled(entity: &str, raw: serde_json::Value) -> String {
        compile(entity, &normalize(&raw).unwrap())
    }

    #[test]
    fn test_empty_criteria_select_everything() {
        assert_eq!(
            compiled("Customer", json!({})),
            "SELECT * FROM Customer"
        );
    }

    #[test]
    fn test_simple_map_compiles_to_equality_conditions() {
        assert_eq!(
            compiled("Customer", json!({"DisplayName": "Acme"})),
            "SELECT * FROM Customer WHERE DisplayName = 'Acme'"
        );
    }

    #[test]
    fn test_explicit_operator_is_used() {
        let criteria = CanonicalCriteria::Filters(vec![Filter::with_operator(
            "Balance",
            FilterValue::Number(0.into()),
            Operator::Gt,
        )]);
        assert_eq!(
            compile("Invoice", &criteria),
            "SELECT * FROM Invoice WHERE Balance > 0"
        );
    }

    #[test]
    fn test_missing_operator_defaults_to_equality() {
        assert_eq!(
            compiled("Customer", json!([{"field": "Active", "value": true}])),
            "SELECT * FROM Customer WHERE Active = true"
        );
    }

    #[test]
    fn test_conditions_join_with_and_in_order() {
        let raw = json!([
            {"field": "Active", "value": true},
            {"field": "Balance", "value": 100, "operator": ">="}
        ]);
        assert_eq!(
            compiled("Customer", raw),
            "SELECT * FROM Customer WHERE Active = true AND Balance >= 100"
        );
    }

    #[test]
    fn test_embedded_quote_is_escaped() {
        assert_eq!(
            compiled("Customer", json!({"DisplayName": "O'Brien"})),
            "SELECT * FROM Customer WHERE DisplayName = 'O\\'Brien'"
        );
    }

    #[test]
    fn test_like_keeps_wildcards_verbatim() {
        let raw = json!([{"field": "DisplayName", "value": "Acme%", "operator": "LIKE"}]);
        assert_eq!(
            compiled("Customer", raw),
            "SELECT * FROM Customer WHERE DisplayName LIKE 'Acme%'"
        );
    }

    #[test]
    fn test_in_list_is_parenthesized() {
        let raw = json!([{"field": "Id", "value": ["1", "2", "3"], "operator": "IN"}]);
        assert_eq!(
            compiled("Customer", raw),
            "SELECT * FROM Customer WHERE Id IN ('1', '2', '3')"
        );
    }

    #[test]
    fn test_full_clause_order() {
        let raw = json!({
            "filters": [{"field": "Balance", "value": 0, "operator": ">"}],
            "desc": "Balance",
            "limit": 5,
            "offset": 10
        });
        assert_eq!(
            compiled("Invoice", raw),
            "SELECT * FROM Invoice WHERE Balance > 0 ORDER BY Balance DESC MAXRESULTS 5 STARTPOSITION 11"
        );
    }

    #[test]
    fn test_offset_translates_to_one_indexed_position() {
        assert_eq!(
            compiled("Customer", json!({"offset": 0})),
            "SELECT * FROM Customer STARTPOSITION 1"
        );
        assert_eq!(
            compiled("Customer", json!({"limit": 10, "offset": 10})),
            "SELECT * FROM Customer MAXRESULTS 10 STARTPOSITION 11"
        );
    }

    #[test]
    fn test_offset_at_the_integer_ceiling_saturates() {
        let ceiling = format!("SELECT * FROM Customer STARTPOSITION {}", i64::MAX);
        assert_eq!(compiled("Customer", json!({"offset": i64::MAX})), ceiling);
        // Out-of-range floats coerce to the ceiling as well.
        assert_eq!(compiled("Customer", json!({"offset": 1e308})), ceiling);
    }

    #[test]
    fn test_last_sort_directive_wins() {
        let raw = json!([
            {"field": "asc", "value": "DisplayName"},
            {"field": "desc", "value": "Balance"}
        ]);
        assert_eq!(
            compiled("Customer", raw),
            "SELECT * FROM Customer ORDER BY Balance DESC"
        );
    }

    #[test]
    fn test_count_collapses_the_query_wherever_it_appears() {
        let raw = json!([
            {"field": "Active", "value": true},
            {"field": "count", "value": true},
            {"field": "limit", "value": 5}
        ]);
        assert_eq!(compiled("Customer", raw), "SELECT COUNT(*) FROM Customer");
        assert_eq!(
            compiled("Vendor", json!({"count": "1"})),
            "SELECT COUNT(*) FROM Vendor"
        );
    }

    #[test]
    fn test_falsy_count_is_ignored() {
        let raw = json!([
            {"field": "count", "value": false},
            {"field": "Active", "value": true}
        ]);
        assert_eq!(
            compiled("Customer", raw),
            "SELECT * FROM Customer WHERE Active = true"
        );
    }

    #[test]
    fn test_fetch_all_leaves_the_query_unchanged() {
        let with = json!({"filters": [{"field": "Active", "value": true}], "fetchAll": true});
        let without = json!({"filters": [{"field": "Active", "value": true}]});
        assert_eq!(compiled("Customer", with), compiled("Customer", without));
    }

    #[test]
    fn test_string_limit_and_offset_still_compile() {
        assert_eq!(
            compiled("Customer", json!({"limit": "10", "offset": "20"})),
            "SELECT * FROM Customer MAXRESULTS 10 STARTPOSITION 21"
        );
    }
}
