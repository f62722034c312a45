//! Filter value coercion.
//!
//! Values arrive as whatever JSON the caller happened to write; before
//! compilation each one is converted to the primitive type the field
//! registry declares for its field. Directive entries and fields with no
//! registry entry pass through untouched, and list values are coerced
//! element-wise for IN filters.

use serde_json::Number;

use super::criteria::{CanonicalCriteria, Filter, FilterValue};
use super::error::QueryError;
use super::fields::{self, FieldType};

/// Coerce every filter value in canonical criteria for `entity`.
pub fn coerce_criteria(
    entity: &str,
    criteria: &CanonicalCriteria,
) -> Result<CanonicalCriteria, QueryError> {
    Ok(match criteria {
        CanonicalCriteria::Filters(entries) => CanonicalCriteria::Filters(
            entries
                .iter()
                .map(|entry| coerce_filter(entity, entry))
                .collect::<Result<_, _>>()?,
        ),
        CanonicalCriteria::Simple(pairs) => CanonicalCriteria::Simple(
            pairs
                .iter()
                .map(|(field, value)| {
                    let value = match fields::field_spec(entity, field) {
                        Some(spec) => coerce_value(field, spec.kind, value)?,
                        None => value.clone(),
                    };
                    Ok((field.clone(), value))
                })
                .collect::<Result<_, QueryError>>()?,
        ),
    })
}

/// Coerce one entry's value to its field's declared type. Entries whose
/// field has no registry entry, including directives, come back unchanged.
pub fn coerce_filter(entity: &str, entry: &Filter) -> Result<Filter, QueryError> {
    let value = match fields::field_spec(entity, &entry.field) {
        Some(spec) => coerce_value(&entry.field, spec.kind, &entry.value)?,
        None => entry.value.clone(),
    };
    Ok(Filter {
        field: entry.field.clone(),
        value,
        operator: entry.operator,
    })
}

fn coerce_value(
    field: &str,
    kind: FieldType,
    value: &FilterValue,
) -> Result<FilterValue, QueryError> {
    if let FilterValue::List(items) = value {
        let items = items
            .iter()
            .map(|item| coerce_value(field, kind, item))
            .collect::<Result<_, _>>()?;
        return Ok(FilterValue::List(items));
    }
    Ok(match kind {
        // Dates stay opaque strings; the remote side parses them.
        FieldType::String | FieldType::Date => FilterValue::String(stringify(value)),
        FieldType::Number => FilterValue::Number(to_number(field, value)?),
        FieldType::Boolean => FilterValue::Bool(value.is_truthy()),
    })
}

fn stringify(value: &FilterValue) -> String {
    match value {
        FilterValue::String(s) => s.clone(),
        FilterValue::Number(n) => n.to_string(),
        FilterValue::Bool(b) => b.to_string(),
        // Lists are handled element-wise before this point.
        FilterValue::List(items) => items
            .iter()
            .map(stringify)
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// Integer parse first so `"0"` stays `0` rather than becoming `0.0`.
fn to_number(field: &str, value: &FilterValue) -> Result<Number, QueryError> {
    match value {
        FilterValue::Number(n) => Ok(n.clone()),
        FilterValue::Bool(b) => Ok(Number::from(*b as i64)),
        FilterValue::String(s) => {
            let trimmed = s.trim();
            if let Ok(int) = trimmed.parse::<i64>() {
                return Ok(Number::from(int));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .ok_or_else(|| QueryError::type_mismatch(field, FieldType::Number))
        }
        FilterValue::List(_) => Err(QueryError::type_mismatch(field, FieldType::Number)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::query::criteria::Operator;
    use crate::domains::query::fields::known_entities;

    fn coerced(entity: &str, field: &str, value: FilterValue) -> FilterValue {
        coerce_filter(entity, &Filter::new(field, value))
            .unwrap()
            .value
    }

    #[test]
    fn test_boolean_coercion_accepts_only_the_truthy_forms() {
        for value in [
            FilterValue::from(true),
            FilterValue::from("true"),
            FilterValue::from("1"),
            FilterValue::from(1),
        ] {
            assert_eq!(
                coerced("Customer", "Active", value),
                FilterValue::Bool(true)
            );
        }
        for value in [
            FilterValue::from(false),
            FilterValue::from("false"),
            FilterValue::from("yes"),
            FilterValue::from("True"),
            FilterValue::from(0),
        ] {
            assert_eq!(
                coerced("Customer", "Active", value),
                FilterValue::Bool(false)
            );
        }
    }

    #[test]
    fn test_boolean_rule_holds_for_every_registered_boolean_field() {
        for entity in known_entities() {
            for spec in fields::entity_fields(entity).unwrap() {
                if spec.kind != FieldType::Boolean {
                    continue;
                }
                assert_eq!(
                    coerced(entity, spec.name, FilterValue::from("true")),
                    FilterValue::Bool(true),
                    "{entity}.{}",
                    spec.name
                );
                assert_eq!(
                    coerced(entity, spec.name, FilterValue::from("0")),
                    FilterValue::Bool(false),
                    "{entity}.{}",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn test_numeric_string_keeps_integer_form() {
        let value = coerced("Invoice", "Balance", FilterValue::from("0"));
        assert_eq!(value, FilterValue::Number(0.into()));
        assert_eq!(serde_json::to_string(&value).unwrap(), "0");
    }

    #[test]
    fn test_decimal_string_parses_as_float() {
        let value = coerced("Invoice", "TotalAmt", FilterValue::from("99.5"));
        let FilterValue::Number(n) = value else {
            panic!("expected a number");
        };
        assert_eq!(n.as_f64(), Some(99.5));
    }

    #[test]
    fn test_unparsable_number_is_a_type_mismatch() {
        let err = coerce_filter("Invoice", &Filter::new("Balance", "overdue")).unwrap_err();
        assert!(matches!(
            err,
            QueryError::TypeMismatch { ref field, expected: FieldType::Number } if field == "Balance"
        ));
        assert!(coerce_filter("Invoice", &Filter::new("Balance", "")).is_err());
    }

    #[test]
    fn test_boolean_becomes_number_for_numeric_fields() {
        assert_eq!(
            coerced("Invoice", "Balance", FilterValue::from(true)),
            FilterValue::Number(1.into())
        );
        assert_eq!(
            coerced("Invoice", "Balance", FilterValue::from(false)),
            FilterValue::Number(0.into())
        );
    }

    #[test]
    fn test_numbers_and_booleans_stringify_for_string_fields() {
        assert_eq!(
            coerced("Customer", "DisplayName", FilterValue::from(42)),
            FilterValue::from("42")
        );
        assert_eq!(
            coerced("Customer", "DisplayName", FilterValue::from(true)),
            FilterValue::from("true")
        );
    }

    #[test]
    fn test_dates_pass_through_as_strings_unparsed() {
        assert_eq!(
            coerced("Invoice", "TxnDate", FilterValue::from("2024-13-45")),
            FilterValue::from("2024-13-45")
        );
        assert_eq!(
            coerced("Invoice", "TxnDate", FilterValue::from(2024)),
            FilterValue::from("2024")
        );
    }

    #[test]
    fn test_unregistered_field_passes_through() {
        assert_eq!(
            coerced("Customer", "CustomField1", FilterValue::from("7")),
            FilterValue::from("7")
        );
    }

    #[test]
    fn test_directive_entries_are_untouched() {
        let entry = Filter::new("limit", "25");
        assert_eq!(coerce_filter("Customer", &entry).unwrap(), entry);
    }

    #[test]
    fn test_list_values_coerce_element_wise() {
        let entry = Filter::with_operator(
            "Balance",
            FilterValue::List(vec![FilterValue::from("10"), FilterValue::from(20)]),
            Operator::In,
        );
        let value = coerce_filter("Invoice", &entry).unwrap().value;
        assert_eq!(
            value,
            FilterValue::List(vec![
                FilterValue::Number(10.into()),
                FilterValue::Number(20.into()),
            ])
        );
    }

    #[test]
    fn test_simple_map_values_are_coerced_too() {
        let criteria = CanonicalCriteria::Simple(vec![
            ("Active".to_string(), FilterValue::from("1")),
            ("Balance".to_string(), FilterValue::from("15")),
        ]);
        let coerced = coerce_criteria("Customer", &criteria).unwrap();
        assert_eq!(
            coerced,
            CanonicalCriteria::Simple(vec![
                ("Active".to_string(), FilterValue::Bool(true)),
                ("Balance".to_string(), FilterValue::Number(15.into())),
            ])
        );
    }
}
