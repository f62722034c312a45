//! Search-criteria normalization.
//!
//! Callers describe what they want in one of three JSON shapes: a bare
//! filter array, an advanced object carrying a `filters` key plus
//! pagination/sort options, or a flat field-to-value map of implicit
//! equality filters. [`normalize`] folds all of them into a single
//! canonical form so the downstream coercion and compilation stages only
//! ever see one representation.
//!
//! Classification is driven entirely by the key set of the incoming value.
//! A handful of reserved keywords ([`RESERVED_KEYWORDS`]) double as
//! pagination/sort directives; a plain map that uses one of them is treated
//! as the mixed shape and split apart rather than silently misread.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::QueryError;

/// Keys that carry pagination, sort, or count directives instead of field
/// filters. Entity fields never use these names.
pub const RESERVED_KEYWORDS: &[&str] = &["asc", "desc", "limit", "offset", "count", "fetchAll"];

/// Key that marks the advanced criteria shape.
const FILTERS_KEY: &str = "filters";

/// Whether `key` is one of the reserved directive keywords.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYWORDS.contains(&key)
}

/// A primitive (or list-of-primitive) filter value.
///
/// Numbers are kept as [`serde_json::Number`] so integer literals survive
/// all the way to the query string without growing a decimal point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// Element list for IN-style filters.
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// True for `true`, `"true"`, `1` and `"1"`; false for everything else.
    ///
    /// This one rule decides boolean field coercion and whether `count` and
    /// `fetchAll` directives are switched on.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => n.as_f64() == Some(1.0),
            Self::String(s) => s == "true" || s == "1",
            Self::List(_) => false,
        }
    }

    /// Borrow the string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer view used by the `limit` and `offset` directives. Strings
    /// holding an integer are accepted; anything else is `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Comparison operator carried by a filter. Defaults to equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "IN")]
    In,
}

impl Operator {
    /// Token emitted into the query string.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Like => "LIKE",
            Self::In => "IN",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One canonical criteria entry.
///
/// Either a field condition destined for the WHERE clause, or a directive
/// whose `field` is one of the reserved keywords. A missing `operator`
/// means equality; entries arriving through the filter-array shape keep
/// whatever the caller wrote, untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub value: FilterValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
}

impl Filter {
    /// Entry without an explicit operator.
    pub fn new(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            operator: None,
        }
    }

    /// Entry with an explicit comparison operator.
    pub fn with_operator(
        field: impl Into<String>,
        value: impl Into<FilterValue>,
        operator: Operator,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            operator: Some(operator),
        }
    }

    /// Effective operator: the explicit one, or the `=` default.
    pub fn operator(&self) -> Operator {
        self.operator.unwrap_or_default()
    }

    /// Whether this entry carries a directive rather than a WHERE condition.
    pub fn is_directive(&self) -> bool {
        is_reserved(&self.field)
    }
}

/// The advanced criteria shape: explicit filters plus pagination and sort
/// options at top level. Unknown extra keys are ignored. Sort targets and
/// window values arrive untyped; the planner validates them against the
/// field registry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedOptions {
    #[serde(default)]
    pub filters: Option<Vec<Filter>>,
    #[serde(default)]
    pub asc: Option<FilterValue>,
    #[serde(default)]
    pub desc: Option<FilterValue>,
    #[serde(default)]
    pub limit: Option<FilterValue>,
    #[serde(default)]
    pub offset: Option<FilterValue>,
    #[serde(default)]
    pub count: Option<FilterValue>,
    #[serde(default)]
    pub fetch_all: Option<FilterValue>,
}

/// Raw criteria classified by shape, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCriteria {
    /// No conditions and no directives: match every record.
    Empty,
    /// Bare filter array, already in canonical entry form.
    FilterArray(Vec<Filter>),
    /// Advanced object, or an object made purely of directive keys.
    Advanced(AdvancedOptions),
    /// Flat field-to-value map of implicit equality filters.
    Simple(Vec<(String, FilterValue)>),
    /// Discouraged mix of reserved and plain keys, split rather than
    /// misread as field names.
    Mixed {
        directives: Vec<Filter>,
        equals: Vec<(String, FilterValue)>,
    },
}

/// Criteria in the single normalized form the compiler accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalCriteria {
    /// Explicit entries: conditions and directives in order.
    Filters(Vec<Filter>),
    /// The flat equality map, passed through untouched.
    Simple(Vec<(String, FilterValue)>),
}

impl CanonicalCriteria {
    /// "All records": no conditions, no directives.
    pub fn empty() -> Self {
        Self::Simple(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Filters(entries) => entries.is_empty(),
            Self::Simple(pairs) => pairs.is_empty(),
        }
    }

    /// Scan directive entries into a flat summary. Plain conditions and the
    /// simple map carry no directives. Later duplicates win for `limit` and
    /// `offset`; `count` and `fetchAll` stick once switched on.
    pub fn directives(&self) -> Directives {
        let mut out = Directives::default();
        if let Self::Filters(entries) = self {
            for entry in entries {
                match entry.field.as_str() {
                    "count" => out.count = out.count || entry.value.is_truthy(),
                    "fetchAll" => out.fetch_all = out.fetch_all || entry.value.is_truthy(),
                    "limit" => out.limit = entry.value.as_i64(),
                    "offset" => out.offset = entry.value.as_i64(),
                    _ => {}
                }
            }
        }
        out
    }

    /// Copy of these criteria with pagination replaced by an explicit window
    /// and any `fetchAll` directive removed. The paging loop recompiles one
    /// query per window from this.
    pub fn paged(&self, limit: i64, offset: i64) -> CanonicalCriteria {
        let mut entries: Vec<Filter> = match self {
            Self::Filters(entries) => entries
                .iter()
                .filter(|entry| !matches!(entry.field.as_str(), "limit" | "offset" | "fetchAll"))
                .cloned()
                .collect(),
            Self::Simple(pairs) => pairs
                .iter()
                .map(|(field, value)| Filter {
                    field: field.clone(),
                    value: value.clone(),
                    operator: Some(Operator::Eq),
                })
                .collect(),
        };
        entries.push(Filter::new("limit", limit));
        entries.push(Filter::new("offset", offset));
        CanonicalCriteria::Filters(entries)
    }
}

/// Pagination, sort, and count directives carried by canonical criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directives {
    pub count: bool,
    pub fetch_all: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Classify raw criteria by shape without changing them.
///
/// The decision order matters: arrays first, then the `filters` key, then
/// the reserved-key census of plain objects. Scalars and `null` are not
/// criteria and are rejected.
pub fn classify(raw: &Value) -> Result<RawCriteria, QueryError> {
    match raw {
        Value::Array(entries) => {
            let filters = entries
                .iter()
                .map(parse_filter)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RawCriteria::FilterArray(filters))
        }
        Value::Object(map) => {
            if map.is_empty() {
                return Ok(RawCriteria::Empty);
            }
            if map.contains_key(FILTERS_KEY) {
                return Ok(RawCriteria::Advanced(parse_advanced(raw)?));
            }
            let reserved = map.keys().filter(|key| is_reserved(key)).count();
            if reserved == map.len() {
                Ok(RawCriteria::Advanced(parse_advanced(raw)?))
            } else if reserved == 0 {
                let pairs = map
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), parse_value(value)?)))
                    .collect::<Result<Vec<_>, QueryError>>()?;
                Ok(RawCriteria::Simple(pairs))
            } else {
                let mut directives = Vec::new();
                let mut equals = Vec::new();
                for (key, value) in map {
                    let value = parse_value(value)?;
                    if is_reserved(key) {
                        directives.push(Filter::new(key.clone(), value));
                    } else {
                        equals.push((key.clone(), value));
                    }
                }
                Ok(RawCriteria::Mixed { directives, equals })
            }
        }
        other => Err(QueryError::invalid_criteria(format!(
            "expected an object or an array of filters, got {}",
            json_type_name(other)
        ))),
    }
}

/// Fold raw criteria of any accepted shape into canonical form.
///
/// Idempotent over its own output: feeding the serialized canonical entries
/// back in classifies as a filter array and comes out unchanged.
pub fn normalize(raw: &Value) -> Result<CanonicalCriteria, QueryError> {
    Ok(match classify(raw)? {
        RawCriteria::Empty => CanonicalCriteria::empty(),
        RawCriteria::FilterArray(filters) => CanonicalCriteria::Filters(filters),
        RawCriteria::Advanced(options) => {
            let entries = advanced_entries(options);
            if entries.is_empty() {
                CanonicalCriteria::empty()
            } else {
                CanonicalCriteria::Filters(entries)
            }
        }
        RawCriteria::Simple(pairs) => CanonicalCriteria::Simple(pairs),
        RawCriteria::Mixed { directives, equals } => {
            let mut entries: Vec<Filter> = equals
                .into_iter()
                .map(|(field, value)| Filter {
                    field,
                    value,
                    operator: Some(Operator::Eq),
                })
                .collect();
            entries.extend(directives);
            CanonicalCriteria::Filters(entries)
        }
    })
}

/// Flatten an advanced object into canonical entries: the explicit filters
/// first, then one directive entry per present option. `count` and
/// `fetchAll` only survive when truthy.
fn advanced_entries(options: AdvancedOptions) -> Vec<Filter> {
    let mut entries = options.filters.unwrap_or_default();
    if let Some(target) = options.asc {
        entries.push(Filter::new("asc", target));
    }
    if let Some(target) = options.desc {
        entries.push(Filter::new("desc", target));
    }
    if let Some(limit) = options.limit {
        entries.push(Filter::new("limit", limit));
    }
    if let Some(offset) = options.offset {
        entries.push(Filter::new("offset", offset));
    }
    if options.count.as_ref().is_some_and(FilterValue::is_truthy) {
        entries.push(Filter::new("count", true));
    }
    if options.fetch_all.as_ref().is_some_and(FilterValue::is_truthy) {
        entries.push(Filter::new("fetchAll", true));
    }
    entries
}

fn parse_advanced(raw: &Value) -> Result<AdvancedOptions, QueryError> {
    serde_json::from_value(raw.clone())
        .map_err(|err| QueryError::invalid_criteria(format!("bad advanced criteria: {err}")))
}

fn parse_filter(raw: &Value) -> Result<Filter, QueryError> {
    serde_json::from_value(raw.clone()).map_err(|err| {
        QueryError::invalid_criteria(format!(
            "filter array entries must be {{field, value, operator?}} objects: {err}"
        ))
    })
}

fn parse_value(raw: &Value) -> Result<FilterValue, QueryError> {
    serde_json::from_value(raw.clone()).map_err(|_| {
        QueryError::invalid_criteria(format!(
            "unsupported filter value of type {}",
            json_type_name(raw)
        ))
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
