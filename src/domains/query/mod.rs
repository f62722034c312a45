//! Search-criteria compilation pipeline.
//!
//! Turns the loosely shaped criteria callers pass to the search tools into
//! QuickBooks Online query strings, in four stages:
//!
//! 1. [`criteria`] classifies and normalizes the raw JSON into one
//!    canonical form.
//! 2. [`fields`] holds the per-entity registry of filterable and sortable
//!    fields and their types.
//! 3. [`coerce`] converts each filter value to its field's declared type.
//! 4. [`sql`] renders the canonical, coerced criteria as a query string.
//!
//! [`plan`] runs the whole pipeline and is what the tool layer calls.

mod coerce;
mod criteria;
mod error;
mod fields;
mod plan;
mod sql;

pub use coerce::{coerce_criteria, coerce_filter};
pub use criteria::{
    classify, is_reserved, normalize, AdvancedOptions, CanonicalCriteria, Directives, Filter,
    FilterValue, Operator, RawCriteria, RESERVED_KEYWORDS,
};
pub use error::QueryError;
pub use fields::{
    entity_fields, field_spec, filterable_fields, known_entities, sortable_fields, FieldSpec,
    FieldType,
};
pub use plan::{plan, PreparedQuery};
pub use sql::{compile, render_value};
