//! Search criteria documentation resource definition.

use super::ResourceDefinition;
use crate::domains::resources::service::ResourceContent;

/// Criteria syntax guide resource (static Markdown).
///
/// Documents the criteria object accepted by every `qb_*_search` tool so
/// clients can construct filters without trial and error.
pub struct SearchCriteriaDocsResource;

impl ResourceDefinition for SearchCriteriaDocsResource {
    const URI: &'static str = "qbo://docs/search-criteria";
    const NAME: &'static str = "Search Criteria Guide";
    const DESCRIPTION: &'static str =
        "How to build the criteria object accepted by the search tools";
    const MIME_TYPE: &'static str = "text/markdown";

    fn content() -> ResourceContent {
        ResourceContent::Text(DOCUMENTATION.to_string())
    }
}

const DOCUMENTATION: &str = r#"# Search Criteria Guide

Every `qb_*_search` tool accepts an optional `criteria` object that is
compiled into a QuickBooks Online query. Three shapes are accepted.

## 1. Simple object

Plain field/value pairs become equality conditions joined with AND:

```json
{ "DisplayName": "Acme Corp", "Active": true }
```

## 2. Filter array

An array of filter objects, each with `field`, `value`, and an optional
`operator` (`=` when omitted):

```json
[
  { "field": "Balance", "value": 100, "operator": ">" },
  { "field": "DisplayName", "value": "A%", "operator": "LIKE" }
]
```

Supported operators: `=`, `<`, `<=`, `>`, `>=`, `LIKE`, `IN`.
`LIKE` uses `%` as the wildcard. `IN` takes an array value.

## 3. Advanced object

A `filters` array plus reserved directive keywords:

```json
{
  "filters": [ { "field": "Balance", "value": 0, "operator": ">" } ],
  "desc": "Balance",
  "limit": 25,
  "offset": 50
}
```

Reserved keywords (never treated as entity fields):

| Keyword    | Effect                                             |
|------------|----------------------------------------------------|
| `asc`      | Sort ascending by the named field                  |
| `desc`     | Sort descending by the named field                 |
| `limit`    | Maximum number of rows returned (page size)        |
| `offset`   | Number of rows to skip before the first result     |
| `count`    | When truthy, return only the matching record count |
| `fetchAll` | When truthy, page through every matching record    |

Reserved keywords may also appear alongside plain field/value pairs in a
simple object; the fields become equality filters and the keywords keep
their directive meaning.

## Values

- Boolean fields accept `true`/`false` as well as `"true"`, `1`, and `"1"`.
- Numeric fields accept numbers or numeric strings (`"42"`, `"99.5"`).
- Date fields take ISO 8601 strings (`"2024-03-01"`) and are passed through
  verbatim, so range filters use `>=` / `<` pairs.
- Strings are quoted and escaped automatically.

## Field catalogs

Read `qbo://fields/{Entity}` (for example `qbo://fields/Customer`) for the
queryable fields of each entity, their types, and whether they sort.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_metadata() {
        assert_eq!(SearchCriteriaDocsResource::URI, "qbo://docs/search-criteria");
        assert_eq!(SearchCriteriaDocsResource::MIME_TYPE, "text/markdown");
    }

    #[test]
    fn test_docs_cover_directives() {
        match SearchCriteriaDocsResource::content() {
            ResourceContent::Text(text) => {
                for keyword in ["asc", "desc", "limit", "offset", "count", "fetchAll"] {
                    assert!(text.contains(keyword), "missing keyword {}", keyword);
                }
                assert!(text.contains("LIKE"));
            }
            _ => panic!("Expected text content"),
        }
    }
}
