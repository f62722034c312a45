//! Entity search tools.
//!
//! One tool per QuickBooks entity, all sharing the same parameter shape and
//! the same pipeline: plan the criteria into a query string, then either
//! count, fetch every page, or run the single compiled query. Each entity
//! gets its own tool so clients see focused names and descriptions instead
//! of one catch-all.

mod account;
mod bill;
mod credit_memo;
mod customer;
mod employee;
mod estimate;
mod invoice;
mod item;
mod payment;
mod purchase;
mod vendor;

pub use account::AccountSearchTool;
pub use bill::BillSearchTool;
pub use credit_memo::CreditMemoSearchTool;
pub use customer::CustomerSearchTool;
pub use employee::EmployeeSearchTool;
pub use estimate::EstimateSearchTool;
pub use invoice::InvoiceSearchTool;
pub use item::ItemSearchTool;
pub use payment::PaymentSearchTool;
pub use purchase::PurchaseSearchTool;
pub use vendor::VendorSearchTool;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::common::{error_result, rows_result, structured_result};
use crate::domains::qbo::{fetch_all_rows, QboClient};
use crate::domains::query::plan;

/// Parameters shared by every entity search tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Search criteria. Accepts three shapes: a plain {field: value} object
    /// (implicit equality), an array of {field, value, operator} filters,
    /// or an object with a `filters` array plus any of asc, desc, limit,
    /// offset, count, fetchAll. Omit it to list all records.
    #[schemars(
        description = "Search criteria: {field: value} object, [{field, value, operator}] array, or {filters: [...], asc, desc, limit, offset, count, fetchAll}. Omit to list all records."
    )]
    #[serde(default)]
    pub criteria: Option<Value>,
}

/// Shared search pipeline: plan, dispatch, shape the result.
pub(crate) async fn run_search(
    entity: &'static str,
    params: &SearchParams,
    client: &QboClient,
) -> CallToolResult {
    let empty = json!({});
    let raw = params.criteria.as_ref().unwrap_or(&empty);

    let prepared = match plan(entity, raw) {
        Ok(prepared) => prepared,
        Err(e) => return error_result(&e.to_string()),
    };

    info!(entity = %entity, query = %prepared.sql, "Running entity search");

    if prepared.count_only {
        return match client.query_count(&prepared.sql).await {
            Ok(total) => structured_result(
                format!("{} {} record(s) match", total, entity),
                json!({"entity": entity, "totalCount": total}),
            ),
            Err(e) => error_result(&format!("{} count failed: {}", entity, e)),
        };
    }

    let rows = if prepared.fetch_all {
        fetch_all_rows(client, entity, &prepared.criteria).await
    } else {
        client.query(entity, &prepared.sql).await
    };

    match rows {
        Ok(rows) => rows_result(entity, rows),
        Err(e) => error_result(&format!("{} search failed: {}", entity, e)),
    }
}

/// Shared HTTP handler: pull `criteria` out of the raw arguments and run
/// the same pipeline as the rmcp route.
#[cfg(feature = "http")]
pub(crate) async fn search_http_handler(
    entity: &'static str,
    arguments: Value,
    client: std::sync::Arc<QboClient>,
) -> Result<Value, String> {
    let params = SearchParams {
        criteria: arguments.get("criteria").cloned(),
    };

    let result = run_search(entity, &params, &client).await;

    Ok(json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::QboConfig;

    fn offline_client() -> QboClient {
        QboClient::new(QboConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_bad_criteria_fail_before_any_network_call() {
        // No credentials configured, so reaching the network would also
        // fail, but with a different message.
        let params = SearchParams {
            criteria: Some(json!({"NotAField": 1})),
        };
        let result = run_search("Customer", &params, &offline_client()).await;
        assert!(result.is_error.unwrap_or(false));
        let rmcp::model::RawContent::Text(text) = &result.content[0].raw else {
            panic!("Expected text content");
        };
        assert!(text.text.contains("NotAField"));
        assert!(text.text.contains("Filterable fields"));
    }

    #[tokio::test]
    async fn test_unconfigured_connection_is_reported_per_call() {
        let params = SearchParams { criteria: None };
        let result = run_search("Customer", &params, &offline_client()).await;
        assert!(result.is_error.unwrap_or(false));
        let rmcp::model::RawContent::Text(text) = &result.content[0].raw else {
            panic!("Expected text content");
        };
        assert!(text.text.contains("MCP_QBO_REALM_ID"));
    }
}
