//! Customer search tool definition.
//!
//! Finds customers matching structured search criteria.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use std::sync::Arc;

use super::{run_search, SearchParams};
use crate::domains::qbo::QboClient;

/// Customer search tool.
pub struct CustomerSearchTool;

impl CustomerSearchTool {
    /// Entity this tool searches.
    pub const ENTITY: &'static str = "Customer";

    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "qb_customer_search";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search QuickBooks Online customers. Criteria can be a plain {field: value} object for equality matches, an array of {field, value, operator} filters (operators: =, <, >, <=, >=, LIKE, IN), or an object with a 'filters' array plus asc/desc/limit/offset/count/fetchAll options. Filterable fields include DisplayName, CompanyName, GivenName, FamilyName, Active, Balance, and MetaData timestamps.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    pub async fn execute(params: &SearchParams, client: &QboClient) -> CallToolResult {
        run_search(Self::ENTITY, params, client).await
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<QboClient>,
    ) -> Result<serde_json::Value, String> {
        super::search_http_handler(Self::ENTITY, arguments, client).await
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SearchParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(client: Arc<QboClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let client = client.clone();
            async move {
                let params: SearchParams = serde_json::from_value(serde_json::Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::query::plan;
    use serde_json::json;

    #[test]
    fn test_params_accept_all_criteria_shapes() {
        let simple: SearchParams =
            serde_json::from_value(json!({"criteria": {"DisplayName": "Acme"}})).unwrap();
        assert!(simple.criteria.is_some());

        let array: SearchParams = serde_json::from_value(
            json!({"criteria": [{"field": "Balance", "value": 0, "operator": ">"}]}),
        )
        .unwrap();
        assert!(array.criteria.unwrap().is_array());

        let none: SearchParams = serde_json::from_value(json!({})).unwrap();
        assert!(none.criteria.is_none());
    }

    #[test]
    fn test_customer_criteria_compile() {
        let prepared = plan(
            CustomerSearchTool::ENTITY,
            &json!({"DisplayName": "O'Brien Supplies"}),
        )
        .unwrap();
        assert_eq!(
            prepared.sql,
            "SELECT * FROM Customer WHERE DisplayName = 'O\\'Brien Supplies'"
        );
    }

    #[test]
    fn test_customer_balance_sort_and_window() {
        let prepared = plan(
            CustomerSearchTool::ENTITY,
            &json!({"desc": "Balance", "limit": 10, "offset": 20}),
        )
        .unwrap();
        assert_eq!(
            prepared.sql,
            "SELECT * FROM Customer ORDER BY Balance DESC MAXRESULTS 10 STARTPOSITION 21"
        );
    }

    // Integration test (requires credentials, run with: cargo test -- --ignored)
    #[ignore = "requires live QuickBooks credentials in the environment"]
    #[tokio::test]
    async fn test_live_customer_search() {
        let config = crate::core::config::Config::from_env();
        let client = QboClient::new(config.qbo).unwrap();
        let params = SearchParams {
            criteria: Some(json!({"limit": 3})),
        };
        let result = CustomerSearchTool::execute(&params, &client).await;
        assert!(!result.is_error.unwrap_or(true), "Expected success");
    }
}
