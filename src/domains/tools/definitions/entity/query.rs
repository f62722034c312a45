//! Raw query tool definition.
//!
//! Escape hatch for queries the structured criteria cannot express. The
//! query string is forwarded to the API verbatim; the remote engine is the
//! only validator.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::domains::qbo::QboClient;
use crate::domains::tools::definitions::common::{error_result, structured_result};

/// Parameters for the raw query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RawQueryParams {
    /// Data Query Language statement.
    #[schemars(
        description = "Query statement, e.g. \"SELECT * FROM Customer WHERE Active = true MAXRESULTS 20\""
    )]
    pub query: String,
}

/// Raw query tool.
pub struct RawQueryTool;

impl RawQueryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "qb_query";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Run a raw QuickBooks Online Data Query Language statement and return the QueryResponse body unchanged. Use the entity search tools for structured criteria; this tool is for queries they cannot express. The statement is not validated locally.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    pub async fn execute(params: &RawQueryParams, client: &QboClient) -> CallToolResult {
        let query = params.query.trim();
        if query.is_empty() {
            return error_result("The 'query' parameter must not be empty");
        }

        info!(query = %query, "Running raw query");

        match client.query_raw(query).await {
            Ok(body) => structured_result("Query executed".to_string(), body),
            Err(e) => error_result(&format!("Query failed: {}", e)),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<QboClient>,
    ) -> Result<serde_json::Value, String> {
        use crate::domains::tools::definitions::common::require_str_arg;

        let params = RawQueryParams {
            query: require_str_arg(&arguments, "query")?,
        };

        let result = Self::execute(&params, &client).await;

        Ok(serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        }))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<RawQueryParams>(),
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
                let params: RawQueryParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}
