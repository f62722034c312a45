//! Credit memo search tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use std::sync::Arc;

use super::{run_search, SearchParams};
use crate::domains::qbo::QboClient;

/// Credit memo search tool.
pub struct CreditMemoSearchTool;

impl CreditMemoSearchTool {
    /// Entity this tool searches.
    pub const ENTITY: &'static str = "CreditMemo";

    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "qb_credit_memo_search";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search QuickBooks Online credit memos. Criteria can be a plain {field: value} object, an array of {field, value, operator} filters, or an object with a 'filters' array plus asc/desc/limit/offset/count/fetchAll options. Filterable fields include DocNumber, TxnDate, CustomerRef, TotalAmt, Balance, RemainingCredit, and MetaData timestamps.";

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
