//! Entity update tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::validate_entity;
use crate::domains::qbo::QboClient;
use crate::domains::tools::definitions::common::{error_result, structured_result};

/// Parameters for the entity update tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EntityUpdateParams {
    /// Entity type to update, e.g. "Customer" or "Invoice".
    #[schemars(description = "Entity type, e.g. 'Customer', 'Invoice', 'Bill'")]
    pub entity: String,

    /// The record body including `Id` and the current `SyncToken`.
    #[schemars(
        description = "Full record payload including Id and the current SyncToken (read the record first to obtain it)"
    )]
    pub payload: Value,
}

/// Entity update tool.
pub struct EntityUpdateTool;

impl EntityUpdateTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "qb_entity_update";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Update a QuickBooks Online record. The payload must carry the record's Id and its current SyncToken (fetch the record first; the API rejects stale tokens). Fields not present in the payload are cleared by the API's full-update semantics, so send the complete record.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    pub async fn execute(params: &EntityUpdateParams, client: &QboClient) -> CallToolResult {
        if let Err(message) = validate_entity(&params.entity) {
            return error_result(&message);
        }
        let Some(payload) = params.payload.as_object() else {
            return error_result("The 'payload' parameter must be a JSON object");
        };
        for required in ["Id", "SyncToken"] {
            if !payload.contains_key(required) {
                return error_result(&format!(
                    "Update payload for {} is missing '{}'",
                    params.entity, required
                ));
            }
        }

        info!(
            entity = %params.entity,
            id = %params.payload["Id"],
            "Updating entity record"
        );

        match client.update(&params.entity, &params.payload).await {
            Ok(record) => {
                let id = record["Id"].as_str().unwrap_or("?").to_string();
                structured_result(format!("{} {} updated", params.entity, id), record)
            }
            Err(e) => error_result(&format!("Failed to update {}: {}", params.entity, e)),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<QboClient>,
    ) -> Result<serde_json::Value, String> {
        use crate::domains::tools::definitions::common::require_str_arg;

        let params = EntityUpdateParams {
            entity: require_str_arg(&arguments, "entity")?,
            payload: arguments
                .get("payload")
                .cloned()
                .ok_or_else(|| "Missing 'payload' parameter".to_string())?,
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
            input_schema: cached_schema_for_type::<EntityUpdateParams>(),
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
                let params: EntityUpdateParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}
