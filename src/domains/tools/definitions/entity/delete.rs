//! Entity delete tool definition.

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

use super::validate_entity;
use crate::domains::qbo::QboClient;
use crate::domains::tools::definitions::common::{error_result, structured_result};

/// Parameters for the entity delete tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EntityDeleteParams {
    /// Entity type to delete, e.g. "Invoice".
    #[schemars(description = "Entity type, e.g. 'Customer', 'Invoice', 'Bill'")]
    pub entity: String,

    /// Record ID.
    #[schemars(description = "The record's Id")]
    pub id: String,

    /// The record's current sync token.
    #[schemars(description = "The record's current SyncToken (read the record first to obtain it)")]
    pub sync_token: String,
}

/// Entity delete tool.
pub struct EntityDeleteTool;

impl EntityDeleteTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "qb_entity_delete";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Delete a QuickBooks Online record by entity type, Id, and current SyncToken. Transaction entities are hard-deleted; name-list entities such as Customer are made inactive instead, per API rules.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    pub async fn execute(params: &EntityDeleteParams, client: &QboClient) -> CallToolResult {
        if let Err(message) = validate_entity(&params.entity) {
            return error_result(&message);
        }

        info!(entity = %params.entity, id = %params.id, "Deleting entity record");

        match client
            .delete(&params.entity, &params.id, &params.sync_token)
            .await
        {
            Ok(record) => structured_result(
                format!("{} {} deleted", params.entity, params.id),
                record,
            ),
            Err(e) => error_result(&format!(
                "Failed to delete {} {}: {}",
                params.entity, params.id, e
            )),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<QboClient>,
    ) -> Result<serde_json::Value, String> {
        use crate::domains::tools::definitions::common::require_str_arg;

        let params = EntityDeleteParams {
            entity: require_str_arg(&arguments, "entity")?,
            id: require_str_arg(&arguments, "id")?,
            sync_token: require_str_arg(&arguments, "sync_token")?,
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
            input_schema: cached_schema_for_type::<EntityDeleteParams>(),
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
                let params: EntityDeleteParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}
