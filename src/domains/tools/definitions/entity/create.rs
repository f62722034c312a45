//! Entity create tool definition.

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

/// Parameters for the entity create tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EntityCreateParams {
    /// Entity type to create, e.g. "Customer" or "Invoice".
    #[schemars(description = "Entity type, e.g. 'Customer', 'Invoice', 'Bill'")]
    pub entity: String,

    /// The record body, passed to the API as-is.
    #[schemars(
        description = "Record payload in the entity's API shape, e.g. {\"DisplayName\": \"Acme\"} for a Customer"
    )]
    pub payload: Value,
}

/// Entity create tool.
pub struct EntityCreateTool;

impl EntityCreateTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "qb_entity_create";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Create a QuickBooks Online record. The payload is sent to the API unchanged, so it must follow the entity's documented shape (for example a Customer needs DisplayName, an Invoice needs CustomerRef and at least one Line). Returns the created record with its assigned Id.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    pub async fn execute(params: &EntityCreateParams, client: &QboClient) -> CallToolResult {
        if let Err(message) = validate_entity(&params.entity) {
            return error_result(&message);
        }
        if !params.payload.is_object() {
            return error_result("The 'payload' parameter must be a JSON object");
        }

        info!(entity = %params.entity, "Creating entity record");

        match client.create(&params.entity, &params.payload).await {
            Ok(record) => {
                let id = record["Id"].as_str().unwrap_or("?").to_string();
                structured_result(format!("{} {} created", params.entity, id), record)
            }
            Err(e) => error_result(&format!("Failed to create {}: {}", params.entity, e)),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<QboClient>,
    ) -> Result<serde_json::Value, String> {
        use crate::domains::tools::definitions::common::require_str_arg;

        let params = EntityCreateParams {
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
            input_schema: cached_schema_for_type::<EntityCreateParams>(),
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
                let params: EntityCreateParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}
