//! Entity read tool definition.
//!
//! Fetches one record of any supported entity by its ID.

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

/// Parameters for the entity read tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EntityGetParams {
    /// Entity type to read, e.g. "Customer" or "Invoice".
    #[schemars(description = "Entity type, e.g. 'Customer', 'Invoice', 'Bill'")]
    pub entity: String,

    /// Record ID.
    #[schemars(description = "The record's Id")]
    pub id: String,
}

/// Entity read tool.
pub struct EntityGetTool;

impl EntityGetTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "qb_entity_get";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Read one QuickBooks Online record by entity type and Id. Returns the full record, including the SyncToken needed for updates and deletes.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    pub async fn execute(params: &EntityGetParams, client: &QboClient) -> CallToolResult {
        if let Err(message) = validate_entity(&params.entity) {
            return error_result(&message);
        }

        info!(entity = %params.entity, id = %params.id, "Reading entity record");

        match client.read(&params.entity, &params.id).await {
            Ok(record) => structured_result(
                format!("{} {} retrieved", params.entity, params.id),
                record,
            ),
            Err(e) => error_result(&format!(
                "Failed to read {} {}: {}",
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

        let params = EntityGetParams {
            entity: require_str_arg(&arguments, "entity")?,
            id: require_str_arg(&arguments, "id")?,
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
            input_schema: cached_schema_for_type::<EntityGetParams>(),
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
                let params: EntityGetParams =
                    serde_json::from_value(serde_json::Value::Object(args))
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
    use crate::core::config::QboConfig;
    use rmcp::model::RawContent;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_entity_fails_before_any_request() {
        let client = QboClient::new(QboConfig::default()).unwrap();
        let params = EntityGetParams {
            entity: "Widget".to_string(),
            id: "1".to_string(),
        };
        let result = EntityGetTool::execute(&params, &client).await;
        assert!(result.is_error.unwrap_or(false));
        let RawContent::Text(text) = &result.content[0].raw else {
            panic!("Expected text content");
        };
        assert!(text.text.contains("Unknown entity"));
    }

    #[test]
    fn test_params_require_entity_and_id() {
        let params: Result<EntityGetParams, _> =
            serde_json::from_value(json!({"entity": "Customer"}));
        assert!(params.is_err());

        let params: EntityGetParams =
            serde_json::from_value(json!({"entity": "Customer", "id": "42"})).unwrap();
        assert_eq!(params.id, "42");
    }
}
