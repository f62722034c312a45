//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::domains::qbo::QboClient;

use super::definitions::{
    AccountSearchTool, BillSearchTool, CreditMemoSearchTool, CustomerSearchTool,
    EmployeeSearchTool, EntityCreateTool, EntityDeleteTool, EntityGetTool, EntityUpdateTool,
    EstimateSearchTool, InvoiceSearchTool, ItemSearchTool, PaymentSearchTool, PurchaseSearchTool,
    RawQueryTool, VendorSearchTool,
};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching HTTP tool calls (when http feature is enabled)
pub struct ToolRegistry {
    client: Arc<QboClient>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(client: Arc<QboClient>) -> Self {
        Self { client }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            AccountSearchTool::NAME,
            BillSearchTool::NAME,
            CreditMemoSearchTool::NAME,
            CustomerSearchTool::NAME,
            EmployeeSearchTool::NAME,
            EstimateSearchTool::NAME,
            InvoiceSearchTool::NAME,
            ItemSearchTool::NAME,
            PaymentSearchTool::NAME,
            PurchaseSearchTool::NAME,
            VendorSearchTool::NAME,
            EntityGetTool::NAME,
            EntityCreateTool::NAME,
            EntityUpdateTool::NAME,
            EntityDeleteTool::NAME,
            RawQueryTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO/TCP transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            AccountSearchTool::to_tool(),
            BillSearchTool::to_tool(),
            CreditMemoSearchTool::to_tool(),
            CustomerSearchTool::to_tool(),
            EmployeeSearchTool::to_tool(),
            EstimateSearchTool::to_tool(),
            InvoiceSearchTool::to_tool(),
            ItemSearchTool::to_tool(),
            PaymentSearchTool::to_tool(),
            PurchaseSearchTool::to_tool(),
            VendorSearchTool::to_tool(),
            EntityGetTool::to_tool(),
            EntityCreateTool::to_tool(),
            EntityUpdateTool::to_tool(),
            EntityDeleteTool::to_tool(),
            RawQueryTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// This is used by the HTTP transport to call tools.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let client = self.client.clone();
        match name {
            AccountSearchTool::NAME => AccountSearchTool::http_handler(arguments, client).await,
            BillSearchTool::NAME => BillSearchTool::http_handler(arguments, client).await,
            CreditMemoSearchTool::NAME => {
                CreditMemoSearchTool::http_handler(arguments, client).await
            }
            CustomerSearchTool::NAME => CustomerSearchTool::http_handler(arguments, client).await,
            EmployeeSearchTool::NAME => EmployeeSearchTool::http_handler(arguments, client).await,
            EstimateSearchTool::NAME => EstimateSearchTool::http_handler(arguments, client).await,
            InvoiceSearchTool::NAME => InvoiceSearchTool::http_handler(arguments, client).await,
            ItemSearchTool::NAME => ItemSearchTool::http_handler(arguments, client).await,
            PaymentSearchTool::NAME => PaymentSearchTool::http_handler(arguments, client).await,
            PurchaseSearchTool::NAME => PurchaseSearchTool::http_handler(arguments, client).await,
            VendorSearchTool::NAME => VendorSearchTool::http_handler(arguments, client).await,
            EntityGetTool::NAME => EntityGetTool::http_handler(arguments, client).await,
            EntityCreateTool::NAME => EntityCreateTool::http_handler(arguments, client).await,
            EntityUpdateTool::NAME => EntityUpdateTool::http_handler(arguments, client).await,
            EntityDeleteTool::NAME => EntityDeleteTool::http_handler(arguments, client).await,
            RawQueryTool::NAME => RawQueryTool::http_handler(arguments, client).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(super::ToolError::not_found(name).to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::QboConfig;

    fn test_client() -> Arc<QboClient> {
        Arc::new(QboClient::new(QboConfig::default()).unwrap())
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(test_client());
        let names = registry.tool_names();
        assert_eq!(names.len(), 16);
        assert!(names.contains(&"qb_customer_search"));
        assert!(names.contains(&"qb_vendor_search"));
        assert!(names.contains(&"qb_invoice_search"));
        assert!(names.contains(&"qb_bill_search"));
        assert!(names.contains(&"qb_account_search"));
        assert!(names.contains(&"qb_item_search"));
        assert!(names.contains(&"qb_payment_search"));
        assert!(names.contains(&"qb_estimate_search"));
        assert!(names.contains(&"qb_employee_search"));
        assert!(names.contains(&"qb_purchase_search"));
        assert!(names.contains(&"qb_credit_memo_search"));
        assert!(names.contains(&"qb_entity_get"));
        assert!(names.contains(&"qb_entity_create"));
        assert!(names.contains(&"qb_entity_update"));
        assert!(names.contains(&"qb_entity_delete"));
        assert!(names.contains(&"qb_query"));
    }

    #[test]
    fn test_tool_metadata_matches_names() {
        let registry = ToolRegistry::new(test_client());
        let names = registry.tool_names();
        let tools = ToolRegistry::get_all_tools();
        assert_eq!(tools.len(), names.len());
        for tool in tools {
            assert!(names.contains(&tool.name.as_ref()));
            assert!(tool.description.is_some());
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_validates_criteria() {
        let registry = ToolRegistry::new(test_client());
        let result = registry
            .call_tool(
                "qb_customer_search",
                serde_json::json!({"criteria": {"NotAField": 1}}),
            )
            .await
            .unwrap();
        assert_eq!(result["isError"], true);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(test_client());
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        assert!(result.is_err());
    }
}
