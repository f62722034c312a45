//! Tool Router - builds the rmcp ToolRouter from registry.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::domains::qbo::QboClient;

use super::definitions::{
    AccountSearchTool, BillSearchTool, CreditMemoSearchTool, CustomerSearchTool,
    EmployeeSearchTool, EntityCreateTool, EntityDeleteTool, EntityGetTool, EntityUpdateTool,
    EstimateSearchTool, InvoiceSearchTool, ItemSearchTool, PaymentSearchTool, PurchaseSearchTool,
    RawQueryTool, VendorSearchTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: Arc<QboClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(AccountSearchTool::create_route(client.clone()))
        .with_route(BillSearchTool::create_route(client.clone()))
        .with_route(CreditMemoSearchTool::create_route(client.clone()))
        .with_route(CustomerSearchTool::create_route(client.clone()))
        .with_route(EmployeeSearchTool::create_route(client.clone()))
        .with_route(EstimateSearchTool::create_route(client.clone()))
        .with_route(InvoiceSearchTool::create_route(client.clone()))
        .with_route(ItemSearchTool::create_route(client.clone()))
        .with_route(PaymentSearchTool::create_route(client.clone()))
        .with_route(PurchaseSearchTool::create_route(client.clone()))
        .with_route(VendorSearchTool::create_route(client.clone()))
        .with_route(EntityGetTool::create_route(client.clone()))
        .with_route(EntityCreateTool::create_route(client.clone()))
        .with_route(EntityUpdateTool::create_route(client.clone()))
        .with_route(EntityDeleteTool::create_route(client.clone()))
        .with_route(RawQueryTool::create_route(client))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::core::config::QboConfig;

    struct TestServer {}

    fn test_client() -> Arc<QboClient> {
        Arc::new(QboClient::new(QboConfig::default()).unwrap())
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_client());
        let tools = router.list_all();
        assert_eq!(tools.len(), 16);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"qb_customer_search"));
        assert!(names.contains(&"qb_invoice_search"));
        assert!(names.contains(&"qb_account_search"));
        assert!(names.contains(&"qb_credit_memo_search"));
        assert!(names.contains(&"qb_entity_get"));
        assert!(names.contains(&"qb_entity_create"));
        assert!(names.contains(&"qb_entity_update"));
        assert!(names.contains(&"qb_entity_delete"));
        assert!(names.contains(&"qb_query"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router have the same tools
        let client = test_client();
        let registry = ToolRegistry::new(client.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(client);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
