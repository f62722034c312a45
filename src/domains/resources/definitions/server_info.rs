//! Server info resource definition.

use super::ResourceDefinition;
use crate::domains::resources::service::{DynamicResourceType, ResourceContent};

/// Server information resource (dynamic).
///
/// Reports the connection status, the configured API host, and the list of
/// supported entities. Resolved at read time in the resource service so it
/// reflects the live configuration.
pub struct ServerInfoResource;

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "qbo://server/info";
    const NAME: &'static str = "Server Information";
    const DESCRIPTION: &'static str =
        "Connection status, API host, and supported entities of this QuickBooks server";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::Dynamic(DynamicResourceType::ServerInfo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_info_metadata() {
        assert_eq!(ServerInfoResource::URI, "qbo://server/info");
        assert_eq!(ServerInfoResource::MIME_TYPE, "application/json");
    }

    #[test]
    fn test_server_info_is_dynamic() {
        match ServerInfoResource::content() {
            ResourceContent::Dynamic(DynamicResourceType::ServerInfo) => {}
            _ => panic!("Expected dynamic server info content"),
        }
    }
}
