//! Async HTTP client for the QuickBooks Online v3 API.
//!
//! A thin wrapper over `reqwest` that knows the company-scoped URL layout,
//! attaches the bearer token, and folds vendor Fault envelopes into
//! [`QboError`]. Entity payloads stay raw `serde_json::Value`s end to end.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde_json::{json, Value};

use super::error::QboError;
use super::types::{extract_record, extract_rows, extract_total_count, FaultEnvelope};
use crate::core::config::QboConfig;
use crate::domains::query::{compile, CanonicalCriteria};

const QBO_TIMEOUT_SECS: u64 = 30;

/// Paging window used when a fetch-all search does not set its own limit.
/// Also the largest window the remote query engine will serve per request.
pub const DEFAULT_PAGE_SIZE: i64 = 1000;

/// Client for one QuickBooks Online company.
#[derive(Debug, Clone)]
pub struct QboClient {
    http: reqwest::Client,
    config: QboConfig,
}

impl QboClient {
    /// Build a client from connection settings.
    ///
    /// Succeeds even when the realm or token is missing; API-backed calls
    /// then fail individually with [`QboError::NotConfigured`] so the
    /// server can still start and describe itself.
    pub fn new(config: QboConfig) -> Result<Self, QboError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(QBO_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .map_err(|e| QboError::unexpected(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!(
            base_url = %config.base_url,
            configured = config.is_complete(),
            "QuickBooks client initialized"
        );
        Ok(Self { http, config })
    }

    /// Realm and token, or the exact environment variables still missing.
    fn credentials(&self) -> Result<(&str, &str), QboError> {
        match (
            self.config.realm_id.as_deref(),
            self.config.access_token.as_deref(),
        ) {
            (Some(realm), Some(token)) => Ok((realm, token)),
            (None, Some(_)) => Err(QboError::not_configured(&["MCP_QBO_REALM_ID"])),
            (Some(_), None) => Err(QboError::not_configured(&["MCP_QBO_ACCESS_TOKEN"])),
            (None, None) => Err(QboError::not_configured(&[
                "MCP_QBO_REALM_ID",
                "MCP_QBO_ACCESS_TOKEN",
            ])),
        }
    }

    /// Company-scoped endpoint: {base}/v3/company/{realm}/{path}
    fn api_url(&self, realm: &str, path: &str) -> String {
        format!("{}/v3/company/{}/{}", self.config.base_url, realm, path)
    }

    /// Run a query string and return the raw `QueryResponse` body.
    pub async fn query_raw(&self, sql: &str) -> Result<Value, QboError> {
        let (realm, token) = self.credentials()?;
        let url = self.api_url(realm, "query");
        tracing::debug!(query = %sql, "Running QuickBooks query");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("query", sql),
                ("minorversion", &self.config.minor_version),
            ])
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Run a query string and return the matching entity rows.
    pub async fn query(&self, entity: &str, sql: &str) -> Result<Vec<Value>, QboError> {
        let body = self.query_raw(sql).await?;
        Ok(extract_rows(&body, entity))
    }

    /// Run a COUNT query and return the total.
    pub async fn query_count(&self, sql: &str) -> Result<i64, QboError> {
        let body = self.query_raw(sql).await?;
        extract_total_count(&body)
            .ok_or_else(|| QboError::unexpected("COUNT response carried no totalCount"))
    }

    /// Read one record by ID.
    pub async fn read(&self, entity: &str, id: &str) -> Result<Value, QboError> {
        let (realm, token) = self.credentials()?;
        let url = self.api_url(realm, &format!("{}/{}", entity_resource(entity), id));
        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("minorversion", &self.config.minor_version)])
            .send()
            .await?;
        let body = self.handle_response(resp).await?;
        Ok(extract_record(&body, entity))
    }

    /// Create a record from a raw entity payload.
    pub async fn create(&self, entity: &str, payload: &Value) -> Result<Value, QboError> {
        self.post_entity(entity, payload, &[]).await
    }

    /// Update a record. The payload must carry `Id` and a current
    /// `SyncToken`; QuickBooks rejects stale tokens.
    pub async fn update(&self, entity: &str, payload: &Value) -> Result<Value, QboError> {
        self.post_entity(entity, payload, &[]).await
    }

    /// Delete a record by ID and sync token.
    pub async fn delete(
        &self,
        entity: &str,
        id: &str,
        sync_token: &str,
    ) -> Result<Value, QboError> {
        let payload = json!({"Id": id, "SyncToken": sync_token});
        self.post_entity(entity, &payload, &[("operation", "delete")])
            .await
    }

    async fn post_entity(
        &self,
        entity: &str,
        payload: &Value,
        extra: &[(&str, &str)],
    ) -> Result<Value, QboError> {
        let (realm, token) = self.credentials()?;
        let url = self.api_url(realm, &entity_resource(entity));
        let mut params: Vec<(&str, &str)> =
            vec![("minorversion", self.config.minor_version.as_str())];
        params.extend_from_slice(extra);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .query(&params)
            .json(payload)
            .send()
            .await?;
        let body = self.handle_response(resp).await?;
        Ok(extract_record(&body, entity))
    }

    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, QboError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(fault_error(status, &body))
    }
}

/// URL resource segment for an entity: lowercased, no separators
/// (e.g. `CreditMemo` becomes `creditmemo`).
fn entity_resource(entity: &str) -> String {
    entity.to_lowercase()
}

/// Fold a non-2xx response into an error, preferring the vendor Fault
/// envelope when the body carries one.
fn fault_error(status: StatusCode, body: &str) -> QboError {
    if let Ok(envelope) = serde_json::from_str::<FaultEnvelope>(body) {
        let code = envelope
            .fault
            .primary_code()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_u16().to_string());
        return QboError::api(code, envelope.fault.summary());
    }
    // Auth failures come back as XML regardless of the Accept header.
    if status == StatusCode::UNAUTHORIZED {
        return QboError::api(
            "401",
            "authentication failed; the access token may be expired or revoked",
        );
    }
    let detail = body.trim();
    let message = if detail.is_empty() {
        status.to_string()
    } else {
        let mut snippet: String = detail.chars().take(200).collect();
        if snippet.len() < detail.len() {
            snippet.push_str("...");
        }
        snippet
    };
    QboError::api(status.as_u16().to_string(), message)
}

/// Seam between the search tools and the HTTP client, so paging logic can
/// be exercised without a live company.
#[async_trait]
pub trait QueryDispatcher: Send + Sync {
    /// Run one compiled query and return the matching rows.
    async fn run_query(&self, entity: &str, sql: &str) -> Result<Vec<Value>, QboError>;
}

#[async_trait]
impl QueryDispatcher for QboClient {
    async fn run_query(&self, entity: &str, sql: &str) -> Result<Vec<Value>, QboError> {
        self.query(entity, sql).await
    }
}

/// Page through every record matching `criteria`.
///
/// Recompiles the criteria once per window with an explicit limit and
/// offset, walking forward until a short page signals the end. A `limit`
/// in the criteria sets the window size, capped at the remote maximum;
/// an `offset` sets where the walk starts.
pub async fn fetch_all_rows(
    dispatcher: &dyn QueryDispatcher,
    entity: &str,
    criteria: &CanonicalCriteria,
) -> Result<Vec<Value>, QboError> {
    let window = criteria.directives();
    let page_size = window
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, DEFAULT_PAGE_SIZE);
    let mut offset = window.offset.unwrap_or(0).max(0);
    let mut rows = Vec::new();

    loop {
        let page = criteria.paged(page_size, offset);
        let sql = compile(entity, &page);
        let batch = dispatcher.run_query(entity, &sql).await?;
        let short_page = (batch.len() as i64) < page_size;
        rows.extend(batch);
        if short_page {
            break;
        }
        offset = offset.saturating_add(page_size);
    }

    tracing::debug!(entity = %entity, total = rows.len(), "Fetched all pages");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::query::normalize;
    use serde_json::json;
    use std::sync::Mutex;

    fn client_with(realm: Option<&str>, token: Option<&str>) -> QboClient {
        QboClient::new(QboConfig {
            realm_id: realm.map(str::to_string),
            access_token: token.map(str::to_string),
            ..QboConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_api_url_layout() {
        let client = client_with(Some("9341453"), Some("tok"));
        assert_eq!(
            client.api_url("9341453", "query"),
            "https://sandbox-quickbooks.api.intuit.com/v3/company/9341453/query"
        );
    }

    #[test]
    fn test_entity_resource_is_lowercase() {
        assert_eq!(entity_resource("Customer"), "customer");
        assert_eq!(entity_resource("CreditMemo"), "creditmemo");
    }

    #[test]
    fn test_write_url_appends_the_lowercase_resource_segment() {
        let client = client_with(Some("9341453"), Some("tok"));
        assert_eq!(
            client.api_url("9341453", &entity_resource("CreditMemo")),
            "https://sandbox-quickbooks.api.intuit.com/v3/company/9341453/creditmemo"
        );
    }

    #[test]
    fn test_missing_credentials_name_the_variables() {
        let err = client_with(None, None).credentials().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("MCP_QBO_REALM_ID"));
        assert!(message.contains("MCP_QBO_ACCESS_TOKEN"));

        let err = client_with(Some("realm"), None).credentials().unwrap_err();
        assert!(err.to_string().contains("MCP_QBO_ACCESS_TOKEN"));
        assert!(!err.to_string().contains("MCP_QBO_REALM_ID"));
    }

    #[test]
    fn test_fault_body_becomes_api_error() {
        let body = json!({
            "Fault": {
                "Error": [{"Message": "Invalid query", "Detail": "line 1", "code": "4000"}],
                "type": "ValidationFault"
            }
        })
        .to_string();
        let err = fault_error(StatusCode::BAD_REQUEST, &body);
        let QboError::Api { code, message } = err else {
            panic!("expected an API error");
        };
        assert_eq!(code, "4000");
        assert!(message.contains("Invalid query"));
    }

    #[test]
    fn test_unauthorized_without_fault_hints_at_token() {
        let err = fault_error(StatusCode::UNAUTHORIZED, "<html>nope</html>");
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_unrecognized_error_body_is_truncated() {
        let long_body = "x".repeat(500);
        let err = fault_error(StatusCode::BAD_GATEWAY, &long_body);
        let text = err.to_string();
        assert!(text.contains("502"));
        assert!(text.len() < 300);
    }

    /// Dispatcher that serves canned pages and records each query it sees.
    struct PagedDispatcher {
        rows: Vec<Value>,
        queries: Mutex<Vec<String>>,
    }

    impl PagedDispatcher {
        fn with_rows(total: usize) -> Self {
            Self {
                rows: (0..total).map(|i| json!({"Id": i.to_string()})).collect(),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl QueryDispatcher for PagedDispatcher {
        async fn run_query(&self, _entity: &str, sql: &str) -> Result<Vec<Value>, QboError> {
            self.queries.lock().unwrap().push(sql.to_string());
            let offset = sql
                .rsplit("STARTPOSITION ")
                .next()
                .and_then(|s| s.parse::<usize>().ok())
                .map(|pos| pos - 1)
                .unwrap_or(0);
            let limit = sql
                .split("MAXRESULTS ")
                .nth(1)
                .and_then(|s| s.split_whitespace().next())
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(self.rows.len());
            Ok(self
                .rows
                .iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn test_fetch_all_walks_every_page() {
        let dispatcher = PagedDispatcher::with_rows(7);
        let criteria = normalize(&json!({"filters": [], "limit": 3})).unwrap();
        let rows = fetch_all_rows(&dispatcher, "Customer", &criteria)
            .await
            .unwrap();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[6]["Id"], "6");

        let queries = dispatcher.queries.lock().unwrap();
        assert_eq!(queries.len(), 3);
        assert!(queries[0].ends_with("MAXRESULTS 3 STARTPOSITION 1"));
        assert!(queries[1].ends_with("MAXRESULTS 3 STARTPOSITION 4"));
        assert!(queries[2].ends_with("MAXRESULTS 3 STARTPOSITION 7"));
    }

    #[tokio::test]
    async fn test_fetch_all_stops_after_exact_boundary() {
        // 6 rows with pages of 3: the third page is empty and ends the walk.
        let dispatcher = PagedDispatcher::with_rows(6);
        let criteria = normalize(&json!({"limit": 3})).unwrap();
        let rows = fetch_all_rows(&dispatcher, "Customer", &criteria)
            .await
            .unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(dispatcher.queries.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_all_defaults_to_max_window() {
        let dispatcher = PagedDispatcher::with_rows(5);
        let criteria = normalize(&json!({})).unwrap();
        let rows = fetch_all_rows(&dispatcher, "Customer", &criteria)
            .await
            .unwrap();
        assert_eq!(rows.len(), 5);
        let queries = dispatcher.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].contains("MAXRESULTS 1000"));
    }

    #[tokio::test]
    async fn test_fetch_all_starts_from_requested_offset() {
        let dispatcher = PagedDispatcher::with_rows(10);
        let criteria = normalize(&json!({"limit": 4, "offset": 6})).unwrap();
        let rows = fetch_all_rows(&dispatcher, "Customer", &criteria)
            .await
            .unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["Id"], "6");
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_conditions_in_every_page() {
        let dispatcher = PagedDispatcher::with_rows(4);
        let criteria = normalize(&json!({
            "filters": [{"field": "Active", "value": true}],
            "limit": 2
        }))
        .unwrap();
        fetch_all_rows(&dispatcher, "Customer", &criteria)
            .await
            .unwrap();
        for sql in dispatcher.queries.lock().unwrap().iter() {
            assert!(sql.contains("WHERE Active = true"));
        }
    }

    #[tokio::test]
    #[ignore = "requires live QuickBooks credentials in the environment"]
    async fn test_live_company_query() {
        let config = crate::core::config::Config::from_env();
        let client = QboClient::new(config.qbo).unwrap();
        let rows = client
            .query("CompanyInfo", "SELECT * FROM CompanyInfo")
            .await
            .unwrap();
        assert!(!rows.is_empty());
    }
}
