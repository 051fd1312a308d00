//! Spreadsheet API client
//!
//! HTTP client for the Apps Script web app that backs the rent sheet.
//! Every operation is tried as a JSON POST first; if that attempt fails for
//! any reason the whole operation is reissued as a GET with the parameters
//! in the query string, since some deployments only honour `doGet`.

use chrono::Utc;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

use super::envelope::{unwrap_list, validate};
use super::error::{ClientError, ClientResult};
use super::params::{append_query, Params};
use crate::config::ApiConfig;
use crate::records::{Period, RentPayment};

/// Keys that also travel in the POST URL so `e.parameter` sees them
const ROUTING_KEYS: [&str; 4] = ["action", "op", "_ts", "key"];

/// Configuration for the API client
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Web app `/exec` URL
    pub base_url: Option<String>,
    /// Optional shared secret sent as `key`
    pub api_key: Option<String>,
    /// Link to the backing spreadsheet
    pub sheet_url: Option<String>,
    /// Per-request timeout; none by default
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Config pointing at a base URL, everything else unset
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            base_url: Some(url.into()),
            ..Self::default()
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl From<&ApiConfig> for ClientConfig {
    fn from(api: &ApiConfig) -> Self {
        Self {
            base_url: non_blank(&api.url),
            api_key: non_blank(&api.key),
            sheet_url: non_blank(&api.sheet_url),
            request_timeout: api.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Spreadsheet API client
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, config })
    }

    /// Whether a base URL is configured
    pub fn is_configured(&self) -> bool {
        self.config.base_url.is_some()
    }

    /// Link to the backing spreadsheet, if configured
    pub fn sheet_url(&self) -> Option<&str> {
        self.config.sheet_url.as_deref()
    }

    fn endpoint(&self) -> ClientResult<Url> {
        let raw = self.config.base_url.as_deref().ok_or(ClientError::MissingUrl)?;
        Url::parse(raw).map_err(|e| ClientError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })
    }

    /// Add the operation aliases, cache-buster and key
    fn decorate(&self, op: &str, params: Params) -> Params {
        let mut params = params
            .text("action", op)
            .text("op", op)
            .number("_ts", Utc::now().timestamp_millis());
        if let Some(key) = &self.config.api_key {
            params = params.text("key", key.clone());
        }
        params
    }

    /// Run one backend operation and return its validated payload
    pub async fn call(&self, op: &str, params: Params) -> ClientResult<Value> {
        let endpoint = self.endpoint()?;
        let params = self.decorate(op, params);

        match self.post(&endpoint, &params).await {
            Ok(payload) => Ok(payload),
            Err(post_err) => {
                tracing::warn!(op, error = %post_err, "POST failed, retrying as GET");
                self.get(&endpoint, &params)
                    .await
                    .map_err(|get_err| ClientError::BothAttemptsFailed {
                        post: Box::new(post_err),
                        get: Box::new(get_err),
                    })
            }
        }
    }

    async fn post(&self, endpoint: &Url, params: &Params) -> ClientResult<Value> {
        let mut url = endpoint.clone();
        append_query(&mut url, &params.pairs_for(&ROUTING_KEYS));
        tracing::debug!(%url, "POST");

        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .json(&params.to_body())
            .send()
            .await?;

        Self::read(response).await
    }

    async fn get(&self, endpoint: &Url, params: &Params) -> ClientResult<Value> {
        let mut url = endpoint.clone();
        append_query(&mut url, &params.pairs());
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        validate(status, &body)
    }

    /// All studios
    pub async fn get_studios(&self) -> ClientResult<Vec<Value>> {
        let payload = self.call("getStudios", Params::new()).await?;
        Ok(unwrap_list(&payload, "studios"))
    }

    /// The raw table view
    pub async fn get_table(&self) -> ClientResult<Vec<Value>> {
        let payload = self.call("getTable", Params::new()).await?;
        Ok(unwrap_list(&payload, "table"))
    }

    /// Rent records for a month
    pub async fn get_rent_records(&self, period: Period) -> ClientResult<Vec<Value>> {
        let payload = self.call("getRentRecords", period_params(period)).await?;
        Ok(unwrap_list(&payload, "records"))
    }

    /// Record a rent payment; returns the backend's payload
    pub async fn add_rent_payment(&self, payment: &RentPayment) -> ClientResult<Value> {
        let params = Params::new()
            .text("StudioId", payment.studio_id.clone())
            .number("Month", payment.period.month())
            .number("Year", payment.period.year())
            .text("PaymentDate", payment.payment_date.format("%Y-%m-%d").to_string())
            .amount("Amount", payment.amount)
            .amount("Maintenance", payment.maintenance);

        self.call("addRentPayment", params).await
    }

    /// Payment history of one studio
    pub async fn get_payment_history(&self, studio_id: &str) -> ClientResult<Vec<Value>> {
        let params = Params::new().text("studioId", studio_id);
        let payload = self.call("getPaymentHistory", params).await?;
        Ok(unwrap_list(&payload, "history"))
    }

    /// Month export as raw CSV text; empty when the backend sends none
    pub async fn export_csv(&self, period: Period) -> ClientResult<String> {
        let payload = self.call("exportCsv", period_params(period)).await?;
        Ok(payload
            .get("csv")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// Send a rent reminder for one studio
    pub async fn send_reminder(&self, studio_id: &str, period: Period) -> ClientResult<Value> {
        let params = Params::new()
            .text("studioId", studio_id)
            .number("month", period.month())
            .number("year", period.year());

        self.call("sendReminder", params).await
    }

    /// Send rent reminders for every unpaid studio in a month
    pub async fn send_bulk_reminder(&self, period: Period) -> ClientResult<Value> {
        let params = Params::new()
            .number("month", period.month())
            .number("year", period.year());

        self.call("sendBulkReminder", params).await
    }
}

/// Month/year as numbers plus readable month fields
fn period_params(period: Period) -> Params {
    Params::new()
        .number("month", period.month())
        .number("year", period.year())
        .text("monthName", period.month_name())
        .text("period", period.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ErrorKind;
    use axum::{
        extract::Query,
        http::StatusCode,
        response::Html,
        routing::post,
        Json, Router,
    };
    use chrono::NaiveDate;
    use serde_json::json;
    use std::collections::HashMap;

    /// Serve a fake web app on an ephemeral port and return its `/exec` URL
    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/exec", addr)
    }

    fn client_for(url: String) -> ApiClient {
        let config = ClientConfig {
            api_key: Some("s3cret".to_string()),
            ..ClientConfig::with_url(url)
        };
        ApiClient::new(config).unwrap()
    }

    async fn echo_query(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
        Json(json!({"ok": true, "data": [query]}))
    }

    async fn echo_body(
        Query(query): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        Json(json!({"ok": true, "rows": [body], "query": query}))
    }

    async fn server_error() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom")
    }

    #[test]
    fn test_blank_config_values_are_unset() {
        let api = ApiConfig {
            url: Some("  ".to_string()),
            key: Some(String::new()),
            sheet_url: None,
            request_timeout_secs: Some(10),
        };
        let config = ClientConfig::from(&api);
        assert!(config.base_url.is_none());
        assert!(config.api_key.is_none());
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));
    }

    #[tokio::test]
    async fn test_missing_url_fails_fast() {
        let client = ApiClient::new(ClientConfig::default()).unwrap();
        let err = client.get_studios().await.unwrap_err();
        assert!(matches!(err, ClientError::MissingUrl));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_invalid_url_is_configuration_error() {
        let client = ApiClient::new(ClientConfig::with_url("not a url")).unwrap();
        let err = client.get_table().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_post_carries_body_and_routing_query() {
        let router = Router::new().route("/exec", post(echo_body).get(server_error));
        let client = client_for(spawn_backend(router).await);

        let payment = RentPayment {
            studio_id: "z26".to_string(),
            period: Period::new(1, 2026).unwrap(),
            payment_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            amount: 100.0,
            maintenance: 0.0,
        };
        let payload = client.add_rent_payment(&payment).await.unwrap();
        let body = &payload["rows"][0];

        assert_eq!(body["action"], "addRentPayment");
        assert_eq!(body["op"], "addRentPayment");
        assert_eq!(body["key"], "s3cret");
        assert_eq!(body["StudioId"], "z26");
        assert_eq!(body["Month"], 1);
        assert_eq!(body["PaymentDate"], "2026-01-01");
        assert!(body["_ts"].as_i64().unwrap() > 0);

        let query = &payload["query"];
        assert_eq!(query["action"], "addRentPayment");
        assert_eq!(query["op"], "addRentPayment");
        assert_eq!(query["key"], "s3cret");
        assert_eq!(query["_ts"], body["_ts"].to_string());
        assert!(query.get("StudioId").is_none());
        assert!(query.get("Amount").is_none());
    }

    #[tokio::test]
    async fn test_malformed_post_body_falls_back_to_get() {
        async fn truncated() -> &'static str {
            "{\"ok\": true, \"data\": ["
        }
        async fn login_page() -> Html<&'static str> {
            Html("<html><body>Sign in</body></html>")
        }

        for router in [
            Router::new().route("/exec", post(truncated).get(echo_query)),
            Router::new().route("/exec", post(login_page).get(echo_query)),
        ] {
            let client = client_for(spawn_backend(router).await);
            let rows = client.get_studios().await.unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0]["action"], "getStudios");
        }
    }

    #[tokio::test]
    async fn test_post_failure_falls_back_to_get() {
        let router = Router::new().route("/exec", post(server_error).get(echo_query));
        let client = client_for(spawn_backend(router).await);

        let rows = client
            .get_rent_records(Period::new(3, 2026).unwrap())
            .await
            .unwrap();
        let query = &rows[0];

        assert_eq!(query["action"], "getRentRecords");
        assert_eq!(query["op"], "getRentRecords");
        assert_eq!(query["month"], "3");
        assert_eq!(query["year"], "2026");
        assert_eq!(query["monthName"], "March");
        assert_eq!(query["period"], "March 2026");
        assert_eq!(query["key"], "s3cret");
        assert!(query.get("_ts").is_some());
    }

    #[tokio::test]
    async fn test_html_body_is_protocol_error() {
        async fn login_page() -> Html<&'static str> {
            Html("<!DOCTYPE html><html><body>Sign in - Google Accounts</body></html>")
        }
        let router = Router::new().route("/exec", post(login_page).get(login_page));
        let client = client_for(spawn_backend(router).await);

        let err = client.get_studios().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
        match err {
            ClientError::BothAttemptsFailed { get, .. } => {
                assert!(matches!(*get, ClientError::HtmlBody))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_ok_false_is_application_error() {
        async fn rejected() -> Json<Value> {
            Json(json!({"ok": false, "error": "Studio not found"}))
        }
        let router = Router::new().route("/exec", post(rejected).get(rejected));
        let client = client_for(spawn_backend(router).await);

        let err = client.get_payment_history("nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Application);
        assert!(err.to_string().starts_with("Studio not found"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}/exec", addr));
        let err = client.get_studios().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_export_csv_reads_csv_field() {
        async fn csv() -> Json<Value> {
            Json(json!({"ok": true, "csv": "StudioId,Amount\nz26,100\n"}))
        }
        async fn no_csv() -> Json<Value> {
            Json(json!({"ok": true}))
        }

        let router = Router::new().route("/exec", post(csv));
        let client = client_for(spawn_backend(router).await);
        let text = client.export_csv(Period::new(1, 2026).unwrap()).await.unwrap();
        assert!(text.starts_with("StudioId,Amount"));

        let router = Router::new().route("/exec", post(no_csv));
        let client = client_for(spawn_backend(router).await);
        let text = client.export_csv(Period::new(1, 2026).unwrap()).await.unwrap();
        assert!(text.is_empty());
    }
}
