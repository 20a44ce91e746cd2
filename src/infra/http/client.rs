//! Resilient CMS API client.
//!
//! One logical call may span several attempts: timeouts and transport
//! failures retry with capped exponential backoff, a 401 triggers at most
//! one bearer-token refresh (without consuming a retry slot), and every
//! other non-2xx response is terminal unless the caller's policy lists
//! its status. Retry state lives on the stack of `call`; concurrent calls
//! share nothing but the token store, and concurrent refreshes coalesce
//! behind an async gate.

use std::{sync::Arc, time::Duration};

use metrics::counter;
use reqwest::{Client, Method, Response, StatusCode, Url, header};
use tracing::{debug, warn};
use uuid::Uuid;

use girder_api_types::{TokenRefreshRequest, TokenRefreshResponse};

use super::auth::{CsrfTokenSource, NoCsrfToken, TokenStore};
use super::backoff::RetryPolicy;
use super::error::{ApiError, ResponseBody};

pub const TOKEN_OBTAIN_PATH: &str = "/api/token/";
pub const TOKEN_REFRESH_PATH: &str = "/api/token/refresh/";
pub const CSRF_PATH: &str = "/api/csrf/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CSRF_HEADER: &str = "X-CSRFToken";
const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Per-call options; everything defaults to the client-level setting.
#[derive(Debug, Default, Clone)]
pub struct CallOptions {
    pub query: Vec<(String, String)>,
    pub body: Option<CallBody>,
    pub timeout: Option<Duration>,
    pub policy: Option<RetryPolicy>,
}

/// Request body. Multipart carries an owned description instead of a
/// `reqwest` form so retries can rebuild the form per attempt.
#[derive(Debug, Clone)]
pub enum CallBody {
    Json(serde_json::Value),
    Multipart(Vec<MultipartField>),
}

#[derive(Debug, Clone)]
pub struct MultipartField {
    pub name: String,
    pub value: MultipartValue,
}

#[derive(Debug, Clone)]
pub enum MultipartValue {
    Text(String),
    File {
        data: bytes::Bytes,
        file_name: String,
        mime: String,
    },
}

impl MultipartField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: MultipartValue::Text(value.into()),
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        data: impl Into<bytes::Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            value: MultipartValue::File {
                data: data.into(),
                file_name: file_name.into(),
                mime: mime.into(),
            },
        }
    }
}

pub struct ApiClient {
    http: Client,
    base: Url,
    tokens: Arc<dyn TokenStore>,
    csrf: Arc<dyn CsrfTokenSource>,
    policy: RetryPolicy,
    timeout: Duration,
    refresh_path: String,
    refresh_gate: tokio::sync::Mutex<()>,
}

pub struct ApiClientBuilder {
    site: String,
    tokens: Arc<dyn TokenStore>,
    csrf: Arc<dyn CsrfTokenSource>,
    policy: RetryPolicy,
    timeout: Duration,
    refresh_path: String,
}

impl ApiClientBuilder {
    pub fn token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn csrf_source(mut self, csrf: Arc<dyn CsrfTokenSource>) -> Self {
        self.csrf = csrf;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base = Url::parse(&self.site)?.join("/")?;
        let http = Client::builder()
            .user_agent(ApiClient::user_agent())
            .build()
            .map_err(|err| ApiError::network(err.to_string()))?;

        Ok(ApiClient {
            http,
            base,
            tokens: self.tokens,
            csrf: self.csrf,
            policy: self.policy,
            timeout: self.timeout,
            refresh_path: self.refresh_path,
            refresh_gate: tokio::sync::Mutex::new(()),
        })
    }
}

impl ApiClient {
    pub fn builder(site: &str) -> ApiClientBuilder {
        ApiClientBuilder {
            site: site.to_string(),
            tokens: Arc::new(super::auth::MemoryTokenStore::new()),
            csrf: Arc::new(NoCsrfToken),
            policy: RetryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            refresh_path: TOKEN_REFRESH_PATH.to_string(),
        }
    }

    pub fn user_agent() -> &'static str {
        concat!("girder/", env!("CARGO_PKG_VERSION"))
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Drive one logical call through its attempt/refresh/retry loop.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        options: CallOptions,
    ) -> Result<ResponseBody, ApiError> {
        let url = self.build_url(path, &options.query)?;
        let policy = options.policy.as_ref().unwrap_or(&self.policy);
        let timeout = options.timeout.unwrap_or(self.timeout);

        let mut attempt: u32 = 0;
        let mut refresh_used = false;

        loop {
            let access = self.tokens.access_token();
            let outcome = self
                .attempt(&method, &url, options.body.as_ref(), access.as_deref(), timeout)
                .await;

            let error = match outcome {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::UNAUTHORIZED {
                        if refresh_used {
                            counter!("girder_client_session_expired_total").increment(1);
                            return Err(ApiError::SessionExpired);
                        }
                        refresh_used = true;
                        self.refresh_access_token(access).await?;
                        counter!("girder_client_auth_refresh_total").increment(1);
                        // Same attempt again with the fresh token; the
                        // refresh does not consume a retry slot.
                        continue;
                    }
                    if status.is_success() {
                        return decode_body(response).await;
                    }

                    let body = decode_body(response).await.unwrap_or(ResponseBody::Empty);
                    let error = ApiError::Http {
                        status: status.as_u16(),
                        body,
                    };
                    if !policy.retries_status(status.as_u16()) {
                        return Err(error);
                    }
                    error
                }
                Err(error) => {
                    if !error.is_retryable() {
                        return Err(error);
                    }
                    error
                }
            };

            if attempt + 1 >= policy.max_attempts {
                return Err(error);
            }

            let delay = policy.delay(attempt);
            warn!(
                target = "infra::http::client",
                url = %url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "attempt failed, retrying: {error}"
            );
            counter!("girder_client_retry_total").increment(1);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ResponseBody, ApiError> {
        let options = CallOptions {
            query: owned_query(query),
            ..CallOptions::default()
        };
        self.call(Method::GET, path, options).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<ResponseBody, ApiError> {
        self.call(Method::POST, path, json_options(body)).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<ResponseBody, ApiError> {
        self.call(Method::PUT, path, json_options(body)).await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<ResponseBody, ApiError> {
        self.call(Method::PATCH, path, json_options(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ResponseBody, ApiError> {
        self.call(Method::DELETE, path, CallOptions::default()).await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        fields: Vec<MultipartField>,
    ) -> Result<ResponseBody, ApiError> {
        let options = CallOptions {
            body: Some(CallBody::Multipart(fields)),
            ..CallOptions::default()
        };
        self.call(Method::POST, path, options).await
    }

    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.get(path, query).await?.into_json()
    }

    pub async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ApiError> {
        self.post(path, body).await?.into_json()
    }

    fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
        let mut url = self.base.join(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            drop(pairs);
        }
        Ok(url)
    }

    async fn attempt(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&CallBody>,
        access: Option<&str>,
        timeout: Duration,
    ) -> Result<Response, ApiError> {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .timeout(timeout)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());

        if let Some(token) = access {
            request = request.bearer_auth(token);
        }
        if *method != Method::GET {
            if let Some(csrf) = self.csrf.csrf_token() {
                request = request.header(CSRF_HEADER, csrf);
            }
        }

        request = match body {
            Some(CallBody::Json(value)) => request.json(value),
            Some(CallBody::Multipart(fields)) => request.multipart(build_form(fields)?),
            None => request.header(header::CONTENT_TYPE, "application/json"),
        };

        request.send().await.map_err(classify_transport_error)
    }

    /// At most one refresh runs at a time; callers that lose the race
    /// re-read the store and skip their own refresh.
    async fn refresh_access_token(&self, stale_access: Option<String>) -> Result<(), ApiError> {
        let _guard = self.refresh_gate.lock().await;

        if self.tokens.access_token() != stale_access {
            return Ok(());
        }

        let Some(refresh) = self.tokens.refresh_token() else {
            counter!("girder_client_session_expired_total").increment(1);
            return Err(ApiError::SessionExpired);
        };

        debug!(target = "infra::http::client", "refreshing access token");
        let url = self.base.join(&self.refresh_path)?;
        let response = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(&TokenRefreshRequest { refresh })
            .send()
            .await
            .map_err(|err| {
                warn!(
                    target = "infra::http::client",
                    "token refresh request failed: {err}"
                );
                session_expired()
            })?;

        if !response.status().is_success() {
            self.tokens.clear();
            return Err(session_expired());
        }

        let body: TokenRefreshResponse = response
            .json()
            .await
            .map_err(|_| session_expired())?;
        self.tokens.store_tokens(body.access, body.refresh);
        Ok(())
    }
}

fn session_expired() -> ApiError {
    counter!("girder_client_session_expired_total").increment(1);
    ApiError::SessionExpired
}

fn owned_query(query: &[(&str, String)]) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

fn json_options(body: serde_json::Value) -> CallOptions {
    CallOptions {
        body: Some(CallBody::Json(body)),
        ..CallOptions::default()
    }
}

fn build_form(fields: &[MultipartField]) -> Result<reqwest::multipart::Form, ApiError> {
    let mut form = reqwest::multipart::Form::new();
    for field in fields {
        form = match &field.value {
            MultipartValue::Text(value) => form.text(field.name.clone(), value.clone()),
            MultipartValue::File {
                data,
                file_name,
                mime,
            } => {
                let part = reqwest::multipart::Part::bytes(data.to_vec())
                    .file_name(file_name.clone())
                    .mime_str(mime)
                    .map_err(|err| ApiError::invalid_request(err.to_string()))?;
                form.part(field.name.clone(), part)
            }
        };
    }
    Ok(form)
}

fn classify_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::network(err.to_string())
    }
}

async fn decode_body(response: Response) -> Result<ResponseBody, ApiError> {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("json"));

    let bytes = response
        .bytes()
        .await
        .map_err(|err| ApiError::network(err.to_string()))?;

    if bytes.is_empty() {
        return Ok(ResponseBody::Empty);
    }

    if is_json {
        serde_json::from_slice(&bytes)
            .map(ResponseBody::Json)
            .map_err(|err| ApiError::decode(err.to_string()))
    } else {
        Ok(ResponseBody::Text(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::builder(&server.base_url())
            .build()
            .expect("client")
    }

    #[tokio::test]
    async fn get_decodes_json_bodies() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/api/site-config/");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"company_name":"Acme Build"}"#);
        });

        let body = client(&server)
            .get("/api/site-config/", &[])
            .await
            .expect("call");
        match body {
            ResponseBody::Json(value) => {
                assert_eq!(value["company_name"], "Acme Build");
            }
            other => panic!("expected json, got {other:?}"),
        }
        mock.assert();
    }

    #[tokio::test]
    async fn non_json_bodies_decode_as_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/robots.txt");
            then.status(200)
                .header("content-type", "text/plain")
                .body("Disallow: /admin");
        });

        let body = client(&server).get("/robots.txt", &[]).await.expect("call");
        assert_eq!(body, ResponseBody::Text("Disallow: /admin".to_string()));
    }

    #[tokio::test]
    async fn bearer_and_csrf_headers_are_sent_on_writes() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/api/leads/")
                .header("authorization", "Bearer tok-1")
                .header("x-csrftoken", "csrf-1");
            then.status(201)
                .header("content-type", "application/json")
                .body("{}");
        });

        let csrf = Arc::new(super::super::auth::MemoryCsrfToken::new());
        csrf.set("csrf-1");
        let api = ApiClient::builder(&server.base_url())
            .token_store(Arc::new(super::super::auth::MemoryTokenStore::with_tokens(
                "tok-1", None,
            )))
            .csrf_source(csrf)
            .build()
            .expect("client");

        api.post("/api/leads/", serde_json::json!({"name":"x"}))
            .await
            .expect("call");
        mock.assert();
    }

    #[tokio::test]
    async fn non_2xx_is_terminal_by_default() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/api/blog-posts/slug/missing/");
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"detail":"Not found."}"#);
        });

        let err = client(&server)
            .get("/api/blog-posts/slug/missing/", &[])
            .await
            .expect_err("404 should fail");
        assert_eq!(err.status(), Some(404));
        // Exactly one attempt: no implicit retries on HTTP errors.
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn query_pairs_are_appended() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/api/blog-posts/")
                .query_param("status", "published");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"count":0,"next":null,"previous":null,"results":[]}"#);
        });

        client(&server)
            .get("/api/blog-posts/", &[("status", "published".to_string())])
            .await
            .expect("call");
        mock.assert();
    }
}
