//! The HTTP transport.
//!
//! [`Connection`] issues one logical call at a time: it attaches headers and
//! authentication, sends the request, follows 301/302 redirects, classifies
//! the status, decodes the body and drives the [`RetryPolicy`] around the
//! whole exchange.
//!
//! # Result contract
//!
//! Every request method returns `Result<Option<ResponseBody>, HttpError>`:
//!
//! - `Ok(Some(body))`: the call succeeded (any non-4xx/5xx final status).
//! - `Ok(None)`: the server answered 4xx/5xx and fail-on-error mode is off.
//!   The decoded body is available from [`Connection::last_error`].
//! - `Err(_)`: a network fault, a rejected request, or (in fail-on-error
//!   mode) a 4xx/5xx that the retry policy did not recover from.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde_json::Value;

use crate::clients::errors::{
    extract_message, ClientError, HttpError, InvalidHttpRequestError, NetworkError, ServerError,
};
use crate::clients::http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, MediaType};
use crate::clients::http_response::{collect_headers, decode, RawResponse, ResponseBody};
use crate::clients::redirect::RedirectFollower;
use crate::clients::retry::{RetryDecision, RetryPolicy, RetryState};
use crate::config::{ConnectionConfig, Proxy, TlsVersion};
use crate::error::ConfigError;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header carrying the OAuth client id.
pub const AUTH_CLIENT_HEADER: &str = "x-auth-client";

/// Header carrying the OAuth access token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// An HTTP connection to the store API.
///
/// Request methods take `&mut self`: a connection has at most one logical
/// call in flight, and its counters and diagnostics belong to that call.
///
/// # Example
///
/// ```rust,no_run
/// use bigcommerce_api::clients::Connection;
/// use bigcommerce_api::ConnectionConfig;
///
/// # async fn run() -> Result<(), bigcommerce_api::clients::HttpError> {
/// let mut connection = Connection::new(ConnectionConfig::default());
/// connection.authenticate_oauth("client-id", "token");
///
/// match connection.get("https://api.bigcommerce.com/stores/abc/v2/time", &[]).await? {
///     Some(body) => println!("{body:?}"),
///     None => println!("request failed: {:?}", connection.last_error()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Connection {
    client: Option<reqwest::Client>,
    config: ConnectionConfig,
    headers: HashMap<String, String>,
    basic_auth: Option<(String, String)>,
    retry: RetryState,
    redirects: RedirectFollower,
    redirects_followed: u32,
    last_response: Option<RawResponse>,
    last_error: Option<ResponseBody>,
}

// Verify Connection is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Connection>();
};

impl Default for Connection {
    fn default() -> Self {
        Self::new(ConnectionConfig::default())
    }
}

impl Connection {
    /// Creates a connection with the given settings.
    ///
    /// The underlying HTTP engine is built lazily on the first request and
    /// rebuilt whenever a timeout, TLS or proxy setting changes.
    #[must_use]
    pub fn new(config: ConnectionConfig) -> Self {
        let redirects = RedirectFollower::new(config.max_redirects());
        Self {
            client: None,
            config,
            headers: HashMap::new(),
            basic_auth: None,
            retry: RetryState::new(),
            redirects,
            redirects_followed: 0,
            last_response: None,
            last_error: None,
        }
    }

    /// Returns the current settings.
    #[must_use]
    pub const fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    // ---- configuration -------------------------------------------------

    /// Switches between XML (raw responses) and JSON.
    pub fn use_xml(&mut self, enabled: bool) {
        self.config.set_media_type(if enabled {
            MediaType::Xml
        } else {
            MediaType::Json
        });
    }

    /// Switches between form-urlencoded bodies and JSON.
    pub fn use_urlencoded(&mut self, enabled: bool) {
        self.config.set_media_type(if enabled {
            MediaType::UrlEncoded
        } else {
            MediaType::Json
        });
    }

    /// Raise 4xx/5xx responses as errors instead of recording them.
    pub fn set_fail_on_error(&mut self, enabled: bool) {
        self.config.set_fail_on_error(enabled);
    }

    /// Enables or disables automatic retries.
    pub fn set_auto_retry(&mut self, enabled: bool) {
        self.config.set_auto_retry(enabled);
    }

    /// Enables or disables following of 301/302 redirects.
    pub fn set_follow_redirects(&mut self, enabled: bool) {
        self.config.set_follow_redirects(enabled);
    }

    /// Sets the per-attempt timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.set_timeout(timeout);
        self.client = None;
    }

    /// Routes traffic through a proxy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the proxy address is invalid.
    pub fn use_proxy(&mut self, host: &str, port: Option<u16>) -> Result<(), ConfigError> {
        let proxy = Proxy::new(host, port)?;
        self.config.set_proxy(Some(proxy));
        self.client = None;
        Ok(())
    }

    /// Enables or disables certificate verification.
    pub fn verify_peer(&mut self, enabled: bool) {
        self.config.set_verify_peer(enabled);
        self.client = None;
    }

    /// Restricts the minimum TLS protocol version.
    pub fn set_min_tls_version(&mut self, version: TlsVersion) {
        self.config.set_min_tls_version(Some(version));
        self.client = None;
    }

    /// Restricts the minimum TLS protocol version by name (e.g. `TLSv1.2`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTlsVersion`] for unknown names.
    pub fn set_cipher(&mut self, cipher: &str) -> Result<(), ConfigError> {
        self.set_min_tls_version(cipher.parse()?);
        Ok(())
    }

    /// Adds (or replaces) a request header. Names are case-insensitive.
    pub fn add_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Removes a request header.
    pub fn remove_header(&mut self, name: &str) {
        self.headers.remove(&name.to_ascii_lowercase());
    }

    /// Returns the custom request headers, keyed by lower-cased name.
    #[must_use]
    pub const fn request_headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Authenticates with Basic credentials, dropping any OAuth headers.
    pub fn authenticate_basic(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.remove_header(AUTH_CLIENT_HEADER);
        self.remove_header(AUTH_TOKEN_HEADER);
        self.basic_auth = Some((username.into(), password.into()));
    }

    /// Authenticates with OAuth headers, dropping any Basic credentials.
    pub fn authenticate_oauth(&mut self, client_id: impl Into<String>, auth_token: impl Into<String>) {
        self.basic_auth = None;
        self.add_header(AUTH_CLIENT_HEADER, client_id);
        self.add_header(AUTH_TOKEN_HEADER, auth_token);
    }

    /// Returns the Basic auth username, if Basic authentication is active.
    #[must_use]
    pub fn basic_auth_username(&self) -> Option<&str> {
        self.basic_auth.as_ref().map(|(user, _)| user.as_str())
    }

    // ---- diagnostics ---------------------------------------------------

    /// Returns the status code of the last response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.last_response.as_ref().map(|r| r.status)
    }

    /// Returns the status line of the last response, e.g. `HTTP/1.1 200 OK`.
    #[must_use]
    pub fn status_line(&self) -> Option<&str> {
        self.last_response.as_ref().map(|r| r.status_line.as_str())
    }

    /// Returns the raw body of the last response.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.last_response.as_ref().map(|r| r.body.as_slice())
    }

    /// Returns a header of the last response (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.last_response.as_ref().and_then(|r| r.header(name))
    }

    /// Returns all headers of the last response, keyed by lower-cased name.
    #[must_use]
    pub fn headers(&self) -> Option<&HashMap<String, String>> {
        self.last_response.as_ref().map(|r| &r.headers)
    }

    /// Returns the decoded body of the last suppressed 4xx/5xx response.
    ///
    /// Cleared at the start of every attempt.
    #[must_use]
    pub const fn last_error(&self) -> Option<&ResponseBody> {
        self.last_error.as_ref()
    }

    /// Returns the number of budgeted retries made in the current call.
    #[must_use]
    pub const fn retry_attempts(&self) -> u32 {
        self.retry.attempts_made()
    }

    /// Returns the number of redirects followed by the last call, across
    /// all of its attempts.
    #[must_use]
    pub const fn redirects_followed(&self) -> u32 {
        self.redirects_followed
    }

    // ---- verbs -----------------------------------------------------------

    /// Sends a GET request, appending `query` to the URL.
    ///
    /// # Errors
    ///
    /// See the [module documentation](self) for the result contract.
    pub async fn get(
        &mut self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<ResponseBody>, HttpError> {
        let request = self
            .request_builder(HttpMethod::Get, url)
            .query(query.iter().copied())
            .build()?;
        self.execute(&request).await
    }

    /// Sends a POST request with `body` encoded for the active media type.
    ///
    /// # Errors
    ///
    /// See the [module documentation](self) for the result contract.
    pub async fn post(&mut self, url: &str, body: &Value) -> Result<Option<ResponseBody>, HttpError> {
        let request = self
            .request_builder(HttpMethod::Post, url)
            .body(body.clone())
            .build()?;
        self.execute(&request).await
    }

    /// Sends a PUT request with `body` encoded for the active media type.
    ///
    /// # Errors
    ///
    /// See the [module documentation](self) for the result contract.
    pub async fn put(&mut self, url: &str, body: &Value) -> Result<Option<ResponseBody>, HttpError> {
        let request = self
            .request_builder(HttpMethod::Put, url)
            .body(body.clone())
            .build()?;
        self.execute(&request).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See the [module documentation](self) for the result contract.
    pub async fn delete(&mut self, url: &str) -> Result<Option<ResponseBody>, HttpError> {
        let request = self.request_builder(HttpMethod::Delete, url).build()?;
        self.execute(&request).await
    }

    /// Sends a HEAD request. Inspect [`headers`](Self::headers) afterwards.
    ///
    /// # Errors
    ///
    /// See the [module documentation](self) for the result contract.
    pub async fn head(&mut self, url: &str) -> Result<Option<ResponseBody>, HttpError> {
        let request = self.request_builder(HttpMethod::Head, url).build()?;
        self.execute(&request).await
    }

    fn request_builder(&self, method: HttpMethod, url: &str) -> HttpRequestBuilder {
        HttpRequest::builder(method, url).media_type(self.config.media_type())
    }

    /// Runs one logical call: attempts wrapped in the retry policy.
    ///
    /// The request's own media type drives the `Accept` and `Content-Type`
    /// headers and whether the response is parsed; the connection's media
    /// type only seeds requests built by the verb methods.
    ///
    /// # Errors
    ///
    /// See the [module documentation](self) for the result contract.
    pub async fn execute(&mut self, request: &HttpRequest) -> Result<Option<ResponseBody>, HttpError> {
        let policy = RetryPolicy::from_config(&self.config);
        self.retry.reset();
        self.redirects_followed = 0;

        loop {
            let error = match self.attempt(request).await {
                Ok(outcome) => return Ok(outcome),
                Err(error) => error,
            };

            let empty = HashMap::new();
            let headers = self.headers().unwrap_or(&empty);
            let decision = policy.decide(&error, &self.retry, headers);

            match decision {
                RetryDecision::Retry {
                    delay,
                    consumes_budget,
                } => {
                    tracing::warn!(
                        "Retrying {} {} after error {} ({}) in {:?}; budgeted retries used: {}{}",
                        request.method(),
                        request.url(),
                        error.code(),
                        error.message(),
                        delay,
                        self.retry.attempts_made(),
                        if consumes_budget { " (+1)" } else { "" }
                    );
                    self.retry.record(decision);
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    if self.retry.attempts_made() > 0 {
                        tracing::warn!(
                            "Giving up on {} {} after {} retries: {}",
                            request.method(),
                            request.url(),
                            self.retry.attempts_made(),
                            error
                        );
                    }
                    return Err(error);
                }
            }
        }
    }

    /// One attempt: send, chase redirects, classify.
    ///
    /// Every attempt replays the redirect chain from the request URL, so the
    /// hop counter starts from zero here.
    async fn attempt(&mut self, request: &HttpRequest) -> Result<Option<ResponseBody>, HttpError> {
        let media_type = request.media_type();
        let mut method = request.method();
        let mut url = request.url().clone();
        self.redirects.reset();

        loop {
            self.last_response = None;
            self.last_error = None;

            tracing::debug!("Sending {} {}", method, url);
            let body = if method.has_body() { request.body() } else { None };
            let response = self.send(method, &url, body, media_type).await?;

            if self.config.follow_redirects() {
                if let Some(next) = self.redirects.next_location(&response, &url)? {
                    tracing::debug!(
                        "Following {} redirect {} -> {} (hop {})",
                        response.status,
                        url,
                        next,
                        self.redirects.hops()
                    );
                    self.redirects_followed += 1;
                    self.last_response = Some(response);
                    method = HttpMethod::Get;
                    url = next;
                    continue;
                }
            }

            return self.classify(response, media_type);
        }
    }

    /// Maps a final response onto the result contract and keeps it for the
    /// diagnostic accessors.
    fn classify(
        &mut self,
        response: RawResponse,
        media_type: MediaType,
    ) -> Result<Option<ResponseBody>, HttpError> {
        let status = response.status;
        let body = decode(&response.body, media_type.is_raw());

        if !(400..=599).contains(&status) {
            self.last_response = Some(response);
            self.retry.reset();
            return Ok(Some(body));
        }

        if !self.config.fail_on_error() {
            tracing::debug!(
                "Recording {} response as last error ({})",
                status,
                response.status_line
            );
            self.last_response = Some(response);
            self.last_error = Some(body);
            return Ok(None);
        }

        let mut message = extract_message(&body);
        if message.is_empty() {
            message.clone_from(&response.status_line);
        }
        self.last_response = Some(response);
        if status < 500 {
            Err(ClientError {
                code: status,
                message,
                body,
            }
            .into())
        } else {
            Err(ServerError {
                code: status,
                message,
                body,
            }
            .into())
        }
    }

    /// Performs a single network exchange.
    async fn send(
        &mut self,
        method: HttpMethod,
        url: &Url,
        body: Option<&str>,
        media_type: MediaType,
    ) -> Result<RawResponse, HttpError> {
        let client = self.client()?;

        let mut builder = client.request(method.as_reqwest(), url.clone());
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = builder.header(ACCEPT, media_type.as_mime());
        if method.has_body() {
            builder = builder
                .header(CONTENT_TYPE, media_type.as_mime())
                .body(body.unwrap_or_default().to_string());
        }
        if let Some((username, password)) = &self.basic_auth {
            builder = builder.basic_auth(username, Some(password));
        }

        let response = builder.send().await.map_err(NetworkError::from)?;
        let status = response.status();
        let status_line = format!("{:?} {}", response.version(), status);
        let headers = collect_headers(response.headers());
        let bytes = response.bytes().await.map_err(NetworkError::from)?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_line,
            headers,
            body: bytes.to_vec(),
        })
    }

    /// Returns the HTTP engine, building it if settings changed.
    fn client(&mut self) -> Result<reqwest::Client, InvalidHttpRequestError> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let client = build_client(&self.config)?;
        self.client = Some(client.clone());
        Ok(client)
    }
}

fn build_client(config: &ConnectionConfig) -> Result<reqwest::Client, InvalidHttpRequestError> {
    let build_error = |e: reqwest::Error| InvalidHttpRequestError::ClientBuild {
        reason: e.to_string(),
    };

    let user_agent = config
        .user_agent()
        .map_or_else(|| format!("bigcommerce-api-rust/{SDK_VERSION}"), String::from);

    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .danger_accept_invalid_certs(!config.verify_peer())
        .user_agent(user_agent);

    if let Some(version) = config.min_tls_version() {
        builder = builder.min_tls_version(version.to_reqwest());
    }
    builder = match config.proxy() {
        Some(proxy) => builder.proxy(reqwest::Proxy::all(proxy.url()).map_err(build_error)?),
        None => builder.no_proxy(),
    };

    builder.build().map_err(build_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_modes_are_mutually_exclusive() {
        let mut connection = Connection::default();

        connection.authenticate_basic("admin", "secret");
        assert_eq!(connection.basic_auth_username(), Some("admin"));
        assert!(!connection.request_headers().contains_key(AUTH_CLIENT_HEADER));

        connection.authenticate_oauth("client", "token");
        assert!(connection.basic_auth_username().is_none());
        assert_eq!(
            connection.request_headers().get(AUTH_CLIENT_HEADER),
            Some(&"client".to_string())
        );
        assert_eq!(
            connection.request_headers().get(AUTH_TOKEN_HEADER),
            Some(&"token".to_string())
        );

        connection.authenticate_basic("admin", "secret");
        assert!(!connection.request_headers().contains_key(AUTH_CLIENT_HEADER));
        assert!(!connection.request_headers().contains_key(AUTH_TOKEN_HEADER));
        assert_eq!(connection.basic_auth_username(), Some("admin"));
    }

    #[test]
    fn test_headers_are_case_insensitive_last_write_wins() {
        let mut connection = Connection::default();
        connection.add_header("X-Custom", "one");
        connection.add_header("x-custom", "two");
        assert_eq!(connection.request_headers().len(), 1);
        assert_eq!(
            connection.request_headers().get("x-custom"),
            Some(&"two".to_string())
        );
        connection.remove_header("X-CUSTOM");
        assert!(connection.request_headers().is_empty());
    }

    #[test]
    fn test_media_type_switches() {
        let mut connection = Connection::default();
        connection.use_xml(true);
        assert!(connection.config().raw_response_mode());
        connection.use_xml(false);
        assert_eq!(connection.config().media_type(), MediaType::Json);
        connection.use_urlencoded(true);
        assert_eq!(connection.config().media_type(), MediaType::UrlEncoded);
    }

    #[test]
    fn test_set_cipher_parses_names() {
        let mut connection = Connection::default();
        connection.set_cipher("TLSv1.2").unwrap();
        assert_eq!(connection.config().min_tls_version(), Some(TlsVersion::Tls1_2));
        assert!(connection.set_cipher("RC4-SHA").is_err());
    }

    #[test]
    fn test_no_diagnostics_before_first_request() {
        let connection = Connection::default();
        assert!(connection.status().is_none());
        assert!(connection.status_line().is_none());
        assert!(connection.headers().is_none());
        assert!(connection.last_error().is_none());
        assert_eq!(connection.retry_attempts(), 0);
        assert_eq!(connection.redirects_followed(), 0);
    }

    #[test]
    fn test_build_client_with_all_options() {
        let config = ConnectionConfig::builder()
            .verify_peer(false)
            .min_tls_version(TlsVersion::Tls1_2)
            .proxy(Proxy::new("proxy.local", Some(3128)).unwrap())
            .user_agent("custom/1.0")
            .build()
            .unwrap();
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn test_connection_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Connection>();
    }
}
