//! Transport settings for a [`Connection`](crate::clients::Connection).
//!
//! [`ConnectionConfig`] carries timeouts, TLS and proxy settings, redirect and
//! retry behaviour, and the negotiated media type. Build one with
//! [`ConnectionConfig::builder`]; every field has a default.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use bigcommerce_api::{ConnectionConfig, MediaType};
//!
//! let config = ConnectionConfig::builder()
//!     .timeout(Duration::from_secs(30))
//!     .fail_on_error(true)
//!     .media_type(MediaType::Xml)
//!     .build()
//!     .unwrap();
//!
//! assert!(config.fail_on_error());
//! assert!(config.raw_response_mode());
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::clients::{MediaType, MAX_REDIRECTS};
use crate::error::ConfigError;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default wait before retrying a 500/502 or a transient network fault.
pub const DEFAULT_SERVER_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Minimum TLS protocol version accepted when connecting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TlsVersion {
    /// TLS 1.0
    Tls1_0,
    /// TLS 1.1
    Tls1_1,
    /// TLS 1.2
    Tls1_2,
    /// TLS 1.3
    Tls1_3,
}

impl TlsVersion {
    pub(crate) const fn to_reqwest(self) -> reqwest::tls::Version {
        match self {
            Self::Tls1_0 => reqwest::tls::Version::TLS_1_0,
            Self::Tls1_1 => reqwest::tls::Version::TLS_1_1,
            Self::Tls1_2 => reqwest::tls::Version::TLS_1_2,
            Self::Tls1_3 => reqwest::tls::Version::TLS_1_3,
        }
    }
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Tls1_0 => "TLSv1",
            Self::Tls1_1 => "TLSv1.1",
            Self::Tls1_2 => "TLSv1.2",
            Self::Tls1_3 => "TLSv1.3",
        };
        f.write_str(s)
    }
}

impl FromStr for TlsVersion {
    type Err = ConfigError;

    /// Parses protocol names such as `TLSv1`, `TLSv1.2` or `tlsv1.3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tlsv1" | "tlsv1.0" => Ok(Self::Tls1_0),
            "tlsv1.1" => Ok(Self::Tls1_1),
            "tlsv1.2" => Ok(Self::Tls1_2),
            "tlsv1.3" => Ok(Self::Tls1_3),
            _ => Err(ConfigError::InvalidTlsVersion {
                version: s.to_string(),
            }),
        }
    }
}

/// An HTTP proxy server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proxy {
    host: String,
    port: Option<u16>,
}

impl Proxy {
    /// Creates a proxy definition from a host (optionally with scheme) and port.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the resulting proxy URL
    /// cannot be parsed.
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Result<Self, ConfigError> {
        let proxy = Self {
            host: host.into(),
            port,
        };
        let url = proxy.url();
        match reqwest::Url::parse(&url) {
            Ok(parsed) if parsed.host_str().is_some() => Ok(proxy),
            _ => Err(ConfigError::InvalidHostUrl { url }),
        }
    }

    /// Returns the proxy host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the proxy port, if one was given.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the proxy as a URL, defaulting the scheme to `http`.
    #[must_use]
    pub fn url(&self) -> String {
        let base = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("http://{}", self.host)
        };
        match self.port {
            Some(port) => format!("{base}:{port}"),
            None => base,
        }
    }
}

/// Settings for a single transport instance.
///
/// `ConnectionConfig` is `Clone`, `Send` and `Sync`.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    timeout: Duration,
    min_tls_version: Option<TlsVersion>,
    verify_peer: bool,
    proxy: Option<Proxy>,
    follow_redirects: bool,
    auto_retry: bool,
    fail_on_error: bool,
    media_type: MediaType,
    server_retry_delay: Duration,
    rate_limit_wait_ceiling: Option<Duration>,
    user_agent: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            min_tls_version: None,
            verify_peer: true,
            proxy: None,
            follow_redirects: true,
            auto_retry: true,
            fail_on_error: false,
            media_type: MediaType::Json,
            server_retry_delay: DEFAULT_SERVER_RETRY_DELAY,
            rate_limit_wait_ceiling: None,
            user_agent: None,
        }
    }
}

// Verify ConnectionConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConnectionConfig>();
};

impl ConnectionConfig {
    /// Creates a new builder for constructing a `ConnectionConfig`.
    #[must_use]
    pub fn builder() -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new()
    }

    /// Returns the per-attempt timeout (connect and whole request).
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the minimum TLS version, if restricted.
    #[must_use]
    pub const fn min_tls_version(&self) -> Option<TlsVersion> {
        self.min_tls_version
    }

    /// Returns whether server certificates are verified.
    #[must_use]
    pub const fn verify_peer(&self) -> bool {
        self.verify_peer
    }

    /// Returns the configured proxy.
    #[must_use]
    pub const fn proxy(&self) -> Option<&Proxy> {
        self.proxy.as_ref()
    }

    /// Returns whether 301/302 responses are followed.
    #[must_use]
    pub const fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }

    /// Returns the maximum number of redirect hops per logical call.
    #[must_use]
    pub const fn max_redirects(&self) -> u32 {
        MAX_REDIRECTS
    }

    /// Returns whether transient failures are retried automatically.
    #[must_use]
    pub const fn auto_retry(&self) -> bool {
        self.auto_retry
    }

    /// Returns whether 4xx/5xx responses are raised as errors.
    #[must_use]
    pub const fn fail_on_error(&self) -> bool {
        self.fail_on_error
    }

    /// Returns the negotiated media type.
    #[must_use]
    pub const fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Returns `true` when response bodies are returned unparsed.
    #[must_use]
    pub const fn raw_response_mode(&self) -> bool {
        self.media_type.is_raw()
    }

    /// Returns the wait before a server or network retry.
    #[must_use]
    pub const fn server_retry_delay(&self) -> Duration {
        self.server_retry_delay
    }

    /// Returns the overall ceiling for 408/429 waits, if any.
    #[must_use]
    pub const fn rate_limit_wait_ceiling(&self) -> Option<Duration> {
        self.rate_limit_wait_ceiling
    }

    /// Returns the `User-Agent` override, if any.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub(crate) fn set_min_tls_version(&mut self, version: Option<TlsVersion>) {
        self.min_tls_version = version;
    }

    pub(crate) fn set_verify_peer(&mut self, verify: bool) {
        self.verify_peer = verify;
    }

    pub(crate) fn set_proxy(&mut self, proxy: Option<Proxy>) {
        self.proxy = proxy;
    }

    pub(crate) fn set_follow_redirects(&mut self, follow: bool) {
        self.follow_redirects = follow;
    }

    pub(crate) fn set_auto_retry(&mut self, retry: bool) {
        self.auto_retry = retry;
    }

    pub(crate) fn set_fail_on_error(&mut self, fail: bool) {
        self.fail_on_error = fail;
    }

    pub(crate) fn set_media_type(&mut self, media_type: MediaType) {
        self.media_type = media_type;
    }
}

/// Builder for constructing [`ConnectionConfig`] instances.
///
/// # Defaults
///
/// - `timeout`: 60 seconds
/// - `min_tls_version`: none (engine default)
/// - `verify_peer`: `true`
/// - `proxy`: none
/// - `follow_redirects`: `true`
/// - `auto_retry`: `true`
/// - `fail_on_error`: `false`
/// - `media_type`: [`MediaType::Json`]
/// - `server_retry_delay`: 60 seconds
/// - `rate_limit_wait_ceiling`: none (wait indefinitely)
#[derive(Debug, Default)]
pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the minimum TLS protocol version.
    #[must_use]
    pub const fn min_tls_version(mut self, version: TlsVersion) -> Self {
        self.config.min_tls_version = Some(version);
        self
    }

    /// Enables or disables certificate verification.
    #[must_use]
    pub const fn verify_peer(mut self, verify: bool) -> Self {
        self.config.verify_peer = verify;
        self
    }

    /// Routes all traffic through a proxy.
    #[must_use]
    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Enables or disables following of 301/302 redirects.
    #[must_use]
    pub const fn follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    /// Enables or disables automatic retries.
    #[must_use]
    pub const fn auto_retry(mut self, retry: bool) -> Self {
        self.config.auto_retry = retry;
        self
    }

    /// Raise 4xx/5xx responses as errors instead of recording them.
    #[must_use]
    pub const fn fail_on_error(mut self, fail: bool) -> Self {
        self.config.fail_on_error = fail;
        self
    }

    /// Sets the negotiated media type.
    #[must_use]
    pub const fn media_type(mut self, media_type: MediaType) -> Self {
        self.config.media_type = media_type;
        self
    }

    /// Sets the wait before a server or network retry.
    #[must_use]
    pub const fn server_retry_delay(mut self, delay: Duration) -> Self {
        self.config.server_retry_delay = delay;
        self
    }

    /// Caps the total time spent waiting out 408/429 responses in one call.
    #[must_use]
    pub const fn rate_limit_wait_ceiling(mut self, ceiling: Duration) -> Self {
        self.config.rate_limit_wait_ceiling = Some(ceiling);
        self
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the [`ConnectionConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] if the timeout is zero.
    pub fn build(self) -> Result<ConnectionConfig, ConfigError> {
        if self.config.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(self.config)
    }
}
