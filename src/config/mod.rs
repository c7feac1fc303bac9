//! Configuration types for the BigCommerce API client.
//!
//! This module provides the configuration used to construct a
//! [`StoreClient`](crate::rest::StoreClient) or a bare
//! [`Connection`](crate::clients::Connection).
//!
//! # Overview
//!
//! - [`StoreConfig`]: credentials, API version and hosts for one store
//! - [`StoreConfigBuilder`]: a builder for [`StoreConfig`]
//! - [`ConnectionConfig`]: transport settings (timeouts, TLS, retries, redirects)
//! - [`StoreUrl`], [`StoreHash`], [`ClientId`], [`HostUrl`]: validated newtypes
//! - [`ApiKey`], [`AuthToken`], [`ClientSecret`]: secrets with masked debug output
//! - [`ApiVersion`]: the API version segment used in OAuth paths
//!
//! # Example
//!
//! ```rust
//! use bigcommerce_api::{AuthToken, ClientId, Credentials, StoreConfig, StoreHash};
//!
//! let config = StoreConfig::builder()
//!     .credentials(Credentials::OAuth {
//!         client_id: ClientId::new("client-id").unwrap(),
//!         auth_token: AuthToken::new("token").unwrap(),
//!         store_hash: StoreHash::new("abc123").unwrap(),
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_path(), "https://api.bigcommerce.com/stores/abc123/v2");
//! ```

mod connection;
mod newtypes;
mod version;

pub use connection::{
    ConnectionConfig, ConnectionConfigBuilder, Proxy, TlsVersion, DEFAULT_SERVER_RETRY_DELAY,
    DEFAULT_TIMEOUT,
};
pub use newtypes::{ApiKey, AuthToken, ClientId, ClientSecret, HostUrl, StoreHash, StoreUrl};
pub use version::ApiVersion;

use crate::auth::Credentials;
use crate::error::ConfigError;

/// Default host for OAuth API requests.
pub const DEFAULT_API_HOST: &str = "https://api.bigcommerce.com";

/// Default host for OAuth token exchange.
pub const DEFAULT_LOGIN_HOST: &str = "https://login.bigcommerce.com";

/// Configuration for one BigCommerce store.
///
/// `StoreConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    credentials: Credentials,
    api_version: ApiVersion,
    api_host: HostUrl,
    login_host: HostUrl,
    client_secret: Option<ClientSecret>,
    connection: ConnectionConfig,
}

impl StoreConfig {
    /// Creates a new builder for constructing a `StoreConfig`.
    #[must_use]
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::new()
    }

    /// Returns the credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the OAuth API host.
    #[must_use]
    pub const fn api_host(&self) -> &HostUrl {
        &self.api_host
    }

    /// Returns the OAuth login host.
    #[must_use]
    pub const fn login_host(&self) -> &HostUrl {
        &self.login_host
    }

    /// Returns the OAuth client secret, if configured.
    #[must_use]
    pub const fn client_secret(&self) -> Option<&ClientSecret> {
        self.client_secret.as_ref()
    }

    /// Returns the transport settings.
    #[must_use]
    pub const fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    /// Returns the base path every resource path is appended to.
    ///
    /// Basic credentials use `{store_url}/api/v2`; OAuth credentials use
    /// `{api_host}/stores/{store_hash}/{version}`.
    #[must_use]
    pub fn api_path(&self) -> String {
        self.api_path_for(&self.api_version)
    }

    /// Returns the base path for an explicit API version.
    ///
    /// Basic credentials always target the store's `v2` endpoint.
    #[must_use]
    pub fn api_path_for(&self, version: &ApiVersion) -> String {
        match &self.credentials {
            Credentials::Basic { store_url, .. } => format!("{}/api/v2", store_url.as_ref()),
            Credentials::OAuth { store_hash, .. } => format!(
                "{}/stores/{}/{}",
                self.api_host.as_ref(),
                store_hash.as_ref(),
                version
            ),
        }
    }

    pub(crate) fn set_api_version(&mut self, version: ApiVersion) {
        self.api_version = version;
    }
}

// Verify StoreConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StoreConfig>();
};

/// Builder for constructing [`StoreConfig`] instances.
///
/// `credentials` is required. All other fields have defaults.
///
/// # Defaults
///
/// - `api_version`: [`ApiVersion::V2`]
/// - `api_host`: `https://api.bigcommerce.com`
/// - `login_host`: `https://login.bigcommerce.com`
/// - `client_secret`: `None`
/// - `connection`: [`ConnectionConfig::default()`]
#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    credentials: Option<Credentials>,
    api_version: Option<ApiVersion>,
    api_host: Option<HostUrl>,
    login_host: Option<HostUrl>,
    client_secret: Option<ClientSecret>,
    connection: Option<ConnectionConfig>,
}

impl StoreConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the credentials (required).
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Overrides the OAuth API host.
    #[must_use]
    pub fn api_host(mut self, host: HostUrl) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Overrides the OAuth login host.
    #[must_use]
    pub fn login_host(mut self, host: HostUrl) -> Self {
        self.login_host = Some(host);
        self
    }

    /// Sets the OAuth client secret used for token exchange and login tokens.
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Sets the transport settings.
    #[must_use]
    pub fn connection(mut self, connection: ConnectionConfig) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Builds the [`StoreConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `credentials` is not set.
    pub fn build(self) -> Result<StoreConfig, ConfigError> {
        let credentials = self.credentials.ok_or(ConfigError::MissingRequiredField {
            field: "credentials",
        })?;

        let api_host = match self.api_host {
            Some(host) => host,
            None => HostUrl::new(DEFAULT_API_HOST)?,
        };
        let login_host = match self.login_host {
            Some(host) => host,
            None => HostUrl::new(DEFAULT_LOGIN_HOST)?,
        };

        Ok(StoreConfig {
            credentials,
            api_version: self.api_version.unwrap_or_default(),
            api_host,
            login_host,
            client_secret: self.client_secret,
            connection: self.connection.unwrap_or_default(),
        })
    }
}
