//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use reqwest::Url;
use std::fmt;

/// Parses an absolute `http`/`https` URL and returns it without a trailing slash.
fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    Some(trimmed.to_string())
}

/// A validated store URL used with Basic authentication.
///
/// Trailing slashes are removed so the API path can be appended directly.
///
/// # Example
///
/// ```rust
/// use bigcommerce_api::StoreUrl;
///
/// let url = StoreUrl::new("https://store.example.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://store.example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreUrl(String);

impl StoreUrl {
    /// Creates a new validated store URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStoreUrl`] if the URL is not absolute
    /// or does not use `http`/`https`.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        normalize_base_url(&url)
            .map(Self)
            .ok_or(ConfigError::InvalidStoreUrl { url })
    }
}

impl AsRef<str> for StoreUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated host URL for the API or login service.
///
/// # Example
///
/// ```rust
/// use bigcommerce_api::HostUrl;
///
/// let host = HostUrl::new("https://api.bigcommerce.com").unwrap();
/// assert_eq!(host.as_ref(), "https://api.bigcommerce.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostUrl(String);

impl HostUrl {
    /// Creates a new validated host URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the URL is invalid.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        normalize_base_url(&url)
            .map(Self)
            .ok_or(ConfigError::InvalidHostUrl { url })
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated store hash, the identifier used in OAuth API paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreHash(String);

impl StoreHash {
    /// Creates a new validated store hash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStoreHash`] if the hash is empty or
    /// contains anything but ASCII letters and digits.
    pub fn new(hash: impl Into<String>) -> Result<Self, ConfigError> {
        let hash = hash.into();
        let hash = hash.trim().to_string();
        if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidStoreHash { hash });
        }
        Ok(Self(hash))
    }
}

impl AsRef<str> for StoreHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated OAuth client identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new validated client id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigError::EmptyCredential { field: "client_id" });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

macro_rules! masked_secret {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            /// Creates a new validated secret.
            ///
            /// # Errors
            ///
            /// Returns [`ConfigError::EmptyCredential`] if the value is empty.
            pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
                let value = value.into();
                if value.is_empty() {
                    return Err(ConfigError::EmptyCredential { field: $field });
                }
                Ok(Self(value))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(*****)"))
            }
        }
    };
}

masked_secret!(
    /// The API key (password) used with Basic authentication.
    ///
    /// The `Debug` implementation masks the value.
    ///
    /// ```rust
    /// use bigcommerce_api::ApiKey;
    ///
    /// let key = ApiKey::new("secret").unwrap();
    /// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
    /// ```
    ApiKey,
    "api_key"
);

masked_secret!(
    /// The OAuth access token sent in the `X-Auth-Token` header.
    AuthToken,
    "auth_token"
);

masked_secret!(
    /// The OAuth client secret used for token exchange and login token signing.
    ClientSecret,
    "client_secret"
);
