//! Authentication for the BigCommerce API.
//!
//! # Overview
//!
//! - [`Credentials`]: Basic (store URL, username, API key) or OAuth
//!   (client id, access token, store hash)
//! - [`exchange_auth_code`]: swaps a temporary OAuth authorization code for a
//!   long-lived access token
//! - [`customer_login_token`]: signs a single-sign-on JWT for a storefront
//!   customer
//! - [`AuthError`]: failures of the above
//!
//! # Example
//!
//! ```rust
//! use bigcommerce_api::{ApiKey, Credentials, StoreUrl};
//!
//! let credentials = Credentials::basic(
//!     StoreUrl::new("https://store.example.com").unwrap(),
//!     "admin",
//!     ApiKey::new("api-key").unwrap(),
//! )
//! .unwrap();
//!
//! assert!(!credentials.is_oauth());
//! ```

mod error;
mod login_token;
mod token;

pub use error::AuthError;
pub use login_token::{customer_login_token, CustomerLoginClaims, CUSTOMER_LOGIN_OPERATION};
pub use token::{exchange_auth_code, AccessTokenResponse, AuthCodeRequest, AuthorizedUser};

use crate::clients::Connection;
use crate::config::{ApiKey, AuthToken, ClientId, StoreHash, StoreUrl};
use crate::error::ConfigError;

/// Credentials for one store.
///
/// The two modes are mutually exclusive; applying one to a [`Connection`]
/// clears whatever the other one had set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    /// Legacy Basic authentication against the store's own domain.
    Basic {
        /// The store's base URL.
        store_url: StoreUrl,
        /// The API username.
        username: String,
        /// The API key, used as the password.
        api_key: ApiKey,
    },
    /// OAuth authentication against the central API host.
    OAuth {
        /// The app's client id, sent as `X-Auth-Client`.
        client_id: ClientId,
        /// The access token, sent as `X-Auth-Token`.
        auth_token: AuthToken,
        /// The store hash used in API paths.
        store_hash: StoreHash,
    },
}

impl Credentials {
    /// Creates Basic credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if `username` is empty.
    pub fn basic(
        store_url: StoreUrl,
        username: impl Into<String>,
        api_key: ApiKey,
    ) -> Result<Self, ConfigError> {
        let username = username.into();
        if username.is_empty() {
            return Err(ConfigError::EmptyCredential { field: "username" });
        }
        Ok(Self::Basic {
            store_url,
            username,
            api_key,
        })
    }

    /// Returns `true` for OAuth credentials.
    #[must_use]
    pub const fn is_oauth(&self) -> bool {
        matches!(self, Self::OAuth { .. })
    }

    /// Configures `connection` to authenticate with these credentials.
    pub fn apply(&self, connection: &mut Connection) {
        match self {
            Self::Basic {
                username, api_key, ..
            } => connection.authenticate_basic(username.as_str(), api_key.as_ref()),
            Self::OAuth {
                client_id,
                auth_token,
                ..
            } => connection.authenticate_oauth(client_id.as_ref(), auth_token.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{AUTH_CLIENT_HEADER, AUTH_TOKEN_HEADER};

    fn oauth() -> Credentials {
        Credentials::OAuth {
            client_id: ClientId::new("client").unwrap(),
            auth_token: AuthToken::new("token").unwrap(),
            store_hash: StoreHash::new("abc").unwrap(),
        }
    }

    fn basic() -> Credentials {
        Credentials::basic(
            StoreUrl::new("https://store.example.com").unwrap(),
            "admin",
            ApiKey::new("key").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_basic_requires_username() {
        let result = Credentials::basic(
            StoreUrl::new("https://store.example.com").unwrap(),
            "",
            ApiKey::new("key").unwrap(),
        );
        assert_eq!(
            result,
            Err(ConfigError::EmptyCredential { field: "username" })
        );
    }

    #[test]
    fn test_apply_switches_modes() {
        let mut connection = Connection::default();

        oauth().apply(&mut connection);
        assert_eq!(
            connection.request_headers().get(AUTH_TOKEN_HEADER),
            Some(&"token".to_string())
        );

        basic().apply(&mut connection);
        assert_eq!(connection.basic_auth_username(), Some("admin"));
        assert!(!connection.request_headers().contains_key(AUTH_CLIENT_HEADER));
        assert!(!connection.request_headers().contains_key(AUTH_TOKEN_HEADER));
    }

    #[test]
    fn test_debug_masks_secrets() {
        let debug_str = format!("{:?}", basic());
        assert!(debug_str.contains("admin"));
        assert!(!debug_str.contains("\"key\""));
    }
}
