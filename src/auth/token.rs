//! OAuth authorization code exchange.
//!
//! When a merchant installs an app, BigCommerce calls the app's auth
//! callback with a temporary `code`. [`exchange_auth_code`] posts that code,
//! together with the app's client credentials, to
//! `{login_host}/oauth2/token` and returns the permanent access token.
//!
//! The request is form-urlencoded and sent on a fresh [`Connection`] that
//! inherits the caller's TLS, proxy and timeout settings and raises any
//! 4xx/5xx as an error.
//!
//! # Example
//!
//! ```rust,ignore
//! use bigcommerce_api::auth::{exchange_auth_code, AuthCodeRequest};
//! use bigcommerce_api::{ClientId, ClientSecret, ConnectionConfig, HostUrl};
//!
//! let request = AuthCodeRequest::new(
//!     ClientId::new("client-id")?,
//!     ClientSecret::new("client-secret")?,
//!     "temporary-code",
//!     "store_v2_products users_basic_information",
//!     "stores/abc123",
//!     "https://app.example.com/auth",
//! );
//! let login_host = HostUrl::new("https://login.bigcommerce.com")?;
//! let token = exchange_auth_code(&login_host, &ConnectionConfig::default(), &request).await?;
//! println!("token for {}", token.context);
//! ```

use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthError;
use crate::clients::{Connection, ResponseBody};
use crate::config::{ClientId, ClientSecret, ConnectionConfig, HostUrl};

/// Grant type sent with the exchange.
const AUTHORIZATION_CODE_GRANT: &str = "authorization_code";

/// The parameters of an authorization code exchange.
#[derive(Clone, Debug)]
pub struct AuthCodeRequest {
    /// The app's client id.
    pub client_id: ClientId,
    /// The app's client secret.
    pub client_secret: ClientSecret,
    /// The temporary code from the auth callback.
    pub code: String,
    /// The scopes from the auth callback.
    pub scope: String,
    /// The store context from the auth callback, e.g. `stores/abc123`.
    pub context: String,
    /// The app's registered auth callback URL.
    pub redirect_uri: String,
}

impl AuthCodeRequest {
    /// Creates a new exchange request.
    #[must_use]
    pub fn new(
        client_id: ClientId,
        client_secret: ClientSecret,
        code: impl Into<String>,
        scope: impl Into<String>,
        context: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            code: code.into(),
            scope: scope.into(),
            context: context.into(),
            redirect_uri: redirect_uri.into(),
        }
    }
}

/// The user who authorized the app.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AuthorizedUser {
    /// The user id.
    pub id: u64,
    /// The username, if returned.
    #[serde(default)]
    pub username: Option<String>,
    /// The email address, if returned.
    #[serde(default)]
    pub email: Option<String>,
}

/// A successful token exchange.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AccessTokenResponse {
    /// The permanent access token.
    pub access_token: String,
    /// The granted scopes.
    #[serde(default)]
    pub scope: String,
    /// The user who installed the app.
    #[serde(default)]
    pub user: Option<AuthorizedUser>,
    /// The store context, e.g. `stores/abc123`.
    #[serde(default)]
    pub context: String,
    /// The account UUID, if returned.
    #[serde(default)]
    pub account_uuid: Option<String>,
}

impl AccessTokenResponse {
    /// Returns the store hash from the context (`stores/{hash}`).
    #[must_use]
    pub fn store_hash(&self) -> Option<&str> {
        self.context.strip_prefix("stores/")
    }
}

/// Exchanges a temporary authorization code for an access token.
///
/// # Errors
///
/// - [`AuthError::Http`] if the request fails or the server answers 4xx/5xx
/// - [`AuthError::InvalidTokenResponse`] if the body is not a token
pub async fn exchange_auth_code(
    login_host: &HostUrl,
    connection_config: &ConnectionConfig,
    request: &AuthCodeRequest,
) -> Result<AccessTokenResponse, AuthError> {
    let mut connection = Connection::new(connection_config.clone());
    connection.use_urlencoded(true);
    connection.set_fail_on_error(true);

    let body = json!({
        "client_id": request.client_id.as_ref(),
        "client_secret": request.client_secret.as_ref(),
        "code": request.code,
        "scope": request.scope,
        "grant_type": AUTHORIZATION_CODE_GRANT,
        "redirect_uri": request.redirect_uri,
        "context": request.context,
    });

    let url = format!("{}/oauth2/token", login_host.as_ref());
    tracing::debug!("Exchanging auth code for context {}", request.context);

    let parsed = match connection.post(&url, &body).await? {
        Some(ResponseBody::Json(value)) => serde_json::from_value(value),
        Some(ResponseBody::Raw(text)) => serde_json::from_str(&text),
        None => {
            return Err(AuthError::InvalidTokenResponse {
                reason: "no response body".to_string(),
            })
        }
    };
    parsed.map_err(|e| AuthError::InvalidTokenResponse {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpError;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> AuthCodeRequest {
        AuthCodeRequest::new(
            ClientId::new("client-id").unwrap(),
            ClientSecret::new("client-secret").unwrap(),
            "temp-code",
            "store_v2_products",
            "stores/abc123",
            "https://app.example.com/auth",
        )
    }

    fn fast_config() -> ConnectionConfig {
        ConnectionConfig::builder()
            .server_retry_delay(Duration::ZERO)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_exchange_posts_form_and_parses_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=temp-code"))
            .and(body_string_contains("client_secret=client-secret"))
            .and(body_string_contains("redirect_uri=https%3A%2F%2Fapp.example.com%2Fauth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "permanent-token",
                "scope": "store_v2_products",
                "user": {"id": 24654, "email": "merchant@example.com"},
                "context": "stores/abc123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let login_host = HostUrl::new(server.uri()).unwrap();
        let token = exchange_auth_code(&login_host, &fast_config(), &request())
            .await
            .unwrap();

        assert_eq!(token.access_token, "permanent-token");
        assert_eq!(token.store_hash(), Some("abc123"));
        assert_eq!(token.user.unwrap().id, 24654);
    }

    #[tokio::test]
    async fn test_exchange_raises_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({"error": "Invalid code"})),
            )
            .mount(&server)
            .await;

        let login_host = HostUrl::new(server.uri()).unwrap();
        let result = exchange_auth_code(&login_host, &fast_config(), &request()).await;

        match result {
            Err(AuthError::Http(HttpError::Client(e))) => {
                assert_eq!(e.code, 401);
                assert_eq!(e.message, "Invalid code");
            }
            other => panic!("expected client error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exchange_rejects_non_token_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let login_host = HostUrl::new(server.uri()).unwrap();
        let result = exchange_auth_code(&login_host, &fast_config(), &request()).await;
        assert!(matches!(
            result,
            Err(AuthError::InvalidTokenResponse { .. })
        ));
    }
}
