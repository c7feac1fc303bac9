//! Customer single-sign-on tokens.
//!
//! [`customer_login_token`] signs an HS256 JWT that logs a customer into the
//! storefront when they visit `{store_url}/login/token/{jwt}`. The token is
//! signed with the app's client secret, so the store must be configured with
//! OAuth credentials and a [`ClientSecret`](crate::config::ClientSecret).

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthError, Credentials};
use crate::config::StoreConfig;

/// The `operation` claim of a customer login token.
pub const CUSTOMER_LOGIN_OPERATION: &str = "customer_login";

/// Claims carried by a customer login token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerLoginClaims {
    /// Issuer: the app's client id.
    pub iss: String,
    /// Issued-at time, seconds since the epoch.
    pub iat: i64,
    /// Unique token id: 64 hex characters.
    pub jti: String,
    /// Always [`CUSTOMER_LOGIN_OPERATION`].
    pub operation: String,
    /// The store the customer belongs to.
    pub store_hash: String,
    /// The customer to log in.
    pub customer_id: u64,
    /// Storefront path to land on after login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    /// The customer's IP address, bound into the token when given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_ip: Option<String>,
}

/// Signs a login token for `customer_id`.
///
/// # Errors
///
/// - [`AuthError::RequiresOAuth`] if the store uses Basic credentials
/// - [`AuthError::MissingClientSecret`] if no client secret is configured
/// - [`AuthError::Signing`] if encoding fails
pub fn customer_login_token(
    config: &StoreConfig,
    customer_id: u64,
    redirect_to: Option<&str>,
    request_ip: Option<&str>,
) -> Result<String, AuthError> {
    let Credentials::OAuth {
        client_id,
        store_hash,
        ..
    } = config.credentials()
    else {
        return Err(AuthError::RequiresOAuth {
            operation: "customer_login_token",
        });
    };
    let secret = config
        .client_secret()
        .ok_or(AuthError::MissingClientSecret)?;

    let claims = CustomerLoginClaims {
        iss: client_id.as_ref().to_string(),
        iat: chrono::Utc::now().timestamp(),
        jti: random_jti(),
        operation: CUSTOMER_LOGIN_OPERATION.to_string(),
        store_hash: store_hash.as_ref().to_string(),
        customer_id,
        redirect_to: redirect_to.map(str::to_string),
        request_ip: request_ip.map(str::to_string),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref().as_bytes()),
    )?;
    Ok(token)
}

fn random_jti() -> String {
    let bytes: [u8; 32] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, AuthToken, ClientId, ClientSecret, StoreHash, StoreUrl};
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use std::collections::HashSet;

    fn oauth_config(secret: Option<&str>) -> StoreConfig {
        let mut builder = StoreConfig::builder().credentials(Credentials::OAuth {
            client_id: ClientId::new("app-client").unwrap(),
            auth_token: AuthToken::new("token").unwrap(),
            store_hash: StoreHash::new("abc123").unwrap(),
        });
        if let Some(secret) = secret {
            builder = builder.client_secret(ClientSecret::new(secret).unwrap());
        }
        builder.build().unwrap()
    }

    fn decode_claims(token: &str, secret: &str) -> CustomerLoginClaims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        decode::<CustomerLoginClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .unwrap()
        .claims
    }

    #[test]
    fn test_token_carries_login_claims() {
        let config = oauth_config(Some("shh"));
        let before = chrono::Utc::now().timestamp();
        let token = customer_login_token(&config, 42, Some("/account.php"), None).unwrap();
        let claims = decode_claims(&token, "shh");

        assert_eq!(claims.iss, "app-client");
        assert_eq!(claims.operation, CUSTOMER_LOGIN_OPERATION);
        assert_eq!(claims.store_hash, "abc123");
        assert_eq!(claims.customer_id, 42);
        assert_eq!(claims.redirect_to.as_deref(), Some("/account.php"));
        assert_eq!(claims.request_ip, None);
        assert!(claims.iat >= before);
        assert_eq!(claims.jti.len(), 64);
        assert!(claims.jti.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_optional_claims_are_omitted() {
        let config = oauth_config(Some("shh"));
        let token = customer_login_token(&config, 1, None, None).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        assert!(!payload.is_empty());
        let claims = decode_claims(&token, "shh");
        assert!(claims.redirect_to.is_none());
    }

    #[test]
    fn test_each_token_has_unique_jti() {
        let config = oauth_config(Some("shh"));
        let first = decode_claims(&customer_login_token(&config, 1, None, None).unwrap(), "shh");
        let second = decode_claims(&customer_login_token(&config, 1, None, None).unwrap(), "shh");
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_request_ip_is_bound() {
        let config = oauth_config(Some("shh"));
        let token = customer_login_token(&config, 7, None, Some("203.0.113.9")).unwrap();
        assert_eq!(
            decode_claims(&token, "shh").request_ip.as_deref(),
            Some("203.0.113.9")
        );
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let config = oauth_config(None);
        assert!(matches!(
            customer_login_token(&config, 1, None, None),
            Err(AuthError::MissingClientSecret)
        ));
    }

    #[test]
    fn test_basic_credentials_are_rejected() {
        let config = StoreConfig::builder()
            .credentials(
                Credentials::basic(
                    StoreUrl::new("https://store.example.com").unwrap(),
                    "admin",
                    ApiKey::new("key").unwrap(),
                )
                .unwrap(),
            )
            .client_secret(ClientSecret::new("shh").unwrap())
            .build()
            .unwrap();
        assert!(matches!(
            customer_login_token(&config, 1, None, None),
            Err(AuthError::RequiresOAuth { .. })
        ));
    }
}
