//! Authentication error types.

use crate::clients::HttpError;
use thiserror::Error;

/// Errors that can occur during token exchange or login token signing.
///
/// # Example
///
/// ```rust
/// use bigcommerce_api::auth::AuthError;
///
/// let error = AuthError::MissingClientSecret;
/// assert_eq!(
///     error.to_string(),
///     "Cannot sign customer login tokens or exchange auth codes without a client secret"
/// );
/// ```
#[derive(Debug, Error)]
pub enum AuthError {
    /// No client secret is configured.
    #[error("Cannot sign customer login tokens or exchange auth codes without a client secret")]
    MissingClientSecret,

    /// The operation needs OAuth credentials but Basic ones are configured.
    #[error("Operation '{operation}' requires OAuth credentials")]
    RequiresOAuth {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// The token endpoint answered with something that is not a token.
    #[error("Invalid token response: {reason}")]
    InvalidTokenResponse {
        /// Why the response was rejected.
        reason: String,
    },

    /// Signing the JWT failed.
    #[error("Failed to sign login token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// Wrapped transport error.
    #[error(transparent)]
    Http(#[from] HttpError),
}

// Verify AuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthError>();
};
