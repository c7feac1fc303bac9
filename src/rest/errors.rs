//! Error types for the store client and resource records.
//!
//! - [`ResourceError`]: a [`Resource`](crate::rest::Resource) field is
//!   missing, has the wrong JSON type, or the record cannot be mapped
//! - [`RestError`]: anything a [`StoreClient`](crate::rest::StoreClient)
//!   call can fail with
//!
//! # Example
//!
//! ```rust
//! use bigcommerce_api::rest::ResourceError;
//!
//! let error = ResourceError::FieldNotFound {
//!     resource: "Product",
//!     field: "sku".to_string(),
//! };
//! assert_eq!(error.to_string(), "Product has no field 'sku'");
//! ```

use thiserror::Error;

use crate::auth::AuthError;
use crate::clients::HttpError;

/// Errors raised when reading or mapping a resource record.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The record has no such field.
    #[error("{resource} has no field '{field}'")]
    FieldNotFound {
        /// The resource kind name, e.g. "Product".
        resource: &'static str,
        /// The requested field.
        field: String,
    },

    /// The field exists but holds a different JSON type.
    #[error("{resource} field '{field}' is not {expected}")]
    TypeMismatch {
        /// The resource kind name.
        resource: &'static str,
        /// The requested field.
        field: String,
        /// The expected JSON type, e.g. "a string".
        expected: &'static str,
    },

    /// The record has no `id`, so it cannot be addressed.
    #[error("{resource} has no id")]
    MissingId {
        /// The resource kind name.
        resource: &'static str,
    },

    /// The record could not be mapped into the requested type.
    #[error("Failed to map {resource}: {source}")]
    Mapping {
        /// The resource kind name.
        resource: &'static str,
        /// The underlying serde error.
        source: serde_json::Error,
    },
}

/// Errors returned by [`StoreClient`](crate::rest::StoreClient) calls.
#[derive(Debug, Error)]
pub enum RestError {
    /// The response did not have the shape the call expects.
    #[error("Unexpected response from '{path}': {reason}")]
    UnexpectedResponse {
        /// The request path.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Wrapped transport error.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Wrapped resource error.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Wrapped authentication error.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
    assert_send_sync::<RestError>();
};
