//! Error types for the BigCommerce API client.
//!
//! This module contains the error type used for configuration and
//! validation failures. Transport errors live in [`crate::clients`].
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use bigcommerce_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyCredential { field: "api_key" })));
//! ```

use thiserror::Error;

/// Errors that can occur while building or validating configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A credential value was empty.
    #[error("Credential '{field}' cannot be empty.")]
    EmptyCredential {
        /// The name of the empty credential.
        field: &'static str,
    },

    /// The store URL is invalid.
    #[error("Invalid store URL '{url}'. Expected an absolute URL such as 'https://store.example.com'.")]
    InvalidStoreUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The store hash is invalid.
    #[error("Invalid store hash '{hash}'. Expected letters and digits only.")]
    InvalidStoreHash {
        /// The invalid hash that was provided.
        hash: String,
    },

    /// The API version is invalid.
    #[error("Invalid API version '{version}'. Expected a value such as 'v2' or 'v3'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// The TLS protocol version string is not recognised.
    #[error("Invalid TLS version '{version}'. Expected one of 'TLSv1', 'TLSv1.1', 'TLSv1.2', 'TLSv1.3'.")]
    InvalidTlsVersion {
        /// The unrecognised version string.
        version: String,
    },

    /// A host URL (API host, login host or proxy) is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme.")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The transport timeout is zero.
    #[error("Timeout must be greater than zero.")]
    InvalidTimeout,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
