//! # BigCommerce API Rust Client
//!
//! An async client for the BigCommerce store management API: a resilient
//! HTTP transport with typed store resources layered on top.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`StoreConfig`] and [`ConnectionConfig`]
//! - Validated newtypes for store URLs, hashes and credentials
//! - Basic and OAuth authentication via [`Credentials`]
//! - OAuth authorization code exchange and customer login tokens via [`auth`]
//! - A transport ([`clients::Connection`]) with content negotiation, bounded
//!   redirect following, rate-limit waits and automatic retry of transient
//!   failures
//! - A store client ([`rest::StoreClient`]) mapping responses onto ordered
//!   resource records
//!
//! ## Quick Start
//!
//! ```rust
//! use bigcommerce_api::{ApiKey, Credentials, StoreConfig, StoreUrl};
//!
//! let config = StoreConfig::builder()
//!     .credentials(
//!         Credentials::basic(
//!             StoreUrl::new("https://store.example.com").unwrap(),
//!             "admin",
//!             ApiKey::new("your-api-key").unwrap(),
//!         )
//!         .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_path(), "https://store.example.com/api/v2");
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use bigcommerce_api::rest::{resources::Product, Filter, StoreClient};
//!
//! let mut client = StoreClient::new(config);
//!
//! let count = client.count::<Product>(&Filter::new()).await?;
//! let page = client.list::<Product>(&Filter::from(1).limit(50)).await?;
//!
//! match page {
//!     Some(payload) => println!("{:?} of {:?}", payload, count),
//!     // A 4xx/5xx was captured rather than raised
//!     None => println!("failed: {:?}", client.last_error()),
//! }
//! ```
//!
//! ## Error Handling
//!
//! By default a 4xx/5xx response is not an `Err`: the call returns `None`
//! and the decoded body is kept as the connection's last error. Enable
//! fail-on-error to raise [`clients::ClientError`] / [`clients::ServerError`]
//! instead:
//!
//! ```rust
//! use bigcommerce_api::ConnectionConfig;
//!
//! let connection = ConnectionConfig::builder()
//!     .fail_on_error(true)
//!     .build()
//!     .unwrap();
//! assert!(connection.fail_on_error());
//! ```
//!
//! Network faults are always raised as [`clients::NetworkError`].
//!
//! ## Design Principles
//!
//! - **No global state**: clients and connections are explicit values
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **One call at a time**: request methods take `&mut self`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use auth::{AuthError, Credentials};
pub use config::{
    ApiKey, ApiVersion, AuthToken, ClientId, ClientSecret, ConnectionConfig,
    ConnectionConfigBuilder, HostUrl, Proxy, StoreConfig, StoreConfigBuilder, StoreHash, StoreUrl,
    TlsVersion,
};
pub use error::ConfigError;

// Re-export transport types
pub use clients::{
    ClientError, Connection, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    InvalidHttpRequestError, MediaType, NetworkError, NetworkErrorCode, ResponseBody, ServerError,
};

// Re-export store client types
pub use rest::{Filter, Payload, Resource, RestError, StoreClient};
