//! HTTP transport for the BigCommerce API.
//!
//! This module is the core of the crate: request execution, authentication
//! headers, content negotiation, response classification, redirect chasing
//! and automatic retry of transient failures.
//!
//! # Overview
//!
//! - [`Connection`]: the transport; one logical call in flight at a time
//! - [`HttpRequest`] / [`HttpMethod`] / [`MediaType`]: an immutable request
//! - [`RawResponse`] / [`ResponseBody`] / [`decode`]: what came back
//! - [`RedirectFollower`]: bounded 301/302 following
//! - [`RetryPolicy`] / [`RetryState`]: what to retry and for how long
//! - [`HttpError`]: client, server, network and invalid-request errors
//!
//! # Retry Behavior
//!
//! With auto-retry enabled (the default):
//!
//! - **408 / 429**: waits `X-Rate-Limit-Time-Reset-Ms` (or `X-Retry-After`
//!   seconds) and retries without limit
//! - **500 / 502** and transient network faults: waits the server retry
//!   delay (60 seconds by default) and retries up to [`MAX_RETRY`] times
//! - **Everything else**: returned immediately
//!
//! 4xx/5xx responses only reach the retry policy in fail-on-error mode;
//! otherwise they are recorded as the connection's last error.

mod connection;
mod errors;
mod http_request;
mod http_response;
mod redirect;
mod retry;

pub use connection::{Connection, AUTH_CLIENT_HEADER, AUTH_TOKEN_HEADER, SDK_VERSION};
pub use errors::{
    extract_message, ClientError, HttpError, InvalidHttpRequestError, NetworkError,
    NetworkErrorCode, ServerError,
};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, MediaType};
pub use http_response::{
    decode, rate_limit_delay, RawResponse, ResponseBody, API_LIMIT_REMAINING_HEADER,
    LOCATION_HEADER, RATE_LIMIT_RESET_MS_HEADER, RETRY_AFTER_HEADER,
};
pub use redirect::{RedirectFollower, MAX_REDIRECTS};
pub use retry::{RetryDecision, RetryPolicy, RetryState, MAX_RETRY};
