//! Error taxonomy for the transport layer.
//!
//! Every failed logical call ends in exactly one of these kinds:
//!
//! - [`ClientError`]: the server answered with a 4xx status
//! - [`ServerError`]: the server answered with a 5xx status
//! - [`NetworkError`]: no response was obtained (DNS, connect, TLS, reset, empty reply)
//! - [`InvalidHttpRequestError`]: the request was rejected before it was sent
//!
//! [`HttpError`] unifies them. Client and server errors carry the decoded
//! response body together with a human-readable message picked from it by
//! [`extract_message`].
//!
//! # Example
//!
//! ```rust
//! use bigcommerce_api::clients::{extract_message, ResponseBody};
//! use serde_json::json;
//!
//! let body = ResponseBody::Json(json!({"errors": [{"title": "Bad field"}]}));
//! assert_eq!(extract_message(&body), "Bad field");
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::io;

use serde_json::Value;
use thiserror::Error;

use crate::clients::http_response::ResponseBody;

/// A 4xx response, raised when fail-on-error mode is enabled.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{message}")]
pub struct ClientError {
    /// The HTTP status code.
    pub code: u16,
    /// Message extracted from the response body.
    pub message: String,
    /// The decoded response body.
    pub body: ResponseBody,
}

/// A 5xx response, raised when fail-on-error mode is enabled.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{message}")]
pub struct ServerError {
    /// The HTTP status code.
    pub code: u16,
    /// Message extracted from the response body.
    pub message: String,
    /// The decoded response body.
    pub body: ResponseBody,
}

/// Transport fault classes, numbered like the equivalent libcurl codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetworkErrorCode {
    /// A redirect `Location` could not be turned into a URL.
    UrlMalformed,
    /// DNS resolution failed.
    CouldntResolveHost,
    /// The TCP connection could not be established.
    CouldntConnect,
    /// The attempt exceeded its timeout.
    OperationTimedOut,
    /// The TLS handshake failed.
    SslConnectError,
    /// The redirect limit was exceeded.
    TooManyRedirects,
    /// The server closed the connection without sending anything.
    GotNothing,
    /// Sending the request failed.
    SendError,
    /// Receiving the response failed part way.
    ReceiveError,
    /// Any other transport failure.
    Other,
}

impl NetworkErrorCode {
    /// Returns the numeric code.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Other => 0,
            Self::UrlMalformed => 3,
            Self::CouldntResolveHost => 6,
            Self::CouldntConnect => 7,
            Self::OperationTimedOut => 28,
            Self::SslConnectError => 35,
            Self::TooManyRedirects => 47,
            Self::GotNothing => 52,
            Self::SendError => 55,
            Self::ReceiveError => 56,
        }
    }

    /// Returns `true` for faults that are worth another attempt.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(
            self,
            Self::OperationTimedOut | Self::GotNothing | Self::ReceiveError | Self::SslConnectError
        )
    }
}

impl fmt::Display for NetworkErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// A transport-level failure; no response was obtained.
///
/// Network errors are always raised, whatever the fail-on-error setting.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct NetworkError {
    /// The fault class.
    pub code: NetworkErrorCode,
    /// Description of the failure.
    pub message: String,
}

impl NetworkError {
    /// Creates a new network error.
    #[must_use]
    pub fn new(code: NetworkErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(error: reqwest::Error) -> Self {
        let chain = error_chain(&error);
        let lowered = chain.to_ascii_lowercase();
        let io_kind = io_error_kind(&error);

        let code = if error.is_timeout() || io_kind == Some(io::ErrorKind::TimedOut) {
            NetworkErrorCode::OperationTimedOut
        } else if error.is_redirect() {
            NetworkErrorCode::TooManyRedirects
        } else if error.is_connect() {
            if ["certificate", "tls", "handshake", "ssl"]
                .iter()
                .any(|needle| lowered.contains(needle))
            {
                NetworkErrorCode::SslConnectError
            } else if ["dns", "resolve", "lookup address"]
                .iter()
                .any(|needle| lowered.contains(needle))
            {
                NetworkErrorCode::CouldntResolveHost
            } else {
                NetworkErrorCode::CouldntConnect
            }
        } else if lowered.contains("connection closed before message completed") {
            NetworkErrorCode::GotNothing
        } else if io_kind == Some(io::ErrorKind::BrokenPipe) {
            NetworkErrorCode::SendError
        } else if matches!(
            io_kind,
            Some(
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::UnexpectedEof
            )
        ) || error.is_body()
            || error.is_decode()
        {
            NetworkErrorCode::ReceiveError
        } else {
            NetworkErrorCode::Other
        };

        Self {
            code,
            message: chain,
        }
    }
}

/// Joins an error and all of its sources into one line.
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn io_error_kind(error: &dyn StdError) -> Option<io::ErrorKind> {
    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            return Some(io_error.kind());
        }
        source = cause.source();
    }
    None
}

/// Error returned when a request is rejected before being sent.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The URL could not be parsed.
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL that was provided.
        url: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The body could not be encoded for the active media type.
    #[error("Cannot encode request body as {media_type}: {reason}")]
    BodyEncoding {
        /// The MIME type the body was being encoded as.
        media_type: &'static str,
        /// Why encoding failed.
        reason: String,
    },

    /// The underlying HTTP engine could not be configured.
    #[error("Cannot configure HTTP client: {reason}")]
    ClientBuild {
        /// Why construction failed.
        reason: String,
    },
}

/// Unified error type for all transport errors.
///
/// # Example
///
/// ```rust,ignore
/// match connection.get("https://store.example.com/api/v2/time", &[]).await {
///     Ok(Some(body)) => println!("{body:?}"),
///     Ok(None) => println!("suppressed: {:?}", connection.last_error()),
///     Err(HttpError::Client(e)) => println!("{} {}", e.code, e.message),
///     Err(HttpError::Server(e)) => println!("{} {}", e.code, e.message),
///     Err(HttpError::Network(e)) => println!("network {}: {}", e.code, e.message),
///     Err(HttpError::InvalidRequest(e)) => println!("{e}"),
/// }
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HttpError {
    /// A 4xx response.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A 5xx response.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// No response was obtained.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The request was rejected before sending.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),
}

impl HttpError {
    /// Returns the HTTP status for client/server errors, the fault code for
    /// network errors, and 0 for rejected requests.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::Client(e) => i32::from(e.code),
            Self::Server(e) => i32::from(e.code),
            Self::Network(e) => e.code.as_i32(),
            Self::InvalidRequest(_) => 0,
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Client(e) => e.message.clone(),
            Self::Server(e) => e.message.clone(),
            Self::Network(e) => e.message.clone(),
            Self::InvalidRequest(e) => e.to_string(),
        }
    }

    /// Returns the decoded response body for client/server errors.
    #[must_use]
    pub const fn body(&self) -> Option<&ResponseBody> {
        match self {
            Self::Client(e) => Some(&e.body),
            Self::Server(e) => Some(&e.body),
            Self::Network(_) | Self::InvalidRequest(_) => None,
        }
    }
}

/// Picks a human-readable message out of a failure body.
///
/// Precedence: a top-level `error` field; else the first entry of `errors`
/// (its `title`, then `message`, then the entry itself); else a top-level
/// `message`; else the body itself. A top-level array (the v2 error shape)
/// is read through its first element's `message` or `title`.
#[must_use]
pub fn extract_message(body: &ResponseBody) -> String {
    match body {
        ResponseBody::Raw(text) => text.clone(),
        ResponseBody::Json(value) => message_from_value(value),
    }
}

fn message_from_value(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            if let Some(error) = map.get("error") {
                return entry_message(error);
            }
            if let Some(errors) = map.get("errors") {
                let first = match errors {
                    Value::Array(items) => items.first(),
                    Value::Object(entries)
                        if !entries.contains_key("title") && !entries.contains_key("message") =>
                    {
                        entries.values().next()
                    }
                    other => Some(other),
                };
                if let Some(first) = first {
                    return entry_message(first);
                }
            }
            map.get("message")
                .map_or_else(|| value.to_string(), entry_message)
        }
        Value::Array(items) => items
            .first()
            .and_then(|first| first.get("message").or_else(|| first.get("title")))
            .map_or_else(|| value.to_string(), entry_message),
        Value::Null => String::new(),
        other => entry_message(other),
    }
}

fn entry_message(entry: &Value) -> String {
    match entry {
        Value::String(s) => s.clone(),
        Value::Object(map) => ["title", "message"]
            .iter()
            .find_map(|key| map.get(*key).map(entry_message))
            .unwrap_or_else(|| entry.to_string()),
        other => other.to_string(),
    }
}
