//! Response types and body decoding.
//!
//! A [`RawResponse`] is what one attempt produced: status, status line,
//! lower-cased headers and the body bytes. [`decode`] turns the bytes into a
//! [`ResponseBody`] according to the active mode.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

/// Header carrying the number of API requests left in the current window.
pub const API_LIMIT_REMAINING_HEADER: &str = "x-bc-apilimit-remaining";

/// Header carrying the rate-limit reset delay in milliseconds.
pub const RATE_LIMIT_RESET_MS_HEADER: &str = "x-rate-limit-time-reset-ms";

/// Header carrying the rate-limit reset delay in seconds.
pub const RETRY_AFTER_HEADER: &str = "x-retry-after";

/// Header carrying the redirect target.
pub const LOCATION_HEADER: &str = "location";

/// The decoded body of a response.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    /// A parsed JSON value. Empty or malformed bodies decode to `Null`.
    Json(Value),
    /// The body as an unparsed string (XML/raw mode).
    Raw(String),
}

impl ResponseBody {
    /// Returns the JSON value, if this body was parsed.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Returns the raw string, if this body was not parsed.
    #[must_use]
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Returns `true` for raw bodies.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Looks up a top-level field of a JSON object body.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_json().and_then(|value| value.get(field))
    }

    /// Consumes the body, returning the JSON value if it was parsed.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }
}

/// Decodes response bytes.
///
/// In raw mode the bytes are returned as a (lossily decoded) string. In JSON
/// mode they are parsed; an empty or unparseable body yields `Value::Null`.
#[must_use]
pub fn decode(bytes: &[u8], raw_mode: bool) -> ResponseBody {
    if raw_mode {
        return ResponseBody::Raw(String::from_utf8_lossy(bytes).into_owned());
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return ResponseBody::Json(Value::Null);
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => ResponseBody::Json(value),
        Err(error) => {
            tracing::debug!("Response body is not valid JSON, decoding as null: {}", error);
            ResponseBody::Json(Value::Null)
        }
    }
}

/// The outcome of one network exchange.
#[derive(Clone, Debug, Default)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The status line, e.g. `HTTP/1.1 200 OK`.
    pub status_line: String,
    /// Response headers keyed by lower-cased name; the last value wins.
    pub headers: HashMap<String, String>,
    /// The body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Returns a header value, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns `true` for 301 and 302.
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self.status, 301 | 302)
    }

    /// Returns the remaining request quota, if the server reported one.
    #[must_use]
    pub fn requests_remaining(&self) -> Option<u64> {
        self.header(API_LIMIT_REMAINING_HEADER)
            .and_then(|value| value.trim().parse().ok())
    }
}

/// Converts a `reqwest` header map into lower-cased name/value pairs.
pub(crate) fn collect_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    let mut result = HashMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).trim().to_string();
        result.insert(name.as_str().to_ascii_lowercase(), value);
    }
    result
}

/// Reads the rate-limit reset delay from response headers.
///
/// The millisecond header is preferred; the seconds header is the fallback.
#[must_use]
pub fn rate_limit_delay(headers: &HashMap<String, String>) -> Option<Duration> {
    if let Some(ms) = headers
        .get(RATE_LIMIT_RESET_MS_HEADER)
        .and_then(|value| value.trim().parse::<u64>().ok())
    {
        return Some(Duration::from_millis(ms));
    }
    headers
        .get(RETRY_AFTER_HEADER)
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
}
