//! HTTP request types.
//!
//! An [`HttpRequest`] is built once per logical call: the query string is
//! merged into the URL and the body is encoded for the active [`MediaType`]
//! up front, so every retry sends exactly the same bytes.

use std::fmt;

use reqwest::Url;
use serde_json::Value;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods supported by the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
    /// HTTP HEAD method for reading headers only.
    Head,
}

impl HttpMethod {
    /// Returns `true` for methods that carry a request body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    pub(crate) const fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
            Self::Head => write!(f, "head"),
        }
    }
}

/// The media type negotiated with the server.
///
/// Drives the `Accept` header, the `Content-Type` of POST/PUT bodies, how
/// bodies are encoded and whether responses are parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MediaType {
    /// `application/json` (default). Responses are parsed.
    #[default]
    Json,
    /// `application/xml`. Bodies pass through and responses stay raw.
    Xml,
    /// `application/x-www-form-urlencoded`, used for token exchange.
    UrlEncoded,
}

impl MediaType {
    /// Returns the MIME type string.
    #[must_use]
    pub const fn as_mime(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::UrlEncoded => "application/x-www-form-urlencoded",
        }
    }

    /// Returns `true` when responses negotiated with this type stay unparsed.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Xml)
    }

    /// Encodes a request body for this media type.
    ///
    /// - JSON: the value serialized as JSON.
    /// - XML: a string value is sent unchanged; anything else as JSON.
    /// - URL-encoded: the top-level fields of an object as `key=value`
    ///   pairs; a string value is sent unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::BodyEncoding`] when the value has
    /// no representation in this media type.
    pub fn encode(&self, body: &Value) -> Result<String, InvalidHttpRequestError> {
        let encoding_error = |reason: String| InvalidHttpRequestError::BodyEncoding {
            media_type: self.as_mime(),
            reason,
        };
        match (self, body) {
            (Self::Xml | Self::UrlEncoded, Value::String(raw)) => Ok(raw.clone()),
            (Self::Json | Self::Xml, value) => {
                serde_json::to_string(value).map_err(|e| encoding_error(e.to_string()))
            }
            (Self::UrlEncoded, Value::Object(fields)) => Ok(fields
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    format!(
                        "{}={}",
                        urlencoding::encode(key),
                        urlencoding::encode(&value)
                    )
                })
                .collect::<Vec<_>>()
                .join("&")),
            (Self::UrlEncoded, _) => Err(encoding_error(
                "expected an object of form fields".to_string(),
            )),
        }
    }
}

/// One logical request, immutable across retries.
///
/// # Example
///
/// ```rust
/// use bigcommerce_api::clients::{HttpMethod, HttpRequest, MediaType};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Post, "https://store.example.com/api/v2/brands")
///     .body(json!({"name": "Acme"}))
///     .media_type(MediaType::Json)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.body(), Some(r#"{"name":"Acme"}"#));
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    method: HttpMethod,
    url: Url,
    body: Option<String>,
    media_type: MediaType,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, url)
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the absolute URL, including any query string.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the encoded body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns the media type the body was encoded for.
    #[must_use]
    pub const fn media_type(&self) -> MediaType {
        self.media_type
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: HttpMethod,
    url: String,
    body: Option<Value>,
    query: Vec<(String, String)>,
    media_type: MediaType,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            query: Vec::new(),
            media_type: MediaType::Json,
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds several query parameters, keeping their order.
    #[must_use]
    pub fn query<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the media type used to encode the body.
    #[must_use]
    pub const fn media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the URL is not absolute, a
    /// POST/PUT has no body, or the body cannot be encoded.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let mut url = Url::parse(&self.url).map_err(|e| InvalidHttpRequestError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(InvalidHttpRequestError::InvalidUrl {
                url: self.url,
                reason: "URL must be absolute with a host".to_string(),
            });
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }

        if self.method.has_body() && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.method.to_string(),
            });
        }
        let body = match &self.body {
            Some(value) if self.method.has_body() => Some(self.media_type.encode(value)?),
            _ => None,
        };

        Ok(HttpRequest {
            method: self.method,
            url,
            body,
            media_type: self.media_type,
        })
    }
}
