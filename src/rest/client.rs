//! The store client.
//!
//! [`StoreClient`] owns one authenticated [`Connection`] and the store's API
//! path, and maps responses onto [`Resource`] records.
//!
//! # Result Shape
//!
//! Read calls return `Result<Option<Payload<T>>, RestError>`:
//!
//! - `Err(_)`: a raised transport error (network faults always, 4xx/5xx in
//!   fail-on-error mode) or a response of the wrong shape
//! - `Ok(None)`: a 4xx/5xx was captured instead of raised; see
//!   [`StoreClient::last_error`]
//! - `Ok(Some(Payload::Raw(_)))`: the unparsed body, in XML mode
//! - `Ok(Some(Payload::Mapped(_)))`: the mapped value
//!
//! # Example
//!
//! ```rust,ignore
//! use bigcommerce_api::rest::{resources::Product, Filter, StoreClient};
//!
//! let mut client = StoreClient::new(config);
//! if let Some(page) = client.list::<Product>(&Filter::from(1)).await? {
//!     for product in page.mapped().unwrap_or_default() {
//!         println!("{}", product.str("name")?);
//!     }
//! }
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::auth;
use crate::clients::{Connection, ResponseBody, API_LIMIT_REMAINING_HEADER};
use crate::config::{ApiVersion, StoreConfig};
use crate::rest::resources::Shipment;
use crate::rest::{Filter, Resource, ResourceEndpoint, ResourceKind, RestError};

/// A mapped value, or the raw body when the connection is in XML mode.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload<T> {
    /// The response mapped into `T`.
    Mapped(T),
    /// The unparsed response body.
    Raw(String),
}

impl<T> Payload<T> {
    /// Returns the mapped value, discarding a raw body.
    #[must_use]
    pub fn mapped(self) -> Option<T> {
        match self {
            Self::Mapped(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Returns a reference to the mapped value.
    #[must_use]
    pub const fn as_mapped(&self) -> Option<&T> {
        match self {
            Self::Mapped(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Returns the raw body.
    #[must_use]
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(text) => Some(text),
            Self::Mapped(_) => None,
        }
    }

    /// Returns `true` for a raw body.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Maps the contained value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Payload<U> {
        match self {
            Self::Mapped(value) => Payload::Mapped(f(value)),
            Self::Raw(text) => Payload::Raw(text),
        }
    }
}

type ReadResult<T> = Result<Option<Payload<T>>, RestError>;
type WriteResult = Result<Option<ResponseBody>, RestError>;

/// Client for one BigCommerce store.
///
/// All request methods take `&mut self`: a client issues one call at a time.
///
/// # Example
///
/// ```rust
/// use bigcommerce_api::{ApiVersion, AuthToken, ClientId, Credentials, StoreConfig, StoreHash};
/// use bigcommerce_api::rest::StoreClient;
///
/// let config = StoreConfig::builder()
///     .credentials(Credentials::OAuth {
///         client_id: ClientId::new("client").unwrap(),
///         auth_token: AuthToken::new("token").unwrap(),
///         store_hash: StoreHash::new("abc123").unwrap(),
///     })
///     .build()
///     .unwrap();
///
/// let mut client = StoreClient::new(config);
/// assert_eq!(client.api_path(), "https://api.bigcommerce.com/stores/abc123/v2");
///
/// client.set_version(ApiVersion::V3);
/// assert_eq!(client.api_path(), "https://api.bigcommerce.com/stores/abc123/v3");
/// ```
#[derive(Debug)]
pub struct StoreClient {
    config: StoreConfig,
    connection: Connection,
    api_path: String,
}

// Verify StoreClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StoreClient>();
};

impl StoreClient {
    /// Creates a client with a fresh, authenticated connection.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        let connection = Connection::new(config.connection().clone());
        Self::with_connection(config, connection)
    }

    /// Creates a client on an existing connection.
    ///
    /// The store's credentials replace whatever authentication the
    /// connection had.
    #[must_use]
    pub fn with_connection(config: StoreConfig, mut connection: Connection) -> Self {
        config.credentials().apply(&mut connection);
        let api_path = config.api_path();
        Self {
            config,
            connection,
            api_path,
        }
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the base URL every path is appended to.
    #[must_use]
    pub fn api_path(&self) -> &str {
        &self.api_path
    }

    /// Returns the underlying connection, for diagnostics.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Returns the underlying connection, for reconfiguration.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.connection
    }

    /// Returns the body of the last captured 4xx/5xx response.
    #[must_use]
    pub const fn last_error(&self) -> Option<&ResponseBody> {
        self.connection.last_error()
    }

    /// Switches the API version and recomputes the API path.
    ///
    /// Basic credentials always use the `v2` path.
    pub fn set_version(&mut self, version: ApiVersion) {
        self.config.set_api_version(version);
        self.api_path = self.config.api_path();
        tracing::debug!("Store client now targets {}", self.api_path);
    }

    fn url(&self, path: &str) -> String {
        join(&self.api_path, path)
    }

    // ========================================================================
    // Generic endpoint access
    // ========================================================================

    /// Fetches a collection, mapping each element to a record.
    ///
    /// A non-array response becomes a one-element list; an empty body
    /// becomes an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for raised transport errors.
    pub async fn get_collection<K: ResourceKind>(
        &mut self,
        path: &str,
        filter: &Filter,
    ) -> ReadResult<Vec<Resource<K>>> {
        let url = self.url(path);
        let response = self.connection.get(&url, &filter.pairs()).await?;
        Ok(response.map(|body| payload(body, map_collection)))
    }

    /// Fetches a single record.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for raised transport errors.
    pub async fn get_resource<K: ResourceKind>(&mut self, path: &str) -> ReadResult<Resource<K>> {
        let url = self.url(path);
        self.fetch_resource(&url).await
    }

    /// Fetches the `count` field of a count endpoint.
    ///
    /// # Errors
    ///
    /// - [`RestError::Http`] for raised transport errors
    /// - [`RestError::UnexpectedResponse`] if the body has no numeric `count`
    pub async fn get_count(&mut self, path: &str, filter: &Filter) -> ReadResult<u64> {
        let url = self.url(path);
        let Some(body) = self.connection.get(&url, &filter.pairs()).await? else {
            return Ok(None);
        };
        match body {
            ResponseBody::Raw(text) => Ok(Some(Payload::Raw(text))),
            ResponseBody::Json(value) => value
                .get("count")
                .and_then(Value::as_u64)
                .map(|count| Some(Payload::Mapped(count)))
                .ok_or_else(|| unexpected(path, "missing numeric 'count' field")),
        }
    }

    /// Posts `body` to create a record.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for raised transport errors.
    pub async fn create_resource(&mut self, path: &str, body: &Value) -> WriteResult {
        let url = self.url(path);
        Ok(self.connection.post(&url, body).await?)
    }

    /// Puts `body` to update a record.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for raised transport errors.
    pub async fn update_resource(&mut self, path: &str, body: &Value) -> WriteResult {
        let url = self.url(path);
        Ok(self.connection.put(&url, body).await?)
    }

    /// Deletes a record or collection.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for raised transport errors.
    pub async fn delete_resource(&mut self, path: &str) -> WriteResult {
        let url = self.url(path);
        Ok(self.connection.delete(&url).await?)
    }

    /// Fetches a single record from the v3 API, whatever the configured
    /// version.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for raised transport errors.
    pub async fn get_v3_resource<K: ResourceKind>(&mut self, path: &str) -> ReadResult<Resource<K>> {
        let url = join(&self.config.api_path_for(&ApiVersion::V3), path);
        self.fetch_resource(&url).await
    }

    /// Deletes through the v3 API, whatever the configured version.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for raised transport errors.
    pub async fn delete_v3_resource(&mut self, path: &str) -> WriteResult {
        let url = join(&self.config.api_path_for(&ApiVersion::V3), path);
        Ok(self.connection.delete(&url).await?)
    }

    async fn fetch_resource<K: ResourceKind>(&mut self, url: &str) -> ReadResult<Resource<K>> {
        let response = self.connection.get(url, &[]).await?;
        Ok(response.map(|body| payload(body, Resource::from_value)))
    }

    // ========================================================================
    // Store information
    // ========================================================================

    /// Pings `/time` and returns the store's clock.
    ///
    /// # Errors
    ///
    /// - [`RestError::Http`] for raised transport errors
    /// - [`RestError::UnexpectedResponse`] if `time` is missing or invalid
    pub async fn get_time(&mut self) -> ReadResult<DateTime<Utc>> {
        let url = self.url("/time");
        let Some(body) = self.connection.get(&url, &[]).await? else {
            return Ok(None);
        };
        match body {
            ResponseBody::Raw(text) => Ok(Some(Payload::Raw(text))),
            ResponseBody::Json(value) => value
                .get("time")
                .and_then(Value::as_i64)
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
                .map(|time| Some(Payload::Mapped(time)))
                .ok_or_else(|| unexpected("/time", "missing or invalid 'time' field")),
        }
    }

    /// Fetches the store profile.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for raised transport errors.
    pub async fn get_store(&mut self) -> WriteResult {
        let url = self.url("/store");
        Ok(self.connection.get(&url, &[]).await?)
    }

    /// Returns the API quota left, from the last response's
    /// `X-BC-ApiLimit-Remaining` header.
    ///
    /// When the header is absent (no request yet, or the last response did
    /// not carry it) `/time` is pinged first. Returns `None` if the ping was
    /// captured as an error or the header is still missing.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for raised transport errors.
    pub async fn requests_remaining(&mut self) -> Result<Option<u64>, RestError> {
        if let Some(remaining) = self.remaining_from_header() {
            return Ok(Some(remaining));
        }
        if self.get_time().await?.is_none() {
            return Ok(None);
        }
        Ok(self.remaining_from_header())
    }

    fn remaining_from_header(&self) -> Option<u64> {
        self.connection
            .header(API_LIMIT_REMAINING_HEADER)
            .and_then(|value| value.trim().parse().ok())
    }

    /// Signs a storefront login token for a customer.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Auth`]; see [`auth::customer_login_token`].
    pub fn customer_login_token(
        &self,
        customer_id: u64,
        redirect_to: Option<&str>,
        request_ip: Option<&str>,
    ) -> Result<String, RestError> {
        Ok(auth::customer_login_token(
            &self.config,
            customer_id,
            redirect_to,
            request_ip,
        )?)
    }

    // ========================================================================
    // Typed endpoints
    // ========================================================================

    /// Lists records of a kind, e.g. `client.list::<Product>(&filter)`.
    ///
    /// # Errors
    ///
    /// See [`get_collection`](Self::get_collection).
    pub async fn list<K: ResourceEndpoint>(&mut self, filter: &Filter) -> ReadResult<Vec<Resource<K>>> {
        self.get_collection(K::PATH, filter).await
    }

    /// Fetches one record of a kind by id.
    ///
    /// # Errors
    ///
    /// See [`get_resource`](Self::get_resource).
    pub async fn find<K: ResourceEndpoint>(&mut self, id: u64) -> ReadResult<Resource<K>> {
        self.get_resource(&format!("{}/{id}", K::PATH)).await
    }

    /// Counts records of a kind.
    ///
    /// # Errors
    ///
    /// See [`get_count`](Self::get_count).
    pub async fn count<K: ResourceEndpoint>(&mut self, filter: &Filter) -> ReadResult<u64> {
        self.get_count(&format!("{}/count", K::PATH), filter).await
    }

    /// Creates a record from its create fields.
    ///
    /// # Errors
    ///
    /// See [`create_resource`](Self::create_resource).
    pub async fn create<K: ResourceEndpoint>(&mut self, record: &Resource<K>) -> WriteResult {
        let body = Value::Object(record.create_fields());
        self.create_resource(K::PATH, &body).await
    }

    /// Updates a record from its update fields, addressed by its `id`.
    ///
    /// # Errors
    ///
    /// - [`RestError::Resource`] if the record has no `id`
    /// - otherwise see [`update_resource`](Self::update_resource)
    pub async fn update<K: ResourceEndpoint>(&mut self, record: &Resource<K>) -> WriteResult {
        let id = record.require_id()?;
        let body = Value::Object(record.update_fields());
        self.update_resource(&format!("{}/{id}", K::PATH), &body).await
    }

    /// Deletes one record of a kind by id.
    ///
    /// # Errors
    ///
    /// See [`delete_resource`](Self::delete_resource).
    pub async fn delete<K: ResourceEndpoint>(&mut self, id: u64) -> WriteResult {
        self.delete_resource(&format!("{}/{id}", K::PATH)).await
    }

    /// Deletes every record of a kind.
    ///
    /// # Errors
    ///
    /// See [`delete_resource`](Self::delete_resource).
    pub async fn delete_all<K: ResourceEndpoint>(&mut self) -> WriteResult {
        self.delete_resource(K::PATH).await
    }

    // ========================================================================
    // Order shipments
    // ========================================================================

    /// Lists the shipments of an order.
    ///
    /// # Errors
    ///
    /// See [`get_collection`](Self::get_collection).
    pub async fn list_shipments(
        &mut self,
        order_id: u64,
        filter: &Filter,
    ) -> ReadResult<Vec<Resource<Shipment>>> {
        self.get_collection(&shipments_path(order_id), filter).await
    }

    /// Fetches one shipment of an order.
    ///
    /// # Errors
    ///
    /// See [`get_resource`](Self::get_resource).
    pub async fn find_shipment(&mut self, order_id: u64, id: u64) -> ReadResult<Resource<Shipment>> {
        self.get_resource(&format!("{}/{id}", shipments_path(order_id)))
            .await
    }

    /// Creates a shipment for an order.
    ///
    /// # Errors
    ///
    /// See [`create_resource`](Self::create_resource).
    pub async fn create_shipment(&mut self, order_id: u64, shipment: &Resource<Shipment>) -> WriteResult {
        let body = Value::Object(shipment.create_fields());
        self.create_resource(&shipments_path(order_id), &body).await
    }

    /// Updates a shipment, addressed by its `id`.
    ///
    /// # Errors
    ///
    /// - [`RestError::Resource`] if the shipment has no `id`
    /// - otherwise see [`update_resource`](Self::update_resource)
    pub async fn update_shipment(&mut self, order_id: u64, shipment: &Resource<Shipment>) -> WriteResult {
        let id = shipment.require_id()?;
        let body = Value::Object(shipment.update_fields());
        self.update_resource(&format!("{}/{id}", shipments_path(order_id)), &body)
            .await
    }

    /// Deletes one shipment of an order.
    ///
    /// # Errors
    ///
    /// See [`delete_resource`](Self::delete_resource).
    pub async fn delete_shipment(&mut self, order_id: u64, id: u64) -> WriteResult {
        self.delete_resource(&format!("{}/{id}", shipments_path(order_id)))
            .await
    }

    /// Deletes every shipment of an order.
    ///
    /// # Errors
    ///
    /// See [`delete_resource`](Self::delete_resource).
    pub async fn delete_all_shipments(&mut self, order_id: u64) -> WriteResult {
        self.delete_resource(&shipments_path(order_id)).await
    }
}

fn shipments_path(order_id: u64) -> String {
    format!("/orders/{order_id}/shipments")
}

/// Joins a base URL and a resource path with exactly one `/`.
fn join(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

fn payload<T>(body: ResponseBody, map: impl FnOnce(Value) -> T) -> Payload<T> {
    match body {
        ResponseBody::Json(value) => Payload::Mapped(map(value)),
        ResponseBody::Raw(text) => Payload::Raw(text),
    }
}

fn map_collection<K: ResourceKind>(value: Value) -> Vec<Resource<K>> {
    match value {
        Value::Array(items) => items.into_iter().map(Resource::from_value).collect(),
        Value::Null => Vec::new(),
        other => vec![Resource::from_value(other)],
    }
}

fn unexpected(path: &str, reason: &str) -> RestError {
    RestError::UnexpectedResponse {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
