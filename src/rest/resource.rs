//! Resource records.
//!
//! A [`Resource<K>`] is an ordered JSON object tagged with its
//! [`ResourceKind`]. The kind supplies a display name and the field lists the
//! API rejects on create and update, so a record fetched from the store can
//! be edited and sent straight back:
//!
//! ```rust
//! use bigcommerce_api::rest::{resources::Brand, Resource};
//! use serde_json::json;
//!
//! let mut brand: Resource<Brand> =
//!     Resource::from_value(json!({"id": 7, "name": "Acme", "image_file": ""}));
//! brand.set("name", "Acme Corp");
//!
//! let body = brand.update_fields();
//! assert!(body.get("id").is_none());
//! assert_eq!(body["name"], "Acme Corp");
//! ```
//!
//! # Field Projections
//!
//! - [`Resource::create_fields`] drops the kind's `IGNORE_ON_CREATE` fields
//! - [`Resource::update_fields`] drops the `IGNORE_ON_UPDATE` fields, every
//!   null value, empty strings in fields whose name contains `date`, and
//!   `IGNORE_IF_ZERO` fields that equal `0`

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::rest::ResourceError;

/// Static description of one kind of store resource.
pub trait ResourceKind: 'static {
    /// Display name used in error messages, e.g. "Product".
    const NAME: &'static str;

    /// Fields removed from create bodies.
    const IGNORE_ON_CREATE: &'static [&'static str] = &[];

    /// Fields removed from update bodies.
    const IGNORE_ON_UPDATE: &'static [&'static str] = &[];

    /// Fields removed from update bodies when they equal `0`.
    const IGNORE_IF_ZERO: &'static [&'static str] = &[];
}

/// A resource kind with its own top-level collection, e.g. `/products`.
///
/// Its records are addressed as `{PATH}/{id}` and counted at `{PATH}/count`.
pub trait ResourceEndpoint: ResourceKind {
    /// Collection path relative to the API path, with a leading `/`.
    const PATH: &'static str;
}

/// An ordered record of one resource kind.
pub struct Resource<K: ResourceKind> {
    fields: Map<String, Value>,
    kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> Resource<K> {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::from_fields(Map::new())
    }

    /// Creates a record from an object's fields.
    #[must_use]
    pub const fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            kind: PhantomData,
        }
    }

    /// Creates a record from a decoded response.
    ///
    /// An array yields its first element; anything that is not an object
    /// yields an empty record.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let value = match value {
            Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
            other => other,
        };
        match value {
            Value::Object(fields) => Self::from_fields(fields),
            _ => Self::new(),
        }
    }

    /// Returns the kind's display name.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        K::NAME
    }

    /// Returns the numeric `id`, if present.
    #[must_use]
    pub fn id(&self) -> Option<u64> {
        self.fields.get("id").and_then(Value::as_u64)
    }

    /// Returns the numeric `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] if the record has none.
    pub fn require_id(&self) -> Result<u64, ResourceError> {
        self.id().ok_or(ResourceError::MissingId { resource: K::NAME })
    }

    /// Returns a field's raw value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the field is present.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Sets a field, keeping its position if it already exists.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns all fields.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the record, returning its fields.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Returns a field as a string.
    ///
    /// # Errors
    ///
    /// [`ResourceError::FieldNotFound`] or [`ResourceError::TypeMismatch`].
    pub fn str(&self, field: &str) -> Result<&str, ResourceError> {
        self.typed(field, "a string", Value::as_str)
    }

    /// Returns a field as an unsigned integer.
    ///
    /// # Errors
    ///
    /// [`ResourceError::FieldNotFound`] or [`ResourceError::TypeMismatch`].
    pub fn u64(&self, field: &str) -> Result<u64, ResourceError> {
        self.typed(field, "an unsigned integer", Value::as_u64)
    }

    /// Returns a field as a signed integer.
    ///
    /// # Errors
    ///
    /// [`ResourceError::FieldNotFound`] or [`ResourceError::TypeMismatch`].
    pub fn i64(&self, field: &str) -> Result<i64, ResourceError> {
        self.typed(field, "an integer", Value::as_i64)
    }

    /// Returns a field as a float.
    ///
    /// Decimal strings such as `"12.5000"`, which the v2 API uses for
    /// prices, are parsed as well.
    ///
    /// # Errors
    ///
    /// [`ResourceError::FieldNotFound`] or [`ResourceError::TypeMismatch`].
    pub fn f64(&self, field: &str) -> Result<f64, ResourceError> {
        self.typed(field, "a number", |value| match value {
            Value::String(s) => s.trim().parse().ok(),
            other => other.as_f64(),
        })
    }

    /// Returns a field as a boolean.
    ///
    /// # Errors
    ///
    /// [`ResourceError::FieldNotFound`] or [`ResourceError::TypeMismatch`].
    pub fn bool(&self, field: &str) -> Result<bool, ResourceError> {
        self.typed(field, "a boolean", Value::as_bool)
    }

    fn typed<'a, T>(
        &'a self,
        field: &str,
        expected: &'static str,
        convert: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T, ResourceError> {
        let value = self
            .fields
            .get(field)
            .ok_or_else(|| ResourceError::FieldNotFound {
                resource: K::NAME,
                field: field.to_string(),
            })?;
        convert(value).ok_or_else(|| ResourceError::TypeMismatch {
            resource: K::NAME,
            field: field.to_string(),
            expected,
        })
    }

    /// Returns the fields to send when creating this record.
    #[must_use]
    pub fn create_fields(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|(field, _)| !K::IGNORE_ON_CREATE.contains(&field.as_str()))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }

    /// Returns the fields to send when updating this record.
    #[must_use]
    pub fn update_fields(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|(field, value)| {
                !K::IGNORE_ON_UPDATE.contains(&field.as_str()) && !is_ignored_on_update::<K>(field, value)
            })
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }

    /// Maps the record into a caller-defined type.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Mapping`] if the fields do not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ResourceError> {
        serde_json::from_value(Value::Object(self.fields.clone())).map_err(|source| {
            ResourceError::Mapping {
                resource: K::NAME,
                source,
            }
        })
    }
}

fn is_ignored_on_update<K: ResourceKind>(field: &str, value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) if s.is_empty() && field.contains("date") => true,
        Value::Number(n) if K::IGNORE_IF_ZERO.contains(&field) => {
            n.as_i64() == Some(0) || n.as_u64() == Some(0)
        }
        _ => false,
    }
}

impl<K: ResourceKind> Default for Resource<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ResourceKind> Clone for Resource<K> {
    fn clone(&self) -> Self {
        Self::from_fields(self.fields.clone())
    }
}

impl<K: ResourceKind> PartialEq for Resource<K> {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<K: ResourceKind> fmt::Debug for Resource<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::NAME).field("fields", &self.fields).finish()
    }
}

impl<K: ResourceKind> Serialize for Resource<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<K: ResourceKind> From<Map<String, Value>> for Resource<K> {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_fields(fields)
    }
}

impl<K: ResourceKind> From<Resource<K>> for Value {
    fn from(record: Resource<K>) -> Self {
        Self::Object(record.into_fields())
    }
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource<crate::rest::resources::Product>>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::{Customer, Product, Record, Shipment};
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_from_value_takes_first_array_element() {
        let record: Resource<Record> = Resource::from_value(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(record.id(), Some(1));

        let empty: Resource<Record> = Resource::from_value(json!([]));
        assert!(empty.fields().is_empty());
        assert_eq!(empty.id(), None);
    }

    #[test]
    fn test_fields_keep_response_order() {
        let record: Resource<Record> =
            Resource::from_value(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<&str> = record.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_typed_accessors() {
        let product: Resource<Product> = Resource::from_value(json!({
            "id": 32,
            "name": "Tee",
            "price": "19.5000",
            "is_visible": true,
            "inventory_level": -1
        }));

        assert_eq!(product.str("name").unwrap(), "Tee");
        assert_eq!(product.u64("id").unwrap(), 32);
        assert!((product.f64("price").unwrap() - 19.5).abs() < f64::EPSILON);
        assert!(product.bool("is_visible").unwrap());
        assert_eq!(product.i64("inventory_level").unwrap(), -1);
    }

    #[test]
    fn test_missing_field_and_type_mismatch() {
        let product: Resource<Product> = Resource::from_value(json!({"name": "Tee"}));

        assert!(matches!(
            product.str("sku"),
            Err(ResourceError::FieldNotFound { resource: "Product", .. })
        ));
        assert!(matches!(
            product.u64("name"),
            Err(ResourceError::TypeMismatch { expected: "an unsigned integer", .. })
        ));
        assert!(matches!(
            product.require_id(),
            Err(ResourceError::MissingId { resource: "Product" })
        ));
    }

    #[test]
    fn test_product_update_fields() {
        let product: Resource<Product> = Resource::from_value(json!({
            "id": 32,
            "name": "Tee",
            "date_created": "Tue, 20 Nov 2012 00:00:00 +0000",
            "preorder_release_date": "",
            "tax_class_id": 0,
            "warranty": null,
            "images": {"url": "https://example.com/images"},
            "sort_order": 0
        }));

        let body = product.update_fields();
        let keys: Vec<&str> = body.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "sort_order"]);
    }

    #[test]
    fn test_product_create_fields_keep_update_only_exclusions() {
        let product: Resource<Product> = Resource::from_value(json!({
            "name": "Tee",
            "date_modified": "Tue, 20 Nov 2012 00:00:00 +0000",
            "tax_class_id": 0,
            "warranty": null
        }));

        let body = product.create_fields();
        assert!(body.get("date_modified").is_none());
        assert_eq!(body["tax_class_id"], 0);
        assert!(body.contains_key("warranty"));
    }

    #[test]
    fn test_shipment_update_drops_items() {
        let shipment: Resource<Shipment> = Resource::from_value(json!({
            "id": 1,
            "order_id": 100,
            "tracking_number": "1Z999",
            "items": [{"order_product_id": 5, "quantity": 1}]
        }));

        assert!(shipment.create_fields().contains_key("items"));
        let update = shipment.update_fields();
        assert!(!update.contains_key("items"));
        assert!(!update.contains_key("order_id"));
        assert_eq!(update["tracking_number"], "1Z999");
    }

    #[test]
    fn test_deserialize_into_typed_record() {
        #[derive(Deserialize)]
        struct CustomerRow {
            id: u64,
            email: String,
        }

        let customer: Resource<Customer> =
            Resource::from_value(json!({"id": 4, "email": "a@example.com", "phone": ""}));
        let row: CustomerRow = customer.deserialize().unwrap();
        assert_eq!(row.id, 4);
        assert_eq!(row.email, "a@example.com");

        let bad: Resource<Customer> = Resource::from_value(json!({"id": "x"}));
        assert!(matches!(
            bad.deserialize::<CustomerRow>(),
            Err(ResourceError::Mapping { resource: "Customer", .. })
        ));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut record: Resource<Record> = Resource::new();
        record.set("name", "x");
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"name": "x"}));
    }
}
