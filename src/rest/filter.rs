//! Query parameters for list and count endpoints.
//!
//! # Example
//!
//! ```rust
//! use bigcommerce_api::rest::Filter;
//!
//! let filter = Filter::new().page(2).limit(50).param("is_visible", true);
//! assert_eq!(filter.to_query(), "?page=2&limit=50&is_visible=true");
//!
//! // A bare page number is shorthand for a page filter.
//! let filter = Filter::from(3);
//! assert_eq!(filter.get("page"), Some("3"));
//! ```

use std::fmt::Display;

/// Ordered key/value query parameters.
///
/// Setting a key that is already present replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    params: Vec<(String, String)>,
}

impl Filter {
    /// Creates an empty filter.
    #[must_use]
    pub const fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Sets an arbitrary parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.set(key, value);
        self
    }

    /// Sets the page number (1-based).
    #[must_use]
    pub fn page(self, page: u32) -> Self {
        self.param("page", page)
    }

    /// Sets the page size.
    #[must_use]
    pub fn limit(self, limit: u32) -> Self {
        self.param("limit", limit)
    }

    /// Sets a parameter on an existing filter.
    pub fn set(&mut self, key: impl Into<String>, value: impl Display) {
        let key = key.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.params.push((key, value)),
        }
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the parameters as borrowed pairs, in insertion order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Renders the filter as a query string with a leading `?`, or an empty
    /// string when no parameters are set.
    #[must_use]
    pub fn to_query(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }
        let encoded: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        format!("?{}", encoded.join("&"))
    }
}

impl From<u32> for Filter {
    fn from(page: u32) -> Self {
        Self::new().page(page)
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Filter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filter = Self::new();
        for (k, v) in iter {
            filter.set(k, v);
        }
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_renders_nothing() {
        assert_eq!(Filter::new().to_query(), "");
        assert!(Filter::default().is_empty());
    }

    #[test]
    fn test_params_keep_insertion_order() {
        let filter = Filter::new().param("name", "Shirt").limit(10).page(1);
        assert_eq!(
            filter.pairs(),
            vec![("name", "Shirt"), ("limit", "10"), ("page", "1")]
        );
    }

    #[test]
    fn test_setting_existing_key_replaces_in_place() {
        let filter = Filter::from(1).limit(5).page(4);
        assert_eq!(filter.to_query(), "?page=4&limit=5");
    }

    #[test]
    fn test_values_are_url_encoded() {
        let filter = Filter::new().param("email", "a+b@example.com");
        assert_eq!(filter.to_query(), "?email=a%2Bb%40example.com");
    }

    #[test]
    fn test_collects_from_pairs() {
        let filter: Filter = [("min_id", 10), ("max_id", 20)].into_iter().collect();
        assert_eq!(filter.get("max_id"), Some("20"));
    }
}
