//! BigCommerce API version definitions.
//!
//! This module provides the [`ApiVersion`] enum used to build the OAuth API
//! path (`/stores/{hash}/{version}`).

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// BigCommerce API version.
///
/// # Example
///
/// ```rust
/// use bigcommerce_api::ApiVersion;
///
/// let version: ApiVersion = "v3".parse().unwrap();
/// assert_eq!(version, ApiVersion::V3);
/// assert_eq!(ApiVersion::default().to_string(), "v2");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// The v2 API (default).
    #[default]
    V2,
    /// The v3 API.
    V3,
    /// Any other version segment, such as `v4`.
    Custom(String),
}

impl ApiVersion {
    /// Returns the version as a path segment.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::V2 => "v2",
            Self::V3 => "v3",
            Self::Custom(v) => v,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "v2" => Ok(Self::V2),
            "v3" => Ok(Self::V3),
            other if Self::is_valid_version_format(other) => Ok(Self::Custom(other.to_string())),
            _ => Err(ConfigError::InvalidApiVersion {
                version: s.to_string(),
            }),
        }
    }
}

impl ApiVersion {
    fn is_valid_version_format(s: &str) -> bool {
        s.strip_prefix('v')
            .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
    }
}
