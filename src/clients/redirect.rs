//! Manual redirect following.
//!
//! The HTTP engine is configured not to follow redirects itself; the
//! [`Connection`](crate::clients::Connection) asks a [`RedirectFollower`]
//! after every response whether to hop and where.

use reqwest::Url;

use crate::clients::errors::{NetworkError, NetworkErrorCode};
use crate::clients::http_response::{RawResponse, LOCATION_HEADER};

/// Maximum number of redirect hops in one logical call.
pub const MAX_REDIRECTS: u32 = 20;

/// Tracks redirect hops for one logical call.
#[derive(Clone, Debug)]
pub struct RedirectFollower {
    hops: u32,
    max_hops: u32,
}

impl Default for RedirectFollower {
    fn default() -> Self {
        Self::new(MAX_REDIRECTS)
    }
}

impl RedirectFollower {
    /// Creates a follower allowing `max_hops` redirects.
    #[must_use]
    pub const fn new(max_hops: u32) -> Self {
        Self { hops: 0, max_hops }
    }

    /// Returns the number of hops taken so far in the current chain.
    #[must_use]
    pub const fn hops(&self) -> u32 {
        self.hops
    }

    /// Resets the hop counter.
    pub fn reset(&mut self) {
        self.hops = 0;
    }

    /// Decides where to go after `response`, which was fetched from `from`.
    ///
    /// Returns `Ok(None)` for a terminal response (anything but 301/302, or
    /// a redirect without `Location`) and resets the counter. An absolute
    /// `Location` is used verbatim; a relative one is resolved against
    /// `from`.
    ///
    /// # Errors
    ///
    /// Returns a [`NetworkErrorCode::TooManyRedirects`] error once the chain
    /// exceeds the hop limit, and [`NetworkErrorCode::UrlMalformed`] if the
    /// location cannot be resolved.
    pub fn next_location(
        &mut self,
        response: &RawResponse,
        from: &Url,
    ) -> Result<Option<Url>, NetworkError> {
        let location = match response.header(LOCATION_HEADER) {
            Some(location) if response.is_redirect() => location,
            _ => {
                self.reset();
                return Ok(None);
            }
        };

        self.hops += 1;
        if self.hops > self.max_hops {
            self.reset();
            return Err(NetworkError::new(
                NetworkErrorCode::TooManyRedirects,
                format!(
                    "Too many redirects when trying to follow location (limit {}).",
                    self.max_hops
                ),
            ));
        }

        let next = match Url::parse(location) {
            Ok(url) if url.host_str().is_some() => Ok(url),
            _ => from.join(location),
        };
        next.map(Some).map_err(|e| {
            NetworkError::new(
                NetworkErrorCode::UrlMalformed,
                format!("Invalid redirect location '{location}': {e}"),
            )
        })
    }
}
