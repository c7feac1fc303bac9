//! Store resources over the REST API.
//!
//! # Overview
//!
//! - [`StoreClient`]: one store's API path and authenticated connection,
//!   with generic and typed endpoint access
//! - [`Resource<K>`]: an ordered record tagged with its [`ResourceKind`]
//! - [`resources`]: the kinds (`Product`, `Order`, `Customer`, ...)
//! - [`Filter`]: query parameters for list and count calls
//! - [`Payload`]: a mapped value or, in XML mode, the raw body
//! - [`RestError`] / [`ResourceError`]: what can go wrong
//!
//! # Example
//!
//! ```rust,ignore
//! use bigcommerce_api::rest::{resources::Product, Filter, Payload, StoreClient};
//!
//! let mut client = StoreClient::new(config);
//!
//! match client.find::<Product>(32).await? {
//!     Some(Payload::Mapped(mut product)) => {
//!         product.set("price", "24.00");
//!         client.update(&product).await?;
//!     }
//!     Some(Payload::Raw(xml)) => println!("{xml}"),
//!     None => println!("lookup failed: {:?}", client.last_error()),
//! }
//! ```

mod client;
mod errors;
mod filter;
mod resource;

pub mod resources;

pub use client::{Payload, StoreClient};
pub use errors::{ResourceError, RestError};
pub use filter::Filter;
pub use resource::{Resource, ResourceEndpoint, ResourceKind};
