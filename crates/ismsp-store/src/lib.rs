//! Client-side caches: the item catalog for the active scope and the
//! cross-period trend aggregate.

mod catalog;
mod error;
mod mirror;
mod trend;

pub use catalog::{CatalogCache, CatalogTicket};
pub use error::StoreError;
pub use mirror::{ApplyOutcome, FetchTicket};
pub use trend::{TrendCache, TrendTicket};
