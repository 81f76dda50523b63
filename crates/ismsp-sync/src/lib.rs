//! Sync layer: the backend contract, client configuration, and the reqwest transport.

pub mod backend;
mod config;
mod error;

#[cfg(feature = "http")]
pub mod http;

pub use backend::{Backend, EvidenceUpload, SaveAck, SaveRequest, report_file_name};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::SyncError;

#[cfg(feature = "http")]
pub use http::IsmsClient;
