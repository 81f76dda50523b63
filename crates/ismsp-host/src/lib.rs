//! Workbench runtime: filter context, cache refresh, edit-session lifecycle,
//! and operator notices.

mod config;
mod error;
mod filter;
mod notice;
mod workbench;

pub use config::{ScopeMode, WorkbenchConfig};
pub use error::HostError;
pub use filter::{FilterContext, Transition};
pub use notice::{Notice, NoticeKind, Notices};
pub use workbench::{CommitReport, ExportedReport, RefreshReport, RefreshTickets, Workbench};
