mod error;
pub mod field;
pub mod period;
pub mod progress;
pub mod record;
pub mod sort_key;

pub use error::CoreError;
pub use field::TextField;
pub use period::{CatalogScope, Period, Round, Year};
pub use progress::{Denominator, ProgressSummary, TOTAL_CONTROLS, completion_ratio};
pub use record::{AnalysisResult, ComplianceItem, ItemStatus, TrendPoint};
pub use sort_key::{control_sort_key, normalize_control_id};
