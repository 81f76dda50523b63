//! AI-assisted drafting: the pending evidence analysis and the edit-session
//! reconciliation that turns it into an editable draft.

pub mod draft;
pub mod reconcile;
pub mod slot;

pub use draft::{DraftContext, synthesize_description};
pub use reconcile::{EditSessionDraft, FieldOrigin, open_session, resolve_evidence_name};
pub use slot::{AnalysisRetention, PendingAnalysis};
