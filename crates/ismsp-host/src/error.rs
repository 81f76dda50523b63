use ismsp_core::CatalogScope;
use ismsp_store::StoreError;
use ismsp_sync::SyncError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to load catalog: {0}")]
    Load(#[source] SyncError),

    #[error("failed to save item {id}: {source}")]
    Save {
        id: String,
        #[source]
        source: SyncError,
    },

    #[error("evidence analysis failed: {0}")]
    Upload(#[source] SyncError),

    #[error("report export failed: {0}")]
    Export(#[source] SyncError),

    #[error(transparent)]
    Catalog(#[from] StoreError),

    #[error("no edit session is open")]
    NoSession,

    #[error("an edit session for item {id} is already open")]
    SessionAlreadyOpen { id: String },

    #[error("item {0} is not in the catalog")]
    UnknownItem(String),

    #[error("catalog for {scope} is out of date; refresh before editing")]
    StaleCatalog { scope: CatalogScope },
}
