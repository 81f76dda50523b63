use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("catalog response repeats control id {id} ({scope})")]
    DuplicateId { id: String, scope: String },
}
