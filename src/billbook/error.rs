use crate::model::RecordId;
use crate::validation::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillbookError {
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    #[error("Payload error: {0}")]
    Payload(String),

    #[error("Store error: {0}")]
    Store(String),

    /// A lookup missed because its slot was unreadable and loaded empty.
    #[error("Record not found: {id}. {notice}")]
    Unreadable { id: RecordId, notice: String },

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, BillbookError>;
