//! Error types for the document store.

/// Errors that can occur when reading or mutating the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested collection does not exist.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// No record with this id exists in the collection.
    #[error("record '{id}' not found in '{collection}'")]
    RecordNotFound { collection: String, id: String },

    /// A record with this id already exists.
    #[error("record '{id}' already exists in '{collection}'")]
    Conflict { collection: String, id: String },

    /// The record is not a JSON object or has an unusable id.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// The backing file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Creates a record-not-found error.
    pub fn record_not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::RecordNotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Conflict {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Returns true for errors caused by the caller rather than the store.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Json(_))
    }
}
