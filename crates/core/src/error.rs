use thiserror::Error;

/// Errors surfaced to callers of the stock operations.
#[derive(Debug, Error)]
pub enum StockError {
    /// Missing, malformed or out-of-range input. Nothing was written.
    #[error("{0}")]
    Validation(String),

    /// The ticker is already present in the collection.
    #[error("Company with ticker {ticker} already exists")]
    Conflict { ticker: String },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl StockError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StockError::Validation(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Every configured backend rejected the write.
    #[error("all storage backends failed ({attempted}): {last_error}")]
    AllBackendsFailed {
        attempted: String,
        last_error: String,
    },

    #[error("no storage backends configured")]
    NoBackends,
}

pub type Result<T> = std::result::Result<T, StockError>;
