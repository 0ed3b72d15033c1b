use sea_orm::DbErr;
use thiserror::Error;

/// Errors raised by the register.
#[derive(Debug, Error)]
pub enum Error {
    /// An order was submitted with no event open
    #[error("No event selected; open an event before submitting an order")]
    NoEventSelected,

    /// The given event ID does not exist
    #[error("Event not found: {id}")]
    EventNotFound { id: i64 },

    /// The cart has no lines
    #[error("Cannot submit an empty cart")]
    EmptyCart,

    /// The label is already visible in the edit session
    #[error("Option already exists: {label}")]
    DuplicateOption { label: String },

    /// An editor operation was called while viewing
    #[error("No option edit session is active")]
    NoEditSession,

    /// The given product ID does not exist
    #[error("Product not found: {id}")]
    ProductNotFound { id: i64 },

    /// The given order ID does not exist
    #[error("Order not found: {id}")]
    OrderNotFound { id: i64 },

    /// A price that is not a non-negative decimal
    #[error("Invalid price: {value:?}")]
    InvalidPrice { value: String },

    /// Rejected input
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Bad or unreadable configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A store write failed; `what` names the row kind
    #[error("Failed to write {what}: {source}")]
    StoreWriteFailure {
        what: String,
        #[source]
        source: DbErr,
    },

    /// Any other store error
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl Error {
    /// Wraps a store error raised while writing `what`.
    pub fn store_write(what: impl Into<String>, source: DbErr) -> Self {
        Self::StoreWriteFailure {
            what: what.into(),
            source,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
