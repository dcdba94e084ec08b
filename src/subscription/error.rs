use thiserror::Error;

/// Errors raised by the subscription core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Month/year text does not match `MM-YYYY` or is out of range
    #[error("Invalid month format: {0}")]
    InvalidFormat(String),
    /// Client input rejected before reaching the calculator or the store
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("Subscription not found: {0}")]
    NotFound(String),
    /// The period total does not fit in a signed 64-bit integer
    #[error("total exceeds the supported range")]
    TotalOverflow,
    /// The repository collaborator failed
    #[error("Repository error: {0}")]
    Repository(String),
}

impl SubscriptionError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type SubscriptionResult<T> = Result<T, SubscriptionError>;
