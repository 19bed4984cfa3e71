use thiserror::Error;

/// Failure reported by (or while calling) the bank specific adapter
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BankingAdapterError {
    #[error("Banking adapter failure: {message}")]
    Failure { message: String },
    #[error("Banking adapter call timed out")]
    Timeout,
    #[error("Not supported by the banking adapter")]
    NotSupported,
}

impl BankingAdapterError {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}
