use thiserror::Error;

/// Rejections of user input, checked before the store is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("disease and probability are both required")]
    Empty,
    #[error("probability is not a number")]
    NotANumber,
    #[error("probability must be between 0 and 1")]
    OutOfRange,
}

/// Failures of the underlying database. The payload is the driver's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("could not open diagnosis store: {0}")]
    ConnectionFailed(String),
    #[error("diagnosis store rejected write: {0}")]
    WriteFailed(String),
    #[error("diagnosis store read failed: {0}")]
    ReadFailed(String),
}

impl StoreError {
    pub fn connection(err: impl std::fmt::Display) -> Self {
        Self::ConnectionFailed(err.to_string())
    }

    pub fn write(err: impl std::fmt::Display) -> Self {
        Self::WriteFailed(err.to_string())
    }

    pub fn read(err: impl std::fmt::Display) -> Self {
        Self::ReadFailed(err.to_string())
    }
}
