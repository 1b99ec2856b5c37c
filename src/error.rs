/// Error type for load-average operations
///
/// Errors are `Clone` because the sampler hands the error of the most recent
/// sampling tick to every reader by value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The load counter could not be acquired; sampling is disabled
    #[error("Load counter unavailable: {0}")]
    CounterUnavailable(String),

    /// A single read of the load counter failed
    #[error("Failed to read load counter: {0}")]
    SampleRead(String),

    #[error("Feature not implemented: {0}")]
    NotImplemented(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("System error: {0}")]
    System(String),
}

impl Error {
    pub(crate) fn counter_unavailable<S: Into<String>>(msg: S) -> Self {
        Error::CounterUnavailable(msg.into())
    }

    pub(crate) fn sample_read<S: Into<String>>(msg: S) -> Self {
        Error::SampleRead(msg.into())
    }

    pub(crate) fn not_implemented<S: Into<String>>(msg: S) -> Self {
        Error::NotImplemented(msg.into())
    }

    pub(crate) fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Error::InvalidConfig(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::System(err.to_string())
    }
}

/// Result type for load-average operations
pub type Result<T> = std::result::Result<T, Error>;
