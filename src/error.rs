use thiserror::Error;

/// A specialized `Result` type for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading inputs, validating parameters, or persisting results
///
/// Illegal moves inside an episode are never errors; the environment answers them with a penalty.
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the underlying I/O system
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A value table, cave, or config file could not be (de)serialized
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The training report could not be written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The cave graph violates a structural requirement
    #[error("Invalid cave: {0}")]
    InvalidCave(String),

    /// A state or action key in a stored value table could not be parsed
    #[error("Malformed table key `{key}`: {reason}")]
    MalformedKey { key: String, reason: String },

    /// A hyperparameter is outside its permitted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<rand_distr::BernoulliError> for Error {
    fn from(e: rand_distr::BernoulliError) -> Self {
        Error::InvalidParameter(e.to_string())
    }
}
