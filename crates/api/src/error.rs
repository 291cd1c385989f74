use eo_maxar::ErrorKind;
use reqwest::StatusCode;
use thiserror::Error;

/// Crate-specific error enum
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// [eo_maxar::Error]
    #[error(transparent)]
    Core(#[from] eo_maxar::Error),

    /// A configuration value could not be used.
    #[error("invalid value for {key}={value}: {message}")]
    InvalidConfig {
        /// The configuration key, e.g. `STAC_API_URL`.
        key: &'static str,

        /// The offending value.
        value: String,

        /// Why it was rejected.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("{status} returned from {url}")]
    Remote {
        /// The response status.
        status: StatusCode,

        /// The requested url.
        url: String,
    },

    /// [reqwest::Error]
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// The response body didn't match the expected record shape.
    #[error("invalid response from {url}: {source}")]
    Validation {
        /// The requested url.
        url: String,

        /// What was wrong with the body.
        #[source]
        source: eo_maxar::Error,
    },
}

impl Error {
    /// Returns this error's place in the taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Core(error) => error.kind(),
            Error::InvalidConfig { .. } => ErrorKind::Config,
            Error::Remote { .. } => ErrorKind::Remote,
            Error::Reqwest(_) => ErrorKind::Transport,
            Error::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// Returns the HTTP status of a remote error.
    pub fn status(&self) -> Option<StatusCode> {
        if let Error::Remote { status, .. } = self {
            Some(*status)
        } else {
            None
        }
    }
}
