//! Session error types.

use std::path::PathBuf;

use tessera_rendering::BackendError;
use thiserror::Error;

/// Failure reading or writing the options file.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// The file exists but could not be read, or could not be written.
    #[error("options file {path}: {source}")]
    Io {
        /// Options file.
        path: PathBuf,
        /// Cause.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`crate::Options`].
    #[error("malformed options file {path}: {source}")]
    Parse {
        /// Options file.
        path: PathBuf,
        /// Cause.
        #[source]
        source: toml::de::Error,
    },

    /// The options could not be encoded.
    #[error("cannot encode options: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Failure starting or running a session.
#[derive(Debug, Error)]
pub enum GameError {
    /// Options could not be loaded.
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// The graphics backend failed during startup.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The session was used after teardown.
    #[error("session already torn down")]
    TornDown,
}

/// Result type for session operations.
pub type GameResult<T> = Result<T, GameError>;
