//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the ROM browser
//!
//! Every fallible operation in the crate returns `Result<T, AppError>`. Most of
//! the browser degrades instead of failing (a missing games folder is an empty
//! library, a missing icon is a row without icon), so these errors are mostly
//! logged by the caller and then absorbed.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Unified error type for library browser operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// The games directory exists but could not be enumerated.
    #[error("Cannot list directory {path:?}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Requested file or directory does not exist.
    #[error("File or directory not found: {0:?}")]
    NotFound(PathBuf),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Bitmap or font could not be provided by the asset loader.
    #[error("Asset '{name}' unavailable: {reason}")]
    Asset { name: String, reason: String },

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Create a directory listing failure, folding "not found" into `NotFound`.
    pub fn listing_failed<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Listing { path, source }
        }
    }

    /// Create an asset failure error
    pub fn asset_unavailable<S1: Into<String>, S2: Into<String>>(name: S1, reason: S2) -> Self {
        Self::Asset {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True when the error only means "nothing to show" rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
