use bridge_traits::error::BridgeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Failed to {action} '{}': {source}", .path.display())]
    Storage {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: BridgeError,
    },

    #[error("Invalid record '{name}': {message}")]
    InvalidRecord { name: String, message: String },
}

impl LibraryError {
    pub(crate) fn storage(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(BridgeError) -> Self {
        let path = path.into();
        move |source| LibraryError::Storage {
            action,
            path,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
