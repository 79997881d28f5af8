//! # Core Configuration Module
//!
//! Provides configuration management for the playlist sync tool.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds every dependency and setting the engine needs. It
//! enforces fail-fast validation so a missing token or bridge is reported
//! before any network or disk work starts.
//!
//! ## Required Settings
//!
//! - `access_token` - OAuth bearer token for the remote service. Acquiring
//!   and refreshing it is the host's job.
//!
//! ## Optional Settings (with defaults)
//!
//! - `root_dir` - Root of the playlist tree (default: `spotify-fbc`)
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//! - `FileSystemAccess` - File I/O (desktop default: tokio fs)
//! - `http_timeout` - Per-request timeout (default: 30s)
//!
//! When the `desktop-shims` feature is enabled, desktop-ready bridges are
//! injected automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .root_dir("/home/me/playlists")
//!     .access_token(token)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{FileSystemAccess, HttpClient};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default root of the playlist tree, relative to the working directory
pub const DEFAULT_ROOT_DIR: &str = "spotify-fbc";

/// Default per-request HTTP timeout
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Core configuration for the sync tool.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Root directory of the local playlist tree
    pub root_dir: PathBuf,

    /// Bearer token for the remote service
    pub access_token: String,

    /// HTTP client for API requests
    pub http_client: Arc<dyn HttpClient>,

    /// File system access abstraction
    pub file_system: Arc<dyn FileSystemAccess>,

    /// Per-request HTTP timeout
    pub http_timeout: Duration,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("root_dir", &self.root_dir)
            .field("access_token", &"[REDACTED]")
            .field("http_client", &"HttpClient { ... }")
            .field("file_system", &"FileSystemAccess { ... }")
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Root directory is not empty
    /// - Access token is not blank
    /// - HTTP timeout is non-zero
    pub fn validate(&self) -> Result<()> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(Error::Config("Root directory cannot be empty".to_string()));
        }

        if self.access_token.trim().is_empty() {
            return Err(Error::Config(
                "Access token cannot be empty. Pass --token or set SPOTIFY_ACCESS_TOKEN."
                    .to_string(),
            ));
        }

        if self.http_timeout.is_zero() {
            return Err(Error::Config(
                "HTTP timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout)
        .map_err(|e| Error::Internal(format!("Failed to initialize HttpClient: {}", e)))?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required to reach the remote service. \
                 Enable the 'desktop-shims' feature to use the default ReqwestHttpClient \
                 or inject one with .http_client()."
            .to_string(),
    })
}

/// The default file system bridge, for commands that never reach the remote
/// service and therefore need no full [`CoreConfig`].
#[cfg(feature = "desktop-shims")]
pub fn default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    use bridge_desktop::TokioFileSystem;

    Ok(Arc::new(TokioFileSystem::new()))
}

#[cfg(not(feature = "desktop-shims"))]
pub fn default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Err(Error::CapabilityMissing {
        capability: "FileSystemAccess".to_string(),
        message: "FileSystemAccess implementation is required for the playlist tree. \
                 Enable the 'desktop-shims' feature to use the default TokioFileSystem \
                 or inject one with .file_system()."
            .to_string(),
    })
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    root_dir: Option<PathBuf>,
    access_token: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
    http_timeout: Option<Duration>,
}

impl CoreConfigBuilder {
    /// Sets the root directory of the playlist tree.
    pub fn root_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.root_dir = Some(path.into());
        self
    }

    /// Sets the bearer token used for every remote call.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the reqwest-based default is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the file system access implementation.
    ///
    /// If not provided, the tokio-based default is used when the
    /// `desktop-shims` feature is enabled.
    pub fn file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Sets the per-request HTTP timeout used by the default client.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(CoreConfig)` on success, or an error if:
    /// - The access token is missing or blank
    /// - A bridge is missing and no desktop default is available
    /// - Configuration values are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let access_token = self.access_token.ok_or_else(|| {
            Error::Config(
                "Access token is required. Use .access_token() to set it.".to_string(),
            )
        })?;

        let http_timeout = self.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(http_timeout)?,
        };

        let file_system = match self.file_system {
            Some(fs) => fs,
            None => default_file_system()?,
        };

        let config = CoreConfig {
            root_dir: self
                .root_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT_DIR)),
            access_token,
            http_client,
            file_system,
            http_timeout,
        };

        config.validate()?;

        Ok(config)
    }
}
