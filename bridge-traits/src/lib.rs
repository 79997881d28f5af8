//! # Host Bridge Traits
//!
//! Capability traits that the sync engine requires from its host.
//!
//! ## Overview
//!
//! The engine never talks to the network or the disk directly. Each capability
//! it consumes is a trait defined here and implemented elsewhere:
//!
//! | Trait | Purpose | Implementation |
//! |-------|---------|----------------|
//! | [`HttpClient`](http::HttpClient) | Async HTTP with retry | `bridge-desktop` (`reqwest`) |
//! | [`FileSystemAccess`](storage::FileSystemAccess) | File and directory I/O | `bridge-desktop` (`tokio::fs`) |
//! | [`PlaylistProvider`](catalog::PlaylistProvider) | Remote playlist collection | `provider-spotify` |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! convert their own failures into it and include enough context (path, HTTP
//! status) for the message to be actionable on its own.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! behind `Arc` and moved into the applier's consumer task.

pub mod catalog;
pub mod error;
pub mod http;
pub mod storage;

pub use error::BridgeError;

pub use catalog::{PlaylistProvider, RemotePage, RemotePlaylist, RemoteTrack};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use storage::{FileMetadata, FileSystemAccess};
