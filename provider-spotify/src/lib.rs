//! # Spotify Provider
//!
//! Implements `PlaylistProvider` for the Spotify Web API.
//!
//! ## Overview
//!
//! This module provides:
//! - Paginated listing of the current user's playlists and their tracks
//! - Playlist creation and deletion (unfollow)
//! - Catalog search with tag filters
//! - Batched track additions and removals
//!
//! Authentication is out of scope: the connector is given a bearer token.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::SpotifyConnector;
pub use error::{Result, SpotifyError};
