//! # Core Runtime Module
//!
//! Ambient runtime infrastructure shared by the sync engine and the CLI:
//! - Logging and tracing setup
//! - Configuration and bridge injection
//!
//! The engine crates never read the environment or global state; the host
//! builds a [`config::CoreConfig`] and hands the pieces down explicitly.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
