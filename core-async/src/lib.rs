//! Runtime facade for the playlist sync engine.
//!
//! Engine crates depend on this crate instead of naming Tokio directly, so the
//! executor stays an implementation detail of one place.
//!
//! # Modules
//!
//! - `task`: Task spawning (the batched applier's consumer runs as a task)
//! - `time`: Sleep and durations (search pacing)
//! - `sync`: Channels and locks (producer/consumer handoff)
//! - `runtime`: `block_on` used by the entry-point and test macros
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::mpsc;
//! use core_async::task;
//!
//! async fn example() {
//!     let (tx, mut rx) = mpsc::channel::<u32>(4);
//!     let consumer = task::spawn(async move {
//!         let mut total = 0;
//!         while let Some(value) = rx.recv().await {
//!             total += value;
//!         }
//!         total
//!     });
//!     tx.send(1).await.unwrap();
//!     drop(tx);
//!     assert_eq!(consumer.await.unwrap(), 1);
//! }
//! ```

// Re-export the async entry-point/test macros so downstream crates never need
// direct Tokio dependencies.
pub use core_async_macros::{main, test};

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
