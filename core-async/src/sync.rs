//! Synchronization primitives.
//!
//! Async-aware channels and locks backed by `tokio::sync`. The bounded
//! `mpsc` channel is the handoff between the batched applier (producer) and
//! the local persistence task (consumer); it is FIFO, so chunks are always
//! consumed in emission order.

pub use tokio::sync::{mpsc, oneshot, Mutex, MutexGuard, OnceCell, RwLock};
