//! Background maintenance tasks.
//!
//! Each task is a long-running async loop spawned via `tokio::spawn`.
//! All tasks accept a [`tokio_util::sync::CancellationToken`] and stop
//! promptly when it is triggered during graceful shutdown.

pub mod allocation_reclaim;
