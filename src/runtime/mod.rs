//! Runtime adapters and the request/response surface.

use std::future::Future;

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;

pub use api::{health, stock_report, Health, OrderRequest, OrderResponse, OrderStatus, StockReport};
#[cfg(feature = "tokio-runtime")]
pub use api::{dispatch_orders, submit_order};
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;

/// Abstraction for spawning order handling on a runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
