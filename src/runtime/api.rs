//! API-facing request/response models.

use std::collections::BTreeMap;
#[cfg(feature = "tokio-runtime")]
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{CoffeeMachine, PreparationError};
#[cfg(feature = "tokio-runtime")]
use super::Spawn;

/// A request for one beverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Beverage name.
    pub beverage: String,
}

impl OrderRequest {
    /// Order one `beverage`.
    pub fn new(beverage: impl Into<String>) -> Self {
        Self {
            beverage: beverage.into(),
        }
    }
}

/// How an order ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Beverage served.
    Prepared,
    /// Turned away because every outlet was busy.
    Rejected,
    /// Admitted but could not be prepared.
    Failed,
}

/// Outcome of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    /// Beverage name.
    pub beverage: String,
    /// Final status.
    pub status: OrderStatus,
    /// Success message or failure reason.
    pub message: String,
}

impl OrderResponse {
    /// Build a response from a preparation outcome.
    pub fn from_outcome(beverage: impl Into<String>, outcome: Result<String, PreparationError>) -> Self {
        let beverage = beverage.into();
        match outcome {
            Ok(message) => Self {
                beverage,
                status: OrderStatus::Prepared,
                message,
            },
            Err(e) => Self {
                beverage,
                status: if e.is_rejection() {
                    OrderStatus::Rejected
                } else {
                    OrderStatus::Failed
                },
                message: e.to_string(),
            },
        }
    }
}

/// Stock snapshot for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReport {
    /// Ingredient name to current stock.
    pub stock: BTreeMap<String, u32>,
    /// Ingredients at or below the threshold, if one was given.
    pub running_low: Option<BTreeMap<String, u32>>,
    /// Outlets in use.
    pub active_outlets: u32,
    /// Total outlets.
    pub outlets: u32,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Free outlets at the time of the check.
    pub free_outlets: u32,
}

/// Serve one order, awaiting the brewing time.
#[cfg(feature = "tokio-runtime")]
pub async fn submit_order(machine: &CoffeeMachine, req: OrderRequest) -> OrderResponse {
    let outcome = machine.prepare_async(&req.beverage).await;
    OrderResponse::from_outcome(req.beverage, outcome)
}

/// Serve a batch of orders concurrently on `spawner`, one task per order.
///
/// Responses come back in request order.
#[cfg(feature = "tokio-runtime")]
pub async fn dispatch_orders<S: Spawn>(
    spawner: &S,
    machine: Arc<CoffeeMachine>,
    orders: Vec<OrderRequest>,
) -> Vec<OrderResponse> {
    let pending: Vec<_> = orders
        .into_iter()
        .map(|order| {
            let beverage = order.beverage.clone();
            let (tx, rx) = tokio::sync::oneshot::channel();
            let machine = Arc::clone(&machine);
            spawner.spawn(async move {
                let response = submit_order(&machine, order).await;
                if tx.send(response).is_err() {
                    tracing::debug!("order response dropped; dispatcher gone");
                }
            });
            (beverage, rx)
        })
        .collect();

    let mut responses = Vec::with_capacity(pending.len());
    for (beverage, rx) in pending {
        let response = rx.await.unwrap_or_else(|_| {
            tracing::error!(%beverage, "order task ended without a response");
            OrderResponse {
                message: format!("{beverage} cannot be prepared because the order was aborted"),
                beverage,
                status: OrderStatus::Failed,
            }
        });
        responses.push(response);
    }
    responses
}

/// Current stock, optionally flagging ingredients at or below `low_threshold`.
pub fn stock_report(machine: &CoffeeMachine, low_threshold: Option<u32>) -> StockReport {
    StockReport {
        stock: machine.stock_levels(),
        running_low: low_threshold.map(|t| machine.ingredients_below(t)),
        active_outlets: machine.active_count(),
        outlets: machine.capacity(),
    }
}

/// Return a health payload.
pub fn health(machine: &CoffeeMachine) -> Health {
    Health {
        ok: true,
        free_outlets: machine.capacity().saturating_sub(machine.active_count()),
    }
}
