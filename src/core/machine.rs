//! Preparation orchestration.
//!
//! A preparation walks `Requested → Admitted → Validating → Consuming →
//! Brewing → Completed`. The outlet reserved at admission is held by a
//! [`SlotGuard`] for the whole walk, so it is released on every exit,
//! whether the order completes, fails validation, or its future is dropped.
//!
//! # Multi-ingredient consumption is not transactional
//!
//! Validation and consumption are two separate passes over the recipe.
//! Each single-ingredient step is atomic, but a concurrent order can drain
//! stock between the passes. When that happens the consumption pass stops at
//! the first ingredient that no longer covers the requirement, reports it as
//! insufficient, and the deductions already applied to earlier ingredients
//! stay applied. Callers that need all-or-nothing consumption must serialize
//! orders that share ingredients themselves.

use std::collections::BTreeMap;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::admission::{OutletGate, SlotGuard};
use crate::core::audit::{build_audit_event, AuditSink};
use crate::core::error::{MachineError, MachineResult, PreparationError};
use crate::core::registry::{IngredientStore, Recipe, RecipeBook};

/// Simulated brewing time used when none is configured.
pub const DEFAULT_BREW_DURATION: Duration = Duration::from_secs(1);

/// Identifier attached to every preparation for logs and audit events.
pub type OrderId = Uuid;

/// Where a preparation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreparationStage {
    /// Order received.
    Requested,
    /// Outlet reserved.
    Admitted,
    /// Checking ingredient presence and stock.
    Validating,
    /// Deducting ingredients.
    Consuming,
    /// Waiting out the brewing delay.
    Brewing,
    /// Beverage served.
    Completed,
    /// No free outlet.
    Rejected,
    /// Beverage has no recipe.
    NotFound,
    /// A required ingredient is not registered.
    Unavailable,
    /// A required ingredient is short.
    Insufficient,
}

impl PreparationStage {
    /// Terminal stage reached for a failure cause.
    pub const fn for_failure(cause: &MachineError) -> Self {
        match cause {
            MachineError::AllSlotsOccupied => Self::Rejected,
            MachineError::BeverageNotFound => Self::NotFound,
            MachineError::IngredientNotFound(_) => Self::Unavailable,
            MachineError::InsufficientQuantity(_) => Self::Insufficient,
        }
    }
}

/// A beverage machine shared by concurrent callers.
///
/// All state lives in the instance; separate machines share nothing.
pub struct CoffeeMachine {
    gate: OutletGate,
    ingredients: IngredientStore,
    recipes: RecipeBook,
    brew_duration: Duration,
    audit: Option<Mutex<Box<dyn AuditSink>>>,
    // Runs between validation and consumption so tests can drain stock there.
    #[cfg(test)]
    before_consume: Option<Box<dyn Fn(&IngredientStore) + Send + Sync>>,
}

impl std::fmt::Debug for CoffeeMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoffeeMachine")
            .field("gate", &self.gate)
            .field("recipes", &self.recipes.names())
            .field("brew_duration", &self.brew_duration)
            .field("audit", &self.audit.is_some())
            .finish_non_exhaustive()
    }
}

impl CoffeeMachine {
    /// Create a machine with `outlets` parallel outlets.
    pub fn new(outlets: u32, ingredients: IngredientStore, recipes: RecipeBook) -> Self {
        Self {
            gate: OutletGate::new(outlets),
            ingredients,
            recipes,
            brew_duration: DEFAULT_BREW_DURATION,
            audit: None,
            #[cfg(test)]
            before_consume: None,
        }
    }

    /// Override the simulated brewing time.
    #[must_use]
    pub const fn with_brew_duration(mut self, brew_duration: Duration) -> Self {
        self.brew_duration = brew_duration;
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Mutex::new(audit));
        self
    }

    /// Prepare a beverage, blocking the calling thread for the brewing time.
    ///
    /// Returns `"<beverage> is prepared"` on success.
    ///
    /// # Errors
    ///
    /// Returns a [`PreparationError`] when every outlet is busy, the beverage
    /// is unknown, or an ingredient is missing or short. Ingredients consumed
    /// before a late shortage are not restored.
    pub fn prepare(&self, beverage: &str) -> Result<String, PreparationError> {
        let order_id = Uuid::new_v4();
        let span = tracing::info_span!("prepare", %order_id, beverage);
        let _enter = span.enter();

        let slot = self.start(order_id, beverage)?;
        std::thread::sleep(self.brew_duration);
        Ok(self.finish(order_id, beverage, slot))
    }

    /// Prepare a beverage, awaiting the brewing time on the tokio timer.
    ///
    /// Same lifecycle as [`Self::prepare`]. Dropping the future mid-brew
    /// releases the outlet; ingredients already consumed stay consumed.
    ///
    /// # Errors
    ///
    /// See [`Self::prepare`].
    #[cfg(feature = "tokio-runtime")]
    pub async fn prepare_async(&self, beverage: &str) -> Result<String, PreparationError> {
        use tracing::Instrument;

        let order_id = Uuid::new_v4();
        let span = tracing::info_span!("prepare", %order_id, beverage);
        async move {
            let slot = self.start(order_id, beverage)?;
            tokio::time::sleep(self.brew_duration).await;
            Ok::<_, PreparationError>(self.finish(order_id, beverage, slot))
        }
        .instrument(span)
        .await
    }

    /// Set an ingredient's stock, registering it if new. Overwrites, never adds.
    pub fn refill(&self, ingredient: &str, quantity: u32) {
        self.ingredients.upsert(ingredient, quantity);
        tracing::info!(ingredient, quantity, "ingredient refilled");
    }

    /// Ingredients whose stock is at or below `threshold`.
    pub fn ingredients_below(&self, threshold: u32) -> BTreeMap<String, u32> {
        self.ingredients.below(threshold)
    }

    /// Current stock of every ingredient.
    pub fn stock_levels(&self) -> BTreeMap<String, u32> {
        self.ingredients.snapshot()
    }

    /// Current stock of one ingredient.
    pub fn stock(&self, ingredient: &str) -> Option<u32> {
        self.ingredients.get(ingredient).map(|i| i.stock())
    }

    /// Outlets in use right now.
    pub fn active_count(&self) -> u32 {
        self.gate.active()
    }

    /// Total outlets.
    pub const fn capacity(&self) -> u32 {
        self.gate.capacity()
    }

    /// Known beverage names, sorted.
    pub fn beverages(&self) -> Vec<String> {
        self.recipes.names()
    }

    /// Configured brewing time.
    pub const fn brew_duration(&self) -> Duration {
        self.brew_duration
    }

    /// Run every step up to brewing. On success the outlet is still held.
    fn start(&self, order_id: OrderId, beverage: &str) -> Result<SlotGuard<'_>, PreparationError> {
        tracing::debug!(stage = ?PreparationStage::Requested, "order received");
        match self.admit_and_consume(beverage) {
            Ok(slot) => {
                tracing::info!(stage = ?PreparationStage::Brewing, "brewing started");
                self.record(order_id, beverage, "start", None);
                Ok(slot)
            }
            Err(cause) => {
                let stage = PreparationStage::for_failure(&cause);
                tracing::warn!(?stage, reason = %cause, "preparation failed");
                let action = if stage == PreparationStage::Rejected { "reject" } else { "fail" };
                self.record(order_id, beverage, action, Some(cause.to_string()));
                Err(PreparationError::new(beverage, cause))
            }
        }
    }

    fn admit_and_consume(&self, beverage: &str) -> MachineResult<SlotGuard<'_>> {
        let slot = self.gate.try_acquire()?;
        tracing::debug!(stage = ?PreparationStage::Admitted, "outlet reserved");

        let recipe = self.recipes.get(beverage).ok_or(MachineError::BeverageNotFound)?;

        tracing::debug!(stage = ?PreparationStage::Validating, "checking ingredients");
        self.validate(recipe)?;

        #[cfg(test)]
        if let Some(hook) = &self.before_consume {
            hook(&self.ingredients);
        }

        tracing::debug!(stage = ?PreparationStage::Consuming, "deducting ingredients");
        self.consume(recipe)?;

        Ok(slot)
    }

    fn finish(&self, order_id: OrderId, beverage: &str, slot: SlotGuard<'_>) -> String {
        drop(slot);
        tracing::info!(stage = ?PreparationStage::Completed, "beverage served");
        self.record(order_id, beverage, "complete", None);
        format!("{beverage} is prepared")
    }

    /// Missing ingredients abort the pass at once. Shortages do not: the
    /// pass runs to the end and the last short ingredient is reported.
    fn validate(&self, recipe: &Recipe) -> MachineResult<()> {
        let mut insufficient = None;
        for (name, required) in recipe.requirements().iter() {
            let Some(ingredient) = self.ingredients.get(name) else {
                return Err(MachineError::IngredientNotFound(name.to_string()));
            };
            if ingredient.check_stock(required).is_err() {
                insufficient = Some(name);
            }
        }
        insufficient.map_or(Ok(()), |name| {
            Err(MachineError::InsufficientQuantity(name.to_string()))
        })
    }

    fn consume(&self, recipe: &Recipe) -> MachineResult<()> {
        for (applied, (name, required)) in recipe.requirements().iter().enumerate() {
            let ingredient = self
                .ingredients
                .get(name)
                .ok_or_else(|| MachineError::IngredientNotFound(name.to_string()))?;
            if let Err(e) = ingredient.consume(required) {
                if applied > 0 {
                    tracing::warn!(
                        ingredient = name,
                        applied,
                        "stock drained concurrently; earlier deductions are kept"
                    );
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn record(&self, order_id: OrderId, beverage: &str, action: &str, reason: Option<String>) {
        if let Some(audit) = &self.audit {
            audit
                .lock()
                .record(build_audit_event(order_id.to_string(), beverage, action, reason));
        }
    }
}
