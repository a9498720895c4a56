//! Per-ingredient stock counters.
//!
//! Every mutation goes through a compare-and-swap loop on a single
//! `AtomicU32`, so one ingredient's stock can never be driven below zero no
//! matter how many requests consume it at once. Operations spanning several
//! ingredients are not atomic as a group; see [`crate::core::machine`].

use std::sync::atomic::{AtomicU32, Ordering};

use crate::core::error::{MachineError, MachineResult};

/// A named consumable with a lock-free stock counter.
#[derive(Debug)]
pub struct Ingredient {
    name: String,
    stock: AtomicU32,
}

impl Ingredient {
    /// Create an ingredient with an initial stock.
    pub fn new(name: impl Into<String>, stock: u32) -> Self {
        Self {
            name: name.into(),
            stock: AtomicU32::new(stock),
        }
    }

    /// Ingredient name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current stock (a racy snapshot under contention).
    pub fn stock(&self) -> u32 {
        self.stock.load(Ordering::Acquire)
    }

    /// Return the current stock if it covers `required`.
    pub fn check_stock(&self, required: u32) -> MachineResult<u32> {
        Self::sufficient(&self.name, self.stock(), required)
    }

    /// Subtract `required` from the stock.
    ///
    /// Sufficiency is re-validated on every CAS attempt, so a competing
    /// consumer that drains the stock between the read and the swap turns
    /// this call into `InsufficientQuantity` instead of an underflow.
    pub fn consume(&self, required: u32) -> MachineResult<u32> {
        let mut current = self.check_stock(required)?;
        loop {
            match self.stock.compare_exchange_weak(
                current,
                current - required,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    tracing::trace!(ingredient = %self.name, required, left = current - required, "consumed");
                    return Ok(current - required);
                }
                Err(actual) => current = Self::sufficient(&self.name, actual, required)?,
            }
        }
    }

    /// Overwrite the stock. Not additive; last writer wins.
    pub fn replenish(&self, new_stock: u32) {
        self.stock.store(new_stock, Ordering::Release);
    }

    fn sufficient(name: &str, current: u32, required: u32) -> MachineResult<u32> {
        if required > current {
            return Err(MachineError::InsufficientQuantity(name.to_string()));
        }
        Ok(current)
    }
}
