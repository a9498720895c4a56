//! Outlet admission control.
//!
//! `OutletGate` bounds the number of preparations in flight with a single
//! `AtomicU32`. Admission is an optimistic CAS loop that re-checks the bound
//! on every attempt, so the counter can never overshoot the capacity. There
//! is no waiting: a full gate rejects immediately.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::core::error::{MachineError, MachineResult};

/// Bounded counter of concurrently active preparations.
#[derive(Debug)]
pub struct OutletGate {
    capacity: u32,
    active: AtomicU32,
}

impl OutletGate {
    /// Create a gate with `capacity` outlets, all free.
    pub const fn new(capacity: u32) -> Self {
        Self {
            capacity,
            active: AtomicU32::new(0),
        }
    }

    /// Number of outlets.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Outlets currently in use.
    pub fn active(&self) -> u32 {
        self.active.load(Ordering::Acquire)
    }

    /// Try to reserve one outlet.
    ///
    /// The returned guard gives the outlet back when dropped, on every exit
    /// path of the holder.
    pub fn try_acquire(&self) -> MachineResult<SlotGuard<'_>> {
        let mut current = self.active.load(Ordering::Acquire);
        loop {
            if current >= self.capacity {
                return Err(MachineError::AllSlotsOccupied);
            }
            match self.active.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    tracing::debug!(active = current + 1, capacity = self.capacity, "outlet acquired");
                    return Ok(SlotGuard { gate: self });
                }
                Err(actual) => current = actual,
            }
        }
    }

    fn release(&self) {
        let mut current = self.active.load(Ordering::Acquire);
        loop {
            // Only a live guard reaches here, so current >= 1.
            match self.active.compare_exchange_weak(
                current,
                current.saturating_sub(1),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
        tracing::debug!(active = current.saturating_sub(1), "outlet released");
    }
}

/// A reserved outlet. Dropping it releases the outlet.
#[derive(Debug)]
#[must_use = "the outlet is released as soon as the guard is dropped"]
pub struct SlotGuard<'a> {
    gate: &'a OutletGate,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
