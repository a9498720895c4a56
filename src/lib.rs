//! # Coffee Machine
//!
//! Lock-free resource accounting for a beverage machine shared by many
//! concurrent callers.
//!
//! The machine has a fixed number of outlets and a finite stock of
//! ingredients. Every order must first win an outlet, then find every
//! ingredient of its recipe in stock, before a simulated brewing delay.
//!
//! ## Core Problem Solved
//!
//! - **Bounded admission**: at most `outlets` preparations run at once.
//!   A full machine rejects immediately; nobody waits in line.
//! - **Non-negative stock**: each ingredient is an `AtomicU32` mutated only
//!   through compare-and-swap loops that re-check sufficiency.
//! - **Guaranteed release**: the outlet is held by a guard that frees it on
//!   every exit path, including a dropped async future.
//!
//! Consumption across several ingredients is not one transaction. See
//! [`core::machine`] for what that means under contention.
//!
//! ## Example
//!
//! ```rust
//! use coffee_machine::config::Config;
//! use coffee_machine::builders::MachineBuilder;
//! use std::time::Duration;
//!
//! let cfg = Config::from_json_str(r#"{
//!     "machine": {
//!         "outlets": {"count_n": 2},
//!         "total_items_quantity": {"hot_water": 500, "hot_milk": 500},
//!         "beverages": {"hot_milk_tea": {"hot_water": 200, "hot_milk": 100}}
//!     }
//! }"#).unwrap();
//!
//! let machine = MachineBuilder::new(cfg)
//!     .unwrap()
//!     .brew_duration(Duration::from_millis(1))
//!     .build();
//!
//! assert_eq!(machine.prepare("hot_milk_tea").unwrap(), "hot_milk_tea is prepared");
//! assert_eq!(machine.stock("hot_water"), Some(300));
//! ```
//!
//! For complete scenarios, see `tests/machine_scenarios_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core accounting: outlets, ingredients, recipes, orchestration.
pub mod core;
/// Configuration models and loading.
pub mod config;
/// Builders to construct machines from configuration.
pub mod builders;
/// Runtime adapters and API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::core::{CoffeeMachine, MachineError, PreparationError};
