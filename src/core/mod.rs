//! Resource accounting and preparation orchestration.

pub mod admission;
pub mod audit;
pub mod error;
pub mod ledger;
pub mod machine;
pub mod registry;

pub use admission::{OutletGate, SlotGuard};
pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink};
pub use error::{AppResult, ConfigError, MachineError, MachineResult, PreparationError};
pub use ledger::Ingredient;
pub use machine::{CoffeeMachine, OrderId, PreparationStage, DEFAULT_BREW_DURATION};
pub use registry::{IngredientStore, Recipe, RecipeBook, Requirements};
