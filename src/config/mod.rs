//! Configuration models for the machine.

pub mod machine;

pub use machine::{Config, MachineConfig, OutletConfig, BREW_MS_ENV, CONFIG_PATH_ENV};
