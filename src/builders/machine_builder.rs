//! Builds a [`CoffeeMachine`] from a validated [`Config`].

use std::time::Duration;

use anyhow::Context;

use crate::config::{Config, MachineConfig};
use crate::core::{AppResult, AuditSink, CoffeeMachine, ConfigError, IngredientStore, RecipeBook};

/// Assembles a machine from configuration plus optional overrides.
pub struct MachineBuilder {
    config: MachineConfig,
    brew_duration: Option<Duration>,
    audit: Option<Box<dyn AuditSink>>,
}

impl MachineBuilder {
    /// Start from a configuration document.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the document is invalid.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.machine,
            brew_duration: None,
            audit: None,
        })
    }

    /// Start from the environment (see [`Config::from_env`]).
    ///
    /// # Errors
    ///
    /// Fails when the config cannot be located, read, or validated.
    pub fn from_env() -> AppResult<Self> {
        let config = Config::from_env().context("loading machine config from environment")?;
        Ok(Self::new(config)?)
    }

    /// Machine section this builder will use.
    pub const fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Override the brewing time from the document.
    #[must_use]
    pub const fn brew_duration(mut self, brew_duration: Duration) -> Self {
        self.brew_duration = Some(brew_duration);
        self
    }

    /// Attach an audit sink to the machine.
    #[must_use]
    pub fn audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Build the machine.
    pub fn build(self) -> CoffeeMachine {
        let brew_duration = self
            .brew_duration
            .unwrap_or_else(|| self.config.brew_duration());
        let ingredients = IngredientStore::new(self.config.total_items_quantity);
        let recipes = RecipeBook::new(self.config.beverages);

        tracing::info!(
            outlets = self.config.outlets.count_n,
            recipes = recipes.names().len(),
            ?brew_duration,
            "machine built"
        );

        let machine = CoffeeMachine::new(self.config.outlets.count_n, ingredients, recipes)
            .with_brew_duration(brew_duration);
        match self.audit {
            Some(audit) => machine.with_audit(audit),
            None => machine,
        }
    }
}
