//! Tests for error types

use std::error::Error;

use coffee_machine::core::{ConfigError, MachineError, PreparationError};

#[test]
fn test_cause_messages() {
    assert_eq!(MachineError::AllSlotsOccupied.to_string(), "all slots are occupied");
    assert_eq!(MachineError::BeverageNotFound.to_string(), "beverage not found");
    assert_eq!(
        MachineError::IngredientNotFound("green_mixture".into()).to_string(),
        "green_mixture is not available"
    );
    assert_eq!(
        MachineError::InsufficientQuantity("sugar_syrup".into()).to_string(),
        "sugar_syrup is not sufficient"
    );
}

#[test]
fn test_preparation_error_wraps_cause() {
    let err = PreparationError::new("black_tea", MachineError::InsufficientQuantity("sugar_syrup".into()));
    assert_eq!(
        err.to_string(),
        "black_tea cannot be prepared because sugar_syrup is not sufficient"
    );
    assert_eq!(err.source().unwrap().to_string(), "sugar_syrup is not sufficient");
    assert!(!err.is_rejection());
}

#[test]
fn test_rejection_message() {
    let err = PreparationError::new("hot_tea", MachineError::AllSlotsOccupied);
    assert!(err.is_rejection());
    assert_eq!(err.to_string(), "hot_tea cannot be prepared because all slots are occupied");
}

#[test]
fn test_config_error_messages() {
    let err = ConfigError::Invalid("outlets.count_n must be greater than 0".into());
    assert_eq!(err.to_string(), "invalid config: outlets.count_n must be greater than 0");
    let err = ConfigError::MissingEnv("COFFEE_MACHINE_CONFIG");
    assert_eq!(err.to_string(), "environment variable `COFFEE_MACHINE_CONFIG` not set");
}
