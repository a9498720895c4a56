//! Tests for configuration parsing and validation

use coffee_machine::config::Config;
use coffee_machine::core::ConfigError;
use std::time::Duration;

const DEFAULT: &str = r#"{"machine":{"outlets":{"count_n":3},"total_items_quantity":{"hot_water":500,"hot_milk":500,"ginger_syrup":100,"sugar_syrup":100,"tea_leaves_syrup":100},"beverages":{"hot_tea":{"hot_water":200,"hot_milk":100,"ginger_syrup":10,"sugar_syrup":10,"tea_leaves_syrup":30},"black_tea":{"hot_water":300,"ginger_syrup":30,"sugar_syrup":50,"tea_leaves_syrup":30}}}}"#;

#[test]
fn test_parse_default_document() {
    let cfg = Config::from_json_str(DEFAULT).unwrap();
    assert_eq!(cfg.machine.outlets.count_n, 3);
    assert_eq!(cfg.machine.total_items_quantity["hot_water"], 500);
    assert_eq!(cfg.machine.beverages.len(), 2);
    assert_eq!(cfg.machine.brew_duration(), Duration::from_secs(1));
}

#[test]
fn test_recipe_order_preserved() {
    let cfg = Config::from_json_str(DEFAULT).unwrap();
    let order: Vec<_> = cfg.machine.beverages["black_tea"]
        .iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(order, ["hot_water", "ginger_syrup", "sugar_syrup", "tea_leaves_syrup"]);
}

#[test]
fn test_brew_duration_override() {
    let json = r#"{"machine":{"outlets":{"count_n":1},"total_items_quantity":{},"beverages":{},"brew_duration_ms":25}}"#;
    let cfg = Config::from_json_str(json).unwrap();
    assert_eq!(cfg.machine.brew_duration(), Duration::from_millis(25));
}

#[test]
fn test_zero_outlets_rejected() {
    let json = r#"{"machine":{"outlets":{"count_n":0},"total_items_quantity":{},"beverages":{}}}"#;
    assert!(matches!(Config::from_json_str(json), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_zero_quantity_rejected() {
    let json = r#"{"machine":{"outlets":{"count_n":1},"total_items_quantity":{},"beverages":{"water":{"hot_water":0}}}}"#;
    let err = Config::from_json_str(json).unwrap_err();
    assert_eq!(err.to_string(), "invalid config: beverage `water` requires zero `hot_water`");
}

#[test]
fn test_empty_recipe_rejected() {
    let json = r#"{"machine":{"outlets":{"count_n":1},"total_items_quantity":{},"beverages":{"air":{}}}}"#;
    assert!(Config::from_json_str(json).is_err());
}

#[test]
fn test_negative_stock_is_a_parse_error() {
    let json = r#"{"machine":{"outlets":{"count_n":1},"total_items_quantity":{"hot_water":-5},"beverages":{}}}"#;
    assert!(matches!(Config::from_json_str(json), Err(ConfigError::Parse(_))));
}

#[test]
fn test_from_path_reads_file() {
    let path = std::env::temp_dir().join(format!("coffee-machine-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, DEFAULT).unwrap();
    let cfg = Config::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(cfg.machine.outlets.count_n, 3);

    assert!(matches!(Config::from_path(&path), Err(ConfigError::Io(_))));
}

// The only test in this binary that touches the process environment.
#[test]
fn test_from_env() {
    use coffee_machine::builders::MachineBuilder;
    use coffee_machine::config::{BREW_MS_ENV, CONFIG_PATH_ENV};

    std::env::remove_var(CONFIG_PATH_ENV);
    assert!(matches!(Config::from_env(), Err(ConfigError::MissingEnv(_))));
    assert!(MachineBuilder::from_env().is_err());

    let path = std::env::temp_dir().join(format!("coffee-machine-env-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, DEFAULT).unwrap();
    std::env::set_var(CONFIG_PATH_ENV, &path);
    std::env::set_var(BREW_MS_ENV, "7");

    let cfg = Config::from_env().unwrap();
    assert_eq!(cfg.machine.brew_duration(), Duration::from_millis(7));
    let machine = MachineBuilder::from_env().unwrap().build();
    assert_eq!(machine.capacity(), 3);

    std::env::set_var(BREW_MS_ENV, "soon");
    assert!(matches!(Config::from_env(), Err(ConfigError::Invalid(_))));

    std::env::remove_var(CONFIG_PATH_ENV);
    std::env::remove_var(BREW_MS_ENV);
    std::fs::remove_file(&path).unwrap();
}
