//! Tests for the runtime adapters and API models

use std::sync::Arc;
use std::time::Duration;

use coffee_machine::builders::MachineBuilder;
use coffee_machine::config::Config;
use coffee_machine::runtime::{
    dispatch_orders, health, stock_report, submit_order, OrderRequest, OrderStatus, Spawn,
    TokioSpawner,
};
use coffee_machine::CoffeeMachine;

fn machine(outlets: u32, brew_ms: u64) -> CoffeeMachine {
    let json = format!(
        r#"{{"machine":{{"outlets":{{"count_n":{outlets}}},"total_items_quantity":{{"hot_water":1000,"hot_milk":60}},"beverages":{{"latte":{{"hot_water":100,"hot_milk":20}},"mocha":{{"cocoa":5}}}},"brew_duration_ms":{brew_ms}}}}}"#
    );
    MachineBuilder::new(Config::from_json_str(&json).unwrap())
        .unwrap()
        .build()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[test]
fn test_owned_runtime_spawner() {
    let spawner = TokioSpawner::with_worker_threads(2).unwrap();
    let machine = Arc::new(machine(1, 1));
    let responses = spawner.handle().block_on(dispatch_orders(
        &spawner,
        Arc::clone(&machine),
        vec![OrderRequest::new("latte")],
    ));
    assert_eq!(responses[0].status, OrderStatus::Prepared);
}

#[tokio::test]
async fn test_submit_order_statuses() {
    let m = machine(1, 1);

    let ok = submit_order(&m, OrderRequest::new("latte")).await;
    assert_eq!(ok.status, OrderStatus::Prepared);
    assert_eq!(ok.message, "latte is prepared");

    let missing = submit_order(&m, OrderRequest::new("mocha")).await;
    assert_eq!(missing.status, OrderStatus::Failed);
    assert_eq!(missing.message, "mocha cannot be prepared because cocoa is not available");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dispatch_orders_rejects_over_capacity() {
    let m = Arc::new(machine(2, 200));
    let spawner = TokioSpawner::current();

    let orders = (0..6).map(|_| OrderRequest::new("latte")).collect();
    let responses = dispatch_orders(&spawner, Arc::clone(&m), orders).await;

    assert_eq!(responses.len(), 6);
    let prepared = responses.iter().filter(|r| r.status == OrderStatus::Prepared).count();
    let rejected = responses.iter().filter(|r| r.status == OrderStatus::Rejected).count();
    assert!((1..=2).contains(&prepared));
    assert_eq!(prepared + rejected, 6);
    assert!(responses
        .iter()
        .filter(|r| r.status == OrderStatus::Rejected)
        .all(|r| r.message == "latte cannot be prepared because all slots are occupied"));
    assert_eq!(m.active_count(), 0);
}

#[tokio::test]
async fn test_dropped_future_releases_outlet() {
    let m = machine(1, 10_000);
    let timed_out = tokio::time::timeout(Duration::from_millis(50), m.prepare_async("latte")).await;
    assert!(timed_out.is_err());
    assert_eq!(m.active_count(), 0);
    // Consumed before the drop and not restored.
    assert_eq!(m.stock("hot_milk"), Some(40));
}

#[test]
fn test_stock_report_and_health() {
    let m = machine(3, 1);
    m.prepare("latte").unwrap();

    let report = stock_report(&m, Some(50));
    assert_eq!(report.stock["hot_water"], 900);
    assert_eq!(report.running_low.as_ref().unwrap().len(), 1);
    assert_eq!(report.running_low.unwrap()["hot_milk"], 40);
    assert_eq!(report.outlets, 3);
    assert_eq!(report.active_outlets, 0);

    let json = serde_json::to_value(health(&m)).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["free_outlets"], 3);
    assert!(stock_report(&m, None).running_low.is_none());
}
