mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::{eventually, StubPayments};
use order_lifecycle::config::OrderConfig;
use order_lifecycle::events::codec;
use order_lifecycle::lifecycle::{AssemblySimulator, OrderSystem, ASSEMBLY_GROUP};
use order_lifecycle::model::{
    AssemblyCompleted, OrderPaid, OrderStatus, PartCategory, PartCreate, PartId, PaymentMethod,
    UserId,
};
use order_lifecycle::order_actor::OrderError;

async fn seed(system: &OrderSystem, price: f64) -> PartId {
    system
        .catalog
        .add_part(PartCreate {
            name: "Porthole".to_string(),
            category: PartCategory::Porthole,
            price,
            stock_quantity: 3,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_paid_order_is_assembled() {
    let config = OrderConfig::default();
    let system = OrderSystem::new(&config);
    let simulator = AssemblySimulator::new(system.events.clone(), &config.topics, 0..=0);
    let simulator_handle = tokio::spawn(simulator.run(system.shutdown_token()));

    let part_id = seed(&system, 150.0).await;
    let order = system
        .orchestrator
        .create(UserId::from("u1"), vec![part_id])
        .await
        .unwrap();
    assert_eq!(order.total_price, 150.0);

    let transaction_id = system
        .orchestrator
        .pay(order.order_id, PaymentMethod::Sbp)
        .await
        .unwrap();

    let order_id = order.order_id;
    eventually(|| {
        let orchestrator = system.orchestrator.clone();
        async move { orchestrator.get(order_id).await.unwrap().status == OrderStatus::Completed }
    })
    .await;

    let stored = system.orders.get_order(order.order_id).await.unwrap();
    assert_eq!(stored.transaction_id, Some(transaction_id.clone()));
    assert_eq!(stored.payment_method, Some(PaymentMethod::Sbp));

    let paid_records = system.events.records(&config.topics.order_paid).await;
    assert_eq!(paid_records.len(), 1);
    assert_eq!(paid_records[0].key, order.order_id.to_string());
    let paid: OrderPaid = codec::decode(&paid_records[0].payload).unwrap();
    assert_eq!(paid.transaction_id, transaction_id);

    let assembled_records = system.events.records(&config.topics.order_assembled).await;
    assert_eq!(assembled_records.len(), 1);
    let assembled: AssemblyCompleted = codec::decode(&assembled_records[0].payload).unwrap();
    assert_eq!(assembled.event_id, paid.event_id);
    assert_eq!(assembled.order_id, order.order_id);

    assert_eq!(
        system.events.committed(&config.topics.order_paid, ASSEMBLY_GROUP).await,
        1
    );
    eventually(|| {
        let events = system.events.clone();
        let (topic, group) = (
            config.topics.order_assembled.clone(),
            config.subscriber.group.clone(),
        );
        async move { events.committed(&topic, &group).await == 1 }
    })
    .await;

    let err = system.orchestrator.cancel(order.order_id).await.unwrap_err();
    assert!(matches!(err, OrderError::InvalidStatus { .. }));

    system.shutdown().await.unwrap();
    simulator_handle.await.unwrap();
}

#[tokio::test]
async fn test_declined_payment_publishes_nothing() {
    let config = OrderConfig::default();
    let payments = Arc::new(StubPayments::declining());
    let system = OrderSystem::with_payments(&config, payments.clone());

    let part_id = seed(&system, 10.0).await;
    let order = system
        .orchestrator
        .create(UserId::from("u1"), vec![part_id])
        .await
        .unwrap();
    let err = system
        .orchestrator
        .pay(order.order_id, PaymentMethod::CreditCard)
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::Payment(_)));
    assert_eq!(payments.calls(), 1);
    assert_eq!(
        system.orders.get_order(order.order_id).await.unwrap().status,
        OrderStatus::PendingPayment
    );
    assert!(system.events.records(&config.topics.order_paid).await.is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_idle_system_shuts_down() {
    let mut system = OrderSystem::new(&OrderConfig::default());
    let simulator = AssemblySimulator::new(
        system.events.clone(),
        &OrderConfig::default().topics,
        0..=0,
    );
    system.spawn(simulator.run(system.shutdown_token()));

    tokio::time::timeout(Duration::from_secs(2), system.shutdown())
        .await
        .expect("shutdown timed out")
        .unwrap();
}

#[tokio::test]
async fn test_shutdown_waits_for_every_task_after_a_panic() {
    let mut system = OrderSystem::new(&OrderConfig::default());
    system.spawn(async {
        panic!("task failed");
    });

    let finished = Arc::new(AtomicBool::new(false));
    let token = system.shutdown_token();
    let flag = finished.clone();
    system.spawn(async move {
        token.cancelled().await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        flag.store(true, Ordering::SeqCst);
    });

    let err = system.shutdown().await.unwrap_err();
    assert!(err.is_panic());
    assert!(finished.load(Ordering::SeqCst));
}
