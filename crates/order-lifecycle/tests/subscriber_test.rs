mod common;

use std::time::Duration;

use actor_framework::mock::MockClient;
use actor_framework::FrameworkError;
use common::eventually;
use order_lifecycle::clients::OrderClient;
use order_lifecycle::config::SubscriberConfig;
use order_lifecycle::events::{codec, AssemblySubscriber, EventLog, HandlerError};
use order_lifecycle::model::{
    AssemblyCompleted, EventId, Order, OrderCreate, OrderId, OrderStatus, PartId, PaymentMethod,
    TransactionId, UserId,
};
use order_lifecycle::order_actor::{self, AssemblyOutcome, OrderError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const TOPIC: &str = "order.assembled";
const GROUP: &str = "order-service";

fn settings() -> SubscriberConfig {
    SubscriberConfig {
        redelivery_backoff_ms: 5,
        ..SubscriberConfig::default()
    }
}

fn completed(order_id: OrderId, event_id: EventId) -> Vec<u8> {
    codec::encode(&AssemblyCompleted {
        event_id,
        order_id,
        user_id: UserId::from("u1"),
        build_time_sec: 3,
    })
    .unwrap()
}

fn spawn_orders() -> OrderClient {
    let (actor, orders) = order_actor::new(32);
    tokio::spawn(actor.run(()));
    orders
}

async fn paid_order(orders: &OrderClient) -> Order {
    let order = orders
        .create_order(OrderCreate {
            user_id: UserId::from("u1"),
            part_ids: vec![PartId::from("p1")],
            total_price: 100.0,
        })
        .await
        .unwrap();
    orders
        .mark_paid(order.order_id, TransactionId::from("t1"), PaymentMethod::Card)
        .await
        .unwrap()
}

fn start(
    log: &EventLog,
    orders: OrderClient,
    settings: SubscriberConfig,
) -> (CancellationToken, JoinHandle<()>) {
    let shutdown = CancellationToken::new();
    let subscriber = AssemblySubscriber::new(log.consumer(TOPIC, GROUP), orders, settings);
    let handle = tokio::spawn(subscriber.run(shutdown.clone()));
    (shutdown, handle)
}

async fn wait_committed(log: &EventLog, offset: u64) {
    eventually(|| {
        let log = log.clone();
        async move { log.committed(TOPIC, GROUP).await == offset }
    })
    .await;
}

#[tokio::test]
async fn test_assembly_event_completes_paid_order() {
    let log = EventLog::new();
    let orders = spawn_orders();
    let order = paid_order(&orders).await;
    let (shutdown, handle) = start(&log, orders.clone(), settings());

    log.append(TOPIC, order.order_id.to_string(), completed(order.order_id, EventId::new()))
        .await
        .unwrap();
    wait_committed(&log, 1).await;

    let stored = orders.get_order(order.order_id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);
    assert_eq!(stored.transaction_id, Some(TransactionId::from("t1")));

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_failing_messages_do_not_stop_the_loop() {
    let log = EventLog::new();
    let orders = spawn_orders();
    let order = paid_order(&orders).await;
    let (shutdown, handle) = start(&log, orders.clone(), settings());

    log.append(TOPIC, "x", b"not json".to_vec()).await.unwrap();
    log.append(TOPIC, "y", completed(OrderId::new(), EventId::new()))
        .await
        .unwrap();
    log.append(TOPIC, order.order_id.to_string(), completed(order.order_id, EventId::new()))
        .await
        .unwrap();
    wait_committed(&log, 3).await;

    assert_eq!(
        orders.get_order(order.order_id).await.unwrap().status,
        OrderStatus::Completed
    );
    // No order is synthesized for the unknown id.
    assert_eq!(
        actor_framework::ActorClient::list(&orders).await.unwrap().len(),
        1
    );

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_redelivered_event_is_acknowledged_once() {
    let log = EventLog::new();
    let orders = spawn_orders();
    let order = paid_order(&orders).await;
    let (shutdown, handle) = start(&log, orders.clone(), settings());

    let event_id = EventId::new();
    log.append(TOPIC, "k", completed(order.order_id, event_id))
        .await
        .unwrap();
    wait_committed(&log, 1).await;
    let first = orders.get_order(order.order_id).await.unwrap();

    log.append(TOPIC, "k", completed(order.order_id, event_id))
        .await
        .unwrap();
    wait_committed(&log, 2).await;
    let second = orders.get_order(order.order_id).await.unwrap();

    assert_eq!(second.status, OrderStatus::Completed);
    assert_eq!(second.updated_at, first.updated_at);

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_handle_outcomes() {
    let log = EventLog::new();
    let orders = spawn_orders();
    let mut subscriber =
        AssemblySubscriber::new(log.consumer(TOPIC, GROUP), orders.clone(), settings());

    let order = paid_order(&orders).await;
    let outcome = subscriber
        .handle(&completed(order.order_id, EventId::new()))
        .await
        .unwrap();
    assert_eq!(outcome, AssemblyOutcome::Completed);

    // A new event id for an order that is already completed.
    let outcome = subscriber
        .handle(&completed(order.order_id, EventId::new()))
        .await
        .unwrap();
    assert_eq!(outcome, AssemblyOutcome::Duplicate);

    let cancelled = orders
        .create_order(OrderCreate {
            user_id: UserId::from("u1"),
            part_ids: vec![PartId::from("p1")],
            total_price: 1.0,
        })
        .await
        .unwrap();
    orders.cancel(cancelled.order_id).await.unwrap();
    let err = subscriber
        .handle(&completed(cancelled.order_id, EventId::new()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HandlerError::Order(OrderError::InvalidStatus { status: OrderStatus::Cancelled, .. })
    ));
    assert!(!err.is_retryable());

    let err = subscriber
        .handle(&completed(OrderId::new(), EventId::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, HandlerError::Order(OrderError::NotFound(_))));
}

#[tokio::test]
async fn test_store_failure_is_redelivered() {
    let log = EventLog::new();
    let order_id = OrderId::new();
    let mut store = MockClient::<Order>::new();
    store
        .expect_action(order_id)
        .return_err(FrameworkError::ActorClosed);
    store
        .expect_action(order_id)
        .return_err(FrameworkError::ActorDropped);
    store
        .expect_action(order_id)
        .return_ok(AssemblyOutcome::Completed);

    let (shutdown, handle) = start(&log, OrderClient::new(store.client()), settings());
    log.append(TOPIC, "k", completed(order_id, EventId::new()))
        .await
        .unwrap();
    wait_committed(&log, 1).await;

    shutdown.cancel();
    handle.await.unwrap();
    store.verify();
}

#[tokio::test]
async fn test_store_failure_is_skipped_after_redeliveries() {
    let log = EventLog::new();
    let order_id = OrderId::new();
    let mut store = MockClient::<Order>::new();
    store
        .expect_action(order_id)
        .return_err(FrameworkError::ActorClosed);
    store
        .expect_action(order_id)
        .return_err(FrameworkError::ActorClosed);

    let settings = SubscriberConfig {
        max_redeliveries: 1,
        ..settings()
    };
    let (shutdown, handle) = start(&log, OrderClient::new(store.client()), settings);
    log.append(TOPIC, "k", completed(order_id, EventId::new()))
        .await
        .unwrap();
    wait_committed(&log, 1).await;

    shutdown.cancel();
    handle.await.unwrap();
    store.verify();
}

#[tokio::test]
async fn test_subscriber_stops_on_cancellation() {
    let log = EventLog::new();
    let (shutdown, handle) = start(&log, spawn_orders(), settings());

    tokio::time::sleep(Duration::from_millis(20)).await;
    shutdown.cancel();

    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("subscriber did not stop")
        .unwrap();
}
