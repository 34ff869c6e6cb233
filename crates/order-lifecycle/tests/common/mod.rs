//! Port doubles and helpers shared by the integration tests.
#![allow(dead_code)]

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use order_lifecycle::clients::{CatalogClient, CatalogError, OrderClient, PaymentClient, PaymentError};
use order_lifecycle::events::{EventPublisher, LogError, PublishError};
use order_lifecycle::model::{
    OrderId, OrderPaid, Part, PartCategory, PartId, PartsFilter, PaymentMethod, TransactionId,
    UserId,
};
use order_lifecycle::orchestrator::{OrderOrchestrator, Timeouts};
use order_lifecycle::order_actor;

pub const SHORT_TIMEOUT: Duration = Duration::from_millis(100);

pub fn part(id: &str, price: f64) -> Part {
    Part {
        id: PartId::from(id),
        name: format!("part {id}"),
        category: PartCategory::Unknown,
        price,
        stock_quantity: 1,
    }
}

// --- Catalog ---

pub struct StubCatalog {
    parts: Vec<Part>,
    delay: Duration,
    unavailable: bool,
    pub calls: AtomicUsize,
}

impl StubCatalog {
    pub fn with_parts(parts: Vec<Part>) -> Self {
        Self {
            parts,
            delay: Duration::ZERO,
            unavailable: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::with_parts(Vec::new())
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn list_parts(&self, filter: PartsFilter) -> Result<Vec<Part>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.unavailable {
            return Err(CatalogError::Unavailable("catalog is down".to_string()));
        }
        Ok(self
            .parts
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }
}

// --- Payment ---

pub struct StubPayments {
    transaction_id: Option<TransactionId>,
    delay: Duration,
    pub calls: AtomicUsize,
}

impl StubPayments {
    pub fn approving(transaction_id: &str) -> Self {
        Self {
            transaction_id: Some(TransactionId::from(transaction_id)),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn declining() -> Self {
        Self {
            transaction_id: None,
            ..Self::approving("")
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentClient for StubPayments {
    async fn pay_order(
        &self,
        _order_id: OrderId,
        _user_id: &UserId,
        _payment_method: PaymentMethod,
    ) -> Result<TransactionId, PaymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.transaction_id
            .clone()
            .ok_or_else(|| PaymentError::Declined("insufficient funds".to_string()))
    }
}

// --- Publisher ---

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<OrderPaid>>,
    failing: AtomicBool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        let publisher = Self::default();
        publisher.set_failing(true);
        publisher
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<OrderPaid> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish_order_paid(&self, event: &OrderPaid) -> Result<(), PublishError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PublishError::Log(LogError::Closed));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// --- Wiring ---

/// An orchestrator over a real order actor and the given doubles.
pub fn spawn_orchestrator(
    catalog: Arc<StubCatalog>,
    payments: Arc<StubPayments>,
    publisher: Arc<RecordingPublisher>,
) -> (OrderOrchestrator, OrderClient) {
    let (actor, orders) = order_actor::new(32);
    tokio::spawn(actor.run(()));
    let orchestrator = OrderOrchestrator::new(
        orders.clone(),
        catalog,
        payments,
        publisher,
        Timeouts {
            catalog: SHORT_TIMEOUT,
            payment: SHORT_TIMEOUT,
        },
    );
    (orchestrator, orders)
}

/// Polls `check` until it returns true, panicking after two seconds.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !check().await {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
