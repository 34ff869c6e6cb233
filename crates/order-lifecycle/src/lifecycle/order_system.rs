use std::future::Future;
use std::sync::Arc;

use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::clients::{FakePaymentClient, InMemoryCatalog, OrderClient, PaymentClient};
use crate::config::OrderConfig;
use crate::events::{AssemblySubscriber, EventLog, LogPublisher};
use crate::orchestrator::{OrderOrchestrator, Timeouts};
use crate::{catalog_actor, order_actor};

/// The running order lifecycle: actors, subscriber and the orchestrator on top of them.
///
/// # Example
///
/// ```rust
/// use order_lifecycle::config::OrderConfig;
/// use order_lifecycle::lifecycle::OrderSystem;
/// use order_lifecycle::model::{PartCategory, PartCreate, UserId};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let system = OrderSystem::new(&OrderConfig::default());
///
///     let engine = system
///         .catalog
///         .add_part(PartCreate {
///             name: "Engine".to_string(),
///             category: PartCategory::Engine,
///             price: 100.0,
///             stock_quantity: 1,
///         })
///         .await?;
///     let order = system
///         .orchestrator
///         .create(UserId::from("user-1"), vec![engine.id])
///         .await?;
///     assert_eq!(order.total_price, 100.0);
///
///     system.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct OrderSystem {
    pub orchestrator: OrderOrchestrator,

    /// Direct access to the order store, for administrative operations.
    pub orders: OrderClient,

    /// The in-process catalog the orchestrator prices orders against.
    pub catalog: InMemoryCatalog,

    pub events: EventLog,

    shutdown: CancellationToken,

    /// Task handles for all running actors, the subscriber and spawned tasks.
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    /// Starts the system with the fake payment service.
    pub fn new(config: &OrderConfig) -> Self {
        Self::with_payments(config, Arc::new(FakePaymentClient))
    }

    /// Starts the system with the given payment service.
    pub fn with_payments(config: &OrderConfig, payments: Arc<dyn PaymentClient>) -> Self {
        // 1. Create actors (no dependencies)
        let (order_actor, orders) = order_actor::new(config.store_buffer);
        let (catalog_actor, catalog_client) = catalog_actor::new(config.store_buffer);

        // 2. Start actors
        let order_handle = tokio::spawn(order_actor.run(()));
        let catalog_handle = tokio::spawn(catalog_actor.run(()));

        // 3. Wire the orchestrator
        let events = EventLog::new();
        let catalog = InMemoryCatalog::new(catalog_client);
        let orchestrator = OrderOrchestrator::new(
            orders.clone(),
            Arc::new(catalog.clone()),
            payments,
            Arc::new(LogPublisher::new(events.clone(), &config.topics.order_paid)),
            Timeouts::from(config),
        );

        // 4. Start the subscriber
        let shutdown = CancellationToken::new();
        let subscriber = AssemblySubscriber::new(
            events.consumer(&config.topics.order_assembled, &config.subscriber.group),
            orders.clone(),
            config.subscriber.clone(),
        );
        let subscriber_handle = tokio::spawn(subscriber.run(shutdown.clone()));

        info!("Order system started");
        Self {
            orchestrator,
            orders,
            catalog,
            events,
            shutdown,
            handles: vec![order_handle, catalog_handle, subscriber_handle],
        }
    }

    /// A token cancelled when the system shuts down, for tasks running alongside it.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Runs `task` alongside the system; [`OrderSystem::shutdown`] waits for it.
    ///
    /// The task should stop once [`OrderSystem::shutdown_token`] is cancelled.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handles.push(tokio::spawn(task));
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Every task is awaited even if an earlier one failed. Returns the first task failure.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down system...");

        // Step 1: stop the subscriber and everything started from `shutdown_token`
        self.shutdown.cancel();
        self.events.close().await;

        // Step 2: close the actor channels by dropping every client
        drop(self.orchestrator);
        drop(self.orders);
        drop(self.catalog);

        // Step 3: wait for all tasks to complete
        let mut first_failure = None;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Task failed");
                first_failure.get_or_insert(e);
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => {
                info!("System shutdown complete.");
                Ok(())
            }
        }
    }
}
