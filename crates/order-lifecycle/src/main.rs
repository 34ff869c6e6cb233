//! # Order Lifecycle Demo
//!
//! Runs the whole lifecycle in one process:
//! 1.  Starts the [`OrderSystem`] and an [`AssemblySimulator`].
//! 2.  Seeds the catalog and places an order.
//! 3.  Pays it and waits for the assembly to complete it.
//! 4.  Shows the state machine rejecting a late cancel, then shuts down.
//!
//! Configuration comes from `order-lifecycle.yaml` and `ORDER__*` variables; see
//! [`OrderConfig`].

use std::time::Duration;

use order_lifecycle::config::OrderConfig;
use order_lifecycle::lifecycle::{setup_tracing, AssemblySimulator, OrderSystem};
use order_lifecycle::model::{
    OrderId, OrderStatus, PartCategory, PartCreate, PaymentMethod, UserId,
};
use order_lifecycle::orchestrator::OrderOrchestrator;
use order_lifecycle::order_actor::OrderError;
use tracing::{error, info, warn, Instrument};

/// Upper bound on the simulated build time, in seconds.
const MAX_BUILD_TIME_SEC: u64 = 10;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = OrderConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Falling back to default configuration");
        OrderConfig::default()
    });
    info!(?config, "Starting order lifecycle");

    let mut system = OrderSystem::new(&config);
    let simulator = AssemblySimulator::new(
        system.events.clone(),
        &config.topics,
        1..=MAX_BUILD_TIME_SEC,
    );
    system.spawn(simulator.run(system.shutdown_token()));

    let mut part_ids = Vec::new();
    for (name, category, price) in [
        ("Main engine", PartCategory::Engine, 100.0),
        ("Left wing", PartCategory::Wing, 200.0),
    ] {
        let part = system
            .catalog
            .add_part(PartCreate {
                name: name.to_string(),
                category,
                price,
                stock_quantity: 10,
            })
            .await?;
        part_ids.push(part.id);
    }

    let span = tracing::info_span!("order_processing");
    let result = async {
        let order = system
            .orchestrator
            .create(UserId::from("user-1"), part_ids)
            .await?;
        info!(order_id = %order.order_id, total_price = order.total_price, "Order placed");

        let transaction_id = system
            .orchestrator
            .pay(order.order_id, PaymentMethod::Card)
            .await?;
        info!(order_id = %order.order_id, %transaction_id, "Order paid, waiting for assembly");

        let deadline = Duration::from_secs(MAX_BUILD_TIME_SEC + 5);
        let status = wait_for_completion(&system.orchestrator, order.order_id, deadline).await?;
        info!(order_id = %order.order_id, %status, "Order finished");

        if let Err(e) = system.orchestrator.cancel(order.order_id).await {
            info!(error = %e, "Late cancel rejected");
        }
        Ok::<_, OrderError>(())
    }
    .instrument(span)
    .await;

    if let Err(e) = result {
        error!(error = %e, "Order processing failed");
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

/// Polls the order until it leaves `paid` or `deadline` passes.
async fn wait_for_completion(
    orchestrator: &OrderOrchestrator,
    order_id: OrderId,
    deadline: Duration,
) -> Result<OrderStatus, OrderError> {
    let started = tokio::time::Instant::now();
    loop {
        let order = orchestrator.get(order_id).await?;
        if order.status != OrderStatus::Paid || started.elapsed() >= deadline {
            return Ok(order.status);
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
}
