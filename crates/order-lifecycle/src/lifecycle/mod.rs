//! # System Lifecycle
//!
//! Starting, wiring and stopping the order lifecycle.
//!
//! ## Wiring
//!
//! [`OrderSystem::new`] creates every actor first and starts them afterwards, so no actor needs
//! another one at construction time:
//!
//! 1. Order actor and catalog actor, each with its own task.
//! 2. The event log, the "order paid" publisher and the fake payment service.
//! 3. The [`OrderOrchestrator`](crate::orchestrator::OrderOrchestrator) over those ports.
//! 4. The assembly subscriber on its own task, holding a clone of the order client.
//!
//! ## Graceful Shutdown
//!
//! 1. **Cancel** the shutdown token; the subscriber finishes the record in hand and exits.
//! 2. **Close** the event log so no consumer waits forever.
//! 3. **Drop all clients**; each actor sees its channel close and stops.
//! 4. **Await** every task.
//!
//! ## Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` filtered by `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run -p order-lifecycle     # Compact logs
//! RUST_LOG=debug cargo run -p order-lifecycle    # Full payloads
//! ```
//!
//! ## Assembly
//!
//! [`AssemblySimulator`] plays the assembly service for the demo and the system tests.

pub mod assembly;
pub mod order_system;
pub mod tracing;

pub use assembly::*;
pub use order_system::*;
pub use self::tracing::*;
