//! # Observability & Tracing
//!
//! Every actor logs its lifecycle (`Actor started`, `Shutdown`) and each request with an
//! `entity_type` field and the entity id, so module paths are hidden (`with_target(false)`).
//!
//! With `RUST_LOG=info` a paid and assembled order reads:
//!
//! ```text
//! INFO Created entity_type="Order" id=6f1c… size=1
//! INFO Payment approved transaction_id=3b2e… order_id=6f1c… payment_method=CARD
//! INFO Updated entity_type="Order" id=6f1c…
//! INFO Published order paid topic=order.paid offset=0 event_id=9d40… order_id=6f1c…
//! INFO Action ok entity_type="Order" id=6f1c…
//! INFO Assembly handled event_id=9d40… order_id=6f1c… build_time_sec=4 outcome=Completed
//! ```
//!
//! `RUST_LOG=debug` adds the request payloads (`?params`, `?update`, `?action`) and every
//! append and commit on the event log.

/// Installs the global subscriber. Call once, at the start of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
