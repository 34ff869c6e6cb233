//! Custom actions for the Order actor.
//!
//! Assembly completion is an action rather than an update because the caller needs to know
//! whether the event moved the order or was a repeat.

use crate::model::EventId;

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Moves a paid order to completed.
    ///
    /// # Errors
    /// Fails with `InvalidStatus` unless the order is paid or already completed.
    CompleteAssembly { event_id: EventId },
}

/// Result of [`OrderAction::CompleteAssembly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyOutcome {
    Completed,
    /// The order was already completed; nothing changed.
    Duplicate,
}
