//! Entity trait implementation for the Order domain type.
//!
//! Every status change goes through [`Order::advance`], one exhaustive match over the current
//! status and the requested [`Transition`]. The hooks run inside the order actor, so the guard
//! and the write form a single conditional update.

use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

use super::actions::{AssemblyOutcome, OrderAction};
use super::error::OrderError;
use super::Transition;
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderUpdate};

impl Order {
    /// Returns the status reached by applying `transition`, or the error for an illegal move.
    pub fn advance(&self, transition: Transition) -> Result<OrderStatus, OrderError> {
        use OrderStatus::*;

        match (self.status, transition) {
            (PendingPayment, Transition::Pay) => Ok(Paid),
            (PendingPayment, Transition::Cancel) => Ok(Cancelled),
            (Paid, Transition::Complete) => Ok(Completed),
            (Paid, Transition::Pay | Transition::Cancel) => Err(OrderError::AlreadyPaid(self.order_id)),
            (Cancelled, Transition::Pay | Transition::Cancel) => {
                Err(OrderError::Cancelled(self.order_id))
            }
            (PendingPayment | Cancelled, Transition::Complete) | (Completed, _) => {
                Err(OrderError::InvalidStatus {
                    order_id: self.order_id,
                    status: self.status,
                    transition,
                })
            }
        }
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = AssemblyOutcome;
    type Context = ();
    type Error = OrderError;

    /// Creates a pending order. An order always carries at least one part.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        if params.part_ids.is_empty() {
            return Err(OrderError::PartsNotFound {
                missing: Vec::new(),
            });
        }
        Ok(Self {
            order_id: id,
            user_id: params.user_id,
            part_ids: params.part_ids,
            total_price: params.total_price,
            status: OrderStatus::PendingPayment,
            transaction_id: None,
            payment_method: None,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    async fn on_update(
        &mut self,
        update: OrderUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        match update {
            OrderUpdate::MarkPaid {
                transaction_id,
                payment_method,
            } => {
                self.status = self.advance(Transition::Pay)?;
                self.transaction_id = Some(transaction_id);
                self.payment_method = Some(payment_method);
            }
            OrderUpdate::Cancel => {
                self.status = self.advance(Transition::Cancel)?;
            }
        }
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &Self::Context,
    ) -> Result<AssemblyOutcome, Self::Error> {
        match action {
            OrderAction::CompleteAssembly { .. } => {
                if self.status == OrderStatus::Completed {
                    return Ok(AssemblyOutcome::Duplicate);
                }
                self.status = self.advance(Transition::Complete)?;
                self.updated_at = Some(Utc::now());
                Ok(AssemblyOutcome::Completed)
            }
        }
    }
}
