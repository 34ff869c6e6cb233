//! Entity trait implementation for the Part domain type.

use actor_framework::ActorEntity;
use async_trait::async_trait;
use std::convert::Infallible;
use thiserror::Error;

use crate::model::{Part, PartCreate, PartId, PartUpdate};

/// Errors raised by the catalog's own hooks.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PartError {
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),
}

fn check_price(price: f64) -> Result<f64, PartError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(PartError::InvalidPrice(price))
    }
}

#[async_trait]
impl ActorEntity for Part {
    type Id = PartId;
    type Create = PartCreate;
    type Update = PartUpdate;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = PartError;

    fn from_create_params(id: PartId, params: PartCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            name: params.name,
            category: params.category,
            price: check_price(params.price)?,
            stock_quantity: params.stock_quantity,
        })
    }

    /// # Fields Updated
    /// - `price`: unit price, must be finite and non-negative
    /// - `stock_quantity`: available stock
    async fn on_update(
        &mut self,
        update: PartUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        if let Some(price) = update.price {
            self.price = check_price(price)?;
        }
        if let Some(quantity) = update.stock_quantity {
            self.stock_quantity = quantity;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: Infallible,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        match action {}
    }
}
