//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself, plus the envelope that carries an entity's own
//! error type back across the channel.

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the concrete entity error carried by [`FrameworkError::EntityError`].
    ///
    /// Returns `Err(self)` unchanged when the error is plumbing-level or holds a different type.
    ///
    /// ```rust
    /// use actor_framework::FrameworkError;
    ///
    /// #[derive(Debug, thiserror::Error, PartialEq)]
    /// #[error("out of stock")]
    /// struct OutOfStock;
    ///
    /// let err = FrameworkError::EntityError(Box::new(OutOfStock));
    /// assert_eq!(err.into_entity_error::<OutOfStock>().unwrap(), OutOfStock);
    ///
    /// let closed = FrameworkError::ActorClosed;
    /// assert!(closed.into_entity_error::<OutOfStock>().is_err());
    /// ```
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(entity) => Ok(*entity),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }
}
