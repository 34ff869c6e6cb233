//! # Generic Messages
//!
//! The request envelope exchanged between `ResourceClient` and `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants are the store contract every resource shares: CRUD keyed by id, a multi-key
/// read, a full listing, and a custom `Action` for operations that do not fit CRUD.
///
/// - **Create**: runs `from_create_params` + `on_create`, responds with the stored entity.
/// - **Get**: clone of the entity, or `None`.
/// - **GetMany**: the entities found for the given ids, in request order; missing ids are skipped.
/// - **List**: every stored entity.
/// - **Update**: runs `on_update`, responds with the entity after the update.
/// - **Delete**: runs `on_delete`, then removes the entity.
/// - **Action**: runs `handle_action`, responds with its result.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    GetMany {
        ids: Vec<T::Id>,
        respond_to: Response<Vec<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
