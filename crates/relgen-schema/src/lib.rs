pub mod naming;
pub mod node;
pub mod read;
pub mod types;

use crate::{node::NodeError, read::ReadError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        node::{Column, Entity, EntityId, Relation, Schema},
        types::ValueType,
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    NodeError(#[from] NodeError),

    #[error(transparent)]
    ReadError(#[from] ReadError),
}
