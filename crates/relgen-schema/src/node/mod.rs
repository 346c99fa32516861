mod column;
mod entity;
mod relation;
mod schema;

pub use column::Column;
pub use entity::Entity;
pub use relation::Relation;
pub use schema::{EntityId, Schema};

use thiserror::Error as ThisError;

///
/// NodeError
///

#[derive(Debug, ThisError)]
pub enum NodeError {
    #[error("duplicate entity '{0}'")]
    DuplicateEntity(String),
}
