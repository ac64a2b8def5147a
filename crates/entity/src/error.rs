use lodestone_api::FinderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("discovery failed: {0}")]
    Discovery(#[from] FinderError),
    #[error("no factory registered for entity register type {0}")]
    MissingFactory(String),
    #[error("entity manager is not initialized")]
    NotInitialized,
    #[error("unknown store context: {0}")]
    UnknownStoreContext(String),
}

pub type EntityResult<T> = std::result::Result<T, EntityError>;
