//! Entity registration on top of type discovery.
//!
//! Entity registers are discovered as concrete types implementing
//! [`EntityRegisterMarker`], instantiated through factories registered at build
//! time, and grouped by the store context that owns their entity.

pub mod error;
pub mod manager;
pub mod model;
pub mod register;

pub use error::{EntityError, EntityResult};
pub use manager::{EntityManager, RegisterFactories, RegisterFactory};
pub use model::{EntityMapping, EntityMappingBuilder, ModelBuilder};
pub use register::{ENTITY_REGISTER_TYPE, EntityRegister, EntityRegisterMarker};
