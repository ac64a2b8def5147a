use crate::model::ModelBuilder;
use lodestone_api::{TypeKey, TypeKind, TypeRef};

/// Full name of the entity register interface, as types reference it.
pub const ENTITY_REGISTER_TYPE: &str = "lodestone.entity.EntityRegister";

/// Registers the mapping rules of one entity into the model of its store context.
pub trait EntityRegister: Send + Sync {
    /// Name of the store context owning the entity
    fn store_context(&self) -> &str;

    /// Name of the mapped entity type
    fn entity_type(&self) -> &str;

    fn register_to(&self, builder: &mut ModelBuilder);
}

/// Base key used to discover entity register types.
pub struct EntityRegisterMarker;

impl TypeKey for EntityRegisterMarker {
    fn type_ref() -> TypeRef {
        TypeRef::new(ENTITY_REGISTER_TYPE)
    }

    fn kind() -> TypeKind {
        TypeKind::Interface
    }
}
