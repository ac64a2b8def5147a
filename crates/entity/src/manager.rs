//! Entity manager.
//!
//! Turns discovered entity register types into register instances and
//! answers store-context queries over them.

use crate::error::{EntityError, EntityResult};
use crate::model::ModelBuilder;
use crate::register::EntityRegister;
use indexmap::IndexMap;
use lodestone_api::TypeFinder;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Constructor of one entity register type.
pub type RegisterFactory = Arc<dyn Fn() -> Arc<dyn EntityRegister> + Send + Sync>;

/// Factories keyed by register type name.
#[derive(Clone, Default)]
pub struct RegisterFactories {
    factories: HashMap<String, RegisterFactory>,
}

impl RegisterFactories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F, R>(mut self, type_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: EntityRegister + 'static,
    {
        self.insert(type_name, factory);
        self
    }

    pub fn insert<F, R>(&mut self, type_name: impl Into<String>, factory: F)
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: EntityRegister + 'static,
    {
        let factory: RegisterFactory =
            Arc::new(move || Arc::new(factory()) as Arc<dyn EntityRegister>);
        self.factories.insert(type_name.into(), factory);
    }

    pub fn get(&self, type_name: &str) -> Option<&RegisterFactory> {
        self.factories.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[derive(Default)]
struct ManagerState {
    initialized: bool,
    by_context: IndexMap<String, Vec<Arc<dyn EntityRegister>>>,
}

pub struct EntityManager {
    finder: Arc<TypeFinder>,
    factories: RegisterFactories,
    state: RwLock<ManagerState>,
}

impl EntityManager {
    /// `finder` should yield the concrete types implementing the register
    /// interface, typically a `DerivedTypeFinder<EntityRegisterMarker>`.
    pub fn new(finder: Arc<TypeFinder>, factories: RegisterFactories) -> Self {
        Self {
            finder,
            factories,
            state: RwLock::new(ManagerState::default()),
        }
    }

    /// Discovers register types (from the finder's cache) and instantiates
    /// them. Calling it again rebuilds the groups. On failure the previous
    /// state is kept.
    pub fn initialize(&self) -> EntityResult<()> {
        let types = self.finder.find_all(true)?;

        let mut by_context: IndexMap<String, Vec<Arc<dyn EntityRegister>>> = IndexMap::new();
        for ty in &types {
            let factory = self
                .factories
                .get(&ty.name)
                .ok_or_else(|| EntityError::MissingFactory(ty.name.clone()))?;
            let register = factory();
            debug!(
                "Entity register {} maps {} into {}",
                ty.name,
                register.entity_type(),
                register.store_context()
            );
            by_context
                .entry(register.store_context().to_string())
                .or_default()
                .push(register);
        }

        info!(
            "Initialized {} entity registers across {} store contexts",
            types.len(),
            by_context.len()
        );

        let mut state = self.state.write();
        state.by_context = by_context;
        state.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read().initialized
    }

    /// Registers owned by `store_context`; empty when the context is unknown.
    pub fn entity_registers(
        &self,
        store_context: &str,
    ) -> EntityResult<Vec<Arc<dyn EntityRegister>>> {
        let state = self.initialized_state()?;
        Ok(state
            .by_context
            .get(store_context)
            .cloned()
            .unwrap_or_default())
    }

    /// Store context owning `entity_type`.
    pub fn store_context_by_entity(&self, entity_type: &str) -> EntityResult<Option<String>> {
        let state = self.initialized_state()?;
        Ok(state
            .by_context
            .iter()
            .find(|(_, registers)| registers.iter().any(|r| r.entity_type() == entity_type))
            .map(|(context, _)| context.clone()))
    }

    /// Store context by full name, or by simple name when no full name matches.
    pub fn store_context_by_name(&self, name: &str) -> EntityResult<Option<String>> {
        let state = self.initialized_state()?;
        if state.by_context.contains_key(name) {
            return Ok(Some(name.to_string()));
        }
        Ok(state
            .by_context
            .keys()
            .find(|context| context.rsplit('.').next() == Some(name))
            .cloned())
    }

    pub fn store_contexts(&self) -> EntityResult<Vec<String>> {
        let state = self.initialized_state()?;
        Ok(state.by_context.keys().cloned().collect())
    }

    /// Applies every register of `store_context` to a fresh model.
    pub fn build_model(&self, store_context: &str) -> EntityResult<ModelBuilder> {
        let state = self.initialized_state()?;
        let registers = state
            .by_context
            .get(store_context)
            .ok_or_else(|| EntityError::UnknownStoreContext(store_context.to_string()))?;

        let mut builder = ModelBuilder::new(store_context);
        for register in registers {
            register.register_to(&mut builder);
        }
        Ok(builder)
    }

    fn initialized_state(&self) -> EntityResult<parking_lot::RwLockReadGuard<'_, ManagerState>> {
        let state = self.state.read();
        if !state.initialized {
            return Err(EntityError::NotInitialized);
        }
        Ok(state)
    }
}
