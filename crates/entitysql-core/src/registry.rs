//! Process-wide entity registry.
//!
//! Types are registered once during setup and looked up by `TypeId` for the
//! rest of the process. Registration and lookup may run concurrently; the
//! descriptors themselves are immutable and shared through `Arc`.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::config::EntitySqlConfig;
use crate::descriptor::EntityDescriptor;
use crate::entity::Entity;
use crate::error::{Error, Result};

/// Registry of entity descriptors keyed by type.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    config: EntitySqlConfig,
    entries: RwLock<HashMap<TypeId, Arc<EntityDescriptor>>>,
}

impl EntityRegistry {
    /// Create an empty registry with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given settings.
    pub fn with_config(config: EntitySqlConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Settings used for registration and statement generation.
    pub fn config(&self) -> &EntitySqlConfig {
        &self.config
    }

    /// Register `E`, returning its descriptor.
    ///
    /// Registering a type twice returns the descriptor built the first time.
    #[tracing::instrument(level = "debug", skip(self), fields(entity = E::NAME))]
    pub fn register<E: Entity>(&self) -> Result<Arc<EntityDescriptor>> {
        let key = TypeId::of::<E>();
        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            if let Some(existing) = entries.get(&key) {
                return Ok(Arc::clone(existing));
            }
        }

        let descriptor = Arc::new(EntityDescriptor::of::<E>(&self.config)?);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let stored = entries.entry(key).or_insert_with(|| {
            tracing::debug!(
                table = descriptor.table_name(),
                alias = descriptor.alias(),
                columns = descriptor.columns().len(),
                "Registered entity"
            );
            Arc::clone(&descriptor)
        });
        Ok(Arc::clone(stored))
    }

    /// Look up the descriptor of a registered type.
    pub fn lookup<E: Entity>(&self) -> Result<Arc<EntityDescriptor>> {
        self.lookup_type(TypeId::of::<E>(), E::NAME)
    }

    /// Look up by raw `TypeId`; `name` is only used for the error message.
    pub fn lookup_type(&self, key: TypeId, name: &str) -> Result<Arc<EntityDescriptor>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::not_registered(name))
    }

    /// Whether `E` has been registered.
    pub fn contains<E: Entity>(&self) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(&TypeId::of::<E>())
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no type is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all registered descriptors, ordered by type name.
    pub fn descriptors(&self) -> Vec<Arc<EntityDescriptor>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut all: Vec<_> = entries.values().cloned().collect();
        all.sort_by_key(|d| d.type_name());
        all
    }
}
