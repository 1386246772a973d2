//! Name-keyed registry of signing methods.
//!
//! Registering a name that is already present replaces the previous factory.
//! Lookups build a fresh method instance from the registered factory.

use log::debug;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

use super::SigningMethod;

pub type SigningMethodFactory = Arc<dyn Fn() -> Arc<dyn SigningMethod> + Send + Sync>;

static GLOBAL_REGISTRY: Lazy<SigningMethodRegistry> = Lazy::new(SigningMethodRegistry::new);

#[derive(Default)]
pub struct SigningMethodRegistry {
    factories: RwLock<HashMap<String, SigningMethodFactory>>,
}

impl SigningMethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by `register_signing_method` and
    /// `get_signing_method`.
    pub fn global() -> &'static SigningMethodRegistry {
        &GLOBAL_REGISTRY
    }

    /// Registers `factory` under `name`. Returns `true` when an existing
    /// registration was replaced.
    pub fn register<F>(&self, name: &str, factory: F) -> bool
    where
        F: Fn() -> Arc<dyn SigningMethod> + Send + Sync + 'static,
    {
        let replaced = self
            .factories
            .write()
            .insert(name.to_string(), Arc::new(factory))
            .is_some();
        if replaced {
            debug!("Signing method {} re-registered, previous factory replaced", name);
        }
        replaced
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SigningMethod>> {
        // Clone the factory out so it runs without holding the lock
        let factory = self.factories.read().get(name).cloned()?;
        Some(factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    pub fn algorithms(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }
}

pub fn register_signing_method<F>(name: &str, factory: F) -> bool
where
    F: Fn() -> Arc<dyn SigningMethod> + Send + Sync + 'static,
{
    SigningMethodRegistry::global().register(name, factory)
}

pub fn get_signing_method(name: &str) -> Option<Arc<dyn SigningMethod>> {
    SigningMethodRegistry::global().get(name)
}
