//! Extension methods attached to payload types
//!
//! An extension table maps method names to native functions for one payload
//! type (for example `len` or `push` on arrays). Tables are kept in a
//! process-wide registry keyed by the payload's [`TypeId`] and are looked up
//! through [`Value::extensions`](crate::Value::extensions).

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use indexmap::IndexMap;
use log::debug;

use crate::error::Result;
use crate::value::Value;

/// A native extension function.
///
/// The receiver is passed as the first argument.
pub type ExtensionFn = Arc<dyn Fn(&mut [Value]) -> Result<Value> + Send + Sync>;

/// Named extension methods for one payload type, in registration order.
#[derive(Clone, Default)]
pub struct ExtensionTable {
    methods: IndexMap<String, ExtensionFn>,
}

impl ExtensionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method (builder pattern)
    pub fn with<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut [Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(func));
        self
    }

    /// Add or replace a method, returning the previous one
    pub fn insert(&mut self, name: impl Into<String>, func: ExtensionFn) -> Option<ExtensionFn> {
        self.methods.insert(name.into(), func)
    }

    /// Look up a method by name
    pub fn get(&self, name: &str) -> Option<&ExtensionFn> {
        self.methods.get(name)
    }

    /// Whether a method with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Number of methods
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the table has no methods
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for ExtensionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Registry of extension tables keyed by payload type.
///
/// Tables are immutable once published; registering a method copies the
/// table, so a table handed out earlier keeps its old contents.
pub struct ExtensionRegistry {
    tables: DashMap<TypeId, Arc<ExtensionTable>>,
    empty: Arc<ExtensionTable>,
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtensionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tables: DashMap::new(),
            empty: Arc::new(ExtensionTable::new()),
        }
    }

    /// The process-wide registry consulted by [`Payload::extensions`](crate::Payload::extensions).
    pub fn global() -> &'static ExtensionRegistry {
        static GLOBAL: OnceLock<ExtensionRegistry> = OnceLock::new();
        GLOBAL.get_or_init(ExtensionRegistry::new)
    }

    /// Register (or replace) one method for payload type `T`.
    pub fn register<T, F>(&self, name: impl Into<String>, func: F)
    where
        T: 'static,
        F: Fn(&mut [Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!("registering extension `{}` for {}", name, type_name::<T>());
        let mut entry = self.tables.entry(TypeId::of::<T>()).or_default();
        Arc::make_mut(entry.value_mut()).insert(name, Arc::new(func));
    }

    /// Replace the whole table for payload type `T`.
    pub fn install<T: 'static>(&self, table: ExtensionTable) {
        debug!(
            "installing {} extensions for {}",
            table.len(),
            type_name::<T>()
        );
        self.tables.insert(TypeId::of::<T>(), Arc::new(table));
    }

    /// The table for payload type `T` (empty if none was registered).
    pub fn table<T: 'static>(&self) -> Arc<ExtensionTable> {
        self.table_of(TypeId::of::<T>())
    }

    /// The table for a type identity (empty if none was registered).
    pub fn table_of(&self, id: TypeId) -> Arc<ExtensionTable> {
        self.tables
            .get(&id)
            .map(|table| Arc::clone(table.value()))
            .unwrap_or_else(|| Arc::clone(&self.empty))
    }
}
