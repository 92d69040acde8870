//! # Schema Registry
//!
//! Holds the dataset and kernel definitions and compiles each one into a
//! validator the first time it is asked for. The compiled validator is then
//! reused for every later document until [`SchemaRegistry::reload`] is
//! called on a configuration change.
//!
//! ## Invariants
//!
//! - At most one live compiled validator per schema key. Each slot is a
//!   [`OnceLock`], so even concurrent first use compiles once and publishes
//!   a single instance.
//! - A definition that fails to compile is reported once through `tracing`
//!   and the key is treated as unavailable (no validator) until reload.
//!
//! The registry is an owned value, not a process-wide singleton: the
//! diagnostics engine holds one, and tests build fresh ones.

use std::fmt;
use std::sync::OnceLock;

use jsonschema::Validator;
use kmeta_core::SchemaKey;
use serde_json::Value;

use crate::schemas;
use crate::validate::compile;

/// One schema definition and its lazily compiled validator.
struct Slot {
    key: SchemaKey,
    definition: Value,
    compiled: OnceLock<Option<Validator>>,
}

impl Slot {
    fn new(key: SchemaKey, definition: Value) -> Self {
        Self {
            key,
            definition,
            compiled: OnceLock::new(),
        }
    }

    fn get(&self) -> Option<&Validator> {
        self.compiled
            .get_or_init(|| match compile(self.key, &self.definition) {
                Ok(validator) => {
                    tracing::debug!(schema = %self.key, "compiled metadata schema");
                    Some(validator)
                }
                Err(e) => {
                    tracing::error!(schema = %self.key, "{e}; documents of this kind will not be validated");
                    None
                }
            })
            .as_ref()
    }
}

/// Cache of compiled validators keyed by [`SchemaKey`].
pub struct SchemaRegistry {
    dataset: Slot,
    kernel: Slot,
}

impl SchemaRegistry {
    /// A registry over the embedded definitions.
    pub fn new() -> Self {
        Self::with_definitions(schemas::dataset_schema(), schemas::kernel_schema())
    }

    /// A registry over caller-supplied definitions.
    pub fn with_definitions(dataset: Value, kernel: Value) -> Self {
        Self {
            dataset: Slot::new(SchemaKey::Dataset, dataset),
            kernel: Slot::new(SchemaKey::Kernel, kernel),
        }
    }

    fn slot(&self, key: SchemaKey) -> &Slot {
        match key {
            SchemaKey::Dataset => &self.dataset,
            SchemaKey::Kernel => &self.kernel,
        }
    }

    /// The compiled validator for `key`, compiling it on first use.
    ///
    /// Returns `None` when the definition failed to compile.
    pub fn get(&self, key: SchemaKey) -> Option<&Validator> {
        self.slot(key).get()
    }

    /// Whether `key` has been compiled (successfully or not) since the last
    /// reload.
    pub fn is_compiled(&self, key: SchemaKey) -> bool {
        self.slot(key).compiled.get().is_some()
    }

    /// Drop every compiled validator so the next lookup recompiles.
    pub fn reload(&mut self) {
        self.dataset.compiled.take();
        self.kernel.compiled.take();
        tracing::debug!("schema registry reloaded");
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("dataset_compiled", &self.is_compiled(SchemaKey::Dataset))
            .field("kernel_compiled", &self.is_compiled(SchemaKey::Kernel))
            .finish()
    }
}
