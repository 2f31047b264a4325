//! Mapping base and name-keyed registries
//!
//! Variables and routines live in separate namespaces but follow the same
//! rules: keys are case-folded, and a read-only entry can never be
//! replaced. [`Registry`] implements those rules once for both kinds.

use crate::error::{MapError, MappingKind};
use crate::names::{IdentResolver, fold_case};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Shared contract of variable and routine mappings.
pub trait Mapping {
    /// Registry namespace this mapping belongs to
    const KIND: MappingKind;

    /// The IDL name as registered
    fn source_name(&self) -> &str;

    /// Explicit Python name, bypassing identifier resolution
    fn override_name(&self) -> Option<&str>;

    /// Helper code the generated module needs when this mapping is used
    fn extra_code(&self) -> &[String];

    fn readonly(&self) -> bool;

    /// The Python name: the override if set, else the resolved source name.
    fn resolve_name(&self, names: &dyn IdentResolver) -> String {
        match self.override_name() {
            Some(name) => name.to_string(),
            None => names.resolve(self.source_name()),
        }
    }
}

/// Case-insensitive registry of one kind of mapping.
///
/// Entries are shared as `Arc` so a looked-up mapping can be held while the
/// owning context is mutated (extra code is queued during synthesis).
#[derive(Debug, Clone)]
pub struct Registry<M> {
    entries: BTreeMap<String, Arc<M>>,
}

impl<M> Default for Registry<M> {
    fn default() -> Self {
        Registry {
            entries: BTreeMap::new(),
        }
    }
}

impl<M: Mapping> Registry<M> {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Insert a mapping, replacing any prior entry that is not read-only.
    pub fn register(&mut self, mapping: M) -> Result<Arc<M>, MapError> {
        let key = fold_case(mapping.source_name());
        if let Some(old) = self.entries.get(&key) {
            if old.readonly() {
                return Err(MapError::DuplicateReadOnlyMapping {
                    kind: M::KIND,
                    name: mapping.source_name().to_string(),
                });
            }
            debug!(kind = %M::KIND, name = %key, "replacing existing mapping");
        } else {
            debug!(kind = %M::KIND, name = %key, "registered mapping");
        }

        let mapping = Arc::new(mapping);
        self.entries.insert(key, Arc::clone(&mapping));
        Ok(mapping)
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<M>> {
        self.entries.get(&fold_case(name)).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&fold_case(name))
    }

    /// All mappings, ordered by folded name.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<M>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
