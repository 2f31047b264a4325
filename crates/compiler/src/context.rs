//! Translation context
//!
//! One [`MappingContext`] holds everything a translation run mutates: the
//! variable registry, the routine registry and the extra-code accumulator,
//! plus the identifier resolver they share. Independent runs use
//! independent contexts.

use crate::builtins;
use crate::catalog::Catalog;
use crate::codegen::{self, Definition};
use crate::config::TranslatorConfig;
use crate::error::MapError;
use crate::extra_code::ExtraCode;
use crate::mapping::Mapping;
use crate::names::{IdentResolver, PyIdentifiers};
use crate::routines::{RoutineMapping, RoutineRegistry, RoutineSignature};
use crate::variables::{VariableMapping, VariableRegistry};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct MappingContext {
    variables: VariableRegistry,
    routines: RoutineRegistry,
    extra_code: ExtraCode,
    names: Arc<dyn IdentResolver>,
}

impl Default for MappingContext {
    fn default() -> Self {
        MappingContext::with_resolver(Arc::new(PyIdentifiers))
    }
}

impl MappingContext {
    /// An empty context using the default identifier resolution
    pub fn new() -> Self {
        MappingContext::default()
    }

    /// An empty context using `names` for identifier resolution
    pub fn with_resolver(names: Arc<dyn IdentResolver>) -> Self {
        MappingContext {
            variables: VariableRegistry::new(),
            routines: RoutineRegistry::new(),
            extra_code: ExtraCode::new(),
            names,
        }
    }

    /// A context populated as `config` describes: builtins first, then
    /// each catalog file in order.
    pub fn from_config(config: &TranslatorConfig) -> Result<Self, MapError> {
        let names = config
            .resolver
            .clone()
            .unwrap_or_else(|| Arc::new(PyIdentifiers));
        let mut ctx = MappingContext::with_resolver(names);
        if config.include_builtins {
            builtins::register_builtins(&mut ctx)?;
        }
        for path in &config.catalog_paths {
            let catalog = Catalog::load(path)?;
            catalog.apply(&mut ctx)?;
            debug!(path = %path.display(), "loaded catalog");
        }
        Ok(ctx)
    }

    pub fn resolver(&self) -> &dyn IdentResolver {
        self.names.as_ref()
    }

    // Registration

    pub fn register_variable(
        &mut self,
        mapping: VariableMapping,
    ) -> Result<Arc<VariableMapping>, MapError> {
        self.variables.register(mapping)
    }

    /// Validate and register a routine signature
    pub fn register_routine(
        &mut self,
        signature: RoutineSignature,
    ) -> Result<Arc<RoutineMapping>, MapError> {
        self.routines.register(signature.build()?)
    }

    /// Register a batch of mappings; if any one fails, none are kept.
    pub fn register_all(
        &mut self,
        variables: Vec<VariableMapping>,
        routines: Vec<RoutineMapping>,
    ) -> Result<(), MapError> {
        let mut staged_variables = self.variables.clone();
        let mut staged_routines = self.routines.clone();
        for mapping in variables {
            staged_variables.register(mapping)?;
        }
        for mapping in routines {
            staged_routines.register(mapping)?;
        }
        self.variables = staged_variables;
        self.routines = staged_routines;
        Ok(())
    }

    // Lookup

    pub fn lookup_variable(&self, name: &str) -> Option<Arc<VariableMapping>> {
        self.variables.lookup(name)
    }

    pub fn lookup_routine(&self, name: &str) -> Option<Arc<RoutineMapping>> {
        self.routines.lookup(name)
    }

    pub fn variables(&self) -> &VariableRegistry {
        &self.variables
    }

    pub fn routines(&self) -> &RoutineRegistry {
        &self.routines
    }

    /// The Python name for a variable; queues its extra code.
    pub fn resolve_variable(&mut self, mapping: &VariableMapping) -> String {
        self.extra_code.record(mapping.extra_code());
        mapping.resolve_name(self.names.as_ref())
    }

    // Synthesis

    pub fn synthesize_definition<P, K, L>(
        &mut self,
        mapping: &RoutineMapping,
        params: &[P],
        keywords: &[(K, L)],
    ) -> Result<Definition, MapError>
    where
        P: AsRef<str>,
        K: AsRef<str>,
        L: AsRef<str>,
    {
        codegen::synthesize_definition(
            mapping,
            self.names.as_ref(),
            &mut self.extra_code,
            params,
            keywords,
        )
    }

    pub fn synthesize_call<P, K, V>(
        &mut self,
        mapping: &RoutineMapping,
        params: &[P],
        keywords: &[(K, V)],
    ) -> Result<String, MapError>
    where
        P: AsRef<str>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        codegen::synthesize_call(
            mapping,
            self.names.as_ref(),
            &mut self.extra_code,
            params,
            keywords,
        )
    }

    // Extra code

    pub fn extra_code(&self) -> &ExtraCode {
        &self.extra_code
    }

    /// Take all queued helper code, separated by blank lines.
    ///
    /// Call once, after every definition and call of the run is synthesized.
    pub fn drain_extra_code(&mut self) -> String {
        self.extra_code.drain()
    }

    /// Forget all mappings and queued extra code.
    pub fn reset(&mut self) {
        self.variables.clear();
        self.routines.clear();
        self.extra_code.reset();
    }
}
