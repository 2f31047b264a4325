//! Variable mappings
//!
//! Binds IDL variable names (typically system variables such as `!PI`) to
//! Python expressions.

use crate::error::MappingKind;
use crate::mapping::{Mapping, Registry};

/// A registered IDL variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMapping {
    name: String,
    target: Option<String>,
    extra_code: Vec<String>,
    readonly: bool,
}

impl VariableMapping {
    pub fn new(name: impl Into<String>) -> Self {
        VariableMapping {
            name: name.into(),
            target: None,
            extra_code: Vec::new(),
            readonly: false,
        }
    }

    /// Use `target` verbatim instead of resolving the IDL name
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_extra_code(mut self, code: impl Into<String>) -> Self {
        self.extra_code.push(code.into());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.readonly = true;
        self
    }
}

impl Mapping for VariableMapping {
    const KIND: MappingKind = MappingKind::Variable;

    fn source_name(&self) -> &str {
        &self.name
    }

    fn override_name(&self) -> Option<&str> {
        self.target.as_deref()
    }

    fn extra_code(&self) -> &[String] {
        &self.extra_code
    }

    fn readonly(&self) -> bool {
        self.readonly
    }
}

pub type VariableRegistry = Registry<VariableMapping>;
