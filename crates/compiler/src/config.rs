//! Translator configuration
//!
//! Decides which mappings a [`MappingContext`](crate::MappingContext)
//! starts with, so external projects can add their own routine and variable
//! bindings without modifying the builtin catalog.
//!
//! # Example
//!
//! ```rust,ignore
//! use idlpy::{MappingContext, TranslatorConfig};
//!
//! let config = TranslatorConfig::new()
//!     .with_catalog("mylib.toml")
//!     .with_catalog("overrides.toml");
//!
//! let mut ctx = MappingContext::from_config(&config)?;
//! ```

use crate::names::IdentResolver;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a translation run
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Register the builtin routine catalog before any catalog file
    pub include_builtins: bool,

    /// Catalog files to load, in order
    ///
    /// A later catalog replaces writable mappings of an earlier one.
    pub catalog_paths: Vec<PathBuf>,

    /// Identifier resolution; `None` uses [`PyIdentifiers`](crate::PyIdentifiers)
    pub resolver: Option<Arc<dyn IdentResolver>>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            include_builtins: true,
            catalog_paths: Vec::new(),
            resolver: None,
        }
    }
}

impl TranslatorConfig {
    /// Builtins only, default identifier resolution
    pub fn new() -> Self {
        TranslatorConfig::default()
    }

    /// Add a catalog file (builder pattern)
    pub fn with_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_paths.push(path.into());
        self
    }

    /// Add multiple catalog files
    pub fn with_catalogs(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.catalog_paths.extend(paths);
        self
    }

    /// Start from an empty context instead of the builtin catalog
    pub fn without_builtins(mut self) -> Self {
        self.include_builtins = false;
        self
    }

    /// Use a custom identifier resolver
    pub fn with_resolver(mut self, resolver: Arc<dyn IdentResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }
}
