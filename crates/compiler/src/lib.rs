//! IDL to Python Mapping Library
//!
//! Binds IDL variable and routine names to Python, and generates the Python
//! text for routine definitions and call sites. Parsing IDL and assembling
//! output files are left to the translator driver.
//!
//! # Usage
//!
//! ```rust,ignore
//! use idlpy::{MappingContext, RoutineSignature, TranslatorConfig};
//!
//! let mut ctx = MappingContext::from_config(&TranslatorConfig::new())?;
//! ctx.register_routine(
//!     RoutineSignature::procedure("GETSIZE").inputs([1]).outputs([2]),
//! )?;
//!
//! let getsize = ctx.lookup_routine("getsize").unwrap();
//! let call = ctx.synthesize_call(&getsize, &["arr", "n"], &[] as &[(&str, &str)])?;
//! assert_eq!(call, "n = GETSIZE(arr)");
//!
//! // After the whole run: helper code to place in the output module
//! let helpers = ctx.drain_extra_code();
//! ```
//!
//! # Extending the Translator
//!
//! Projects describe their own IDL libraries in TOML catalogs (see
//! [`catalog`]) and load them through [`TranslatorConfig`].

pub mod builtins;
pub mod catalog;
pub mod codegen;
pub mod config;
pub mod context;
pub mod error;
pub mod extra_code;
pub mod mapping;
pub mod names;
pub mod routines;
pub mod strategy;
pub mod variables;

pub use catalog::Catalog;
pub use codegen::{Definition, indent};
pub use config::TranslatorConfig;
pub use context::MappingContext;
pub use error::{MapError, MappingKind};
pub use extra_code::ExtraCode;
pub use mapping::Mapping;
pub use names::{IdentResolver, PyIdentifiers, fold_case};
pub use routines::{RoutineMapping, RoutineSignature};
pub use strategy::CallOverride;
pub use variables::VariableMapping;
