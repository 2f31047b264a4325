//! Mapping catalogs
//!
//! A catalog is a TOML document declaring variable and routine mappings,
//! loaded on top of (or instead of) the builtin catalog. It lets a project
//! describe its own IDL library without touching the translator.
//!
//! # Format
//!
//! ```toml
//! [[variable]]
//! name = "!PI"
//! target = "pi"
//! extra_code = "from math import pi"
//! readonly = true
//!
//! [[function]]
//! name = "TOTAL"
//! target = "sum"
//! pars = [1]
//! keywords = ["DOUBLE"]
//!
//! [[procedure]]
//! name = "GETSIZE"
//! inpars = [1]
//! outpars = [2, 3]
//! optional = 1
//! inkeys = ["VERBOSE"]
//! outkeys = ["COUNT"]
//! call = { kind = "template", text = "{outputs} = getsize({inputs})" }
//! ```

use crate::context::MappingContext;
use crate::error::MapError;
use crate::mapping::Mapping;
use crate::routines::RoutineSignature;
use crate::strategy::CallOverride;
use crate::variables::VariableMapping;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Helper code, written either as one string or as a list of snippets
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ExtraCodeSpec {
    One(String),
    Many(Vec<String>),
}

impl ExtraCodeSpec {
    fn snippets(&self) -> Vec<String> {
        match self {
            ExtraCodeSpec::One(code) => vec![code.clone()],
            ExtraCodeSpec::Many(codes) => codes.clone(),
        }
    }
}

/// A `[[variable]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogVariable {
    /// IDL name (e.g., "!PI")
    pub name: String,
    /// Python expression to use instead of the resolved name
    pub target: Option<String>,
    pub extra_code: Option<ExtraCodeSpec>,
    #[serde(default)]
    pub readonly: bool,
}

/// A `[[function]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFunction {
    pub name: String,
    pub target: Option<String>,
    /// 1-based positional parameters
    #[serde(default)]
    pub pars: Vec<usize>,
    /// Trailing optional parameters (negative counts as 0)
    #[serde(default)]
    pub optional: i64,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub call: Option<CallOverride>,
    pub extra_code: Option<ExtraCodeSpec>,
    #[serde(default)]
    pub readonly: bool,
}

/// A `[[procedure]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogProcedure {
    pub name: String,
    pub target: Option<String>,
    #[serde(default)]
    pub inpars: Vec<usize>,
    #[serde(default)]
    pub outpars: Vec<usize>,
    #[serde(default)]
    pub optional: i64,
    #[serde(default)]
    pub inkeys: Vec<String>,
    #[serde(default)]
    pub outkeys: Vec<String>,
    pub call: Option<CallOverride>,
    pub extra_code: Option<ExtraCodeSpec>,
    #[serde(default)]
    pub readonly: bool,
}

/// Top-level catalog structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(rename = "variable", default)]
    pub variables: Vec<CatalogVariable>,
    #[serde(rename = "function", default)]
    pub functions: Vec<CatalogFunction>,
    #[serde(rename = "procedure", default)]
    pub procedures: Vec<CatalogProcedure>,
}

impl Catalog {
    /// Parse a catalog from TOML content
    ///
    /// Validates the catalog after parsing to catch:
    /// - Empty names
    /// - Call templates with unknown placeholders
    ///
    /// Signature errors (gaps in positions, function outputs) surface when
    /// the catalog is applied.
    pub fn parse(content: &str) -> Result<Self, MapError> {
        let catalog: Self = toml::from_str(content)
            .map_err(|e| MapError::Catalog(format!("Failed to parse catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read and parse a catalog file
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MapError::Io(format!(
                "Failed to read catalog '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    fn validate(&self) -> Result<(), MapError> {
        for (idx, var) in self.variables.iter().enumerate() {
            if var.name.trim().is_empty() {
                return Err(MapError::Catalog(format!(
                    "variable {} has empty name",
                    idx + 1
                )));
            }
        }

        let routines = self
            .functions
            .iter()
            .map(|f| (f.name.as_str(), f.call.as_ref()))
            .chain(
                self.procedures
                    .iter()
                    .map(|p| (p.name.as_str(), p.call.as_ref())),
            );
        for (idx, (name, call)) in routines.enumerate() {
            if name.trim().is_empty() {
                return Err(MapError::Catalog(format!(
                    "subroutine {} has empty name",
                    idx + 1
                )));
            }
            if let Some(call) = call {
                call.validate().map_err(|e| {
                    MapError::Catalog(format!("subroutine '{}' has malformed call: {}", name, e))
                })?;
            }
        }

        Ok(())
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.variables.len() + self.functions.len() + self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register every entry: variables, then functions, then procedures.
    ///
    /// All or nothing: every signature is validated first, and if any entry
    /// cannot be registered `ctx` is left as it was.
    pub fn apply(&self, ctx: &mut MappingContext) -> Result<(), MapError> {
        let variables: Vec<VariableMapping> =
            self.variables.iter().map(CatalogVariable::to_mapping).collect();
        let routines = self
            .functions
            .iter()
            .map(CatalogFunction::to_signature)
            .chain(self.procedures.iter().map(CatalogProcedure::to_signature))
            .map(RoutineSignature::build)
            .collect::<Result<Vec<_>, _>>()?;

        for var in &variables {
            if ctx.lookup_variable(var.source_name()).is_some() {
                warn!(name = %var.source_name(), "catalog replaces existing variable mapping");
            }
        }
        for routine in &routines {
            if ctx.lookup_routine(routine.name()).is_some() {
                let kind = if routine.is_function() { "function" } else { "procedure" };
                warn!(name = %routine.name(), kind, "catalog replaces existing routine mapping");
            }
        }

        ctx.register_all(variables, routines)?;
        debug!(entries = self.len(), "applied catalog");
        Ok(())
    }
}

impl CatalogVariable {
    pub fn to_mapping(&self) -> VariableMapping {
        let mut mapping = VariableMapping::new(&self.name);
        if let Some(target) = &self.target {
            mapping = mapping.with_target(target);
        }
        for code in self.extra_code.iter().flat_map(ExtraCodeSpec::snippets) {
            mapping = mapping.with_extra_code(code);
        }
        if self.readonly {
            mapping = mapping.read_only();
        }
        mapping
    }
}

impl CatalogFunction {
    pub fn to_signature(&self) -> RoutineSignature {
        let signature = RoutineSignature::function(&self.name)
            .inputs(self.pars.iter().copied())
            .optional(self.optional)
            .input_keywords(&self.keywords);
        finish(
            signature,
            self.target.as_deref(),
            self.call.as_ref(),
            self.extra_code.as_ref(),
            self.readonly,
        )
    }
}

impl CatalogProcedure {
    pub fn to_signature(&self) -> RoutineSignature {
        let signature = RoutineSignature::procedure(&self.name)
            .inputs(self.inpars.iter().copied())
            .outputs(self.outpars.iter().copied())
            .optional(self.optional)
            .input_keywords(&self.inkeys)
            .output_keywords(&self.outkeys);
        finish(
            signature,
            self.target.as_deref(),
            self.call.as_ref(),
            self.extra_code.as_ref(),
            self.readonly,
        )
    }
}

fn finish(
    mut signature: RoutineSignature,
    target: Option<&str>,
    call: Option<&CallOverride>,
    extra_code: Option<&ExtraCodeSpec>,
    readonly: bool,
) -> RoutineSignature {
    if let Some(target) = target {
        signature = signature.with_target(target);
    }
    if let Some(call) = call {
        signature = signature.call_override(call.clone());
    }
    for code in extra_code.iter().flat_map(|spec| spec.snippets()) {
        signature = signature.extra_code(code);
    }
    if readonly {
        signature = signature.read_only();
    }
    signature
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Mapping;

    const NO_KEYS: &[(&str, &str)] = &[];

    const SAMPLE: &str = r#"
[[variable]]
name = "!PI"
target = "pi"
extra_code = "from math import pi"
readonly = true

[[function]]
name = "TOTAL"
target = "sum"
pars = [1]
keywords = ["Double"]

[[procedure]]
name = "GETSIZE"
inpars = [1]
outpars = [2, 3]
optional = 1
inkeys = ["VERBOSE"]
outkeys = ["COUNT"]
call = { kind = "template", text = "{outputs} = getsize({inputs})" }
extra_code = ["import os", "import sys"]
"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::parse(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.variables[0].name, "!PI");
        assert_eq!(
            catalog.variables[0].extra_code,
            Some(ExtraCodeSpec::One("from math import pi".to_string()))
        );
        assert_eq!(catalog.functions[0].pars, vec![1]);
        assert_eq!(catalog.procedures[0].outpars, vec![2, 3]);
        assert_eq!(
            catalog.procedures[0].call,
            Some(CallOverride::template("{outputs} = getsize({inputs})"))
        );
    }

    #[test]
    fn test_apply_registers_everything() {
        let catalog = Catalog::parse(SAMPLE).unwrap();
        let mut ctx = MappingContext::new();
        catalog.apply(&mut ctx).unwrap();

        let pi = ctx.lookup_variable("!pi").unwrap();
        assert!(pi.readonly());
        assert_eq!(ctx.resolve_variable(&pi), "pi");

        let total = ctx.lookup_routine("total").unwrap();
        assert!(total.is_function());
        assert_eq!(total.all_keywords(), ["DOUBLE"]);
        let call = ctx.synthesize_call(&total, &["x"], &[("d", "1")]);
        assert_eq!(call.unwrap(), "sum(x, DOUBLE=1)");

        let getsize = ctx.lookup_routine("GETSIZE").unwrap();
        assert_eq!(getsize.npars(), 3);
        assert_eq!(getsize.optional_count(), 1);
        assert_eq!(
            ctx.synthesize_call(&getsize, &["a", "n"], NO_KEYS).unwrap(),
            "n = getsize(a)"
        );
        assert_eq!(
            ctx.drain_extra_code(),
            "from math import pi\n\nimport os\n\nimport sys"
        );
    }

    #[test]
    fn test_negative_optional_clamps() {
        let catalog = Catalog::parse(
            r#"
[[function]]
name = "F"
pars = [1]
optional = -2
"#,
        )
        .unwrap();
        let mut ctx = MappingContext::new();
        catalog.apply(&mut ctx).unwrap();
        assert_eq!(ctx.lookup_routine("F").unwrap().optional_count(), 0);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::parse("").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_reject_empty_name() {
        let err = Catalog::parse("[[procedure]]\nname = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("empty name"));
    }

    #[test]
    fn test_reject_unknown_field() {
        let err = Catalog::parse("[[function]]\nname = \"F\"\ninpars = [1]\n").unwrap_err();
        assert!(matches!(err, MapError::Catalog(_)));
    }

    #[test]
    fn test_reject_bad_template() {
        let err = Catalog::parse(
            r#"
[[function]]
name = "F"
pars = [1]
call = { kind = "template", text = "f({args})" }
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("malformed call"));
    }

    #[test]
    fn test_invalid_signature_surfaces_on_apply() {
        let catalog = Catalog::parse(
            r#"
[[function]]
name = "F"
pars = [1, 3]
"#,
        )
        .unwrap();
        let mut ctx = MappingContext::new();
        assert!(matches!(
            catalog.apply(&mut ctx),
            Err(MapError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn test_failed_apply_registers_nothing() {
        let catalog = Catalog::parse(
            r#"
[[variable]]
name = "!E"
target = "e"

[[function]]
name = "GOOD"
pars = [1]

[[function]]
name = "BAD"
pars = [1, 3]
"#,
        )
        .unwrap();
        let mut ctx = MappingContext::new();
        assert!(catalog.apply(&mut ctx).is_err());
        assert!(ctx.lookup_variable("!E").is_none());
        assert!(ctx.lookup_routine("GOOD").is_none());
    }

    #[test]
    fn test_read_only_conflict_registers_nothing() {
        let catalog = Catalog::parse(
            r#"
[[function]]
name = "TOTAL"
pars = [1]

[[function]]
name = "KEYWORD_SET"
pars = [1]
"#,
        )
        .unwrap();
        let mut ctx = MappingContext::new();
        crate::builtins::register_builtins(&mut ctx).unwrap();
        let before = ctx.routines().len();

        let err = catalog.apply(&mut ctx).unwrap_err();
        assert!(matches!(err, MapError::DuplicateReadOnlyMapping { .. }));
        assert!(ctx.lookup_routine("TOTAL").is_none());
        assert_eq!(ctx.routines().len(), before);
    }

    #[test]
    fn test_named_strategy() {
        let catalog = Catalog::parse(
            r#"
[[function]]
name = "DINDGEN"
pars = [1, 2]
optional = 1
call = { kind = "array_gen", dtype = "Float64" }
"#,
        )
        .unwrap();
        let mut ctx = MappingContext::new();
        catalog.apply(&mut ctx).unwrap();
        let mapping = ctx.lookup_routine("dindgen").unwrap();
        assert_eq!(
            ctx.synthesize_call(&mapping, &["2", "3"], NO_KEYS).unwrap(),
            "zeros([3, 2], Float64)"
        );
    }
}
