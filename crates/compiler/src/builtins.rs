//! Builtin routine catalog
//!
//! Mappings for the IDL builtins the translator knows about. Most builtins
//! have no direct Python counterpart with the same calling convention, so
//! they select a [`CallOverride`] strategy.
//!
//! `N_PARAMS` and `KEYWORD_SET` are read-only: generated definitions bind
//! `n_params` and mark omitted arguments with `None`, and these two
//! builtins are how translated routine bodies read that back.

use crate::context::MappingContext;
use crate::error::MapError;
use crate::routines::RoutineSignature;
use crate::strategy::CallOverride;

/// Helper queued whenever `WHERE` is used
pub const IDLWHERE_HELPER: &str = "import sys
def idlwhere(arr, cnt=None):
   rv = where(ravel(arr))[0]
   if cnt:
      sys._getframe(1).f_locals[cnt] = rv.size()
   return rv";

/// Register one-argument type conversion functions
///
/// Usage: `conversions!(ctx, "DOUBLE" => "Float64", "FIX" => "Int32");`
macro_rules! conversions {
    ($ctx:ident, $($name:expr => $dtype:expr),+ $(,)?) => {
        $(
            $ctx.register_routine(
                RoutineSignature::function($name)
                    .inputs([1])
                    .call_override(CallOverride::TypeConversion {
                        dtype: $dtype.to_string(),
                    }),
            )?;
        )+
    };
}

/// Register one-argument array methods
macro_rules! methods {
    ($ctx:ident, $($name:expr => $method:expr),+ $(,)?) => {
        $(
            $ctx.register_routine(
                RoutineSignature::function($name)
                    .inputs([1])
                    .call_override(CallOverride::Method {
                        method: $method.to_string(),
                    }),
            )?;
        )+
    };
}

/// Names of all builtin routines, in registration order
pub const BUILTIN_NAMES: &[&str] = &[
    "N_PARAMS",
    "KEYWORD_SET",
    "ON_ERROR",
    "PRINT",
    "DOUBLE",
    "FIX",
    "FLOAT",
    "LONG",
    "FLTARR",
    "MIN",
    "N_ELEMENTS",
    "REPLICATE",
    "WHERE",
];

/// Register every builtin routine into `ctx`.
pub fn register_builtins(ctx: &mut MappingContext) -> Result<(), MapError> {
    // =========================================================================
    // Definition support (read-only)
    // =========================================================================

    ctx.register_routine(
        RoutineSignature::function("N_PARAMS")
            .call_override(CallOverride::NParams)
            .read_only(),
    )?;
    ctx.register_routine(
        RoutineSignature::function("KEYWORD_SET")
            .inputs([1])
            .call_override(CallOverride::KeywordSet)
            .read_only(),
    )?;

    // =========================================================================
    // Statements
    // =========================================================================

    ctx.register_routine(
        RoutineSignature::procedure("ON_ERROR")
            .inputs([1])
            .call_override(CallOverride::Comment {
                label: "ON_ERROR".to_string(),
            }),
    )?;
    ctx.register_routine(
        RoutineSignature::procedure("PRINT")
            .inputs(1..=100)
            .optional(99)
            .input_keywords(["FORMAT"])
            .call_override(CallOverride::Print),
    )?;

    // =========================================================================
    // Type conversion
    // =========================================================================

    conversions!(ctx,
        "DOUBLE" => "Float64",
        "FIX" => "Int32",
        "FLOAT" => "Float32",
        "LONG" => "Int32",
    );

    // =========================================================================
    // Array creation and inspection
    // =========================================================================

    ctx.register_routine(
        RoutineSignature::function("FLTARR")
            .inputs(1..=8)
            .optional(7)
            .call_override(CallOverride::ArrayGen {
                dtype: "Float32".to_string(),
            }),
    )?;

    methods!(ctx,
        "MIN" => "min",
        "N_ELEMENTS" => "size",
    );

    ctx.register_routine(
        RoutineSignature::function("REPLICATE")
            .inputs(1..=9)
            .optional(7)
            .call_override(CallOverride::Replicate),
    )?;
    ctx.register_routine(
        RoutineSignature::function("WHERE")
            .inputs([1, 2])
            .optional(1)
            .call_override(CallOverride::Where)
            .extra_code(IDLWHERE_HELPER),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_KEYS: &[(&str, &str)] = &[];

    fn builtins() -> MappingContext {
        let mut ctx = MappingContext::new();
        register_builtins(&mut ctx).unwrap();
        ctx
    }

    fn call(ctx: &mut MappingContext, name: &str, params: &[&str]) -> String {
        let mapping = ctx.lookup_routine(name).unwrap();
        ctx.synthesize_call(&mapping, params, NO_KEYS).unwrap()
    }

    #[test]
    fn test_all_builtins_registered() {
        let ctx = builtins();
        for name in BUILTIN_NAMES {
            assert!(ctx.lookup_routine(name).is_some(), "{} missing", name);
        }
        assert_eq!(ctx.routines().len(), BUILTIN_NAMES.len());
    }

    #[test]
    fn test_definition_support_is_read_only() {
        let mut ctx = builtins();
        for name in ["n_params", "Keyword_Set"] {
            let result = ctx.register_routine(RoutineSignature::function(name));
            assert!(matches!(
                result,
                Err(MapError::DuplicateReadOnlyMapping { .. })
            ));
        }
        // Ordinary builtins can be overridden by user catalogs
        let min = RoutineSignature::function("MIN").inputs([1]);
        assert!(ctx.register_routine(min).is_ok());
    }

    #[test]
    fn test_n_params_and_keyword_set() {
        let mut ctx = builtins();
        assert_eq!(call(&mut ctx, "N_PARAMS", &[]), "n_params");
        assert_eq!(call(&mut ctx, "KEYWORD_SET", &["debug"]), "(debug is not None)");
    }

    #[test]
    fn test_print_with_format_keyword() {
        let mut ctx = builtins();
        let print = ctx.lookup_routine("PRINT").unwrap();
        let keys = [("form", "'(I5)'")];
        let rendered = ctx.synthesize_call(&print, &["a", "b"], &keys);
        assert_eq!(rendered.unwrap(), "print a, b, FORMAT='(I5)'");
    }

    #[test]
    fn test_array_builtins() {
        let mut ctx = builtins();
        assert_eq!(call(&mut ctx, "FLTARR", &["3", "4"]), "zeros([4, 3], Float32)");
        assert_eq!(call(&mut ctx, "replicate", &["1.5", "2", "5"]), "(1.5)*ones([5, 2])");
        assert_eq!(call(&mut ctx, "N_ELEMENTS", &["x"]), "array(x, copy=False).size()");
        assert_eq!(call(&mut ctx, "DOUBLE", &["x"]), "array(x, copy=False).astype(Float64)");
    }

    #[test]
    fn test_on_error_becomes_comment() {
        let mut ctx = builtins();
        assert_eq!(call(&mut ctx, "ON_ERROR", &["2"]), "# ON_ERROR, 2");
    }

    #[test]
    fn test_where_queues_helper() {
        let mut ctx = builtins();
        assert_eq!(call(&mut ctx, "WHERE", &["mask", "count"]), "idlwhere(mask, 'count')");
        assert_eq!(call(&mut ctx, "WHERE", &["mask"]), "idlwhere(mask)");
        assert_eq!(ctx.drain_extra_code(), IDLWHERE_HELPER);
    }
}
