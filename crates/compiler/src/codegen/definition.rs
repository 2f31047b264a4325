//! Definition synthesis
//!
//! Renders the `def` line and preamble of a Python function that stands in
//! for an IDL routine, given the parameter and keyword names the IDL
//! declaration uses.
//!
//! Parameters are laid out as: required inputs, optional positions
//! (defaulting to `None`), then keywords (defaulting to `None`). Required
//! output-only positions are not parameters at all; they start out as
//! `None` and are handed back through the return helper.
//!
//! Non-function routines get a nested `_ret()` helper that builds the
//! return value. When there are optional outputs, `_optout` captures which
//! of them the caller supplied on entry and `_ret()` drops the ones that
//! were `None` at that point.

use super::{N_PARAMS, UNSET, indent};
use crate::error::MapError;
use crate::extra_code::ExtraCode;
use crate::mapping::Mapping;
use crate::names::{IdentResolver, fold_case};
use crate::routines::RoutineMapping;
use tracing::trace;

/// A synthesized definition: the `def` line and the statements that follow.
///
/// Composing these with the translated routine body (and a final
/// `return _ret()`) is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub header: String,
    pub body: String,
}

impl Definition {
    /// Header followed by the body indented one level
    pub fn to_text(&self) -> String {
        format!("{}\n{}", self.header, indent(&self.body, 1))
    }
}

/// A keyword as declared by the IDL routine (`KEY=local`).
struct DeclaredKeyword {
    folded: String,
    external: String,
    local: String,
}

/// Synthesize a definition for `mapping`.
///
/// `params` holds one name per positional slot; `keywords` holds one
/// `(keyword, local_name)` pair per declared keyword. Names are passed
/// through `names` before use. The mapping's extra code is queued.
pub fn synthesize_definition<P, K, L>(
    mapping: &RoutineMapping,
    names: &dyn IdentResolver,
    extra: &mut ExtraCode,
    params: &[P],
    keywords: &[(K, L)],
) -> Result<Definition, MapError>
where
    P: AsRef<str>,
    K: AsRef<str>,
    L: AsRef<str>,
{
    let pars: Vec<String> = params.iter().map(|p| names.resolve(p.as_ref())).collect();
    let keys: Vec<DeclaredKeyword> = keywords
        .iter()
        .map(|(external, local)| {
            let folded = fold_case(external.as_ref());
            DeclaredKeyword {
                external: names.resolve(&folded),
                local: names.resolve(local.as_ref()),
                folded,
            }
        })
        .collect();

    let npars = mapping.npars();
    if pars.len() != npars {
        return Err(MapError::ArityMismatch {
            routine: mapping.name().to_string(),
            expected: npars,
            got: pars.len(),
        });
    }

    let mut expected: Vec<String> = mapping.all_keywords().to_vec();
    expected.sort();
    let mut got: Vec<String> = keys.iter().map(|k| k.folded.clone()).collect();
    got.sort();
    if got != expected {
        return Err(MapError::KeywordSetMismatch {
            routine: mapping.name().to_string(),
            expected,
            got,
        });
    }

    let nrequired = mapping.required_count();
    let required: Vec<(usize, &String)> =
        (1..=nrequired).map(|pos| (pos, &pars[pos - 1])).collect();
    let optional: Vec<(usize, &String)> = (nrequired + 1..=npars)
        .map(|pos| (pos, &pars[pos - 1]))
        .collect();

    // Header
    let mut header_params: Vec<String> = required
        .iter()
        .filter(|(pos, _)| mapping.is_input(*pos))
        .map(|(_, name)| name.to_string())
        .collect();
    header_params.extend(optional.iter().map(|(_, name)| format!("{}={}", name, UNSET)));
    header_params.extend(keys.iter().map(|k| format!("{}={}", k.external, UNSET)));
    let header = format!(
        "def {}({}):",
        mapping.resolve_name(names),
        header_params.join(", ")
    );

    // Body
    let mut lines = Vec::new();

    let mut counter = format!("{} = {}", N_PARAMS, npars);
    if !optional.is_empty() {
        let omitted: Vec<&str> = optional.iter().map(|(_, name)| name.as_str()).collect();
        counter.push_str(&format!(" - [{}].count({})", omitted.join(", "), UNSET));
    }
    lines.push(counter);

    let required_out: Vec<&str> = required
        .iter()
        .filter(|(pos, _)| mapping.is_output(*pos))
        .map(|(_, name)| name.as_str())
        .collect();
    for (pos, name) in &required {
        if mapping.is_output(*pos) && !mapping.is_input(*pos) {
            lines.push(format!("{} = {}", name, UNSET));
        }
    }

    for key in &keys {
        if key.external != key.local {
            lines.push(format!("{} = {}", key.local, key.external));
        }
    }

    // Optional outputs: the name that tells whether the caller supplied the
    // output, paired with the name the routine body assigns it to
    let mut optional_out: Vec<(&str, &str)> = optional
        .iter()
        .filter(|(pos, _)| mapping.is_output(*pos))
        .map(|(_, name)| (name.as_str(), name.as_str()))
        .collect();
    optional_out.extend(
        keys.iter()
            .filter(|k| mapping.is_output_keyword(&k.folded))
            .map(|k| (k.external.as_str(), k.local.as_str())),
    );

    if !optional_out.is_empty() {
        let supplied: Vec<&str> = optional_out.iter().map(|(supplied, _)| *supplied).collect();
        let trailing = if supplied.len() == 1 { "," } else { "" };
        lines.push(format!("_optout = ({}{})", supplied.join(", "), trailing));
    }

    if !mapping.is_function() {
        lines.push(return_helper(&required_out, &optional_out));
    }

    let mut body = lines.join("\n");
    body.push('\n');

    extra.record(mapping.extra_code());
    trace!(routine = %mapping.name(), header = %header, "synthesized definition");

    Ok(Definition { header, body })
}

fn return_helper(required_out: &[&str], optional_out: &[(&str, &str)]) -> String {
    if optional_out.is_empty() {
        return match required_out {
            [] => format!("def _ret():  return {}", UNSET),
            [single] => format!("def _ret():  return {}", single),
            _ => format!("def _ret():  return ({})", required_out.join(", ")),
        };
    }

    let values: Vec<&str> = optional_out.iter().map(|(_, value)| *value).collect();
    let filtered = format!(
        "[_o[1] for _o in zip(_optout, [{}]) if _o[0] is not {}]",
        values.join(", "),
        UNSET
    );
    let retbody = if required_out.is_empty() {
        format!("_rv = {}\nreturn tuple(_rv)", filtered)
    } else {
        format!(
            "_rv = [{}]\n_rv += {}\nreturn tuple(_rv)",
            required_out.join(", "),
            filtered
        )
    };
    format!("def _ret():\n{}", indent(&retbody, 1))
}
