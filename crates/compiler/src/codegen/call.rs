//! Call-site synthesis
//!
//! Renders an IDL routine invocation as a Python statement or expression.
//! Positional arguments are split by role: input slots become call
//! arguments, output slots become assignment targets. A slot with both
//! roles appears on both sides.
//!
//! Keywords may be abbreviated to any unique prefix. An output-only keyword
//! that the caller supplies is forwarded as `KEY=True` so the generated
//! definition can tell that the caller asked for it.

use crate::error::MapError;
use crate::extra_code::ExtraCode;
use crate::mapping::Mapping;
use crate::names::IdentResolver;
use crate::routines::RoutineMapping;
use tracing::trace;

/// Synthesize a call to `mapping` with the given argument text.
///
/// `params` are positional argument expressions; `keywords` are
/// `(keyword, expression)` pairs, with keyword names possibly abbreviated.
/// The mapping's extra code is queued.
pub fn synthesize_call<P, K, V>(
    mapping: &RoutineMapping,
    names: &dyn IdentResolver,
    extra: &mut ExtraCode,
    params: &[P],
    keywords: &[(K, V)],
) -> Result<String, MapError>
where
    P: AsRef<str>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let npars = params.len();
    if npars > mapping.npars() {
        return Err(MapError::TooManyArguments {
            routine: mapping.name().to_string(),
            max: mapping.npars(),
            got: npars,
        });
    }
    if npars < mapping.required_count() {
        return Err(MapError::TooFewArguments {
            routine: mapping.name().to_string(),
            required: mapping.required_count(),
            got: npars,
        });
    }

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    for (index, param) in params.iter().enumerate() {
        let position = index + 1;
        if mapping.is_input(position) {
            inputs.push(param.as_ref().to_string());
        }
        if mapping.is_output(position) {
            outputs.push(param.as_ref().to_string());
        }
    }

    // A keyword supplied twice (possibly under two abbreviations) keeps its
    // first position and its last value
    let mut supplied: Vec<(&str, &str)> = Vec::with_capacity(keywords.len());
    for (abbrev, value) in keywords {
        let keyword = mapping.match_keyword(abbrev.as_ref())?;
        let value = value.as_ref();
        match supplied.iter_mut().find(|(k, _)| *k == keyword) {
            Some(entry) => entry.1 = value,
            None => supplied.push((keyword, value)),
        }
    }

    for (keyword, value) in supplied {
        let rendered = names.resolve(keyword);
        let is_input = mapping.is_input_keyword(keyword);
        if is_input {
            inputs.push(format!("{}={}", rendered, value));
        }
        if mapping.is_output_keyword(keyword) {
            outputs.push(value.to_string());
            if !is_input {
                inputs.push(format!("{}=True", rendered));
            }
        }
    }

    extra.record(mapping.extra_code());

    let call = match mapping.call_override() {
        Some(strategy) => strategy.render(&inputs, &outputs).map_err(|reason| {
            MapError::InvalidSignature {
                name: mapping.name().to_string(),
                reason,
            }
        })?,
        None => {
            let target = if outputs.is_empty() {
                String::new()
            } else {
                format!("{} = ", outputs.join(", "))
            };
            format!(
                "{}{}({})",
                target,
                mapping.resolve_name(names),
                inputs.join(", ")
            )
        }
    };
    trace!(routine = %mapping.name(), call = %call, "synthesized call");
    Ok(call)
}
