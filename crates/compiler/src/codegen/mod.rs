//! Python Code Generation via Text
//!
//! Produces Python source fragments for routine definitions and call sites.
//!
//! # Generated-Code Contract
//!
//! Part of what the definition synthesizer emits is evaluated only when the
//! generated function runs: the parameter counter subtracts omitted
//! optional arguments, and the return helper filters optional outputs the
//! caller did not supply. Neither is known at translation time, so neither
//! is folded here.
//!
//! Omitted arguments are recognized by the `None` sentinel. A caller that
//! passes `None` on purpose is indistinguishable from one that omitted the
//! argument.

mod call;
mod definition;

pub use call::synthesize_call;
pub use definition::{Definition, synthesize_definition};

/// One level of indentation in generated Python
pub const TAB: &str = "   ";

/// Default value marking an omitted argument
pub const UNSET: &str = "None";

/// Name of the parameter counter bound in every generated definition
pub const N_PARAMS: &str = "n_params";

/// Pad every non-empty line of `text` with `levels` tabs.
///
/// A trailing newline is kept; blank lines stay blank.
pub fn indent(text: &str, levels: usize) -> String {
    let pad = TAB.repeat(levels);
    let mut result = text
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    if text.ends_with('\n') {
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent() {
        assert_eq!(indent("a\nb", 1), "   a\n   b");
        assert_eq!(indent("a\n\nb\n", 2), "      a\n\n      b\n");
        assert_eq!(indent("", 1), "");
    }
}
