//! Identifier handling
//!
//! IDL names are case-insensitive. All registry keys and keyword names go
//! through [`fold_case`] so registration, lookup and keyword resolution can
//! never disagree about what counts as "the same name".
//!
//! Turning an IDL identifier into a Python one is a capability supplied by
//! the translator ([`IdentResolver`]). [`PyIdentifiers`] is the default.

use std::fmt;

/// Canonical case for registry keys and keyword names.
pub fn fold_case(name: &str) -> String {
    name.to_uppercase()
}

/// Converts a source identifier into a valid target identifier.
///
/// Implementations must be deterministic and total.
pub trait IdentResolver: fmt::Debug + Send + Sync {
    fn resolve(&self, source: &str) -> String;
}

/// Python words that cannot be used as plain identifiers.
///
/// Includes the names the definition synthesizer binds inside generated
/// functions, so user variables cannot shadow them.
const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "exec", "finally", "for", "from",
    "global", "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "print",
    "raise", "return", "try", "while", "with", "yield", "n_params", "_optout", "_ret", "_rv",
    "_o",
];

/// Default identifier resolution for Python output.
///
/// Case is preserved. Characters that Python does not accept are escaped:
/// - leading `!` (system variable) -> `sys_`
/// - `$` -> `_S_`
/// - anything else non-alphanumeric -> `_xNN_`
///
/// Reserved words get a trailing underscore and a leading digit gets a
/// leading underscore.
#[derive(Debug, Clone, Copy, Default)]
pub struct PyIdentifiers;

impl IdentResolver for PyIdentifiers {
    fn resolve(&self, source: &str) -> String {
        let mut result = String::with_capacity(source.len());
        let body = match source.strip_prefix('!') {
            Some(rest) => {
                result.push_str("sys_");
                rest
            }
            None => source,
        };
        for c in body.chars() {
            match c {
                '$' => result.push_str("_S_"),
                '_' => result.push(c),
                c if c.is_ascii_alphanumeric() => result.push(c),
                _ => result.push_str(&format!("_x{:02X}_", c as u32)),
            }
        }

        if result.is_empty() {
            return "_".to_string();
        }
        if result.starts_with(|c: char| c.is_ascii_digit()) {
            result.insert(0, '_');
        }
        if RESERVED.contains(&result.as_str()) {
            result.push('_');
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_case() {
        assert_eq!(fold_case("Where"), "WHERE");
        assert_eq!(fold_case("n_elements"), "N_ELEMENTS");
    }

    #[test]
    fn test_plain_names_unchanged() {
        assert_eq!(PyIdentifiers.resolve("arr"), "arr");
        assert_eq!(PyIdentifiers.resolve("N_Elements"), "N_Elements");
    }

    #[test]
    fn test_system_variable() {
        assert_eq!(PyIdentifiers.resolve("!PI"), "sys_PI");
    }

    #[test]
    fn test_dollar_and_other_characters() {
        assert_eq!(PyIdentifiers.resolve("a$b"), "a_S_b");
        assert_eq!(PyIdentifiers.resolve("a.b"), "a_x2E_b");
    }

    #[test]
    fn test_reserved_words_escaped() {
        assert_eq!(PyIdentifiers.resolve("lambda"), "lambda_");
        assert_eq!(PyIdentifiers.resolve("print"), "print_");
        assert_eq!(PyIdentifiers.resolve("n_params"), "n_params_");
        // Case differs from the Python keyword, so it is a valid name
        assert_eq!(PyIdentifiers.resolve("PRINT"), "PRINT");
    }

    #[test]
    fn test_leading_digit_and_empty() {
        assert_eq!(PyIdentifiers.resolve("1st"), "_1st");
        assert_eq!(PyIdentifiers.resolve(""), "_");
    }
}
