//! Mapping and code generation error types.
//!
//! Every error is raised at translation time, at the point where it is
//! detected. None of them are recovered internally; the translator driver
//! attaches a source location and decides whether to abort or skip.

use std::fmt;

/// Which registry namespace a mapping lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    Variable,
    Routine,
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingKind::Variable => write!(f, "variable"),
            MappingKind::Routine => write!(f, "subroutine"),
        }
    }
}

/// Error type for registration, synthesis and catalog loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Re-registration attempted over a read-only entry
    DuplicateReadOnlyMapping { kind: MappingKind, name: String },
    /// Positional roles do not cover 1..N exactly, or a function declares outputs
    InvalidSignature { name: String, reason: String },
    /// Definition synthesized with the wrong number of parameter names
    ArityMismatch {
        routine: String,
        expected: usize,
        got: usize,
    },
    /// Definition synthesized with a keyword set unequal to the declared one
    KeywordSetMismatch {
        routine: String,
        expected: Vec<String>,
        got: Vec<String>,
    },
    /// Call site supplies fewer than the required positional arguments
    TooFewArguments {
        routine: String,
        required: usize,
        got: usize,
    },
    /// Call site supplies more positional arguments than declared
    TooManyArguments {
        routine: String,
        max: usize,
        got: usize,
    },
    /// Keyword prefix matches no declared keyword
    UnknownKeyword { routine: String, keyword: String },
    /// Keyword prefix matches more than one declared keyword
    AmbiguousKeyword {
        routine: String,
        keyword: String,
        matches: Vec<String>,
    },
    /// A catalog document is malformed
    Catalog(String),
    /// A catalog file could not be read
    Io(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::DuplicateReadOnlyMapping { kind, name } => {
                write!(f, "a read-only mapping for {} '{}' already exists", kind, name)
            }
            MapError::InvalidSignature { name, reason } => {
                write!(f, "invalid signature for subroutine '{}': {}", name, reason)
            }
            MapError::ArityMismatch {
                routine,
                expected,
                got,
            } => write!(
                f,
                "subroutine '{}' has {} parameters (defined with {})",
                routine, expected, got
            ),
            MapError::KeywordSetMismatch {
                routine,
                expected,
                got,
            } => write!(
                f,
                "keywords for subroutine '{}' are [{}] (defined with keywords [{}])",
                routine,
                expected.join(", "),
                got.join(", ")
            ),
            MapError::TooFewArguments {
                routine,
                required,
                got,
            } => write!(
                f,
                "subroutine '{}' requires at least {} parameters (called with {})",
                routine, required, got
            ),
            MapError::TooManyArguments { routine, max, got } => write!(
                f,
                "subroutine '{}' takes at most {} parameters (called with {})",
                routine, max, got
            ),
            MapError::UnknownKeyword { routine, keyword } => write!(
                f,
                "'{}' is not a valid keyword for subroutine '{}'",
                keyword, routine
            ),
            MapError::AmbiguousKeyword {
                routine,
                keyword,
                matches,
            } => write!(
                f,
                "identifier '{}' matches multiple keywords for subroutine '{}': {}",
                keyword,
                routine,
                matches.join(", ")
            ),
            MapError::Catalog(msg) => write!(f, "catalog error: {}", msg),
            MapError::Io(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_reports_expected_and_received_keywords() {
        let err = MapError::KeywordSetMismatch {
            routine: "FOO".to_string(),
            expected: vec!["A".to_string(), "B".to_string()],
            got: vec!["A".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "keywords for subroutine 'FOO' are [A, B] (defined with keywords [A])"
        );
    }

    #[test]
    fn test_display_lists_ambiguous_matches() {
        let err = MapError::AmbiguousKeyword {
            routine: "PLOT".to_string(),
            keyword: "X".to_string(),
            matches: vec!["XRANGE".to_string(), "XSTYLE".to_string()],
        };
        assert!(err.to_string().ends_with("XRANGE, XSTYLE"));
    }

    #[test]
    fn test_display_read_only_variable() {
        let err = MapError::DuplicateReadOnlyMapping {
            kind: MappingKind::Variable,
            name: "!PI".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "a read-only mapping for variable '!PI' already exists"
        );
    }
}
