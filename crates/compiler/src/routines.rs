//! Routine mappings and the signature model
//!
//! An IDL routine is either a procedure, which may hand values back through
//! output parameters and output keywords, or a function, which returns a
//! value and has no outputs. Positional parameters are numbered from 1;
//! each slot has an input role, an output role, or both. The trailing
//! `optional_count` slots may be omitted at a call site.
//!
//! Signatures are validated when they are built, so every [`RoutineMapping`]
//! that exists satisfies:
//! - the input and output positions together cover exactly `1..=N`
//! - functions declare no output positions and no output keywords
//! - `optional_count <= N`

use crate::error::{MapError, MappingKind};
use crate::mapping::{Mapping, Registry};
use crate::names::fold_case;
use crate::strategy::CallOverride;
use std::collections::BTreeSet;
use std::fmt;

/// A validated routine signature together with its Python binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineMapping {
    name: String,
    target: Option<String>,
    is_function: bool,
    input_positions: BTreeSet<usize>,
    output_positions: BTreeSet<usize>,
    npars: usize,
    optional_count: usize,
    input_keywords: Vec<String>,
    output_keywords: Vec<String>,
    all_keywords: Vec<String>,
    call_override: Option<CallOverride>,
    extra_code: Vec<String>,
    readonly: bool,
}

impl RoutineMapping {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_function(&self) -> bool {
        self.is_function
    }

    /// Total number of positional parameters (N)
    pub fn npars(&self) -> usize {
        self.npars
    }

    pub fn optional_count(&self) -> usize {
        self.optional_count
    }

    /// Number of leading positions a call site must supply
    pub fn required_count(&self) -> usize {
        self.npars - self.optional_count
    }

    /// Whether 1-based `position` has the input role
    pub fn is_input(&self, position: usize) -> bool {
        self.input_positions.contains(&position)
    }

    /// Whether 1-based `position` has the output role
    pub fn is_output(&self, position: usize) -> bool {
        self.output_positions.contains(&position)
    }

    pub fn input_positions(&self) -> &BTreeSet<usize> {
        &self.input_positions
    }

    pub fn output_positions(&self) -> &BTreeSet<usize> {
        &self.output_positions
    }

    pub fn input_keywords(&self) -> &[String] {
        &self.input_keywords
    }

    pub fn output_keywords(&self) -> &[String] {
        &self.output_keywords
    }

    /// Input keywords followed by output-only keywords
    pub fn all_keywords(&self) -> &[String] {
        &self.all_keywords
    }

    pub fn is_input_keyword(&self, keyword: &str) -> bool {
        self.input_keywords.iter().any(|k| k == keyword)
    }

    pub fn is_output_keyword(&self, keyword: &str) -> bool {
        self.output_keywords.iter().any(|k| k == keyword)
    }

    pub fn call_override(&self) -> Option<&CallOverride> {
        self.call_override.as_ref()
    }

    /// Resolve an abbreviated keyword against the declared keywords.
    ///
    /// IDL accepts any unique prefix of a keyword name.
    pub fn match_keyword(&self, abbrev: &str) -> Result<&str, MapError> {
        let prefix = fold_case(abbrev);
        let matches: Vec<&str> = self
            .all_keywords
            .iter()
            .map(String::as_str)
            .filter(|k| k.starts_with(prefix.as_str()))
            .collect();
        match matches.as_slice() {
            [] => Err(MapError::UnknownKeyword {
                routine: self.name.clone(),
                keyword: abbrev.to_string(),
            }),
            [keyword] => Ok(*keyword),
            _ => Err(MapError::AmbiguousKeyword {
                routine: self.name.clone(),
                keyword: abbrev.to_string(),
                matches: matches.iter().map(|k| k.to_string()).collect(),
            }),
        }
    }
}

impl Mapping for RoutineMapping {
    const KIND: MappingKind = MappingKind::Routine;

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

impl fmt::Display for RoutineMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_function { "function" } else { "pro" };
        write!(f, "{} {}", kind, self.name)?;
        if let Some(target) = &self.target {
            write!(f, " -> {}", target)?;
        }
        if self.npars > 0 {
            write!(f, " in={:?}", self.input_positions)?;
            if !self.output_positions.is_empty() {
                write!(f, " out={:?}", self.output_positions)?;
            }
            if self.optional_count > 0 {
                write!(f, " optional={}", self.optional_count)?;
            }
        }
        if !self.input_keywords.is_empty() {
            write!(f, " inkeys=[{}]", self.input_keywords.join(", "))?;
        }
        if !self.output_keywords.is_empty() {
            write!(f, " outkeys=[{}]", self.output_keywords.join(", "))?;
        }
        if self.readonly {
            write!(f, " (read-only)")?;
        }
        Ok(())
    }
}

/// Unvalidated routine description; [`RoutineSignature::build`] checks it.
#[derive(Debug, Clone, Default)]
pub struct RoutineSignature {
    name: String,
    target: Option<String>,
    is_function: bool,
    inputs: Vec<usize>,
    outputs: Vec<usize>,
    optional: i64,
    input_keywords: Vec<String>,
    output_keywords: Vec<String>,
    call_override: Option<CallOverride>,
    extra_code: Vec<String>,
    readonly: bool,
}

impl RoutineSignature {
    /// A routine that returns a value and has no outputs
    pub fn function(name: impl Into<String>) -> Self {
        RoutineSignature {
            name: name.into(),
            is_function: true,
            ..Default::default()
        }
    }

    /// A routine that may return values through output parameters/keywords
    pub fn procedure(name: impl Into<String>) -> Self {
        RoutineSignature {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// 1-based positions with the input role
    pub fn inputs(mut self, positions: impl IntoIterator<Item = usize>) -> Self {
        self.inputs.extend(positions);
        self
    }

    /// 1-based positions with the output role
    pub fn outputs(mut self, positions: impl IntoIterator<Item = usize>) -> Self {
        self.outputs.extend(positions);
        self
    }

    /// Number of trailing optional positions; negative values count as 0
    pub fn optional(mut self, count: i64) -> Self {
        self.optional = count;
        self
    }

    pub fn input_keywords<S: AsRef<str>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.input_keywords
            .extend(keywords.into_iter().map(|k| k.as_ref().to_string()));
        self
    }

    pub fn output_keywords<S: AsRef<str>>(
        mut self,
        keywords: impl IntoIterator<Item = S>,
    ) -> Self {
        self.output_keywords
            .extend(keywords.into_iter().map(|k| k.as_ref().to_string()));
        self
    }

    pub fn call_override(mut self, strategy: CallOverride) -> Self {
        self.call_override = Some(strategy);
        self
    }

    pub fn extra_code(mut self, code: impl Into<String>) -> Self {
        self.extra_code.push(code.into());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Validate the description and produce an immutable mapping.
    pub fn build(self) -> Result<RoutineMapping, MapError> {
        let invalid = |reason: &str| MapError::InvalidSignature {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.is_function && !self.outputs.is_empty() {
            return Err(invalid("functions cannot have output parameters"));
        }
        if self.is_function && !self.output_keywords.is_empty() {
            return Err(invalid("functions cannot have output keywords"));
        }
        if let Some(strategy) = &self.call_override {
            strategy
                .validate()
                .map_err(|e| invalid(&format!("malformed call override: {}", e)))?;
        }

        // Each role list may name a slot once; a slot may appear in both lists
        let mut pars = self.inputs.clone();
        pars.extend(self.outputs.iter().filter(|p| !self.inputs.contains(*p)));
        pars.sort_unstable();
        let npars = pars.len();
        if !pars.iter().copied().eq(1..=npars) || has_duplicates(&self.outputs) {
            return Err(invalid(&format!(
                "incomplete or invalid parameter list: {:?}",
                pars
            )));
        }

        let optional_count = usize::try_from(self.optional.max(0))
            .unwrap_or(0)
            .min(npars);

        let input_keywords = fold_unique(&self.input_keywords);
        let output_keywords = fold_unique(&self.output_keywords);
        let mut all_keywords = input_keywords.clone();
        all_keywords.extend(
            output_keywords
                .iter()
                .filter(|k| !input_keywords.contains(k))
                .cloned(),
        );

        Ok(RoutineMapping {
            input_positions: self.inputs.iter().copied().collect(),
            output_positions: self.outputs.iter().copied().collect(),
            name: self.name,
            target: self.target,
            is_function: self.is_function,
            npars,
            optional_count,
            input_keywords,
            output_keywords,
            all_keywords,
            call_override: self.call_override,
            extra_code: self.extra_code,
            readonly: self.readonly,
        })
    }
}

fn has_duplicates(positions: &[usize]) -> bool {
    let mut seen = BTreeSet::new();
    !positions.iter().all(|p| seen.insert(*p))
}

fn fold_unique(keywords: &[String]) -> Vec<String> {
    let mut folded: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = fold_case(keyword);
        if !folded.contains(&keyword) {
            folded.push(keyword);
        }
    }
    folded
}

pub type RoutineRegistry = Registry<RoutineMapping>;
