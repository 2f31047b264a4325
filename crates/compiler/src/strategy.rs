//! Call-site override strategies
//!
//! Most routines render as `outputs = name(inputs)`. Irregular ones
//! (argument reordering, statement forms, helper indirection) select a
//! named strategy instead. Strategies are plain data so they can be loaded
//! from a catalog; each one receives the resolved input and output argument
//! lists produced by the call-site synthesizer.

use serde::Deserialize;

/// How a routine's call site is rendered when the generic form doesn't fit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallOverride {
    /// `n_params`, the counter every generated definition binds
    NParams,
    /// `(<in0> is not None)`
    KeywordSet,
    /// `# <label>, <inputs>`: the call is dropped, kept as a comment
    Comment { label: String },
    /// `print <inputs>`
    Print,
    /// `array(<in0>, copy=False).astype(<dtype>)`
    TypeConversion { dtype: String },
    /// `zeros([<inputs reversed>], <dtype>)`: IDL dimensions are column-major
    ArrayGen { dtype: String },
    /// `array(<in0>, copy=False).<method>()`
    Method { method: String },
    /// `(<in0>)*ones([<remaining inputs reversed>])`
    Replicate,
    /// `idlwhere(<in0>[, '<in1>'])`, paired with the `idlwhere` helper
    Where,
    /// Free-form text with `{inputs}`, `{outputs}`, `{inN}`, `{outN}`
    Template { text: String },
}

impl CallOverride {
    pub fn template(text: impl Into<String>) -> Self {
        CallOverride::Template { text: text.into() }
    }

    /// Render the call from the synthesizer's argument lists.
    ///
    /// Fails only for a template with an unknown or unbalanced placeholder.
    pub fn render(&self, inputs: &[String], outputs: &[String]) -> Result<String, String> {
        let rendered = match self {
            CallOverride::NParams => "n_params".to_string(),
            CallOverride::KeywordSet => format!("({} is not None)", arg(inputs, 0)),
            CallOverride::Comment { label } => {
                if inputs.is_empty() {
                    format!("# {}", label)
                } else {
                    format!("# {}, {}", label, inputs.join(", "))
                }
            }
            CallOverride::Print => {
                if inputs.is_empty() {
                    "print".to_string()
                } else {
                    format!("print {}", inputs.join(", "))
                }
            }
            CallOverride::TypeConversion { dtype } => {
                format!("array({}, copy=False).astype({})", arg(inputs, 0), dtype)
            }
            CallOverride::ArrayGen { dtype } => {
                format!("zeros([{}], {})", reversed(inputs), dtype)
            }
            CallOverride::Method { method } => {
                format!("array({}, copy=False).{}()", arg(inputs, 0), method)
            }
            CallOverride::Replicate => {
                let dims = inputs.get(1..).unwrap_or_default();
                format!("({})*ones([{}])", arg(inputs, 0), reversed(dims))
            }
            CallOverride::Where => match inputs.get(1) {
                Some(count) => format!("idlwhere({}, '{}')", arg(inputs, 0), count),
                None => format!("idlwhere({})", arg(inputs, 0)),
            },
            CallOverride::Template { text } => expand(text, inputs, outputs)?,
        };
        Ok(rendered)
    }

    /// Check that a template only uses known placeholders.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            CallOverride::Template { text } => expand(text, &[], &[]).map(|_| ()),
            _ => Ok(()),
        }
    }
}

fn arg(list: &[String], index: usize) -> &str {
    list.get(index).map(String::as_str).unwrap_or_default()
}

fn reversed(list: &[String]) -> String {
    list.iter()
        .rev()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn expand(text: &str, inputs: &[String], outputs: &[String]) -> Result<String, String> {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                result.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                result.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => return Err(format!("unterminated placeholder in '{}'", text)),
                    }
                }
                result.push_str(&placeholder(&name, inputs, outputs)?);
            }
            '}' => return Err(format!("unmatched '}}' in '{}'", text)),
            _ => result.push(c),
        }
    }
    Ok(result)
}

fn placeholder(name: &str, inputs: &[String], outputs: &[String]) -> Result<String, String> {
    match name {
        "inputs" => return Ok(inputs.join(", ")),
        "outputs" => return Ok(outputs.join(", ")),
        _ => {}
    }
    let indexed = name
        .strip_prefix("out")
        .map(|n| (outputs, n))
        .or_else(|| name.strip_prefix("in").map(|n| (inputs, n)));
    match indexed {
        Some((list, digits)) if !digits.is_empty() => digits
            .parse::<usize>()
            .map(|i| arg(list, i).to_string())
            .map_err(|_| format!("unknown placeholder '{{{}}}'", name)),
        _ => Err(format!("unknown placeholder '{{{}}}'", name)),
    }
}
