//! Extra code accumulation
//!
//! Some mappings only work if a helper (an import, a wrapper function) is
//! present once in the generated module. Synthesizers queue those helpers
//! here as a side effect; the driver drains the registry after the whole
//! run is translated.

/// Ordered, deduplicated collection of helper snippets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraCode {
    snippets: Vec<String>,
}

impl ExtraCode {
    pub fn new() -> Self {
        ExtraCode::default()
    }

    /// Queue snippets, keeping the first occurrence of each.
    ///
    /// Snippets are trimmed before comparison. Blank snippets are ignored.
    /// Accepts anything iterable over strings, including `Option<&str>`.
    pub fn record<I, S>(&mut self, snippets: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for snippet in snippets {
            let snippet = snippet.as_ref().trim();
            if snippet.is_empty() {
                continue;
            }
            if !self.snippets.iter().any(|s| s == snippet) {
                self.snippets.push(snippet.to_string());
            }
        }
    }

    /// Render all snippets separated by a blank line, in first-seen order.
    pub fn text(&self) -> String {
        self.snippets.join("\n\n")
    }

    /// Render all snippets and empty the registry.
    pub fn drain(&mut self) -> String {
        let text = self.text();
        self.reset();
        text
    }

    pub fn reset(&mut self) {
        self.snippets.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.snippets.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_idempotent() {
        let mut extra = ExtraCode::new();
        extra.record(["import sys"]);
        extra.record(["from numpy import *"]);
        extra.record(["import sys"]);
        extra.record(["  import sys\n"]);
        assert_eq!(extra.len(), 2);
        assert_eq!(extra.text(), "import sys\n\nfrom numpy import *");
    }

    #[test]
    fn test_record_list_and_option() {
        let mut extra = ExtraCode::new();
        extra.record(vec!["a = 1".to_string(), "b = 2".to_string(), "a = 1".to_string()]);
        extra.record(None::<&str>);
        extra.record(Some(""));
        extra.record(Some("   "));
        assert_eq!(extra.iter().collect::<Vec<_>>(), vec!["a = 1", "b = 2"]);
    }

    #[test]
    fn test_drain_empties() {
        let mut extra = ExtraCode::new();
        extra.record(["x = 0"]);
        assert_eq!(extra.drain(), "x = 0");
        assert!(extra.is_empty());
        assert_eq!(extra.drain(), "");
    }

    #[test]
    fn test_reset() {
        let mut extra = ExtraCode::new();
        extra.record(["x = 0", "y = 1"]);
        extra.reset();
        assert!(extra.is_empty());
        extra.record(["y = 1"]);
        assert_eq!(extra.text(), "y = 1");
    }
}
