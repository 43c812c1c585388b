//! Token sink port.
//!
//! The theme store pushes a fresh [`ThemeTokens`] into a [`TokenSink`]
//! every time the derived theme changes. Presentation code decides what a
//! push means; [`CssVariableSink`] keeps the latest set as CSS custom
//! properties.

use std::collections::BTreeMap;

use hexhue_theme::tokens::ThemeTokens;

/// Receives derived tokens.
pub trait TokenSink {
    fn apply(&mut self, tokens: &ThemeTokens);
}

impl<F: FnMut(&ThemeTokens)> TokenSink for F {
    fn apply(&mut self, tokens: &ThemeTokens) {
        self(tokens);
    }
}

/// Records the latest tokens as `--color-*` custom properties.
#[derive(Debug, Clone, Default)]
pub struct CssVariableSink {
    vars: BTreeMap<String, String>,
    pushes: usize,
}

impl CssVariableSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a custom property, e.g. `get("--color-primary")`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pushes received so far.
    #[must_use]
    pub const fn push_count(&self) -> usize {
        self.pushes
    }

    /// A `:root { ... }` block with every property, one per line.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.vars {
            css.push_str("  ");
            css.push_str(name);
            css.push_str(": ");
            css.push_str(value);
            css.push_str(";\n");
        }
        css.push('}');
        css
    }
}

impl TokenSink for CssVariableSink {
    fn apply(&mut self, tokens: &ThemeTokens) {
        self.vars = tokens.css_variables().into_iter().collect();
        self.pushes += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
