//! Localized text lookup
use color_eyre::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

const ENGLISH: &str = include_str!("../.config/locales/en.json5");

/// Resolves label and description keys to display strings.
///
/// Unknown keys resolve to the key itself so a missing entry is visible
/// rather than blank.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    /// Built-in English catalog
    pub fn english() -> Self {
        match json5::from_str::<HashMap<String, String>>(ENGLISH) {
            Ok(entries) => Self { entries },
            Err(e) => {
                warn!("Embedded English catalog is invalid: {e}");
                Self::default()
            }
        }
    }

    /// English catalog with entries from the file at `path` layered on top
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let overrides: HashMap<String, String> = json5::from_str(&content)?;
        let mut catalog = Self::english();
        catalog.entries.extend(overrides);
        Ok(catalog)
    }

    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Look up `key` and substitute `{name}` placeholders
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.text(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
