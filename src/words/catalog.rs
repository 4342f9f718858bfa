use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

/// One selectable dataset: `key` is what the CLI and the drop-down use,
/// `file` is relative to the data directory.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TextEntry {
    pub key: String,
    pub file: String,
    pub name: String,
}

impl TextEntry {
    fn new(key: &str, file: &str, name: &str) -> Self {
        Self {
            key: key.to_owned(),
            file: file.to_owned(),
            name: name.to_owned(),
        }
    }
}

/// Never empty; the first entry is the fallback for unknown keys.
#[derive(Clone, Debug)]
pub struct Catalog {
    entries: Vec<TextEntry>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                TextEntry::new("All", "total_wordfreq.csv", "All Schools"),
                TextEntry::new("Harvard", "harvard.csv", "Harvard"),
                TextEntry::new("Boston College", "bostoncollege.csv", "Boston College"),
                TextEntry::new("Brown", "brown.csv", "Brown University"),
                TextEntry::new("Claremont", "Claremont.csv", "Claremont Colleges"),
                TextEntry::new("Cornell", "cornell.csv", "Cornell University"),
                TextEntry::new("Columbia", "Columbia.csv", "Columbia University"),
                TextEntry::new(
                    "UW-Madison",
                    "madison.csv",
                    "University of Wisconsin-Madison",
                ),
                TextEntry::new(
                    "MIT",
                    "mit.csv",
                    "Massachusetts Institute of Technology",
                ),
                TextEntry::new("UChicago", "uchicago.csv", "University of Chicago"),
                TextEntry::new("Wellesley", "wellesley.csv", "Wellesley College"),
                TextEntry::new(
                    "WashU",
                    "washU.csv",
                    "Washington University in St. Louis",
                ),
                TextEntry::new("Yale", "yale.csv", "Yale University"),
            ],
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let entries: Vec<TextEntry> =
            serde_json::from_str(raw).context("invalid text catalog JSON")?;
        if entries.is_empty() {
            return Err(anyhow!("text catalog has no entries"));
        }
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read text catalog {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    pub fn entries(&self) -> &[TextEntry] {
        &self.entries
    }

    pub fn resolve(&self, key: &str) -> &TextEntry {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .unwrap_or(&self.entries[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_fall_back_to_the_first_text() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.resolve("MIT").file, "mit.csv");
        assert_eq!(catalog.resolve("nowhere").key, "All");
        assert_eq!(catalog.resolve("").key, "All");
    }

    #[test]
    fn parses_json_catalogs() {
        let catalog = Catalog::from_json_str(
            r#"[{"key": "poems", "file": "poems.csv", "name": "Collected Poems"}]"#,
        )
        .expect("valid catalog");
        assert_eq!(catalog.entries().len(), 1);
        assert_eq!(catalog.resolve("anything").name, "Collected Poems");
    }

    #[test]
    fn rejects_empty_or_invalid_catalogs() {
        assert!(Catalog::from_json_str("[]").is_err());
        assert!(Catalog::from_json_str(r#"[{"key": "x"}]"#).is_err());
    }
}
