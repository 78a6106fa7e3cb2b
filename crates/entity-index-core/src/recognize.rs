//! Named-entity recognition boundary.
//!
//! The engine never tags text itself. A [`Recognizer`] turns a field's text
//! into raw `(text, label)` mentions; labels outside the
//! [`EntityType`](crate::models::EntityType) vocabulary are dropped later.
//!
//! [`GazetteerRecognizer`] is a dictionary recognizer: it finds known names
//! as whole words, preferring the longest entry when entries overlap. It is
//! fully deterministic, which makes it the natural stub for tests.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{EntityType, RawMention};

/// A source of entity mentions for a piece of text.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Short identifier used in logs and summaries.
    fn name(&self) -> &str;

    /// Recognize entity mentions in `text`, in text order.
    async fn recognize(&self, text: &str) -> Result<Vec<RawMention>>;
}

/// Gazetteer file contents: one list of names per entity type.
#[derive(Debug, Default, Deserialize)]
pub struct GazetteerFile {
    #[serde(default)]
    pub person: Vec<String>,
    #[serde(default)]
    pub organization: Vec<String>,
    #[serde(default)]
    pub location: Vec<String>,
    #[serde(default)]
    pub product: Vec<String>,
    #[serde(default)]
    pub event: Vec<String>,
}

impl GazetteerFile {
    fn into_entries(self) -> Vec<(String, EntityType)> {
        let lists = [
            (self.person, EntityType::Person),
            (self.organization, EntityType::Organization),
            (self.location, EntityType::Location),
            (self.product, EntityType::Product),
            (self.event, EntityType::Event),
        ];
        lists
            .into_iter()
            .flat_map(|(names, t)| names.into_iter().map(move |n| (n, t)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct GazetteerRecognizer {
    /// Entries sorted longest first.
    entries: Vec<(String, EntityType)>,
}

impl GazetteerRecognizer {
    pub fn new(entries: impl IntoIterator<Item = (String, EntityType)>) -> Self {
        let mut entries: Vec<(String, EntityType)> = entries
            .into_iter()
            .map(|(n, t)| (n.trim().to_string(), t))
            .filter(|(n, _)| !n.is_empty())
            .collect();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.cmp(b)));
        entries.dedup();
        Self { entries }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: GazetteerFile =
            toml::from_str(content).with_context(|| "Failed to parse gazetteer")?;
        Ok(Self::new(file.into_entries()))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read gazetteer file: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Synchronous matching used by the [`Recognizer`] impl.
    pub fn find(&self, text: &str) -> Vec<RawMention> {
        let mut claimed: Vec<(usize, usize, usize)> = Vec::new();

        for (idx, (name, _)) in self.entries.iter().enumerate() {
            for (start, m) in text.match_indices(name.as_str()) {
                let end = start + m.len();
                if !is_word_boundary(text, start, end) {
                    continue;
                }
                if claimed.iter().any(|&(s, e, _)| start < e && s < end) {
                    continue;
                }
                claimed.push((start, end, idx));
            }
        }

        claimed.sort_unstable();
        claimed
            .into_iter()
            .map(|(start, end, idx)| {
                RawMention::new(&text[start..end], self.entries[idx].1.as_str())
            })
            .collect()
    }
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

#[async_trait]
impl Recognizer for GazetteerRecognizer {
    fn name(&self) -> &str {
        "gazetteer"
    }

    async fn recognize(&self, text: &str) -> Result<Vec<RawMention>> {
        Ok(self.find(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gazetteer() -> GazetteerRecognizer {
        GazetteerRecognizer::from_toml_str(
            r#"
            person = ["Jane Doe", "Jane"]
            organization = ["Acme", "Acme Corp"]
            location = ["Paris"]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn longest_match_wins() {
        let g = gazetteer();
        let found = g.find("Acme Corp hired Jane Doe.");
        assert_eq!(
            found,
            vec![
                RawMention::new("Acme Corp", "organization"),
                RawMention::new("Jane Doe", "person"),
            ]
        );
    }

    #[test]
    fn whole_words_only() {
        let g = gazetteer();
        assert!(g.find("Acmeville and Parisian cafes").is_empty());
    }

    #[test]
    fn repeated_mentions_in_text_order() {
        let g = gazetteer();
        let found = g.find("Paris, Acme, Paris");
        let texts: Vec<_> = found.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Paris", "Acme", "Paris"]);
    }

    #[test]
    fn same_name_two_types() {
        let g = GazetteerRecognizer::new(vec![
            ("Jordan".to_string(), EntityType::Person),
            ("Jordan".to_string(), EntityType::Location),
        ]);
        // Both entries match the same span; the first sorted entry claims it.
        assert_eq!(g.find("Jordan spoke").len(), 1);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(GazetteerRecognizer::from_toml_str("person = 3").is_err());
    }

    #[tokio::test]
    async fn recognizer_trait_delegates() {
        let g = gazetteer();
        let r: &dyn Recognizer = &g;
        assert_eq!(r.name(), "gazetteer");
        assert_eq!(r.recognize("Jane went home").await.unwrap().len(), 1);
    }
}
