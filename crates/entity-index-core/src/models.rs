//! Core data models shared by the engine, the stores, and the exporter.
//!
//! The document field set is closed: every per-field value (weights,
//! presence flags, occurrence counts, texts) lives in a [`FieldMap`]
//! indexed by [`FieldName`] rather than in a dynamic map.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Coarse semantic type of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Organization,
    Location,
    Product,
    Event,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Person,
        EntityType::Organization,
        EntityType::Location,
        EntityType::Product,
        EntityType::Event,
    ];

    /// Canonical lowercase name, as stored and exported.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Organization => "organization",
            EntityType::Location => "location",
            EntityType::Product => "product",
            EntityType::Event => "event",
        }
    }

    /// Map a recognizer label to an entity type.
    ///
    /// Accepts the canonical names and the OntoNotes labels emitted by
    /// common NER models (`PERSON`, `ORG`, `GPE`, `PRODUCT`, `EVENT`).
    /// Everything else (`DATE`, `LOC`, `NORP`, ...) returns `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "person" | "PERSON" => Some(EntityType::Person),
            "organization" | "ORG" => Some(EntityType::Organization),
            "location" | "GPE" => Some(EntityType::Location),
            "product" | "PRODUCT" => Some(EntityType::Product),
            "event" | "EVENT" => Some(EntityType::Event),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The document fields considered for scoring, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    WhatHappened,
    Section,
    WhyItMatters,
    Title,
    Body,
}

impl FieldName {
    pub const COUNT: usize = 5;

    pub const ALL: [FieldName; FieldName::COUNT] = [
        FieldName::WhatHappened,
        FieldName::Section,
        FieldName::WhyItMatters,
        FieldName::Title,
        FieldName::Body,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::WhatHappened => "what_happened",
            FieldName::Section => "section",
            FieldName::WhyItMatters => "why_it_matters",
            FieldName::Title => "title",
            FieldName::Body => "body",
        }
    }

    /// Weight used when the configuration does not override it.
    pub fn default_weight(self) -> f64 {
        match self {
            FieldName::WhatHappened => 4.0,
            FieldName::Section => 3.0,
            FieldName::WhyItMatters => 3.0,
            FieldName::Title => 2.0,
            FieldName::Body => 2.0,
        }
    }
}

/// Fixed-size record holding one value per [`FieldName`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMap<T>([T; FieldName::COUNT]);

impl<T> FieldMap<T> {
    pub fn from_fn(mut f: impl FnMut(FieldName) -> T) -> Self {
        FieldMap(FieldName::ALL.map(&mut f))
    }

    /// Iterate `(field, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &T)> {
        FieldName::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T> Index<FieldName> for FieldMap<T> {
    type Output = T;

    fn index(&self, field: FieldName) -> &T {
        &self.0[field.index()]
    }
}

impl<T> IndexMut<FieldName> for FieldMap<T> {
    fn index_mut(&mut self, field: FieldName) -> &mut T {
        &mut self.0[field.index()]
    }
}

/// Per-field weights.
pub type FieldWeights = FieldMap<f64>;

/// Per-field presence flags of one entity in one document.
pub type FieldPresence = FieldMap<bool>;

impl FieldWeights {
    pub fn defaults() -> Self {
        FieldMap::from_fn(FieldName::default_weight)
    }
}

impl FieldPresence {
    pub fn any(&self) -> bool {
        self.values().any(|p| *p)
    }
}

/// A document as supplied by the document source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub id: i64,
    pub fields: FieldMap<Option<String>>,
}

impl Document {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            fields: FieldMap::default(),
        }
    }

    pub fn with_field(mut self, field: FieldName, text: impl Into<String>) -> Self {
        self.fields[field] = Some(text.into());
        self
    }

    /// Field text, or `None` when absent or blank.
    pub fn text(&self, field: FieldName) -> Option<&str> {
        self.fields[field]
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

/// A mention as returned by a recognizer, before filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMention {
    pub text: String,
    pub label: String,
}

impl RawMention {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Recognizer output for every field of one document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecognizedDocument {
    pub id: i64,
    pub mentions: FieldMap<Vec<RawMention>>,
}

/// Natural key of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub name: String,
    pub entity_type: EntityType,
}

impl EntityKey {
    pub fn new(name: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            name: name.into(),
            entity_type,
        }
    }
}

/// A catalog row.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: i64,
    pub name: String,
    pub entity_type: EntityType,
    pub document_count: i64,
    pub active: bool,
}

/// Relevance of one entity to one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEntityRelation {
    pub document_id: i64,
    pub entity_id: i64,
    pub score: f64,
    pub presence: FieldPresence,
}
