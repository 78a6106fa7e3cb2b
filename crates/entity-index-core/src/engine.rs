//! Per-document analysis: recognition, filtering, scoring, aggregation.
//!
//! Everything here is a function of one document. [`Engine::analyze_all`]
//! may fan out over a rayon pool; results keep the input order so the
//! caller can feed them to [`CatalogBuilder`](crate::catalog::CatalogBuilder)
//! in ascending document-id order.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Deserialize;

use crate::aggregate::{aggregate_document, DocumentEntities};
use crate::filter::MentionFilter;
use crate::models::{Document, EntityKey, EntityType, FieldMap, FieldName, RawMention, RecognizedDocument};
use crate::recognize::Recognizer;
use crate::scorer::{FieldScorer, ScoringConfig};

/// What a build does when the recognizer fails on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole build; nothing is written.
    #[default]
    Abort,
    /// Leave the document out and report it in the summary.
    Skip,
}

impl FailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::Skip => "skip",
        }
    }
}

/// Run the recognizer over every non-blank field of `doc`.
pub async fn recognize_document(
    recognizer: &dyn Recognizer,
    doc: &Document,
) -> Result<RecognizedDocument> {
    let mut mentions: FieldMap<Vec<RawMention>> = FieldMap::default();
    for field in FieldName::ALL {
        if let Some(text) = doc.text(field) {
            mentions[field] = recognizer.recognize(text).await.with_context(|| {
                format!(
                    "{} failed on document {} field {}",
                    recognizer.name(),
                    doc.id,
                    field.as_str()
                )
            })?;
        }
    }
    Ok(RecognizedDocument {
        id: doc.id,
        mentions,
    })
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    filter: MentionFilter,
    scorer: FieldScorer,
}

impl Engine {
    pub fn new(filter: MentionFilter, scoring: ScoringConfig) -> Self {
        Self {
            filter,
            scorer: FieldScorer::new(scoring),
        }
    }

    pub fn scorer(&self) -> &FieldScorer {
        &self.scorer
    }

    pub fn filter(&self) -> &MentionFilter {
        &self.filter
    }

    /// Keep the mentions with a known type that pass the filter.
    pub fn accept_mentions(&self, mentions: &[RawMention]) -> Vec<EntityKey> {
        mentions
            .iter()
            .filter_map(|m| {
                let entity_type = EntityType::from_label(&m.label)?;
                let name = self.filter.accept(&m.text)?;
                Some(EntityKey { name, entity_type })
            })
            .collect()
    }

    /// Filter, score and aggregate one recognized document.
    pub fn analyze(&self, doc: &RecognizedDocument) -> DocumentEntities {
        let mut fields: FieldMap<Vec<EntityKey>> = FieldMap::default();
        for (field, mentions) in doc.mentions.iter() {
            fields[field] = self.accept_mentions(mentions);
        }
        aggregate_document(&self.scorer, doc.id, &fields)
    }

    /// Analyze many documents, preserving input order.
    pub fn analyze_all(&self, docs: &[RecognizedDocument], parallel: bool) -> Vec<DocumentEntities> {
        if parallel {
            docs.par_iter().map(|d| self.analyze(d)).collect()
        } else {
            docs.iter().map(|d| self.analyze(d)).collect()
        }
    }
}
