//! Document aggregator: one relevance record per entity per document.
//!
//! Fields are visited in [`FieldName`] order; an entity's record is created
//! the first time it appears, so record order is (first field, first
//! mention). Identity resolution relies on this order being stable.

use std::collections::HashMap;

use crate::models::{EntityKey, FieldMap, FieldName, FieldPresence};
use crate::scorer::FieldScorer;

/// Relevance of one entity within one document.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRelevance {
    pub key: EntityKey,
    pub score: f64,
    pub presence: FieldPresence,
    /// Raw per-field occurrence counts (uncapped).
    pub occurrences: FieldMap<u32>,
}

/// Aggregated entities of one document, in first-seen order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentEntities {
    pub document_id: i64,
    pub entities: Vec<EntityRelevance>,
}

impl DocumentEntities {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Merge the field contributions of one document.
///
/// `fields` holds the accepted mentions of each field, duplicates kept.
pub fn aggregate_document(
    scorer: &FieldScorer,
    document_id: i64,
    fields: &FieldMap<Vec<EntityKey>>,
) -> DocumentEntities {
    let mut slots: HashMap<EntityKey, usize> = HashMap::new();
    let mut entities: Vec<EntityRelevance> = Vec::new();

    for (field, mentions) in fields.iter() {
        for c in scorer.score_field(field, mentions) {
            let i = *slots.entry(c.key.clone()).or_insert_with(|| {
                entities.push(EntityRelevance {
                    key: c.key.clone(),
                    score: 0.0,
                    presence: FieldPresence::default(),
                    occurrences: FieldMap::default(),
                });
                entities.len() - 1
            });
            let rel = &mut entities[i];
            rel.score += c.contribution;
            rel.presence[field] = true;
            rel.occurrences[field] = c.occurrences;
        }
    }

    DocumentEntities {
        document_id,
        entities,
    }
}

/// Recompute a record's score from its occurrence counts.
///
/// Fields without presence contribute nothing.
pub fn expected_score(scorer: &FieldScorer, rel: &EntityRelevance) -> f64 {
    FieldName::ALL
        .iter()
        .filter(|f| rel.presence[**f])
        .map(|f| scorer.weigh(*f, rel.occurrences[*f]))
        .sum()
}
