//! Ranked entity index for front-end lookup and autocomplete.
//!
//! Entities are ordered by total score, highest first; equal totals keep
//! id order. The score itself is not emitted: the ranking is carried by
//! record order.

use anyhow::Result;
use serde::Serialize;

use crate::models::EntityType;
use crate::store::EntityAggregate;

/// One exported entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(rename = "documentIds")]
    pub document_ids: Vec<i64>,
}

/// Sort aggregates by descending total score, stable on ties.
pub fn rank_entities(mut aggregates: Vec<EntityAggregate>) -> Vec<EntityAggregate> {
    aggregates.sort_by_key(|a| a.id);
    aggregates.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    aggregates
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityIndex {
    pub records: Vec<ExportRecord>,
}

impl EntityIndex {
    pub fn from_aggregates(aggregates: Vec<EntityAggregate>) -> Self {
        let records = rank_entities(aggregates)
            .into_iter()
            .map(|a| ExportRecord {
                name: a.name,
                entity_type: a.entity_type,
                document_ids: a.document_ids,
            })
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compact JSON array, no whitespace.
    pub fn to_compact_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records)?)
    }

    /// Pretty-printed JSON array.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }
}
