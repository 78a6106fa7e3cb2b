//! Storage abstraction for the entity catalog.
//!
//! The [`CatalogStore`] trait covers the three things a build and its
//! consumers need from persistent storage: a full, atomic replace of both
//! tables, the per-entity aggregation the exporter reads, and the summary
//! shown after a build.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::catalog::Catalog;
use crate::models::{Entity, EntityType};

/// Per-entity aggregation over the relation table.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityAggregate {
    pub id: i64,
    pub name: String,
    pub entity_type: EntityType,
    pub document_count: i64,
    pub total_score: f64,
    /// Ascending.
    pub document_ids: Vec<i64>,
}

/// Catalog overview.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogSummary {
    pub total_entities: i64,
    /// Entity count per type, largest first.
    pub by_type: Vec<(EntityType, i64)>,
    pub total_relations: i64,
    /// Top entities by document count, ties by id.
    pub top_entities: Vec<Entity>,
}

/// Build a summary from catalog rows.
pub fn summarize(entities: &[Entity], total_relations: i64, top_n: usize) -> CatalogSummary {
    let mut by_type: Vec<(EntityType, i64)> = EntityType::ALL
        .iter()
        .map(|t| {
            let n = entities.iter().filter(|e| e.entity_type == *t).count() as i64;
            (*t, n)
        })
        .filter(|(_, n)| *n > 0)
        .collect();
    by_type.sort_by(|a, b| b.1.cmp(&a.1));

    let mut top: Vec<Entity> = entities.to_vec();
    top.sort_by(|a, b| {
        b.document_count
            .cmp(&a.document_count)
            .then_with(|| a.id.cmp(&b.id))
    });
    top.truncate(top_n);

    CatalogSummary {
        total_entities: entities.len() as i64,
        by_type,
        total_relations,
        top_entities: top,
    }
}

/// Abstract storage backend for the catalog.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`replace_catalog`](CatalogStore::replace_catalog) | Discard both tables and write a new catalog, atomically |
/// | [`entity_aggregates`](CatalogStore::entity_aggregates) | Active entities with total score and document ids |
/// | [`summary`](CatalogStore::summary) | Counts, per-type breakdown, top entities |
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Replace the entity and relation tables with `catalog`.
    ///
    /// Either both tables hold the new rows afterwards or neither changed.
    async fn replace_catalog(&self, catalog: &Catalog) -> Result<()>;

    /// Aggregates for every active entity, ordered by id.
    async fn entity_aggregates(&self) -> Result<Vec<EntityAggregate>>;

    async fn summary(&self, top_n: usize) -> Result<CatalogSummary>;
}
