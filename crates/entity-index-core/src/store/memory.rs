//! In-memory [`CatalogStore`] for tests.
//!
//! Holds the whole catalog behind one `RwLock`; a replace swaps it in a
//! single write, so readers never see one table without the other.

use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::catalog::Catalog;

use super::{summarize, CatalogStore, CatalogSummary, EntityAggregate};

#[derive(Default)]
pub struct InMemoryCatalogStore {
    catalog: RwLock<Catalog>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored catalog.
    pub fn snapshot(&self) -> Result<Catalog> {
        self.catalog
            .read()
            .map(|c| c.clone())
            .map_err(|_| anyhow!("catalog lock poisoned"))
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn replace_catalog(&self, catalog: &Catalog) -> Result<()> {
        catalog.check_integrity()?;
        let mut stored = self
            .catalog
            .write()
            .map_err(|_| anyhow!("catalog lock poisoned"))?;
        *stored = catalog.clone();
        Ok(())
    }

    async fn entity_aggregates(&self) -> Result<Vec<EntityAggregate>> {
        let catalog = self.snapshot()?;

        let mut per_entity: BTreeMap<i64, (f64, Vec<i64>)> = BTreeMap::new();
        for r in &catalog.relations {
            let slot = per_entity.entry(r.entity_id).or_default();
            slot.0 += r.score;
            slot.1.push(r.document_id);
        }

        Ok(catalog
            .entities
            .iter()
            .filter(|e| e.active)
            .map(|e| {
                let (total_score, mut document_ids) =
                    per_entity.remove(&e.id).unwrap_or_default();
                document_ids.sort_unstable();
                EntityAggregate {
                    id: e.id,
                    name: e.name.clone(),
                    entity_type: e.entity_type,
                    document_count: document_ids.len() as i64,
                    total_score,
                    document_ids,
                }
            })
            .collect())
    }

    async fn summary(&self, top_n: usize) -> Result<CatalogSummary> {
        let catalog = self.snapshot()?;
        Ok(summarize(
            &catalog.entities,
            catalog.relations.len() as i64,
            top_n,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentEntityRelation, Entity, EntityType, FieldPresence};

    fn catalog() -> Catalog {
        let entity = |id: i64, name: &str, count: i64| Entity {
            id,
            name: name.to_string(),
            entity_type: EntityType::Organization,
            document_count: count,
            active: true,
        };
        let rel = |doc: i64, entity_id: i64, score: f64| DocumentEntityRelation {
            document_id: doc,
            entity_id,
            score,
            presence: FieldPresence::default(),
        };
        Catalog {
            entities: vec![entity(1, "Acme", 2), entity(2, "Globex", 1)],
            relations: vec![rel(3, 1, 4.0), rel(1, 1, 2.0), rel(3, 2, 8.0)],
        }
    }

    #[tokio::test]
    async fn replace_is_not_append() {
        let store = InMemoryCatalogStore::new();
        store.replace_catalog(&catalog()).await.unwrap();
        store.replace_catalog(&catalog()).await.unwrap();
        let s = store.summary(10).await.unwrap();
        assert_eq!(s.total_entities, 2);
        assert_eq!(s.total_relations, 3);
    }

    #[tokio::test]
    async fn invalid_catalog_leaves_store_untouched() {
        let store = InMemoryCatalogStore::new();
        store.replace_catalog(&catalog()).await.unwrap();
        let mut bad = catalog();
        bad.relations[0].entity_id = 9;
        assert!(store.replace_catalog(&bad).await.is_err());
        assert_eq!(store.snapshot().unwrap(), catalog());
    }

    #[tokio::test]
    async fn aggregates_sum_scores_and_sort_ids() {
        let store = InMemoryCatalogStore::new();
        store.replace_catalog(&catalog()).await.unwrap();
        let aggs = store.entity_aggregates().await.unwrap();
        assert_eq!(aggs.len(), 2);
        assert_eq!(aggs[0].total_score, 6.0);
        assert_eq!(aggs[0].document_ids, vec![1, 3]);
        assert_eq!(aggs[0].document_count, 2);
        assert_eq!(aggs[1].document_ids, vec![3]);
    }

    #[tokio::test]
    async fn inactive_entities_are_not_aggregated() {
        let store = InMemoryCatalogStore::new();
        let mut c = catalog();
        c.entities[1].active = false;
        store.replace_catalog(&c).await.unwrap();
        let aggs = store.entity_aggregates().await.unwrap();
        assert_eq!(aggs.len(), 1);
        assert_eq!(aggs[0].name, "Acme");
    }

    #[tokio::test]
    async fn entity_without_relations_is_aggregated_empty() {
        let store = InMemoryCatalogStore::new();
        let mut c = catalog();
        c.relations.retain(|r| r.entity_id != 2);
        c.entities[1].document_count = 0;
        store.replace_catalog(&c).await.unwrap();
        let aggs = store.entity_aggregates().await.unwrap();
        assert_eq!(aggs.len(), 2);
        assert_eq!(aggs[1].name, "Globex");
        assert!(aggs[1].document_ids.is_empty());
        assert_eq!(aggs[1].total_score, 0.0);
    }
}
