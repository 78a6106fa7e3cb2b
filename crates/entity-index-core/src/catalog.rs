//! Identity resolution and corpus accumulation.
//!
//! [`CatalogBuilder`] is the single ordered reduction of a build: it
//! consumes [`DocumentEntities`] in strictly ascending document-id order,
//! hands out sequential surrogate ids on first sight of a `(name, type)`
//! key, and counts the documents each entity appears in.

use std::collections::{HashMap, HashSet};

use anyhow::{bail, ensure, Result};

use crate::aggregate::DocumentEntities;
use crate::models::{DocumentEntityRelation, Entity, EntityKey, EntityType};

/// Maps natural keys to surrogate ids in first-seen order, starting at 1.
#[derive(Debug, Default)]
pub struct IdentityResolver {
    ids: HashMap<EntityKey, i64>,
    keys: Vec<EntityKey>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `key`, assigning the next unused one if the key is new.
    pub fn resolve(&mut self, key: &EntityKey) -> i64 {
        if let Some(&id) = self.ids.get(key) {
            return id;
        }
        self.keys.push(key.clone());
        let id = self.keys.len() as i64;
        self.ids.insert(key.clone(), id);
        id
    }

    pub fn get(&self, key: &EntityKey) -> Option<i64> {
        self.ids.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in id order.
    pub fn keys(&self) -> &[EntityKey] {
        &self.keys
    }
}

/// Distinct-document counts per entity id.
#[derive(Debug, Default)]
pub struct CorpusAccumulator {
    counts: Vec<i64>,
}

impl CorpusAccumulator {
    /// Count one more document for `entity_id`.
    pub fn record(&mut self, entity_id: i64) {
        let i = (entity_id - 1) as usize;
        if self.counts.len() <= i {
            self.counts.resize(i + 1, 0);
        }
        self.counts[i] += 1;
    }

    pub fn document_count(&self, entity_id: i64) -> i64 {
        self.counts
            .get((entity_id - 1) as usize)
            .copied()
            .unwrap_or(0)
    }
}

/// The complete result of a build: catalog rows plus relation rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    pub entities: Vec<Entity>,
    pub relations: Vec<DocumentEntityRelation>,
}

impl Catalog {
    /// Verify the invariants every persisted catalog must hold.
    pub fn check_integrity(&self) -> Result<()> {
        let mut keys: HashSet<(&str, EntityType)> = HashSet::new();
        for (i, e) in self.entities.iter().enumerate() {
            ensure!(
                e.id == i as i64 + 1,
                "entity ids must be sequential from 1: found {} at position {}",
                e.id,
                i
            );
            ensure!(
                keys.insert((e.name.as_str(), e.entity_type)),
                "duplicate entity key ({}, {})",
                e.name,
                e.entity_type
            );
        }

        let mut pairs: HashSet<(i64, i64)> = HashSet::new();
        let mut counts: HashMap<i64, i64> = HashMap::new();
        for r in &self.relations {
            if r.entity_id < 1 || r.entity_id > self.entities.len() as i64 {
                bail!(
                    "relation (document {}, entity {}) references a missing entity",
                    r.document_id,
                    r.entity_id
                );
            }
            ensure!(
                pairs.insert((r.document_id, r.entity_id)),
                "duplicate relation (document {}, entity {})",
                r.document_id,
                r.entity_id
            );
            *counts.entry(r.entity_id).or_insert(0) += 1;
        }

        for e in &self.entities {
            let actual = counts.get(&e.id).copied().unwrap_or(0);
            ensure!(
                e.document_count == actual,
                "entity {} ({}) has document_count {} but {} relation rows",
                e.id,
                e.name,
                e.document_count,
                actual
            );
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CatalogBuilder {
    resolver: IdentityResolver,
    accumulator: CorpusAccumulator,
    relations: Vec<DocumentEntityRelation>,
    last_document: Option<i64>,
    documents: u64,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one document's entities into the catalog.
    ///
    /// Fails if `doc.document_id` is not greater than the previous one.
    pub fn add_document(&mut self, doc: DocumentEntities) -> Result<()> {
        if let Some(last) = self.last_document {
            ensure!(
                doc.document_id > last,
                "documents must arrive in ascending id order: {} after {}",
                doc.document_id,
                last
            );
        }
        self.last_document = Some(doc.document_id);
        self.documents += 1;

        for rel in doc.entities {
            let entity_id = self.resolver.resolve(&rel.key);
            self.accumulator.record(entity_id);
            self.relations.push(DocumentEntityRelation {
                document_id: doc.document_id,
                entity_id,
                score: rel.score,
                presence: rel.presence,
            });
        }
        Ok(())
    }

    /// Number of documents folded so far.
    pub fn documents(&self) -> u64 {
        self.documents
    }

    /// Number of distinct entities discovered so far.
    pub fn entity_count(&self) -> usize {
        self.resolver.len()
    }

    pub fn finish(self) -> Catalog {
        let accumulator = self.accumulator;
        let entities = self
            .resolver
            .keys
            .into_iter()
            .enumerate()
            .map(|(i, key)| {
                let id = i as i64 + 1;
                Entity {
                    id,
                    name: key.name,
                    entity_type: key.entity_type,
                    document_count: accumulator.document_count(id),
                    active: true,
                }
            })
            .collect();

        Catalog {
            entities,
            relations: self.relations,
        }
    }
}
