//! Field scorer: weighted, capped contribution of each entity in one field.

use std::collections::HashMap;

use crate::models::{EntityKey, FieldName, FieldWeights};

/// Scoring parameters, fixed for a whole build.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub weights: FieldWeights,
    /// Maximum per-field occurrence count used in scoring.
    pub appearance_cap: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: FieldWeights::defaults(),
            appearance_cap: 3,
        }
    }
}

/// One entity's contribution from one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldContribution {
    pub key: EntityKey,
    /// Raw occurrence count within the field, before capping.
    pub occurrences: u32,
    pub contribution: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FieldScorer {
    config: ScoringConfig,
}

impl FieldScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// `weight[field] * min(occurrences, cap)`.
    pub fn weigh(&self, field: FieldName, occurrences: u32) -> f64 {
        self.config.weights[field] * f64::from(occurrences.min(self.config.appearance_cap))
    }

    /// Collapse the accepted mentions of one field into one contribution
    /// per `(name, type)`, in first-seen order.
    pub fn score_field(&self, field: FieldName, mentions: &[EntityKey]) -> Vec<FieldContribution> {
        let mut slots: HashMap<&EntityKey, usize> = HashMap::new();
        let mut counts: Vec<(&EntityKey, u32)> = Vec::new();

        for key in mentions {
            match slots.get(key) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    slots.insert(key, counts.len());
                    counts.push((key, 1));
                }
            }
        }

        counts
            .into_iter()
            .map(|(key, occurrences)| FieldContribution {
                key: key.clone(),
                occurrences,
                contribution: self.weigh(field, occurrences),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityType;

    fn acme() -> EntityKey {
        EntityKey::new("Acme Corp", EntityType::Organization)
    }

    #[test]
    fn repeated_mentions_are_capped() {
        let scorer = FieldScorer::default();
        let mentions = vec![acme(); 10];
        let out = scorer.score_field(FieldName::WhatHappened, &mentions);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].occurrences, 10);
        assert_eq!(out[0].contribution, 4.0 * 3.0);
    }

    #[test]
    fn below_cap_counts_each_mention() {
        let scorer = FieldScorer::default();
        let out = scorer.score_field(FieldName::Title, &[acme(), acme()]);
        assert_eq!(out[0].contribution, 2.0 * 2.0);
    }

    #[test]
    fn same_name_different_type_stays_distinct() {
        let scorer = FieldScorer::default();
        let jordan_person = EntityKey::new("Jordan", EntityType::Person);
        let jordan_place = EntityKey::new("Jordan", EntityType::Location);
        let out = scorer.score_field(
            FieldName::Body,
            &[jordan_person.clone(), jordan_place.clone(), jordan_person.clone()],
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].key, jordan_person);
        assert_eq!(out[0].occurrences, 2);
        assert_eq!(out[1].key, jordan_place);
        assert_eq!(out[1].occurrences, 1);
    }

    #[test]
    fn first_seen_order() {
        let scorer = FieldScorer::default();
        let a = EntityKey::new("Beta Inc", EntityType::Organization);
        let b = EntityKey::new("Alpha Inc", EntityType::Organization);
        let out = scorer.score_field(FieldName::Body, &[a.clone(), b.clone(), a.clone()]);
        let keys: Vec<_> = out.iter().map(|c| c.key.clone()).collect();
        assert_eq!(keys, vec![a, b]);
    }

    #[test]
    fn custom_cap_and_weight() {
        let mut config = ScoringConfig::default();
        config.appearance_cap = 1;
        config.weights[FieldName::Body] = 0.5;
        let scorer = FieldScorer::new(config);
        let out = scorer.score_field(FieldName::Body, &vec![acme(); 4]);
        assert_eq!(out[0].contribution, 0.5);
    }

    #[test]
    fn empty_field_yields_nothing() {
        let scorer = FieldScorer::default();
        assert!(scorer.score_field(FieldName::Section, &[]).is_empty());
    }
}
