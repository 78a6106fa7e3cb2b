//! # Entity Index Core
//!
//! The entity resolution and relevance-scoring engine, free of tokio,
//! sqlx and filesystem-bound storage:
//!
//! ```text
//! Recognizer ─▶ MentionFilter ─▶ FieldScorer ─▶ aggregate_document
//!                                                      │ (per document, parallelizable)
//!                                                      ▼
//!                                   CatalogBuilder (ascending document ids)
//!                                                      │
//!                                                      ▼
//!                                  CatalogStore ─▶ EntityIndex (export)
//! ```

pub mod aggregate;
pub mod catalog;
pub mod engine;
pub mod export;
pub mod filter;
pub mod models;
pub mod recognize;
pub mod scorer;
pub mod store;
