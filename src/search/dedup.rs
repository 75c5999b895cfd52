//! Document deduplication by provider identity
//!
//! `news_id` is unique within any merged result set. Documents with an
//! empty id cannot be deduplicated and are kept as-is — including
//! against each other. That asymmetry is a documented edge case of the
//! provider contract, not something to silently fix.

use crate::types::NewsArticle;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct Deduplicator;

impl Deduplicator {
    pub fn new() -> Self {
        Self
    }

    /// Remove `new_docs` entries whose id already appears in `existing`
    pub fn dedupe_against<'a>(
        &self,
        new_docs: Vec<NewsArticle>,
        existing: impl IntoIterator<Item = &'a NewsArticle>,
    ) -> Vec<NewsArticle> {
        let existing_ids: HashSet<&str> =
            existing.into_iter().map(|doc| doc.news_id.as_str()).collect();

        new_docs
            .into_iter()
            .filter(|doc| !existing_ids.contains(doc.news_id.as_str()))
            .collect()
    }

    /// Single pass keeping the first occurrence of each non-empty id
    pub fn dedupe_all(&self, documents: Vec<NewsArticle>) -> Vec<NewsArticle> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut deduplicated = Vec::with_capacity(documents.len());

        for doc in documents {
            if doc.news_id.is_empty() {
                // empty ids are not dedupe-able, keep every one
                deduplicated.push(doc);
                continue;
            }
            if seen.insert(doc.news_id.clone()) {
                deduplicated.push(doc);
            }
        }

        deduplicated
    }
}
