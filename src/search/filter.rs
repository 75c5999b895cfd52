//! Relevance filtering and ranking for candidate documents
//!
//! Two policies over the same shape. The strict policy is intentionally
//! all-or-nothing on the top-3 keywords: the cascade supplies recall by
//! moving from AND to OR queries and widening dates, so acceptance does
//! not rely on a partial-match threshold.

use crate::types::NewsArticle;
use tracing::{info, warn};

/// Keyword-based document filter
#[derive(Debug, Clone, Default)]
pub struct RelevanceFilter;

impl RelevanceFilter {
    pub fn new() -> Self {
        Self
    }

    /// Strict policy: every one of the top-3 keywords must occur
    /// (case-insensitive substring) in title+content
    ///
    /// Survivors get `relevance_score = title_matches*10 + matches*2 +
    /// provider_score/100` and are sorted descending, ties keeping
    /// provider order.
    pub fn filter_strict(&self, documents: Vec<NewsArticle>, keywords: &[String]) -> Vec<NewsArticle> {
        if documents.is_empty() || keywords.is_empty() {
            return documents;
        }

        let total = documents.len();
        let core: Vec<String> = keywords.iter().take(3).map(|k| k.to_lowercase()).collect();

        let mut filtered: Vec<NewsArticle> = Vec::new();
        for mut doc in documents {
            let title_lower = doc.title.to_lowercase();
            let full_text = doc.full_text_lower();

            let mut keyword_matches = 0usize;
            let mut title_matches = 0usize;
            for keyword in &core {
                if full_text.contains(keyword.as_str()) {
                    keyword_matches += 1;
                    if title_lower.contains(keyword.as_str()) {
                        title_matches += 1;
                    }
                }
            }

            if keyword_matches >= core.len() {
                let provider_score = doc.score.unwrap_or(0.0) / 100.0;
                doc.relevance_score =
                    title_matches as f64 * 10.0 + keyword_matches as f64 * 2.0 + provider_score;
                filtered.push(doc);
            }
        }

        // stable sort keeps provider order on ties
        filtered.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if filtered.is_empty() {
            warn!(keywords = ?core, "strict filter matched no documents");
        } else {
            info!(
                keywords = ?core,
                selected = filtered.len(),
                total,
                "strict filter applied"
            );
        }

        filtered
    }

    /// Relaxed policy: at least ceil(K*0.5) of the top-5 keywords
    /// (minimum 1) must occur; softer score for post-hoc verification
    pub fn filter_relaxed(
        &self,
        documents: Vec<NewsArticle>,
        keywords: &[String],
    ) -> Vec<NewsArticle> {
        if documents.is_empty() || keywords.is_empty() {
            return documents;
        }

        let core: Vec<String> = keywords.iter().take(5).map(|k| k.to_lowercase()).collect();
        let threshold = (core.len() as f64 * 0.5).max(1.0);

        let mut filtered: Vec<NewsArticle> = Vec::new();
        for mut doc in documents {
            let title_lower = doc.title.to_lowercase();
            let full_text = doc.full_text_lower();

            let keyword_matches = core
                .iter()
                .filter(|k| full_text.contains(k.as_str()))
                .count();

            if keyword_matches as f64 >= threshold {
                let title_matches = core
                    .iter()
                    .filter(|k| title_lower.contains(k.as_str()))
                    .count();
                let provider_score = doc.score.unwrap_or(0.0) / 100.0;
                doc.relevance_score =
                    title_matches as f64 * 2.0 + keyword_matches as f64 + provider_score;
                filtered.push(doc);
            }
        }

        filtered.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        info!(
            keywords = ?core,
            threshold,
            selected = filtered.len(),
            "relaxed filter applied"
        );

        filtered
    }
}
