//! Search-provider document records
//!
//! The provider owns these shapes; every field the envelope may omit is
//! optional or defaulted here so shape drift stays at this boundary.

use serde::{Deserialize, Serialize};

/// Highlighted snippets returned by the search provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Highlight {
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub content: Vec<String>,
}

/// One news document as returned by the search provider
///
/// Read-only from the core's perspective except for `relevance_score`,
/// a derived field used only for in-process ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub news_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Provider deep-link, used when `url` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_link_page: Option<String>,
    /// Raw provider relevance score (roughly 0..100)
    #[serde(rename = "_score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,
    /// Derived in-process ranking score, never sent back to the provider
    #[serde(skip)]
    pub relevance_score: f64,
}

impl NewsArticle {
    /// Body text: full content when present, else the summary
    pub fn body_text(&self) -> &str {
        if self.content.is_empty() {
            &self.summary
        } else {
            &self.content
        }
    }

    /// Lowercase title + body for keyword matching
    pub fn full_text_lower(&self) -> String {
        format!("{} {}", self.title, self.body_text()).to_lowercase()
    }
}

/// One page of search results from the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub documents: Vec<NewsArticle>,
    #[serde(default)]
    pub total_hits: u64,
}

/// Terminal outcome of the retrieval cascade
#[derive(Debug, Clone, Default)]
pub struct RetrievalOutcome {
    /// Accepted documents in stage order, deduplicated and truncated
    pub documents: Vec<NewsArticle>,
    /// Total merged documents before truncation
    pub total_hits: usize,
    /// True only when every stage and the fallback produced nothing
    pub failed: bool,
    /// Human-readable failure message embedding the original question
    pub error_message: Option<String>,
    /// Per-stage attempt log for the search-strategy echo
    pub attempts: Vec<String>,
}

impl RetrievalOutcome {
    pub fn failure(message: String) -> Self {
        Self {
            failed: true,
            error_message: Some(message),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_text_falls_back_to_summary() {
        let article = NewsArticle {
            summary: "요약문".to_string(),
            ..Default::default()
        };
        assert_eq!(article.body_text(), "요약문");

        let article = NewsArticle {
            content: "본문".to_string(),
            summary: "요약문".to_string(),
            ..Default::default()
        };
        assert_eq!(article.body_text(), "본문");
    }

    #[test]
    fn test_full_text_lower() {
        let article = NewsArticle {
            title: "Samsung HBM".to_string(),
            content: "AI Chips".to_string(),
            ..Default::default()
        };
        assert_eq!(article.full_text_lower(), "samsung hbm ai chips");
    }

    #[test]
    fn test_deserialize_sparse_document() {
        let article: NewsArticle =
            serde_json::from_str(r#"{"news_id":"n1","title":"제목","_score":87.5}"#).unwrap();
        assert_eq!(article.news_id, "n1");
        assert_eq!(article.score, Some(87.5));
        assert!(article.url.is_none());
        assert_eq!(article.relevance_score, 0.0);
    }

    #[test]
    fn test_retrieval_outcome_failure() {
        let outcome = RetrievalOutcome::failure("none found".to_string());
        assert!(outcome.failed);
        assert!(outcome.documents.is_empty());
        assert_eq!(outcome.error_message.as_deref(), Some("none found"));
    }
}
