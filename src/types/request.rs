//! Concierge request surface

use crate::errors::{ConciergeError, Result};
use serde::{Deserialize, Serialize};

/// Answer verbosity requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Brief,
    Detailed,
    Comprehensive,
}

impl Default for DetailLevel {
    fn default() -> Self {
        DetailLevel::Detailed
    }
}

/// One concierge request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConciergeRequest {
    /// Free-form user question (2..=500 chars)
    pub question: String,
    /// Search window start (YYYY-MM-DD); defaults to 7 days back
    #[serde(default)]
    pub date_from: Option<String>,
    /// Search window end (YYYY-MM-DD); defaults to tomorrow
    #[serde(default)]
    pub date_to: Option<String>,
    /// Retrieval quota (5..=50)
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
    #[serde(default = "default_true")]
    pub include_related_keywords: bool,
    #[serde(default = "default_true")]
    pub include_today_issues: bool,
    #[serde(default = "default_true")]
    pub include_related_questions: bool,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

fn default_max_articles() -> usize {
    10
}

fn default_true() -> bool {
    true
}

impl ConciergeRequest {
    /// Request with defaults for everything but the question
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            date_from: None,
            date_to: None,
            max_articles: default_max_articles(),
            include_related_keywords: true,
            include_today_issues: true,
            include_related_questions: true,
            detail_level: DetailLevel::default(),
        }
    }

    /// Validate field bounds
    pub fn validate(&self) -> Result<()> {
        let question_len = self.question.chars().count();
        if !(2..=500).contains(&question_len) {
            return Err(ConciergeError::InvalidRequest(format!(
                "question length {} outside 2..=500",
                question_len
            )));
        }
        if !(5..=50).contains(&self.max_articles) {
            return Err(ConciergeError::InvalidRequest(format!(
                "max_articles {} outside 5..=50",
                self.max_articles
            )));
        }
        Ok(())
    }
}
