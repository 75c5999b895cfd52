//! External provider contracts
//!
//! The core only knows these traits; concrete reqwest adapters live in
//! the submodules and tests supply mocks. Clients are plain values
//! injected at construction time, never process-wide state.

pub mod bigkinds;
pub mod extractor;
pub mod openai;

pub use bigkinds::BigkindsClient;
pub use extractor::SimpleKeywordExtractor;
pub use openai::OpenAiGenerator;

use crate::errors::Result;
use crate::types::{SearchPage, TodayIssue};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures_util::Stream;
use std::pin::Pin;

/// Lazy, finite, non-restartable sequence of narrative text fragments
pub type TextFragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Keyword/date-ranged document search
///
/// `query` supports `AND`/`OR` infix boolean composition of terms.
#[async_trait]
pub trait NewsSearchProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        page_size: usize,
    ) -> Result<SearchPage>;

    /// Related keywords for one term, at most `max_count`
    async fn related_keywords(&self, keyword: &str, max_count: usize) -> Result<Vec<String>>;

    /// Issue ranking for one day
    async fn issue_ranking(&self, date: NaiveDate) -> Result<Vec<TodayIssue>>;
}

/// Morphological keyword extraction: ordered (keyword, weight) pairs,
/// weights descending by importance
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Vec<(String, f32)>>;
}

/// Narrative text generation, batch and streaming
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Fragments are yielded in the provider's delivery order
    async fn complete_stream(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<TextFragmentStream>;

    /// Model identifier reported in analysis metadata
    fn model(&self) -> &str;
}
