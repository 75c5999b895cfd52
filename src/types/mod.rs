//! Core data model for the concierge pipeline
//!
//! Wire records from the search provider, the request/response surface,
//! and the progress event shape.

pub mod article;
pub mod progress;
pub mod request;
pub mod response;

pub use article::{Highlight, NewsArticle, RetrievalOutcome, SearchPage};
pub use progress::{ConciergeProgress, ConciergeStage};
pub use request::{ConciergeRequest, DetailLevel};
pub use response::{
    AnalysisMetadata, ArticleReference, CitationRecord, ConciergeResponse, RelatedQuestion,
    SearchStrategy, TodayIssue,
};
