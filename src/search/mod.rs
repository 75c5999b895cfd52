//! Cascading retrieval subsystem
//!
//! Query construction (synonym expansion), the five-stage search
//! cascade, relevance filtering, and deduplication.

pub mod cascade;
pub mod dedup;
pub mod filter;
pub mod related;
pub mod synonyms;

pub use cascade::{MultiStageRetriever, RetrieverConfig};
pub use dedup::Deduplicator;
pub use filter::RelevanceFilter;
pub use related::default_related_keywords;
pub use synonyms::SynonymExpander;
