//! Newsdesk v0.3.0 - AI News Concierge
//!
//! Cascading news retrieval with citation-grounded narrative answers.
//!
//! # Architecture
//!
//! - **search**: five-stage retrieval cascade with relevance filtering
//!   and deduplication
//! - **citations**: reference building, marker grammar, and narrative
//!   validation/repair
//! - **concierge**: the request orchestrator and its progress event bus
//! - **providers**: trait seams over the external search, keyword, and
//!   generation services

pub mod citations;
pub mod concierge;
pub mod config;
pub mod errors;
pub mod prompts;
pub mod providers;
pub mod questions;
pub mod search;
pub mod types;

// Re-export commonly used types
pub use concierge::{ConciergeService, ProgressBus};
pub use config::ConciergeConfig;
pub use errors::{ConciergeError, Result};
pub use types::{ConciergeProgress, ConciergeRequest, ConciergeResponse, ConciergeStage};
