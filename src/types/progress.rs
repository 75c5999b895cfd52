//! Progress events emitted while a request is processed
//!
//! Events are emitted strictly in pipeline order; `Completed` and
//! `Error` are terminal.

use crate::types::response::ConciergeResponse;
use serde::{Deserialize, Serialize};

/// Pipeline stage identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConciergeStage {
    QuestionAnalysis,
    KeywordsExtracted,
    SearchStrategy,
    SearchStrategyReady,
    NewsSearch,
    NoResults,
    SearchCompleted,
    ParallelCollection,
    RelatedQuestions,
    AiAnalysis,
    AiStreaming,
    ResponseGeneration,
    Completed,
    Error,
}

impl ConciergeStage {
    /// Terminal stages end the event sequence
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConciergeStage::Completed | ConciergeStage::Error)
    }
}

/// One progress update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConciergeProgress {
    pub stage: ConciergeStage,
    /// 0..=100
    pub progress: u8,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_results_count: Option<usize>,
    /// Accumulated narrative text during streaming generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_content: Option<String>,
    /// Full result, present only on `Completed` (and partially during streaming)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Box<ConciergeResponse>>,
}

impl ConciergeProgress {
    pub fn at(stage: ConciergeStage, progress: u8, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress: progress.min(100),
            message: message.into(),
            current_task: None,
            extracted_keywords: None,
            search_results_count: None,
            streaming_content: None,
            result: None,
        }
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.current_task = Some(task.into());
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.extracted_keywords = Some(keywords);
        self
    }

    pub fn with_results_count(mut self, count: usize) -> Self {
        self.search_results_count = Some(count);
        self
    }

    pub fn with_streaming_content(mut self, content: impl Into<String>) -> Self {
        self.streaming_content = Some(content.into());
        self
    }

    pub fn with_result(mut self, result: ConciergeResponse) -> Self {
        self.result = Some(Box::new(result));
        self
    }

    /// Terminal completed event carrying the full result
    pub fn completed(message: impl Into<String>, result: ConciergeResponse) -> Self {
        Self::at(ConciergeStage::Completed, 100, message)
            .with_task("완료")
            .with_result(result)
    }

    /// Terminal error event; carries no result
    pub fn error(message: impl Into<String>) -> Self {
        Self::at(ConciergeStage::Error, 0, message).with_task("오류 처리")
    }
}
