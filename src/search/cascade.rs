//! Multi-stage retrieval cascade
//!
//! Five ordered stages that progressively relax the query until a
//! relevance/quantity target is met:
//!
//! 1. AND of the top 2 terms, original window, page size 20
//! 2. OR of the top 3 terms, original window, page size 30
//! 3. AND of the top 2 terms, window widened to 30 days, page size 25
//! 4. OR of the top 3 terms, widened window, page size 30
//! 5. single top term, 90-day window, page size 20, unfiltered
//!
//! Stages 3-4 only run while the accumulated count is below half the
//! target; stage 5 only below 3. A stage failure is logged and treated
//! as zero results; it never aborts the stages after it.

use crate::providers::NewsSearchProvider;
use crate::search::dedup::Deduplicator;
use crate::search::filter::RelevanceFilter;
use crate::search::synonyms::SynonymExpander;
use crate::types::{NewsArticle, RetrievalOutcome};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::{info, warn};

/// Window widening parameters for the later stages
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Lookback for stages 3-4 (days before `date_to`)
    pub widened_window_days: i64,
    /// Lookback for stage 5 (days before `date_to`)
    pub last_resort_window_days: i64,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            widened_window_days: 30,
            last_resort_window_days: 90,
        }
    }
}

/// Orchestrates the cascade against the external search provider
pub struct MultiStageRetriever {
    provider: Arc<dyn NewsSearchProvider>,
    expander: SynonymExpander,
    filter: RelevanceFilter,
    dedup: Deduplicator,
    config: RetrieverConfig,
}

impl MultiStageRetriever {
    pub fn new(provider: Arc<dyn NewsSearchProvider>) -> Self {
        Self::with_config(provider, RetrieverConfig::default())
    }

    pub fn with_config(provider: Arc<dyn NewsSearchProvider>, config: RetrieverConfig) -> Self {
        Self {
            provider,
            expander: SynonymExpander::new(),
            filter: RelevanceFilter::new(),
            dedup: Deduplicator::new(),
            config,
        }
    }

    /// Run the cascade for one request
    ///
    /// `keywords` are the extracted keywords in importance order;
    /// synonym expansion happens here. Provider failures inside a stage
    /// degrade to empty results; the outcome is `failed` only when every
    /// stage and the plain-query fallback produced nothing.
    pub async fn retrieve(
        &self,
        keywords: &[String],
        question: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        target_count: usize,
    ) -> RetrievalOutcome {
        let terms = self.expander.expand_all(keywords);
        info!(?terms, %date_from, %date_to, target_count, "multi-stage search start");

        let widened_from = date_to - Duration::days(self.config.widened_window_days);
        let last_resort_from = date_to - Duration::days(self.config.last_resort_window_days);

        let mut cascade = CascadeState {
            accumulated: Vec::new(),
            attempts: Vec::new(),
            provider_errors: 0,
            target: target_count,
        };

        // Stage 1: conjunction of the top 2 terms, original window
        if terms.len() >= 2 && !cascade.quota_reached() {
            let query = terms[..2].join(" AND ");
            self.run_stage(&mut cascade, 1, &query, date_from, date_to, 20, Some(&terms[..2]))
                .await;
        }

        // Stage 2: disjunction of the top 3 terms, original window
        if terms.len() >= 2 && !cascade.quota_reached() {
            let core = &terms[..terms.len().min(3)];
            let query = core.join(" OR ");
            self.run_stage(&mut cascade, 2, &query, date_from, date_to, 30, Some(core))
                .await;
        }

        // Stage 3: conjunction again over the widened window
        if terms.len() >= 2 && cascade.accumulated.len() < target_count / 2 {
            let query = terms[..2].join(" AND ");
            self.run_stage(&mut cascade, 3, &query, widened_from, date_to, 25, Some(&terms[..2]))
                .await;
        }

        // Stage 4: disjunction over the widened window
        if !terms.is_empty() && cascade.accumulated.len() < target_count / 2 {
            let core = &terms[..terms.len().min(3)];
            let query = core.join(" OR ");
            self.run_stage(&mut cascade, 4, &query, widened_from, date_to, 30, Some(core))
                .await;
        }

        // Stage 5: single top term, 90-day window, no relevance filter
        if !terms.is_empty() && cascade.accumulated.len() < 3 {
            let query = terms[0].clone();
            self.run_stage(&mut cascade, 5, &query, last_resort_from, date_to, 20, None)
                .await;
        }

        info!(
            total = cascade.accumulated.len(),
            attempts = ?cascade.attempts,
            "multi-stage search complete"
        );

        let merged = self.dedup.dedupe_all(cascade.accumulated);

        if merged.is_empty() {
            if cascade.provider_errors > 0 {
                // the Rust analog of the original's exception-path fallback
                return self
                    .plain_query_fallback(question, date_from, date_to, target_count, cascade.attempts)
                    .await;
            }
            warn!(?keywords, question, "no documents after all stages");
            return RetrievalOutcome {
                attempts: cascade.attempts,
                ..RetrievalOutcome::failure(no_results_message(question))
            };
        }

        let total_hits = merged.len();
        let mut documents = merged;
        documents.truncate(target_count);

        RetrievalOutcome {
            documents,
            total_hits,
            failed: false,
            error_message: None,
            attempts: cascade.attempts,
        }
    }

    async fn run_stage(
        &self,
        cascade: &mut CascadeState,
        stage: usize,
        query: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        page_size: usize,
        filter_keywords: Option<&[String]>,
    ) {
        match self.provider.search(query, date_from, date_to, page_size).await {
            Ok(page) => {
                if page.documents.is_empty() {
                    return;
                }

                let candidates = match filter_keywords {
                    Some(keywords) => self.filter.filter_strict(page.documents, keywords),
                    None => page.documents,
                };
                let fresh = self
                    .dedup
                    .dedupe_against(candidates, cascade.accumulated.iter());
                if fresh.is_empty() {
                    return;
                }

                let remaining = cascade.target.saturating_sub(cascade.accumulated.len());
                let added = fresh.len().min(remaining);
                cascade
                    .accumulated
                    .extend(fresh.into_iter().take(remaining));

                info!(stage, query, added, "stage succeeded");
                cascade
                    .attempts
                    .push(format!("stage {} success: {} ({} added)", stage, query, added));
            }
            Err(e) => {
                warn!(stage, query, error = %e, "stage failed");
                cascade.provider_errors += 1;
                cascade
                    .attempts
                    .push(format!("stage {} failed: {}", stage, query));
            }
        }
    }

    /// Last-ditch plain query with the raw question text
    async fn plain_query_fallback(
        &self,
        question: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        target_count: usize,
        mut attempts: Vec<String>,
    ) -> RetrievalOutcome {
        match self
            .provider
            .search(question, date_from, date_to, target_count)
            .await
        {
            Ok(page) if !page.documents.is_empty() => {
                attempts.push("fallback success: plain query".to_string());
                let merged = self.dedup.dedupe_all(page.documents);
                let total_hits = merged.len();
                let mut documents = merged;
                documents.truncate(target_count);
                RetrievalOutcome {
                    documents,
                    total_hits,
                    failed: false,
                    error_message: None,
                    attempts,
                }
            }
            Ok(_) => {
                attempts.push("fallback failed: plain query".to_string());
                RetrievalOutcome {
                    attempts,
                    ..RetrievalOutcome::failure(no_results_message(question))
                }
            }
            Err(e) => {
                warn!(error = %e, "plain-query fallback failed");
                attempts.push("fallback failed: plain query".to_string());
                RetrievalOutcome {
                    attempts,
                    ..RetrievalOutcome::failure(format!(
                        "'{}' 검색 중 오류가 발생했습니다: {}",
                        question, e
                    ))
                }
            }
        }
    }
}

struct CascadeState {
    accumulated: Vec<NewsArticle>,
    attempts: Vec<String>,
    provider_errors: usize,
    target: usize,
}

impl CascadeState {
    fn quota_reached(&self) -> bool {
        self.accumulated.len() >= self.target
    }
}

fn no_results_message(question: &str) -> String {
    format!("'{}'에 대한 관련 뉴스 기사를 찾을 수 없습니다.", question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ConciergeError, Result};
    use crate::types::{SearchPage, TodayIssue};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted provider: records queries, pops canned pages in order
    struct ScriptedProvider {
        pages: Mutex<Vec<Result<SearchPage>>>,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(pages: Vec<Result<SearchPage>>) -> Self {
            Self {
                pages: Mutex::new(pages),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NewsSearchProvider for ScriptedProvider {
        async fn search(
            &self,
            query: &str,
            _date_from: NaiveDate,
            _date_to: NaiveDate,
            _page_size: usize,
        ) -> Result<SearchPage> {
            self.queries.lock().unwrap().push(query.to_string());
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                Ok(SearchPage::default())
            } else {
                pages.remove(0)
            }
        }

        async fn related_keywords(&self, _keyword: &str, _max: usize) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn issue_ranking(&self, _date: NaiveDate) -> Result<Vec<TodayIssue>> {
            Ok(Vec::new())
        }
    }

    fn matching_doc(id: &str) -> NewsArticle {
        NewsArticle {
            news_id: id.to_string(),
            title: "삼성전자 HBM 증설".to_string(),
            content: "삼성전자가 HBM 생산을 확대한다".to_string(),
            score: Some(80.0),
            ..Default::default()
        }
    }

    fn page(ids: &[&str]) -> Result<SearchPage> {
        Ok(SearchPage {
            documents: ids.iter().map(|id| matching_doc(id)).collect(),
            total_hits: ids.len() as u64,
        })
    }

    fn dates() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
        )
    }

    fn keywords() -> Vec<String> {
        vec!["삼성전자".to_string(), "HBM".to_string()]
    }

    #[tokio::test]
    async fn test_stage1_satisfies_quota_and_halts() {
        let provider = Arc::new(ScriptedProvider::new(vec![page(&["a", "b", "c"])]));
        let retriever = MultiStageRetriever::new(provider.clone());
        let (from, to) = dates();

        let outcome = retriever.retrieve(&keywords(), "삼성전자 HBM 전망", from, to, 3).await;

        assert!(!outcome.failed);
        assert_eq!(outcome.documents.len(), 3);
        assert_eq!(outcome.total_hits, 3);
        // only the stage-1 AND query was issued
        assert_eq!(provider.queries(), vec!["삼성전자 AND HBM".to_string()]);
    }

    #[tokio::test]
    async fn test_stage_queries_progress_and_to_or() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            page(&[]),
            page(&["a"]),
            page(&[]),
            page(&[]),
            page(&[]),
        ]));
        let retriever = MultiStageRetriever::new(provider.clone());
        let (from, to) = dates();

        let outcome = retriever.retrieve(&keywords(), "질문", from, to, 10).await;

        assert!(!outcome.failed);
        let queries = provider.queries();
        assert_eq!(queries[0], "삼성전자 AND HBM");
        assert_eq!(queries[1], "삼성전자 OR HBM");
        // widened-window stages reuse the same compositions
        assert_eq!(queries[2], "삼성전자 AND HBM");
        assert_eq!(queries[3], "삼성전자 OR HBM");
        // stage 5: single top keyword
        assert_eq!(queries[4], "삼성전자");
    }

    #[tokio::test]
    async fn test_all_stages_empty_reports_failure_with_question() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let retriever = MultiStageRetriever::new(provider.clone());
        let (from, to) = dates();

        let outcome = retriever.retrieve(&keywords(), "이란 핵시설 근황", from, to, 10).await;

        assert!(outcome.failed);
        assert!(outcome.documents.is_empty());
        assert!(outcome
            .error_message
            .as_deref()
            .unwrap()
            .contains("이란 핵시설 근황"));
        // no plain-query fallback without provider errors: 5 stage calls only
        assert_eq!(provider.queries().len(), 5);
    }

    #[tokio::test]
    async fn test_stage_error_does_not_abort_cascade() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ConciergeError::SearchProvider("boom".to_string())),
            page(&["a", "b"]),
        ]));
        let retriever = MultiStageRetriever::new(provider.clone());
        let (from, to) = dates();

        let outcome = retriever.retrieve(&keywords(), "질문", from, to, 2).await;

        assert!(!outcome.failed);
        assert_eq!(outcome.documents.len(), 2);
        assert!(outcome.attempts.iter().any(|a| a.starts_with("stage 1 failed")));
        assert!(outcome.attempts.iter().any(|a| a.starts_with("stage 2 success")));
    }

    #[tokio::test]
    async fn test_plain_fallback_after_errors() {
        let mut pages: Vec<Result<SearchPage>> = Vec::new();
        for _ in 0..5 {
            pages.push(Err(ConciergeError::SearchProvider("down".to_string())));
        }
        pages.push(page(&["f1"]));
        let provider = Arc::new(ScriptedProvider::new(pages));
        let retriever = MultiStageRetriever::new(provider.clone());
        let (from, to) = dates();

        let outcome = retriever.retrieve(&keywords(), "질문 텍스트", from, to, 10).await;

        assert!(!outcome.failed);
        assert_eq!(outcome.documents.len(), 1);
        // 6th call is the plain query with the raw question
        assert_eq!(provider.queries()[5], "질문 텍스트");
    }

    #[tokio::test]
    async fn test_accumulation_is_monotonic_and_truncated() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            page(&["a", "b"]),
            page(&["b", "c", "d", "e", "f"]),
        ]));
        let retriever = MultiStageRetriever::new(provider.clone());
        let (from, to) = dates();

        let outcome = retriever.retrieve(&keywords(), "질문", from, to, 4).await;

        assert!(!outcome.failed);
        assert_eq!(outcome.documents.len(), 4);
        // duplicate "b" removed across stages, earlier docs keep their order
        let ids: Vec<&str> = outcome.documents.iter().map(|d| d.news_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        // quota reached at stage 2, no further provider calls
        assert_eq!(provider.queries().len(), 2);
    }

    #[tokio::test]
    async fn test_single_keyword_skips_boolean_stages() {
        let provider = Arc::new(ScriptedProvider::new(vec![page(&[])]));
        let retriever = MultiStageRetriever::new(provider.clone());
        let (from, to) = dates();
        // no synonym expansion for this term, so a single term survives
        let single = vec!["날씨".to_string()];

        let _ = retriever.retrieve(&single, "날씨 전망", from, to, 10).await;

        // stages 1-3 need two terms; only stage 4 (OR of one) and stage 5 run
        let queries = provider.queries();
        assert_eq!(queries, vec!["날씨".to_string(), "날씨".to_string()]);
    }
}
