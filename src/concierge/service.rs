//! Concierge pipeline: question → retrieval → grounded narrative
//!
//! Both entry points run the same pipeline; the streaming one publishes
//! ordered progress events on a [`ProgressBus`] and ends with exactly
//! one terminal event (`Completed` or `Error`).

use crate::citations::{NarrativeCitationValidator, ReferenceBuilder, ValidatedNarrative};
use crate::concierge::ProgressBus;
use crate::config::ConciergeConfig;
use crate::errors::{ConciergeError, Result};
use crate::prompts::PromptBuilder;
use crate::providers::{KeywordExtractor, NarrativeGenerator, NewsSearchProvider};
use crate::questions::RelatedQuestionsGenerator;
use crate::search::{default_related_keywords, MultiStageRetriever, RelevanceFilter, RetrieverConfig};
use crate::types::{
    AnalysisMetadata, ArticleReference, ConciergeProgress, ConciergeRequest, ConciergeResponse,
    ConciergeStage, NewsArticle, RelatedQuestion, RetrievalOutcome, SearchStrategy, TodayIssue,
};
use chrono::{Duration, Local, NaiveDate};
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

pub struct ConciergeService {
    search: Arc<dyn NewsSearchProvider>,
    extractor: Arc<dyn KeywordExtractor>,
    generator: Arc<dyn NarrativeGenerator>,
    retriever: MultiStageRetriever,
    filter: RelevanceFilter,
    validator: NarrativeCitationValidator,
    questions: RelatedQuestionsGenerator,
    config: ConciergeConfig,
}

impl ConciergeService {
    pub fn new(
        search: Arc<dyn NewsSearchProvider>,
        extractor: Arc<dyn KeywordExtractor>,
        generator: Arc<dyn NarrativeGenerator>,
        config: ConciergeConfig,
    ) -> Self {
        let retriever = MultiStageRetriever::with_config(
            search.clone(),
            RetrieverConfig {
                widened_window_days: config.search.widened_window_days,
                last_resort_window_days: config.search.last_resort_window_days,
            },
        );

        Self {
            search,
            extractor,
            generator,
            retriever,
            filter: RelevanceFilter::new(),
            validator: NarrativeCitationValidator::new(),
            questions: RelatedQuestionsGenerator::new(),
            config,
        }
    }

    /// Batch entry point: run the pipeline and return the final response
    pub async fn respond(&self, request: &ConciergeRequest) -> Result<ConciergeResponse> {
        self.run(request, None, false).await
    }

    /// Streaming entry point: publish progress events on `bus`
    ///
    /// Never propagates an error; any failure becomes a terminal
    /// `Error` event on the bus.
    pub async fn respond_streaming(&self, request: &ConciergeRequest, bus: &ProgressBus) {
        if let Err(e) = self.run(request, Some(bus), true).await {
            error!(error = %e, "concierge pipeline failed");
            bus.emit(ConciergeProgress::error(format!(
                "답변 생성 중 오류가 발생했습니다: {}",
                e
            )))
            .await;
        }
    }

    async fn run(
        &self,
        request: &ConciergeRequest,
        bus: Option<&ProgressBus>,
        streaming: bool,
    ) -> Result<ConciergeResponse> {
        let start = Instant::now();
        request.validate()?;

        self.emit(
            bus,
            ConciergeProgress::at(
                ConciergeStage::QuestionAnalysis,
                5,
                "질문을 분석하고 키워드를 추출하고 있습니다...",
            )
            .with_task("키워드 추출"),
        )
        .await;

        let weighted_keywords = self.extractor.extract(&request.question).await?;
        let extracted_keywords: Vec<String> =
            weighted_keywords.iter().map(|(k, _)| k.clone()).collect();
        info!(keywords = ?extracted_keywords, "keywords extracted");

        let preview = extracted_keywords
            .iter()
            .take(5)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        self.emit(
            bus,
            ConciergeProgress::at(
                ConciergeStage::KeywordsExtracted,
                15,
                format!("키워드 추출 완료: {}", preview),
            )
            .with_task("검색 전략 수립")
            .with_keywords(extracted_keywords.clone()),
        )
        .await;

        self.emit(
            bus,
            ConciergeProgress::at(
                ConciergeStage::SearchStrategy,
                25,
                "최적의 검색 전략을 수립하고 있습니다...",
            )
            .with_task("AND/OR 검색 전략"),
        )
        .await;

        let (date_from, date_to) = self.resolve_date_range(request)?;
        let search_strategy = SearchStrategy {
            keywords: extracted_keywords.clone(),
            date_range: format!("{} ~ {}", date_from, date_to),
            search_type: "AND_priority".to_string(),
            max_articles: request.max_articles,
            include_related_keywords: request.include_related_keywords,
            include_today_issues: request.include_today_issues,
        };

        self.emit(
            bus,
            ConciergeProgress::at(
                ConciergeStage::SearchStrategyReady,
                35,
                "검색 전략 수립 완료. 뉴스 검색을 시작합니다...",
            )
            .with_task("뉴스 검색"),
        )
        .await;

        self.emit(
            bus,
            ConciergeProgress::at(
                ConciergeStage::NewsSearch,
                45,
                "관련 뉴스를 검색하고 있습니다...",
            )
            .with_task("뉴스 검색 API 호출"),
        )
        .await;

        let outcome = self
            .retriever
            .retrieve(
                &extracted_keywords,
                &request.question,
                date_from,
                date_to,
                self.config.search.target_articles,
            )
            .await;

        if outcome.failed || outcome.documents.is_empty() {
            return self
                .finish_no_results(request, bus, &extracted_keywords, search_strategy, outcome, start)
                .await;
        }
        let articles = outcome.documents;

        self.emit(
            bus,
            ConciergeProgress::at(
                ConciergeStage::SearchCompleted,
                55,
                format!("{}개의 관련 기사를 찾았습니다.", articles.len()),
            )
            .with_task("연관어 및 이슈 수집")
            .with_results_count(articles.len()),
        )
        .await;

        self.emit(
            bus,
            ConciergeProgress::at(
                ConciergeStage::ParallelCollection,
                65,
                "연관 키워드와 오늘의 이슈를 병렬로 수집하고 있습니다...",
            )
            .with_task("병렬 API 호출"),
        )
        .await;

        let (related_keywords, today_issues) =
            self.collect_context(request, &extracted_keywords).await;

        let related_questions = if request.include_related_questions && !related_keywords.is_empty()
        {
            self.emit(
                bus,
                ConciergeProgress::at(
                    ConciergeStage::RelatedQuestions,
                    72,
                    "연관어 기반 관련 질문을 생성하고 있습니다...",
                )
                .with_task("관련 질문 생성"),
            )
            .await;
            self.build_related_questions(request, &extracted_keywords, &related_keywords)
        } else {
            Vec::new()
        };

        self.emit(
            bus,
            ConciergeProgress::at(
                ConciergeStage::AiAnalysis,
                75,
                "AI가 뉴스를 분석하고 답변을 생성하고 있습니다...",
            )
            .with_task("AI 분석"),
        )
        .await;

        let references = ReferenceBuilder::build(&articles);

        let validated = self
            .generate_narrative(
                request,
                &articles,
                &references,
                &extracted_keywords,
                &related_keywords,
                &today_issues,
                bus,
                streaming,
            )
            .await?;

        self.emit(
            bus,
            ConciergeProgress::at(
                ConciergeStage::ResponseGeneration,
                90,
                "최종 답변을 구성하고 있습니다...",
            )
            .with_task("응답 포맷팅"),
        )
        .await;

        let response = ConciergeResponse {
            question: request.question.clone(),
            answer: validated.answer,
            summary: validated.summary,
            key_points: validated.key_points,
            references,
            related_keywords: related_keywords.clone(),
            related_questions: related_questions.clone(),
            today_issues,
            search_strategy,
            analysis_metadata: AnalysisMetadata {
                processing_time_seconds: round2(start.elapsed().as_secs_f64()),
                articles_analyzed: articles.len(),
                keywords_extracted: extracted_keywords.len(),
                model: self.generator.model().to_string(),
                generated_at: Local::now().to_rfc3339(),
                citations_used: validated.citations_used,
                total_citations: validated.total_citations,
                related_questions_count: related_questions.len(),
                error: None,
                search_attempted: true,
            },
            generated_at: Local::now().to_rfc3339(),
        };

        self.emit(
            bus,
            ConciergeProgress::completed(
                "AI 뉴스 컨시어지 답변 생성이 완료되었습니다!",
                response.clone(),
            ),
        )
        .await;

        Ok(response)
    }

    /// Structured response when retrieval found nothing; still a success
    async fn finish_no_results(
        &self,
        request: &ConciergeRequest,
        bus: Option<&ProgressBus>,
        extracted_keywords: &[String],
        search_strategy: SearchStrategy,
        outcome: RetrievalOutcome,
        start: Instant,
    ) -> Result<ConciergeResponse> {
        let message = outcome.error_message.unwrap_or_else(|| {
            format!(
                "'{}'에 대한 관련 뉴스 기사를 찾을 수 없습니다.",
                request.question
            )
        });
        warn!(question = %request.question, "no search results");

        self.emit(
            bus,
            ConciergeProgress::at(ConciergeStage::NoResults, 100, message)
                .with_task("검색 완료")
                .with_results_count(0),
        )
        .await;

        // keyword-derived suggestions still help an empty result
        let related_keywords = extracted_keywords
            .first()
            .map(|main| default_related_keywords(main))
            .unwrap_or_default();

        let related_questions = if request.include_related_questions
            && (!related_keywords.is_empty() || !extracted_keywords.is_empty())
        {
            let available: Vec<(String, f64)> = related_keywords
                .iter()
                .chain(extracted_keywords.iter().take(3))
                .take(6)
                .enumerate()
                .map(|(i, k)| (k.clone(), 1.0 - i as f64 * 0.2))
                .collect();
            self.questions.generate(&request.question, &available, 4)
        } else {
            Vec::new()
        };

        let response = ConciergeResponse {
            question: request.question.clone(),
            answer: format!(
                "죄송합니다. '{}'에 대한 관련 뉴스 기사를 찾을 수 없습니다.\n\n\
                 다음과 같은 방법을 시도해보세요:\n\
                 • 다른 키워드로 검색해보세요\n\
                 • 검색 기간을 조정해보세요\n\
                 • 더 일반적인 용어를 사용해보세요",
                request.question
            ),
            summary: format!("'{}' 관련 뉴스 기사를 찾을 수 없습니다.", request.question),
            key_points: vec![
                "검색 결과가 없습니다.".to_string(),
                "다른 키워드로 검색해보세요.".to_string(),
                "검색 기간을 조정해보세요.".to_string(),
                "더 일반적인 용어를 사용해보세요.".to_string(),
            ],
            references: Vec::new(),
            related_keywords,
            related_questions: related_questions.clone(),
            today_issues: Vec::new(),
            search_strategy,
            analysis_metadata: AnalysisMetadata {
                processing_time_seconds: round2(start.elapsed().as_secs_f64()),
                articles_analyzed: 0,
                keywords_extracted: extracted_keywords.len(),
                model: "none".to_string(),
                generated_at: Local::now().to_rfc3339(),
                citations_used: Vec::new(),
                total_citations: 0,
                related_questions_count: related_questions.len(),
                error: Some("no_search_results".to_string()),
                search_attempted: true,
            },
            generated_at: Local::now().to_rfc3339(),
        };

        self.emit(
            bus,
            ConciergeProgress::completed("검색이 완료되었습니다.", response.clone()),
        )
        .await;

        Ok(response)
    }

    /// Related keywords and today's issues, collected concurrently
    ///
    /// Either side failing degrades to empty without touching the other.
    async fn collect_context(
        &self,
        request: &ConciergeRequest,
        extracted_keywords: &[String],
    ) -> (Vec<String>, Vec<TodayIssue>) {
        let related_task = async {
            if !request.include_related_keywords {
                return Vec::new();
            }
            let Some(main) = extracted_keywords.first() else {
                return Vec::new();
            };
            match self.search.related_keywords(main, 10).await {
                Ok(list) if !list.is_empty() => list,
                Ok(_) => default_related_keywords(main),
                Err(e) => {
                    warn!(error = %e, keyword = %main, "related keyword collection failed");
                    default_related_keywords(main)
                }
            }
        };

        let issues_task = async {
            if !request.include_today_issues {
                return Vec::new();
            }
            match self.search.issue_ranking(Local::now().date_naive()).await {
                Ok(issues) => issues,
                Err(e) => {
                    warn!(error = %e, "today issue collection failed");
                    Vec::new()
                }
            }
        };

        tokio::join!(related_task, issues_task)
    }

    /// Weighted follow-up questions over the top related keywords
    fn build_related_questions(
        &self,
        request: &ConciergeRequest,
        extracted_keywords: &[String],
        related_keywords: &[String],
    ) -> Vec<RelatedQuestion> {
        let mut weights: HashMap<&str, f64> = HashMap::new();
        for (i, keyword) in extracted_keywords.iter().enumerate() {
            if related_keywords.contains(keyword) {
                weights.insert(keyword.as_str(), 1.0 - i as f64 * 0.1);
            }
        }
        for (i, keyword) in related_keywords.iter().enumerate() {
            weights
                .entry(keyword.as_str())
                .or_insert(0.8 - i as f64 * 0.05);
        }

        let weighted: Vec<(String, f64)> = related_keywords
            .iter()
            .take(8)
            .map(|k| (k.clone(), weights.get(k.as_str()).copied().unwrap_or(0.5)))
            .collect();

        self.questions.generate(&request.question, &weighted, 6)
    }

    /// Generate and validate the narrative, streaming fragments if asked
    #[allow(clippy::too_many_arguments)]
    async fn generate_narrative(
        &self,
        request: &ConciergeRequest,
        articles: &[NewsArticle],
        references: &[ArticleReference],
        extracted_keywords: &[String],
        related_keywords: &[String],
        today_issues: &[TodayIssue],
        bus: Option<&ProgressBus>,
        streaming: bool,
    ) -> Result<ValidatedNarrative> {
        // post-hoc relevance check with the relaxed policy
        let verified = self
            .filter
            .filter_relaxed(articles.to_vec(), extracted_keywords);
        if verified.is_empty() {
            warn!("no article passed relevance verification");
            return Ok(ValidatedNarrative {
                answer: format!(
                    "죄송합니다. '{}'와 관련된 신뢰할 수 있는 기사를 찾을 수 없습니다. \
                     다른 키워드나 질문으로 다시 시도해주세요.",
                    request.question
                ),
                summary: "관련 기사 없음".to_string(),
                key_points: vec!["질문과 관련된 최근 기사를 찾을 수 없습니다.".to_string()],
                citations_used: Vec::new(),
                total_citations: 0,
            });
        }

        let prompts = PromptBuilder::build(
            &request.question,
            &verified,
            related_keywords,
            today_issues,
            request.detail_level,
        );

        let narrative = if streaming {
            self.stream_narrative(request, references, &prompts.system, &prompts.user, bus)
                .await
        } else {
            match self.generator.complete(&prompts.system, &prompts.user).await {
                Ok(text) => text,
                Err(e) => {
                    error!(error = %e, "narrative generation failed");
                    format!("죄송합니다. AI 분석 중 오류가 발생했습니다: {}", e)
                }
            }
        };

        Ok(self.validator.validate(&narrative, references))
    }

    /// Accumulate streamed fragments, emitting `AiStreaming` per fragment
    async fn stream_narrative(
        &self,
        request: &ConciergeRequest,
        references: &[ArticleReference],
        system_prompt: &str,
        user_prompt: &str,
        bus: Option<&ProgressBus>,
    ) -> String {
        let mut stream = match self.generator.complete_stream(system_prompt, user_prompt).await {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, "narrative stream could not be opened");
                return format!("죄송합니다. AI 분석 중 오류가 발생했습니다: {}", e);
            }
        };

        let mut accumulated = String::new();
        while let Some(fragment) = stream.next().await {
            match fragment {
                Ok(text) => {
                    accumulated.push_str(&text);
                    let percent = (75 + accumulated.chars().count() / 10).min(90) as u8;

                    let mut event = ConciergeProgress::at(
                        ConciergeStage::AiStreaming,
                        percent,
                        "AI가 실시간으로 답변을 생성하고 있습니다...",
                    )
                    .with_task("실시간 텍스트 생성")
                    .with_streaming_content(accumulated.clone());
                    if !references.is_empty() {
                        event = event.with_result(partial_response(request, references));
                    }
                    self.emit(bus, event).await;
                }
                Err(e) => {
                    error!(error = %e, "narrative stream broke mid-flight");
                    if accumulated.is_empty() {
                        accumulated =
                            format!("죄송합니다. AI 분석 중 오류가 발생했습니다: {}", e);
                    }
                    break;
                }
            }
        }
        accumulated
    }

    fn resolve_date_range(&self, request: &ConciergeRequest) -> Result<(NaiveDate, NaiveDate)> {
        let today = Local::now().date_naive();
        let date_from = match &request.date_from {
            Some(raw) => parse_date(raw)?,
            None => today - Duration::days(self.config.search.default_window_days),
        };
        let date_to = match &request.date_to {
            Some(raw) => parse_date(raw)?,
            None => today + Duration::days(1),
        };

        if date_from > date_to {
            return Err(ConciergeError::InvalidDateRange {
                from: date_from.to_string(),
                to: date_to.to_string(),
            });
        }
        Ok((date_from, date_to))
    }

    async fn emit(&self, bus: Option<&ProgressBus>, event: ConciergeProgress) {
        if let Some(bus) = bus {
            bus.emit(event).await;
        }
    }
}

/// References-only partial result sent while the narrative streams
fn partial_response(request: &ConciergeRequest, references: &[ArticleReference]) -> ConciergeResponse {
    ConciergeResponse {
        question: request.question.clone(),
        answer: String::new(),
        summary: String::new(),
        key_points: Vec::new(),
        references: references.to_vec(),
        related_keywords: Vec::new(),
        related_questions: Vec::new(),
        today_issues: Vec::new(),
        search_strategy: SearchStrategy::default(),
        analysis_metadata: AnalysisMetadata::default(),
        generated_at: Local::now().to_rfc3339(),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ConciergeError::InvalidRequest(format!("invalid date: {}", raw)))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-08-30").unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
        );
        assert!(parse_date("08/30/2026").is_err());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(7.0), 7.0);
    }
}
