//! Terminal response aggregate and its parts

use serde::{Deserialize, Serialize};

/// Numbered pointer from a citation marker to a retrieved article
///
/// Indices are 1-based and contiguous; the list is immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleReference {
    /// "ref1", "ref2", ...
    pub ref_id: String,
    pub title: String,
    pub provider: String,
    pub published_at: String,
    /// Empty string when neither URL field resolved
    pub url: String,
    /// Normalized relevance in [0, 1]
    pub relevance_score: f64,
}

/// One citation actually used by the narrative
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationRecord {
    pub citation_number: usize,
    pub title: String,
    pub provider: String,
    pub published_at: String,
    pub relevance_score: f64,
}

/// Follow-up question derived from related keywords
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedQuestion {
    pub question: String,
    pub keyword: String,
    pub weight: f64,
}

/// One entry from the provider's issue ranking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodayIssue {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub rank: Option<u32>,
}

impl TodayIssue {
    /// Title when present, keyword otherwise
    pub fn label(&self) -> &str {
        if self.title.is_empty() {
            &self.keyword
        } else {
            &self.title
        }
    }
}

/// Echo of the retrieval parameters used for one request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchStrategy {
    pub keywords: Vec<String>,
    pub date_range: String,
    pub search_type: String,
    pub max_articles: usize,
    pub include_related_keywords: bool,
    pub include_today_issues: bool,
}

/// Timing, counts, and citation stats for one request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub processing_time_seconds: f64,
    pub articles_analyzed: usize,
    pub keywords_extracted: usize,
    pub model: String,
    pub generated_at: String,
    #[serde(default)]
    pub citations_used: Vec<CitationRecord>,
    #[serde(default)]
    pub total_citations: usize,
    #[serde(default)]
    pub related_questions_count: usize,
    /// Set on the structured no-results response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub search_attempted: bool,
}

/// Terminal aggregate: constructed once per request, immutable after emission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConciergeResponse {
    pub question: String,
    /// Narrative with inline numeric citation markers
    pub answer: String,
    pub summary: String,
    /// At most 4 key points
    pub key_points: Vec<String>,
    pub references: Vec<ArticleReference>,
    #[serde(default)]
    pub related_keywords: Vec<String>,
    #[serde(default)]
    pub related_questions: Vec<RelatedQuestion>,
    #[serde(default)]
    pub today_issues: Vec<TodayIssue>,
    pub search_strategy: SearchStrategy,
    pub analysis_metadata: AnalysisMetadata,
    pub generated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_issue_label() {
        let issue = TodayIssue {
            title: "반도체 수출 급증".to_string(),
            ..Default::default()
        };
        assert_eq!(issue.label(), "반도체 수출 급증");

        let issue = TodayIssue {
            keyword: "반도체".to_string(),
            ..Default::default()
        };
        assert_eq!(issue.label(), "반도체");
    }

    #[test]
    fn test_response_serializes_round_trip() {
        let response = ConciergeResponse {
            question: "질문".to_string(),
            answer: "답변1.".to_string(),
            summary: "요약".to_string(),
            key_points: vec!["포인트".to_string()],
            references: vec![ArticleReference {
                ref_id: "ref1".to_string(),
                title: "제목".to_string(),
                provider: "언론사".to_string(),
                published_at: "2026-08-29".to_string(),
                url: String::new(),
                relevance_score: 0.8,
            }],
            related_keywords: vec![],
            related_questions: vec![],
            today_issues: vec![],
            search_strategy: SearchStrategy::default(),
            analysis_metadata: AnalysisMetadata::default(),
            generated_at: "2026-08-30T00:00:00Z".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        let parsed: ConciergeResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.references.len(), 1);
        assert_eq!(parsed.references[0].ref_id, "ref1");
    }
}
