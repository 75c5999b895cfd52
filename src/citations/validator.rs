//! Narrative citation validation and repair
//!
//! LLM narratives are supposed to end each claim with a numeric citation
//! marker, but models drop, duplicate, or invent them. The validator
//! never rejects a narrative; every step degrades toward a usable
//! response: synthesize markers when none exist, discard out-of-range
//! numbers, and force at least one citation whenever references exist.

use crate::citations::markers::{split_sentences, CitationMarkers};
use crate::types::{ArticleReference, CitationRecord};
use tracing::{info, warn};

/// A validated narrative with derived summary, key points, and citations
#[derive(Debug, Clone)]
pub struct ValidatedNarrative {
    pub answer: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub citations_used: Vec<CitationRecord>,
    /// Count of distinct in-range markers found in the answer
    pub total_citations: usize,
}

pub struct NarrativeCitationValidator {
    markers: CitationMarkers,
}

impl Default for NarrativeCitationValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl NarrativeCitationValidator {
    pub fn new() -> Self {
        Self {
            markers: CitationMarkers::new(),
        }
    }

    /// Validate and repair a raw narrative against the reference list
    pub fn validate(&self, raw: &str, references: &[ArticleReference]) -> ValidatedNarrative {
        let mut answer = raw.trim().to_string();

        if answer.is_empty() {
            warn!("empty narrative, building fallback response");
            return self.fallback(raw, references);
        }

        if !self.markers.has_markers(&answer) {
            info!("narrative has no citation markers, synthesizing");
            answer = self.synthesize_markers(&answer, references);
        }

        let max_citations = if references.is_empty() {
            10
        } else {
            references.len()
        };
        let mut citation_numbers = self.markers.extract(&answer, max_citations);

        if citation_numbers.is_empty() && !references.is_empty() {
            citation_numbers.push(1);
        }
        let total_citations = citation_numbers.len();

        let mut citations_used: Vec<CitationRecord> = citation_numbers
            .iter()
            .filter_map(|&num| references.get(num - 1).map(|r| record(num, r)))
            .collect();

        // a narrative with references must cite at least the first one
        if citations_used.is_empty() {
            if let Some(first) = references.first() {
                citations_used.push(record(1, first));
            }
        }

        let summary = self.build_summary(&answer);
        let key_points = self.build_key_points(&answer);

        info!(
            citations = citations_used.len(),
            key_points = key_points.len(),
            "narrative validated"
        );

        ValidatedNarrative {
            answer,
            summary,
            key_points,
            citations_used,
            total_citations,
        }
    }

    /// Append cycling markers to every substantive sentence
    ///
    /// Sentence i gets `(i % max_ref) + 1` where `max_ref` is the
    /// reference count capped at 10, or 3 when no references exist.
    /// Sentences of 5 characters or fewer pass through unmarked but
    /// still advance the cycle.
    fn synthesize_markers(&self, answer: &str, references: &[ArticleReference]) -> String {
        let max_ref = if references.is_empty() {
            3
        } else {
            references.len().min(10)
        };

        let mut rebuilt: Vec<String> = Vec::new();
        for (i, sentence) in split_sentences(answer).into_iter().enumerate() {
            if sentence.chars().count() > 5 {
                let citation = (i % max_ref) + 1;
                let marked = match sentence.chars().last() {
                    Some(last @ ('.' | '!' | '?')) => {
                        let mut body: String =
                            sentence.chars().take(sentence.chars().count() - 1).collect();
                        body.push_str(&citation.to_string());
                        body.push(last);
                        body
                    }
                    _ => format!("{}{}.", sentence, citation),
                };
                rebuilt.push(marked);
            } else {
                rebuilt.push(sentence);
            }
        }

        if rebuilt.is_empty() {
            answer.to_string()
        } else {
            rebuilt.join(" ")
        }
    }

    /// Marker-free summary truncated to 200 characters
    fn build_summary(&self, answer: &str) -> String {
        let clean = self.markers.strip_markers(answer);
        truncate_chars(&clean, 200)
    }

    /// Up to 4 marker-free sentences longer than 30 characters
    fn build_key_points(&self, answer: &str) -> Vec<String> {
        let mut key_points: Vec<String> = Vec::new();
        for sentence in split_sentences(answer) {
            if key_points.len() >= 4 {
                break;
            }
            let clean = self.markers.strip_markers(&sentence).trim().to_string();
            if clean.chars().count() > 30 {
                key_points.push(clean);
            }
        }

        if key_points.is_empty() {
            key_points.push("뉴스 분석 내용을 확인해주세요.".to_string());
        }
        key_points
    }

    /// Last-resort response when the narrative itself is unusable
    fn fallback(&self, raw: &str, references: &[ArticleReference]) -> ValidatedNarrative {
        let answer = if raw.trim().is_empty() {
            "분석 결과를 생성하는 중 문제가 발생했습니다.".to_string()
        } else {
            raw.trim().to_string()
        };

        let citations_used: Vec<CitationRecord> = references
            .first()
            .map(|first| vec![record(1, first)])
            .unwrap_or_default();

        ValidatedNarrative {
            summary: truncate_chars(&answer, 150),
            key_points: vec![
                "기사 분석이 완료되었습니다.".to_string(),
                "자세한 내용은 참조 기사를 확인해주세요.".to_string(),
            ],
            total_citations: citations_used.len(),
            citations_used,
            answer,
        }
    }
}

fn record(num: usize, reference: &ArticleReference) -> CitationRecord {
    CitationRecord {
        citation_number: num,
        title: reference.title.clone(),
        provider: reference.provider.clone(),
        published_at: reference.published_at.clone(),
        relevance_score: reference.relevance_score,
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(n: usize) -> Vec<ArticleReference> {
        (1..=n)
            .map(|i| ArticleReference {
                ref_id: format!("ref{}", i),
                title: format!("기사 {}", i),
                provider: "연합뉴스".to_string(),
                published_at: "2026-08-29".to_string(),
                url: String::new(),
                relevance_score: 0.5,
            })
            .collect()
    }

    #[test]
    fn test_synthesizes_marker_before_terminal_punctuation() {
        let validator = NarrativeCitationValidator::new();
        let result = validator.validate("반도체 수요가 증가했다.", &refs(2));

        assert_eq!(result.answer, "반도체 수요가 증가했다1.");
        assert_eq!(result.citations_used.len(), 1);
        assert_eq!(result.citations_used[0].citation_number, 1);
        assert_eq!(result.citations_used[0].title, "기사 1");
    }

    #[test]
    fn test_synthesized_markers_cycle_through_references() {
        let validator = NarrativeCitationValidator::new();
        let answer = "첫 번째 주제 문장이다. 두 번째 주제 문장이다. 세 번째 주제 문장이다.";
        let result = validator.validate(answer, &refs(2));

        assert_eq!(
            result.answer,
            "첫 번째 주제 문장이다1. 두 번째 주제 문장이다2. 세 번째 주제 문장이다1."
        );
        assert_eq!(result.total_citations, 2);
    }

    #[test]
    fn test_unpunctuated_sentence_gets_marker_and_period() {
        let validator = NarrativeCitationValidator::new();
        let result = validator.validate("증가세가 이어질 전망", &refs(1));
        assert_eq!(result.answer, "증가세가 이어질 전망1.");
    }

    #[test]
    fn test_existing_markers_are_kept_verbatim() {
        let validator = NarrativeCitationValidator::new();
        let answer = "수요가 늘었다2. 공급은 줄었다1.";
        let result = validator.validate(answer, &refs(3));

        assert_eq!(result.answer, answer);
        let numbers: Vec<usize> = result
            .citations_used
            .iter()
            .map(|c| c.citation_number)
            .collect();
        assert_eq!(numbers, vec![2, 1]);
    }

    #[test]
    fn test_out_of_range_markers_are_discarded() {
        let validator = NarrativeCitationValidator::new();
        let result = validator.validate("근거가 있다9. 다른 근거다1.", &refs(2));

        let numbers: Vec<usize> = result
            .citations_used
            .iter()
            .map(|c| c.citation_number)
            .collect();
        assert_eq!(numbers, vec![1]);
    }

    #[test]
    fn test_all_markers_invalid_forces_first_reference() {
        let validator = NarrativeCitationValidator::new();
        let result = validator.validate("근거가 있다9.", &refs(2));

        assert_eq!(result.citations_used.len(), 1);
        assert_eq!(result.citations_used[0].citation_number, 1);
    }

    #[test]
    fn test_summary_strips_markers_and_truncates() {
        let validator = NarrativeCitationValidator::new();
        let long: String = "가".repeat(250);
        let result = validator.validate(&format!("{}1.", long), &refs(1));

        assert!(!result.summary.contains('1'));
        assert!(result.summary.ends_with("..."));
        assert_eq!(result.summary.chars().count(), 203);
    }

    #[test]
    fn test_key_points_capped_at_four_long_sentences() {
        let validator = NarrativeCitationValidator::new();
        let sentence = "이 문장은 삼십 글자를 확실히 넘기기 위한 긴 분석 내용이다";
        let answer: String = (0..6)
            .map(|_| format!("{}.", sentence))
            .collect::<Vec<_>>()
            .join(" ");
        let result = validator.validate(&answer, &refs(3));

        assert_eq!(result.key_points.len(), 4);
        for point in &result.key_points {
            assert!(!point.ends_with(|c: char| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_short_answer_gets_placeholder_key_point() {
        let validator = NarrativeCitationValidator::new();
        let result = validator.validate("짧은 답변이다.", &refs(1));
        assert_eq!(result.key_points, vec!["뉴스 분석 내용을 확인해주세요."]);
    }

    #[test]
    fn test_empty_narrative_fallback() {
        let validator = NarrativeCitationValidator::new();
        let result = validator.validate("   ", &refs(2));

        assert_eq!(result.answer, "분석 결과를 생성하는 중 문제가 발생했습니다.");
        assert_eq!(result.key_points.len(), 2);
        assert_eq!(result.citations_used.len(), 1);
        assert_eq!(result.citations_used[0].citation_number, 1);
    }

    #[test]
    fn test_no_references_cycles_over_three() {
        let validator = NarrativeCitationValidator::new();
        let answer = "첫 문장이 길다란 내용. 둘째 문장도 길다란 내용. 셋째 문장도 길다란 내용. 넷째 문장도 길다란 내용.";
        let result = validator.validate(answer, &[]);

        assert!(result.answer.contains("내용1."));
        assert!(result.answer.contains("내용2."));
        assert!(result.answer.contains("내용3."));
        // with no references there is nothing to materialize
        assert!(result.citations_used.is_empty());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let validator = NarrativeCitationValidator::new();
        let first = validator.validate("수요가 증가했다. 공급이 줄었다.", &refs(2));
        let second = validator.validate(&first.answer, &refs(2));

        assert_eq!(first.answer, second.answer);
        assert_eq!(
            first
                .citations_used
                .iter()
                .map(|c| c.citation_number)
                .collect::<Vec<_>>(),
            second
                .citations_used
                .iter()
                .map(|c| c.citation_number)
                .collect::<Vec<_>>()
        );
    }
}
