//! Template-based follow-up question generation
//!
//! Questions are derived from the weighted related-keyword list with a
//! fixed template rotation, so the same inputs always produce the same
//! questions in the same order.

use crate::types::RelatedQuestion;
use tracing::debug;

/// One question shape per rotation slot; `{kw}` gets the keyword and
/// `{j}` a particle chosen by the keyword's final consonant
const TEMPLATES: &[(&str, Option<(&str, &str)>)] = &[
    ("{kw} 관련 최신 동향은 어떤가요?", None),
    ("{kw}{j} 시장에 미치는 영향은 무엇인가요?", Some(("이", "가"))),
    ("{kw} 전망은 어떻게 되나요?", None),
    ("{kw}{j} 관련된 주요 이슈는 무엇인가요?", Some(("과", "와"))),
    ("{kw} 최근 뉴스에서 주목할 점은 무엇인가요?", None),
    ("{kw}에 대한 전문가 분석은 어떤가요?", None),
];

#[derive(Debug, Clone, Default)]
pub struct RelatedQuestionsGenerator;

impl RelatedQuestionsGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate up to `max_questions` follow-up questions
    ///
    /// `keywords` pairs each keyword with its weight; generation walks
    /// them in descending weight (stable for ties), one question per
    /// keyword, rotating through the templates. Keywords repeated
    /// case-insensitively and questions equal to the original are
    /// skipped.
    pub fn generate(
        &self,
        original_question: &str,
        keywords: &[(String, f64)],
        max_questions: usize,
    ) -> Vec<RelatedQuestion> {
        let mut ordered: Vec<(String, f64)> = keywords.to_vec();
        ordered.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let original = original_question.trim();
        let mut seen_keywords: Vec<String> = Vec::new();
        let mut questions: Vec<RelatedQuestion> = Vec::new();

        for (keyword, weight) in ordered {
            if questions.len() >= max_questions {
                break;
            }
            let keyword = keyword.trim();
            if keyword.chars().count() < 2 {
                continue;
            }
            let keyword_lower = keyword.to_lowercase();
            if seen_keywords.contains(&keyword_lower) {
                continue;
            }

            let (template, particle) = TEMPLATES[questions.len() % TEMPLATES.len()];
            let question = render(template, keyword, particle);
            if question == original {
                continue;
            }

            seen_keywords.push(keyword_lower);
            questions.push(RelatedQuestion {
                question,
                keyword: keyword.to_string(),
                weight,
            });
        }

        debug!(count = questions.len(), "related questions generated");
        questions
    }
}

fn render(template: &str, keyword: &str, particle: Option<(&str, &str)>) -> String {
    let rendered = template.replace("{kw}", keyword);
    match particle {
        Some((with_final, without_final)) => {
            let josa = if ends_with_final_consonant(keyword) {
                with_final
            } else {
                without_final
            };
            rendered.replace("{j}", josa)
        }
        None => rendered,
    }
}

/// Hangul syllables carry their final consonant in the low bits of the
/// code point; non-Hangul tails default to the consonant-final particle
fn ends_with_final_consonant(word: &str) -> bool {
    match word.chars().last() {
        Some(c) if ('가'..='힣').contains(&c) => (c as u32 - 0xAC00) % 28 != 0,
        _ => true,
    }
}
