//! Fallback keyword extractor
//!
//! The production extractor is an external morphological utility; this
//! whitespace-based implementation honors the same contract (ordered
//! pairs, weights descending) for wiring and tests.

use crate::errors::Result;
use crate::providers::KeywordExtractor;
use async_trait::async_trait;

/// Whitespace tokenizer with positional weights
#[derive(Debug, Clone, Default)]
pub struct SimpleKeywordExtractor;

impl SimpleKeywordExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeywordExtractor for SimpleKeywordExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<(String, f32)>> {
        let mut seen = Vec::new();
        let mut keywords = Vec::new();

        for token in text.split_whitespace() {
            let token: String = token
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect();

            // single-char tokens are mostly particles, skip them
            if token.chars().count() < 2 {
                continue;
            }

            let lower = token.to_lowercase();
            if seen.contains(&lower) {
                continue;
            }
            seen.push(lower);

            let weight = (1.0 - keywords.len() as f32 * 0.1).max(0.1);
            keywords.push((token, weight));
        }

        Ok(keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_extract_orders_by_position() {
        let extractor = SimpleKeywordExtractor::new();
        let keywords = extractor.extract("삼성전자 HBM 수요 전망은?").await.unwrap();

        assert_eq!(keywords[0].0, "삼성전자");
        assert_eq!(keywords[1].0, "HBM");
        assert!(keywords[0].1 > keywords[1].1);
    }

    #[tokio::test]
    async fn test_extract_skips_short_and_duplicate_tokens() {
        let extractor = SimpleKeywordExtractor::new();
        let keywords = extractor.extract("금리 왜 금리 는").await.unwrap();

        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].0, "금리");
    }

    #[tokio::test]
    async fn test_extract_strips_punctuation() {
        let extractor = SimpleKeywordExtractor::new();
        let keywords = extractor.extract("전망은? (반도체)").await.unwrap();

        assert_eq!(keywords[0].0, "전망은");
        assert_eq!(keywords[1].0, "반도체");
    }

    #[tokio::test]
    async fn test_weight_floor() {
        let extractor = SimpleKeywordExtractor::new();
        let text = "aa bb cc dd ee ff gg hh ii jj kk ll";
        let keywords = extractor.extract(text).await.unwrap();
        assert!(keywords.iter().all(|(_, w)| *w >= 0.1));
    }
}
