//! Numbered article references backing inline citations

use crate::types::{ArticleReference, NewsArticle};

/// Builds the ordered `ref1..refN` list a narrative cites into
///
/// Positions are fixed by the input order; citation number N always
/// resolves to `articles[N-1]`.
pub struct ReferenceBuilder;

impl ReferenceBuilder {
    pub fn build(articles: &[NewsArticle]) -> Vec<ArticleReference> {
        articles
            .iter()
            .enumerate()
            .map(|(i, article)| {
                let url = article
                    .url
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .or(article.provider_link_page.as_deref())
                    .unwrap_or_default()
                    .to_string();

                ArticleReference {
                    ref_id: format!("ref{}", i + 1),
                    title: fallback(&article.title, "제목 없음"),
                    provider: fallback(&article.provider, "언론사 정보 없음"),
                    published_at: fallback(&article.published_at, "날짜 정보 없음"),
                    url,
                    relevance_score: (article.score.unwrap_or(0.0) / 100.0).clamp(0.0, 1.0),
                }
            })
            .collect()
    }
}

fn fallback(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
