//! Generation prompt assembly
//!
//! The narrative model only ever sees retrieved article text, so the
//! prompt carries every grounding signal: numbered `[refN]` blocks,
//! highlighted sentences, related keywords, and the day's top issues,
//! plus the citation-marker contract the validator later enforces.

use crate::types::{DetailLevel, NewsArticle, TodayIssue};

const ARTICLE_CONTENT_LIMIT: usize = 800;
const MAX_PROMPT_ARTICLES: usize = 10;
const MAX_HIGHLIGHT_SENTENCES: usize = 8;

const SYSTEM_PROMPT: &str = "당신은 뉴스 분석 전문가입니다.
주어진 뉴스 기사들을 바탕으로 사용자의 질문에 대해 객관적이고 통찰력 있는 답변을 제공합니다.

핵심 규칙: 모든 문장은 반드시 인용 번호(1~10)로 끝나야 합니다.

답변 작성 규칙:
1. 반드시 제공된 기사 내용만을 바탕으로 답변하세요
2. 모든 문장의 끝에 인용 번호를 표시하세요
3. 인용 번호는 문장부호 바로 뒤에 공백 없이 숫자만 표시
4. 올바른 예: \"발표했다1\", \"증가했다2\", \"예정이다3\"
5. 잘못된 예: \"발표했다 1\", \"발표했다[1]\", \"발표했다(1)\"
6. 추측이나 개인적 의견보다는 기사에 나타난 사실과 데이터를 중심으로 서술하세요
7. 한 문장에 여러 기사의 정보가 있으면 가장 중요한 출처 하나만 표시
8. 소제목이나 특수기호(**, ##) 없이 순수한 텍스트로만 작성하세요
9. 주제가 바뀔 때마다 빈 줄로 문단을 구분하세요

구체적 정보 포함 의무:
- 인명은 실명과 직책을 함께 명시하세요
- 날짜, 기간, 시점을 구체적으로 기재하세요
- 기관명과 지명은 정확한 명칭으로 표기하세요
- 금액, 비율, 규모 등 구체적 수치를 반드시 포함하세요
- \"~에 따르면\", \"~라고 밝혔다\" 등 원문 표현을 활용하세요
- 기사에 없는 내용은 절대 추가하지 마세요";

/// System and user messages for one generation call
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub system: String,
    pub user: String,
}

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(
        question: &str,
        articles: &[NewsArticle],
        related_keywords: &[String],
        today_issues: &[TodayIssue],
        detail_level: DetailLevel,
    ) -> PromptSet {
        let articles_text = render_articles(articles);
        let related_text = render_related_keywords(related_keywords);
        let issues_text = render_issues(today_issues);
        let instruction = response_instruction(detail_level);

        let user = format!(
            "질문: {question}\n\n{instruction}으로 답변해주세요.\n\n\
             분석할 기사들 (반드시 이 기사들의 내용만 사용하세요):\n{articles_text}\n\
             {related_text}{issues_text}\n\
             위 기사들을 바탕으로 질문에 대해 답변을 작성해주세요.\n\n\
             인용 번호 표시 필수 규칙:\n\
             1. 모든 문장은 반드시 인용 번호로 끝나야 합니다\n\
             2. 인용 번호는 문장부호 바로 뒤에 공백 없이 숫자만 표시\n\
             3. 올바른 형식: \"발표했다1\", \"증가했다2\"\n\
             4. 잘못된 형식: \"발표했다 1\", \"발표했다[1]\", \"발표했다(1)\"\n\
             5. 기사에 없는 내용은 절대 추가하지 마세요"
        );

        PromptSet {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}

fn render_articles(articles: &[NewsArticle]) -> String {
    let mut text = String::new();
    for (i, article) in articles.iter().take(MAX_PROMPT_ARTICLES).enumerate() {
        let content: String = article.body_text().chars().take(ARTICLE_CONTENT_LIMIT).collect();

        text.push_str(&format!("\n[ref{}] 제목: {}\n", i + 1, article.title));
        text.push_str(&format!(
            "언론사: {} | 발행일: {}\n",
            article.provider, article.published_at
        ));
        text.push_str(&format!("내용: {}\n", content));

        let highlights = highlight_sentences(article);
        if !highlights.is_empty() {
            text.push_str(&format!("핵심 문장: {}\n", highlights.join(" | ")));
        }

        text.push_str("---\n");
    }
    text
}

/// Highlighted title lines first, then content lines, capped total
fn highlight_sentences(article: &NewsArticle) -> Vec<String> {
    let Some(highlight) = &article.highlight else {
        return Vec::new();
    };
    highlight
        .title
        .iter()
        .chain(highlight.content.iter())
        .take(MAX_HIGHLIGHT_SENTENCES)
        .cloned()
        .collect()
}

fn render_related_keywords(keywords: &[String]) -> String {
    if keywords.is_empty() {
        String::new()
    } else {
        let joined = keywords
            .iter()
            .take(10)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        format!("\n주요 연관 키워드: {}\n", joined)
    }
}

fn render_issues(issues: &[TodayIssue]) -> String {
    if issues.is_empty() {
        return String::new();
    }
    let mut text = String::from("\n관련 오늘의 주요 이슈:\n");
    for issue in issues.iter().take(3) {
        text.push_str(&format!("- {}\n", issue.label()));
    }
    text
}

fn response_instruction(detail_level: DetailLevel) -> &'static str {
    match detail_level {
        DetailLevel::Brief => "간결한 핵심 요약 답변 (300-500자)",
        DetailLevel::Detailed => "상세하고 구체적인 분석 답변 (800-1000자)",
        DetailLevel::Comprehensive => "심층적이고 포괄적인 분석 답변 (1200-1500자)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Highlight;

    fn article(title: &str, content: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            content: content.to_string(),
            provider: "연합뉴스".to_string(),
            published_at: "2026-08-29".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_articles_get_positional_ref_blocks() {
        let prompts = PromptBuilder::build(
            "반도체 전망은?",
            &[article("첫 기사", "내용 하나"), article("둘째 기사", "내용 둘")],
            &[],
            &[],
            DetailLevel::Detailed,
        );

        assert!(prompts.user.contains("[ref1] 제목: 첫 기사"));
        assert!(prompts.user.contains("[ref2] 제목: 둘째 기사"));
        assert!(prompts.user.contains("질문: 반도체 전망은?"));
    }

    #[test]
    fn test_content_truncated_to_limit() {
        let long = "가".repeat(1000);
        let prompts =
            PromptBuilder::build("질문", &[article("기사", &long)], &[], &[], DetailLevel::Brief);

        assert!(prompts.user.contains(&"가".repeat(800)));
        assert!(!prompts.user.contains(&"가".repeat(801)));
    }

    #[test]
    fn test_highlights_capped_at_eight() {
        let mut a = article("기사", "내용");
        a.highlight = Some(Highlight {
            title: vec!["제목 문장".to_string()],
            content: (0..10).map(|i| format!("문장 {}", i)).collect(),
        });
        let prompts = PromptBuilder::build("질문", &[a], &[], &[], DetailLevel::Detailed);

        assert!(prompts.user.contains("핵심 문장: 제목 문장 | 문장 0"));
        assert!(prompts.user.contains("문장 6"));
        assert!(!prompts.user.contains("문장 7"));
    }

    #[test]
    fn test_keywords_and_issues_rendered() {
        let issues = vec![
            TodayIssue {
                title: "수출 호조".to_string(),
                ..Default::default()
            },
            TodayIssue {
                keyword: "환율".to_string(),
                ..Default::default()
            },
        ];
        let prompts = PromptBuilder::build(
            "질문",
            &[article("기사", "내용")],
            &["반도체".to_string(), "수출".to_string()],
            &issues,
            DetailLevel::Detailed,
        );

        assert!(prompts.user.contains("주요 연관 키워드: 반도체, 수출"));
        assert!(prompts.user.contains("- 수출 호조"));
        assert!(prompts.user.contains("- 환율"));
    }

    #[test]
    fn test_detail_level_changes_instruction() {
        let brief =
            PromptBuilder::build("질문", &[article("기사", "내용")], &[], &[], DetailLevel::Brief);
        let full = PromptBuilder::build(
            "질문",
            &[article("기사", "내용")],
            &[],
            &[],
            DetailLevel::Comprehensive,
        );

        assert!(brief.user.contains("간결한 핵심 요약"));
        assert!(full.user.contains("심층적이고 포괄적인"));
    }

    #[test]
    fn test_system_prompt_carries_citation_contract() {
        let prompts =
            PromptBuilder::build("질문", &[article("기사", "내용")], &[], &[], DetailLevel::Detailed);
        assert!(prompts.system.contains("인용 번호"));
        assert!(prompts.system.contains("공백 없이"));
    }
}
