//! Curated keyword synonym expansion
//!
//! Generates the superset of query terms the cascade builds stage
//! queries from. Exact domain terms (brand names, acronyms) are never
//! expanded; everything else goes through a small curated mapping,
//! capped at 2 synonyms to avoid query drift.

use tracing::debug;

/// Exact terms that must never be expanded
const EXACT_KEYWORDS: &[&str] = &[
    "삼성전자",
    "lg전자",
    "sk하이닉스",
    "현대차",
    "현대자동차",
    "네이버",
    "카카오",
    "포스코",
    "셀트리온",
    "바이오니아",
    "hbm",
    "gpu",
    "cpu",
    "ai",
    "chatgpt",
    "llm",
    "nft",
    "메타버스",
    "iot",
    "5g",
    "6g",
    "esg",
];

/// Company-name synonyms (deliberately narrow)
const COMPANY_SYNONYMS: &[(&str, &[&str])] = &[
    ("현대", &["현대차", "현대자동차"]),
    ("lg", &["LG전자", "LG그룹"]),
    ("sk", &["SK텔레콤", "SK이노베이션"]),
];

/// Technology/industry synonyms
const TECH_SYNONYMS: &[(&str, &[&str])] = &[
    ("인공지능", &["AI"]),
    ("반도체", &["칩", "메모리"]),
    ("전기차", &["EV", "전동차"]),
    ("배터리", &["전지"]),
    ("원전", &["원자력"]),
];

/// Economy/finance synonyms
const FINANCE_SYNONYMS: &[(&str, &[&str])] = &[
    ("주식", &["증시", "주가"]),
    ("금리", &["기준금리"]),
    ("부동산", &["아파트", "주택"]),
];

/// Keyword synonym expander over the curated tables
#[derive(Debug, Clone, Default)]
pub struct SynonymExpander;

impl SynonymExpander {
    pub fn new() -> Self {
        Self
    }

    /// Expand one keyword into at most 2 synonyms
    ///
    /// Returns empty for exact-match domain terms and unknown keywords;
    /// the original term is excluded case-insensitively.
    pub fn expand(&self, keyword: &str) -> Vec<String> {
        let keyword_lower = keyword.to_lowercase();

        if EXACT_KEYWORDS.contains(&keyword_lower.as_str()) {
            debug!(keyword, "exact keyword, not expanding");
            return Vec::new();
        }

        let tables = COMPANY_SYNONYMS
            .iter()
            .chain(TECH_SYNONYMS.iter())
            .chain(FINANCE_SYNONYMS.iter());

        let mut synonyms: Vec<String> = Vec::new();
        for (key, values) in tables {
            if *key == keyword_lower {
                for value in *values {
                    let candidate = value.to_string();
                    if candidate.to_lowercase() != keyword_lower
                        && !synonyms.iter().any(|s| s.eq_ignore_ascii_case(&candidate))
                    {
                        synonyms.push(candidate);
                    }
                }
            }
        }

        synonyms.truncate(2);
        if !synonyms.is_empty() {
            debug!(keyword, ?synonyms, "expanded keyword");
        }
        synonyms
    }

    /// Expand an ordered keyword list into unique query terms
    ///
    /// Each keyword is followed by its synonyms; first occurrence wins.
    pub fn expand_all(&self, keywords: &[String]) -> Vec<String> {
        let mut unique: Vec<String> = Vec::new();
        for keyword in keywords {
            for term in std::iter::once(keyword.clone()).chain(self.expand(keyword)) {
                if !unique.iter().any(|u| u.eq_ignore_ascii_case(&term)) {
                    unique.push(term);
                }
            }
        }
        unique
    }
}
