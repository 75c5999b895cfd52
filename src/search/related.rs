//! Default related-keyword derivation
//!
//! Used when the provider's related-word lookup fails or returns
//! nothing, and on the no-results response so the caller still gets
//! actionable suggestions.

use tracing::debug;

/// Connectives excluded from meaningful-word extraction
const STOPWORDS: &[&str] = &["그리고", "그런데", "하지만", "그래서", "때문에"];

/// Curated related-keyword table, keyed by substring match
const KEYWORD_MAPPINGS: &[(&str, &[&str])] = &[
    // 기술/IT
    ("ai", &["인공지능", "머신러닝", "딥러닝", "빅데이터", "알고리즘", "ChatGPT", "생성AI"]),
    ("인공지능", &["AI", "머신러닝", "딥러닝", "빅데이터", "알고리즘", "ChatGPT", "생성AI"]),
    ("반도체", &["칩", "메모리", "시스템반도체", "파운드리", "웨이퍼", "TSMC", "삼성전자"]),
    ("gpu", &["NVIDIA", "AMD", "그래픽카드", "AI칩", "병렬처리", "CUDA"]),
    ("nvidia", &["GPU", "AI칩", "그래픽카드", "CUDA", "데이터센터", "젠슨황"]),
    ("삼성", &["갤럭시", "메모리", "디스플레이", "반도체", "스마트폰", "이재용"]),
    // 국제/정치
    ("이란", &["핵", "제재", "중동", "석유", "IAEA", "우라늄", "핵시설", "테헤란"]),
    ("핵시설", &["원자력", "우라늄", "핵발전", "원전", "IAEA", "핵무기", "방사능"]),
    ("핵", &["원자력", "우라늄", "핵발전", "핵무기", "원전", "IAEA", "핵시설"]),
    ("미국", &["트럼프", "바이든", "달러", "연준", "경제", "백악관", "국무부"]),
    ("중국", &["시진핑", "무역", "경제", "홍콩", "대만", "베이징", "위안화"]),
    ("러시아", &["푸틴", "우크라이나", "천연가스", "루블", "모스크바", "제재"]),
    ("일본", &["기시다", "엔화", "도쿄", "후쿠시마", "원전", "경제"]),
    // 경제
    ("경제", &["GDP", "인플레이션", "금리", "주식", "환율", "성장률", "경기"]),
    ("주식", &["코스피", "나스닥", "다우", "투자", "증시", "상장", "배당"]),
    ("부동산", &["아파트", "전세", "매매", "대출", "정책", "집값", "임대"]),
    ("금리", &["기준금리", "대출금리", "예금금리", "인플레이션", "중앙은행"]),
    ("인플레이션", &["물가", "소비자물가", "금리", "경제", "중앙은행"]),
    // 에너지/환경
    ("기후", &["온실가스", "탄소중립", "신재생에너지", "환경", "지구온난화", "파리협정"]),
    ("원전", &["원자력", "핵발전", "방사능", "우라늄", "후쿠시마", "체르노빌"]),
    ("석유", &["원유", "가격", "OPEC", "정제", "에너지", "배럴"]),
    // 기타
    ("코로나", &["백신", "확진", "방역", "WHO", "팬데믹", "변이", "치료제"]),
    ("북한", &["김정은", "핵", "미사일", "제재", "평양", "비핵화"]),
    ("우크라이나", &["러시아", "전쟁", "젤렌스키", "푸틴", "키예프", "NATO"]),
];

/// Derive related keywords for one keyword without calling the provider
///
/// Matching order: direct containment, then word-level partial match,
/// then meaningful words from the keyword itself. Returns at most 8
/// entries in deterministic first-seen order; empty when nothing fits.
pub fn default_related_keywords(keyword: &str) -> Vec<String> {
    let keyword_lower = keyword.to_lowercase();

    let mut related: Vec<&str> = Vec::new();

    for (key, values) in KEYWORD_MAPPINGS {
        if keyword_lower.contains(key) {
            related.extend(*values);
            break;
        }
    }

    if related.is_empty() {
        let words: Vec<&str> = keyword_lower.split_whitespace().collect();
        for (key, values) in KEYWORD_MAPPINGS {
            let partial = words
                .iter()
                .any(|word| word.contains(key) || key.contains(word));
            if partial {
                related.extend(*values);
                break;
            }
        }
    }

    if related.is_empty() {
        // fall back to meaningful words from the keyword itself
        let meaningful: Vec<&str> = keyword_lower
            .split_whitespace()
            .filter(|word| word.chars().count() >= 2 && !STOPWORDS.contains(word))
            .take(5)
            .collect();
        if meaningful.is_empty() {
            debug!(keyword, "no related keywords found");
            return Vec::new();
        }
        return meaningful.into_iter().map(String::from).collect();
    }

    let mut unique: Vec<String> = Vec::new();
    for candidate in related {
        if !unique.iter().any(|u| u == candidate) {
            unique.push(candidate.to_string());
        }
        if unique.len() == 8 {
            break;
        }
    }
    unique
}
