//! Inline citation marker grammar
//!
//! A marker is a run of digits attached to the tail of a word or a
//! sentence-final character, e.g. "수요가 증가했다1." cites reference 1.
//! Standalone numbers ("12개") are data, not markers, so the grammar
//! requires a non-digit, non-space character immediately before the run
//! and a punctuation/whitespace/end boundary immediately after.

use regex::Regex;

pub struct CitationMarkers {
    inline: Regex,
    trailing: Regex,
    strip: Regex,
}

impl Default for CitationMarkers {
    fn default() -> Self {
        Self::new()
    }
}

impl CitationMarkers {
    pub fn new() -> Self {
        Self {
            inline: Regex::new(r"([^\s0-9])([0-9]+)([.!?]?)(\s|$)").unwrap(),
            trailing: Regex::new(r"[0-9]+\s*[.!?]?\s*$").unwrap(),
            strip: Regex::new(r"([^\s0-9])([0-9]+)([.!?\s]|$)").unwrap(),
        }
    }

    /// True when the narrative already carries at least one marker
    pub fn has_markers(&self, text: &str) -> bool {
        self.inline.is_match(text) || self.trailing.is_match(text)
    }

    /// Extract marker numbers within `[1, max]`, first occurrence order
    pub fn extract(&self, text: &str, max: usize) -> Vec<usize> {
        let mut numbers: Vec<usize> = Vec::new();
        for caps in self.strip.captures_iter(text) {
            if let Ok(num) = caps[2].parse::<usize>() {
                if (1..=max).contains(&num) && !numbers.contains(&num) {
                    numbers.push(num);
                }
            }
        }
        numbers
    }

    /// Remove every marker, keeping the boundary character
    pub fn strip_markers(&self, text: &str) -> String {
        self.strip.replace_all(text, "${1}${3}").into_owned()
    }
}

/// Split a narrative into sentences, keeping terminal punctuation
///
/// A sentence ends at `.`/`!`/`?` followed by whitespace or the end of
/// the text; decimal points and dotted abbreviations stay intact.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |n| n.is_whitespace()) {
            while chars.peek().map_or(false, |n| n.is_whitespace()) {
                chars.next();
            }
            let sentence = current.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }

    let tail = current.trim().to_string();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_markers() {
        let markers = CitationMarkers::new();
        assert!(markers.has_markers("수요가 증가했다1."));
        assert!(markers.has_markers("성장세를 보였다2 이어서"));
        assert!(markers.has_markers("마지막 문장3"));
        assert!(!markers.has_markers("인용이 없는 문장이다."));
    }

    #[test]
    fn test_standalone_numbers_are_not_markers() {
        let markers = CitationMarkers::new();
        assert!(markers.extract("점유율은 12 퍼센트였다.", 10).is_empty());
        // attached digits are markers even when a unit follows elsewhere
        assert_eq!(markers.extract("점유율이 올랐다1. 끝.", 10), vec![1]);
    }

    #[test]
    fn test_extract_respects_range_and_order() {
        let markers = CitationMarkers::new();
        let text = "증가했다2. 둔화됐다1. 반복이다2. 범위 밖이다7.";
        assert_eq!(markers.extract(text, 3), vec![2, 1]);
        assert_eq!(markers.extract(text, 10), vec![2, 1, 7]);
    }

    #[test]
    fn test_strip_markers_keeps_punctuation() {
        let markers = CitationMarkers::new();
        assert_eq!(
            markers.strip_markers("수요가 증가했다1. 공급은 줄었다2."),
            "수요가 증가했다. 공급은 줄었다."
        );
        assert_eq!(markers.strip_markers("마지막 문장3"), "마지막 문장");
    }

    #[test]
    fn test_split_sentences_keeps_terminal_punctuation() {
        let sentences = split_sentences("수요가 늘었다. 가격은 3.5% 올랐다! 전망은?");
        assert_eq!(
            sentences,
            vec!["수요가 늘었다.", "가격은 3.5% 올랐다!", "전망은?"]
        );
    }

    #[test]
    fn test_split_sentences_keeps_unpunctuated_tail() {
        let sentences = split_sentences("첫 문장. 끝나지 않은 문장");
        assert_eq!(sentences, vec!["첫 문장.", "끝나지 않은 문장"]);
    }
}
