use rayon::prelude::*;
use serde::Serialize;

/// Sum of alphabet positions, `'a'` counting as 1. Characters outside
/// `'a'..='z'` contribute whatever their offset from `'a'` gives, negative or not.
pub fn word_value(word: &str) -> i64 {
    word.chars().map(|c| c as i64 - 'a' as i64 + 1).sum()
}

/// Three-way comparison returning the character-code difference at the first
/// mismatch, or the difference in length when one string prefixes the other.
/// Works on `char`s, so outside the Basic Multilingual Plane it can differ from
/// a UTF-16 code unit comparison in magnitude and occasionally in sign.
pub fn compare_lexical(a: &str, b: &str) -> i64 {
    let mut a_chars = a.chars();
    let mut b_chars = b.chars();
    loop {
        match (a_chars.next(), b_chars.next()) {
            (Some(x), Some(y)) if x != y => return x as i64 - y as i64,
            (Some(_), Some(_)) => {}
            (Some(_), None) => return 1 + a_chars.count() as i64,
            (None, Some(_)) => return -(1 + b_chars.count() as i64),
            (None, None) => return 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub value: Option<String>,
    pub lexical: Option<String>,
}

pub fn analyze(text: &str, words: &[String]) -> AnalysisResult {
    if words.is_empty() {
        return AnalysisResult::default();
    }

    let text_value = word_value(text);
    let mut closest_value: Option<&String> = None;
    let mut closest_lexical: Option<&String> = None;
    let mut smallest_value_diff = i64::MAX;
    let mut smallest_lexical_diff = i64::MAX;

    for word in words {
        let value_diff = (text_value - word_value(word)).abs();
        if value_diff < smallest_value_diff {
            smallest_value_diff = value_diff;
            closest_value = Some(word);
        }

        // only words sorting before the text are eligible
        let lexical_diff = compare_lexical(text, word);
        if lexical_diff > 0 && lexical_diff < smallest_lexical_diff {
            smallest_lexical_diff = lexical_diff;
            closest_lexical = Some(word);
        }
    }

    AnalysisResult {
        value: closest_value.cloned(),
        lexical: closest_lexical.cloned(),
    }
}

pub fn analyze_many(texts: &[String], words: &[String]) -> Vec<AnalysisResult> {
    texts.par_iter().map(|text| analyze(text, words)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_word_value() {
        assert_eq!(word_value("cat"), 24);
        assert_eq!(word_value("cab"), 6);
        assert_eq!(word_value("z"), 26);
        assert_eq!(word_value(""), 0);
    }

    #[test]
    fn test_word_value_outside_alphabet() {
        // 'A' is 32 below 'a'
        assert_eq!(word_value("A"), -31);
        assert_eq!(word_value(" "), -64);
        assert_eq!(word_value("{"), 27);
    }

    #[test]
    fn test_compare_lexical() {
        assert_eq!(compare_lexical("cat", "cab"), 't' as i64 - 'b' as i64);
        assert_eq!(compare_lexical("cab", "cat"), 'b' as i64 - 't' as i64);
        assert_eq!(compare_lexical("cats", "cat"), 1);
        assert_eq!(compare_lexical("c", "cat"), -2);
        assert_eq!(compare_lexical("same", "same"), 0);
    }

    #[test]
    fn test_compare_lexical_sign_matches_str_ordering() {
        let pairs = [("apple", "apricot"), ("Zoo", "ant"), ("", "a"), ("é", "z")];
        for (a, b) in pairs {
            assert_eq!(compare_lexical(a, b).signum(), a.cmp(b) as i64);
            assert_eq!(compare_lexical(b, a).signum(), b.cmp(a) as i64);
        }
    }

    #[test]
    fn test_analyze_empty_vocabulary() {
        assert_eq!(analyze("hello", &[]), AnalysisResult::default());
        assert_eq!(analyze("", &[]), AnalysisResult::default());
    }

    #[test]
    fn test_analyze_single_word() {
        let result = analyze("cat", &vocab(&["cab"]));
        assert_eq!(result.value.as_deref(), Some("cab"));
        assert_eq!(result.lexical.as_deref(), Some("cab"));
    }

    #[test]
    fn test_analyze_value_tie_keeps_first() {
        // "ab" and "ba" both have value 3, as does "c"
        let result = analyze("c", &vocab(&["ab", "ba"]));
        assert_eq!(result.value.as_deref(), Some("ab"));
    }

    #[test]
    fn test_analyze_lexical_only_considers_preceding_words() {
        let result = analyze("apple", &vocab(&["banana", "cherry"]));
        assert_eq!(result.value.as_deref(), Some("banana"));
        assert_eq!(result.lexical, None);
    }

    #[test]
    fn test_analyze_lexical_picks_smallest_positive_difference() {
        // "dog" - "cat" = 1 at first char, "dog" - "do" = 1 by length,
        // "dog" - "dob" = 5; first of the two 1s wins
        let result = analyze("dog", &vocab(&["dob", "cat", "do", "eel"]));
        assert_eq!(result.lexical.as_deref(), Some("cat"));
    }

    #[test]
    fn test_analyze_exact_match() {
        let result = analyze("bee", &vocab(&["ant", "bee", "cat"]));
        assert_eq!(result.value.as_deref(), Some("bee"));
        // equal words compare as 0 and are not eligible
        assert_eq!(result.lexical.as_deref(), Some("ant"));
    }

    #[test]
    fn test_analyze_value_is_minimal() {
        let words = vocab(&["zebra", "ant", "mole", "a", "hippopotamus", "yak"]);
        for text in ["cat", "zzz", "b", "Hello", ""] {
            let result = analyze(text, &words);
            let best = result.value.expect("non-empty vocabulary");
            let best_diff = (word_value(text) - word_value(&best)).abs();
            let first_min = words
                .iter()
                .find(|w| (word_value(text) - word_value(w)).abs() == best_diff)
                .unwrap();
            assert_eq!(&best, first_min);
            for w in &words {
                assert!((word_value(text) - word_value(w)).abs() >= best_diff);
            }
        }
    }

    #[test]
    fn test_analyze_many_preserves_order() {
        let words = vocab(&["cab", "ant"]);
        let texts = vocab(&["cat", "aardvark", ""]);
        let results = analyze_many(&texts, &words);
        assert_eq!(results.len(), 3);
        for (text, result) in texts.iter().zip(&results) {
            assert_eq!(result, &analyze(text, &words));
        }
    }

    #[test]
    fn test_analysis_result_serializes_nulls() {
        let json = serde_json::to_value(AnalysisResult::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "value": null, "lexical": null }));
    }
}
