//! Frequency glossary of the normalized corpus.

use std::collections::HashMap;

/// Shortest word length (exclusive) counted by the glossary.
const MIN_WORD_CHARS: usize = 3;

/// Most frequent words longer than three characters across `texts`, highest
/// count first. Ties keep the order in which words were first seen.
#[must_use]
pub fn top_terms<S: AsRef<str>>(texts: &[S], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut next_seen = 0usize;

    for text in texts {
        for word in text.as_ref().split_whitespace() {
            if word.chars().count() <= MIN_WORD_CHARS {
                continue;
            }
            let entry = counts.entry(word).or_insert_with(|| {
                next_seen += 1;
                (0, next_seen)
            });
            entry.0 += 1;
        }
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, seen))| (word, count, seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(word, count, _)| (word.to_string(), count))
        .collect()
}

/// Log the top ten terms at `info`.
pub fn log_glossary<S: AsRef<str>>(texts: &[S]) -> Vec<(String, usize)> {
    let terms = top_terms(texts, 10);
    for (term, count) in &terms {
        tracing::info!(term = term.as_str(), count, "glossary term");
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_words_longer_than_three_chars() {
        let terms = top_terms(&["vida vida mas sol", "vida"], 10);
        assert_eq!(terms, vec![("vida".to_string(), 3)]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let terms = top_terms(&["miedo futuro", "futuro miedo redes"], 10);
        assert_eq!(
            terms,
            vec![
                ("miedo".to_string(), 2),
                ("futuro".to_string(), 2),
                ("redes".to_string(), 1),
            ]
        );
    }

    #[test]
    fn length_is_measured_in_characters() {
        // "niño" is four characters but five bytes
        let terms = top_terms(&["niño año"], 10);
        assert_eq!(terms, vec![("niño".to_string(), 1)]);
    }

    #[test]
    fn limit_truncates() {
        let texts = ["uno1 dos2 tres cuatro cinco seis siete ocho nueve diezz once"];
        assert_eq!(top_terms(&texts, 10).len(), 10);
    }
}
