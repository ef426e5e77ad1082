//! Greedy word-wrap chunking of normalized comments.

/// A bounded piece of one normalized comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the source comment in the loaded corpus.
    pub record: usize,
    pub text: String,
}

/// Wrap `text` into lines of at most `width` characters.
///
/// Words are packed greedily and joined by single spaces. A word longer than
/// `width` fills whatever room is left on the current line and continues on
/// as many following lines as needed. Empty or all-whitespace input yields no
/// lines.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let sep = usize::from(line_len > 0);

        if line_len + sep + word_len <= width {
            if sep == 1 {
                line.push(' ');
            }
            line.push_str(word);
            line_len += sep + word_len;
            continue;
        }

        if word_len <= width {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_len = word_len;
            continue;
        }

        // Long word: split across lines, filling the current one first.
        let mut rest: Vec<char> = word.chars().collect();
        let room = width.saturating_sub(line_len + sep);
        if line_len > 0 && room > 0 {
            line.push(' ');
            line.extend(rest.drain(..room));
            lines.push(std::mem::take(&mut line));
        } else if line_len > 0 {
            lines.push(std::mem::take(&mut line));
        }
        while rest.len() > width {
            lines.push(rest.drain(..width).collect());
        }
        line = rest.into_iter().collect();
        line_len = line.chars().count();
    }

    if line_len > 0 {
        lines.push(line);
    }
    lines
}

/// Chunk every text in order, tagging each chunk with its source index.
#[must_use]
pub fn chunk_texts<S: AsRef<str>>(texts: &[S], width: usize) -> Vec<Chunk> {
    texts
        .iter()
        .enumerate()
        .flat_map(|(record, text)| {
            wrap(text.as_ref(), width)
                .into_iter()
                .map(move |text| Chunk { record, text })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(wrap("hola mundo", 400), vec!["hola mundo"]);
    }

    #[test]
    fn packs_words_greedily() {
        assert_eq!(
            wrap("aaa bbb ccc ddd", 7),
            vec!["aaa bbb".to_string(), "ccc ddd".to_string()]
        );
    }

    #[test]
    fn every_line_fits_the_budget() {
        let text = "palabra ".repeat(300);
        let lines = wrap(&text, 400);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 400));
        assert_eq!(lines.join(" "), text.trim_end());
    }

    #[test]
    fn long_word_fills_current_line_then_splits() {
        assert_eq!(
            wrap("ab cdefghijkl", 5),
            vec!["ab cd".to_string(), "efghi".to_string(), "jkl".to_string()]
        );
    }

    #[test]
    fn long_word_at_start_is_split() {
        assert_eq!(
            wrap("abcdefgh xy", 3),
            vec!["abc".to_string(), "def".to_string(), "gh".to_string(), "xy".to_string()]
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(wrap("ñañá ñuñú", 9), vec!["ñañá ñuñú"]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(wrap("", 400).is_empty());
        assert!(wrap("   ", 400).is_empty());
    }

    #[test]
    fn chunks_keep_record_back_link() {
        let chunks = chunk_texts(&["uno dos tres", "", "cuatro"], 7);
        assert_eq!(
            chunks,
            vec![
                Chunk { record: 0, text: "uno dos".to_string() },
                Chunk { record: 0, text: "tres".to_string() },
                Chunk { record: 2, text: "cuatro".to_string() },
            ]
        );
    }
}
