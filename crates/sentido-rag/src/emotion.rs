//! Lexicon-based emotional tone of retrieved context.

/// Label reported when no lexicon term occurs.
pub const NEUTRAL: &str = "neutral/indefinido";

/// Emotion categories and their trigger terms, in tie-break order.
///
/// Terms are matched as lowercase substrings, so "miedo" also counts inside
/// "miedos".
pub const EMOTION_LEXICON: &[(&str, &[&str])] = &[
    (
        "ansiedad_presion",
        &[
            "ansiedad", "presión", "estrés", "agobio", "pánico", "miedo", "nervios", "quemado",
            "burnout", "incertidumbre", "urgencia", "productivo",
        ],
    ),
    (
        "frustracion_impotencia",
        &[
            "frustración", "impotencia", "rabia", "harto", "imposible", "bloqueo", "injusto",
            "cansancio", "agotamiento", "barrera",
        ],
    ),
    (
        "vacio_confusion",
        &[
            "vacío", "confusión", "perdido", "sin sentido", "nada", "hueco", "extraño",
            "desorientado", "caos", "duda", "identidad", "efímero",
        ],
    ),
    (
        "esperanza_resistencia",
        &[
            "esperanza", "cambio", "futuro", "creer", "sueño", "ilusión", "posibilidad",
            "construir", "libertad", "autonomía", "resistencia",
        ],
    ),
];

/// Per-category hit counts plus the winning category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionReading {
    /// Every category in lexicon order, including zero counts.
    pub counts: Vec<(&'static str, usize)>,
    pub dominant: &'static str,
}

impl EmotionReading {
    /// Pick the dominant category from counts given in lexicon order.
    ///
    /// The highest count wins; ties go to the earlier category; all zeros
    /// read as [`NEUTRAL`].
    #[must_use]
    pub fn from_counts(counts: Vec<(&'static str, usize)>) -> Self {
        let mut dominant = NEUTRAL;
        let mut best = 0;
        for (category, hits) in &counts {
            if *hits > best {
                best = *hits;
                dominant = *category;
            }
        }
        Self { counts, dominant }
    }

    #[must_use]
    pub fn total_hits(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// Non-zero counts as `category: n`, comma separated.
    #[must_use]
    pub fn breakdown(&self) -> String {
        self.counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(category, n)| format!("{category}: {n}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Score the joined, lowercased `texts` against [`EMOTION_LEXICON`].
///
/// Each term contributes its number of non-overlapping occurrences.
#[must_use]
pub fn detect_emotion<S: AsRef<str>>(texts: &[S]) -> EmotionReading {
    let joined = texts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let counts: Vec<(&'static str, usize)> = EMOTION_LEXICON
        .iter()
        .map(|(category, terms)| {
            let hits: usize = terms.iter().map(|t| joined.matches(t).count()).sum();
            (*category, hits)
        })
        .collect();
    EmotionReading::from_counts(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(values: [usize; 4]) -> Vec<(&'static str, usize)> {
        EMOTION_LEXICON
            .iter()
            .zip(values)
            .map(|((c, _), n)| (*c, n))
            .collect()
    }

    #[test]
    fn highest_count_wins() {
        let reading = EmotionReading::from_counts(counts([3, 1, 0, 0]));
        assert_eq!(reading.dominant, "ansiedad_presion");
    }

    #[test]
    fn all_zero_is_neutral() {
        let reading = EmotionReading::from_counts(counts([0, 0, 0, 0]));
        assert_eq!(reading.dominant, NEUTRAL);
        assert_eq!(reading.breakdown(), "");
    }

    #[test]
    fn ties_go_to_the_first_category() {
        let reading = EmotionReading::from_counts(counts([0, 2, 2, 0]));
        assert_eq!(reading.dominant, "frustracion_impotencia");
    }

    #[test]
    fn counts_substrings_case_insensitively() {
        let reading = detect_emotion(&["MIEDO y más miedos", "pánico"]);
        assert_eq!(reading.counts[0], ("ansiedad_presion", 3));
        assert_eq!(reading.total_hits(), 3);
        assert_eq!(reading.breakdown(), "ansiedad_presion: 3");
    }

    #[test]
    fn counts_multi_word_terms() {
        let reading = detect_emotion(&["todo esto es sin sentido, sin sentido"]);
        assert_eq!(reading.counts[2], ("vacio_confusion", 2));
        assert_eq!(reading.dominant, "vacio_confusion");
    }

    #[test]
    fn unrelated_text_is_neutral() {
        let reading = detect_emotion(&["el gato duerme"]);
        assert_eq!(reading.dominant, NEUTRAL);
    }
}
