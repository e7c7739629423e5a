//! Detection helpers for machine-sounding prose. The humanizer stage
//! feeds these findings back into its rewrite prompts.

/// Stock phrases that reliably mark text as machine-written
pub const AI_PHRASES: &[&str] = &[
    "in conclusion",
    "it is important to note",
    "it should be noted that",
    "it is worth noting that",
    "furthermore",
    "moreover",
    "additionally",
    "in summary",
    "to summarize",
    "needless to say",
    "it goes without saying",
    "first and foremost",
    "last but not least",
    "without a doubt",
    "it is clear that",
    "it is evident that",
    "this demonstrates that",
    "this indicates that",
    "this suggests that",
    "this highlights the fact that",
    "this underscores the importance of",
    "this allows for",
    "this facilitates",
    "this represents",
    "this constitutes",
    "this exemplifies",
    "this sheds light on",
    "this draws attention to",
    "as previously mentioned",
    "delve into",
];

/// Count occurrences of each known phrase in the text (case-insensitive).
/// Returns only phrases that appear at least once.
pub fn detect_ai_phrases(text: &str) -> Vec<(&'static str, usize)> {
    let haystack = text.to_lowercase();
    AI_PHRASES
        .iter()
        .filter_map(|phrase| {
            let count = haystack.matches(phrase).count();
            (count > 0).then_some((*phrase, count))
        })
        .collect()
}

/// Sentence-length statistics used to judge burstiness
#[derive(Debug, Clone, Copy)]
pub struct VariationMetrics {
    pub sentence_count: usize,
    pub avg_sentence_words: f64,
    pub std_dev_words: f64,
    /// std dev relative to the mean; higher means more human-like variation
    pub variation_score: f64,
}

/// Measure sentence-length variation. Uniform sentence lengths are a
/// strong machine-writing signal, so a low score triggers a stronger
/// rewrite instruction in the first humanizer pass.
pub fn sentence_variation(text: &str) -> VariationMetrics {
    let lengths: Vec<usize> = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.split_whitespace().count())
        .collect();

    if lengths.is_empty() {
        return VariationMetrics {
            sentence_count: 0,
            avg_sentence_words: 0.0,
            std_dev_words: 0.0,
            variation_score: 0.0,
        };
    }

    let n = lengths.len() as f64;
    let avg = lengths.iter().sum::<usize>() as f64 / n;
    let variance = lengths
        .iter()
        .map(|&len| (len as f64 - avg).powi(2))
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();

    VariationMetrics {
        sentence_count: lengths.len(),
        avg_sentence_words: avg,
        std_dev_words: std_dev,
        variation_score: if avg > 0.0 { std_dev / avg } else { 0.0 },
    }
}
