//! Sentence segmentation seam for the chunker.

use unicode_segmentation::UnicodeSegmentation;

/// Splits prose into sentence-like units.
///
/// Any implementation that respects abbreviations and terminal
/// punctuation well enough for chunk boundaries is acceptable; the
/// chunker never splits inside a sentence it is handed.
pub trait SentenceSegmenter: Send + Sync {
    /// Splits `text` into trimmed, non-empty sentences in order.
    fn split(&self, text: &str) -> Vec<String>;
}

/// Default segmenter built on Unicode sentence boundaries (UAX #29).
#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeSentenceSegmenter;

impl SentenceSegmenter for UnicodeSentenceSegmenter {
    fn split(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(|sentence| sentence.trim().to_string())
            .filter(|sentence| !sentence.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_prose() {
        let segmenter = UnicodeSentenceSegmenter;
        let sentences =
            segmenter.split("The bank offers loans. Loans are great. Visit us today.");
        assert_eq!(
            sentences,
            vec![
                "The bank offers loans.",
                "Loans are great.",
                "Visit us today."
            ]
        );
    }

    #[test]
    fn period_before_lowercase_does_not_break() {
        let segmenter = UnicodeSentenceSegmenter;
        let sentences = segmenter.split("He arrived at 3 p.m. and left. She stayed.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("p.m. and left"));
    }

    #[test]
    fn empty_input_yields_no_sentences() {
        let segmenter = UnicodeSentenceSegmenter;
        assert!(segmenter.split("").is_empty());
        assert!(segmenter.split("   \n  ").is_empty());
    }
}
