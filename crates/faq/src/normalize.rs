//! Text normalization: lowercase, Unicode word tokenization, Snowball
//! stemming. Produces the canonical form used for similarity scoring and
//! nothing else — normalized text is never shown to users.

use rust_stemmers::{Algorithm, Stemmer};
use unicode_segmentation::UnicodeSegmentation;

use ub_domain::config::StemmerLanguage;

/// Stateless (per-call) normalizer wrapping a fixed stemming algorithm.
///
/// The language is a deployment choice: corpus and input are always
/// stemmed with the same algorithm, so matching stays internally
/// consistent even when the stemmer only approximates the corpus
/// language.
pub struct Normalizer {
    stemmer: Stemmer,
}

impl Normalizer {
    pub fn new(language: StemmerLanguage) -> Self {
        let algorithm = match language {
            StemmerLanguage::English => Algorithm::English,
            StemmerLanguage::Turkish => Algorithm::Turkish,
        };
        Self {
            stemmer: Stemmer::create(algorithm),
        }
    }

    /// Lowercase, split on Unicode word boundaries, stem each token.
    /// Deterministic; empty or punctuation-only input yields an empty
    /// sequence.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        lowered
            .unicode_words()
            .map(|word| self.stemmer.stem(word).into_owned())
            .collect()
    }

    /// Space-joined normalized form — the only representation the
    /// similarity metric compares.
    pub fn normalized_key(&self, text: &str) -> String {
        self.normalize(text).join(" ")
    }
}
