//! Fuzzy FAQ matching.
//!
//! Corpus questions are normalized once at construction; each lookup
//! normalizes the user input and scores it against every precomputed key
//! with the Sørensen–Dice bigram coefficient. The single best entry wins,
//! ties broken by corpus order, and only a score strictly above the
//! confidence threshold counts as a match.

use ub_domain::config::StemmerLanguage;
use ub_domain::faq::FaqEntry;

use crate::normalize::Normalizer;

/// A confident match: the original (non-normalized) corpus entry plus the
/// similarity score that selected it.
#[derive(Debug)]
pub struct FaqMatch<'a> {
    pub index: usize,
    pub entry: &'a FaqEntry,
    /// Similarity in `[0, 1]`; `1.0` for the exact question text.
    pub confidence: f64,
}

pub struct FaqMatcher {
    entries: Vec<FaqEntry>,
    /// Normalized key per entry, same order as `entries`.
    keys: Vec<String>,
    normalizer: Normalizer,
    threshold: f64,
}

impl FaqMatcher {
    pub fn new(entries: Vec<FaqEntry>, language: StemmerLanguage, threshold: f64) -> Self {
        let normalizer = Normalizer::new(language);
        let keys = entries
            .iter()
            .map(|e| normalizer.normalized_key(&e.question))
            .collect();
        Self {
            entries,
            keys,
            normalizer,
            threshold,
        }
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    /// Best corpus entry for `input`, or `None` when nothing scores above
    /// the threshold. Total over any input: empty strings simply fail to
    /// match.
    pub fn best_match(&self, input: &str) -> Option<FaqMatch<'_>> {
        let probe = self.normalizer.normalized_key(input);
        if probe.is_empty() {
            return None;
        }

        let mut best_index = 0usize;
        let mut best_score = f64::NEG_INFINITY;
        for (index, key) in self.keys.iter().enumerate() {
            let score = strsim::sorensen_dice(&probe, key);
            // Strictly greater keeps the first entry on ties.
            if score > best_score {
                best_index = index;
                best_score = score;
            }
        }

        if self.confident(best_score) {
            Some(FaqMatch {
                index: best_index,
                entry: &self.entries[best_index],
                confidence: best_score,
            })
        } else {
            None
        }
    }

    /// The threshold is exclusive: exactly-threshold scores do not match.
    fn confident(&self, score: f64) -> bool {
        score > self.threshold
    }
}
