//! FAQ corpus loading.
//!
//! The corpus file is read exactly once at startup and is read-only at
//! runtime; there is no hot reload.

use std::collections::HashSet;
use std::path::Path;

use ub_domain::error::{Error, Result};
use ub_domain::faq::FaqEntry;

/// Load the ordered corpus from a JSON file of `{question, answer}`
/// records. Duplicate questions are accepted (the matcher's tie-break
/// makes the first occurrence win) but logged.
pub fn load_corpus(path: &Path) -> Result<Vec<FaqEntry>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::Corpus(format!("reading {}: {e}", path.display()))
    })?;
    let entries: Vec<FaqEntry> = serde_json::from_str(&raw)?;

    let mut seen = HashSet::new();
    for entry in &entries {
        if !seen.insert(entry.question.as_str()) {
            tracing::warn!(question = %entry.question, "duplicate corpus question");
        }
    }

    tracing::info!(
        count = entries.len(),
        path = %path.display(),
        "FAQ corpus loaded"
    );
    Ok(entries)
}
