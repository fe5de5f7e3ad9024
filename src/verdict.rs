use crate::types::Classification;

/// Confidence below this percentage is treated as too weak to act on.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 50.0;

const BENIGN_MARKERS: [&str; 2] = ["normal", "clean"];

/// How a classification should be presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Benign,
    Flagged,
}

/// True when the category name itself signals a harmless comment.
pub fn category_reads_benign(category: &str) -> bool {
    let lowered = category.to_lowercase();
    lowered.contains("non") || BENIGN_MARKERS.contains(&lowered.as_str())
}

/// True when the confidence is too low to trust the flagged category.
pub fn confidence_is_low(confidence: f64) -> bool {
    confidence < LOW_CONFIDENCE_THRESHOLD
}

/// Combines the two signals. They are independent: a benign-sounding
/// category is benign at any confidence, and a weak confidence downgrades
/// even a flagged category to benign.
pub fn verdict_for(classification: &Classification) -> Verdict {
    if category_reads_benign(&classification.category)
        || confidence_is_low(classification.confidence)
    {
        Verdict::Benign
    } else {
        Verdict::Flagged
    }
}
