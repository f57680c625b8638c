use crate::index::posting::Posting;

/// Scorer trait
pub trait Scorer: Send + Sync {
    /// Contribution of one matched query token in one document.
    fn score(&self, posting: &Posting) -> f32;

    fn name(&self) -> &str;
}

/// Term-match scorer: every matched token is worth its frequency in the
/// field, times a constant boost.
pub struct TermFrequencyScorer {
    pub boost: f32,
}

impl Default for TermFrequencyScorer {
    fn default() -> Self {
        TermFrequencyScorer { boost: 1.0 }
    }
}

impl TermFrequencyScorer {
    pub fn new(boost: f32) -> Self {
        TermFrequencyScorer { boost }
    }
}

impl Scorer for TermFrequencyScorer {
    fn score(&self, posting: &Posting) -> f32 {
        posting.term_freq as f32 * self.boost
    }

    fn name(&self) -> &str {
        "term_frequency"
    }
}
