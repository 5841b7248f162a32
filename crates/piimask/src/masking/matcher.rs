//! Candidate collection.
//!
//! Every rule is run over the whole text independently; overlapping and
//! identical spans from different rules are all kept for the resolver.

use tracing::trace;

use super::rules::{Category, RuleTable};

/// A provisional match, before overlap resolution.
///
/// Offsets are byte offsets into the scanned text and always fall on
/// character boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'t> {
    /// Start of the span (inclusive).
    pub start: usize,
    /// End of the span (exclusive).
    pub end: usize,
    /// Category of the rule that produced the match.
    pub category: Category,
    /// Priority copied from the rule.
    pub priority: u8,
    /// The matched text, equal to `text[start..end]`.
    pub text: &'t str,
}

impl Candidate<'_> {
    /// Half-open interval overlap test.
    #[must_use]
    pub fn overlaps(&self, other: &Candidate<'_>) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Collect every match of every rule in `text`, in rule table order.
#[must_use]
pub fn find_candidates<'t>(text: &'t str, rules: &RuleTable) -> Vec<Candidate<'t>> {
    let mut candidates = Vec::new();

    for rule in rules.rules() {
        let before = candidates.len();
        candidates.extend(rule.find_all(text).map(|m| Candidate {
            start: m.start(),
            end: m.end(),
            category: rule.category,
            priority: rule.priority,
            text: m.as_str(),
        }));
        trace!(
            category = %rule.category,
            count = candidates.len() - before,
            "Rule scanned"
        );
    }

    candidates
}
