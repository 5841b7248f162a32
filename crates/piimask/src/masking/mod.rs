//! PII detection and masking.
//!
//! Masking runs three stages per input, in order:
//!
//! - **Matcher**: every rule in the [`RuleTable`] is run over the text,
//!   producing possibly overlapping [`Candidate`]s.
//!
//! - **Resolver**: candidates are sorted by `(start, priority)` and accepted
//!   greedily when they overlap nothing accepted so far.
//!
//! - **Rewriter**: accepted spans are replaced by `[category]` placeholders
//!   and reported as [`Entity`] values in original-text coordinates.
//!
//! The whole pipeline is a pure function of its input and the rule table.
//!
//! # Example
//!
//! ```
//! use piimask::masking::{mask, Category};
//!
//! let result = mask("Reach me at jane@example.com");
//! assert_eq!(result.masked_text, "Reach me at [email]");
//! assert_eq!(result.entities[0].classification, Category::Email);
//! assert_eq!(result.entities[0].position, [12, 28]);
//! ```

mod matcher;
mod resolver;
mod rewriter;
mod rules;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use matcher::{find_candidates, Candidate};
pub use resolver::resolve;
pub use rewriter::{rewrite, Entity};
pub use rules::{builtin_rules, Category, Guard, Rule, RuleMatches, RuleTable};

/// Output of a masking call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaskResult {
    /// The input with every entity replaced by its placeholder.
    pub masked_text: String,

    /// Masked entities, non-overlapping and ordered by start.
    pub entities: Vec<Entity>,
}

impl MaskResult {
    /// Whether nothing was masked.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.entities.is_empty()
    }

    /// Split into `(masked_text, entities)`.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<Entity>) {
        (self.masked_text, self.entities)
    }
}

/// Masks PII using a fixed rule table.
///
/// Holds only a shared reference to the table, so it is cheap to copy and
/// safe to use from any number of threads at once.
#[derive(Debug, Clone, Copy)]
pub struct PiiMasker {
    rules: &'static RuleTable,
}

impl PiiMasker {
    /// Create a masker over the built-in rule table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(RuleTable::builtin())
    }

    /// Create a masker over a specific rule table.
    #[must_use]
    pub fn with_rules(rules: &'static RuleTable) -> Self {
        Self { rules }
    }

    /// The rule table in use.
    #[must_use]
    pub fn rules(&self) -> &'static RuleTable {
        self.rules
    }

    /// Detect, resolve and mask PII in `text`.
    #[must_use]
    pub fn mask(&self, text: &str) -> MaskResult {
        let candidates = find_candidates(text, self.rules);
        let accepted = resolve(candidates);
        let (masked_text, entities) = rewrite(text, &accepted);

        debug!(
            input_len = text.len(),
            masked = entities.len(),
            "Masked text"
        );

        MaskResult {
            masked_text,
            entities,
        }
    }
}

impl Default for PiiMasker {
    fn default() -> Self {
        Self::new()
    }
}

/// Mask `text` with the built-in rule table.
#[must_use]
pub fn mask(text: &str) -> MaskResult {
    PiiMasker::new().mask(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    #[test]
    fn test_mask_empty() {
        init_test_logging();
        let result = mask("");
        assert_eq!(result.masked_text, "");
        assert!(result.is_clean());
    }

    #[test]
    fn test_mask_result_into_parts() {
        let (masked, entities) = mask("cvv 999").into_parts();
        assert_eq!(masked, "cvv [cvv_no]");
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn test_masker_default_uses_builtin_table() {
        let masker = PiiMasker::default();
        assert!(std::ptr::eq(masker.rules(), RuleTable::builtin()));
    }

    #[test]
    fn test_mask_card_wins_over_shorter_number_rules() {
        init_test_logging();
        let result = mask("Card: 4111 1111 1111 1111");
        assert_eq!(result.masked_text, "Card: [credit_debit_no]");
        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0].position, [6, 25]);
    }

    #[test]
    fn test_mask_dob_beats_expiry_at_same_start() {
        init_test_logging();
        let result = mask("DOB 12/05/1990 and expiry 05/26");
        let categories: Vec<_> = result.entities.iter().map(|e| e.classification).collect();
        assert_eq!(categories, vec![Category::Dob, Category::ExpiryNo]);
        assert_eq!(result.entities[0].entity, "12/05/1990");
        assert_eq!(result.entities[1].entity, "05/26");
        assert_eq!(result.masked_text, "DOB [dob] and expiry [expiry_no]");
    }

    #[test]
    fn test_masker_is_shareable_across_threads() {
        let masker = PiiMasker::new();
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(move || masker.mask("cvv 123").masked_text))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "cvv [cvv_no]");
        }
    }
}
