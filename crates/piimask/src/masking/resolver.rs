//! Overlap resolution.
//!
//! Candidates are ordered by `(start, priority)` and accepted greedily: a
//! candidate survives only if it overlaps nothing accepted before it. There
//! is no backtracking, so priority decides only between candidates that
//! start at the same offset. An earlier-starting match always blocks a
//! later one it overlaps, whatever their priorities.

use tracing::{debug, trace};

use super::matcher::Candidate;

/// Select the non-overlapping candidates to mask, ordered by start.
///
/// The sort is stable, so candidates with equal start and priority keep
/// their rule table order.
#[must_use]
pub fn resolve(mut candidates: Vec<Candidate<'_>>) -> Vec<Candidate<'_>> {
    candidates.sort_by_key(|c| (c.start, c.priority));

    let total = candidates.len();
    let mut accepted: Vec<Candidate<'_>> = Vec::with_capacity(total);

    for candidate in candidates {
        if let Some(kept) = accepted.iter().find(|kept| kept.overlaps(&candidate)) {
            trace!(
                discarded = %candidate.category,
                start = candidate.start,
                end = candidate.end,
                kept = %kept.category,
                "Candidate overlaps accepted span"
            );
            continue;
        }
        accepted.push(candidate);
    }

    debug!(candidates = total, accepted = accepted.len(), "Resolved overlaps");
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use crate::masking::rules::Category;

    fn candidate(start: usize, end: usize, category: Category, priority: u8) -> Candidate<'static> {
        Candidate {
            start,
            end,
            category,
            priority,
            text: "",
        }
    }

    fn spans(accepted: &[Candidate<'_>]) -> Vec<(usize, usize, Category)> {
        accepted.iter().map(|c| (c.start, c.end, c.category)).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve(Vec::new()).is_empty());
    }

    #[test]
    fn test_disjoint_candidates_all_kept_in_start_order() {
        let accepted = resolve(vec![
            candidate(10, 12, Category::CvvNo, 1),
            candidate(0, 4, Category::Email, 1),
            candidate(5, 9, Category::Dob, 2),
        ]);
        assert_eq!(
            spans(&accepted),
            vec![
                (0, 4, Category::Email),
                (5, 9, Category::Dob),
                (10, 12, Category::CvvNo),
            ]
        );
    }

    #[test]
    fn test_same_start_lower_priority_number_wins() {
        let accepted = resolve(vec![
            candidate(0, 12, Category::PhoneNumber, 3),
            candidate(0, 14, Category::AadharNum, 2),
            candidate(0, 19, Category::CreditDebitNo, 1),
        ]);
        assert_eq!(spans(&accepted), vec![(0, 19, Category::CreditDebitNo)]);
    }

    #[test]
    fn test_same_start_same_priority_keeps_table_order() {
        let accepted = resolve(vec![
            candidate(4, 14, Category::Dob, 2),
            candidate(4, 9, Category::ExpiryNo, 2),
        ]);
        assert_eq!(spans(&accepted), vec![(4, 14, Category::Dob)]);
    }

    #[test]
    fn test_earlier_start_blocks_higher_priority() {
        init_test_logging();
        let accepted = resolve(vec![
            candidate(3, 22, Category::CreditDebitNo, 1),
            candidate(0, 17, Category::PhoneNumber, 3),
        ]);
        assert_eq!(spans(&accepted), vec![(0, 17, Category::PhoneNumber)]);
    }

    #[test]
    fn test_no_reconsideration_after_discard() {
        init_test_logging();
        // B is discarded by A; C would only have conflicted with B.
        let accepted = resolve(vec![
            candidate(0, 5, Category::FullName, 2),
            candidate(4, 10, Category::Email, 1),
            candidate(8, 12, Category::CvvNo, 1),
        ]);
        assert_eq!(
            spans(&accepted),
            vec![(0, 5, Category::FullName), (8, 12, Category::CvvNo)]
        );
    }

    #[test]
    fn test_touching_spans_do_not_overlap() {
        let accepted = resolve(vec![
            candidate(0, 5, Category::FullName, 2),
            candidate(5, 8, Category::CvvNo, 1),
        ]);
        assert_eq!(accepted.len(), 2);
    }
}
