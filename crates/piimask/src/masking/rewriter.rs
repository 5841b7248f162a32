//! Placeholder substitution and the entity report.

use serde::{Deserialize, Serialize};

use super::matcher::Candidate;
use super::rules::Category;

/// A masked entity, positioned in the original text.
///
/// `position` holds `[start, end)` as character (Unicode scalar) offsets
/// into the input, not byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Character span `[start, end)` in the original text.
    pub position: [usize; 2],

    /// Category of the entity.
    pub classification: Category,

    /// The original matched text.
    pub entity: String,
}

impl Entity {
    /// Start character offset.
    #[must_use]
    pub fn start(&self) -> usize {
        self.position[0]
    }

    /// End character offset (exclusive).
    #[must_use]
    pub fn end(&self) -> usize {
        self.position[1]
    }

    /// Whether two entities share any character.
    #[must_use]
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }
}

/// Replace each accepted span with its placeholder and build the report.
///
/// `accepted` must be pairwise non-overlapping but may come in any order.
/// Substitution runs from the last span to the first so the byte offsets
/// of spans not yet replaced stay valid. The report lists entities by
/// ascending start with their pre-substitution positions.
#[must_use]
pub fn rewrite(text: &str, accepted: &[Candidate<'_>]) -> (String, Vec<Entity>) {
    let mut ordered: Vec<&Candidate<'_>> = accepted.iter().collect();
    ordered.sort_by_key(|c| c.start);

    let mut masked = text.to_string();
    for candidate in ordered.iter().rev() {
        masked.replace_range(candidate.start..candidate.end, &candidate.category.placeholder());
    }

    let mut entities = Vec::with_capacity(ordered.len());
    let mut byte_cursor = 0;
    let mut char_cursor = 0;
    for candidate in ordered {
        char_cursor += text[byte_cursor..candidate.start].chars().count();
        let start = char_cursor;
        char_cursor += candidate.text.chars().count();
        byte_cursor = candidate.end;

        entities.push(Entity {
            position: [start, char_cursor],
            classification: candidate.category,
            entity: candidate.text.to_string(),
        });
    }

    (masked, entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate<'t>(text: &'t str, start: usize, end: usize, category: Category) -> Candidate<'t> {
        Candidate {
            start,
            end,
            category,
            priority: 1,
            text: &text[start..end],
        }
    }

    #[test]
    fn test_no_entities_leaves_text_unchanged() {
        let (masked, entities) = rewrite("nothing to see", &[]);
        assert_eq!(masked, "nothing to see");
        assert!(entities.is_empty());
    }

    #[test]
    fn test_replaces_in_any_input_order() {
        let text = "a 123 b 456 c";
        let accepted = [
            candidate(text, 8, 11, Category::CvvNo),
            candidate(text, 2, 5, Category::CvvNo),
        ];
        let (masked, entities) = rewrite(text, &accepted);

        assert_eq!(masked, "a [cvv_no] b [cvv_no] c");
        assert_eq!(entities[0].position, [2, 5]);
        assert_eq!(entities[1].position, [8, 11]);
        assert_eq!(entities[0].entity, "123");
        assert_eq!(entities[1].entity, "456");
    }

    #[test]
    fn test_placeholder_longer_and_shorter_than_span() {
        let text = "x@y.io and Jo Bo";
        let accepted = [
            candidate(text, 0, 6, Category::Email),
            candidate(text, 11, 16, Category::FullName),
        ];
        let (masked, _) = rewrite(text, &accepted);
        assert_eq!(masked, "[email] and [full_name]");
    }

    #[test]
    fn test_positions_are_character_offsets() {
        let text = "Zoë → 123";
        let start = text.find("123").unwrap();
        let accepted = [candidate(text, start, start + 3, Category::CvvNo)];
        let (masked, entities) = rewrite(text, &accepted);

        assert_eq!(masked, "Zoë → [cvv_no]");
        assert_eq!(entities[0].position, [6, 9]);
        let chars: String = text.chars().skip(6).take(3).collect();
        assert_eq!(chars, entities[0].entity);
    }

    #[test]
    fn test_entity_serializes_in_report_shape() {
        let entity = Entity {
            position: [8, 18],
            classification: Category::FullName,
            entity: "John Smith".to_string(),
        };
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "position": [8, 18],
                "classification": "full_name",
                "entity": "John Smith"
            })
        );
    }

    #[test]
    fn test_entity_overlaps() {
        let a = Entity {
            position: [0, 5],
            classification: Category::Dob,
            entity: String::new(),
        };
        let b = Entity {
            position: [5, 9],
            ..a.clone()
        };
        let c = Entity {
            position: [4, 6],
            ..a.clone()
        };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }
}
