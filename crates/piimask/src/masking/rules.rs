//! The fixed PII rule table.
//!
//! Each [`Rule`] pairs a [`Category`] with a compiled regex and a priority
//! (lower number wins ties at equal start offsets). The table is built once
//! per process and shared read-only by every masking call.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A category of personally identifiable information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// An email address.
    Email,
    /// A 16-digit card number.
    CreditDebitNo,
    /// A 12-digit Aadhaar number.
    AadharNum,
    /// A 10 to 13 digit phone number.
    PhoneNumber,
    /// Two or more capitalized words.
    FullName,
    /// A date of birth in `DD/MM/YYYY` or `DD-MM-YYYY` form.
    Dob,
    /// A card expiry date (`MM/YY` or `MM/YYYY`).
    ExpiryNo,
    /// A standalone 3-digit card verification value.
    CvvNo,
}

impl Category {
    /// Every category, in rule table order.
    pub const ALL: [Category; 8] = [
        Self::Email,
        Self::CreditDebitNo,
        Self::AadharNum,
        Self::PhoneNumber,
        Self::FullName,
        Self::Dob,
        Self::ExpiryNo,
        Self::CvvNo,
    ];

    /// The snake_case identifier used in placeholders and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::CreditDebitNo => "credit_debit_no",
            Self::AadharNum => "aadhar_num",
            Self::PhoneNumber => "phone_number",
            Self::FullName => "full_name",
            Self::Dob => "dob",
            Self::ExpiryNo => "expiry_no",
            Self::CvvNo => "cvv_no",
        }
    }

    /// The literal token substituted for a masked span, e.g. `[email]`.
    #[must_use]
    pub fn placeholder(self) -> String {
        format!("[{}]", self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Extra condition a raw regex match must satisfy.
///
/// The `regex` crate has no look-around, so the two rules that need it
/// check their context here instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Guard {
    /// Every match is accepted.
    #[default]
    Always,

    /// Rejects a match whose first word is exactly `My`.
    NotLeadingMy,

    /// Rejects a match immediately preceded by `[` or followed by `]`.
    NotBracketed,
}

impl Guard {
    /// Check the match `text[start..end]` against this guard.
    #[must_use]
    pub fn accepts(self, text: &str, start: usize, end: usize) -> bool {
        match self {
            Self::Always => true,
            Self::NotLeadingMy => {
                let matched = &text[start..end];
                match matched.strip_prefix("My") {
                    Some(rest) => rest.chars().next().is_some_and(is_word_char),
                    None => true,
                }
            }
            Self::NotBracketed => {
                let before = text[..start].chars().next_back();
                let after = text[end..].chars().next();
                before != Some('[') && after != Some(']')
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A compiled PII rule.
#[derive(Debug)]
pub struct Rule {
    /// Category reported for matches of this rule.
    pub category: Category,

    /// Precedence among candidates sharing a start offset (lower wins).
    pub priority: u8,

    /// Description of what this rule matches.
    pub description: &'static str,

    regex: Regex,
    guard: Guard,
}

impl Rule {
    /// Create a new rule with no guard.
    ///
    /// # Panics
    ///
    /// Panics if the regex pattern is invalid.
    #[must_use]
    pub fn new(category: Category, priority: u8, description: &'static str, pattern: &str) -> Self {
        Self {
            category,
            priority,
            description,
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
            guard: Guard::Always,
        }
    }

    /// Attach a guard to this rule.
    #[must_use]
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    /// The source regex.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// The guard applied to raw matches.
    #[must_use]
    pub fn guard(&self) -> Guard {
        self.guard
    }

    /// Iterate over the non-overlapping, guard-accepted matches in `text`.
    ///
    /// When the guard rejects a match the scan resumes one character past
    /// the rejected start, so a shorter match inside it can still surface.
    #[must_use]
    pub fn find_all<'r, 't>(&'r self, text: &'t str) -> RuleMatches<'r, 't> {
        RuleMatches {
            rule: self,
            text,
            pos: 0,
        }
    }
}

/// Iterator returned by [`Rule::find_all`].
#[derive(Debug)]
pub struct RuleMatches<'r, 't> {
    rule: &'r Rule,
    text: &'t str,
    pos: usize,
}

impl<'t> Iterator for RuleMatches<'_, 't> {
    type Item = regex::Match<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos <= self.text.len() {
            let m = self.rule.regex.find_at(self.text, self.pos)?;
            if self.rule.guard.accepts(self.text, m.start(), m.end()) {
                self.pos = if m.is_empty() {
                    next_char_boundary(self.text, m.end())
                } else {
                    m.end()
                };
                return Some(m);
            }
            self.pos = next_char_boundary(self.text, m.start());
        }
        None
    }
}

fn next_char_boundary(text: &str, at: usize) -> usize {
    at + text[at..].chars().next().map_or(1, char::len_utf8)
}

/// The ordered, immutable set of rules the matcher scans with.
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

static BUILTIN: Lazy<RuleTable> = Lazy::new(|| RuleTable::from_rules(builtin_rules()));

impl RuleTable {
    /// Build a table from rules. Table order breaks ties that priority
    /// cannot.
    #[must_use]
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The process-wide built-in table.
    #[must_use]
    pub fn builtin() -> &'static RuleTable {
        &BUILTIN
    }

    /// All rules in table order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Look up the rule for a category.
    #[must_use]
    pub fn get(&self, category: Category) -> Option<&Rule> {
        self.rules.iter().find(|r| r.category == category)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Build the built-in rules in scan order.
#[must_use]
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            Category::Email,
            1,
            "Email addresses (local-part@domain)",
            r"\b[\w.-]+@[\w.-]+\.\w+\b",
        ),
        Rule::new(
            Category::CreditDebitNo,
            1,
            "16-digit card numbers, optionally in four groups of four",
            r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b",
        ),
        Rule::new(
            Category::AadharNum,
            2,
            "12-digit Aadhaar numbers, optionally in three groups of four",
            r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}\b",
        ),
        Rule::new(
            Category::PhoneNumber,
            3,
            "Phone numbers with optional country code and separators",
            r"\+?\d{1,3}[-\s]?\d{1,4}[-\s]?\d{3,4}[-\s]?\d{4}",
        ),
        Rule::new(
            Category::FullName,
            2,
            "Two or more consecutive capitalized words, not led by \"My\"",
            r"\b[A-Z][a-z]+(?: [A-Z][a-z]+)+\b",
        )
        .with_guard(Guard::NotLeadingMy),
        Rule::new(
            Category::Dob,
            2,
            "Dates in DD/MM/YYYY or DD-MM-YYYY form",
            r"\b\d{2}[/-]\d{2}[/-]\d{4}\b",
        ),
        Rule::new(
            Category::ExpiryNo,
            2,
            "Card expiry dates (MM/YY or MM/YYYY)",
            r"\b(?:0[1-9]|1[0-2])[/-](?:\d{2}|\d{4})\b",
        ),
        Rule::new(
            Category::CvvNo,
            1,
            "Standalone 3-digit numbers outside square brackets",
            r"\b\d{3}\b",
        )
        .with_guard(Guard::NotBracketed),
    ]
}
