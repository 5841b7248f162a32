//! Classification of masked text.
//!
//! [`Classifier`] is the seam a statistical model plugs into: it receives
//! masked text only and returns a single label. [`KeywordClassifier`] is a
//! deterministic implementation driven by configuration, so the pipeline
//! runs end to end without a trained model.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ClassifierConfig;
use crate::error::Result;

/// Labels masked text with a category.
pub trait Classifier: Send + Sync {
    /// Return the category label for `masked_text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the classifier cannot produce a label.
    fn classify(&self, masked_text: &str) -> Result<String>;
}

impl<F> Classifier for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn classify(&self, masked_text: &str) -> Result<String> {
        self(masked_text)
    }
}

/// Picks the label whose keywords occur most often in the text.
///
/// Ties go to the label that sorts first. Text with no keyword hits gets
/// the default label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordClassifier {
    default_label: String,
    keywords: BTreeMap<String, Vec<String>>,
    case_sensitive: bool,
}

impl KeywordClassifier {
    /// Create a classifier with no keywords.
    #[must_use]
    pub fn new(default_label: impl Into<String>) -> Self {
        Self {
            default_label: default_label.into(),
            keywords: BTreeMap::new(),
            case_sensitive: false,
        }
    }

    /// Create a classifier from configuration.
    #[must_use]
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let mut classifier = Self::new(config.default_label.clone())
            .case_sensitive(config.case_sensitive);
        for (label, keywords) in &config.keywords {
            classifier = classifier.with_label(label.clone(), keywords.iter().cloned());
        }
        classifier
    }

    /// Add keywords for a label.
    #[must_use]
    pub fn with_label(
        mut self,
        label: impl Into<String>,
        keywords: impl IntoIterator<Item = String>,
    ) -> Self {
        self.keywords
            .entry(label.into())
            .or_default()
            .extend(keywords);
        self
    }

    /// Set whether keywords match case-sensitively.
    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// The label used when nothing matches.
    #[must_use]
    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// The configured labels, in tie-break order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.keywords.keys().map(String::as_str)
    }
}

fn normalize(text: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, masked_text: &str) -> Result<String> {
        let haystack = normalize(masked_text, self.case_sensitive);

        let mut best: Option<(&str, usize)> = None;
        for (label, keywords) in &self.keywords {
            let hits: usize = keywords
                .iter()
                .map(|k| haystack.matches(&normalize(k, self.case_sensitive)).count())
                .sum();
            if hits > 0 && best.map_or(true, |(_, top)| hits > top) {
                best = Some((label.as_str(), hits));
            }
        }

        let label = best.map_or(self.default_label.as_str(), |(label, _)| label);
        debug!(label = %label, "Classified masked text");
        Ok(label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn classifier() -> KeywordClassifier {
        KeywordClassifier::new("Unclassified")
            .with_label("Billing", ["invoice".to_string(), "refund".to_string()])
            .with_label("Incident", ["outage".to_string(), "down".to_string()])
    }

    #[test]
    fn test_default_label_when_no_hits() {
        let label = classifier().classify("Hello [full_name]").unwrap();
        assert_eq!(label, "Unclassified");
    }

    #[test]
    fn test_most_hits_wins() {
        let label = classifier()
            .classify("The site is down, an outage since [dob]; any refund?")
            .unwrap();
        assert_eq!(label, "Incident");
    }

    #[test]
    fn test_tie_goes_to_first_label() {
        let label = classifier().classify("refund after outage").unwrap();
        assert_eq!(label, "Billing");
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let label = classifier().classify("INVOICE attached").unwrap();
        assert_eq!(label, "Billing");
    }

    #[test]
    fn test_case_sensitive() {
        let classifier = KeywordClassifier::new("Other")
            .case_sensitive(true)
            .with_label("Urgent", ["URGENT".to_string()]);
        assert_eq!(classifier.classify("urgent please").unwrap(), "Other");
        assert_eq!(classifier.classify("URGENT please").unwrap(), "Urgent");
    }

    #[test]
    fn test_from_config() {
        let mut config = ClassifierConfig::default();
        config
            .keywords
            .insert("Request".to_string(), vec!["Please".to_string()]);
        let classifier = KeywordClassifier::from_config(&config);

        assert_eq!(classifier.default_label(), "Unclassified");
        assert_eq!(classifier.labels().collect::<Vec<_>>(), vec!["Request"]);
        assert_eq!(classifier.classify("please help").unwrap(), "Request");
    }

    #[test]
    fn test_closure_classifier() {
        let fixed = |_: &str| -> Result<String> { Ok("Change".to_string()) };
        assert_eq!(fixed.classify("anything").unwrap(), "Change");

        let failing = |_: &str| -> Result<String> { Err(Error::classification("no model")) };
        assert!(failing.classify("anything").is_err());
    }
}
