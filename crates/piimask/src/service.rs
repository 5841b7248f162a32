//! Mask-then-classify service.
//!
//! Combines the masking engine with a [`Classifier`] and produces the
//! response body a request handler would return. The classifier only ever
//! sees masked text. No transport is bound here.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classify::Classifier;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::masking::{Entity, MaskResult, PiiMasker};

/// Combined result of masking and classifying one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// The raw input, unmodified.
    pub input_email_body: String,

    /// Entities masked out of the input.
    pub list_of_masked_entities: Vec<Entity>,

    /// The input with entities replaced by placeholders.
    pub masked_email: String,

    /// Label assigned by the classifier.
    pub category_of_the_email: String,
}

/// Reject `text` if it is longer than `limit` bytes.
///
/// # Errors
///
/// Returns [`Error::InputTooLarge`] when the limit is exceeded.
pub fn ensure_within_limit(text: &str, limit: Option<usize>) -> Result<()> {
    match limit {
        Some(limit) if text.len() > limit => Err(Error::InputTooLarge {
            len: text.len(),
            limit,
        }),
        _ => Ok(()),
    }
}

/// Masks raw text, then classifies the masked text.
pub struct ClassificationService<C> {
    masker: PiiMasker,
    classifier: C,
    max_input_bytes: Option<usize>,
}

impl<C: Classifier> ClassificationService<C> {
    /// Create a service with the built-in rules and no input limit.
    #[must_use]
    pub fn new(classifier: C) -> Self {
        Self {
            masker: PiiMasker::new(),
            classifier,
            max_input_bytes: None,
        }
    }

    /// Create a service using the limits in `config`.
    #[must_use]
    pub fn from_config(config: &Config, classifier: C) -> Self {
        Self::new(classifier).with_max_input_bytes(config.max_input_bytes())
    }

    /// Set the input size limit in bytes (`None` for unlimited).
    #[must_use]
    pub fn with_max_input_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_input_bytes = limit;
        self
    }

    /// The classifier in use.
    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Mask `raw` after checking the input limit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputTooLarge`] if `raw` exceeds the limit.
    pub fn mask(&self, raw: &str) -> Result<MaskResult> {
        ensure_within_limit(raw, self.max_input_bytes)?;
        Ok(self.masker.mask(raw))
    }

    /// Mask `raw`, classify the masked text and bundle the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is too large or the classifier fails.
    pub fn process(&self, raw: &str) -> Result<ClassificationReport> {
        let (masked_email, entities) = self.mask(raw)?.into_parts();

        let category = self.classifier.classify(&masked_email).map_err(|e| {
            warn!(error = %e, "Classifier failed");
            e
        })?;

        info!(
            entities = entities.len(),
            category = %category,
            "Processed input"
        );

        Ok(ClassificationReport {
            input_email_body: raw.to_string(),
            list_of_masked_entities: entities,
            masked_email,
            category_of_the_email: category,
        })
    }
}

impl<C> fmt::Debug for ClassificationService<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationService")
            .field("masker", &self.masker)
            .field("max_input_bytes", &self.max_input_bytes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::KeywordClassifier;
    use crate::masking::Category;

    fn service() -> ClassificationService<KeywordClassifier> {
        ClassificationService::new(
            KeywordClassifier::new("Unclassified")
                .with_label("Billing", ["charged".to_string()]),
        )
    }

    #[test]
    fn test_ensure_within_limit() {
        assert!(ensure_within_limit("abc", None).is_ok());
        assert!(ensure_within_limit("abc", Some(3)).is_ok());
        let err = ensure_within_limit("abcd", Some(3)).unwrap_err();
        assert!(matches!(err, Error::InputTooLarge { len: 4, limit: 3 }));
    }

    #[test]
    fn test_process_builds_report() {
        let raw = "My Account was charged twice, card 4111 1111 1111 1111";
        let report = service().process(raw).unwrap();

        assert_eq!(report.input_email_body, raw);
        assert_eq!(
            report.masked_email,
            "My Account was charged twice, card [credit_debit_no]"
        );
        assert_eq!(report.list_of_masked_entities.len(), 1);
        assert_eq!(
            report.list_of_masked_entities[0].classification,
            Category::CreditDebitNo
        );
        assert_eq!(report.category_of_the_email, "Billing");
    }

    #[test]
    fn test_classifier_sees_only_masked_text() {
        let service = ClassificationService::new(|masked: &str| -> Result<String> {
            assert!(!masked.contains("jane@example.com"));
            Ok("Request".to_string())
        });
        let report = service.process("write to jane@example.com").unwrap();
        assert_eq!(report.masked_email, "write to [email]");
        assert_eq!(report.category_of_the_email, "Request");
    }

    #[test]
    fn test_classifier_failure_propagates() {
        let service = ClassificationService::new(|_: &str| -> Result<String> {
            Err(Error::classification("model not loaded"))
        });
        let err = service.process("hello").unwrap_err();
        assert!(matches!(err, Error::Classification { .. }));
    }

    #[test]
    fn test_input_limit_enforced() {
        let service = service().with_max_input_bytes(Some(5));
        let err = service.process("this is too long").unwrap_err();
        assert!(err.is_input_too_large());
        assert!(service.mask("short").is_ok());
    }

    #[test]
    fn test_from_config_uses_limit() {
        let mut config = Config::default();
        config.masking.max_input_bytes = 2;
        let service = ClassificationService::from_config(&config, KeywordClassifier::new("x"));
        assert!(service.mask("abc").is_err());
    }

    #[test]
    fn test_report_field_names() {
        let report = service().process("hi").unwrap();
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "input_email_body",
            "list_of_masked_entities",
            "masked_email",
            "category_of_the_email",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_debug_omits_classifier() {
        let debug = format!("{:?}", service());
        assert!(debug.contains("ClassificationService"));
        assert!(debug.contains("max_input_bytes"));
    }
}
