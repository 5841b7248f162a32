//! `piimask` - Deterministic PII detection and masking
//!
//! This library finds personal data in free text, resolves overlapping
//! matches by a fixed priority order and replaces each surviving match with
//! a `[category]` placeholder. Masked text can then be handed to a
//! [`Classifier`] through the [`ClassificationService`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod batch;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod masking;
pub mod service;

pub use batch::{BatchMasker, LineFormat};
pub use classify::{Classifier, KeywordClassifier};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use masking::{mask, Category, Entity, MaskResult, PiiMasker};
pub use service::{ClassificationReport, ClassificationService};
