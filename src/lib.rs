//! hanspell - Korean spell-checking client
//!
//! Submits Korean text to a remote speller service, extracts the reported
//! errors from its response and reconciles them with the original text.

pub mod checker;
pub mod config;
pub mod error;
pub mod extractor;
pub mod reconciler;
pub mod render;
pub mod speller;

pub use checker::{CheckReport, SpellChecker};
pub use error::SpellError;
pub use extractor::{ErrorRecord, Extraction, ExtractionError, Format};
pub use reconciler::CorrectionResult;
