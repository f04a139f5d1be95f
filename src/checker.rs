use crate::error::SpellError;
use crate::extractor::extract;
use crate::reconciler::{reconcile, CorrectionResult};
use crate::speller::Fetch;

/// Outcome of one spell check request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub result: CorrectionResult,
    /// Failure that was downgraded to "no corrections found"
    pub degraded: Option<SpellError>,
}

impl CheckReport {
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Korean spell checker backed by a remote speller service
pub struct SpellChecker<F: Fetch> {
    fetcher: F,
}

impl<F: Fetch> SpellChecker<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Check `text` and return the corrected text with its suggestions.
    ///
    /// Transport and unexpected upstream failures come back as a report
    /// carrying the unmodified text; blank input and unreadable responses
    /// are errors.
    pub async fn check(&self, text: &str) -> Result<CheckReport, SpellError> {
        if text.trim().is_empty() {
            return Err(SpellError::EmptyInput);
        }

        match self.run(text).await {
            Ok(result) => Ok(CheckReport {
                result,
                degraded: None,
            }),
            Err(e) if e.is_degradable() => {
                tracing::warn!("Spell check degraded, returning original text: {}", e);
                Ok(CheckReport {
                    result: CorrectionResult::unchanged(text),
                    degraded: Some(e),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn run(&self, text: &str) -> Result<CorrectionResult, SpellError> {
        let body = self.fetcher.fetch(text).await?;
        let extraction = extract(&body, self.fetcher.format())?;
        let result = reconcile(text, &extraction);

        tracing::debug!(
            "{} suggestions from {} records",
            result.suggestions.len(),
            extraction.records.len()
        );

        Ok(result)
    }
}
