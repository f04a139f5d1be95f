//! Reconciliation of extracted error records with the original text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::extractor::{ErrorRecord, Extraction, Format};

/// Corrected text and suggestions for one request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CorrectionResult {
    /// Text after corrections were applied
    pub corrected_text: String,
    /// Whether the upstream reported at least one issue
    pub was_corrected: bool,
    /// Fragment → suggestion, first occurrence wins
    pub suggestions: IndexMap<String, String>,
    /// Records as reported upstream, explanations included
    pub records: Vec<ErrorRecord>,
}

impl CorrectionResult {
    /// Result for text that received no corrections.
    pub fn unchanged(text: &str) -> Self {
        Self {
            corrected_text: text.to_string(),
            ..Default::default()
        }
    }
}

/// Reconcile an extraction with the text it was produced for.
///
/// The markup upstream leaves substitution to the client ([`apply_sequential`]).
/// The JSON upstream corrects the sentence itself; its text is used as-is,
/// and a response without one keeps the original text.
pub fn reconcile(original_text: &str, extraction: &Extraction) -> CorrectionResult {
    if extraction.records.is_empty() {
        return CorrectionResult::unchanged(original_text);
    }

    let corrected_text = match extraction.format {
        Format::EmbeddedJson => apply_sequential(original_text, &extraction.records),
        Format::DirectJson => match extraction.upstream_text {
            Some(ref text) => text.clone(),
            None => {
                tracing::warn!("JSON response carried no corrected sentence, keeping original text");
                original_text.to_string()
            }
        },
    };

    CorrectionResult {
        corrected_text,
        was_corrected: true,
        suggestions: collect_suggestions(&extraction.records),
        records: extraction.records.clone(),
    }
}

/// Replace the first remaining occurrence of each fragment, in record order.
///
/// Each search runs on the text as already modified by earlier records.
/// A fragment that is no longer present is skipped.
pub fn apply_sequential(original_text: &str, records: &[ErrorRecord]) -> String {
    let mut corrected = original_text.to_string();

    for record in records {
        if corrected.contains(&record.original_fragment) {
            corrected = corrected.replacen(&record.original_fragment, &record.suggested_fragment, 1);
        } else {
            tracing::debug!(
                "fragment '{}' no longer present, skipping",
                record.original_fragment
            );
        }
    }

    corrected
}

fn collect_suggestions(records: &[ErrorRecord]) -> IndexMap<String, String> {
    let mut suggestions = IndexMap::new();
    for record in records {
        suggestions
            .entry(record.original_fragment.clone())
            .or_insert_with(|| record.suggested_fragment.clone());
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract;
    use pretty_assertions::assert_eq;

    fn record(original: &str, suggested: &str) -> ErrorRecord {
        ErrorRecord {
            original_fragment: original.to_string(),
            suggested_fragment: suggested.to_string(),
            explanation: String::new(),
        }
    }

    fn embedded(records: Vec<ErrorRecord>) -> Extraction {
        Extraction {
            format: Format::EmbeddedJson,
            records,
            upstream_text: None,
        }
    }

    #[test]
    fn test_no_records_keeps_text() {
        let result = reconcile("맞는 문장입니다", &embedded(vec![]));

        assert_eq!(result.corrected_text, "맞는 문장입니다");
        assert!(!result.was_corrected);
        assert!(result.suggestions.is_empty());
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_spacing_correction() {
        let result = reconcile(
            "아버지가방에들어가신다",
            &embedded(vec![record("아버지가방에", "아버지가 방에")]),
        );

        assert_eq!(result.corrected_text, "아버지가 방에들어가신다");
        assert!(result.was_corrected);
        assert_eq!(
            result.suggestions.get("아버지가방에").map(String::as_str),
            Some("아버지가 방에")
        );
        assert_eq!(result.suggestions.len(), 1);
    }

    #[test]
    fn test_duplicate_fragments_first_wins() {
        let records = vec![
            record("됬다", "됐다"),
            record("안되", "안 돼"),
            record("됬다", "되었다"),
        ];
        let result = reconcile("됬다 안되 됬다", &embedded(records.clone()));

        assert!(result.suggestions.len() <= records.len());
        let pairs: Vec<(&str, &str)> = result
            .suggestions
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, vec![("됬다", "됐다"), ("안되", "안 돼")]);

        // Every record still substitutes its own first remaining occurrence
        assert_eq!(result.corrected_text, "됐다 안 돼 되었다");
    }

    #[test]
    fn test_replaces_only_first_occurrence() {
        let corrected = apply_sequential("외않되 외않되", &[record("외않되", "왜 안 돼")]);
        assert_eq!(corrected, "왜 안 돼 외않되");
    }

    #[test]
    fn test_absent_fragment_is_skipped() {
        let corrected = apply_sequential("문장", &[record("없는말", "있는 말")]);
        assert_eq!(corrected, "문장");
    }

    #[test]
    fn test_overlapping_fragments_cascade() {
        // The second fragment was consumed by the first substitution
        let records = vec![record("가방에", "가 방에"), record("지가방", "지 가방")];
        let corrected = apply_sequential("아버지가방에", &records);
        assert_eq!(corrected, "아버지가 방에");
    }

    #[test]
    fn test_later_search_sees_modified_text() {
        let records = vec![record("ab", "xy"), record("yc", "Z")];
        assert_eq!(apply_sequential("abc", &records), "xZ");
    }

    #[test]
    fn test_reapplying_is_noop() {
        let records = vec![record("됬다", "됐다"), record("안되요", "안 돼요")];
        let first = apply_sequential("일이 됬다. 안되요.", &records);
        let second = apply_sequential(&first, &records);

        assert_eq!(first, "일이 됐다. 안 돼요.");
        assert_eq!(second, first);
    }

    #[test]
    fn test_identity_suggestion_still_counts() {
        let result = reconcile("그대로", &embedded(vec![record("그대로", "그대로")]));

        assert!(result.was_corrected);
        assert_eq!(result.corrected_text, "그대로");
        assert_eq!(result.suggestions.len(), 1);
    }

    #[test]
    fn test_empty_suggestion_deletes() {
        let corrected = apply_sequential("정말 정말 좋다", &[record("정말 ", "")]);
        assert_eq!(corrected, "정말 좋다");
    }

    #[test]
    fn test_upstream_text_is_used_verbatim() {
        let extraction = Extraction {
            format: Format::DirectJson,
            records: vec![record("됬다", "됐다")],
            upstream_text: Some("일이 됐다".to_string()),
        };
        let result = reconcile("일이 됬다", &extraction);

        assert_eq!(result.corrected_text, "일이 됐다");
        assert!(result.was_corrected);
    }

    #[test]
    fn test_direct_without_html_keeps_original() {
        let body = r#"{"ErrInfo":[{"WrongWord":"됬다","RightWord":"됐다"}]}"#;
        let extraction = extract(body, Format::DirectJson).unwrap();
        let result = reconcile("일이 됬다", &extraction);

        assert_eq!(result.corrected_text, "일이 됬다");
        assert!(result.was_corrected);
        assert_eq!(result.suggestions.get("됬다").map(String::as_str), Some("됐다"));
    }

    #[test]
    fn test_embedded_ignores_upstream_text() {
        let extraction = Extraction {
            format: Format::EmbeddedJson,
            records: vec![record("됬다", "됐다")],
            upstream_text: Some("무시될 문장".to_string()),
        };
        let result = reconcile("일이 됬다", &extraction);
        assert_eq!(result.corrected_text, "일이 됐다");
    }

    #[test]
    fn test_upstream_text_ignored_without_records() {
        let extraction = Extraction {
            format: Format::DirectJson,
            records: vec![],
            upstream_text: Some("다른 문장".to_string()),
        };
        let result = reconcile("원래 문장", &extraction);
        assert_eq!(result.corrected_text, "원래 문장");
    }

    #[test]
    fn test_unchanged_result() {
        let result = CorrectionResult::unchanged("텍스트");
        assert_eq!(result.corrected_text, "텍스트");
        assert!(!result.was_corrected);
        assert!(result.suggestions.is_empty());
    }
}
