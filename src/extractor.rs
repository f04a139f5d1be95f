//! Extraction of error records from speller service responses.
//!
//! Two upstream shapes are supported. The markup upstream embeds a JSON
//! array under `"errInfo":` somewhere inside an HTML page, while the JSON
//! upstream answers with a top-level object carrying `ErrInfo` and an `Html`
//! fragment of the corrected sentence. Both are normalized into
//! [`ErrorRecord`]s.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Field that opens the error array inside a markup response
const ERR_INFO_KEY: &str = "\"errInfo\":";

/// A record's closing brace followed by the array's closing bracket
const RECORD_ARRAY_CLOSE: &str = "}]";

/// Separator between candidates in `candWord`/`RightWord`
const CANDIDATE_SEPARATOR: char = '|';

/// Upstream response format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// HTML page with the error list embedded as a JSON literal
    #[default]
    EmbeddedJson,
    /// Top-level JSON object with `Html` and `ErrInfo`
    DirectJson,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::EmbeddedJson => f.write_str("embedded-json"),
            Format::DirectJson => f.write_str("direct-json"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "embedded-json" | "embedded" | "html" => Ok(Format::EmbeddedJson),
            "direct-json" | "direct" | "json" => Ok(Format::DirectJson),
            other => Err(format!(
                "unknown format '{}' (expected 'embedded-json' or 'direct-json')",
                other
            )),
        }
    }
}

/// One spelling or grammar issue reported by the upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Erroneous fragment of the input text (never empty)
    pub original_fragment: String,
    /// Preferred replacement; empty means "delete the fragment"
    pub suggested_fragment: String,
    /// Upstream explanation, possibly empty
    pub explanation: String,
}

impl ErrorRecord {
    /// Build a record from a raw candidate list, keeping only the first
    /// candidate. Returns `None` when the fragment is empty.
    pub fn from_candidates(
        original: impl Into<String>,
        candidates: &str,
        explanation: impl Into<String>,
    ) -> Option<Self> {
        let original_fragment = original.into();
        if original_fragment.is_empty() {
            return None;
        }

        Some(Self {
            original_fragment,
            suggested_fragment: first_candidate(candidates).to_string(),
            explanation: explanation.into(),
        })
    }
}

/// Normalized result of reading one upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Format the body was read as
    pub format: Format,
    /// Records in upstream order
    pub records: Vec<ErrorRecord>,
    /// Corrected sentence supplied by the upstream, tags stripped.
    /// Only the JSON upstream provides one.
    pub upstream_text: Option<String>,
}

/// Failures while reading a response body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The error-array delimiter is absent from the body
    #[error("no error list found in the speller response")]
    NotFound,

    /// The payload was located but is not valid structured data
    #[error("malformed speller response: {0}")]
    Malformed(String),
}

// Markup upstream entry (`orgStr`, `candWord`, `help`)
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddedEntry {
    #[serde(default)]
    org_str: String,
    #[serde(default)]
    cand_word: String,
    #[serde(default)]
    help: String,
}

// JSON upstream entry (`WrongWord`, `RightWord`)
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DirectEntry {
    #[serde(default)]
    wrong_word: String,
    #[serde(default)]
    right_word: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DirectResponse {
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    err_info: Option<Vec<DirectEntry>>,
}

/// Extract error records from a raw response body in the given format.
pub fn extract(raw_body: &str, format: Format) -> Result<Extraction, ExtractionError> {
    match format {
        Format::EmbeddedJson => extract_embedded(raw_body),
        Format::DirectJson => {
            let value: Value = serde_json::from_str(raw_body)
                .map_err(|e| ExtractionError::Malformed(e.to_string()))?;
            extract_direct(&value)
        }
    }
}

/// Read the `errInfo` array embedded in a markup document.
pub fn extract_embedded(body: &str) -> Result<Extraction, ExtractionError> {
    let payload = locate_err_info(body)?;

    let entries: Vec<EmbeddedEntry> =
        serde_json::from_str(payload).map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    let records: Vec<ErrorRecord> = entries
        .into_iter()
        .filter_map(|e| ErrorRecord::from_candidates(e.org_str, &e.cand_word, e.help))
        .collect();

    tracing::debug!("extracted {} error records from markup response", records.len());

    Ok(Extraction {
        format: Format::EmbeddedJson,
        records,
        upstream_text: None,
    })
}

/// Read an already-decoded JSON upstream response.
///
/// A missing `ErrInfo` field is read as "no errors".
pub fn extract_direct(value: &Value) -> Result<Extraction, ExtractionError> {
    if !value.is_object() {
        return Err(ExtractionError::Malformed(
            "expected a JSON object at the top level".to_string(),
        ));
    }

    let response =
        DirectResponse::deserialize(value).map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    let records: Vec<ErrorRecord> = response
        .err_info
        .unwrap_or_default()
        .into_iter()
        .filter_map(|e| ErrorRecord::from_candidates(e.wrong_word, &e.right_word, String::new()))
        .collect();

    tracing::debug!("extracted {} error records from JSON response", records.len());

    Ok(Extraction {
        format: Format::DirectJson,
        records,
        upstream_text: response.html.as_deref().map(strip_tags),
    })
}

/// Locate the JSON array literal following `"errInfo":` in a markup body.
///
/// The array is taken to end at the first `}]` after its opening bracket.
/// The slice is returned as-is; whether it parses is the caller's concern.
pub fn locate_err_info(body: &str) -> Result<&str, ExtractionError> {
    let start = body.find(ERR_INFO_KEY).ok_or(ExtractionError::NotFound)?;
    let array = body[start + ERR_INFO_KEY.len()..].trim_start();

    if !array.starts_with('[') {
        return Err(ExtractionError::Malformed(
            "errInfo is not followed by an array".to_string(),
        ));
    }

    // `[]` has no record brace to anchor on
    let inner = &array[1..];
    if inner.trim_start().starts_with(']') {
        let whitespace = inner.len() - inner.trim_start().len();
        return Ok(&array[..whitespace + 2]);
    }

    let end = array.find(RECORD_ARRAY_CLOSE).ok_or_else(|| {
        ExtractionError::Malformed("errInfo array is not terminated".to_string())
    })?;

    Ok(&array[..end + RECORD_ARRAY_CLOSE.len()])
}

/// Remove every `<...>` sequence from a markup fragment.
///
/// This is not an HTML parser: text between a `<` and the next `>` is
/// dropped, everything else is kept verbatim. An unclosed `<` drops the rest.
pub fn strip_tags(markup: &str) -> String {
    let mut result = String::with_capacity(markup.len());
    let mut in_tag = false;

    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }

    result
}

/// First entry of a pipe-delimited candidate list.
pub fn first_candidate(candidates: &str) -> &str {
    candidates
        .split(CANDIDATE_SEPARATOR)
        .next()
        .unwrap_or_default()
}
