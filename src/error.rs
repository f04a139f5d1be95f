//! Error kinds surfaced by a spell check request

use thiserror::Error;

use crate::extractor::ExtractionError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpellError {
    /// Blank or whitespace-only input, rejected before any request
    #[error("input text is empty")]
    EmptyInput,

    /// Connection, DNS, timeout or HTTP status failure
    #[error("speller request failed: {0}")]
    Transport(String),

    /// The error list delimiter is absent from the response
    #[error("no error list found in the speller response")]
    NotFound,

    /// The error list was found but could not be parsed
    #[error("malformed speller response: {0}")]
    Malformed(String),

    /// Anything else that went wrong while talking to the upstream
    #[error("unexpected speller failure: {0}")]
    Unknown(String),
}

impl SpellError {
    /// Whether the request may fall back to "no corrections found".
    pub fn is_degradable(&self) -> bool {
        matches!(self, SpellError::Transport(_) | SpellError::Unknown(_))
    }

    /// Message shown to the end user
    pub fn user_message(&self) -> String {
        match self {
            SpellError::EmptyInput => "문장을 입력해주세요!".to_string(),
            SpellError::Transport(detail) => {
                format!("맞춤법 검사 서버에 연결할 수 없습니다. ({})", detail)
            }
            SpellError::NotFound => "맞춤법 검사 결과를 불러올 수 없습니다.".to_string(),
            SpellError::Malformed(detail) => {
                format!("맞춤법 검사 결과를 해석할 수 없습니다. ({})", detail)
            }
            SpellError::Unknown(detail) => format!("오류 발생: {}", detail),
        }
    }
}

impl From<ExtractionError> for SpellError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::NotFound => SpellError::NotFound,
            ExtractionError::Malformed(detail) => SpellError::Malformed(detail),
        }
    }
}

impl From<reqwest::Error> for SpellError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpellError::Transport("request timed out".to_string())
        } else if e.is_connect() || e.is_request() || e.is_status() {
            SpellError::Transport(e.to_string())
        } else {
            SpellError::Unknown(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degradable_kinds() {
        assert!(SpellError::Transport("refused".into()).is_degradable());
        assert!(SpellError::Unknown("odd".into()).is_degradable());

        assert!(!SpellError::EmptyInput.is_degradable());
        assert!(!SpellError::NotFound.is_degradable());
        assert!(!SpellError::Malformed("eof".into()).is_degradable());
    }

    #[test]
    fn test_from_extraction_error() {
        assert_eq!(
            SpellError::from(ExtractionError::NotFound),
            SpellError::NotFound
        );
        assert_eq!(
            SpellError::from(ExtractionError::Malformed("eof".into())),
            SpellError::Malformed("eof".into())
        );
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(SpellError::EmptyInput.user_message(), "문장을 입력해주세요!");
        assert!(SpellError::NotFound.user_message().contains("불러올 수 없습니다"));
        assert!(SpellError::Transport("timed out".into())
            .user_message()
            .contains("timed out"));
    }
}
