//! Plain-text rendering of check results for terminals.

use std::fmt;

use crate::checker::CheckReport;
use crate::error::SpellError;

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = &self.result;

        if let Some(ref err) = self.degraded {
            writeln!(f, "{}", render_error(err))?;
        }

        if !result.was_corrected {
            writeln!(f, "✅ 맞춤법 오류가 없습니다!")?;
            return writeln!(f, "📝 교정된 문장: {}", result.corrected_text);
        }

        writeln!(f, "❌ 맞춤법 오류 발견")?;
        for record in &result.records {
            let suggested = if record.suggested_fragment.is_empty() {
                "(삭제)"
            } else {
                record.suggested_fragment.as_str()
            };

            write!(f, "- {} → {}", record.original_fragment, suggested)?;
            match record.explanation.trim() {
                "" => writeln!(f)?,
                help => writeln!(f, " ({})", help)?,
            }
        }

        writeln!(f)?;
        writeln!(f, "📝 교정된 문장")?;
        writeln!(f, "{}", result.corrected_text)
    }
}

/// Render a report the way the command line prints it.
pub fn render_report(report: &CheckReport) -> String {
    report.to_string()
}

pub fn render_error(err: &SpellError) -> String {
    format!("⚠ {}", err.user_message())
}
