use std::fmt;

use idate_deck::{Diagnostic, Severity};
use serde::Serialize;

use crate::error::Result;

/// Exit code for a deck that could not be read at all
pub const EXIT_IO_FAILURE: i32 = 3;

/// Everything the validator found in one deck
///
/// Diagnostics are kept in report order: parse findings first, then each
/// pass in turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    /// Deck file, when validated from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Number of diagnostics with exactly this severity
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Errors and fatal findings together
    pub fn errors(&self) -> usize {
        self.count(Severity::Error) + self.count(Severity::Fatal)
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_fatal(&self) -> bool {
        self.count(Severity::Fatal) > 0
    }

    pub fn passed(&self) -> bool {
        self.errors() == 0
    }

    /// One line verdict, e.g. "PASSED with 2 warnings"
    pub fn summary(&self) -> String {
        match (self.errors(), self.warnings()) {
            (0, 0) => "PASSED".to_string(),
            (0, 1) => "PASSED with 1 warning".to_string(),
            (0, w) => format!("PASSED with {w} warnings"),
            (1, _) => "FAILED with 1 error".to_string(),
            (e, _) => format!("FAILED with {e} errors"),
        }
    }

    /// 2 when anything is fatal, 1 for errors, 0 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.has_fatal() {
            2
        } else if self.errors() > 0 {
            1
        } else {
            0
        }
    }

    /// Diagnostics one per entry followed by the summary line
    pub fn render(&self) -> String {
        let mut text = String::new();
        for d in &self.diagnostics {
            text.push_str(&d.to_string());
            text.push('\n');
        }
        if let Some(file) = &self.file {
            text.push_str(&format!("{file}: "));
        }
        text.push_str(&self.summary());
        text
    }

    /// Pretty printed JSON of the whole report
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod report_tests {
    use super::*;
    use idate_deck::{Code, Pass, Span};

    fn finding(severity: Severity) -> Diagnostic {
        Diagnostic::new(severity, Pass::Symbols, Code::DuplicateId, "cell 1 is defined 2 times").at(Span::line(2))
    }

    #[test]
    fn summaries() {
        let mut report = Report::default();
        assert_eq!(report.summary(), "PASSED");
        assert_eq!(report.exit_code(), 0);

        report.diagnostics.push(finding(Severity::Warning));
        report.diagnostics.push(finding(Severity::Info));
        assert_eq!(report.summary(), "PASSED with 1 warning");

        report.diagnostics.push(finding(Severity::Error));
        assert_eq!(report.summary(), "FAILED with 1 error");
        assert_eq!(report.exit_code(), 1);

        report.diagnostics.push(finding(Severity::Fatal));
        assert_eq!(report.summary(), "FAILED with 2 errors");
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn rendering() {
        let report = Report {
            file: Some("deck.i".into()),
            diagnostics: vec![finding(Severity::Fatal)],
        };
        assert_eq!(
            report.render(),
            "fatal[DuplicateId] line 2: cell 1 is defined 2 times\ndeck.i: FAILED with 1 error"
        );

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["file"], "deck.i");
        assert_eq!(json["diagnostics"][0]["code"], "DuplicateId");
    }
}
