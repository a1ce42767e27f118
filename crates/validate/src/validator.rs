use std::path::Path;

use idate_deck::{sort_diagnostics, Deck, Parsed, Severity};
use log::{debug, info};
use rayon::prelude::*;

use crate::check::{default_checks, Check};
use crate::config::ValidatorConfig;
use crate::context::Context;
use crate::error::Result;
use crate::report::Report;

/// Runs the check passes over parsed decks
///
/// ```rust
/// # use idate_validate::Validator;
/// let report = Validator::default().validate_str("S\n1 0 -1 imp:n=1\n\n1 so 5.0\n\nmode n\n");
/// assert_eq!(report.errors(), 0);
/// assert_eq!(report.summary(), "PASSED with 1 warning");
/// ```
pub struct Validator {
    config: ValidatorConfig,
    checks: Vec<Box<dyn Check>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl Validator {
    /// Validator running every built-in pass
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            checks: default_checks(),
        }
    }

    /// Validator running only the given passes, in the order given
    pub fn with_checks(config: ValidatorConfig, checks: Vec<Box<dyn Check>>) -> Self {
        Self { config, checks }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate an already parsed deck
    ///
    /// Parse diagnostics come first. Each pass then adds its own findings
    /// in line order.
    pub fn validate(&self, parsed: &Parsed) -> Report {
        let mut diagnostics = parsed.diagnostics.clone();
        let ctx = Context::new(&parsed.deck, &self.config);

        for check in &self.checks {
            if self.config.stop_on_fatal && diagnostics.iter().any(|d| d.severity == Severity::Fatal) {
                debug!("Fatal diagnostic found, skipping {:?} onwards", check.pass());
                break;
            }
            let mut found = check.run(&ctx);
            sort_diagnostics(&mut found);
            debug!("{:?}: {} diagnostics", check.pass(), found.len());
            diagnostics.extend(found);
        }

        Report {
            file: None,
            diagnostics,
        }
    }

    pub fn validate_str(&self, text: &str) -> Report {
        self.validate(&Deck::parse(text))
    }

    /// Read and validate one deck
    ///
    /// Only failing to read the file is an error, every problem with the
    /// deck itself is in the report.
    pub fn validate_file<P: AsRef<Path>>(&self, path: P) -> Result<Report> {
        let path = path.as_ref();
        let parsed = Deck::from_file(path)?;
        let file = path.display().to_string();

        let mut report = self.validate(&parsed);
        for d in report.diagnostics.iter_mut() {
            d.file.get_or_insert_with(|| file.clone());
        }
        info!("{file}: {}", report.summary());

        report.file = Some(file);
        Ok(report)
    }

    /// Validate many decks in parallel, one result per path in the same order
    pub fn validate_files<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<Result<Report>> {
        paths.par_iter().map(|p| self.validate_file(p)).collect()
    }
}

#[cfg(test)]
mod validator_tests {
    use super::*;
    use idate_deck::Code;

    const CYCLE: &str = "t\n1 0 -1 fill=1 imp:n=1\n2 0 1 imp:n=0\n3 0 -1 u=1 fill=2 imp:n=1\n4 0 -1 u=2 fill=1 imp:n=1\n\n1 so 1\n\nmode n\n";

    #[test]
    fn passes_are_in_order() {
        let report = Validator::default().validate_str(CYCLE);
        let passes: Vec<_> = report.diagnostics.iter().map(|d| d.pass).collect();
        let mut sorted = passes.clone();
        sorted.sort();
        assert_eq!(passes, sorted);
        assert!(report.diagnostics.iter().any(|d| d.code == Code::UniverseCycle));
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn stop_on_fatal_skips_later_passes() {
        let config = ValidatorConfig {
            stop_on_fatal: true,
            ..Default::default()
        };
        let report = Validator::new(config).validate_str(CYCLE);
        let last = report.diagnostics.last().map(|d| d.code);
        assert_eq!(last, Some(Code::UniverseCycle));
        assert!(report.diagnostics.iter().all(|d| d.code != Code::NoMaterials));
    }

    #[test]
    fn missing_file_is_an_error() {
        let validator = Validator::default();
        assert!(validator.validate_file("no/such/deck.i").is_err());
        let results = validator.validate_files(&["no/such/deck.i"]);
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
