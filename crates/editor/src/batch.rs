//! Find and replace across many decks
//!
//! A batch is planned before it is applied. [FindReplace::dry_run] reads
//! every file and works out the new text without writing anything, and only
//! the resulting [Plan] can be applied.

use std::fs;
use std::path::{Path, PathBuf};

use idate_deck::Deck;
use log::{debug, info};
use regex::{NoExpand, Regex};
use serde::Serialize;

use crate::config::EditorConfig;
use crate::error::{Error, Result};
use crate::files;
use crate::index::{fingerprint, DeckIndex};
use crate::violation::{broken_by, Violation};

/// A line by line text substitution
#[derive(Debug, Clone)]
pub struct FindReplace {
    pattern: Regex,
    replacement: String,
    /// Replacement is taken as written, without `$1` expansion
    literal: bool,
}

/// Planned changes to one file
#[derive(Debug, Clone, Serialize)]
pub struct FileChange {
    pub path: PathBuf,
    /// Number of matches replaced
    pub replacements: usize,
    /// 1-based lines that change
    pub lines: Vec<usize>,
    /// References or numbering the change would break
    pub violations: Vec<Violation>,
    #[serde(skip)]
    fingerprint: u64,
    #[serde(skip)]
    text: String,
}

/// Result of a dry run, the only way to a batch edit
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    changes: Vec<FileChange>,
}

/// One file written by [Plan::apply]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Applied {
    pub path: PathBuf,
    pub backup: PathBuf,
    pub replacements: usize,
}

impl FindReplace {
    /// Replace a literal string
    pub fn literal(find: &str, replacement: &str) -> Result<Self> {
        Self::build(&regex::escape(find), replacement, true)
    }

    /// Replace matches of a regular expression, expanding `$n` groups
    pub fn regex(pattern: &str, replacement: &str) -> Result<Self> {
        Self::build(pattern, replacement, false)
    }

    fn build(pattern: &str, replacement: &str, literal: bool) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::InvalidArgument("empty search pattern".to_string()));
        }
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.to_string(),
            literal,
        })
    }

    /// Work out the change to every file, writing nothing
    ///
    /// Files without a match are left out of the plan.
    pub fn dry_run<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Plan> {
        let mut changes = Vec::new();
        for path in paths.iter().map(AsRef::as_ref) {
            let before = fs::read_to_string(path)?;
            let (text, replacements, lines) = self.rewrite(&before);
            if replacements == 0 {
                debug!("No match in {}", path.display());
                continue;
            }
            let violations = broken_by(&Deck::parse(&before).deck, &Deck::parse(&text).deck);
            changes.push(FileChange {
                path: path.to_path_buf(),
                replacements,
                lines,
                violations,
                fingerprint: fingerprint(&before),
                text,
            });
        }
        info!(
            "Dry run: {} replacements in {} of {} files",
            changes.iter().map(|c| c.replacements).sum::<usize>(),
            changes.len(),
            paths.len()
        );
        Ok(Plan { changes })
    }

    fn rewrite(&self, text: &str) -> (String, usize, Vec<usize>) {
        let mut out = String::with_capacity(text.len());
        let mut replacements = 0;
        let mut lines = Vec::new();

        for (i, line) in text.split_inclusive('\n').enumerate() {
            let found = self.pattern.find_iter(line).count();
            if found == 0 {
                out.push_str(line);
                continue;
            }
            let new = match self.literal {
                true => self.pattern.replace_all(line, NoExpand(&self.replacement)),
                false => self.pattern.replace_all(line, self.replacement.as_str()),
            };
            if new != line {
                lines.push(i + 1);
            }
            replacements += found;
            out.push_str(&new);
        }

        (out, replacements, lines)
    }
}

impl FileChange {
    /// Text the file would hold after the change
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Plan {
    pub fn changes(&self) -> &[FileChange] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn replacements(&self) -> usize {
        self.changes.iter().map(|c| c.replacements).sum()
    }

    /// Write every planned change
    ///
    /// Nothing is written if any change would break a deck, or if any file
    /// changed since the dry run. Each file is backed up first.
    pub fn apply(self, config: &EditorConfig) -> Result<Vec<Applied>> {
        let violations: Vec<Violation> = self
            .changes
            .iter()
            .flat_map(|c| c.violations.iter().cloned())
            .collect();
        if !violations.is_empty() {
            return Err(Error::Refused(violations));
        }

        for change in &self.changes {
            let current = fs::read_to_string(&change.path)?;
            if fingerprint(&current) != change.fingerprint {
                return Err(Error::StaleFile(change.path.display().to_string()));
            }
        }

        let mut applied = Vec::with_capacity(self.changes.len());
        for change in self.changes {
            let backup = files::backup(&change.path, &config.backup_suffix)?;
            files::write_atomic(&change.path, &change.text)?;
            DeckIndex::invalidate(&change.path)?;
            applied.push(Applied {
                path: change.path,
                backup,
                replacements: change.replacements,
            });
        }

        info!("Applied batch edit to {} files", applied.len());
        Ok(applied)
    }
}
