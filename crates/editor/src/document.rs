//! Reference preserving edits on a deck held as physical lines
//!
//! Every edit rewrites the affected words in place, so comments, spacing and
//! the remainder of the deck are untouched. The result is parsed again and
//! compared to the original, and the edit is refused if it broke anything.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use idate_deck::{
    wrap_card, Block, Card, CardNumber, CellCard, Deck, Diagnostic, Parsed, Particle, CONTINUATION,
};
use idate_xref::EntityKind;
use log::{debug, info};

use crate::config::EditorConfig;
use crate::error::{Error, Result};
use crate::files;
use crate::generate::Fragment;
use crate::index::DeckIndex;
use crate::library::{ConversionPreview, SuffixConversion};
use crate::tokens::{body_end, locate, replace, Token};
use crate::violation::{broken_by, Violation};

/// An editable deck
///
/// Edits never modify the document they are called on. Each returns a new
/// [Document], or the reasons it was refused.
///
/// ```rust
/// # use idate_editor::Document;
/// let deck = Document::parse("t\n1 1 -7.8 -1 imp:n=1 $ fuel\n2 0 1 imp:n=0\n\n1 so 5\n\nm1 26056 1\n");
/// let edited = deck.edit_cell_density(1, -10.2).unwrap();
/// assert_eq!(edited.lines()[1], "1 1 -10.2 -1 imp:n=1 $ fuel");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
    parsed: Parsed,
    config: EditorConfig,
}

/// Outcome of [Document::set_importance]
#[derive(Debug, Clone)]
pub struct ImportanceUpdate {
    pub document: Document,
    /// Cells given the new importance
    pub updated: Vec<u32>,
    /// Graveyard cells left alone
    pub skipped: Vec<Violation>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let parsed = Deck::parse(text);
        let lines = parsed.deck.lines().map(str::to_string).collect();
        Self {
            lines,
            parsed,
            config: EditorConfig::default(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        info!("Editing {}", path.display());
        Ok(Self::parse(&text))
    }

    /// Use other settings for wrapping and backups
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn deck(&self) -> &Deck {
        &self.parsed.deck
    }

    /// Diagnostics from reading the current text
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.parsed.diagnostics
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn text(&self) -> String {
        join(&self.lines)
    }

    /// Save to `path`, keeping a backup of what was there
    ///
    /// Any persisted index for the file is removed as it no longer matches.
    /// Returns the backup path when one was made.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<Option<PathBuf>> {
        let path = path.as_ref();
        let saved = match path.exists() {
            true => Some(files::backup(path, &self.config.backup_suffix)?),
            false => None,
        };
        files::write_atomic(path, &self.text())?;
        DeckIndex::invalidate(path)?;
        info!("Wrote {}", path.display());
        Ok(saved)
    }

    /// Change the density of a cell
    ///
    /// A `LIKE n BUT` cell gets its `RHO=` value changed, or one added. Void
    /// cells are refused.
    pub fn edit_cell_density(&self, id: u32, density: f64) -> Result<Document> {
        let (card, cell) = self.cell(id)?;
        let tokens = locate(card);
        let value = density.card_number();
        let mut lines = self.lines.clone();

        if cell.like.is_some() {
            let rho = tokens
                .iter()
                .position(|t| t.text.eq_ignore_ascii_case("rho"))
                .and_then(|k| tokens.get(k + 1));
            match rho {
                Some(token) => replace(&mut lines, vec![(token.clone(), value)]),
                None => self.append(&mut lines, &tokens, &format!("rho={value}")),
            }
        } else if cell.material == 0 {
            return Err(Error::Refused(vec![Violation::VoidCellDensity { cell: id }]));
        } else {
            let token = tokens.get(2).cloned().ok_or_else(|| {
                Error::InvalidArgument(format!("cell {id} has no density to replace"))
            })?;
            replace(&mut lines, vec![(token, value)]);
        }

        debug!("Cell {id} density set to {density}");
        self.commit(lines)
    }

    /// Set cell importances for one particle
    ///
    /// Graveyard cells are skipped and reported unless `include_graveyard`
    /// is set. Decks giving the particle's importances on an `IMP` data card
    /// are refused, as are unknown cells.
    pub fn set_importance(
        &self,
        particle: Particle,
        importances: &BTreeMap<u32, f64>,
        include_graveyard: bool,
    ) -> Result<ImportanceUpdate> {
        if self
            .deck()
            .importances()
            .any(|(_, imp)| imp.particles.contains(&particle))
        {
            return Err(Error::Refused(vec![Violation::ImportanceDataCard { particle }]));
        }

        let unknown: Vec<Violation> = importances
            .keys()
            .filter(|id| self.deck().cell(**id).is_none())
            .map(|id| Violation::UnknownEntity {
                kind: EntityKind::Cell,
                id: *id,
            })
            .collect();
        if !unknown.is_empty() {
            return Err(Error::Refused(unknown));
        }

        let mut lines = self.lines.clone();
        let mut updated = Vec::new();
        let mut skipped = Vec::new();

        // last card first, so added continuation lines never shift a card
        // still to be edited
        let cells: Vec<(&Card, &CellCard)> = self.deck().cells().collect();
        for (card, cell) in cells.into_iter().rev() {
            let Some(value) = importances.get(&cell.id) else {
                continue;
            };
            if self.deck().is_graveyard(cell.id, particle) && !include_graveyard {
                skipped.push(Violation::GraveyardCell {
                    cell: cell.id,
                    particle,
                });
                continue;
            }
            self.set_card_importance(&mut lines, card, particle, *value);
            updated.push(cell.id);
        }
        updated.reverse();
        skipped.reverse();

        info!("Set {} importance in {} cells", particle.name(), updated.len());
        Ok(ImportanceUpdate {
            document: self.commit(lines)?,
            updated,
            skipped,
        })
    }

    fn set_card_importance(&self, lines: &mut Vec<String>, card: &Card, particle: Particle, value: f64) {
        let tokens = locate(card);
        let value = value.card_number();
        let mut edits = Vec::new();
        let mut present = false;

        for (k, token) in tokens.iter().enumerate() {
            let lower = token.text.to_ascii_lowercase();
            let Some(designator) = lower.strip_prefix("imp:") else {
                continue;
            };
            let Ok(particles) = Particle::list(designator) else {
                continue;
            };
            if !particles.contains(&particle) {
                continue;
            }

            if particles.len() == 1 {
                if let Some(old) = tokens.get(k + 1) {
                    edits.push((old.clone(), value.clone()));
                    present = true;
                }
            } else {
                // split the particle out of a shared key
                let rest: Vec<Particle> = particles.into_iter().filter(|p| *p != particle).collect();
                edits.push((token.clone(), format!("imp:{}", Particle::designator(&rest))));
            }
        }

        // appended text lands after every token, so the edits stay valid
        if !present {
            self.append(lines, &tokens, &format!("imp:{}={value}", particle.symbol()));
        }
        replace(lines, edits);
    }

    /// Isotopes that a suffix conversion would rewrite
    pub fn preview_library_suffix(&self, conversion: &SuffixConversion) -> Result<ConversionPreview> {
        conversion.edits(self.deck()).map(|(_, preview)| preview)
    }

    /// Rewrite isotope library suffixes on material cards
    pub fn convert_library_suffix(&self, conversion: &SuffixConversion) -> Result<(Document, ConversionPreview)> {
        let (edits, preview) = conversion.edits(self.deck())?;
        let mut lines = self.lines.clone();
        replace(&mut lines, edits);
        info!(
            "Converted {} isotopes from .{} to .{}",
            preview.isotopes,
            conversion.from(),
            conversion.to()
        );
        Ok((self.commit(lines)?, preview))
    }

    /// Add a cell card at the end of the cell block
    ///
    /// Single line text is wrapped to the configured width. Refused if the
    /// number is taken or the card refers to anything undefined.
    pub fn insert_cell(&self, text: &str) -> Result<Document> {
        let lines = self.card_lines(text)?;
        self.insert(vec![(Block::Cells, lines)])
    }

    /// Add a surface card at the end of the surface block
    pub fn insert_surface(&self, text: &str) -> Result<Document> {
        let lines = self.card_lines(text)?;
        self.insert(vec![(Block::Surfaces, lines)])
    }

    /// Add generated cards, each block to the end of its own
    pub fn insert_fragment(&self, fragment: &Fragment) -> Result<Document> {
        self.insert(vec![
            (Block::Cells, fragment.cells.clone()),
            (Block::Surfaces, fragment.surfaces.clone()),
            (Block::Data, fragment.data.clone()),
        ])
    }

    fn insert(&self, additions: Vec<(Block, Vec<String>)>) -> Result<Document> {
        let mut placed = Vec::new();
        for (block, text) in additions.into_iter().filter(|(_, t)| !t.is_empty()) {
            placed.push((self.block_end(block)?, text));
        }

        // later positions first so earlier ones stay put
        placed.sort_by(|a, b| b.0.cmp(&a.0));
        let mut lines = self.lines.clone();
        for (at, text) in placed {
            lines.splice(at..at, text);
        }
        self.commit(lines)
    }

    /// 0-based line where cards added to a block go
    fn block_end(&self, block: Block) -> Result<usize> {
        let deck = self.deck();
        let missing = || Error::InvalidArgument("deck is missing its block separators".to_string());
        match block {
            Block::Cells => deck.separators.first().map(|(n, _)| n - 1).ok_or_else(missing),
            Block::Surfaces => deck.separators.get(1).map(|(n, _)| n - 1).ok_or_else(missing),
            Block::Data if deck.separators.len() < 2 => Err(missing()),
            Block::Data => Ok(self.lines.len() - deck.trailing.len()),
        }
    }

    fn card_lines(&self, text: &str) -> Result<Vec<String>> {
        let lines: Vec<&str> = text.trim_end().lines().collect();
        if lines.is_empty() || lines.iter().any(|l| l.trim().is_empty()) {
            return Err(Error::InvalidArgument(
                "card text must not be empty or contain blank lines".to_string(),
            ));
        }
        Ok(match lines.as_slice() {
            [single] => wrap_card(single, self.config.wrap_width),
            _ => lines.iter().map(|l| l.to_string()).collect(),
        })
    }

    /// Add a word after the last word of a card, on a new continuation line
    /// if the card's last line would get too long
    fn append(&self, lines: &mut Vec<String>, tokens: &[Token], word: &str) {
        let Some((line, end)) = body_end(tokens) else {
            return;
        };
        let Some(current) = lines.get_mut(line) else {
            return;
        };
        if current.len() + word.len() < self.config.wrap_width {
            current.insert_str(end, &format!(" {word}"));
        } else {
            lines.insert(line + 1, format!("{CONTINUATION}{word}"));
        }
    }

    fn cell(&self, id: u32) -> Result<(&Card, &CellCard)> {
        self.deck()
            .cells()
            .find(|(_, c)| c.id == id)
            .ok_or(Error::Refused(vec![Violation::UnknownEntity {
                kind: EntityKind::Cell,
                id,
            }]))
    }

    /// Accept rewritten lines only if they break nothing that worked before
    fn commit(&self, lines: Vec<String>) -> Result<Document> {
        let next = Self::parse(&join(&lines)).with_config(self.config.clone());
        let broken = broken_by(self.deck(), next.deck());
        if !broken.is_empty() {
            debug!("Edit refused with {} violations", broken.len());
            return Err(Error::Refused(broken));
        }
        Ok(next)
    }
}

fn join(lines: &[String]) -> String {
    lines.iter().fold(String::new(), |mut text, line| {
        text.push_str(line);
        text.push('\n');
        text
    })
}

#[cfg(test)]
mod document_tests {
    use super::*;

    const DECK: &str = "\
shield
1 1 -7.8 -1 imp:n=1 $ steel
2 0 1 -2 imp:n,p=1
3 like 1 but trcl=(0 0 1)
4 0 2 imp:n=0 imp:p=0

1 so 5
2 so 10

mode n p
m1 26056.70c 1
";

    #[test]
    fn density_keeps_comment() {
        let doc = Document::parse(DECK).edit_cell_density(1, -10.2).unwrap();
        assert_eq!(doc.lines()[1], "1 1 -10.2 -1 imp:n=1 $ steel");
        assert_eq!(doc.line_count(), 11);
    }

    #[test]
    fn density_of_like_cell() {
        let doc = Document::parse(DECK).edit_cell_density(3, -2.0).unwrap();
        assert_eq!(doc.lines()[3], "3 like 1 but trcl=(0 0 1) rho=-2");
        let again = doc.edit_cell_density(3, -3.5).unwrap();
        assert_eq!(again.lines()[3], "3 like 1 but trcl=(0 0 1) rho=-3.5");
    }

    #[test]
    fn void_and_unknown_cells_refused() {
        let doc = Document::parse(DECK);
        let void = doc.edit_cell_density(2, -1.0).unwrap_err();
        assert_eq!(void.violations(), &[Violation::VoidCellDensity { cell: 2 }]);
        let unknown = doc.edit_cell_density(9, -1.0).unwrap_err();
        assert_eq!(
            unknown.violations(),
            &[Violation::UnknownEntity { kind: EntityKind::Cell, id: 9 }]
        );
    }

    #[test]
    fn importance_skips_graveyard() {
        let values = BTreeMap::from([(1, 2.0), (2, 4.0), (4, 8.0)]);
        let update = Document::parse(DECK)
            .set_importance(Particle::Neutron, &values, false)
            .unwrap();
        assert_eq!(update.updated, vec![1, 2]);
        assert_eq!(
            update.skipped,
            vec![Violation::GraveyardCell { cell: 4, particle: Particle::Neutron }]
        );
        let lines = update.document.lines();
        assert_eq!(lines[1], "1 1 -7.8 -1 imp:n=2 $ steel");
        assert_eq!(lines[2], "2 0 1 -2 imp:p=1 imp:n=4");
        assert_eq!(lines[4], "4 0 2 imp:n=0 imp:p=0");
    }

    #[test]
    fn importance_data_card_refused() {
        let deck = "t\n1 0 -1\n2 0 1\n\n1 so 1\n\nimp:n 1 0\n";
        let values = BTreeMap::from([(1, 2.0)]);
        let err = Document::parse(deck)
            .set_importance(Particle::Neutron, &values, false)
            .unwrap_err();
        assert_eq!(
            err.violations(),
            &[Violation::ImportanceDataCard { particle: Particle::Neutron }]
        );
    }

    #[test]
    fn long_card_gets_continuation() {
        let config = EditorConfig {
            wrap_width: 24,
            ..Default::default()
        };
        let values = BTreeMap::from([(1, 2.0)]);
        let update = Document::parse(DECK)
            .with_config(config)
            .set_importance(Particle::Photon, &values, false)
            .unwrap();
        let lines = update.document.lines();
        assert_eq!(lines[1], "1 1 -7.8 -1 imp:n=1 $ steel");
        assert_eq!(lines[2], "     imp:p=2");
        assert_eq!(update.document.deck().cell(1).unwrap().importance(Particle::Photon), Some(2.0));
    }

    #[test]
    fn library_suffix() {
        let doc = Document::parse(DECK);
        let conversion = SuffixConversion::new("70c", "80c").unwrap();
        let preview = doc.preview_library_suffix(&conversion).unwrap();
        let (converted, applied) = doc.convert_library_suffix(&conversion).unwrap();
        assert_eq!(preview, applied);
        assert_eq!(converted.lines()[10], "m1 26056.80c 1");
    }

    #[test]
    fn insert_cards() {
        let doc = Document::parse(DECK);
        let doc = doc.insert_surface("3 so 20").unwrap();
        let doc = doc.insert_cell("5 0 2 -3 imp:n=1 imp:p=1").unwrap();
        assert_eq!(doc.lines()[5], "5 0 2 -3 imp:n=1 imp:p=1");
        assert_eq!(doc.lines()[9], "3 so 20");
        assert_eq!(doc.deck().cells().count(), 5);
    }

    #[test]
    fn insert_refusals() {
        let doc = Document::parse(DECK);
        let taken = doc.insert_surface("2 so 20").unwrap_err();
        assert_eq!(
            taken.violations(),
            &[Violation::DuplicateId { kind: EntityKind::Surface, id: 2 }]
        );
        let dangling = doc.insert_cell("5 0 -7 imp:n=1").unwrap_err();
        assert!(matches!(dangling.violations()[0], Violation::UndefinedReference { .. }));
        assert!(matches!(doc.insert_cell("\n"), Err(Error::InvalidArgument(_))));
    }
}
