//! Deck model and its line-preserving renderer

use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::Path;

use crate::cards::*;
use crate::diagnostic::Diagnostic;
use crate::error::{ParseError, Result};
use crate::lexer::{Block, LineKind, LogicalLine};
use crate::particle::Particle;
use crate::reader;

/// One logical line in a block, in file order
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Card(Card),
    /// Comment or stray blank line
    Comment(LogicalLine),
    /// Card that failed to parse, kept verbatim
    Invalid(LogicalLine, ParseError),
}

impl Entry {
    pub fn span(&self) -> crate::diagnostic::Span {
        match self {
            Self::Card(c) => c.span,
            Self::Comment(l) | Self::Invalid(l, _) => l.span,
        }
    }

    /// Physical lines exactly as read
    pub fn raw(&self) -> &[String] {
        match self {
            Self::Card(c) => &c.raw,
            Self::Comment(l) | Self::Invalid(l, _) => &l.raw,
        }
    }

    pub fn card(&self) -> Option<&Card> {
        match self {
            Self::Card(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Comment(l) if l.kind == LineKind::BlankSeparator)
    }
}

/// A fully read input deck
///
/// Every physical line of the source is held somewhere in the deck, so
/// [Deck::render] reproduces the text line for line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deck {
    /// `message:` block lines, including the terminating blank
    pub message: Vec<String>,
    pub title: String,
    /// 1-based line of the title, 0 when the input was empty
    pub title_line: usize,
    pub cells: Vec<Entry>,
    pub surfaces: Vec<Entry>,
    pub data: Vec<Entry>,
    /// Line number and text of each block separator
    pub separators: Vec<(usize, String)>,
    /// Blank lines after the data block
    pub trailing: Vec<String>,
}

/// A deck with everything reported while reading it
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub deck: Deck,
    pub diagnostics: Vec<Diagnostic>,
}

// generate typed iterators over one card variant
macro_rules! typed_cards {
    ($(#[$doc:meta])* $name:ident, $block:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self) -> impl Iterator<Item = (&Card, &$ty)> {
            self.block_cards(Block::$block).filter_map(|c| match &c.data {
                CardData::$variant(x) => Some((c, x)),
                _ => None,
            })
        }
    };
}

impl Deck {
    /// Read deck text, never failing
    ///
    /// Problems found while reading are returned as diagnostics alongside
    /// the deck. Cards that cannot be parsed are kept as [Entry::Invalid].
    pub fn parse(text: &str) -> Parsed {
        reader::read_str(text)
    }

    /// Read a deck from a file on disk
    ///
    /// Only a failure to read the file is an error. Diagnostics carry the
    /// path they came from.
    ///
    /// ```rust, no_run
    /// # use idate_deck::Deck;
    /// let parsed = Deck::from_file("/path/to/inp").unwrap();
    /// println!("{} cells", parsed.deck.cells().count());
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Parsed> {
        reader::read_file(path)
    }

    /// Entries of one block in file order
    pub fn block(&self, block: Block) -> &[Entry] {
        match block {
            Block::Cells => &self.cells,
            Block::Surfaces => &self.surfaces,
            Block::Data => &self.data,
        }
    }

    pub fn block_mut(&mut self, block: Block) -> &mut Vec<Entry> {
        match block {
            Block::Cells => &mut self.cells,
            Block::Surfaces => &mut self.surfaces,
            Block::Data => &mut self.data,
        }
    }

    /// Successfully parsed cards of one block
    pub fn block_cards(&self, block: Block) -> impl Iterator<Item = &Card> {
        self.block(block).iter().filter_map(Entry::card)
    }

    /// Every parsed card in file order
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        Block::ALL
            .into_iter()
            .flat_map(move |b| self.block_cards(b))
    }

    /// Every entry with the block it belongs to
    pub fn entries(&self) -> impl Iterator<Item = (Block, &Entry)> {
        Block::ALL
            .into_iter()
            .flat_map(move |b| self.block(b).iter().map(move |e| (b, e)))
    }

    /// Cards that failed to parse
    pub fn invalid(&self) -> impl Iterator<Item = (&LogicalLine, &ParseError)> {
        self.entries().filter_map(|(_, e)| match e {
            Entry::Invalid(line, error) => Some((line, error)),
            _ => None,
        })
    }

    typed_cards!(cells, Cells, Cell, CellCard);
    typed_cards!(surfaces, Surfaces, Surface, SurfaceCard);
    typed_cards!(materials, Data, Material, MaterialCard);
    typed_cards!(thermal, Data, ThermalScattering, ThermalCard);
    typed_cards!(transforms, Data, Transform, TransformCard);
    typed_cards!(tallies, Data, Tally, TallyCard);
    typed_cards!(tally_options, Data, TallyOption, TallyOptionCard);
    typed_cards!(sources, Data, Source, SourceCard);
    typed_cards!(distributions, Data, Distribution, DistributionCard);
    typed_cards!(importances, Data, Importance, ImportanceCard);
    typed_cards!(weight_windows, Data, WeightWindow, WeightWindowCard);
    typed_cards!(meshes, Data, Mesh, MeshCard);
    typed_cards!(physics, Data, Physics, PhysicsCard);
    typed_cards!(cutoffs, Data, Cutoff, CutoffCard);
    typed_cards!(burns, Data, Burn, BurnCard);
    typed_cards!(kcodes, Data, Kcode, KcodeCard);
    typed_cards!(ksrcs, Data, Ksrc, KsrcCard);
    typed_cards!(dxtrans, Data, Dxtran, DxtranCard);
    typed_cards!(
        /// Data cards without a dedicated record, e.g. `NPS`
        others,
        Data,
        Other,
        OtherCard
    );

    /// First card of a kind with a given number
    pub fn find(&self, kind: CardKind, id: u32) -> Option<&Card> {
        self.cards().find(|c| c.kind() == kind && c.id() == Some(id))
    }

    pub fn cell(&self, id: u32) -> Option<&CellCard> {
        self.cells().find(|(_, c)| c.id == id).map(|(_, c)| c)
    }

    /// Cells a `LIKE n BUT` chain passes through, starting at `id`
    ///
    /// Stops at the first undefined cell or when the chain loops back.
    pub fn like_chain(&self, id: u32) -> Vec<&CellCard> {
        let mut seen = BTreeSet::new();
        let mut chain = Vec::new();
        let mut next = Some(id);
        while let Some(cell) = next.filter(|n| seen.insert(*n)).and_then(|n| self.cell(n)) {
            chain.push(cell);
            next = cell.like;
        }
        chain
    }

    /// Importance of a cell, inherited through `LIKE n BUT` when the cell
    /// does not give one
    pub fn cell_importance(&self, id: u32, particle: Particle) -> Option<f64> {
        self.like_chain(id)
            .into_iter()
            .find_map(|c| c.importance(particle))
    }

    /// Zero importance for the particle, inherited or not
    pub fn is_graveyard(&self, id: u32, particle: Particle) -> bool {
        self.cell_importance(id, particle) == Some(0.0)
    }

    /// Material filling a cell, 0 for void, following `LIKE n BUT` cells
    /// unless they override it with `mat=`
    pub fn cell_material(&self, id: u32) -> u32 {
        for cell in self.like_chain(id) {
            if cell.like.is_none() {
                return cell.material;
            }
            if let Some(m) = cell.like_material() {
                return m;
            }
        }
        0
    }

    pub fn surface(&self, id: u32) -> Option<&SurfaceCard> {
        self.surfaces().find(|(_, s)| s.id == id).map(|(_, s)| s)
    }

    pub fn material(&self, id: u32) -> Option<&MaterialCard> {
        self.materials().find(|(_, m)| m.id == id).map(|(_, m)| m)
    }

    /// Transported particles, neutrons alone when there is no `MODE` card
    pub fn mode(&self) -> Vec<Particle> {
        self.mode_card()
            .map(|m| m.particles.clone())
            .unwrap_or_else(|| vec![Particle::Neutron])
    }

    pub fn mode_card(&self) -> Option<&ModeCard> {
        self.block_cards(Block::Data).find_map(|c| match &c.data {
            CardData::Mode(m) => Some(m),
            _ => None,
        })
    }

    /// True for a criticality problem
    pub fn is_kcode(&self) -> bool {
        self.kcodes().next().is_some()
    }

    /// Number of physical lines the rendered deck holds
    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Every physical line in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        let title = (self.title_line > 0).then_some(self.title.as_str());
        let separator = move |i: usize| self.separators.get(i).map(|(_, s)| s.as_str());
        let raw = move |b: Block| {
            self.block(b)
                .iter()
                .flat_map(|e| e.raw().iter().map(String::as_str))
        };

        self.message
            .iter()
            .map(String::as_str)
            .chain(title)
            .chain(raw(Block::Cells))
            .chain(separator(0))
            .chain(raw(Block::Surfaces))
            .chain(separator(1))
            .chain(raw(Block::Data))
            .chain(self.trailing.iter().map(String::as_str))
    }

    /// Deck text, one physical line per source line
    pub fn render(&self) -> String {
        self.lines().fold(String::new(), |mut text, line| {
            text.push_str(line);
            text.push('\n');
            text
        })
    }
}

impl Display for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
