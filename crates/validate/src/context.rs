use idate_catalogue::Catalogue;
use idate_deck::{Deck, Particle, Span};
use idate_xref::{ReferenceGraph, SymbolTable, UniverseGraph};

use crate::config::ValidatorConfig;

/// Everything a check pass may look at
///
/// Built once per deck. Nothing in here is mutated by the passes.
pub struct Context<'a> {
    pub deck: &'a Deck,
    pub symbols: SymbolTable,
    pub graph: ReferenceGraph,
    pub universes: UniverseGraph,
    pub catalogue: &'static Catalogue,
    pub config: &'a ValidatorConfig,
    /// Transported particles
    pub mode: Vec<Particle>,
}

impl<'a> Context<'a> {
    pub fn new(deck: &'a Deck, config: &'a ValidatorConfig) -> Self {
        Self {
            deck,
            symbols: SymbolTable::build(deck),
            graph: ReferenceGraph::build(deck),
            universes: UniverseGraph::build(deck),
            catalogue: Catalogue::global(),
            config,
            mode: deck.mode(),
        }
    }

    pub fn transports(&self, particle: Particle) -> bool {
        self.mode.contains(&particle)
    }

    /// First line defining a cell
    pub fn cell_span(&self, id: u32) -> Option<Span> {
        self.symbols.cells.get(&id).and_then(|s| s.first()).copied()
    }
}
