use std::collections::{BTreeMap, BTreeSet};

use idate_deck::{CardData, Deck, Span};
use log::debug;
use serde::Serialize;

use crate::entity::EntityKind;

/// A number defined more than once within one kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Duplicate {
    pub kind: EntityKind,
    pub id: u32,
    /// Every defining span, in file order
    pub spans: Vec<Span>,
}

/// Index of every numbered definition in a deck
///
/// Material 0 (void) and universe 0 (the real world) are implicitly defined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    pub cells: BTreeMap<u32, Vec<Span>>,
    pub surfaces: BTreeMap<u32, Vec<Span>>,
    pub materials: BTreeMap<u32, Vec<Span>>,
    pub thermal: BTreeMap<u32, Vec<Span>>,
    pub transforms: BTreeMap<u32, Vec<Span>>,
    /// `Fn` tallies and `FMESHn` share one number space
    pub tallies: BTreeMap<u32, Vec<Span>>,
    /// `SI`, `SP`, `SB`, and `DS` share a number without conflict
    pub distributions: BTreeSet<u32>,
    /// Universe to the cells that belong to it
    pub universes: BTreeMap<u32, Vec<u32>>,
    /// Universe to the cells that fill with it
    pub filled: BTreeMap<u32, Vec<u32>>,
}

impl SymbolTable {
    /// Index the definitions of a deck
    pub fn build(deck: &Deck) -> Self {
        let mut table = Self::default();

        for card in deck.cards() {
            let span = card.span;
            match &card.data {
                CardData::Cell(c) => {
                    table.cells.entry(c.id).or_default().push(span);
                    if c.universe() != 0 {
                        table.universes.entry(c.universe()).or_default().push(c.id);
                    }
                    if let Some(fill) = &c.params.fill {
                        for u in fill.universes().into_iter().collect::<BTreeSet<_>>() {
                            table.filled.entry(u).or_default().push(c.id);
                        }
                    }
                }
                CardData::Surface(s) => table.surfaces.entry(s.id).or_default().push(span),
                CardData::Material(m) => table.materials.entry(m.id).or_default().push(span),
                CardData::ThermalScattering(t) => table.thermal.entry(t.id).or_default().push(span),
                CardData::Transform(t) => table.transforms.entry(t.id).or_default().push(span),
                CardData::Tally(t) => table.tallies.entry(t.number).or_default().push(span),
                CardData::Mesh(m) if m.keyword == "fmesh" => {
                    if let Some(n) = m.number {
                        table.tallies.entry(n).or_default().push(span);
                    }
                }
                CardData::Distribution(d) => {
                    table.distributions.insert(d.number);
                }
                _ => (),
            }
        }

        debug!(
            "Symbols: {} cells, {} surfaces, {} materials, {} universes",
            table.cells.len(),
            table.surfaces.len(),
            table.materials.len(),
            table.universes.len()
        );
        table
    }

    /// Definitions of one kind, if the kind is indexed by span
    pub fn spans(&self, kind: EntityKind) -> Option<&BTreeMap<u32, Vec<Span>>> {
        match kind {
            EntityKind::Cell => Some(&self.cells),
            EntityKind::Surface => Some(&self.surfaces),
            EntityKind::Material => Some(&self.materials),
            EntityKind::ThermalScattering => Some(&self.thermal),
            EntityKind::Transform => Some(&self.transforms),
            EntityKind::Tally => Some(&self.tallies),
            _ => None,
        }
    }

    /// True if the number is defined for that kind
    pub fn defines(&self, kind: EntityKind, id: u32) -> bool {
        match kind {
            EntityKind::Material if id == 0 => true,
            EntityKind::Universe => id == 0 || self.universes.contains_key(&id),
            EntityKind::Distribution => self.distributions.contains(&id),
            kind => self.spans(kind).is_some_and(|m| m.contains_key(&id)),
        }
    }

    /// Universes with at least one member cell, plus universe 0
    pub fn defined_universes(&self) -> BTreeSet<u32> {
        std::iter::once(0).chain(self.universes.keys().copied()).collect()
    }

    /// Every number defined more than once, ordered by kind then number
    pub fn duplicates(&self) -> Vec<Duplicate> {
        let kinds = [
            EntityKind::Cell,
            EntityKind::Surface,
            EntityKind::Material,
            EntityKind::ThermalScattering,
            EntityKind::Transform,
            EntityKind::Tally,
        ];

        kinds
            .into_iter()
            .flat_map(|kind| {
                self.spans(kind)
                    .into_iter()
                    .flat_map(|m| m.iter())
                    .filter(|(_, spans)| spans.len() > 1)
                    .map(move |(id, spans)| Duplicate {
                        kind,
                        id: *id,
                        spans: spans.clone(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod symbols_tests {
    use super::*;

    #[test]
    fn duplicates_cite_every_span() {
        let text = "t\n1 0 -1\n1 0 1\n\n1 so 1\n\nm1 1001 1\nm1 8016 1\nf4:n 1\nfmesh4:n geom=xyz\n";
        let table = SymbolTable::build(&Deck::parse(text).deck);
        let duplicates = table.duplicates();
        assert_eq!(duplicates.len(), 3);
        assert_eq!(duplicates[0].kind, EntityKind::Cell);
        assert_eq!(duplicates[0].spans, vec![Span::line(2), Span::line(3)]);
        assert_eq!(duplicates[1].kind, EntityKind::Material);
        assert_eq!(duplicates[2].kind, EntityKind::Tally);
    }

    #[test]
    fn implicit_definitions() {
        let table = SymbolTable::default();
        assert!(table.defines(EntityKind::Material, 0));
        assert!(table.defines(EntityKind::Universe, 0));
        assert!(!table.defines(EntityKind::Material, 1));
        assert!(!table.defines(EntityKind::Cell, 0));
    }

    #[test]
    fn universes_and_fills() {
        let text = "t\n1 0 -1 u=3\n2 0 -1 fill=3\n3 0 1\n\n1 so 1\n\nmode n\n";
        let table = SymbolTable::build(&Deck::parse(text).deck);
        assert_eq!(table.universes.get(&3), Some(&vec![1]));
        assert_eq!(table.filled.get(&3), Some(&vec![2]));
        assert_eq!(table.defined_universes().into_iter().collect::<Vec<_>>(), vec![0, 3]);
    }
}
