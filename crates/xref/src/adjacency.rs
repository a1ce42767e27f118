use std::collections::{BTreeMap, BTreeSet};

use idate_deck::{Deck, Sense};
use itertools::Itertools;
use serde::Serialize;

/// Two cells on opposite sides of a shared surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Adjacency {
    /// Smaller cell number
    pub first: u32,
    pub second: u32,
    /// Lowest numbered surface they share with opposite senses
    pub surface: u32,
}

/// Pairs of cells that can exchange particles directly
///
/// Cells are adjacent when they sit in the same universe and one uses a
/// surface with negative sense where the other uses it with positive sense.
/// This over-approximates true contact for complicated geometry, which is
/// enough for comparing importances across boundaries.
pub fn adjacent_cells(deck: &Deck) -> Vec<Adjacency> {
    // (universe, surface) -> sense -> cells
    let mut sides: BTreeMap<(u32, u32), BTreeMap<Sense, BTreeSet<u32>>> = BTreeMap::new();

    for (_, cell) in deck.cells() {
        let Some(geometry) = &cell.geometry else {
            continue;
        };
        for r in geometry.surface_refs() {
            sides
                .entry((cell.universe(), r.id))
                .or_default()
                .entry(r.sense)
                .or_default()
                .insert(cell.id);
        }
    }

    let mut pairs: BTreeMap<(u32, u32), u32> = BTreeMap::new();
    for ((_, surface), by_sense) in &sides {
        let (Some(inside), Some(outside)) = (
            by_sense.get(&Sense::Negative),
            by_sense.get(&Sense::Positive),
        ) else {
            continue;
        };
        for (a, b) in inside.iter().cartesian_product(outside.iter()) {
            if a == b {
                continue;
            }
            let key = (*a.min(b), *a.max(b));
            pairs
                .entry(key)
                .and_modify(|s| *s = (*s).min(*surface))
                .or_insert(*surface);
        }
    }

    pairs
        .into_iter()
        .map(|((first, second), surface)| Adjacency {
            first,
            second,
            surface,
        })
        .collect()
}

/// Cell numbers adjacent to each cell
pub fn neighbours(adjacency: &[Adjacency]) -> BTreeMap<u32, BTreeSet<u32>> {
    let mut map: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
    for a in adjacency {
        map.entry(a.first).or_default().insert(a.second);
        map.entry(a.second).or_default().insert(a.first);
    }
    map
}

#[cfg(test)]
mod adjacency_tests {
    use super::*;

    #[test]
    fn shells_touch_their_neighbours_only() {
        let text = "t\n1 0 -1\n2 0 1 -2\n3 0 2 -3\n4 0 3\n\n1 so 1\n2 so 2\n3 so 3\n\nmode n\n";
        let adjacency = adjacent_cells(&Deck::parse(text).deck);
        let pairs: Vec<_> = adjacency.iter().map(|a| (a.first, a.second, a.surface)).collect();
        assert_eq!(pairs, vec![(1, 2, 1), (2, 3, 2), (3, 4, 3)]);
    }

    #[test]
    fn universes_do_not_mix() {
        let text = "t\n1 0 -1 fill=1\n2 0 1\n3 0 -1 u=1\n4 0 1 u=1\n\n1 so 1\n\nmode n\n";
        let adjacency = adjacent_cells(&Deck::parse(text).deck);
        assert_eq!(adjacency.len(), 2);
        let map = neighbours(&adjacency);
        assert_eq!(map[&3], BTreeSet::from([4]));
    }
}
