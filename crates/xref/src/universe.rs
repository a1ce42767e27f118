use std::collections::{BTreeMap, BTreeSet};

use idate_deck::{Deck, Span};
use log::{debug, warn};
use serde::Serialize;

/// One cell placing a universe inside another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FillSite {
    pub cell: u32,
    pub span: Span,
}

/// A closed loop of fills
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniverseCycle {
    /// Universes in loop order, starting from the smallest number
    pub universes: Vec<u32>,
    /// Cell making each fill, `cells[i]` places `universes[i + 1]`
    pub cells: Vec<u32>,
    /// Card of the first fill in the loop
    pub span: Span,
}

impl UniverseCycle {
    /// Loop written as `1 -> 2 -> 1`
    pub fn path(&self) -> String {
        self.universes
            .iter()
            .chain(self.universes.first())
            .map(|u| u.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Deepest chain of nested universes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Nesting {
    /// Number of fill levels below the outermost universe
    pub depth: usize,
    /// Universes from the outermost inwards
    pub path: Vec<u32>,
}

#[derive(Clone, Copy, PartialEq)]
enum Colour {
    White,
    Grey,
    Black,
}

/// The `fills` relation between universes
///
/// An edge runs from the universe a cell belongs to (0 when it has no `u=`)
/// to each universe named by its fill. Lattice entries naming the lattice's
/// own universe stand for the lattice cell itself and add no edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniverseGraph {
    children: BTreeMap<u32, BTreeMap<u32, Vec<FillSite>>>,
}

impl UniverseGraph {
    pub fn build(deck: &Deck) -> Self {
        let mut children: BTreeMap<u32, BTreeMap<u32, Vec<FillSite>>> = BTreeMap::new();

        for (card, cell) in deck.cells() {
            let Some(fill) = &cell.params.fill else {
                continue;
            };
            let parent = cell.universe();
            let filled: BTreeSet<u32> = fill.universes().into_iter().collect();
            for u in filled {
                if u == 0 || (cell.is_lattice() && u == parent) {
                    continue;
                }
                children
                    .entry(parent)
                    .or_default()
                    .entry(u)
                    .or_default()
                    .push(FillSite {
                        cell: cell.id,
                        span: card.span,
                    });
            }
        }

        Self { children }
    }

    /// Universes placed directly inside `u`
    pub fn children(&self, u: u32) -> impl Iterator<Item = u32> + '_ {
        self.children
            .get(&u)
            .into_iter()
            .flat_map(|m| m.keys().copied())
    }

    /// Cells placing `child` inside `parent`
    pub fn sites(&self, parent: u32, child: u32) -> &[FillSite] {
        self.children
            .get(&parent)
            .and_then(|m| m.get(&child))
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    /// Every universe appearing in the relation
    pub fn universes(&self) -> BTreeSet<u32> {
        self.children
            .iter()
            .flat_map(|(p, m)| std::iter::once(*p).chain(m.keys().copied()))
            .collect()
    }

    /// Every simple cycle, each reported once from its smallest universe
    ///
    /// Enumeration stops after `limit` cycles.
    pub fn cycles(&self, limit: usize) -> Vec<UniverseCycle> {
        let mut found = Vec::new();
        for start in self.universes() {
            let mut path = vec![start];
            self.cycles_from(start, &mut path, &mut found, limit);
            if found.len() >= limit {
                warn!("Stopped looking for universe cycles after {limit}");
                break;
            }
        }
        debug!("{} universe cycles", found.len());
        found
    }

    fn cycles_from(
        &self,
        start: u32,
        path: &mut Vec<u32>,
        found: &mut Vec<UniverseCycle>,
        limit: usize,
    ) {
        let Some(&current) = path.last() else {
            return;
        };
        for next in self.children(current) {
            if found.len() >= limit {
                return;
            }
            if next == start {
                found.push(self.close(path));
            } else if next > start && !path.contains(&next) {
                path.push(next);
                self.cycles_from(start, path, found, limit);
                path.pop();
            }
        }
    }

    fn close(&self, path: &[u32]) -> UniverseCycle {
        let cells: Vec<u32> = path
            .iter()
            .zip(path.iter().cycle().skip(1))
            .map(|(p, c)| self.sites(*p, *c).first().map(|s| s.cell).unwrap_or_default())
            .collect();
        let span = self
            .sites(path[0], *path.get(1).unwrap_or(&path[0]))
            .first()
            .map(|s| s.span)
            .unwrap_or_default();
        UniverseCycle {
            universes: path.to_vec(),
            cells,
            span,
        }
    }

    /// Deepest nesting reachable from any universe that nothing fills
    ///
    /// Loops are cut where they close, so this is finite for any deck.
    pub fn nesting(&self) -> Nesting {
        let nodes = self.universes();
        let filled: BTreeSet<u32> = self.children.values().flat_map(|m| m.keys().copied()).collect();

        let mut colour: BTreeMap<u32, Colour> = nodes.iter().map(|u| (*u, Colour::White)).collect();
        let mut height: BTreeMap<u32, (usize, Option<u32>)> = BTreeMap::new();

        for root in nodes.iter().filter(|u| !filled.contains(u)) {
            self.visit(*root, &mut colour, &mut height);
        }

        let deepest = nodes
            .iter()
            .filter(|u| !filled.contains(u))
            .map(|u| (*u, height.get(u).map(|h| h.0).unwrap_or(0)))
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)));

        let Some((root, depth)) = deepest else {
            return Nesting::default();
        };

        let mut path = vec![root];
        let mut current = root;
        while let Some((_, Some(next))) = height.get(&current) {
            path.push(*next);
            current = *next;
        }

        Nesting { depth, path }
    }

    fn visit(
        &self,
        u: u32,
        colour: &mut BTreeMap<u32, Colour>,
        height: &mut BTreeMap<u32, (usize, Option<u32>)>,
    ) {
        colour.insert(u, Colour::Grey);
        let mut best = (0, None);
        for child in self.children(u) {
            match colour.get(&child).copied().unwrap_or(Colour::White) {
                Colour::Grey => continue,
                Colour::White => self.visit(child, colour, height),
                Colour::Black => (),
            }
            let h = height.get(&child).map(|h| h.0).unwrap_or(0) + 1;
            if h > best.0 {
                best = (h, Some(child));
            }
        }
        height.insert(u, best);
        colour.insert(u, Colour::Black);
    }
}

#[cfg(test)]
mod universe_tests {
    use super::*;

    fn graph(cells: &str) -> UniverseGraph {
        let text = format!("t\n{cells}\n\n1 so 1\n\nmode n\n");
        UniverseGraph::build(&Deck::parse(&text).deck)
    }

    #[test]
    fn self_fill_is_a_cycle() {
        let g = graph("1 0 -1 u=4 fill=4");
        let cycles = g.cycles(100);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].universes, vec![4]);
        assert_eq!(cycles[0].path(), "4 -> 4");
    }

    #[test]
    fn lattice_own_universe_is_exempt() {
        let g = graph("1 0 -1 fill=2\n2 0 -1 u=2 lat=1 fill=0:1 0:0 0:0 2 3\n3 0 -1 u=3");
        assert!(g.cycles(100).is_empty());
        assert_eq!(g.children(2).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn cycle_starts_from_smallest() {
        let g = graph("1 0 -1 u=3 fill=2\n2 0 -1 u=2 fill=5\n3 0 -1 u=5 fill=3");
        let cycles = g.cycles(100);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].universes, vec![2, 5, 3]);
        assert_eq!(cycles[0].cells, vec![2, 3, 1]);
        assert_eq!(cycles[0].span, Span::line(3));
    }

    #[test]
    fn nesting_depth() {
        let g = graph("1 0 -1 fill=1\n2 0 -1 u=1 fill=2\n3 0 -1 u=2 fill=3\n4 0 -1 u=3");
        let nesting = g.nesting();
        assert_eq!(nesting.depth, 3);
        assert_eq!(nesting.path, vec![0, 1, 2, 3]);
    }

    #[test]
    fn nesting_survives_cycles() {
        let g = graph("1 0 -1 fill=1\n2 0 -1 u=1 fill=2\n3 0 -1 u=2 fill=1");
        assert_eq!(g.nesting().depth, 2);
    }
}
