use std::collections::BTreeSet;
use std::fmt;

use idate_deck::{Deck, Particle};
use idate_xref::{EntityKind, Node, ReferenceGraph, SymbolTable};
use serde::Serialize;

/// Something an edit would break, reported when the edit is refused
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    /// A reference that was fine before the edit would dangle after it
    UndefinedReference { from: Node, to: Node, via: String },
    /// The edit would define a number twice
    DuplicateId { kind: EntityKind, id: u32 },
    /// The thing to edit does not exist
    UnknownEntity { kind: EntityKind, id: u32 },
    /// Void cells carry no density
    VoidCellDensity { cell: u32 },
    /// Graveyard cells keep their zero importance unless asked
    GraveyardCell { cell: u32, particle: Particle },
    /// Importances for the particle are on an `IMP` data card instead
    ImportanceDataCard { particle: Particle },
    /// A rewritten card no longer parses
    UnparsedCard { line: usize, reason: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UndefinedReference { from, to, via } => {
                write!(f, "{from} would reference undefined {to} ({via})")
            }
            Self::DuplicateId { kind, id } => write!(f, "{kind} {id} would be defined twice"),
            Self::UnknownEntity { kind, id } => write!(f, "{kind} {id} does not exist"),
            Self::VoidCellDensity { cell } => write!(f, "cell {cell} is void and has no density"),
            Self::GraveyardCell { cell, particle } => {
                write!(f, "cell {cell} is a {} graveyard", particle.name())
            }
            Self::ImportanceDataCard { particle } => {
                write!(f, "{} importances are given on an imp data card", particle.name())
            }
            Self::UnparsedCard { line, reason } => write!(f, "line {line} would not parse: {reason}"),
        }
    }
}

/// Everything `after` breaks that was intact in `before`
///
/// Problems already present in `before` are not the edit's fault and are not
/// reported.
pub fn broken_by(before: &Deck, after: &Deck) -> Vec<Violation> {
    let mut found = Vec::new();

    let old_symbols = SymbolTable::build(before);
    let old_graph = ReferenceGraph::build(before);
    let dangling: BTreeSet<(Node, Node)> = old_graph
        .undefined(&old_symbols)
        .map(|e| (e.from, e.to))
        .collect();

    let symbols = SymbolTable::build(after);
    let graph = ReferenceGraph::build(after);
    for edge in graph.undefined(&symbols) {
        if !dangling.contains(&(edge.from, edge.to)) {
            found.push(Violation::UndefinedReference {
                from: edge.from,
                to: edge.to,
                via: edge.kind.describe().to_string(),
            });
        }
    }

    let duplicated: BTreeSet<(EntityKind, u32)> = old_symbols
        .duplicates()
        .into_iter()
        .map(|d| (d.kind, d.id))
        .collect();
    for d in symbols.duplicates() {
        if !duplicated.contains(&(d.kind, d.id)) {
            found.push(Violation::DuplicateId { kind: d.kind, id: d.id });
        }
    }

    let unparsed: BTreeSet<&str> = before.invalid().map(|(l, _)| l.text.as_str()).collect();
    for (line, error) in after.invalid() {
        if !unparsed.contains(line.text.as_str()) {
            found.push(Violation::UnparsedCard {
                line: line.span.first,
                reason: error.to_string(),
            });
        }
    }

    found
}
