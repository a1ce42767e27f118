use std::collections::BTreeSet;

use idate_deck::{CardData, CellCard, Deck, Sense, SourceValue, Span, SurfaceLink};
use log::{debug, trace};
use serde::Serialize;

use crate::entity::{EntityKind, Node};
use crate::symbols::SymbolTable;

/// How one entity refers to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Signed surface in a cell geometry
    Geometry,
    /// `#n` cell complement
    Complement,
    /// `LIKE n BUT`
    Like,
    Material,
    /// `trcl=n`
    CellTransform,
    /// `u=n`, the cell belongs to the universe
    Member,
    /// `fill=n` or a lattice fill entry
    Fill,
    /// `fill=n (m)`
    FillTransform,
    /// Transform slot of a surface card
    SurfaceTransform,
    /// Negative transform slot naming a periodic partner
    Periodic,
    /// Cell or surface bin of a tally
    TallyBin,
    /// `MTn` applies to material `n`
    ThermalMaterial,
    /// `SDEF` variable sampled from `Dn`
    SourceDistribution,
    /// `SDEF cel=`
    SourceCell,
    /// `SDEF sur=`
    SourceSurface,
    /// `BURN mat=`
    BurnMaterial,
}

impl EdgeKind {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Geometry => "geometry",
            Self::Complement => "cell complement",
            Self::Like => "like but",
            Self::Material => "material",
            Self::CellTransform => "trcl",
            Self::Member => "universe",
            Self::Fill => "fill",
            Self::FillTransform => "fill transform",
            Self::SurfaceTransform => "surface transform",
            Self::Periodic => "periodic boundary",
            Self::TallyBin => "tally bin",
            Self::ThermalMaterial => "thermal scattering",
            Self::SourceDistribution => "source distribution",
            Self::SourceCell => "source cell",
            Self::SourceSurface => "source surface",
            Self::BurnMaterial => "burn material",
        }
    }
}

/// A single reference from one entity to another
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: Node,
    pub to: Node,
    pub kind: EdgeKind,
    /// Sense of a geometry reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sense: Option<Sense>,
    /// Card the reference is written on
    pub span: Span,
    /// Fill entry of a lattice cell
    pub lattice: bool,
}

impl Edge {
    fn new(from: Node, to: Node, kind: EdgeKind, span: Span) -> Self {
        Self {
            from,
            to,
            kind,
            sense: None,
            span,
            lattice: false,
        }
    }
}

/// Directed multigraph of every reference in a deck
///
/// Nodes are plain `(kind, id)` pairs, so the graph is rebuilt whenever the
/// deck changes and never holds on to cards.
///
/// Data cards without a number (`SDEF`, `BURN`) appear as node 0 of their
/// kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReferenceGraph {
    pub edges: Vec<Edge>,
}

impl ReferenceGraph {
    /// Collect every reference in card order
    pub fn build(deck: &Deck) -> Self {
        let mut edges = Vec::new();

        for card in deck.cards() {
            let span = card.span;
            match &card.data {
                CardData::Cell(c) => cell_edges(c, span, &mut edges),
                CardData::Surface(s) => {
                    let from = Node::new(EntityKind::Surface, s.id);
                    match s.link {
                        Some(SurfaceLink::Transform(tr)) => edges.push(Edge::new(
                            from,
                            Node::new(EntityKind::Transform, tr),
                            EdgeKind::SurfaceTransform,
                            span,
                        )),
                        Some(SurfaceLink::Periodic(other)) => edges.push(Edge::new(
                            from,
                            Node::new(EntityKind::Surface, other),
                            EdgeKind::Periodic,
                            span,
                        )),
                        None => (),
                    }
                }
                CardData::ThermalScattering(t) => edges.push(Edge::new(
                    Node::new(EntityKind::ThermalScattering, t.id),
                    Node::new(EntityKind::Material, t.id),
                    EdgeKind::ThermalMaterial,
                    span,
                )),
                CardData::Tally(t) => {
                    let target = match t.kind() {
                        Some(k) if k.bins_are_surfaces() => EntityKind::Surface,
                        Some(k) if k.bins_are_cells() => EntityKind::Cell,
                        _ => continue,
                    };
                    let from = Node::new(EntityKind::Tally, t.number);
                    for bin in &t.bins {
                        edges.push(Edge::new(
                            from,
                            Node::new(target, *bin),
                            EdgeKind::TallyBin,
                            span,
                        ));
                    }
                }
                CardData::Source(s) => {
                    let from = Node::new(EntityKind::Source, 0);
                    for (variable, value) in &s.variables {
                        let distribution = match value {
                            SourceValue::Distribution(d) => Some(*d),
                            SourceValue::Dependent { distribution, .. } => Some(*distribution),
                            _ => None,
                        };
                        if let Some(d) = distribution {
                            edges.push(Edge::new(
                                from,
                                Node::new(EntityKind::Distribution, d),
                                EdgeKind::SourceDistribution,
                                span,
                            ));
                            continue;
                        }
                        let (kind, edge) = match variable.as_str() {
                            "cel" => (EntityKind::Cell, EdgeKind::SourceCell),
                            "sur" => (EntityKind::Surface, EdgeKind::SourceSurface),
                            _ => continue,
                        };
                        if let SourceValue::Fixed(values) = value {
                            // sur=0 and cel=0 mean "none"
                            for id in values.iter().filter(|v| **v >= 1.0) {
                                edges.push(Edge::new(from, Node::new(kind, *id as u32), edge, span));
                            }
                        }
                    }
                }
                CardData::Burn(b) => {
                    for m in b.materials() {
                        edges.push(Edge::new(
                            Node::new(EntityKind::Burn, 0),
                            Node::new(EntityKind::Material, m),
                            EdgeKind::BurnMaterial,
                            span,
                        ));
                    }
                }
                _ => (),
            }
        }

        debug!("Reference graph: {} edges", edges.len());
        Self { edges }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// References made by one entity
    pub fn from_node(&self, node: Node) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.from == node)
    }

    /// References made to one entity
    pub fn to_node(&self, node: Node) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.to == node)
    }

    /// Every edge whose target is not defined in the deck
    ///
    /// Universe membership edges define their target and are never reported.
    pub fn undefined<'a>(&'a self, symbols: &'a SymbolTable) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| {
            let missing = e.kind != EdgeKind::Member && !symbols.defines(e.to.kind, e.to.id);
            if missing {
                trace!("Undefined {} from {}", e.to, e.from);
            }
            missing
        })
    }

    /// Numbers of a kind that are the target of at least one reference
    pub fn referenced(&self, kind: EntityKind) -> BTreeSet<u32> {
        self.edges
            .iter()
            .filter(|e| e.to.kind == kind)
            .map(|e| e.to.id)
            .collect()
    }
}

fn cell_edges(c: &CellCard, span: Span, edges: &mut Vec<Edge>) {
    let from = Node::new(EntityKind::Cell, c.id);

    if let Some(geometry) = &c.geometry {
        for r in geometry.surface_refs() {
            let mut edge = Edge::new(
                from,
                Node::new(EntityKind::Surface, r.id),
                EdgeKind::Geometry,
                span,
            );
            edge.sense = Some(r.sense);
            edges.push(edge);
        }
        for other in geometry.cell_complements() {
            edges.push(Edge::new(
                from,
                Node::new(EntityKind::Cell, other),
                EdgeKind::Complement,
                span,
            ));
        }
    }

    if let Some(like) = c.like {
        edges.push(Edge::new(from, Node::new(EntityKind::Cell, like), EdgeKind::Like, span));
    }

    let material = match c.like {
        Some(_) => c.like_material().unwrap_or(0),
        None => c.material,
    };
    if material != 0 {
        edges.push(Edge::new(
            from,
            Node::new(EntityKind::Material, material),
            EdgeKind::Material,
            span,
        ));
    }

    if let Some(tr) = c.params.trcl.as_ref().and_then(|t| t.id()) {
        edges.push(Edge::new(
            from,
            Node::new(EntityKind::Transform, tr),
            EdgeKind::CellTransform,
            span,
        ));
    }

    if c.universe() != 0 {
        edges.push(Edge::new(
            from,
            Node::new(EntityKind::Universe, c.universe()),
            EdgeKind::Member,
            span,
        ));
    }

    if let Some(fill) = &c.params.fill {
        let lattice = c.is_lattice();
        for u in fill.universes().into_iter().collect::<BTreeSet<_>>() {
            let mut edge = Edge::new(from, Node::new(EntityKind::Universe, u), EdgeKind::Fill, span);
            edge.lattice = lattice;
            edges.push(edge);
        }
        if let Some(tr) = fill.transform_id() {
            edges.push(Edge::new(
                from,
                Node::new(EntityKind::Transform, tr),
                EdgeKind::FillTransform,
                span,
            ));
        }
    }
}

#[cfg(test)]
mod graph_tests {
    use super::*;

    fn graph(text: &str) -> (ReferenceGraph, SymbolTable) {
        let deck = Deck::parse(text).deck;
        (ReferenceGraph::build(&deck), SymbolTable::build(&deck))
    }

    #[test]
    fn geometry_keeps_sense() {
        let (g, _) = graph("t\n1 0 -1 2 imp:n=1\n\n1 so 1\n2 so 2\n\nmode n\n");
        let senses: Vec<_> = g
            .from_node(Node::new(EntityKind::Cell, 1))
            .filter_map(|e| e.sense)
            .collect();
        assert_eq!(senses, vec![Sense::Negative, Sense::Positive]);
    }

    #[test]
    fn void_material_is_not_a_reference() {
        let (g, _) = graph("t\n1 0 -1\n2 3 -1.0 1\n\n1 so 1\n\nmode n\n");
        assert_eq!(g.referenced(EntityKind::Material).into_iter().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn like_cell_material_override() {
        let (g, s) = graph("t\n1 1 -1.0 -1 imp:n=1\n2 like 1 but mat=9 rho=-2.0\n3 like 1 but trcl=(0 0 1)\n\n1 so 1\n\nm1 1001 1\n");
        let materials: Vec<Node> = g
            .edges()
            .iter()
            .filter(|e| e.kind == EdgeKind::Material)
            .map(|e| e.to)
            .collect();
        assert_eq!(
            materials,
            vec![Node::new(EntityKind::Material, 1), Node::new(EntityKind::Material, 9)]
        );
        let missing: Vec<String> = g.undefined(&s).map(|e| e.to.to_string()).collect();
        assert_eq!(missing, vec!["material 9"]);
    }

    #[test]
    fn undefined_targets() {
        let (g, s) = graph("t\n1 0 -1 -2 trcl=4\n2 0 1 u=5\n\n1 so 1\n\nmt7 lwtr.20t\n");
        let missing: Vec<String> = g.undefined(&s).map(|e| e.to.to_string()).collect();
        assert_eq!(missing, vec!["surface 2", "transform 4", "material 7"]);
    }

    #[test]
    fn source_and_burn_references() {
        let text = "t\n1 1 -1.0 -1\n\n1 so 1\n\nm1 1001 1\nsdef erg=d1 cel=1\nsi1 1 2\nsp1 0 1\nburn mat=1 2\n";
        let (g, s) = graph(text);
        let missing: Vec<_> = g.undefined(&s).collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].to, Node::new(EntityKind::Material, 2));
        assert_eq!(missing[0].kind, EdgeKind::BurnMaterial);
        assert!(g.referenced(EntityKind::Distribution).contains(&1));
        assert!(g.referenced(EntityKind::Cell).contains(&1));
    }

    #[test]
    fn lattice_fill_edges_are_marked() {
        let text = "t\n1 0 -1 fill=2\n2 0 -2 u=2 lat=1 fill=0:1 0:0 0:0 3 3\n3 0 -1 u=3\n\n1 so 1\n2 rpp -1 1 -1 1 -1 1\n\nmode n\n";
        let (g, _) = graph(text);
        let fills: Vec<_> = g.edges().iter().filter(|e| e.kind == EdgeKind::Fill).collect();
        assert_eq!(fills.len(), 2);
        assert!(!fills[0].lattice);
        assert!(fills[1].lattice);
        assert_eq!(fills[1].to.id, 3);
    }
}
