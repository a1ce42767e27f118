//! Typed records for every card the engine understands

mod cell;
mod data;
mod fill;
mod geometry;
mod material;
mod source;
mod surface;
mod tally;
mod transform;

pub use cell::*;
pub use data::*;
pub use fill::*;
pub use geometry::*;
pub use material::*;
pub use source::*;
pub use surface::*;
pub use tally::*;
pub use transform::*;

use serde::{Deserialize, Serialize};

use crate::diagnostic::Span;

/// Closed set of card categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Cell,
    Surface,
    Material,
    ThermalScattering,
    Transform,
    Tally,
    TallyOption,
    Source,
    Distribution,
    Importance,
    WeightWindow,
    Mesh,
    Mode,
    Physics,
    Cutoff,
    Burn,
    Kcode,
    Ksrc,
    Dxtran,
    Other,
}

/// A `key=values` entry kept in the order written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    /// Lower case key, including any `:` designator
    pub key: String,
    pub values: Vec<String>,
}

impl Param {
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// All values as reals, if every one parses
    pub fn reals(&self) -> Option<Vec<f64>> {
        self.values.iter().map(|v| crate::parsers::real(v)).collect()
    }
}

/// Parsed contents of one card
#[derive(Debug, Clone, PartialEq)]
pub enum CardData {
    Cell(CellCard),
    Surface(SurfaceCard),
    Material(MaterialCard),
    ThermalScattering(ThermalCard),
    Transform(TransformCard),
    Tally(TallyCard),
    TallyOption(TallyOptionCard),
    Source(SourceCard),
    Distribution(DistributionCard),
    Importance(ImportanceCard),
    WeightWindow(WeightWindowCard),
    Mesh(MeshCard),
    Mode(ModeCard),
    Physics(PhysicsCard),
    Cutoff(CutoffCard),
    Burn(BurnCard),
    Kcode(KcodeCard),
    Ksrc(KsrcCard),
    Dxtran(DxtranCard),
    Other(OtherCard),
}

impl CardData {
    pub fn kind(&self) -> CardKind {
        match self {
            Self::Cell(_) => CardKind::Cell,
            Self::Surface(_) => CardKind::Surface,
            Self::Material(_) => CardKind::Material,
            Self::ThermalScattering(_) => CardKind::ThermalScattering,
            Self::Transform(_) => CardKind::Transform,
            Self::Tally(_) => CardKind::Tally,
            Self::TallyOption(_) => CardKind::TallyOption,
            Self::Source(_) => CardKind::Source,
            Self::Distribution(_) => CardKind::Distribution,
            Self::Importance(_) => CardKind::Importance,
            Self::WeightWindow(_) => CardKind::WeightWindow,
            Self::Mesh(_) => CardKind::Mesh,
            Self::Mode(_) => CardKind::Mode,
            Self::Physics(_) => CardKind::Physics,
            Self::Cutoff(_) => CardKind::Cutoff,
            Self::Burn(_) => CardKind::Burn,
            Self::Kcode(_) => CardKind::Kcode,
            Self::Ksrc(_) => CardKind::Ksrc,
            Self::Dxtran(_) => CardKind::Dxtran,
            Self::Other(_) => CardKind::Other,
        }
    }

    /// Identifying number for numbered cards
    pub fn id(&self) -> Option<u32> {
        match self {
            Self::Cell(c) => Some(c.id),
            Self::Surface(s) => Some(s.id),
            Self::Material(m) => Some(m.id),
            Self::ThermalScattering(t) => Some(t.id),
            Self::Transform(t) => Some(t.id),
            Self::Tally(t) => Some(t.number),
            Self::TallyOption(t) => Some(t.tally),
            Self::Distribution(d) => Some(d.number),
            Self::Mesh(m) => m.number,
            Self::WeightWindow(w) => w.index,
            Self::Other(o) => o.number,
            _ => None,
        }
    }
}

/// A logical card with its parsed data and original text
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub data: CardData,
    pub span: Span,
    /// Physical lines exactly as read, including absorbed comment lines
    pub raw: Vec<String>,
    /// Card body with comments removed and continuations joined
    pub text: String,
    /// Inline `$` comments in order of appearance
    pub comments: Vec<String>,
}

impl Card {
    pub fn kind(&self) -> CardKind {
        self.data.kind()
    }

    pub fn id(&self) -> Option<u32> {
        self.data.id()
    }

    /// Whitespace separated body tokens
    pub fn tokens(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }

    /// First body token, lower case
    pub fn keyword(&self) -> String {
        self.text
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}
