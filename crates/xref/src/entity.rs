use std::fmt::Display;

use serde::Serialize;

/// Kinds of numbered things a deck can define or reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Cell,
    Surface,
    Material,
    ThermalScattering,
    Transform,
    Universe,
    Tally,
    Distribution,
    Source,
    Burn,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cell => "cell",
            Self::Surface => "surface",
            Self::Material => "material",
            Self::ThermalScattering => "thermal scattering",
            Self::Transform => "transform",
            Self::Universe => "universe",
            Self::Tally => "tally",
            Self::Distribution => "distribution",
            Self::Source => "source",
            Self::Burn => "burn",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One entity in the reference graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Node {
    pub kind: EntityKind,
    pub id: u32,
}

impl Node {
    pub fn new(kind: EntityKind, id: u32) -> Self {
        Self { kind, id }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}
