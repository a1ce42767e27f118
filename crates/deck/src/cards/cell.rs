use std::collections::BTreeSet;

use serde::Serialize;

use super::{Fill, Geometry, Param, TransformCard};
use crate::particle::Particle;

/// Cell card: `j m d geom params` or `j LIKE n BUT params`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellCard {
    pub id: u32,
    /// Material number, 0 for void
    pub material: u32,
    /// Negative for g/cm³, positive for atoms/b-cm. `None` for void and
    /// `LIKE` cells.
    pub density: Option<f64>,
    /// Cell this one is declared `LIKE`
    pub like: Option<u32>,
    /// `None` only for `LIKE n BUT` cells
    pub geometry: Option<Geometry>,
    pub params: CellParams,
}

impl CellCard {
    pub fn is_void(&self) -> bool {
        self.material == 0 && self.like.is_none()
    }

    pub fn is_lattice(&self) -> bool {
        self.params.lat.is_some()
    }

    /// Universe this cell belongs to, 0 when not set
    pub fn universe(&self) -> u32 {
        self.params.universe_id()
    }

    /// Referenced surface numbers
    pub fn surfaces(&self) -> BTreeSet<u32> {
        self.geometry
            .as_ref()
            .map(|g| g.surfaces())
            .unwrap_or_default()
    }

    /// Importance for `particle` given on this card
    pub fn importance(&self, particle: Particle) -> Option<f64> {
        self.params.importance(particle)
    }

    /// Zero importance for the particle, i.e. a graveyard cell
    pub fn is_graveyard(&self, particle: Particle) -> bool {
        self.importance(particle) == Some(0.0)
    }

    /// Material overridden by `mat=` on a `LIKE n BUT` cell
    pub fn like_material(&self) -> Option<u32> {
        self.params
            .get("mat")
            .and_then(|p| p.values.first())
            .and_then(|v| v.parse().ok())
    }
}

/// Inline or numbered cell transformation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Trcl {
    Id(u32),
    /// Written on the cell itself, held with id 0
    Inline(TransformCard),
}

impl Trcl {
    /// Transform card number, if one is referenced
    pub fn id(&self) -> Option<u32> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Inline(_) => None,
        }
    }
}

/// Keyword parameters following the cell geometry
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CellParams {
    /// Each `imp:<designators>=v` entry in card order
    pub importances: Vec<(Vec<Particle>, f64)>,
    /// Signed universe, negative marks a fully enclosed cell
    pub universe: Option<i64>,
    pub fill: Option<Fill>,
    pub lat: Option<i64>,
    pub trcl: Option<Trcl>,
    pub vol: Option<f64>,
    pub tmp: Option<f64>,
    /// Everything else, kept in order
    pub other: Vec<Param>,
}

impl CellParams {
    /// Importance for a particle, taking the last entry naming it
    pub fn importance(&self, particle: Particle) -> Option<f64> {
        self.importances
            .iter()
            .rev()
            .find(|(ps, _)| ps.contains(&particle))
            .map(|(_, v)| *v)
    }

    /// Particles with more than one differing importance on the same card
    pub fn conflicting_importances(&self) -> Vec<Particle> {
        let mut conflicts = BTreeSet::new();
        for (i, (ps, v)) in self.importances.iter().enumerate() {
            for (qs, w) in &self.importances[i + 1..] {
                for p in ps.iter().filter(|p| qs.contains(p)) {
                    if v != w {
                        conflicts.insert(*p);
                    }
                }
            }
        }
        conflicts.into_iter().collect()
    }

    pub fn universe_id(&self) -> u32 {
        self.universe
            .and_then(|u| u32::try_from(u.unsigned_abs()).ok())
            .unwrap_or(0)
    }

    /// Residual parameter by key
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.other.iter().find(|p| p.key == key)
    }
}
