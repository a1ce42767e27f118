use serde::Serialize;

use super::Param;
use crate::particle::Particle;

/// `MODE p1 p2 ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeCard {
    pub particles: Vec<Particle>,
}

/// `PHYS:<pl> v1 v2 ...`, with `J` entries left as `None`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicsCard {
    pub particle: Particle,
    pub values: Vec<Option<f64>>,
}

impl PhysicsCard {
    /// Entry at a 0-based position, if given explicitly
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Upper energy limit in MeV, the first entry
    pub fn emax(&self) -> Option<f64> {
        self.value(0)
    }
}

/// `CUT:<pl> t e wc1 wc2 swtm`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutoffCard {
    pub particles: Vec<Particle>,
    pub values: Vec<Option<f64>>,
}

impl CutoffCard {
    /// Lower energy cutoff in MeV, the second entry
    pub fn energy(&self) -> Option<f64> {
        self.values.get(1).copied().flatten()
    }
}

/// `IMP:<pl> v1 v2 ...` in cell order, shorthand expanded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportanceCard {
    pub particles: Vec<Particle>,
    pub values: Vec<f64>,
}

/// `WWN`, `WWE`, `WWP`, `WWG`, `WWGE`, and `WWGT` cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightWindowCard {
    pub keyword: String,
    /// Energy group index, e.g. the `1` in `WWN1:n`
    pub index: Option<u32>,
    pub particles: Vec<Particle>,
    pub values: Vec<String>,
}

/// `FMESH`, `TMESH`, and `MESH` cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshCard {
    pub keyword: String,
    pub number: Option<u32>,
    pub particles: Vec<Particle>,
    pub params: Vec<Param>,
}

impl MeshCard {
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.key == key)
    }
}

/// `BURN` depletion card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurnCard {
    pub params: Vec<Param>,
}

impl BurnCard {
    /// Materials listed by `mat=`
    pub fn materials(&self) -> Vec<u32> {
        self.params
            .iter()
            .filter(|p| p.key == "mat")
            .flat_map(|p| p.values.iter())
            .filter_map(|v| v.parse::<i64>().ok())
            .map(|v| v.unsigned_abs() as u32)
            .collect()
    }
}

/// `KCODE nsrck rkk ikz kct ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KcodeCard {
    pub values: Vec<Option<f64>>,
}

/// `KSRC x y z ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KsrcCard {
    pub points: Vec<[f64; 3]>,
}

/// One DXTRAN sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DxtranSphere {
    pub centre: [f64; 3],
    pub inner: f64,
    pub outer: f64,
}

/// `DXT:<pl> x y z ri ro ... [dwc1 dwc2 dpwt]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DxtranCard {
    pub particles: Vec<Particle>,
    pub spheres: Vec<DxtranSphere>,
    /// Weight cutoffs and point detector weight, when given
    pub trailing: Vec<f64>,
}

/// Any data card without a dedicated record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtherCard {
    /// Lower case name, including any `*` or `+` prefix
    pub keyword: String,
    pub number: Option<u32>,
    pub particles: Vec<Particle>,
    pub values: Vec<String>,
}
