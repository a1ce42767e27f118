use serde::{Deserialize, Serialize};

/// Broad kind of problem, used to offer energy setting recommendations
///
/// These encode common practice rather than anything a deck must follow, so
/// they are only ever applied when asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemClass {
    ThermalReactor,
    FastReactor,
    Shielding,
    Fusion,
    Medical,
}

/// Suggested energy bounds for one particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyTemplate {
    /// Particle designator symbol
    pub particle: char,
    /// Upper energy limit in MeV
    pub emax: f64,
    /// Lower energy cutoff in MeV
    pub cutoff: f64,
}

impl ProblemClass {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ThermalReactor => "thermal reactor",
            Self::FastReactor => "fast reactor",
            Self::Shielding => "shielding",
            Self::Fusion => "fusion",
            Self::Medical => "medical",
        }
    }

    /// Recommended bounds per particle
    pub fn templates(&self) -> &'static [EnergyTemplate] {
        match self {
            Self::ThermalReactor => &[
                EnergyTemplate { particle: 'n', emax: 20.0, cutoff: 0.0 },
                EnergyTemplate { particle: 'p', emax: 20.0, cutoff: 1e-3 },
            ],
            Self::FastReactor => &[
                EnergyTemplate { particle: 'n', emax: 20.0, cutoff: 1e-9 },
                EnergyTemplate { particle: 'p', emax: 20.0, cutoff: 1e-3 },
            ],
            Self::Shielding => &[
                EnergyTemplate { particle: 'n', emax: 20.0, cutoff: 0.0 },
                EnergyTemplate { particle: 'p', emax: 20.0, cutoff: 1e-3 },
                EnergyTemplate { particle: 'e', emax: 20.0, cutoff: 1e-3 },
            ],
            Self::Fusion => &[
                EnergyTemplate { particle: 'n', emax: 20.0, cutoff: 0.0 },
                EnergyTemplate { particle: 'p', emax: 20.0, cutoff: 1e-3 },
            ],
            Self::Medical => &[
                EnergyTemplate { particle: 'p', emax: 30.0, cutoff: 1e-2 },
                EnergyTemplate { particle: 'e', emax: 30.0, cutoff: 1e-1 },
            ],
        }
    }

    pub fn template(&self, particle: char) -> Option<&'static EnergyTemplate> {
        self.templates().iter().find(|t| t.particle == particle)
    }
}
