use serde::Serialize;

use crate::particle::Particle;

/// Standard tally type, the last digit of the tally number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TallyKind {
    SurfaceCurrent = 1,
    SurfaceFlux = 2,
    CellFlux = 4,
    PointDetector = 5,
    CellHeating = 6,
    CellFission = 7,
    PulseHeight = 8,
}

impl TallyKind {
    /// Kind implied by a tally number, `None` for 0, 3, and 9
    pub fn from_number(number: u32) -> Option<Self> {
        match number % 10 {
            1 => Some(Self::SurfaceCurrent),
            2 => Some(Self::SurfaceFlux),
            4 => Some(Self::CellFlux),
            5 => Some(Self::PointDetector),
            6 => Some(Self::CellHeating),
            7 => Some(Self::CellFission),
            8 => Some(Self::PulseHeight),
            _ => None,
        }
    }

    pub fn bins_are_surfaces(&self) -> bool {
        matches!(self, Self::SurfaceCurrent | Self::SurfaceFlux)
    }

    pub fn bins_are_cells(&self) -> bool {
        matches!(
            self,
            Self::CellFlux | Self::CellHeating | Self::CellFission | Self::PulseHeight
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TallyModifier {
    #[default]
    None,
    /// `*F`, energy or flux scaled
    Star,
    /// `+F`, charge or collision heating
    Plus,
}

/// Point detector location and exclusion radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detector {
    pub position: [f64; 3],
    /// Positive in cm, negative in mean free paths
    pub radius: f64,
}

/// `Fn:<pl> bins` tally card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyCard {
    pub number: u32,
    pub modifier: TallyModifier,
    /// Empty when the card has no designator
    pub particles: Vec<Particle>,
    /// Cell or surface numbers, for types other than 5
    pub bins: Vec<u32>,
    /// Detector points, for type 5 only
    pub detectors: Vec<Detector>,
    /// Body tokens after the keyword, as written
    pub values: Vec<String>,
}

impl TallyCard {
    pub fn kind(&self) -> Option<TallyKind> {
        TallyKind::from_number(self.number)
    }
}

/// Card modifying a tally, e.g. `E4`, `FM14`, `FC4`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyOptionCard {
    /// Lower case card name without the number
    pub keyword: String,
    /// Tally number, 0 for defaults applying to every tally
    pub tally: u32,
    pub values: Vec<String>,
}
