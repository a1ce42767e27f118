//! MCNP particle designators

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ParseError};

/// Particle types that may appear in a designator list
///
/// Decks name particles by a single character symbol (`imp:n`, `f4:p`,
/// `mode n p e`). The `par` source variable may also use the particle number.
///
/// ```rust
/// # use idate_deck::Particle;
/// assert_eq!(Particle::try_from("n").unwrap(), Particle::Neutron);
/// assert_eq!(Particle::try_from("9").unwrap(), Particle::Proton);
/// assert_eq!(Particle::Photon.symbol(), 'p');
/// ```
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Particle {
    Neutron = 1,
    Photon = 2,
    Electron = 3,
    NegativeMuon = 4,
    AntiNeutron = 5,
    ElectronNeutrino = 6,
    MuonNeutrino = 7,
    Positron = 8,
    Proton = 9,
    LambdaBaryon = 10,
    PosSigmaBaryon = 11,
    NegSigmaBaryon = 12,
    XiBaryon = 13,
    NegXiBaryon = 14,
    OmegaBaryon = 15,
    PosMuon = 16,
    AntiElectronNeutrino = 17,
    AntiMuonNeutrino = 18,
    AntiProton = 19,
    PosPion = 20,
    NeuPion = 21,
    PosKaon = 22,
    ShortKaon = 23,
    LongKaon = 24,
    AntiLambdaBaryon = 25,
    AntiPosSigmaBaryon = 26,
    AntiNegSigmaBaryon = 27,
    AntiNeuXiBaryon = 28,
    PosXiBaryon = 29,
    AntiOmega = 30,
    Deuteron = 31,
    Triton = 32,
    Helion = 33,
    Alpha = 34,
    NegPion = 35,
    NegKaon = 36,
    HeavyIon = 37,
}

// (particle, designator, name) in particle number order
const DESIGNATORS: [(Particle, char, &str); 37] = [
    (Particle::Neutron, 'n', "neutron"),
    (Particle::Photon, 'p', "photon"),
    (Particle::Electron, 'e', "electron"),
    (Particle::NegativeMuon, '|', "negative muon"),
    (Particle::AntiNeutron, 'q', "anti neutron"),
    (Particle::ElectronNeutrino, 'u', "electron neutrino"),
    (Particle::MuonNeutrino, 'v', "muon neutrino"),
    (Particle::Positron, 'f', "positron"),
    (Particle::Proton, 'h', "proton"),
    (Particle::LambdaBaryon, 'l', "lambda baryon"),
    (Particle::PosSigmaBaryon, '+', "positive sigma baryon"),
    (Particle::NegSigmaBaryon, '-', "negative sigma baryon"),
    (Particle::XiBaryon, 'x', "xi baryon"),
    (Particle::NegXiBaryon, 'y', "negative xi baryon"),
    (Particle::OmegaBaryon, 'o', "omega baryon"),
    (Particle::PosMuon, '!', "positive muon"),
    (Particle::AntiElectronNeutrino, '<', "anti electron neutrino"),
    (Particle::AntiMuonNeutrino, '>', "anti muon neutrino"),
    (Particle::AntiProton, 'g', "anti proton"),
    (Particle::PosPion, '/', "positive pion"),
    (Particle::NeuPion, 'z', "neutral pion"),
    (Particle::PosKaon, 'k', "positive kaon"),
    (Particle::ShortKaon, '%', "short kaon"),
    (Particle::LongKaon, '^', "long kaon"),
    (Particle::AntiLambdaBaryon, 'b', "anti lambda baryon"),
    (Particle::AntiPosSigmaBaryon, '_', "anti positive sigma baryon"),
    (Particle::AntiNegSigmaBaryon, '~', "anti negative sigma baryon"),
    (Particle::AntiNeuXiBaryon, 'c', "anti neutral xi baryon"),
    (Particle::PosXiBaryon, 'w', "positive xi baryon"),
    (Particle::AntiOmega, '@', "anti omega"),
    (Particle::Deuteron, 'd', "deuteron"),
    (Particle::Triton, 't', "triton"),
    (Particle::Helion, 's', "helion"),
    (Particle::Alpha, 'a', "alpha"),
    (Particle::NegPion, '*', "negative pion"),
    (Particle::NegKaon, '?', "negative kaon"),
    (Particle::HeavyIon, '#', "heavy ion"),
];

impl Particle {
    /// MCNP particle number
    #[inline]
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Single character designator used on cards
    pub fn symbol(&self) -> char {
        DESIGNATORS[self.id() as usize - 1].1
    }

    /// Descriptive name
    pub fn name(&self) -> &'static str {
        DESIGNATORS[self.id() as usize - 1].2
    }

    /// Look up a particle from its designator, ignoring case
    pub fn from_symbol(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        DESIGNATORS.iter().find(|d| d.1 == c).map(|d| d.0)
    }

    /// Parse a comma separated designator list such as `n,p`
    ///
    /// ```rust
    /// # use idate_deck::Particle;
    /// let list = Particle::list("n,p").unwrap();
    /// assert_eq!(list, vec![Particle::Neutron, Particle::Photon]);
    /// ```
    pub fn list(designator: &str) -> Result<Vec<Self>, ParseError> {
        designator
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Self::try_from(s).map_err(|_| ParseError::bad("designator", s.to_string()))
            })
            .collect()
    }

    /// Format a list of particles as a designator, e.g. `n,p`
    pub fn designator(particles: &[Self]) -> String {
        particles
            .iter()
            .map(|p| p.symbol().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Convert from the particle number
impl TryFrom<u8> for Particle {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1..=37 => Ok(DESIGNATORS[v as usize - 1].0),
            _ => Err(Error::UnknownParticle(v.to_string())),
        }
    }
}

/// Convert from a designator, particle number, or name
impl TryFrom<&str> for Particle {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim().to_lowercase();
        let mut chars = s.chars();

        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(p) = Self::from_symbol(c) {
                return Ok(p);
            }
        }

        if let Ok(v) = s.parse::<u8>() {
            return Self::try_from(v);
        }

        DESIGNATORS
            .iter()
            .find(|d| d.2 == s)
            .map(|d| d.0)
            .ok_or(Error::UnknownParticle(s))
    }
}
