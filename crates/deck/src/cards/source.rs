use serde::Serialize;

use crate::particle::Particle;

/// Value assigned to a source variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SourceValue {
    Fixed(Vec<f64>),
    /// `Dn`, sampled from distribution `n`
    Distribution(u32),
    /// `Fvar Dn`, dependent on another variable
    Dependent { variable: String, distribution: u32 },
    Text(String),
}

/// `SDEF var=value ...` source definition
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceCard {
    pub variables: Vec<(String, SourceValue)>,
}

impl SourceCard {
    pub fn get(&self, key: &str) -> Option<&SourceValue> {
        self.variables
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Source particle from `par=`, neutrons when absent
    pub fn particle(&self) -> Option<Particle> {
        match self.get("par") {
            None => Some(Particle::Neutron),
            Some(SourceValue::Fixed(v)) => v
                .first()
                .and_then(|n| Particle::try_from(*n as u8).ok()),
            Some(SourceValue::Text(s)) => Particle::try_from(s.as_str()).ok(),
            Some(_) => None,
        }
    }
}

/// `SIn`, `SPn`, `SBn`, or `DSn` distribution card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionCard {
    /// `si`, `sp`, `sb`, or `ds`
    pub keyword: String,
    pub number: u32,
    /// Leading option letter such as `h`, `l`, `a`, `d`
    pub option: Option<char>,
    /// Numeric entries after the option
    pub values: Vec<f64>,
}
