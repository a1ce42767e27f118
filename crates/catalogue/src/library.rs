use serde::{Deserialize, Serialize};

/// Data class given by the last letter of a library suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryClass {
    /// `c`, continuous energy neutron
    Neutron,
    /// `p`, photoatomic
    Photon,
    /// `e`, electron
    Electron,
    /// `u`, photonuclear
    Photonuclear,
    /// `t`, thermal scattering
    Thermal,
    /// `y`, dosimetry
    Dosimetry,
}

impl LibraryClass {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'c' => Some(Self::Neutron),
            'p' => Some(Self::Photon),
            'e' => Some(Self::Electron),
            'u' => Some(Self::Photonuclear),
            't' => Some(Self::Thermal),
            'y' => Some(Self::Dosimetry),
            _ => None,
        }
    }

    /// Class of a suffix such as `80c`
    pub fn of_suffix(suffix: &str) -> Option<Self> {
        suffix.chars().last().and_then(Self::from_letter)
    }
}

/// A known cross-section library suffix
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Library {
    /// Suffix without the dot, e.g. `80c`
    pub suffix: &'static str,
    pub class: LibraryClass,
    pub evaluation: &'static str,
    /// Processing temperature in kelvin, where one applies
    pub temperature: Option<f64>,
    /// Release order, higher is newer
    pub release: u16,
}

macro_rules! libraries {
    ($(($suffix:expr, $class:ident, $evaluation:expr, $temperature:expr, $release:expr)),* $(,)?) => {
        [$(Library {
            suffix: $suffix,
            class: LibraryClass::$class,
            evaluation: $evaluation,
            temperature: $temperature,
            release: $release,
        }),*]
    };
}

pub(crate) static LIBRARIES: [Library; 37] = libraries![
    ("50c", Neutron, "ENDF/B-V", Some(293.6), 1985),
    ("60c", Neutron, "ENDF/B-VI.0", Some(293.6), 1990),
    ("62c", Neutron, "ENDF/B-VI.8", Some(293.6), 2001),
    ("66c", Neutron, "ENDF/B-VI.6", Some(293.6), 1999),
    ("70c", Neutron, "ENDF/B-VII.0", Some(293.6), 2006),
    ("71c", Neutron, "ENDF/B-VII.0", Some(600.0), 2006),
    ("72c", Neutron, "ENDF/B-VII.0", Some(900.0), 2006),
    ("73c", Neutron, "ENDF/B-VII.0", Some(1200.0), 2006),
    ("74c", Neutron, "ENDF/B-VII.0", Some(2500.0), 2006),
    ("80c", Neutron, "ENDF/B-VII.1", Some(293.6), 2011),
    ("81c", Neutron, "ENDF/B-VII.1", Some(600.0), 2011),
    ("82c", Neutron, "ENDF/B-VII.1", Some(900.0), 2011),
    ("83c", Neutron, "ENDF/B-VII.1", Some(1200.0), 2011),
    ("84c", Neutron, "ENDF/B-VII.1", Some(2500.0), 2011),
    ("85c", Neutron, "ENDF/B-VII.1", Some(0.1), 2011),
    ("86c", Neutron, "ENDF/B-VII.1", Some(250.0), 2011),
    ("00c", Neutron, "ENDF/B-VIII.0", Some(293.6), 2018),
    ("01c", Neutron, "ENDF/B-VIII.0", Some(600.0), 2018),
    ("02c", Neutron, "ENDF/B-VIII.0", Some(900.0), 2018),
    ("03c", Neutron, "ENDF/B-VIII.0", Some(1200.0), 2018),
    ("04c", Neutron, "ENDF/B-VIII.0", Some(2500.0), 2018),
    ("05c", Neutron, "ENDF/B-VIII.0", Some(0.1), 2018),
    ("06c", Neutron, "ENDF/B-VIII.0", Some(250.0), 2018),
    ("01p", Photon, "MCPLIB", None, 1982),
    ("02p", Photon, "MCPLIB02", None, 1993),
    ("03p", Photon, "MCPLIB03", None, 2002),
    ("04p", Photon, "MCPLIB04", None, 2002),
    ("12p", Photon, "EPRDATA12", None, 2012),
    ("14p", Photon, "EPRDATA14", None, 2014),
    ("84p", Photon, "MCPLIB84", None, 2012),
    ("01e", Electron, "EL1", None, 1982),
    ("03e", Electron, "EL03", None, 2000),
    ("12e", Electron, "EPRDATA12", None, 2012),
    ("14e", Electron, "EPRDATA14", None, 2014),
    ("24u", Photonuclear, "LA150U", None, 2000),
    ("70u", Photonuclear, "ENDF/B-VII.0", None, 2006),
    ("80u", Photonuclear, "ENDF/B-VII.1", None, 2011),
];

/// Generation digit of the thermal tables that pair with a neutron library
///
/// `.70c` pairs with `.1nt` tables, `.80c` with `.2nt`, and `.00c` with
/// `.4nt`.
pub fn thermal_generation(neutron_suffix: &str) -> Option<char> {
    let suffix = neutron_suffix.trim_start_matches('.').to_ascii_lowercase();
    if !suffix.ends_with('c') {
        return None;
    }
    match suffix.chars().next() {
        Some('7') => Some('1'),
        Some('8') => Some('2'),
        Some('0') => Some('4'),
        _ => None,
    }
}

/// Default order for recommending one library over another
pub fn default_preference() -> Vec<String> {
    ["80c", "00c", "70c", "66c", "62c", "60c", "50c"]
        .into_iter()
        .map(String::from)
        .collect()
}
