use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::Param;

/// Nuclide identifier `ZZZAAA[.nnX]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Zaid {
    /// Atomic number
    pub z: u32,
    /// Mass number, 0 for natural elements
    pub a: u32,
    /// Library suffix such as `80c`, lower case
    pub suffix: Option<String>,
}

impl Zaid {
    /// Combined `ZZZAAA` number
    pub fn number(&self) -> u32 {
        self.z * 1000 + self.a
    }

    pub fn is_natural(&self) -> bool {
        self.a == 0
    }

    /// Trailing letter of the suffix, e.g. `c` for continuous energy
    pub fn library_class(&self) -> Option<char> {
        self.suffix.as_ref().and_then(|s| s.chars().last())
    }
}

impl fmt::Display for Zaid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.number())?;
        if let Some(suffix) = &self.suffix {
            write!(f, ".{suffix}")?;
        }
        Ok(())
    }
}

/// One `zaid fraction` pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub zaid: Zaid,
    /// Positive for atom fraction, negative for mass fraction
    pub fraction: f64,
}

/// Material card `Mn zaid fraction ... [keyword=value ...]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialCard {
    pub id: u32,
    pub components: Vec<Component>,
    pub keywords: Vec<Param>,
}

impl MaterialCard {
    pub fn keyword(&self, key: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|p| p.key == key)
            .and_then(|p| p.values.first())
            .map(String::as_str)
    }

    /// Library applied to a component, falling back to `nlib=`
    pub fn effective_suffix<'a>(&'a self, component: &'a Component) -> Option<&'a str> {
        component
            .zaid
            .suffix
            .as_deref()
            .or_else(|| self.keyword("nlib"))
    }

    /// Distinct atomic numbers present
    pub fn elements(&self) -> BTreeSet<u32> {
        self.components.iter().map(|c| c.zaid.z).collect()
    }

    /// True if any component is the given nuclide
    pub fn contains_nuclide(&self, z: u32, a: u32) -> bool {
        self.components
            .iter()
            .any(|c| c.zaid.z == z && c.zaid.a == a)
    }

    pub fn has_mixed_fractions(&self) -> bool {
        let positive = self.components.iter().any(|c| c.fraction > 0.0);
        let negative = self.components.iter().any(|c| c.fraction < 0.0);
        positive && negative
    }
}

/// A single `name.nnT` thermal table reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThermalTable {
    /// Table identifier such as `lwtr` or `h-h2o`
    pub name: String,
    pub suffix: Option<String>,
}

impl fmt::Display for ThermalTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(suffix) = &self.suffix {
            write!(f, ".{suffix}")?;
        }
        Ok(())
    }
}

/// `MTn table ...` thermal scattering card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermalCard {
    /// Material number this card pairs with
    pub id: u32,
    pub tables: Vec<ThermalTable>,
}
