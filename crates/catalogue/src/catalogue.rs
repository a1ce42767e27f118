use std::sync::OnceLock;

use log::debug;

use crate::element::{Element, ELEMENTS};
use crate::library::{Library, LIBRARIES};
use crate::thermal::{ThermalFamily, THERMAL_FAMILIES};

/// Handle to the reference tables
///
/// Every check receives the same handle. Use [Catalogue::global] unless a
/// test needs its own instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    elements: &'static [Element],
    libraries: &'static [Library],
    thermal: &'static [ThermalFamily],
}

impl Default for Catalogue {
    fn default() -> Self {
        Self {
            elements: &ELEMENTS,
            libraries: &LIBRARIES,
            thermal: &THERMAL_FAMILIES,
        }
    }
}

// Only ever built once on first use
static GLOBAL: OnceLock<Catalogue> = OnceLock::new();

impl Catalogue {
    /// Shared process-wide catalogue
    pub fn global() -> &'static Catalogue {
        GLOBAL.get_or_init(|| {
            debug!("Initialising reference catalogue");
            Catalogue::default()
        })
    }

    /// Element by atomic number
    pub fn element(&self, z: u32) -> Option<&Element> {
        z.checked_sub(1)
            .and_then(|i| self.elements.get(i as usize))
            .filter(|e| e.z == z)
    }

    /// Element by symbol, ignoring case
    pub fn element_by_symbol(&self, symbol: &str) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn elements(&self) -> &[Element] {
        self.elements
    }

    /// Approximate nuclide mass in amu
    ///
    /// Uses the mass number for a specific isotope and the standard atomic
    /// weight for natural elements (`a == 0`).
    pub fn nuclide_mass(&self, z: u32, a: u32) -> Option<f64> {
        match a {
            0 => self.element(z).map(|e| e.weight),
            a => Some(a as f64),
        }
    }

    /// Library by suffix, with or without the leading dot
    pub fn library(&self, suffix: &str) -> Option<&Library> {
        let suffix = suffix.trim_start_matches('.');
        self.libraries
            .iter()
            .find(|l| l.suffix.eq_ignore_ascii_case(suffix))
    }

    pub fn libraries(&self) -> &[Library] {
        self.libraries
    }

    /// Thermal family by short name or alias
    pub fn thermal_family(&self, name: &str) -> Option<&ThermalFamily> {
        self.thermal.iter().find(|f| f.matches(name))
    }

    pub fn thermal_families(&self) -> &[ThermalFamily] {
        self.thermal
    }

    /// Library that a set of suffixes should be standardised on
    ///
    /// The first suffix in `preference` that is present wins. Failing that,
    /// the newest known suffix present, then the first present suffix in
    /// sorted order.
    ///
    /// ```rust
    /// # use idate_catalogue::{default_preference, Catalogue};
    /// let catalogue = Catalogue::global();
    /// let pick = catalogue.recommend_library(&["70c", "00c", "80c"], &default_preference());
    /// assert_eq!(pick.as_deref(), Some("80c"));
    ///
    /// let pick = catalogue.recommend_library(&["70c", "71c"], &[]);
    /// assert_eq!(pick.as_deref(), Some("70c"));
    /// ```
    pub fn recommend_library<S: AsRef<str>>(
        &self,
        present: &[S],
        preference: &[String],
    ) -> Option<String> {
        let present: Vec<String> = present
            .iter()
            .map(|s| s.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();

        if let Some(p) = preference.iter().find(|p| present.contains(p)) {
            return Some(p.clone());
        }

        let newest = present
            .iter()
            .filter_map(|s| self.library(s))
            .max_by(|a, b| {
                a.release
                    .cmp(&b.release)
                    .then_with(|| b.suffix.cmp(a.suffix))
            });
        if let Some(lib) = newest {
            return Some(lib.suffix.to_string());
        }

        present.into_iter().min()
    }
}
