use serde::Serialize;

/// Boltzmann constant in MeV/K, for cell `tmp=` values
pub const BOLTZMANN_MEV: f64 = 8.617_333e-11;

/// Convert a cell temperature in MeV to kelvin
pub fn mev_to_kelvin(mev: f64) -> f64 {
    mev / BOLTZMANN_MEV
}

/// A thermal scattering law family such as `lwtr`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermalFamily {
    /// Short table name used on `MT` cards
    pub name: &'static str,
    /// Longer names used by newer data releases
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    /// Atomic numbers of the bound nuclides
    pub elements: &'static [u32],
    /// Tabulated temperatures in kelvin, indexed by the last suffix digit
    pub temperatures: &'static [f64],
}

impl ThermalFamily {
    /// True for the short name or any alias
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.name == name || self.aliases.contains(&name.as_str())
    }

    /// Tabulated temperature for a table suffix such as `20t`
    pub fn temperature(&self, suffix: &str) -> Option<f64> {
        let suffix = suffix.trim_start_matches('.');
        let digit = suffix.strip_suffix(['t', 'T'])?.chars().last()?.to_digit(10)?;
        self.temperatures.get(digit as usize).copied()
    }

    /// Range of temperatures the table at `suffix` best represents
    ///
    /// The bracket runs halfway to each neighbouring tabulated temperature.
    /// At either end of the table it extends by the same half gap, or 10% of
    /// the temperature when only one point is tabulated.
    pub fn bracket(&self, suffix: &str) -> Option<(f64, f64)> {
        let t = self.temperature(suffix)?;
        let i = self.temperatures.iter().position(|v| *v == t)?;
        let below = i.checked_sub(1).and_then(|j| self.temperatures.get(j));
        let above = self.temperatures.get(i + 1);

        let half_low = below.map(|b| (t - b) / 2.0);
        let half_high = above.map(|a| (a - t) / 2.0);
        let fallback = 0.1 * t;

        Some((
            t - half_low.or(half_high).unwrap_or(fallback),
            t + half_high.or(half_low).unwrap_or(fallback),
        ))
    }

    /// Table name at the first temperature for a data generation digit
    pub fn table_for(&self, generation: char) -> String {
        format!("{}.{generation}0t", self.name)
    }
}

pub(crate) static THERMAL_FAMILIES: [ThermalFamily; 8] = [
    ThermalFamily {
        name: "grph",
        aliases: &["c-graphite", "graph"],
        description: "graphite",
        elements: &[6],
        temperatures: &[296.0, 400.0, 500.0, 600.0, 700.0, 800.0, 1000.0, 1200.0, 1600.0, 2000.0],
    },
    ThermalFamily {
        name: "lwtr",
        aliases: &["h-h2o"],
        description: "hydrogen in light water",
        elements: &[1],
        temperatures: &[293.6, 350.0, 400.0, 450.0, 500.0, 550.0, 600.0, 650.0, 800.0],
    },
    ThermalFamily {
        name: "hwtr",
        aliases: &["d-d2o"],
        description: "deuterium in heavy water",
        elements: &[1],
        temperatures: &[293.6, 350.0, 400.0, 450.0, 500.0, 550.0, 600.0, 650.0],
    },
    ThermalFamily {
        name: "poly",
        aliases: &["h-poly"],
        description: "hydrogen in polyethylene",
        elements: &[1],
        temperatures: &[293.6],
    },
    ThermalFamily {
        name: "be",
        aliases: &["be-met"],
        description: "beryllium metal",
        elements: &[4],
        temperatures: &[296.0, 400.0, 500.0, 600.0, 700.0, 800.0, 1000.0, 1200.0],
    },
    ThermalFamily {
        name: "beo",
        aliases: &["be-beo", "o-beo"],
        description: "beryllium oxide",
        elements: &[4, 8],
        temperatures: &[296.0, 400.0, 500.0, 600.0, 700.0, 800.0, 1000.0, 1200.0],
    },
    ThermalFamily {
        name: "zrh",
        aliases: &["h-zrh", "zr-zrh"],
        description: "zirconium hydride",
        elements: &[1, 40],
        temperatures: &[296.0, 400.0, 500.0, 600.0, 700.0, 800.0, 1000.0, 1200.0],
    },
    ThermalFamily {
        name: "benz",
        aliases: &["h-benz", "c-benz"],
        description: "benzene",
        elements: &[1, 6],
        temperatures: &[296.0, 350.0, 400.0, 450.0, 500.0, 600.0, 800.0, 1000.0],
    },
];

#[cfg(test)]
mod thermal_tests {
    use super::*;

    fn family(name: &str) -> &'static ThermalFamily {
        THERMAL_FAMILIES.iter().find(|f| f.matches(name)).unwrap()
    }

    #[test]
    fn aliases_match() {
        assert_eq!(family("H-H2O").name, "lwtr");
        assert_eq!(family("c-graphite").name, "grph");
    }

    #[test]
    fn temperature_index_is_last_digit() {
        let lwtr = family("lwtr");
        assert_eq!(lwtr.temperature("20t"), Some(293.6));
        assert_eq!(lwtr.temperature(".24t"), Some(500.0));
        assert_eq!(lwtr.temperature("2"), None);
        assert_eq!(lwtr.temperature("29t"), None);
    }

    #[test]
    fn brackets() {
        let lwtr = family("lwtr");
        let (lo, hi) = lwtr.bracket("21t").unwrap();
        assert!((lo - 321.8).abs() < 1e-9);
        assert!((hi - 375.0).abs() < 1e-9);

        let (lo, hi) = family("poly").bracket("20t").unwrap();
        assert!((lo - 264.24).abs() < 1e-9);
        assert!((hi - 322.96).abs() < 1e-9);
    }

    #[test]
    fn kelvin() {
        assert!((mev_to_kelvin(2.53e-8) - 293.6).abs() < 0.1);
    }
}
