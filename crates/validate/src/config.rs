use std::path::Path;

use idate_catalogue::{default_preference, MaterialClassifier, ProblemClass};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunable thresholds for the validation passes
///
/// Every field has a default, so a JSON file only needs the values it
/// changes.
///
/// ```rust
/// # use idate_validate::ValidatorConfig;
/// let config: ValidatorConfig = serde_json::from_str(r#"{"max_importance_ratio": 2.0}"#).unwrap();
/// assert_eq!(config.max_importance_ratio, 2.0);
/// assert_eq!(config.depth_warning, 10);
/// assert!(config.problem_class.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Skip the remaining passes once anything fatal is found
    pub stop_on_fatal: bool,
    /// Largest importance ratio allowed across a shared surface
    pub max_importance_ratio: f64,
    /// Universe nesting deeper than this is noted
    pub depth_info: usize,
    /// Universe nesting deeper than this is a warning
    pub depth_warning: usize,
    /// Stop enumerating universe cycles after this many
    pub cycle_limit: usize,
    /// Allowed deviation of R Rᵀ from identity and det(R) from 1
    pub rotation_tolerance: f64,
    /// Distance in cm within which a DXTRAN sphere matches a detector
    pub dxtran_tolerance: f64,
    /// Suggested emax is at least this multiple of the source energy
    pub emax_factor: f64,
    /// Suggested emax is at least this far above the source energy, in MeV
    pub emax_margin: f64,
    /// Source energies above this fraction of emax give a warning
    pub emax_warning_fraction: f64,
    /// Opt-in energy templates
    pub problem_class: Option<ProblemClass>,
    /// Library suffixes to standardise on, most preferred first
    pub library_preference: Vec<String>,
    /// Site convention for material numbers, empty to disable
    pub classifier: MaterialClassifier,
    /// Relative tolerance on the 2:1 hydrogen to oxygen ratio of water
    pub thermal_ratio_tolerance: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            stop_on_fatal: false,
            max_importance_ratio: 4.0,
            depth_info: 6,
            depth_warning: 10,
            cycle_limit: 100,
            rotation_tolerance: 1e-6,
            dxtran_tolerance: 1e-3,
            emax_factor: 1.1,
            emax_margin: 1.0,
            emax_warning_fraction: 0.9,
            problem_class: None,
            library_preference: default_preference(),
            classifier: MaterialClassifier::default(),
            thermal_ratio_tolerance: 0.25,
        }
    }
}

impl ValidatorConfig {
    /// Read a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::io::BufReader::new(std::fs::File::open(path)?);
        let config: Self = serde_json::from_reader(file)?;
        config.check()?;
        debug!("Loaded validator configuration");
        Ok(config)
    }

    /// Reject thresholds no deck could satisfy
    pub fn check(&self) -> Result<()> {
        if self.max_importance_ratio <= 1.0 {
            return Err(Error::InvalidConfig(format!(
                "max_importance_ratio must exceed 1, found {}",
                self.max_importance_ratio
            )));
        }
        if self.depth_warning < self.depth_info {
            return Err(Error::InvalidConfig(
                "depth_warning must not be below depth_info".into(),
            ));
        }
        if self.emax_factor < 1.0 || !(0.0..=1.0).contains(&self.emax_warning_fraction) {
            return Err(Error::InvalidConfig(
                "emax_factor must be at least 1 and emax_warning_fraction within 0-1".into(),
            ));
        }
        Ok(())
    }
}
