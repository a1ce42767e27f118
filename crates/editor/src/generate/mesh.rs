use idate_deck::{CardNumber, Particle};
use serde::{Deserialize, Serialize};

use super::{check_increasing, push_card, Fragment};
use crate::config::EditorConfig;
use crate::error::{Error, Result};

/// Mesh coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Geometry {
    /// Cartesian (rec, xyz) mesh type
    Rectangular,
    /// Cylindrical (cyl, rzt) mesh type
    Cylindrical,
}

impl Geometry {
    /// Value of the `GEOM=` keyword
    pub fn keyword(&self) -> &'static str {
        match self {
            Geometry::Rectangular => "xyz",
            Geometry::Cylindrical => "cyl",
        }
    }
}

/// Coarse bounds of one mesh axis and the fine bins in each
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Upper bound of each coarse bin, the origin being the first lower
    /// bound
    pub bounds: Vec<f64>,
    /// Fine bins per coarse bin
    pub intervals: Vec<u32>,
}

impl Axis {
    /// Single coarse bin split evenly
    pub fn uniform(upper: f64, bins: u32) -> Self {
        Self {
            bounds: vec![upper],
            intervals: vec![bins],
        }
    }

    pub(crate) fn check(&self, name: &str, lower: f64) -> Result<()> {
        if self.bounds.is_empty() || self.bounds.len() != self.intervals.len() {
            return Err(Error::InvalidArgument(format!(
                "{name} has {} bounds and {} interval counts",
                self.bounds.len(),
                self.intervals.len()
            )));
        }
        if self.intervals.contains(&0) {
            return Err(Error::InvalidArgument(format!("{name} interval counts must be at least 1")));
        }
        check_increasing(name, &self.bounds)?;
        if self.bounds[0] <= lower {
            return Err(Error::InvalidArgument(format!(
                "{name} first bound {} is not beyond {lower}",
                self.bounds[0]
            )));
        }
        Ok(())
    }

    /// `imesh=… iints=…` style words
    pub(crate) fn words(&self, axis: char) -> Vec<String> {
        let join = |v: Vec<String>| v.join(" ");
        vec![
            format!("{axis}mesh={}", join(self.bounds.iter().map(|b| b.card_number()).collect())),
            format!("{axis}ints={}", join(self.intervals.iter().map(|i| i.to_string()).collect())),
        ]
    }
}

/// `FMESH` mesh tally
///
/// ```rust
/// # use idate_editor::{Axis, EditorConfig, FMesh, Geometry};
/// # use idate_deck::Particle;
/// let mesh = FMesh {
///     number: 14,
///     particle: Particle::Neutron,
///     geometry: Geometry::Rectangular,
///     origin: [-10.0, -10.0, -10.0],
///     axes: [Axis::uniform(10.0, 20), Axis::uniform(10.0, 20), Axis::uniform(10.0, 1)],
///     energies: None,
/// };
/// let fragment = mesh.generate(&EditorConfig::default()).unwrap();
/// assert_eq!(fragment.data[0], "fmesh14:n geom=xyz origin=-10 -10 -10 imesh=10 iints=20 jmesh=10 jints=20");
/// assert_eq!(fragment.data[1], "     kmesh=10 kints=1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FMesh {
    /// Must end in 4
    pub number: u32,
    pub particle: Particle,
    pub geometry: Geometry,
    pub origin: [f64; 3],
    /// x y z, or r z θ with θ in revolutions
    pub axes: [Axis; 3],
    /// Upper energy bounds in MeV, a single total bin when `None`
    pub energies: Option<Vec<f64>>,
}

impl FMesh {
    pub fn generate(&self, config: &EditorConfig) -> Result<Fragment> {
        if self.number % 10 != 4 {
            return Err(Error::InvalidArgument(format!(
                "mesh tally number {} must end in 4",
                self.number
            )));
        }
        if self.origin.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidArgument("mesh origin must be finite".to_string()));
        }
        check_axes(self.geometry, &self.origin, &self.axes)?;

        let mut words = vec![
            format!("fmesh{}:{}", self.number, self.particle.symbol()),
            format!("geom={}", self.geometry.keyword()),
        ];
        words.extend(placement(self.geometry, &self.origin, &self.axes));

        if let Some(energies) = &self.energies {
            if energies.is_empty() || energies[0] <= 0.0 {
                return Err(Error::InvalidArgument("energy bounds must be positive".to_string()));
            }
            check_increasing("energy bounds", energies)?;
            let bounds: Vec<String> = energies.iter().map(|e| e.card_number()).collect();
            words.push(format!("emesh={}", bounds.join(" ")));
            words.push(format!("eints={}", vec!["1"; energies.len()].join(" ")));
        }

        let mut fragment = Fragment::default();
        push_card(&mut fragment.data, &words, config.wrap_width);
        Ok(fragment)
    }
}

/// Bounds checks shared with superimposed meshes
pub(crate) fn check_axes(geometry: Geometry, origin: &[f64; 3], axes: &[Axis; 3]) -> Result<()> {
    let names = ["first axis", "second axis", "third axis"];
    for (k, axis) in axes.iter().enumerate() {
        // cylindrical bounds are measured from the origin
        let lower = match geometry {
            Geometry::Rectangular => origin[k],
            Geometry::Cylindrical => 0.0,
        };
        axis.check(names[k], lower)?;
    }
    if geometry == Geometry::Cylindrical
        && axes[2].bounds.last().is_some_and(|t| (t - 1.0).abs() > 1e-9)
    {
        return Err(Error::InvalidArgument("angular bounds must end at 1 revolution".to_string()));
    }
    Ok(())
}

/// Origin, axis orientation, and bin words
pub(crate) fn placement(geometry: Geometry, origin: &[f64; 3], axes: &[Axis; 3]) -> Vec<String> {
    let mut words = vec![format!(
        "origin={}",
        origin.iter().map(|v| v.card_number()).collect::<Vec<_>>().join(" ")
    )];
    if geometry == Geometry::Cylindrical {
        words.push("axs=0 0 1".to_string());
        words.push("vec=1 0 0".to_string());
    }
    for (axis, name) in axes.iter().zip(['i', 'j', 'k']) {
        words.extend(axis.words(name));
    }
    words
}

#[cfg(test)]
mod mesh_tests {
    use super::*;

    fn mesh() -> FMesh {
        FMesh {
            number: 24,
            particle: Particle::Photon,
            geometry: Geometry::Cylindrical,
            origin: [0.0, 0.0, -50.0],
            axes: [
                Axis { bounds: vec![10.0, 50.0], intervals: vec![10, 8] },
                Axis::uniform(50.0, 10),
                Axis::uniform(1.0, 1),
            ],
            energies: Some(vec![0.1, 1.0, 20.0]),
        }
    }

    #[test]
    fn cylindrical_words() {
        let fragment = mesh().generate(&EditorConfig::default()).unwrap();
        let text = fragment.data.iter().flat_map(|l| l.split_whitespace()).collect::<Vec<_>>().join(" ");
        assert!(text.starts_with("fmesh24:p geom=cyl origin=0 0 -50 axs=0 0 1 vec=1 0 0"));
        assert!(text.contains("imesh=10 50 iints=10 8"));
        assert!(text.contains("emesh=0.1 1 20 eints=1 1 1"));
        assert!(fragment.data.iter().all(|l| l.len() <= 80));
    }

    #[test]
    fn number_must_end_in_four() {
        let mut bad = mesh();
        bad.number = 25;
        assert!(bad.generate(&EditorConfig::default()).is_err());
    }

    #[test]
    fn bounds_and_intervals_pair_up() {
        let mut bad = mesh();
        bad.axes[0].intervals.pop();
        assert!(bad.generate(&EditorConfig::default()).is_err());

        let mut open = mesh();
        open.axes[2] = Axis::uniform(0.5, 1);
        assert!(open.generate(&EditorConfig::default()).is_err());
    }
}
