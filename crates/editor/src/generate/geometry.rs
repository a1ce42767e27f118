use idate_deck::{CardNumber, Particle};
use serde::{Deserialize, Serialize};

use super::{check_increasing, check_positive, importance_word, push_card, Fragment};
use crate::config::EditorConfig;
use crate::error::{Error, Result};

/// Surface family for nested shells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Spheres about the origin, `SO`
    Sphere,
    /// Infinite cylinders on the x axis, `CX`
    CylinderX,
    /// Infinite cylinders on the y axis, `CY`
    CylinderY,
    /// Infinite cylinders on the z axis, `CZ`
    CylinderZ,
}

impl Shape {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Shape::Sphere => "so",
            Shape::CylinderX => "cx",
            Shape::CylinderY => "cy",
            Shape::CylinderZ => "cz",
        }
    }
}

/// Nested shells, one cell per layer, closed by a graveyard
///
/// ```rust
/// # use idate_editor::{Concentric, EditorConfig, Shape};
/// let shells = Concentric {
///     shape: Shape::Sphere,
///     radii: vec![5.0, 10.0],
///     materials: vec![1, 0],
///     densities: vec![-7.8, 0.0],
///     first_cell: 10,
///     first_surface: 20,
///     particles: vec![],
/// };
/// let fragment = shells.generate(&EditorConfig::default()).unwrap();
/// assert_eq!(fragment.cells, vec!["10 1 -7.8 -20 imp:n=1", "11 0 20 -21 imp:n=1", "12 0 21 imp:n=0"]);
/// assert_eq!(fragment.surfaces, vec!["20 so 5", "21 so 10"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concentric {
    pub shape: Shape,
    /// Outer radius of each layer, innermost first
    pub radii: Vec<f64>,
    /// Material of each layer, 0 for void
    pub materials: Vec<u32>,
    /// Density of each layer, ignored for void layers
    pub densities: Vec<f64>,
    pub first_cell: u32,
    pub first_surface: u32,
    /// Particles given importances, neutrons when empty
    pub particles: Vec<Particle>,
}

impl Concentric {
    pub fn generate(&self, config: &EditorConfig) -> Result<Fragment> {
        let n = self.radii.len();
        if n == 0 {
            return Err(Error::InvalidArgument("at least one radius is needed".to_string()));
        }
        if self.materials.len() != n || self.densities.len() != n {
            return Err(Error::InvalidArgument(format!(
                "{n} radii need {n} materials and densities, got {} and {}",
                self.materials.len(),
                self.densities.len()
            )));
        }
        check_increasing("radii", &self.radii)?;
        check_positive("innermost radius", self.radii[0])?;
        for (m, rho) in self.materials.iter().zip(&self.densities) {
            if *m != 0 && (*rho == 0.0 || !rho.is_finite()) {
                return Err(Error::InvalidArgument(format!("material {m} needs a non-zero density")));
            }
        }

        let mut fragment = Fragment::default();
        let width = config.wrap_width;
        let inside = importance_word(&self.particles, 1);

        for (i, radius) in self.radii.iter().enumerate() {
            let surface = self.first_surface + i as u32;
            push_card(
                &mut fragment.surfaces,
                &[surface.to_string(), self.shape.mnemonic().to_string(), radius.card_number()],
                width,
            );

            let mut words = vec![(self.first_cell + i as u32).to_string(), self.materials[i].to_string()];
            if self.materials[i] != 0 {
                words.push(self.densities[i].card_number());
            }
            if i > 0 {
                words.push((surface - 1).to_string());
            }
            words.push(format!("-{surface}"));
            words.push(inside.clone());
            push_card(&mut fragment.cells, &words, width);
        }

        let graveyard = [
            (self.first_cell + n as u32).to_string(),
            "0".to_string(),
            (self.first_surface + n as u32 - 1).to_string(),
            importance_word(&self.particles, 0),
        ];
        push_card(&mut fragment.cells, &graveyard, width);
        Ok(fragment)
    }
}

#[cfg(test)]
mod geometry_tests {
    use super::*;

    fn shells() -> Concentric {
        Concentric {
            shape: Shape::CylinderZ,
            radii: vec![1.0, 2.5],
            materials: vec![1, 2],
            densities: vec![-10.4, 0.1],
            first_cell: 1,
            first_surface: 1,
            particles: vec![Particle::Neutron, Particle::Photon],
        }
    }

    #[test]
    fn cylinders_with_photons() {
        let fragment = shells().generate(&EditorConfig::default()).unwrap();
        assert_eq!(fragment.surfaces, vec!["1 cz 1", "2 cz 2.5"]);
        assert_eq!(fragment.cells[1], "2 2 0.1 1 -2 imp:n,p=1");
        assert_eq!(fragment.cells[2], "3 0 2 imp:n,p=0");
    }

    #[test]
    fn rejects_bad_layers() {
        let config = EditorConfig::default();
        let mut decreasing = shells();
        decreasing.radii = vec![2.0, 1.0];
        assert!(decreasing.generate(&config).is_err());

        let mut short = shells();
        short.densities.pop();
        assert!(short.generate(&config).is_err());

        let mut weightless = shells();
        weightless.densities[0] = 0.0;
        assert!(weightless.generate(&config).is_err());
    }
}
