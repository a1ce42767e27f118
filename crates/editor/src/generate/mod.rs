//! Card generators
//!
//! Each generator checks its inputs and returns a [Fragment] of wrapped card
//! lines, ready for [Document::insert_fragment](crate::Document::insert_fragment).

mod geometry;
mod lattice;
mod mesh;
mod transform;
mod weights;

pub use geometry::{Concentric, Shape};
pub use lattice::{HexOrientation, HexagonalLattice, RectangularLattice};
pub use mesh::{Axis, FMesh, Geometry};
pub use transform::transform_card;
pub use weights::{SuperimposedMesh, WeightWindowRequest};

use idate_deck::{wrap_words, Diagnostic, Particle};

use crate::error::{Error, Result};

/// Generated cards, grouped by the block they belong in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub cells: Vec<String>,
    pub surfaces: Vec<String>,
    pub data: Vec<String>,
    /// Notes about adjustments made to the input
    pub diagnostics: Vec<Diagnostic>,
}

impl Fragment {
    /// All lines, blocks separated by a blank line
    pub fn render(&self) -> String {
        [&self.cells, &self.surfaces, &self.data]
            .into_iter()
            .filter(|b| !b.is_empty())
            .map(|b| b.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.surfaces.is_empty() && self.data.is_empty()
    }
}

/// Append a card made of words, wrapped to `width`
pub(crate) fn push_card<S: AsRef<str>>(lines: &mut Vec<String>, words: &[S], width: usize) {
    lines.extend(wrap_words(words, width));
}

/// `imp:n,p=1` style word, neutrons when no particles are given
pub(crate) fn importance_word(particles: &[Particle], value: u32) -> String {
    match particles {
        [] => format!("imp:n={value}"),
        _ => format!("imp:{}={value}", Particle::designator(particles)),
    }
}

/// Strictly increasing, all finite
pub(crate) fn check_increasing(name: &str, values: &[f64]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidArgument(format!("{name} must be finite")));
    }
    if values.windows(2).any(|w| w[1] <= w[0]) {
        return Err(Error::InvalidArgument(format!("{name} must be strictly increasing")));
    }
    Ok(())
}

/// Positive and finite
pub(crate) fn check_positive(name: &str, value: f64) -> Result<()> {
    match value.is_finite() && value > 0.0 {
        true => Ok(()),
        false => Err(Error::InvalidArgument(format!("{name} must be positive, got {value}"))),
    }
}

#[cfg(test)]
mod generate_tests {
    use super::*;

    #[test]
    fn render_skips_empty_blocks() {
        let fragment = Fragment {
            cells: vec!["1 0 -1".into()],
            data: vec!["wwg 4 1 0".into()],
            ..Default::default()
        };
        assert_eq!(fragment.render(), "1 0 -1\n\nwwg 4 1 0");
    }

    #[test]
    fn increasing() {
        assert!(check_increasing("radii", &[1.0, 2.0]).is_ok());
        assert!(check_increasing("radii", &[1.0, 1.0]).is_err());
        assert!(check_increasing("radii", &[1.0, f64::NAN]).is_err());
        assert_eq!(importance_word(&[], 1), "imp:n=1");
    }
}
