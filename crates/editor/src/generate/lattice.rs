use std::collections::BTreeMap;

use idate_deck::{compact_repeats, CardNumber, Particle};
use serde::{Deserialize, Serialize};

use super::{check_positive, importance_word, push_card, Fragment};
use crate::config::EditorConfig;
use crate::error::{Error, Result};

/// Square lattice, `LAT=1`, filled element by element
///
/// The element at index `(0, 0, 0)` is centred on the origin and indices run
/// `0:n-1` on each axis. Universes are listed with `i` varying fastest.
///
/// ```rust
/// # use idate_editor::{EditorConfig, RectangularLattice};
/// let lattice = RectangularLattice {
///     cell: 100,
///     universe: 10,
///     surface: 50,
///     pitch: [2.0, 2.0, 10.0],
///     dims: [3, 1, 1],
///     universes: vec![7, 7, 7],
///     particles: vec![],
/// };
/// let fragment = lattice.generate(&EditorConfig::default()).unwrap();
/// assert_eq!(fragment.surfaces, vec!["50 rpp -1 1 -1 1 -5 5"]);
/// assert_eq!(fragment.cells, vec!["100 0 -50 lat=1 u=10 imp:n=1 fill=0:2 0:0 0:0 7 2r"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangularLattice {
    pub cell: u32,
    /// Universe the lattice cell belongs to
    pub universe: u32,
    /// Number of the `RPP` element surface
    pub surface: u32,
    pub pitch: [f64; 3],
    pub dims: [usize; 3],
    pub universes: Vec<u32>,
    pub particles: Vec<Particle>,
}

impl RectangularLattice {
    pub fn generate(&self, config: &EditorConfig) -> Result<Fragment> {
        for (p, axis) in self.pitch.iter().zip(["x", "y", "z"]) {
            check_positive(&format!("{axis} pitch"), *p)?;
        }
        if self.dims.contains(&0) {
            return Err(Error::InvalidArgument("lattice dimensions must be at least 1".to_string()));
        }
        let needed: usize = self.dims.iter().product();
        if self.universes.len() != needed {
            return Err(Error::InvalidArgument(format!(
                "fill array has {} entries, {}x{}x{} lattice needs {needed}",
                self.universes.len(),
                self.dims[0],
                self.dims[1],
                self.dims[2]
            )));
        }

        let mut fragment = Fragment::default();
        let mut surface = vec![self.surface.to_string(), "rpp".to_string()];
        for p in self.pitch {
            surface.push((-p / 2.0).card_number());
            surface.push((p / 2.0).card_number());
        }
        push_card(&mut fragment.surfaces, &surface, config.wrap_width);

        let mut words = vec![
            self.cell.to_string(),
            "0".to_string(),
            format!("-{}", self.surface),
            "lat=1".to_string(),
            format!("u={}", self.universe),
            importance_word(&self.particles, 1),
        ];
        let ranges: Vec<String> = self.dims.iter().map(|n| format!("0:{}", n - 1)).collect();
        words.push(format!("fill={}", ranges.join(" ")));
        words.extend(compact_repeats(&self.universes));
        push_card(&mut fragment.cells, &words, config.wrap_width);
        Ok(fragment)
    }
}

/// Which way the flat sides of the hexagonal elements face
///
/// There is no default, as the two give different lattices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HexOrientation {
    /// Flat sides at top and bottom, facing ±y
    FlatTop,
    /// Flat sides facing ±x
    PointyTop,
}

/// Hexagonal prism lattice, `LAT=2`
///
/// Elements are addressed `(i, j)` on the two lattice axes, with `rings`
/// rings around the centre element. Positions inside the hexagon take their
/// universe from `universes`, or `background` when absent. The corners of the
/// `i, j` rectangle outside the hexagon are always `background`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexagonalLattice {
    pub cell: u32,
    pub universe: u32,
    /// Number of the `RHP` element surface
    pub surface: u32,
    /// Flat to flat distance of one element
    pub pitch: f64,
    pub height: f64,
    pub rings: u32,
    pub orientation: HexOrientation,
    pub universes: BTreeMap<(i64, i64), u32>,
    pub background: u32,
    pub particles: Vec<Particle>,
}

impl HexagonalLattice {
    pub fn generate(&self, config: &EditorConfig) -> Result<Fragment> {
        check_positive("pitch", self.pitch)?;
        check_positive("height", self.height)?;
        let r = i64::from(self.rings);
        if let Some((i, j)) = self.universes.keys().find(|(i, j)| !inside(*i, *j, r)) {
            return Err(Error::InvalidArgument(format!(
                "element ({i}, {j}) is outside a lattice of {r} rings"
            )));
        }

        let half = self.pitch / 2.0;
        let [hx, hy] = match self.orientation {
            HexOrientation::FlatTop => [0.0, half],
            HexOrientation::PointyTop => [half, 0.0],
        };

        let mut fragment = Fragment::default();
        let surface = [
            self.surface.to_string(),
            "rhp".to_string(),
            "0".to_string(),
            "0".to_string(),
            (-self.height / 2.0).card_number(),
            "0".to_string(),
            "0".to_string(),
            self.height.card_number(),
            hx.card_number(),
            hy.card_number(),
            "0".to_string(),
        ];
        push_card(&mut fragment.surfaces, &surface, config.wrap_width);

        let mut fill = Vec::new();
        for j in -r..=r {
            for i in -r..=r {
                let u = match inside(i, j, r) {
                    true => self.universes.get(&(i, j)).copied().unwrap_or(self.background),
                    false => self.background,
                };
                fill.push(u);
            }
        }

        let mut words = vec![
            self.cell.to_string(),
            "0".to_string(),
            format!("-{}", self.surface),
            "lat=2".to_string(),
            format!("u={}", self.universe),
            importance_word(&self.particles, 1),
            format!("fill={}:{r} {}:{r} 0:0", -r, -r),
        ];
        words.extend(compact_repeats(&fill));
        push_card(&mut fragment.cells, &words, config.wrap_width);
        Ok(fragment)
    }
}

/// Element within `r` rings of the centre on a hexagonal grid
fn inside(i: i64, j: i64, r: i64) -> bool {
    i.abs() <= r && j.abs() <= r && (i + j).abs() <= r
}

#[cfg(test)]
mod lattice_tests {
    use super::*;

    fn hex(orientation: HexOrientation) -> HexagonalLattice {
        HexagonalLattice {
            cell: 5,
            universe: 2,
            surface: 9,
            pitch: 1.2,
            height: 100.0,
            rings: 1,
            orientation,
            universes: BTreeMap::from([((0, 0), 3)]),
            background: 4,
            particles: vec![],
        }
    }

    #[test]
    fn one_ring() {
        let fragment = hex(HexOrientation::PointyTop).generate(&EditorConfig::default()).unwrap();
        assert_eq!(fragment.surfaces, vec!["9 rhp 0 0 -50 0 0 100 0.6 0 0"]);
        assert_eq!(
            fragment.cells,
            vec!["5 0 -9 lat=2 u=2 imp:n=1 fill=-1:1 -1:1 0:0 4 3r 3 4 3r"]
        );
    }

    #[test]
    fn orientation_sets_vector() {
        let fragment = hex(HexOrientation::FlatTop).generate(&EditorConfig::default()).unwrap();
        assert_eq!(fragment.surfaces, vec!["9 rhp 0 0 -50 0 0 100 0 0.6 0"]);
    }

    #[test]
    fn rejects_outside_element() {
        let mut lattice = hex(HexOrientation::FlatTop);
        lattice.universes.insert((1, 1), 3);
        assert!(lattice.generate(&EditorConfig::default()).is_err());
    }

    #[test]
    fn rectangular_array_must_fill() {
        let lattice = RectangularLattice {
            cell: 1,
            universe: 1,
            surface: 1,
            pitch: [1.0; 3],
            dims: [2, 2, 1],
            universes: vec![1, 2, 3],
            particles: vec![],
        };
        assert!(lattice.generate(&EditorConfig::default()).is_err());
    }
}
