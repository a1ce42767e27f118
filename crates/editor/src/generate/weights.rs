use idate_deck::{CardNumber, Deck, Particle};
use idate_xref::EntityKind;
use log::debug;
use serde::{Deserialize, Serialize};

use super::mesh::{check_axes, placement, Axis, Geometry};
use super::{check_increasing, push_card, Fragment};
use crate::config::EditorConfig;
use crate::error::{Error, Result};
use crate::violation::Violation;

/// Mesh the generated windows are defined on, instead of the cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperimposedMesh {
    pub geometry: Geometry,
    pub origin: [f64; 3],
    /// Reference point, must lie inside the mesh
    pub reference: [f64; 3],
    pub axes: [Axis; 3],
}

/// Weight window generation driven by an existing tally
///
/// ```rust
/// # use idate_deck::Deck;
/// # use idate_editor::{EditorConfig, WeightWindowRequest};
/// let deck = Deck::parse("t\n1 0 -1 imp:n=1\n2 0 1 imp:n=0\n\n1 so 10\n\nf4:n 1\n").deck;
/// let request = WeightWindowRequest::new(4, 1);
/// let fragment = request.generate(&deck, &EditorConfig::default()).unwrap();
/// assert_eq!(fragment.data, vec!["wwg 4 1 0"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightWindowRequest {
    /// Tally the windows are optimised for
    pub tally: u32,
    /// Cell holding the reference point
    pub reference_cell: u32,
    /// Lower window bound in the reference cell, 0 to let the code choose
    pub lower_bound: f64,
    /// Upper energy bounds of the generated windows, a single group when
    /// empty
    pub energies: Vec<f64>,
    pub mesh: Option<SuperimposedMesh>,
}

impl WeightWindowRequest {
    pub fn new(tally: u32, reference_cell: u32) -> Self {
        Self {
            tally,
            reference_cell,
            lower_bound: 0.0,
            energies: Vec::new(),
            mesh: None,
        }
    }

    /// `WWG` card and its supporting cards for `deck`
    ///
    /// Refused if the tally or reference cell is missing, or the cell is a
    /// graveyard for the tallied particle.
    pub fn generate(&self, deck: &Deck, config: &EditorConfig) -> Result<Fragment> {
        let (_, tally) = deck
            .tallies()
            .find(|(_, t)| t.number == self.tally)
            .ok_or(Error::Refused(vec![Violation::UnknownEntity {
                kind: EntityKind::Tally,
                id: self.tally,
            }]))?;
        let particle = tally.particles.first().copied().unwrap_or(Particle::Neutron);

        let cell = deck.cell(self.reference_cell).ok_or(Error::Refused(vec![
            Violation::UnknownEntity {
                kind: EntityKind::Cell,
                id: self.reference_cell,
            },
        ]))?;
        if deck.is_graveyard(cell.id, particle) {
            return Err(Error::Refused(vec![Violation::GraveyardCell {
                cell: cell.id,
                particle,
            }]));
        }

        if !self.lower_bound.is_finite() || self.lower_bound < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "lower weight bound {} must not be negative",
                self.lower_bound
            )));
        }

        let width = config.wrap_width;
        let mut fragment = Fragment::default();
        let wwg = [
            "wwg".to_string(),
            self.tally.to_string(),
            self.reference_cell.to_string(),
            self.lower_bound.card_number(),
        ];
        push_card(&mut fragment.data, &wwg, width);

        if !self.energies.is_empty() {
            check_increasing("energy bounds", &self.energies)?;
            let mut words = vec![format!("wwge:{}", particle.symbol())];
            words.extend(self.energies.iter().map(|e| e.card_number()));
            push_card(&mut fragment.data, &words, width);
        }

        if let Some(mesh) = &self.mesh {
            check_axes(mesh.geometry, &mesh.origin, &mesh.axes)?;
            if mesh.geometry == Geometry::Rectangular && !contains(mesh) {
                return Err(Error::InvalidArgument(
                    "reference point is outside the superimposed mesh".to_string(),
                ));
            }
            let reference: Vec<String> = mesh.reference.iter().map(|v| v.card_number()).collect();
            let mut words = vec![
                "mesh".to_string(),
                format!("geom={}", mesh.geometry.keyword()),
                format!("ref={}", reference.join(" ")),
            ];
            words.extend(placement(mesh.geometry, &mesh.origin, &mesh.axes));
            push_card(&mut fragment.data, &words, width);
        }

        debug!(
            "Weight window generation for tally {} from cell {}",
            self.tally, self.reference_cell
        );
        Ok(fragment)
    }
}

fn contains(mesh: &SuperimposedMesh) -> bool {
    mesh.axes.iter().enumerate().all(|(k, axis)| {
        let upper = axis.bounds.last().copied().unwrap_or(mesh.origin[k]);
        (mesh.origin[k]..=upper).contains(&mesh.reference[k])
    })
}
