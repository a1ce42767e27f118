use idate_deck::{Card, CellCard, Code, Diagnostic, FillSpec, ParseError, Pass, Severity, SurfaceKind};
use serde_json::json;

use crate::check::Check;
use crate::context::Context;

/// Lattice cell shape and fill array arithmetic
///
/// Undefined fill universes are left to the cross-reference pass.
pub struct LatticeCheck;

impl Check for LatticeCheck {
    fn pass(&self) -> Pass {
        Pass::Lattice
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        ctx.deck
            .cells()
            .filter(|(_, c)| c.is_lattice())
            .flat_map(|(card, cell)| self.lattice(ctx, card, cell))
            .collect()
    }
}

impl LatticeCheck {
    fn lattice(&self, ctx: &Context, card: &Card, cell: &CellCard) -> Vec<Diagnostic> {
        let mut found = Vec::new();
        let error = |code: Code, message: String| {
            Diagnostic::new(Severity::Error, Pass::Lattice, code, message).at(card.span)
        };

        let lat = cell.params.lat.unwrap_or_default();
        if !matches!(lat, 1 | 2) {
            found.push(error(
                Code::InvalidLatticeType,
                format!("cell {} has lat={lat}, expected 1 or 2", cell.id),
            ));
        }

        let material = ctx.deck.cell_material(cell.id);
        if material != 0 {
            found.push(error(
                Code::LatticeWithMaterial,
                format!("lattice cell {} must be void, found material {material}", cell.id),
            ));
        }

        if cell.universe() == 0 {
            found.push(error(
                Code::LatticeWithoutUniverse,
                format!("lattice cell {} is not assigned a universe with u=", cell.id),
            ));
        }

        match cell.params.fill.as_ref().map(|f| &f.spec) {
            None => found.push(error(
                Code::LatticeWithoutFill,
                format!("lattice cell {} has no fill", cell.id),
            )),
            Some(FillSpec::Array(array)) => {
                if let Err(ParseError::FillArrayLengthMismatch { required, provided }) = array.check() {
                    found.push(
                        error(
                            Code::FillArrayLengthMismatch,
                            format!(
                                "cell {} fill {} needs {required} entries, found {provided} (delta {:+})",
                                cell.id,
                                array.declaration(),
                                array.delta()
                            ),
                        )
                        .with_data(json!({
                            "declaration": array.declaration(),
                            "required": required,
                            "provided": provided,
                            "delta": array.delta(),
                        })),
                    )
                }
            }
            Some(FillSpec::Single { .. }) => (),
        }

        if let Some(d) = surface_recommendation(ctx, cell, lat) {
            found.push(d.at(card.span));
        }

        found
    }
}

/// Bounding surfaces expected for the lattice element shape
fn surface_recommendation(ctx: &Context, cell: &CellCard, lat: i64) -> Option<Diagnostic> {
    let (needed, bodies, shape) = match lat {
        1 => (6, [SurfaceKind::Rpp, SurfaceKind::Box], "hexahedral"),
        2 => (8, [SurfaceKind::Rhp, SurfaceKind::Hex], "hexagonal prism"),
        _ => return None,
    };

    let surfaces = cell.surfaces();
    let has_body = surfaces
        .iter()
        .filter_map(|id| ctx.deck.surface(*id))
        .any(|s| bodies.contains(&s.kind));

    (!has_body && surfaces.len() < needed).then(|| {
        Diagnostic::new(
            Severity::Recommendation,
            Pass::Lattice,
            Code::LatticeSurfaceCount,
            format!(
                "lattice cell {} uses {} surfaces, a {shape} element normally needs {needed} or a {} macrobody",
                cell.id,
                surfaces.len(),
                bodies[0].mnemonic()
            ),
        )
    })
}

#[cfg(test)]
mod lattice_tests {
    use super::*;
    use crate::passes::run_check;
    use crate::ValidatorConfig;

    fn deck(lattice: &str) -> String {
        format!("t\n1 0 -2 fill=10\n2 0 2\n{lattice}\n5 0 -1 u=1\n\n1 so 1\n2 so 10\n50 rpp -1 1 -1 1 -1 1\n\nmode n\n")
    }

    #[test]
    fn short_fill_array() {
        let text = deck("100 0 -50 lat=1 u=10 fill=-1:1 -1:1 0:0 1 1 1 1 1 1 1 1");
        let found = run_check(&LatticeCheck, &text, &ValidatorConfig::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, Code::FillArrayLengthMismatch);
        let data = found[0].data.as_ref().unwrap();
        assert_eq!(data["required"], 9);
        assert_eq!(data["provided"], 8);
        assert_eq!(data["delta"], -1);
    }

    #[test]
    fn run_length_fill_passes() {
        let text = deck("100 0 -50 lat=1 u=10 fill=0:2 0:0 0:0 1 2R");
        assert!(run_check(&LatticeCheck, &text, &ValidatorConfig::default()).is_empty());
    }

    #[test]
    fn bad_lattice_cell() {
        let text = deck("100 3 -1.0 -1 lat=3 fill=1");
        let codes: Vec<_> = run_check(&LatticeCheck, &text, &ValidatorConfig::default())
            .into_iter()
            .map(|d| d.code)
            .collect();
        assert_eq!(
            codes,
            vec![Code::InvalidLatticeType, Code::LatticeWithMaterial, Code::LatticeWithoutUniverse]
        );
    }

    #[test]
    fn hex_lattice_wants_eight_faces() {
        let text = deck("100 0 -1 lat=2 u=10 fill=1");
        let found = run_check(&LatticeCheck, &text, &ValidatorConfig::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Recommendation);
        assert!(found[0].message.contains("rhp"));
    }
}
