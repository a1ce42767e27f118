use idate_deck::rotation::{orthonormalise, RotationCheck};
use idate_deck::{Code, Diagnostic, Pass, Severity, Span, TransformCard, Trcl};
use itertools::Itertools;
use serde_json::json;

use crate::check::Check;
use crate::context::Context;

/// Rotation matrices of transform cards and inline `trcl` values
pub struct TransformCheck;

impl Check for TransformCheck {
    fn pass(&self) -> Pass {
        Pass::Transform
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        let tolerance = ctx.config.rotation_tolerance;

        let numbered = ctx
            .deck
            .transforms()
            .map(|(card, tr)| (format!("transform {}", tr.id), tr, card.span));
        let inline = ctx.deck.cells().filter_map(|(card, cell)| match &cell.params.trcl {
            Some(Trcl::Inline(tr)) => Some((format!("trcl of cell {}", cell.id), tr, card.span)),
            _ => None,
        });

        numbered
            .chain(inline)
            .filter_map(|(name, tr, span)| check_rotation(&name, tr, span, tolerance))
            .collect()
    }
}

fn check_rotation(name: &str, tr: &TransformCard, span: Span, tolerance: f64) -> Option<Diagnostic> {
    let cosines = tr.cosines()?;
    let check = RotationCheck::of(&cosines);
    if check.is_valid(tolerance) {
        return None;
    }

    let fmt = |v: &[f64]| v.iter().map(|x| format!("{x:.6}")).join(" ");
    let mut d = Diagnostic::new(
        Severity::Error,
        Pass::Transform,
        Code::NonOrthonormalTransform,
        format!(
            "{name} is not a proper rotation: row norms [{}], row dots [{}], determinant {:.6}",
            fmt(&check.row_norms),
            fmt(&check.dots),
            check.determinant
        ),
    )
    .at(span)
    .with_data(json!({
        "row_norms": check.row_norms,
        "dots": check.dots,
        "determinant": check.determinant,
        "max_deviation": check.max_deviation,
    }));

    if let Some(fixed) = orthonormalise(&cosines) {
        d = d.with_hint(format!("orthonormalised cosines: {}", fmt(&fixed.cosines)));
    }
    Some(d)
}
