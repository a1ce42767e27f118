use idate_deck::{Code, Diagnostic, Pass, Severity};
use serde_json::json;

use crate::check::Check;
use crate::context::Context;

/// Every reference must name something the deck defines
pub struct CrossReferenceCheck;

impl Check for CrossReferenceCheck {
    fn pass(&self) -> Pass {
        Pass::CrossReference
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        ctx.graph
            .undefined(&ctx.symbols)
            .map(|e| {
                Diagnostic::new(
                    Severity::Error,
                    self.pass(),
                    Code::UndefinedReference,
                    format!("{} references undefined {} ({})", e.from, e.to, e.kind.describe()),
                )
                .at(e.span)
                .with_data(json!({
                    "from": e.from,
                    "target": e.to,
                    "kind": e.kind,
                }))
            })
            .collect()
    }
}

#[cfg(test)]
mod xref_tests {
    use super::*;
    use crate::passes::run_check;
    use crate::ValidatorConfig;
    use idate_deck::Span;

    #[test]
    fn undefined_surface_at_cell_line() {
        let text = "S\n1 0 -1 -2 imp:n=1\n\n1 so 5.0\n\nmode n\n";
        let found = run_check(&CrossReferenceCheck, text, &ValidatorConfig::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, Some(Span::line(2)));
        assert_eq!(found[0].message, "cell 1 references undefined surface 2 (geometry)");
    }

    #[test]
    fn fill_of_empty_universe() {
        let text = "t\n1 0 -1 fill=7\n2 0 1\n\n1 so 1\n\nmode n\n";
        let found = run_check(&CrossReferenceCheck, text, &ValidatorConfig::default());
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("universe 7"));
    }
}
