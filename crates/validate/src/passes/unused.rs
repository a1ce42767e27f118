use std::collections::BTreeSet;

use idate_deck::{Code, Diagnostic, Pass, Severity};
use idate_xref::{EdgeKind, EntityKind};

use crate::check::Check;
use crate::context::Context;

/// Surfaces, materials, and transforms that nothing uses
pub struct UnusedCheck;

impl Check for UnusedCheck {
    fn pass(&self) -> Pass {
        Pass::Unused
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        let mut found = Vec::new();

        for kind in [EntityKind::Surface, EntityKind::Material, EntityKind::Transform] {
            // an MT card does not make its material used
            let referenced: BTreeSet<u32> = ctx
                .graph
                .edges()
                .iter()
                .filter(|e| e.to.kind == kind && e.kind != EdgeKind::ThermalMaterial)
                .map(|e| e.to.id)
                .collect();

            let Some(defined) = ctx.symbols.spans(kind) else {
                continue;
            };

            for (id, spans) in defined.iter().filter(|(id, _)| !referenced.contains(id)) {
                found.push(
                    Diagnostic::new(
                        Severity::Warning,
                        self.pass(),
                        Code::UnusedEntity,
                        format!("{kind} {id} is never used"),
                    )
                    .at_opt(spans.first().copied()),
                );
            }
        }

        found
    }
}
