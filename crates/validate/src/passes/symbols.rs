use idate_deck::{Code, Diagnostic, Pass, Severity};
use itertools::Itertools;
use serde_json::json;

use crate::check::Check;
use crate::context::Context;

/// Duplicate numbers within a kind
///
/// One fatal diagnostic per duplicated number, located at the first
/// definition and citing every defining span.
pub struct SymbolCheck;

impl Check for SymbolCheck {
    fn pass(&self) -> Pass {
        Pass::Symbols
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        ctx.symbols
            .duplicates()
            .into_iter()
            .map(|d| {
                let lines = d.spans.iter().map(|s| s.to_string()).join(", ");
                Diagnostic::new(
                    Severity::Fatal,
                    self.pass(),
                    Code::DuplicateId,
                    format!("{} {} is defined {} times (lines {lines})", d.kind, d.id, d.spans.len()),
                )
                .at_opt(d.spans.first().copied())
                .with_hint(format!("renumber all but one definition of {} {}", d.kind, d.id))
                .with_data(json!({ "kind": d.kind, "id": d.id, "spans": d.spans }))
            })
            .collect()
    }
}
