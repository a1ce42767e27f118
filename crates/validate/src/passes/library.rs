use std::collections::{BTreeMap, BTreeSet};

use idate_deck::{Code, Diagnostic, Pass, Severity, Span};
use itertools::Itertools;
use serde_json::json;

use crate::check::Check;
use crate::context::Context;

/// Mixed cross section library versions
///
/// Suffixes are compared within one data class (the trailing letter), so
/// `.80c` neutron data alongside `.84p` photon data is not a mix.
pub struct LibraryCheck;

#[derive(Default)]
struct Usage {
    isotopes: usize,
    materials: BTreeSet<u32>,
    first: Option<Span>,
}

impl Check for LibraryCheck {
    fn pass(&self) -> Pass {
        Pass::Library
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        // class letter -> suffix -> usage
        let mut classes: BTreeMap<char, BTreeMap<String, Usage>> = BTreeMap::new();

        for (card, material) in ctx.deck.materials() {
            for component in &material.components {
                let Some(suffix) = material.effective_suffix(component) else {
                    continue;
                };
                let Some(class) = suffix.chars().last() else {
                    continue;
                };
                let usage = classes
                    .entry(class)
                    .or_default()
                    .entry(suffix.to_string())
                    .or_default();
                usage.isotopes += 1;
                usage.materials.insert(material.id);
                usage.first.get_or_insert(card.span);
            }
        }

        classes
            .into_values()
            .filter(|suffixes| suffixes.len() > 1)
            .map(|suffixes| {
                let present: Vec<&String> = suffixes.keys().collect();
                let target = ctx
                    .catalogue
                    .recommend_library(&present, &ctx.config.library_preference);

                let listing = suffixes
                    .iter()
                    .map(|(s, u)| format!(".{s} ({} isotopes in {} materials)", u.isotopes, u.materials.len()))
                    .join(", ");
                let span = suffixes.values().filter_map(|u| u.first).min();

                let mut d = Diagnostic::new(
                    Severity::Warning,
                    self.pass(),
                    Code::MixedLibraries,
                    format!("{} library versions in use: {listing}", suffixes.len()),
                )
                .at_opt(span)
                .with_data(json!({
                    "suffixes": suffixes.iter().map(|(s, u)| json!({
                        "suffix": s,
                        "isotopes": u.isotopes,
                        "materials": &u.materials,
                    })).collect::<Vec<_>>(),
                    "recommended": &target,
                }));
                if let Some(target) = target {
                    d = d.with_hint(format!("standardise on .{target}"));
                }
                d
            })
            .collect()
    }
}
