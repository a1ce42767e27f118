use std::collections::BTreeMap;

use idate_deck::{Code, Diagnostic, Particle, Pass, Severity};
use idate_xref::adjacent_cells;
use itertools::Itertools;
use serde_json::json;

use crate::check::Check;
use crate::context::Context;

/// Importance coverage and jumps between neighbouring cells
pub struct ImportanceCheck;

impl Check for ImportanceCheck {
    fn pass(&self) -> Pass {
        Pass::Importance
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        let mut found = Vec::new();
        let cells: Vec<u32> = ctx.deck.cells().map(|(_, c)| c.id).collect();

        // particle -> cell -> importance from data cards
        let mut listed: BTreeMap<Particle, BTreeMap<u32, f64>> = BTreeMap::new();
        for (card, imp) in ctx.deck.importances() {
            if imp.values.len() != cells.len() {
                found.push(
                    Diagnostic::new(
                        Severity::Error,
                        self.pass(),
                        Code::ImportanceCountMismatch,
                        format!(
                            "{} gives {} values for {} cells",
                            card.keyword(),
                            imp.values.len(),
                            cells.len()
                        ),
                    )
                    .at(card.span)
                    .with_data(json!({ "given": imp.values.len(), "cells": cells.len() })),
                );
            }

            for p in &imp.particles {
                let on_cells: Vec<u32> = ctx
                    .deck
                    .cells()
                    .filter(|(_, c)| c.importance(*p).is_some())
                    .map(|(_, c)| c.id)
                    .collect();
                if !on_cells.is_empty() {
                    found.push(
                        Diagnostic::new(
                            Severity::Error,
                            self.pass(),
                            Code::ConflictingImportance,
                            format!(
                                "{} importances are given on {} and on cells {}",
                                p.name(),
                                card.keyword(),
                                on_cells.iter().join(", ")
                            ),
                        )
                        .at(card.span),
                    );
                }
                listed
                    .entry(*p)
                    .or_default()
                    .extend(cells.iter().copied().zip(imp.values.iter().copied()));
            }
        }

        for (card, cell) in ctx.deck.cells() {
            for p in cell.params.conflicting_importances() {
                found.push(
                    Diagnostic::new(
                        Severity::Error,
                        self.pass(),
                        Code::ConflictingImportance,
                        format!("cell {} gives {} two different importances", cell.id, p.name()),
                    )
                    .at(card.span),
                );
            }
        }

        let importance = |cell: u32, p: Particle| -> Option<f64> {
            ctx.deck
                .cell_importance(cell, p)
                .or_else(|| listed.get(&p).and_then(|m| m.get(&cell)).copied())
        };

        for (card, cell) in ctx.deck.cells() {
            let graveyard = ctx.mode.iter().any(|p| importance(cell.id, *p) == Some(0.0));
            if graveyard {
                continue;
            }
            for p in ctx.mode.iter().filter(|p| importance(cell.id, **p).is_none()) {
                found.push(
                    Diagnostic::new(
                        Severity::Error,
                        self.pass(),
                        Code::MissingImportance,
                        format!("cell {} has no {} importance", cell.id, p.name()),
                    )
                    .at(card.span)
                    .with_hint(format!("add imp:{}=1", p.symbol())),
                );
            }
        }

        let max_ratio = ctx.config.max_importance_ratio;
        for pair in adjacent_cells(ctx.deck) {
            for p in &ctx.mode {
                let (Some(a), Some(b)) = (importance(pair.first, *p), importance(pair.second, *p)) else {
                    continue;
                };
                if a <= 0.0 || b <= 0.0 {
                    continue;
                }
                let (low, high) = (a.min(b), a.max(b));
                let ratio = high / low;
                if ratio <= max_ratio {
                    continue;
                }

                let steps = interpolated(low, high, max_ratio);
                found.push(
                    Diagnostic::new(
                        Severity::Warning,
                        self.pass(),
                        Code::ImportanceRatio,
                        format!(
                            "{} importance jumps by {ratio} between cells {} and {} across surface {}",
                            p.name(),
                            pair.first,
                            pair.second,
                            pair.surface
                        ),
                    )
                    .at_opt(ctx.cell_span(pair.second))
                    .with_hint(format!(
                        "split the region so importances step through {}",
                        steps.iter().join(" ")
                    ))
                    .with_data(json!({
                        "cells": [pair.first, pair.second],
                        "particle": p.symbol().to_string(),
                        "ratio": ratio,
                        "series": steps,
                    })),
                );
            }
        }

        found
    }
}

/// Geometric series from `low` to `high` with no step above `max_ratio`
fn interpolated(low: f64, high: f64, max_ratio: f64) -> Vec<f64> {
    let ratio = high / low;
    let steps = (ratio.ln() / max_ratio.ln() - 1e-9).ceil().max(1.0) as i32;
    (0..=steps)
        .map(|k| low * ratio.powf(k as f64 / steps as f64))
        .map(|v| (v * 1000.0).round() / 1000.0)
        .collect()
}

#[cfg(test)]
mod importance_tests {
    use super::*;
    use crate::passes::run_check;
    use crate::ValidatorConfig;

    fn codes(text: &str) -> Vec<Code> {
        run_check(&ImportanceCheck, text, &ValidatorConfig::default())
            .into_iter()
            .map(|d| d.code)
            .collect()
    }

    #[test]
    fn series_respects_bound() {
        assert_eq!(interpolated(1.0, 64.0, 4.0), vec![1.0, 4.0, 16.0, 64.0]);
        assert_eq!(interpolated(1.0, 10.0, 4.0), vec![1.0, 3.162, 10.0]);
    }

    #[test]
    fn ratio_between_neighbours() {
        let text = "t\n1 0 -1 imp:n=1\n2 0 1 -2 imp:n=64\n3 0 2 imp:n=0\n\n1 so 1\n2 so 2\n\nmode n\n";
        let found = run_check(&ImportanceCheck, text, &ValidatorConfig::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, Code::ImportanceRatio);
        assert_eq!(found[0].data.as_ref().unwrap()["series"], json!([1.0, 4.0, 16.0, 64.0]));
    }

    #[test]
    fn missing_for_mode_particle() {
        let text = "t\n1 0 -1 imp:n=1\n2 0 1 imp:n=0\n\n1 so 1\n\nmode n p\n";
        // cell 2 is a graveyard
        assert_eq!(codes(text), vec![Code::MissingImportance]);
    }

    #[test]
    fn data_card_importances() {
        let text = "t\n1 0 -1\n2 0 1 -2\n3 0 2\n\n1 so 1\n2 so 2\n\nmode n\nimp:n 1 2 0\n";
        assert!(codes(text).is_empty());

        let text = "t\n1 0 -1\n2 0 1 -2\n3 0 2\n\n1 so 1\n2 so 2\n\nmode n\nimp:n 1 0\n";
        assert!(codes(text).contains(&Code::ImportanceCountMismatch));
    }

    #[test]
    fn like_cells_inherit_importance() {
        let text = "t\n1 1 -1.0 -1 imp:n=1\n2 like 1 but trcl=(0 0 1)\n3 0 1 imp:n=0\n\n1 so 1\n\nmode n\nm1 1001.80c 1\n";
        assert!(codes(text).is_empty());

        // inherited through two levels
        let text = "t\n1 1 -1.0 -1 imp:n=1\n2 like 1 but trcl=(0 0 1)\n4 like 2 but trcl=(0 0 2)\n3 0 1 imp:n=0\n\n1 so 1\n\nmode n\nm1 1001.80c 1\n";
        assert!(codes(text).is_empty());
    }

    #[test]
    fn like_loop_still_missing() {
        let text = "t\n1 like 2 but u=1\n2 like 1 but u=2\n3 0 1 imp:n=0\n\n1 so 1\n\nmode n\n";
        assert_eq!(codes(text), vec![Code::MissingImportance, Code::MissingImportance]);
    }

    #[test]
    fn cell_and_data_card_conflict() {
        let text = "t\n1 0 -1 imp:n=1\n2 0 1 imp:n=0\n\n1 so 1\n\nmode n\nimp:n 1 0\n";
        assert_eq!(codes(text), vec![Code::ConflictingImportance]);

        let text = "t\n1 0 -1 imp:n=1 imp:n=2\n2 0 1 imp:n=0\n\n1 so 1\n\nmode n\n";
        assert_eq!(codes(text), vec![Code::ConflictingImportance]);
    }
}
