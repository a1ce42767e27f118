use idate_deck::{Code, Diagnostic, Pass, Severity};
use itertools::Itertools;
use serde_json::json;

use crate::check::Check;
use crate::context::Context;

/// Fill loops and deep universe nesting
pub struct UniverseCheck;

impl Check for UniverseCheck {
    fn pass(&self) -> Pass {
        Pass::UniverseCycle
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        let mut found: Vec<Diagnostic> = ctx
            .universes
            .cycles(ctx.config.cycle_limit)
            .into_iter()
            .map(|c| {
                let message = match c.universes.len() {
                    1 => format!("universe {} fills itself (cell {})", c.universes[0], c.cells.iter().join(", ")),
                    _ => format!("universe fill cycle {} (cells {})", c.path(), c.cells.iter().join(", ")),
                };
                Diagnostic::new(Severity::Fatal, self.pass(), Code::UniverseCycle, message)
                    .at(c.span)
                    .with_data(json!({ "universes": c.universes, "cells": c.cells }))
            })
            .collect();

        let nesting = ctx.universes.nesting();
        let severity = if nesting.depth > ctx.config.depth_warning {
            Some(Severity::Warning)
        } else if nesting.depth > ctx.config.depth_info {
            Some(Severity::Info)
        } else {
            None
        };
        if let Some(severity) = severity {
            found.push(
                Diagnostic::new(
                    severity,
                    self.pass(),
                    Code::NestingDepth,
                    format!(
                        "universes nest {} levels deep ({})",
                        nesting.depth,
                        nesting.path.iter().join(" > ")
                    ),
                )
                .with_data(json!({ "depth": nesting.depth, "path": nesting.path })),
            );
        }

        found
    }
}
