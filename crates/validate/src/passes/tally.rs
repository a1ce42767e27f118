use std::collections::BTreeMap;

use idate_deck::{Code, Diagnostic, DxtranCard, Pass, Severity, TallyKind};
use itertools::Itertools;
use serde_json::json;

use crate::check::Check;
use crate::context::Context;

/// Tally, mesh tally and DXTRAN specifications
pub struct TallyCheck;

impl Check for TallyCheck {
    fn pass(&self) -> Pass {
        Pass::Tally
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        let mut found = Vec::new();
        // kind digit, modifier, particles, bins -> first tally number
        let mut seen: BTreeMap<String, u32> = BTreeMap::new();

        for (card, tally) in ctx.deck.tallies() {
            let n = tally.number;

            let Some(kind) = tally.kind() else {
                found.push(
                    Diagnostic::new(
                        Severity::Error,
                        self.pass(),
                        Code::InvalidTallyType,
                        format!("tally {n} ends in {}, which is not a tally type", n % 10),
                    )
                    .at(card.span),
                );
                continue;
            };

            if kind == TallyKind::PointDetector && tally.particles.is_empty() {
                found.push(
                    Diagnostic::new(
                        Severity::Error,
                        self.pass(),
                        Code::MissingParticleDesignator,
                        format!("point detector tally {n} has no particle designator"),
                    )
                    .at(card.span)
                    .with_hint(format!("write f{n}:n or f{n}:p")),
                );
            }

            for p in tally.particles.iter().filter(|p| !ctx.transports(**p)) {
                found.push(
                    Diagnostic::new(
                        Severity::Warning,
                        self.pass(),
                        Code::TallyParticleNotTransported,
                        format!("tally {n} scores {} which the mode card does not transport", p.name()),
                    )
                    .at(card.span),
                );
            }

            let key = format!(
                "{}{:?}{:?}{:?}{:?}",
                n % 10,
                tally.modifier,
                tally.particles.iter().sorted().collect::<Vec<_>>(),
                tally.bins,
                tally.detectors
            );
            match seen.get(&key) {
                Some(first) if *first != n => found.push(
                    Diagnostic::new(
                        Severity::Warning,
                        self.pass(),
                        Code::RedundantTally,
                        format!("tally {n} scores exactly what tally {first} does"),
                    )
                    .at(card.span)
                    .with_data(json!({ "tally": n, "duplicates": first })),
                ),
                Some(_) => (),
                None => {
                    seen.insert(key, n);
                }
            }
        }

        for (card, option) in ctx.deck.tally_options() {
            if option.tally != 0 && !ctx.symbols.tallies.contains_key(&option.tally) {
                found.push(
                    Diagnostic::new(
                        Severity::Error,
                        self.pass(),
                        Code::OrphanTallyOption,
                        format!(
                            "{}{} modifies tally {} which is not defined",
                            option.keyword, option.tally, option.tally
                        ),
                    )
                    .at(card.span),
                );
            }
        }

        for (card, mesh) in ctx.deck.meshes() {
            if let (true, Some(n)) = (mesh.keyword == "fmesh", mesh.number) {
                if n % 10 != 4 {
                    found.push(
                        Diagnostic::new(
                            Severity::Error,
                            self.pass(),
                            Code::InvalidMeshTallyNumber,
                            format!("fmesh{n} must be numbered with a final digit of 4"),
                        )
                        .at(card.span),
                    );
                }
            }
        }

        found.extend(dxtran_mismatches(ctx));
        found
    }
}

fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// DXTRAN spheres away from every point detector
fn dxtran_mismatches(ctx: &Context) -> Vec<Diagnostic> {
    let detectors: Vec<[f64; 3]> = ctx
        .deck
        .tallies()
        .filter(|(_, t)| t.kind() == Some(TallyKind::PointDetector))
        .flat_map(|(_, t)| t.detectors.iter().map(|d| d.position))
        .collect();
    if detectors.is_empty() {
        return Vec::new();
    }

    let tolerance = ctx.config.dxtran_tolerance;
    let mut found = Vec::new();

    for (card, dxt) in ctx.deck.dxtrans() {
        let mut moved = dxt.clone();
        let mut stray = Vec::new();

        for (i, sphere) in dxt.spheres.iter().enumerate() {
            let nearest = detectors
                .iter()
                .min_by(|a, b| distance(a, &sphere.centre).total_cmp(&distance(b, &sphere.centre)));
            let Some(nearest) = nearest else {
                continue;
            };
            if distance(nearest, &sphere.centre) > tolerance {
                stray.push(i + 1);
                moved.spheres[i].centre = *nearest;
            }
        }

        if !stray.is_empty() {
            let suggestion = dxtran_card(&moved);
            found.push(
                Diagnostic::new(
                    Severity::Warning,
                    Pass::Tally,
                    Code::DxtranDetectorMismatch,
                    format!(
                        "dxtran spheres {} are not centred on any point detector",
                        stray.iter().join(", ")
                    ),
                )
                .at(card.span)
                .with_hint(suggestion.clone())
                .with_data(json!({ "spheres": stray, "suggest": suggestion })),
            );
        }
    }

    found
}

fn dxtran_card(dxt: &DxtranCard) -> String {
    let designator = dxt.particles.iter().map(|p| p.symbol()).join(",");
    let mut words = vec![format!("dxt:{designator}")];
    for s in &dxt.spheres {
        words.extend(s.centre.iter().map(|v| v.to_string()));
        words.push(s.inner.to_string());
        words.push(s.outer.to_string());
    }
    words.extend(dxt.trailing.iter().map(|v| v.to_string()));
    words.join(" ")
}

#[cfg(test)]
mod tally_tests {
    use super::*;
    use crate::passes::run_check;
    use crate::ValidatorConfig;

    fn deck(data: &str) -> String {
        format!("t\n1 0 -1 imp:n,p=1\n2 0 1 imp:n,p=0\n\n1 so 10\n\nmode n\n{data}\n")
    }

    fn codes(data: &str) -> Vec<Code> {
        run_check(&TallyCheck, &deck(data), &ValidatorConfig::default())
            .into_iter()
            .map(|d| d.code)
            .collect()
    }

    #[test]
    fn well_formed_tallies() {
        assert!(codes("f4:n 1\nf2:n 1\nf5:n 0 0 0 0.5\ne4 1 10\nfc0 all").is_empty());
    }

    #[test]
    fn tally_type_digit() {
        assert_eq!(codes("f3:n 1"), vec![Code::InvalidTallyType]);
        assert_eq!(codes("f19:n 1"), vec![Code::InvalidTallyType]);
    }

    #[test]
    fn detector_without_designator() {
        assert_eq!(codes("f5 0 0 0 0.5"), vec![Code::MissingParticleDesignator]);
    }

    #[test]
    fn orphans_and_meshes() {
        assert_eq!(codes("f4:n 1\ne14 1 10"), vec![Code::OrphanTallyOption]);
        assert_eq!(
            codes("fmesh12:n geom=xyz origin=0 0 0 imesh=1 iints=1 jmesh=1 jints=1 kmesh=1 kints=1"),
            vec![Code::InvalidMeshTallyNumber]
        );
    }

    #[test]
    fn redundant_and_untransported() {
        assert_eq!(codes("f4:n 1\nf14:n 1"), vec![Code::RedundantTally]);
        assert!(codes("f4:n 1\nf14:n 2").is_empty());
        assert_eq!(codes("f4:p 1"), vec![Code::TallyParticleNotTransported]);
    }

    #[test]
    fn dxtran_off_detector() {
        let found = run_check(
            &TallyCheck,
            &deck("f5:n 50 0 0 1\ndxt:n 40 0 0 2 3"),
            &ValidatorConfig::default(),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, Code::DxtranDetectorMismatch);
        assert_eq!(found[0].fix_hint.as_deref(), Some("dxt:n 50 0 0 2 3"));

        assert!(codes("f5:n 50 0 0 1\ndxt:n 50 0 0.0005 2 3").is_empty());
    }
}
