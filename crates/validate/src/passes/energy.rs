use idate_deck::{Card, Code, Diagnostic, Particle, Pass, Severity, SourceValue};
use serde_json::json;

use crate::check::Check;
use crate::context::Context;

/// Source energy when `erg` is not given, in MeV
const DEFAULT_SOURCE_ENERGY: f64 = 14.0;
/// Upper energy limit when `phys` does not set one, in MeV
const DEFAULT_EMAX: f64 = 100.0;

/// Source energies against the transport energy window
pub struct EnergyCheck;

/// Energy bounds in force for one particle
struct Window<'a> {
    emax: f64,
    emax_card: Option<&'a Card>,
    cutoff: f64,
    cutoff_card: Option<&'a Card>,
}

fn window<'a>(ctx: &'a Context, particle: Particle) -> Window<'a> {
    let phys = ctx.deck.physics().find(|(_, p)| p.particle == particle);
    let cut = ctx.deck.cutoffs().find(|(_, c)| c.particles.contains(&particle));
    let default_cutoff = match particle {
        Particle::Photon | Particle::Electron => 1e-3,
        _ => 0.0,
    };

    Window {
        emax: phys.and_then(|(_, p)| p.emax()).unwrap_or(DEFAULT_EMAX),
        emax_card: phys.map(|(c, _)| c),
        cutoff: cut.and_then(|(_, c)| c.energy()).unwrap_or(default_cutoff),
        cutoff_card: cut.map(|(c, _)| c),
    }
}

/// Highest energy the source can emit, when it can be known
fn source_energy<'a>(ctx: &'a Context<'a>) -> Option<(&'a Card, Particle, f64)> {
    let (card, sdef) = ctx.deck.sources().next()?;
    let particle = sdef.particle()?;
    let energy = match sdef.get("erg") {
        None => DEFAULT_SOURCE_ENERGY,
        Some(SourceValue::Fixed(v)) => *v.first()?,
        Some(SourceValue::Distribution(n)) => {
            let (_, si) = ctx
                .deck
                .distributions()
                .find(|(_, d)| d.keyword == "si" && d.number == *n)?;
            if si.option == Some('s') {
                return None;
            }
            si.values.iter().copied().reduce(f64::max)?
        }
        Some(_) => return None,
    };
    Some((card, particle, energy))
}

impl Check for EnergyCheck {
    fn pass(&self) -> Pass {
        Pass::EnergyCutoff
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        let config = ctx.config;
        let mut found = Vec::new();

        if let Some((card, particle, energy)) = source_energy(ctx) {
            let w = window(ctx, particle);
            let p = particle.symbol();

            if energy > w.emax {
                let suggested = (config.emax_factor * energy).max(energy + config.emax_margin);
                found.push(
                    Diagnostic::new(
                        Severity::Error,
                        self.pass(),
                        Code::SourceAboveEmax,
                        format!("source energy {energy} MeV exceeds the {p} upper limit of {} MeV", w.emax),
                    )
                    .at(w.emax_card.map(|c| c.span).unwrap_or(card.span))
                    .with_hint(format!("raise emax on phys:{p} to {suggested}"))
                    .with_data(json!({ "source": energy, "emax": w.emax, "suggested": suggested })),
                );
            } else if energy > config.emax_warning_fraction * w.emax {
                found.push(
                    Diagnostic::new(
                        Severity::Warning,
                        self.pass(),
                        Code::SourceNearEmax,
                        format!("source energy {energy} MeV is close to the {p} upper limit of {} MeV", w.emax),
                    )
                    .at(card.span),
                );
            }

            if w.cutoff >= energy {
                found.push(
                    Diagnostic::new(
                        Severity::Error,
                        self.pass(),
                        Code::SourceBelowCutoff,
                        format!("source energy {energy} MeV is not above the {p} cutoff of {} MeV", w.cutoff),
                    )
                    .at(w.cutoff_card.map(|c| c.span).unwrap_or(card.span)),
                );
            }
        }

        for particle in &ctx.mode {
            let w = window(ctx, *particle);
            if w.cutoff >= w.emax {
                found.push(
                    Diagnostic::new(
                        Severity::Error,
                        self.pass(),
                        Code::CutoffAboveEmax,
                        format!(
                            "{} cutoff {} MeV is not below the upper limit {} MeV",
                            particle.name(),
                            w.cutoff,
                            w.emax
                        ),
                    )
                    .at_opt(w.cutoff_card.map(|c| c.span)),
                );
            }
        }

        found.extend(templates(ctx));
        found
    }
}

/// Opt-in energy settings typical for the configured problem class
fn templates(ctx: &Context) -> Vec<Diagnostic> {
    let Some(class) = ctx.config.problem_class else {
        return Vec::new();
    };

    class
        .templates()
        .iter()
        .filter_map(|t| {
            let particle = Particle::from_symbol(t.particle)?;
            if !ctx.transports(particle) {
                return None;
            }
            let w = window(ctx, particle);
            let close = |a: f64, b: f64| (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0);
            if close(w.emax, t.emax) && close(w.cutoff, t.cutoff) {
                return None;
            }
            Some(
                Diagnostic::new(
                    Severity::Recommendation,
                    Pass::EnergyCutoff,
                    Code::ProblemClassTemplate,
                    format!(
                        "{} problems usually run {} with emax {} MeV and cutoff {} MeV (deck has {} and {})",
                        class.name(),
                        particle.name(),
                        t.emax,
                        t.cutoff,
                        w.emax,
                        w.cutoff
                    ),
                )
                .at_opt(w.emax_card.or(w.cutoff_card).map(|c| c.span)),
            )
        })
        .collect()
}

#[cfg(test)]
mod energy_tests {
    use super::*;
    use crate::passes::run_check;
    use crate::ValidatorConfig;
    use idate_catalogue::ProblemClass;

    fn deck(data: &str) -> String {
        format!("t\n1 0 -1 imp:n=1\n2 0 1 imp:n=0\n\n1 so 1\n\nmode n\n{data}\n")
    }

    fn codes(data: &str) -> Vec<Code> {
        run_check(&EnergyCheck, &deck(data), &ValidatorConfig::default())
            .into_iter()
            .map(|d| d.code)
            .collect()
    }

    #[test]
    fn source_above_emax_suggests_limit() {
        let found = run_check(&EnergyCheck, &deck("sdef erg=14.1\nphys:n 10"), &ValidatorConfig::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, Code::SourceAboveEmax);
        assert_eq!(found[0].span, Some(idate_deck::Span::line(9)));
        let suggested = found[0].data.as_ref().unwrap()["suggested"].as_f64().unwrap();
        assert!((suggested - 15.51).abs() < 1e-9);
    }

    #[test]
    fn margin_bounds_small_sources() {
        let found = run_check(&EnergyCheck, &deck("sdef erg=2\nphys:n 1"), &ValidatorConfig::default());
        assert_eq!(found[0].data.as_ref().unwrap()["suggested"], 3.0);
    }

    #[test]
    fn near_the_limit() {
        assert_eq!(codes("sdef erg=19\nphys:n 20"), vec![Code::SourceNearEmax]);
        assert!(codes("sdef erg=14\nphys:n 20").is_empty());
    }

    #[test]
    fn distribution_maximum() {
        assert_eq!(codes("sdef erg=d1\nsi1 h 0 1 25\nsp1 0 1 1\nphys:n 20"), vec![Code::SourceAboveEmax]);
    }

    #[test]
    fn cutoffs() {
        assert_eq!(codes("sdef erg=1\ncut:n j 2"), vec![Code::SourceBelowCutoff]);
        assert_eq!(codes("phys:n 20\ncut:n j 30"), vec![Code::CutoffAboveEmax]);
    }

    #[test]
    fn templates_are_opt_in() {
        assert!(codes("phys:n 100").is_empty());
        let config = ValidatorConfig {
            problem_class: Some(ProblemClass::ThermalReactor),
            ..Default::default()
        };
        let found = run_check(&EnergyCheck, &deck("phys:n 100"), &config);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Recommendation);
    }
}
