use std::collections::BTreeSet;

use idate_deck::{Card, Code, Diagnostic, Particle, Pass, Severity};
use serde_json::json;

use crate::check::Check;
use crate::context::Context;

/// `PHYS:N` entry controlling secondary photon production, 0 disables it
const NEUTRON_NGAM: usize = 8;
/// `PHYS:P` entry turning off electron production when 1
const PHOTON_IDES: usize = 1;
/// `PHYS:P` entry for photonuclear physics, 0 (the default) disables it
const PHOTON_ISPN: usize = 3;

/// Production switches that contradict the transported particles
pub struct PhysicsCheck;

impl Check for PhysicsCheck {
    fn pass(&self) -> Pass {
        Pass::Physics
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        let mut found = Vec::new();
        let coupled_np = ctx.transports(Particle::Neutron) && ctx.transports(Particle::Photon);
        let coupled_pe = ctx.transports(Particle::Photon) && ctx.transports(Particle::Electron);

        for (card, phys) in ctx.deck.physics() {
            match phys.particle {
                Particle::Neutron if coupled_np && phys.value(NEUTRON_NGAM) == Some(0.0) => {
                    found.push(
                        Diagnostic::new(
                            Severity::Error,
                            self.pass(),
                            Code::DisabledPhotonProduction,
                            "photons are transported but phys:n turns off photon production",
                        )
                        .at(card.span)
                        .with_hint("remove the 0 in the photon production entry of phys:n"),
                    );
                }
                Particle::Photon if coupled_pe && phys.value(PHOTON_IDES) == Some(1.0) => {
                    found.push(
                        Diagnostic::new(
                            Severity::Error,
                            self.pass(),
                            Code::DisabledElectronProduction,
                            "electrons are transported but phys:p turns off electron production (ides=1)",
                        )
                        .at(card.span)
                        .with_hint("set ides to 0 on phys:p"),
                    );
                }
                _ => (),
            }
        }

        if coupled_np {
            found.extend(photonuclear(ctx));
        }
        found.extend(untransported(ctx));
        found
    }
}

/// Photoneutron sources left switched off
fn photonuclear(ctx: &Context) -> Option<Diagnostic> {
    let sources: Vec<u32> = ctx
        .deck
        .materials()
        .filter(|(_, m)| m.elements().contains(&4) || m.contains_nuclide(1, 2))
        .map(|(_, m)| m.id)
        .collect();
    if sources.is_empty() {
        return None;
    }

    let phys_p = ctx.deck.physics().find(|(_, p)| p.particle == Particle::Photon);
    let enabled = phys_p
        .and_then(|(_, p)| p.value(PHOTON_ISPN))
        .is_some_and(|v| v != 0.0);
    if enabled {
        return None;
    }

    let d = Diagnostic::new(
        Severity::Info,
        Pass::Physics,
        Code::PhotonuclearDisabled,
        format!(
            "materials {:?} contain Be or D but photonuclear physics is off",
            sources
        ),
    )
    .with_hint("set ispn to 1 on phys:p to model (gamma,n) in Be and D")
    .with_data(json!({ "materials": sources }));
    Some(match phys_p {
        Some((card, _)) => d.at(card.span),
        None => d,
    })
}

/// Data cards for particles missing from the mode card
fn untransported(ctx: &Context) -> Vec<Diagnostic> {
    let mut cards: Vec<(&Card, Vec<Particle>)> = Vec::new();
    cards.extend(ctx.deck.physics().map(|(c, p)| (c, vec![p.particle])));
    cards.extend(ctx.deck.cutoffs().map(|(c, p)| (c, p.particles.clone())));
    cards.extend(ctx.deck.importances().map(|(c, p)| (c, p.particles.clone())));
    cards.extend(ctx.deck.weight_windows().map(|(c, p)| (c, p.particles.clone())));

    let mut found = Vec::new();
    for (card, particles) in cards {
        let missing: BTreeSet<Particle> = particles
            .into_iter()
            .filter(|p| !ctx.transports(*p))
            .collect();
        for p in missing {
            found.push(
                Diagnostic::new(
                    Severity::Warning,
                    Pass::Physics,
                    Code::UntransportedParticle,
                    format!("{} is given for {} which the mode card does not transport", card.keyword(), p.name()),
                )
                .at(card.span),
            );
        }
    }
    found
}
