use std::collections::BTreeMap;

use idate_catalogue::{mev_to_kelvin, thermal_generation, Catalogue, ThermalFamily};
use idate_deck::{Code, Diagnostic, MaterialCard, Pass, Severity, ThermalCard};
use log::trace;
use serde_json::json;

use crate::check::Check;
use crate::context::Context;

/// Moderator materials paired with the right thermal scattering tables
pub struct ThermalCheck;

/// Atom fractions of the elements that drive the thermal table rules
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Composition {
    hydrogen: f64,
    deuterium: f64,
    beryllium: f64,
    carbon: f64,
    oxygen: f64,
    /// Only beryllium present
    beryllium_only: bool,
}

impl Composition {
    fn of(material: &MaterialCard, catalogue: &Catalogue) -> Self {
        let mut c = Self::default();
        for component in &material.components {
            let (z, a) = (component.zaid.z, component.zaid.a);
            let atoms = match component.fraction {
                f if f >= 0.0 => f,
                f => match catalogue.nuclide_mass(z, a) {
                    Some(mass) if mass > 0.0 => -f / mass,
                    _ => continue,
                },
            };
            match (z, a) {
                (1, 2) => c.deuterium += atoms,
                (1, _) => c.hydrogen += atoms,
                (4, _) => c.beryllium += atoms,
                (6, _) => c.carbon += atoms,
                (8, _) => c.oxygen += atoms,
                _ => (),
            }
        }
        c.beryllium_only = material.elements().into_iter().all(|z| z == 4);
        c
    }
}

/// A thermal table a composition calls for
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rule {
    element: &'static str,
    family: &'static str,
    /// Families that satisfy the rule
    accepts: &'static [&'static str],
    required: bool,
}

fn rule(
    element: &'static str,
    family: &'static str,
    accepts: &'static [&'static str],
    required: bool,
) -> Rule {
    Rule {
        element,
        family,
        accepts,
        required,
    }
}

fn rules(c: &Composition, ratio_tolerance: f64) -> Vec<Rule> {
    let mut rules = Vec::new();

    if c.deuterium > 0.0 && c.oxygen > 0.0 && c.deuterium >= c.hydrogen {
        rules.push(rule("D", "hwtr", &["hwtr"], true));
    } else if c.hydrogen > 0.0 && c.oxygen > 0.0 {
        let ratio = c.hydrogen / c.oxygen;
        if ((ratio - 2.0) / 2.0).abs() <= ratio_tolerance {
            rules.push(rule("H", "lwtr", &["lwtr"], true));
        }
    }

    if c.hydrogen > 0.0 && c.carbon > 0.0 {
        rules.push(rule("H", "poly", &["poly", "benz"], false));
    }

    if c.carbon > 0.0 && c.hydrogen == 0.0 {
        rules.push(rule("C", "grph", &["grph"], true));
    }

    if c.beryllium > 0.0 && c.oxygen > 0.0 {
        rules.push(rule("Be", "beo", &["beo"], true));
    } else if c.beryllium > 0.0 && c.beryllium_only {
        rules.push(rule("Be", "be", &["be"], true));
    }

    rules
}

impl Check for ThermalCheck {
    fn pass(&self) -> Pass {
        Pass::ThermalScattering
    }

    fn run(&self, ctx: &Context) -> Vec<Diagnostic> {
        let catalogue = ctx.catalogue;
        let thermal: BTreeMap<u32, &ThermalCard> = ctx.deck.thermal().map(|(_, t)| (t.id, t)).collect();
        let mut found = Vec::new();

        for (card, material) in ctx.deck.materials() {
            let families: Vec<&ThermalFamily> = thermal
                .get(&material.id)
                .into_iter()
                .flat_map(|t| t.tables.iter())
                .filter_map(|t| catalogue.thermal_family(&t.name))
                .collect();

            let composition = Composition::of(material, catalogue);
            trace!("material {} composition {composition:?}", material.id);

            for rule in rules(&composition, ctx.config.thermal_ratio_tolerance) {
                if families.iter().any(|f| rule.accepts.contains(&f.name)) {
                    continue;
                }
                let table = suggested_table(material, rule.family);
                let (severity, code, verb) = match rule.required {
                    true => (Severity::Error, Code::MissingThermalScattering, "needs"),
                    false => (Severity::Warning, Code::SuggestedThermalScattering, "may need"),
                };
                found.push(
                    Diagnostic::new(
                        severity,
                        self.pass(),
                        code,
                        format!(
                            "material {} contains {} and {verb} a {} thermal scattering table",
                            material.id, rule.element, rule.family
                        ),
                    )
                    .at(card.span)
                    .with_hint(format!("mt{} {table}", material.id))
                    .with_data(json!({ "element": rule.element, "suggest": table })),
                );
            }
        }

        for (card, mt) in ctx.deck.thermal() {
            let Some(material) = ctx.deck.material(mt.id) else {
                continue;
            };
            let elements = material.elements();
            for table in &mt.tables {
                let Some(family) = catalogue.thermal_family(&table.name) else {
                    continue;
                };
                if !family.elements.iter().any(|z| elements.contains(z)) {
                    found.push(
                        Diagnostic::new(
                            Severity::Warning,
                            self.pass(),
                            Code::UnmatchedThermalScattering,
                            format!(
                                "{table} on mt{} binds {} which material {} does not contain",
                                mt.id, family.description, mt.id
                            ),
                        )
                        .at(card.span),
                    );
                }
            }
        }

        found.extend(temperature_mismatches(ctx, &thermal));
        found
    }
}

/// Table name at the generation matching the material's neutron library
fn suggested_table(material: &MaterialCard, family: &str) -> String {
    let generation = material
        .components
        .iter()
        .filter_map(|c| material.effective_suffix(c))
        .find_map(thermal_generation)
        .unwrap_or('2');
    format!("{family}.{generation}0t")
}

/// Cell temperatures outside the range a paired table represents
fn temperature_mismatches(ctx: &Context, thermal: &BTreeMap<u32, &ThermalCard>) -> Vec<Diagnostic> {
    let mut found = Vec::new();

    for (card, cell) in ctx.deck.cells() {
        // LIKE cells take both from the cell they copy unless overridden
        let tmp = ctx.deck.like_chain(cell.id).iter().find_map(|c| c.params.tmp);
        let (Some(tmp), Some(mt)) = (tmp, thermal.get(&ctx.deck.cell_material(cell.id))) else {
            continue;
        };
        let kelvin = mev_to_kelvin(tmp);

        for table in &mt.tables {
            let (Some(family), Some(suffix)) = (ctx.catalogue.thermal_family(&table.name), &table.suffix) else {
                continue;
            };
            let Some((low, high)) = family.bracket(suffix) else {
                continue;
            };
            if (low..=high).contains(&kelvin) {
                continue;
            }

            let mut d = Diagnostic::new(
                Severity::Warning,
                Pass::ThermalScattering,
                Code::ThermalTemperatureMismatch,
                format!(
                    "cell {} is at {kelvin:.1} K but {table} represents {low:.1}-{high:.1} K",
                    cell.id
                ),
            )
            .at(card.span)
            .with_data(json!({ "kelvin": kelvin, "table": table.to_string(), "low": low, "high": high }));

            if let Some(nearest) = nearest_table(family, suffix, kelvin) {
                d = d.with_hint(format!("use {}.{nearest}", family.name));
            }
            found.push(d);
        }
    }

    found
}

/// Suffix of the same generation tabulated closest to `kelvin`
fn nearest_table(family: &ThermalFamily, suffix: &str, kelvin: f64) -> Option<String> {
    let generation = suffix.chars().next()?;
    let index = family
        .temperatures
        .iter()
        .enumerate()
        .min_by(|a, b| (a.1 - kelvin).abs().total_cmp(&(b.1 - kelvin).abs()))?
        .0;
    Some(format!("{generation}{index}t"))
}
