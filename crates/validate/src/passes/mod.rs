//! Built-in check passes

mod energy;
mod importance;
mod lattice;
mod library;
mod materials;
mod physics;
mod symbols;
mod tally;
mod thermal;
mod transform;
mod universe;
mod unused;
mod xref;

pub use energy::EnergyCheck;
pub use importance::ImportanceCheck;
pub use lattice::LatticeCheck;
pub use library::LibraryCheck;
pub use materials::MaterialCheck;
pub use physics::PhysicsCheck;
pub use symbols::SymbolCheck;
pub use tally::TallyCheck;
pub use thermal::ThermalCheck;
pub use transform::TransformCheck;
pub use universe::UniverseCheck;
pub use unused::UnusedCheck;
pub use xref::CrossReferenceCheck;

#[cfg(test)]
pub(crate) fn run_check(
    check: &dyn crate::Check,
    text: &str,
    config: &crate::ValidatorConfig,
) -> Vec<idate_deck::Diagnostic> {
    let deck = idate_deck::Deck::parse(text).deck;
    let ctx = crate::Context::new(&deck, config);
    check.run(&ctx)
}
