use idate_deck::{Diagnostic, Pass};

use crate::context::Context;
use crate::passes::*;

/// A single validation pass
///
/// Passes only read the [Context] and return what they find. They run in the
/// order given by [default_checks], which follows the [Pass] enumeration.
pub trait Check: Send + Sync {
    fn pass(&self) -> Pass;

    fn run(&self, ctx: &Context) -> Vec<Diagnostic>;
}

/// Every built-in pass in execution order
pub fn default_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(SymbolCheck),
        Box::new(CrossReferenceCheck),
        Box::new(UnusedCheck),
        Box::new(UniverseCheck),
        Box::new(LatticeCheck),
        Box::new(TransformCheck),
        Box::new(MaterialCheck),
        Box::new(ThermalCheck),
        Box::new(LibraryCheck),
        Box::new(PhysicsCheck),
        Box::new(EnergyCheck),
        Box::new(TallyCheck),
        Box::new(ImportanceCheck),
    ]
}
