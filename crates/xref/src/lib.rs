#![doc = include_str!("../readme.md")]

// Split into modules for maintainability
mod adjacency;
mod entity;
mod graph;
mod symbols;
mod universe;

// flatten public API and inline the documentation
#[doc(inline)]
pub use crate::adjacency::{adjacent_cells, neighbours, Adjacency};

#[doc(inline)]
pub use crate::entity::{EntityKind, Node};

#[doc(inline)]
pub use crate::graph::{Edge, EdgeKind, ReferenceGraph};

#[doc(inline)]
pub use crate::symbols::{Duplicate, SymbolTable};

#[doc(inline)]
pub use crate::universe::{FillSite, Nesting, UniverseCycle, UniverseGraph};
