#![doc = include_str!("../readme.md")]

// Split into modules for maintainability
mod batch;
mod config;
mod document;
mod error;
mod files;
mod generate;
mod index;
mod library;
mod tokens;
mod violation;

// flatten public API and inline the documentation
#[doc(inline)]
pub use crate::batch::{Applied, FileChange, FindReplace, Plan};

#[doc(inline)]
pub use crate::config::EditorConfig;

#[doc(inline)]
pub use crate::document::{Document, ImportanceUpdate};

#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use crate::generate::{
    transform_card, Axis, Concentric, FMesh, Fragment, Geometry, HexOrientation, HexagonalLattice,
    RectangularLattice, Shape, SuperimposedMesh, WeightWindowRequest,
};

#[doc(inline)]
pub use crate::index::{fingerprint, DeckIndex};

#[doc(inline)]
pub use crate::library::{ConversionPreview, SuffixConversion};

#[doc(inline)]
pub use crate::violation::{broken_by, Violation};
