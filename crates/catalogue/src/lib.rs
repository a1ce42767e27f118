#![doc = include_str!("../readme.md")]

mod catalogue;
mod classifier;
mod element;
mod error;
mod library;
mod template;
mod thermal;

// flatten public API and inline the documentation
#[doc(inline)]
pub use catalogue::Catalogue;

#[doc(inline)]
pub use classifier::{MaterialClass, MaterialClassifier};

#[doc(inline)]
pub use element::Element;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use library::{default_preference, thermal_generation, Library, LibraryClass};

#[doc(inline)]
pub use template::{EnergyTemplate, ProblemClass};

#[doc(inline)]
pub use thermal::{mev_to_kelvin, ThermalFamily, BOLTZMANN_MEV};
