#![doc = include_str!("../readme.md")]

// Split into modules for maintainability
mod check;
mod config;
mod context;
mod error;
mod report;
mod validator;

pub mod passes;

// flatten public API and inline the documentation
#[doc(inline)]
pub use crate::check::{default_checks, Check};

#[doc(inline)]
pub use crate::config::ValidatorConfig;

#[doc(inline)]
pub use crate::context::Context;

#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use crate::report::{Report, EXIT_IO_FAILURE};

#[doc(inline)]
pub use crate::validator::Validator;
