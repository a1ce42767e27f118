//! `idate` reads, checks and edits MCNP input decks
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use idate_deck as deck;

#[cfg(feature = "catalogue")]
#[cfg_attr(docsrs, doc(cfg(feature = "catalogue")))]
#[doc(inline)]
pub use idate_catalogue as catalogue;

#[cfg(feature = "editor")]
#[cfg_attr(docsrs, doc(cfg(feature = "editor")))]
#[doc(inline)]
pub use idate_editor as editor;

#[cfg(feature = "validate")]
#[cfg_attr(docsrs, doc(cfg(feature = "validate")))]
#[doc(inline)]
pub use idate_validate as validate;

#[cfg(feature = "xref")]
#[cfg_attr(docsrs, doc(cfg(feature = "xref")))]
#[doc(inline)]
pub use idate_xref as xref;
