use std::collections::BTreeSet;

use idate_catalogue::Catalogue;
use idate_deck::Deck;
use log::{debug, warn};
use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::tokens::{locate, Token};

/// Rewrite of isotope library suffixes, e.g. `.70c` to `.80c`
///
/// ```rust
/// # use idate_editor::SuffixConversion;
/// let conversion = SuffixConversion::new(".70c", "80c").unwrap().only([1001, 8016]);
/// assert_eq!(conversion.from(), "70c");
/// assert!(SuffixConversion::new("70c", "eighty").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SuffixConversion {
    from: String,
    to: String,
    /// Only these ZZZAAA identifiers, every isotope when `None`
    zaids: Option<BTreeSet<u32>>,
}

/// What a conversion would change, without changing it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionPreview {
    /// Isotope entries rewritten
    pub isotopes: usize,
    /// Materials with at least one rewritten isotope
    pub materials: BTreeSet<u32>,
    /// 1-based lines touched
    pub lines: BTreeSet<usize>,
}

impl SuffixConversion {
    pub fn new(from: &str, to: &str) -> Result<Self> {
        let suffix = Regex::new(r"^[0-9]{2}[a-zA-Z]$")?;
        let [from, to] = [from, to].map(|s| s.trim().trim_start_matches('.').to_string());
        for s in [&from, &to] {
            if !suffix.is_match(s) {
                return Err(Error::InvalidArgument(format!("\"{s}\" is not a library suffix")));
            }
        }
        if Catalogue::global().library(&to).is_none() {
            warn!("Library .{to} is not in the catalogue");
        }
        Ok(Self {
            from,
            to,
            zaids: None,
        })
    }

    /// Restrict the conversion to some isotopes
    pub fn only(mut self, zaids: impl IntoIterator<Item = u32>) -> Self {
        self.zaids = Some(zaids.into_iter().collect());
        self
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    /// Token rewrites for every matching isotope in the deck
    pub(crate) fn edits(&self, deck: &Deck) -> Result<(Vec<(Token, String)>, ConversionPreview)> {
        let zaid = Regex::new(r"^([0-9]{1,6})\.([0-9]{2}[a-zA-Z])$")?;
        let mut edits = Vec::new();
        let mut preview = ConversionPreview::default();

        for (card, material) in deck.materials() {
            // the keyword is never an isotope
            for token in locate(card).into_iter().skip(1) {
                let Some(caps) = zaid.captures(&token.text) else {
                    continue;
                };
                if !caps[2].eq_ignore_ascii_case(&self.from) {
                    continue;
                }
                let Ok(number) = caps[1].parse::<u32>() else {
                    continue;
                };
                if self.zaids.as_ref().is_some_and(|z| !z.contains(&number)) {
                    continue;
                }

                preview.isotopes += 1;
                preview.materials.insert(material.id);
                preview.lines.insert(token.line + 1);

                let text = format!("{}.{}", &caps[1], self.to);
                if text != token.text {
                    edits.push((token, text));
                }
            }
        }

        debug!(
            "{} isotopes from .{} to .{} in {} materials",
            preview.isotopes,
            self.from,
            self.to,
            preview.materials.len()
        );
        Ok((edits, preview))
    }
}

#[cfg(test)]
mod library_tests {
    use super::*;

    const DECK: &str = "t\n1 1 -1 -1\n2 0 1\n\n1 so 1\n\nm1 1001.70c 2 8016.70c 1 $ water\n     6000.80c 1\n";

    #[test]
    fn preview_counts() {
        let deck = Deck::parse(DECK).deck;
        let (edits, preview) = SuffixConversion::new("70c", "80c").unwrap().edits(&deck).unwrap();
        assert_eq!(edits.len(), 2);
        assert_eq!(preview.isotopes, 2);
        assert_eq!(preview.materials, BTreeSet::from([1]));
        assert_eq!(preview.lines, BTreeSet::from([7]));
    }

    #[test]
    fn subset_of_isotopes() {
        let deck = Deck::parse(DECK).deck;
        let conversion = SuffixConversion::new("70c", "80c").unwrap().only([8016]);
        let (edits, _) = conversion.edits(&deck).unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].1, "8016.80c");
    }

    #[test]
    fn same_suffix_changes_nothing() {
        let deck = Deck::parse(DECK).deck;
        let (edits, preview) = SuffixConversion::new("80c", "80c").unwrap().edits(&deck).unwrap();
        assert!(edits.is_empty());
        assert_eq!(preview.isotopes, 1);
    }
}
