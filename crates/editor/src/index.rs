//! Persisted card locations for large decks
//!
//! The index records where each numbered card sits so that edits to very
//! large decks can seek straight to the lines involved. It is written next
//! to the deck as `<deck>.idx` and thrown away whenever the deck changes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use idate_deck::{CardKind, Deck, Span};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::error::Result;
use crate::files;

/// Where every numbered card of a deck is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckIndex {
    /// FNV-1a hash of the text the index was built from
    fingerprint: u64,
    line_count: usize,
    spans: BTreeMap<(CardKind, u32), Span>,
}

impl DeckIndex {
    /// Index deck text
    ///
    /// Only the first card is kept for a duplicated number.
    ///
    /// ```rust
    /// # use idate_editor::DeckIndex;
    /// # use idate_deck::{CardKind, Span};
    /// let index = DeckIndex::build("t\n1 0 -1\n2 0 1\n\n1 so 1\n\nm1 1001 1\n     8016 2\n");
    /// assert_eq!(index.span(CardKind::Material, 1), Some(Span::new(7, 8)));
    /// assert_eq!(index.len(), 4);
    /// ```
    pub fn build(text: &str) -> Self {
        let deck = Deck::parse(text).deck;
        let mut spans = BTreeMap::new();
        for card in deck.cards() {
            if let Some(id) = card.id() {
                spans.entry((card.kind(), id)).or_insert(card.span);
            }
        }
        Self {
            fingerprint: fingerprint(text),
            line_count: deck.line_count(),
            spans,
        }
    }

    pub fn span(&self, kind: CardKind, id: u32) -> Option<Span> {
        self.spans.get(&(kind, id)).copied()
    }

    /// Physical lines of a card, read straight from the deck text
    pub fn card_lines<'a>(&self, text: &'a str, kind: CardKind, id: u32) -> Option<Vec<&'a str>> {
        let span = self.span(kind, id)?;
        Some(text.lines().skip(span.first - 1).take(span.len()).collect())
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// True when the index was built from exactly this text
    pub fn is_current(&self, text: &str) -> bool {
        self.fingerprint == fingerprint(text)
    }

    /// Where the index of a deck file lives
    pub fn path_for(deck: &Path) -> PathBuf {
        files::sibling(deck, ".idx")
    }

    /// Write the index next to its deck
    pub fn save(&self, deck: &Path) -> Result<PathBuf> {
        let path = Self::path_for(deck);
        let bytes = bincode::serialize(self)?;
        fs::write(&path, bytes)?;
        debug!("Saved index of {} cards to {}", self.len(), path.display());
        Ok(path)
    }

    /// Read the index of a deck, if one exists and matches `text`
    pub fn load(deck: &Path, text: &str) -> Result<Option<Self>> {
        let path = Self::path_for(deck);
        if !path.exists() {
            return Ok(None);
        }
        let index: Self = bincode::deserialize(&fs::read(&path)?)?;
        if !index.is_current(text) {
            warn!("Ignoring stale index {}", path.display());
            return Ok(None);
        }
        Ok(Some(index))
    }

    /// Index for a deck file, built and saved on first use
    ///
    /// Decks shorter than the configured threshold are not indexed.
    pub fn open(deck: &Path, config: &EditorConfig) -> Result<Option<Self>> {
        let text = fs::read_to_string(deck)?;
        if text.lines().count() < config.index_threshold {
            return Ok(None);
        }
        if let Some(index) = Self::load(deck, &text)? {
            return Ok(Some(index));
        }
        let index = Self::build(&text);
        index.save(deck)?;
        info!("Indexed {} cards of {}", index.len(), deck.display());
        Ok(Some(index))
    }

    /// Remove the index of a deck, true if there was one
    pub fn invalidate(deck: &Path) -> Result<bool> {
        let path = Self::path_for(deck);
        match path.exists() {
            true => {
                fs::remove_file(&path)?;
                debug!("Removed index {}", path.display());
                Ok(true)
            }
            false => Ok(false),
        }
    }
}

/// 64-bit FNV-1a hash of text
pub fn fingerprint(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[cfg(test)]
mod index_tests {
    use super::*;

    const DECK: &str = "t\n1 0 -1\n2 0 1\nc spacer\n2 0 1\n\n1 so 1\n\nm1 1001 1\n";

    #[test]
    fn first_of_duplicates() {
        let index = DeckIndex::build(DECK);
        assert_eq!(index.span(CardKind::Cell, 2), Some(Span::line(3)));
        assert_eq!(index.card_lines(DECK, CardKind::Surface, 1), Some(vec!["1 so 1"]));
        assert_eq!(index.span(CardKind::Surface, 2), None);
    }

    #[test]
    fn fingerprint_tracks_text() {
        let index = DeckIndex::build(DECK);
        assert!(index.is_current(DECK));
        assert!(!index.is_current("t\n"));
        assert_ne!(fingerprint("a"), fingerprint("b"));
    }

    #[test]
    fn persisted_next_to_deck() {
        let dir = std::env::temp_dir().join(format!("idate-index-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let deck = dir.join("big.i");
        fs::write(&deck, DECK).unwrap();

        let config = EditorConfig {
            index_threshold: 3,
            ..Default::default()
        };
        let built = DeckIndex::open(&deck, &config).unwrap().unwrap();
        assert!(DeckIndex::path_for(&deck).exists());
        assert_eq!(DeckIndex::load(&deck, DECK).unwrap(), Some(built));
        assert_eq!(DeckIndex::load(&deck, "t\n").unwrap(), None);

        assert!(DeckIndex::invalidate(&deck).unwrap());
        assert!(!DeckIndex::invalidate(&deck).unwrap());

        let small = EditorConfig::default();
        assert_eq!(DeckIndex::open(&deck, &small).unwrap(), None);
        fs::remove_dir_all(&dir).unwrap();
    }
}
