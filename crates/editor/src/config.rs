use serde::{Deserialize, Serialize};

/// Settings shared by edits, batch runs and generators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Decks with at least this many lines get a persisted index
    pub index_threshold: usize,
    /// Column limit for generated and inserted cards
    pub wrap_width: usize,
    /// Appended to a file name to make its backup
    pub backup_suffix: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            index_threshold: 5000,
            wrap_width: idate_deck::CARD_WIDTH,
            backup_suffix: ".bak".to_string(),
        }
    }
}
