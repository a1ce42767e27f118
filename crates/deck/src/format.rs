//! Text formatting for generated and rewritten cards

use std::fmt::Display;

use textwrap::{Options, WordSeparator, WordSplitter, WrapAlgorithm};

// Alias for the format! macro out of laziness
pub use std::format as f;

/// Column limit for generated cards
pub const CARD_WIDTH: usize = 80;

/// Indent that marks a continuation line
pub const CONTINUATION: &str = "     ";

/// Extends floats with the shortest text MCNP reads back exactly
pub trait CardNumber {
    /// Shortest round-trip text, switching to exponent form for very large
    /// or very small magnitudes
    ///
    /// ```rust
    /// # use idate_deck::CardNumber;
    /// assert_eq!((2.7).card_number(), "2.7");
    /// assert_eq!((-0.0).card_number(), "0");
    /// assert_eq!((1e-5).card_number(), "1e-5");
    /// assert_eq!((14.1e6).card_number(), "1.41e7");
    /// ```
    fn card_number(&self) -> String;
}

impl CardNumber for f64 {
    fn card_number(&self) -> String {
        let v = *self;
        if v == 0.0 {
            "0".to_string()
        } else if (1e-3..1e7).contains(&v.abs()) {
            f!("{v}")
        } else {
            f!("{v:e}")
        }
    }
}

/// Collapse runs of equal values into the `v nR` shorthand
///
/// ```rust
/// # use idate_deck::compact_repeats;
/// let words = compact_repeats(&[7, 7, 7, 3, 8, 8]);
/// assert_eq!(words, vec!["7", "2r", "3", "8", "1r"]);
/// ```
pub fn compact_repeats<T: PartialEq + Display>(values: &[T]) -> Vec<String> {
    let mut words = Vec::new();
    let mut i = 0;
    while i < values.len() {
        let mut run = 1;
        while i + run < values.len() && values[i + run] == values[i] {
            run += 1;
        }
        words.push(f!("{}", values[i]));
        if run > 1 {
            words.push(f!("{}r", run - 1));
        }
        i += run;
    }
    words
}

/// Wrap card text to `width` columns using continuation indents
///
/// Words are never split, so a single word longer than the width is left on
/// a line of its own.
///
/// ```rust
/// # use idate_deck::wrap_card;
/// let lines = wrap_card("imp:n 1 1 1 1 1 0", 10);
/// assert_eq!(lines, vec!["imp:n 1 1", "     1 1 1", "     0"]);
/// ```
pub fn wrap_card(text: &str, width: usize) -> Vec<String> {
    let options = Options::new(width.max(CONTINUATION.len() + 1))
        .subsequent_indent(CONTINUATION)
        .word_separator(WordSeparator::AsciiSpace)
        .word_splitter(WordSplitter::NoHyphenation)
        .wrap_algorithm(WrapAlgorithm::FirstFit)
        .break_words(false);

    textwrap::wrap(text.trim(), &options)
        .into_iter()
        .map(|line| line.trim_end().to_string())
        .collect()
}

/// Join a list of words and wrap as a single card
pub fn wrap_words<S: AsRef<str>>(words: &[S], width: usize) -> Vec<String> {
    let text = words
        .iter()
        .map(|w| w.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");
    wrap_card(&text, width)
}
