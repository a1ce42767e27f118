use idate_deck::rotation::{orthonormalise, to_degrees};
use idate_deck::{CardNumber, Code, Diagnostic, Pass, Severity};
use log::warn;
use serde_json::json;

use super::{push_card, Fragment};
use crate::config::EditorConfig;
use crate::error::{Error, Result};

/// `*TRn` card from a direction cosine matrix and displacement
///
/// The rows are orthonormalised first. If that moved anything, the fragment
/// carries a warning with the matrix actually written.
///
/// ```rust
/// # use idate_editor::{transform_card, EditorConfig};
/// let identity = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
/// let fragment = transform_card(3, &identity, [0.0, 0.0, 5.0], &EditorConfig::default()).unwrap();
/// assert_eq!(fragment.data, vec!["*tr3 0 0 5 0 90 90 90 0 90 90 90 0"]);
/// assert!(fragment.diagnostics.is_empty());
/// ```
pub fn transform_card(
    id: u32,
    cosines: &[f64; 9],
    displacement: [f64; 3],
    config: &EditorConfig,
) -> Result<Fragment> {
    if !(1..=999).contains(&id) {
        return Err(Error::InvalidArgument(format!("transform number {id} is outside 1-999")));
    }
    if displacement.iter().chain(cosines.iter()).any(|v| !v.is_finite()) {
        return Err(Error::InvalidArgument("transform values must be finite".to_string()));
    }

    let fixed = orthonormalise(cosines).ok_or_else(|| {
        Error::InvalidArgument("rotation rows are degenerate, no rotation can be recovered".to_string())
    })?;

    let mut fragment = Fragment::default();
    if fixed.changed {
        warn!("Rotation for tr{id} was not orthonormal and has been corrected");
        fragment.diagnostics.push(
            Diagnostic::new(
                Severity::Warning,
                Pass::Editor,
                Code::OrthonormalisedInput,
                format!("rotation for tr{id} was orthonormalised"),
            )
            .with_data(json!({
                "transform": id,
                "input": cosines,
                "output": fixed.cosines,
                "reflected": fixed.reflected,
            })),
        );
    }

    let mut words = vec![format!("*tr{id}")];
    words.extend(displacement.iter().map(|v| v.card_number()));
    words.extend(to_degrees(&fixed.cosines).iter().map(|a| round(*a).card_number()));
    push_card(&mut fragment.data, &words, config.wrap_width);
    Ok(fragment)
}

/// Round away floating point noise from `acos`
fn round(angle: f64) -> f64 {
    let v = (angle * 1e9).round() / 1e9;
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

#[cfg(test)]
mod transform_tests {
    use super::*;

    #[test]
    fn rotation_about_z() {
        let cosines = [0.6, 0.8, 0.0, -0.8, 0.6, 0.0, 0.0, 0.0, 1.0];
        let fragment = transform_card(1, &cosines, [1.0, 2.0, 3.0], &EditorConfig::default()).unwrap();
        let words: Vec<&str> = fragment.data[0].split_whitespace().collect();
        assert_eq!(&words[..4], &["*tr1", "1", "2", "3"]);
        assert!(words[4].starts_with("53.13"));
        assert!(fragment.diagnostics.is_empty());
    }

    #[test]
    fn stretched_input_is_corrected() {
        let cosines = [2.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        let fragment = transform_card(2, &cosines, [0.0; 3], &EditorConfig::default()).unwrap();
        assert_eq!(fragment.diagnostics.len(), 1);
        assert_eq!(fragment.diagnostics[0].code, Code::OrthonormalisedInput);
        assert_eq!(fragment.data, vec!["*tr2 0 0 0 0 90 90 90 0 90 90 90 0"]);
    }

    #[test]
    fn degenerate_and_out_of_range() {
        let flat = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        assert!(transform_card(1, &flat, [0.0; 3], &EditorConfig::default()).is_err());
        let identity = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        assert!(transform_card(1000, &identity, [0.0; 3], &EditorConfig::default()).is_err());
    }
}
