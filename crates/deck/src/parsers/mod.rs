// All nom parsers split amoung files for organisation
mod cell;
mod data;
mod geometry;
mod keyword;
mod material;
mod number;
mod surface;

// Internal re-exports for convenience
pub(crate) use cell::*;
pub(crate) use data::*;
pub(crate) use geometry::*;
pub(crate) use keyword::*;
pub(crate) use material::*;
pub(crate) use number::*;
pub(crate) use surface::*;

use nom::error::{Error, ErrorKind};

use crate::cards::Param;
use crate::error::ParseError;
use crate::format::f;

/// Most values one list may hold once `nR`, `nI` and `nJ` are expanded
pub const MAX_EXPANDED_VALUES: usize = 1 << 24;

/// Fail unless `n` more values fit after the `current` ones
pub(crate) fn check_expansion(token: &str, current: usize, n: usize) -> Result<(), ParseError> {
    match current.checked_add(n) {
        Some(total) if total <= MAX_EXPANDED_VALUES => Ok(()),
        _ => Err(ParseError::bad(
            token,
            f!("expands past {MAX_EXPANDED_VALUES} values"),
        )),
    }
}

/// More convenient error creation for nom
pub(in crate::parsers) fn cause(s: &str) -> nom::Err<Error<&str>> {
    nom::Err::Error(Error::new(s, ErrorKind::Fail))
}

/// Whitespace tokens with every `=` as a token of its own
///
/// `imp:n=1`, `imp:n =1`, and `imp:n = 1` all become `imp:n`, `=`, `1`.
pub(crate) fn split_tokens(text: &str) -> Vec<String> {
    text.replace('=', " = ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Group `key = v v v key = v ...` tokens into parameters
///
/// Returns the tokens before the first key and the ordered parameters. Keys
/// are lower cased, values are kept as written.
pub(crate) fn keyed_params(tokens: &[String]) -> Result<(Vec<String>, Vec<Param>), ParseError> {
    let is_key = |i: usize| tokens.get(i + 1).is_some_and(|t| t == "=");

    let first = (0..tokens.len()).find(|&i| is_key(i)).unwrap_or(tokens.len());
    if tokens[..first].last().is_some_and(|t| t == "=") || tokens.first().is_some_and(|t| t == "=")
    {
        return Err(ParseError::MalformedCard("\"=\" without a keyword".into()));
    }

    let mut params = Vec::new();
    let mut i = first;
    while i < tokens.len() {
        let key = tokens[i].to_lowercase();
        let start = i + 2;
        let end = (start..tokens.len()).find(|&j| is_key(j)).unwrap_or(tokens.len());
        let values: Vec<String> = tokens[start..end].to_vec();
        if values.is_empty() || values.iter().any(|v| v == "=") {
            return Err(ParseError::bad(key, "missing value"));
        }
        params.push(Param::new(key, values));
        i = end;
    }

    Ok((tokens[..first].to_vec(), params))
}

/// Values where `J` or `nJ` skips entries, keeping their defaults
pub(crate) fn jumpable_values<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Option<f64>>, ParseError> {
    let mut values = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token = token.as_ref();
        if let Some(n) = repeat_count(token, 'j') {
            check_expansion(token, values.len(), n)?;
            values.extend(std::iter::repeat(None).take(n));
        } else {
            let v = real(token).ok_or_else(|| ParseError::bad(token, "not a number"))?;
            values.push(Some(v));
        }
    }
    Ok(values)
}

/// Expand numeric shorthands `nR` (repeat), `nI` (interpolate), and `xM`
/// (multiply the previous entry)
pub(crate) fn expand_shorthand<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<f64>, ParseError> {
    let mut values: Vec<f64> = Vec::with_capacity(tokens.len());
    let mut pending_interpolation: Option<usize> = None;

    for token in tokens {
        let token = token.as_ref();
        let previous = values.last().copied();

        if let Some(n) = repeat_count(token, 'r') {
            let last = previous
                .ok_or_else(|| ParseError::RunLengthWithoutPredecessor(token.to_string()))?;
            check_expansion(token, values.len(), n)?;
            values.extend(std::iter::repeat(last).take(n));
        } else if let Some(n) = repeat_count(token, 'i') {
            if previous.is_none() {
                return Err(ParseError::RunLengthWithoutPredecessor(token.to_string()));
            }
            check_expansion(token, values.len(), n)?;
            pending_interpolation = Some(n);
        } else if let Some(x) = multiplier(token) {
            let last = previous
                .ok_or_else(|| ParseError::RunLengthWithoutPredecessor(token.to_string()))?;
            values.push(last * x);
        } else {
            let v = real(token).ok_or_else(|| ParseError::bad(token, "not a number"))?;
            if let (Some(n), Some(start)) = (pending_interpolation.take(), previous) {
                let step = (v - start) / (n + 1) as f64;
                values.extend((1..=n).map(|k| start + step * k as f64));
            }
            values.push(v);
        }
    }

    if pending_interpolation.is_some() {
        return Err(ParseError::MalformedCard(
            "interpolation has no end value".into(),
        ));
    }

    Ok(values)
}

#[cfg(test)]
mod shorthand_tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        split_tokens(s)
    }

    #[test]
    fn keyed_groups() {
        let (lead, params) = keyed_params(&tokens("-1 2 imp:n=1 u = 3 fill=1 (2)")).unwrap();
        assert_eq!(lead, vec!["-1", "2"]);
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].key, "imp:n");
        assert_eq!(params[2].values, vec!["1", "(2)"]);
    }

    #[test]
    fn keyed_missing_value() {
        assert!(keyed_params(&tokens("u= fill=2")).is_err());
    }

    #[test]
    fn jumps() {
        let v = jumpable_values(&["100", "2j", "0"]).unwrap();
        assert_eq!(v, vec![Some(100.0), None, None, Some(0.0)]);
    }

    #[test]
    fn repeats_and_interpolation() {
        assert_eq!(expand_shorthand(&["1", "2r"]).unwrap(), vec![1.0; 3]);
        assert_eq!(
            expand_shorthand(&["1", "2i", "4"]).unwrap(),
            vec![1.0, 2.0, 3.0, 4.0]
        );
        assert_eq!(expand_shorthand(&["1", "2m", "2m"]).unwrap(), vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn expansion_is_bounded() {
        for list in [["1", "4000000000r"], ["1", "4000000000i"], ["1", "4000000000j"]] {
            let err = match list[1].ends_with('j') {
                true => jumpable_values(&list).unwrap_err(),
                false => expand_shorthand(&list).unwrap_err(),
            };
            assert!(matches!(err, ParseError::BadParameter { .. }), "{err}");
        }
        assert_eq!(expand_shorthand(&["1", "99r"]).unwrap().len(), 100);
    }

    #[test]
    fn repeat_needs_predecessor() {
        assert_eq!(
            expand_shorthand(&["3r"]).unwrap_err(),
            ParseError::RunLengthWithoutPredecessor("3r".into())
        );
    }
}
