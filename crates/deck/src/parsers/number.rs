// nom parser combinators
use nom::branch::alt;
use nom::character::complete::{self, char, digit1, one_of};
use nom::combinator::{all_consuming, opt, recognize};
use nom::sequence::{pair, separated_pair, terminated, tuple};
use nom::IResult;

/// Parse a whole token as a finite real number
///
/// Accepts the usual forms (`5`, `-2.7`, `.5`, `1e-5`) plus Fortran style
/// exponents without the `e` (`1.0-5`) or with a `d` (`1.0d3`).
pub(crate) fn real(token: &str) -> Option<f64> {
    if let Ok(v) = token.parse::<f64>() {
        return v.is_finite().then_some(v);
    }
    let (_, v) = all_consuming(alt((fortran_exponent, double_exponent)))(token).ok()?;
    v.is_finite().then_some(v)
}

/// `1.0-5` or `2.5+3`
fn fortran_exponent(i: &str) -> IResult<&str, f64> {
    let (i, mantissa) = mantissa(i)?;
    let (i, exponent) = recognize(pair(one_of("+-"), digit1))(i)?;
    let v = mantissa * 10f64.powi(exponent.parse::<i32>().unwrap_or(0));
    Ok((i, v))
}

/// `1.0d3`
fn double_exponent(i: &str) -> IResult<&str, f64> {
    let (i, mantissa) = mantissa(i)?;
    let (i, _) = one_of("dD")(i)?;
    let (i, exponent) = complete::i32(i)?;
    Ok((i, mantissa * 10f64.powi(exponent)))
}

fn mantissa(i: &str) -> IResult<&str, f64> {
    let (i, text) = recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(tuple((digit1, opt(pair(char('.'), opt(digit1)))))),
            recognize(pair(char('.'), digit1)),
        )),
    )))(i)?;
    match text.parse::<f64>() {
        Ok(v) => Ok((i, v)),
        Err(_) => Err(super::cause(i)),
    }
}

/// Count of a repeat-style shorthand such as `3r`, `2j`, `i`
///
/// A bare letter counts as 1. Letters are matched without case.
pub(crate) fn repeat_count(token: &str, letter: char) -> Option<usize> {
    let lower = token.to_ascii_lowercase();
    let parsed: IResult<&str, Option<u32>> =
        all_consuming(terminated(opt(complete::u32), char(letter)))(lower.as_str());
    match parsed {
        Ok((_, n)) => Some(n.unwrap_or(1) as usize),
        Err(_) => None,
    }
}

/// Multiplier shorthand `xM`
pub(crate) fn multiplier(token: &str) -> Option<f64> {
    let lower = token.to_ascii_lowercase();
    let body = lower.strip_suffix('m')?;
    real(body)
}

/// Inclusive lattice index range `lo:hi`
pub(crate) fn index_range(token: &str) -> Option<(i64, i64)> {
    let parsed: IResult<&str, (i64, i64)> =
        all_consuming(separated_pair(complete::i64, char(':'), complete::i64))(token);
    parsed.ok().map(|(_, r)| r)
}

/// Whole token as an unsigned integer, no sign allowed
pub(crate) fn unsigned(token: &str) -> Option<u32> {
    let parsed: IResult<&str, u32> = all_consuming(complete::u32)(token);
    parsed.ok().map(|(_, v)| v)
}
