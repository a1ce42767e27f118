// nom parser combinators
use nom::character::complete::{self, alphanumeric1, char};
use nom::combinator::{all_consuming, opt};
use nom::sequence::preceded;
use nom::IResult;

use crate::cards::{Component, MaterialCard, Param, ThermalCard, ThermalTable, Zaid};
use crate::error::ParseError;
use crate::format::f;
use crate::parsers::real;

/// `ZZZAAA[.suffix]`
fn zaid(i: &str) -> IResult<&str, Zaid> {
    let (i, number) = complete::u32(i)?;
    let (i, suffix) = opt(preceded(char('.'), alphanumeric1))(i)?;
    Ok((
        i,
        Zaid {
            z: number / 1000,
            a: number % 1000,
            suffix: suffix.map(str::to_lowercase),
        },
    ))
}

/// Parse a whole token as a nuclide identifier
pub(crate) fn parse_zaid(token: &str) -> Result<Zaid, ParseError> {
    match all_consuming(zaid)(token) {
        Ok((_, z)) if z.z > 0 => Ok(z),
        _ => Err(ParseError::bad("zaid", f!("\"{token}\" is not a nuclide identifier"))),
    }
}

/// Parse the body of `Mn` after the card name
///
/// Tokens come from [split_tokens](crate::parsers::split_tokens), so
/// `keyword = value` entries may appear anywhere between the pairs.
pub(crate) fn parse_material(id: u32, tokens: &[String]) -> Result<MaterialCard, ParseError> {
    let mut components = Vec::new();
    let mut keywords = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        if tokens.get(i + 1).is_some_and(|t| t == "=") {
            let value = tokens
                .get(i + 2)
                .filter(|v| *v != "=")
                .ok_or_else(|| ParseError::bad(tokens[i].to_lowercase(), "missing value"))?;
            keywords.push(Param::new(tokens[i].to_lowercase(), vec![value.to_lowercase()]));
            i += 3;
        } else {
            let fraction = tokens.get(i + 1).ok_or_else(|| ParseError::WrongArity {
                what: f!("m{id}"),
                expected: "zaid and fraction pairs".into(),
                found: 1,
            })?;
            components.push(Component {
                zaid: parse_zaid(&tokens[i])?,
                fraction: real(fraction)
                    .ok_or_else(|| ParseError::bad("fraction", f!("\"{fraction}\" is not a number")))?,
            });
            i += 2;
        }
    }

    if components.is_empty() {
        return Err(ParseError::MalformedCard(f!("m{id} has no components")));
    }

    Ok(MaterialCard {
        id,
        components,
        keywords,
    })
}

/// Parse the body of `MTn` after the card name
pub(crate) fn parse_thermal(id: u32, tokens: &[String]) -> Result<ThermalCard, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::MalformedCard(f!("mt{id} names no tables")));
    }

    let tables = tokens
        .iter()
        .map(|t| {
            let t = t.to_lowercase();
            match t.rsplit_once('.') {
                Some((name, suffix)) => ThermalTable {
                    name: name.to_string(),
                    suffix: Some(suffix.to_string()),
                },
                None => ThermalTable {
                    name: t,
                    suffix: None,
                },
            }
        })
        .collect();

    Ok(ThermalCard { id, tables })
}
