// nom parser combinators
use nom::branch::alt;
use nom::character::complete::{self, char, one_of, space0};
use nom::combinator::{all_consuming, map, opt};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded, tuple};
use nom::IResult;

use crate::cards::{Geometry, Sense, SurfaceRef};
use crate::error::ParseError;
use crate::format::f;

/// Parse a complete cell geometry expression
pub(crate) fn parse_geometry(text: &str) -> Result<Geometry, ParseError> {
    match all_consuming(union)(text.trim()) {
        Ok((_, g)) => Ok(g),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError::MalformedCard(
            f!("geometry \"{}\" cannot be read near \"{}\"", text.trim(), e.input),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Lowest precedence, `a : b : c`
fn union(i: &str) -> IResult<&str, Geometry> {
    let (i, first) = intersection(i)?;
    let (i, rest) = many0(preceded(tuple((space0, char(':'), space0)), intersection))(i)?;
    Ok((i, collect(first, rest, Geometry::Union)))
}

/// Juxtaposed factors, `a b c`
fn intersection(i: &str) -> IResult<&str, Geometry> {
    let (i, first) = factor(i)?;
    let (i, rest) = many0(preceded(space0, factor))(i)?;
    Ok((i, collect(first, rest, Geometry::Intersection)))
}

fn collect(first: Geometry, rest: Vec<Geometry>, wrap: fn(Vec<Geometry>) -> Geometry) -> Geometry {
    if rest.is_empty() {
        first
    } else {
        let mut items = Vec::with_capacity(rest.len() + 1);
        items.push(first);
        items.extend(rest);
        wrap(items)
    }
}

fn factor(i: &str) -> IResult<&str, Geometry> {
    alt((complement, group, surface))(i)
}

/// `( expression )`
fn group(i: &str) -> IResult<&str, Geometry> {
    delimited(pair(char('('), space0), union, pair(space0, char(')')))(i)
}

/// `#( expression )` or `#n`
fn complement(i: &str) -> IResult<&str, Geometry> {
    let (i, _) = pair(char('#'), space0)(i)?;
    alt((
        map(group, |g| Geometry::Complement(Box::new(g))),
        map(complete::u32, Geometry::CellComplement),
    ))(i)
}

/// Signed surface number with optional macrobody facet, `-10.2`
fn surface(i: &str) -> IResult<&str, Geometry> {
    let (i, sign) = opt(one_of("+-"))(i)?;
    let (i, id) = complete::u32(i)?;
    let (i, facet) = opt(preceded(char('.'), complete::u8))(i)?;
    let sense = match sign {
        Some('-') => Sense::Negative,
        _ => Sense::Positive,
    };
    Ok((i, Geometry::Surface(SurfaceRef { id, facet, sense })))
}

#[cfg(test)]
mod geometry_tests {
    use super::*;

    fn s(id: u32, sense: Sense) -> Geometry {
        Geometry::Surface(SurfaceRef {
            id,
            facet: None,
            sense,
        })
    }

    #[test]
    fn single_surface() {
        assert_eq!(parse_geometry("-1").unwrap(), s(1, Sense::Negative));
        assert_eq!(parse_geometry("+7").unwrap(), s(7, Sense::Positive));
    }

    #[test]
    fn precedence() {
        let g = parse_geometry("-1 2 : -3").unwrap();
        assert_eq!(
            g,
            Geometry::Union(vec![
                Geometry::Intersection(vec![s(1, Sense::Negative), s(2, Sense::Positive)]),
                s(3, Sense::Negative),
            ])
        );
        assert_eq!(g.to_string(), "-1 2 : -3");
    }

    #[test]
    fn groups_and_complements() {
        let g = parse_geometry("-1 ( 2:-3 ) #4 #( -5 6 )").unwrap();
        assert_eq!(g.surfaces().into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 5, 6]);
        assert_eq!(g.cell_complements().into_iter().collect::<Vec<_>>(), vec![4]);
        assert_eq!(g.to_string(), "-1 (2 : -3) #4 #(-5 6)");
    }

    #[test]
    fn facets() {
        let g = parse_geometry("-10.3 11").unwrap();
        let refs = g.surface_refs();
        assert_eq!(refs[0].facet, Some(3));
        assert_eq!(refs[0].to_string(), "-10.3");
    }

    #[test]
    fn malformed() {
        assert!(parse_geometry("-1 (2").is_err());
        assert!(parse_geometry("-1 x").is_err());
        assert!(parse_geometry(": 1").is_err());
    }
}
