use itertools::Itertools;

use crate::cards::{Boundary, SurfaceCard, SurfaceKind, SurfaceLink};
use crate::error::ParseError;
use crate::format::f;
use crate::parsers::{real, unsigned};

/// Parse a surface card `[*|+]j [n] mnemonic params`
pub(crate) fn parse_surface(text: &str) -> Result<SurfaceCard, ParseError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let first = tokens
        .first()
        .ok_or_else(|| ParseError::MalformedCard("empty surface card".into()))?;

    let (boundary, number) = match first.chars().next() {
        Some('*') => (Boundary::Reflecting, &first[1..]),
        Some('+') => (Boundary::White, &first[1..]),
        _ => (Boundary::None, *first),
    };
    let id = unsigned(number)
        .ok_or_else(|| ParseError::MalformedCard(f!("\"{first}\" is not a surface number")))?;

    // an integer before the mnemonic is a transform or periodic partner
    let mut k = 1;
    let mut link = None;
    if let Some(n) = tokens.get(1).and_then(|t| t.parse::<i64>().ok()) {
        let partner = u32::try_from(n.unsigned_abs())
            .map_err(|_| ParseError::MalformedCard(f!("surface {id} links to {n}, out of range")))?;
        link = Some(match n < 0 {
            true => SurfaceLink::Periodic(partner),
            false => SurfaceLink::Transform(partner),
        });
        k = 2;
    }

    let mnemonic = tokens
        .get(k)
        .ok_or_else(|| ParseError::MalformedCard(f!("surface {id} has no mnemonic")))?;
    let kind = SurfaceKind::from_mnemonic(mnemonic)
        .ok_or_else(|| ParseError::UnknownMnemonic(mnemonic.to_lowercase()))?;

    let params = tokens[k + 1..]
        .iter()
        .map(|t| real(t).ok_or_else(|| ParseError::bad(kind.mnemonic(), f!("\"{t}\" is not a number"))))
        .collect::<Result<Vec<f64>, ParseError>>()?;

    if !kind.arity().contains(&params.len()) {
        return Err(ParseError::WrongArity {
            what: f!("surface {id} ({})", kind.mnemonic()),
            expected: kind.arity().iter().join(" or "),
            found: params.len(),
        });
    }

    Ok(SurfaceCard {
        id,
        boundary,
        link,
        kind,
        params,
    })
}

#[cfg(test)]
mod surface_tests {
    use super::*;

    #[test]
    fn simple_sphere() {
        let s = parse_surface("1 so 5.0").unwrap();
        assert_eq!(s.id, 1);
        assert_eq!(s.kind, SurfaceKind::So);
        assert_eq!(s.params, vec![5.0]);
        assert_eq!(s.link, None);
    }

    #[test]
    fn boundary_and_transform() {
        let s = parse_surface("*20 3 PX 1.5").unwrap();
        assert_eq!(s.boundary, Boundary::Reflecting);
        assert_eq!(s.transform(), Some(3));
        assert_eq!(s.kind, SurfaceKind::Px);
    }

    #[test]
    fn periodic_partner() {
        let s = parse_surface("5 -6 py 10").unwrap();
        assert_eq!(s.periodic(), Some(6));
    }

    #[test]
    fn link_out_of_range() {
        assert!(parse_surface("5 -4294967296 py 10").is_err());
        assert!(parse_surface("5 4294967296 py 10").is_err());
        assert_eq!(parse_surface("5 4294967295 py 10").unwrap().transform(), Some(u32::MAX));
    }

    #[test]
    fn macrobody() {
        let s = parse_surface("10 rpp -1 1 -1 1 -1 1").unwrap();
        assert!(s.kind.is_macrobody());
        assert_eq!(s.kind.facets(), 6);
    }

    #[test]
    fn offset_cylinder() {
        let s = parse_surface("3 c/z 1 1 0.5").unwrap();
        assert_eq!(s.kind, SurfaceKind::OffsetCz);
    }

    #[test]
    fn failures() {
        assert_eq!(
            parse_surface("1 qq 5").unwrap_err(),
            ParseError::UnknownMnemonic("qq".into())
        );
        assert_eq!(
            parse_surface("1 p 1 2 3").unwrap_err(),
            ParseError::WrongArity {
                what: "surface 1 (p)".into(),
                expected: "4 or 9".into(),
                found: 3
            }
        );
        assert!(matches!(
            parse_surface("1 so x").unwrap_err(),
            ParseError::BadParameter { .. }
        ));
    }
}
