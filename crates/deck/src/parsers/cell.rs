use crate::cards::{
    expand_run_length, CellCard, CellParams, Fill, FillArray, FillSpec, FillTransform, Param,
    Trcl,
};
use crate::error::ParseError;
use crate::format::f;
use crate::particle::Particle;
use crate::parsers::{
    index_range, keyed_params, parse_geometry, real, split_tokens, transform_values, unsigned,
    MAX_EXPANDED_VALUES,
};

/// Parse a cell card `j m [d] geom params` or `j LIKE n BUT params`
pub(crate) fn parse_cell(text: &str) -> Result<CellCard, ParseError> {
    let tokens = split_tokens(text);
    let (lead, params) = keyed_params(&tokens)?;

    let first = lead
        .first()
        .ok_or_else(|| ParseError::MalformedCard("cell card has no number".into()))?;
    let id = unsigned(first)
        .ok_or_else(|| ParseError::MalformedCard(f!("\"{first}\" is not a cell number")))?;

    let mut cell = CellCard {
        id,
        material: 0,
        density: None,
        like: None,
        geometry: None,
        params: CellParams::default(),
    };

    let is_like = lead.get(1).is_some_and(|t| t.eq_ignore_ascii_case("like"));
    if is_like {
        let target = lead.get(2).and_then(|t| unsigned(t));
        let but = lead.get(3).is_some_and(|t| t.eq_ignore_ascii_case("but"));
        match (target, but, lead.len()) {
            (Some(n), true, 4) => cell.like = Some(n),
            _ => {
                return Err(ParseError::MalformedCard(f!(
                    "cell {id} should read \"{id} like n but ...\""
                )))
            }
        }
    } else {
        let material = lead.get(1).ok_or_else(|| ParseError::WrongArity {
            what: f!("cell {id}"),
            expected: "material and geometry".into(),
            found: 0,
        })?;
        cell.material = unsigned(material)
            .ok_or_else(|| ParseError::bad("material", f!("\"{material}\" is not a material number")))?;

        let mut next = 2;
        if cell.material != 0 {
            let density = lead.get(2).ok_or_else(|| ParseError::bad("density", "missing"))?;
            let density = real(density)
                .ok_or_else(|| ParseError::bad("density", f!("\"{density}\" is not a number")))?;
            if density == 0.0 {
                return Err(ParseError::bad("density", "zero density on a material cell"));
            }
            cell.density = Some(density);
            next = 3;
        }

        let geometry = lead[next.min(lead.len())..].join(" ");
        if geometry.trim().is_empty() {
            return Err(ParseError::MalformedCard(f!("cell {id} has no geometry")));
        }
        cell.geometry = Some(parse_geometry(&geometry)?);
    }

    for param in params {
        apply_param(&mut cell.params, param)?;
    }

    Ok(cell)
}

/// Store one keyword parameter in its typed slot
fn apply_param(params: &mut CellParams, param: Param) -> Result<(), ParseError> {
    let key = param.key.clone();

    if let Some(designator) = key.strip_prefix("imp:") {
        let particles = Particle::list(designator)?;
        let value = single_real(&param)?;
        if value < 0.0 {
            return Err(ParseError::bad(key, "importance cannot be negative"));
        }
        params.importances.push((particles, value));
        return Ok(());
    }

    match key.as_str() {
        "u" => {
            let universe = single_integer(&param)?;
            if u32::try_from(universe.unsigned_abs()).is_err() {
                return Err(ParseError::bad("u", f!("universe {universe} is out of range")));
            }
            params.universe = Some(universe);
        }
        "lat" => params.lat = Some(single_integer(&param)?),
        "fill" | "*fill" => params.fill = Some(parse_fill(key.starts_with('*'), &param.values)?),
        "trcl" | "*trcl" => params.trcl = Some(parse_trcl(key.starts_with('*'), &param.values)?),
        "vol" => params.vol = Some(single_real(&param)?),
        "tmp" => params.tmp = Some(single_real(&param)?),
        _ => params.other.push(param),
    }

    Ok(())
}

fn single_real(param: &Param) -> Result<f64, ParseError> {
    match param.values.as_slice() {
        [v] => real(v).ok_or_else(|| ParseError::bad(&param.key, f!("\"{v}\" is not a number"))),
        values => Err(ParseError::WrongArity {
            what: param.key.clone(),
            expected: "1".into(),
            found: values.len(),
        }),
    }
}

fn single_integer(param: &Param) -> Result<i64, ParseError> {
    match param.values.as_slice() {
        [v] => v
            .parse::<i64>()
            .map_err(|_| ParseError::bad(&param.key, f!("\"{v}\" is not an integer"))),
        values => Err(ParseError::WrongArity {
            what: param.key.clone(),
            expected: "1".into(),
            found: values.len(),
        }),
    }
}

/// `fill=u`, `fill=u (n)`, `fill=u (o1 o2 o3 ...)`, or a lattice array
///
/// Array lengths are not checked here so that a mismatch is reported once,
/// with the lattice it belongs to.
fn parse_fill(degrees: bool, values: &[String]) -> Result<Fill, ParseError> {
    let first = values.first().ok_or_else(|| ParseError::bad("fill", "missing value"))?;

    if index_range(first).is_some() {
        let ranges = values
            .iter()
            .take(3)
            .map(|t| index_range(t).ok_or_else(|| ParseError::bad("fill", f!("\"{t}\" is not an index range"))))
            .collect::<Result<Vec<_>, _>>()?;
        let ranges: [(i64, i64); 3] = ranges.try_into().map_err(|_| ParseError::WrongArity {
            what: "fill".into(),
            expected: "3 index ranges".into(),
            found: values.len().min(3),
        })?;
        let mut array = FillArray {
            ranges,
            universes: Vec::new(),
        };
        match array.checked_required() {
            Some(n) if n <= MAX_EXPANDED_VALUES => (),
            _ => {
                return Err(ParseError::bad(
                    "fill",
                    f!("{} declares more than {MAX_EXPANDED_VALUES} elements", array.declaration()),
                ))
            }
        }
        array.universes = expand_run_length(&values[3..])?;
        return Ok(Fill {
            degrees,
            spec: FillSpec::Array(array),
        });
    }

    let joined = values.join(" ");
    let (universe, rest) = match joined.split_once('(') {
        Some((u, rest)) => (u.trim(), Some(rest)),
        None => (joined.trim(), None),
    };
    let universe = unsigned(universe)
        .ok_or_else(|| ParseError::bad("fill", f!("\"{universe}\" is not a universe number")))?;

    let transform = match rest {
        None => None,
        Some(rest) => {
            let inner = rest
                .strip_suffix(')')
                .ok_or_else(|| ParseError::bad("fill", "unclosed transform"))?;
            let tokens: Vec<&str> = inner.split_whitespace().collect();
            match tokens.as_slice() {
                [n] if unsigned(n).is_some() => unsigned(n).map(FillTransform::Id),
                _ => Some(FillTransform::Inline(
                    tokens
                        .iter()
                        .map(|t| real(t).ok_or_else(|| ParseError::bad("fill", f!("\"{t}\" is not a number"))))
                        .collect::<Result<Vec<f64>, _>>()?,
                )),
            }
        }
    };

    Ok(Fill {
        degrees,
        spec: FillSpec::Single {
            universe,
            transform,
        },
    })
}

/// `trcl=n` or `trcl=(o1 o2 o3 [rotation] [m])`
fn parse_trcl(degrees: bool, values: &[String]) -> Result<Trcl, ParseError> {
    let joined = values.join(" ").replace(['(', ')'], " ");
    let tokens: Vec<&str> = joined.split_whitespace().collect();

    if let [n] = tokens.as_slice() {
        if let Some(id) = unsigned(n) {
            return Ok(Trcl::Id(id));
        }
    }

    let numbers = tokens
        .iter()
        .map(|t| real(t).ok_or_else(|| ParseError::bad("trcl", f!("\"{t}\" is not a number"))))
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(Trcl::Inline(transform_values("trcl", 0, degrees, &numbers)?))
}

#[cfg(test)]
mod cell_tests {
    use super::*;
    use crate::cards::Sense;

    #[test]
    fn void_cell() {
        let c = parse_cell("2 0 1 imp:n=0").unwrap();
        assert!(c.is_void());
        assert_eq!(c.density, None);
        assert!(c.is_graveyard(Particle::Neutron));
        let refs = c.geometry.unwrap().surface_refs();
        assert_eq!(refs[0].sense, Sense::Positive);
    }

    #[test]
    fn material_cell_with_params() {
        let c = parse_cell("10 3 -7.8 -1 2 imp:n,p=1 u=4 vol=12.5 tmp=2.5e-8 pwt=1").unwrap();
        assert_eq!(c.material, 3);
        assert_eq!(c.density, Some(-7.8));
        assert_eq!(c.universe(), 4);
        assert_eq!(c.importance(Particle::Photon), Some(1.0));
        assert_eq!(c.params.vol, Some(12.5));
        assert_eq!(c.params.tmp, Some(2.5e-8));
        assert_eq!(c.params.get("pwt").unwrap().values, vec!["1"]);
    }

    #[test]
    fn like_but() {
        let c = parse_cell("5 like 2 but mat=4 rho=-2.0").unwrap();
        assert_eq!(c.like, Some(2));
        assert!(c.geometry.is_none());
        assert_eq!(c.like_material(), Some(4));
        assert!(parse_cell("5 like 2 mat=4").is_err());
    }

    #[test]
    fn single_fill_with_transform() {
        let c = parse_cell("1 0 -1 fill=3 (2)").unwrap();
        let fill = c.params.fill.unwrap();
        assert_eq!(fill.universes(), vec![3]);
        assert_eq!(fill.transform_id(), Some(2));

        let c = parse_cell("1 0 -1 *fill=3 (0 0 1)").unwrap();
        let fill = c.params.fill.unwrap();
        assert!(fill.degrees);
        assert!(matches!(
            fill.spec,
            FillSpec::Single {
                transform: Some(FillTransform::Inline(_)),
                ..
            }
        ));
    }

    #[test]
    fn lattice_fill_is_lenient() {
        let c = parse_cell("3 0 -5 lat=1 u=2 fill=-1:1 -1:1 0:0 1 7r").unwrap();
        assert!(c.is_lattice());
        match c.params.fill.unwrap().spec {
            FillSpec::Array(a) => {
                assert_eq!(a.required(), 9);
                assert_eq!(a.provided(), 8);
            }
            _ => panic!("expected an array fill"),
        }
    }

    #[test]
    fn oversized_lattice_rejected() {
        let err = parse_cell("3 0 -5 lat=1 u=2 fill=-9223372036854775807:9223372036854775807 0:0 0:0 3")
            .unwrap_err();
        assert!(matches!(err, ParseError::BadParameter { ref key, .. } if key == "fill"));

        let err = parse_cell("3 0 -5 lat=1 u=2 fill=0:9999 0:9999 0:9999 3").unwrap_err();
        assert!(matches!(err, ParseError::BadParameter { .. }));
    }

    #[test]
    fn universe_must_fit() {
        assert_eq!(parse_cell("1 0 -1 u=-4294967295").unwrap().universe(), u32::MAX);
        assert!(parse_cell("1 0 -1 u=4294967296").is_err());
    }

    #[test]
    fn cell_transforms() {
        let c = parse_cell("1 0 -1 trcl=5").unwrap();
        assert_eq!(c.params.trcl, Some(Trcl::Id(5)));

        let c = parse_cell("1 0 -1 trcl=(1 2 3)").unwrap();
        match c.params.trcl.unwrap() {
            Trcl::Inline(t) => {
                assert_eq!(t.displacement, [1.0, 2.0, 3.0]);
                assert_eq!(t.rotation, None);
            }
            _ => panic!("expected an inline transform"),
        }

        assert!(parse_cell("1 0 -1 trcl=(1 2 3 4)").is_err());
    }

    #[test]
    fn bad_cells() {
        assert!(matches!(
            parse_cell("1 1 0 -1").unwrap_err(),
            ParseError::BadParameter { .. }
        ));
        assert!(matches!(
            parse_cell("1 0").unwrap_err(),
            ParseError::MalformedCard(_)
        ));
        assert!(parse_cell("1 0 -1 imp:j=1").is_err());
        assert!(parse_cell("1 0 -1 imp:n=-1").is_err());
        assert!(parse_cell("x 0 -1").is_err());
    }

    #[test]
    fn conflicting_importances_on_card() {
        let c = parse_cell("1 0 -1 imp:n=1 imp:n,p=2").unwrap();
        assert_eq!(c.params.conflicting_importances(), vec![Particle::Neutron]);
        assert_eq!(c.importance(Particle::Neutron), Some(2.0));
    }
}
