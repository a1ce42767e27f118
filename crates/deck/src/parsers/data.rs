use crate::cards::{
    BurnCard, CardData, CutoffCard, Detector, DistributionCard, DxtranCard, DxtranSphere,
    ImportanceCard, KcodeCard, KsrcCard, MeshCard, ModeCard, OtherCard, Param, PhysicsCard,
    SourceCard, SourceValue, TallyCard, TallyModifier, TallyOptionCard, TransformCard,
    WeightWindowCard,
};
use crate::error::ParseError;
use crate::format::f;
use crate::particle::Particle;
use crate::parsers::{
    expand_shorthand, jumpable_values, keyed_params, parse_keyword, parse_material,
    parse_thermal, real, split_tokens, unsigned, Keyword,
};
use crate::rotation;

/// Cards that modify a numbered tally
const TALLY_OPTIONS: [&str; 18] = [
    "e", "t", "c", "fm", "fs", "fq", "fc", "sd", "de", "df", "em", "tm", "cm", "cf", "sf", "fu",
    "ft", "tf",
];

const WEIGHT_WINDOWS: [&str; 6] = ["wwn", "wwe", "wwp", "wwg", "wwge", "wwgt"];

/// Parse any card from the data block
pub(crate) fn parse_data(text: &str) -> Result<CardData, ParseError> {
    let raw: Vec<&str> = text.split_whitespace().collect();
    let first = raw
        .first()
        .ok_or_else(|| ParseError::MalformedCard("empty data card".into()))?;
    let keyword = parse_keyword(first)?;
    let rest = &raw[1..];

    let data = match (keyword.prefix, keyword.name.as_str()) {
        (None, "m") => {
            let id = required_number(&keyword)?;
            CardData::Material(parse_material(id, &split_tokens(&rest.join(" ")))?)
        }
        (None, "mt") => {
            let id = required_number(&keyword)?;
            CardData::ThermalScattering(parse_thermal(id, &split_tokens(&rest.join(" ")))?)
        }
        (None | Some('*'), "tr") => {
            let id = required_number(&keyword)?;
            let values = reals(&keyword, rest)?;
            CardData::Transform(transform_values(
                &f!("{}{id}", keyword.full_name()),
                id,
                keyword.prefix.is_some(),
                &values,
            )?)
        }
        (_, "f") => CardData::Tally(parse_tally(&keyword, rest)?),
        (None, "fmesh" | "mesh") => {
            let (lead, params) = keyed_params(&split_tokens(&rest.join(" ")))?;
            if !lead.is_empty() {
                return Err(ParseError::MalformedCard(f!(
                    "{} entries must be keyword=value",
                    keyword.name
                )));
            }
            CardData::Mesh(MeshCard {
                keyword: keyword.name.clone(),
                number: keyword.number,
                particles: keyword.particles()?,
                params,
            })
        }
        (None, "mode") => {
            if rest.is_empty() {
                return Err(ParseError::WrongArity {
                    what: "mode".into(),
                    expected: "at least 1 particle".into(),
                    found: 0,
                });
            }
            let particles = rest
                .iter()
                .map(|t| Particle::list(t))
                .collect::<Result<Vec<_>, _>>()?
                .concat();
            CardData::Mode(ModeCard { particles })
        }
        (None, "phys") => {
            let particle = *keyword
                .particles()?
                .first()
                .ok_or_else(|| ParseError::MalformedCard("phys needs a particle designator".into()))?;
            CardData::Physics(PhysicsCard {
                particle,
                values: jumpable_values(rest)?,
            })
        }
        (None, "cut") => CardData::Cutoff(CutoffCard {
            particles: designated(&keyword)?,
            values: jumpable_values(rest)?,
        }),
        (None, "imp") => CardData::Importance(ImportanceCard {
            particles: designated(&keyword)?,
            values: expand_shorthand(rest)?,
        }),
        (None, name) if WEIGHT_WINDOWS.contains(&name) => {
            CardData::WeightWindow(WeightWindowCard {
                keyword: keyword.name.clone(),
                index: keyword.number,
                particles: keyword.particles()?,
                values: strings(rest),
            })
        }
        (None, "sdef") => CardData::Source(parse_source(rest)?),
        (None, "si" | "sp" | "sb" | "ds") => {
            CardData::Distribution(parse_distribution(&keyword, rest)?)
        }
        (_, name) if TALLY_OPTIONS.contains(&name) => CardData::TallyOption(TallyOptionCard {
            keyword: keyword.full_name(),
            tally: keyword.number.unwrap_or(0),
            values: strings(rest),
        }),
        (None, "kcode") => CardData::Kcode(KcodeCard {
            values: jumpable_values(rest)?,
        }),
        (None, "ksrc") => {
            let values = reals(&keyword, rest)?;
            if values.len() % 3 != 0 {
                return Err(ParseError::WrongArity {
                    what: "ksrc".into(),
                    expected: "x y z triples".into(),
                    found: values.len(),
                });
            }
            CardData::Ksrc(KsrcCard {
                points: values.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect(),
            })
        }
        (None, "burn") => {
            let (lead, params) = keyed_params(&split_tokens(&rest.join(" ")))?;
            if !lead.is_empty() {
                return Err(ParseError::MalformedCard("burn entries must be keyword=value".into()));
            }
            CardData::Burn(BurnCard { params })
        }
        (None, "dxt") => CardData::Dxtran(parse_dxtran(&keyword, rest)?),
        _ => CardData::Other(OtherCard {
            keyword: keyword.full_name(),
            number: keyword.number,
            particles: keyword.particles().unwrap_or_default(),
            values: strings(rest),
        }),
    };

    Ok(data)
}

fn required_number(keyword: &Keyword) -> Result<u32, ParseError> {
    keyword
        .number
        .ok_or_else(|| ParseError::MalformedCard(f!("{} needs a number", keyword.full_name())))
}

/// Designator particles, an error when there are none
fn designated(keyword: &Keyword) -> Result<Vec<Particle>, ParseError> {
    let particles = keyword.particles()?;
    if particles.is_empty() {
        return Err(ParseError::MalformedCard(f!(
            "{} needs a particle designator",
            keyword.full_name()
        )));
    }
    Ok(particles)
}

fn strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

fn reals(keyword: &Keyword, tokens: &[&str]) -> Result<Vec<f64>, ParseError> {
    tokens
        .iter()
        .map(|t| {
            real(t).ok_or_else(|| ParseError::bad(keyword.full_name(), f!("\"{t}\" is not a number")))
        })
        .collect()
}

/// Build a transform from `o1 o2 o3 [rotation] [m]`
///
/// A rotation of six entries gives the first two rows, the third completing
/// a right-handed set.
pub(crate) fn transform_values(
    what: &str,
    id: u32,
    degrees: bool,
    values: &[f64],
) -> Result<TransformCard, ParseError> {
    let mut reference = 1;

    let rotation = match values.len() {
        3 => None,
        9 => {
            let mut rows = [0.0; 6];
            rows.copy_from_slice(&values[3..9]);
            match degrees {
                true => {
                    let cosines = rows.map(|a| a.to_radians().cos());
                    Some(rotation::to_degrees(&rotation::complete_rows(&cosines)))
                }
                false => Some(rotation::complete_rows(&rows)),
            }
        }
        12 | 13 => {
            let mut full = [0.0; 9];
            full.copy_from_slice(&values[3..12]);
            if let Some(m) = values.get(12) {
                reference = match *m {
                    m if m == 1.0 => 1,
                    m if m == -1.0 => -1,
                    m => return Err(ParseError::bad(what, f!("reference {m} must be 1 or -1"))),
                };
            }
            Some(full)
        }
        n => {
            return Err(ParseError::WrongArity {
                what: what.to_string(),
                expected: "3, 9, 12, or 13".into(),
                found: n,
            })
        }
    };

    Ok(TransformCard {
        id,
        degrees,
        displacement: [values[0], values[1], values[2]],
        rotation,
        reference,
    })
}

/// `Fn:<pl>` bins or, for type 5, detector points
fn parse_tally(keyword: &Keyword, rest: &[&str]) -> Result<TallyCard, ParseError> {
    let number = required_number(keyword)?;
    let modifier = match keyword.prefix {
        Some('*') => TallyModifier::Star,
        Some('+') => TallyModifier::Plus,
        _ => TallyModifier::None,
    };

    let mut tally = TallyCard {
        number,
        modifier,
        particles: keyword.particles()?,
        bins: Vec::new(),
        detectors: Vec::new(),
        values: strings(rest),
    };

    if number % 10 == 5 {
        let numbers = rest
            .iter()
            .filter(|t| !t.eq_ignore_ascii_case("nd"))
            .map(|t| real(t).ok_or_else(|| ParseError::bad(f!("f{number}"), f!("\"{t}\" is not a number"))))
            .collect::<Result<Vec<f64>, _>>()?;
        if numbers.len() % 4 != 0 || numbers.is_empty() {
            return Err(ParseError::WrongArity {
                what: f!("f{number}"),
                expected: "x y z R groups".into(),
                found: numbers.len(),
            });
        }
        tally.detectors = numbers
            .chunks_exact(4)
            .map(|c| Detector {
                position: [c[0], c[1], c[2]],
                radius: c[3],
            })
            .collect();
        return Ok(tally);
    }

    // lattice index brackets and level markers carry no bin numbers
    let mut bracket = false;
    for mut token in rest.iter().flat_map(|t| t.split(['(', ')'])) {
        if bracket {
            bracket = !token.contains(']');
            continue;
        }
        if let Some((before, after)) = token.split_once('[') {
            bracket = !after.contains(']');
            token = before;
        }
        if token.is_empty() || token == "<" || token.eq_ignore_ascii_case("t") {
            continue;
        }
        // macrobody facets, `10.2`, count as their body
        let body = token.split_once('.').map(|(b, _)| b).unwrap_or(token);
        let bin = unsigned(body)
            .ok_or_else(|| ParseError::bad(f!("f{number}"), f!("\"{token}\" is not a bin")))?;
        tally.bins.push(bin);
    }

    Ok(tally)
}

/// `SDEF var=value ...`
fn parse_source(rest: &[&str]) -> Result<SourceCard, ParseError> {
    let (lead, params) = keyed_params(&split_tokens(&rest.join(" ")))?;
    if !lead.is_empty() {
        return Err(ParseError::MalformedCard("sdef entries must be keyword=value".into()));
    }

    let distribution = |t: &str| match t.chars().next() {
        Some('d' | 'D') => unsigned(&t[1..]),
        _ => None,
    };

    let variables = params
        .into_iter()
        .map(|Param { key, values }| {
            let value = match values.as_slice() {
                [v] if distribution(v.as_str()).is_some() => {
                    SourceValue::Distribution(distribution(v.as_str()).unwrap_or_default())
                }
                [var, d]
                    if var.len() > 1
                        && var.starts_with(['f', 'F'])
                        && distribution(d.as_str()).is_some() =>
                {
                    SourceValue::Dependent {
                        variable: var[1..].to_lowercase(),
                        distribution: distribution(d.as_str()).unwrap_or_default(),
                    }
                }
                _ => match values.iter().map(|v| real(v)).collect::<Option<Vec<f64>>>() {
                    Some(numbers) => SourceValue::Fixed(numbers),
                    None => SourceValue::Text(values.join(" ").to_lowercase()),
                },
            };
            (key, value)
        })
        .collect();

    Ok(SourceCard { variables })
}

/// `SIn`, `SPn`, `SBn`, `DSn` with an optional option letter
fn parse_distribution(keyword: &Keyword, rest: &[&str]) -> Result<DistributionCard, ParseError> {
    let number = required_number(keyword)?;

    let option = rest
        .first()
        .filter(|t| t.len() == 1 && t.chars().all(|c| c.is_ascii_alphabetic()))
        .and_then(|t| t.chars().next())
        .map(|c| c.to_ascii_lowercase());
    let body = &rest[option.map_or(0, |_| 1)..];

    // lists may hold cell paths and other non-numeric entries
    let values = match option {
        Some('l') => body.iter().filter_map(|t| real(t)).collect(),
        _ => expand_shorthand(body)?,
    };

    Ok(DistributionCard {
        keyword: keyword.name.clone(),
        number,
        option,
        values,
    })
}

/// `DXT:<pl>` spheres of five entries and up to three trailing values
fn parse_dxtran(keyword: &Keyword, rest: &[&str]) -> Result<DxtranCard, ParseError> {
    let numbers = reals(keyword, rest)?;
    let trailing = match numbers.len() % 5 {
        0 => 0,
        3 if numbers.len() > 5 => 3,
        _ => {
            return Err(ParseError::WrongArity {
                what: "dxt".into(),
                expected: "x y z ri ro groups".into(),
                found: numbers.len(),
            })
        }
    };
    let split = numbers.len() - trailing;

    Ok(DxtranCard {
        particles: designated(keyword)?,
        spheres: numbers[..split]
            .chunks_exact(5)
            .map(|c| DxtranSphere {
                centre: [c[0], c[1], c[2]],
                inner: c[3],
                outer: c[4],
            })
            .collect(),
        trailing: numbers[split..].to_vec(),
    })
}
