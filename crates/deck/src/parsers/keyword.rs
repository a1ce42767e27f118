// nom parser combinators
use nom::bytes::complete::take_till1;
use nom::character::complete::{self, alpha1, char, one_of};
use nom::combinator::{all_consuming, opt};
use nom::sequence::preceded;
use nom::IResult;

use crate::error::ParseError;
use crate::format::f;
use crate::particle::Particle;

/// Leading token of a data card, e.g. `*f14:n,p`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Keyword {
    /// `*` or `+`
    pub prefix: Option<char>,
    /// Lower case alphabetic name
    pub name: String,
    pub number: Option<u32>,
    /// Text after `:`, lower case
    pub designator: Option<String>,
}

impl Keyword {
    /// Particles named by the designator, empty when absent
    pub fn particles(&self) -> Result<Vec<Particle>, ParseError> {
        match &self.designator {
            Some(d) => Particle::list(d),
            None => Ok(Vec::new()),
        }
    }

    /// Name with any prefix, e.g. `*tr`
    pub fn full_name(&self) -> String {
        match self.prefix {
            Some(c) => f!("{c}{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// `[*|+]name[number][:designator]`
pub(crate) fn keyword(i: &str) -> IResult<&str, Keyword> {
    let (i, prefix) = opt(one_of("*+"))(i)?;
    let (i, name) = alpha1(i)?;
    let (i, number) = opt(complete::u32)(i)?;
    let (i, designator) = opt(preceded(
        char(':'),
        take_till1(|c: char| c.is_whitespace() || c == '='),
    ))(i)?;

    Ok((
        i,
        Keyword {
            prefix,
            name: name.to_lowercase(),
            number,
            designator: designator.map(str::to_lowercase),
        },
    ))
}

/// Parse a whole token as a keyword
pub(crate) fn parse_keyword(token: &str) -> Result<Keyword, ParseError> {
    match all_consuming(keyword)(token) {
        Ok((_, k)) => Ok(k),
        Err(_) => Err(ParseError::MalformedCard(f!(
            "\"{token}\" is not a recognisable card name"
        ))),
    }
}
