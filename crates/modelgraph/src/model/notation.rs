//! Parsers for the small textual notations embedded in model documents
//!
//! Multiplicities: `1`, `0..1`, `1..*`, `*`, `0..n`, `2..5`.
//! Attribute shorthand: `name`, `price : Float`, `+ price : Float`.

use chumsky::prelude::*;
use chumsky::text::ident;

use crate::core::chumsky_utils::{digits, dotted_name, inline_whitespace};
use crate::core::ValidationError;

use super::association::Multiplicity;
use super::class::{AttributeDef, AttributeType, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawBound<'src> {
    Unbounded,
    Number(&'src str),
}

fn bound_parser<'src>() -> impl Parser<'src, &'src str, RawBound<'src>> + Clone {
    choice((
        one_of("*nN").to(RawBound::Unbounded),
        digits().map(RawBound::Number),
    ))
}

fn multiplicity_parser<'src>(
) -> impl Parser<'src, &'src str, (RawBound<'src>, Option<RawBound<'src>>)> {
    let upper = inline_whitespace()
        .ignore_then(just(".."))
        .ignore_then(inline_whitespace())
        .ignore_then(bound_parser());

    inline_whitespace()
        .ignore_then(bound_parser())
        .then(upper.or_not())
        .then_ignore(inline_whitespace())
        .then_ignore(end())
}

/// Parse multiplicity text into a range
pub fn parse_multiplicity(text: &str) -> Result<Multiplicity, ValidationError> {
    let (lower, upper) = multiplicity_parser()
        .parse(text)
        .into_result()
        .map_err(|_| ValidationError::invalid_multiplicity(text, "expected N, N..M, N..* or *"))?;

    let number = |digits: &str| {
        digits
            .parse::<u32>()
            .map_err(|_| ValidationError::invalid_multiplicity(text, "bound out of range"))
    };

    match (lower, upper) {
        (RawBound::Unbounded, None) => Ok(Multiplicity::many()),
        (RawBound::Unbounded, Some(_)) => Err(ValidationError::invalid_multiplicity(
            text,
            "lower bound cannot be unbounded",
        )),
        (RawBound::Number(n), None) => match number(n)? {
            0 => Err(ValidationError::invalid_multiplicity(
                text,
                "upper bound must be positive",
            )),
            n => Ok(Multiplicity::exactly(n)),
        },
        (RawBound::Number(lower), Some(RawBound::Unbounded)) => {
            Ok(Multiplicity::at_least(number(lower)?))
        }
        (RawBound::Number(lower), Some(RawBound::Number(upper))) => {
            let (lower, upper) = (number(lower)?, number(upper)?);
            if upper == 0 {
                Err(ValidationError::invalid_multiplicity(
                    text,
                    "upper bound must be positive",
                ))
            } else if lower > upper {
                Err(ValidationError::invalid_multiplicity(
                    text,
                    "lower bound exceeds upper bound",
                ))
            } else {
                Ok(Multiplicity::range(lower, upper))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ParsedAttribute<'src> {
    visibility: Option<Visibility>,
    name: &'src str,
    type_name: Option<&'src str>,
}

fn attribute_parser<'src>() -> impl Parser<'src, &'src str, ParsedAttribute<'src>> {
    let ws = inline_whitespace();

    let visibility = one_of("+-#")
        .map(Visibility::from_symbol)
        .then_ignore(ws.clone())
        .or_not()
        .map(Option::flatten);

    let type_annotation = ws
        .clone()
        .ignore_then(just(':'))
        .ignore_then(ws.clone())
        .ignore_then(dotted_name())
        .or_not();

    ws.clone()
        .ignore_then(visibility)
        .then(ident())
        .then(type_annotation)
        .then_ignore(ws)
        .then_ignore(end())
        .map(|((visibility, name), type_name)| ParsedAttribute {
            visibility,
            name,
            type_name,
        })
}

/// Parse attribute shorthand; the type defaults to `String` and the
/// visibility to private
pub fn parse_attribute(text: &str) -> Result<AttributeDef, ValidationError> {
    let parsed = attribute_parser()
        .parse(text)
        .into_result()
        .map_err(|_| ValidationError::InvalidAttribute {
            text: text.to_string(),
        })?;

    let ty = parsed.type_name.map(AttributeType::parse).unwrap_or_default();
    Ok(AttributeDef::new(parsed.name, ty).with_visibility(parsed.visibility.unwrap_or_default()))
}
