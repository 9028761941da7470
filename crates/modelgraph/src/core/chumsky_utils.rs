//! Shared chumsky combinators for the model notations

use chumsky::prelude::*;

/// Spaces and tabs between tokens of a single-line notation
pub fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    one_of(" \t").repeated().ignored()
}

/// Decimal digits, returned as the matched slice
pub fn digits<'src>() -> impl Parser<'src, &'src str, &'src str> + Clone {
    text::digits(10).at_least(1).to_slice()
}

/// A name made of letters, digits, `_` and `.` that does not start with a digit
///
/// Accepts qualified type names such as `shop.Status`.
pub fn dotted_name<'src>() -> impl Parser<'src, &'src str, &'src str> + Clone {
    any()
        .filter(|c: &char| c.is_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_alphanumeric() || *c == '_' || *c == '.')
                .repeated(),
        )
        .to_slice()
}
