/*!
  The immutable input to the generator: either "divide by this constant" or
  an explicit fraction `numerator / 2^k`. Construction validates everything
  up front (divisor at least 1, denominator an exact power of two, numerator
  a non-negative integer no larger than the denominator), so a `Request` in
  hand is always generatable.

  `FromStr` accepts the textual forms a front end would hand over:
  `"3.1416"`, `"-121"` (force the fraction approximation even inside a
  template range), `"17/256"`, `"17 256"`.
*/

use std::str::FromStr;

use nom::{
  branch::alt,
  character::complete::{char as one_char, digit1, space0, space1},
  combinator::{all_consuming, map, map_res, opt, recognize},
  sequence::{delimited, pair, separated_pair},
  IResult,
};

use crate::codegen::MAX_POWER;
use crate::error::Error;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Request {
  Division {
    divisor: f64,
    /// Skip the range templates and always approximate by a fraction.
    force_fraction: bool,
  },
  Fraction {
    numerator: u32,
    denominator: u32,
  },
}

impl Request {
  /// A request to divide by `divisor`. A divisor at or below -1 selects
  /// forced-fraction mode for its magnitude; anything else below 1 is
  /// rejected.
  pub fn division(divisor: f64) -> Result<Request, Error> {
    if divisor <= -1.0 {
      Ok(Request::Division { divisor: -divisor, force_fraction: true })
    } else if divisor < 1.0 {
      Err(Error::DivisorTooSmall)
    } else {
      Ok(Request::Division { divisor, force_fraction: false })
    }
  }

  /// A request to multiply by `numerator / denominator`. Arguments arrive
  /// as floats, the way a front end parses them; the validation rules
  /// reject anything that is not `integer / 2^k` with the numerator no
  /// larger than the denominator.
  pub fn fraction(numerator: f64, denominator: f64) -> Result<Request, Error> {
    if log2_exact(denominator).is_none() {
      return Err(Error::DenominatorNotPowerOfTwo);
    }
    if numerator > denominator {
      return Err(Error::NumeratorExceedsDenominator);
    }
    if numerator < 0.0 || numerator.fract() != 0.0 {
      return Err(Error::NumeratorNotInteger);
    }
    Ok(Request::Fraction {
      numerator: numerator as u32,
      denominator: denominator as u32,
    })
  }
}

/// The exponent `e` with `value == 2^e`, if there is one in the working
/// range.
pub(crate) fn log2_exact(value: f64) -> Option<u32> {
  (0..=MAX_POWER).find(|exponent| value == (1u64 << exponent) as f64)
}

// A decimal number with an optional fractional part, e.g. `17` or `3.1416`.
fn number(input: &str) -> IResult<&str, f64> {
  map_res(
    recognize(pair(digit1, opt(pair(one_char('.'), digit1)))),
    |text: &str| text.parse::<f64>(),
  )(input)
}

fn fraction_request(input: &str) -> IResult<&str, Result<Request, Error>> {
  map(
    separated_pair(
      number,
      alt((delimited(space0, one_char('/'), space0), map(space1, |_| '/'))),
      number,
    ),
    |(numerator, denominator)| Request::fraction(numerator, denominator),
  )(input)
}

fn division_request(input: &str) -> IResult<&str, Result<Request, Error>> {
  map(
    pair(opt(one_char('-')), number),
    |(sign, magnitude)| match sign {
      Some(_) => Request::division(-magnitude),
      None    => Request::division(magnitude),
    },
  )(input)
}

impl FromStr for Request {
  type Err = Error;

  fn from_str(text: &str) -> Result<Request, Error> {
    let parser = all_consuming(delimited(
      space0,
      alt((fraction_request, division_request)),
      space0,
    ));
    match parser(text) {
      Ok((_rest, request)) => request,
      Err(_) => Err(Error::MalformedRequest),
    }
  }
}
