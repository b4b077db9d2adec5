/*!
  The search for a fraction `numerator / 2^exponent` equivalent to dividing
  by an arbitrary constant, and the survey of every candidate that search
  considers.

  There is no closed-form error bound here: each candidate is verified by
  brute force against all 256 representable inputs, which makes the search
  result an unconditional guarantee for the whole pipeline. The budget is
  small and fixed: at most 25 denominators of 256 checks each.
*/

use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};

use crate::codegen::{decompose, MAX_POWER};
use crate::error::Error;

/// A fraction proposed as a stand-in for dividing by `divisor`. The
/// numerator never exceeds the denominator, so the multiply's result still
/// fits in 8 bits after the final alignment shift. `exact` marks the
/// power-of-two fast path (numerator 1, nothing to verify).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Candidate {
  pub numerator: u32,
  pub exponent: u32,
  pub exact: bool,
}

impl Candidate {
  pub fn denominator(&self) -> u32 {
    1 << self.exponent
  }
}

/**
  Finds the smallest denominator exponent whose derived numerator divides
  exactly like `divisor` does, for every 8-bit input.

  For each exponent 0..=24 the candidate numerator is
  `floor(denominator / divisor) + 1`; a divisor that *is* the denominator
  short-circuits to the exact candidate instead. The first exponent whose
  candidate is exact or fully verified wins; larger ones are never tried.
*/
pub fn find_approximation(divisor: f64) -> Result<Candidate, Error> {
  if !(divisor >= 1.0) {
    return Err(Error::DivisorTooSmall);
  }

  for exponent in 0..=MAX_POWER {
    let denominator = 1u32 << exponent;

    if divisor == denominator as f64 {
      return Ok(Candidate { numerator: 1, exponent, exact: true });
    }

    let numerator = (denominator as f64 / divisor) as u32 + 1;
    if first_failure(divisor, numerator, denominator).is_none() {
      return Ok(Candidate { numerator, exponent, exact: false });
    }
  }

  Err(Error::ApproximationExhausted(divisor))
}

/// Checks `floor(j / divisor) == floor(numerator * j / denominator)` for
/// every input `j`, returning the first `j` where the candidate is wrong.
fn first_failure(divisor: f64, numerator: u32, denominator: u32) -> Option<u8> {
  for j in 0u32..256 {
    let expected = (j as f64 / divisor) as u64;
    let actual = numerator as u64 * j as u64 / denominator as u64;
    if expected != actual {
      return Some(j as u8);
    }
  }
  None
}

/// One row of the survey: the candidate at a given exponent, whether it
/// verified, and where it first went wrong if not.
#[derive(Clone, PartialEq, Debug)]
pub struct SurveyRow {
  pub exponent: u32,
  pub numerator: u32,
  pub exact: bool,
  pub failure: Option<u8>,
}

/// Every approximation the search would consider for `divisor`, in search
/// order. Displays as a table.
#[derive(Clone, PartialEq, Debug)]
pub struct Survey {
  pub divisor: f64,
  pub rows: Vec<SurveyRow>,
}

/**
  Tabulates all 25 candidate fractions for `divisor`, without stopping at
  the first success. Useful for seeing how close the rejected candidates
  came and which input breaks each of them.
*/
pub fn survey(divisor: f64) -> Result<Survey, Error> {
  if !(divisor >= 1.0) {
    return Err(Error::DivisorTooSmall);
  }

  let mut rows = Vec::with_capacity(MAX_POWER as usize + 1);
  for exponent in 0..=MAX_POWER {
    let denominator = 1u32 << exponent;

    if divisor == denominator as f64 {
      rows.push(SurveyRow { exponent, numerator: 1, exact: true, failure: None });
      continue;
    }

    let numerator = (denominator as f64 / divisor) as u32 + 1;
    rows.push(SurveyRow {
      exponent,
      numerator,
      exact: false,
      failure: first_failure(divisor, numerator, denominator),
    });
  }

  Ok(Survey { divisor, rows })
}

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Survey {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut table = Table::new();
    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(
      row![ubr->"Approximation", ubc->"Test", ubr->"Denominator", ubl->"Decomposition"]
    );

    for row in &self.rows {
      let test = match (row.exact, row.failure) {
        (true, _)        => "exact".to_string(),
        (_, None)        => "OK".to_string(),
        (_, Some(input)) => format!("Err:{}", input),
      };
      table.add_row(row![
        r->format!("{}/{}", row.numerator, 1u32 << row.exponent),
        c->test,
        r->format!("{}:{}", 1u32 << row.exponent, row.exponent),
        l->format!("{}", decompose(row.numerator))
      ]);
    }

    write!(f, "Approximations to 1/{}\n{}", self.divisor, table)
  }
}
