/*!
  The driver: turns a validated request into a finished routine.

  Fraction requests go straight down the pipeline. Division requests first
  try the fixed range templates (unless the request forces a fraction);
  outside those ranges the approximation search supplies the fraction and
  the pipeline takes over:

  ```text
  Request ->[find_approximation]-> Candidate ->[decompose]-> Decomposition ->⋯

  ⋯->[build_sequence]-> Sequence ->[optimize]-> Sequence ->[measure]-> Cost
  ```

  Every value here is created fresh for one request and handed back by
  value; nothing is shared or reused across requests, so independent
  requests can be generated concurrently without coordination.
*/

use crate::approx::{find_approximation, Candidate};
use crate::codegen::{
  build_sequence, classify, decompose, measure, optimize, range_template, Cost, Sequence,
};
use crate::error::Error;
use crate::request::{log2_exact, Request};

/// A finished routine: the instruction listing, its price, the fraction it
/// realizes (absent for template routines), and whether it destroys the B
/// register.
#[derive(Clone, PartialEq, Debug)]
pub struct Routine {
  pub sequence: Sequence,
  pub cost: Cost,
  pub candidate: Option<Candidate>,
  pub clobbers_b: bool,
}

/**
  Generates the routine for `request`. All-or-nothing: any error leaves no
  partial output behind.
*/
pub fn generate(request: &Request) -> Result<Routine, Error> {
  match request {

    Request::Fraction { numerator, denominator } => {
      let exponent = log2_exact(*denominator as f64)
        .ok_or(Error::DenominatorNotPowerOfTwo)?;
      generate_fraction(*numerator, exponent, None)
    }

    Request::Division { divisor, force_fraction } => {
      if !force_fraction {
        if let Some(range) = classify(*divisor) {
          return Ok(Routine {
            sequence: range_template(*divisor),
            cost: range.fixed_cost(),
            candidate: None,
            clobbers_b: false,
          });
        }
      }
      let candidate = find_approximation(*divisor)?;
      generate_fraction(candidate.numerator, candidate.exponent, Some(candidate))
    }

  }
}

fn generate_fraction(
  numerator: u32,
  exponent: u32,
  candidate: Option<Candidate>,
) -> Result<Routine, Error> {
  let decomposition = decompose(numerator);

  #[cfg(feature = "trace_generation")]
  println!("Decomposition of {}: {}", numerator, decomposition);

  let raw = build_sequence(&decomposition, exponent);

  #[cfg(feature = "trace_generation")]
  println!("# Raw sequence\n{}", raw);

  let sequence = optimize(&raw);

  #[cfg(feature = "trace_generation")]
  println!("# Optimized sequence\n{}", sequence);

  let cost = measure(&sequence)?;
  let clobbers_b = sequence.clobbers_b();
  Ok(Routine { sequence, cost, candidate, clobbers_b })
}
