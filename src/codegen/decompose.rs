/*!
  Decomposition of an integer into an ordered set of distinct powers of two,
  with a pruning rule that drops insignificant low-order bits.

  Each low-order bit kept costs its own shift/add chain in the generated
  routine, so bits whose contribution is below the 8-bit result granularity
  are truncated: scanning the (descending) exponents, a gap wider than
  `LAST_GAP_LIMIT` into the currently-last kept exponent, or wider than
  `GAP_LIMIT` anywhere else, discards that exponent and everything after it.
  The thresholds are fixed policy constants; they are what existing generated
  routines were tuned with and are not re-derived here.
*/

use std::fmt::{Display, Formatter};

/// Largest denominator exponent considered anywhere in the crate: enough
/// precision headroom over the 8-bit working range.
pub const MAX_POWER: u32 = 24;

const LAST_GAP_LIMIT: u32 = 7;
const GAP_LIMIT: u32 = 8;

/// Strictly descending, duplicate-free exponents in `[0, MAX_POWER]` whose
/// powers of two sum to the (possibly pruned) source integer.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Decomposition {
  exponents: Vec<u32>,
}

impl Decomposition {
  pub fn exponents(&self) -> &[u32] {
    &self.exponents
  }

  /// The most significant exponent. The pruning rule never removes it.
  pub fn leading(&self) -> Option<u32> {
    self.exponents.first().copied()
  }

  pub fn len(&self) -> usize {
    self.exponents.len()
  }

  pub fn is_empty(&self) -> bool {
    self.exponents.is_empty()
  }

  /// Reconstructs the integer the kept exponents represent.
  pub fn value(&self) -> u32 {
    self.exponents.iter().map(|e| 1u32 << e).sum()
  }
}

impl Display for Decomposition {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let text: Vec<String> = self.exponents.iter().map(u32::to_string).collect();
    write!(f, "{}", text.join(" "))
  }
}

/**
  Greedily extracts the largest power of two that fits, largest exponent
  first, then applies the gap-pruning rule. Bits above `2^MAX_POWER` are
  outside the working range and ignored.
*/
pub fn decompose(value: u32) -> Decomposition {
  let mut exponents: Vec<u32> = Vec::new();
  let mut remaining = value;

  for exponent in (0..=MAX_POWER).rev() {
    let power = 1u32 << exponent;
    if remaining >= power {
      exponents.push(exponent);
      remaining -= power;
    }
  }

  prune(&mut exponents);
  Decomposition { exponents }
}

/// Truncates the exponent list at the first over-wide gap. `kept` shrinks as
/// truncation points are found, so the relaxed last-gap threshold always
/// applies to the gap preceding the element that is currently last.
fn prune(exponents: &mut Vec<u32>) {
  let mut kept = exponents.len();
  for j in (1..exponents.len()).rev() {
    let difference = exponents[j - 1] - exponents[j];
    if (j == kept - 1 && difference > LAST_GAP_LIMIT) || difference > GAP_LIMIT {
      kept = j;
    }
  }
  exponents.truncate(kept);
}
