/*!
  Turns a decomposition into the raw instruction sequence computing
  `floor(input * numerator / 2^divisor_exponent)`.

  The walk goes from the least significant exponent to the most significant.
  Each segment shifts the running value right across the bit-gap to the next
  exponent and then accumulates the stashed input with `add b`. The very
  first shift of the walk is a plain `srl a`; every later segment opens with
  `rra` instead, so the carry produced by the preceding `add b` is folded
  back in as bit 7. The tail aligns the result to the target exponent the
  same way, and the routine ends with `ret`.
*/

use super::decompose::Decomposition;
use super::opcode::Op;
use super::sequence::Sequence;

/// The input's contribution vanishes entirely once the target exponent is
/// this far above the leading exponent: the result is always zero.
const ZERO_RESULT_GAP: u32 = 8;

/**
  Emits the unoptimized routine for `decomposition / 2^divisor_exponent`.

  An empty decomposition, or one whose leading exponent sits more than
  `ZERO_RESULT_GAP` below the target, collapses to `xor a; ret`.
*/
pub fn build_sequence(decomposition: &Decomposition, divisor_exponent: u32) -> Sequence {
  let mut sequence = Sequence::new();
  let exponents = decomposition.exponents();

  match exponents.first() {
    None => {
      sequence.push_op(Op::XorA);
    }

    Some(&leading) if divisor_exponent > leading + ZERO_RESULT_GAP => {
      sequence.push_op(Op::XorA);
    }

    Some(&leading) => {
      let terms = exponents.len();

      // The input is needed once per term; stash it when there is more
      // than one.
      if terms > 1 {
        sequence.push_op(Op::LdBA);
      }

      for j in (1..terms).rev() {
        let mut difference = exponents[j - 1] - exponents[j];
        match j == terms - 1 {
          true  => sequence.push_op(Op::SrlA),
          false => sequence.push_op(Op::Rra)
        }
        difference -= 1;
        while difference > 0 {
          sequence.push_op(Op::SrlA);
          difference -= 1;
        }
        sequence.push_op(Op::AddB);
      }

      // Align the accumulated value to the target exponent.
      let mut difference = divisor_exponent as i32 - leading as i32 - 1;
      if terms != 1 {
        sequence.push_op(Op::Rra);
      } else if divisor_exponent != leading {
        sequence.push_op(Op::SrlA);
      }
      while difference > 0 {
        sequence.push_op(Op::SrlA);
        difference -= 1;
      }
    }
  }

  sequence.push_op(Op::Ret);
  sequence
}
