/*!
  Fixed routines for divisor ranges where comparison-and-subtract code beats
  any power-of-two approximation. These are literal idiom templates keyed
  only by the divisor's integer ceiling (and, for the middle range, its
  doubled ceiling); they bypass the decomposer, the builder, and the
  optimizer entirely, and their costs are fixed by construction rather than
  measured.
*/

use crate::codegen::cost::Cost;
use super::opcode::{Instruction, Label, Op};
use super::sequence::Sequence;

/// The three divisor ranges with a hand-derived template.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum TemplateRange {
  /// Divisors in (64, 85]: quotients 0..=3.
  UpTo85,
  /// Divisors in (85, 128): quotients 0..=2.
  Below128,
  /// Divisors in (128, 255]: quotients 0..=1.
  UpTo255,
}

impl TemplateRange {
  /// The size and worst-case time of the template, derived by hand from the
  /// fixed instruction shapes rather than measured.
  pub fn fixed_cost(&self) -> Cost {
    match self {
      TemplateRange::UpTo85   => Cost { bytes: 15, cycles: 12 },
      TemplateRange::Below128 => Cost { bytes: 12, cycles: 11 },
      TemplateRange::UpTo255  => Cost { bytes: 5,  cycles: 7 },
    }
  }
}

/// Places a divisor into its template range, if it has one. Divisors at or
/// below 64, exactly 128, or above 255 take the general pipeline instead.
pub fn classify(divisor: f64) -> Option<TemplateRange> {
  if divisor > 128.0 && divisor <= 255.0 {
    Some(TemplateRange::UpTo255)
  } else if divisor > 85.0 && divisor < 128.0 {
    Some(TemplateRange::Below128)
  } else if divisor > 64.0 && divisor <= 85.0 {
    Some(TemplateRange::UpTo85)
  } else {
    None
  }
}

// Ceiling of a small positive float, as the comparison thresholds need it.
fn ceiling(value: f64) -> u16 {
  value.ceil() as u16
}

/**
  Returns the template routine for `divisor`.

  The caller must already have classified the divisor into one of the three
  template ranges; anything else is a contract violation and panics.
*/
pub fn range_template(divisor: f64) -> Sequence {
  let range = match classify(divisor) {
    Some(range) => range,
    None => unreachable!(
      "Error: divisor {} is outside every template range.",
      divisor
    ),
  };

  let once = ceiling(divisor);
  let twice = ceiling(divisor * 2.0);
  let thrice = ceiling(divisor * 3.0);
  let mut sequence = Sequence::new();

  match range {

    // cp; sbc a; inc a: carry distinguishes quotient 0 from 1.
    TemplateRange::UpTo255 => {
      sequence.push(Instruction::Compare(once));
      sequence.push(Instruction::SubtractCarry);
      sequence.push(Instruction::Increment);
      sequence.push_op(Op::Ret);
    }

    // Inputs at or above twice the divisor short-circuit to quotient 2.
    TemplateRange::Below128 => {
      let above = Label::MoreThan(twice - 1);
      sequence.push(Instruction::Compare(twice));
      sequence.push(Instruction::Jump { on_carry: false, target: above });
      sequence.push(Instruction::Compare(once));
      sequence.push(Instruction::SubtractCarry);
      sequence.push(Instruction::Increment);
      sequence.push_op(Op::Ret);
      sequence.push(Instruction::Target(above));
      sequence.push(Instruction::LoadImmediate(2));
      sequence.push_op(Op::Ret);
    }

    // Two comparison ladders split at twice the divisor: the upper one
    // resolves quotients 2/3, the lower one 0/1.
    TemplateRange::UpTo85 => {
      let below = Label::LessThan(twice);
      sequence.push(Instruction::Compare(twice));
      sequence.push(Instruction::Jump { on_carry: true, target: below });
      sequence.push(Instruction::Compare(thrice));
      sequence.push(Instruction::SubtractCarry);
      sequence.push(Instruction::AddImmediate(3));
      sequence.push_op(Op::Ret);
      sequence.push(Instruction::Target(below));
      sequence.push(Instruction::Compare(once));
      sequence.push(Instruction::SubtractCarry);
      sequence.push(Instruction::Increment);
      sequence.push_op(Op::Ret);
    }

  }

  sequence
}


#[cfg(test)]
mod tests {
  use crate::machine::Machine;
  use super::*;

  fn assert_quotients(divisor: f64) {
    let sequence = range_template(divisor);
    for input in 0u32..256 {
      assert_eq!(
        Machine::run(&sequence, input as u8) as u32,
        (input as f64 / divisor) as u32,
        "divisor {} input {}",
        divisor,
        input
      );
    }
  }

  #[test]
  fn classification_boundaries() {
    assert_eq!(classify(64.0), None);
    assert_eq!(classify(64.5), Some(TemplateRange::UpTo85));
    assert_eq!(classify(85.0), Some(TemplateRange::UpTo85));
    assert_eq!(classify(85.5), Some(TemplateRange::Below128));
    assert_eq!(classify(127.9), Some(TemplateRange::Below128));
    assert_eq!(classify(128.0), None);
    assert_eq!(classify(128.5), Some(TemplateRange::UpTo255));
    assert_eq!(classify(255.0), Some(TemplateRange::UpTo255));
    assert_eq!(classify(256.0), None);
  }

  #[test]
  fn templates_compute_quotients() {
    assert_quotients(70.0);
    assert_quotients(85.0);
    assert_quotients(84.5);
    assert_quotients(100.0);
    assert_quotients(127.9);
    assert_quotients(200.0);
    assert_quotients(255.0);
    assert_quotients(129.0);
  }

  #[test]
  fn fixed_costs() {
    assert_eq!(TemplateRange::UpTo255.fixed_cost(), Cost { bytes: 5, cycles: 7 });
    assert_eq!(TemplateRange::Below128.fixed_cost(), Cost { bytes: 12, cycles: 11 });
    assert_eq!(TemplateRange::UpTo85.fixed_cost(), Cost { bytes: 15, cycles: 12 });
  }

  #[test]
  fn middle_template_shape() {
    let sequence = range_template(100.0);
    let rendered = sequence.to_string();
    assert!(rendered.contains("cp #200"));
    assert!(rendered.contains("jr nc,more_than_199"));
    assert!(rendered.contains("ld a,#2"));
  }

  #[test]
  #[should_panic]
  fn out_of_range_divisor_is_a_contract_violation() {
    range_template(32.0);
  }
}
