/*!
  The cost model: byte size and cycle count of a sequence, summed from a
  fixed per-opcode table. The table is total over `Op`: the match below is
  exhaustive, so adding an operation without a cost entry fails to compile.
  Template-only instruction forms have no entry at all: a sequence
  containing one cannot be measured, which surfaces as `Error::UnknownOpcode`
  rather than a silently wrong total.
*/

use std::fmt::{Display, Formatter};

use crate::error::Error;
use super::opcode::{Instruction, Op};
use super::sequence::Sequence;

/// Total size and execution time of a routine. Derived from a sequence by
/// `measure`, never stored apart from it.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Cost {
  pub bytes: u32,
  pub cycles: u32,
}

impl Display for Cost {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} bytes / {} microseconds", self.bytes, self.cycles)
  }
}

impl Op {
  /// Size in bytes and time in microseconds of this operation on the
  /// target CPU.
  pub fn cost(&self) -> Cost {
    match self {
      Op::Ret => Cost { bytes: 1, cycles: 3 },

      | Op::LdBA | Op::Rra | Op::AddB
      | Op::Rlca | Op::Rrca | Op::Rla
      | Op::XorA => Cost { bytes: 1, cycles: 1 },

      | Op::SrlA
      | Op::AndFC | Op::AndF8 | Op::AndF0 | Op::AndE0 | Op::AndC0 | Op::And80
      | Op::And01 | Op::And03 | Op::And07 | Op::And0F => Cost { bytes: 2, cycles: 2 },
    }
  }
}

/// Sums the per-opcode table over the sequence.
pub fn measure(sequence: &Sequence) -> Result<Cost, Error> {
  let mut total = Cost { bytes: 0, cycles: 0 };
  for line in sequence.iter() {
    match line {
      Instruction::Plain(op) => {
        let cost = op.cost();
        total.bytes += cost.bytes;
        total.cycles += cost.cycles;
      }
      other => {
        return Err(Error::UnknownOpcode(*other));
      }
    }
  }
  Ok(total)
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn per_opcode_table() {
    assert_eq!(Op::Ret.cost(), Cost { bytes: 1, cycles: 3 });
    assert_eq!(Op::Rra.cost(), Cost { bytes: 1, cycles: 1 });
    assert_eq!(Op::XorA.cost(), Cost { bytes: 1, cycles: 1 });
    assert_eq!(Op::SrlA.cost(), Cost { bytes: 2, cycles: 2 });
    assert_eq!(Op::And0F.cost(), Cost { bytes: 2, cycles: 2 });
  }

  #[test]
  fn measures_a_routine() {
    let sequence: Sequence = vec![
      Instruction::Plain(Op::LdBA),
      Instruction::Plain(Op::SrlA),
      Instruction::Plain(Op::AddB),
      Instruction::Plain(Op::Ret),
    ]
    .into();
    assert_eq!(measure(&sequence).unwrap(), Cost { bytes: 5, cycles: 7 });
  }

  #[test]
  fn template_lines_are_rejected() {
    let sequence: Sequence = vec![
      Instruction::Compare(170),
      Instruction::Plain(Op::Ret),
    ]
    .into();
    assert_eq!(
      measure(&sequence),
      Err(Error::UnknownOpcode(Instruction::Compare(170)))
    );
  }
}
