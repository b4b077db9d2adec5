/*!
  The abstract operations of the target CPU, as far as this generator is
  concerned. An `Op` is a pure, context-free unit: the AND masks and rotate
  directions are baked into the variant, so nothing here carries a mutable
  operand. The mnemonic each `Op` renders to is a closed, exhaustive table
  with no fallback encoding, enforced by the `strum` serializations.

  `Instruction` layers the range-template idioms over `Op`. Template lines
  (compares, relative jumps, immediate loads) carry their operands as data;
  they are produced only by `templates::range_template` and never flow
  through the optimizer or the cost model.
*/

use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, EnumString, IntoStaticStr};

/**
  Opcodes the generated arithmetic routines are built from.

  Everything the decomposition pipeline emits is in this enumeration, and the
  cost model in `cost.rs` is total over it. Variant order groups the shift
  idioms before the rotate idioms and has no further significance.
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumString,
  Clone,        Copy,          Eq, PartialEq, Debug, Hash
)]
pub enum Op {
  /// Stash the accumulator so later `add b` steps can re-fold the input.
  #[strum(serialize = "ld b,a")]
  LdBA,
  /// Rotate right through carry; folds the carry of a preceding `add b`
  /// back in as bit 7.
  #[strum(serialize = "rra")]
  Rra,
  /// Logical shift right.
  #[strum(serialize = "srl a")]
  SrlA,
  /// Accumulate the stashed input.
  #[strum(serialize = "add b")]
  AddB,
  #[strum(serialize = "ret")]
  Ret,
  #[strum(serialize = "and #0xFC")]
  AndFC,
  #[strum(serialize = "and #0xF8")]
  AndF8,
  #[strum(serialize = "and #0xF0")]
  AndF0,
  #[strum(serialize = "and #0xE0")]
  AndE0,
  #[strum(serialize = "and #0xC0")]
  AndC0,
  #[strum(serialize = "and #0x80")]
  And80,
  /// Rotate left circular.
  #[strum(serialize = "rlca")]
  Rlca,
  /// Rotate right circular.
  #[strum(serialize = "rrca")]
  Rrca,
  /// Rotate left through carry.
  #[strum(serialize = "rla")]
  Rla,
  #[strum(serialize = "and #0x01")]
  And01,
  #[strum(serialize = "and #0x03")]
  And03,
  #[strum(serialize = "and #0x07")]
  And07,
  #[strum(serialize = "and #0x0F")]
  And0F,
  /// Clear the accumulator (`xor` with itself).
  #[strum(serialize = "xor a")]
  XorA,
}

impl Op {
  /// The mask applied by the AND variants, `None` for everything else.
  pub fn mask(&self) -> Option<u8> {
    match self {
      Op::AndFC => Some(0xFC),
      Op::AndF8 => Some(0xF8),
      Op::AndF0 => Some(0xF0),
      Op::AndE0 => Some(0xE0),
      Op::AndC0 => Some(0xC0),
      Op::And80 => Some(0x80),
      Op::And01 => Some(0x01),
      Op::And03 => Some(0x03),
      Op::And07 => Some(0x07),
      Op::And0F => Some(0x0F),
      _         => None
    }
  }
}

/// A branch target in a range template. Labels are value-derived, so two
/// templates never collide as long as their thresholds differ.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Label {
  LessThan(u16),
  MoreThan(u16),
}

impl Display for Label {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Label::LessThan(n) => write!(f, "less_than_{}", n),
      Label::MoreThan(n) => write!(f, "more_than_{}", n),
    }
  }
}

/**
  One line of a generated routine.

  `Plain` wraps the closed `Op` set the pipeline emits. The remaining
  variants are the comparison-and-subtract idioms used only by the fixed
  range templates; they bypass the optimizer and have no cost-table entry.
  The operand of `Compare` is `u16` because the middle-range template can
  legitimately derive a threshold of 256 from a fractional divisor just
  under 128.
*/
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Instruction {
  Plain(Op),
  /// `cp #n`
  Compare(u16),
  /// `sbc a`: accumulator becomes 0x00 or 0xFF depending on carry.
  SubtractCarry,
  /// `inc a`: does not touch carry.
  Increment,
  /// `ld a,#n`
  LoadImmediate(u8),
  /// `add #n`
  AddImmediate(u8),
  /// `jr c,target` / `jr nc,target`
  Jump { on_carry: bool, target: Label },
  /// A label definition. Renders as `target:`.
  Target(Label),
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      Instruction::Plain(op) => {
        write!(f, "{}", op)
      }

      Instruction::Compare(value) => {
        write!(f, "cp #{}", value)
      }

      Instruction::SubtractCarry => {
        write!(f, "sbc a")
      }

      Instruction::Increment => {
        write!(f, "inc a")
      }

      Instruction::LoadImmediate(value) => {
        write!(f, "ld a,#{}", value)
      }

      Instruction::AddImmediate(value) => {
        write!(f, "add #{}", value)
      }

      Instruction::Jump { on_carry, target } => {
        match on_carry {
          true  => write!(f, "jr c,{}", target),
          false => write!(f, "jr nc,{}", target)
        }
      }

      Instruction::Target(label) => {
        write!(f, "{}:", label)
      }

    }
  }
}


#[cfg(test)]
mod tests {
  use std::str::FromStr;
  use super::*;

  #[test]
  fn mnemonics_round_trip() {
    assert_eq!(Op::SrlA.to_string(), "srl a");
    assert_eq!(Op::And0F.to_string(), "and #0x0F");
    assert_eq!(Op::from_str("xor a"), Ok(Op::XorA));
    assert_eq!(Op::from_str("ld b,a"), Ok(Op::LdBA));
    assert!(Op::from_str("nop").is_err());
  }

  #[test]
  fn template_lines_render() {
    assert_eq!(Instruction::Compare(170).to_string(), "cp #170");
    assert_eq!(
      Instruction::Jump { on_carry: false, target: Label::MoreThan(199) }.to_string(),
      "jr nc,more_than_199"
    );
    assert_eq!(Instruction::Target(Label::LessThan(140)).to_string(), "less_than_140:");
    assert_eq!(Instruction::LoadImmediate(2).to_string(), "ld a,#2");
  }

  #[test]
  fn masks() {
    assert_eq!(Op::AndE0.mask(), Some(0xE0));
    assert_eq!(Op::Rra.mask(), None);
  }
}
