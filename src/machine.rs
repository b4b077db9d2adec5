/*!
  A tiny evaluator for generated routines: an accumulator, the B register,
  and the carry flag, with the forward jumps the range templates need. Flag
  behavior follows the target CPU where the generated code relies on it:
  `and` clears carry, `inc a` preserves it, and the rotate family moves
  exactly one bit through or around the carry.

  The generator itself never executes anything; this machine exists so the
  correctness of every emitted routine can be checked against plain integer
  arithmetic over the full 8-bit input domain.
*/

use crate::codegen::{Instruction, Label, Op, Sequence};

pub struct Machine {
  a: u8,
  b: u8,
  carry: bool,
}

impl Machine {

  /// Executes the routine with `input` in the accumulator and returns the
  /// accumulator at `ret` (or at the end of the listing).
  pub fn run(sequence: &Sequence, input: u8) -> u8 {
    let mut machine = Machine { a: input, b: 0, carry: false };
    let lines = sequence.as_slice();
    let mut pc = 0;

    while pc < lines.len() {
      #[cfg(feature = "trace_generation")]
      println!("  [{:2}] {:12} A={:#04X} B={:#04X} C={}",
               pc, lines[pc].to_string(), machine.a, machine.b, machine.carry as u8);

      match &lines[pc] {

        Instruction::Plain(Op::Ret) => {
          return machine.a;
        }

        Instruction::Plain(op) => {
          machine.step(*op);
        }

        Instruction::Compare(value) => {
          machine.carry = (machine.a as u16) < *value;
        }

        Instruction::SubtractCarry => {
          // sbc a,a: 0x00 or 0xFF depending on carry, carry preserved.
          machine.a = if machine.carry { 0xFF } else { 0x00 };
        }

        Instruction::Increment => {
          machine.a = machine.a.wrapping_add(1);
        }

        Instruction::LoadImmediate(value) => {
          machine.a = *value;
        }

        Instruction::AddImmediate(value) => {
          let (sum, carry) = machine.a.overflowing_add(*value);
          machine.a = sum;
          machine.carry = carry;
        }

        Instruction::Jump { on_carry, target } => {
          if *on_carry == machine.carry {
            pc = Machine::resolve(lines, *target);
            continue;
          }
        }

        Instruction::Target(_) => {}

      }
      pc += 1;
    }

    machine.a
  }

  fn resolve(lines: &[Instruction], label: Label) -> usize {
    match lines.iter().position(|line| *line == Instruction::Target(label)) {
      Some(position) => position,
      None => unreachable!("Error: jump to undefined label {}.", label),
    }
  }

  fn step(&mut self, op: Op) {
    match op {

      Op::LdBA => {
        self.b = self.a;
      }

      Op::Rra => {
        let low = self.a & 1 != 0;
        self.a = (self.a >> 1) | ((self.carry as u8) << 7);
        self.carry = low;
      }

      Op::SrlA => {
        self.carry = self.a & 1 != 0;
        self.a >>= 1;
      }

      Op::AddB => {
        let (sum, carry) = self.a.overflowing_add(self.b);
        self.a = sum;
        self.carry = carry;
      }

      Op::Rlca => {
        self.carry = self.a & 0x80 != 0;
        self.a = self.a.rotate_left(1);
      }

      Op::Rrca => {
        self.carry = self.a & 1 != 0;
        self.a = self.a.rotate_right(1);
      }

      Op::Rla => {
        let high = self.a & 0x80 != 0;
        self.a = (self.a << 1) | (self.carry as u8);
        self.carry = high;
      }

      Op::XorA => {
        self.a = 0;
        self.carry = false;
      }

      op => {
        if let Some(mask) = op.mask() {
          self.a &= mask;
          self.carry = false;
        }
      }

    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  fn run_ops(ops: &[Op], input: u8) -> u8 {
    let sequence: Sequence =
      ops.iter().map(|op| Instruction::Plain(*op)).collect::<Vec<_>>().into();
    Machine::run(&sequence, input)
  }

  #[test]
  fn shift_and_rotate_semantics() {
    assert_eq!(run_ops(&[Op::SrlA], 0x81), 0x40);
    // srl leaves its low bit in carry; rra pulls it back in as bit 7.
    assert_eq!(run_ops(&[Op::SrlA, Op::Rra], 0x81), 0xA0);
    assert_eq!(run_ops(&[Op::Rlca], 0x81), 0x03);
    assert_eq!(run_ops(&[Op::Rrca], 0x81), 0xC0);
    // rla shifts the (initially clear) carry into bit 0.
    assert_eq!(run_ops(&[Op::Rla], 0x81), 0x02);
    assert_eq!(run_ops(&[Op::Rlca, Op::Rla], 0x80), 0x03);
  }

  #[test]
  fn accumulate_folds_through_carry() {
    // ld b,a; add b doubles the input; rra halves it back with the carry.
    for input in 0u16..256 {
      let doubled = run_ops(&[Op::LdBA, Op::AddB, Op::Rra], input as u8);
      assert_eq!(doubled, input as u8);
    }
  }

  #[test]
  fn masks_and_clear() {
    assert_eq!(run_ops(&[Op::AndF0], 0xAB), 0xA0);
    assert_eq!(run_ops(&[Op::And03], 0xAB), 0x03);
    assert_eq!(run_ops(&[Op::XorA], 0xAB), 0x00);
    // and clears carry: the following rra cannot set bit 7.
    assert_eq!(run_ops(&[Op::SrlA, Op::AndFC, Op::Rra], 0xFF), 0x3E);
  }

  #[test]
  fn return_stops_execution() {
    assert_eq!(run_ops(&[Op::SrlA, Op::Ret, Op::XorA], 0x80), 0x40);
  }

  #[test]
  fn comparison_ladder() {
    let sequence: Sequence = vec![
      Instruction::Compare(100),
      Instruction::SubtractCarry,
      Instruction::Increment,
      Instruction::Plain(Op::Ret),
    ]
    .into();
    assert_eq!(Machine::run(&sequence, 99), 0);
    assert_eq!(Machine::run(&sequence, 100), 1);
    assert_eq!(Machine::run(&sequence, 255), 1);
  }
}
