/*!
  An ordered, append-only list of instructions. Execution order is the list
  order. A sequence is built once by the builder (or a template), then
  replaced wholesale by its optimized form; sequences are never merged.
  Each request owns its own `Sequence`, so nothing bleeds across requests.
*/

use std::fmt::{Display, Formatter};

use super::opcode::{Instruction, Op};

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Sequence {
  lines: Vec<Instruction>,
}

impl Sequence {
  pub fn new() -> Sequence {
    Sequence { lines: Vec::new() }
  }

  pub fn push(&mut self, instruction: Instruction) {
    self.lines.push(instruction);
  }

  /// Convenience for the common case of appending a plain operation.
  pub fn push_op(&mut self, op: Op) {
    self.lines.push(Instruction::Plain(op));
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn as_slice(&self) -> &[Instruction] {
    &self.lines
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
    self.lines.iter()
  }

  /// Whether executing this routine destroys the B register. The builder
  /// only stashes into B when the decomposition has more than one term.
  pub fn clobbers_b(&self) -> bool {
    self.lines.contains(&Instruction::Plain(Op::LdBA))
  }
}

impl From<Vec<Instruction>> for Sequence {
  fn from(lines: Vec<Instruction>) -> Sequence {
    Sequence { lines }
  }
}

impl Display for Sequence {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    for line in &self.lines {
      writeln!(f, "{}", line)?;
    }
    Ok(())
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_one_line_per_instruction() {
    let mut sequence = Sequence::new();
    sequence.push_op(Op::LdBA);
    sequence.push_op(Op::SrlA);
    sequence.push_op(Op::Ret);
    assert_eq!(sequence.to_string(), "ld b,a\nsrl a\nret\n");
    assert_eq!(sequence.len(), 3);
  }

  #[test]
  fn clobbers_b_detection() {
    let plain: Sequence = vec![Instruction::Plain(Op::SrlA), Instruction::Plain(Op::Ret)].into();
    assert!(!plain.clobbers_b());
    let stashing: Sequence = vec![Instruction::Plain(Op::LdBA)].into();
    assert!(stashing.clobbers_b());
  }
}
