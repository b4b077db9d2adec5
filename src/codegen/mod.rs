/*!
  The code-generation pipeline: decompose a numerator into powers of two,
  emit the shift/rotate/add sequence realizing the fractional multiply,
  shrink it with the peephole pass, and price the result.

  ```text
  numerator ->[decompose]-> Decomposition ->[build_sequence]-> Sequence ->⋯

  ⋯->[optimize]-> Sequence ->[measure]-> Cost
  ```

  `templates` sits beside the pipeline: for three divisor ranges a fixed
  comparison-ladder routine beats anything the pipeline can produce, so
  those are emitted verbatim and never optimized or measured.
*/

mod builder;
mod cost;
mod decompose;
mod opcode;
mod optimizer;
mod sequence;
mod templates;

pub use builder::build_sequence;
pub use cost::{measure, Cost};
pub use decompose::{decompose, Decomposition, MAX_POWER};
pub use opcode::{Instruction, Label, Op};
pub use optimizer::optimize;
pub use sequence::Sequence;
pub use templates::{classify, range_template, TemplateRange};
