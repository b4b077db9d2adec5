/*!
  `divgen` synthesizes short Amstrad/Z80 routines that divide the 8-bit
  value in the accumulator by a constant (or multiply it by a fraction
  `num/2^k`) using only shift, rotate, and add instructions, no lookup
  tables.

  Division by an arbitrary constant is reduced to a fractional multiply:
  the search in [`approx`] finds the smallest power-of-two denominator
  whose derived numerator divides identically to the requested constant for
  every 8-bit input, verified by brute force. The pipeline in [`codegen`]
  then decomposes the numerator into powers of two, emits the
  shift/rotate/add sequence, and peephole-optimizes shift runs into cheaper
  rotate+mask idioms. Three divisor ranges where comparison ladders beat
  any fraction get fixed templates instead. [`generator::generate`] ties it
  together; [`machine`] executes the result for verification.
*/

#[macro_use]
extern crate prettytable;
#[macro_use]
extern crate lazy_static;

pub mod approx;
pub mod codegen;
pub mod error;
pub mod generator;
pub mod machine;
pub mod request;

pub use approx::{find_approximation, survey, Candidate, Survey};
pub use codegen::{
  build_sequence, classify, decompose, measure, optimize, range_template,
  Cost, Decomposition, Instruction, Label, Op, Sequence, TemplateRange,
};
pub use error::Error;
pub use generator::{generate, Routine};
pub use machine::Machine;
pub use request::Request;
