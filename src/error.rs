/*!
  The crate's error type. Request validation failures carry user-facing
  wording; the remaining variants are internal limitations
  (`ApproximationExhausted`) or programming-invariant violations
  (`UnknownOpcode`) that callers should treat as fatal. All validation
  happens before any generation work begins, so an error never comes with
  partial output.
*/

use crate::codegen::Instruction;

#[derive(thiserror::Error, Clone, Copy, PartialEq, Debug)]
pub enum Error {
  #[error("divisor must be greater than or equal to 1")]
  DivisorTooSmall,

  #[error("divisor must be a power of 2")]
  DenominatorNotPowerOfTwo,

  #[error("divisor must be greater than or equal to dividend")]
  NumeratorExceedsDenominator,

  #[error("dividend must be a positive integer")]
  NumeratorNotInteger,

  /// No denominator exponent up to the search bound produced a verified
  /// candidate. A limitation of the bounded search, not a user error.
  #[error("no verified approximation of 1/{0} with a denominator up to 2^24")]
  ApproximationExhausted(f64),

  /// An instruction outside the closed generated set reached the cost
  /// model. This cannot happen for pipeline output; it indicates a caller
  /// fed a template routine (or a hand-built sequence) somewhere only
  /// generated code belongs.
  #[error("no cost entry for instruction `{0}`")]
  UnknownOpcode(Instruction),

  #[error("unrecognized request")]
  MalformedRequest,
}
