//! Error types surfaced by the awaiting side of a primitive sequence.
//!
//! Three kinds of failure reach the caller of `value()`:
//!
//! | Kind | Variant | Origin |
//! |------|---------|--------|
//! | producer error | [`AwaitError::Propagated`] | the producer's own `error(e)` |
//! | cancellation | [`AwaitError::Cancelled`] | the cancellation relay won the race |
//! | shape violation | [`AwaitError::Violation`] | the producer broke its shape's event sequence |
//!
//! None of them is retried or recovered internally.

use thiserror::Error;

/// A producer broke the legal event sequence of its shape, or the resolution
/// slot was misused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ProtocolViolation {
  /// A `Single` completed without emitting its value.
  #[error("the single completed without emitting a value")]
  CompletedWithoutValue,

  /// A `Single` or `Maybe` emitted more than one value.
  #[error("the sequence emitted more than one value")]
  MultipleValues,

  /// The producer released its observer without sending a terminal event.
  #[error("the producer released its observer without a terminal event")]
  Abandoned,

  /// The resolution slot was awaited after its outcome had been taken.
  #[error("the resolution slot was already consumed")]
  SlotConsumed,
}

/// The error returned by awaiting a primitive sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AwaitError<E> {
  /// The producer terminated with its own error, surfaced unchanged.
  #[error("the sequence failed: {0}")]
  Propagated(E),

  /// The awaiting side was cancelled before the producer terminated.
  #[error("awaiting the sequence was cancelled")]
  Cancelled,

  /// The producer violated its shape's event protocol.
  #[error("protocol violation: {0}")]
  Violation(#[from] ProtocolViolation),
}

impl<E> AwaitError<E> {
  /// Returns the producer's error, if that is what this is.
  pub fn into_propagated(self) -> Option<E> {
    match self {
      AwaitError::Propagated(e) => Some(e),
      _ => None,
    }
  }

  #[inline]
  pub fn is_cancelled(&self) -> bool { matches!(self, AwaitError::Cancelled) }

  #[inline]
  pub fn is_violation(&self) -> bool { matches!(self, AwaitError::Violation(_)) }

  /// Maps the producer error, leaving the synthesized kinds untouched.
  pub fn map_propagated<F, E2>(self, f: F) -> AwaitError<E2>
  where
    F: FnOnce(E) -> E2,
  {
    match self {
      AwaitError::Propagated(e) => AwaitError::Propagated(f(e)),
      AwaitError::Cancelled => AwaitError::Cancelled,
      AwaitError::Violation(v) => AwaitError::Violation(v),
    }
  }
}
