//! Subscription wrapper: translates a producer's callbacks into the single
//! outcome written to a [`ResolutionSlot`].
//!
//! | Shape | Producer events | Outcome |
//! |-------|-----------------|---------|
//! | Single | `next(v)`, `complete` | `Value(v)` |
//! | Single | `complete` with no value | `Violation(CompletedWithoutValue)` |
//! | Maybe | `next(v)`, `complete` | `Value(v)` |
//! | Maybe | `complete` with no value | `Empty` |
//! | Single, Maybe | a second `next` | `Violation(MultipleValues)` |
//! | Completable | `complete` | `Value(())` |
//! | any | `error(e)` | `Error(e)` |
//! | any | observer dropped with no terminal event | `Violation(Abandoned)` |
//!
//! Whatever the outcome, the wrapper disposes the producer's subscription
//! first and then attempts the slot transition; losing that race does not
//! skip the disposal.

use std::{convert::Infallible, fmt, sync::Arc};

use crate::{
  error::ProtocolViolation,
  observer::Observer,
  slot::{Outcome, ResolutionSlot},
  subscription::SharedSubscription,
};

/// The three primitive sequence shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
  Single,
  Maybe,
  Completable,
}

impl Shape {
  pub fn as_str(&self) -> &'static str {
    match self {
      Shape::Single => "single",
      Shape::Maybe => "maybe",
      Shape::Completable => "completable",
    }
  }
}

impl fmt::Display for Shape {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// ============================================================================
// BridgeCore
// ============================================================================

/// The part every shape's observer shares: the slot it resolves and the
/// subscription it disposes.
pub struct BridgeCore<T, E> {
  slot: Arc<ResolutionSlot<T, E>>,
  subscription: SharedSubscription,
  shape: Shape,
  finished: bool,
}

impl<T, E> BridgeCore<T, E> {
  pub fn new(slot: Arc<ResolutionSlot<T, E>>, subscription: SharedSubscription, shape: Shape) -> Self {
    Self { slot, subscription, shape, finished: false }
  }

  #[inline]
  pub fn shape(&self) -> Shape { self.shape }

  /// Dispose the producer, then race for the slot. Returns whether this
  /// outcome won.
  pub fn resolve(&mut self, outcome: Outcome<T, E>) -> bool {
    self.finished = true;
    self.subscription.dispose();
    self.slot.try_resolve(outcome)
  }

  fn violation(&mut self, violation: ProtocolViolation) -> bool {
    tracing::warn!(shape = %self.shape, %violation, "producer violated its event protocol");
    self.resolve(Outcome::Violation(violation))
  }

  /// `true` once this observer produced its outcome or the subscription was
  /// disposed from elsewhere.
  #[inline]
  pub fn is_closed(&self) -> bool { self.finished || self.subscription.is_disposed() }

  /// Report whether an event should be dropped, logging why.
  fn ignores(&self, event: &'static str) -> bool {
    if self.finished {
      tracing::warn!(shape = %self.shape, event, "event after the terminal event ignored");
      true
    } else if self.subscription.is_disposed() {
      tracing::trace!(shape = %self.shape, event, "event after disposal ignored");
      true
    } else {
      false
    }
  }
}

impl<T, E> Drop for BridgeCore<T, E> {
  fn drop(&mut self) {
    // A disposed subscription releasing its observer is ordinary teardown.
    if !self.finished && !self.subscription.is_disposed() && !self.slot.is_resolved() {
      self.violation(ProtocolViolation::Abandoned);
    }
  }
}

// ============================================================================
// ValueObserver: Single and Maybe
// ============================================================================

/// Observer for the value-carrying shapes, `Single` and `Maybe`.
///
/// The value is held until completion confirms it.
pub struct ValueObserver<T, E> {
  core: BridgeCore<T, E>,
  held: Option<T>,
}

impl<T, E> ValueObserver<T, E> {
  pub fn new(core: BridgeCore<T, E>) -> Self {
    debug_assert!(core.shape() != Shape::Completable);
    Self { core, held: None }
  }
}

impl<T, E> Observer<T, E> for ValueObserver<T, E> {
  fn next(&mut self, value: T) {
    if self.core.ignores("next") {
      return;
    }
    if self.held.is_some() {
      self.held = None;
      self.core.violation(ProtocolViolation::MultipleValues);
    } else {
      self.held = Some(value);
    }
  }

  fn error(mut self, err: E) {
    if !self.core.ignores("error") {
      self.core.resolve(Outcome::Error(err));
    }
  }

  fn complete(mut self) {
    if self.core.ignores("complete") {
      return;
    }
    match (self.held.take(), self.core.shape()) {
      (Some(value), _) => {
        self.core.resolve(Outcome::Value(value));
      }
      (None, Shape::Maybe) => {
        self.core.resolve(Outcome::Empty);
      }
      (None, _) => {
        self.core.violation(ProtocolViolation::CompletedWithoutValue);
      }
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.core.is_closed() }
}

// ============================================================================
// SignalObserver: Completable
// ============================================================================

/// Observer for `Completable`: a bare completion resolves `Value(())`.
///
/// Completable producers emit `Infallible` items, so a value can never reach
/// this observer.
pub struct SignalObserver<E> {
  core: BridgeCore<(), E>,
}

impl<E> SignalObserver<E> {
  pub fn new(core: BridgeCore<(), E>) -> Self { Self { core } }
}

impl<E> Observer<Infallible, E> for SignalObserver<E> {
  fn next(&mut self, value: Infallible) { match value {} }

  fn error(mut self, err: E) {
    if !self.core.ignores("error") {
      self.core.resolve(Outcome::Error(err));
    }
  }

  fn complete(mut self) {
    if !self.core.ignores("complete") {
      self.core.resolve(Outcome::Value(()));
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.core.is_closed() }
}
