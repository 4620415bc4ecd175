//! Resolution slot: a one-shot, thread-safe cell that accepts exactly one
//! terminal [`Outcome`] and hands it to exactly one waiter.
//!
//! Any number of writers may race on [`ResolutionSlot::try_resolve`]; the
//! first one moves the slot out of `Pending` and every later one is told it
//! lost. The waiter side is a plain poll function plus the [`SlotWait`]
//! future built on it.

use std::{
  fmt::{Debug, Formatter},
  future::Future,
  pin::Pin,
  sync::{Mutex, MutexGuard, PoisonError},
  task::{Context, Poll, Waker},
};

use crate::error::{AwaitError, ProtocolViolation};

/// The single terminal outcome of a primitive sequence.
///
/// Every outcome is tagged, so "resolved with no value" (`Empty`) can never
/// be mistaken for "not resolved yet".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
  Value(T),
  /// Completion without a value; only legal for `Maybe`.
  Empty,
  Error(E),
  Cancelled,
  Violation(ProtocolViolation),
}

impl<T, E> Outcome<T, E> {
  /// The short tag used in logs.
  pub fn kind(&self) -> &'static str {
    match self {
      Outcome::Value(_) => "value",
      Outcome::Empty => "empty",
      Outcome::Error(_) => "error",
      Outcome::Cancelled => "cancelled",
      Outcome::Violation(_) => "violation",
    }
  }

  /// Converts the outcome into what the awaiting caller sees; `Empty`
  /// becomes `Ok(None)`.
  pub fn into_result(self) -> Result<Option<T>, AwaitError<E>> {
    match self {
      Outcome::Value(v) => Ok(Some(v)),
      Outcome::Empty => Ok(None),
      Outcome::Error(e) => Err(AwaitError::Propagated(e)),
      Outcome::Cancelled => Err(AwaitError::Cancelled),
      Outcome::Violation(v) => Err(AwaitError::Violation(v)),
    }
  }
}

enum State<T, E> {
  Pending(Option<Waker>),
  Resolved(Outcome<T, E>),
  Consumed,
}

pub struct ResolutionSlot<T, E> {
  state: Mutex<State<T, E>>,
}

impl<T, E> Default for ResolutionSlot<T, E> {
  fn default() -> Self { Self { state: Mutex::new(State::Pending(None)) } }
}

impl<T, E> Debug for ResolutionSlot<T, E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let state = match &*self.state() {
      State::Pending(_) => "pending",
      State::Resolved(_) => "resolved",
      State::Consumed => "consumed",
    };
    f.debug_struct("ResolutionSlot").field("state", &state).finish()
  }
}

impl<T, E> ResolutionSlot<T, E> {
  pub fn new() -> Self { Self::default() }

  // No critical section runs user code, so a poisoned lock still guards a
  // consistent state.
  fn state(&self) -> MutexGuard<'_, State<T, E>> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Attempt the `Pending -> Resolved` transition.
  ///
  /// Returns `true` if this call won. A losing outcome is dropped without
  /// further effect.
  pub fn try_resolve(&self, outcome: Outcome<T, E>) -> bool {
    let kind = outcome.kind();
    let waker = {
      let mut state = self.state();
      match std::mem::replace(&mut *state, State::Consumed) {
        State::Pending(waker) => {
          *state = State::Resolved(outcome);
          waker
        }
        settled => {
          *state = settled;
          tracing::trace!(outcome = kind, "resolution lost the race");
          return false;
        }
      }
    };
    tracing::trace!(outcome = kind, "slot resolved");
    if let Some(waker) = waker {
      waker.wake();
    }
    true
  }

  /// `true` once any outcome has been written, consumed or not.
  pub fn is_resolved(&self) -> bool { !matches!(&*self.state(), State::Pending(_)) }

  /// Poll for the outcome, registering `cx`'s waker while pending.
  ///
  /// The outcome is handed out once; polling a consumed slot yields
  /// `Err(ProtocolViolation::SlotConsumed)`.
  pub fn poll_outcome(
    &self, cx: &mut Context<'_>,
  ) -> Poll<Result<Outcome<T, E>, ProtocolViolation>> {
    let mut state = self.state();
    match std::mem::replace(&mut *state, State::Consumed) {
      State::Pending(waker) => {
        let waker = match waker {
          Some(waker) if waker.will_wake(cx.waker()) => waker,
          _ => cx.waker().clone(),
        };
        *state = State::Pending(Some(waker));
        Poll::Pending
      }
      State::Resolved(outcome) => Poll::Ready(Ok(outcome)),
      State::Consumed => Poll::Ready(Err(ProtocolViolation::SlotConsumed)),
    }
  }

  /// Take the outcome if it is already there, without registering a waker.
  pub fn take(&self) -> Option<Result<Outcome<T, E>, ProtocolViolation>> {
    let mut state = self.state();
    match std::mem::replace(&mut *state, State::Consumed) {
      State::Pending(waker) => {
        *state = State::Pending(waker);
        None
      }
      State::Resolved(outcome) => Some(Ok(outcome)),
      State::Consumed => Some(Err(ProtocolViolation::SlotConsumed)),
    }
  }

  /// A future that waits for the outcome.
  pub fn wait(&self) -> SlotWait<'_, T, E> { SlotWait { slot: self } }
}

/// Future returned by [`ResolutionSlot::wait`].
#[must_use = "futures do nothing unless polled"]
pub struct SlotWait<'a, T, E> {
  slot: &'a ResolutionSlot<T, E>,
}

impl<T, E> Future for SlotWait<'_, T, E> {
  type Output = Result<Outcome<T, E>, ProtocolViolation>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    self.slot.poll_outcome(cx)
  }
}
