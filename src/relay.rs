//! Cancellation relay: ties the producer's lifetime to the awaiting side.
//!
//! When the waiting context goes away, the relay disposes the producer and
//! then races `Cancelled` into the slot. Disposal happens whether or not
//! the producer already terminated; only the slot write can lose.

use std::sync::Arc;

use crate::{
  slot::{Outcome, ResolutionSlot},
  subscription::SharedSubscription,
};

pub struct CancellationRelay<T, E> {
  slot: Arc<ResolutionSlot<T, E>>,
  subscription: SharedSubscription,
  armed: bool,
}

impl<T, E> CancellationRelay<T, E> {
  pub fn new(slot: Arc<ResolutionSlot<T, E>>, subscription: SharedSubscription) -> Self {
    Self { slot, subscription, armed: true }
  }

  #[inline]
  pub fn slot(&self) -> &ResolutionSlot<T, E> { &self.slot }

  /// Dispose the producer and try to resolve the slot as cancelled.
  ///
  /// Returns whether `Cancelled` won the slot. A relay fires at most once.
  pub fn fire(&mut self) -> bool {
    if !self.armed {
      return false;
    }
    self.armed = false;
    let disposed = self.subscription.dispose();
    let won = self.slot.try_resolve(Outcome::Cancelled);
    if won {
      tracing::trace!(disposed, "cancellation relay resolved the slot");
    } else {
      tracing::debug!(disposed, "cancellation relay lost the race to the producer");
    }
    won
  }

  /// Stand down once the outcome has been consumed by the waiter.
  #[inline]
  pub fn disarm(&mut self) { self.armed = false; }
}

impl<T, E> Drop for CancellationRelay<T, E> {
  fn drop(&mut self) { self.fire(); }
}
