//! Subscription: the producer's disposable handle.
//!
//! A [`Subscription`] is returned by `subscribe` and releases whatever the
//! producer holds for that observer. [`SharedSubscription`] turns any number
//! of such handles into one cloneable, thread-safe cell whose disposal runs
//! exactly once no matter how many racing paths request it.

mod boxed;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use boxed::*;
use smallvec::SmallVec;

/// A handle to an active subscription.
pub trait Subscription {
  /// Release the subscription. Consumes the handle, so a single handle can
  /// never be released twice.
  fn unsubscribe(self);

  fn is_closed(&self) -> bool;
}

/// Nothing to release; the producer finished synchronously.
impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<T: Subscription> Subscription for Option<T> {
  fn unsubscribe(self) {
    if let Some(inner) = self {
      inner.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().is_none_or(Subscription::is_closed) }
}

/// A subscription that runs a closure when released.
pub struct ClosureSubscription<F>(pub F);

impl<F: FnOnce()> Subscription for ClosureSubscription<F> {
  #[inline]
  fn unsubscribe(self) { (self.0)() }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

struct Inner {
  closed: bool,
  teardown: SmallVec<[BoxedSubscriptionSend; 1]>,
}

/// A thread-safe disposal cell shared by everything that may release the
/// producer.
///
/// `dispose` may be called from any thread, any number of times; only the
/// first call releases the attached handles. A handle attached after the cell
/// was disposed is released immediately, which covers producers that
/// terminate synchronously inside `subscribe`, before their handle exists.
#[derive(Clone)]
pub struct SharedSubscription(Arc<Mutex<Inner>>);

impl Default for SharedSubscription {
  fn default() -> Self { Self(Arc::new(Mutex::new(Inner { closed: false, teardown: SmallVec::new() }))) }
}

impl SharedSubscription {
  pub fn new() -> Self { Self::default() }

  fn inner(&self) -> MutexGuard<'_, Inner> { self.0.lock().unwrap_or_else(PoisonError::into_inner) }

  /// Attach a handle to be released on disposal.
  pub fn add<S: Subscription + Send + 'static>(&self, subscription: S) {
    let mut inner = self.inner();
    if inner.closed {
      drop(inner);
      tracing::trace!("subscription attached after disposal, releasing it now");
      subscription.unsubscribe();
    } else {
      inner.teardown.retain(|v| !v.is_closed());
      inner.teardown.push(BoxedSubscriptionSend::new(subscription));
    }
  }

  /// Release every attached handle. Returns `true` only for the call that
  /// actually performed the disposal.
  pub fn dispose(&self) -> bool {
    let teardown = {
      let mut inner = self.inner();
      if inner.closed {
        return false;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    // Released outside the lock: an upstream teardown may re-enter `dispose`.
    for handle in teardown {
      handle.unsubscribe();
    }
    true
  }

  #[inline]
  pub fn is_disposed(&self) -> bool { self.inner().closed }

  #[cfg(test)]
  fn teardown_size(&self) -> usize { self.inner().teardown.len() }
}

impl Subscription for SharedSubscription {
  #[inline]
  fn unsubscribe(self) { self.dispose(); }

  #[inline]
  fn is_closed(&self) -> bool { self.is_disposed() }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::atomic::{AtomicUsize, Ordering},
    thread,
  };

  use super::*;

  fn counting() -> (ClosureSubscription<impl FnOnce() + Send + 'static>, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    (
      ClosureSubscription(move || {
        c.fetch_add(1, Ordering::SeqCst);
      }),
      count,
    )
  }

  #[rxrust_await_macro::test]
  fn dispose_releases_once() {
    let shared = SharedSubscription::new();
    let (sub, count) = counting();
    shared.add(sub);
    assert_eq!(shared.teardown_size(), 1);

    assert!(shared.dispose());
    assert!(!shared.dispose());
    assert!(shared.is_disposed());
    assert_eq!(count.load(Ordering::SeqCst), 1);
  }

  #[rxrust_await_macro::test]
  fn add_after_dispose_releases_immediately() {
    let shared = SharedSubscription::new();
    shared.dispose();

    let (sub, count) = counting();
    shared.add(sub);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(shared.teardown_size(), 0);
  }

  #[rxrust_await_macro::test]
  fn closed_handles_are_pruned_on_add() {
    let shared = SharedSubscription::new();
    shared.add(());
    shared.add(());
    let (sub, _) = counting();
    shared.add(sub);
    assert_eq!(shared.teardown_size(), 1);
  }

  #[rxrust_await_macro::test]
  fn reentrant_dispose_does_not_deadlock() {
    let shared = SharedSubscription::new();
    let again = shared.clone();
    shared.add(ClosureSubscription(move || {
      assert!(!again.dispose());
    }));
    assert!(shared.dispose());
  }

  #[rxrust_await_macro::test]
  fn concurrent_dispose_has_one_winner() {
    for _ in 0..200 {
      let shared = SharedSubscription::new();
      let (sub, count) = counting();
      shared.add(sub);

      let handles: Vec<_> = (0..4)
        .map(|_| {
          let shared = shared.clone();
          thread::spawn(move || shared.dispose())
        })
        .collect();
      let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();

      assert_eq!(winners, 1);
      assert_eq!(count.load(Ordering::SeqCst), 1);
    }
  }
}
