//! Bridge entry point: the future returned by `value()`.
//!
//! Creating an [`AwaitValue`] subscribes the producer right away, with the
//! cancellation relay already in place. Awaiting it suspends until the slot
//! resolves. Dropping it early, or letting its cancellation signal fire
//! first, disposes the producer and resolves with
//! [`AwaitError::Cancelled`].

use std::{
  future::{Future, Pending},
  pin::Pin,
  sync::Arc,
  task::{Context, Poll},
};

use pin_project_lite::pin_project;

use crate::{
  bridge::{BridgeCore, Shape},
  error::AwaitError,
  observable::CoreObservable,
  relay::CancellationRelay,
  slot::{Outcome, ResolutionSlot},
  subscription::SharedSubscription,
};

/// Turns the resolved outcome into the shape's return value.
pub type Finish<T, E, Out> = fn(Outcome<T, E>) -> Result<Out, AwaitError<E>>;

pin_project! {
  /// A pending `value()` call.
  ///
  /// Resolves exactly once. Polling again after that yields
  /// `AwaitError::Violation(ProtocolViolation::SlotConsumed)`.
  #[must_use = "futures do nothing unless polled"]
  pub struct AwaitValue<T, E, Out, Sig> {
    relay: CancellationRelay<T, E>,
    finish: Finish<T, E, Out>,
    #[pin]
    signal: Option<Sig>,
  }
}

impl<T, E, Out> AwaitValue<T, E, Out, Pending<()>> {
  /// Subscribe `source` through the observer `wrap` builds and return the
  /// future waiting on it.
  pub(crate) fn subscribe<S, O>(
    source: S, shape: Shape, wrap: fn(BridgeCore<T, E>) -> O, finish: Finish<T, E, Out>,
  ) -> Self
  where
    S: CoreObservable<O>,
    S::Unsub: Send + 'static,
  {
    let slot = Arc::new(ResolutionSlot::new());
    let subscription = SharedSubscription::new();
    let relay = CancellationRelay::new(slot.clone(), subscription.clone());

    tracing::trace!(%shape, "subscribing primitive sequence");
    let observer = wrap(BridgeCore::new(slot, subscription.clone(), shape));
    subscription.add(source.subscribe(observer));

    AwaitValue { relay, finish, signal: None }
  }
}

impl<T, E, Out, Sig> AwaitValue<T, E, Out, Sig> {
  /// Also cancel when `signal` completes before the producer terminates.
  pub fn until<Sig2>(self, signal: Sig2) -> AwaitValue<T, E, Out, Sig2>
  where
    Sig2: Future<Output = ()>,
  {
    AwaitValue { relay: self.relay, finish: self.finish, signal: Some(signal) }
  }

  /// `true` once the producer, or a cancellation, has resolved the call.
  pub fn is_resolved(&self) -> bool { self.relay.slot().is_resolved() }

  /// Cancel now, as if the signal had fired. Returns whether the
  /// cancellation won the race against the producer.
  pub fn cancel(&mut self) -> bool { self.relay.fire() }
}

impl<T, E, Out, Sig> Future for AwaitValue<T, E, Out, Sig>
where
  Sig: Future<Output = ()>,
{
  type Output = Result<Out, AwaitError<E>>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut this = self.project();

    if let Some(signal) = this.signal.as_mut().as_pin_mut() {
      if signal.poll(cx).is_ready() {
        this.signal.set(None);
        this.relay.fire();
      }
    }

    match this.relay.slot().poll_outcome(cx) {
      Poll::Pending => Poll::Pending,
      Poll::Ready(outcome) => {
        this.relay.disarm();
        Poll::Ready(match outcome {
          Ok(outcome) => (*this.finish)(outcome),
          Err(violation) => Err(AwaitError::Violation(violation)),
        })
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  };

  use futures::{channel::oneshot, task::noop_waker};

  use super::*;
  use crate::{
    bridge::ValueObserver,
    error::ProtocolViolation,
    observable::{self, SharedEmitter},
    observer::Emitter,
    subscription::{ClosureSubscription, Subscription},
  };

  fn maybe_finish(outcome: Outcome<i32, &'static str>) -> Result<Option<i32>, AwaitError<&'static str>> {
    outcome.into_result()
  }

  fn poll_once<F: Future + Unpin>(fut: &mut F) -> Poll<F::Output> {
    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);
    Pin::new(fut).poll(&mut cx)
  }

  /// A producer that hands its emitter out and counts releases.
  fn parked(
    emitter: Arc<std::sync::Mutex<Option<SharedEmitter<i32, &'static str>>>>, released: Arc<AtomicUsize>,
  ) -> impl CoreObservable<
    ValueObserver<i32, &'static str>,
    Item = i32,
    Err = &'static str,
    Unsub = impl Subscription + Send + 'static,
  > {
    observable::create_shared(move |e: SharedEmitter<i32, &'static str>| {
      *emitter.lock().unwrap() = Some(e);
      ClosureSubscription(move || {
        released.fetch_add(1, Ordering::SeqCst);
      })
    })
  }

  #[rxrust_await_macro::test]
  fn synchronous_producer_is_ready_on_first_poll() {
    let mut fut = AwaitValue::subscribe(
      observable::of::<i32, &'static str>(3),
      Shape::Maybe,
      ValueObserver::new,
      maybe_finish,
    );
    assert!(fut.is_resolved());
    assert_eq!(poll_once(&mut fut), Poll::Ready(Ok(Some(3))));
    assert_eq!(
      poll_once(&mut fut),
      Poll::Ready(Err(AwaitError::Violation(ProtocolViolation::SlotConsumed)))
    );
  }

  #[rxrust_await_macro::test]
  fn asynchronous_producer_resolves_later() {
    let emitter = Arc::new(std::sync::Mutex::new(None));
    let released = Arc::new(AtomicUsize::new(0));
    let mut fut =
      AwaitValue::subscribe(parked(emitter.clone(), released.clone()), Shape::Maybe, ValueObserver::new, maybe_finish);

    assert!(poll_once(&mut fut).is_pending());
    let mut e = emitter.lock().unwrap().take().unwrap();
    e.next(8);
    assert!(poll_once(&mut fut).is_pending());
    e.complete();

    assert_eq!(poll_once(&mut fut), Poll::Ready(Ok(Some(8))));
    assert_eq!(released.load(Ordering::SeqCst), 1);
  }

  #[rxrust_await_macro::test]
  fn dropping_the_future_cancels_and_disposes() {
    let emitter = Arc::new(std::sync::Mutex::new(None));
    let released = Arc::new(AtomicUsize::new(0));
    let mut fut =
      AwaitValue::subscribe(parked(emitter.clone(), released.clone()), Shape::Maybe, ValueObserver::new, maybe_finish);
    assert!(poll_once(&mut fut).is_pending());
    drop(fut);

    assert_eq!(released.load(Ordering::SeqCst), 1);
    let mut e = emitter.lock().unwrap().take().unwrap();
    assert!(e.is_closed());
    e.next(1);
    e.complete();
    assert_eq!(released.load(Ordering::SeqCst), 1);
  }

  #[rxrust_await_macro::test]
  fn signal_cancels_pending_call() {
    let emitter = Arc::new(std::sync::Mutex::new(None));
    let released = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = oneshot::channel::<()>();
    let fut =
      AwaitValue::subscribe(parked(emitter.clone(), released.clone()), Shape::Maybe, ValueObserver::new, maybe_finish)
        .until(async move {
          let _ = rx.await;
        });
    let mut fut = Box::pin(fut);

    assert!(poll_once(&mut fut).is_pending());
    tx.send(()).unwrap();
    assert_eq!(poll_once(&mut fut), Poll::Ready(Err(AwaitError::Cancelled)));
    assert_eq!(released.load(Ordering::SeqCst), 1);
  }

  #[rxrust_await_macro::test]
  fn signal_loses_to_a_resolved_producer() {
    let fut = AwaitValue::subscribe(
      observable::throw_err::<i32, &'static str>("E1"),
      Shape::Single,
      ValueObserver::new,
      maybe_finish,
    )
    .until(std::future::ready(()));
    let mut fut = Box::pin(fut);

    assert_eq!(poll_once(&mut fut), Poll::Ready(Err(AwaitError::Propagated("E1"))));
  }

  #[rxrust_await_macro::test]
  fn explicit_cancel() {
    let mut fut = AwaitValue::subscribe(
      observable::never::<i32, &'static str>(),
      Shape::Single,
      ValueObserver::new,
      maybe_finish,
    );
    assert!(fut.cancel());
    assert!(!fut.cancel());
    assert_eq!(poll_once(&mut fut), Poll::Ready(Err(AwaitError::Cancelled)));
  }
}
