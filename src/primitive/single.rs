use std::future::{Future, Pending};

use futures::{FutureExt, future::Map};

use super::impl_primitive;
use crate::{
  bridge::{Shape, ValueObserver},
  error::{AwaitError, ProtocolViolation},
  observable::{
    self, CoreObservable, Create, CreateShared, FromFuture, Never, ObservableType, Of, SharedEmitter, ThrowErr,
  },
  observer::Emitter,
  slot::Outcome,
  subscription::Subscription,
  value::AwaitValue,
};

/// A sequence that emits exactly one value, or an error.
///
/// ```rust
/// use rxrust_await::prelude::*;
///
/// # futures::executor::block_on(async {
/// let hello: Result<&str, AwaitError<()>> = Single::just("Hello").value().await;
/// assert_eq!(hello, Ok("Hello"));
///
/// let failed: Result<i32, _> = Single::error("E1").value().await;
/// assert_eq!(failed, Err(AwaitError::Propagated("E1")));
/// # });
/// ```
#[derive(Clone)]
pub struct Single<S>(S);

impl_primitive!(Single);

/// The future a [`Single::from_future`] source runs.
pub type SingleFuture<F, T, E> = Map<F, fn(Result<T, E>) -> Result<Option<T>, E>>;

impl<T, E> Single<Of<T, E>> {
  /// Emits `value`, then completes.
  pub fn just(value: T) -> Self { Single(observable::of(value)) }
}

impl<T, E> Single<ThrowErr<T, E>> {
  /// Fails with `err`.
  pub fn error(err: E) -> Self { Single(observable::throw_err(err)) }
}

impl<T, E> Single<Never<T, E>> {
  /// Never terminates; only cancellation ends a `value()` on it.
  pub fn never() -> Self { Single(observable::never()) }
}

impl<F, T, E> Single<Create<F, T, E>> {
  /// A single driven by `f`, which must emit one value and complete, or
  /// error, before it returns.
  pub fn create<U>(f: F) -> Self
  where
    F: FnOnce(&mut dyn Emitter<T, E>) -> U,
    U: Subscription,
  {
    Single(observable::create(f))
  }
}

impl<F, T, E> Single<CreateShared<F, T, E>> {
  /// A single driven by an emitter that may be kept and used from any thread.
  pub fn create_shared<U>(f: F) -> Self
  where
    F: FnOnce(SharedEmitter<T, E>) -> U,
    U: Subscription,
  {
    Single(observable::create_shared(f))
  }
}

impl<Fut, Sch, T, E> Single<FromFuture<SingleFuture<Fut, T, E>, Sch>>
where
  Fut: Future<Output = Result<T, E>>,
{
  /// A single resolved by `future`, run on `scheduler`.
  ///
  /// A scheduler that refuses the task leaves the call `Abandoned`.
  pub fn from_future(future: Fut, scheduler: Sch) -> Self {
    let once: fn(Result<T, E>) -> Result<Option<T>, E> = |result| result.map(Some);
    Single(observable::from_future(future.map(once), scheduler))
  }
}

fn finish<T, E>(outcome: Outcome<T, E>) -> Result<T, AwaitError<E>> {
  outcome
    .into_result()?
    .ok_or(AwaitError::Violation(ProtocolViolation::CompletedWithoutValue))
}

impl<S, T, E> Single<S>
where
  S: ObservableType<Item = T, Err = E> + CoreObservable<ValueObserver<T, E>>,
  S::Unsub: Send + 'static,
{
  /// Subscribe and wait for the value.
  ///
  /// The subscription happens now, not on first poll. Dropping the returned
  /// future before it resolves cancels the call and disposes the producer.
  pub fn value(self) -> AwaitValue<T, E, T, Pending<()>> {
    AwaitValue::subscribe(self.0, Shape::Single, ValueObserver::new, finish)
  }

  /// Like [`value`](Self::value), but also cancelled when `signal` completes
  /// first.
  pub fn value_until<Sig>(self, signal: Sig) -> AwaitValue<T, E, T, Sig>
  where
    Sig: Future<Output = ()>,
  {
    self.value().until(signal)
  }

  /// Park the current thread until the value arrives.
  ///
  /// The producer must terminate from another thread, or synchronously
  /// inside `subscribe`.
  pub fn blocking_value(self) -> Result<T, AwaitError<E>> { futures::executor::block_on(self.value()) }
}
