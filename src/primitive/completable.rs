use std::{
  convert::Infallible,
  future::{Future, Pending},
};

use futures::{FutureExt, future::Map};

use super::impl_primitive;
use crate::{
  bridge::{Shape, SignalObserver},
  error::AwaitError,
  observable::{
    self, CoreObservable, Create, CreateShared, Empty, FromFuture, Never, ObservableType, SharedEmitter, ThrowErr,
  },
  observer::Emitter,
  slot::Outcome,
  subscription::Subscription,
  value::AwaitValue,
};

/// A sequence that only completes or errors.
///
/// Its source emits `Infallible` items, so a value is unrepresentable.
///
/// ```rust
/// use rxrust_await::prelude::*;
///
/// let done: Result<(), AwaitError<&str>> = Completable::empty().blocking_value();
/// assert_eq!(done, Ok(()));
/// assert_eq!(Completable::error("E2").blocking_value(), Err(AwaitError::Propagated("E2")));
/// ```
#[derive(Clone)]
pub struct Completable<S>(S);

impl_primitive!(Completable);

/// The future a [`Completable::from_future`] source runs.
pub type CompletableFuture<F, E> = Map<F, fn(Result<(), E>) -> Result<Option<Infallible>, E>>;

impl<E> Completable<Empty<Infallible, E>> {
  /// Completes immediately.
  pub fn empty() -> Self { Completable(observable::empty()) }
}

impl<E> Completable<ThrowErr<Infallible, E>> {
  /// Fails with `err`.
  pub fn error(err: E) -> Self { Completable(observable::throw_err(err)) }
}

impl<E> Completable<Never<Infallible, E>> {
  pub fn never() -> Self { Completable(observable::never()) }
}

impl<F, E> Completable<Create<F, Infallible, E>> {
  /// A completable driven by `f`; the emitter only accepts `complete` and
  /// `error`.
  pub fn create<U>(f: F) -> Self
  where
    F: FnOnce(&mut dyn Emitter<Infallible, E>) -> U,
    U: Subscription,
  {
    Completable(observable::create(f))
  }
}

impl<F, E> Completable<CreateShared<F, Infallible, E>> {
  pub fn create_shared<U>(f: F) -> Self
  where
    F: FnOnce(SharedEmitter<Infallible, E>) -> U,
    U: Subscription,
  {
    Completable(observable::create_shared(f))
  }
}

impl<Fut, Sch, E> Completable<FromFuture<CompletableFuture<Fut, E>, Sch>>
where
  Fut: Future<Output = Result<(), E>>,
{
  /// A completable finished by `future`, run on `scheduler`.
  pub fn from_future(future: Fut, scheduler: Sch) -> Self {
    let nothing: fn(Result<(), E>) -> Result<Option<Infallible>, E> = |result| result.map(|()| None);
    Completable(observable::from_future(future.map(nothing), scheduler))
  }
}

fn finish<E>(outcome: Outcome<(), E>) -> Result<(), AwaitError<E>> { outcome.into_result().map(drop) }

impl<S, E> Completable<S>
where
  S: ObservableType<Item = Infallible, Err = E> + CoreObservable<SignalObserver<E>>,
  S::Unsub: Send + 'static,
{
  /// Subscribe and wait for completion.
  pub fn value(self) -> AwaitValue<(), E, (), Pending<()>> {
    AwaitValue::subscribe(self.0, Shape::Completable, SignalObserver::new, finish)
  }

  pub fn value_until<Sig>(self, signal: Sig) -> AwaitValue<(), E, (), Sig>
  where
    Sig: Future<Output = ()>,
  {
    self.value().until(signal)
  }

  pub fn blocking_value(self) -> Result<(), AwaitError<E>> { futures::executor::block_on(self.value()) }
}
