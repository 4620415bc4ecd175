use std::future::{Future, Pending};

use super::impl_primitive;
use crate::{
  bridge::{Shape, ValueObserver},
  error::AwaitError,
  observable::{
    self, CoreObservable, Create, CreateShared, Empty, FromFuture, Never, ObservableType, Of, SharedEmitter,
    ThrowErr,
  },
  observer::Emitter,
  slot::Outcome,
  subscription::Subscription,
  value::AwaitValue,
};

/// A sequence that emits at most one value and then completes, or errors.
///
/// Completion without a value resolves to `Ok(None)`, the same as an
/// explicitly absent value from [`Maybe::from_option`] or a `from_future`
/// source yielding `Ok(None)`.
///
/// ```rust
/// use rxrust_await::prelude::*;
///
/// let some: Result<_, AwaitError<()>> = Maybe::just(1).blocking_value();
/// assert_eq!(some, Ok(Some(1)));
///
/// let none: Result<Option<i32>, AwaitError<()>> = Maybe::empty().blocking_value();
/// assert_eq!(none, Ok(None));
/// ```
#[derive(Clone)]
pub struct Maybe<S>(S);

impl_primitive!(Maybe);

impl<T, E> Maybe<Of<T, E>> {
  /// Emits `value`, then completes.
  pub fn just(value: T) -> Self { Maybe(observable::of(value)) }

  /// Emits the value if there is one, then completes.
  pub fn from_option(value: Option<T>) -> Self { Maybe(observable::of_option(value)) }
}

impl<T, E> Maybe<Empty<T, E>> {
  /// Completes without a value.
  pub fn empty() -> Self { Maybe(observable::empty()) }
}

impl<T, E> Maybe<ThrowErr<T, E>> {
  /// Fails with `err`.
  pub fn error(err: E) -> Self { Maybe(observable::throw_err(err)) }
}

impl<T, E> Maybe<Never<T, E>> {
  pub fn never() -> Self { Maybe(observable::never()) }
}

impl<F, T, E> Maybe<Create<F, T, E>> {
  pub fn create<U>(f: F) -> Self
  where
    F: FnOnce(&mut dyn Emitter<T, E>) -> U,
    U: Subscription,
  {
    Maybe(observable::create(f))
  }
}

impl<F, T, E> Maybe<CreateShared<F, T, E>> {
  pub fn create_shared<U>(f: F) -> Self
  where
    F: FnOnce(SharedEmitter<T, E>) -> U,
    U: Subscription,
  {
    Maybe(observable::create_shared(f))
  }
}

impl<Fut, Sch, T, E> Maybe<FromFuture<Fut, Sch>>
where
  Fut: Future<Output = Result<Option<T>, E>>,
{
  /// A maybe resolved by `future`, run on `scheduler`; `Ok(None)` is an
  /// empty completion.
  pub fn from_future(future: Fut, scheduler: Sch) -> Self {
    Maybe(observable::from_future(future, scheduler))
  }
}

impl<S, T, E> Maybe<S>
where
  S: ObservableType<Item = T, Err = E> + CoreObservable<ValueObserver<T, E>>,
  S::Unsub: Send + 'static,
{
  /// Subscribe and wait for the value, if any.
  pub fn value(self) -> AwaitValue<T, E, Option<T>, Pending<()>> {
    AwaitValue::subscribe(self.0, Shape::Maybe, ValueObserver::new, Outcome::into_result)
  }

  pub fn value_until<Sig>(self, signal: Sig) -> AwaitValue<T, E, Option<T>, Sig>
  where
    Sig: Future<Output = ()>,
  {
    self.value().until(signal)
  }

  pub fn blocking_value(self) -> Result<Option<T>, AwaitError<E>> { futures::executor::block_on(self.value()) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ProtocolViolation;

  #[rxrust_await_macro::test(local)]
  async fn just_and_empty() {
    let value: Result<_, AwaitError<()>> = Maybe::just("Hello").value().await;
    assert_eq!(value, Ok(Some("Hello")));

    let value: Result<Option<i32>, AwaitError<()>> = Maybe::empty().value().await;
    assert_eq!(value, Ok(None));
  }

  #[rxrust_await_macro::test(local)]
  async fn absent_value_is_the_same_as_empty() {
    let value: Result<Option<i32>, AwaitError<()>> = Maybe::from_option(None).value().await;
    assert_eq!(value, Ok(None));

    let value: Result<_, AwaitError<()>> = Maybe::from_option(Some(3)).value().await;
    assert_eq!(value, Ok(Some(3)));
  }

  #[rxrust_await_macro::test(local)]
  async fn error_propagates() {
    let value: Result<Option<i32>, _> = Maybe::error("E1").value().await;
    assert_eq!(value, Err(AwaitError::Propagated("E1")));
  }

  #[rxrust_await_macro::test(local)]
  async fn second_value_is_a_violation() {
    let maybe = Maybe::create(|emitter: &mut dyn Emitter<i32, ()>| {
      emitter.next(1);
      emitter.next(2);
    });
    assert_eq!(maybe.value().await, Err(AwaitError::Violation(ProtocolViolation::MultipleValues)));
  }

  #[rxrust_await_macro::test(local)]
  async fn dropping_the_emitter_is_abandonment() {
    let maybe = Maybe::create_shared(|emitter: SharedEmitter<i32, ()>| drop(emitter));
    assert_eq!(maybe.value().await, Err(AwaitError::Violation(ProtocolViolation::Abandoned)));
  }
}
