use std::future::Future;

use futures::{
  FutureExt,
  future::{AbortHandle, Abortable},
  task::{Spawn, SpawnExt},
};

use super::{CoreObservable, ObservableType};
use crate::{observer::Observer, subscription::Subscription};

/// Converts a `Future` resolving to `Result<I, Err>` into a producer.
///
/// On subscription the future is spawned on `scheduler`. `Ok(items)` emits
/// every item of `items` and then completes; `Err(e)` is delivered as an
/// error. Events therefore arrive on whatever thread the scheduler runs the
/// future on. Releasing the subscription aborts the spawned future.
///
/// If `scheduler` refuses the task, the observer is dropped with it without
/// ever seeing an event, and the failure is logged at error level. A
/// `value()` call on such a producer resolves to
/// `AwaitError::Violation(ProtocolViolation::Abandoned)`.
///
/// ```rust
/// # #[cfg(feature = "futures-scheduler")] {
/// use futures::executor::ThreadPool;
/// use rxrust_await::prelude::*;
///
/// let pool = ThreadPool::new().unwrap();
/// let single = Single::new(observable::from_future(
///   async { Ok::<_, String>(Some(1 + 1)) },
///   pool,
/// ));
/// assert_eq!(single.blocking_value(), Ok(2));
/// # }
/// ```
pub fn from_future<F, S>(future: F, scheduler: S) -> FromFuture<F, S> {
  FromFuture { future, scheduler }
}

#[derive(Clone)]
pub struct FromFuture<F, S> {
  future: F,
  scheduler: S,
}

impl<F, S, I, Err> ObservableType for FromFuture<F, S>
where
  F: Future<Output = Result<I, Err>>,
  I: IntoIterator,
{
  type Item = I::Item;
  type Err = Err;
}

impl<O, F, S, I, Err> CoreObservable<O> for FromFuture<F, S>
where
  O: Observer<I::Item, Err> + Send + 'static,
  F: Future<Output = Result<I, Err>> + Send + 'static,
  I: IntoIterator,
  S: Spawn,
{
  type Unsub = FutureSubscription;

  fn subscribe(self, mut observer: O) -> Self::Unsub {
    let (handle, registration) = AbortHandle::new_pair();
    let task = self.future.map(move |result| match result {
      Ok(items) => {
        for item in items {
          if observer.is_closed() {
            return;
          }
          observer.next(item);
        }
        observer.complete();
      }
      Err(err) => observer.error(err),
    });

    if let Err(err) = self
      .scheduler
      .spawn(Abortable::new(task, registration).map(|_| ()))
    {
      // The task, and the observer inside it, are gone with the failed spawn.
      tracing::error!(%err, "failed to spawn future producer");
    }
    FutureSubscription(handle)
  }
}

/// Aborts the spawned future when released.
pub struct FutureSubscription(AbortHandle);

impl Subscription for FutureSubscription {
  #[inline]
  fn unsubscribe(self) { self.0.abort() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_aborted() }
}
