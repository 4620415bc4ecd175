use std::{
  marker::PhantomData,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::{CoreObservable, ObservableType};
use crate::{
  observer::{BoxedObserverSend, Emitter, Observer, ObserverEmitter},
  subscription::Subscription,
};

/// Producer created from a function.
///
/// The closure receives a `&mut dyn Emitter` for the duration of `subscribe`
/// and returns the teardown handle. Since the emitter cannot outlive the call,
/// a closure that returns without a terminal event leaves its observer with
/// no way to terminate; the observer is dropped at that point.
///
/// ```rust
/// use rxrust_await::prelude::*;
///
/// let sub = observable::create(|emitter: &mut dyn Emitter<i32, ()>| {
///   emitter.next(1);
///   emitter.complete();
/// })
/// .subscribe(FnObserver {
///   on_next: |v: i32| assert_eq!(v, 1),
///   on_complete: || {},
///   on_error: |_: ()| {},
/// });
/// assert!(sub.is_closed());
/// ```
pub fn create<F, Item, Err, U>(f: F) -> Create<F, Item, Err>
where
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
  U: Subscription,
{
  Create { f, _marker: PhantomData }
}

#[derive(Clone)]
pub struct Create<F, Item, Err> {
  f: F,
  _marker: PhantomData<fn() -> (Item, Err)>,
}

impl<F, Item, Err> ObservableType for Create<F, Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<O, F, Item, Err, U> CoreObservable<O> for Create<F, Item, Err>
where
  O: Observer<Item, Err>,
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
  U: Subscription,
{
  type Unsub = U;

  fn subscribe(self, observer: O) -> Self::Unsub {
    let mut emitter = ObserverEmitter(Some(observer));
    (self.f)(&mut emitter)
  }
}

// ============================================================================
// Shared creation: the emitter may be kept and used from any thread
// ============================================================================

/// Producer created from a function that receives an owned, cloneable,
/// thread-safe emitter.
///
/// Use this for producers that terminate later, from another thread or task.
/// Once every clone of the emitter is dropped without a terminal event, the
/// observer is dropped with them.
pub fn create_shared<F, Item, Err, U>(f: F) -> CreateShared<F, Item, Err>
where
  F: FnOnce(SharedEmitter<Item, Err>) -> U,
  U: Subscription,
{
  CreateShared { f, _marker: PhantomData }
}

#[derive(Clone)]
pub struct CreateShared<F, Item, Err> {
  f: F,
  _marker: PhantomData<fn() -> (Item, Err)>,
}

impl<F, Item, Err> ObservableType for CreateShared<F, Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<O, F, Item, Err, U> CoreObservable<O> for CreateShared<F, Item, Err>
where
  O: Observer<Item, Err> + Send + 'static,
  F: FnOnce(SharedEmitter<Item, Err>) -> U,
  U: Subscription,
{
  type Unsub = U;

  fn subscribe(self, observer: O) -> Self::Unsub {
    let boxed: BoxedObserverSend<'static, Item, Err> = Box::new(observer);
    (self.f)(SharedEmitter::new(boxed))
  }
}

/// A cloneable emitter handle that may cross threads.
///
/// Events are delivered without holding the emitter's lock, so the observer,
/// and any teardown it triggers, may call back into a clone of the emitter.
/// A terminal event arriving while a value is being delivered is deferred
/// until that delivery returns. Emission must still be serialized: a value
/// sent while another one is in flight is dropped.
pub struct SharedEmitter<Item, Err>(Arc<Mutex<EmitterState<Item, Err>>>);

enum EmitterState<Item, Err> {
  Ready(BoxedObserverSend<'static, Item, Err>),
  /// The observer is out delivering a value; holds a deferred terminal event.
  Delivering(Option<Terminal<Err>>),
  Closed,
}

enum Terminal<Err> {
  Error(Err),
  Complete,
}

impl<Err> Terminal<Err> {
  fn deliver<Item>(self, observer: BoxedObserverSend<'static, Item, Err>) {
    match self {
      Terminal::Error(err) => observer.error(err),
      Terminal::Complete => observer.complete(),
    }
  }
}

impl<Item, Err> Clone for SharedEmitter<Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Item, Err> SharedEmitter<Item, Err> {
  fn new(observer: BoxedObserverSend<'static, Item, Err>) -> Self {
    Self(Arc::new(Mutex::new(EmitterState::Ready(observer))))
  }

  fn state(&self) -> MutexGuard<'_, EmitterState<Item, Err>> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn terminate(&self, terminal: Terminal<Err>) {
    let observer = {
      let mut state = self.state();
      match std::mem::replace(&mut *state, EmitterState::Closed) {
        EmitterState::Ready(observer) => observer,
        EmitterState::Delivering(None) => {
          *state = EmitterState::Delivering(Some(terminal));
          return;
        }
        settled => {
          *state = settled;
          return;
        }
      }
    };
    terminal.deliver(observer);
  }
}

impl<Item, Err> Emitter<Item, Err> for SharedEmitter<Item, Err> {
  fn next(&mut self, value: Item) {
    let mut observer = {
      let mut state = self.state();
      match std::mem::replace(&mut *state, EmitterState::Delivering(None)) {
        EmitterState::Ready(observer) => observer,
        settled => {
          if matches!(settled, EmitterState::Delivering(_)) {
            tracing::warn!("value emitted while another was being delivered, dropped");
          }
          *state = settled;
          return;
        }
      }
    };

    observer.next(value);

    let terminal = {
      let mut state = self.state();
      match std::mem::replace(&mut *state, EmitterState::Closed) {
        EmitterState::Delivering(Some(terminal)) => terminal,
        _ => {
          *state = EmitterState::Ready(observer);
          return;
        }
      }
    };
    terminal.deliver(observer);
  }

  fn error(&mut self, err: Err) { self.terminate(Terminal::Error(err)) }

  fn complete(&mut self) { self.terminate(Terminal::Complete) }

  fn is_closed(&self) -> bool {
    match &*self.state() {
      EmitterState::Ready(observer) => observer.is_closed(),
      EmitterState::Delivering(terminal) => terminal.is_some(),
      EmitterState::Closed => true,
    }
  }
}
