use std::{
  marker::PhantomData,
  sync::{Arc, Mutex, PoisonError},
};

use super::{CoreObservable, ObservableType};
use crate::{observer::Observer, subscription::Subscription};

/// Creates a producer that completes immediately without emitting.
pub fn empty<Item, Err>() -> Empty<Item, Err> { Empty(PhantomData) }

#[derive(Clone)]
pub struct Empty<Item, Err>(PhantomData<fn() -> (Item, Err)>);

impl<Item, Err> ObservableType for Empty<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<O, Item, Err> CoreObservable<O> for Empty<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn subscribe(self, observer: O) -> Self::Unsub { observer.complete() }
}

/// Creates a producer that never emits anything.
///
/// The observer is parked inside the returned subscription and released when
/// the subscription is, so the observer stays alive, and silent, until the
/// subscriber lets go.
pub fn never<Item, Err>() -> Never<Item, Err> { Never(PhantomData) }

#[derive(Clone)]
pub struct Never<Item, Err>(PhantomData<fn() -> (Item, Err)>);

impl<Item, Err> ObservableType for Never<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<O, Item, Err> CoreObservable<O> for Never<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = NeverSubscription<O>;

  fn subscribe(self, observer: O) -> Self::Unsub {
    NeverSubscription(Arc::new(Mutex::new(Some(observer))))
  }
}

/// Holds a `never` subscriber's observer until released.
pub struct NeverSubscription<O>(Arc<Mutex<Option<O>>>);

impl<O> Subscription for NeverSubscription<O> {
  fn unsubscribe(self) {
    let observer = self.0.lock().unwrap_or_else(PoisonError::into_inner).take();
    drop(observer);
  }

  fn is_closed(&self) -> bool { self.0.lock().unwrap_or_else(PoisonError::into_inner).is_none() }
}
