//! Observer trait and implementations
//!
//! The Observer trait is the fixed capability a producer delivers events to.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of a producer's events
///
/// `error` and `complete` consume the observer, so once a terminal event has
/// been delivered through a given observer value nothing else can follow it.
pub trait Observer<Item, Err> {
  /// Receive the next value from the producer
  fn next(&mut self, value: Item);

  /// Handle an error from the producer
  fn error(self, err: Err);

  /// Handle completion of the producer
  fn complete(self);

  /// Returns `true` if the observer will not accept more events.
  ///
  /// Producers use this to stop emitting early, e.g. after the awaiting side
  /// has been cancelled.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// Emitter Trait
// ============================================================================

/// A trait for emitting items to an Observer via mutable reference.
///
/// Unlike `Observer`, which consumes `self` for `error` and `complete`,
/// `Emitter` takes `&mut self` for all methods. This lets `create` hand a
/// `&mut dyn Emitter` to its closure without leaking the concrete observer
/// type into the producer's signature. Events after the first terminal one
/// are dropped.
pub trait Emitter<Item, Err> {
  fn next(&mut self, value: Item);
  fn error(&mut self, err: Err);
  fn complete(&mut self);
  fn is_closed(&self) -> bool;
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Helper trait to enable object-safe Observers (Box<dyn Observer>)
///
/// Standard Observer trait is not object-safe because methods take `self` by
/// value. DynObserver mirrors the interface but adapts it for vtables.
pub trait DynObserver<Item, Err> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }
  fn box_error(self: Box<Self>, err: Err) { (*self).error(err); }
  fn box_complete(self: Box<Self>) { (*self).complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// Boxed observer with Send bound, for producers that deliver from another
/// thread.
pub type BoxedObserverSend<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + Send + 'a>;

impl<'a, Item, Err> Observer<Item, Err> for BoxedObserverSend<'a, Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: Err) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

// ============================================================================
// Option observer
// ============================================================================

/// Option observer - None ignores all events, Some delegates to inner
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().is_none_or(Observer::is_closed) }
}

/// Adapts an observer to the `Emitter` facade: terminal events take the
/// observer out, so later events find nothing to deliver to.
pub struct ObserverEmitter<O>(pub Option<O>);

impl<O, Item, Err> Emitter<Item, Err> for ObserverEmitter<O>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) {
    if let Some(observer) = &mut self.0 {
      observer.next(value);
    }
  }

  #[inline]
  fn error(&mut self, err: Err) {
    if let Some(observer) = self.0.take() {
      observer.error(err);
    }
  }

  #[inline]
  fn complete(&mut self) {
    if let Some(observer) = self.0.take() {
      observer.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.as_ref().is_none_or(Observer::is_closed) }
}

// ============================================================================
// FnObserver - Closure adapter
// ============================================================================

/// An observer built from three callbacks, the shape of the raw
/// `subscribe(onValue, onCompleted, onError)` contract.
#[derive(Clone)]
pub struct FnObserver<N, C, E> {
  pub on_next: N,
  pub on_complete: C,
  pub on_error: E,
}

impl<N, C, E, Item, Err> Observer<Item, Err> for FnObserver<N, C, E>
where
  N: FnMut(Item),
  C: FnOnce(),
  E: FnOnce(Err),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.on_next)(value) }

  #[inline]
  fn error(self, err: Err) { (self.on_error)(err) }

  #[inline]
  fn complete(self) { (self.on_complete)() }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// Tests
// ============================================================================
