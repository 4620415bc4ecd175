//! Primitive sequences: producers restricted to one terminal outcome.
//!
//! Each shape wraps an arbitrary source and adds its own constructors and
//! the `value()` entry point. The wrapped source is untouched; the shape only
//! decides how its events are read.
//!
//! | Shape | `value()` resolves to |
//! |-------|-----------------------|
//! | [`Single`] | `Result<T, AwaitError<E>>` |
//! | [`Maybe`] | `Result<Option<T>, AwaitError<E>>` |
//! | [`Completable`] | `Result<(), AwaitError<E>>` |
//!
//! [`AwaitError<E>`]: crate::error::AwaitError

mod completable;
mod maybe;
mod single;

pub use completable::*;
pub use maybe::*;
pub use single::*;

/// Implements the shape newtype's plumbing: `new`, `into_inner` and the
/// producer contract forwarded to the wrapped source.
macro_rules! impl_primitive {
  ($ty:ident) => {
    impl<S> $ty<S> {
      /// Read `source` as this shape.
      #[inline]
      pub fn new(source: S) -> Self { $ty(source) }

      #[inline]
      pub fn into_inner(self) -> S { self.0 }
    }

    impl<S: $crate::observable::ObservableType> $crate::observable::ObservableType for $ty<S> {
      type Item = S::Item;
      type Err = S::Err;
    }

    impl<S, O> $crate::observable::CoreObservable<O> for $ty<S>
    where
      S: $crate::observable::CoreObservable<O>,
    {
      type Unsub = S::Unsub;

      #[inline]
      fn subscribe(self, observer: O) -> Self::Unsub { self.0.subscribe(observer) }
    }
  };
}

use impl_primitive;
