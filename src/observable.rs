//! The producer side: anything that can be subscribed with an observer.
//!
//! The bridge treats producers as an external collaborator with exactly one
//! contract, [`CoreObservable::subscribe`]. The sources in this module are the
//! small set of producers the primitive sequences are built from.
//!
//! | Source | Events |
//! |--------|--------|
//! | [`create`] | whatever the closure emits |
//! | [`of`] | `next(v)`, `complete` |
//! | [`throw_err`] | `error(e)` |
//! | [`empty`] | `complete` |
//! | [`never`] | nothing, until disposed |
//! | [`from_future`] | `next(v)`/`complete` or `error(e)` once the future resolves |

mod create;
mod from_future;
mod of;
mod trivial;

pub use create::*;
pub use from_future::*;
pub use of::*;
pub use trivial::*;

use crate::subscription::Subscription;

/// Declares the event types of a producer.
pub trait ObservableType {
  type Item;
  type Err;
}

/// The producer contract: `subscribe(observer) -> Subscription`.
///
/// Producers may deliver events synchronously inside `subscribe`, or later
/// from any thread of their choosing; the returned handle releases whatever
/// the producer holds for `observer`.
pub trait CoreObservable<O>: ObservableType {
  type Unsub: Subscription;

  fn subscribe(self, observer: O) -> Self::Unsub;
}
