//! # rxrust-await: awaiting Rx primitive sequences
//!
//! Bridges a push-based primitive sequence, which terminates exactly once,
//! into a future the caller can `.await` (or block on).
//!
//! ## Quick Start
//!
//! ```rust
//! use rxrust_await::prelude::*;
//!
//! # futures::executor::block_on(async {
//! let greeting: Result<&str, AwaitError<()>> = Single::just("Hello").value().await;
//! assert_eq!(greeting, Ok("Hello"));
//!
//! let nothing: Result<Option<i32>, AwaitError<()>> = Maybe::empty().value().await;
//! assert_eq!(nothing, Ok(None));
//!
//! assert_eq!(Completable::error("E2").value().await, Err(AwaitError::Propagated("E2")));
//! # });
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Single`] / [`Maybe`] / [`Completable`] | The three producer shapes and their `value()` entry points |
//! | [`ResolutionSlot`] | One-shot cell holding the single terminal [`Outcome`] |
//! | [`AwaitValue`] | The future behind `value()`; dropping it cancels the producer |
//! | [`AwaitError`] | Producer error, cancellation, or [`ProtocolViolation`] |
//! | [`Subscription`] | Handle that releases a producer |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): `futures` thread pool for
//!   `from_future` producers
//! - **`tokio-scheduler`**: a `Spawn` implementation backed by tokio
//!
//! [`Single`]: primitive::Single
//! [`Maybe`]: primitive::Maybe
//! [`Completable`]: primitive::Completable
//! [`ResolutionSlot`]: slot::ResolutionSlot
//! [`Outcome`]: slot::Outcome
//! [`AwaitValue`]: value::AwaitValue
//! [`AwaitError`]: error::AwaitError
//! [`ProtocolViolation`]: error::ProtocolViolation
//! [`Subscription`]: subscription::Subscription

pub mod bridge;
pub mod error;
pub mod observable;
pub mod observer;
pub mod prelude;
pub mod primitive;
pub mod relay;
pub mod scheduler;
pub mod slot;
pub mod subscription;
pub mod value;

pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
