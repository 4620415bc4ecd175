//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Producer contract and sources
pub use crate::observable::{self, CoreObservable, ObservableType, SharedEmitter};
// Observer traits
pub use crate::observer::{Emitter, FnObserver, Observer};
// Primitive shapes
pub use crate::primitive::{Completable, Maybe, Single};
// Default schedulers
#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::ThreadPool;
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;
// Subscription
pub use crate::subscription::*;
pub use crate::{
  bridge::Shape,
  error::{AwaitError, ProtocolViolation},
  slot::{Outcome, ResolutionSlot},
  value::AwaitValue,
};
