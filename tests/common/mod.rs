//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::{
  Arc, Mutex, Once,
  atomic::{AtomicUsize, Ordering},
};

use rxrust_await::prelude::*;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Install a test-writer subscriber once; `RUST_LOG` overrides the default
/// `rxrust_await=trace` filter.
pub fn init_test_logging() {
  INIT_LOGGING.call_once(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rxrust_await=trace"));
    let _ = tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_test_writer()
      .with_thread_ids(true)
      .with_ansi(false)
      .try_init();
  });
}

/// A producer that parks its emitter for the test to drive, and counts how
/// often its subscription is released.
pub struct ParkedSource<T, E> {
  emitter: Arc<Mutex<Option<SharedEmitter<T, E>>>>,
  subscribed: Arc<AtomicUsize>,
  disposals: Arc<AtomicUsize>,
}

impl<T: Send + 'static, E: Send + 'static> ParkedSource<T, E> {
  pub fn new() -> Self {
    ParkedSource {
      emitter: Arc::new(Mutex::new(None)),
      subscribed: Arc::new(AtomicUsize::new(0)),
      disposals: Arc::new(AtomicUsize::new(0)),
    }
  }

  pub fn source(
    &self,
  ) -> observable::CreateShared<
    impl FnOnce(SharedEmitter<T, E>) -> ClosureSubscription<Box<dyn FnOnce() + Send>>,
    T,
    E,
  > {
    let emitter = self.emitter.clone();
    let subscribed = self.subscribed.clone();
    let disposals = self.disposals.clone();
    observable::create_shared(move |e: SharedEmitter<T, E>| {
      *emitter.lock().unwrap() = Some(e);
      subscribed.fetch_add(1, Ordering::SeqCst);
      let release: Box<dyn FnOnce() + Send> = Box::new(move || {
        disposals.fetch_add(1, Ordering::SeqCst);
      });
      ClosureSubscription(release)
    })
  }

  /// The emitter handed to the producer; panics before subscription.
  pub fn emitter(&self) -> SharedEmitter<T, E> {
    self.emitter.lock().unwrap().clone().expect("producer not subscribed yet")
  }

  pub fn is_subscribed(&self) -> bool { self.subscribed.load(Ordering::SeqCst) > 0 }

  pub fn disposals(&self) -> usize { self.disposals.load(Ordering::SeqCst) }
}
