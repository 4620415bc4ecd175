//! Where `from_future` producers run.
//!
//! Any [`futures::task::Spawn`] works as a scheduler. Two are provided behind
//! Cargo features:
//!
//! - `futures-scheduler` (default): [`ThreadPool`], the `futures` thread pool.
//! - `tokio-scheduler`: [`TokioScheduler`], which spawns onto a tokio runtime.

#[cfg(feature = "futures-scheduler")]
pub use futures::executor::ThreadPool;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler {
  use futures::task::{FutureObj, Spawn, SpawnError};
  use tokio::runtime::Handle;

  /// Spawns onto a tokio runtime: the one it was built with, or else the
  /// runtime current at spawn time.
  #[derive(Clone, Debug, Default)]
  pub struct TokioScheduler {
    handle: Option<Handle>,
  }

  impl TokioScheduler {
    /// Spawn onto whatever runtime is current when the producer subscribes.
    pub fn current() -> Self { Self::default() }

    pub fn with_handle(handle: Handle) -> Self { Self { handle: Some(handle) } }
  }

  impl Spawn for TokioScheduler {
    fn spawn_obj(&self, future: FutureObj<'static, ()>) -> Result<(), SpawnError> {
      let handle = match &self.handle {
        Some(handle) => handle.clone(),
        None => Handle::try_current().map_err(|err| {
          tracing::error!(%err, "no tokio runtime to spawn on");
          SpawnError::shutdown()
        })?,
      };
      handle.spawn(future);
      Ok(())
    }
  }

  #[cfg(test)]
  mod tests {
    use futures::task::SpawnExt;

    use super::*;

    #[rxrust_await_macro::test(shared)]
    async fn spawns_on_current_runtime() {
      let (tx, rx) = futures::channel::oneshot::channel();
      TokioScheduler::current()
        .spawn(async move {
          let _ = tx.send(7);
        })
        .unwrap();
      assert_eq!(rx.await, Ok(7));
    }

    #[rxrust_await_macro::test]
    fn outside_a_runtime_spawn_fails() {
      assert!(TokioScheduler::current().spawn(async {}).is_err());
    }
  }
}
