use super::Subscription;

/// Helper trait for calling unsubscribe on boxed trait objects
///
/// Since `Subscription::unsubscribe(self)` requires `Sized`, we need this
/// workaround trait to enable `Box<dyn Subscription>` to call unsubscribe.
pub trait BoxedSubscriptionInner {
  fn boxed_unsubscribe(self: Box<Self>);
  fn boxed_is_closed(&self) -> bool;
}

impl<T: Subscription> BoxedSubscriptionInner for T {
  #[inline]
  fn boxed_unsubscribe(self: Box<Self>) { (*self).unsubscribe() }

  #[inline]
  fn boxed_is_closed(&self) -> bool { self.is_closed() }
}

/// A type-erased, thread-safe subscription.
///
/// Producers of different shapes hand back different handle types; the
/// disposal cell stores them side by side in this form. Handles are
/// `'static` control objects, never borrows, so they can be released from
/// whichever thread wins the disposal race.
///
/// ```rust
/// use rxrust_await::prelude::*;
///
/// let subs = vec![BoxedSubscriptionSend::new(()), BoxedSubscriptionSend::new(())];
/// for sub in subs {
///   sub.unsubscribe();
/// }
/// ```
pub struct BoxedSubscriptionSend(Box<dyn BoxedSubscriptionInner + Send>);

impl BoxedSubscriptionSend {
  #[inline]
  pub fn new(subscription: impl Subscription + Send + 'static) -> Self {
    Self(Box::new(subscription))
  }
}

impl Subscription for BoxedSubscriptionSend {
  #[inline]
  fn unsubscribe(self) { self.0.boxed_unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.boxed_is_closed() }
}
