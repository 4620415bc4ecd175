use std::marker::PhantomData;

use super::{CoreObservable, ObservableType};
use crate::observer::Observer;

/// Creates a producer that emits `value` and then completes.
pub fn of<Item, Err>(value: Item) -> Of<Item, Err> { Of(Some(value), PhantomData) }

/// Emits the contained value if there is one, then completes.
pub fn of_option<Item, Err>(value: Option<Item>) -> Of<Item, Err> { Of(value, PhantomData) }

#[derive(Clone)]
pub struct Of<Item, Err>(Option<Item>, PhantomData<fn() -> Err>);

impl<Item, Err> ObservableType for Of<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<O, Item, Err> CoreObservable<O> for Of<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn subscribe(self, mut observer: O) -> Self::Unsub {
    if let Some(value) = self.0 {
      if !observer.is_closed() {
        observer.next(value);
      }
    }
    observer.complete();
  }
}

/// Creates a producer that emits no items and terminates with `err`.
pub fn throw_err<Item, Err>(err: Err) -> ThrowErr<Item, Err> { ThrowErr(err, PhantomData) }

#[derive(Clone)]
pub struct ThrowErr<Item, Err>(Err, PhantomData<fn() -> Item>);

impl<Item, Err> ObservableType for ThrowErr<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<O, Item, Err> CoreObservable<O> for ThrowErr<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn subscribe(self, observer: O) -> Self::Unsub { observer.error(self.0) }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::observer::FnObserver;

  #[rxrust_await_macro::test]
  fn of_emits_then_completes() {
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2) = (log.clone(), log.clone());
    of::<_, ()>(42).subscribe(FnObserver {
      on_next: move |v: i32| l1.borrow_mut().push(v),
      on_complete: move || l2.borrow_mut().push(-1),
      on_error: |_: ()| unreachable!(),
    });
    assert_eq!(*log.borrow(), vec![42, -1]);
  }

  #[rxrust_await_macro::test]
  fn of_none_only_completes() {
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2) = (log.clone(), log.clone());
    of_option::<i32, ()>(None).subscribe(FnObserver {
      on_next: move |v: i32| l1.borrow_mut().push(v),
      on_complete: move || l2.borrow_mut().push(-1),
      on_error: |_: ()| unreachable!(),
    });
    assert_eq!(*log.borrow(), vec![-1]);
  }

  #[rxrust_await_macro::test]
  fn throw_err_only_errors() {
    let err = Rc::new(RefCell::new(None));
    let e = err.clone();
    throw_err::<i32, _>("bad").subscribe(FnObserver {
      on_next: |_: i32| unreachable!(),
      on_complete: || unreachable!(),
      on_error: move |v: &str| *e.borrow_mut() = Some(v.to_string()),
    });
    assert_eq!(err.borrow().as_deref(), Some("bad"));
  }
}
