//! Shared mutable cells for single-threaded operator state.
//!
//! Every piece of per-subscription state that more than one observer touches
//! (zip buffers, flattening counters, the downstream observer slot) lives in
//! a [`MutRc`]. Borrows are short: an operator never holds a borrow while it
//! calls into another observer.

use std::{
  cell::{Ref, RefCell, RefMut},
  fmt::{Debug, Formatter},
  rc::{Rc, Weak},
};

#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  #[inline]
  pub fn rc_deref(&self) -> Ref<'_, T> { self.0.borrow() }

  #[inline]
  pub fn rc_deref_mut(&self) -> RefMut<'_, T> { self.0.borrow_mut() }

  /// Immutable borrow that yields `None` while the cell is mutably borrowed
  /// further up the call stack.
  #[inline]
  pub fn try_rc_deref(&self) -> Option<Ref<'_, T>> { self.0.try_borrow().ok() }

  /// Mutable borrow that yields `None` while the cell is borrowed further up
  /// the call stack.
  #[inline]
  pub fn try_rc_deref_mut(&self) -> Option<RefMut<'_, T>> { self.0.try_borrow_mut().ok() }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }

  pub fn downgrade(&self) -> WeakMutRc<T> { WeakMutRc(Rc::downgrade(&self.0)) }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> From<T> for MutRc<T> {
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T: Debug> Debug for MutRc<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.try_rc_deref() {
      Some(inner) => f.debug_tuple("MutRc").field(&*inner).finish(),
      None => f.write_str("MutRc(<borrowed>)"),
    }
  }
}

/// Non-owning counterpart of [`MutRc`], used where a handle must not keep
/// its target alive (cancel tokens pointing back into the scheduler).
pub struct WeakMutRc<T>(Weak<RefCell<T>>);

impl<T> WeakMutRc<T> {
  pub fn upgrade(&self) -> Option<MutRc<T>> { self.0.upgrade().map(MutRc) }
}

impl<T> Clone for WeakMutRc<T> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}
