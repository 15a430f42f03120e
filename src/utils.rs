use std::{cell::{Ref, RefCell, RefMut}, rc::Rc};

/// Shared, interior-mutable handle. Cloning is shallow: every clone points at
/// the same cell.
#[derive(Debug, Default)]
pub struct RcCell<T> {
	inner: Rc<RefCell<T>>,
}

impl<T> Clone for RcCell<T> {
	fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<T> RcCell<T> {
	pub fn new(value: T) -> Self { Self { inner: Rc::new(RefCell::new(value)) } }

	pub fn borrow(&self) -> Ref<'_, T> { self.inner.borrow() }

	pub fn borrow_mut(&self) -> RefMut<'_, T> { self.inner.borrow_mut() }
}

/// Keep at least this much stack available before recursing.
const RED_ZONE: usize = 100 * 1024;

/// Size of each freshly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the native stack first when less than [`RED_ZONE`] is
/// left. Wraps the recursive entry points of the parser and the interpreter
/// so that deeply nested programs do not overflow.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R { stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f) }
