use std::{cell::RefCell, fmt, rc::Rc};

use quill_memory::Address;

/// An opaque, host-provided object exposed to scripts as a `Resource` value
///
/// Mirrors `original_source/builtin.cc`'s `Close`/`IsAvailable` pair: a resource must release its
/// underlying handle exactly once, either via an explicit `close()` call from a script or when
/// its last reference is dropped.
pub trait Resource: fmt::Debug {
    /// Idempotent release of the underlying handle
    fn close(&mut self);

    /// True until `close` has been called
    fn is_available(&self) -> bool;
}

/// A reference-counted, shared handle to a [Resource]
///
/// This is the only `QValue` variant that shares state across clones: copying a `ResourceHandle`
/// shares the same underlying resource, and its lifetime is the longest-lived clone.
#[derive(Clone, Debug)]
pub struct ResourceHandle(Rc<RefCell<dyn Resource>>);

impl ResourceHandle {
    /// Wraps a resource in a new handle
    pub fn new(resource: impl Resource + 'static) -> Self {
        Self(Rc::new(RefCell::new(resource)))
    }

    /// True if both handles share the same underlying resource
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The address of the shared allocation, used to give resources a stable map-key ordering
    pub fn address(&self) -> Address {
        Address::from(Rc::as_ptr(&self.0))
    }

    /// Closes the underlying resource
    pub fn close(&self) {
        self.0.borrow_mut().close();
    }

    /// True until the resource has been closed
    pub fn is_available(&self) -> bool {
        self.0.borrow().is_available()
    }
}

impl Drop for ResourceHandle {
    /// Closes the resource when its last reference is dropped, so a script that never calls
    /// `close()` explicitly still releases the underlying handle exactly once.
    fn drop(&mut self) {
        if Rc::strong_count(&self.0) == 1 {
            self.0.borrow_mut().close();
        }
    }
}
