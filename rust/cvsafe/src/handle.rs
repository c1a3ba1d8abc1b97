//! Owning wrapper around a single native object.
//!
//! A [`Handle`] holds at most one raw pointer handed out by the native engine and
//! guarantees that the matching destructor runs at most once, no matter how many
//! times [`Handle::release`] is called or whether the handle is simply dropped.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use cvsafe_common::{Result, error::Error};

use crate::config;

/// Describes one kind of native object: its raw type and how to destroy it.
///
/// # Safety
///
/// `destroy` must release exactly the object behind the pointer and must not touch
/// anything else. It is called at most once per acquired pointer.
pub unsafe trait ResourceKind {
    type Raw;

    /// Human-readable name used in errors and log records.
    const NAME: &'static str;

    /// Releases the native object.
    ///
    /// # Safety
    ///
    /// `ptr` must have been produced by the native constructor for this kind and must
    /// not have been destroyed already.
    unsafe fn destroy(ptr: NonNull<Self::Raw>);
}

pub struct Handle<K: ResourceKind> {
    ptr: Option<NonNull<K::Raw>>,
    owns: bool,
    released: bool,
    _kind: PhantomData<K>,
}

impl<K: ResourceKind> Handle<K> {
    /// Takes ownership of a pointer returned by a native constructor.
    ///
    /// A null pointer means the native side failed to create the object and yields
    /// `InvalidHandle`.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live object of kind `K` not owned by anything else.
    pub unsafe fn acquire(ptr: *mut K::Raw) -> Result<Self> {
        let ptr = NonNull::new(ptr).ok_or_else(|| Error::invalid_handle(K::NAME))?;
        if config::current().trace_handles {
            log::trace!("acquired {} handle {:p}", K::NAME, ptr);
        }
        Ok(Handle {
            ptr: Some(ptr),
            owns: true,
            released: false,
            _kind: PhantomData,
        })
    }

    /// Wraps a pointer without taking ownership; releasing the handle never calls the
    /// native destructor.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or outlive the returned handle.
    pub unsafe fn borrowed(ptr: *mut K::Raw) -> Self {
        Handle {
            ptr: NonNull::new(ptr),
            owns: false,
            released: false,
            _kind: PhantomData,
        }
    }

    /// The invalid handle of this kind. It owns nothing and never becomes valid.
    pub const fn null() -> Self {
        Handle {
            ptr: None,
            owns: false,
            released: false,
            _kind: PhantomData,
        }
    }

    /// Returns `true` if the handle holds no pointer, either because it never did or
    /// because it has been released.
    pub fn is_invalid(&self) -> bool {
        self.ptr.is_none()
    }

    pub fn owns_handle(&self) -> bool {
        self.owns
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Returns the native pointer, distinguishing a released handle from one that
    /// never held a pointer.
    pub fn as_ptr(&self) -> Result<NonNull<K::Raw>> {
        match self.ptr {
            Some(ptr) => Ok(ptr),
            None if self.released => Err(Error::already_released(K::NAME)),
            None => Err(Error::invalid_handle(K::NAME)),
        }
    }

    /// Returns the native pointer, or null for an invalid handle. Meant for the
    /// native calls that accept an absent argument.
    pub fn as_raw(&self) -> *mut K::Raw {
        self.ptr.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// Releases the native object if this handle owns it.
    ///
    /// Idempotent: a second call, or a call on an invalid handle, does nothing.
    pub fn release(&mut self) {
        let Some(ptr) = self.ptr.take() else {
            return;
        };
        self.released = true;
        if self.owns {
            if config::current().trace_handles {
                log::trace!("releasing {} handle {:p}", K::NAME, ptr);
            }
            unsafe { K::destroy(ptr) };
        }
    }
}

impl<K: ResourceKind> Drop for Handle<K> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<K: ResourceKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("kind", &K::NAME)
            .field("ptr", &self.as_raw())
            .field("owns", &self.owns)
            .field("released", &self.released)
            .finish()
    }
}

// SAFETY: the handle is the only owner of the native object, and every native entry
// point used through it is free of thread affinity. Shared access is not allowed,
// hence no `Sync`.
unsafe impl<K: ResourceKind> Send for Handle<K> {}
