//! Overcommit-mapped storage with pointer-stable growth

use super::Storage;
use memx::{Error, Overcommit, RawBuffer};
use std::{fmt, ptr, slice};

/// A reservation of `N` elements that is backed by memory only when touched
///
/// The first non-empty request maps the whole reservation. From then on
/// capacity is `N` and the buffer never moves, so pointers and references
/// into the elements stay valid across any growth for as long as the
/// storage itself lives.
pub struct MappedStorage<T, const N: usize> {
    /// Either empty, or a reservation of exactly `N` slots
    buf: RawBuffer<T, Overcommit>,
    /// Number of live slots
    len: usize,
}

unsafe impl<T, const N: usize> Storage<T> for MappedStorage<T, N> {
    #[inline(always)]
    fn new() -> Self {
        Self {
            buf: RawBuffer::empty(),
            len: 0,
        }
    }

    fn with_capacity(capacity: usize) -> Result<Self, Error> {
        if capacity > N {
            return Err(Error::CapacityExceeded {
                requested: capacity,
                max: N,
            });
        }
        if capacity == 0 {
            return Ok(Self::new());
        }
        Ok(Self {
            buf: RawBuffer::new(N)?,
            len: 0,
        })
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.buf.capacity());
        self.len = len;
    }

    #[inline(always)]
    fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[inline(always)]
    fn max_capacity(&self) -> usize {
        N
    }

    #[inline(always)]
    fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    #[inline(always)]
    fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }
}

impl<T, const N: usize> Drop for MappedStorage<T, N> {
    fn drop(&mut self) {
        // SAFETY: Exactly `len` leading slots are live.
        unsafe {
            ptr::drop_in_place(slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len));
        }
    }
}

impl<T, const N: usize> fmt::Debug for MappedStorage<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedStorage")
            .field("len", &self.len)
            .field("capacity", &self.buf.capacity())
            .finish()
    }
}
