//! Heap storage

use super::{byte_limit, Storage};
use memx::{Error, RawBuffer};
use std::{fmt, mem, ptr, slice};

/// Elements in a global-allocator buffer, with a length counter
///
/// Zero-sized types never allocate; their capacity is whatever was asked
/// for.
pub struct HeapStorage<T> {
    /// Buffer of `capacity` slots
    buf: RawBuffer<T>,
    /// Number of live slots
    len: usize,
}

unsafe impl<T> Storage<T> for HeapStorage<T> {
    #[inline(always)]
    fn new() -> Self {
        Self {
            buf: RawBuffer::empty(),
            len: 0,
        }
    }

    fn with_capacity(capacity: usize) -> Result<Self, Error> {
        if capacity > byte_limit::<T>() && mem::size_of::<T>() != 0 {
            return Err(Error::CapacityExceeded {
                requested: capacity,
                max: byte_limit::<T>(),
            });
        }
        Ok(Self {
            buf: RawBuffer::new(capacity)?,
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
        if mem::size_of::<T>() == 0 {
            usize::MAX
        } else {
            byte_limit::<T>()
        }
    }

    #[inline(always)]
    fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    #[inline(always)]
    fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    #[inline(always)]
    fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.buf, &mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
    }
}

impl<T> Drop for HeapStorage<T> {
    fn drop(&mut self) {
        // SAFETY: Exactly `len` leading slots are live. The buffer field
        //         releases the memory afterwards.
        unsafe {
            ptr::drop_in_place(slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len));
        }
    }
}

impl<T> fmt::Debug for HeapStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapStorage")
            .field("len", &self.len)
            .field("capacity", &self.buf.capacity())
            .finish()
    }
}

#[cfg(test)]
mod test {
    #![allow(clippy::unwrap_used)]

    use super::HeapStorage;
    use crate::Storage;

    #[test]
    fn empty_allocates_nothing() {
        let s = HeapStorage::<u64>::new();
        assert_eq!(s.len(), 0);
        assert_eq!(s.capacity(), 0);
        assert_eq!(s.max_capacity(), isize::MAX as usize / 8);
    }

    #[test]
    fn zero_sized_capacity() {
        let s = HeapStorage::<()>::with_capacity(1000).unwrap();
        assert_eq!(s.capacity(), 1000);
        assert_eq!(s.max_capacity(), usize::MAX);
    }

    #[test]
    fn swap_exchanges_buffers() {
        let mut a = HeapStorage::<u32>::with_capacity(4).unwrap();
        let mut b = HeapStorage::<u32>::new();
        let pa = a.as_ptr();
        a.swap(&mut b);
        assert_eq!(a.capacity(), 0);
        assert_eq!(b.capacity(), 4);
        assert_eq!(b.as_ptr(), pa);
    }

    #[test]
    fn too_large() {
        assert!(HeapStorage::<u64>::with_capacity(usize::MAX / 4).is_err());
    }
}
