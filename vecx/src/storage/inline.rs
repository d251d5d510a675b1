//! Fixed-capacity inline storage

use super::Storage;
use memx::Error;
use std::mem::MaybeUninit;
use std::{fmt, ptr, slice};

/// Up to `N` elements stored inside the struct, never touching the heap
///
/// The length is a single byte, so `N` may be at most 255. Asking for more
/// than `N` slots fails with [`Error::CapacityExceeded`].
pub struct InlineStorage<T, const N: usize> {
    /// Element slots
    buf: [MaybeUninit<T>; N],
    /// Number of live slots
    len: u8,
}

impl<T, const N: usize> InlineStorage<T, N> {
    /// Evaluated on construction to reject capacities the length byte
    /// cannot count.
    const CAPACITY_FITS: () = assert!(N <= u8::MAX as usize, "InlineStorage holds at most 255");
}

unsafe impl<T, const N: usize> Storage<T> for InlineStorage<T, N> {
    #[inline(always)]
    fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_FITS;
        Self {
            // SAFETY: An array of MaybeUninit needs no initialization.
            buf: unsafe { MaybeUninit::<[MaybeUninit<T>; N]>::uninit().assume_init() },
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
        Ok(Self::new())
    }

    #[inline(always)]
    fn len(&self) -> usize {
        usize::from(self.len)
    }

    #[inline(always)]
    unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= N);
        self.len = len as u8;
    }

    #[inline(always)]
    fn capacity(&self) -> usize {
        N
    }

    #[inline(always)]
    fn max_capacity(&self) -> usize {
        N
    }

    #[inline(always)]
    fn as_ptr(&self) -> *const T {
        self.buf.as_ptr().cast()
    }

    #[inline(always)]
    fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr().cast()
    }
}

impl<T, const N: usize> Drop for InlineStorage<T, N> {
    fn drop(&mut self) {
        let len = self.len();
        // SAFETY: Exactly `len` leading slots are live.
        unsafe { ptr::drop_in_place(slice::from_raw_parts_mut(self.as_mut_ptr(), len)) }
    }
}

impl<T, const N: usize> fmt::Debug for InlineStorage<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InlineStorage<{}> {{ len: {} }}", N, self.len)
    }
}

#[cfg(test)]
mod test {
    use super::InlineStorage;
    use crate::{Error, Storage};

    #[test]
    fn capacity_is_fixed() {
        let s = InlineStorage::<u16, 5>::new();
        assert_eq!(s.capacity(), 5);
        assert_eq!(s.max_capacity(), 5);
        assert!(InlineStorage::<u16, 5>::with_capacity(5).is_ok());
        assert_eq!(
            InlineStorage::<u16, 5>::with_capacity(6).err(),
            Some(Error::CapacityExceeded {
                requested: 6,
                max: 5
            })
        );
    }

    #[test]
    fn swap_moves_contents() {
        let mut a = InlineStorage::<u32, 2>::new();
        let mut b = InlineStorage::<u32, 2>::new();
        // SAFETY: Slot 0 is written before the length covers it.
        unsafe {
            a.as_mut_ptr().write(17);
            a.set_len(1);
        }
        a.swap(&mut b);
        assert_eq!(a.len(), 0);
        assert_eq!(b.len(), 1);
        // SAFETY: Slot 0 of `b` is live after the swap.
        assert_eq!(unsafe { *b.as_ptr() }, 17);
    }
}
