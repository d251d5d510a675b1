//! Small-buffer-optimized storage
//!
//! The first `N` elements live inside the struct. Growing past that moves
//! everything to the heap for good: a spilled storage never returns inline,
//! even after shrinking.
//!
//! The inline slots and the heap `{pointer, capacity}` pair share a union.
//! A 32-bit word packs the element count in its low 31 bits and the
//! "spilled" discriminant in the top bit.

use super::{byte_limit, Storage};
use memx::{Error, RawBuffer};
use std::mem::{ManuallyDrop, MaybeUninit};
use std::ptr::{self, NonNull};
use std::{fmt, slice};

/// Discriminant bit in the packed length word
const SPILLED: u32 = 1 << 31;

/// Mask for the length bits of the packed word
const LEN_MASK: u32 = SPILLED - 1;

/// Out-of-line buffer of a spilled storage
struct Spilled<T> {
    /// Start of the heap buffer
    ptr: NonNull<T>,
    /// Number of slots in the heap buffer
    capacity: u32,
}

/// Inline slots or heap buffer, selected by [`SPILLED`]
union Repr<T, const N: usize> {
    /// Active while not spilled
    inline: ManuallyDrop<[MaybeUninit<T>; N]>,
    /// Active once spilled
    heap: ManuallyDrop<Spilled<T>>,
}

/// `N` inline elements, spilling to the heap on growth past `N`
pub struct SmallStorage<T, const N: usize> {
    /// Element memory
    repr: Repr<T, N>,
    /// Length in the low 31 bits, [`SPILLED`] flag on top
    packed: u32,
}

// SAFETY: The storage uniquely owns its elements, inline or on the heap.
unsafe impl<T: Send, const N: usize> Send for SmallStorage<T, N> {}
// SAFETY: Shared access only reads through a const pointer.
unsafe impl<T: Sync, const N: usize> Sync for SmallStorage<T, N> {}

impl<T, const N: usize> SmallStorage<T, N> {
    /// True while the elements live inside the struct.
    #[inline(always)]
    pub fn is_inline(&self) -> bool {
        self.packed & SPILLED == 0
    }

    /// True once the elements have moved to the heap.
    #[inline(always)]
    pub fn is_spilled(&self) -> bool {
        !self.is_inline()
    }

    /// Largest capacity the 31-bit length can describe
    #[inline(always)]
    fn limit() -> usize {
        (LEN_MASK as usize).min(byte_limit::<T>())
    }
}

unsafe impl<T, const N: usize> Storage<T> for SmallStorage<T, N> {
    #[inline(always)]
    fn new() -> Self {
        Self {
            repr: Repr {
                // SAFETY: An array of MaybeUninit needs no initialization.
                inline: ManuallyDrop::new(unsafe {
                    MaybeUninit::<[MaybeUninit<T>; N]>::uninit().assume_init()
                }),
            },
            packed: 0,
        }
    }

    fn with_capacity(capacity: usize) -> Result<Self, Error> {
        if capacity <= N {
            return Ok(Self::new());
        }
        if capacity > Self::limit() {
            return Err(Error::CapacityExceeded {
                requested: capacity,
                max: Self::limit(),
            });
        }
        let (ptr, capacity) = RawBuffer::<T>::new(capacity)?.into_raw_parts();
        Ok(Self {
            repr: Repr {
                heap: ManuallyDrop::new(Spilled {
                    ptr,
                    capacity: capacity as u32,
                }),
            },
            packed: SPILLED,
        })
    }

    #[inline(always)]
    fn len(&self) -> usize {
        (self.packed & LEN_MASK) as usize
    }

    #[inline(always)]
    unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity());
        self.packed = (self.packed & SPILLED) | len as u32;
    }

    #[inline(always)]
    fn capacity(&self) -> usize {
        if self.is_inline() {
            N
        } else {
            // SAFETY: The heap variant is active once spilled.
            unsafe { self.repr.heap.capacity as usize }
        }
    }

    #[inline(always)]
    fn max_capacity(&self) -> usize {
        Self::limit().max(N)
    }

    #[inline(always)]
    fn as_ptr(&self) -> *const T {
        if self.is_inline() {
            // SAFETY: The inline variant is active until spilled, and the
            //         slot array is laid out exactly like `[T; N]`.
            unsafe { ptr::addr_of!(self.repr.inline).cast::<T>() }
        } else {
            // SAFETY: The heap variant is active once spilled.
            unsafe { self.repr.heap.ptr.as_ptr() }
        }
    }

    #[inline(always)]
    fn as_mut_ptr(&mut self) -> *mut T {
        if self.is_inline() {
            // SAFETY: As in `as_ptr`.
            unsafe { ptr::addr_of_mut!(self.repr.inline).cast::<T>() }
        } else {
            // SAFETY: The heap variant is active once spilled.
            unsafe { self.repr.heap.ptr.as_ptr() }
        }
    }
}

impl<T, const N: usize> Drop for SmallStorage<T, N> {
    fn drop(&mut self) {
        let len = self.len();
        // SAFETY: Exactly `len` leading slots are live, and when spilled the
        //         heap pair came from RawBuffer::into_raw_parts.
        unsafe {
            ptr::drop_in_place(slice::from_raw_parts_mut(self.as_mut_ptr(), len));
            if self.is_spilled() {
                let heap = &self.repr.heap;
                drop(RawBuffer::<T>::from_raw_parts(heap.ptr, heap.capacity as usize));
            }
        }
    }
}

impl<T, const N: usize> fmt::Debug for SmallStorage<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmallStorage")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("spilled", &self.is_spilled())
            .finish()
    }
}

#[cfg(test)]
mod test {
    #![allow(clippy::unwrap_used)]

    use super::SmallStorage;
    use crate::Storage;

    #[test]
    fn inline_until_asked_for_more() {
        let s = SmallStorage::<u64, 4>::with_capacity(4).unwrap();
        assert!(s.is_inline());
        assert_eq!(s.capacity(), 4);

        let s = SmallStorage::<u64, 4>::with_capacity(5).unwrap();
        assert!(s.is_spilled());
        assert_eq!(s.capacity(), 5);
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn inline_slots_live_inside_the_storage() {
        let mut s = SmallStorage::<u32, 3>::new();
        // SAFETY: Three slots fit inline and are written before the count
        //         covers them.
        unsafe {
            for i in 0..3 {
                s.as_mut_ptr().add(i).write(10 * (i as u32 + 1));
            }
            s.set_len(3);
        }
        assert!(s.is_inline());
        let start = &s as *const SmallStorage<u32, 3> as usize;
        let end = start + std::mem::size_of::<SmallStorage<u32, 3>>();
        let data = s.as_ptr() as usize;
        assert!(start <= data && data + 3 * 4 <= end);
        assert_eq!(s.as_ptr(), s.as_mut_ptr().cast_const());
        // SAFETY: The three slots were initialized above.
        let live = unsafe { std::slice::from_raw_parts(s.as_ptr(), 3) };
        assert_eq!(live, [10, 20, 30]);
    }

    #[test]
    fn length_keeps_discriminant() {
        let mut s = SmallStorage::<u8, 2>::with_capacity(10).unwrap();
        // SAFETY: u8 slots need no initialization to be read back here.
        unsafe {
            s.as_mut_ptr().write_bytes(0, 7);
            s.set_len(7);
        }
        assert!(s.is_spilled());
        assert_eq!(s.len(), 7);
        // SAFETY: Shrinking the count is always valid.
        unsafe { s.set_len(0) };
        assert!(s.is_spilled());
    }

    #[test]
    fn limit_is_31_bits() {
        let s = SmallStorage::<u8, 2>::new();
        assert_eq!(s.max_capacity(), (1 << 31) - 1);
        assert!(SmallStorage::<u8, 2>::with_capacity(1 << 31).is_err());
    }
}
