//! Storage policies for [`Vector`](crate::Vector)
//!
//! A storage owns a buffer and reports `{pointer, length, capacity}`. The
//! vector decides when elements are created, moved and destroyed; storage
//! only keeps the count of live elements and, when dropped, destroys that
//! many and releases the buffer. A vector that has moved every element out
//! of a storage sets its length to zero first, so the drop only frees.
//!
//! Policies differ in layout and growth limits:
//!
//! | Policy            | Footprint                        | Max capacity     |
//! |-------------------|----------------------------------|------------------|
//! | [`HeapStorage`]   | pointer, capacity, length        | `isize::MAX` bytes |
//! | [`InlineStorage`] | `N` slots and a `u8` length      | `N` (at most 255) |
//! | [`SmallStorage`]  | `N` slots or a heap pointer, `u32` length | 2³¹ − 1  |
//! | [`MappedStorage`] | pointer and length               | `N`              |
//! | [`HeaderStorage`] | one pointer                      | `isize::MAX` bytes |
//!
//! Inline and small storages hold elements inside the struct itself, so
//! their data pointer changes whenever the storage moves. Callers must
//! re-read it after any move or swap.

mod header;
mod heap;
mod inline;
mod mapped;
mod small;

pub use header::HeaderStorage;
pub use heap::HeapStorage;
pub use inline::InlineStorage;
pub use mapped::MappedStorage;
pub use small::SmallStorage;

use memx::Error;

/// A buffer policy for a contiguous sequence of `T`
///
/// # Safety
///
/// Implementations must uphold, for every value `s`:
///
///   - `s.as_ptr()` is aligned for `T` and valid for `s.capacity()` slots,
///     and `as_mut_ptr` returns the same address.
///   - `s.len() <= s.capacity() <= s.max_capacity()`.
///   - `Self::new()` and `Self::with_capacity(n)` start at length zero,
///     and `with_capacity(n)` reports a capacity of at least `n`.
///   - Dropping `s` drops exactly the slots `[0, len)` and then releases
///     the buffer.
pub unsafe trait Storage<T>: Sized {
    /// An empty storage, acquiring no memory if the policy allows it.
    fn new() -> Self;

    /// An empty storage with room for at least `capacity` elements.
    fn with_capacity(capacity: usize) -> Result<Self, Error>;

    /// Number of live elements.
    fn len(&self) -> usize;

    /// Set the number of live elements.
    ///
    /// # Safety
    ///
    /// `len <= capacity()`, and the slots `[0, len)` must hold live values
    /// once this returns.
    unsafe fn set_len(&mut self, len: usize);

    /// Number of slots in the buffer.
    fn capacity(&self) -> usize;

    /// Largest capacity this policy can ever report.
    fn max_capacity(&self) -> usize;

    /// Pointer to the first slot.
    fn as_ptr(&self) -> *const T;

    /// Mutable pointer to the first slot.
    fn as_mut_ptr(&mut self) -> *mut T;

    /// Exchange the complete state of two storages.
    #[inline(always)]
    fn swap(&mut self, other: &mut Self) {
        memx::relocate::memswap(self, other);
    }
}

/// Largest element count whose byte size fits in an `isize`
#[inline(always)]
pub(crate) fn byte_limit<T>() -> usize {
    isize::MAX as usize / std::mem::size_of::<T>().max(1)
}
