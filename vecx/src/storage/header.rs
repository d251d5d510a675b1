//! Single-pointer storage with an in-allocation header

use super::Storage;
use memx::{Error, Flavor, Heap};
use std::alloc::Layout;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::{fmt, mem, slice};

/// Bookkeeping stored in front of the elements
#[repr(C)]
struct Header {
    /// Number of element slots after the header
    capacity: usize,
    /// Number of live elements
    len: usize,
}

/// A storage that is one pointer wide
///
/// An empty storage is a null pointer and owns nothing. Otherwise the
/// pointer addresses a `{capacity, len}` header, immediately followed by the
/// element slots. Suited to containers that are usually empty.
pub struct HeaderStorage<T> {
    /// Header of the allocation, `None` while empty
    ptr: Option<NonNull<Header>>,
    /// Owns elements of type `T`
    _marker: PhantomData<T>,
}

// SAFETY: The storage uniquely owns its allocation.
unsafe impl<T: Send> Send for HeaderStorage<T> {}
// SAFETY: Shared access only reads.
unsafe impl<T: Sync> Sync for HeaderStorage<T> {}

impl<T> HeaderStorage<T> {
    /// Byte offset from the header to the first element
    #[inline(always)]
    fn data_offset() -> usize {
        let align = mem::align_of::<T>();
        (mem::size_of::<Header>() + align - 1) & !(align - 1)
    }

    /// Layout of an allocation with `capacity` element slots
    fn layout(capacity: usize) -> Result<Layout, Error> {
        let exceeded = || Error::CapacityExceeded {
            requested: capacity,
            max: Self::limit(),
        };
        let elements = Layout::array::<T>(capacity).map_err(|_| exceeded())?;
        let (layout, offset) = Layout::new::<Header>()
            .extend(elements)
            .map_err(|_| exceeded())?;
        debug_assert_eq!(offset, Self::data_offset());
        Ok(layout.pad_to_align())
    }

    /// Largest element count an allocation can hold
    #[inline(always)]
    fn limit() -> usize {
        (isize::MAX as usize - Self::data_offset()) / mem::size_of::<T>().max(1)
    }

    /// The header, when allocated.
    #[inline(always)]
    fn header(&self) -> Option<&Header> {
        // SAFETY: A present pointer always addresses an initialized header.
        self.ptr.map(|h| unsafe { &*h.as_ptr() })
    }
}

unsafe impl<T> Storage<T> for HeaderStorage<T> {
    #[inline(always)]
    fn new() -> Self {
        Self {
            ptr: None,
            _marker: PhantomData,
        }
    }

    fn with_capacity(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Ok(Self::new());
        }
        let layout = Self::layout(capacity)?;
        // SAFETY: The layout includes the header, so its size is nonzero.
        let raw = unsafe { Heap::acquire(layout)? }.cast::<Header>();
        // SAFETY: Freshly acquired memory, aligned for the header.
        unsafe { raw.as_ptr().write(Header { capacity, len: 0 }) };
        Ok(Self {
            ptr: Some(raw),
            _marker: PhantomData,
        })
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.header().map_or(0, |h| h.len)
    }

    #[inline(always)]
    unsafe fn set_len(&mut self, len: usize) {
        match self.ptr {
            Some(h) => (*h.as_ptr()).len = len,
            None => debug_assert_eq!(len, 0),
        }
    }

    #[inline(always)]
    fn capacity(&self) -> usize {
        self.header().map_or(0, |h| h.capacity)
    }

    #[inline(always)]
    fn max_capacity(&self) -> usize {
        Self::limit()
    }

    #[inline(always)]
    fn as_ptr(&self) -> *const T {
        match self.ptr {
            // SAFETY: The element slots start `data_offset` bytes into the
            //         allocation.
            Some(h) => unsafe { h.as_ptr().cast::<u8>().add(Self::data_offset()).cast() },
            None => NonNull::dangling().as_ptr(),
        }
    }

    #[inline(always)]
    fn as_mut_ptr(&mut self) -> *mut T {
        self.as_ptr().cast_mut()
    }

    #[inline(always)]
    fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
    }
}

impl<T> Drop for HeaderStorage<T> {
    fn drop(&mut self) {
        let Some(h) = self.ptr else {
            return;
        };
        // SAFETY: The header is initialized and counts the live slots.
        let Header { capacity, len } = unsafe { h.as_ptr().read() };
        // SAFETY: Exactly `len` leading slots are live.
        unsafe { ptr::drop_in_place(slice::from_raw_parts_mut(self.as_mut_ptr(), len)) };
        let layout = Self::layout(capacity).expect("layout was valid at allocation time");
        // SAFETY: Same pointer and layout as the acquisition.
        unsafe { Heap::release(h.cast(), layout) };
    }
}

impl<T> fmt::Debug for HeaderStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderStorage")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
