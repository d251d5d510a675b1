//! Typed raw memory acquisition and release
//!
//! Containers in this workspace manage element lifetimes themselves. What they
//! need from this layer is a buffer with the right size and alignment, and
//! a guarantee that the buffer goes back to wherever it came from.
//!
//! Three sources of memory are provided, each as a [`Flavor`]:
//!
//!   - [`Heap`]: the global allocator, aligned for `T`.
//!   - [`CacheAligned`]: the global allocator, aligned to at least
//!     [`CACHE_LINE`] bytes with the size rounded up to match. Intended for
//!     arrays that are scanned with wide loads.
//!   - [`Overcommit`]: an anonymous private mapping that reserves address
//!     space only. Pages are materialized, zero-filled, on first touch.
//!
//! Memory is owned through two move-only handles. A [`RawBuffer`] only
//! releases memory when dropped; it never runs element destructors. An
//! [`Allocation`] owns a fully initialized run of elements and destroys each
//! one before releasing the buffer.

use crate::Error;
use bytemuck::Zeroable;
use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

/// Minimum alignment of [`CacheAligned`] buffers, in bytes
pub const CACHE_LINE: usize = 64;

/// Largest alignment an [`Overcommit`] mapping can honor
///
/// Mappings start on a page boundary, and no supported platform uses pages
/// smaller than this.
const PAGE_ALIGN: usize = 4096;

/// A source of raw memory
///
/// # Safety
///
/// [`Flavor::acquire`] must return memory valid for reads and writes of
/// `layout.size()` bytes at an address aligned to `layout.align()`.
/// [`Flavor::release`] must accept every pointer and layout pair produced by
/// `acquire`, and nothing else is ever passed to it. When `ZEROED` is true,
/// acquired memory must read as zero.
pub unsafe trait Flavor {
    /// True if freshly acquired memory is already zero-filled
    const ZEROED: bool;

    /// Compute the layout used for `count` elements of `T`.
    fn layout<T>(count: usize) -> Result<Layout, Error>;

    /// Acquire memory for a layout.
    ///
    /// # Safety
    ///
    /// `layout` must have a nonzero size.
    unsafe fn acquire(layout: Layout) -> Result<NonNull<u8>, Error>;

    /// Return memory previously obtained from [`Flavor::acquire`].
    ///
    /// # Safety
    ///
    /// `ptr` and `layout` must be exactly what `acquire` was called with and
    /// returned, and the memory must not be used afterwards.
    unsafe fn release(ptr: NonNull<u8>, layout: Layout);
}

/// The global allocator with natural alignment
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Heap;

/// The global allocator, aligned to at least one cache line
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct CacheAligned;

/// Reserve-only virtual memory that is zero-filled on first touch
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Overcommit;

/// Largest element count whose byte size fits in an `isize`
#[inline(always)]
fn max_elements<T>() -> usize {
    isize::MAX as usize / mem::size_of::<T>().max(1)
}

/// Layout for a plain array of `count` elements
#[inline(always)]
fn array_layout<T>(count: usize) -> Result<Layout, Error> {
    Layout::array::<T>(count).map_err(|_| Error::CapacityExceeded {
        requested: count,
        max: max_elements::<T>(),
    })
}

/// The error reported when `layout` could not be satisfied
#[cold]
fn out_of_memory(layout: Layout) -> Error {
    Error::OutOfMemory {
        bytes: layout.size(),
        align: layout.align(),
    }
}

unsafe impl Flavor for Heap {
    const ZEROED: bool = false;

    #[inline(always)]
    fn layout<T>(count: usize) -> Result<Layout, Error> {
        array_layout::<T>(count)
    }

    #[inline(always)]
    unsafe fn acquire(layout: Layout) -> Result<NonNull<u8>, Error> {
        NonNull::new(alloc::alloc(layout)).ok_or_else(|| out_of_memory(layout))
    }

    #[inline(always)]
    unsafe fn release(ptr: NonNull<u8>, layout: Layout) {
        alloc::dealloc(ptr.as_ptr(), layout);
    }
}

unsafe impl Flavor for CacheAligned {
    const ZEROED: bool = false;

    fn layout<T>(count: usize) -> Result<Layout, Error> {
        let layout = array_layout::<T>(count)?;
        let align = layout.align().max(CACHE_LINE);
        layout
            .align_to(align)
            .map(|layout| layout.pad_to_align())
            .map_err(|_| Error::CapacityExceeded {
                requested: count,
                max: max_elements::<T>(),
            })
    }

    #[inline(always)]
    unsafe fn acquire(layout: Layout) -> Result<NonNull<u8>, Error> {
        Heap::acquire(layout)
    }

    #[inline(always)]
    unsafe fn release(ptr: NonNull<u8>, layout: Layout) {
        Heap::release(ptr, layout);
    }
}

/// Extra mapping flags: skip swap reservation where the platform allows it
#[cfg(any(target_os = "linux", target_os = "android"))]
const MAP_EXTRA: libc::c_int = libc::MAP_NORESERVE;

/// Extra mapping flags: none on this platform
#[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
const MAP_EXTRA: libc::c_int = 0;

unsafe impl Flavor for Overcommit {
    const ZEROED: bool = true;

    #[inline(always)]
    fn layout<T>(count: usize) -> Result<Layout, Error> {
        array_layout::<T>(count)
    }

    #[cfg(unix)]
    unsafe fn acquire(layout: Layout) -> Result<NonNull<u8>, Error> {
        if layout.align() > PAGE_ALIGN {
            return Err(out_of_memory(layout));
        }
        let addr = libc::mmap(
            ptr::null_mut(),
            layout.size(),
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANON | MAP_EXTRA,
            -1,
            0,
        );
        if addr == libc::MAP_FAILED {
            return Err(out_of_memory(layout));
        }
        NonNull::new(addr.cast::<u8>()).ok_or_else(|| out_of_memory(layout))
    }

    #[cfg(unix)]
    unsafe fn release(ptr: NonNull<u8>, layout: Layout) {
        // A failed unmap leaves the reservation in place; there is nothing
        // more useful to do with the error from a destructor.
        let _ = libc::munmap(ptr.as_ptr().cast(), layout.size());
    }

    #[cfg(not(unix))]
    unsafe fn acquire(layout: Layout) -> Result<NonNull<u8>, Error> {
        if layout.align() > PAGE_ALIGN {
            return Err(out_of_memory(layout));
        }
        NonNull::new(alloc::alloc_zeroed(layout)).ok_or_else(|| out_of_memory(layout))
    }

    #[cfg(not(unix))]
    unsafe fn release(ptr: NonNull<u8>, layout: Layout) {
        alloc::dealloc(ptr.as_ptr(), layout);
    }
}

/// Uninitialized storage for up to `capacity` elements of `T`
///
/// Dropping a [`RawBuffer`] returns its memory to the [`Flavor`] it came
/// from, without running any element destructors. Zero-sized requests and
/// zero-sized types never touch the underlying allocator.
pub struct RawBuffer<T, F: Flavor = Heap> {
    /// Start of the buffer, dangling when nothing was acquired
    ptr: NonNull<T>,
    /// Number of element slots
    capacity: usize,
    /// The buffer holds `T` slots from flavor `F`
    _marker: PhantomData<(T, fn() -> F)>,
}

// SAFETY: A RawBuffer is a unique owner of its memory, like a Box<[T]>.
unsafe impl<T: Send, F: Flavor> Send for RawBuffer<T, F> {}
// SAFETY: Shared access only hands out a const pointer.
unsafe impl<T: Sync, F: Flavor> Sync for RawBuffer<T, F> {}

impl<T, F: Flavor> RawBuffer<T, F> {
    /// A buffer with no capacity that owns no memory.
    #[inline(always)]
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Acquire storage for `capacity` elements.
    ///
    /// Returns an empty handle when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Ok(Self::empty());
        }
        if mem::size_of::<T>() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            });
        }
        let layout = F::layout::<T>(capacity)?;
        // SAFETY: The element size and count are both nonzero, so the
        //         layout size is nonzero.
        let ptr = unsafe { F::acquire(layout)? };
        Ok(Self {
            ptr: ptr.cast(),
            capacity,
            _marker: PhantomData,
        })
    }

    /// Number of element slots in the buffer.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True if the buffer has no slots.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    /// Pointer to the first slot.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable pointer to the first slot.
    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Give up ownership, returning the pointer and slot count.
    ///
    /// The memory must eventually be handed back with
    /// [`RawBuffer::from_raw_parts`] or it leaks.
    #[inline(always)]
    pub fn into_raw_parts(self) -> (NonNull<T>, usize) {
        let this = ManuallyDrop::new(self);
        (this.ptr, this.capacity)
    }

    /// Rebuild a buffer from [`RawBuffer::into_raw_parts`] output.
    ///
    /// # Safety
    ///
    /// `ptr` and `capacity` must come from `into_raw_parts` on a buffer of
    /// the same `T` and `F`, and must not be reused afterwards.
    #[inline(always)]
    pub unsafe fn from_raw_parts(ptr: NonNull<T>, capacity: usize) -> Self {
        Self {
            ptr,
            capacity,
            _marker: PhantomData,
        }
    }

    /// Declare every slot initialized, producing an [`Allocation`].
    ///
    /// # Safety
    ///
    /// All `capacity` slots must hold live values of `T`.
    #[inline(always)]
    pub unsafe fn assume_init(self) -> Allocation<T, F> {
        Allocation { raw: self }
    }
}

impl<T, F: Flavor> Drop for RawBuffer<T, F> {
    fn drop(&mut self) {
        if self.capacity == 0 || mem::size_of::<T>() == 0 {
            return;
        }
        let layout = F::layout::<T>(self.capacity)
            .expect("layout was valid when the buffer was acquired");
        // SAFETY: This pointer and layout are the ones used at acquisition.
        unsafe { F::release(self.ptr.cast(), layout) }
    }
}

impl<T, F: Flavor> Default for RawBuffer<T, F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T, F: Flavor> fmt::Debug for RawBuffer<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// A buffer whose every slot holds a live `T`
///
/// Dropping an [`Allocation`] destroys each element, then releases memory.
pub struct Allocation<T, F: Flavor = Heap> {
    /// Backing memory, fully initialized
    raw: RawBuffer<T, F>,
}

/// Drops the prefix of a buffer that was initialized before a panic
struct InitGuard<T> {
    /// Start of the buffer being filled
    ptr: *mut T,
    /// Number of leading slots holding live values
    done: usize,
}

impl<T> Drop for InitGuard<T> {
    fn drop(&mut self) {
        // SAFETY: Exactly `done` leading slots were written.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr, self.done)) }
    }
}

impl<T, F: Flavor> Allocation<T, F> {
    /// Allocate `count` elements, initializing each from its index.
    ///
    /// If `init` panics, the elements written so far are dropped and the
    /// memory is released.
    pub fn from_fn(count: usize, mut init: impl FnMut(usize) -> T) -> Result<Self, Error> {
        let mut raw = RawBuffer::<T, F>::new(count)?;
        let mut guard = InitGuard {
            ptr: raw.as_mut_ptr(),
            done: 0,
        };
        while guard.done < count {
            let value = init(guard.done);
            // SAFETY: `done < count` so the slot is inside the buffer.
            unsafe { guard.ptr.add(guard.done).write(value) };
            guard.done += 1;
        }
        mem::forget(guard);
        // SAFETY: The loop above initialized every slot.
        Ok(unsafe { raw.assume_init() })
    }

    /// Allocate `count` zeroed elements.
    ///
    /// Flavors that hand out zero-filled memory skip the explicit fill, so
    /// an [`Overcommit`] allocation stays unmaterialized until written.
    pub fn zeroed(count: usize) -> Result<Self, Error>
    where
        T: Zeroable,
    {
        let mut raw = RawBuffer::<T, F>::new(count)?;
        if !F::ZEROED {
            // SAFETY: The buffer has room for `count` elements, and the
            //         all-zero pattern is a valid `T`.
            unsafe { ptr::write_bytes(raw.as_mut_ptr(), 0, count) };
        }
        // SAFETY: Every slot now holds a zero `T`.
        Ok(unsafe { raw.assume_init() })
    }

    /// Number of elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.raw.capacity()
    }

    /// True if there are no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl<T, F: Flavor> Deref for Allocation<T, F> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &[T] {
        // SAFETY: Every slot is initialized.
        unsafe { slice::from_raw_parts(self.raw.as_ptr(), self.raw.capacity()) }
    }
}

impl<T, F: Flavor> DerefMut for Allocation<T, F> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: Every slot is initialized and we hold a unique reference.
        unsafe { slice::from_raw_parts_mut(self.raw.as_mut_ptr(), self.raw.capacity()) }
    }
}

impl<T, F: Flavor> Drop for Allocation<T, F> {
    fn drop(&mut self) {
        // SAFETY: Every slot is initialized; the memory itself is released
        //         afterwards by the RawBuffer field.
        unsafe { ptr::drop_in_place(self.deref_mut() as *mut [T]) }
    }
}

impl<T: fmt::Debug, F: Flavor> fmt::Debug for Allocation<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Acquire heap storage for `count` elements of `T`.
///
/// Returns an empty handle without allocating when `count` is zero.
#[inline]
pub fn allocate<T>(count: usize) -> Result<RawBuffer<T, Heap>, Error> {
    RawBuffer::new(count)
}

/// Acquire heap storage for `count` elements of `T`, aligned to at least
/// [`CACHE_LINE`] bytes and rounded up to a whole number of alignment units.
#[inline]
pub fn aligned_allocate<T>(count: usize) -> Result<RawBuffer<T, CacheAligned>, Error> {
    RawBuffer::new(count)
}

/// Reserve address space for `count` elements of `T`.
///
/// Physical pages are only committed when first written, and read as zero
/// until then. Dropping the handle returns the whole reservation to the
/// operating system.
#[inline]
pub fn lazy_allocate<T>(count: usize) -> Result<RawBuffer<T, Overcommit>, Error> {
    RawBuffer::new(count)
}

#[cfg(test)]
mod test {
    #![allow(clippy::unwrap_used)]

    use super::{
        aligned_allocate, allocate, lazy_allocate, Allocation, CacheAligned, Flavor, Heap,
        Overcommit, CACHE_LINE,
    };
    use crate::Error;
    use std::cell::Cell;
    use std::panic::{self, AssertUnwindSafe};
    use std::rc::Rc;

    /// Counts drops through a shared cell
    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn zero_count_is_empty() {
        let buf = allocate::<u64>(0).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 0);
        let buf = lazy_allocate::<u64>(0).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn heap_alignment() {
        let buf = allocate::<u64>(5).unwrap();
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.as_ptr() as usize % std::mem::align_of::<u64>(), 0);
    }

    #[test]
    fn cache_aligned_rounds_up() {
        let layout = CacheAligned::layout::<u8>(3).unwrap();
        assert_eq!(layout.align(), CACHE_LINE);
        assert_eq!(layout.size(), CACHE_LINE);
        let layout = CacheAligned::layout::<u32>(17).unwrap();
        assert_eq!(layout.size(), 2 * CACHE_LINE);

        let buf = aligned_allocate::<u8>(3).unwrap();
        assert_eq!(buf.as_ptr() as usize % CACHE_LINE, 0);
    }

    #[test]
    fn overflow_is_capacity_exceeded() {
        assert!(matches!(
            allocate::<u64>(usize::MAX),
            Err(Error::CapacityExceeded { .. })
        ));
        assert!(matches!(
            Heap::layout::<u32>(usize::MAX / 2),
            Err(Error::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn lazy_reads_zero_until_written() {
        let count = 1 << 20;
        let mut buf = lazy_allocate::<u64>(count).unwrap();
        assert_eq!(buf.capacity(), count);
        let ptr = buf.as_mut_ptr();
        // SAFETY: Both indices are inside the reservation, which is
        //         zero-filled on first touch.
        unsafe {
            assert_eq!(*ptr.add(count - 1), 0);
            *ptr.add(count / 2) = 0xfeed;
            assert_eq!(*ptr.add(count / 2), 0xfeed);
            assert_eq!(*ptr, 0);
        }
    }

    #[test]
    fn zeroed_allocation() {
        let heap = Allocation::<u32, Heap>::zeroed(100).unwrap();
        assert!(heap.iter().all(|&x| x == 0));
        let mut mapped = Allocation::<u32, Overcommit>::zeroed(100).unwrap();
        assert!(mapped.iter().all(|&x| x == 0));
        mapped[99] = 7;
        assert_eq!(mapped.iter().sum::<u32>(), 7);
    }

    #[test]
    fn allocation_drops_every_element() {
        let drops = Rc::new(Cell::new(0));
        let alloc =
            Allocation::<Tracked, Heap>::from_fn(10, |_| Tracked(drops.clone())).unwrap();
        assert_eq!(alloc.len(), 10);
        assert_eq!(drops.get(), 0);
        drop(alloc);
        assert_eq!(drops.get(), 10);
    }

    #[test]
    fn allocation_from_fn_panic_drops_prefix() {
        let drops = Rc::new(Cell::new(0));
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            Allocation::<Tracked, Heap>::from_fn(8, |i| {
                assert!(i < 5, "stop");
                Tracked(drops.clone())
            })
        }));
        assert!(result.is_err());
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn raw_parts_round_trip() {
        let mut buf = allocate::<u16>(4).unwrap();
        // SAFETY: Slot 0 is inside the buffer.
        unsafe { buf.as_mut_ptr().write(9) };
        let (ptr, capacity) = buf.into_raw_parts();
        // SAFETY: These parts came from into_raw_parts just above.
        let buf = unsafe { super::RawBuffer::<u16, Heap>::from_raw_parts(ptr, capacity) };
        assert_eq!(buf.capacity(), 4);
        // SAFETY: Slot 0 was written before the round trip.
        assert_eq!(unsafe { *buf.as_ptr() }, 9);
    }
}
