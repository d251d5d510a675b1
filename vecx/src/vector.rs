//! The vector facade over a storage policy

use crate::storage::{HeaderStorage, HeapStorage, InlineStorage, MappedStorage, SmallStorage};
use crate::Storage;
use digestx::{HashAlgorithm, HashAppend};
use memx::relocate::{relocate, relocate_at, relocate_n, relocate_within};
use memx::{Error, OrRaise};
use std::borrow::{Borrow, BorrowMut};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Bound, Deref, DerefMut, RangeBounds};
use std::{fmt, mem, ptr, slice};

/// A contiguous growable sequence of `T`, stored according to `S`
///
/// Elements `[0, len)` are live, and the rest of the buffer up to
/// `capacity` is raw memory. Growth doubles the capacity, clamped to the
/// storage's maximum. Every fallible method has a `try_` form returning
/// [`Error`]; the plain forms panic with the error's message.
pub struct Vector<T, S: Storage<T> = HeapStorage<T>> {
    /// Buffer and length
    storage: S,
    /// Owns values of `T`
    _marker: PhantomData<T>,
}

/// Up to `N` elements held inline, never allocating
pub type InlineVec<T, const N: usize> = Vector<T, InlineStorage<T, N>>;

/// `N` elements inline, spilling to the heap beyond that
pub type SmallVec<T, const N: usize> = Vector<T, SmallStorage<T, N>>;

/// Up to `N` elements in one lazily mapped reservation; never reallocates
pub type StableVec<T, const N: usize> = Vector<T, MappedStorage<T, N>>;

/// A one-word vector whose length and capacity live in its allocation
pub type ThinVec<T> = Vector<T, HeaderStorage<T>>;

/// Resolve a range against a length, or report the offending bound.
fn resolve(range: impl RangeBounds<usize>, len: usize) -> Result<(usize, usize), Error> {
    let start = match range.start_bound() {
        Bound::Included(&i) => i,
        Bound::Excluded(&i) => i.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&i) => i.saturating_add(1),
        Bound::Excluded(&i) => i,
        Bound::Unbounded => len,
    };
    if end > len {
        return Err(Error::IndexOutOfRange { index: end, len });
    }
    if start > end {
        return Err(Error::IndexOutOfRange { index: start, len });
    }
    Ok((start, end))
}

impl<T, S: Storage<T>> Vector<T, S> {
    /// An empty vector. Allocates nothing for heap-backed policies.
    #[inline]
    pub fn new() -> Self {
        Self {
            storage: S::new(),
            _marker: PhantomData,
        }
    }

    /// An empty vector with room for at least `capacity` elements.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        Ok(Self {
            storage: S::with_capacity(capacity)?,
            _marker: PhantomData,
        })
    }

    /// An empty vector with room for at least `capacity` elements.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).or_raise()
    }

    /// `len` default values.
    #[track_caller]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut v = Self::with_capacity(len);
        v.resize_with(len, T::default);
        v
    }

    /// `len` clones of `value`.
    pub fn try_from_elem(value: &T, len: usize) -> Result<Self, Error>
    where
        T: Clone,
    {
        let mut v = Self::try_with_capacity(len)?;
        v.try_resize(len, value)?;
        Ok(v)
    }

    /// `len` clones of `value`.
    #[track_caller]
    pub fn from_elem(value: &T, len: usize) -> Self
    where
        T: Clone,
    {
        Self::try_from_elem(value, len).or_raise()
    }

    /// Number of live elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// True when there are no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements that fit without reallocating.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Largest capacity the storage policy allows.
    #[inline(always)]
    pub fn max_capacity(&self) -> usize {
        self.storage.max_capacity()
    }

    /// Pointer to the first element.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Mutable pointer to the first element.
    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// The elements as a slice.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The first `len` slots are live.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len()) }
    }

    /// The elements as a mutable slice.
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len();
        // SAFETY: The first `len` slots are live and uniquely borrowed.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
    }

    /// The underlying storage.
    #[inline(always)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Take the storage out, leaving the vector empty.
    pub(crate) fn into_storage(self) -> S {
        self.storage
    }

    /// Set the length directly.
    ///
    /// # Safety
    ///
    /// `len <= capacity()`, and slots `[0, len)` must hold live values.
    #[inline(always)]
    pub unsafe fn set_len(&mut self, len: usize) {
        self.storage.set_len(len);
    }

    /// Checked element access.
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        let len = self.len();
        self.as_slice()
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Checked mutable element access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Capacity to allocate when growing to hold `needed` elements.
    ///
    /// With `spare`, growth is geometric: at least double the current
    /// capacity, clamped to the storage maximum.
    fn grown_capacity(&self, needed: usize, spare: bool) -> Result<usize, Error> {
        let max = self.max_capacity();
        if needed > max {
            return Err(Error::CapacityExceeded {
                requested: needed,
                max,
            });
        }
        Ok(if spare {
            needed.max(self.capacity().saturating_mul(2)).min(max)
        } else {
            needed
        })
    }

    /// Move every element into a fresh storage of `capacity` slots.
    fn reallocate(&mut self, capacity: usize) -> Result<(), Error> {
        let len = self.len();
        let mut fresh = S::with_capacity(capacity)?;
        // SAFETY: The new buffer has room for `len` elements. After the copy
        //         the old storage forgets them, so each lives exactly once.
        unsafe {
            relocate_n(self.storage.as_ptr(), len, fresh.as_mut_ptr());
            self.storage.set_len(0);
            fresh.set_len(len);
        }
        self.storage.swap(&mut fresh);
        Ok(())
    }

    /// Ensure room for `new_cap` elements in total.
    ///
    /// Does nothing when `new_cap <= capacity()`. Otherwise allocates
    /// exactly `new_cap` slots and relocates the elements.
    pub fn try_reserve(&mut self, new_cap: usize) -> Result<(), Error> {
        if new_cap <= self.capacity() {
            return Ok(());
        }
        let capacity = self.grown_capacity(new_cap, false)?;
        self.reallocate(capacity)
    }

    /// Ensure room for `new_cap` elements in total.
    #[track_caller]
    pub fn reserve(&mut self, new_cap: usize) {
        self.try_reserve(new_cap).or_raise();
    }

    /// Ensure room for `new_cap` elements, growing geometrically.
    ///
    /// The new capacity is the largest of `new_cap` and twice the current
    /// capacity, clamped to [`Vector::max_capacity`].
    pub fn try_reserve_spare(&mut self, new_cap: usize) -> Result<(), Error> {
        if new_cap <= self.capacity() {
            return Ok(());
        }
        let capacity = self.grown_capacity(new_cap, true)?;
        self.reallocate(capacity)
    }

    /// Append an element.
    pub fn try_push(&mut self, value: T) -> Result<(), Error> {
        let len = self.len();
        if len == self.capacity() {
            return self.push_grow(value);
        }
        // SAFETY: `len < capacity`, so the slot is free.
        unsafe {
            self.as_mut_ptr().add(len).write(value);
            self.storage.set_len(len + 1);
        }
        Ok(())
    }

    /// Append an element.
    #[track_caller]
    pub fn push(&mut self, value: T) {
        self.try_push(value).or_raise();
    }

    /// Slow path of [`Vector::try_push`]: the new element is written into
    /// the new buffer before the existing ones are relocated behind it.
    #[cold]
    fn push_grow(&mut self, value: T) -> Result<(), Error> {
        let len = self.len();
        let needed = len.checked_add(1).ok_or(Error::CapacityExceeded {
            requested: usize::MAX,
            max: self.max_capacity(),
        })?;
        let mut fresh = S::with_capacity(self.grown_capacity(needed, true)?)?;
        // SAFETY: The fresh buffer holds at least `len + 1` slots. The old
        //         storage forgets its elements once they are copied.
        unsafe {
            fresh.as_mut_ptr().add(len).write(value);
            relocate_n(self.storage.as_ptr(), len, fresh.as_mut_ptr());
            self.storage.set_len(0);
            fresh.set_len(needed);
        }
        self.storage.swap(&mut fresh);
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        // SAFETY: Slot `len - 1` is live and forgotten by the new length.
        unsafe {
            self.storage.set_len(len - 1);
            Some(relocate(self.as_ptr().add(len - 1)))
        }
    }

    /// Drop every element past `len`. No effect if already shorter.
    pub fn truncate(&mut self, len: usize) {
        let old = self.len();
        if len >= old {
            return;
        }
        // SAFETY: The tail is forgotten before it is dropped, so a panicking
        //         destructor can at worst leak.
        unsafe {
            self.storage.set_len(len);
            let tail = slice::from_raw_parts_mut(self.as_mut_ptr().add(len), old - len);
            ptr::drop_in_place(tail);
        }
    }

    /// Drop every element, keeping the capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resize to `len`, filling new slots from `fill`.
    pub fn try_resize_with(&mut self, len: usize, mut fill: impl FnMut() -> T) -> Result<(), Error> {
        let old = self.len();
        if len <= old {
            self.truncate(len);
            return Ok(());
        }
        self.try_reserve_spare(len)?;
        for i in old..len {
            // SAFETY: Capacity covers `len`; the length tracks each write.
            unsafe {
                self.as_mut_ptr().add(i).write(fill());
                self.storage.set_len(i + 1);
            }
        }
        Ok(())
    }

    /// Resize to `len`, filling new slots from `fill`.
    #[track_caller]
    pub fn resize_with(&mut self, len: usize, fill: impl FnMut() -> T) {
        self.try_resize_with(len, fill).or_raise();
    }

    /// Resize to `len`, filling new slots with clones of `value`.
    pub fn try_resize(&mut self, len: usize, value: &T) -> Result<(), Error>
    where
        T: Clone,
    {
        self.try_resize_with(len, || value.clone())
    }

    /// Resize to `len`, filling new slots with clones of `value`.
    #[track_caller]
    pub fn resize(&mut self, len: usize, value: &T)
    where
        T: Clone,
    {
        self.try_resize(len, value).or_raise();
    }

    /// Append clones of every element of `items`.
    pub fn try_extend_from_slice(&mut self, items: &[T]) -> Result<(), Error>
    where
        T: Clone,
    {
        let len = self.len();
        self.try_reserve_spare(len.saturating_add(items.len()))?;
        for item in items {
            self.try_push(item.clone())?;
        }
        Ok(())
    }

    /// Append clones of every element of `items`.
    #[track_caller]
    pub fn extend_from_slice(&mut self, items: &[T])
    where
        T: Clone,
    {
        self.try_extend_from_slice(items).or_raise();
    }

    /// Append every element of an iterator.
    pub fn try_extend(&mut self, items: impl IntoIterator<Item = T>) -> Result<(), Error> {
        let items = items.into_iter();
        let (lower, _) = items.size_hint();
        self.try_reserve_spare(self.len().saturating_add(lower))?;
        for item in items {
            self.try_push(item)?;
        }
        Ok(())
    }

    /// Replace the contents with clones of `items`.
    ///
    /// Existing elements are assigned in place. When the new contents fit
    /// in the current capacity the buffer is kept. Otherwise a buffer of
    /// exactly `items.len()` slots replaces it.
    pub fn try_assign_slice(&mut self, items: &[T]) -> Result<(), Error>
    where
        T: Clone,
    {
        let n = items.len();
        let len = self.len();
        if n <= len {
            self.as_mut_slice()[..n].clone_from_slice(items);
            self.truncate(n);
        } else if n <= self.capacity() {
            self.as_mut_slice().clone_from_slice(&items[..len]);
            for item in &items[len..] {
                self.try_push(item.clone())?;
            }
        } else {
            let mut fresh = Self::try_with_capacity(n)?;
            for item in items {
                fresh.try_push(item.clone())?;
            }
            mem::swap(self, &mut fresh);
        }
        Ok(())
    }

    /// Replace the contents with clones of `items`.
    #[track_caller]
    pub fn assign_slice(&mut self, items: &[T])
    where
        T: Clone,
    {
        self.try_assign_slice(items).or_raise();
    }

    /// Replace the contents with `n` clones of `value`.
    ///
    /// Uses the same three cases as [`Vector::try_assign_slice`].
    pub fn try_assign_elem(&mut self, n: usize, value: &T) -> Result<(), Error>
    where
        T: Clone,
    {
        let len = self.len();
        if n <= len {
            self.as_mut_slice()[..n].fill(value.clone());
            self.truncate(n);
        } else if n <= self.capacity() {
            self.as_mut_slice().fill(value.clone());
            for _ in len..n {
                self.try_push(value.clone())?;
            }
        } else {
            let mut fresh = Self::try_with_capacity(n)?;
            for _ in 0..n {
                fresh.try_push(value.clone())?;
            }
            mem::swap(self, &mut fresh);
        }
        Ok(())
    }

    /// Replace the contents with `n` clones of `value`.
    #[track_caller]
    pub fn assign_elem(&mut self, n: usize, value: &T)
    where
        T: Clone,
    {
        self.try_assign_elem(n, value).or_raise();
    }

    /// Replace the contents with the items of an iterator.
    ///
    /// Existing slots are overwritten first. Leftover elements are dropped
    /// and extra items are appended.
    pub fn try_assign_iter(&mut self, items: impl IntoIterator<Item = T>) -> Result<(), Error> {
        let mut items = items.into_iter();
        let mut written = 0;
        for slot in self.as_mut_slice() {
            match items.next() {
                Some(item) => *slot = item,
                None => break,
            }
            written += 1;
        }
        self.truncate(written);
        self.try_extend(items)
    }

    /// Replace the contents with the items of an iterator.
    #[track_caller]
    pub fn assign_iter(&mut self, items: impl IntoIterator<Item = T>) {
        self.try_assign_iter(items).or_raise();
    }

    /// Insert `value` at `index`, shifting later elements right.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), Error> {
        let len = self.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        self.try_push(value)?;
        self.as_mut_slice()[index..].rotate_right(1);
        Ok(())
    }

    /// Insert `value` at `index`, shifting later elements right.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) {
        self.try_insert(index, value).or_raise();
    }

    /// Insert every item of an iterator at `index`, in order.
    pub fn try_insert_iter(
        &mut self,
        index: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Result<(), Error> {
        let len = self.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let result = self.try_extend(items);
        let added = self.len() - len;
        self.as_mut_slice()[index..].rotate_right(added);
        result
    }

    /// Insert every item of an iterator at `index`, in order.
    #[track_caller]
    pub fn insert_iter(&mut self, index: usize, items: impl IntoIterator<Item = T>) {
        self.try_insert_iter(index, items).or_raise();
    }

    /// Insert clones of `items` at `index`.
    #[track_caller]
    pub fn insert_slice(&mut self, index: usize, items: &[T])
    where
        T: Clone,
    {
        self.try_insert_iter(index, items.iter().cloned()).or_raise();
    }

    /// Drop the elements in `range`, shifting the tail down.
    pub fn try_erase(&mut self, range: impl RangeBounds<usize>) -> Result<(), Error> {
        let len = self.len();
        let (start, end) = resolve(range, len)?;
        if start == end {
            return Ok(());
        }
        // SAFETY: The length is cut to `start` before anything is dropped,
        //         so a panicking destructor leaks the tail instead of
        //         exposing dead slots. The tail is then relocated over the
        //         gap and the length restored.
        unsafe {
            self.storage.set_len(start);
            let base = self.as_mut_ptr();
            ptr::drop_in_place(slice::from_raw_parts_mut(base.add(start), end - start));
            relocate_within(base.add(end), len - end, base.add(start));
            self.storage.set_len(len - (end - start));
        }
        Ok(())
    }

    /// Drop the elements in `range`, shifting the tail down.
    #[track_caller]
    pub fn erase(&mut self, range: impl RangeBounds<usize>) {
        self.try_erase(range).or_raise();
    }

    /// Remove and return the element at `index`, shifting the tail down.
    pub fn try_remove(&mut self, index: usize) -> Result<T, Error> {
        let len = self.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        // SAFETY: Slot `index` is live; the tail is moved over it.
        unsafe {
            let base = self.as_mut_ptr();
            let value = relocate(base.add(index));
            relocate_within(base.add(index + 1), len - index - 1, base.add(index));
            self.storage.set_len(len - 1);
            Ok(value)
        }
    }

    /// Remove and return the element at `index`, shifting the tail down.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        self.try_remove(index).or_raise()
    }

    /// Remove and return the element at `index`, moving the last element
    /// into its place.
    #[track_caller]
    pub fn swap_remove(&mut self, index: usize) -> T {
        let len = self.len();
        if index >= len {
            memx::raise(Error::IndexOutOfRange { index, len });
        }
        self.as_mut_slice().swap(index, len - 1);
        let Some(removed) = self.pop() else {
            unreachable!("index {index} was checked against length {len}");
        };
        removed
    }

    /// Keep only the elements for which `keep` returns true.
    ///
    /// Returns the number of elements removed. Order is preserved.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let len = self.len();
        let mut kept = 0;
        // SAFETY: The length is zero while elements are being shuffled, so
        //         a panic in `keep` leaks instead of double-dropping.
        unsafe {
            self.storage.set_len(0);
            let base = self.as_mut_ptr();
            for i in 0..len {
                let cur = base.add(i);
                if keep(&*cur) {
                    if kept != i {
                        relocate_at(cur, base.add(kept));
                    }
                    kept += 1;
                } else {
                    ptr::drop_in_place(cur);
                }
            }
            self.storage.set_len(kept);
        }
        len - kept
    }

    /// Remove consecutive elements for which `same(current, previous)`
    /// holds, keeping the first of each run.
    ///
    /// Returns the number of elements removed.
    pub fn dedup_by(&mut self, mut same: impl FnMut(&mut T, &mut T) -> bool) -> usize {
        let len = self.len();
        if len < 2 {
            return 0;
        }
        let mut kept = 1;
        // SAFETY: As in `retain`, the length stays zero during the shuffle.
        unsafe {
            self.storage.set_len(0);
            let base = self.as_mut_ptr();
            for i in 1..len {
                let cur = base.add(i);
                if same(&mut *cur, &mut *base.add(kept - 1)) {
                    ptr::drop_in_place(cur);
                } else {
                    if kept != i {
                        relocate_at(cur, base.add(kept));
                    }
                    kept += 1;
                }
            }
            self.storage.set_len(kept);
        }
        len - kept
    }

    /// Remove consecutive duplicates. Returns the number removed.
    pub fn dedup(&mut self) -> usize
    where
        T: PartialEq,
    {
        self.dedup_by(|a, b| a == b)
    }

    /// Exchange contents with another vector of the same policy.
    #[inline]
    pub fn swap_with(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
    }
}

impl<T, const N: usize> Vector<T, SmallStorage<T, N>> {
    /// True while the elements are held inside the vector itself.
    #[inline(always)]
    pub fn is_inline(&self) -> bool {
        self.storage.is_inline()
    }
}

impl<T, S: Storage<T>> Default for Vector<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: Storage<T>> Deref for Vector<T, S> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, S: Storage<T>> DerefMut for Vector<T, S> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, S: Storage<T>> AsRef<[T]> for Vector<T, S> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, S: Storage<T>> AsMut<[T]> for Vector<T, S> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, S: Storage<T>> Borrow<[T]> for Vector<T, S> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T, S: Storage<T>> BorrowMut<[T]> for Vector<T, S> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone, S: Storage<T>> Clone for Vector<T, S> {
    #[track_caller]
    fn clone(&self) -> Self {
        let mut v = Self::new();
        v.assign_slice(self);
        v
    }

    #[track_caller]
    fn clone_from(&mut self, source: &Self) {
        self.assign_slice(source);
    }
}

impl<T: fmt::Debug, S: Storage<T>> fmt::Debug for Vector<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U, S, S2> PartialEq<Vector<U, S2>> for Vector<T, S>
where
    T: PartialEq<U>,
    S: Storage<T>,
    S2: Storage<U>,
{
    fn eq(&self, other: &Vector<U, S2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U, S: Storage<T>> PartialEq<[U]> for Vector<T, S> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U, S: Storage<T>> PartialEq<&[U]> for Vector<T, S> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, S: Storage<T>, const M: usize> PartialEq<[U; M]> for Vector<T, S> {
    fn eq(&self, other: &[U; M]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U, S: Storage<T>> PartialEq<Vec<U>> for Vector<T, S> {
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, S: Storage<T>> Eq for Vector<T, S> {}

impl<T: PartialOrd, S: Storage<T>, S2: Storage<T>> PartialOrd<Vector<T, S2>> for Vector<T, S> {
    fn partial_cmp(&self, other: &Vector<T, S2>) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, S: Storage<T>> Ord for Vector<T, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, S: Storage<T>> Hash for Vector<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: HashAppend, S: Storage<T>> HashAppend for Vector<T, S> {
    /// Hashes the same as the equivalent slice.
    fn hash_append<H: HashAlgorithm + ?Sized>(&self, hasher: &mut H) {
        self.as_slice().hash_append(hasher);
    }
}

impl<T, S: Storage<T>> Extend<T> for Vector<T, S> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.try_extend(iter).or_raise();
    }
}

impl<'a, T: Copy + 'a, S: Storage<T>> Extend<&'a T> for Vector<T, S> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.try_extend(iter.into_iter().copied()).or_raise();
    }
}

impl<T, S: Storage<T>> FromIterator<T> for Vector<T, S> {
    #[track_caller]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = Self::new();
        v.extend(iter);
        v
    }
}

impl<T, S: Storage<T>, const M: usize> From<[T; M]> for Vector<T, S> {
    #[track_caller]
    fn from(items: [T; M]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Clone, S: Storage<T>> From<&[T]> for Vector<T, S> {
    #[track_caller]
    fn from(items: &[T]) -> Self {
        let mut v = Self::new();
        v.assign_slice(items);
        v
    }
}

impl<T, S: Storage<T>> From<Vec<T>> for Vector<T, S> {
    #[track_caller]
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<'a, T, S: Storage<T>> IntoIterator for &'a Vector<T, S> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, S: Storage<T>> IntoIterator for &'a mut Vector<T, S> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod test {
    use super::{resolve, Vector};
    use crate::Error;

    #[test]
    fn ranges() {
        assert_eq!(resolve(.., 5), Ok((0, 5)));
        assert_eq!(resolve(1..=2, 5), Ok((1, 3)));
        assert_eq!(
            resolve(2..7, 5),
            Err(Error::IndexOutOfRange { index: 7, len: 5 })
        );
        assert!(resolve(4..3, 5).is_err());
    }

    #[test]
    fn spare_growth_doubles() {
        let mut v = Vector::<u8>::with_capacity(4);
        v.extend_from_slice(&[1, 2, 3, 4]);
        assert_eq!(v.capacity(), 4);
        v.push(5);
        assert_eq!(v.capacity(), 8);
        v.reserve(9);
        assert_eq!(v.capacity(), 9);
        v.reserve(3);
        assert_eq!(v.capacity(), 9);
    }

    #[test]
    fn pop_returns_values() {
        let mut v: Vector<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(v.pop().as_deref(), Some("b"));
        assert_eq!(v.pop().as_deref(), Some("a"));
        assert_eq!(v.pop(), None);
    }

    #[test]
    fn swap_remove_moves_the_last_element() {
        let mut v = Vector::<u16>::from([1, 2, 3, 4]);
        assert_eq!(v.swap_remove(1), 2);
        assert_eq!(v, [1, 4, 3]);
        assert_eq!(v.swap_remove(2), 3);
        assert_eq!(v, [1, 4]);
        assert_eq!(v.swap_remove(0), 1);
        assert_eq!(v.swap_remove(0), 4);
        assert!(v.is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn swap_remove_past_the_end() {
        let mut v = Vector::<u16>::from([1]);
        v.swap_remove(1);
    }
}
