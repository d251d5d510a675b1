//! The bucket arrays behind [`HashMap`](crate::HashMap)
//!
//! A table of nominal capacity `mask + 1` (a power of two) has
//! `mask + MAX_PROBE` buckets, so the probe window of every home bucket fits
//! without wrapping. Each bucket is a tag byte and a `(K, V)` slot. A zero
//! tag marks an empty bucket; an occupied one holds the low byte of the
//! key's hash with bit 0 forced on. The full hash is never stored.
//!
//! Erasing clears the tag and leaves no tombstone, since lookups never stop
//! early at an empty bucket.

use crate::MAX_PROBE;
use memx::relocate::{relocate, relocate_at};
use memx::{Allocation, CacheAligned, Error, RawBuffer};
use std::mem::ManuallyDrop;
use std::ops::Range;
use std::ptr;

/// Split a hash into the home bucket index and the tag byte.
#[inline(always)]
pub(crate) fn split_hash(hash: u64) -> (usize, u8) {
    ((hash >> 8) as usize, hash as u8 | 1)
}

/// Tags and slots of a map
pub(crate) struct RawTable<K, V> {
    /// One tag per bucket, cache-line aligned
    tags: Allocation<u8, CacheAligned>,
    /// One slot per bucket, live exactly where the tag is non-zero
    slots: RawBuffer<(K, V)>,
    /// Nominal capacity minus one; zero while nothing is allocated
    mask: usize,
    /// Number of occupied buckets
    len: usize,
}

impl<K, V> RawTable<K, V> {
    /// A table with no buckets.
    pub(crate) fn new() -> Self {
        Self {
            // SAFETY: A buffer of zero elements is trivially initialized.
            tags: unsafe { RawBuffer::empty().assume_init() },
            slots: RawBuffer::empty(),
            mask: 0,
            len: 0,
        }
    }

    /// An empty table of nominal capacity `mask + 1`.
    pub(crate) fn with_mask(mask: usize) -> Result<Self, Error> {
        debug_assert!((mask + 1).is_power_of_two());
        let buckets = mask
            .checked_add(MAX_PROBE)
            .ok_or(Error::CapacityExceeded {
                requested: usize::MAX,
                max: usize::MAX - MAX_PROBE,
            })?;
        Ok(Self {
            tags: Allocation::zeroed(buckets)?,
            slots: RawBuffer::new(buckets)?,
            mask,
            len: 0,
        })
    }

    /// Number of occupied buckets.
    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Total number of buckets, including the probe overhang.
    #[inline(always)]
    pub(crate) fn buckets(&self) -> usize {
        self.tags.len()
    }

    /// Nominal capacity: the power-of-two part of the bucket count.
    #[inline(always)]
    pub(crate) fn nominal(&self) -> usize {
        if self.buckets() == 0 {
            0
        } else {
            self.mask + 1
        }
    }

    /// Mask of the current table.
    #[inline(always)]
    pub(crate) fn mask(&self) -> usize {
        self.mask
    }

    /// The tag array.
    #[inline(always)]
    pub(crate) fn tags(&self) -> &[u8] {
        &self.tags
    }

    /// Pointer to the first slot.
    #[inline(always)]
    pub(crate) fn slots_ptr(&self) -> *const (K, V) {
        self.slots.as_ptr()
    }

    /// Mutable pointer to the first slot.
    #[inline(always)]
    pub(crate) fn slots_mut_ptr(&mut self) -> *mut (K, V) {
        self.slots.as_mut_ptr()
    }

    /// Buckets a key with home `base` may occupy.
    #[inline(always)]
    fn window(&self, base: usize) -> Range<usize> {
        let start = base & self.mask;
        start..start + MAX_PROBE
    }

    /// Bucket holding a key with this hash for which `is_key` holds.
    ///
    /// The whole window is scanned; empty buckets do not end the search.
    #[inline]
    pub(crate) fn find(&self, hash: u64, mut is_key: impl FnMut(&K) -> bool) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let (base, tag) = split_hash(hash);
        self.window(base)
            .find(|&i| self.tags[i] == tag && self.bucket(i).is_some_and(|(k, _)| is_key(k)))
    }

    /// First empty bucket in the window of this hash.
    #[inline]
    pub(crate) fn first_empty(&self, hash: u64) -> Option<usize> {
        if self.buckets() == 0 {
            return None;
        }
        let (base, _) = split_hash(hash);
        self.window(base).find(|&i| self.tags[i] == 0)
    }

    /// The entry in bucket `i`, if occupied.
    #[inline(always)]
    pub(crate) fn bucket(&self, i: usize) -> Option<&(K, V)> {
        if *self.tags.get(i)? == 0 {
            return None;
        }
        // SAFETY: A non-zero tag marks a live slot.
        Some(unsafe { &*self.slots.as_ptr().add(i) })
    }

    /// The entry in bucket `i`, mutably, if occupied.
    #[inline(always)]
    pub(crate) fn bucket_mut(&mut self, i: usize) -> Option<&mut (K, V)> {
        if *self.tags.get(i)? == 0 {
            return None;
        }
        // SAFETY: A non-zero tag marks a live slot.
        Some(unsafe { &mut *self.slots.as_mut_ptr().add(i) })
    }

    /// The entry in bucket `i`, which must be occupied.
    #[inline]
    pub(crate) fn occupied(&mut self, i: usize) -> &mut (K, V) {
        assert_ne!(self.tags[i], 0, "bucket {} is empty", i);
        // SAFETY: A non-zero tag marks a live slot.
        unsafe { &mut *self.slots.as_mut_ptr().add(i) }
    }

    /// Store an entry in empty bucket `i` under the tag of `hash`.
    #[inline]
    pub(crate) fn occupy(&mut self, i: usize, hash: u64, entry: (K, V)) -> &mut (K, V) {
        assert_eq!(self.tags[i], 0, "bucket {} is occupied", i);
        // SAFETY: Bucket `i` is in bounds and empty.
        let slot = unsafe {
            let slot = self.slots.as_mut_ptr().add(i);
            slot.write(entry);
            &mut *slot
        };
        self.tags[i] = split_hash(hash).1;
        self.len += 1;
        slot
    }

    /// Move the entry out of occupied bucket `i`, leaving it empty.
    #[inline]
    pub(crate) fn vacate(&mut self, i: usize) -> (K, V) {
        assert_ne!(self.tags[i], 0, "bucket {} is empty", i);
        self.tags[i] = 0;
        self.len -= 1;
        // SAFETY: The tag said the slot was live; clearing it hands the value
        //         to the caller.
        unsafe { relocate(self.slots.as_ptr().add(i)) }
    }

    /// Drop every entry and empty every bucket, keeping the arrays.
    pub(crate) fn clear(&mut self) {
        let buckets = self.buckets();
        for i in 0..buckets {
            if self.tags[i] != 0 {
                self.tags[i] = 0;
                self.len -= 1;
                // SAFETY: The slot was live; its tag is already cleared so a
                //         panicking destructor cannot cause a second drop.
                unsafe { ptr::drop_in_place(self.slots.as_mut_ptr().add(i)) };
            }
        }
    }

    /// Forget every entry without dropping it.
    fn forget_entries(&mut self) {
        self.tags.fill(0);
        self.len = 0;
    }

    /// Move every entry into a fresh table of nominal capacity
    /// `new_mask + 1`, rehashing each key.
    ///
    /// Returns `Ok(false)` if some entry found no empty bucket in its new
    /// window. Then, as on allocation failure, this table is untouched.
    pub(crate) fn rehash(
        &mut self,
        new_mask: usize,
        mut hash: impl FnMut(&K) -> u64,
    ) -> Result<bool, Error> {
        // A panicking hash function leaks the new arrays rather than letting
        // them drop entries this table still owns.
        let mut fresh = ManuallyDrop::new(Self::with_mask(new_mask)?);
        for i in 0..self.buckets() {
            let Some((key, _)) = self.bucket(i) else {
                continue;
            };
            let h = hash(key);
            let Some(j) = fresh.first_empty(h) else {
                fresh.forget_entries();
                drop(ManuallyDrop::into_inner(fresh));
                return Ok(false);
            };
            // SAFETY: Bucket `j` is empty. The entry is duplicated for now,
            //         and exactly one of the two tables forgets it below.
            unsafe { relocate_at(self.slots.as_ptr().add(i), fresh.slots.as_mut_ptr().add(j)) };
            fresh.tags[j] = split_hash(h).1;
            fresh.len += 1;
        }
        self.forget_entries();
        std::mem::swap(self, &mut *fresh);
        drop(ManuallyDrop::into_inner(fresh));
        Ok(true)
    }
}

impl<K: Clone, V: Clone> RawTable<K, V> {
    /// Clone entry by entry, keeping each in the same bucket.
    pub(crate) fn try_clone(&self) -> Result<Self, Error> {
        if self.buckets() == 0 {
            return Ok(Self::new());
        }
        let mut out = Self::with_mask(self.mask)?;
        for i in 0..self.buckets() {
            if let Some(entry) = self.bucket(i) {
                // SAFETY: The same bucket is empty in the new table.
                unsafe { out.slots.as_mut_ptr().add(i).write(entry.clone()) };
                out.tags[i] = self.tags[i];
                out.len += 1;
            }
        }
        Ok(out)
    }
}

impl<K, V> Drop for RawTable<K, V> {
    fn drop(&mut self) {
        if self.len > 0 {
            self.clear();
        }
    }
}

#[cfg(test)]
mod test {
    #![allow(clippy::unwrap_used)]

    use super::{split_hash, RawTable};
    use crate::MAX_PROBE;

    #[test]
    fn tags_are_never_zero() {
        assert_eq!(split_hash(0), (0, 1));
        assert_eq!(split_hash(0x1234_5600), (0x12_3456, 1));
        assert_eq!(split_hash(0xabff), (0xab, 0xff));
    }

    #[test]
    fn layout() {
        let t = RawTable::<u32, u32>::with_mask(7).unwrap();
        assert_eq!(t.buckets(), 7 + MAX_PROBE);
        assert_eq!(t.nominal(), 8);
        // The window of the last home bucket ends at the last bucket.
        assert_eq!(t.window(u64::MAX as usize).end, t.buckets());
        assert_eq!(t.first_empty(7 << 8), Some(7));
        assert_eq!(t.tags().as_ptr() as usize % 64, 0);
        assert!(t.tags().iter().all(|&t| t == 0));

        let t = RawTable::<u32, u32>::new();
        assert_eq!(t.nominal(), 0);
        assert_eq!(t.first_empty(5), None);
    }

    #[test]
    fn occupy_find_vacate() {
        let mut t = RawTable::<String, u8>::with_mask(3).unwrap();
        let h = 0x0500_u64;
        let i = t.first_empty(h).unwrap();
        assert_eq!(i, 1);
        t.occupy(i, h, ("k".to_string(), 9));
        assert_eq!(t.find(h, |k| k == "k"), Some(1));
        assert_eq!(t.find(h, |k| k == "x"), None);
        assert_eq!(t.first_empty(h), Some(2));
        assert_eq!(t.vacate(1), ("k".to_string(), 9));
        assert_eq!(t.len(), 0);
        assert_eq!(t.find(h, |_| true), None);
    }

    #[test]
    fn failed_rehash_leaves_table_intact() {
        let mut t = RawTable::<u32, u32>::with_mask(31).unwrap();
        let home = |k: u32| u64::from(k) << 8;
        for k in 0..20 {
            let slot = t.first_empty(home(k)).unwrap();
            t.occupy(slot, home(k), (k, k));
        }
        // Twenty keys cannot share one sixteen-bucket window.
        assert!(!t.rehash(63, |_| 0).unwrap());
        assert_eq!(t.len(), 20);
        assert_eq!(t.nominal(), 32);
        assert!(t.rehash(63, |&k| home(k)).unwrap());
        assert_eq!(t.nominal(), 64);
        for k in 0..20 {
            let i = t.find(home(k), |&x| x == k).unwrap();
            assert_eq!(t.bucket(i), Some(&(k, k)));
        }
    }
}
