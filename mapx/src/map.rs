//! The hash map

use crate::err::Error;
use crate::iter::{Iter, IterMut, Keys, Values, ValuesMut};
use crate::raw::RawTable;
use crate::DefaultHashBuilder;
use digestx::{HashAppend, HashBuilder};
use memx::OrRaise;
use std::borrow::Borrow;
use std::fmt;
use std::mem;
use std::ops::Index;

/// Growth stops being "normal" once the nominal capacity exceeds this many
/// buckets per entry.
const REHASH_FACTOR: usize = 16;

/// Capacities up to this are always allowed, whatever the entry count.
const REHASH_FLOOR: usize = 1024;

/// A hash map with one-byte tags and a bounded probe window
///
/// Keys are hashed with the [`HashBuilder`] `S`, a [`Murmur3`] builder by
/// default. A key lives within [`MAX_PROBE`] buckets of its home, and
/// insertion grows the table when that window is full. If growth stops
/// helping, insertion fails with [`Error::PathologicalHash`] instead of
/// growing without bound.
///
/// Iteration order is bucket order: arbitrary, but fixed for a given hash
/// builder and history of operations.
///
/// Fallible operations come in pairs. The `try_` form returns the error;
/// the plain form panics with its message. Either way a failed operation
/// leaves the map as it was.
///
/// [`Murmur3`]: digestx::Murmur3
/// [`MAX_PROBE`]: crate::MAX_PROBE
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    pub(crate) table: RawTable<K, V>,
    hash_builder: S,
}

/// Where a key belongs
enum Slot {
    /// The key is already present in this bucket.
    Occupied(usize),
    /// The key is absent and this bucket is free for it.
    Vacant(usize),
}

impl<K, V> HashMap<K, V, DefaultHashBuilder> {
    /// An empty map. Allocates nothing.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::new())
    }
}

impl<K: Eq + HashAppend, V> HashMap<K, V, DefaultHashBuilder> {
    /// An empty map with room for `capacity` entries before growing.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::try_with_capacity_and_hasher(capacity, DefaultHashBuilder::new())
    }

    /// An empty map with room for `capacity` entries before growing.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).or_raise()
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// An empty map hashing with `hash_builder`. Allocates nothing.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: RawTable::new(),
            hash_builder,
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nominal capacity: the power-of-two part of the bucket count.
    ///
    /// Zero before the first allocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.nominal()
    }

    /// Total number of buckets: one less than the nominal capacity, plus
    /// [`MAX_PROBE`](crate::MAX_PROBE) so the last window fits.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.table.buckets()
    }

    /// The hash builder.
    #[inline]
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Iterate over `(&key, &value)` pairs in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.table)
    }

    /// Iterate over `(&key, &mut value)` pairs in bucket order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.table)
    }

    /// Iterate over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Iterate over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Iterate over the values, mutably.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Drop every entry, keeping the allocated buckets.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &mut V) -> bool) {
        for i in 0..self.table.buckets() {
            let Some((k, v)) = self.table.bucket_mut(i) else {
                continue;
            };
            if !keep(k, v) {
                drop(self.table.vacate(i));
            }
        }
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Eq + HashAppend,
    S: HashBuilder,
{
    /// An empty map with room for `capacity` entries, hashing with
    /// `hash_builder`.
    pub fn try_with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self, Error> {
        let mut map = Self::with_hasher(hash_builder);
        map.try_reserve(capacity)?;
        Ok(map)
    }

    /// An empty map with room for `capacity` entries, hashing with
    /// `hash_builder`.
    #[track_caller]
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self::try_with_capacity_and_hasher(capacity, hash_builder).or_raise()
    }

    /// Hash of a key, or of anything that hashes like one.
    #[inline(always)]
    fn hash<Q: HashAppend + ?Sized>(&self, key: &Q) -> u64 {
        self.hash_builder.hash_one(key)
    }

    /// Grow until the nominal capacity is at least `capacity`.
    ///
    /// Does nothing if it already is.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), Error> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        let target = capacity
            .checked_next_power_of_two()
            .ok_or(memx::Error::CapacityExceeded {
                requested: capacity,
                max: isize::MAX as usize,
            })?
            .max(4);
        self.grow(target - 1, target)
    }

    /// Grow until the nominal capacity is at least `capacity`.
    #[track_caller]
    pub fn reserve(&mut self, capacity: usize) {
        self.try_reserve(capacity).or_raise();
    }

    /// Rehash into nominal capacity `new_mask + 1`, doubling again while
    /// some entry fails to fit.
    ///
    /// Growth is refused once the capacity passes the larger of
    /// `REHASH_FACTOR` buckets per entry, [`REHASH_FLOOR`] and `allowed`.
    fn grow(&mut self, mut new_mask: usize, allowed: usize) -> Result<(), Error> {
        let len = self.len();
        let limit = len
            .saturating_mul(REHASH_FACTOR)
            .max(REHASH_FLOOR)
            .max(allowed);
        loop {
            let capacity = new_mask.saturating_add(1);
            if capacity > limit {
                #[cfg(feature = "logging")]
                log::warn!(
                    "giving up on {} entries: capacity {} exceeds {}, check the hash function",
                    len,
                    capacity,
                    limit
                );
                return Err(Error::PathologicalHash { len, capacity });
            }
            #[cfg(feature = "logging")]
            log::debug!(
                "rehashing {} entries from capacity {} to {}",
                len,
                self.capacity(),
                capacity
            );
            let Self {
                table,
                hash_builder,
            } = self;
            if table.rehash(new_mask, |k| hash_builder.hash_one(k))? {
                return Ok(());
            }
            new_mask = new_mask.saturating_mul(2).saturating_add(1);
        }
    }

    /// Find the bucket of `key`, or a free bucket for it, growing as needed.
    fn slot_for(&mut self, key: &K, hash: u64) -> Result<Slot, Error> {
        if let Some(i) = self.table.find(hash, |k| k == key) {
            return Ok(Slot::Occupied(i));
        }
        loop {
            if let Some(i) = self.table.first_empty(hash) {
                return Ok(Slot::Vacant(i));
            }
            let next = if self.table.buckets() == 0 {
                3
            } else {
                self.table.mask().saturating_mul(2).saturating_add(1)
            };
            self.grow(next, 0)?;
        }
    }

    /// Insert `key` unless it is present. Returns true if it was inserted.
    ///
    /// An existing entry keeps its value; `value` is dropped.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<bool, Error> {
        let hash = self.hash(&key);
        match self.slot_for(&key, hash)? {
            Slot::Occupied(_) => Ok(false),
            Slot::Vacant(i) => {
                self.table.occupy(i, hash, (key, value));
                Ok(true)
            }
        }
    }

    /// Insert `key` unless it is present. Returns true if it was inserted.
    #[track_caller]
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.try_insert(key, value).or_raise()
    }

    /// Map `key` to `value`, returning the value it replaced.
    pub fn try_insert_or_assign(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        let hash = self.hash(&key);
        Ok(match self.slot_for(&key, hash)? {
            Slot::Occupied(i) => {
                let (_, old) = self.table.occupied(i);
                Some(mem::replace(old, value))
            }
            Slot::Vacant(i) => {
                self.table.occupy(i, hash, (key, value));
                None
            }
        })
    }

    /// Map `key` to `value`, returning the value it replaced.
    #[track_caller]
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Option<V> {
        self.try_insert_or_assign(key, value).or_raise()
    }

    /// The value of `key`, inserting `make()` first if it is absent.
    pub fn try_get_or_insert_with(
        &mut self,
        key: K,
        make: impl FnOnce() -> V,
    ) -> Result<&mut V, Error> {
        let hash = self.hash(&key);
        let entry = match self.slot_for(&key, hash)? {
            Slot::Occupied(i) => self.table.occupied(i),
            Slot::Vacant(i) => self.table.occupy(i, hash, (key, make())),
        };
        Ok(&mut entry.1)
    }

    /// The value of `key`, inserting `make()` first if it is absent.
    #[track_caller]
    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
        self.try_get_or_insert_with(key, make).or_raise()
    }

    /// Bucket of a key, looked up by any borrowed form of it.
    #[inline]
    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + HashAppend + ?Sized,
    {
        if self.is_empty() {
            return None;
        }
        self.table.find(self.hash(key), |k| k.borrow() == key)
    }

    /// The value of `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + HashAppend + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// The stored key and value of `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Eq + HashAppend + ?Sized,
    {
        let i = self.find(key)?;
        self.table.bucket(i).map(|(k, v)| (k, v))
    }

    /// The value of `key`, mutably.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + HashAppend + ?Sized,
    {
        let i = self.find(key)?;
        self.table.bucket_mut(i).map(|(_, v)| v)
    }

    /// True if `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + HashAppend + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Remove `key`, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Eq + HashAppend + ?Sized,
    {
        let i = self.find(key)?;
        Some(self.table.vacate(i))
    }

    /// Remove `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + HashAppend + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Remove `key`. Returns the number of entries removed, zero or one.
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + HashAppend + ?Sized,
    {
        usize::from(self.remove_entry(key).is_some())
    }

    /// Move every entry of `items` in with [`try_insert_or_assign`], so
    /// later items win.
    ///
    /// [`try_insert_or_assign`]: Self::try_insert_or_assign
    pub fn try_extend(&mut self, items: impl IntoIterator<Item = (K, V)>) -> Result<(), Error> {
        for (k, v) in items {
            self.try_insert_or_assign(k, v)?;
        }
        Ok(())
    }
}

impl<K, V, S: Default> Default for HashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// Clones the entries bucket for bucket, along with the hash builder.
impl<K: Clone, V: Clone, S: Clone> Clone for HashMap<K, V, S> {
    #[track_caller]
    fn clone(&self) -> Self {
        Self {
            table: self.table.try_clone().or_raise(),
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Eq + HashAppend,
    V: PartialEq,
    S: HashBuilder,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|w| v == w))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Eq + HashAppend,
    V: Eq,
    S: HashBuilder,
{
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Eq + HashAppend,
    S: HashBuilder,
{
    #[track_caller]
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.try_extend(iter).or_raise();
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Eq + HashAppend,
    S: HashBuilder + Default,
{
    #[track_caller]
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S, Q> Index<&Q> for HashMap<K, V, S>
where
    K: Eq + HashAppend + Borrow<Q>,
    Q: Eq + HashAppend + ?Sized,
    S: HashBuilder,
{
    type Output = V;

    #[track_caller]
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => memx::raise("key not found in map"),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod test {
    #![allow(clippy::unwrap_used)]

    use super::{HashMap, REHASH_FLOOR};
    use crate::{Error, MAX_PROBE};
    use digestx::{Fnv1a64, HashAlgorithm, HashBuilder, Seeded};

    /// Sends every key to the same bucket with the same tag
    #[derive(Clone, Debug, Default)]
    struct Constant;

    #[derive(Clone, Debug, Default)]
    struct Zero;

    impl HashAlgorithm for Zero {
        fn update(&mut self, _bytes: &[u8]) {}

        fn output(&mut self, out: &mut [u8]) {
            out.fill(0);
        }
    }

    impl HashBuilder for Constant {
        type Algorithm = Zero;

        fn build_algorithm(&self) -> Zero {
            Zero
        }
    }

    #[test]
    fn growth_starts_at_four() {
        let mut m = HashMap::<u32, u32>::new();
        assert_eq!(m.capacity(), 0);
        assert_eq!(m.bucket_count(), 0);
        m.insert(1, 1);
        assert_eq!(m.capacity(), 4);
        assert_eq!(m.bucket_count(), 3 + MAX_PROBE);
    }

    #[test]
    fn colliding_keys_are_refused() {
        let mut m = HashMap::<u32, u32, Constant>::with_hasher(Constant);
        for k in 0..MAX_PROBE as u32 {
            assert_eq!(m.try_insert(k, k), Ok(true));
        }
        let err = m.try_insert(99, 99).unwrap_err();
        assert_eq!(
            err,
            Error::PathologicalHash {
                len: MAX_PROBE,
                capacity: REHASH_FLOOR * 2
            }
        );
        assert_eq!(m.len(), MAX_PROBE);
        for k in 0..MAX_PROBE as u32 {
            assert_eq!(m.get(&k), Some(&k));
        }
        assert!(!m.contains_key(&99));
    }

    #[test]
    fn tags_match_the_hash_of_their_keys() {
        let mut m: HashMap<u64, ()> = (0..500).map(|k| (k * 7919, ())).collect();
        for k in 0..100 {
            m.remove(&(k * 7919 * 3));
        }
        let tags = m.table.tags();
        let mut occupied = 0;
        for (i, &tag) in tags.iter().enumerate() {
            let Some((k, _)) = m.table.bucket(i) else {
                assert_eq!(tag, 0);
                continue;
            };
            occupied += 1;
            let h = m.hasher().hash_one(k);
            assert_eq!(tag, h as u8 | 1);
            let home = (h >> 8) as usize & m.table.mask();
            assert!((home..home + MAX_PROBE).contains(&i));
        }
        assert_eq!(occupied, m.len());
    }

    #[test]
    fn seeded_builders_travel_with_the_map() {
        let mut a = HashMap::with_hasher(Seeded::<Fnv1a64>::new(1));
        let mut b = HashMap::with_hasher(Seeded::<Fnv1a64>::new(2));
        a.insert("one".to_string(), 1);
        b.insert("two".to_string(), 2);
        std::mem::swap(&mut a, &mut b);
        assert_eq!(a.hasher().seed(), 2);
        assert_eq!(a.get("two"), Some(&2));
        assert_eq!(b.get("one"), Some(&1));
        let c = b.clone();
        assert_eq!(c.hasher(), b.hasher());
        assert_eq!(c, b);
    }

    #[test]
    fn existing_keys_are_updated_in_place() {
        let mut m = HashMap::<u32, String>::new();
        assert_eq!(m.insert_or_assign(1, "a".to_string()), None);
        assert_eq!(m.insert_or_assign(1, "b".to_string()).as_deref(), Some("a"));
        assert_eq!(m.len(), 1);

        m.get_or_insert_with(1, || unreachable!("key 1 is present"))
            .push('!');
        assert_eq!(m.get(&1).map(String::as_str), Some("b!"));
        assert_eq!(m.get_or_insert_with(2, || "c".to_string()), "c");
        assert_eq!(m.len(), 2);
    }
}
