//! Configuring a map before it is built

use crate::err::Error;
use crate::map::HashMap;
use crate::DefaultHashBuilder;
use digestx::{HashAppend, HashBuilder, SeedableAlgorithm, Seeded};

/// Builder for [`HashMap`]
///
/// Collects the initial capacity and the hash builder, then creates as many
/// maps as needed with [`build`](Self::build). Choosing a hash builder
/// consumes the builder; the other setters work in place.
///
/// ```
/// use digestx::Fnv1a64;
/// use mapx::HashMapBuilder;
///
/// let mut map = HashMapBuilder::new()
///     .seed::<Fnv1a64>(0x5eed)
///     .capacity(100)
///     .build::<u32, &str>()?;
/// map.insert(7, "seven");
/// assert!(map.capacity() >= 100);
/// assert_eq!(map.hasher().seed(), 0x5eed);
/// # Ok::<(), mapx::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct HashMapBuilder<S = DefaultHashBuilder> {
    capacity: usize,
    hash_builder: S,
}

impl HashMapBuilder {
    /// A builder for empty maps with the default hash builder.
    pub fn new() -> Self {
        Self {
            capacity: 0,
            hash_builder: DefaultHashBuilder::new(),
        }
    }
}

impl Default for HashMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> HashMapBuilder<S> {
    /// Reserve room for `capacity` entries in every map built.
    pub fn capacity(&mut self, capacity: usize) -> &mut Self {
        self.capacity = capacity;
        self
    }

    /// Hash keys with `hash_builder`.
    pub fn hasher<S2>(self, hash_builder: S2) -> HashMapBuilder<S2> {
        HashMapBuilder {
            capacity: self.capacity,
            hash_builder,
        }
    }

    /// Hash keys with algorithm `A` keyed by `seed`.
    pub fn seed<A: SeedableAlgorithm>(self, seed: u64) -> HashMapBuilder<Seeded<A>> {
        self.hasher(Seeded::new(seed))
    }
}

impl<S: HashBuilder> HashMapBuilder<S> {
    /// Create a map with the configured capacity and hash builder.
    pub fn build<K: Eq + HashAppend, V>(&self) -> Result<HashMap<K, V, S>, Error> {
        HashMap::try_with_capacity_and_hasher(self.capacity, self.hash_builder.clone())
    }
}
