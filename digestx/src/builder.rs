//! Hash builders: how containers turn keys into 64-bit hashes
//!
//! A [`HashBuilder`] makes fresh algorithm states. [`Unseeded`] is stateless
//! and every instance hashes the same way. [`Seeded`] carries a 64-bit seed
//! that is fed into each new state, and two seeded builders are
//! interchangeable exactly when their seeds match.
//!
//! Both also implement [`std::hash::BuildHasher`] so the algorithms here can
//! drive std collections, through the [`StdHasher`] adapter.

use crate::{HashAlgorithm, HashAppend, SeedableAlgorithm};
use std::fmt;
use std::hash::{BuildHasher, Hasher};
use std::marker::PhantomData;

/// A factory for hash algorithm states
pub trait HashBuilder: Clone {
    /// The algorithm produced by this builder
    type Algorithm: HashAlgorithm;

    /// A fresh state, ready to absorb one value.
    fn build_algorithm(&self) -> Self::Algorithm;

    /// Hash a single value to 64 bits.
    #[inline]
    fn hash_one<T: HashAppend + ?Sized>(&self, value: &T) -> u64 {
        let mut algorithm = self.build_algorithm();
        value.hash_append(&mut algorithm);
        algorithm.finish()
    }
}

/// Stateless builder producing default-constructed `A` states
pub struct Unseeded<A> {
    /// Selects the algorithm; holds no data
    _algorithm: PhantomData<fn() -> A>,
}

impl<A> Unseeded<A> {
    /// Construct the builder.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            _algorithm: PhantomData,
        }
    }
}

// Derived Clone would require `A: Clone`.
#[allow(clippy::expl_impl_clone_on_copy)]
impl<A> Clone for Unseeded<A> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Unseeded<A> {}

impl<A> Default for Unseeded<A> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<A> PartialEq for Unseeded<A> {
    #[inline(always)]
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<A> Eq for Unseeded<A> {}

impl<A> fmt::Debug for Unseeded<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unseeded<{}>", std::any::type_name::<A>())
    }
}

impl<A: HashAlgorithm + Default> HashBuilder for Unseeded<A> {
    type Algorithm = A;

    #[inline(always)]
    fn build_algorithm(&self) -> A {
        A::default()
    }
}

/// Builder producing `A` states keyed by a 64-bit seed
pub struct Seeded<A> {
    /// Seed fed into every new state
    seed: u64,
    /// Selects the algorithm
    _algorithm: PhantomData<fn() -> A>,
}

impl<A> Seeded<A> {
    /// Construct the builder with a seed.
    #[inline(always)]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            _algorithm: PhantomData,
        }
    }

    /// The seed this builder feeds into its states.
    #[inline(always)]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

// Derived Clone would require `A: Clone`.
#[allow(clippy::expl_impl_clone_on_copy)]
impl<A> Clone for Seeded<A> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Seeded<A> {}

impl<A> PartialEq for Seeded<A> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
    }
}

impl<A> Eq for Seeded<A> {}

impl<A> fmt::Debug for Seeded<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Seeded<{}>({:#018x})",
            std::any::type_name::<A>(),
            self.seed
        )
    }
}

impl<A: SeedableAlgorithm> HashBuilder for Seeded<A> {
    type Algorithm = A;

    #[inline(always)]
    fn build_algorithm(&self) -> A {
        A::with_seed(self.seed)
    }
}

/// Adapter exposing a [`HashAlgorithm`] as a [`std::hash::Hasher`]
///
/// `Hasher::finish` takes `&self`, so the state is cloned to finalize it.
#[derive(Clone, Debug)]
pub struct StdHasher<A>(A);

impl<A> StdHasher<A> {
    /// Wrap an algorithm state.
    pub fn new(algorithm: A) -> Self {
        Self(algorithm)
    }

    /// Unwrap the algorithm state.
    pub fn into_inner(self) -> A {
        self.0
    }
}

impl<A: HashAlgorithm + Clone> Hasher for StdHasher<A> {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0.clone().finish()
    }
}

impl<A: HashAlgorithm + Default + Clone> BuildHasher for Unseeded<A> {
    type Hasher = StdHasher<A>;

    fn build_hasher(&self) -> StdHasher<A> {
        StdHasher(self.build_algorithm())
    }
}

impl<A: SeedableAlgorithm + Clone> BuildHasher for Seeded<A> {
    type Hasher = StdHasher<A>;

    fn build_hasher(&self) -> StdHasher<A> {
        StdHasher(self.build_algorithm())
    }
}
