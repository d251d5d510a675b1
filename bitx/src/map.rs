//! A bit vector that grows on write

use crate::bits::{Bits, BitsMut};
use crate::limb::{limbs_for, Limb};
use crate::vector::BitVector;
use memx::{Error, OrRaise};
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// A set of small integers stored as bits
///
/// Unlike [`BitVector`], indices past the end are valid: reading one yields
/// `false` and writing a one extends the map (with geometric reservation)
/// to cover it. Read-only queries come from the underlying vector through
/// `Deref`.
///
/// Two maps are equal when they hold the same indices, whatever their
/// lengths.
#[derive(Clone, Debug, Default)]
pub struct BitMap<L: Limb = usize> {
    bits: BitVector<L>,
}

impl<L: Limb> BitMap<L> {
    /// An empty map.
    pub fn new() -> Self {
        Self {
            bits: BitVector::new(),
        }
    }

    /// An empty map with room for indices below `bits`.
    #[track_caller]
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: BitVector::with_capacity(bits),
        }
    }

    /// Extend to cover `index`.
    fn cover(&mut self, index: usize) -> Result<(), Error> {
        if index < self.bits.len() {
            return Ok(());
        }
        let len = index.checked_add(1).ok_or(Error::CapacityExceeded {
            requested: usize::MAX,
            max: usize::MAX - 1,
        })?;
        self.bits.try_reserve(len, true)?;
        self.bits.try_resize(len)
    }

    /// Bit `index`, or `false` past the end.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        self.bits.test(index).unwrap_or(false)
    }

    /// Set bit `index` to `value`, growing for a one past the end.
    pub fn try_assign(&mut self, index: usize, value: bool) -> Result<(), Error> {
        if value {
            self.cover(index)?;
            self.bits.set(index);
        } else if index < self.bits.len() {
            self.bits.reset(index);
        }
        Ok(())
    }

    /// Set bit `index` to `value`, growing for a one past the end.
    #[track_caller]
    pub fn assign(&mut self, index: usize, value: bool) {
        self.try_assign(index, value).or_raise();
    }

    /// Set bit `index`, growing if needed.
    #[track_caller]
    pub fn set(&mut self, index: usize) {
        self.assign(index, true);
    }

    /// Clear bit `index`. Nothing happens past the end.
    pub fn reset(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.reset(index);
        }
    }

    /// Invert bit `index`, growing if needed.
    #[track_caller]
    pub fn flip(&mut self, index: usize) {
        let value = !self.get(index);
        self.assign(index, value);
    }

    /// Set bit `index`. Returns false if it was already set.
    #[track_caller]
    pub fn add(&mut self, index: usize) -> bool {
        self.cover(index).or_raise();
        self.bits.add(index)
    }

    /// Clear bit `index`. Returns false if it was already clear.
    pub fn remove(&mut self, index: usize) -> bool {
        index < self.bits.len() && self.bits.remove(index)
    }

    /// Set every bit that is set in `other`.
    #[track_caller]
    pub fn union_with(&mut self, other: &Self) {
        if other.bits.len() > self.bits.len() {
            self.bits.reserve(other.bits.len(), true);
            self.bits.resize(other.bits.len());
        }
        for (a, &b) in self.bits.limbs_mut().iter_mut().zip(other.bits.limbs()) {
            *a = *a | b;
        }
    }

    /// Clear every bit that is not set in `other`.
    pub fn intersect_with(&mut self, other: &Self) {
        let limbs = self.bits.limbs_mut();
        let common = limbs.len().min(limbs_for::<L>(other.bits.len()));
        let (shared, rest) = limbs.split_at_mut(common);
        for (a, &b) in shared.iter_mut().zip(other.bits.limbs()) {
            *a = *a & b;
        }
        rest.fill(L::zero());
    }

    /// The limbs up to the last one with a bit set.
    fn significant_limbs(&self) -> &[L] {
        let limbs = self.bits.limbs();
        let end = limbs.iter().rposition(|l| !l.is_zero()).map_or(0, |i| i + 1);
        &limbs[..end]
    }

    /// The underlying bit vector.
    #[inline]
    pub fn as_bit_vector(&self) -> &BitVector<L> {
        &self.bits
    }

    /// Take the underlying bit vector.
    #[inline]
    pub fn into_bit_vector(self) -> BitVector<L> {
        self.bits
    }
}

impl<L: Limb> Deref for BitMap<L> {
    type Target = BitVector<L>;

    #[inline(always)]
    fn deref(&self) -> &BitVector<L> {
        &self.bits
    }
}

impl<L: Limb> PartialEq for BitMap<L> {
    fn eq(&self, other: &Self) -> bool {
        self.significant_limbs() == other.significant_limbs()
    }
}

impl<L: Limb> Eq for BitMap<L> {}

impl<L: Limb> Hash for BitMap<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant_limbs().hash(state);
    }
}

impl<L: Limb> From<BitVector<L>> for BitMap<L> {
    fn from(bits: BitVector<L>) -> Self {
        Self { bits }
    }
}

impl<L: Limb> FromIterator<usize> for BitMap<L> {
    #[track_caller]
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut map = Self::new();
        for index in iter {
            map.set(index);
        }
        map
    }
}
