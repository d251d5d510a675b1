//! A bit vector that tracks which limbs are non-zero

use crate::bits::{Bits, BitsMut};
use crate::limb::{limbs_for, Limb};
use crate::vector::BitVector;
use memx::{Error, OrRaise};
use vecx::Vector;

/// A bit vector for mostly-empty sets
///
/// Alongside the limbs it keeps the sorted indices of every non-zero limb,
/// so [`clear`](Self::clear) and [`count_ones`](Bits::count_ones) cost time
/// proportional to the number of occupied limbs rather than the length.
/// Every write goes through this type to keep that list exact, which is why
/// it implements [`Bits`] but not [`BitsMut`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SparseBitVector<L: Limb = usize> {
    bits: BitVector<L>,
    /// Indices of the non-zero limbs, ascending
    occupied: Vector<usize>,
}

impl<L: Limb> SparseBitVector<L> {
    /// An empty vector.
    pub fn new() -> Self {
        Self {
            bits: BitVector::new(),
            occupied: Vector::new(),
        }
    }

    /// `len` zero bits.
    pub fn try_with_len(len: usize) -> Result<Self, Error> {
        Ok(Self {
            bits: BitVector::try_repeat(false, len)?,
            occupied: Vector::new(),
        })
    }

    /// `len` zero bits.
    #[track_caller]
    pub fn with_len(len: usize) -> Self {
        Self::try_with_len(len).or_raise()
    }

    /// Change the number of bits. New bits are zero.
    pub fn try_resize(&mut self, len: usize) -> Result<(), Error> {
        self.bits.try_resize(len)?;
        let Self { bits, occupied } = self;
        let limbs = bits.limbs();
        let live = limbs_for::<L>(len);
        occupied.retain(|&k| k < live && !limbs[k].is_zero());
        Ok(())
    }

    /// Change the number of bits. New bits are zero.
    #[track_caller]
    pub fn resize(&mut self, len: usize) {
        self.try_resize(len).or_raise();
    }

    /// Set bit `index`. Returns false if it was already set.
    ///
    /// When this makes a limb non-zero, its index goes into the occupied
    /// list at its sorted position rather than at the end, so
    /// [`occupied_limbs`](Self::occupied_limbs) stays ascending and
    /// [`remove`](Self::remove) can find entries by binary search. That
    /// insertion costs O(occupied limbs); setting a bit in an already
    /// occupied limb costs O(1).
    #[track_caller]
    pub fn add(&mut self, index: usize) -> bool {
        let k = index / L::BITS;
        let was_empty = self.bits.limbs().get(k).is_some_and(|l| l.is_zero());
        let added = self.bits.add(index);
        if was_empty {
            if let Err(pos) = self.occupied.binary_search(&k) {
                self.occupied.insert(pos, k);
            }
        }
        added
    }

    /// Clear bit `index`. Returns false if it was already clear.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> bool {
        let removed = self.bits.remove(index);
        let k = index / L::BITS;
        if removed && self.bits.limbs()[k].is_zero() {
            if let Ok(pos) = self.occupied.binary_search(&k) {
                self.occupied.remove(pos);
            }
        }
        removed
    }

    /// Set bit `index` to `value`.
    #[track_caller]
    pub fn assign(&mut self, index: usize, value: bool) {
        if value {
            self.add(index);
        } else {
            self.remove(index);
        }
    }

    /// Zero every bit, touching only the occupied limbs.
    pub fn clear(&mut self) {
        let limbs = self.bits.limbs_mut();
        for &k in self.occupied.iter() {
            limbs[k] = L::zero();
        }
        self.occupied.clear();
    }

    /// Sorted indices of the limbs holding at least one set bit.
    #[inline]
    pub fn occupied_limbs(&self) -> &[usize] {
        &self.occupied
    }

    /// The bits as a plain vector.
    #[inline]
    pub fn as_bit_vector(&self) -> &BitVector<L> {
        &self.bits
    }
}

impl<L: Limb> Bits<L> for SparseBitVector<L> {
    #[inline(always)]
    fn limbs(&self) -> &[L] {
        self.bits.limbs()
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    fn any(&self) -> bool {
        !self.occupied.is_empty()
    }

    fn count_ones(&self) -> usize {
        let limbs = self.bits.limbs();
        self.occupied
            .iter()
            .map(|&k| limbs[k].count_ones() as usize)
            .sum()
    }
}

impl<L: Limb> From<BitVector<L>> for SparseBitVector<L> {
    fn from(bits: BitVector<L>) -> Self {
        let occupied = bits
            .limbs()
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.is_zero())
            .map(|(k, _)| k)
            .collect();
        Self { bits, occupied }
    }
}

#[cfg(test)]
mod test {
    use super::SparseBitVector;
    use crate::{BitVector, Bits};

    #[test]
    fn sidecar_tracks_limbs() {
        let mut s = SparseBitVector::<u8>::with_len(100);
        assert!(s.add(90));
        assert!(s.add(3));
        assert!(s.add(5));
        assert!(!s.add(5));
        assert_eq!(s.occupied_limbs(), [0, 11]);
        assert_eq!(s.count_ones(), 3);
        assert!(s.remove(3));
        assert_eq!(s.occupied_limbs(), [0, 11]);
        assert!(s.remove(5));
        assert_eq!(s.occupied_limbs(), [11]);
        assert!(!s.remove(5));
        assert!(s.any());
        s.clear();
        assert!(s.none());
        assert!(s.occupied_limbs().is_empty());
        assert_eq!(s.len(), 100);
    }

    #[test]
    fn occupied_limbs_stay_sorted() {
        let mut s = SparseBitVector::<u8>::with_len(80);
        for index in [75, 41, 3, 60, 42, 17] {
            assert!(s.add(index));
        }
        assert_eq!(s.occupied_limbs(), [0, 2, 5, 7, 9]);
        assert!(s.remove(60));
        assert_eq!(s.occupied_limbs(), [0, 2, 5, 9]);
        assert!(s.add(8));
        assert_eq!(s.occupied_limbs(), [0, 1, 2, 5, 9]);
        assert_eq!(s.count_ones(), 6);
    }

    #[test]
    fn shrinking_drops_limbs() {
        let mut s = SparseBitVector::<u8>::with_len(64);
        s.add(2);
        s.add(60);
        s.resize(20);
        assert_eq!(s.occupied_limbs(), [0]);
        s.resize(64);
        assert_eq!(s.count_ones(), 1);
    }

    #[test]
    fn from_dense() {
        let v = BitVector::<u16>::repeat(false, 50);
        let s = SparseBitVector::from(v);
        assert!(s.occupied_limbs().is_empty());
        let v: BitVector<u16> = (0..50).map(|i| i == 33).collect();
        let s = SparseBitVector::from(v);
        assert_eq!(s.occupied_limbs(), [2]);
        assert_eq!(s.find(), 33);
    }
}
