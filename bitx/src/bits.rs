//! Operations shared by every bit container
//!
//! A container exposes its limbs and its length in bits. Every query is
//! written against those two and relies on one invariant: the bits of the
//! last limb past `len` are zero. Mutating operations keep it.

use crate::limb::{locate, tail_mask, Limb};
use memx::{Error, OrRaise};
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{BitAndAssign, BitOrAssign, BitXorAssign};

/// Read access to a sequence of bits stored in limbs
pub trait Bits<L: Limb = usize> {
    /// The backing limbs, exactly `ceil(len / L::BITS)` of them.
    fn limbs(&self) -> &[L];

    /// Number of bits.
    fn len(&self) -> usize;

    /// True when there are no bits.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checked read of bit `index`.
    #[inline]
    fn test(&self, index: usize) -> Result<bool, Error> {
        let len = self.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let (k, mask) = locate::<L>(index);
        Ok(self.limbs()[k] & mask != L::zero())
    }

    /// Bit `index`. Panics when out of range.
    #[inline]
    #[track_caller]
    fn get(&self, index: usize) -> bool {
        self.test(index).or_raise()
    }

    /// True if any bit is set.
    fn any(&self) -> bool {
        self.limbs().iter().any(|l| !l.is_zero())
    }

    /// True if every bit is set. Vacuously true when empty.
    fn all(&self) -> bool {
        match self.limbs().split_last() {
            None => true,
            Some((&last, full)) => {
                full.iter().all(|&l| l == L::max_value()) && last == tail_mask::<L>(self.len())
            }
        }
    }

    /// True if no bit is set.
    #[inline]
    fn none(&self) -> bool {
        !self.any()
    }

    /// Number of set bits.
    fn count_ones(&self) -> usize {
        self.limbs().iter().map(|l| l.count_ones() as usize).sum()
    }

    /// Number of bits equal to `value`.
    #[inline]
    fn count(&self, value: bool) -> usize {
        let ones = self.count_ones();
        if value {
            ones
        } else {
            self.len() - ones
        }
    }

    /// Index of the first set bit, or `len()` if there is none.
    #[inline]
    fn find(&self) -> usize {
        self.find_next(0)
    }

    /// Index of the first set bit at or after `from`, or `len()` if there is
    /// none.
    fn find_next(&self, from: usize) -> usize {
        let len = self.len();
        if from >= len {
            return len;
        }
        let limbs = self.limbs();
        let mut k = from / L::BITS;
        let below = (L::one() << (from % L::BITS)) - L::one();
        let mut word = limbs[k] & !below;
        loop {
            if !word.is_zero() {
                return k * L::BITS + word.trailing_zeros() as usize;
            }
            k += 1;
            match limbs.get(k) {
                Some(&next) => word = next,
                None => return len,
            }
        }
    }

    /// Iterate over every bit as a `bool`.
    #[inline]
    fn iter(&self) -> Iter<'_, L> {
        Iter {
            limbs: self.limbs(),
            front: 0,
            back: self.len(),
        }
    }

    /// Iterate over the indices of the set bits, in increasing order.
    #[inline]
    fn iter_ones(&self) -> Ones<'_, L> {
        let limbs = self.limbs();
        Ones {
            limbs,
            index: 0,
            word: limbs.first().copied().unwrap_or_else(L::zero),
        }
    }
}

/// Write access to a sequence of bits stored in limbs
///
/// The length is fixed; only bit values change.
pub trait BitsMut<L: Limb = usize>: Bits<L> {
    /// The backing limbs, mutably.
    ///
    /// Callers must leave the bits past `len()` zero.
    fn limbs_mut(&mut self) -> &mut [L];

    /// Checked proxy for bit `index`.
    #[inline]
    fn try_bit_mut(&mut self, index: usize) -> Result<BitRef<'_, L>, Error> {
        let len = self.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let (k, mask) = locate::<L>(index);
        Ok(BitRef {
            limb: &mut self.limbs_mut()[k],
            mask,
        })
    }

    /// Proxy for bit `index`. Panics when out of range.
    #[inline]
    #[track_caller]
    fn bit_mut(&mut self, index: usize) -> BitRef<'_, L> {
        self.try_bit_mut(index).or_raise()
    }

    /// Set bit `index` to one.
    #[inline]
    #[track_caller]
    fn set(&mut self, index: usize) {
        self.bit_mut(index).set();
    }

    /// Set bit `index` to zero.
    #[inline]
    #[track_caller]
    fn reset(&mut self, index: usize) {
        self.bit_mut(index).reset();
    }

    /// Invert bit `index`.
    #[inline]
    #[track_caller]
    fn flip(&mut self, index: usize) {
        self.bit_mut(index).flip();
    }

    /// Set bit `index` to `value`.
    #[inline]
    #[track_caller]
    fn assign(&mut self, index: usize, value: bool) {
        self.bit_mut(index).assign(value);
    }

    /// Set every bit to `value`.
    fn fill(&mut self, value: bool) {
        let len = self.len();
        let limbs = self.limbs_mut();
        if value {
            limbs.fill(L::max_value());
            if let Some(last) = limbs.last_mut() {
                *last = tail_mask::<L>(len);
            }
        } else {
            limbs.fill(L::zero());
        }
    }

    /// Invert every bit.
    fn flip_all(&mut self) {
        let len = self.len();
        let limbs = self.limbs_mut();
        for l in limbs.iter_mut() {
            *l = !*l;
        }
        if let Some(last) = limbs.last_mut() {
            *last = *last & tail_mask::<L>(len);
        }
    }

    /// `self |= other`, bit by bit. Panics if the lengths differ.
    #[track_caller]
    fn or_assign<B: Bits<L> + ?Sized>(&mut self, other: &B) {
        zip_assign(self, other, |a, b| a | b);
    }

    /// `self &= other`, bit by bit. Panics if the lengths differ.
    #[track_caller]
    fn and_assign<B: Bits<L> + ?Sized>(&mut self, other: &B) {
        zip_assign(self, other, |a, b| a & b);
    }

    /// `self ^= other`, bit by bit. Panics if the lengths differ.
    #[track_caller]
    fn xor_assign<B: Bits<L> + ?Sized>(&mut self, other: &B) {
        zip_assign(self, other, |a, b| a ^ b);
    }
}

/// Combine `other` into `dst` limb by limb.
#[track_caller]
pub(crate) fn zip_assign<L, D, B>(dst: &mut D, other: &B, op: impl Fn(L, L) -> L)
where
    L: Limb,
    D: BitsMut<L> + ?Sized,
    B: Bits<L> + ?Sized,
{
    assert_eq!(dst.len(), other.len(), "bit containers differ in length");
    for (a, &b) in dst.limbs_mut().iter_mut().zip(other.limbs()) {
        *a = op(*a, b);
    }
}

/// A mutable reference to one bit
pub struct BitRef<'a, L: Limb = usize> {
    limb: &'a mut L,
    mask: L,
}

impl<L: Limb> BitRef<'_, L> {
    /// Current value of the bit.
    #[inline(always)]
    pub fn get(&self) -> bool {
        *self.limb & self.mask != L::zero()
    }

    /// Set to one.
    #[inline(always)]
    pub fn set(&mut self) {
        *self.limb = *self.limb | self.mask;
    }

    /// Set to zero.
    #[inline(always)]
    pub fn reset(&mut self) {
        *self.limb = *self.limb & !self.mask;
    }

    /// Invert.
    #[inline(always)]
    pub fn flip(&mut self) {
        *self.limb = *self.limb ^ self.mask;
    }

    /// Set to `value`.
    #[inline(always)]
    pub fn assign(&mut self, value: bool) {
        if value {
            self.set();
        } else {
            self.reset();
        }
    }
}

impl<L: Limb> BitOrAssign<bool> for BitRef<'_, L> {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: bool) {
        if rhs {
            self.set();
        }
    }
}

impl<L: Limb> BitAndAssign<bool> for BitRef<'_, L> {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: bool) {
        if !rhs {
            self.reset();
        }
    }
}

impl<L: Limb> BitXorAssign<bool> for BitRef<'_, L> {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: bool) {
        if rhs {
            self.flip();
        }
    }
}

impl<L: Limb> From<BitRef<'_, L>> for bool {
    #[inline(always)]
    fn from(bit: BitRef<'_, L>) -> bool {
        bit.get()
    }
}

impl<L: Limb> fmt::Debug for BitRef<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BitRef").field(&self.get()).finish()
    }
}

/// Every bit of a container, as `bool`s
#[derive(Clone, Debug)]
pub struct Iter<'a, L: Limb = usize> {
    limbs: &'a [L],
    front: usize,
    back: usize,
}

impl<L: Limb> Iter<'_, L> {
    #[inline(always)]
    fn bit(&self, index: usize) -> bool {
        let (k, mask) = locate::<L>(index);
        self.limbs[k] & mask != L::zero()
    }
}

impl<L: Limb> Iterator for Iter<'_, L> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<bool> {
        if self.front == self.back {
            return None;
        }
        self.front += 1;
        Some(self.bit(self.front - 1))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<L: Limb> DoubleEndedIterator for Iter<'_, L> {
    #[inline]
    fn next_back(&mut self) -> Option<bool> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.bit(self.back))
    }
}

impl<L: Limb> ExactSizeIterator for Iter<'_, L> {}

impl<L: Limb> FusedIterator for Iter<'_, L> {}

/// Indices of the set bits of a container
#[derive(Clone, Debug)]
pub struct Ones<'a, L: Limb = usize> {
    limbs: &'a [L],
    /// Limb currently being drained
    index: usize,
    /// Bits of that limb not yet yielded
    word: L,
}

impl<L: Limb> Iterator for Ones<'_, L> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.word.is_zero() {
            self.index += 1;
            self.word = *self.limbs.get(self.index)?;
        }
        let bit = self.word.trailing_zeros() as usize;
        // Clear the lowest set bit.
        self.word = self.word & (self.word - L::one());
        Some(self.index * L::BITS + bit)
    }
}

impl<L: Limb> FusedIterator for Ones<'_, L> {}

#[cfg(test)]
mod test {
    use crate::{BitSlice, BitSliceMut, Bits, BitsMut, Error};

    #[test]
    fn queries() {
        let limbs = [0b1000_0100u8, 0b0000_0001];
        let bits = BitSlice::new(&limbs, 9);
        assert!(bits.any());
        assert!(!bits.all());
        assert_eq!(bits.count_ones(), 3);
        assert_eq!(bits.count(false), 6);
        assert_eq!(bits.find(), 2);
        assert_eq!(bits.find_next(3), 7);
        assert_eq!(bits.find_next(8), 8);
        assert_eq!(bits.find_next(9), 9);
        assert_eq!(bits.iter_ones().collect::<Vec<_>>(), [2, 7, 8]);
        assert_eq!(bits.iter().filter(|&b| b).count(), 3);
        assert_eq!(bits.iter().next_back(), Some(true));
        assert_eq!(bits.test(9), Err(Error::IndexOutOfRange { index: 9, len: 9 }));
    }

    #[test]
    fn all_respects_tail() {
        let limbs = [u8::MAX, 0b11];
        assert!(BitSlice::new(&limbs, 10).all());
        let empty: [u8; 0] = [];
        assert!(BitSlice::new(&empty, 0).all());
        assert!(BitSlice::new(&empty, 0).none());
        assert_eq!(BitSlice::new(&empty, 0).find(), 0);
    }

    #[test]
    fn proxy() {
        let mut limbs = [0u16; 2];
        let mut bits = BitSliceMut::new(&mut limbs, 20);
        {
            let mut b = bits.bit_mut(17);
            b |= true;
            assert!(b.get());
            b ^= true;
            assert!(!b.get());
            b ^= true;
            b &= true;
            assert!(bool::from(b));
        }
        bits.flip(3);
        bits.assign(4, true);
        bits.reset(3);
        assert_eq!(bits.iter_ones().collect::<Vec<_>>(), [4, 17]);
        bits.flip_all();
        assert_eq!(bits.count_ones(), 18);
        bits.fill(true);
        assert!(bits.all());
        bits.fill(false);
        assert!(bits.none());
        assert_eq!(limbs, [0, 0]);
    }
}
