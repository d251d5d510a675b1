//! The owning bit vector

use crate::bits::{Bits, BitsMut};
use crate::limb::{limbs_for, locate, tail_mask, Limb};
use crate::span::{BitSlice, BitSliceMut};
use digestx::{HashAlgorithm, HashAppend};
use memx::{Error, OrRaise};
use std::fmt::{self, Write};
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};
use vecx::Vector;

/// A growable sequence of bits packed into limbs of type `L`
///
/// The number of bits is fixed except through [`resize`](Self::resize),
/// [`push`](Self::push) and [`pop`](Self::pop). Reading or writing past the
/// end is an error; see [`BitMap`](crate::BitMap) for a container that grows
/// on write.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitVector<L: Limb = usize> {
    /// Exactly `ceil(len / L::BITS)` live limbs
    limbs: Vector<L>,
    /// Number of bits
    len: usize,
}

impl<L: Limb> BitVector<L> {
    /// An empty bit vector.
    pub fn new() -> Self {
        Self {
            limbs: Vector::new(),
            len: 0,
        }
    }

    /// An empty bit vector with room for `bits` bits.
    pub fn try_with_capacity(bits: usize) -> Result<Self, Error> {
        Ok(Self {
            limbs: Vector::try_with_capacity(limbs_for::<L>(bits))?,
            len: 0,
        })
    }

    /// An empty bit vector with room for `bits` bits.
    #[track_caller]
    pub fn with_capacity(bits: usize) -> Self {
        Self::try_with_capacity(bits).or_raise()
    }

    /// `len` bits, all equal to `value`.
    pub fn try_repeat(value: bool, len: usize) -> Result<Self, Error> {
        let mut v = Self::try_with_capacity(len)?;
        v.try_resize(len)?;
        if value {
            v.fill(true);
        }
        Ok(v)
    }

    /// `len` bits, all equal to `value`.
    #[track_caller]
    pub fn repeat(value: bool, len: usize) -> Self {
        Self::try_repeat(value, len).or_raise()
    }

    /// Number of bits that fit without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.limbs.capacity().saturating_mul(L::BITS)
    }

    /// Ensure room for `bits` bits in total.
    ///
    /// With `spare`, growth is geometric like
    /// [`Vector::try_reserve_spare`].
    pub fn try_reserve(&mut self, bits: usize, spare: bool) -> Result<(), Error> {
        let limbs = limbs_for::<L>(bits);
        if spare {
            self.limbs.try_reserve_spare(limbs)
        } else {
            self.limbs.try_reserve(limbs)
        }
    }

    /// Ensure room for `bits` bits in total.
    #[track_caller]
    pub fn reserve(&mut self, bits: usize, spare: bool) {
        self.try_reserve(bits, spare).or_raise();
    }

    /// Change the number of bits.
    ///
    /// New bits are zero. Shrinking clears the dropped bits of the last
    /// surviving limb, so growing again later yields zeros there too.
    pub fn try_resize(&mut self, len: usize) -> Result<(), Error> {
        let limbs = limbs_for::<L>(len);
        if len < self.len {
            self.limbs.truncate(limbs);
            if let Some(last) = self.limbs.last_mut() {
                *last = *last & tail_mask::<L>(len);
            }
        } else {
            self.limbs.try_resize(limbs, &L::zero())?;
        }
        self.len = len;
        Ok(())
    }

    /// Change the number of bits.
    #[track_caller]
    pub fn resize(&mut self, len: usize) {
        self.try_resize(len).or_raise();
    }

    /// Append a bit.
    pub fn try_push(&mut self, value: bool) -> Result<(), Error> {
        if self.len % L::BITS == 0 {
            self.limbs.try_push(L::zero())?;
        }
        let (k, mask) = locate::<L>(self.len);
        if value {
            self.limbs[k] = self.limbs[k] | mask;
        }
        self.len += 1;
        Ok(())
    }

    /// Append a bit.
    #[track_caller]
    pub fn push(&mut self, value: bool) {
        self.try_push(value).or_raise();
    }

    /// Remove and return the last bit.
    pub fn pop(&mut self) -> Option<bool> {
        let index = self.len.checked_sub(1)?;
        let (k, mask) = locate::<L>(index);
        let value = self.limbs[k] & mask != L::zero();
        self.limbs[k] = self.limbs[k] & !mask;
        self.len = index;
        if index % L::BITS == 0 {
            self.limbs.pop();
        }
        Some(value)
    }

    /// Set bit `index`. Returns false if it was already set.
    #[track_caller]
    pub fn add(&mut self, index: usize) -> bool {
        let mut bit = self.bit_mut(index);
        let was = bit.get();
        bit.set();
        !was
    }

    /// Clear bit `index`. Returns false if it was already clear.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> bool {
        let mut bit = self.bit_mut(index);
        let was = bit.get();
        bit.reset();
        was
    }

    /// A read-only span over all the bits.
    #[inline]
    pub fn as_bit_slice(&self) -> BitSlice<'_, L> {
        BitSlice::new(&self.limbs, self.len)
    }

    /// A mutable span over all the bits.
    #[inline]
    pub fn as_bit_slice_mut(&mut self) -> BitSliceMut<'_, L> {
        BitSliceMut::new(&mut self.limbs, self.len)
    }
}

impl<L: Limb> Bits<L> for BitVector<L> {
    #[inline(always)]
    fn limbs(&self) -> &[L] {
        &self.limbs
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }
}

impl<L: Limb> BitsMut<L> for BitVector<L> {
    #[inline(always)]
    fn limbs_mut(&mut self) -> &mut [L] {
        &mut self.limbs
    }
}

impl<L: Limb> HashAppend for BitVector<L> {
    fn hash_append<H: HashAlgorithm + ?Sized>(&self, hasher: &mut H) {
        self.len.hash_append(hasher);
        hasher.update(bytemuck::cast_slice(&self.limbs));
    }
}

impl<L: Limb> fmt::Debug for BitVector<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BitVector[")?;
        for bit in self.iter() {
            f.write_char(if bit { '1' } else { '0' })?;
        }
        f.write_char(']')
    }
}

impl<L: Limb> Extend<bool> for BitVector<L> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(self.len.saturating_add(iter.size_hint().0), true);
        for bit in iter {
            self.push(bit);
        }
    }
}

impl<L: Limb> FromIterator<bool> for BitVector<L> {
    #[track_caller]
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut v = Self::new();
        v.extend(iter);
        v
    }
}

macro_rules! bit_operator {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $inner:ident) => {
        impl<L: Limb> $assign<&BitVector<L>> for BitVector<L> {
            #[track_caller]
            fn $assign_method(&mut self, rhs: &BitVector<L>) {
                self.$inner(rhs);
            }
        }

        impl<L: Limb> $op for &BitVector<L> {
            type Output = BitVector<L>;

            #[track_caller]
            fn $method(self, rhs: Self) -> BitVector<L> {
                let mut out = self.clone();
                out.$inner(rhs);
                out
            }
        }
    };
}

bit_operator!(BitOr, bitor, BitOrAssign, bitor_assign, or_assign);
bit_operator!(BitAnd, bitand, BitAndAssign, bitand_assign, and_assign);
bit_operator!(BitXor, bitxor, BitXorAssign, bitxor_assign, xor_assign);

impl<L: Limb> Not for &BitVector<L> {
    type Output = BitVector<L>;

    fn not(self) -> BitVector<L> {
        let mut out = self.clone();
        out.flip_all();
        out
    }
}

impl<L: Limb> Not for BitVector<L> {
    type Output = BitVector<L>;

    fn not(mut self) -> BitVector<L> {
        self.flip_all();
        self
    }
}

#[cfg(test)]
mod test {
    use super::BitVector;
    use crate::{Bits, BitsMut};
    use digestx::{Fnv1a64, HashBuilder, Unseeded};

    #[test]
    fn push_pop_keep_the_tail_clean() {
        let mut v = BitVector::<u8>::new();
        for i in 0..10 {
            v.push(i % 3 == 0);
        }
        assert_eq!(v.limbs().len(), 2);
        assert_eq!(v.count_ones(), 4);
        assert_eq!(v.pop(), Some(true));
        assert_eq!(v.pop(), Some(false));
        assert_eq!(v.limbs().len(), 1);
        assert_eq!(v.limbs()[0], 0b0100_1001);
        while v.pop().is_some() {}
        assert!(v.limbs().is_empty());
    }

    #[test]
    fn set_helpers() {
        let mut v = BitVector::<u32>::repeat(false, 40);
        assert!(v.add(33));
        assert!(!v.add(33));
        assert!(v.remove(33));
        assert!(!v.remove(33));
    }

    #[test]
    fn operators() {
        let a: BitVector<u8> = [true, true, false, false, true].into_iter().collect();
        let b: BitVector<u8> = [true, false, true, false, true].into_iter().collect();
        assert_eq!((&a | &b).iter_ones().collect::<Vec<_>>(), [0, 1, 2, 4]);
        assert_eq!((&a & &b).iter_ones().collect::<Vec<_>>(), [0, 4]);
        assert_eq!((&a ^ &b).iter_ones().collect::<Vec<_>>(), [1, 2]);
        assert_eq!((!&a).iter_ones().collect::<Vec<_>>(), [2, 3]);
        assert_eq!((!a.clone()).limbs(), [0b01100]);
        let mut c = a.clone();
        c ^= &a;
        assert!(c.none());
        assert_eq!(format!("{:?}", b), "BitVector[10101]");
    }

    #[test]
    #[should_panic(expected = "differ in length")]
    fn mismatched_lengths() {
        let a = BitVector::<u8>::repeat(true, 3);
        let b = BitVector::<u8>::repeat(true, 4);
        let _ = &a | &b;
    }

    #[test]
    fn equal_vectors_hash_equal() {
        let h = Unseeded::<Fnv1a64>::new();
        let mut a = BitVector::<u64>::repeat(true, 70);
        a.resize(65);
        let b = BitVector::<u64>::repeat(true, 65);
        assert_eq!(a, b);
        assert_eq!(h.hash_one(&a), h.hash_one(&b));
        a.reset(64);
        assert_ne!(h.hash_one(&a), h.hash_one(&b));
    }
}
