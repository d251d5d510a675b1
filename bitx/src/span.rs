//! Non-owning views over limbs
//!
//! A span always starts at a limb boundary and there is no way to take a
//! sub-span, so the bulk operations can work a whole limb at a time.

use crate::bits::{Bits, BitsMut};
use crate::limb::{limbs_for, tail_mask, Limb};
use std::ops::{BitAndAssign, BitOrAssign, BitXorAssign};

/// Assert the span invariants on borrowed limbs.
#[track_caller]
fn check<L: Limb>(limbs: &[L], len: usize) {
    assert_eq!(
        limbs.len(),
        limbs_for::<L>(len),
        "{} bits need {} limbs",
        len,
        limbs_for::<L>(len)
    );
    if let Some(&last) = limbs.last() {
        assert!(
            last & !tail_mask::<L>(len) == L::zero(),
            "bits past the end must be zero"
        );
    }
}

/// A read-only view of `len` bits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitSlice<'a, L: Limb = usize> {
    limbs: &'a [L],
    len: usize,
}

impl<'a, L: Limb> BitSlice<'a, L> {
    /// View `limbs` as `len` bits.
    ///
    /// Panics unless there are exactly `ceil(len / L::BITS)` limbs and the
    /// bits past `len` are zero.
    #[track_caller]
    pub fn new(limbs: &'a [L], len: usize) -> Self {
        check(limbs, len);
        Self { limbs, len }
    }
}

impl<L: Limb> Bits<L> for BitSlice<'_, L> {
    #[inline(always)]
    fn limbs(&self) -> &[L] {
        self.limbs
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }
}

/// A mutable view of `len` bits
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct BitSliceMut<'a, L: Limb = usize> {
    limbs: &'a mut [L],
    len: usize,
}

impl<'a, L: Limb> BitSliceMut<'a, L> {
    /// View `limbs` as `len` mutable bits, with the same requirements as
    /// [`BitSlice::new`].
    #[track_caller]
    pub fn new(limbs: &'a mut [L], len: usize) -> Self {
        check(limbs, len);
        Self { limbs, len }
    }

    /// Reborrow as a read-only view.
    #[inline(always)]
    pub fn as_bit_slice(&self) -> BitSlice<'_, L> {
        BitSlice {
            limbs: self.limbs,
            len: self.len,
        }
    }
}

impl<L: Limb> Bits<L> for BitSliceMut<'_, L> {
    #[inline(always)]
    fn limbs(&self) -> &[L] {
        self.limbs
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }
}

impl<L: Limb> BitsMut<L> for BitSliceMut<'_, L> {
    #[inline(always)]
    fn limbs_mut(&mut self) -> &mut [L] {
        self.limbs
    }
}

impl<L: Limb, B: Bits<L>> BitOrAssign<&B> for BitSliceMut<'_, L> {
    #[track_caller]
    fn bitor_assign(&mut self, rhs: &B) {
        self.or_assign(rhs);
    }
}

impl<L: Limb, B: Bits<L>> BitAndAssign<&B> for BitSliceMut<'_, L> {
    #[track_caller]
    fn bitand_assign(&mut self, rhs: &B) {
        self.and_assign(rhs);
    }
}

impl<L: Limb, B: Bits<L>> BitXorAssign<&B> for BitSliceMut<'_, L> {
    #[track_caller]
    fn bitxor_assign(&mut self, rhs: &B) {
        self.xor_assign(rhs);
    }
}

/// Store `a op b` into `out`, limb by limb.
#[track_caller]
fn combine<L, O, A, B>(out: &mut O, a: &A, b: &B, op: impl Fn(L, L) -> L)
where
    L: Limb,
    O: BitsMut<L> + ?Sized,
    A: Bits<L> + ?Sized,
    B: Bits<L> + ?Sized,
{
    assert_eq!(a.len(), b.len(), "bit containers differ in length");
    assert_eq!(out.len(), a.len(), "bit containers differ in length");
    let limbs = a.limbs().iter().zip(b.limbs());
    for (o, (&x, &y)) in out.limbs_mut().iter_mut().zip(limbs) {
        *o = op(x, y);
    }
}

/// `out = a | b`. Panics if the lengths differ.
///
/// To combine into one of the inputs, use [`BitsMut::or_assign`].
#[track_caller]
pub fn bitwise_or<L, O, A, B>(out: &mut O, a: &A, b: &B)
where
    L: Limb,
    O: BitsMut<L> + ?Sized,
    A: Bits<L> + ?Sized,
    B: Bits<L> + ?Sized,
{
    combine(out, a, b, |x, y| x | y);
}

/// `out = a & b`. Panics if the lengths differ.
#[track_caller]
pub fn bitwise_and<L, O, A, B>(out: &mut O, a: &A, b: &B)
where
    L: Limb,
    O: BitsMut<L> + ?Sized,
    A: Bits<L> + ?Sized,
    B: Bits<L> + ?Sized,
{
    combine(out, a, b, |x, y| x & y);
}

/// `out = a ^ b`. Panics if the lengths differ.
#[track_caller]
pub fn bitwise_xor<L, O, A, B>(out: &mut O, a: &A, b: &B)
where
    L: Limb,
    O: BitsMut<L> + ?Sized,
    A: Bits<L> + ?Sized,
    B: Bits<L> + ?Sized,
{
    combine(out, a, b, |x, y| x ^ y);
}

#[cfg(test)]
mod test {
    use super::{bitwise_and, bitwise_or, bitwise_xor, BitSlice, BitSliceMut};
    use crate::{Bits, BitsMut};

    #[test]
    #[should_panic(expected = "bits past the end must be zero")]
    fn dirty_tail_rejected() {
        let limbs = [0b1_0000u8];
        let _ = BitSlice::new(&limbs, 4);
    }

    #[test]
    #[should_panic(expected = "limbs")]
    fn limb_count_checked() {
        let limbs = [0u8; 3];
        let _ = BitSlice::new(&limbs, 9);
    }

    #[test]
    fn bulk() {
        let a = [0b1100u8];
        let b = [0b1010u8];
        let (a, b) = (BitSlice::new(&a, 4), BitSlice::new(&b, 4));
        let mut out = [0u8];
        let mut o = BitSliceMut::new(&mut out, 4);
        bitwise_or(&mut o, &a, &b);
        assert_eq!(o.limbs(), [0b1110]);
        bitwise_and(&mut o, &a, &b);
        assert_eq!(o.limbs(), [0b1000]);
        bitwise_xor(&mut o, &a, &b);
        assert_eq!(o.limbs(), [0b0110]);
        o |= &a;
        assert_eq!(o.limbs(), [0b1110]);
        o &= &b;
        assert_eq!(o.limbs(), [0b1010]);
        let same = [0b1010u8];
        o ^= &BitSlice::new(&same, 4);
        assert!(o.none());
        o.set(0);
        assert_eq!(o.as_bit_slice().find(), 0);
    }
}
