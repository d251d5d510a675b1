//! Storage words of the bit containers

use bytemuck::Pod;
use num_traits::PrimInt;
use std::fmt;
use std::hash::Hash;

/// An unsigned machine word holding `BITS` bits of a container
///
/// Bit `i` of a container lives in limb `i / BITS` at position `i % BITS`,
/// counting from the least significant bit.
pub trait Limb: PrimInt + Pod + Default + Hash + fmt::Debug + Send + Sync + 'static {
    /// Number of bits per limb
    const BITS: usize;
}

macro_rules! impl_limb {
    ($($t:ty),*) => {
        $(
            impl Limb for $t {
                const BITS: usize = <$t>::BITS as usize;
            }
        )*
    };
}

impl_limb!(u8, u16, u32, u64, usize);

/// Number of limbs covering `bits` bits.
#[inline(always)]
pub(crate) fn limbs_for<L: Limb>(bits: usize) -> usize {
    bits.div_ceil(L::BITS)
}

/// Mask of the used bits in the last limb of a `len`-bit container.
#[inline(always)]
pub(crate) fn tail_mask<L: Limb>(len: usize) -> L {
    match len % L::BITS {
        0 => L::max_value(),
        r => (L::one() << r) - L::one(),
    }
}

/// Limb index and single-bit mask of bit `index`.
#[inline(always)]
pub(crate) fn locate<L: Limb>(index: usize) -> (usize, L) {
    (index / L::BITS, L::one() << (index % L::BITS))
}

#[cfg(test)]
mod test {
    use super::{limbs_for, locate, tail_mask};

    #[test]
    fn arithmetic() {
        assert_eq!(limbs_for::<u8>(0), 0);
        assert_eq!(limbs_for::<u8>(8), 1);
        assert_eq!(limbs_for::<u8>(9), 2);
        assert_eq!(tail_mask::<u8>(3), 0b111);
        assert_eq!(tail_mask::<u8>(16), 0xff);
        assert_eq!(locate::<u16>(17), (1, 0b10));
    }
}
