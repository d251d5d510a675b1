//! The incremental protocol shared by every hash algorithm

/// An incremental hash function
///
/// Input is absorbed through any number of [`HashAlgorithm::update`] calls,
/// which behave as if all of their byte sequences had been concatenated.
/// The first call to [`HashAlgorithm::output`] finalizes the state. Later
/// calls continue an output stream where the algorithm supports one; the
/// 64-bit FNV state instead repeats the same bytes every time.
///
/// Absorbing more input after output has begun is a logic error. Algorithms
/// with a distinct squeeze phase panic when it happens.
pub trait HashAlgorithm {
    /// Absorb a run of bytes.
    fn update(&mut self, bytes: &[u8]);

    /// Fill `out` with the next bytes of output.
    fn output(&mut self, out: &mut [u8]);

    /// Finalize and return 64 bits of output, for use as a table hash.
    ///
    /// The default reads the next eight output bytes as a little-endian
    /// integer.
    fn finish(&mut self) -> u64 {
        let mut bytes = [0_u8; 8];
        self.output(&mut bytes);
        u64::from_le_bytes(bytes)
    }
}

/// A hash algorithm that can be started from a 64-bit seed
pub trait SeedableAlgorithm: HashAlgorithm + Sized {
    /// Construct a fresh state keyed by `seed`.
    fn with_seed(seed: u64) -> Self;
}

/// Hash `bytes` in one shot, returning the first `N` bytes of output.
///
/// ```
/// let sum = digestx::digest::<digestx::Fnv1a64, 8>(b"a");
/// assert_eq!(u64::from_le_bytes(sum), 0xaf63dc4c8601ec8c);
/// ```
pub fn digest<A: HashAlgorithm + Default, const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut algorithm = A::default();
    algorithm.update(bytes);
    let mut out = [0_u8; N];
    algorithm.output(&mut out);
    out
}
