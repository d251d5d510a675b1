//! Error types for the `mapx` crate

/// Failures of map growth
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Memory for the bucket arrays could not be acquired.
    #[error(transparent)]
    Alloc(#[from] memx::Error),

    /// The keys collide so badly that the table would have to grow far
    /// beyond what their number justifies.
    ///
    /// This almost always means the hash builder maps many keys to the same
    /// few values. The map is left as it was before the failed operation.
    #[error("pathological hash distribution: {len} entries would need a capacity of {capacity}")]
    PathologicalHash {
        /// Number of entries in the map
        len: usize,
        /// Nominal capacity the next rehash would have needed
        capacity: usize,
    },
}

#[cfg(test)]
mod test {
    use super::Error;

    #[test]
    fn wraps_memory_errors() {
        let inner = memx::Error::OutOfMemory {
            bytes: 64,
            align: 64,
        };
        let err = Error::from(inner.clone());
        assert_eq!(err, Error::Alloc(inner));
        assert_eq!(
            err.to_string(),
            "out of memory allocating 64 bytes aligned to 64"
        );
    }
}
