//! Error types for the `memx` crate
//!
//! These are shared by every container in the workspace. Fallible operations
//! return them directly; the convenience wrappers turn them into a panic with
//! [`raise`] or [`OrRaise::or_raise`].

use std::fmt::Display;

/// Failures of memory acquisition and of container bounds
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The system could not provide a buffer of the requested size.
    #[error("out of memory allocating {bytes} bytes aligned to {align}")]
    OutOfMemory {
        /// Size of the failed request, in bytes
        bytes: usize,
        /// Alignment of the failed request, in bytes
        align: usize,
    },

    /// A buffer was asked to hold more elements than its layout allows.
    ///
    /// Fixed-capacity storage reports this when asked to grow past its
    /// inline size; heap storage reports it when the byte size would
    /// overflow `isize`.
    #[error("requested capacity {requested} exceeds the maximum of {max}")]
    CapacityExceeded {
        /// Number of elements requested
        requested: usize,
        /// Largest number of elements the storage can hold
        max: usize,
    },

    /// A checked access used an index past the end.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// Length of the container at the time of access
        len: usize,
    },
}

/// Report an error by unwinding.
///
/// This is the failure channel behind every non-`try_` container method.
#[cold]
#[inline(never)]
#[track_caller]
pub fn raise<E: Display>(err: E) -> ! {
    panic!("{}", err)
}

/// Extension for unwrapping a `Result` through [`raise`]
pub trait OrRaise<T> {
    /// Return the success value, or unwind with the error's message.
    fn or_raise(self) -> T;
}

impl<T, E: Display> OrRaise<T> for Result<T, E> {
    #[inline(always)]
    #[track_caller]
    fn or_raise(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => raise(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Error, OrRaise};

    #[test]
    fn messages() {
        let err = Error::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 is out of range for length 3");
        let err = Error::CapacityExceeded {
            requested: 9,
            max: 8,
        };
        assert_eq!(
            err.to_string(),
            "requested capacity 9 exceeds the maximum of 8"
        );
    }

    #[test]
    fn or_raise_passes_values() {
        let ok: Result<u32, Error> = Ok(5);
        assert_eq!(ok.or_raise(), 5);
    }

    #[test]
    #[should_panic(expected = "index 1 is out of range for length 0")]
    fn or_raise_panics() {
        let err: Result<u32, Error> = Err(Error::IndexOutOfRange { index: 1, len: 0 });
        err.or_raise();
    }
}
