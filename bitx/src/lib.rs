#![doc = include_str!("../README.md")]
// @@ begin lint list
#![warn(missing_docs)]
#![warn(noop_method_call)]
#![warn(unreachable_pub)]
#![warn(clippy::all)]
#![deny(clippy::debug_assert_with_mut_call)]
#![deny(clippy::exhaustive_enums)]
#![deny(clippy::expl_impl_clone_on_copy)]
#![deny(clippy::fallible_impl_from)]
#![deny(clippy::implicit_clone)]
#![deny(clippy::large_stack_arrays)]
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::mod_module_files)]
#![allow(clippy::uninlined_format_args)]
//! <!-- @@ end lint list -->

mod bits;
mod limb;
mod map;
mod sparse;
mod span;
mod vector;

pub use bits::{BitRef, Bits, BitsMut, Iter, Ones};
pub use limb::Limb;
pub use map::BitMap;
pub use memx::Error;
pub use sparse::SparseBitVector;
pub use span::{bitwise_and, bitwise_or, bitwise_xor, BitSlice, BitSliceMut};
pub use vector::BitVector;
