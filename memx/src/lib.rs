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

mod allocation;
mod err;
pub mod relocate;

pub use allocation::{
    aligned_allocate, allocate, lazy_allocate, Allocation, CacheAligned, Flavor, Heap, Overcommit,
    RawBuffer, CACHE_LINE,
};
pub use err::{raise, Error, OrRaise};
