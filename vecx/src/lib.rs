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

mod algo;
mod iter;
#[cfg(feature = "serde")]
mod serialize;
pub mod storage;
mod vector;

pub use algo::{erase_if, erase_value, unique_sort, unique_sort_by};
pub use iter::IntoIter;
pub use memx::Error;
pub use storage::{HeaderStorage, HeapStorage, InlineStorage, MappedStorage, SmallStorage, Storage};
pub use vector::{InlineVec, SmallVec, StableVec, ThinVec, Vector};
