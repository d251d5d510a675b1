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

mod builder;
mod err;
mod iter;
mod map;
mod raw;
#[cfg(feature = "serde")]
mod serialize;

pub use builder::HashMapBuilder;
pub use err::Error;
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use map::HashMap;

/// Length of the window of buckets searched for a key
///
/// A key may only live in the `MAX_PROBE` buckets starting at its home
/// bucket. Lookups always scan the whole window.
pub const MAX_PROBE: usize = 16;

/// Hash builder used when none is given
pub type DefaultHashBuilder = digestx::Unseeded<digestx::Murmur3>;
