#![doc = include_str!("../README.md")]
// @@ begin lint list
#![warn(missing_docs)]
#![warn(noop_method_call)]
#![warn(unreachable_pub)]
#![warn(clippy::all)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::debug_assert_with_mut_call)]
#![deny(clippy::exhaustive_enums)]
#![deny(clippy::expl_impl_clone_on_copy)]
#![deny(clippy::fallible_impl_from)]
#![deny(clippy::implicit_clone)]
#![deny(clippy::large_stack_arrays)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::mod_module_files)]
#![allow(clippy::uninlined_format_args)]
//! <!-- @@ end lint list -->

mod algorithm;
mod append;
mod builder;
mod fnv;
mod keccak;
mod murmur;

pub use algorithm::{digest, HashAlgorithm, SeedableAlgorithm};
pub use append::{ContiguouslyHashable, HashAppend};
pub use builder::{HashBuilder, Seeded, StdHasher, Unseeded};
pub use fnv::Fnv1a64;
pub use keccak::{
    keccak_f, Keccak256, Sha3_224, Sha3_256, Sha3_384, Sha3_512, Shake128, Shake256, Sponge,
};
pub use murmur::Murmur3;
