//! Moving values between memory locations by copying their bytes
//!
//! Every Rust type can be moved with a plain byte copy, after which the
//! source location is considered uninitialized. Containers use these helpers
//! when shifting elements around inside a buffer or migrating them into a
//! new one, so no per-element move logic ever runs.

use std::mem;
use std::ptr;

/// Move one value from `src` into the uninitialized slot at `dst`.
///
/// # Safety
///
/// `src` must hold a live value, `dst` must be valid for writes, and the two
/// must not overlap. Afterwards `src` is logically uninitialized.
#[inline(always)]
pub unsafe fn relocate_at<T>(src: *const T, dst: *mut T) {
    ptr::copy_nonoverlapping(src, dst, 1);
}

/// Move `count` values from `src` into uninitialized slots at `dst`.
///
/// # Safety
///
/// The source range must hold live values, the destination range must be
/// valid for writes, and the two must not overlap.
#[inline(always)]
pub unsafe fn relocate_n<T>(src: *const T, count: usize, dst: *mut T) {
    ptr::copy_nonoverlapping(src, dst, count);
}

/// Move `count` values within a single buffer, where the ranges may overlap.
///
/// # Safety
///
/// As [`relocate_n`], except that overlap is allowed. Slots of the source
/// range not covered by the destination become logically uninitialized.
#[inline(always)]
pub unsafe fn relocate_within<T>(src: *const T, count: usize, dst: *mut T) {
    ptr::copy(src, dst, count);
}

/// Move a value out of `src`, leaving the slot logically uninitialized.
///
/// # Safety
///
/// `src` must hold a live value that is not used again.
#[inline(always)]
pub unsafe fn relocate<T>(src: *const T) -> T {
    ptr::read(src)
}

/// Exchange two values byte-wise.
///
/// Equivalent to [`mem::swap`]; kept as its own entry point so storage types
/// can override swapping with something cheaper than a full copy.
#[inline(always)]
pub fn memswap<T>(a: &mut T, b: &mut T) {
    mem::swap(a, b);
}
