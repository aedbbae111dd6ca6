//! Fixed-width bit arrays.
//!
//! A [`BitBlock`] is an ordered sequence of bits of a declared width,
//! indexed from the least significant bit, together with the integer
//! and logical kernels the encodings in this crate are built from:
//! shifts, ripple add/sub with carry-out, widening multiplication,
//! division, complements, and the sticky-bit reduction used by the
//! rounding engine.

mod block;
mod ops;

pub use block::BitBlock;
