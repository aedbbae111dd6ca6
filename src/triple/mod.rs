//! The operation-context significand form.
//!
//! A [`BlockTriple`] is the `(sign, scale, significand)` intermediate
//! every arithmetic kernel computes with: the significand is a
//! fixed-width [`BitBlock`][crate::bitblock::BitBlock] whose width is
//! chosen by the [`TripleOp`] context so that the operation is lossless
//! (or odd-rounded) before the single rounding step that produces the
//! target encoding.

mod number;
mod ops;

pub use number::{BlockTriple, TripleClass, TripleOp};
