//! "Classic" floating-point numbers: IEEE 754-style encodings
//! generalized over bit width, exponent width, and policy.
//!
//! This module implements configurable floats with [`CfloatContext`].
//! The associated storage type is [`Cfloat`]. Three independent
//! policy flags govern the behavior of a format:
//!
//!  - `subnormals`: gradual underflow (all-zero exponent encodings
//!    denote subnormal values rather than zero),
//!  - `supernormals`: gradual overflow (all-ones exponent encodings
//!    denote large normals, with only the two top fraction patterns
//!    reserved for infinity and NaN),
//!  - `saturating`: out-of-range results clamp to the largest finite
//!    values instead of encoding infinities or NaN.
//!
//! With subnormals enabled and the other flags off, a format is
//! bit-compatible with the corresponding IEEE 754 interchange format.

mod number;
pub mod ops;
mod round;

pub use number::{Cfloat, Exceptions};
pub(crate) use number::CfloatVal;
pub use round::CfloatContext;
