/*!
Rounding contexts and rounding modes.

A format in this crate is a rounding context: a bundle of width and
policy parameters plus one entry point that takes an arbitrary
[`Real`] and produces the nearest encoding of that format. Arithmetic
never rounds inside a kernel; a kernel's wide result is handed to a
context exactly once.
*/

use crate::Real;

/// A number format viewed as the rounding operation that produces it.
///
/// Splitting every operator into "exact mathematics, then one rounding
/// step" keeps the arithmetic kernels format-agnostic: the same kernel
/// output can be reduced to a posit, a cfloat, or an unbounded float
/// purely by choosing the context. Whatever digit-discarding policy a
/// format has (tapered fractions, subnormals, saturation) lives
/// entirely inside its `round`.
pub trait RoundingContext {
    /// The encoding this context produces.
    type Format: Real;

    /// Reduces any [`Real`] to this format. This is the single point
    /// at which information may be discarded.
    fn round<T: Real>(&self, val: &T) -> Self::Format;
}

/// How discarded digits steer the kept ones.
///
/// The default everywhere in this crate is round-to-nearest with ties
/// to even ([`NearestTiesToEven`][RoundingMode]); the ties-away
/// alternative is selected when a context is built, never per
/// operation. The remaining IEEE 754 directed modes
/// ([`ToPositive`][RoundingMode], [`ToNegative`][RoundingMode],
/// [`ToZero`][RoundingMode]) are provided along with three extras:
/// [`AwayZero`][RoundingMode], and the parity-directed
/// [`ToEven`][RoundingMode] / [`ToOdd`][RoundingMode] used to make an
/// intermediate result safely re-roundable at lower precision.
///
/// Zero, infinite, and non-numerical values round the same way under
/// every mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingMode {
    NearestTiesToEven,
    NearestTiesAwayZero,
    ToPositive,
    ToNegative,
    ToZero,
    AwayZero,
    ToEven,
    ToOdd,
}

/// A rounding mode with the sign factored out: which way to move the
/// magnitude, once it is known the value is inexact.
#[derive(Clone, Debug)]
pub(crate) enum RoundingDirection {
    ToZero,
    AwayZero,
    ToEven,
    ToOdd,
}

impl RoundingMode {
    /// Lowers this mode, for a value of the given sign, to a magnitude
    /// direction plus a flag saying whether that direction applies
    /// only to ties (the nearest modes) or to every inexact result
    /// (the directed modes).
    pub(crate) fn to_direction(self, sign: bool) -> (bool, RoundingDirection) {
        match self {
            RoundingMode::NearestTiesToEven => (true, RoundingDirection::ToEven),
            RoundingMode::NearestTiesAwayZero => (true, RoundingDirection::AwayZero),
            // toward +inf grows positive magnitudes and shrinks
            // negative ones; toward -inf is the mirror image
            RoundingMode::ToPositive => {
                let dir = if sign {
                    RoundingDirection::ToZero
                } else {
                    RoundingDirection::AwayZero
                };
                (false, dir)
            }
            RoundingMode::ToNegative => {
                let dir = if sign {
                    RoundingDirection::AwayZero
                } else {
                    RoundingDirection::ToZero
                };
                (false, dir)
            }
            RoundingMode::ToZero => (false, RoundingDirection::ToZero),
            RoundingMode::AwayZero => (false, RoundingDirection::AwayZero),
            RoundingMode::ToEven => (false, RoundingDirection::ToEven),
            RoundingMode::ToOdd => (false, RoundingDirection::ToOdd),
        }
    }
}
