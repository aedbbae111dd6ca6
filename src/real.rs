use rug::Integer;
use std::fmt::Debug;

use crate::rfloat::RFloat;

/// Universal read-only view of an extended real number.
///
/// Every format in this crate stores, one way or another, a normalized
/// triple: a sign, an integer significand, and the binary weight of
/// that significand's least significant digit. This trait exposes that
/// triple together with the four-way classification (zero, finite,
/// infinite, not-a-number) so that codecs, kernels, and the rounding
/// engine can consume any format through one interface.
///
/// Accessors that only make sense for finite, non-zero values return
/// [`Option`] and answer `None` elsewhere.
pub trait Real: Debug {
    /// Base of the significand digits; always positive, and 2 for
    /// every format shipped here.
    fn radix() -> usize;

    /// The stored sign, where a format has one. Distinct from
    /// [`is_negative`][Real::is_negative]: a negative zero has a sign
    /// but is not a negative value.
    fn sign(&self) -> Option<bool>;

    /// Weight of the significand's least significant digit: the value
    /// is `(-1)^sign * c * 2^exp`.
    fn exp(&self) -> Option<isize>;

    /// Weight of the significand's most significant digit; the
    /// exponent in the `1.f * 2^e` reading of the value.
    fn e(&self) -> Option<isize>;

    /// The digit position just below the significand,
    /// `self.exp() - 1`; the rounding engine cuts at such positions.
    fn n(&self) -> Option<isize>;

    /// The significand `c` as an unsigned integer.
    fn c(&self) -> Option<Integer>;

    /// The significand with the sign applied, `(-1)^sign * c`.
    fn m(&self) -> Option<Integer>;

    /// Number of significant digits in `c`.
    fn prec(&self) -> Option<usize>;

    /// True for values outside the reals: infinities, NaN, or the
    /// posit NaR.
    fn is_nar(&self) -> bool;

    /// True for zero and finite non-zero values.
    fn is_finite(&self) -> bool;

    /// True for the two infinities.
    fn is_infinite(&self) -> bool;

    /// True for zero of either sign.
    fn is_zero(&self) -> bool;

    /// True when the value lies strictly below zero. `None` where the
    /// question has no answer (zero, NaN).
    fn is_negative(&self) -> Option<bool>;

    /// True for anything except NaN; infinities count as numerical
    /// limiting values.
    fn is_numerical(&self) -> bool;

    /// Cuts the value at digit position `n`, returning the digits
    /// strictly above `n` and the digits at or below `n` as a pair of
    /// [`RFloat`] values whose exact sum is the input.
    ///
    /// Both halves keep the input's sign even when they hold no
    /// digits, so a later rounding decision still knows which way
    /// "away from zero" points.
    fn split_at(&self, n: isize) -> (RFloat, RFloat) {
        let sign = self.sign().unwrap();
        let empty = || RFloat::Real(sign, 0, Integer::new());
        if self.is_zero() {
            return (empty(), empty());
        }

        let exp = self.exp().unwrap();
        let c = self.c().unwrap();
        let width = c.significant_bits() as isize;

        // the digits occupy weights [exp, exp + width)
        if n < exp {
            // the cut passes under every digit
            (RFloat::Real(sign, exp, c), empty())
        } else if n >= exp + width - 1 {
            // the cut is at or above the leading digit
            (empty(), RFloat::Real(sign, exp, c))
        } else {
            let discarded = (n + 1 - exp) as u32;
            let low = c.clone().keep_bits(discarded);
            let high = c >> discarded;
            (RFloat::Real(sign, n + 1, high), RFloat::Real(sign, exp, low))
        }
    }
}
