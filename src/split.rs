/*!
The shared rounding engine.

A [`Split`] cuts a number at a binary digit position: the digits above
the cut are the candidate result, the digits below it are summarized
into the halfway and sticky bits that drive the increment decision.
Finishing a split with [`Split::round`] is the only step in the
library at which digits are destroyed; every codec funnels through it.
*/

use rug::Integer;

use crate::rfloat::RFloat;
use crate::round::RoundingDirection;
use crate::{Real, RoundingMode};

/// A number cut at a digit position, ready to be rounded.
#[derive(Clone, Debug)]
pub struct Split {
    high: RFloat,
    low: RFloat,
    max_p: Option<usize>,
    n: isize,
}

impl Split {
    /// Cuts `num` at digit position `n`: everything above `n` becomes
    /// the kept part, everything at or below `n` the lost part, and
    /// the two sum back to `num` exactly. `max_p` is the precision
    /// bound of the destination format, consulted when an increment
    /// widens the kept significand.
    pub fn new<T: Real>(num: &T, max_p: Option<usize>, n: isize) -> Self {
        assert!(!num.is_nar(), "must be real: {:?}", num);
        let (high, low) = num.split_at(n);
        Self {
            high,
            low,
            max_p,
            n,
        }
    }

    /// The kept digits.
    pub fn num(&self) -> &RFloat {
        &self.high
    }

    /// The lost digits.
    pub fn lost(&self) -> &RFloat {
        &self.low
    }

    /// The precision bound of the destination format.
    pub fn max_p(&self) -> Option<usize> {
        self.max_p
    }

    /// The digit position of the cut.
    pub fn n(&self) -> isize {
        self.n
    }

    /// The halfway bit and the sticky bit: the lost digit at the cut
    /// position, and the OR of every lost digit below it.
    pub fn rs(&self) -> (bool, bool) {
        let (halfway, rest) = self.low.split_at(self.n - 1);
        (!halfway.is_zero(), !rest.is_zero())
    }

    /// The guard, round, and sticky bits: the two highest lost digits
    /// individually, then the OR of the remainder.
    pub fn rgs(&self) -> (bool, bool, bool) {
        let (guard, rest) = self.low.split_at(self.n - 1);
        let (round, rest) = rest.split_at(self.n - 2);
        (!guard.is_zero(), !round.is_zero(), !rest.is_zero())
    }

    /// Decides whether the kept significand moves up by one.
    ///
    /// Exact results never move. Under a nearest mode the halfway and
    /// sticky bits locate the value against the midpoint of the two
    /// candidates, and only a dead tie consults the direction. Under a
    /// directed mode the direction applies to every inexact result.
    fn wants_increment(
        kept: &Integer,
        sign: bool,
        halfway: bool,
        sticky: bool,
        rm: RoundingMode,
    ) -> bool {
        if !halfway && !sticky {
            // nothing was lost
            return false;
        }
        let (ties_only, direction) = rm.to_direction(sign);
        if ties_only {
            if !halfway {
                // strictly below the midpoint
                return false;
            }
            if sticky {
                // strictly above the midpoint
                return true;
            }
            // a dead tie falls through to the direction
        }
        match direction {
            RoundingDirection::ToZero => false,
            RoundingDirection::AwayZero => true,
            RoundingDirection::ToEven => kept.is_odd(),
            RoundingDirection::ToOdd => kept.is_even(),
        }
    }

    /// Finishes the rounding: applies the increment decision to the
    /// kept digits and, if the increment spills past the precision
    /// bound, halves the significand and raises the exponent instead.
    pub fn round(&self, rm: RoundingMode) -> RFloat {
        let sign = self.high.sign().unwrap();
        let mut exp = self.n + 1;
        let mut kept = self.high.c().unwrap_or_default();

        let (halfway, sticky) = self.rs();
        if Self::wants_increment(&kept, sign, halfway, sticky, rm) {
            kept += 1;
            if let Some(max_p) = self.max_p {
                if kept.significant_bits() as usize > max_p {
                    // the increment carried out of the top digit
                    kept >>= 1;
                    exp += 1;
                }
            }
        }

        RFloat::Real(sign, exp, kept).canonicalize()
    }
}
