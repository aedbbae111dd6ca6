use crate::rfloat::RFloat;
use crate::{Real, RoundingContext, RoundingMode, Split};

/// Rounding context for [`RFloat`]: precision-limited but otherwise
/// unbounded floating-point.
///
/// Two independent knobs bound the result, and at least one must be
/// set before rounding:
///
///  - `max_p` caps the number of significand digits, like a
///    floating-point format with unlimited exponent range;
///  - `min_n` floors the least absolute digit, like a fixed-point
///    format (with `min_n = -1` every result is an integer).
///
/// With both set, the stricter of the two wins at each value, which is
/// exactly how a format with gradual underflow behaves near the bottom
/// of its exponent range; the cfloat codec leans on this.
///
/// No knob bounds the magnitude: infinities and NaN pass through
/// unchanged.
#[derive(Clone, Debug)]
pub struct RFloatContext {
    max_p: Option<usize>,
    min_n: Option<isize>,
    rm: RoundingMode,
}

impl RFloatContext {
    /// A context with no bounds set and round-to-nearest, ties to
    /// even. Rounding panics until `max_p` or `min_n` is supplied.
    pub fn new() -> Self {
        Self {
            max_p: None,
            min_n: None,
            rm: RoundingMode::NearestTiesToEven,
        }
    }

    /// Caps the significand at `max_p` digits.
    pub fn with_max_p(mut self, max_p: usize) -> Self {
        assert!(max_p >= 1, "precision cap must be at least 1");
        self.max_p = Some(max_p);
        self
    }

    /// Floors the least absolute digit at `min_n`.
    pub fn with_min_n(mut self, min_n: isize) -> Self {
        self.min_n = Some(min_n);
        self
    }

    /// Selects the rounding mode.
    pub fn with_rounding_mode(mut self, rm: RoundingMode) -> Self {
        self.rm = rm;
        self
    }

    /// Resolves, for a particular value, where the rounding engine
    /// must cut: the effective precision cap and the position of the
    /// first discarded digit.
    pub fn round_params<T: Real>(&self, num: &T) -> (Option<usize>, isize) {
        assert!(
            self.max_p.is_some() || self.min_n.is_some(),
            "a precision cap or a least-digit floor is required"
        );

        // where the precision cap alone would cut
        let p_cut = match (self.max_p, num.e()) {
            (Some(max_p), Some(e)) => Some(e - max_p as isize),
            // zero and non-real values carry no digits to cut
            (Some(_), None) => Some(0),
            (None, _) => None,
        };

        match (p_cut, self.min_n) {
            (None, Some(min_n)) => (None, min_n),
            (Some(cut), None) => (self.max_p, cut),
            // both bounds: the higher cut discards more, and wins
            (Some(cut), Some(min_n)) => (self.max_p, cut.max(min_n)),
            (None, None) => unreachable!(),
        }
    }
}

impl Default for RFloatContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundingContext for RFloatContext {
    type Format = RFloat;

    fn round<T: Real>(&self, num: &T) -> Self::Format {
        if num.is_zero() {
            RFloat::zero()
        } else if num.is_infinite() {
            if num.is_negative().unwrap() {
                RFloat::NegInfinity
            } else {
                RFloat::PosInfinity
            }
        } else if num.is_nar() {
            RFloat::Nan
        } else {
            // cut where the bounds demand, then let the engine decide
            // the increment
            let (p, n) = self.round_params(num);
            Split::new(num, p, n).round(self.rm).canonicalize()
        }
    }
}
