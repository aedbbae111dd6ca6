use num_traits::Zero;
use rug::Integer;

use crate::cfloat::{Cfloat, CfloatVal, Exceptions};
use crate::rfloat::RFloatContext;
use crate::round::RoundingDirection;
use crate::util::bitmask;
use crate::{Real, RoundingContext, RoundingMode, Split};

/// Rounding contexts for configurable floating-point numbers.
///
/// The associated storage type is [`Cfloat`].
///
/// A [`CfloatContext`] is parameterized by
///
///  - `es`, the bitwidth of the exponent field,
///  - `nbits`, the total bitwidth of the encoding,
///  - the `subnormals`, `supernormals`, and `saturating` policy flags,
///  - and the rounding mode.
///
/// The default policies are all off, matching a "pure" float with
/// neither gradual underflow nor gradual overflow. Use
/// [`CfloatContext::ieee754`] for a format bit-compatible with the
/// IEEE 754 interchange encodings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CfloatContext {
    es: usize,
    nbits: usize,
    subnormals: bool,
    supernormals: bool,
    saturating: bool,
    rm: RoundingMode,
}

impl CfloatContext {
    /// Implementation limit: maximum exponent size.
    pub const ES_MAX: usize = 32;

    /// Constructs a context with all policy flags off and
    /// round-to-nearest, ties to even.
    pub fn new(es: usize, nbits: usize) -> Self {
        assert!(
            (2..=Self::ES_MAX).contains(&es),
            "exponent width must be between 2 and {} bits, given {}",
            Self::ES_MAX,
            es
        );
        assert!(
            nbits >= es + 2,
            "total bitwidth needs to be at least {} bits, given {} bits",
            es + 2,
            nbits
        );

        Self {
            es,
            nbits,
            subnormals: false,
            supernormals: false,
            saturating: false,
            rm: RoundingMode::NearestTiesToEven,
        }
    }

    /// Constructs a context matching the IEEE 754 interchange format
    /// of the given widths: subnormals on, supernormals off,
    /// non-saturating.
    pub fn ieee754(es: usize, nbits: usize) -> Self {
        Self::new(es, nbits).with_subnormals(true)
    }

    /// IEEE 754 binary32 (single precision).
    pub fn binary32() -> Self {
        Self::ieee754(8, 32)
    }

    /// IEEE 754 binary64 (double precision).
    pub fn binary64() -> Self {
        Self::ieee754(11, 64)
    }

    /// IEEE 754 binary16 (half precision).
    pub fn binary16() -> Self {
        Self::ieee754(5, 16)
    }

    /// Google brain float: a truncated binary32.
    pub fn bfloat16() -> Self {
        Self::ieee754(8, 16)
    }

    /// NVIDIA TensorFloat-32: binary32 range at half-precision width.
    pub fn tf32() -> Self {
        Self::ieee754(8, 19)
    }

    /// Sets the gradual-underflow policy.
    pub fn with_subnormals(mut self, enable: bool) -> Self {
        self.subnormals = enable;
        self
    }

    /// Sets the gradual-overflow policy.
    pub fn with_supernormals(mut self, enable: bool) -> Self {
        self.supernormals = enable;
        self
    }

    /// Sets the saturation policy.
    pub fn with_saturating(mut self, enable: bool) -> Self {
        self.saturating = enable;
        self
    }

    /// Sets the rounding mode.
    pub fn with_rounding_mode(mut self, rm: RoundingMode) -> Self {
        self.rm = rm;
        self
    }

    /// Returns the exponent bitwidth of this format.
    pub fn es(&self) -> usize {
        self.es
    }

    /// Returns the total bitwidth of this format.
    pub fn nbits(&self) -> usize {
        self.nbits
    }

    /// Returns the gradual-underflow policy.
    pub fn subnormals(&self) -> bool {
        self.subnormals
    }

    /// Returns the gradual-overflow policy.
    pub fn supernormals(&self) -> bool {
        self.supernormals
    }

    /// Returns the saturation policy.
    pub fn saturating(&self) -> bool {
        self.saturating
    }

    /// Returns the rounding mode.
    pub fn rm(&self) -> RoundingMode {
        self.rm
    }

    /// Maximum precision of the significand, hidden bit included.
    pub fn max_p(&self) -> usize {
        self.nbits - self.es
    }

    /// Width of the fraction field.
    pub fn max_m(&self) -> usize {
        self.nbits - self.es - 1
    }

    /// Exponent of the largest standard normal value, viewed as
    /// `(-1)^s * f * 2^e` with `f` between 1 and 2.
    pub fn emax(&self) -> isize {
        (1 << (self.es - 1)) - 1
    }

    /// Exponent of the largest representable finite value; one more
    /// than [`emax`][CfloatContext::emax] when supernormals are on.
    pub fn emax_eff(&self) -> isize {
        if self.supernormals {
            self.emax() + 1
        } else {
            self.emax()
        }
    }

    /// Exponent of the smallest normal value.
    pub fn emin(&self) -> isize {
        1 - self.emax()
    }

    /// Exponent of the largest finite value viewed as
    /// `(-1)^s * c * 2^exp` with integer `c`.
    pub fn expmax(&self) -> isize {
        self.emax_eff() - self.max_m() as isize
    }

    /// Exponent of the smallest normal value viewed as
    /// `(-1)^s * c * 2^exp` with integer `c`; also the fixed exponent
    /// of the subnormal encodings.
    pub fn expmin(&self) -> isize {
        self.emin() - self.max_m() as isize
    }

    /// The exponent bias used when packing the exponent field.
    pub fn bias(&self) -> isize {
        self.emax()
    }

    fn make(&self, num: CfloatVal, flags: Exceptions) -> Cfloat {
        Cfloat {
            num,
            flags,
            ctx: self.clone(),
        }
    }

    /// The largest finite value with the given sign.
    /// With supernormals, the top two fraction patterns of the
    /// all-ones exponent stay reserved, so the maximum significand is
    /// `111...101`.
    pub fn maxval(&self, sign: bool) -> Cfloat {
        let c = if self.supernormals {
            bitmask(self.max_p()) - 2
        } else {
            bitmask(self.max_p())
        };
        self.make(
            CfloatVal::Normal(sign, self.expmax(), c),
            Exceptions::default(),
        )
    }

    /// The smallest positive normal value with the given sign.
    pub fn min_norm(&self, sign: bool) -> Cfloat {
        self.make(
            CfloatVal::Normal(sign, self.expmin(), Integer::from(1) << self.max_m()),
            Exceptions::default(),
        )
    }

    /// The smallest positive non-zero value with the given sign:
    /// a one-bit subnormal if subnormals are enabled, else the
    /// smallest normal.
    pub fn minval(&self, sign: bool) -> Cfloat {
        if self.subnormals {
            self.make(
                CfloatVal::Subnormal(sign, Integer::from(1)),
                Exceptions::default(),
            )
        } else {
            self.min_norm(sign)
        }
    }

    /// Constructs a signed zero.
    pub fn zero(&self, sign: bool) -> Cfloat {
        self.make(CfloatVal::Zero(sign), Exceptions::default())
    }

    /// Constructs a signed infinity.
    pub fn inf(&self, sign: bool) -> Cfloat {
        self.make(CfloatVal::Infinity(sign), Exceptions::default())
    }

    /// Constructs the canonical quiet NaN.
    pub fn qnan(&self) -> Cfloat {
        self.make(
            CfloatVal::Nan(false, true, Integer::zero()),
            Exceptions::default(),
        )
    }

    /// Constructs the canonical signalling NaN.
    pub fn snan(&self) -> Cfloat {
        self.make(
            CfloatVal::Nan(false, false, Integer::from(1)),
            Exceptions::default(),
        )
    }

    /// Converts an `f32` into this format.
    /// Unlike rounding an [`RFloat`][crate::rfloat::RFloat], this
    /// preserves the sign of zero and the NaN kind; NaN payloads
    /// collapse to the canonical encodings.
    pub fn from_f32(&self, val: f32) -> Cfloat {
        if val == 0.0 {
            self.zero(val.is_sign_negative())
        } else if val.is_nan() {
            let bits = val.to_bits();
            let quiet = (bits >> 22) & 1 == 1;
            let mut nan = if quiet { self.qnan() } else { self.snan() };
            if let CfloatVal::Nan(s, _, _) = &mut nan.num {
                *s = val.is_sign_negative();
            }
            nan
        } else {
            self.round(&crate::rfloat::RFloat::from(val))
        }
    }

    /// Converts an `f64` into this format; see
    /// [`from_f32`][CfloatContext::from_f32] for the special cases.
    pub fn from_f64(&self, val: f64) -> Cfloat {
        if val == 0.0 {
            self.zero(val.is_sign_negative())
        } else if val.is_nan() {
            let bits = val.to_bits();
            let quiet = (bits >> 51) & 1 == 1;
            let mut nan = if quiet { self.qnan() } else { self.snan() };
            if let CfloatVal::Nan(s, _, _) = &mut nan.num {
                *s = val.is_sign_negative();
            }
            nan
        } else {
            self.round(&crate::rfloat::RFloat::from(val))
        }
    }

    /// Decodes a bitpattern into a [`Cfloat`].
    /// Only the lowest `nbits` bits of the argument are considered.
    pub fn bits_to_number(&self, bits: Integer) -> Cfloat {
        let bits = bits & bitmask(self.nbits);
        let m = self.max_m();
        let s = bits.get_bit(self.nbits as u32 - 1);
        let efield = (bits.clone() >> m) & bitmask(self.es);
        let frac = bits & bitmask(m);

        let num = if efield.is_zero() {
            if frac.is_zero() {
                CfloatVal::Zero(s)
            } else if self.subnormals {
                CfloatVal::Subnormal(s, frac)
            } else {
                // subnormal encodings read as zero under this policy
                CfloatVal::Zero(s)
            }
        } else if efield == bitmask(self.es) {
            if self.supernormals {
                if frac == bitmask(m) {
                    // sign selects the NaN kind in this regime
                    CfloatVal::Nan(s, !s, Integer::zero())
                } else if frac == bitmask(m) - 1 {
                    CfloatVal::Infinity(s)
                } else {
                    // supernormal: an ordinary normal with the top
                    // exponent value
                    let e = (1 << (self.es - 1)) as isize;
                    let c = frac | (Integer::from(1) << m);
                    CfloatVal::Normal(s, e - m as isize, c)
                }
            } else if frac.is_zero() {
                CfloatVal::Infinity(s)
            } else {
                let quiet = frac.get_bit(m as u32 - 1);
                let payload = frac & bitmask(m - 1);
                CfloatVal::Nan(s, quiet, payload)
            }
        } else {
            let e = efield.to_isize().unwrap() - self.bias();
            let c = frac | (Integer::from(1) << m);
            CfloatVal::Normal(s, e - m as isize, c)
        };

        self.make(num, Exceptions::default())
    }

    /// Given a sign and rounding mode, returns true if an overflow
    /// rounds to infinity rather than to the largest finite value.
    fn overflow_to_infinity(sign: bool, rm: RoundingMode) -> bool {
        match rm.to_direction(sign) {
            (true, _) => true,
            (_, RoundingDirection::ToZero) => false,
            (_, RoundingDirection::AwayZero) => true,
            (_, RoundingDirection::ToEven) => true, // maxval has an odd LSB
            (_, RoundingDirection::ToOdd) => false,
        }
    }

    /// Handles a result beyond the finite range.
    fn overflow(&self, sign: bool) -> Cfloat {
        let flags = Exceptions {
            overflow: true,
            inexact: true,
            carry: true,
            ..Default::default()
        };
        if self.saturating || !Self::overflow_to_infinity(sign, self.rm) {
            let mut val = self.maxval(sign);
            val.flags = flags;
            val
        } else {
            self.make(CfloatVal::Infinity(sign), flags)
        }
    }

    /// Rounds a finite, non-zero value.
    fn round_finite<T: Real>(&self, num: &T) -> Cfloat {
        let p = self.max_p();
        let sign = num.sign().unwrap();

        // the subnormal boundary limits the least absolute digit even
        // when gradual underflow is off; flushing happens afterwards
        let rctx = RFloatContext::new()
            .with_rounding_mode(self.rm)
            .with_max_p(p)
            .with_min_n(self.expmin() - 1);
        let (p_opt, n) = rctx.round_params(num);
        let split = Split::new(num, p_opt, n);
        let inexact = !split.lost().is_zero();
        let e_trunc = split.num().e();
        let rounded = split.round(self.rm);

        match rounded.e() {
            None => {
                // rounded away to zero
                self.make(
                    CfloatVal::Zero(sign),
                    Exceptions {
                        underflow: inexact,
                        inexact,
                        ..Default::default()
                    },
                )
            }
            Some(e) => {
                let exp = rounded.exp().unwrap();
                let c = rounded.c().unwrap();
                let carry = matches!(e_trunc, Some(et) if e > et);

                if e > self.emax_eff() {
                    return self.overflow(sign);
                }
                if self.supernormals
                    && e == self.emax_eff()
                    && (c.clone() << (p - c.significant_bits() as usize)) > bitmask(p) - 2
                {
                    // the rounded significand collides with the
                    // reserved infinity/NaN patterns
                    return self.overflow(sign);
                }

                if e < self.emin() {
                    if self.subnormals {
                        // align the significand to the fixed subnormal
                        // exponent
                        let c = c << (exp - self.expmin()) as u32;
                        self.make(
                            CfloatVal::Subnormal(sign, c),
                            Exceptions {
                                underflow: inexact,
                                inexact,
                                ..Default::default()
                            },
                        )
                    } else {
                        // no gradual underflow: flush to zero,
                        // preserving the sign
                        self.make(
                            CfloatVal::Zero(sign),
                            Exceptions {
                                underflow: true,
                                inexact: true,
                                ..Default::default()
                            },
                        )
                    }
                } else {
                    self.make(
                        CfloatVal::Normal(sign, exp, c),
                        Exceptions {
                            inexact,
                            carry,
                            ..Default::default()
                        },
                    )
                }
            }
        }
    }
}

impl RoundingContext for CfloatContext {
    type Format = Cfloat;

    fn round<T: Real>(&self, num: &T) -> Self::Format {
        if num.is_zero() {
            self.make(
                CfloatVal::Zero(num.sign().unwrap_or(false)),
                Exceptions::default(),
            )
        } else if num.is_infinite() {
            let sign = num.sign().unwrap();
            if self.saturating {
                // saturating formats clamp every infinite result
                self.maxval(sign)
            } else {
                self.make(CfloatVal::Infinity(sign), Exceptions::default())
            }
        } else if num.is_nar() {
            if self.saturating {
                // arithmetic cannot produce NaN under saturation
                self.maxval(num.sign().unwrap_or(false))
            } else {
                self.make(
                    CfloatVal::Nan(false, true, Integer::zero()),
                    Exceptions::default(),
                )
            }
        } else {
            self.round_finite(num)
        }
    }
}
