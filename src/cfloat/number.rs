use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitAnd, BitOr};

use num_traits::Zero;
use rug::{Float, Integer};

use crate::cfloat::CfloatContext;
use crate::rfloat::RFloat;
use crate::util::bitmask;
use crate::Real;

/// Exception flags to signal certain properties of a rounded result.
///
/// Besides returning a (possibly) numerical result, any computation
/// with floating-point numbers may also raise exceptions depending on
/// certain conditions. This module records the IEEE 754 exceptions:
///
/// - _invalid operation_: no useful definable result;
/// - _division by zero_: an infinite result for finite arguments;
/// - _overflow_: the result exceeded in magnitude what would have been
///     the rounded result had the exponent range been unbounded;
/// - _underflow_: a non-zero result below the normal range was rounded,
///     losing information;
/// - _inexact_: the result would be different had both the exponent
///     range and precision been unbounded;
///
/// plus one non-standard flag:
///
/// - _carry_: the rounding increment bumped the exponent of the
///     truncated result by one.
#[derive(Clone, Debug, Default)]
pub struct Exceptions {
    pub invalid: bool,
    pub divzero: bool,
    pub overflow: bool,
    pub underflow: bool,
    pub inexact: bool,
    pub carry: bool,
}

impl Exceptions {
    /// Constructs a new set of exceptions, all flags cleared.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cfloat encoding viewed as an enumeration.
/// Unlike [`Cfloat`], [`CfloatVal`] contains only the numerical data.
#[derive(Clone, Debug)]
pub enum CfloatVal {
    /// Signed zero: `Zero(s)` where `s` distinguishes `-0` and `+0`.
    Zero(bool),
    /// Subnormal numbers: `Subnormal(s, c)` encodes
    /// `(-1)^s * c * 2^expmin` with `0 < c < 2^(nbits - es - 1)`.
    Subnormal(bool, Integer),
    /// Normal numbers: `Normal(s, exp, c)` encodes `(-1)^s * c * 2^exp`.
    /// When the supernormal policy is enabled this includes encodings
    /// with an all-ones exponent field.
    Normal(bool, isize, Integer),
    /// Signed infinity: `Infinity(s)` encodes `+/- Inf`.
    Infinity(bool),
    /// Not-a-number: `Nan(s, quiet, payload)` where `s` specifies the
    /// sign bit, `quiet` the signaling bit, and `payload` the rest of
    /// the fraction field.
    Nan(bool, bool, Integer),
}

/// The configurable floating-point type.
///
/// Parameterized by `es`, the bitwidth of the exponent field, `nbits`,
/// the total bitwidth, and the three policy flags of its context.
/// In addition to numerical data, each [`Cfloat`] value carries the
/// [`Exceptions`] raised when it was created and the rounding context
/// that created it.
#[derive(Clone, Debug)]
pub struct Cfloat {
    pub(crate) num: CfloatVal,
    pub(crate) flags: Exceptions,
    pub(crate) ctx: CfloatContext,
}

impl Cfloat {
    /// Returns the flags set when this number was created.
    pub fn flags(&self) -> &Exceptions {
        &self.flags
    }

    /// Returns the rounding context under which this number was created.
    pub fn ctx(&self) -> &CfloatContext {
        &self.ctx
    }

    /// Returns true if this value is a subnormal number.
    pub fn is_subnormal(&self) -> bool {
        matches!(self.num, CfloatVal::Subnormal(_, _))
    }

    /// Returns true if this value is a normal number.
    pub fn is_normal(&self) -> bool {
        matches!(self.num, CfloatVal::Normal(_, _, _))
    }

    /// Returns true if this value is NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self.num, CfloatVal::Nan(_, _, _))
    }

    /// The NaN signaling bit, or `None` if the number is not NaN.
    pub fn nan_quiet(&self) -> Option<bool> {
        match &self.num {
            CfloatVal::Nan(_, q, _) => Some(*q),
            _ => None,
        }
    }

    /// The NaN payload, or `None` if the number is not NaN.
    pub fn nan_payload(&self) -> Option<Integer> {
        match &self.num {
            CfloatVal::Nan(_, _, payload) => Some(payload.clone()),
            _ => None,
        }
    }

    /// Converts this [`Cfloat`] to an [`Integer`] representing its
    /// bitpattern: sign, then `es` exponent bits, then the fraction.
    pub fn into_bits(&self) -> Integer {
        let nbits = self.ctx.nbits();
        let es = self.ctx.es();
        let m = self.ctx.max_m();
        let (s, unsigned) = match &self.num {
            CfloatVal::Zero(s) => (*s, Integer::zero()),
            CfloatVal::Subnormal(s, c) => (*s, c.clone()),
            CfloatVal::Normal(s, exp, c) => {
                // align the significand to full precision, then split
                // off the hidden bit
                let p = c.significant_bits() as usize;
                let c = c.clone() << (self.ctx.max_p() - p);
                let e = exp + (p as isize - 1);
                let efield = Integer::from(e + self.ctx.bias()) << m;
                let mfield = c.bitand(bitmask(m));
                (*s, mfield.bitor(efield))
            }
            CfloatVal::Infinity(s) => {
                let efield = bitmask(es) << m;
                if self.ctx.supernormals() {
                    // all-ones exponent is in use; infinity keeps the
                    // next-to-top fraction pattern
                    (*s, efield.bitor(bitmask(m) - 1))
                } else {
                    (*s, efield)
                }
            }
            CfloatVal::Nan(s, q, payload) => {
                let efield = bitmask(es) << m;
                if self.ctx.supernormals() {
                    // single NaN pattern; the sign bit encodes the kind
                    (!q, efield.bitor(bitmask(m)))
                } else {
                    let qfield = if *q {
                        Integer::from(1) << (m - 1)
                    } else {
                        Integer::zero()
                    };
                    (*s, payload.clone().bitor(qfield).bitor(efield))
                }
            }
        };

        if s {
            let sfield = Integer::from(1) << (nbits - 1);
            unsigned.bitor(sfield)
        } else {
            unsigned
        }
    }

    /// Renders the encoding as `0b<sign>.<exponent>.<fraction>`,
    /// the diagnostic field-separated binary form.
    pub fn to_binary_string(&self) -> String {
        let nbits = self.ctx.nbits();
        let es = self.ctx.es();
        let m = self.ctx.max_m();
        let bits = self.into_bits();
        let bit = |i: usize| if bits.get_bit(i as u32) { '1' } else { '0' };

        let mut out = String::from("0b");
        out.push(bit(nbits - 1));
        out.push('.');
        for i in (m..m + es).rev() {
            out.push(bit(i));
        }
        out.push('.');
        for i in (0..m).rev() {
            out.push(bit(i));
        }
        out
    }

    /// Rounds this value to the nearest `f64`, preserving the sign
    /// of zero.
    pub fn to_f64(&self) -> f64 {
        let f = RFloat::from(self.clone()).to_f64();
        if f == 0.0 && self.sign().unwrap_or(false) {
            -0.0
        } else {
            f
        }
    }

    /// Rounds this value to the nearest `f32`, preserving the sign
    /// of zero.
    pub fn to_f32(&self) -> f32 {
        let f = RFloat::from(self.clone()).to_f32();
        if f == 0.0 && self.sign().unwrap_or(false) {
            -0.0
        } else {
            f
        }
    }

    /// Truncates this value toward zero to an `i64`, saturating at the
    /// native limits. NaN converts to 0.
    pub fn to_i64(&self) -> i64 {
        match RFloat::from(self.clone()) {
            RFloat::Nan => 0,
            RFloat::PosInfinity => i64::MAX,
            RFloat::NegInfinity => i64::MIN,
            r => {
                let (high, _) = r.split_at(-1);
                if high.is_zero() {
                    0
                } else {
                    // the integer part: exponent is non-negative
                    let v = high.m().unwrap() << high.exp().unwrap() as u32;
                    v.to_i64().unwrap_or(if v.is_negative() {
                        i64::MIN
                    } else {
                        i64::MAX
                    })
                }
            }
        }
    }
}

impl Cfloat {
    fn flip_sign(&self) -> Cfloat {
        let num = match &self.num {
            CfloatVal::Zero(s) => CfloatVal::Zero(!s),
            CfloatVal::Subnormal(s, c) => CfloatVal::Subnormal(!s, c.clone()),
            CfloatVal::Normal(s, exp, c) => CfloatVal::Normal(!s, *exp, c.clone()),
            CfloatVal::Infinity(s) => CfloatVal::Infinity(!s),
            CfloatVal::Nan(s, q, p) => CfloatVal::Nan(*s, *q, p.clone()),
        };
        Cfloat {
            num,
            flags: Exceptions::default(),
            ctx: self.ctx.clone(),
        }
    }

    /// The next representable value toward positive infinity.
    ///
    /// When subnormals are disabled, the subnormal encodings are
    /// skipped: `+0` advances directly to the smallest normal, and the
    /// smallest negative normal advances to `-0`.
    pub fn next_up(&self) -> Cfloat {
        let ctx = self.ctx.clone();
        let m = ctx.max_m();
        let p = ctx.max_p();
        let make = |num| Cfloat {
            num,
            flags: Exceptions::default(),
            ctx: ctx.clone(),
        };

        match &self.num {
            CfloatVal::Nan(_, _, _) => self.clone(),
            CfloatVal::Infinity(false) => self.clone(),
            CfloatVal::Infinity(true) => ctx.maxval(true),
            CfloatVal::Zero(_) => ctx.minval(false),
            CfloatVal::Subnormal(false, c) => {
                let c1: Integer = c.clone() + 1;
                if c1.significant_bits() as usize > m {
                    ctx.min_norm(false)
                } else {
                    make(CfloatVal::Subnormal(false, c1))
                }
            }
            CfloatVal::Subnormal(true, c) => {
                let c1: Integer = c.clone() - 1;
                if c1.is_zero() {
                    ctx.zero(true)
                } else {
                    make(CfloatVal::Subnormal(true, c1))
                }
            }
            CfloatVal::Normal(s, exp, c) => {
                // align the significand to full precision
                let pc = c.significant_bits() as usize;
                let cf = c.clone() << (p - pc);
                let ef = exp - (p - pc) as isize;

                if !*s {
                    let (c1, e1) = {
                        let c1: Integer = cf + 1;
                        if c1.significant_bits() as usize > p {
                            (c1 >> 1, ef + 1)
                        } else {
                            (c1, ef)
                        }
                    };
                    let e = e1 + p as isize - 1;
                    if e > ctx.emax_eff()
                        || (ctx.supernormals()
                            && e == ctx.emax_eff()
                            && c1 > bitmask(p) - 2)
                    {
                        ctx.inf(false)
                    } else {
                        make(CfloatVal::Normal(false, e1, c1))
                    }
                } else {
                    let c1: Integer = cf - 1;
                    if (c1.significant_bits() as usize) < p {
                        // crossed a binade downward
                        let e = ef + p as isize - 2;
                        if e < ctx.emin() {
                            if ctx.subnormals() {
                                make(CfloatVal::Subnormal(true, bitmask(m)))
                            } else {
                                ctx.zero(true)
                            }
                        } else {
                            make(CfloatVal::Normal(true, ef - 1, (c1 << 1) | 1))
                        }
                    } else {
                        make(CfloatVal::Normal(true, ef, c1))
                    }
                }
            }
        }
    }

    /// The next representable value toward negative infinity;
    /// the mirror image of [`next_up`][Cfloat::next_up].
    pub fn next_down(&self) -> Cfloat {
        self.flip_sign().next_up().flip_sign()
    }
}

impl Real for Cfloat {
    fn radix() -> usize {
        2
    }

    fn sign(&self) -> Option<bool> {
        match &self.num {
            CfloatVal::Zero(s) => Some(*s),
            CfloatVal::Subnormal(s, _) => Some(*s),
            CfloatVal::Normal(s, _, _) => Some(*s),
            CfloatVal::Infinity(s) => Some(*s),
            CfloatVal::Nan(s, _, _) => Some(*s),
        }
    }

    fn exp(&self) -> Option<isize> {
        match &self.num {
            CfloatVal::Subnormal(_, _) => Some(self.ctx.expmin()),
            CfloatVal::Normal(_, exp, _) => Some(*exp),
            _ => None,
        }
    }

    fn e(&self) -> Option<isize> {
        match &self.num {
            CfloatVal::Subnormal(_, c) => {
                Some((self.ctx.expmin() - 1) + c.significant_bits() as isize)
            }
            CfloatVal::Normal(_, exp, c) => Some((exp - 1) + c.significant_bits() as isize),
            _ => None,
        }
    }

    fn n(&self) -> Option<isize> {
        self.exp().map(|exp| exp - 1)
    }

    fn c(&self) -> Option<Integer> {
        match &self.num {
            CfloatVal::Zero(_) => Some(Integer::zero()),
            CfloatVal::Subnormal(_, c) => Some(c.clone()),
            CfloatVal::Normal(_, _, c) => Some(c.clone()),
            _ => None,
        }
    }

    fn m(&self) -> Option<Integer> {
        match (self.c(), self.sign()) {
            (Some(c), Some(true)) => Some(-c),
            (Some(c), _) => Some(c),
            _ => None,
        }
    }

    fn prec(&self) -> Option<usize> {
        match &self.num {
            CfloatVal::Subnormal(_, c) => Some(c.significant_bits() as usize),
            CfloatVal::Normal(_, _, c) => Some(c.significant_bits() as usize),
            _ => None,
        }
    }

    fn is_nar(&self) -> bool {
        matches!(
            &self.num,
            CfloatVal::Infinity(_) | CfloatVal::Nan(_, _, _)
        )
    }

    fn is_finite(&self) -> bool {
        matches!(
            &self.num,
            CfloatVal::Zero(_) | CfloatVal::Subnormal(_, _) | CfloatVal::Normal(_, _, _)
        )
    }

    fn is_infinite(&self) -> bool {
        matches!(&self.num, CfloatVal::Infinity(_))
    }

    fn is_zero(&self) -> bool {
        matches!(&self.num, CfloatVal::Zero(_))
    }

    fn is_negative(&self) -> Option<bool> {
        match &self.num {
            CfloatVal::Zero(_) => None,
            CfloatVal::Subnormal(s, _) => Some(*s),
            CfloatVal::Normal(s, _, _) => Some(*s),
            CfloatVal::Infinity(s) => Some(*s),
            CfloatVal::Nan(_, _, _) => None,
        }
    }

    fn is_numerical(&self) -> bool {
        !matches!(&self.num, CfloatVal::Nan(_, _, _))
    }
}

impl From<Cfloat> for RFloat {
    fn from(val: Cfloat) -> Self {
        match val.num {
            CfloatVal::Zero(_) => RFloat::zero(),
            CfloatVal::Subnormal(s, c) => RFloat::Real(s, val.ctx.expmin(), c),
            CfloatVal::Normal(s, exp, c) => RFloat::Real(s, exp, c),
            CfloatVal::Infinity(s) => {
                if s {
                    RFloat::NegInfinity
                } else {
                    RFloat::PosInfinity
                }
            }
            CfloatVal::Nan(_, _, _) => RFloat::Nan,
        }
    }
}

impl PartialOrd for Cfloat {
    /// NaN compares unordered against everything, including itself.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        RFloat::from(self.clone()).partial_cmp(&RFloat::from(other.clone()))
    }
}

impl PartialEq for Cfloat {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl fmt::Display for Cfloat {
    /// Renders in decimal, honoring the formatter's precision;
    /// non-finite values render as `nan`, `inf`, and `-inf`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.num {
            CfloatVal::Nan(_, _, _) => write!(f, "nan"),
            CfloatVal::Infinity(s) => write!(f, "{}", if *s { "-inf" } else { "inf" }),
            _ => {
                let fl = Float::from(RFloat::from(self.clone()));
                match f.precision() {
                    Some(prec) => write!(f, "{:.*}", prec, fl),
                    None => write!(f, "{}", fl),
                }
            }
        }
    }
}
