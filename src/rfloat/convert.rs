/*!
Exact conversions between [`RFloat`] and native scalars.

Native floats are taken apart field by field (`to_bits`), so the
conversion into the crate is bit-exact, subnormals included. The
conversions out go through `rug::Float`, whose MPFR backend performs
the single correct rounding to the native width.
*/

use gmp_mpfr_sys::mpfr;
use num_traits::Zero;
use rug::{Float, Integer};

use crate::rfloat::RFloat;

// Field widths of the native IEEE 754 binary formats.
const F64_EXP_MASK: u64 = 0x7FF;
const F64_FRAC_MASK: u64 = (1 << 52) - 1;
const F32_EXP_MASK: u32 = 0xFF;
const F32_FRAC_MASK: u32 = (1 << 23) - 1;

impl From<f64> for RFloat {
    /// Bit-exact decomposition of an IEEE 754 binary64 value.
    fn from(val: f64) -> Self {
        let bits = val.to_bits();
        let s = (bits >> 63) == 1;
        let efield = ((bits >> 52) & F64_EXP_MASK) as i64;
        let mfield = bits & F64_FRAC_MASK;
        if efield == F64_EXP_MASK as i64 {
            if mfield == 0 {
                if s {
                    Self::NegInfinity
                } else {
                    Self::PosInfinity
                }
            } else {
                Self::Nan
            }
        } else if efield == 0 {
            if mfield == 0 {
                Self::zero()
            } else {
                // subnormal: exponent of the LSB is fixed
                Self::Real(s, -1074, Integer::from(mfield))
            }
        } else {
            // normal: restore the hidden bit, unbias
            let c = Integer::from(mfield | (1 << 52));
            Self::Real(s, (efield - 1075) as isize, c)
        }
    }
}

impl From<f32> for RFloat {
    /// Bit-exact decomposition of an IEEE 754 binary32 value.
    fn from(val: f32) -> Self {
        let bits = val.to_bits();
        let s = (bits >> 31) == 1;
        let efield = ((bits >> 23) & F32_EXP_MASK) as i32;
        let mfield = bits & F32_FRAC_MASK;
        if efield == F32_EXP_MASK as i32 {
            if mfield == 0 {
                if s {
                    Self::NegInfinity
                } else {
                    Self::PosInfinity
                }
            } else {
                Self::Nan
            }
        } else if efield == 0 {
            if mfield == 0 {
                Self::zero()
            } else {
                Self::Real(s, -149, Integer::from(mfield))
            }
        } else {
            let c = Integer::from(mfield | (1 << 23));
            Self::Real(s, (efield - 150) as isize, c)
        }
    }
}

impl From<i64> for RFloat {
    fn from(val: i64) -> Self {
        let s = val < 0;
        let c = Integer::from(val).abs();
        Self::Real(s, 0, c).canonicalize()
    }
}

impl From<u64> for RFloat {
    fn from(val: u64) -> Self {
        Self::Real(false, 0, Integer::from(val))
    }
}

impl RFloat {
    /// Rounds this value to the nearest `f64`,
    /// saturating to the native infinities on overflow.
    pub fn to_f64(&self) -> f64 {
        Float::from(self.clone()).to_f64()
    }

    /// Rounds this value to the nearest `f32`,
    /// saturating to the native infinities on overflow.
    pub fn to_f32(&self) -> f32 {
        Float::from(self.clone()).to_f32()
    }
}

impl From<RFloat> for Float {
    /// Lossless transfer into an MPFR float sized to the significand.
    fn from(val: RFloat) -> Self {
        use rug::float::{prec_min, Special};
        match val {
            RFloat::Nan => Float::with_val(prec_min(), Special::Nan),
            RFloat::PosInfinity => Float::with_val(prec_min(), Special::Infinity),
            RFloat::NegInfinity => Float::with_val(prec_min(), Special::NegInfinity),
            RFloat::Real(sign, exp, c) => {
                if c.is_zero() {
                    return Float::with_val(prec_min(), 0);
                }
                let prec = c.significant_bits().max(1);
                let m = if sign { -c } else { c };
                let mut out = Float::new(prec);

                // the target has room for every digit, so the ternary
                // value must report an exact transfer
                let ternary = unsafe {
                    mpfr::set_z_2exp(out.as_raw_mut(), m.as_raw(), exp as i64, mpfr::rnd_t::RNDN)
                };
                debug_assert_eq!(ternary, 0);
                out
            }
        }
    }
}

impl From<Float> for RFloat {
    /// Lossless read-back of an MPFR float as a normalized triple.
    fn from(val: Float) -> Self {
        if val.is_zero() {
            Self::zero()
        } else if val.is_infinite() {
            if val.is_sign_negative() {
                Self::NegInfinity
            } else {
                Self::PosInfinity
            }
        } else if val.is_nan() {
            Self::Nan
        } else {
            let mut m = Integer::new();
            let exp = unsafe { mpfr::get_z_2exp(m.as_raw_mut(), val.as_raw()) };
            Self::Real(m.is_negative(), exp as isize, m.abs())
        }
    }
}
