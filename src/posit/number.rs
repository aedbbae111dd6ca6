use std::cmp::Ordering;
use std::fmt;

use num_traits::{One, Zero};
use rug::Integer;

use crate::{rfloat::RFloat, util::bitmask, Real};

use super::PositContext;

/// Posit number encoding viewed as an enumeration.
/// Unlike [`Posit`], [`PositVal`] represents only numerical data.
#[derive(Clone, Debug)]
pub enum PositVal {
    /// Exact zero
    Zero,
    /// Finite, non-zero value `(-1)^s * c * 2^(r * 2^es + exp)`
    NonZero(bool, isize, isize, Integer),
    /// Non-real or undefined
    Nar,
}

/// Posit number format.
///
/// The associated [`RoundingContext`][crate::RoundingContext]
/// implementation is [`PositContext`].
/// See [`PositContext`] for more details on numerical properties
/// of the [`Posit`] type.
#[derive(Clone, Debug)]
pub struct Posit {
    pub(crate) num: PositVal,
    pub(crate) ctx: PositContext,
}

impl Posit {
    /// Returns the rounding context under which this number was created.
    pub fn ctx(&self) -> &PositContext {
        &self.ctx
    }

    /// Returns true if this posit is the NaR encoding.
    pub fn is_nar_encoding(&self) -> bool {
        matches!(self.num, PositVal::Nar)
    }

    /// Converts this [`Posit`] to an [`Integer`] representing a posit
    /// bitpattern. Negative values are encoded as the two's complement
    /// of their positive counterpart.
    pub fn into_bits(self) -> Integer {
        let es = self.ctx.es();
        let nbits = self.ctx.nbits();
        match self.num {
            PositVal::Zero => Integer::zero(),
            PositVal::Nar => Integer::one() << (nbits - 1),
            PositVal::NonZero(s, r, exp, c) => {
                // compute size of regime field and regime LSB
                let (kbits, r0) = if r < 0 {
                    (-r as usize, false)
                } else {
                    (r as usize + 1, true)
                };

                // check for special case: format encoded with regime only
                let magnitude = if kbits == nbits - 1 {
                    if r0 {
                        // maxpos: a full run of 1s
                        bitmask(nbits - 1)
                    } else {
                        // minpos: a full run of 0s and the terminator
                        Integer::one()
                    }
                } else {
                    // compute size of exponent and significand fields
                    let rbits = kbits + 1;
                    let embits = nbits - 1 - rbits;
                    let (ebits, mbits) = if embits <= es {
                        (embits, 0)
                    } else {
                        (es, embits - es)
                    };

                    // convert regime
                    let rfield = if r0 {
                        // r >= 0 => rfield = 11..110
                        bitmask(kbits) << 1
                    } else {
                        // r < 0 => rfield = 00..001
                        Integer::one()
                    };

                    // convert exponent, dropping bits the regime displaced
                    let e = exp + (c.significant_bits() as isize - 1);
                    let efield = Integer::from(e >> (es - ebits));

                    // convert significand
                    let p = c.significant_bits() as usize;
                    let mfield = if p - 1 <= mbits {
                        (bitmask(p - 1) & c) << (mbits - (p - 1))
                    } else {
                        bitmask(p - 1) & c
                    };

                    // compose
                    (rfield << embits) | (efield << mbits) | mfield
                };

                if s {
                    // negative encodings are the two's complement
                    (Integer::one() << nbits) - magnitude
                } else {
                    magnitude
                }
            }
        }
    }

    /// The lattice successor of this posit: the next representable
    /// value in the two's-complement encoding order. The encoding just
    /// below NaR advances to NaR, and NaR advances to the most negative
    /// encoding.
    pub fn next_up(&self) -> Posit {
        let nbits = self.ctx.nbits();
        let bits = self.clone().into_bits() + 1;
        self.ctx.bits_to_number(bits & bitmask(nbits))
    }

    /// The lattice predecessor of this posit; inverse of
    /// [`next_up`][Posit::next_up] everywhere including the NaR
    /// boundary.
    pub fn next_down(&self) -> Posit {
        let nbits = self.ctx.nbits();
        let bits = self.clone().into_bits() - 1;
        self.ctx.bits_to_number(bits & bitmask(nbits))
    }

    /// Rounds this posit to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        RFloat::from(self.clone()).to_f64()
    }
}

impl Real for Posit {
    fn radix() -> usize {
        2
    }

    fn sign(&self) -> Option<bool> {
        match &self.num {
            PositVal::Zero => Some(false),
            PositVal::NonZero(s, _, _, _) => Some(*s),
            PositVal::Nar => None,
        }
    }

    fn exp(&self) -> Option<isize> {
        match &self.num {
            PositVal::NonZero(_, r, exp, _) => Some((r * self.ctx.rscale()) + exp),
            _ => None,
        }
    }

    fn e(&self) -> Option<isize> {
        match &self.num {
            PositVal::NonZero(_, r, exp, c) => {
                Some((r * self.ctx.rscale()) + exp + (c.significant_bits() as isize - 1))
            }
            _ => None,
        }
    }

    fn n(&self) -> Option<isize> {
        self.exp().map(|exp| exp - 1)
    }

    fn c(&self) -> Option<Integer> {
        match &self.num {
            PositVal::NonZero(_, _, _, c) => Some(c.clone()),
            _ => None,
        }
    }

    fn m(&self) -> Option<Integer> {
        self.c().map(|c| if self.sign().unwrap() { -c } else { c })
    }

    fn prec(&self) -> Option<usize> {
        match &self.num {
            PositVal::NonZero(_, _, _, c) => Some(c.significant_bits() as usize),
            _ => None,
        }
    }

    fn is_nar(&self) -> bool {
        matches!(self.num, PositVal::Nar)
    }

    fn is_finite(&self) -> bool {
        !matches!(self.num, PositVal::Nar)
    }

    fn is_infinite(&self) -> bool {
        false
    }

    fn is_zero(&self) -> bool {
        matches!(self.num, PositVal::Zero)
    }

    fn is_negative(&self) -> Option<bool> {
        match &self.num {
            PositVal::Zero => None,
            PositVal::NonZero(s, _, _, _) => Some(*s),
            PositVal::Nar => None,
        }
    }

    fn is_numerical(&self) -> bool {
        !matches!(self.num, PositVal::Nar)
    }
}

impl From<Posit> for RFloat {
    fn from(value: Posit) -> Self {
        match value.num {
            PositVal::Zero => RFloat::zero(),
            PositVal::NonZero(s, r, exp, c) => {
                RFloat::Real(s, value.ctx.rscale() * r + exp, c)
            }
            PositVal::Nar => RFloat::Nan,
        }
    }
}

impl PartialOrd for Posit {
    /// NaR compares unordered against everything, including itself.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        RFloat::from(self.clone()).partial_cmp(&RFloat::from(other.clone()))
    }
}

impl PartialEq for Posit {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl fmt::Display for Posit {
    /// Renders the exact bit-level form `<nbits>.<es>x<hex>p`;
    /// zero prints as `0` and the error value as `nar`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.num {
            PositVal::Zero => write!(f, "0"),
            PositVal::Nar => write!(f, "nar"),
            PositVal::NonZero(_, _, _, _) => {
                let nbits = self.ctx.nbits();
                let es = self.ctx.es();
                let digits = (nbits + 3) / 4;
                let hex = self.clone().into_bits().to_string_radix(16);
                write!(f, "{}.{}x{:0>width$}p", nbits, es, hex, width = digits)
            }
        }
    }
}
