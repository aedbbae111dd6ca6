use std::cmp::min;
use std::cmp::Ordering;

use num_traits::Zero;
use rug::Integer;

use crate::Real;

/// A binary floating-point number with unbounded significand and
/// unbounded exponent.
///
/// This is the crate's interchange form: the normalized triple of
/// spec'd formats, with nothing clamped. Posits, cfloats, quires, and
/// native scalars all convert to it exactly, so it is where
/// conversions, text, and tests meet. The associated
/// [`RoundingContext`][crate::RoundingContext] implementation is
/// [`RFloatContext`][crate::rfloat::RFloatContext].
///
/// There is no negative zero: every operation folds `-0` into `+0`.
#[derive(Debug, Clone)]
pub enum RFloat {
    /// A finite value `(-1)^sign * c * 2^exp`.
    Real(bool, isize, Integer),
    /// The limit above every finite value.
    PosInfinity,
    /// The limit below every finite value.
    NegInfinity,
    /// Not a number.
    Nan,
}

impl Real for RFloat {
    fn radix() -> usize {
        2
    }

    fn sign(&self) -> Option<bool> {
        match self {
            RFloat::Real(s, _, _) => Some(*s),
            RFloat::PosInfinity => Some(false),
            RFloat::NegInfinity => Some(true),
            RFloat::Nan => None,
        }
    }

    fn exp(&self) -> Option<isize> {
        match self {
            RFloat::Real(_, exp, c) if !c.is_zero() => Some(*exp),
            _ => None,
        }
    }

    fn e(&self) -> Option<isize> {
        match self {
            RFloat::Real(_, exp, c) if !c.is_zero() => {
                // weight of the leading digit
                Some(exp + c.significant_bits() as isize - 1)
            }
            _ => None,
        }
    }

    fn n(&self) -> Option<isize> {
        self.exp().map(|exp| exp - 1)
    }

    fn c(&self) -> Option<Integer> {
        match self {
            RFloat::Real(_, _, c) => Some(c.clone()),
            _ => None,
        }
    }

    fn m(&self) -> Option<Integer> {
        match self {
            RFloat::Real(s, _, c) if *s => Some(-c.clone()),
            RFloat::Real(_, _, c) => Some(c.clone()),
            _ => None,
        }
    }

    fn prec(&self) -> Option<usize> {
        match self {
            RFloat::Real(_, _, c) => Some(c.significant_bits() as usize),
            _ => None,
        }
    }

    fn is_nar(&self) -> bool {
        !matches!(self, RFloat::Real(_, _, _))
    }

    fn is_finite(&self) -> bool {
        matches!(self, RFloat::Real(_, _, _))
    }

    fn is_infinite(&self) -> bool {
        matches!(self, RFloat::PosInfinity | RFloat::NegInfinity)
    }

    fn is_zero(&self) -> bool {
        matches!(self, RFloat::Real(_, _, c) if c.is_zero())
    }

    fn is_negative(&self) -> Option<bool> {
        match self {
            RFloat::Real(_, _, c) if c.is_zero() => None,
            RFloat::Real(s, _, _) => Some(*s),
            RFloat::PosInfinity => Some(false),
            RFloat::NegInfinity => Some(true),
            RFloat::Nan => None,
        }
    }

    fn is_numerical(&self) -> bool {
        !matches!(self, RFloat::Nan)
    }
}

impl RFloat {
    /// The canonical zero.
    pub fn zero() -> Self {
        RFloat::Real(false, 0, Integer::new())
    }

    /// The value one.
    pub fn one() -> Self {
        RFloat::Real(false, 0, Integer::from(1))
    }

    /// The power of two `2^n`.
    pub fn pow2(n: isize) -> Self {
        RFloat::Real(false, n, Integer::from(1))
    }

    /// True only for the NaN variant.
    pub fn is_nan(&self) -> bool {
        matches!(self, RFloat::Nan)
    }

    /// Folds a signed zero into `+0`; everything else passes through.
    pub fn canonicalize(&self) -> Self {
        if self.is_zero() {
            RFloat::zero()
        } else {
            self.clone()
        }
    }

    /// The digit at absolute position `n`, for finite non-zero values.
    pub fn get_bit(&self, n: isize) -> Option<bool> {
        let exp = self.exp()?;
        if n < exp || n > self.e()? {
            // outside the significand everything reads as zero
            Some(false)
        } else {
            self.c().map(|c| c.get_bit((n - exp) as u32))
        }
    }

    /// The signed significand lifted onto the digit grid of weight
    /// `2^grid`. Only valid for finite values whose own grid is no
    /// finer than `grid`; comparison and exact addition both reduce to
    /// integer arithmetic on a shared grid.
    pub(crate) fn m_at(&self, grid: isize) -> Option<Integer> {
        match self {
            RFloat::Real(s, exp, c) => {
                debug_assert!(*exp >= grid, "grid must be at least as fine");
                let lifted = Integer::from(c << (exp - grid) as u32);
                Some(if *s { -lifted } else { lifted })
            }
            _ => None,
        }
    }

    /// Exact conversion from any [`Real`].
    pub fn from_real<N: Real>(val: &N) -> Self {
        if !val.is_numerical() {
            Self::Nan
        } else if val.is_infinite() {
            match val.sign().unwrap() {
                true => Self::NegInfinity,
                false => Self::PosInfinity,
            }
        } else if val.is_zero() {
            Self::zero()
        } else {
            Self::Real(val.sign().unwrap(), val.exp().unwrap(), val.c().unwrap())
        }
    }
}

impl PartialOrd for RFloat {
    /// Value order with NaN unordered. Two finite values compare as
    /// signed integers once both significands are lifted onto a common
    /// grid, which settles the zero and mixed-sign cases without
    /// special handling.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (RFloat::Nan, _) | (_, RFloat::Nan) => None,
            (RFloat::PosInfinity, RFloat::PosInfinity) => Some(Ordering::Equal),
            (RFloat::NegInfinity, RFloat::NegInfinity) => Some(Ordering::Equal),
            (RFloat::PosInfinity, _) | (_, RFloat::NegInfinity) => Some(Ordering::Greater),
            (RFloat::NegInfinity, _) | (_, RFloat::PosInfinity) => Some(Ordering::Less),
            (RFloat::Real(_, exp1, _), RFloat::Real(_, exp2, _)) => {
                let grid = min(*exp1, *exp2);
                Some(self.m_at(grid).unwrap().cmp(&other.m_at(grid).unwrap()))
            }
        }
    }
}

impl PartialEq for RFloat {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}
