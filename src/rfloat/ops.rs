/*!
Exact arithmetic on [`RFloat`].

Addition and multiplication over unbounded triples lose nothing, so
they need no rounding context: addition drops both significands onto
the finer operand's digit grid and adds them as signed integers, and
multiplication multiplies significands and adds exponents. Non-real
operands follow the usual IEEE 754 rules.
*/

use std::cmp::min;
use std::ops::{Add, Mul, Neg, Sub};

use rug::Integer;

use crate::rfloat::RFloat;
use crate::Real;

impl RFloat {
    /// Exact sum of two values.
    pub fn add_exact(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Nan, _) | (_, Self::Nan) => Self::Nan,
            (Self::PosInfinity, Self::NegInfinity)
            | (Self::NegInfinity, Self::PosInfinity) => {
                // opposite limits have no sum
                Self::Nan
            }
            (Self::PosInfinity, _) | (_, Self::PosInfinity) => Self::PosInfinity,
            (Self::NegInfinity, _) | (_, Self::NegInfinity) => Self::NegInfinity,
            (Self::Real(_, exp1, _), Self::Real(_, exp2, _)) => {
                // signed integer addition on the finer grid is exact;
                // zeros need no special casing
                let grid = min(*exp1, *exp2);
                let total = self.m_at(grid).unwrap() + other.m_at(grid).unwrap();
                Self::Real(total.is_negative(), grid, total.abs()).canonicalize()
            }
        }
    }

    /// Exact product of two values.
    pub fn mul_exact(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Nan, _) | (_, Self::Nan) => Self::Nan,
            (Self::Real(s1, exp1, c1), Self::Real(s2, exp2, c2)) => {
                let product = Integer::from(c1 * c2);
                Self::Real(s1 != s2, exp1 + exp2, product).canonicalize()
            }
            // at least one operand is infinite from here on
            (lhs, rhs) => {
                if lhs.is_zero() || rhs.is_zero() {
                    // a zero cannot scale an infinity
                    Self::Nan
                } else if lhs.sign().unwrap() != rhs.sign().unwrap() {
                    Self::NegInfinity
                } else {
                    Self::PosInfinity
                }
            }
        }
    }
}

impl Neg for RFloat {
    type Output = RFloat;

    fn neg(self) -> Self::Output {
        match self {
            Self::Nan => Self::Nan,
            Self::PosInfinity => Self::NegInfinity,
            Self::NegInfinity => Self::PosInfinity,
            Self::Real(s, exp, c) => Self::Real(!s, exp, c).canonicalize(),
        }
    }
}

impl Add for RFloat {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.add_exact(&rhs)
    }
}

impl Sub for RFloat {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.add_exact(&-rhs)
    }
}

impl Mul for RFloat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.mul_exact(&rhs)
    }
}
