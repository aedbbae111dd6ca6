/*!
Accumulation into the quire.

Values enter the quire by placing their significand at the bit position
determined by their scale and ripple-adding (or subtracting, for the
opposite sign) into the magnitude. No step rounds: within the dynamic
range, the accumulated value is exact.
*/

use std::ops::{AddAssign, SubAssign};

use num_traits::Zero;
use rug::Integer;

use crate::bitblock::BitBlock;
use crate::error::ArithmeticError;
use crate::posit::Posit;
use crate::rfloat::RFloat;
use crate::Real;

use super::Quire;

impl Quire {
    /// Sign-magnitude accumulation of `(-1)^sign * addend * 2^-half_range`.
    /// Overflow of the capacity segment is a caller bug, not a silent
    /// wrap.
    fn accumulate(&mut self, sign: bool, addend: Integer) {
        if addend.is_zero() {
            return;
        }
        let qbits = self.magnitude.width();
        assert!(
            addend.significant_bits() as usize <= qbits,
            "quire capacity exceeded; bound the number of accumulations"
        );
        let addend = BitBlock::from_bits(qbits, addend);

        if self.sign == sign {
            // ripple upward through lower, upper, and capacity
            let (sum, carry) = self.magnitude.carry_add(&addend);
            assert!(
                !carry,
                "quire capacity exceeded; bound the number of accumulations"
            );
            self.magnitude = sum;
        } else if self.magnitude >= addend {
            let (diff, _) = self.magnitude.borrow_sub(&addend);
            self.magnitude = diff;
        } else {
            // the addend dominates; the accumulator changes sign
            let (diff, _) = addend.borrow_sub(&self.magnitude);
            self.sign = sign;
            self.magnitude = diff;
        }

        if self.magnitude.is_zero() {
            self.sign = false;
        }
    }

    /// Checks a value against the quire's dynamic range and routes its
    /// significand to the right bit position.
    fn try_place<T: Real>(&mut self, val: &T, negate: bool) -> Result<(), ArithmeticError> {
        if val.is_nar() {
            return Err(ArithmeticError::OperandIsNar);
        }
        if val.is_zero() {
            return Ok(());
        }

        let scale = val.e().unwrap();
        if scale > self.max_scale() {
            return Err(ArithmeticError::OperandTooLargeForQuire);
        }
        if scale < self.min_scale() {
            return Err(ArithmeticError::OperandTooSmallForQuire);
        }

        // bit position of the value's least significant digit
        let lsb = self.half_range() as isize + val.exp().unwrap();
        if lsb < 0 {
            return Err(ArithmeticError::OperandTooSmallForQuire);
        }

        let sign = val.sign().unwrap() != negate;
        let addend = val.c().unwrap() << (lsb as u32);
        self.accumulate(sign, addend);
        Ok(())
    }

    /// Adds a value into the accumulator exactly.
    pub fn try_add_value<T: Real>(&mut self, val: &T) -> Result<(), ArithmeticError> {
        self.try_place(val, false)
    }

    /// Subtracts a value from the accumulator exactly.
    pub fn try_sub_value<T: Real>(&mut self, val: &T) -> Result<(), ArithmeticError> {
        self.try_place(val, true)
    }

    /// Fused multiply-accumulate: adds `x * y` exactly.
    /// The product is formed exactly before placement, so no rounding
    /// occurs anywhere on this path.
    pub fn try_fma<N1, N2>(&mut self, x: &N1, y: &N2) -> Result<(), ArithmeticError>
    where
        N1: Real,
        N2: Real,
    {
        if x.is_nar() || y.is_nar() {
            return Err(ArithmeticError::OperandIsNar);
        }
        let product = RFloat::from_real(x).mul_exact(&RFloat::from_real(y));
        self.try_place(&product, false)
    }

    /// Fused dot product: accumulates `sum(xs[i] * ys[i])` exactly.
    /// The vectors must have equal length.
    pub fn try_fdp<N1, N2>(&mut self, xs: &[N1], ys: &[N2]) -> Result<(), ArithmeticError>
    where
        N1: Real,
        N2: Real,
    {
        assert_eq!(xs.len(), ys.len(), "vectors must have equal length");
        for (x, y) in xs.iter().zip(ys.iter()) {
            self.try_fma(x, y)?;
        }
        Ok(())
    }
}

impl AddAssign<&Posit> for Quire {
    /// Accumulates a posit value.
    /// Posit values always fit the quire's range; NaR is a caller bug.
    fn add_assign(&mut self, rhs: &Posit) {
        self.try_add_value(rhs).expect("value outside quire range");
    }
}

impl SubAssign<&Posit> for Quire {
    fn sub_assign(&mut self, rhs: &Posit) {
        self.try_sub_value(rhs).expect("value outside quire range");
    }
}
