/*!
Rounded arithmetic over posit numbers.

Each operation short-circuits the NaR cases, decodes its operands into
[`BlockTriple`] form, runs the integer kernel, and rounds the wide
result once through [`PositContext`]. The `try_*` entry points surface
typed [`ArithmeticError`] values instead of producing NaR; the
operator-style methods are thin wrappers that map every error onto NaR.
*/

use std::cmp::max;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::ArithmeticError;
use crate::ops::*;
use crate::rfloat::RFloat;
use crate::triple::{BlockTriple, TripleOp};
use crate::{Real, RoundingContext};

use super::{Posit, PositContext};

impl PositContext {
    /// Working fraction width for an operation over the given operand
    /// precisions: wide enough for the operands and for every fraction
    /// this format can encode.
    fn working_fbits(&self, precs: &[Option<usize>]) -> usize {
        let mut fbits = max(self.max_p(), 3);
        for p in precs.iter().flatten() {
            fbits = max(fbits, p.saturating_sub(1));
        }
        fbits
    }

    /// Addition with typed errors.
    pub fn try_add<N1, N2>(&self, src1: &N1, src2: &N2) -> Result<Posit, ArithmeticError>
    where
        N1: Real,
        N2: Real,
    {
        if src1.is_nar() || src2.is_nar() {
            return Err(ArithmeticError::OperandIsNar);
        }
        let fbits = self.working_fbits(&[src1.prec(), src2.prec()]);
        let x = BlockTriple::from_real(src1, fbits, TripleOp::Rep);
        let y = BlockTriple::from_real(src2, fbits, TripleOp::Rep);
        Ok(self.round(&BlockTriple::add(&x, &y)))
    }

    /// Subtraction with typed errors.
    pub fn try_sub<N1, N2>(&self, src1: &N1, src2: &N2) -> Result<Posit, ArithmeticError>
    where
        N1: Real,
        N2: Real,
    {
        if src1.is_nar() || src2.is_nar() {
            return Err(ArithmeticError::OperandIsNar);
        }
        let fbits = self.working_fbits(&[src1.prec(), src2.prec()]);
        let x = BlockTriple::from_real(src1, fbits, TripleOp::Rep);
        let y = BlockTriple::from_real(src2, fbits, TripleOp::Rep);
        Ok(self.round(&BlockTriple::sub(&x, &y)))
    }

    /// Multiplication with typed errors.
    pub fn try_mul<N1, N2>(&self, src1: &N1, src2: &N2) -> Result<Posit, ArithmeticError>
    where
        N1: Real,
        N2: Real,
    {
        if src1.is_nar() || src2.is_nar() {
            return Err(ArithmeticError::OperandIsNar);
        }
        let fbits = self.working_fbits(&[src1.prec(), src2.prec()]);
        let x = BlockTriple::from_real(src1, fbits, TripleOp::Rep);
        let y = BlockTriple::from_real(src2, fbits, TripleOp::Rep);
        Ok(self.round(&BlockTriple::mul(&x, &y)))
    }

    /// Division with typed errors: a NaR divisor, a NaR dividend, and
    /// a zero divisor are distinguished.
    pub fn try_div<N1, N2>(&self, src1: &N1, src2: &N2) -> Result<Posit, ArithmeticError>
    where
        N1: Real,
        N2: Real,
    {
        if src2.is_nar() {
            return Err(ArithmeticError::DivideByNar);
        }
        if src1.is_nar() {
            return Err(ArithmeticError::OperandIsNar);
        }
        if src2.is_zero() {
            return Err(ArithmeticError::DivideByZero);
        }
        let fbits = self.working_fbits(&[src1.prec(), src2.prec()]);
        let x = BlockTriple::from_real(src1, fbits, TripleOp::Rep);
        let y = BlockTriple::from_real(src2, fbits, TripleOp::Rep);
        Ok(self.round(&BlockTriple::div(&x, &y)))
    }

    /// Square root with typed errors; negative arguments are invalid.
    pub fn try_sqrt<N: Real>(&self, src: &N) -> Result<Posit, ArithmeticError> {
        if src.is_nar() {
            return Err(ArithmeticError::OperandIsNar);
        }
        if !src.is_zero() && src.sign().unwrap() {
            return Err(ArithmeticError::OperandIsNar);
        }
        let fbits = self.working_fbits(&[src.prec()]);
        let x = BlockTriple::from_real(src, fbits, TripleOp::Rep);
        Ok(self.round(&BlockTriple::sqrt(&x)))
    }

    /// Reciprocal with typed errors.
    pub fn try_recip<N: Real>(&self, src: &N) -> Result<Posit, ArithmeticError> {
        self.try_div(&RFloat::one(), src)
    }

    /// Fused multiply-add with typed errors: `src1 * src2 + src3` with
    /// a single rounding. The exact product is re-tagged at double
    /// precision before the addition so no digit is lost early.
    pub fn try_fma<N1, N2, N3>(
        &self,
        src1: &N1,
        src2: &N2,
        src3: &N3,
    ) -> Result<Posit, ArithmeticError>
    where
        N1: Real,
        N2: Real,
        N3: Real,
    {
        if src1.is_nar() || src2.is_nar() || src3.is_nar() {
            return Err(ArithmeticError::OperandIsNar);
        }
        let fbits = self.working_fbits(&[src1.prec(), src2.prec()]);
        let x = BlockTriple::from_real(src1, fbits, TripleOp::Rep);
        let y = BlockTriple::from_real(src2, fbits, TripleOp::Rep);
        let product = BlockTriple::mul(&x, &y);

        let wide = self.working_fbits(&[product.prec(), src3.prec()]);
        let p = BlockTriple::from_real(&product, wide, TripleOp::Rep);
        let z = BlockTriple::from_real(src3, wide, TripleOp::Rep);
        Ok(self.round(&BlockTriple::add(&p, &z)))
    }
}

impl RoundedAdd for PositContext {
    fn add<N1: Real, N2: Real>(&self, src1: &N1, src2: &N2) -> Self::Format {
        self.try_add(src1, src2).unwrap_or_else(|_| self.nar())
    }
}

impl RoundedSub for PositContext {
    fn sub<N1: Real, N2: Real>(&self, src1: &N1, src2: &N2) -> Self::Format {
        self.try_sub(src1, src2).unwrap_or_else(|_| self.nar())
    }
}

impl RoundedMul for PositContext {
    fn mul<N1: Real, N2: Real>(&self, src1: &N1, src2: &N2) -> Self::Format {
        self.try_mul(src1, src2).unwrap_or_else(|_| self.nar())
    }
}

impl RoundedDiv for PositContext {
    fn div<N1: Real, N2: Real>(&self, src1: &N1, src2: &N2) -> Self::Format {
        self.try_div(src1, src2).unwrap_or_else(|_| self.nar())
    }
}

impl RoundedSqrt for PositContext {
    fn sqrt<N: Real>(&self, src: &N) -> Self::Format {
        self.try_sqrt(src).unwrap_or_else(|_| self.nar())
    }
}

impl RoundedRecip for PositContext {
    fn recip<N: Real>(&self, src: &N) -> Self::Format {
        self.try_recip(src).unwrap_or_else(|_| self.nar())
    }
}

impl RoundedNeg for PositContext {
    fn neg<N: Real>(&self, src: &N) -> Self::Format {
        self.round(&(-RFloat::from_real(src)))
    }
}

impl RoundedAbs for PositContext {
    fn abs<N: Real>(&self, src: &N) -> Self::Format {
        match RFloat::from_real(src) {
            RFloat::Real(_, exp, c) => self.round(&RFloat::Real(false, exp, c)),
            _ => self.nar(),
        }
    }
}

impl RoundedFMA for PositContext {
    fn fma<N1, N2, N3>(&self, src1: &N1, src2: &N2, src3: &N3) -> Self::Format
    where
        N1: Real,
        N2: Real,
        N3: Real,
    {
        self.try_fma(src1, src2, src3)
            .unwrap_or_else(|_| self.nar())
    }
}

// Operator sugar over references; the left-hand context governs.
macro_rules! posit_binop {
    ($trait:ident, $rounded:ident, $imp:ident) => {
        impl $trait for &Posit {
            type Output = Posit;

            fn $imp(self, rhs: &Posit) -> Self::Output {
                assert_eq!(self.ctx(), rhs.ctx(), "mismatched posit formats");
                $rounded::$imp(self.ctx(), self, rhs)
            }
        }

        impl $trait for Posit {
            type Output = Posit;

            fn $imp(self, rhs: Posit) -> Self::Output {
                $trait::$imp(&self, &rhs)
            }
        }
    };
}

posit_binop!(Add, RoundedAdd, add);
posit_binop!(Sub, RoundedSub, sub);
posit_binop!(Mul, RoundedMul, mul);
posit_binop!(Div, RoundedDiv, div);

impl Neg for &Posit {
    type Output = Posit;

    /// Negation is exact: the posit lattice is symmetric about zero.
    fn neg(self) -> Self::Output {
        RoundedNeg::neg(self.ctx(), self)
    }
}

impl Neg for Posit {
    type Output = Posit;

    fn neg(self) -> Self::Output {
        -&self
    }
}
