/*!
Rounded arithmetic over configurable floats.

The inherent operations on [`CfloatContext`] implement the full
special-value table: NaN kinds propagate, invalid combinations of
infinities and zeros produce the mandated NaN kind, and finite operands
run through the [`BlockTriple`] kernels with a single rounding at the
end. Under the saturating policy, results that would encode infinity
or NaN out of arithmetic are remapped onto the largest finite values
inside [`RoundingContext::round`], so every path shares that policy
decision.
*/

use std::cmp::max;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::ArithmeticError;
use crate::ops::*;
use crate::rfloat::RFloat;
use crate::triple::{BlockTriple, TripleOp};
use crate::{Real, RoundingContext};

use super::{Cfloat, CfloatContext, CfloatVal, Exceptions};

impl CfloatContext {
    /// Working fraction width for an operation over the given operand
    /// precisions.
    fn working_fbits(&self, precs: &[Option<usize>]) -> usize {
        let mut fbits = max(self.max_m(), 3);
        for p in precs.iter().flatten() {
            fbits = max(fbits, p.saturating_sub(1));
        }
        fbits
    }

    /// Re-encodes a NaN operand in this format, preserving its kind.
    /// Under saturation the NaN is remapped to the largest finite
    /// value like every other non-real result.
    fn propagate_nan(&self, val: &Cfloat) -> Cfloat {
        if self.saturating() {
            let mut r = self.maxval(false);
            r.flags.invalid = true;
            r
        } else if let CfloatVal::Nan(s, q, payload) = &val.num {
            Cfloat {
                num: CfloatVal::Nan(*s, *q, payload.clone()),
                flags: Exceptions::default(),
                ctx: self.clone(),
            }
        } else {
            self.qnan()
        }
    }

    /// Produces the NaN mandated for an invalid operation, raising
    /// the invalid flag.
    fn invalid_nan(&self, signalling: bool) -> Cfloat {
        let mut r = if self.saturating() {
            self.maxval(false)
        } else if signalling {
            self.snan()
        } else {
            self.qnan()
        };
        r.flags.invalid = true;
        r
    }

    /// Addition over values of this format, with the special-value
    /// table applied before the kernel.
    pub fn add(&self, a: &Cfloat, b: &Cfloat) -> Cfloat {
        if a.is_nan() {
            return self.propagate_nan(a);
        }
        if b.is_nan() {
            return self.propagate_nan(b);
        }
        if a.is_infinite() && b.is_infinite() && a.sign() != b.sign() {
            // opposite infinities cancel invalidly
            return self.invalid_nan(true);
        }
        RoundedAdd::add(self, a, b)
    }

    /// Subtraction over values of this format.
    pub fn sub(&self, a: &Cfloat, b: &Cfloat) -> Cfloat {
        if a.is_nan() {
            return self.propagate_nan(a);
        }
        if b.is_nan() {
            return self.propagate_nan(b);
        }
        if a.is_infinite() && b.is_infinite() && a.sign() == b.sign() {
            return self.invalid_nan(true);
        }
        RoundedSub::sub(self, a, b)
    }

    /// Multiplication over values of this format.
    pub fn mul(&self, a: &Cfloat, b: &Cfloat) -> Cfloat {
        if a.is_nan() {
            return self.propagate_nan(a);
        }
        if b.is_nan() {
            return self.propagate_nan(b);
        }
        if (a.is_infinite() && b.is_zero()) || (a.is_zero() && b.is_infinite()) {
            return self.invalid_nan(false);
        }
        RoundedMul::mul(self, a, b)
    }

    /// Division over values of this format.
    pub fn div(&self, a: &Cfloat, b: &Cfloat) -> Cfloat {
        if a.is_nan() {
            return self.propagate_nan(a);
        }
        if b.is_nan() {
            return self.propagate_nan(b);
        }
        if (a.is_zero() && b.is_zero()) || (a.is_infinite() && b.is_infinite()) {
            return self.invalid_nan(false);
        }
        if b.is_zero() && !a.is_infinite() {
            // finite, non-zero over zero: a true pole
            let sign = a.sign().unwrap() != b.sign().unwrap();
            let mut r = self.round(&BlockTriple::inf(sign, 2, TripleOp::Div));
            r.flags.divzero = true;
            return r;
        }
        RoundedDiv::div(self, a, b)
    }

    /// Square root over a value of this format.
    pub fn sqrt(&self, a: &Cfloat) -> Cfloat {
        if a.is_nan() {
            return self.propagate_nan(a);
        }
        if !a.is_zero() && a.sign() == Some(true) {
            return self.invalid_nan(false);
        }
        RoundedSqrt::sqrt(self, a)
    }

    /// Fused multiply-add over values of this format:
    /// `a * b + c` with a single rounding.
    pub fn fma(&self, a: &Cfloat, b: &Cfloat, c: &Cfloat) -> Cfloat {
        if a.is_nan() {
            return self.propagate_nan(a);
        }
        if b.is_nan() {
            return self.propagate_nan(b);
        }
        if c.is_nan() {
            return self.propagate_nan(c);
        }
        if (a.is_infinite() && b.is_zero()) || (a.is_zero() && b.is_infinite()) {
            return self.invalid_nan(false);
        }
        RoundedFMA::fma(self, a, b, c)
    }

    /// Addition with typed errors instead of NaN encodings.
    pub fn try_add(&self, a: &Cfloat, b: &Cfloat) -> Result<Cfloat, ArithmeticError> {
        if a.is_nan() || b.is_nan() {
            return Err(ArithmeticError::OperandIsNar);
        }
        if a.is_infinite() && b.is_infinite() && a.sign() != b.sign() {
            return Err(ArithmeticError::OperandIsNar);
        }
        Ok(RoundedAdd::add(self, a, b))
    }

    /// Subtraction with typed errors instead of NaN encodings.
    pub fn try_sub(&self, a: &Cfloat, b: &Cfloat) -> Result<Cfloat, ArithmeticError> {
        if a.is_nan() || b.is_nan() {
            return Err(ArithmeticError::OperandIsNar);
        }
        if a.is_infinite() && b.is_infinite() && a.sign() == b.sign() {
            return Err(ArithmeticError::OperandIsNar);
        }
        Ok(RoundedSub::sub(self, a, b))
    }

    /// Multiplication with typed errors instead of NaN encodings.
    pub fn try_mul(&self, a: &Cfloat, b: &Cfloat) -> Result<Cfloat, ArithmeticError> {
        if a.is_nan() || b.is_nan() {
            return Err(ArithmeticError::OperandIsNar);
        }
        if (a.is_infinite() && b.is_zero()) || (a.is_zero() && b.is_infinite()) {
            return Err(ArithmeticError::OperandIsNar);
        }
        Ok(RoundedMul::mul(self, a, b))
    }

    /// Division with typed errors instead of NaN or infinity encodings.
    pub fn try_div(&self, a: &Cfloat, b: &Cfloat) -> Result<Cfloat, ArithmeticError> {
        if b.is_nan() {
            return Err(ArithmeticError::DivideByNar);
        }
        if a.is_nan() {
            return Err(ArithmeticError::OperandIsNar);
        }
        if (a.is_zero() && b.is_zero()) || (a.is_infinite() && b.is_infinite()) {
            return Err(ArithmeticError::OperandIsNar);
        }
        if b.is_zero() {
            return Err(ArithmeticError::DivideByZero);
        }
        Ok(RoundedDiv::div(self, a, b))
    }
}

impl RoundedAdd for CfloatContext {
    fn add<N1: Real, N2: Real>(&self, src1: &N1, src2: &N2) -> Self::Format {
        let fbits = self.working_fbits(&[src1.prec(), src2.prec()]);
        let x = BlockTriple::from_real(src1, fbits, TripleOp::Rep);
        let y = BlockTriple::from_real(src2, fbits, TripleOp::Rep);
        self.round(&BlockTriple::add(&x, &y))
    }
}

impl RoundedSub for CfloatContext {
    fn sub<N1: Real, N2: Real>(&self, src1: &N1, src2: &N2) -> Self::Format {
        let fbits = self.working_fbits(&[src1.prec(), src2.prec()]);
        let x = BlockTriple::from_real(src1, fbits, TripleOp::Rep);
        let y = BlockTriple::from_real(src2, fbits, TripleOp::Rep);
        self.round(&BlockTriple::sub(&x, &y))
    }
}

impl RoundedMul for CfloatContext {
    fn mul<N1: Real, N2: Real>(&self, src1: &N1, src2: &N2) -> Self::Format {
        let fbits = self.working_fbits(&[src1.prec(), src2.prec()]);
        let x = BlockTriple::from_real(src1, fbits, TripleOp::Rep);
        let y = BlockTriple::from_real(src2, fbits, TripleOp::Rep);
        self.round(&BlockTriple::mul(&x, &y))
    }
}

impl RoundedDiv for CfloatContext {
    fn div<N1: Real, N2: Real>(&self, src1: &N1, src2: &N2) -> Self::Format {
        let fbits = self.working_fbits(&[src1.prec(), src2.prec()]);
        let x = BlockTriple::from_real(src1, fbits, TripleOp::Rep);
        let y = BlockTriple::from_real(src2, fbits, TripleOp::Rep);
        self.round(&BlockTriple::div(&x, &y))
    }
}

impl RoundedSqrt for CfloatContext {
    fn sqrt<N: Real>(&self, src: &N) -> Self::Format {
        let fbits = self.working_fbits(&[src.prec()]);
        let x = BlockTriple::from_real(src, fbits, TripleOp::Rep);
        self.round(&BlockTriple::sqrt(&x))
    }
}

impl RoundedRecip for CfloatContext {
    fn recip<N: Real>(&self, src: &N) -> Self::Format {
        RoundedDiv::div(self, &RFloat::one(), src)
    }
}

impl RoundedFMA for CfloatContext {
    fn fma<N1, N2, N3>(&self, src1: &N1, src2: &N2, src3: &N3) -> Self::Format
    where
        N1: Real,
        N2: Real,
        N3: Real,
    {
        let fbits = self.working_fbits(&[src1.prec(), src2.prec()]);
        let x = BlockTriple::from_real(src1, fbits, TripleOp::Rep);
        let y = BlockTriple::from_real(src2, fbits, TripleOp::Rep);
        let product = BlockTriple::mul(&x, &y);

        let wide = self.working_fbits(&[product.prec(), src3.prec()]);
        let p = BlockTriple::from_real(&product, wide, TripleOp::Rep);
        let z = BlockTriple::from_real(src3, wide, TripleOp::Rep);
        self.round(&BlockTriple::add(&p, &z))
    }
}

impl Neg for &Cfloat {
    type Output = Cfloat;

    /// Bit-level negation: flips the sign bit, preserving the sign of
    /// zero and the NaN payload. Never rounds.
    fn neg(self) -> Self::Output {
        let num = match &self.num {
            CfloatVal::Zero(s) => CfloatVal::Zero(!s),
            CfloatVal::Subnormal(s, c) => CfloatVal::Subnormal(!s, c.clone()),
            CfloatVal::Normal(s, exp, c) => CfloatVal::Normal(!s, *exp, c.clone()),
            CfloatVal::Infinity(s) => CfloatVal::Infinity(!s),
            CfloatVal::Nan(s, q, p) => CfloatVal::Nan(!s, *q, p.clone()),
        };
        Cfloat {
            num,
            flags: Exceptions::default(),
            ctx: self.ctx().clone(),
        }
    }
}

impl Neg for Cfloat {
    type Output = Cfloat;

    fn neg(self) -> Self::Output {
        -&self
    }
}

impl Cfloat {
    /// Bit-level absolute value: clears the sign bit. Never rounds.
    pub fn abs(&self) -> Cfloat {
        let num = match &self.num {
            CfloatVal::Zero(_) => CfloatVal::Zero(false),
            CfloatVal::Subnormal(_, c) => CfloatVal::Subnormal(false, c.clone()),
            CfloatVal::Normal(_, exp, c) => CfloatVal::Normal(false, *exp, c.clone()),
            CfloatVal::Infinity(_) => CfloatVal::Infinity(false),
            CfloatVal::Nan(s, q, p) => CfloatVal::Nan(*s, *q, p.clone()),
        };
        Cfloat {
            num,
            flags: Exceptions::default(),
            ctx: self.ctx().clone(),
        }
    }
}

// Operator sugar over references; the left-hand context governs.
macro_rules! cfloat_binop {
    ($trait:ident, $imp:ident) => {
        impl $trait for &Cfloat {
            type Output = Cfloat;

            fn $imp(self, rhs: &Cfloat) -> Self::Output {
                assert_eq!(self.ctx(), rhs.ctx(), "mismatched cfloat formats");
                self.ctx().$imp(self, rhs)
            }
        }

        impl $trait for Cfloat {
            type Output = Cfloat;

            fn $imp(self, rhs: Cfloat) -> Self::Output {
                $trait::$imp(&self, &rhs)
            }
        }
    };
}

cfloat_binop!(Add, add);
cfloat_binop!(Sub, sub);
cfloat_binop!(Mul, mul);
cfloat_binop!(Div, div);
