use std::cmp::{max, min};

use num_traits::Zero;
use rug::Integer;

use crate::trace_arith;
use crate::triple::{BlockTriple, TripleClass, TripleOp};
use crate::Real;

/// Aligns a significand with LSB weight `exp` to LSB weight `base`.
/// Shifting down folds any discarded digits into a sticky remnant in
/// the lowest kept position, which keeps later rounding decisions
/// intact (round-to-odd).
fn align(c: &Integer, exp: isize, base: isize) -> Integer {
    let d = exp - base;
    if d >= 0 {
        Integer::from(c << (d as u32))
    } else {
        let sh = (-d) as u32;
        if (c.significant_bits()) <= sh {
            // entirely below the kept positions: a bare sticky remnant
            Integer::from(1)
        } else {
            let lost = !c.clone().keep_bits(sh).is_zero();
            let mut a = Integer::from(c >> sh);
            if lost {
                a |= 1;
            }
            a
        }
    }
}

impl BlockTriple {
    /// Addition.
    ///
    /// The operands are aligned to a common LSB weight; an operand too
    /// far below the result's significant digits collapses into a
    /// sticky remnant. The aligned significands are added as signed
    /// integers, so effective subtraction and cancellation fall out of
    /// the same path.
    pub fn add(x: &Self, y: &Self) -> Self {
        assert_eq!(x.fbits, y.fbits, "mismatched working precision");
        let fbits = x.fbits;
        let op = TripleOp::Add;
        use TripleClass::*;
        match (x.class, y.class) {
            (Nan, _) | (_, Nan) => Self::nan(fbits, op),
            (Inf, Inf) => {
                if x.sign == y.sign {
                    Self::inf(x.sign, fbits, op)
                } else {
                    // opposite infinities cancel to an invalid result
                    Self::nan(fbits, op)
                }
            }
            (Inf, _) => Self::inf(x.sign, fbits, op),
            (_, Inf) => Self::inf(y.sign, fbits, op),
            (Zero, Zero) => Self::zero(x.sign && y.sign, fbits, op),
            (Zero, Normal) => Self::from_parts(y.sign, y.exp, y.sig.bits().clone(), fbits, op),
            (Normal, Zero) => Self::from_parts(x.sign, x.exp, x.sig.bits().clone(), fbits, op),
            (Normal, Normal) => {
                // the larger operand always keeps all of its digits;
                // only the smaller one may fold into the sticky remnant
                let e_big = max(x.e().unwrap(), y.e().unwrap());
                let base = max(min(x.exp, y.exp), e_big - (2 * fbits as isize + 6));

                let a1 = align(x.sig.bits(), x.exp, base);
                let a2 = align(y.sig.bits(), y.exp, base);
                let m = match (x.sign, y.sign) {
                    (false, false) => a1 + a2,
                    (false, true) => a1 - a2,
                    (true, false) => a2 - a1,
                    (true, true) => -(a1 + a2),
                };
                trace_arith!("add: base={} m={}", base, m);

                if m.is_zero() {
                    // exact cancellation
                    Self::zero(x.sign && y.sign, fbits, op)
                } else {
                    Self::from_parts(m.is_negative(), base, m.abs(), fbits, op)
                }
            }
        }
    }

    /// Subtraction: addition with the second operand negated.
    pub fn sub(x: &Self, y: &Self) -> Self {
        Self::add(x, &y.neg())
    }

    /// Multiplication: exact double-width product, scales added.
    pub fn mul(x: &Self, y: &Self) -> Self {
        assert_eq!(x.fbits, y.fbits, "mismatched working precision");
        let fbits = x.fbits;
        let op = TripleOp::Mul;
        use TripleClass::*;
        match (x.class, y.class) {
            (Nan, _) | (_, Nan) => Self::nan(fbits, op),
            (Inf, Zero) | (Zero, Inf) => {
                // 0 * Inf is undefined
                Self::nan(fbits, op)
            }
            (Inf, _) | (_, Inf) => Self::inf(x.sign != y.sign, fbits, op),
            (Zero, _) | (_, Zero) => Self::zero(x.sign != y.sign, fbits, op),
            (Normal, Normal) => {
                let product = x.sig.mul_wide(&y.sig);
                trace_arith!("mul: exp={} p={}", x.exp + y.exp, product.bits());
                Self::from_parts(
                    x.sign != y.sign,
                    x.exp + y.exp,
                    product.into_bits(),
                    fbits,
                    op,
                )
            }
        }
    }

    /// Division: the quotient is developed to the full context width,
    /// with an inexact remainder folded into the lowest quotient bit
    /// (round-to-odd), preserving every later rounding decision.
    pub fn div(x: &Self, y: &Self) -> Self {
        assert_eq!(x.fbits, y.fbits, "mismatched working precision");
        let fbits = x.fbits;
        let op = TripleOp::Div;
        let sign = x.sign != y.sign;
        use TripleClass::*;
        match (x.class, y.class) {
            (Nan, _) | (_, Nan) => Self::nan(fbits, op),
            (Inf, Inf) => Self::nan(fbits, op),
            (Inf, _) => Self::inf(sign, fbits, op),
            (_, Inf) => Self::zero(sign, fbits, op),
            (Zero, Zero) => Self::nan(fbits, op),
            (Zero, Normal) => Self::zero(sign, fbits, op),
            (Normal, Zero) => Self::inf(sign, fbits, op),
            (Normal, Normal) => {
                let w = op.width(fbits) as isize;
                let px = x.prec().unwrap() as isize;
                let py = y.prec().unwrap() as isize;

                // scale the dividend so the quotient carries w-1 or w
                // significant bits
                let k = (w - 1) + py - px;
                let scaled = Integer::from(x.sig.bits() << (k as u32));
                let (mut q, r) = scaled.div_rem(y.sig.bits().clone());
                if !r.is_zero() {
                    q |= 1;
                }
                trace_arith!("div: k={} q={}", k, q);
                Self::from_parts(sign, x.exp - y.exp - k, q, fbits, op)
            }
        }
    }

    /// Square root with round-to-odd truncation.
    /// Negative inputs (other than zero) are invalid.
    pub fn sqrt(x: &Self) -> Self {
        let fbits = x.fbits;
        let op = TripleOp::Div;
        use TripleClass::*;
        match x.class {
            Nan => Self::nan(fbits, op),
            Inf => {
                if x.sign {
                    Self::nan(fbits, op)
                } else {
                    Self::inf(false, fbits, op)
                }
            }
            Zero => Self::zero(x.sign, fbits, op),
            Normal => {
                if x.sign {
                    return Self::nan(fbits, op);
                }
                let p = x.prec().unwrap() as isize;
                let w = 2 * fbits as isize + 6;

                // widen until the root has enough digits and the
                // exponent of the radicand is even
                let mut t = max(0, 2 * w - p);
                if (x.exp - t) % 2 != 0 {
                    t += 1;
                }
                let scaled = Integer::from(x.sig.bits() << (t as u32));
                let (mut s, r) = scaled.sqrt_rem(Integer::new());
                if !r.is_zero() {
                    s |= 1;
                }
                Self::from_parts(false, (x.exp - t) / 2, s, fbits, op)
            }
        }
    }
}
