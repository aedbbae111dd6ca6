use rug::Integer;

use crate::bitblock::BitBlock;
use crate::rfloat::RFloat;
use crate::Real;

/// Operator context of a [`BlockTriple`].
///
/// The context fixes the significand width for a working fraction
/// width of `fbits` so that the corresponding kernel never discards
/// information it cannot summarize in a sticky bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripleOp {
    /// Bare representation: the hidden bit plus `fbits` fraction bits.
    Rep,
    /// Addition/subtraction: room for both aligned operands,
    /// the carry bit, and the sticky remnant of a far-shifted operand.
    Add,
    /// Multiplication: the exact double-width product.
    Mul,
    /// Division: enough quotient bits to preserve every rounding
    /// decision of the target formats.
    Div,
}

impl TripleOp {
    /// Significand width of this context for fraction width `fbits`.
    pub fn width(&self, fbits: usize) -> usize {
        match self {
            TripleOp::Rep => fbits + 1,
            TripleOp::Add => 2 * fbits + 8,
            TripleOp::Mul => 2 * fbits + 2,
            TripleOp::Div => 3 * fbits + 4,
        }
    }
}

/// Classification of a [`BlockTriple`]; exactly one state holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripleClass {
    Zero,
    Normal,
    Inf,
    Nan,
}

/// A normalized `(sign, scale, significand)` value with a fixed-width
/// significand, parameterized by the operator context it feeds.
///
/// The represented value is `(-1)^sign * sig * 2^exp` where `exp` is
/// the weight of the significand's least significant bit. The radix
/// position within the significand is explicit metadata derived from
/// `exp`, not implied by the context.
///
/// [`BlockTriple`] implements [`Real`], so any kernel result can be
/// handed directly to a codec's rounding context.
#[derive(Clone, Debug)]
pub struct BlockTriple {
    pub(crate) class: TripleClass,
    pub(crate) sign: bool,
    pub(crate) exp: isize,
    pub(crate) sig: BitBlock,
    pub(crate) fbits: usize,
    pub(crate) op: TripleOp,
}

impl BlockTriple {
    /// Constructs a NaN triple.
    pub fn nan(fbits: usize, op: TripleOp) -> Self {
        Self {
            class: TripleClass::Nan,
            sign: false,
            exp: 0,
            sig: BitBlock::new(op.width(fbits)),
            fbits,
            op,
        }
    }

    /// Constructs a signed infinity triple.
    pub fn inf(sign: bool, fbits: usize, op: TripleOp) -> Self {
        Self {
            class: TripleClass::Inf,
            sign,
            exp: 0,
            sig: BitBlock::new(op.width(fbits)),
            fbits,
            op,
        }
    }

    /// Constructs a signed zero triple.
    pub fn zero(sign: bool, fbits: usize, op: TripleOp) -> Self {
        Self {
            class: TripleClass::Zero,
            sign,
            exp: 0,
            sig: BitBlock::new(op.width(fbits)),
            fbits,
            op,
        }
    }

    /// Constructs a finite, non-zero triple from its parts.
    /// The significand must fit the width of the context.
    pub(crate) fn from_parts(
        sign: bool,
        exp: isize,
        c: Integer,
        fbits: usize,
        op: TripleOp,
    ) -> Self {
        let width = op.width(fbits);
        assert!(
            c.significant_bits() as usize <= width,
            "significand of {} bits exceeds context width {}",
            c.significant_bits(),
            width
        );
        Self {
            class: TripleClass::Normal,
            sign,
            exp,
            sig: BitBlock::from_bits(width, c),
            fbits,
            op,
        }
    }

    /// Decodes any [`Real`] into a triple for the given context.
    /// The value's precision must be at most `fbits + 1`.
    pub fn from_real<T: Real>(val: &T, fbits: usize, op: TripleOp) -> Self {
        if !val.is_numerical() {
            Self::nan(fbits, op)
        } else if val.is_infinite() {
            Self::inf(val.sign().unwrap(), fbits, op)
        } else if val.is_zero() {
            Self::zero(val.sign().unwrap_or(false), fbits, op)
        } else {
            assert!(
                val.prec().unwrap() <= fbits + 1,
                "operand precision {} exceeds working precision {}",
                val.prec().unwrap(),
                fbits + 1
            );
            Self::from_parts(
                val.sign().unwrap(),
                val.exp().unwrap(),
                val.c().unwrap(),
                fbits,
                op,
            )
        }
    }

    /// The operator context of this triple.
    pub fn op(&self) -> TripleOp {
        self.op
    }

    /// The working fraction width of this triple.
    pub fn fbits(&self) -> usize {
        self.fbits
    }

    /// The significand as a fixed-width bit array.
    pub fn sig(&self) -> &BitBlock {
        &self.sig
    }

    /// Classification of this triple.
    pub fn class(&self) -> TripleClass {
        self.class
    }

    /// Returns true if this triple is NaN.
    pub fn is_nan(&self) -> bool {
        self.class == TripleClass::Nan
    }

    /// Unary negation; exact.
    pub fn neg(&self) -> Self {
        let mut result = self.clone();
        if result.class != TripleClass::Nan {
            result.sign = !result.sign;
        }
        result
    }
}

impl Real for BlockTriple {
    fn radix() -> usize {
        2
    }

    fn sign(&self) -> Option<bool> {
        match self.class {
            TripleClass::Nan => None,
            _ => Some(self.sign),
        }
    }

    fn exp(&self) -> Option<isize> {
        match self.class {
            TripleClass::Normal => Some(self.exp),
            _ => None,
        }
    }

    fn e(&self) -> Option<isize> {
        match self.class {
            TripleClass::Normal => {
                Some((self.exp - 1) + self.sig.bits().significant_bits() as isize)
            }
            _ => None,
        }
    }

    fn n(&self) -> Option<isize> {
        self.exp().map(|exp| exp - 1)
    }

    fn c(&self) -> Option<Integer> {
        match self.class {
            TripleClass::Normal => Some(self.sig.bits().clone()),
            _ => None,
        }
    }

    fn m(&self) -> Option<Integer> {
        self.c().map(|c| if self.sign { -c } else { c })
    }

    fn prec(&self) -> Option<usize> {
        match self.class {
            TripleClass::Normal => Some(self.sig.bits().significant_bits() as usize),
            _ => None,
        }
    }

    fn is_nar(&self) -> bool {
        matches!(self.class, TripleClass::Inf | TripleClass::Nan)
    }

    fn is_finite(&self) -> bool {
        matches!(self.class, TripleClass::Zero | TripleClass::Normal)
    }

    fn is_infinite(&self) -> bool {
        self.class == TripleClass::Inf
    }

    fn is_zero(&self) -> bool {
        self.class == TripleClass::Zero
    }

    fn is_negative(&self) -> Option<bool> {
        match self.class {
            TripleClass::Zero | TripleClass::Nan => None,
            _ => Some(self.sign),
        }
    }

    fn is_numerical(&self) -> bool {
        self.class != TripleClass::Nan
    }
}

impl From<BlockTriple> for RFloat {
    fn from(value: BlockTriple) -> Self {
        match value.class {
            TripleClass::Zero => RFloat::zero(),
            TripleClass::Normal => {
                RFloat::Real(value.sign, value.exp, value.sig.into_bits())
            }
            TripleClass::Inf => {
                if value.sign {
                    RFloat::NegInfinity
                } else {
                    RFloat::PosInfinity
                }
            }
            TripleClass::Nan => RFloat::Nan,
        }
    }
}
