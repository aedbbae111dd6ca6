use rug::Integer;

use crate::bitblock::BitBlock;
use crate::posit::{Posit, PositContext};
use crate::rfloat::RFloat;
use crate::{Real, RoundingContext};

/// A fixed-point accumulator for exact sums of posit products.
///
/// The magnitude is an unsigned fixed-point value with the radix point
/// at `half_range`; the sign is tracked separately (sign-magnitude).
/// The layout is three contiguous segments: `half_range` fraction bits,
/// `half_range + 1` integer bits, and `capacity` overflow headroom.
#[derive(Clone, Debug)]
pub struct Quire {
    pub(crate) sign: bool,
    pub(crate) magnitude: BitBlock,
    pub(crate) ctx: PositContext,
    pub(crate) capacity: usize,
}

impl Quire {
    /// Default capacity: the power-of-two number of `maxpos^2`
    /// accumulations the quire is guaranteed to absorb.
    pub const DEFAULT_CAPACITY: usize = 30;

    /// Constructs a cleared quire for a posit format with the default
    /// capacity.
    pub fn new(ctx: PositContext) -> Self {
        Self::with_capacity(ctx, Self::DEFAULT_CAPACITY)
    }

    /// Constructs a cleared quire for a posit format with an explicit
    /// capacity.
    pub fn with_capacity(ctx: PositContext, capacity: usize) -> Self {
        assert!(capacity >= 1, "capacity must be at least 1 bit");
        let qbits = ctx.rscale() as usize * (4 * ctx.nbits() - 8) + 1 + capacity;
        Self {
            sign: false,
            magnitude: BitBlock::new(qbits),
            ctx,
            capacity,
        }
    }

    /// The posit format this quire accumulates for.
    pub fn ctx(&self) -> &PositContext {
        &self.ctx
    }

    /// The capacity headroom in bits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Dynamic range of the accumulator in bits, excluding capacity.
    pub fn range(&self) -> usize {
        self.ctx.rscale() as usize * (4 * self.ctx.nbits() - 8)
    }

    /// Position of the radix point within the magnitude.
    pub fn half_range(&self) -> usize {
        self.range() / 2
    }

    /// Largest value scale this quire accepts.
    pub fn max_scale(&self) -> isize {
        self.half_range() as isize
    }

    /// Smallest value scale this quire accepts.
    pub fn min_scale(&self) -> isize {
        -(self.half_range() as isize)
    }

    /// The fraction segment: the bits below the radix point.
    pub fn lower(&self) -> BitBlock {
        self.magnitude.lo(self.half_range())
    }

    /// The integer segment: the bits at and above the radix point,
    /// below the capacity headroom.
    pub fn upper(&self) -> BitBlock {
        self.magnitude
            .shr(self.half_range())
            .lo(self.half_range() + 1)
    }

    /// The capacity segment: the overflow headroom.
    pub fn capacity_bits(&self) -> BitBlock {
        self.magnitude.shr(self.range() + 1).lo(self.capacity)
    }

    /// Resets the accumulator to zero.
    pub fn clear(&mut self) {
        self.sign = false;
        self.magnitude = BitBlock::new(self.magnitude.width());
    }

    /// Magnitude negation; cheap because the sign is explicit.
    pub fn negate(&mut self) {
        if !self.magnitude.is_zero() {
            self.sign = !self.sign;
        }
    }

    /// Rounds the accumulated value back to a posit.
    /// This is the single rounding of a fused sequence.
    pub fn to_posit(&self) -> Posit {
        self.ctx.round(self)
    }
}

impl Real for Quire {
    fn radix() -> usize {
        2
    }

    fn sign(&self) -> Option<bool> {
        Some(self.sign)
    }

    fn exp(&self) -> Option<isize> {
        if self.magnitude.is_zero() {
            None
        } else {
            Some(-(self.half_range() as isize))
        }
    }

    fn e(&self) -> Option<isize> {
        self.exp()
            .map(|exp| (exp - 1) + self.magnitude.bits().significant_bits() as isize)
    }

    fn n(&self) -> Option<isize> {
        self.exp().map(|exp| exp - 1)
    }

    fn c(&self) -> Option<Integer> {
        if self.magnitude.is_zero() {
            None
        } else {
            Some(self.magnitude.bits().clone())
        }
    }

    fn m(&self) -> Option<Integer> {
        self.c().map(|c| if self.sign { -c } else { c })
    }

    fn prec(&self) -> Option<usize> {
        if self.magnitude.is_zero() {
            None
        } else {
            Some(self.magnitude.bits().significant_bits() as usize)
        }
    }

    fn is_nar(&self) -> bool {
        false
    }

    fn is_finite(&self) -> bool {
        true
    }

    fn is_infinite(&self) -> bool {
        false
    }

    fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    fn is_negative(&self) -> Option<bool> {
        if self.magnitude.is_zero() {
            None
        } else {
            Some(self.sign)
        }
    }

    fn is_numerical(&self) -> bool {
        true
    }
}

impl From<&Quire> for RFloat {
    fn from(q: &Quire) -> Self {
        if q.is_zero() {
            RFloat::zero()
        } else {
            RFloat::Real(
                q.sign,
                -(q.half_range() as isize),
                q.magnitude.bits().clone(),
            )
        }
    }
}
