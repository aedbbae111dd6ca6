use std::cmp::Ordering;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use rug::Integer;

use crate::bitblock::BitBlock;
use crate::error::ArithmeticError;

impl BitBlock {
    /// Ripple-carry addition.
    /// Returns the sum within the width and the carry-out bit.
    pub fn carry_add(&self, other: &Self) -> (Self, bool) {
        assert_eq!(self.width(), other.width(), "width mismatch");
        let sum = Integer::from(self.bits() + other.bits());
        let carry = sum.get_bit(self.width() as u32);
        (Self::from_bits(self.width(), sum), carry)
    }

    /// Ripple-borrow subtraction.
    /// Returns the difference within the width and the borrow-out bit.
    pub fn borrow_sub(&self, other: &Self) -> (Self, bool) {
        assert_eq!(self.width(), other.width(), "width mismatch");
        let borrow = self.bits() < other.bits();
        let diff = Integer::from(self.bits() - other.bits());
        (Self::from_bits(self.width(), diff), borrow)
    }

    /// Long multiplication into a block of twice the width.
    /// The product of two `W`-bit values always fits in `2W` bits,
    /// so the result is exact.
    pub fn mul_wide(&self, other: &Self) -> Self {
        assert_eq!(self.width(), other.width(), "width mismatch");
        let product = Integer::from(self.bits() * other.bits());
        Self::from_bits(2 * self.width(), product)
    }

    /// Division producing a quotient and remainder of this width.
    /// Fails if the divisor is zero.
    pub fn div_rem(&self, other: &Self) -> Result<(Self, Self), ArithmeticError> {
        assert_eq!(self.width(), other.width(), "width mismatch");
        if other.is_zero() {
            return Err(ArithmeticError::IntegerDivideByZero);
        }
        let (q, r) = Integer::from(self.bits()).div_rem(Integer::from(other.bits()));
        Ok((
            Self::from_bits(self.width(), q),
            Self::from_bits(self.width(), r),
        ))
    }
}

impl BitAnd for &BitBlock {
    type Output = BitBlock;

    fn bitand(self, rhs: Self) -> Self::Output {
        assert_eq!(self.width(), rhs.width(), "width mismatch");
        BitBlock::from_bits(self.width(), Integer::from(self.bits() & rhs.bits()))
    }
}

impl BitOr for &BitBlock {
    type Output = BitBlock;

    fn bitor(self, rhs: Self) -> Self::Output {
        assert_eq!(self.width(), rhs.width(), "width mismatch");
        BitBlock::from_bits(self.width(), Integer::from(self.bits() | rhs.bits()))
    }
}

impl BitXor for &BitBlock {
    type Output = BitBlock;

    fn bitxor(self, rhs: Self) -> Self::Output {
        assert_eq!(self.width(), rhs.width(), "width mismatch");
        BitBlock::from_bits(self.width(), Integer::from(self.bits() ^ rhs.bits()))
    }
}

impl Not for &BitBlock {
    type Output = BitBlock;

    fn not(self) -> Self::Output {
        self.ones_complement()
    }
}

impl PartialOrd for BitBlock {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.width() == other.width() {
            // unsigned comparison
            Some(self.bits().cmp(other.bits()))
        } else {
            None
        }
    }
}
