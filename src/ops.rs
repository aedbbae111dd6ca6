/*!
Traits for rounded mathematical operations.

Implementations of these traits operate on [`Real`] types,
rounding the result according to a given [`RoundingContext`].
*/

use crate::{Real, RoundingContext};

macro_rules! rounded_1ary {
    ($trait:ident, $imp:ident, $descr:expr) => {
        #[doc = "Rounded "]
        #[doc = $descr]
        #[doc = " for rounding contexts."]
        pub trait $trait: RoundingContext {
            #[doc = "Performs rounded `"]
            #[doc = $descr]
            #[doc = "`."]
            fn $imp<N: Real>(&self, src: &N) -> Self::Format;
        }
    };
}

// Traits for 1-ary operators
rounded_1ary!(RoundedNeg, neg, "-x");
rounded_1ary!(RoundedAbs, abs, "|x|");
rounded_1ary!(RoundedSqrt, sqrt, "sqrt(x)");
rounded_1ary!(RoundedRecip, recip, "1/x");

macro_rules! rounded_2ary {
    ($trait:ident, $imp:ident, $descr:expr) => {
        #[doc = "Rounded "]
        #[doc = $descr]
        #[doc = " for rounding contexts."]
        pub trait $trait: RoundingContext {
            #[doc = "Performs rounded `"]
            #[doc = $descr]
            #[doc = "`."]
            fn $imp<N1, N2>(&self, src1: &N1, src2: &N2) -> Self::Format
            where
                N1: Real,
                N2: Real;
        }
    };
}

// Traits for 2-ary operators
rounded_2ary!(RoundedAdd, add, "x + y");
rounded_2ary!(RoundedSub, sub, "x - y");
rounded_2ary!(RoundedMul, mul, "x * y");
rounded_2ary!(RoundedDiv, div, "x / y");

macro_rules! rounded_3ary {
    ($trait:ident, $imp:ident, $descr:expr) => {
        #[doc = "Rounded "]
        #[doc = $descr]
        #[doc = " for rounding contexts."]
        pub trait $trait: RoundingContext {
            #[doc = "Performs rounded `"]
            #[doc = $descr]
            #[doc = "`."]
            fn $imp<N1, N2, N3>(&self, src1: &N1, src2: &N2, src3: &N3) -> Self::Format
            where
                N1: Real,
                N2: Real,
                N3: Real;
        }
    };
}

// Traits for 3-ary operators
rounded_3ary!(RoundedFMA, fma, "a*b + c");
