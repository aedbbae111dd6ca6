use rug::Integer;
use tapernum::ops::*;
use tapernum::posit::PositContext;
use tapernum::rfloat::RFloat;
use tapernum::{ArithmeticError, Real, RoundingContext};

fn bits_to_rfloat(ctx: &PositContext, i: usize) -> RFloat {
    RFloat::from(ctx.bits_to_number(Integer::from(i)))
}

#[test]
fn enumerate() {
    // posit<2, 6> format, positive half
    let ctx = PositContext::new(2, 6);
    let pos_vals = [
        RFloat::zero(),
        RFloat::Real(false, -16, Integer::from(1)), // (false, -4, 0, 1)
        RFloat::Real(false, -12, Integer::from(1)), // (false, -3, 0, 1)
        RFloat::Real(false, -10, Integer::from(1)), // (false, -3, 2, 1)
        RFloat::Real(false, -8, Integer::from(1)),  // (false, -2, 0, 1)
        RFloat::Real(false, -7, Integer::from(1)),  // (false, -2, 1, 1)
        RFloat::Real(false, -6, Integer::from(1)),  // (false, -2, 2, 1)
        RFloat::Real(false, -5, Integer::from(1)),  // (false, -2, 3, 1)
        RFloat::Real(false, -5, Integer::from(2)),  // (false, -1, -1, 2)
        RFloat::Real(false, -5, Integer::from(3)),  // (false, -1, -1, 3)
        RFloat::Real(false, -4, Integer::from(2)),  // (false, -1, 0, 2)
        RFloat::Real(false, -4, Integer::from(3)),  // (false, -1, 0, 3)
        RFloat::Real(false, -3, Integer::from(2)),  // (false, -1, 1, 2)
        RFloat::Real(false, -3, Integer::from(3)),  // (false, -1, 1, 3)
        RFloat::Real(false, -2, Integer::from(2)),  // (false, -1, 2, 2)
        RFloat::Real(false, -2, Integer::from(3)),  // (false, -1, 2, 3)
        RFloat::Real(false, -1, Integer::from(2)),  // (false, 0, -1, 2)
        RFloat::Real(false, -1, Integer::from(3)),  // (false, 0, -1, 3)
        RFloat::Real(false, 0, Integer::from(2)),   // (false, 0, 0, 2)
        RFloat::Real(false, 0, Integer::from(3)),   // (false, 0, 0, 3)
        RFloat::Real(false, 1, Integer::from(2)),   // (false, 0, 1, 2)
        RFloat::Real(false, 1, Integer::from(3)),   // (false, 0, 1, 3)
        RFloat::Real(false, 2, Integer::from(2)),   // (false, 0, 2, 2)
        RFloat::Real(false, 2, Integer::from(3)),   // (false, 0, 2, 3)
        RFloat::Real(false, 4, Integer::from(1)),   // (false, 1, 0, 1)
        RFloat::Real(false, 5, Integer::from(1)),   // (false, 1, 1, 1)
        RFloat::Real(false, 6, Integer::from(1)),   // (false, 1, 2, 1)
        RFloat::Real(false, 7, Integer::from(1)),   // (false, 1, 3, 1)
        RFloat::Real(false, 8, Integer::from(1)),   // (false, 2, 0, 1)
        RFloat::Real(false, 10, Integer::from(1)),  // (false, 2, 2, 1)
        RFloat::Real(false, 12, Integer::from(1)),  // (false, 3, 0, 1)
        RFloat::Real(false, 16, Integer::from(1)),  // (false, 4, 0, 1)
    ];

    for (i, v) in pos_vals.iter().enumerate() {
        let num = bits_to_rfloat(&ctx, i);
        assert_eq!(
            num.clone(),
            v.clone(),
            "failed conversion: i={}, v={:?}, e={:?}",
            i,
            num,
            v
        );
    }

    // the encoding at the sign boundary is NaR
    assert!(bits_to_rfloat(&ctx, 32).is_nar());

    // the negative half mirrors the positive half: the encoding of -x
    // is the two's complement of the encoding of x
    for i in 1..32usize {
        let pos = bits_to_rfloat(&ctx, i);
        let neg = bits_to_rfloat(&ctx, 64 - i);
        assert_eq!(
            neg.clone(),
            -pos.clone(),
            "failed negation symmetry: i={}, pos={:?}, neg={:?}",
            i,
            pos,
            neg
        );
    }
}

#[test]
fn round_trip() {
    for (es, nbits) in [(0, 8), (1, 8), (2, 6), (2, 8), (1, 12), (3, 12)] {
        let ctx = PositContext::new(es, nbits);
        for i in 0..(1usize << ctx.nbits()) {
            let num = ctx.bits_to_number(Integer::from(i));
            let j = num.clone().into_bits();
            assert_eq!(
                Integer::from(i),
                j,
                "round trip failed: es={}, nbits={}, i={}, num={:?}",
                es,
                nbits,
                i,
                num
            );
        }
    }
}

#[test]
fn bounds() {
    // posit<2, 8> format
    let ctx = PositContext::new(2, 8);
    assert_eq!(ctx.useed(), 16);
    assert_eq!(
        RFloat::from(ctx.maxpos()),
        RFloat::Real(false, 24, Integer::from(1))
    );
    assert_eq!(
        RFloat::from(ctx.minpos()),
        RFloat::Real(false, -24, Integer::from(1))
    );

    // posit<3, 8> format
    let ctx = PositContext::new(3, 8);
    assert_eq!(ctx.useed(), 256);
    assert_eq!(
        RFloat::from(ctx.maxval(false)),
        RFloat::Real(false, 48, Integer::from(1))
    );
    assert_eq!(
        RFloat::from(ctx.minval(false)),
        RFloat::Real(false, -48, Integer::from(1))
    );
}

#[test]
fn round_small() {
    let ctx = PositContext::new(2, 8);

    // rounding NaN
    let rounded_nan = ctx.round(&RFloat::Nan);
    assert!(rounded_nan.is_nar(), "round(NaN) = NaR");

    // rounding +/- Inf
    assert!(ctx.round(&RFloat::PosInfinity).is_nar(), "round(+Inf) = NaR");
    assert!(ctx.round(&RFloat::NegInfinity).is_nar(), "round(-Inf) = NaR");

    // rounding 0
    let rounded_zero = ctx.round(&RFloat::zero());
    assert!(rounded_zero.is_zero(), "round(+0) = +0");

    // rounding MAXPOS + 1 saturates
    let maxp1 = RFloat::from(ctx.maxpos()) + RFloat::one();
    assert_eq!(ctx.round(&maxp1), ctx.maxpos(), "round(MAXPOS+1) = MAXPOS");

    // rounding MINPOS / 2 saturates inward
    let minpos = RFloat::from(ctx.minpos());
    let tiny = RFloat::Real(false, minpos.exp().unwrap() - 1, Integer::from(1));
    assert_eq!(ctx.round(&tiny), ctx.minpos(), "round(MINPOS/2) = MINPOS");

    // rounding +1
    let one = RFloat::one();
    let rounded_one = ctx.round(&one);
    assert_eq!(RFloat::from(rounded_one), one, "round(+1) = +1");

    // rounding +1.0625 towards +1
    let one_1_16 = RFloat::Real(false, -4, Integer::from(17));
    let rounded = ctx.round(&one_1_16);
    assert_eq!(RFloat::from(rounded), one, "round(+1.0625) = +1");

    // rounding +1.1875 towards +1.25
    let one_3_16 = RFloat::Real(false, -4, Integer::from(19));
    let rounded = ctx.round(&one_3_16);
    assert_eq!(
        RFloat::from(rounded),
        RFloat::Real(false, -4, Integer::from(20)),
        "round(+1.1875) = +1.25"
    );
}

#[test]
fn add_p16e1() {
    let ctx = PositContext::new(1, 16);
    let one = ctx.bits_to_number(Integer::from(0x4000));
    assert_eq!(RFloat::from(one.clone()), RFloat::one());

    // 1.0 + 1.0 = 2.0
    let two = &one + &one;
    assert_eq!(two.clone().into_bits(), Integer::from(0x5000));

    // halfway cases: 1 + 2^-13 ties to even (down), 1 + 3*2^-14 rounds up
    let sum = ctx.add(&one, &RFloat::pow2(-13));
    assert_eq!(sum.into_bits(), Integer::from(0x4000));
    let sum = ctx.add(&one, &RFloat::Real(false, -14, Integer::from(3)));
    assert_eq!(sum.into_bits(), Integer::from(0x4001));
}

#[test]
fn mul_saturates_p8e0() {
    let ctx = PositContext::new(0, 8);
    let p64 = ctx.round(&RFloat::Real(false, 6, Integer::from(1)));
    assert_eq!(p64.clone().into_bits(), Integer::from(0x7f), "64 is maxpos");

    // 64 * 64 exceeds the lattice: saturate to maxpos
    let prod = &p64 * &p64;
    assert_eq!(prod.into_bits(), Integer::from(0x7f));

    // -64 * 64 saturates to maxneg
    let n64 = -&p64;
    let prod = &n64 * &p64;
    assert_eq!(prod.into_bits(), Integer::from(0x81));
}

#[test]
fn far_alignment() {
    // adding a value far below the working precision only nudges the
    // sticky bit; the sum still rounds correctly
    let ctx = PositContext::new(2, 32);
    let one = ctx.round(&RFloat::one());
    let minpos = ctx.minpos();

    let sum = ctx.add(&one, &minpos);
    assert_eq!(RFloat::from(sum), RFloat::one(), "1 + minpos = 1");

    let diff = ctx.sub(&one, &minpos);
    assert_eq!(RFloat::from(diff), RFloat::one(), "1 - minpos = 1");
}

#[test]
fn division() {
    let ctx = PositContext::new(1, 16);
    let six = ctx.round(&RFloat::Real(false, -1, Integer::from(12)));
    let three = ctx.round(&RFloat::Real(false, 0, Integer::from(3)));
    let two = &six / &three;
    assert_eq!(two.into_bits(), Integer::from(0x5000));

    // inexact quotient: 1/3 rounds to the nearest posit
    let one = ctx.round(&RFloat::one());
    let third = &one / &three;
    let expected = ctx.round(&RFloat::from(1.0 / 3.0));
    assert_eq!(third.into_bits(), expected.into_bits());
}

#[test]
fn division_errors() {
    let ctx = PositContext::new(1, 16);
    let one = ctx.round(&RFloat::one());
    let zero = ctx.zero();
    let nar = ctx.nar();

    assert_eq!(
        ctx.try_div(&one, &zero).unwrap_err(),
        ArithmeticError::DivideByZero
    );
    assert_eq!(
        ctx.try_div(&one, &nar).unwrap_err(),
        ArithmeticError::DivideByNar
    );
    assert_eq!(
        ctx.try_div(&nar, &one).unwrap_err(),
        ArithmeticError::OperandIsNar
    );

    // the operator surface folds every failure onto NaR
    assert!((&one / &zero).is_nar());
    assert!((&zero / &zero).is_nar());
    assert!((&one / &nar).is_nar());
}

#[test]
fn nar_propagation() {
    let ctx = PositContext::new(1, 16);
    let one = ctx.round(&RFloat::one());
    let nar = ctx.nar();

    assert!((&nar + &one).is_nar(), "NaR + 1 = NaR");
    assert!((&nar * &one).is_nar(), "NaR * 1 = NaR");
    assert!((-&nar).is_nar(), "-NaR = NaR");

    // comparisons involving NaR are all false except inequality
    assert!(nar != nar.clone());
    assert!(!(nar < one) && !(nar > one) && !(nar == one));
}

#[test]
fn sqrt_and_recip() {
    let ctx = PositContext::new(1, 16);
    let four = ctx.round(&RFloat::Real(false, 2, Integer::from(1)));
    let two = ctx.sqrt(&four);
    assert_eq!(two.into_bits(), Integer::from(0x5000));

    // sqrt of a negative value or NaR is NaR
    assert!(ctx.sqrt(&-&four).is_nar());
    assert!(ctx.sqrt(&ctx.nar()).is_nar());

    // reciprocal of an exact power of two is exact both ways
    let half = ctx.recip(&ctx.round(&RFloat::Real(false, 1, Integer::from(1))));
    assert_eq!(RFloat::from(half.clone()), RFloat::pow2(-1));
    let two = ctx.recip(&half);
    assert_eq!(RFloat::from(two), RFloat::pow2(1));

    // 1/0 is NaR
    assert!(ctx.recip(&ctx.zero()).is_nar());
}

#[test]
fn fused_multiply_add() {
    let ctx = PositContext::new(1, 16);
    let two = ctx.round(&RFloat::pow2(1));
    let three = ctx.round(&RFloat::Real(false, 0, Integer::from(3)));
    let one = ctx.round(&RFloat::one());

    let seven = ctx.fma(&two, &three, &one);
    assert_eq!(
        RFloat::from(seven),
        RFloat::Real(false, 0, Integer::from(7))
    );
}

#[test]
fn commutativity_p8e0() {
    let ctx = PositContext::new(0, 8);
    for i in 0..256usize {
        let a = ctx.bits_to_number(Integer::from(i));
        for j in (i..256).step_by(3) {
            let b = ctx.bits_to_number(Integer::from(j));
            let ab = ctx.add(&a, &b).into_bits();
            let ba = ctx.add(&b, &a).into_bits();
            assert_eq!(ab, ba, "addition must commute: i={}, j={}", i, j);

            let ab = ctx.mul(&a, &b).into_bits();
            let ba = ctx.mul(&b, &a).into_bits();
            assert_eq!(ab, ba, "multiplication must commute: i={}, j={}", i, j);
        }
    }
}

#[test]
fn negation_involution() {
    let ctx = PositContext::new(1, 8);
    for i in 0..256usize {
        let p = ctx.bits_to_number(Integer::from(i));
        let q = -&(-&p);
        assert_eq!(
            p.clone().into_bits(),
            q.into_bits(),
            "-(-p) must equal p: i={}",
            i
        );
    }
}

#[test]
fn lattice_stepping() {
    let ctx = PositContext::new(0, 8);

    // the encoding just below NaR advances to NaR
    let maxpos = ctx.maxpos();
    assert_eq!(maxpos.clone().into_bits(), Integer::from(0x7f));
    assert!(maxpos.next_up().is_nar());

    // NaR advances to the most negative encoding
    assert_eq!(ctx.nar().next_up().into_bits(), Integer::from(0x81));

    // stepping up then down is the identity on every encoding
    for i in 0..256usize {
        let p = ctx.bits_to_number(Integer::from(i));
        assert_eq!(
            p.next_up().next_down().into_bits(),
            Integer::from(i),
            "next_up/next_down round trip failed: i={}",
            i
        );
    }

    // zero steps to minpos
    assert_eq!(ctx.zero().next_up().into_bits(), ctx.minpos().into_bits());
}

#[test]
fn text_format() {
    let ctx = PositContext::new(1, 16);
    let one = ctx.round(&RFloat::one());
    assert_eq!(format!("{}", one), "16.1x4000p");
    assert_eq!(format!("{}", ctx.zero()), "0");
    assert_eq!(format!("{}", ctx.nar()), "nar");

    // exact form round trips
    let parsed = ctx.parse("16.1x4000p").unwrap();
    assert_eq!(parsed.into_bits(), Integer::from(0x4000));
    assert!(ctx.parse("nar").unwrap().is_nar());

    // decimal literals go through f64
    let half = ctx.parse("0.5").unwrap();
    assert_eq!(half.into_bits(), Integer::from(0x3000));

    // mismatched formats are rejected
    assert!(ctx.parse("8.0x40p").is_none());
}

#[test]
fn native_conversions() {
    let ctx = PositContext::new(1, 16);
    let p = ctx.round(&RFloat::from(1.5_f64));
    assert_eq!(p.to_f64(), 1.5);

    let p = ctx.round(&RFloat::from(-12_i64));
    assert_eq!(p.to_f64(), -12.0);
}
