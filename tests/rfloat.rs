use rug::Integer;
use tapernum::rfloat::{RFloat, RFloatContext};
use tapernum::{Real, RoundingContext, RoundingMode};

#[test]
fn exact_arithmetic() {
    let one = RFloat::one();
    let half = RFloat::Real(false, -1, Integer::from(1));

    // 1 + 1/2 = 3/4 * 2
    let sum = one.clone() + half.clone();
    assert_eq!(sum, RFloat::Real(false, -1, Integer::from(3)));

    // 3/2 * 3/2 = 9/4
    let sq = sum.clone() * sum.clone();
    assert_eq!(sq, RFloat::Real(false, -2, Integer::from(9)));

    // x - x = 0
    assert!((sum.clone() - sum.clone()).is_zero());

    // infinities
    assert!((RFloat::PosInfinity + RFloat::NegInfinity).is_nan());
    assert!((RFloat::PosInfinity * RFloat::zero()).is_nan());
    assert_eq!(
        RFloat::NegInfinity * RFloat::NegInfinity,
        RFloat::PosInfinity
    );
}

#[test]
fn ordering() {
    let a = RFloat::Real(false, -2, Integer::from(5)); // 1.25
    let b = RFloat::Real(false, 0, Integer::from(1)); // 1.0
    assert!(a > b);
    assert!(-a.clone() < b);
    assert!(RFloat::NegInfinity < b);
    assert!(RFloat::PosInfinity > a);

    // NaN is unordered
    assert!(RFloat::Nan.partial_cmp(&b).is_none());
    assert!(RFloat::Nan != RFloat::Nan);

    // zeros compare equal regardless of sign
    assert_eq!(
        RFloat::Real(true, 0, Integer::from(0)),
        RFloat::zero()
    );
}

#[test]
fn native_decomposition() {
    // 1.0 and -2.5 decompose bit-exactly
    assert_eq!(RFloat::from(1.0_f64), RFloat::one());
    assert_eq!(
        RFloat::from(-2.5_f64),
        RFloat::Real(true, -1, Integer::from(5))
    );

    // f32 subnormals are represented faithfully
    let tiny = f32::from_bits(0x0000_0001);
    assert_eq!(RFloat::from(tiny), RFloat::Real(false, -149, Integer::from(1)));

    // specials
    assert!(RFloat::from(f64::NAN).is_nan());
    assert_eq!(RFloat::from(f64::INFINITY), RFloat::PosInfinity);
    assert_eq!(RFloat::from(f32::NEG_INFINITY), RFloat::NegInfinity);

    // integers
    assert_eq!(RFloat::from(-6_i64), RFloat::Real(true, 0, Integer::from(6)));

    // digit access: 2.5 is 10.1 in binary
    let v = RFloat::from(2.5_f64);
    assert_eq!(v.get_bit(1), Some(true));
    assert_eq!(v.get_bit(0), Some(false));
    assert_eq!(v.get_bit(-1), Some(true));
    assert_eq!(v.get_bit(-2), Some(false));
}

#[test]
fn native_round_trip() {
    for v in [0.0, 1.0, -1.5, 0.1, 3.5e300, -4.2e-300, f64::MAX, f64::MIN_POSITIVE] {
        assert_eq!(RFloat::from(v).to_f64(), v, "round trip failed for {}", v);
    }
    for v in [0.1_f32, 65504.0, -1.9e-40] {
        assert_eq!(RFloat::from(v).to_f32(), v, "round trip failed for {}", v);
    }
}

#[test]
fn precision_rounding() {
    // 1.0625 at 5 bits of precision is exact
    let val = RFloat::Real(false, -4, Integer::from(17));
    let ctx = RFloatContext::new().with_max_p(5);
    assert_eq!(ctx.round(&val), val);

    // at 4 bits it rounds to 1.0 (ties to even)
    let ctx = RFloatContext::new().with_max_p(4);
    assert_eq!(ctx.round(&val), RFloat::one());

    // at 4 bits, ties away rounds up to 1.125
    let ctx = RFloatContext::new()
        .with_max_p(4)
        .with_rounding_mode(RoundingMode::NearestTiesAwayZero);
    assert_eq!(ctx.round(&val), RFloat::Real(false, -3, Integer::from(9)));

    // directed rounding
    let ctx = RFloatContext::new()
        .with_max_p(4)
        .with_rounding_mode(RoundingMode::ToPositive);
    assert_eq!(ctx.round(&val), RFloat::Real(false, -3, Integer::from(9)));
}

#[test]
fn split_rounding_bits() {
    use tapernum::Split;

    // 1.0110 in binary, cut above its two lowest digits
    let v = RFloat::Real(false, -4, Integer::from(0b10110));
    let split = Split::new(&v, Some(3), -3);
    assert_eq!(split.n(), -3);
    assert_eq!(*split.num(), RFloat::Real(false, -2, Integer::from(0b101)));
    assert_eq!(*split.lost(), RFloat::pow2(-3));

    // the cut lands exactly on the halfway point
    assert_eq!(split.rs(), (true, false));
    assert_eq!(split.rgs(), (true, false, false));

    // the tie resolves to the even neighbor
    assert_eq!(
        split.round(RoundingMode::NearestTiesToEven),
        RFloat::Real(false, -2, Integer::from(6))
    );
}

#[test]
fn fixed_point_rounding() {
    // rounding at digit -1 makes integers
    let val = RFloat::Real(false, -2, Integer::from(13)); // 3.25
    let ctx = RFloatContext::new().with_min_n(-1);
    assert_eq!(ctx.round(&val), RFloat::Real(false, 0, Integer::from(3)));
}
