use rug::Integer;
use tapernum::cfloat::CfloatContext;
use tapernum::rfloat::RFloat;
use tapernum::{Real, RoundingContext};

fn round32(v: f32) -> tapernum::Cfloat {
    CfloatContext::binary32().round(&RFloat::from(v))
}

#[test]
fn ieee_single_bit_patterns() {
    // 0.1 + 0.2 must produce the IEEE binary32 pattern of 0.3
    let ctx = CfloatContext::binary32();
    let sum = ctx.add(&round32(0.1), &round32(0.2));
    assert_eq!(sum.into_bits(), Integer::from(0x3E99999Au32));

    // spot-check the codec against the native encoding
    assert_eq!(round32(1.0).into_bits(), Integer::from(0x3F800000u32));
    assert_eq!(round32(-2.0).into_bits(), Integer::from(0xC0000000u32));
}

#[test]
fn ieee_single_matches_host() {
    let ctx = CfloatContext::binary32();
    let vals: &[f32] = &[
        0.0,
        1.0,
        -1.0,
        1.5,
        0.1,
        0.2,
        3.14159,
        -0.333333,
        123456.79,
        2.5e-20,
        -7.0e20,
        3.0e38,
        1.0e-40, // subnormal
        f32::MIN_POSITIVE,
        f32::MAX,
    ];

    for &a in vals {
        for &b in vals {
            let x = round32(a);
            let y = round32(b);

            let host = a + b;
            if !host.is_nan() {
                assert_eq!(
                    ctx.add(&x, &y).into_bits(),
                    Integer::from(host.to_bits()),
                    "add mismatch: {} + {}",
                    a,
                    b
                );
            }

            let host = a - b;
            if !host.is_nan() {
                assert_eq!(
                    ctx.sub(&x, &y).into_bits(),
                    Integer::from(host.to_bits()),
                    "sub mismatch: {} - {}",
                    a,
                    b
                );
            }

            let host = a * b;
            if !host.is_nan() {
                assert_eq!(
                    ctx.mul(&x, &y).into_bits(),
                    Integer::from(host.to_bits()),
                    "mul mismatch: {} * {}",
                    a,
                    b
                );
            }

            let host = a / b;
            if !host.is_nan() && b != 0.0 {
                assert_eq!(
                    ctx.div(&x, &y).into_bits(),
                    Integer::from(host.to_bits()),
                    "div mismatch: {} / {}",
                    a,
                    b
                );
            }
        }
    }
}

#[test]
fn f32_round_trip_identity() {
    let ctx = CfloatContext::binary32();
    let vals: &[f32] = &[
        0.0,
        -0.0,
        1.0,
        -1.5,
        0.1,
        f32::MAX,
        f32::MIN_POSITIVE,
        1.0e-40,
        f32::INFINITY,
        f32::NEG_INFINITY,
    ];
    for &v in vals {
        let cf = ctx.from_f32(v);
        assert_eq!(
            cf.to_f32().to_bits(),
            v.to_bits(),
            "round trip failed for {}",
            v
        );
    }

    // NaN payloads may collapse, but NaN-ness survives
    let cf = ctx.from_f32(f32::NAN);
    assert!(cf.to_f32().is_nan());
}

#[test]
fn half_precision_overflow() {
    // binary16: 65504 + 65504 overflows to infinity
    let ctx = CfloatContext::binary16();
    let big = ctx.round(&RFloat::from(65504.0_f64));
    assert_eq!(big.into_bits(), Integer::from(0x7BFFu32), "65504 is maxpos");

    let sum = ctx.add(&big, &big);
    assert_eq!(sum.into_bits(), Integer::from(0x7C00u32));
    assert!(sum.flags().overflow);

    // the same inputs with saturation clamp to maxpos
    let ctx = CfloatContext::binary16().with_saturating(true);
    let big = ctx.round(&RFloat::from(65504.0_f64));
    let sum = ctx.add(&big, &big);
    assert_eq!(sum.into_bits(), Integer::from(0x7BFFu32));
}

#[test]
fn saturating_remaps_non_reals() {
    let ctx = CfloatContext::binary32().with_saturating(true);
    let maxpos = Integer::from(0x7F7FFFFFu32);

    // encoding +Inf saturates to maxpos
    assert_eq!(ctx.round(&RFloat::PosInfinity).into_bits(), maxpos);

    // 0 / 0 saturates instead of encoding NaN
    let zero = ctx.round(&RFloat::zero());
    assert_eq!(ctx.div(&zero, &zero).into_bits(), maxpos);
}

#[test]
fn subnormal_flush() {
    // without gradual underflow, tiny values flush to signed zero
    let ctx = CfloatContext::new(8, 32);
    let tiny = ctx.round(&RFloat::from(-1.0e-40_f32));
    assert!(tiny.is_zero());
    assert_eq!(tiny.sign(), Some(true), "sign is preserved on flush");
    assert!(tiny.flags().underflow);

    // and subnormal encodings decode as zero
    let sub = ctx.bits_to_number(Integer::from(1u32));
    assert!(sub.is_zero());
}

#[test]
fn encoding_round_trip() {
    // every pattern of these formats survives decode/encode
    let byte_formats = [
        CfloatContext::ieee754(5, 8),
        CfloatContext::ieee754(4, 8),
        CfloatContext::new(3, 8)
            .with_subnormals(true)
            .with_supernormals(true),
    ];
    for ctx in byte_formats {
        for i in 0..256u32 {
            let num = ctx.bits_to_number(Integer::from(i));
            assert_eq!(
                num.into_bits(),
                Integer::from(i),
                "round trip failed: ctx={:?}, i={:#x}",
                ctx,
                i
            );
        }
    }

    for ctx in [CfloatContext::binary16(), CfloatContext::bfloat16()] {
        for i in 0..65536u32 {
            let num = ctx.bits_to_number(Integer::from(i));
            assert_eq!(
                num.into_bits(),
                Integer::from(i),
                "round trip failed: ctx={:?}, i={:#x}",
                ctx,
                i
            );
        }
    }
}

#[test]
fn special_value_table() {
    let ctx = CfloatContext::binary32();
    let inf = ctx.inf(false);
    let ninf = ctx.inf(true);
    let zero = ctx.zero(false);
    let one = round32(1.0);

    // Inf - Inf is invalid and signalling
    let r = ctx.sub(&inf, &inf);
    assert_eq!(r.nan_quiet(), Some(false));
    assert!(r.flags().invalid);

    // Inf * 0 and 0 / 0 and Inf / Inf are quiet NaN
    assert_eq!(ctx.mul(&inf, &zero).nan_quiet(), Some(true));
    assert_eq!(ctx.div(&zero, &zero).nan_quiet(), Some(true));
    assert_eq!(ctx.div(&inf, &inf).nan_quiet(), Some(true));

    // x / 0 is a signed infinity with the divide-by-zero flag
    let r = ctx.div(&one, &zero);
    assert_eq!(r.into_bits(), Integer::from(0x7F800000u32));
    assert!(r.flags().divzero);
    let r = ctx.div(&-&one, &zero);
    assert_eq!(r.into_bits(), Integer::from(0xFF800000u32));

    // Inf + Inf of the same sign stays Inf
    assert_eq!(ctx.add(&ninf, &ninf).into_bits(), Integer::from(0xFF800000u32));

    // NaN kinds propagate through arithmetic
    assert_eq!(ctx.add(&ctx.qnan(), &one).nan_quiet(), Some(true));
    assert_eq!(ctx.add(&ctx.snan(), &one).nan_quiet(), Some(false));

    // NaN is unordered; signed zeros are equal
    assert!(ctx.qnan() != ctx.qnan());
    assert!(!(ctx.qnan() < one));
    assert!(ctx.zero(true) == ctx.zero(false));
}

#[test]
fn lattice_stepping() {
    // with subnormals, +0 steps to the smallest subnormal
    let ctx = CfloatContext::binary32();
    assert_eq!(ctx.zero(false).next_up().into_bits(), Integer::from(1u32));

    // without subnormals, +0 jumps over the subnormal encodings
    let ctx = CfloatContext::new(8, 32);
    assert_eq!(
        ctx.zero(false).next_up().into_bits(),
        Integer::from(0x00800000u32)
    );

    // ... and the smallest negative normal steps to -0
    let down = ctx.min_norm(true).next_up();
    assert!(down.is_zero());
    assert_eq!(down.sign(), Some(true));

    // the top of the lattice steps into infinity
    assert_eq!(
        ctx.maxval(false).next_up().into_bits(),
        Integer::from(0x7F800000u32)
    );

    // stepping is invertible across a binade boundary
    let two = ctx.round(&RFloat::pow2(1));
    assert_eq!(
        two.next_down().next_up().into_bits(),
        two.into_bits()
    );
}

#[test]
fn supernormal_range() {
    // es=3, nbits=8 with gradual overflow: the all-ones exponent
    // carries normals, so maxval sits above the standard emax
    let ctx = CfloatContext::new(3, 8)
        .with_subnormals(true)
        .with_supernormals(true);
    assert_eq!(ctx.emax_eff(), ctx.emax() + 1);

    let maxval = ctx.maxval(false);
    let e = maxval.e().unwrap();
    assert_eq!(e, ctx.emax_eff());

    // one step beyond maxval is infinity
    assert!(maxval.next_up().is_infinite());

    // rounding just above maxval overflows to infinity
    let above = RFloat::from(maxval.clone()) + RFloat::pow2(e - 3);
    assert!(ctx.round(&above).is_infinite());
}

#[test]
fn binary_rendering() {
    let ctx = CfloatContext::binary32();
    assert_eq!(
        round32(1.0).to_binary_string(),
        "0b0.01111111.00000000000000000000000"
    );
    assert_eq!(
        round32(-1.5).to_binary_string(),
        "0b1.01111111.10000000000000000000000"
    );

    // non-finite values render symbolically in decimal form
    assert_eq!(format!("{}", ctx.qnan()), "nan");
    assert_eq!(format!("{}", ctx.inf(true)), "-inf");
}

#[test]
fn reciprocal() {
    use tapernum::ops::RoundedRecip;

    let ctx = CfloatContext::binary32();
    let quarter = ctx.recip(&round32(4.0));
    assert_eq!(quarter.into_bits(), Integer::from(0.25f32.to_bits()));

    // 1/3 rounds like the host
    let third = ctx.recip(&round32(3.0));
    assert_eq!(third.into_bits(), Integer::from((1.0f32 / 3.0).to_bits()));

    // 1/0 is a pole
    assert!(ctx.recip(&ctx.zero(false)).is_infinite());
}

#[test]
fn integer_conversion() {
    let ctx = CfloatContext::binary32();
    assert_eq!(round32(3.75).to_i64(), 3);
    assert_eq!(round32(-2.5).to_i64(), -2);
    assert_eq!(round32(0.0).to_i64(), 0);
    assert_eq!(ctx.inf(false).to_i64(), i64::MAX);
    assert_eq!(ctx.qnan().to_i64(), 0);
}
