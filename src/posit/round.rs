use std::cmp::max;

use num_traits::{One, Zero};
use rug::Integer;

use crate::bitblock::BitBlock;
use crate::rfloat::RFloat;
use crate::util::bitmask;
use crate::{trace_arith, Real, RoundingContext};

use super::{Posit, PositVal};

/// Rounding contexts for posit numbers.
///
/// The associated storage type is [`Posit`].
///
/// Values rounded under this context are posit numbers as described
/// by the Posit standard: base 2 scientific numbers
/// `(-1)^s * c * 2^e * (2^2^es)^r` where `c` is an unsigned integer,
/// `r` and `e` are integers. The key property of posit numbers
/// is that the precision of `c` and `e` changes based on the value
/// of `r`. In general, `c` and `e` are large when `r` is near 0
/// and small (or zero) when `r` is large or small. In posit
/// terminology, the value `2^2^es` is called `useed`.
///
/// A [`PositContext`] is parameterized by
///
///  - maximum bitwidth of the exponent field,
///  - total bitwidth of the encoding.
///
/// Values between the smallest and largest magnitude round to nearest,
/// ties to even, decided on the untruncated encoding. Values beyond
/// the largest (smallest) magnitude saturate to `maxpos` (`minpos`)
/// with the sign preserved; they never overflow to NaR or underflow
/// to zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositContext {
    es: usize,
    nbits: usize,
}

impl PositContext {
    /// Implementation limit: maximum exponent size.
    pub const ES_MAX: usize = 32;
    /// Implementation limit: minimum additional bitwidth.
    pub const PAD_MIN: usize = 3;

    pub fn new(es: usize, nbits: usize) -> Self {
        assert!(
            es <= Self::ES_MAX,
            "exponent width needs to be at most {} bits, given {} bits",
            Self::ES_MAX,
            es
        );
        assert!(
            nbits >= es + Self::PAD_MIN,
            "total bitwidth needs to be at least {} bits, given {} bits",
            es + Self::PAD_MIN,
            nbits
        );

        Self { es, nbits }
    }

    /// Returns the maximum exponent-field bitwidth of the format
    /// produced by this context.
    pub fn es(&self) -> usize {
        self.es
    }

    /// Returns the total bitwidth of the format produced by this
    /// context (when viewed as a bitvector).
    pub fn nbits(&self) -> usize {
        self.nbits
    }

    /// Returns the maximum precision allowed by this format.
    pub fn max_p(&self) -> usize {
        self.nbits - self.es - 3
    }

    /// Posit terminology for `2^2^es`.
    pub fn useed(&self) -> isize {
        (1_usize << (1 << self.es)) as isize
    }

    /// The per-regime exponent scale `2^es`.
    pub fn rscale(&self) -> isize {
        (1 << self.es) as isize
    }

    /// Largest representable regime.
    pub fn rmax(&self) -> isize {
        self.nbits as isize - 2
    }

    /// Smallest representable regime.
    pub fn rmin(&self) -> isize {
        2 - self.nbits as isize
    }

    /// Largest representable (normalized) exponent; the scale of
    /// `maxpos`, where the format contains only regime bits.
    pub fn emax(&self) -> isize {
        self.rscale() * self.rmax()
    }

    /// Smallest representable (normalized) exponent; the scale of
    /// `minpos`.
    pub fn emin(&self) -> isize {
        self.rscale() * self.rmin()
    }

    /// Largest representable value with the given sign.
    pub fn maxval(&self, sign: bool) -> Posit {
        Posit {
            num: PositVal::NonZero(sign, self.rmax(), 0, Integer::one()),
            ctx: self.clone(),
        }
    }

    /// Smallest representable non-zero magnitude with the given sign.
    pub fn minval(&self, sign: bool) -> Posit {
        Posit {
            num: PositVal::NonZero(sign, self.rmin(), 0, Integer::one()),
            ctx: self.clone(),
        }
    }

    /// The largest positive value.
    pub fn maxpos(&self) -> Posit {
        self.maxval(false)
    }

    /// The smallest positive value.
    pub fn minpos(&self) -> Posit {
        self.minval(false)
    }

    /// The negative value of largest magnitude.
    pub fn maxneg(&self) -> Posit {
        self.maxval(true)
    }

    /// The negative value of smallest magnitude.
    pub fn minneg(&self) -> Posit {
        self.minval(true)
    }

    /// Constructs zero in this format.
    pub fn zero(&self) -> Posit {
        Posit {
            num: PositVal::Zero,
            ctx: self.clone(),
        }
    }

    /// Constructs NaR (Not a Real), the sole error encoding.
    pub fn nar(&self) -> Posit {
        Posit {
            num: PositVal::Nar,
            ctx: self.clone(),
        }
    }

    /// Decodes a posit bitpattern into a [`Posit`].
    ///
    /// Only the lowest `nbits` bits of the argument are considered.
    /// Negative encodings are two's-complemented before the regime,
    /// exponent, and fraction fields are extracted.
    pub fn bits_to_number(&self, bits: Integer) -> Posit {
        let nbits = self.nbits;
        let es = self.es;
        let bits = bits & bitmask(nbits);

        // the two reserved encodings
        if bits.is_zero() {
            return self.zero();
        }
        if bits == Integer::one() << (nbits - 1) {
            return self.nar();
        }

        // negative encodings are the two's complement of their
        // positive counterpart
        let sign = bits.get_bit(nbits as u32 - 1);
        let u = if sign {
            (Integer::one() << nbits) - bits
        } else {
            bits
        };

        // measure the regime run, starting below the sign position
        let r0 = u.get_bit(nbits as u32 - 2);
        let mut m = 1usize;
        let mut i = nbits as isize - 3;
        while i >= 0 && u.get_bit(i as u32) == r0 {
            m += 1;
            i -= 1;
        }
        let k = if r0 { m as isize - 1 } else { -(m as isize) };

        // terminator position; the fields below it
        let t = nbits as isize - 2 - m as isize;
        let ebits = max(0, std::cmp::min(es as isize, t)) as usize;
        let fbits = max(0, t - ebits as isize) as usize;

        // the exponent bits occupy the top of the es-bit window
        let efield: Integer = (u.clone() >> fbits) & bitmask(ebits);
        let e = (efield << (es - ebits)).to_isize().unwrap();

        // remaining bits are the fraction; restore the hidden bit
        let c = (u & bitmask(fbits)) | (Integer::one() << fbits);

        trace_arith!("decode: k={} e={} fbits={}", k, e, fbits);
        Posit {
            num: PositVal::NonZero(sign, k, e - fbits as isize, c),
            ctx: self.clone(),
        }
    }

    /// Rounds a finite, non-zero value by constructing the untruncated
    /// posit pattern `regime | terminator | exponent | fraction | sticky`
    /// and truncating it to `nbits` with round-to-nearest, ties to even.
    fn round_finite<T: Real>(&self, num: &T) -> Posit {
        let es = self.es;
        let nbits = self.nbits;
        let sign = num.sign().unwrap();
        let scale = num.e().unwrap();

        // inward projection: scales beyond the regime range saturate
        if scale > self.emax() {
            return self.maxval(sign);
        }
        if scale < self.emin() {
            return self.minval(sign);
        }

        // fraction of the value, hidden bit stripped, MSB first
        let c = num.c().unwrap();
        let fb = c.significant_bits() as usize - 1;
        let frac = c & bitmask(fb);

        // decompose the scale: regime steps of 2^es plus an exponent
        let k = scale >> es;
        let e = scale - (k << es);
        let r0 = scale >= 0;
        let run = (if r0 { k + 1 } else { -k }) as usize;

        // construct the untruncated posit, left-padded with the sign
        // position: 0 | regime | exponent | fraction | sticky
        let pt_len = nbits + 3 + es;
        let mut regime = BitBlock::new(pt_len);
        regime.set(0, !r0);
        for i in 1..=run {
            regime.set(i, r0);
        }

        // number of fraction bits that remain in the encoding
        let nf = max(0, nbits as isize + 1 - (2 + run as isize + es as isize)) as usize;
        let (frac_kept, sb) = if nf >= fb {
            (frac << (nf - fb), false)
        } else {
            let dropped = fb - nf;
            let sticky = !frac.clone().keep_bits(dropped as u32).is_zero();
            (frac >> dropped, sticky)
        };

        let mut pt = &regime.shl(es + nf + 1)
            | &BitBlock::from_bits(pt_len, Integer::from(e) << (nf + 1));
        pt = &pt | &BitBlock::from_bits(pt_len, frac_kept << 1);
        if sb {
            pt.set(0, true);
        }

        // round at the truncation boundary: G and (L or S)
        let len = 1 + max(nbits + 1, 2 + run + es);
        let blast = pt.get(len - nbits);
        let bafter = pt.get(len - nbits - 1);
        let bsticky = pt.any_below(len as isize - nbits as isize - 2);
        let rb = (blast && bafter) || (bafter && bsticky);
        trace_arith!("convert: len={} L={} G={} S={}", len, blast, bafter, bsticky);

        let mut ptt = pt.shl(pt_len - len).hi(nbits);
        if rb {
            ptt = ptt.increment();
        }
        if sign {
            ptt = ptt.twos_complement();
        }
        self.bits_to_number(ptt.into_bits())
    }

    /// Parses a posit from either the exact `<nbits>.<es>x<hex>p`
    /// form, the `nar` symbol, or a decimal literal (converted through
    /// `f64` with the usual rounding implications).
    pub fn parse(&self, s: &str) -> Option<Posit> {
        let s = s.trim();
        if s == "nar" {
            return Some(self.nar());
        }
        if let Some(body) = s.strip_suffix('p') {
            if let Some((dims, hex)) = body.split_once('x') {
                let (nbits, es) = dims.split_once('.')?;
                let nbits = nbits.parse::<usize>().ok()?;
                let es = es.parse::<usize>().ok()?;
                if nbits != self.nbits || es != self.es {
                    return None;
                }
                let bits = Integer::from_str_radix(hex, 16).ok()?;
                return Some(self.bits_to_number(bits));
            }
        }
        let val = s.parse::<f64>().ok()?;
        Some(self.round(&RFloat::from(val)))
    }
}

impl RoundingContext for PositContext {
    type Format = Posit;

    fn round<T: Real>(&self, val: &T) -> Self::Format {
        if val.is_zero() {
            // zero is a single encoding; the sign is dropped
            self.zero()
        } else if val.is_nar() {
            // both infinities and NaN collapse onto NaR
            self.nar()
        } else {
            self.round_finite(val)
        }
    }
}
