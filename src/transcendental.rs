// SPDX-License-Identifier: Apache-2.0

//! Exponential, logarithmic, and square-root operations.
//!
//! The exp and log families evaluate their series in a 38-digit working
//! representation, four guard digits past the 34-digit result, and hand the
//! guarded value to the common rounding step. Square roots reduce to an
//! exact integer square root with remainder, so they are always correctly
//! rounded; the series-based operations are correctly rounded unless the
//! exact value lies within one part in 10³⁸ of a rounding boundary.

use std::cmp::Ordering;

use crate::arith::{self, digits128, U256, POW10};
use crate::context::Context;
use crate::decimal128::{reduce, Decimal128, BIAS, LIMIT};

/// Working-precision value `(-1)^neg × sig × 10^exp` with `sig < 10³⁸`.
#[derive(Copy, Clone, Debug)]
struct Wide {
    neg: bool,
    sig: u128,
    exp: i32,
}

// 38-digit truncations of the usual constants.
const LN10: Wide = Wide {
    neg: false,
    sig: 23_025_850_929_940_456_840_179_914_546_843_642_076,
    exp: -37,
};
const LN2: Wide = Wide {
    neg: false,
    sig: 69_314_718_055_994_530_941_723_212_145_817_656_808,
    exp: -38,
};
const LOG10_E: Wide = Wide {
    neg: false,
    sig: 43_429_448_190_325_182_765_112_891_891_660_508_229,
    exp: -38,
};
const LOG2_E: Wide = Wide {
    neg: false,
    sig: 14_426_950_408_889_634_073_599_246_810_018_921_374,
    exp: -37,
};
const SQRT10: Wide = Wide {
    neg: false,
    sig: 31_622_776_601_683_793_319_988_935_444_327_185_337,
    exp: -37,
};

impl Wide {
    const ZERO: Wide = Wide {
        neg: false,
        sig: 0,
        exp: 0,
    };
    const ONE: Wide = Wide {
        neg: false,
        sig: 1,
        exp: 0,
    };

    fn from_i32(n: i32) -> Wide {
        Wide {
            neg: n < 0,
            sig: u128::from(n.unsigned_abs()),
            exp: 0,
        }
    }

    fn is_zero(self) -> bool {
        self.sig == 0
    }

    /// The exponent of the most significant digit; the value lies in
    /// `[10^adj, 10^(adj+1))`.
    fn adj(self) -> i32 {
        self.exp + digits128(self.sig) as i32 - 1
    }

    fn norm(neg: bool, mut wide: U256, mut exp: i32) -> Wide {
        const SIG_MAX: U256 = U256::from_u128(POW10[38] - 1);
        while wide > SIG_MAX {
            wide = wide.divrem10().0;
            exp += 1;
        }
        let sig = wide.low();
        if sig == 0 {
            Wide::ZERO
        } else {
            Wide { neg, sig, exp }
        }
    }

    fn mul(self, rhs: Wide) -> Wide {
        if self.is_zero() || rhs.is_zero() {
            return Wide::ZERO;
        }
        Wide::norm(
            self.neg ^ rhs.neg,
            arith::mul128(self.sig, rhs.sig),
            self.exp + rhs.exp,
        )
    }

    fn div_u64(self, n: u64) -> Wide {
        if self.is_zero() {
            return Wide::ZERO;
        }
        // Four rescaling digits cover the series denominators.
        debug_assert!(n < 10_000);
        let (q, _) = arith::mul128(self.sig, POW10[4]).divrem_u64(n);
        Wide::norm(self.neg, q, self.exp - 4)
    }

    fn div(self, rhs: Wide) -> Wide {
        debug_assert!(!rhs.is_zero());
        if self.is_zero() {
            return Wide::ZERO;
        }
        let (q, _) = arith::mul128(self.sig, POW10[38]).divrem(rhs.sig);
        Wide::norm(self.neg ^ rhs.neg, q, self.exp - rhs.exp - 38)
    }

    fn add(self, rhs: Wide) -> Wide {
        if self.is_zero() {
            return rhs;
        }
        if rhs.is_zero() {
            return self;
        }
        let (hi, lo) = if self.exp >= rhs.exp {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let d = hi.exp - lo.exp;
        if d > 76 {
            return hi;
        }
        let (hi_wide, lo_sig, exp) = if d <= 38 {
            (arith::mul128(hi.sig, POW10[d as usize]), lo.sig, lo.exp)
        } else {
            (
                arith::mul128(hi.sig, POW10[38]),
                lo.sig / POW10[(d - 38) as usize],
                hi.exp - 38,
            )
        };
        let lo_wide = U256::from_u128(lo_sig);
        if hi.neg == lo.neg {
            Wide::norm(hi.neg, hi_wide.add(lo_wide), exp)
        } else {
            match hi_wide.cmp(&lo_wide) {
                Ordering::Greater => Wide::norm(hi.neg, hi_wide.sub(lo_wide), exp),
                Ordering::Less => Wide::norm(lo.neg, lo_wide.sub(hi_wide), exp),
                Ordering::Equal => Wide::ZERO,
            }
        }
    }

    fn sub(self, rhs: Wide) -> Wide {
        self.add(Wide {
            neg: !rhs.neg,
            ..rhs
        })
    }

    /// Rounds toward negative infinity to an `i32`, saturating far outside
    /// the exponent range.
    fn floor_i32(self) -> i32 {
        const BIG: i32 = 20_000;
        if self.is_zero() {
            return 0;
        }
        if self.adj() >= 6 {
            return if self.neg { -BIG } else { BIG };
        }
        let (int, frac) = if self.exp >= 0 {
            (self.sig * POW10[self.exp as usize], false)
        } else if self.exp <= -39 {
            (0, true)
        } else {
            let p = POW10[(-self.exp) as usize];
            (self.sig / p, self.sig % p != 0)
        };
        let int = int as i32;
        if self.neg {
            -(int + i32::from(frac))
        } else {
            int
        }
    }
}

/// Compares the magnitudes of two working-precision values.
fn wide_cmp_abs(a: Wide, b: Wide) -> Ordering {
    match (a.is_zero(), b.is_zero()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    let (aa, ba) = (a.adj(), b.adj());
    if aa != ba {
        return aa.cmp(&ba);
    }
    // Equal leading-digit positions bound the exponent gap by the digit
    // counts, so the aligned product stays within 256 bits.
    let d = a.exp - b.exp;
    if d == 0 {
        a.sig.cmp(&b.sig)
    } else if d > 0 {
        arith::mul128(a.sig, POW10[d as usize]).cmp(&U256::from_u128(b.sig))
    } else {
        U256::from_u128(a.sig).cmp(&arith::mul128(b.sig, POW10[(-d) as usize]))
    }
}

/// Reports whether `|w|` exceeds the integer `limit`.
fn abs_exceeds(w: Wide, limit: u128) -> bool {
    let bound = Wide {
        neg: false,
        sig: limit,
        exp: 0,
    };
    wide_cmp_abs(w, bound) == Ordering::Greater
}

fn negligible(term: Wide, sum: Wide) -> bool {
    term.is_zero() || (!sum.is_zero() && term.adj() < sum.adj() - 45)
}

/// Splits a finite decimal into a working-precision value.
fn wide_of(n: Decimal128) -> Wide {
    let (sig, exp) = n.decompose();
    Wide {
        neg: n.is_signed(),
        sig,
        exp: exp - BIAS,
    }
}

/// Computes `e^x` as a mantissa in `[1, 10)` and a decimal exponent.
fn exp_core(x: Wide) -> (Wide, i32) {
    let mut k = x.mul(LOG10_E).floor_i32();
    let r = x.sub(Wide::from_i32(k).mul(LN10));

    // Taylor series; r is within [0, ln 10) up to the floor's truncation,
    // so fifty-odd terms reach the guard digits.
    let mut sum = Wide::ONE;
    let mut term = Wide::ONE;
    for n in 1..=80 {
        term = term.mul(r).div_u64(n);
        if negligible(term, sum) {
            break;
        }
        sum = sum.add(term);
    }

    let mut m = sum;
    while m.adj() > 0 {
        m.exp -= 1;
        k += 1;
    }
    while m.adj() < 0 {
        m.exp += 1;
        k -= 1;
    }
    (m, k)
}

/// Computes `ln(sig × 10^(exp-bias))` for a non-zero coefficient.
fn ln_core(sig: u128, bexp: i32) -> Wide {
    let d = digits128(sig) as i32;
    let mut e_adj = bexp - BIAS + d - 1;
    let mut m = Wide {
        neg: false,
        sig,
        exp: -(d - 1),
    };
    // m is in [1, 10); fold the upper half down so the atanh argument
    // stays small.
    if wide_cmp_abs(m, SQRT10) != Ordering::Less {
        m.exp -= 1;
        e_adj += 1;
    }

    let z = m.sub(Wide::ONE).div(m.add(Wide::ONE));
    let zsq = z.mul(z);
    let mut term = z;
    let mut sum = z;
    for n in (3..=171).step_by(2) {
        term = term.mul(zsq);
        let t = term.div_u64(n);
        if negligible(t, sum) {
            break;
        }
        sum = sum.add(t);
    }
    let ln_m = sum.add(sum);

    Wide::from_i32(e_adj).mul(LN10).add(ln_m)
}

impl Context<Decimal128> {
    /// Rounds a guarded working-precision result into a decimal.
    fn round_wide(&mut self, w: Wide, k: i32) -> Decimal128 {
        let mut sig = w.sig;
        let mut exp = w.exp + k;
        let d = digits128(sig) as i32;
        if sig != 0 && d < 38 {
            // Stretch to full working precision so the sticky bit sits
            // below the 34th significant digit.
            sig *= POW10[(38 - d) as usize];
            exp -= 38 - d;
        }
        reduce(
            self.rounding,
            w.neg,
            U256::from_u128(sig),
            exp + BIAS,
            0,
            true,
            &mut self.status,
        )
    }

    fn overflow_result(&mut self) -> Decimal128 {
        self.status.set_overflow();
        self.status.set_inexact();
        self.status.set_rounded();
        Decimal128::INFINITY
    }

    fn underflow_result(&mut self) -> Decimal128 {
        let d = reduce(
            self.rounding,
            false,
            U256::ZERO,
            0,
            0,
            true,
            &mut self.status,
        );
        self.status.set_underflow();
        d
    }

    /// Computes the exponential of `n`, e<sup>n</sup>.
    pub fn exp(&mut self, n: Decimal128) -> Decimal128 {
        if n.is_nan() {
            return Decimal128::NAN;
        }
        if n.is_infinite() {
            return if n.is_signed() {
                Decimal128::ZERO
            } else {
                Decimal128::INFINITY
            };
        }
        if n.is_zero() {
            return Decimal128::ONE;
        }
        let x = wide_of(n);
        if abs_exceeds(x, 14_200) {
            return if x.neg {
                self.underflow_result()
            } else {
                self.overflow_result()
            };
        }
        let (m, k) = exp_core(x);
        self.round_wide(m, k)
    }

    /// Computes 2<sup>n</sup>.
    pub fn exp2(&mut self, n: Decimal128) -> Decimal128 {
        if n.is_nan() {
            return Decimal128::NAN;
        }
        if n.is_infinite() {
            return if n.is_signed() {
                Decimal128::ZERO
            } else {
                Decimal128::INFINITY
            };
        }
        if n.is_zero() {
            return Decimal128::ONE;
        }
        let x = wide_of(n);
        if abs_exceeds(x, 20_500) {
            return if x.neg {
                self.underflow_result()
            } else {
                self.overflow_result()
            };
        }
        let k = x.floor_i32();
        if x.sub(Wide::from_i32(k)).is_zero() {
            // Small integer powers of two are exact.
            if (0..=112).contains(&k) {
                return reduce(
                    self.rounding,
                    false,
                    U256::from_u128(1 << k),
                    BIAS,
                    0,
                    false,
                    &mut self.status,
                );
            }
            if (-48..0).contains(&k) {
                return reduce(
                    self.rounding,
                    false,
                    U256::from_u128(5u128.pow(k.unsigned_abs())),
                    BIAS - k.abs(),
                    0,
                    false,
                    &mut self.status,
                );
            }
        }
        let (m, k) = exp_core(x.mul(LN2));
        self.round_wide(m, k)
    }

    /// Computes 10<sup>n</sup>.
    pub fn exp10(&mut self, n: Decimal128) -> Decimal128 {
        if n.is_nan() {
            return Decimal128::NAN;
        }
        if n.is_infinite() {
            return if n.is_signed() {
                Decimal128::ZERO
            } else {
                Decimal128::INFINITY
            };
        }
        if n.is_zero() {
            return Decimal128::ONE;
        }
        let x = wide_of(n);
        if abs_exceeds(x, 6_200) {
            return if x.neg {
                self.underflow_result()
            } else {
                self.overflow_result()
            };
        }
        let k = x.floor_i32();
        let f = x.sub(Wide::from_i32(k));
        if f.is_zero() {
            return reduce(
                self.rounding,
                false,
                U256::from_u128(1),
                BIAS + k,
                0,
                false,
                &mut self.status,
            );
        }
        let (m, kk) = exp_core(f.mul(LN10));
        self.round_wide(m, k + kk)
    }

    /// Computes the natural logarithm of `n`.
    ///
    /// The logarithm of zero is negative infinity (raising the
    /// division-by-zero flag); logarithms of negative numbers are NaN.
    pub fn ln(&mut self, n: Decimal128) -> Decimal128 {
        if n.is_nan() {
            return Decimal128::NAN;
        }
        if n.is_zero() {
            self.status.set_division_by_zero();
            return Decimal128::NEG_INFINITY;
        }
        if n.is_signed() {
            self.status.set_invalid_operation();
            return Decimal128::NAN;
        }
        if n.is_infinite() {
            return Decimal128::INFINITY;
        }
        let (sig, bexp) = n.decompose();
        let w = ln_core(sig, bexp);
        if w.is_zero() {
            return Decimal128::ZERO;
        }
        self.round_wide(w, 0)
    }

    /// Computes the base-2 logarithm of `n`.
    ///
    /// Domain behavior matches [`ln`](Context::<Decimal128>::ln).
    pub fn log2(&mut self, n: Decimal128) -> Decimal128 {
        if n.is_nan() {
            return Decimal128::NAN;
        }
        if n.is_zero() {
            self.status.set_division_by_zero();
            return Decimal128::NEG_INFINITY;
        }
        if n.is_signed() {
            self.status.set_invalid_operation();
            return Decimal128::NAN;
        }
        if n.is_infinite() {
            return Decimal128::INFINITY;
        }
        let (sig, bexp) = n.decompose();
        let w = ln_core(sig, bexp);
        if w.is_zero() {
            return Decimal128::ZERO;
        }
        self.round_wide(w.mul(LOG2_E), 0)
    }

    /// Computes the base-10 logarithm of `n`.
    ///
    /// Domain behavior matches [`ln`](Context::<Decimal128>::ln). Powers of
    /// ten yield exact integers.
    pub fn log10(&mut self, n: Decimal128) -> Decimal128 {
        if n.is_nan() {
            return Decimal128::NAN;
        }
        if n.is_zero() {
            self.status.set_division_by_zero();
            return Decimal128::NEG_INFINITY;
        }
        if n.is_signed() {
            self.status.set_invalid_operation();
            return Decimal128::NAN;
        }
        if n.is_infinite() {
            return Decimal128::INFINITY;
        }
        let (sig, bexp) = n.decompose();
        let d = digits128(sig);
        if sig == POW10[(d - 1) as usize] {
            let e = bexp - BIAS + d as i32 - 1;
            return reduce(
                self.rounding,
                e < 0,
                U256::from_u128(u128::from(e.unsigned_abs())),
                BIAS,
                0,
                false,
                &mut self.status,
            );
        }
        self.round_wide(ln_core(sig, bexp).mul(LOG10_E), 0)
    }

    /// Computes the square root of `n`, correctly rounded.
    ///
    /// The square root of negative zero is negative zero; square roots of
    /// negative non-zero numbers are NaN.
    pub fn sqrt(&mut self, n: Decimal128) -> Decimal128 {
        if n.is_nan() {
            return Decimal128::NAN;
        }
        if n.is_zero() {
            let e = n.decompose().1 - BIAS;
            let exp = (e.div_euclid(2) + BIAS).clamp(0, LIMIT);
            return Decimal128::from_parts(n.is_signed(), 0, exp as u32);
        }
        if n.is_signed() {
            self.status.set_invalid_operation();
            return Decimal128::NAN;
        }
        if n.is_infinite() {
            return Decimal128::INFINITY;
        }

        let (sig, bexp) = n.decompose();
        let u = bexp - BIAS;
        let d = digits128(sig) as i32;

        // Scale to 70 or 71 digits with an even exponent remainder, so the
        // integer root carries at least one digit past full precision.
        let mut j = 70 - d;
        if (u - j).rem_euclid(2) == 1 {
            j += 1;
        }
        let scaled = if j <= 38 {
            arith::mul128(sig, POW10[j as usize])
        } else {
            arith::mul128(sig, POW10[38]).mul_u128(POW10[(j - 38) as usize])
        };

        let q = scaled.isqrt();
        let exp = (u - j) / 2 + BIAS;

        if arith::mul128(q, q) == scaled {
            // Perfect square: strip zeros toward the preferred exponent.
            let pref = u.div_euclid(2) + BIAS;
            let mut sig = q;
            let mut exp = exp;
            while exp < pref && sig % 10 == 0 {
                sig /= 10;
                exp += 1;
            }
            return reduce(
                self.rounding,
                false,
                U256::from_u128(sig),
                exp,
                0,
                false,
                &mut self.status,
            );
        }
        // The root is irrational; the floored extra digits plus the sticky
        // bit decide the rounding exactly.
        reduce(
            self.rounding,
            false,
            U256::from_u128(q),
            exp,
            0,
            true,
            &mut self.status,
        )
    }
}

impl Decimal128 {
    /// Computes the exponential of the number, e<sup>self</sup>.
    pub fn exp(self) -> Decimal128 {
        Context::<Decimal128>::default().exp(self)
    }

    /// Computes 2<sup>self</sup>.
    pub fn exp2(self) -> Decimal128 {
        Context::<Decimal128>::default().exp2(self)
    }

    /// Computes 10<sup>self</sup>.
    pub fn exp10(self) -> Decimal128 {
        Context::<Decimal128>::default().exp10(self)
    }

    /// Computes the natural logarithm of the number.
    pub fn ln(self) -> Decimal128 {
        Context::<Decimal128>::default().ln(self)
    }

    /// Computes the base-2 logarithm of the number.
    pub fn log2(self) -> Decimal128 {
        Context::<Decimal128>::default().log2(self)
    }

    /// Computes the base-10 logarithm of the number.
    pub fn log10(self) -> Decimal128 {
        Context::<Decimal128>::default().log10(self)
    }

    /// Computes the square root of the number, correctly rounded.
    pub fn sqrt(self) -> Decimal128 {
        Context::<Decimal128>::default().sqrt(self)
    }
}
