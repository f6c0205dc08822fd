// SPDX-License-Identifier: Apache-2.0

use std::cmp::Ordering;
#[cfg(feature = "serde")]
use std::fmt;
use std::iter::{Product, Sum};
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

#[cfg(feature = "num-traits")]
use num_traits::{One, Zero};

use crate::arith::{self, digits128, U256, POW10};
use crate::context::{Class, Context, Rounding, Status};

/// The exponent bias; a biased exponent of `BIAS` means 10⁰.
pub(crate) const BIAS: i32 = 6176;

/// The largest biased exponent.
pub(crate) const LIMIT: i32 = 12287;

/// The smallest adjusted exponent of a normal number.
const E_MIN: i32 = -6143;

/// The largest coefficient: 10³⁴ − 1.
pub(crate) const MAX_COEFF: u128 = 9_999_999_999_999_999_999_999_999_999_999_999;

const SIGN_MASK: u128 = 1 << 127;
const SPECIAL_MASK: u128 = 0x78 << 120;
const INF_NAN_MASK: u128 = 0x7c << 120;
const INF_BITS: u128 = 0x78 << 120;
const NAN_BITS: u128 = 0x7c << 120;
const SNAN_BIT: u128 = 1 << 121;
const FORM_B_MASK: u128 = 0x60 << 120;
const COEFF_MASK: u128 = (1 << 113) - 1;

/// A 128-bit decimal floating-point number.
///
/// `Decimal128` offers 34 decimal digits of precision with exponents between
/// −6176 and 6111, following the IEEE 754-2008 `decimal128` interchange
/// format in its binary-integer significand (BID) encoding.
///
/// Additional operations are defined as methods on the [`Context`] type.
///
/// For convenience, `Decimal128` overloads many of the standard Rust
/// operators. For example, you can use the standard `+` operator to add two
/// values together:
///
/// ```
/// use dec128::Decimal128;
/// let a = Decimal128::from(1);
/// let b = Decimal128::from(2);
/// assert_eq!(a + b, Decimal128::from(3));
/// ```
///
/// These overloaded operators implicitly construct a single-use default
/// context. For maximum performance when performing operations in bulk, or to
/// select a rounding mode, use a long-lived context that you construct
/// yourself.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct Decimal128 {
    pub(crate) inner: u128,
}

impl Decimal128 {
    /// The value that represents Not-a-Number (NaN).
    pub const NAN: Decimal128 = Decimal128 { inner: NAN_BITS };

    /// Positive infinity.
    pub const INFINITY: Decimal128 = Decimal128 { inner: INF_BITS };

    /// Negative infinity.
    pub const NEG_INFINITY: Decimal128 = Decimal128 {
        inner: SIGN_MASK | INF_BITS,
    };

    /// The value that represents zero.
    ///
    /// This is the all-zero bit pattern, whose exponent is the most negative
    /// representable; it compares equal to every other zero.
    pub const ZERO: Decimal128 = Decimal128 { inner: 0 };

    /// The value that represents one.
    pub const ONE: Decimal128 = Decimal128::from_parts(false, 1, BIAS as u32);

    /// The value that represents two.
    pub const TWO: Decimal128 = Decimal128::from_parts(false, 2, BIAS as u32);

    /// The value that represents one hundred.
    pub const HUNDRED: Decimal128 = Decimal128::from_parts(false, 100, BIAS as u32);

    /// The largest finite value, (10³⁴ − 1) × 10⁶¹¹¹.
    pub const MAX: Decimal128 = Decimal128::from_parts(false, MAX_COEFF, LIMIT as u32);

    /// The smallest finite value, −(10³⁴ − 1) × 10⁶¹¹¹.
    pub const MIN: Decimal128 = Decimal128::from_parts(true, MAX_COEFF, LIMIT as u32);

    /// The smallest positive value, the subnormal 1 × 10⁻⁶¹⁷⁶.
    pub const MIN_POSITIVE: Decimal128 = Decimal128::from_parts(false, 1, 0);

    /// The number of significant decimal digits.
    pub const DIGITS: u32 = 34;

    /// Packs a sign, coefficient, and biased exponent into a decimal.
    ///
    /// Coefficients that fit in 113 bits use the direct encoding; wider
    /// coefficients fall back to the form that borrows two combination bits.
    pub(crate) const fn from_parts(neg: bool, sig: u128, exp: u32) -> Decimal128 {
        let mut bits = if sig >= 1 << 113 {
            (0b11 << 125) | ((exp as u128) << 111) | (sig & ((1 << 111) - 1))
        } else {
            ((exp as u128) << 113) | sig
        };
        if neg {
            bits |= SIGN_MASK;
        }
        Decimal128 { inner: bits }
    }

    /// Splits a finite decimal into its coefficient and biased exponent.
    ///
    /// Every encoding that borrows combination bits carries a coefficient
    /// above 10³⁴ − 1; such non-canonical values decode as zero, matching
    /// IEEE 754-2008. They are never produced by this crate's own
    /// operations.
    pub(crate) fn decompose(self) -> (u128, i32) {
        debug_assert!(!self.is_special());
        if self.inner & FORM_B_MASK == FORM_B_MASK {
            (0, ((self.inner >> 111) & 0x3fff) as i32)
        } else {
            (self.inner & COEFF_MASK, ((self.inner >> 113) & 0x3fff) as i32)
        }
    }

    pub(crate) fn is_special(&self) -> bool {
        self.inner & SPECIAL_MASK == SPECIAL_MASK
    }

    /// Reports whether the number is a NaN.
    pub fn is_nan(&self) -> bool {
        self.inner & INF_NAN_MASK == NAN_BITS
    }

    /// Reports whether the number is a signaling NaN.
    ///
    /// This crate only ever produces quiet NaNs, but signaling NaNs can be
    /// constructed from raw bits and are tolerated on input.
    pub fn is_signaling_nan(&self) -> bool {
        self.is_nan() && self.inner & SNAN_BIT != 0
    }

    /// Reports whether the number is positive or negative infinity.
    pub fn is_infinite(&self) -> bool {
        self.inner & INF_NAN_MASK == INF_BITS
    }

    /// Reports whether the number is an infinity of the given sign.
    ///
    /// If `sign` is positive, reports whether the number is positive
    /// infinity. If `sign` is negative, reports whether the number is
    /// negative infinity. If `sign` is zero, reports whether the number is
    /// either infinity.
    pub fn is_inf(&self, sign: i32) -> bool {
        if !self.is_infinite() {
            return false;
        }
        match sign.cmp(&0) {
            Ordering::Equal => true,
            Ordering::Greater => !self.is_signed(),
            Ordering::Less => self.is_signed(),
        }
    }

    /// Reports whether the number is finite.
    ///
    /// A finite number is one that is neither infinite nor a NaN.
    pub fn is_finite(&self) -> bool {
        !self.is_special()
    }

    /// Reports whether the number is positive or negative zero.
    pub fn is_zero(&self) -> bool {
        self.is_finite() && self.decompose().0 == 0
    }

    /// Reports whether the number has a sign of 1.
    ///
    /// Note that zeros and NaNs may have a sign of 1.
    pub fn is_signed(&self) -> bool {
        self.inner & SIGN_MASK != 0
    }

    /// Reports whether the number is greater than zero and not a NaN.
    pub fn is_positive(&self) -> bool {
        !self.is_nan() && !self.is_signed() && !self.is_zero()
    }

    /// Reports whether the number is less than zero and not a NaN.
    pub fn is_negative(&self) -> bool {
        !self.is_nan() && self.is_signed() && !self.is_zero()
    }

    /// Reports whether the number is normal.
    ///
    /// A normal number is finite, non-zero, and not subnormal.
    pub fn is_normal(&self) -> bool {
        if self.is_special() || self.is_zero() {
            return false;
        }
        self.adjusted_exp() >= E_MIN
    }

    /// Reports whether the number is subnormal.
    ///
    /// A subnormal number is finite, non-zero, and has magnitude less than
    /// 10<sup>emin</sup>.
    pub fn is_subnormal(&self) -> bool {
        if self.is_special() || self.is_zero() {
            return false;
        }
        self.adjusted_exp() < E_MIN
    }

    /// The exponent of the most significant digit: `exponent + digits - 1`.
    fn adjusted_exp(&self) -> i32 {
        let (sig, exp) = self.decompose();
        exp - BIAS + digits128(sig) as i32 - 1
    }

    /// Returns the sign of the number:
    ///
    /// * `-1` if it is less than zero;
    /// * ` 0` if it is positive or negative zero;
    /// * `+1` if it is greater than zero.
    ///
    /// # Panics
    ///
    /// Panics if the number is a NaN.
    pub fn sign(&self) -> i32 {
        if self.is_nan() {
            panic!("Decimal128::sign() called on NaN");
        }
        if self.is_zero() {
            0
        } else if self.is_signed() {
            -1
        } else {
            1
        }
    }

    /// Classifies the number.
    pub fn class(&self) -> Class {
        if self.is_nan() {
            return if self.is_signaling_nan() {
                Class::SignalingNan
            } else {
                Class::QuietNan
            };
        }
        let neg = self.is_signed();
        if self.is_infinite() {
            return if neg {
                Class::NegInfinity
            } else {
                Class::PosInfinity
            };
        }
        if self.is_zero() {
            return if neg { Class::NegZero } else { Class::PosZero };
        }
        match (self.is_subnormal(), neg) {
            (true, true) => Class::NegSubnormal,
            (true, false) => Class::PosSubnormal,
            (false, true) => Class::NegNormal,
            (false, false) => Class::PosNormal,
        }
    }

    /// Computes the number of significant digits in the number.
    ///
    /// If the number is zero, infinite, or a NaN, returns 1.
    pub fn digits(&self) -> u32 {
        if self.is_special() {
            return 1;
        }
        digits128(self.decompose().0)
    }

    /// Computes the coefficient of the number.
    ///
    /// If the number is a special value (i.e., NaN or infinity), returns
    /// zero. The result carries the number's sign.
    pub fn coefficient(&self) -> i128 {
        if self.is_special() {
            return 0;
        }
        let sig = self.decompose().0 as i128;
        if self.is_signed() {
            -sig
        } else {
            sig
        }
    }

    /// Computes the exponent of the number.
    ///
    /// The exponent is only meaningful for finite numbers; for NaNs and
    /// infinities the result is zero.
    pub fn exponent(&self) -> i32 {
        if self.is_special() {
            return 0;
        }
        self.decompose().1 - BIAS
    }

    /// Creates a decimal with the value `sig × 10^exp`.
    ///
    /// Exponents beyond the representable range clamp the result to zero or
    /// infinity of the appropriate sign.
    ///
    /// ```
    /// use dec128::Decimal128;
    /// assert_eq!(Decimal128::new(1234, -3).to_string(), "1.234");
    /// assert_ne!(Decimal128::new(1234, 3), Decimal128::new(1234, 4));
    /// ```
    pub fn new(sig: i64, exp: i32) -> Decimal128 {
        if sig == 0 {
            return Decimal128::ZERO;
        }
        let mut status = Status::default();
        reduce(
            Rounding::HalfEven,
            sig < 0,
            U256::from_u128(u128::from(sig.unsigned_abs())),
            exp.saturating_add(BIAS),
            0,
            false,
            &mut status,
        )
    }

    /// Computes the absolute value of the number.
    ///
    /// Special values keep their class; the sign bit is simply cleared.
    pub fn abs(self) -> Decimal128 {
        Decimal128 {
            inner: self.inner & !SIGN_MASK,
        }
    }

    /// Returns an equivalent number whose encoding is guaranteed to be
    /// canonical.
    ///
    /// Many values have multiple possible encodings; this converts each of
    /// them into a single representation. For infinities and NaNs only the
    /// bits that identify the special value (and the sign, for infinities)
    /// survive, which also strips any NaN payload. For finite values the
    /// canonical encoding is the one whose exponent is closest to zero while
    /// still storing every non-zero digit.
    pub fn canonical(self) -> Decimal128 {
        if self.is_special() {
            if self.is_nan() {
                return Decimal128::NAN;
            }
            return if self.is_signed() {
                Decimal128::NEG_INFINITY
            } else {
                Decimal128::INFINITY
            };
        }

        let (mut sig, mut exp) = self.decompose();

        while exp > BIAS && sig <= MAX_COEFF / 10 {
            sig *= 10;
            exp -= 1;
        }
        while exp < BIAS && sig % 10 == 0 {
            sig /= 10;
            exp += 1;
        }

        Decimal128::from_parts(self.is_signed(), sig, exp as u32)
    }

    /// Determines the ordering of this number relative to `rhs`, using the
    /// total order predicate defined in IEEE 754-2008.
    ///
    /// For a brief description of the ordering, consult [`f32::total_cmp`].
    /// Values that compare equal numerically are ordered by exponent, and
    /// NaNs sort above infinities of the same sign. NaN payloads do not
    /// participate in the ordering.
    pub fn total_cmp(&self, rhs: &Decimal128) -> Ordering {
        let lneg = self.is_signed();
        let rneg = rhs.is_signed();
        if lneg != rneg {
            return if lneg {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }

        // Rank by magnitude with finite < infinity < sNaN < qNaN, then
        // reverse for negative signs.
        fn rank(d: &Decimal128) -> u8 {
            if d.is_nan() {
                if d.is_signaling_nan() {
                    2
                } else {
                    3
                }
            } else if d.is_infinite() {
                1
            } else {
                0
            }
        }

        let (lr, rr) = (rank(self), rank(rhs));
        let mag = if lr != 0 || rr != 0 {
            lr.cmp(&rr)
        } else {
            let (lsig, lexp) = self.decompose();
            let (rsig, rexp) = rhs.decompose();
            match cmp_parts(lsig, lexp, rsig, rexp) {
                Ordering::Equal => lexp.cmp(&rexp),
                unequal => unequal,
            }
        };
        if lneg {
            mag.reverse()
        } else {
            mag
        }
    }

    /// Returns the greater of `self` and `other`.
    ///
    /// Unlike the IEEE `maxNum` operation, a NaN operand makes the result
    /// NaN.
    pub fn max(self, other: Decimal128) -> Decimal128 {
        Context::<Decimal128>::default().max(self, other)
    }

    /// Returns the lesser of `self` and `other`.
    ///
    /// Unlike the IEEE `minNum` operation, a NaN operand makes the result
    /// NaN.
    pub fn min(self, other: Decimal128) -> Decimal128 {
        Context::<Decimal128>::default().min(self, other)
    }
}

/// Compares two finite magnitudes given as coefficient/biased-exponent pairs.
pub(crate) fn cmp_parts(lsig: u128, lexp: i32, rsig: u128, rexp: i32) -> Ordering {
    if lsig == 0 || rsig == 0 {
        return match (lsig == 0, rsig == 0) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => unreachable!(),
        };
    }
    let d = lexp - rexp;
    if d == 0 {
        lsig.cmp(&rsig)
    } else if d > 34 {
        Ordering::Greater
    } else if d < -34 {
        Ordering::Less
    } else if d > 0 {
        arith::mul128(lsig, POW10[d as usize]).cmp(&U256::from_u128(rsig))
    } else {
        U256::from_u128(lsig).cmp(&arith::mul128(rsig, POW10[(-d) as usize]))
    }
}

/// Rounds a wide significand down to at most 34 digits under the given mode.
///
/// `rem` is the most recently discarded digit and `sticky` the logical OR of
/// everything discarded before it; both participate in the final rounding
/// decision. Exponent overflow yields an infinity, underflow a zero (or the
/// smallest subnormal, for modes that round away from zero).
pub(crate) fn reduce(
    rounding: Rounding,
    neg: bool,
    mut wide: U256,
    mut exp: i32,
    mut rem: u8,
    mut sticky: bool,
    status: &mut Status,
) -> Decimal128 {
    const WIDE_MAX: U256 = U256::from_u128(MAX_COEFF);

    let mut dropped = false;
    let mut denorm = false;

    // Far below the subnormal range every digit is discarded; collapsing
    // here keeps the shift loops bounded. The widest intermediate has 77
    // digits, so -80 is unreachable by in-range results.
    if exp < -80 {
        sticky = sticky || rem != 0 || !wide.is_zero();
        dropped = dropped || !wide.is_zero();
        rem = 0;
        wide = U256::ZERO;
        exp = 0;
        denorm = true;
    }

    while wide > WIDE_MAX {
        let (q, r) = wide.divrem10();
        sticky = sticky || rem != 0;
        rem = r as u8;
        wide = q;
        exp += 1;
        dropped = true;
    }
    let mut sig = wide.low();

    if sig == 0 && rem == 0 && !sticky {
        return Decimal128::from_parts(neg, 0, exp.clamp(0, LIMIT) as u32);
    }

    while exp > LIMIT && sig <= MAX_COEFF / 10 {
        sig *= 10;
        exp -= 1;
    }
    if exp > LIMIT {
        status.set_overflow();
        status.set_inexact();
        status.set_rounded();
        return if neg {
            Decimal128::NEG_INFINITY
        } else {
            Decimal128::INFINITY
        };
    }

    while exp < 0 && sig != 0 {
        sticky = sticky || rem != 0;
        rem = (sig % 10) as u8;
        sig /= 10;
        exp += 1;
        dropped = true;
        denorm = true;
    }
    if exp < 0 {
        exp = 0;
    }

    let inexact = rem != 0 || sticky;
    if rounding.round_up(neg, rem, sticky, sig & 1 == 1) {
        sig += 1;
        if sig > MAX_COEFF {
            sig /= 10;
            exp += 1;
            if exp > LIMIT {
                status.set_overflow();
                status.set_inexact();
                status.set_rounded();
                return if neg {
                    Decimal128::NEG_INFINITY
                } else {
                    Decimal128::INFINITY
                };
            }
        }
    }

    if dropped || inexact {
        status.set_rounded();
    }
    if inexact {
        status.set_inexact();
        if denorm {
            status.set_underflow();
        }
    }
    Decimal128::from_parts(neg, sig, exp as u32)
}

impl Default for Decimal128 {
    fn default() -> Decimal128 {
        Decimal128::ZERO
    }
}

impl Default for Context<Decimal128> {
    fn default() -> Context<Decimal128> {
        Context {
            rounding: Rounding::default(),
            status: Status::default(),
            _phantom: PhantomData,
        }
    }
}

impl Context<Decimal128> {
    /// Computes the absolute value of `n`.
    ///
    /// The sign bit is cleared; NaNs and infinities keep their class.
    pub fn abs(&mut self, n: Decimal128) -> Decimal128 {
        n.abs()
    }

    /// Subtracts `n` from zero.
    ///
    /// This flips the sign bit, including on zeros and special values.
    pub fn minus(&mut self, n: Decimal128) -> Decimal128 {
        Decimal128 {
            inner: n.inner ^ SIGN_MASK,
        }
    }

    /// Adds `lhs` and `rhs`.
    pub fn add(&mut self, lhs: Decimal128, rhs: Decimal128) -> Decimal128 {
        if lhs.is_nan() || rhs.is_nan() {
            return Decimal128::NAN;
        }
        match (lhs.is_infinite(), rhs.is_infinite()) {
            (true, true) => {
                if lhs.is_signed() == rhs.is_signed() {
                    return lhs;
                }
                self.status.set_invalid_operation();
                return Decimal128::NAN;
            }
            (true, false) => return lhs,
            (false, true) => return rhs,
            (false, false) => {}
        }

        let (lsig, lexp) = lhs.decompose();
        let (rsig, rexp) = rhs.decompose();
        let lneg = lhs.is_signed();
        let rneg = rhs.is_signed();

        if lsig == 0 && rsig == 0 {
            let neg = if lneg == rneg {
                lneg
            } else {
                self.rounding == Rounding::Floor
            };
            return Decimal128::from_parts(neg, 0, lexp.min(rexp) as u32);
        }
        if lsig == 0 || rsig == 0 {
            // The zero operand still pulls the preferred exponent down; pad
            // the other operand toward it as far as the coefficient allows.
            let (mut sig, mut exp, neg) = if lsig == 0 {
                (rsig, rexp, rneg)
            } else {
                (lsig, lexp, lneg)
            };
            let target = lexp.min(rexp);
            while exp > target && sig <= MAX_COEFF / 10 {
                sig *= 10;
                exp -= 1;
            }
            return Decimal128::from_parts(neg, sig, exp as u32);
        }

        // Align at the smaller exponent. Up to 38 decimal places of shift
        // stay exact in 256 bits; a wider gap folds the tail of the smaller
        // operand into a sticky fraction below the last aligned digit.
        let (bsig, bexp, bneg, ssig, sexp, sneg) = if lexp >= rexp {
            (lsig, lexp, lneg, rsig, rexp, rneg)
        } else {
            (rsig, rexp, rneg, lsig, lexp, lneg)
        };
        let d = bexp - sexp;

        if d <= 38 {
            let wide = arith::mul128(bsig, POW10[d as usize]);
            let small = U256::from_u128(ssig);
            let exp = sexp;
            if bneg == sneg {
                reduce(
                    self.rounding,
                    bneg,
                    wide.add(small),
                    exp,
                    0,
                    false,
                    &mut self.status,
                )
            } else {
                match wide.cmp(&small) {
                    Ordering::Greater => reduce(
                        self.rounding,
                        bneg,
                        wide.sub(small),
                        exp,
                        0,
                        false,
                        &mut self.status,
                    ),
                    Ordering::Less => reduce(
                        self.rounding,
                        sneg,
                        small.sub(wide),
                        exp,
                        0,
                        false,
                        &mut self.status,
                    ),
                    Ordering::Equal => Decimal128::from_parts(
                        self.rounding == Rounding::Floor,
                        0,
                        exp as u32,
                    ),
                }
            }
        } else {
            let wide = arith::mul128(bsig, POW10[38]);
            let shift = (d - 38) as usize;
            let (sq, sfrac) = if shift > 38 {
                (0, true)
            } else {
                (ssig / POW10[shift], ssig % POW10[shift] != 0)
            };
            let exp = bexp - 38;
            if bneg == sneg {
                reduce(
                    self.rounding,
                    bneg,
                    wide.add(U256::from_u128(sq)),
                    exp,
                    0,
                    sfrac,
                    &mut self.status,
                )
            } else {
                // Subtracting one extra unit makes the truncated fraction
                // read as a borrow; the sticky bit restores inexactness.
                let adj = sq + u128::from(sfrac);
                reduce(
                    self.rounding,
                    bneg,
                    wide.sub(U256::from_u128(adj)),
                    exp,
                    0,
                    sfrac,
                    &mut self.status,
                )
            }
        }
    }

    /// Subtracts `rhs` from `lhs`.
    pub fn sub(&mut self, lhs: Decimal128, rhs: Decimal128) -> Decimal128 {
        let negated = self.minus(rhs);
        self.add(lhs, negated)
    }

    /// Multiplies `lhs` by `rhs`.
    pub fn mul(&mut self, lhs: Decimal128, rhs: Decimal128) -> Decimal128 {
        if lhs.is_nan() || rhs.is_nan() {
            return Decimal128::NAN;
        }
        let neg = lhs.is_signed() ^ rhs.is_signed();
        if lhs.is_infinite() || rhs.is_infinite() {
            if lhs.is_zero() || rhs.is_zero() {
                self.status.set_invalid_operation();
                return Decimal128::NAN;
            }
            return if neg {
                Decimal128::NEG_INFINITY
            } else {
                Decimal128::INFINITY
            };
        }

        let (lsig, lexp) = lhs.decompose();
        let (rsig, rexp) = rhs.decompose();
        let exp = lexp + rexp - BIAS;
        if lsig == 0 || rsig == 0 {
            return Decimal128::from_parts(neg, 0, exp.clamp(0, LIMIT) as u32);
        }
        reduce(
            self.rounding,
            neg,
            arith::mul128(lsig, rsig),
            exp,
            0,
            false,
            &mut self.status,
        )
    }

    /// Divides `lhs` by `rhs`.
    pub fn div(&mut self, lhs: Decimal128, rhs: Decimal128) -> Decimal128 {
        if lhs.is_nan() || rhs.is_nan() {
            return Decimal128::NAN;
        }
        let neg = lhs.is_signed() ^ rhs.is_signed();
        match (lhs.is_infinite(), rhs.is_infinite()) {
            (true, true) => {
                self.status.set_invalid_operation();
                return Decimal128::NAN;
            }
            (true, false) => {
                return if neg {
                    Decimal128::NEG_INFINITY
                } else {
                    Decimal128::INFINITY
                };
            }
            (false, true) => return Decimal128::from_parts(neg, 0, 0),
            (false, false) => {}
        }

        let (lsig, lexp) = lhs.decompose();
        let (rsig, rexp) = rhs.decompose();

        if rsig == 0 {
            if lsig == 0 {
                self.status.set_invalid_operation();
                return Decimal128::NAN;
            }
            self.status.set_division_by_zero();
            return if neg {
                Decimal128::NEG_INFINITY
            } else {
                Decimal128::INFINITY
            };
        }
        let pref = lexp - rexp + BIAS;
        if lsig == 0 {
            return Decimal128::from_parts(neg, 0, pref.clamp(0, LIMIT) as u32);
        }

        // Scale the dividend so the raw quotient lands on 37 or 38 digits,
        // leaving guard digits for the rounding step.
        let k = 37 - digits128(lsig) as i32 + digits128(rsig) as i32;
        let num = if k <= 38 {
            arith::mul128(lsig, POW10[k as usize])
        } else {
            arith::mul128(lsig, POW10[38]).mul_u128(POW10[(k - 38) as usize])
        };
        let (mut quot, r) = num.divrem(rsig);
        let mut exp = pref - k;
        let sticky = r != 0;

        if !sticky {
            // Exact quotients retract toward the preferred exponent.
            while exp < pref && !quot.is_zero() && quot.rem10() == 0 {
                quot = quot.divrem10().0;
                exp += 1;
            }
        }
        reduce(self.rounding, neg, quot, exp, 0, sticky, &mut self.status)
    }

    /// Determines the ordering of `lhs` relative to `rhs`, using a partial
    /// order.
    ///
    /// If either `lhs` or `rhs` is a NaN, returns `None`. To force an
    /// ordering upon NaNs, use [`Decimal128::total_cmp`].
    pub fn partial_cmp(&mut self, lhs: Decimal128, rhs: Decimal128) -> Option<Ordering> {
        if lhs.is_nan() || rhs.is_nan() {
            return None;
        }
        let lzero = lhs.is_zero();
        let rzero = rhs.is_zero();
        if lzero || rzero {
            return Some(match (lzero, rzero) {
                (true, true) => Ordering::Equal,
                (true, false) => {
                    if rhs.is_signed() {
                        Ordering::Greater
                    } else {
                        Ordering::Less
                    }
                }
                (false, true) => {
                    if lhs.is_signed() {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    }
                }
                (false, false) => unreachable!(),
            });
        }

        let lneg = lhs.is_signed();
        if lneg != rhs.is_signed() {
            return Some(if lneg {
                Ordering::Less
            } else {
                Ordering::Greater
            });
        }
        let mag = cmp_magnitudes(lhs, rhs);
        Some(if lneg { mag.reverse() } else { mag })
    }

    /// Like [`partial_cmp`](Context::<Decimal128>::partial_cmp), but
    /// compares the operands' absolute values.
    pub fn partial_cmp_abs(&mut self, lhs: Decimal128, rhs: Decimal128) -> Option<Ordering> {
        if lhs.is_nan() || rhs.is_nan() {
            return None;
        }
        let lzero = lhs.is_zero();
        let rzero = rhs.is_zero();
        if lzero || rzero {
            return Some(match (lzero, rzero) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => unreachable!(),
            });
        }
        Some(cmp_magnitudes(lhs, rhs))
    }

    /// Returns whichever of `lhs` and `rhs` is larger, or NaN if either
    /// operand is a NaN.
    ///
    /// Equal values of opposite sign prefer the positive operand, so that
    /// the maximum of negative and positive zero is positive zero.
    pub fn max(&mut self, lhs: Decimal128, rhs: Decimal128) -> Decimal128 {
        if lhs.is_nan() || rhs.is_nan() {
            return Decimal128::NAN;
        }
        match self.partial_cmp(lhs, rhs) {
            Some(Ordering::Less) => rhs,
            Some(Ordering::Equal) if lhs.is_signed() => rhs,
            _ => lhs,
        }
    }

    /// Returns whichever of `lhs` and `rhs` is smaller, or NaN if either
    /// operand is a NaN.
    ///
    /// Equal values of opposite sign prefer the negative operand, so that
    /// the minimum of negative and positive zero is negative zero.
    pub fn min(&mut self, lhs: Decimal128, rhs: Decimal128) -> Decimal128 {
        if lhs.is_nan() || rhs.is_nan() {
            return Decimal128::NAN;
        }
        match self.partial_cmp(lhs, rhs) {
            Some(Ordering::Greater) => rhs,
            Some(Ordering::Equal) if !lhs.is_signed() => rhs,
            _ => lhs,
        }
    }
}

/// Compares the magnitudes of two non-NaN, non-zero decimals.
fn cmp_magnitudes(lhs: Decimal128, rhs: Decimal128) -> Ordering {
    match (lhs.is_infinite(), rhs.is_infinite()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let (lsig, lexp) = lhs.decompose();
            let (rsig, rexp) = rhs.decompose();
            cmp_parts(lsig, lexp, rsig, rexp)
        }
    }
}

impl PartialEq for Decimal128 {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Decimal128 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Context::<Decimal128>::default().partial_cmp(*self, *other)
    }
}

impl Neg for Decimal128 {
    type Output = Decimal128;

    fn neg(self) -> Decimal128 {
        Context::<Decimal128>::default().minus(self)
    }
}

impl Add<Decimal128> for Decimal128 {
    type Output = Decimal128;

    fn add(self, rhs: Decimal128) -> Decimal128 {
        Context::<Decimal128>::default().add(self, rhs)
    }
}

impl AddAssign<Decimal128> for Decimal128 {
    fn add_assign(&mut self, rhs: Decimal128) {
        *self = Context::<Decimal128>::default().add(*self, rhs);
    }
}

impl Div<Decimal128> for Decimal128 {
    type Output = Decimal128;

    fn div(self, rhs: Decimal128) -> Decimal128 {
        Context::<Decimal128>::default().div(self, rhs)
    }
}

impl DivAssign<Decimal128> for Decimal128 {
    fn div_assign(&mut self, rhs: Decimal128) {
        *self = Context::<Decimal128>::default().div(*self, rhs);
    }
}

impl Mul<Decimal128> for Decimal128 {
    type Output = Decimal128;

    fn mul(self, rhs: Decimal128) -> Decimal128 {
        Context::<Decimal128>::default().mul(self, rhs)
    }
}

impl MulAssign<Decimal128> for Decimal128 {
    fn mul_assign(&mut self, rhs: Decimal128) {
        *self = Context::<Decimal128>::default().mul(*self, rhs);
    }
}

impl Sub<Decimal128> for Decimal128 {
    type Output = Decimal128;

    fn sub(self, rhs: Decimal128) -> Decimal128 {
        Context::<Decimal128>::default().sub(self, rhs)
    }
}

impl SubAssign<Decimal128> for Decimal128 {
    fn sub_assign(&mut self, rhs: Decimal128) {
        *self = Context::<Decimal128>::default().sub(*self, rhs);
    }
}

impl Sum for Decimal128 {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Decimal128>,
    {
        let mut cx = Context::<Decimal128>::default();
        let mut sum = Decimal128::ZERO;
        for d in iter {
            sum = cx.add(sum, d);
        }
        sum
    }
}

impl<'a> Sum<&'a Decimal128> for Decimal128 {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = &'a Decimal128>,
    {
        iter.copied().sum()
    }
}

impl Product for Decimal128 {
    fn product<I>(iter: I) -> Self
    where
        I: Iterator<Item = Decimal128>,
    {
        let mut cx = Context::<Decimal128>::default();
        let mut product = Decimal128::ONE;
        for d in iter {
            product = cx.mul(product, d);
        }
        product
    }
}

impl<'a> Product<&'a Decimal128> for Decimal128 {
    fn product<I>(iter: I) -> Self
    where
        I: Iterator<Item = &'a Decimal128>,
    {
        iter.copied().product()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Decimal128 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Decimal128 {
    fn deserialize<D>(deserializer: D) -> Result<Decimal128, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Decimal128Visitor;

        impl serde::de::Visitor<'_> for Decimal128Visitor {
            type Value = Decimal128;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal number in string form")
            }

            fn visit_str<E>(self, s: &str) -> Result<Decimal128, E>
            where
                E: serde::de::Error,
            {
                s.parse().map_err(|_| {
                    E::invalid_value(serde::de::Unexpected::Str(s), &self)
                })
            }
        }

        deserializer.deserialize_str(Decimal128Visitor)
    }
}

#[cfg(feature = "num-traits")]
impl One for Decimal128 {
    #[inline]
    fn one() -> Self {
        Self::ONE
    }
}

#[cfg(feature = "num-traits")]
impl Zero for Decimal128 {
    #[inline]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    fn is_zero(&self) -> bool {
        Decimal128::is_zero(self)
    }
}
