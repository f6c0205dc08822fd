// SPDX-License-Identifier: Apache-2.0

//! Conversions between `Decimal128` and native numeric types.

use crate::arith::U256;
use crate::context::Context;
use crate::decimal128::{reduce, Decimal128, BIAS};

impl Decimal128 {
    /// Creates a number from its representation as a little-endian byte
    /// array.
    ///
    /// This is the crate's wire format: the IEEE 754-2008 `decimal128` BID
    /// bit pattern stored as two little-endian 64-bit words, low word first.
    pub const fn from_le_bytes(bytes: [u8; 16]) -> Decimal128 {
        Decimal128 {
            inner: u128::from_le_bytes(bytes),
        }
    }

    /// Creates a number from its representation as a big-endian byte array.
    pub const fn from_be_bytes(bytes: [u8; 16]) -> Decimal128 {
        Decimal128 {
            inner: u128::from_be_bytes(bytes),
        }
    }

    /// Creates a number from its representation as a byte array in the
    /// native endianness of the target platform.
    pub const fn from_ne_bytes(bytes: [u8; 16]) -> Decimal128 {
        Decimal128 {
            inner: u128::from_ne_bytes(bytes),
        }
    }

    /// Returns the memory representation of the number as a byte array in
    /// little-endian order.
    pub const fn to_le_bytes(&self) -> [u8; 16] {
        self.inner.to_le_bytes()
    }

    /// Returns the memory representation of the number as a byte array in
    /// big-endian order.
    pub const fn to_be_bytes(&self) -> [u8; 16] {
        self.inner.to_be_bytes()
    }

    /// Returns the memory representation of the number as a byte array in
    /// the native endianness of the target platform.
    pub const fn to_ne_bytes(&self) -> [u8; 16] {
        self.inner.to_ne_bytes()
    }

    /// Creates a number from its raw 128-bit representation.
    pub const fn from_bits(bits: u128) -> Decimal128 {
        Decimal128 { inner: bits }
    }

    /// Returns the raw 128-bit representation of the number.
    pub const fn to_bits(&self) -> u128 {
        self.inner
    }

    /// Converts the number to the nearest binary double-precision value.
    ///
    /// Infinities and NaNs map to their `f64` counterparts. Finite values
    /// with more precision than an `f64` can hold are rounded.
    pub fn to_f64(&self) -> f64 {
        if self.is_nan() {
            return f64::NAN;
        }
        if self.is_infinite() {
            return if self.is_signed() {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
        }
        let (sig, exp) = self.decompose();
        let magnitude = (sig as f64) * 10f64.powi(exp - BIAS);
        if self.is_signed() {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl From<i32> for Decimal128 {
    fn from(n: i32) -> Decimal128 {
        Decimal128::from_parts(n < 0, u128::from(n.unsigned_abs()), BIAS as u32)
    }
}

impl From<u32> for Decimal128 {
    fn from(n: u32) -> Decimal128 {
        Decimal128::from_parts(false, u128::from(n), BIAS as u32)
    }
}

impl From<i64> for Decimal128 {
    fn from(n: i64) -> Decimal128 {
        Decimal128::from_parts(n < 0, u128::from(n.unsigned_abs()), BIAS as u32)
    }
}

impl From<u64> for Decimal128 {
    fn from(n: u64) -> Decimal128 {
        Decimal128::from_parts(false, u128::from(n), BIAS as u32)
    }
}

impl Context<Decimal128> {
    /// Constructs a number from an `i128`.
    ///
    /// Note that this function can return inexact results for numbers with
    /// 35 or more places of precision, e.g.
    /// `99_999_999_999_999_999_999_999_999_999_999_999i128`, `i128::MAX`,
    /// and `i128::MIN`.
    ///
    /// However, some numbers with 35 or more places of precision retain
    /// their exactness, e.g.
    /// `10_000_000_000_000_000_000_000_000_000_000_000i128`.
    ///
    /// ```
    /// use dec128::{Context, Decimal128};
    /// let mut cx = Context::<Decimal128>::default();
    /// let d = cx.from_i128(-99_999_999_999_999_999_999_999_999_999_999_999i128);
    /// // Inexact result
    /// assert!(cx.status().inexact());
    ///
    /// let mut cx = Context::<Decimal128>::default();
    /// let d = cx.from_i128(10_000_000_000_000_000_000_000_000_000_000_000i128);
    /// // Exact result
    /// assert!(!cx.status().inexact());
    /// ```
    pub fn from_i128(&mut self, n: i128) -> Decimal128 {
        reduce(
            self.rounding,
            n < 0,
            U256::from_u128(n.unsigned_abs()),
            BIAS,
            0,
            false,
            &mut self.status,
        )
    }

    /// Constructs a number from a `u128`.
    ///
    /// As with [`from_i128`](Context::<Decimal128>::from_i128), values with
    /// more than 34 significant digits are rounded and flag the context as
    /// inexact.
    pub fn from_u128(&mut self, n: u128) -> Decimal128 {
        reduce(
            self.rounding,
            false,
            U256::from_u128(n),
            BIAS,
            0,
            false,
            &mut self.status,
        )
    }

    /// Constructs a number from a binary double-precision value.
    ///
    /// The conversion goes through the shortest decimal representation that
    /// round-trips the `f64`, so `0.1f64` becomes exactly `0.1` rather than
    /// the binary fraction it actually stores. Such a representation has at
    /// most 17 significant digits and always fits exactly.
    pub fn from_f64(&mut self, n: f64) -> Decimal128 {
        if n.is_nan() {
            return Decimal128::NAN;
        }
        if n.is_infinite() {
            return if n.is_sign_negative() {
                Decimal128::NEG_INFINITY
            } else {
                Decimal128::INFINITY
            };
        }
        // `{:e}` prints the shortest mantissa that round-trips.
        let text = format!("{:e}", n);
        match crate::parse::parse_decimal(&text, self.rounding, &mut self.status) {
            Ok(d) => d,
            Err(_) => unreachable!("float formatting always yields valid decimal syntax"),
        }
    }
}

impl From<f64> for Decimal128 {
    fn from(n: f64) -> Decimal128 {
        Context::<Decimal128>::default().from_f64(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ints() {
        assert_eq!(Decimal128::from(0).to_string(), "0");
        assert_eq!(Decimal128::from(-42).to_string(), "-42");
        assert_eq!(Decimal128::from(i64::MIN).to_string(), "-9223372036854775808");
        assert_eq!(Decimal128::from(u64::MAX).to_string(), "18446744073709551615");
    }

    #[test]
    fn test_from_i128_rounds() {
        let mut cx = Context::<Decimal128>::default();
        let d = cx.from_i128(i128::MAX);
        assert!(cx.status().inexact());
        assert_eq!(d.to_string(), "1.701411834604692317316873037158841e+38");
    }

    #[test]
    fn test_from_f64() {
        let mut cx = Context::<Decimal128>::default();
        assert_eq!(cx.from_f64(0.1).to_string(), "0.1");
        assert_eq!(cx.from_f64(-2.5).to_string(), "-2.5");
        assert_eq!(cx.from_f64(1e300).to_string(), "1e+300");
        assert!(cx.from_f64(f64::NAN).is_nan());
        assert!(cx.from_f64(f64::NEG_INFINITY).is_inf(-1));
        assert!(!cx.status().any());
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(Decimal128::from(42).to_f64(), 42.0);
        assert_eq!("0.5".parse::<Decimal128>().unwrap().to_f64(), 0.5);
        assert_eq!(Decimal128::NEG_INFINITY.to_f64(), f64::NEG_INFINITY);
        assert!(Decimal128::NAN.to_f64().is_nan());
        assert_eq!((-Decimal128::ZERO).to_f64(), 0.0);
    }

    #[test]
    fn test_bytes_round_trip() {
        let d = Decimal128::new(-12345, -2);
        assert_eq!(Decimal128::from_le_bytes(d.to_le_bytes()).to_bits(), d.to_bits());
        assert_eq!(Decimal128::from_be_bytes(d.to_be_bytes()).to_bits(), d.to_bits());
        assert_eq!(Decimal128::from_bits(d.to_bits()).to_bits(), d.to_bits());

        // The wire form is two little-endian 64-bit words, low word first.
        let bytes = Decimal128::ONE.to_le_bytes();
        assert_eq!(bytes[0], 1);
    }
}
