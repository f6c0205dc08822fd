// SPDX-License-Identifier: Apache-2.0

//! dec128 is a 128-bit decimal floating-point arithmetic library for Rust.
//!
//! # Introduction
//!
//! Binary floating-point numbers can only approximate common decimal
//! numbers. The value 0.1, for example, would need an infinitely recurring
//! binary fraction. In contrast, a decimal number system can represent 0.1
//! exactly, as one tenth (that is, 10<sup>-1</sup>). Consequently, binary
//! floating-point cannot be used for financial calculations, or indeed for
//! any calculations where the results achieved are required to match those
//! which might be calculated by hand.
//!
//! dec128 implements the IEEE 754-2008 `decimal128` interchange format in
//! its binary-integer significand (BID) encoding: 34 decimal digits of
//! precision, exponents between −6176 and 6111, and signed zeros,
//! infinities, and quiet NaNs. All arithmetic is carried out in pure Rust
//! with exact integer significand arithmetic and a selectable rounding
//! mode.
//!
//! The main types exposed by this library are as follows:
//!
//!  * [`Decimal128`], the 128-bit decimal floating-point value itself: an
//!    immutable, copyable 16-byte value with the usual operator overloads.
//!
//!  * [`Context`], which hosts the rounding-mode-sensitive operations on
//!    [`Decimal128`]. A context configures the rounding algorithm and
//!    accumulates exceptional conditions (e.g., overflow) as a [`Status`].
//!
//!  * [`OrderedDecimal`], a wrapper that provides total ordering and
//!    hashing for use in maps and sorts.
//!
//! # Examples
//!
//! The following example demonstrates the basic usage of the library:
//!
//! ```
//! # use std::error::Error;
//! use dec128::Decimal128;
//!
//! let x: Decimal128 = ".1".parse()?;
//! let y: Decimal128 = ".2".parse()?;
//! let z: Decimal128 = ".3".parse()?;
//!
//! assert_eq!(x + y, z);
//! assert_eq!((x + y + z).to_string(), "0.6");
//!
//! # Ok::<_, Box<dyn Error>>(())
//! ```

#![deny(missing_debug_implementations, missing_docs)]

mod arith;
mod context;
mod conv;
mod decimal128;
mod error;
mod fmt;
mod macros;
mod ordered;
mod parse;
mod transcendental;

pub use context::{Class, Context, Rounding, Status};
pub use decimal128::Decimal128;
pub use error::ParseDecimalError;
pub use ordered::OrderedDecimal;
