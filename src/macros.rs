#[macro_export]
/// A macro to construct a [`Decimal128`] from a literal.
/// Converts the input tokens to a string, and then parses the string into a
/// [`Decimal128`]. Panics if the provided input is not a valid
/// [`Decimal128`] literal.
///
/// [`Decimal128`]: crate::Decimal128
///
/// # Examples:
/// ```
/// use dec128::d128;
///
/// assert!(d128!(NaN).is_nan());
/// assert!(d128!(0).is_zero());
/// assert!(d128!(-0.1).is_negative());
/// assert!(d128!(1.753).to_string() == "1.753");
/// ```
macro_rules! d128 {
    ($l:expr) => {
        <$crate::Decimal128 as ::std::str::FromStr>::from_str(stringify!($l))
            .unwrap_or_else(|e| panic!("{}", e.to_string()))
    };
}
