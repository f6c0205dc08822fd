#![cfg(feature = "serde")]

use serde_test::{assert_tokens, Token};

use dec128::{Decimal128, OrderedDecimal};

#[test]
fn test_serde_decimal128() {
    let d: Decimal128 = "-12.34".parse().unwrap();
    assert_tokens(&d, &[Token::Str("-12.34")]);

    let d: Decimal128 = "1.25e40".parse().unwrap();
    assert_tokens(&d, &[Token::Str("1.25e+40")]);

    let d = Decimal128::NAN;
    // NaN never compares equal, so only check serialization.
    serde_test::assert_ser_tokens(&d, &[Token::Str("NaN")]);
}

#[test]
fn test_serde_ordered() {
    let d: OrderedDecimal<Decimal128> = OrderedDecimal("0.5".parse().unwrap());
    assert_tokens(&d, &[Token::NewtypeStruct { name: "OrderedDecimal" }, Token::Str("0.5")]);
}
