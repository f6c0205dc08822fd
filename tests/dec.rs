use std::cmp::Ordering;
use std::error::Error;
use std::hash::{Hash, Hasher};

use dec128::{d128, Context, Decimal128, OrderedDecimal, Rounding};

#[derive(Default)]
struct ValidatingHasher {
    bytes: Vec<u8>,
}

impl Hasher for ValidatingHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes)
    }

    fn finish(&self) -> u64 {
        unimplemented!()
    }
}

fn hash_data<H>(h: H) -> Vec<u8>
where
    H: Hash,
{
    let mut hasher = ValidatingHasher::default();
    h.hash(&mut hasher);
    hasher.bytes
}

/// A deterministic corpus spanning zeros, subnormals, mid-range values,
/// near-overflow values, and specials.
fn test_values() -> Vec<Decimal128> {
    let mut values = vec![
        Decimal128::ZERO,
        -Decimal128::ZERO,
        Decimal128::ONE,
        Decimal128::TWO,
        Decimal128::HUNDRED,
        Decimal128::MAX,
        Decimal128::MIN,
        Decimal128::MIN_POSITIVE,
        Decimal128::NAN,
        Decimal128::INFINITY,
        Decimal128::NEG_INFINITY,
    ];
    for s in [
        "0.1",
        "-2.5",
        "7",
        "-0.001",
        "3.14159",
        "1e-6176",
        "-4.2e-6170",
        "9.999999999999999999999999999999999e6144",
        "-9.999999999999999999999999999999999e6144",
        "1234567890123456789012345678901234",
        "-1e-30",
        "1e6000",
        "-1e-6000",
        "2.10",
    ] {
        values.push(s.parse().unwrap());
    }
    values
}

const CMP_TESTS: &[(&str, &str, Ordering)] = &[
    ("1.2", "1.2", Ordering::Equal),
    ("1.2", "1.200", Ordering::Equal),
    ("1", "2", Ordering::Less),
    ("2", "1", Ordering::Greater),
    ("1", "NaN", Ordering::Less),
    ("NaN", "1", Ordering::Greater),
    ("Inf", "NaN", Ordering::Less),
    ("NaN", "Inf", Ordering::Greater),
    ("-Inf", "NaN", Ordering::Less),
    ("NaN", "-Inf", Ordering::Greater),
    ("NaN", "NaN", Ordering::Equal),
    ("-0", "+0", Ordering::Equal),
    ("-Inf", "Inf", Ordering::Less),
    ("100", "1e2", Ordering::Equal),
];

#[test]
fn test_ordered_decimal128() -> Result<(), Box<dyn Error>> {
    for (lhs, rhs, expected) in CMP_TESTS {
        println!("cmp({}, {}): expected {:?}", lhs, rhs, expected);
        let lhs: OrderedDecimal<Decimal128> = OrderedDecimal(lhs.parse()?);
        let rhs: OrderedDecimal<Decimal128> = OrderedDecimal(rhs.parse()?);
        assert_eq!(lhs.cmp(&rhs), *expected);

        if lhs == rhs && hash_data(lhs) != hash_data(rhs) {
            panic!("{} and {} are equal but hashes are not equal", lhs, rhs);
        } else if lhs != rhs && hash_data(lhs) == hash_data(rhs) {
            panic!("{} and {} are not equal but hashes are equal", lhs, rhs);
        }
    }
    Ok(())
}

#[test]
fn test_constants() -> Result<(), Box<dyn Error>> {
    assert_eq!(Decimal128::ZERO.to_string(), "0");
    assert_eq!(Decimal128::ONE.to_string(), "1");
    assert_eq!(Decimal128::TWO.to_string(), "2");
    assert_eq!(Decimal128::HUNDRED.to_string(), "100");
    assert_eq!(Decimal128::NAN.to_string(), "NaN");
    assert_eq!(
        Decimal128::MAX.to_string(),
        "9.999999999999999999999999999999999e+6144"
    );
    assert_eq!(Decimal128::MIN_POSITIVE.to_string(), "1e-6176");
    Ok(())
}

#[test]
fn test_arithmetic_scenarios() -> Result<(), Box<dyn Error>> {
    // Exact decimal addition, the motivating case.
    let sum = d128!(1.1) + d128!(2.2);
    assert_eq!(sum, d128!(3.3));
    assert_eq!(sum.canonical().to_bits(), d128!(3.3).canonical().to_bits());

    assert_eq!(d128!(0.1) * d128!(0.2), d128!(0.02));

    let third = Decimal128::ONE / d128!(3);
    let expected: Decimal128 = "3.333333333333333333333333333333333E-1".parse()?;
    assert_eq!(third, expected);
    assert_eq!(third.to_bits(), expected.to_bits());

    assert!((Decimal128::INFINITY + Decimal128::NEG_INFINITY).is_nan());
    assert!((Decimal128::INFINITY * Decimal128::ZERO).is_nan());
    assert!((Decimal128::ZERO / Decimal128::ZERO).is_nan());
    assert!((Decimal128::INFINITY / Decimal128::INFINITY).is_nan());
    assert!((d128!(1) / Decimal128::ZERO).is_inf(1));
    assert!((d128!(-1) / Decimal128::ZERO).is_inf(-1));
    assert!((d128!(1) / Decimal128::NEG_INFINITY).is_zero());

    let sqrt2 = d128!(2).sqrt();
    assert_eq!(
        sqrt2.to_string(),
        "1.414213562373095048801688724209698"
    );

    assert_eq!(format!("{:e}", d128!(1000000)), "1.000000e+06");

    let max = Decimal128::max(d128!(-0), d128!(0));
    assert!(max.is_zero());
    assert!(!max.is_signed());
    assert_eq!(d128!(-0).partial_cmp(&d128!(0)), Some(Ordering::Equal));
    Ok(())
}

#[test]
fn test_new_equalities() {
    let a = Decimal128::new(1234, 3);
    let b = Decimal128::new(1234, 3);
    let c = Decimal128::new(1234, 4);

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(c > b);
    assert!(!(b > c));
    assert!(a >= b);
    assert!(c >= b);
    assert!(!(b >= c));
    assert!(b < c);
    assert!(!(c < b));
    assert!(a <= b);
    assert!(b <= c);
    assert!(!(c <= b));
}

#[test]
fn test_round_trip_text() {
    for d in test_values() {
        if !d.is_finite() {
            continue;
        }
        let parsed: Decimal128 = d.to_string().parse().unwrap();
        assert_eq!(parsed, d, "round-trip of {}", d);
        assert_eq!(
            parsed.canonical().to_bits(),
            d.canonical().to_bits(),
            "canonical round-trip of {}",
            d
        );
    }
}

#[test]
fn test_neg_involution() {
    for d in test_values() {
        if d.is_nan() {
            assert!((-(-d)).is_nan());
            continue;
        }
        assert_eq!((-(-d)).to_bits(), d.to_bits(), "neg involution of {}", d);
    }
}

#[test]
fn test_abs_idempotent() {
    for d in test_values() {
        let a = d.abs();
        assert_eq!(a.abs().to_bits(), a.to_bits(), "abs idempotence of {}", d);
        if !d.is_nan() {
            assert!(!a.is_signed(), "abs sign of {}", d);
        }
    }
}

#[test]
fn test_additive_identity_and_inverse() {
    for d in test_values() {
        if !d.is_finite() {
            continue;
        }
        let sum = d + Decimal128::ZERO;
        assert_eq!(sum, d, "additive identity of {}", d);
        assert_eq!(
            sum.canonical().to_bits(),
            d.canonical().to_bits(),
            "additive identity encoding of {}",
            d
        );

        let cancel = d + (-d);
        assert!(cancel.is_zero(), "additive inverse of {}", d);
        assert_eq!(cancel, Decimal128::ZERO);
    }
}

#[test]
fn test_multiplicative_identity() {
    for d in test_values() {
        if !d.is_finite() {
            continue;
        }
        assert_eq!(d * Decimal128::ONE, d, "multiplicative identity of {}", d);

        let zeroed = d * Decimal128::ZERO;
        assert!(zeroed.is_zero());
        assert_eq!(zeroed.is_signed(), d.is_signed(), "zero sign of {}", d);
    }
}

#[test]
fn test_comparison_trichotomy() {
    let values = test_values();
    for &a in &values {
        for &b in &values {
            if a.is_nan() || b.is_nan() {
                assert_eq!(a.partial_cmp(&b), None);
                continue;
            }
            let (lt, eq, gt) = (a < b, a == b, a > b);
            assert_eq!(
                u32::from(lt) + u32::from(eq) + u32::from(gt),
                1,
                "trichotomy of {} and {}",
                a,
                b
            );
            assert_eq!(a.partial_cmp(&b).map(Ordering::reverse), b.partial_cmp(&a));
        }
    }
}

#[test]
fn test_cmp_transitive() {
    let values: Vec<Decimal128> = test_values()
        .into_iter()
        .filter(|d| !d.is_nan())
        .collect();
    for &a in &values {
        for &b in &values {
            for &c in &values {
                if a <= b && b <= c {
                    assert!(a <= c, "transitivity of {} <= {} <= {}", a, b, c);
                }
            }
        }
    }
}

#[test]
fn test_cmp_abs() {
    let mut cx = Context::<Decimal128>::default();
    assert_eq!(
        cx.partial_cmp_abs(d128!(-5), d128!(3)),
        Some(Ordering::Greater)
    );
    assert_eq!(cx.partial_cmp_abs(d128!(-5), d128!(5)), Some(Ordering::Equal));
    assert_eq!(
        cx.partial_cmp_abs(d128!(2), d128!(-10)),
        Some(Ordering::Less)
    );
    assert_eq!(cx.partial_cmp_abs(d128!(1), Decimal128::NAN), None);
    assert_eq!(
        cx.partial_cmp_abs(Decimal128::NEG_INFINITY, d128!(1)),
        Some(Ordering::Greater)
    );
}

#[test]
fn test_canonical_fixed_point() {
    for d in test_values() {
        let c = d.canonical();
        assert_eq!(
            c.canonical().to_bits(),
            c.to_bits(),
            "canonical fixed point of {}",
            d
        );
    }
}

#[test]
fn test_max_min() {
    let mut cx = Context::<Decimal128>::default();
    assert_eq!(cx.max(d128!(1), d128!(2)), d128!(2));
    assert_eq!(cx.min(d128!(1), d128!(2)), d128!(1));
    assert_eq!(cx.max(d128!(-1), Decimal128::NEG_INFINITY), d128!(-1));
    assert!(cx.max(d128!(1), Decimal128::NAN).is_nan());
    assert!(cx.min(d128!(1), Decimal128::NAN).is_nan());

    let min = cx.min(d128!(-0), d128!(0));
    assert!(min.is_zero());
    assert!(min.is_signed());
}

#[test]
fn test_rounding_modes() -> Result<(), Box<dyn Error>> {
    // 7 / 2 with one digit of precision pressure comes from the guard
    // digits; exercise the modes on a value that rounds at the 34th digit.
    let cases: &[(Rounding, &str)] = &[
        (Rounding::HalfEven, "6666666666666666666666666666666667"),
        (Rounding::HalfUp, "6666666666666666666666666666666667"),
        (Rounding::Down, "6666666666666666666666666666666666"),
        (Rounding::Up, "6666666666666666666666666666666667"),
        (Rounding::Floor, "6666666666666666666666666666666666"),
        (Rounding::Ceiling, "6666666666666666666666666666666667"),
    ];
    for &(mode, digits) in cases {
        let mut cx = Context::<Decimal128>::default();
        cx.set_rounding(mode);
        let q = cx.div(d128!(2), d128!(3));
        assert_eq!(q.coefficient().to_string(), digits, "mode {:?}", mode);
        assert!(cx.status().inexact());
    }

    // The negative mirror swaps floor and ceiling.
    let mut cx = Context::<Decimal128>::default();
    cx.set_rounding(Rounding::Floor);
    let q = cx.div(d128!(-2), d128!(3));
    assert_eq!(q.coefficient().to_string(), "-6666666666666666666666666666666667");

    let mut cx = Context::<Decimal128>::default();
    cx.set_rounding(Rounding::Ceiling);
    let q = cx.div(d128!(-2), d128!(3));
    assert_eq!(q.coefficient().to_string(), "-6666666666666666666666666666666666");
    Ok(())
}

#[test]
fn test_exact_cancellation_sign() {
    let mut cx = Context::<Decimal128>::default();
    let diff = cx.sub(d128!(1.5), d128!(1.5));
    assert!(diff.is_zero());
    assert!(!diff.is_signed());

    let mut cx = Context::<Decimal128>::default();
    cx.set_rounding(Rounding::Floor);
    let diff = cx.sub(d128!(1.5), d128!(1.5));
    assert!(diff.is_zero());
    assert!(diff.is_signed());
}

#[test]
fn test_status_flags() {
    let mut cx = Context::<Decimal128>::default();
    cx.mul(Decimal128::MAX, d128!(10));
    assert!(cx.status().overflow());
    assert!(cx.status().inexact());

    let mut cx = Context::<Decimal128>::default();
    cx.div(Decimal128::MIN_POSITIVE, d128!(3));
    assert!(cx.status().underflow());

    let mut cx = Context::<Decimal128>::default();
    cx.div(d128!(1), d128!(0));
    assert!(cx.status().division_by_zero());

    cx.clear_status();
    assert!(!cx.status().any());
}

#[test]
fn test_sum_product() {
    let values = [d128!(0.5), d128!(1.5), d128!(2)];
    let sum: Decimal128 = values.iter().sum();
    assert_eq!(sum, d128!(4));
    let product: Decimal128 = values.iter().product();
    assert_eq!(product, d128!(1.5));
}

#[test]
fn test_wire_format() {
    for d in test_values() {
        let bytes = d.to_le_bytes();
        assert_eq!(Decimal128::from_le_bytes(bytes).to_bits(), d.to_bits());
    }
    // The all-zero word pair is positive zero.
    assert!(Decimal128::from_le_bytes([0; 16]).is_zero());
}

#[test]
#[should_panic(expected = "NaN")]
fn test_sign_panics_on_nan() {
    Decimal128::NAN.sign();
}
