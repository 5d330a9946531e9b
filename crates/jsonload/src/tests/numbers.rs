use rstest::rstest;

use super::decode_with;
use crate::{BigIntegerMode, BigRealMode, DecodeOptions, ErrorKind, Value};

fn options(big_integers: BigIntegerMode, big_reals: BigRealMode) -> DecodeOptions {
    DecodeOptions {
        big_integers,
        big_reals,
        ..Default::default()
    }
}

/// Decode `[text]` and return the element.
fn number(text: &str, options: DecodeOptions) -> Value {
    let doc = decode_with(&format!("[{text}]"), options).unwrap();
    let Value::Array(mut items) = doc else {
        panic!("not an array: {doc:?}");
    };
    assert_eq!(items.len(), 1);
    items.remove(0)
}

fn native(text: &str) -> Value {
    number(text, DecodeOptions::default())
}

#[rstest]
#[case("0", 0)]
#[case("-0", 0)]
#[case("42", 42)]
#[case("-42", -42)]
#[case("9223372036854775807", i64::MAX)]
#[case("-9223372036854775808", i64::MIN)]
fn native_integers(#[case] text: &str, #[case] expected: i64) {
    assert_eq!(native(text), Value::Integer(expected));
}

#[rstest]
#[case("0.5", 0.5)]
#[case("-2.25", -2.25)]
#[case("1E2", 100.0)]
#[case("1e+2", 100.0)]
#[case("1e-2", 0.01)]
#[case("2.5e3", 2500.0)]
#[case("0e0", 0.0)]
#[case("1.7976931348623157e308", f64::MAX)]
fn native_reals(#[case] text: &str, #[case] expected: f64) {
    assert_eq!(native(text), Value::Real(expected));
}

#[test]
fn negative_zero_real_keeps_its_sign() {
    let Value::Real(z) = native("-0.0") else {
        panic!("expected a real");
    };
    assert!(z == 0.0 && z.is_sign_negative());
}

#[test]
fn integer_range_errors() {
    let err = decode_with("[9223372036854775808]", DecodeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Policy);
    assert_eq!(err.text(), "too big integer near '9223372036854775808'");
    assert_eq!(err.column(), 20);

    let err = decode_with("[-9223372036854775809]", DecodeOptions::default()).unwrap_err();
    assert_eq!(err.text(), "too big negative integer near '-9223372036854775809'");
}

#[test]
fn real_overflow_and_underflow() {
    let err = decode_with("[1e400]", DecodeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Policy);
    assert_eq!(err.text(), "real number overflow near '1e400'");

    let err = decode_with("[-1.5e309]", DecodeOptions::default()).unwrap_err();
    assert_eq!(err.text(), "real number overflow near '-1.5e309'");

    assert_eq!(native("1e-400"), Value::Real(0.0));
    assert_eq!(native("4.9e-324"), Value::Real(5e-324));
}

#[test]
fn integers_beyond_i64_go_big_on_overflow() {
    let opts = options(BigIntegerMode::OnOverflow, BigRealMode::Disabled);
    assert_eq!(number("9223372036854775807", opts), Value::Integer(i64::MAX));
    assert_eq!(number("-9223372036854775808", opts), Value::Integer(i64::MIN));

    let big = number("9223372036854775808", opts);
    assert!(big.as_big_integer().is_some(), "{big:?}");
    assert_eq!(big.to_string(), "9223372036854775808");

    let big = number("-123456789012345678901234567890", opts);
    assert_eq!(big.to_string(), "-123456789012345678901234567890");
}

#[test]
fn every_integer_goes_big_when_always() {
    let opts = options(BigIntegerMode::Always, BigRealMode::Disabled);
    for text in ["0", "-0", "7", "-7", "99999999999999999999999"] {
        let n = number(text, opts);
        assert!(n.as_big_integer().is_some(), "{text}: {n:?}");
    }
    assert_eq!(number("-0", opts).to_string(), "0");
    // reals are left alone
    assert_eq!(number("1.5", opts), Value::Real(1.5));
}

#[rstest]
#[case("1.234567890123456789", true)]
#[case("1234567890123.4", true)]
#[case("123456789012.3", false)]
#[case("1.2345678901234e5", true)]
#[case("1.234567890123e300", false)]
#[case("0.000000000000001", false)]
#[case("1.5000000000000000000000", false)]
#[case("100000000000000000000.0", false)]
fn precision_loss_is_measured_in_significant_digits(#[case] text: &str, #[case] big: bool) {
    let opts = options(BigIntegerMode::Disabled, BigRealMode::OnPrecisionLoss);
    let n = number(text, opts);
    assert_eq!(n.as_big_real().is_some(), big, "{text}: {n:?}");
    if !big {
        assert_eq!(n, Value::Real(text.parse().unwrap()));
    }
}

#[test]
fn big_reals_keep_every_digit() {
    let opts = options(BigIntegerMode::Disabled, BigRealMode::OnPrecisionLoss);
    assert_eq!(
        number("1.234567890123456789", opts).to_string(),
        "1.234567890123456789"
    );
    assert_eq!(number("1.2345678901234e5", opts).to_string(), "123456.78901234");

    // without the mode the same text rounds
    assert_eq!(
        native("1.234567890123456789"),
        Value::Real("1.234567890123456789".parse().unwrap())
    );
}

#[test]
fn precision_mode_leaves_integers_native() {
    let opts = options(BigIntegerMode::Disabled, BigRealMode::OnPrecisionLoss);
    assert_eq!(
        number("1234567890123456789", opts),
        Value::Integer(1_234_567_890_123_456_789)
    );
}

#[test]
fn out_of_range_reals_go_big_when_enabled() {
    let opts = options(BigIntegerMode::Disabled, BigRealMode::OnPrecisionLoss);

    let n = number("1e400", opts);
    assert!(n.as_big_real().is_some(), "{n:?}");
    assert_eq!(n.to_string(), "1e400");

    let n = number("-1e-400", opts);
    assert!(n.as_big_real().is_some(), "{n:?}");
    assert_eq!(n.to_string(), "-1e-400");

    // an exact zero never underflows
    assert_eq!(number("0.0e-400", opts), Value::Real(0.0));
}

#[test]
fn precision_mode_falls_back_when_the_backend_cannot_hold_the_exponent() {
    let opts = options(BigIntegerMode::Disabled, BigRealMode::OnPrecisionLoss);
    assert_eq!(number("1e-99999999999999999999", opts), Value::Real(0.0));
    assert_eq!(
        number("1.234567890123456789e-99999999999999999999", opts),
        Value::Real(0.0)
    );
    assert_eq!(native("1e-99999999999999999999"), Value::Real(0.0));

    // same error as without the mode
    for opts in [DecodeOptions::default(), opts] {
        let err = decode_with("[1e99999999999999999999]", opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Policy);
        assert_eq!(err.text(), "real number overflow");
    }
}

#[test]
fn every_real_goes_big_when_always() {
    let opts = options(BigIntegerMode::Disabled, BigRealMode::Always);
    for (text, rendered) in [("1.5", "1.5"), ("0.0", "0.0"), ("1e2", "100.0"), ("-2E-3", "-0.002")] {
        let n = number(text, opts);
        assert!(n.as_big_real().is_some(), "{text}: {n:?}");
        assert_eq!(n.to_string(), rendered);
    }
    assert_eq!(number("15", opts), Value::Integer(15));
}

#[test]
fn grammar_is_checked_in_every_mode() {
    let opts = options(BigIntegerMode::Always, BigRealMode::Always);
    for (input, text) in [
        ("[-01]", "numbers may not have unnecessary leading zeros near '-0'"),
        ("[1.]", "invalid token near '1.'"),
        ("[1e]", "invalid token near '1e'"),
        ("[-]", "invalid token near '-'"),
    ] {
        let err = decode_with(input, opts).unwrap_err();
        assert_eq!(err.text(), text, "{input}");
    }
}

#[test]
fn int_as_real_defers_to_big_integers() {
    let opts = DecodeOptions {
        decode_int_as_real: true,
        big_integers: BigIntegerMode::OnOverflow,
        ..Default::default()
    };
    assert_eq!(number("12", opts), Value::Real(12.0));
    assert!(number("99999999999999999999", opts).as_big_integer().is_some());

    let always = DecodeOptions {
        big_integers: BigIntegerMode::Always,
        ..opts
    };
    assert!(number("12", always).as_big_integer().is_some());
}

#[test]
fn int_as_real_overflow() {
    let opts = DecodeOptions {
        decode_int_as_real: true,
        ..Default::default()
    };
    let huge = format!("1{}", "0".repeat(400));
    let err = decode_with(&format!("[{huge}]"), opts).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Policy);
    assert_eq!(err.text(), "real number overflow");
}
