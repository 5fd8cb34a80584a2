//! Exact decimal values for monetary amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! `DecimalValue` wraps `rust_decimal::Decimal` and refuses every operation that
//! would round: text that cannot be represented exactly is rejected, and an
//! addition whose result cannot keep the operands' scale is an overflow.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by decimal parsing and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalError {
    /// Text is not a plain decimal number.
    #[error("invalid decimal format: {0:?}")]
    InvalidFormat(String),

    /// Result does not fit without losing precision.
    #[error("decimal arithmetic overflow")]
    Overflow,

    /// A change triple whose diff disagrees with `new - old`.
    #[error("inconsistent change: diff {diff} is not {new} - {old}")]
    InconsistentChange {
        /// Old value.
        old: String,
        /// New value.
        new: String,
        /// Supplied diff.
        diff: String,
    },
}

/// An exact decimal amount.
///
/// Equality is decimal equality: `1.0 == 1.00`. The textual form keeps the
/// scale, so `from_text(x.to_text())` reproduces `x` digit for digit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DecimalValue(Decimal);

impl DecimalValue {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Returns the zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Wraps an existing `Decimal`.
    #[must_use]
    pub fn from_decimal(value: Decimal) -> Self {
        Self(normalize(value))
    }

    /// Parses a decimal from text.
    ///
    /// Accepts an optional sign, digits, and at most one decimal point with
    /// at least one digit overall. Exponents, separators, whitespace and values
    /// that cannot be held exactly are rejected.
    pub fn from_text(text: &str) -> Result<Self, DecimalError> {
        let invalid = || DecimalError::InvalidFormat(text.to_string());

        let (negative, body) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (body, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid());
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }

        let int_part = if int_part.is_empty() { "0" } else { int_part };
        let canonical = if frac_part.is_empty() {
            int_part.to_string()
        } else {
            format!("{int_part}.{frac_part}")
        };

        let magnitude = Decimal::from_str_exact(&canonical).map_err(|_| invalid())?;
        let value = if negative { -magnitude } else { magnitude };

        Ok(Self(normalize(value)))
    }

    /// Canonical text: no leading `+`, scale preserved, zero never signed.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.0.to_string()
    }

    /// Exact addition.
    pub fn add(&self, other: &Self) -> Result<Self, DecimalError> {
        let scale = self.0.scale().max(other.0.scale());
        let sum = self.0.checked_add(other.0).ok_or(DecimalError::Overflow)?;
        keep_scale(sum, scale)
    }

    /// Exact subtraction (`self - other`).
    pub fn subtract(&self, other: &Self) -> Result<Self, DecimalError> {
        let scale = self.0.scale().max(other.0.scale());
        let difference = self.0.checked_sub(other.0).ok_or(DecimalError::Overflow)?;
        keep_scale(difference, scale)
    }

    /// Sign flip. Never fails.
    #[must_use]
    pub fn negate(&self) -> Self {
        Self(normalize(-self.0))
    }

    /// Exact sum of a sequence of values, starting from zero.
    pub fn checked_sum<'a, I>(values: I) -> Result<Self, DecimalError>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        values
            .into_iter()
            .try_fold(Self::ZERO, |acc, value| acc.add(value))
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Number of digits after the decimal point.
    #[must_use]
    pub fn scale(&self) -> u32 {
        self.0.scale()
    }

    /// Returns the inner `Decimal`.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }
}

fn normalize(mut value: Decimal) -> Decimal {
    if value.is_zero() {
        value.set_sign_positive(true);
    }
    value
}

/// `rust_decimal` trades scale for range when a mantissa overflows; that is a
/// rounding, so it is reported as an overflow instead.
fn keep_scale(value: Decimal, scale: u32) -> Result<DecimalValue, DecimalError> {
    if value.scale() == scale {
        Ok(DecimalValue(normalize(value)))
    } else {
        Err(DecimalError::Overflow)
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for DecimalValue {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl TryFrom<String> for DecimalValue {
    type Error = DecimalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_text(&value)
    }
}

impl From<DecimalValue> for String {
    fn from(value: DecimalValue) -> Self {
        value.to_text()
    }
}

impl From<Decimal> for DecimalValue {
    fn from(value: Decimal) -> Self {
        Self::from_decimal(value)
    }
}

/// A before/after pair together with its difference.
///
/// `diff == new - old` always holds: the only constructor is
/// [`DecimalValueChange::between`], and deserialization re-derives the diff
/// and rejects payloads that disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChange")]
pub struct DecimalValueChange {
    old: DecimalValue,
    new: DecimalValue,
    diff: DecimalValue,
}

impl DecimalValueChange {
    /// Builds the change from `old` to `new`.
    pub fn between(old: DecimalValue, new: DecimalValue) -> Result<Self, DecimalError> {
        let diff = new.subtract(&old)?;
        Ok(Self { old, new, diff })
    }

    /// Value before the change.
    #[must_use]
    pub const fn old(&self) -> DecimalValue {
        self.old
    }

    /// Value after the change.
    #[must_use]
    pub const fn new(&self) -> DecimalValue {
        self.new
    }

    /// `new - old`.
    #[must_use]
    pub const fn diff(&self) -> DecimalValue {
        self.diff
    }
}

#[derive(Deserialize)]
struct RawChange {
    old: DecimalValue,
    new: DecimalValue,
    diff: DecimalValue,
}

impl TryFrom<RawChange> for DecimalValueChange {
    type Error = DecimalError;

    fn try_from(raw: RawChange) -> Result<Self, Self::Error> {
        let change = Self::between(raw.old, raw.new)?;
        if change.diff == raw.diff {
            Ok(change)
        } else {
            Err(DecimalError::InconsistentChange {
                old: raw.old.to_text(),
                new: raw.new.to_text(),
                diff: raw.diff.to_text(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn value(text: &str) -> DecimalValue {
        DecimalValue::from_text(text).expect("valid decimal")
    }

    #[rstest]
    #[case("0", "0")]
    #[case("100.00", "100.00")]
    #[case("-42.5", "-42.5")]
    #[case("+7", "7")]
    #[case(".5", "0.5")]
    #[case("12.", "12")]
    #[case("-0.00", "0.00")]
    #[case("0.0000000001", "0.0000000001")]
    fn test_from_text_canonical(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(value(input).to_text(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("-")]
    #[case(".")]
    #[case("1.2.3")]
    #[case("abc")]
    #[case("12a")]
    #[case("1e5")]
    #[case("1_000")]
    #[case(" 1")]
    #[case("--1")]
    #[case("1,5")]
    #[case("99999999999999999999999999999999")]
    #[case("0.00000000000000000000000000001")]
    fn test_from_text_rejects_malformed(#[case] input: &str) {
        let result = DecimalValue::from_text(input);
        assert_eq!(result, Err(DecimalError::InvalidFormat(input.to_string())));
    }

    #[test]
    fn test_decimal_equality_ignores_trailing_zeros() {
        assert_eq!(value("1.0"), value("1.00"));
        assert_eq!(value("1.00").to_text(), "1.00");
    }

    #[test]
    fn test_add_and_subtract_are_exact() {
        let a = value("0.1");
        let b = value("0.2");
        assert_eq!(a.add(&b).expect("add"), value("0.3"));
        assert_eq!(value("100.00").subtract(&value("80.00")).expect("sub").to_text(), "20.00");
        assert_eq!(value("50.00").subtract(&value("50.00")).expect("sub").to_text(), "0.00");
    }

    #[test]
    fn test_negate() {
        assert_eq!(value("12.34").negate(), value("-12.34"));
        assert_eq!(value("0.00").negate().to_text(), "0.00");
        assert!(!value("0").negate().is_negative());
    }

    #[test]
    fn test_add_overflow_is_error() {
        let max = DecimalValue::from_decimal(Decimal::MAX);
        assert_eq!(max.add(&value("1")), Err(DecimalError::Overflow));
    }

    #[test]
    fn test_add_refuses_scale_loss() {
        let big = DecimalValue::from_decimal(Decimal::MAX);
        let tiny = value("0.5");
        assert_eq!(big.subtract(&tiny), Err(DecimalError::Overflow));
    }

    #[test]
    fn test_checked_sum() {
        let values = [value("1.10"), value("2.20"), value("-0.30")];
        assert_eq!(DecimalValue::checked_sum(&values).expect("sum").to_text(), "3.00");
        assert_eq!(DecimalValue::checked_sum(&[]).expect("sum"), DecimalValue::ZERO);
    }

    #[test]
    fn test_from_decimal_matches_text() {
        assert_eq!(DecimalValue::from_decimal(dec!(80.00)), value("80.00"));
    }

    #[test]
    fn test_serde_uses_strings() {
        let json = serde_json::to_string(&value("12.50")).expect("serialize");
        assert_eq!(json, "\"12.50\"");

        let parsed: DecimalValue = serde_json::from_str("\"-3.25\"").expect("deserialize");
        assert_eq!(parsed, value("-3.25"));

        assert!(serde_json::from_str::<DecimalValue>("\"1.2.3\"").is_err());
    }

    #[test]
    fn test_change_between() {
        let change = DecimalValueChange::between(value("80.00"), value("100.00")).expect("change");
        assert_eq!(change.old(), value("80.00"));
        assert_eq!(change.new(), value("100.00"));
        assert_eq!(change.diff().to_text(), "20.00");
    }

    #[test]
    fn test_change_rejects_tampered_diff() {
        let json = r#"{"old":"80.00","new":"100.00","diff":"25.00"}"#;
        let err = serde_json::from_str::<DecimalValueChange>(json).expect_err("tampered");
        assert!(err.to_string().contains("inconsistent change"));
    }

    #[test]
    fn test_change_serde_round_trip() {
        let change = DecimalValueChange::between(value("-5.5"), value("4.25")).expect("change");
        let json = serde_json::to_string(&change).expect("serialize");
        assert_eq!(json, r#"{"old":"-5.5","new":"4.25","diff":"9.75"}"#);

        let back: DecimalValueChange = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, change);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn decimal_text() -> impl Strategy<Value = String> {
        "-?[0-9]{1,15}(\\.[0-9]{1,10})?"
    }

    fn amount() -> impl Strategy<Value = DecimalValue> {
        (-1_000_000_000_000i64..1_000_000_000_000, 0u32..6)
            .prop_map(|(units, scale)| DecimalValue::from_decimal(Decimal::new(units, scale)))
    }

    proptest! {
        /// Parsing the canonical text of a parsed value gives the same value back.
        #[test]
        fn prop_text_round_trip(text in decimal_text()) {
            let parsed = DecimalValue::from_text(&text).expect("valid text");
            let reparsed = DecimalValue::from_text(&parsed.to_text()).expect("canonical text");

            prop_assert_eq!(reparsed, parsed);
            prop_assert_eq!(reparsed.scale(), parsed.scale());
            prop_assert_eq!(reparsed.to_text(), parsed.to_text());
        }

        /// Subtraction undoes addition without drift.
        #[test]
        fn prop_add_then_subtract(a in amount(), b in amount()) {
            let sum = a.add(&b).expect("no overflow");
            prop_assert_eq!(sum.subtract(&b).expect("no overflow"), a);
        }

        /// diff == new - old, before and after a JSON round-trip.
        #[test]
        fn prop_change_invariant_survives_serde(old in amount(), new in amount()) {
            let change = DecimalValueChange::between(old, new).expect("no overflow");
            prop_assert_eq!(change.diff(), new.subtract(&old).expect("no overflow"));

            let json = serde_json::to_string(&change).expect("serialize");
            let back: DecimalValueChange = serde_json::from_str(&json).expect("deserialize");
            prop_assert_eq!(back.diff(), back.new().subtract(&back.old()).expect("no overflow"));
            prop_assert_eq!(back, change);
        }

        /// Negation twice is identity.
        #[test]
        fn prop_double_negate(a in amount()) {
            prop_assert_eq!(a.negate().negate(), a);
        }
    }
}
