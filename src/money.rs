//! Fixed-point money type.
//!
//! Uses `rust_decimal` internally so that shares, balances and transfers are
//! computed without floating-point drift. Amounts entering from outside are
//! rounded to 4 decimal places, while arithmetic keeps full precision so an
//! equal share times the roster size still adds back up to the total. Values
//! are rounded to 4 places again whenever they are displayed or serialized.
//!
//! Values cross the JSON boundary as plain numbers, and incoming values are
//! parsed leniently: anything that is not a usable number becomes zero.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A monetary amount, shown with exactly 4 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use bill_splitter::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.5000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places amounts are rounded to.
    pub const SCALE: u32 = 4;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// One cent. Balances and debts within this distance of zero count as settled.
    pub const EPSILON: Self = Money(Decimal::from_parts(100, 0, 0, false, 4));

    /// 10^20, the largest magnitude an amount can take. Inputs beyond it are
    /// not usable numbers, and arithmetic saturates at it.
    pub const MAX: Self = Money(Decimal::from_parts(0x6310_0000, 0x6bc7_5e2d, 0x5, false, 0));

    /// Creates a new `Money` from a `Decimal`, rounded to 4 decimal places
    /// and clamped to [`Money::MAX`].
    pub fn new(value: Decimal) -> Self {
        Money(bounded(value)).rounded()
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    /// Divides the amount into `parts` equal shares without rounding. Zero
    /// parts yields zero.
    pub fn split(self, parts: usize) -> Self {
        if parts == 0 {
            return Money::ZERO;
        }
        Money(self.0 / Decimal::from(parts as u64))
    }

    /// The value rounded half away from zero to 4 decimal places.
    pub fn rounded(self) -> Self {
        let mut value = self
            .0
            .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(Self::SCALE);
        Money(value)
    }

    /// The underlying decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Converts to `f64` for the JSON wire format, rounded to 4 places.
    pub fn to_f64(self) -> f64 {
        self.rounded().0.to_f64().unwrap_or(0.0)
    }

    /// Converts a float, mapping NaN, infinities and values beyond
    /// [`Money::MAX`] to zero.
    pub fn from_f64_lenient(value: f64) -> Self {
        if !value.is_finite() {
            return Money::ZERO;
        }
        Decimal::from_f64(value)
            .and_then(usable)
            .map(Money::new)
            .unwrap_or_default()
    }

/// Parses the longest numeric prefix of `input`, the way a browser's
    /// `parseFloat` does. Input without a leading number yields zero.
    ///
    /// ```
    /// use bill_splitter::Money;
    ///
    /// assert_eq!(Money::parse_lenient(" 12.5kg").to_string(), "12.5000");
    /// assert_eq!(Money::parse_lenient("abc").to_string(), "0.0000");
    /// ```
    pub fn parse_lenient(input: &str) -> Self {
        match numeric_prefix(input) {
            Some((mantissa, None)) => Decimal::from_str(&mantissa).ok(),
            Some((mantissa, Some(exp))) => {
                Decimal::from_scientific(&format!("{}e{}", mantissa, exp)).ok()
            }
            None => None,
        }
        .and_then(usable)
        .map(Money::new)
        .unwrap_or_default()
    }
}

fn bounded(value: Decimal) -> Decimal {
    value.clamp(-Money::MAX.0, Money::MAX.0)
}

fn usable(value: Decimal) -> Option<Decimal> {
    (value.abs() <= Money::MAX.0).then_some(value)
}

/// Splits `input` into a normalized mantissa and optional exponent, or `None`
/// when it does not start with a number.
fn numeric_prefix(input: &str) -> Option<(String, Option<String>)> {
    let bytes = input.trim().as_bytes();
    let mut pos = 0;
    let mut mantissa = String::new();

    if let Some(&sign) = bytes.first() {
        if sign == b'-' || sign == b'+' {
            if sign == b'-' {
                mantissa.push('-');
            }
            pos += 1;
        }
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &bytes[int_start..pos];

    let mut frac_digits: &[u8] = &[];
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &bytes[frac_start..end];
        pos = end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    if int_digits.is_empty() {
        mantissa.push('0');
    } else {
        mantissa.push_str(&String::from_utf8_lossy(int_digits));
    }
    if !frac_digits.is_empty() {
        mantissa.push('.');
        mantissa.push_str(&String::from_utf8_lossy(frac_digits));
    }

    let mut exponent = None;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        let mut exp = String::new();
        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            if bytes[end] == b'-' {
                exp.push('-');
            }
            end += 1;
        }
        let exp_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > exp_start {
            exp.push_str(&String::from_utf8_lossy(&bytes[exp_start..end]));
            exponent = Some(exp);
        }
    }

    Some((mantissa, exponent))
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        usable(decimal)
            .map(Money::new)
            .ok_or(rust_decimal::Error::ExceedsMaximumPossibleValue)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.rounded().0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(bounded(self.0.saturating_add(rhs.0)))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(bounded(self.0.saturating_sub(rhs.0)))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientMoneyVisitor)
    }
}

/// Accepts any JSON value; numbers and numeric strings are converted,
/// everything else becomes zero.
struct LenientMoneyVisitor;

impl<'de> Visitor<'de> for LenientMoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an amount")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Money, E> {
        Ok(Money::new(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Money, E> {
        Ok(Money::new(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Money, E> {
        Ok(Money::from_f64_lenient(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Money, E> {
        Ok(Money::parse_lenient(v))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> std::result::Result<Money, E> {
        Ok(Money::ZERO)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Money, E> {
        Ok(Money::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Money, E> {
        Ok(Money::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Money, D::Error> {
        d.deserialize_any(LenientMoneyVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Money, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Money::ZERO)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Money, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Money::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_from_str_normalizes_scale() {
        assert_eq!(money("1.0").to_string(), "1.0000");
        assert_eq!(money("1.1234").to_string(), "1.1234");
        assert_eq!(money("  2.5  ").to_string(), "2.5000");
    }

    #[test]
    fn test_arithmetic_preserves_scale() {
        let a = money("1.5");
        let b = money("2.5");

        assert_eq!((a + b).to_string(), "4.0000");
        assert_eq!((b - a).to_string(), "1.0000");
        assert_eq!((a - b).to_string(), "-1.0000");
    }

    #[test]
    fn test_split_keeps_full_precision() {
        let third = money("100").split(3);
        assert_eq!(third.to_string(), "33.3333");
        assert!(third > money("33.3333"));
        assert_eq!(money("200").split(3).to_string(), "66.6667");
        assert_eq!(money("90").split(2), money("45"));
        assert_eq!(money("90").split(0), Money::ZERO);
    }

    #[test]
    fn test_split_shares_add_back_to_total() {
        let share = money("1").split(700);
        let total: Money = std::iter::repeat(share).take(700).sum();
        assert!((total - money("1")).abs() < money("0.0001"));
    }

    #[test]
    fn test_rounded_and_serialized_at_four_places() {
        let third = money("100").split(3);
        assert_eq!(third.rounded(), money("33.3333"));
        assert_eq!(serde_json::to_string(&third).unwrap(), "33.3333");
        assert_eq!(money("0.00005").to_string(), "0.0001");
    }

    #[test]
    fn test_epsilon_is_one_cent() {
        assert_eq!(Money::EPSILON, money("0.01"));
        assert!(money("0.0099") < Money::EPSILON);
    }

    #[test]
    fn test_negative_detection() {
        assert!(money("-0.0001").is_negative());
        assert!(!Money::ZERO.is_negative());
        assert!(!(-Money::ZERO).is_negative());
        assert_eq!(money("-3.5").abs(), money("3.5"));
    }

    #[test]
    fn test_parse_lenient_prefixes() {
        assert_eq!(Money::parse_lenient("42"), money("42"));
        assert_eq!(Money::parse_lenient("  -7.25 "), money("-7.25"));
        assert_eq!(Money::parse_lenient("12abc"), money("12"));
        assert_eq!(Money::parse_lenient(".5"), money("0.5"));
        assert_eq!(Money::parse_lenient("3."), money("3"));
        assert_eq!(Money::parse_lenient("1.5e2"), money("150"));
        assert_eq!(Money::parse_lenient("2e"), money("2"));
        assert_eq!(Money::parse_lenient(""), Money::ZERO);
        assert_eq!(Money::parse_lenient("abc"), Money::ZERO);
        assert_eq!(Money::parse_lenient("-"), Money::ZERO);
    }

    #[test]
    fn test_from_f64_lenient_rejects_non_finite() {
        assert_eq!(Money::from_f64_lenient(f64::NAN), Money::ZERO);
        assert_eq!(Money::from_f64_lenient(f64::INFINITY), Money::ZERO);
        assert_eq!(Money::from_f64_lenient(12.5), money("12.5"));
    }

    #[test]
    fn test_deserialize_any_json_shape() {
        let values: Vec<Money> =
            serde_json::from_str(r#"[10, 2.5, "7.5", "x", null, true, [1], {"a": 1}]"#).unwrap();
        assert_eq!(
            values,
            vec![
                money("10"),
                money("2.5"),
                money("7.5"),
                Money::ZERO,
                Money::ZERO,
                Money::ZERO,
                Money::ZERO,
                Money::ZERO,
            ]
        );
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&money("33.3333")).unwrap();
        assert_eq!(json, "33.3333");
    }

    #[test]
    fn test_huge_amounts_are_unusable() {
        assert_eq!(Money::from_f64_lenient(5e28), Money::ZERO);
        assert_eq!(Money::parse_lenient("5e28"), Money::ZERO);
        assert_eq!(Money::parse_lenient("-1e21"), Money::ZERO);
        assert!(Money::from_str("50000000000000000000000000000").is_err());
        assert_eq!(Money::parse_lenient("1e20"), Money::MAX);
    }

    #[test]
    fn test_arithmetic_saturates_at_max() {
        assert_eq!(Money::MAX + Money::MAX, Money::MAX);
        assert_eq!(-Money::MAX - Money::MAX, -Money::MAX);
        let mut total = Money::MAX;
        total += money("1");
        assert_eq!(total, Money::MAX);
        assert_eq!(total.to_string(), "100000000000000000000.0000");
    }

    #[test]
    fn test_sum() {
        let total: Money = [money("1.25"), money("2.75")].iter().sum();
        assert_eq!(total, money("4"));
    }
}
