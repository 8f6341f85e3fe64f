//! Fixed-point currency.
//!
//! Amounts are held as whole cents so table sums are exact. On the wire a
//! `Money` is a plain decimal number of dollars, matching what the profile
//! document has always stored.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Convert a dollar amount, rounding to the nearest cent.
    /// NaN, infinities and negative amounts collapse to zero.
    pub fn from_dollars(dollars: f64) -> Self {
        if !dollars.is_finite() || dollars <= 0.0 {
            return Money::ZERO;
        }
        let cents = (dollars * 100.0).round();
        if cents >= i64::MAX as f64 {
            Money(i64::MAX)
        } else {
            Money(cents as i64)
        }
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(rhs)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.dollars())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl<'de> Visitor<'de> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a dollar amount as a number or string")
            }

            fn visit_f64<E>(self, v: f64) -> Result<Money, E> {
                Ok(Money::from_dollars(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Money, E> {
                Ok(Money::from_dollars(v as f64))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Money, E> {
                Ok(Money::from_dollars(v as f64))
            }

            fn visit_str<E>(self, v: &str) -> Result<Money, E>
            where
                E: de::Error,
            {
                let cleaned: String = v.chars().filter(|c| *c != '$' && *c != ',').collect();
                Ok(cleaned
                    .trim()
                    .parse::<f64>()
                    .map(Money::from_dollars)
                    .unwrap_or(Money::ZERO))
            }

            fn visit_none<E>(self) -> Result<Money, E> {
                Ok(Money::ZERO)
            }

            fn visit_unit<E>(self) -> Result<Money, E> {
                Ok(Money::ZERO)
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dollars_rounds_to_cents() {
        assert_eq!(Money::from_dollars(1759.19).cents(), 175919);
        assert_eq!(Money::from_dollars(0.005).cents(), 1);
        assert_eq!(Money::from_dollars(106.14 * 3.0).cents(), 31842);
    }

    #[test]
    fn test_non_finite_and_negative_collapse_to_zero() {
        assert_eq!(Money::from_dollars(f64::NAN), Money::ZERO);
        assert_eq!(Money::from_dollars(f64::INFINITY), Money::ZERO);
        assert_eq!(Money::from_dollars(-12.0), Money::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(404491).to_string(), "4044.91");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let total: Money = [Money::from_cents(100), Money::from_cents(250)].into_iter().sum();
        assert_eq!(total, Money::from_cents(350));
        assert_eq!(Money::from_cents(3100) * 2, Money::from_cents(6200));
    }

    #[test]
    fn test_serde_as_dollars() {
        let json = serde_json::to_string(&Money::from_cents(34695)).expect("serialize money");
        assert_eq!(json, "346.95");

        let parsed: Money = serde_json::from_str("\"$1,208.04\"").expect("parse string money");
        assert_eq!(parsed.cents(), 120804);

        let parsed: Money = serde_json::from_str("null").expect("parse null money");
        assert!(parsed.is_zero());
    }
}
