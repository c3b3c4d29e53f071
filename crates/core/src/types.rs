use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Catalog identifiers are opaque strings (e.g. `"mag1"`, `"pkg5"`).
pub type MagazineId = String;

pub type PackageId = String;

pub type IssueId = String;

/// A non-negative amount of money, held as whole cents.
///
/// On the wire a price is a plain JSON number in currency units: whole
/// amounts serialize as integers (`500`), others as decimals (`499.99`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Largest price a catalog may carry. Sums of any realistic selection
    /// stay far below `u64::MAX` cents.
    pub const MAX: Price = Price(1_000_000_000 * 100);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// A price of `units` whole currency units.
    pub const fn whole(units: u64) -> Self {
        Self(units * 100)
    }

    /// Convert a decimal amount, rounding to the nearest cent. `None` for
    /// negative, non-finite or out-of-range amounts.
    pub fn from_units(units: f64) -> Option<Self> {
        if !units.is_finite() || units < 0.0 {
            return None;
        }
        let cents = (units * 100.0).round();
        if cents > Self::MAX.0 as f64 {
            return None;
        }
        Some(Self(cents as u64))
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, other: Price) -> Price {
        Price(self.0.saturating_add(other.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Price::saturating_add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (units, cents) = (self.0 / 100, self.0 % 100);
        if cents == 0 {
            write!(f, "{units}")
        } else {
            write!(f, "{units}.{cents:02}")
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_u64(self.0 / 100)
        } else {
            serializer.serialize_f64(self.0 as f64 / 100.0)
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let units = f64::deserialize(deserializer)?;
        Price::from_units(units).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "price {units} must be a finite amount between 0 and {}",
                Price::MAX
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_drops_zero_cents() {
        assert_eq!(Price::whole(750).to_string(), "750");
        assert_eq!(Price::from_cents(49_999).to_string(), "499.99");
        assert_eq!(Price::from_cents(1_005).to_string(), "10.05");
    }

    #[test]
    fn from_units_rounds_to_cents() {
        assert_eq!(Price::from_units(499.99), Some(Price::from_cents(49_999)));
        assert_eq!(Price::from_units(0.1 + 0.2), Some(Price::from_cents(30)));
        assert_eq!(Price::from_units(0.0), Some(Price::ZERO));
    }

    #[test]
    fn from_units_rejects_negative_and_non_finite() {
        assert_eq!(Price::from_units(-0.01), None);
        assert_eq!(Price::from_units(f64::NAN), None);
        assert_eq!(Price::from_units(f64::INFINITY), None);
        assert_eq!(Price::from_units(1e12), None);
    }

    #[test]
    fn json_accepts_integers_and_decimals() {
        let whole: Price = serde_json::from_str("500").unwrap();
        let fractional: Price = serde_json::from_str("499.99").unwrap();
        assert_eq!(whole, Price::whole(500));
        assert_eq!(fractional, Price::from_cents(49_999));
        assert!(serde_json::from_str::<Price>("-1").is_err());
    }

    #[test]
    fn json_writes_whole_prices_as_integers() {
        assert_eq!(serde_json::to_value(Price::whole(750)).unwrap(), serde_json::json!(750));
        assert_eq!(
            serde_json::to_value(Price::from_cents(49_999)).unwrap(),
            serde_json::json!(499.99)
        );
    }

    #[test]
    fn sum_saturates() {
        let total: Price = [Price::from_cents(u64::MAX), Price::from_cents(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(u64::MAX));
    }
}
