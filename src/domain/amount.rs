use rust_decimal::Decimal;
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

/// Amount charged for an appointment when nothing else is configured.
pub const DEFAULT_REQUIRED_AMOUNT: u64 = 100;

/// A whole-franc amount of Rwandan francs.
///
/// Mobile-money notifications never carry fractional francs, so values always
/// have a scale of zero. Amounts too large for `Decimal` saturate at
/// `Decimal::MAX`, which still exceeds any `u64` price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rwf(Decimal);

impl Rwf {
    /// Parses the `amount` text of a stored transaction, e.g. `"7,000 RWF"`.
    ///
    /// The currency suffix and thousands separators are dropped and the rest
    /// must be an integer. Anything else yields `None`.
    pub fn parse_stored(text: &str) -> Option<Self> {
        let cleaned = text.replace(" RWF", "").replace(',', "");
        let cleaned = cleaned.trim();
        let (negative, digits) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.strip_prefix('+').unwrap_or(cleaned)),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let significant = digits.trim_start_matches('0');
        let value = if significant.is_empty() {
            Decimal::ZERO
        } else {
            Decimal::from_str(significant).unwrap_or(Decimal::MAX)
        };
        Some(Self(if negative { -value } else { value }))
    }
}

impl From<u64> for Rwf {
    fn from(value: u64) -> Self {
        Self(Decimal::from(value))
    }
}

impl Sub for Rwf {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Rwf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
