//! Fixed-point BRL amount.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PixError, Result};

/// Centavos per real.
const CENTS_PER_UNIT: u64 = 100;

/// A non-negative BRL amount with two fraction digits, stored in centavos.
///
/// Parses from decimal strings such as `"49.90"`, `"49.9"` or `"49"` and
/// renders as `"49.90"`: no thousands separator, no currency symbol.
///
/// # Examples
///
/// ```
/// use pix_brcode::models::Amount;
///
/// let amount: Amount = "49.9".parse().unwrap();
/// assert_eq!(amount.cents(), 4990);
/// assert_eq!(amount.to_string(), "49.90");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    /// Creates an amount from a number of centavos.
    #[inline]
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in centavos.
    #[inline]
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Returns `true` for `0.00`.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Amount {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0.div_euclid(CENTS_PER_UNIT),
            self.0.rem_euclid(CENTS_PER_UNIT)
        )
    }
}

impl FromStr for Amount {
    type Err = PixError;

    #[inline]
    fn from_str(input: &str) -> Result<Self> {
        let invalid = |reason| PixError::InvalidAmount {
            input: input.to_owned(),
            reason,
        };
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }
        if trimmed.starts_with('-') {
            return Err(invalid("negative"));
        }
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((_, "")) => return Err(invalid("missing fraction digits")),
            Some(parts) => parts,
            None => (trimmed, ""),
        };
        if !is_digits(whole) || !fraction.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid("not a decimal number"));
        }
        if fraction.len() > 2 {
            return Err(invalid("more than two fraction digits"));
        }
        let padded = format!("{fraction:0<2}");
        whole
            .parse::<u64>()
            .ok()
            .and_then(|units| units.checked_mul(CENTS_PER_UNIT))
            .zip(padded.parse::<u64>().ok())
            .and_then(|(units, cents)| units.checked_add(cents))
            .map(Self)
            .ok_or_else(|| invalid("too large"))
    }
}

impl TryFrom<f64> for Amount {
    type Error = PixError;

    /// Converts a floating-point number through its shortest decimal
    /// representation, so `49.9` becomes `49.90` while `0.1 + 0.2` is
    /// rejected for carrying more than two fraction digits.
    #[inline]
    fn try_from(value: f64) -> Result<Self> {
        format!("{value}").parse()
    }
}

impl Serialize for Amount {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        AmountInput::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// An amount as supplied by a caller: a decimal string or a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// Decimal string such as `"49.90"`.
    Text(String),
    /// Plain number such as `49.9`.
    Number(f64),
}

impl AmountInput {
    /// Validates the input and converts it into an [`Amount`].
    ///
    /// # Errors
    ///
    /// Returns [`PixError::InvalidAmount`] if the value is negative,
    /// non-numeric or has more than two fraction digits.
    #[inline]
    pub fn parse(self) -> Result<Amount> {
        match self {
            Self::Text(text) => text.parse(),
            Self::Number(number) => Amount::try_from(number),
        }
    }
}

impl From<&str> for AmountInput {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<f64> for AmountInput {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Amount> for AmountInput {
    #[inline]
    fn from(value: Amount) -> Self {
        Self::Text(value.to_string())
    }
}

/// Returns `true` if `raw` is a non-empty run of ASCII digits.
fn is_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit())
}
