use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Signed money amount represented as **integer paise**.
///
/// Use this type for **all** monetary values in the ledger (balances,
/// transaction amounts, report totals) to avoid floating-point drift.
///
/// The value is signed:
/// - positive = income / credit
/// - negative = expense / debit
///
/// # Examples
///
/// ```rust
/// use engine::MoneyPaise;
///
/// let amount = MoneyPaise::new(12_34);
/// assert_eq!(amount.paise(), 1234);
/// assert_eq!(amount.to_string(), "₹12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::MoneyPaise;
///
/// assert_eq!("10".parse::<MoneyPaise>().unwrap().paise(), 1000);
/// assert_eq!("10,5".parse::<MoneyPaise>().unwrap().paise(), 1050);
/// assert!("12.345".parse::<MoneyPaise>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyPaise(i64);

impl MoneyPaise {
    pub const ZERO: MoneyPaise = MoneyPaise(0);

    /// Creates a new amount from integer paise.
    #[must_use]
    pub const fn new(paise: i64) -> Self {
        Self(paise)
    }

    /// Creates a new amount from whole rupees.
    #[must_use]
    pub const fn from_rupees(rupees: i64) -> Self {
        Self(rupees * 100)
    }

    /// Returns the raw value in paise.
    #[must_use]
    pub const fn paise(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyPaise) -> Option<MoneyPaise> {
        self.0.checked_add(rhs.0).map(MoneyPaise)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyPaise) -> Option<MoneyPaise> {
        self.0.checked_sub(rhs.0).map(MoneyPaise)
    }

    /// Plain decimal rendering without the currency symbol.
    ///
    /// Whole-rupee amounts drop the fraction (`"100"`), anything else keeps
    /// two digits (`"100.50"`). This is the form written to CSV exports.
    #[must_use]
    pub fn to_decimal_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let rupees = abs / 100;
        let paise = abs % 100;
        if paise == 0 {
            format!("{sign}{rupees}")
        } else {
            format!("{sign}{rupees}.{paise:02}")
        }
    }
}

impl fmt::Display for MoneyPaise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let rupees = abs / 100;
        let paise = abs % 100;
        write!(f, "{sign}₹{rupees}.{paise:02}")
    }
}

impl From<i64> for MoneyPaise {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyPaise> for i64 {
    fn from(value: MoneyPaise) -> Self {
        value.0
    }
}

impl Add for MoneyPaise {
    type Output = MoneyPaise;

    fn add(self, rhs: MoneyPaise) -> Self::Output {
        MoneyPaise(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyPaise {
    fn add_assign(&mut self, rhs: MoneyPaise) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyPaise {
    type Output = MoneyPaise;

    fn sub(self, rhs: MoneyPaise) -> Self::Output {
        MoneyPaise(self.0 - rhs.0)
    }
}

impl SubAssign for MoneyPaise {
    fn sub_assign(&mut self, rhs: MoneyPaise) {
        self.0 -= rhs.0;
    }
}

impl Neg for MoneyPaise {
    type Output = MoneyPaise;

    fn neg(self) -> Self::Output {
        MoneyPaise(-self.0)
    }
}

impl FromStr for MoneyPaise {
    type Err = LedgerError;

    /// Parses a decimal string into paise.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || LedgerError::Validation("empty amount".to_string());
        let invalid = || LedgerError::Validation("invalid amount".to_string());
        let overflow = || LedgerError::Validation("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let rupees_str = parts.next().ok_or_else(invalid)?;
        let paise_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if rupees_str.is_empty() || !rupees_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let rupees: i64 = rupees_str.parse().map_err(|_| invalid())?;

        let paise: i64 = match paise_str {
            None => 0,
            Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    0 => 0,
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(LedgerError::Validation("too many decimals".to_string())),
                }
            }
        };

        let total = rupees
            .checked_mul(100)
            .and_then(|v| v.checked_add(paise))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(MoneyPaise(signed))
    }
}
