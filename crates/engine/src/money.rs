use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg},
    str::FromStr,
};

use crate::EngineError;

/// Exact decimal amount held as integer cents.
///
/// A transaction amount lies in `0..=Money::MAX_AMOUNT`; its sign comes from
/// [`TransactionKind`]. Totals (balances, monthly sums) are signed and
/// saturate at the `i64` bounds instead of overflowing.
///
/// ```rust
/// use engine::Money;
///
/// let lunch: Money = "12,5".parse().unwrap();
/// assert_eq!(lunch.cents(), 1250);
/// assert_eq!(lunch.to_string(), "12.50");
/// assert!("12.345".parse::<Money>().is_err());
/// ```
///
/// [`TransactionKind`]: crate::TransactionKind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest amount one transaction may carry (one billion).
    pub const MAX_AMOUNT: Money = Money(100_000_000_000);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checks the bounds of a single transaction amount.
    pub fn as_transaction_amount(self) -> Result<Money, EngineError> {
        if self.is_negative() {
            Err(EngineError::InvalidAmount(
                "amount must not be negative".to_string(),
            ))
        } else if self > Self::MAX_AMOUNT {
            Err(EngineError::InvalidAmount(format!(
                "amount must not exceed {}",
                Self::MAX_AMOUNT
            )))
        } else {
            Ok(self)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
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
        *self = *self + rhs;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Decimal text with `.` or `,` as separator, an optional sign and at
    /// most two fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("\"{}\" is not a decimal amount", s.trim()));

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let (negative, digits) = match trimmed.as_bytes()[0] {
            b'-' => (true, trimmed[1..].trim_start()),
            b'+' => (false, trimmed[1..].trim_start()),
            _ => (false, trimmed),
        };
        let (units, fraction) = digits
            .split_once(['.', ','])
            .unwrap_or((digits, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) {
            return Err(invalid());
        }
        let fraction_cents: i64 = match fraction.len() {
            0 => 0,
            1 => i64::from(fraction.as_bytes()[0] - b'0') * 10,
            2 => fraction.parse().map_err(|_| invalid())?,
            _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
        };

        let too_large = || EngineError::InvalidAmount("amount too large".to_string());
        let cents = units
            .parse::<i64>()
            .map_err(|_| too_large())?
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or_else(too_large)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}
