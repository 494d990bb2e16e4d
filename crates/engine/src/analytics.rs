//! Derived figures over the transaction set.
//!
//! Nothing here is cached: a summary is recomputed from a snapshot of the
//! store on every request.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::{Money, Transaction, TransactionKind};

pub const DEFAULT_TOP_CATEGORIES: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Money,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub total_balance: Money,
    pub monthly_income: Money,
    pub monthly_expenses: Money,
    /// Current-month expenses per category.
    pub category_breakdown: BTreeMap<String, Money>,
    /// Same grouping, largest first, truncated.
    pub top_categories: Vec<CategoryTotal>,
}

/// The calendar month containing a given instant.
///
/// `start` is the first instant of the month and `end` the first instant of
/// the next one, so a date belongs to the month iff `start <= date < end`.
/// That is the same set as `[first day 00:00:00, last day 23:59:59.999..]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// Month of `now`, as seen in `now`'s timezone.
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let first = today - Days::new(u64::from(today.day0()));
        let next = first + Months::new(1);
        Self {
            start: local_midnight(&tz, first),
            end: local_midnight(&tz, next),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    // A DST gap at midnight has no local instant; fall back to UTC midnight.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Builds the summary of `transactions` for the month `window`.
pub fn summarize(transactions: &[Transaction], window: &MonthWindow, top: usize) -> AnalyticsSummary {
    let total_balance: Money = transactions.iter().map(Transaction::signed_amount).sum();

    let monthly: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| window.contains(tx.date))
        .collect();

    let monthly_income = sum_kind(&monthly, TransactionKind::Income);
    let monthly_expenses = sum_kind(&monthly, TransactionKind::Expense);

    let mut groups: HashMap<&str, (Money, usize)> = HashMap::new();
    for tx in monthly.iter().filter(|tx| tx.kind == TransactionKind::Expense) {
        let entry = groups.entry(tx.category.as_str()).or_default();
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    let mut ranked: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (amount, count))| CategoryTotal {
            category: category.to_string(),
            amount,
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));

    let category_breakdown = ranked
        .iter()
        .map(|total| (total.category.clone(), total.amount))
        .collect();
    ranked.truncate(top);

    AnalyticsSummary {
        total_balance,
        monthly_income,
        monthly_expenses,
        category_breakdown,
        top_categories: ranked,
    }
}

fn sum_kind(transactions: &[&Transaction], kind: TransactionKind) -> Money {
    transactions
        .iter()
        .filter(|tx| tx.kind == kind)
        .map(|tx| tx.amount)
        .sum()
}
