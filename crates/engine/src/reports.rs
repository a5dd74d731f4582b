//! Read-only aggregation over the live transaction set.
//!
//! Everything here is a pure function over slices: reports are recomputed
//! from the full set on every read, never cached, and never write back to
//! the store. The [`Ledger`](crate::Ledger) report methods load the live
//! sets and delegate to these.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::{MoneyPaise, Transaction, TransactionKind, User};

/// Inclusive calendar-day range; transactions are bucketed by the date part
/// of their timestamp.
#[derive(Clone, Copy, Debug)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.from <= day && day <= self.to
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: MoneyPaise,
}

/// Expense totals per category within the range; blank categories bucket
/// under `"Uncategorized"`.
#[must_use]
pub fn expense_by_category(transactions: &[Transaction], range: &DateRange) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<String, MoneyPaise> = BTreeMap::new();
    for tx in transactions {
        if tx.kind != TransactionKind::Expense || !range.contains(tx.date) {
            continue;
        }
        let category = if tx.category.trim().is_empty() {
            "Uncategorized"
        } else {
            tx.category.as_str()
        };
        *totals.entry(category.to_string()).or_insert(MoneyPaise::ZERO) += tx.amount;
    }
    totals
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct UserTotals {
    pub user_id: String,
    pub name: String,
    pub expense: MoneyPaise,
    pub income: MoneyPaise,
}

/// Per-user expense and income totals within the range.
///
/// Income counts the income-like kinds (`Income`, `Profit`,
/// `Return of Principal`); transactions from unknown user ids are skipped.
#[must_use]
pub fn totals_by_user(
    users: &[User],
    transactions: &[Transaction],
    range: &DateRange,
) -> Vec<UserTotals> {
    let mut totals: Vec<UserTotals> = users
        .iter()
        .map(|user| UserTotals {
            user_id: user.id.clone(),
            name: user.name.clone(),
            expense: MoneyPaise::ZERO,
            income: MoneyPaise::ZERO,
        })
        .collect();
    let index: HashMap<&str, usize> = users
        .iter()
        .enumerate()
        .map(|(idx, user)| (user.id.as_str(), idx))
        .collect();

    for tx in transactions {
        if !range.contains(tx.date) {
            continue;
        }
        let Some(&idx) = index.get(tx.user.as_str()) else {
            continue;
        };
        if tx.kind == TransactionKind::Expense {
            totals[idx].expense += tx.amount;
        } else if tx.kind.is_income_like() {
            totals[idx].income += tx.amount;
        }
    }
    totals
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    pub income: MoneyPaise,
    pub expense: MoneyPaise,
    pub net: MoneyPaise,
}

/// Income vs. expense for the trailing `months` calendar months ending at
/// `now`'s month, oldest first.
///
/// Income buckets the income-like kinds; expense buckets `Expense` and
/// `Investment`; transfers move money between members and count in neither.
#[must_use]
pub fn monthly_trend(
    transactions: &[Transaction],
    months: usize,
    now: NaiveDate,
) -> Vec<MonthlyPoint> {
    if months == 0 {
        return Vec::new();
    }

    let month_index = |year: i32, month: u32| i64::from(year) * 12 + i64::from(month) - 1;
    let last = month_index(now.year(), now.month());
    let first = last - (months as i64 - 1);

    let mut points: Vec<MonthlyPoint> = (first..=last)
        .map(|idx| MonthlyPoint {
            year: (idx.div_euclid(12)) as i32,
            month: (idx.rem_euclid(12)) as u32 + 1,
            income: MoneyPaise::ZERO,
            expense: MoneyPaise::ZERO,
            net: MoneyPaise::ZERO,
        })
        .collect();

    for tx in transactions {
        let day = tx.date.date_naive();
        let idx = month_index(day.year(), day.month()) - first;
        if idx < 0 || idx >= months as i64 {
            continue;
        }
        let point = &mut points[idx as usize];
        if tx.kind.is_income_like() {
            point.income += tx.amount;
        } else if tx.kind.is_expense_like() {
            point.expense += tx.amount;
        }
    }

    for point in &mut points {
        point.net = point.income - point.expense;
    }
    points
}

/// Newest-first history for one member: everything they originated plus
/// every transfer sent to them, deduplicated by transaction id.
#[must_use]
pub fn user_history(transactions: Vec<Transaction>, user_id: &str) -> Vec<Transaction> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut history: Vec<Transaction> = transactions
        .into_iter()
        .filter(|tx| tx.user == user_id || tx.to.as_deref() == Some(user_id))
        .filter(|tx| seen.insert(tx.id.clone()))
        .collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));
    history
}
