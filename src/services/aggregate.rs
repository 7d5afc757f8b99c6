//! Balance aggregation
//!
//! Pure functions over in-memory slices of accounts and transactions. Two
//! balance notions coexist on purpose: account balances count every
//! transaction whatever its status, while the paid totals only count what has
//! actually been paid. Both are computed here and kept apart.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::models::date::{local_date, local_midnight};
use crate::models::{Account, AccountId, Money, Transaction, TransactionStatus};

/// Expense total for one category label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

/// Result of [`aggregate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSummary {
    /// Signed sum per known account, scheduled transactions included
    pub per_account: HashMap<AccountId, Money>,

    /// Sum of `per_account`
    pub total_balance: Money,

    /// Income with status paid
    pub paid_income_total: Money,

    /// Expenses with status paid
    pub paid_expense_total: Money,

    /// All expenses by category, largest first, ties by label
    pub expense_by_category: Vec<CategoryTotal>,

    /// Signed sums for transactions whose account is not in the input
    pub orphaned: HashMap<AccountId, Money>,
}

impl BalanceSummary {
    /// Balance of one account, zero when unknown
    pub fn balance_of(&self, id: AccountId) -> Money {
        self.per_account.get(&id).copied().unwrap_or_default()
    }

    /// Paid income minus paid expenses
    pub fn net_paid(&self) -> Money {
        self.paid_income_total - self.paid_expense_total
    }

    pub fn has_orphans(&self) -> bool {
        !self.orphaned.is_empty()
    }
}

/// Compute balances and totals.
///
/// Every account in `accounts` gets an entry, even with no transactions.
/// Transactions pointing at an account that is not in `accounts` are kept out
/// of the balances and reported in `orphaned`; they still count towards the
/// paid totals and the category breakdown.
pub fn aggregate(accounts: &[Account], transactions: &[Transaction]) -> BalanceSummary {
    let mut per_account: HashMap<AccountId, Money> =
        accounts.iter().map(|a| (a.id, Money::zero())).collect();
    let mut orphaned: HashMap<AccountId, Money> = HashMap::new();

    let mut paid_income_total = Money::zero();
    let mut paid_expense_total = Money::zero();
    let mut by_category: HashMap<&str, Money> = HashMap::new();

    for txn in transactions {
        match per_account.get_mut(&txn.account_id) {
            Some(balance) => *balance += txn.signed_amount(),
            None => *orphaned.entry(txn.account_id).or_default() += txn.signed_amount(),
        }

        if txn.status == TransactionStatus::Paid {
            if txn.is_income() {
                paid_income_total += txn.amount;
            } else {
                paid_expense_total += txn.amount;
            }
        }

        if txn.is_expense() {
            *by_category.entry(txn.category.as_str()).or_default() += txn.amount;
        }
    }

    if !orphaned.is_empty() {
        tracing::warn!(
            accounts = orphaned.len(),
            "transactions reference accounts that are not loaded"
        );
    }

    let mut expense_by_category: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    expense_by_category.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    let total_balance = per_account.values().copied().sum();

    BalanceSummary {
        per_account,
        total_balance,
        paid_income_total,
        paid_expense_total,
        expense_by_category,
        orphaned,
    }
}

/// Net of paid transactions only
pub fn net_paid_total(transactions: &[Transaction]) -> Money {
    transactions
        .iter()
        .filter(|t| t.status == TransactionStatus::Paid)
        .map(Transaction::signed_amount)
        .sum()
}

/// A category's slice of total spending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryShare {
    pub category: String,
    pub total: Money,
    /// Rounded percentage of the grand total (0-100)
    pub percent: u32,
}

/// Attach rounded percentages to category totals, keeping their order
pub fn category_shares(rows: &[CategoryTotal]) -> Vec<CategoryShare> {
    let sum = rows.iter().map(|r| r.total).sum::<Money>().cents();
    let denominator = if sum > 0 { sum } else { 1 };

    rows.iter()
        .map(|row| {
            let ratio = row.total.cents() as f64 / denominator as f64;
            CategoryShare {
                category: row.category.clone(),
                total: row.total,
                percent: (ratio * 100.0).round().max(0.0) as u32,
            }
        })
        .collect()
}

/// Spending over the current day, week and month
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub today: Money,
    /// The last seven days, today included
    pub week: Money,
    pub month: Money,
}

/// Sum expense amounts whose occurrence date falls on or after the local start
/// of today, of six days before today, and of the first of the month.
pub fn expense_period_totals<Tz: TimeZone>(
    transactions: &[Transaction],
    now: DateTime<Utc>,
    tz: &Tz,
) -> PeriodTotals {
    let today = local_date(now, tz);
    let day_start = local_midnight(today, tz);
    let week_start = local_midnight(today - Duration::days(6), tz);
    let month_start = local_midnight(today.with_day(1).unwrap_or(today), tz);

    let mut totals = PeriodTotals::default();
    for txn in transactions.iter().filter(|t| t.is_expense()) {
        if txn.date >= day_start {
            totals.today += txn.amount;
        }
        if txn.date >= week_start {
            totals.week += txn.amount;
        }
        if txn.date >= month_start {
            totals.month += txn.amount;
        }
    }
    totals
}

/// Scheduled expenses due in the given month.
///
/// Any unpaid status counts as scheduled, since overdue is only ever derived.
/// `month0` is zero-based. A due date matches when its local date or its UTC
/// date falls in the month, so bills saved at UTC midnight are not lost near
/// month boundaries.
pub fn scheduled_for_month<'a, Tz: TimeZone>(
    transactions: &'a [Transaction],
    year: i32,
    month0: u32,
    tz: &Tz,
) -> Vec<&'a Transaction> {
    let in_month = |y: i32, m0: u32| y == year && m0 == month0;

    transactions
        .iter()
        .filter(|t| t.is_expense() && !t.status.is_paid())
        .filter(|t| match t.due_date {
            Some(due) => {
                let local = local_date(due, tz);
                let utc = due.date_naive();
                in_month(local.year(), local.month0()) || in_month(utc.year(), utc.month0())
            }
            None => false,
        })
        .collect()
}

/// Order a pending list: earliest due first, undated last, then by label
pub fn sort_pending(items: &mut [&Transaction]) {
    items.sort_by(|a, b| {
        let due = match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        due.then_with(|| a.label().cmp(b.label()))
    });
}

/// Order a paid list: most recently paid first, then by label
pub fn sort_paid(items: &mut [&Transaction]) {
    let paid_ms = |t: &Transaction| t.paid_at.map_or(0, |p| p.timestamp_millis());
    items.sort_by(|a, b| {
        paid_ms(*b)
            .cmp(&paid_ms(*a))
            .then_with(|| a.label().cmp(b.label()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, TransactionDraft, TransactionKind};
    use chrono::FixedOffset;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn txn(
        account: &Account,
        kind: TransactionKind,
        cents: i64,
        status: TransactionStatus,
        category: &str,
    ) -> Transaction {
        let now = ts(2024, 3, 10, 12);
        TransactionDraft::new(account.id, kind, Money::from_cents(cents))
            .category(category)
            .status(status)
            .build(now)
            .unwrap()
    }

    #[test]
    fn test_empty_inputs() {
        let summary = aggregate(&[], &[]);
        assert!(summary.per_account.is_empty());
        assert_eq!(summary.total_balance, Money::zero());
        assert_eq!(summary.paid_income_total, Money::zero());
        assert_eq!(summary.paid_expense_total, Money::zero());
        assert!(summary.expense_by_category.is_empty());
    }

    #[test]
    fn test_accounts_without_transactions_start_at_zero() {
        let a = Account::new("Card", AccountType::Card);
        let b = Account::new("Savings", AccountType::Savings);

        let summary = aggregate(&[a.clone(), b.clone()], &[]);
        assert_eq!(summary.per_account.len(), 2);
        assert_eq!(summary.balance_of(a.id), Money::zero());
        assert_eq!(summary.balance_of(b.id), Money::zero());
    }

    #[test]
    fn test_scheduled_counts_in_balance_but_not_paid_totals() {
        let account = Account::new("Card", AccountType::Card);
        let transactions = vec![
            txn(&account, TransactionKind::Income, 10000, TransactionStatus::Paid, "Salary"),
            txn(&account, TransactionKind::Expense, 4000, TransactionStatus::Scheduled, "Rent"),
        ];

        let summary = aggregate(&[account.clone()], &transactions);
        assert_eq!(summary.balance_of(account.id), Money::from_cents(6000));
        assert_eq!(summary.total_balance, Money::from_cents(6000));
        assert_eq!(summary.paid_income_total, Money::from_cents(10000));
        assert_eq!(summary.paid_expense_total, Money::zero());
        assert_eq!(summary.net_paid(), Money::from_cents(10000));
    }

    #[test]
    fn test_total_equals_sum_of_accounts() {
        let a = Account::new("Card", AccountType::Card);
        let b = Account::new("Cash", AccountType::Cash);
        let transactions = vec![
            txn(&a, TransactionKind::Income, 5000, TransactionStatus::Paid, "Salary"),
            txn(&b, TransactionKind::Expense, 1200, TransactionStatus::Paid, "Food"),
            txn(&b, TransactionKind::Expense, 800, TransactionStatus::Overdue, "Food"),
        ];

        let summary = aggregate(&[a, b], &transactions);
        let sum: Money = summary.per_account.values().copied().sum();
        assert_eq!(sum, summary.total_balance);
        assert_eq!(summary.total_balance, Money::from_cents(3000));
    }

    #[test]
    fn test_paid_totals_match_net_paid() {
        let account = Account::new("Card", AccountType::Card);
        let transactions = vec![
            txn(&account, TransactionKind::Income, 7000, TransactionStatus::Paid, "Salary"),
            txn(&account, TransactionKind::Income, 3000, TransactionStatus::Scheduled, "Bonus"),
            txn(&account, TransactionKind::Expense, 2500, TransactionStatus::Paid, "Rent"),
            txn(&account, TransactionKind::Expense, 900, TransactionStatus::Scheduled, "Gym"),
        ];

        let summary = aggregate(&[account], &transactions);
        assert_eq!(
            summary.paid_income_total - summary.paid_expense_total,
            net_paid_total(&transactions)
        );
        assert_eq!(net_paid_total(&transactions), Money::from_cents(4500));
    }

    #[test]
    fn test_categories_cover_all_expenses_sorted() {
        let account = Account::new("Card", AccountType::Card);
        let transactions = vec![
            txn(&account, TransactionKind::Expense, 500, TransactionStatus::Paid, "Food"),
            txn(&account, TransactionKind::Expense, 700, TransactionStatus::Scheduled, "Rent"),
            txn(&account, TransactionKind::Expense, 200, TransactionStatus::Overdue, "Food"),
            txn(&account, TransactionKind::Expense, 100, TransactionStatus::Paid, "Bus"),
            txn(&account, TransactionKind::Income, 9999, TransactionStatus::Paid, "Salary"),
        ];

        let summary = aggregate(&[account], &transactions);
        let rows: Vec<(&str, i64)> = summary
            .expense_by_category
            .iter()
            .map(|r| (r.category.as_str(), r.total.cents()))
            .collect();
        // Food and Rent tie at 700; label order decides
        assert_eq!(rows, vec![("Food", 700), ("Rent", 700), ("Bus", 100)]);

        let all_expenses: i64 = transactions
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.amount.cents())
            .sum();
        let category_sum: i64 = rows.iter().map(|(_, c)| c).sum();
        assert_eq!(category_sum, all_expenses);
    }

    #[test]
    fn test_orphans_reported_separately() {
        let known = Account::new("Card", AccountType::Card);
        let missing = Account::new("Deleted", AccountType::Cash);
        let transactions = vec![
            txn(&known, TransactionKind::Income, 1000, TransactionStatus::Paid, "Salary"),
            txn(&missing, TransactionKind::Expense, 300, TransactionStatus::Paid, "Food"),
        ];

        let summary = aggregate(&[known.clone()], &transactions);
        assert_eq!(summary.per_account.len(), 1);
        assert_eq!(summary.total_balance, Money::from_cents(1000));
        assert_eq!(summary.orphaned.get(&missing.id), Some(&Money::from_cents(-300)));
        assert_eq!(summary.paid_expense_total, Money::from_cents(300));
        assert!(summary.has_orphans());
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let account = Account::new("Card", AccountType::Card);
        let transactions = vec![
            txn(&account, TransactionKind::Income, 1000, TransactionStatus::Paid, "Salary"),
            txn(&account, TransactionKind::Expense, 300, TransactionStatus::Scheduled, "Food"),
        ];
        let accounts = [account];

        assert_eq!(
            aggregate(&accounts, &transactions),
            aggregate(&accounts, &transactions)
        );
    }

    #[test]
    fn test_huge_amounts_do_not_overflow() {
        let account = Account::new("Card", AccountType::Card);
        let mut big = txn(&account, TransactionKind::Income, 0, TransactionStatus::Paid, "Salary");
        big.amount = Money::from_cents(i64::MAX);
        let transactions = vec![big.clone(), big];

        let summary = aggregate(&[account.clone()], &transactions);
        assert_eq!(summary.balance_of(account.id), Money::from_cents(i64::MAX));
        assert_eq!(summary.paid_income_total, Money::from_cents(i64::MAX));
        assert_eq!(net_paid_total(&transactions), Money::from_cents(i64::MAX));

        let shares = category_shares(&[
            CategoryTotal { category: "Rent".into(), total: Money::from_cents(i64::MAX) },
            CategoryTotal { category: "Food".into(), total: Money::from_cents(i64::MAX) },
        ]);
        assert_eq!(shares.len(), 2);
    }

    #[test]
    fn test_oversized_stored_amounts_aggregate_as_zero() {
        let account = Account::new("Card", AccountType::Card);
        let stored = txn(&account, TransactionKind::Expense, 100, TransactionStatus::Paid, "Food");
        let mut value = serde_json::to_value(&stored).unwrap();
        value["amountCents"] = serde_json::json!(9_000_000_000_000_000_000_i64);
        let loaded: Transaction = serde_json::from_value(value).unwrap();

        let summary = aggregate(&[account.clone()], &[loaded.clone(), loaded]);
        assert_eq!(summary.balance_of(account.id), Money::zero());
        assert_eq!(summary.paid_expense_total, Money::zero());
    }

    #[test]
    fn test_category_shares_rounding() {
        let rows = vec![
            CategoryTotal {
                category: "Rent".into(),
                total: Money::from_cents(200),
            },
            CategoryTotal {
                category: "Food".into(),
                total: Money::from_cents(100),
            },
        ];

        let shares = category_shares(&rows);
        assert_eq!(shares[0].percent, 67);
        assert_eq!(shares[1].percent, 33);
        assert!(category_shares(&[]).is_empty());
    }

    #[test]
    fn test_expense_period_totals() {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let account = Account::new("Card", AccountType::Card);
        // 2024-03-10 12:00 local
        let now = ts(2024, 3, 10, 15);

        let at = |when: DateTime<Utc>, cents: i64| {
            TransactionDraft::expense(account.id, Money::from_cents(cents))
                .date(when)
                .build(when)
                .unwrap()
        };
        let transactions = vec![
            at(ts(2024, 3, 10, 4), 100),  // 01:00 local today
            at(ts(2024, 3, 10, 2), 200),  // 23:00 local yesterday
            at(ts(2024, 3, 4, 3), 400),   // local midnight six days ago
            at(ts(2024, 3, 1, 3), 800),   // local first of the month
            at(ts(2024, 2, 29, 12), 1600), // last month
        ];

        let totals = expense_period_totals(&transactions, now, &tz);
        assert_eq!(totals.today, Money::from_cents(100));
        assert_eq!(totals.week, Money::from_cents(700));
        assert_eq!(totals.month, Money::from_cents(1500));
    }

    #[test]
    fn test_scheduled_for_month_matches_local_or_utc() {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let account = Account::new("Card", AccountType::Card);
        let now = ts(2024, 3, 1, 12);
        let due = |when: DateTime<Utc>| {
            TransactionDraft::expense(account.id, Money::from_cents(100))
                .due(when)
                .build(now)
                .unwrap()
        };

        let transactions = vec![
            due(ts(2024, 3, 15, 12)),
            // UTC midnight April 1st is still March 31st locally
            due(ts(2024, 4, 1, 0)),
            // UTC midnight March 1st is February 29th locally but March in UTC
            due(ts(2024, 3, 1, 0)),
            due(ts(2024, 4, 10, 12)),
        ];

        let march = scheduled_for_month(&transactions, 2024, 2, &tz);
        assert_eq!(march.len(), 3);

        let mut paid = due(ts(2024, 3, 20, 12));
        paid.mark_paid(now);
        assert!(scheduled_for_month(&[paid], 2024, 2, &tz).is_empty());

        let mut stale = due(ts(2024, 3, 25, 12));
        stale.status = TransactionStatus::Overdue;
        assert_eq!(scheduled_for_month(&[stale], 2024, 2, &tz).len(), 1);
    }

    #[test]
    fn test_pending_and_paid_ordering() {
        let account = Account::new("Card", AccountType::Card);
        let now = ts(2024, 3, 1, 12);
        let make = |note: &str, due: Option<DateTime<Utc>>| {
            let mut draft = TransactionDraft::expense(account.id, Money::from_cents(100))
                .note(note)
                .status(TransactionStatus::Scheduled);
            if let Some(due) = due {
                draft = draft.due(due);
            }
            draft.build(now).unwrap()
        };

        let internet = make("Internet", Some(ts(2024, 3, 12, 12)));
        let rent = make("Rent", Some(ts(2024, 3, 5, 12)));
        let gym = make("Gym", None);
        let water = make("Water", Some(ts(2024, 3, 5, 12)));

        let mut pending = vec![&internet, &gym, &water, &rent];
        sort_pending(&mut pending);
        let labels: Vec<&str> = pending.iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["Rent", "Water", "Internet", "Gym"]);

        let mut early = make("Early", None);
        early.mark_paid(ts(2024, 3, 2, 12));
        let mut late = make("Late", None);
        late.mark_paid(ts(2024, 3, 8, 12));
        let never = make("Never", None);

        let mut paid = vec![&early, &never, &late];
        sort_paid(&mut paid);
        let labels: Vec<&str> = paid.iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["Late", "Early", "Never"]);
    }
}
