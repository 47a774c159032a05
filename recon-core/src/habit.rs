//! Discretionary spending reported to the habit tracker.
//!
//! A split entry whose own share lands in a `Discretionary` account is counted against a
//! spending goal.  As with [`ExpenseClient`](crate::ExpenseClient), transport is left to the
//! implementor of [`HabitTracker`].

use chrono::NaiveDate;

use crate::money::Money;

/// Account segment marking spending that counts against the goal.
pub const DISCRETIONARY_SEGMENT: &str = "Discretionary";

/// One datapoint for the spending goal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HabitEntry {
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
}

pub trait HabitTracker {
    type Error;

    fn submit_expense(&self, entry: &HabitEntry) -> Result<(), Self::Error>;
}

impl<T: HabitTracker> HabitTracker for &T {
    type Error = T::Error;

    fn submit_expense(&self, entry: &HabitEntry) -> Result<(), Self::Error> {
        (**self).submit_expense(entry)
    }
}

/// Whether `account` has a `Discretionary` segment, e.g. `Expenses:Discretionary:Food`.
pub fn is_discretionary(account: &str) -> bool {
    account
        .split(':')
        .any(|segment| segment == DISCRETIONARY_SEGMENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discretionary_accounts() {
        assert!(is_discretionary("Expenses:Discretionary"));
        assert!(is_discretionary("Expenses:Discretionary:Food"));
        assert!(!is_discretionary("Expenses:Recurring"));
        assert!(!is_discretionary("Expenses:DiscretionaryFood"));
        assert!(!is_discretionary(""));
    }
}
