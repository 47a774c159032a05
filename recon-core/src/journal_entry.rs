use chrono::NaiveDate;
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::book_entry::{BookEntry, BookEntryUpdate};
use crate::error::{EntryError, ImportError, MoneyError};
use crate::expense::{Expense, ExpenseClient, ExpenseShare, Friend, OWN_USER_ID};
use crate::habit::{is_discretionary, HabitEntry, HabitTracker};
use crate::money::Money;
use crate::transaction::Transaction;

/// Descriptions of peer-to-peer transfers, which settle shared expenses rather than create them.
const TRANSFER_MARKER: &str = "E-TRANSFER";

/// Represents a dated, described group of legs that sum to zero.
///
/// ```text
/// 2021-01-04 TIM HORTONS
///     Assets:Checking:TD  -4.25 ; tid:TDChecking.21206211949700010
///     expenses:unknown  4.25
/// ```
///
/// The order of the legs is kept for display.  Two entries are equal when their date and
/// description match and they hold the same legs in any order.
#[derive(Clone, Debug, TypedBuilder)]
pub struct JournalEntry {
    pub date: NaiveDate,

    #[builder(setter(into))]
    pub description: String,

    book_entries: Vec<BookEntry>,

    /// Set once the entry has been categorized or split.
    #[builder(default, setter(skip))]
    changed: bool,
}

impl JournalEntry {
    pub fn book_entries(&self) -> &[BookEntry] {
        &self.book_entries
    }

    /// Legs can be edited in place but not added or removed.
    pub fn book_entries_mut(&mut self) -> &mut [BookEntry] {
        &mut self.book_entries
    }

    pub fn accounts(&self) -> Vec<&str> {
        self.book_entries
            .iter()
            .map(|book_entry| book_entry.account.as_str())
            .collect()
    }

    pub fn book_entry_ids(&self) -> Vec<&str> {
        self.book_entries
            .iter()
            .filter_map(|book_entry| book_entry.id.as_deref())
            .collect()
    }

    pub fn is_balanced(&self) -> bool {
        Money::checked_sum(self.book_entries.iter().map(|book_entry| book_entry.amount))
            .map_or(false, Money::is_zero)
    }

    /// Whether the entry was imported automatically and still has a leg in a default bucket.
    pub fn is_unprocessed(&self) -> bool {
        self.book_entries.iter().any(BookEntry::is_default_book)
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Whether the entry should be submitted to the shared-expense service.
    pub fn is_splittable(&self) -> bool {
        self.changed
            && self
                .book_entries
                .iter()
                .filter(|book_entry| book_entry.is_real_account_book())
                .count()
                == 1
            && self.unsynced_counterparty_book_entry().is_some()
            && !self.description.contains(TRANSFER_MARKER)
    }

    /// Records `transaction` on the first unmatched leg that describes it.
    ///
    /// Returns whether a leg was matched.  Nothing changes when the dates differ.
    pub fn associate(&mut self, transaction: &Transaction) -> bool {
        if self.date != transaction.date {
            return false;
        }

        match self
            .book_entries
            .iter_mut()
            .find(|book_entry| book_entry.looks_like(transaction))
        {
            Some(book_entry) => {
                book_entry.update(BookEntryUpdate {
                    id: Some(transaction.full_id()),
                    ..Default::default()
                });
                true
            }
            None => false,
        }
    }

    /// Moves the first leg in a default bucket to `account`.
    pub fn categorize(&mut self, account: impl Into<String>) -> Result<(), EntryError> {
        let book_entry = self
            .book_entries
            .iter_mut()
            .find(|book_entry| book_entry.is_default_book())
            .ok_or(EntryError::NothingToCategorize)?;

        book_entry.update(BookEntryUpdate {
            account: Some(account.into()),
            ..Default::default()
        });
        self.changed = true;
        Ok(())
    }

    /// Shares the uncategorized amount with the counterparty.
    ///
    /// The default-bucket leg is halved: the first half goes to the counterparty's account and
    /// the second to `other_account`.  The entry is left with exactly those two legs followed by
    /// its real-account leg.
    pub fn split_with(&mut self, other_account: impl Into<String>) -> Result<(), EntryError> {
        let to_split = self
            .book_entries
            .iter()
            .find(|book_entry| book_entry.is_default_book())
            .ok_or(EntryError::NothingToSplit)?;
        let real = self
            .real_book_entry()
            .ok_or(EntryError::NoRealAccount)?
            .clone();

        let parts = to_split.amount.split(2)?;
        let (counterparty_amount, own_amount) = match parts.as_slice() {
            [first, second] => (*first, *second),
            _ => return Err(EntryError::NothingToSplit),
        };

        self.book_entries = vec![
            BookEntry::builder()
                .account(counterparty_account())
                .amount(counterparty_amount)
                .build(),
            BookEntry::builder()
                .account(other_account)
                .amount(own_amount)
                .build(),
            real,
        ];
        self.changed = true;
        Ok(())
    }

    /// The expense to create on the shared-expense service for a splittable entry.
    pub fn expense_payload(&self) -> Result<Expense, EntryError> {
        if !self.is_splittable() {
            return Err(EntryError::NotSplittable);
        }
        let real = self
            .real_book_entry()
            .ok_or(EntryError::NoRealAccount)?
            .amount;
        let counterparty = self
            .unsynced_counterparty_book_entry()
            .ok_or(EntryError::NotSplittable)?
            .amount;

        let friend_id = Friend::Jacinthe.user_id();
        let overflow = || EntryError::Money(MoneyError::Overflow);
        let cost = real.checked_abs().ok_or_else(overflow)?;
        let expense_shares = if real.is_positive() {
            let counterparty_paid = counterparty.checked_abs().ok_or_else(overflow)?;
            vec![
                ExpenseShare {
                    user_id: friend_id,
                    paid: counterparty_paid,
                    owes: Money::zero(),
                },
                ExpenseShare {
                    user_id: OWN_USER_ID,
                    paid: cost.checked_sub(counterparty_paid).ok_or_else(overflow)?,
                    owes: cost,
                },
            ]
        } else {
            vec![
                ExpenseShare {
                    user_id: friend_id,
                    paid: Money::zero(),
                    owes: counterparty,
                },
                ExpenseShare {
                    user_id: OWN_USER_ID,
                    paid: cost,
                    owes: cost.checked_sub(counterparty).ok_or_else(overflow)?,
                },
            ]
        };

        Ok(Expense {
            cost,
            description: self.description.clone(),
            date: self.date,
            expense_shares,
        })
    }

    /// The habit-tracker datapoint for a splittable entry whose own share went to a
    /// discretionary account.
    pub fn habit_payload(&self) -> Option<HabitEntry> {
        if !self.is_splittable() {
            return None;
        }
        let own = self.own_book_entry()?;
        if !is_discretionary(&own.account) {
            return None;
        }
        Some(HabitEntry {
            description: self.description.clone(),
            amount: own.amount.checked_abs()?,
            date: self.date,
        })
    }

    /// Submits the entry to the shared-expense service if it is splittable, and its
    /// discretionary share to the habit tracker.
    ///
    /// Returns whether an expense was created.
    pub fn sync_with<C, H>(&self, client: &C, tracker: &H) -> Result<bool, C::Error>
    where
        C: ExpenseClient,
        H: HabitTracker,
        C::Error: From<H::Error>,
    {
        let expense = match self.expense_payload() {
            Ok(expense) => expense,
            Err(_) => return Ok(false),
        };
        if !expense.is_valid() {
            return Err(ImportError::UnbalancedExpense {
                description: expense.description,
            }
            .into());
        }

        debug!(
            date = %self.date,
            description = %self.description,
            cost = %expense.cost,
            "creating shared expense"
        );
        client.create_expense(&expense)?;

        if let Some(habit) = self.habit_payload() {
            debug!(
                amount = %habit.amount,
                description = %habit.description,
                "submitting to habit tracker"
            );
            tracker.submit_expense(&habit)?;
        }
        Ok(true)
    }

    fn real_book_entry(&self) -> Option<&BookEntry> {
        self.book_entries
            .iter()
            .find(|book_entry| book_entry.is_real_account_book())
    }

    /// The leg that is neither on a real account nor owed by the counterparty.
    fn own_book_entry(&self) -> Option<&BookEntry> {
        let counterparty = counterparty_account();
        self.book_entries.iter().find(|book_entry| {
            !book_entry.is_real_account_book() && book_entry.account != counterparty
        })
    }

    fn unsynced_counterparty_book_entry(&self) -> Option<&BookEntry> {
        let account = counterparty_account();
        self.book_entries
            .iter()
            .find(|book_entry| book_entry.account == account && book_entry.id.is_none())
    }
}

fn counterparty_account() -> &'static str {
    Friend::Jacinthe.account().ledger_account()
}

impl PartialEq for JournalEntry {
    fn eq(&self, other: &Self) -> bool {
        if self.date != other.date
            || self.description != other.description
            || self.book_entries.len() != other.book_entries.len()
        {
            return false;
        }

        let mut ours: Vec<&BookEntry> = self.book_entries.iter().collect();
        let mut theirs: Vec<&BookEntry> = other.book_entries.iter().collect();
        ours.sort();
        theirs.sort();
        ours == theirs
    }
}

impl Eq for JournalEntry {}
