//! Data model and reconciliation engine for a plain-text, double-entry journal.
//!
//! A [`Journal`] is an ordered list of [`JournalEntry`]s, each a dated group of [`BookEntry`]
//! legs whose [`Money`] amounts sum to zero.  Activity observed outside the journal arrives as
//! [`Transaction`]s and [`Balance`]s and is folded in without creating duplicates.

pub use account::Account;
pub use book_entry::{
    BookEntry, BookEntryUpdate, DEFAULT_ACCOUNTS, DEFAULT_EXPENSE_ACCOUNT, DEFAULT_INCOME_ACCOUNT,
};
pub use error::{EntryError, ImportError, MoneyError};
pub use expense::{
    Expense, ExpenseClient, ExpenseShare, Friend, SharedExpenseSource, SubmittedExpense,
    OWN_USER_ID,
};
pub use habit::{is_discretionary, HabitEntry, HabitTracker, DISCRETIONARY_SEGMENT};
pub use journal::{ImportOutcome, Journal, BALANCE_ASSERTION_DESCRIPTION};
pub use journal_entry::JournalEntry;
pub use money::Money;
pub use rules::{classify, ImportRule};
pub use source::Source;
pub use transaction::{Balance, Kind, Transaction};
pub use validate::Validator;

pub mod account;
pub mod book_entry;
mod error;
pub mod expense;
pub mod habit;
pub mod journal;
pub mod journal_entry;
mod money;
pub mod rules;
mod source;
pub mod transaction;
mod validate;
