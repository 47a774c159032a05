use thiserror::Error;

use crate::transaction::Kind;

/// Errors raised while building or dividing a [`Money`](crate::Money) value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("malformed amount `{input}`: {reason}")]
    Malformed { input: String, reason: String },

    #[error("amount `{0}` has more than two fractional digits")]
    TooPrecise(String),

    #[error("amount does not fit in the cent representation")]
    Overflow,

    #[error("cannot split an amount into zero parts")]
    ZeroParts,
}

/// Precondition violations on a single journal entry.
///
/// These are programmer errors: the review flow is expected to check
/// [`JournalEntry::is_unprocessed`](crate::JournalEntry::is_unprocessed) before asking for a
/// categorization or a split.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("no book entry is posted to a default account, nothing to categorize")]
    NothingToCategorize,

    #[error("entry is not unprocessed, nothing to split")]
    NothingToSplit,

    #[error("entry has no book entry on a real account")]
    NoRealAccount,

    #[error("entry cannot be shared: it must be changed, come from one real account and owe the counterparty")]
    NotSplittable,

    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Errors raised at the boundary with bank and shared-expense data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("transaction `{id}` of kind {kind:?} has no destination account and cannot be imported")]
    NotImportable { id: String, kind: Kind },

    #[error("expense {expense_id} is shared between {shares} people, only two-way splits are supported")]
    TooManyShares { expense_id: u64, shares: usize },

    #[error("expense {expense_id} has no share for user {user_id}")]
    MissingShare { expense_id: u64, user_id: u64 },

    #[error("shares of expense `{description}` do not add up to its cost")]
    UnbalancedExpense { description: String },

    #[error("unknown account `{0}`")]
    UnknownAccount(String),

    #[error("unknown transaction kind `{0}`")]
    UnknownKind(String),

    #[error(transparent)]
    Money(#[from] MoneyError),
}
