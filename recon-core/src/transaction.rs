use std::str::FromStr;

use chrono::NaiveDate;
use typed_builder::TypedBuilder;

use crate::account::Account;
use crate::book_entry::{DEFAULT_EXPENSE_ACCOUNT, DEFAULT_INCOME_ACCOUNT};
use crate::error::ImportError;
use crate::money::Money;

/// What a bank reports a transaction to be.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
    Debit,
    Credit,
    Assertion,
}

impl Kind {
    /// The default account the offsetting book entry of an imported transaction is posted to.
    ///
    /// Assertions have no destination and cannot be imported as transactions.
    pub fn destination_ledger_account(self) -> Option<&'static str> {
        match self {
            Kind::Debit => Some(DEFAULT_EXPENSE_ACCOUNT),
            Kind::Credit => Some(DEFAULT_INCOME_ACCOUNT),
            Kind::Assertion => None,
        }
    }
}

impl FromStr for Kind {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debit" => Ok(Kind::Debit),
            "credit" => Ok(Kind::Credit),
            "assertion" => Ok(Kind::Assertion),
            _ => Err(ImportError::UnknownKind(s.to_string())),
        }
    }
}

/// A transaction reported by a bank export or the shared-expense service.
#[derive(Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct Transaction {
    /// Id assigned by the source, unique within `account`.
    #[builder(setter(into))]
    pub transaction_id: String,

    pub account: Account,

    #[builder(setter(into))]
    pub payee: String,

    pub amount: Money,

    pub date: NaiveDate,

    pub kind: Kind,
}

impl Transaction {
    /// The account-scoped id stored on book entries, e.g. `TDChecking.21206211949700010`.
    pub fn full_id(&self) -> String {
        format!("{}.{}", self.account.serialize(), self.transaction_id)
    }

    pub fn source_ledger_account(&self) -> &'static str {
        self.account.ledger_account()
    }

    pub fn destination_ledger_account(&self) -> Option<&'static str> {
        self.kind.destination_ledger_account()
    }
}

/// A point-in-time balance of an account.
#[derive(Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct Balance {
    pub account: Account,
    pub amount: Money,
    pub as_of: NaiveDate,
}

impl Balance {
    /// The id of the assertion entry recording this balance, e.g. `SplitwiseJacinthe.20210101`.
    pub fn ledger_id(&self) -> String {
        format!("{}.{}", self.account.serialize(), self.as_of.format("%Y%m%d"))
    }
}
