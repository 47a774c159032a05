use typed_builder::TypedBuilder;

use crate::account::Account;
use crate::money::Money;
use crate::transaction::Transaction;

/// Bucket that auto-imported debits are posted to until they are categorized.
pub const DEFAULT_EXPENSE_ACCOUNT: &str = "expenses:unknown";

/// Bucket that auto-imported credits are posted to until they are categorized.
pub const DEFAULT_INCOME_ACCOUNT: &str = "income:unknown";

pub const DEFAULT_ACCOUNTS: [&str; 2] = [DEFAULT_EXPENSE_ACCOUNT, DEFAULT_INCOME_ACCOUNT];

/// Represents a single leg of a journal entry: an amount posted to an account.
///
/// A leg can carry a balance assertion, the balance the account is expected to have once the
/// leg is applied, and the id of the bank or shared-expense transaction it was matched to:
///
/// ```text
/// 2021-01-01 BALANCE ASSERTION
///     Assets:Reimbursements:Splitwise:Jacinthe  0.00 = -12.34 ; tid:SplitwiseJacinthe.20210101
/// ```
///
/// Legs are ordered by account first so that entries can compare their legs regardless of the
/// order they are displayed in.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, TypedBuilder)]
pub struct BookEntry {
    /// Account being posted to.
    #[builder(setter(into))]
    pub account: String,

    pub amount: Money,

    #[builder(default, setter(strip_option))]
    pub balance_assertion: Option<Money>,

    /// Account-scoped id of the external transaction this leg was matched to.
    #[builder(default, setter(strip_option, into))]
    pub id: Option<String>,
}

/// A partial change to a [`BookEntry`].  Fields left as `None` are not touched.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BookEntryUpdate {
    pub account: Option<String>,
    pub amount: Option<Money>,
    pub balance_assertion: Option<Money>,
    pub id: Option<String>,
}

impl BookEntry {
    /// Whether this leg is the one `transaction` describes and has not been matched yet.
    pub fn looks_like(&self, transaction: &Transaction) -> bool {
        self.id.is_none()
            && self.account == transaction.source_ledger_account()
            && self.amount == transaction.amount
    }

    pub fn is_default_book(&self) -> bool {
        DEFAULT_ACCOUNTS.contains(&self.account.as_str())
    }

    pub fn is_real_account_book(&self) -> bool {
        Account::REAL
            .iter()
            .any(|account| account.ledger_account() == self.account)
    }

    pub fn update(&mut self, update: BookEntryUpdate) {
        let BookEntryUpdate {
            account,
            amount,
            balance_assertion,
            id,
        } = update;

        if let Some(account) = account {
            self.account = account;
        }
        if let Some(amount) = amount {
            self.amount = amount;
        }
        if let Some(balance_assertion) = balance_assertion {
            self.balance_assertion = Some(balance_assertion);
        }
        if let Some(id) = id {
            self.id = Some(id);
        }
    }
}
