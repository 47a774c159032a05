//! Payloads exchanged with the shared-expense service.
//!
//! Transport is the caller's business: an [`ExpenseClient`] hands over expenses that were
//! already submitted and accepts new ones, and [`SharedExpenseSource`] turns the former into
//! [`Transaction`]s on the counterparty's account.

use chrono::{Local, NaiveDate};

use crate::account::Account;
use crate::error::{ImportError, MoneyError};
use crate::money::Money;
use crate::source::Source;
use crate::transaction::{Balance, Kind, Transaction};

/// User id of the journal's owner on the shared-expense service.
pub const OWN_USER_ID: u64 = 1_570_407;

/// People expenses are shared with, keyed by their user id on the shared-expense service.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Friend {
    Jacinthe,
}

impl Friend {
    pub fn user_id(self) -> u64 {
        match self {
            Friend::Jacinthe => 9_239_057,
        }
    }

    pub fn account(self) -> Account {
        match self {
            Friend::Jacinthe => Account::SplitwiseJacinthe,
        }
    }

    pub fn from_user_id(user_id: u64) -> Option<Friend> {
        [Friend::Jacinthe]
            .into_iter()
            .find(|friend| friend.user_id() == user_id)
    }
}

/// How much one person paid towards an expense and how much of it they owe.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExpenseShare {
    pub user_id: u64,
    pub paid: Money,
    pub owes: Money,
}

impl ExpenseShare {
    pub fn is_mine(&self) -> bool {
        self.user_id == OWN_USER_ID
    }
}

/// An expense to be created on the shared-expense service.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Expense {
    pub cost: Money,
    pub description: String,
    pub date: NaiveDate,
    pub expense_shares: Vec<ExpenseShare>,
}

impl Expense {
    /// The service rejects expenses whose shares do not add up to the cost.
    pub fn is_valid(&self) -> bool {
        let paid = Money::checked_sum(self.expense_shares.iter().map(|share| share.paid));
        let owes = Money::checked_sum(self.expense_shares.iter().map(|share| share.owes));
        paid == Some(self.cost) && owes == Some(self.cost)
    }
}

/// An expense as reported back by the shared-expense service.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmittedExpense {
    pub id: u64,
    pub date: NaiveDate,
    pub cost: Money,
    pub description: String,
    pub expense_shares: Vec<ExpenseShare>,
}

/// Transport to the shared-expense service.
pub trait ExpenseClient {
    type Error: From<ImportError>;

    /// Expenses shared with `friend_id` that have not been deleted.
    fn list_expenses(&self, friend_id: u64) -> Result<Vec<SubmittedExpense>, Self::Error>;

    /// What `friend_id` currently owes the journal's owner.
    fn get_balance(&self, friend_id: u64) -> Result<Money, Self::Error>;

    fn create_expense(&self, expense: &Expense) -> Result<(), Self::Error>;
}

/// Reports the expenses shared with one friend as transactions on that friend's account.
pub struct SharedExpenseSource<C> {
    client: C,
    friend: Friend,
}

impl<C: ExpenseClient> SharedExpenseSource<C> {
    pub fn new(client: C, friend: Friend) -> Self {
        SharedExpenseSource { client, friend }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn to_transaction(&self, expense: SubmittedExpense) -> Result<Transaction, ImportError> {
        if expense.expense_shares.len() > 2 {
            return Err(ImportError::TooManyShares {
                expense_id: expense.id,
                shares: expense.expense_shares.len(),
            });
        }

        let friend_id = self.friend.user_id();
        if !expense.expense_shares.iter().any(|share| share.user_id == friend_id) {
            return Err(ImportError::MissingShare {
                expense_id: expense.id,
                user_id: friend_id,
            });
        }
        let mine = expense
            .expense_shares
            .iter()
            .find(|share| share.is_mine())
            .ok_or(ImportError::MissingShare {
                expense_id: expense.id,
                user_id: OWN_USER_ID,
            })?;

        let amount = mine
            .paid
            .checked_sub(mine.owes)
            .ok_or(MoneyError::Overflow)?;
        let kind = if expense.cost.is_negative() {
            Kind::Credit
        } else {
            Kind::Debit
        };

        Ok(Transaction::builder()
            .transaction_id(expense.id.to_string())
            .account(self.friend.account())
            .payee(expense.description.clone())
            .amount(amount)
            .date(expense.date)
            .kind(kind)
            .build())
    }
}

impl<C: ExpenseClient> Source for SharedExpenseSource<C> {
    type Error = C::Error;

    fn account(&self) -> Account {
        self.friend.account()
    }

    fn balance(&self) -> Result<Balance, Self::Error> {
        let amount = self.client.get_balance(self.friend.user_id())?;
        Ok(Balance::builder()
            .account(self.account())
            .amount(amount)
            .as_of(Local::now().date_naive())
            .build())
    }

    fn transactions(&self) -> Result<Vec<Transaction>, Self::Error> {
        self.client
            .list_expenses(self.friend.user_id())?
            .into_iter()
            .map(|expense| self.to_transaction(expense).map_err(C::Error::from))
            .collect()
    }
}
