use std::fmt;
use std::str::FromStr;

use crate::error::ImportError;

/// A physical account that bank exports or the shared-expense service report activity for.
///
/// Every account is booked under exactly one journal account path:
///
/// ```text
/// Assets:Checking:TD
/// Liabilities:InfiniteVisa
/// Assets:Reimbursements:Splitwise:Jacinthe
/// ```
///
/// Adding a variant forces every `match` on this type to be revisited, which is how the
/// mapping to journal accounts and the set of real accounts are kept complete.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Account {
    TdChecking,
    TdCreditOld,
    TdCreditNew,
    TdLoc,
    SplitwiseJacinthe,
    AmericanExpress,
    TdInfinitePrivilege,
}

impl Account {
    pub const ALL: [Account; 7] = [
        Account::TdChecking,
        Account::TdCreditOld,
        Account::TdCreditNew,
        Account::TdLoc,
        Account::SplitwiseJacinthe,
        Account::AmericanExpress,
        Account::TdInfinitePrivilege,
    ];

    /// Accounts whose balances can be checked against a statement.
    pub const REAL: [Account; 5] = [
        Account::TdChecking,
        Account::TdCreditNew,
        Account::TdLoc,
        Account::AmericanExpress,
        Account::TdInfinitePrivilege,
    ];

    /// The journal account path this account is booked under.
    pub fn ledger_account(self) -> &'static str {
        match self {
            Account::TdChecking => "Assets:Checking:TD",
            Account::TdCreditOld | Account::TdCreditNew => "Liabilities:InfiniteVisa",
            Account::TdLoc => "Liabilities:LOC",
            Account::SplitwiseJacinthe => "Assets:Reimbursements:Splitwise:Jacinthe",
            Account::AmericanExpress => "Liabilities:Amex",
            Account::TdInfinitePrivilege => "Liabilities:VisaInfinitePrivilege",
        }
    }

    /// The key used to scope external ids, e.g. `SplitwiseJacinthe.20210101`.
    pub fn serialize(self) -> &'static str {
        match self {
            Account::TdChecking => "TDChecking",
            Account::TdCreditOld => "TDCreditOld",
            Account::TdCreditNew => "TDCreditNew",
            Account::TdLoc => "TDLoc",
            Account::SplitwiseJacinthe => "SplitwiseJacinthe",
            Account::AmericanExpress => "AmericanExpress",
            Account::TdInfinitePrivilege => "TDInfinitePrivilege",
        }
    }

    pub fn is_real(self) -> bool {
        match self {
            Account::TdChecking
            | Account::TdCreditNew
            | Account::TdLoc
            | Account::AmericanExpress
            | Account::TdInfinitePrivilege => true,
            Account::TdCreditOld | Account::SplitwiseJacinthe => false,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.serialize())
    }
}

impl FromStr for Account {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Account::ALL
            .iter()
            .copied()
            .find(|account| account.serialize() == s)
            .ok_or_else(|| ImportError::UnknownAccount(s.to_string()))
    }
}
