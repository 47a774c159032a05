use crate::account::Account;
use crate::transaction::{Balance, Transaction};

/// A producer of external activity for a single account, such as a bank export or the
/// shared-expense service.
///
/// Errors are the collaborator's own and are handed to the caller unmodified.
pub trait Source {
    type Error;

    fn account(&self) -> Account;

    /// The balance of [`Source::account`] as the source last observed it.
    fn balance(&self) -> Result<Balance, Self::Error>;

    fn transactions(&self) -> Result<Vec<Transaction>, Self::Error>;
}
