use std::collections::HashSet;
use std::ops::Add;

use tracing::debug;

use crate::book_entry::BookEntry;
use crate::error::{ImportError, MoneyError};
use crate::journal_entry::JournalEntry;
use crate::money::Money;
use crate::transaction::{Balance, Transaction};
use crate::validate::Validator;

/// Description of the entries that record a balance assertion.
pub const BALANCE_ASSERTION_DESCRIPTION: &str = "BALANCE ASSERTION";

/// What [`Journal::import_transaction`] did with a transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImportOutcome {
    /// The transaction's id was already recorded.
    Duplicate,

    /// An existing leg at this index was matched to the transaction.
    Associated(usize),

    /// A new entry was appended at this index.
    Created(usize),
}

/// An ordered collection of journal entries.
///
/// Entries are only ever appended.  The journal owns every entry and leg; callers reach them by
/// index so that edits are seen by later imports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new(entries: Vec<JournalEntry>) -> Self {
        Journal { entries }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [JournalEntry] {
        &mut self.entries
    }

    pub fn get(&self, index: usize) -> Option<&JournalEntry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut JournalEntry> {
        self.entries.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends `entry` and returns its index.
    pub fn push(&mut self, entry: JournalEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Every account posted to, in the order they first appear.
    pub fn accounts(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .flat_map(JournalEntry::accounts)
            .filter(|account| seen.insert(*account))
            .collect()
    }

    /// Ids of every external transaction or balance already recorded.
    pub fn known_ids(&self) -> HashSet<&str> {
        self.entries
            .iter()
            .flat_map(JournalEntry::book_entry_ids)
            .collect()
    }

    /// Records `transaction` unless it is already known.
    ///
    /// An unmatched leg describing the transaction is preferred over a new entry; the most
    /// recently added entries are tried first.  A new entry posts the offsetting amount to the
    /// default bucket of the transaction's kind.
    pub fn import_transaction(
        &mut self,
        transaction: &Transaction,
    ) -> Result<ImportOutcome, ImportError> {
        let full_id = transaction.full_id();
        if self.known_ids().contains(full_id.as_str()) {
            debug!(id = %full_id, "transaction already recorded");
            return Ok(ImportOutcome::Duplicate);
        }

        if let Some(index) = self.associate(transaction) {
            debug!(id = %full_id, index, "transaction associated with existing entry");
            return Ok(ImportOutcome::Associated(index));
        }

        let destination =
            transaction
                .destination_ledger_account()
                .ok_or_else(|| ImportError::NotImportable {
                    id: full_id.clone(),
                    kind: transaction.kind,
                })?;

        let offset = transaction
            .amount
            .checked_neg()
            .ok_or(ImportError::Money(MoneyError::Overflow))?;

        let entry = JournalEntry::builder()
            .date(transaction.date)
            .description(transaction.payee.clone())
            .book_entries(vec![
                BookEntry::builder()
                    .account(transaction.source_ledger_account())
                    .amount(transaction.amount)
                    .id(full_id.clone())
                    .build(),
                BookEntry::builder()
                    .account(destination)
                    .amount(offset)
                    .build(),
            ])
            .build();
        let index = self.push(entry);
        debug!(id = %full_id, index, destination, "transaction imported as new entry");
        Ok(ImportOutcome::Created(index))
    }

    /// Records `balance` as an assertion entry unless one with the same id exists.
    ///
    /// Returns whether an entry was appended.
    pub fn import_balance(&mut self, balance: &Balance) -> bool {
        let ledger_id = balance.ledger_id();
        if self.known_ids().contains(ledger_id.as_str()) {
            debug!(id = %ledger_id, "balance already asserted");
            return false;
        }

        self.push(assertion_entry(balance));
        debug!(id = %ledger_id, amount = %balance.amount, "balance assertion imported");
        true
    }

    /// Whether the journal would still validate with `balance` asserted.  `self` is untouched.
    pub fn assert_balance<V: Validator>(
        &self,
        balance: &Balance,
        validator: &V,
    ) -> Result<bool, V::Error> {
        let mut candidate = self.clone();
        candidate.push(assertion_entry(balance));
        candidate.is_valid(validator)
    }

    pub fn is_valid<V: Validator>(&self, validator: &V) -> Result<bool, V::Error> {
        validator.validate(self)
    }

    fn associate(&mut self, transaction: &Transaction) -> Option<usize> {
        self.entries
            .iter_mut()
            .enumerate()
            .rev()
            .find_map(|(index, entry)| entry.associate(transaction).then_some(index))
    }
}

fn assertion_entry(balance: &Balance) -> JournalEntry {
    JournalEntry::builder()
        .date(balance.as_of)
        .description(BALANCE_ASSERTION_DESCRIPTION)
        .book_entries(vec![BookEntry::builder()
            .account(balance.account.ledger_account())
            .amount(Money::zero())
            .balance_assertion(balance.amount)
            .id(balance.ledger_id())
            .build()])
        .build()
}

impl Add for Journal {
    type Output = Journal;

    fn add(mut self, other: Journal) -> Journal {
        self.entries.extend(other.entries);
        self
    }
}

impl Extend<JournalEntry> for Journal {
    fn extend<I: IntoIterator<Item = JournalEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl FromIterator<JournalEntry> for Journal {
    fn from_iter<I: IntoIterator<Item = JournalEntry>>(iter: I) -> Self {
        Journal::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Journal {
    type Item = JournalEntry;
    type IntoIter = std::vec::IntoIter<JournalEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Journal {
    type Item = &'a JournalEntry;
    type IntoIter = std::slice::Iter<'a, JournalEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
