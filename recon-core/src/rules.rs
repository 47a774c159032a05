//! Hand-written categorizations for recurring imported entries.
//!
//! Every rule is a variant of [`ImportRule`]; [`classify`] runs an entry past all of them.

use crate::book_entry::BookEntry;
use crate::journal_entry::JournalEntry;
use crate::money::Money;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ImportRule {
    /// The phone bill, part of which is paid back by a housemate.
    Telus,
}

const TELUS_PAYEE: &str = "TELUS MOBILITY PREAUTH";
const TELUS_REIMBURSEMENT_ACCOUNT: &str = "Assets:Reimbursements:Rishav";
const TELUS_REIMBURSEMENT: Money = Money::from_cents(7500);
const TELUS_EXPENSE_ACCOUNT: &str = "Expenses:Recurring";

impl ImportRule {
    pub const ALL: [ImportRule; 1] = [ImportRule::Telus];

    pub fn matches(self, entry: &JournalEntry) -> bool {
        match self {
            ImportRule::Telus => entry.description.contains(TELUS_PAYEE) && entry.is_unprocessed(),
        }
    }

    /// The categorized version of `entry`.  Only meaningful when [`ImportRule::matches`] holds;
    /// otherwise the entry is returned as is.
    pub fn apply(self, entry: &JournalEntry) -> JournalEntry {
        match self {
            ImportRule::Telus => {
                let real = match entry
                    .book_entries()
                    .iter()
                    .find(|book_entry| book_entry.is_real_account_book())
                {
                    Some(real) => real.clone(),
                    None => return entry.clone(),
                };
                let reimbursed = BookEntry::builder()
                    .account(TELUS_REIMBURSEMENT_ACCOUNT)
                    .amount(TELUS_REIMBURSEMENT)
                    .build();
                let remaining = match real
                    .amount
                    .checked_neg()
                    .and_then(|spent| spent.checked_sub(TELUS_REIMBURSEMENT))
                {
                    Some(remaining) => remaining,
                    None => return entry.clone(),
                };
                let remaining = BookEntry::builder()
                    .account(TELUS_EXPENSE_ACCOUNT)
                    .amount(remaining)
                    .build();

                JournalEntry::builder()
                    .date(entry.date)
                    .description(entry.description.clone())
                    .book_entries(vec![real, reimbursed, remaining])
                    .build()
            }
        }
    }
}

/// Every rule that applies to `entry`.
pub fn classify(entry: &JournalEntry) -> Vec<ImportRule> {
    ImportRule::ALL
        .iter()
        .copied()
        .filter(|rule| rule.matches(entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn telus(second_account: &str) -> JournalEntry {
        JournalEntry::builder()
            .date(NaiveDate::from_ymd_opt(2021, 2, 15).unwrap())
            .description("TELUS MOBILITY PREAUTH 123")
            .book_entries(vec![
                BookEntry::builder()
                    .account("Assets:Checking:TD")
                    .amount(Money::from_cents(-15000))
                    .id("TDChecking.1")
                    .build(),
                BookEntry::builder()
                    .account(second_account)
                    .amount(Money::from_cents(15000))
                    .build(),
            ])
            .build()
    }

    #[test]
    fn telus_bill_is_split_with_rishav() {
        let entry = telus("expenses:unknown");
        assert_eq!(classify(&entry), vec![ImportRule::Telus]);

        let applied = ImportRule::Telus.apply(&entry);
        let amounts: Vec<(&str, Money)> = applied
            .book_entries()
            .iter()
            .map(|book_entry| (book_entry.account.as_str(), book_entry.amount))
            .collect();
        assert_eq!(
            amounts,
            vec![
                ("Assets:Checking:TD", Money::from_cents(-15000)),
                ("Assets:Reimbursements:Rishav", Money::from_cents(7500)),
                ("Expenses:Recurring", Money::from_cents(7500)),
            ]
        );
        assert!(applied.is_balanced());
        assert_eq!(applied.book_entry_ids(), vec!["TDChecking.1"]);
    }

    #[test]
    fn categorized_bills_are_left_alone() {
        assert!(classify(&telus("Expenses:Recurring")).is_empty());
    }
}
