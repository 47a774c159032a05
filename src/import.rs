//! Drives external sources into a journal.

use std::fmt;

use anyhow::Result;
use tracing::{debug, info};

use recon_core::{classify, ImportOutcome, Journal, Source};

/// Counts of what an import run did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ImportSummary {
    pub duplicates: usize,
    pub associated: usize,
    pub created: usize,
    pub balances: usize,
}

impl ImportSummary {
    fn record(&mut self, outcome: ImportOutcome) {
        match outcome {
            ImportOutcome::Duplicate => self.duplicates += 1,
            ImportOutcome::Associated(_) => self.associated += 1,
            ImportOutcome::Created(_) => self.created += 1,
        }
    }
}

impl std::ops::AddAssign for ImportSummary {
    fn add_assign(&mut self, other: ImportSummary) {
        self.duplicates += other.duplicates;
        self.associated += other.associated;
        self.created += other.created;
        self.balances += other.balances;
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} associated, {} duplicates, {} balances",
            self.created, self.associated, self.duplicates, self.balances
        )
    }
}

/// Imports one source's transactions and then its balance.
///
/// Each transaction is imported on its own; an error stops the run but leaves earlier imports in
/// place.
pub fn import_source<S>(journal: &mut Journal, source: &S) -> Result<ImportSummary>
where
    S: Source,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let mut summary = ImportSummary::default();
    let account = source.account();

    for transaction in source.transactions()? {
        summary.record(journal.import_transaction(&transaction)?);
    }
    if journal.import_balance(&source.balance()?) {
        summary.balances += 1;
    }

    info!(account = %account, %summary, "imported source");
    Ok(summary)
}

/// Imports every source in turn.
pub fn import_into<S>(journal: &mut Journal, sources: &[S]) -> Result<ImportSummary>
where
    S: Source,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let mut summary = ImportSummary::default();
    for source in sources {
        summary += import_source(journal, source)?;
    }
    Ok(summary)
}

/// Replaces `from` with `to` in the account of every leg that contains it.
///
/// Returns the number of legs changed.
pub fn recategorize(journal: &mut Journal, from: &str, to: &str) -> usize {
    if from.is_empty() {
        return 0;
    }

    let mut changed = 0;
    for entry in journal.entries_mut() {
        for book_entry in entry.book_entries_mut() {
            if book_entry.account.contains(from) {
                let account = book_entry.account.replace(from, to);
                debug!(from = %book_entry.account, to = %account, "recategorizing");
                book_entry.account = account;
                changed += 1;
            }
        }
    }
    changed
}

/// Applies the first matching import rule to every entry that has one.
///
/// Returns the number of entries rewritten.
pub fn apply_rules(journal: &mut Journal) -> usize {
    let mut applied = 0;
    for entry in journal.entries_mut() {
        if let Some(rule) = classify(entry).into_iter().next() {
            debug!(?rule, description = %entry.description, "applying import rule");
            *entry = rule.apply(entry);
            applied += 1;
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use chrono::NaiveDate;
    use indoc::indoc;
    use recon_core::{Account, Balance, Kind, Money, Transaction};

    use super::*;

    struct StaticSource {
        account: Account,
        balance: Balance,
        transactions: Vec<Transaction>,
    }

    impl Source for StaticSource {
        type Error = Infallible;

        fn account(&self) -> Account {
            self.account
        }

        fn balance(&self) -> Result<Balance, Infallible> {
            Ok(self.balance.clone())
        }

        fn transactions(&self) -> Result<Vec<Transaction>, Infallible> {
            Ok(self.transactions.clone())
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn transaction(id: &str, payee: &str, cents: i64, date: NaiveDate, kind: Kind) -> Transaction {
        Transaction::builder()
            .transaction_id(id)
            .account(Account::TdChecking)
            .payee(payee)
            .amount(Money::from_cents(cents))
            .date(date)
            .kind(kind)
            .build()
    }

    fn checking_source(transactions: Vec<Transaction>) -> StaticSource {
        StaticSource {
            account: Account::TdChecking,
            balance: Balance::builder()
                .account(Account::TdChecking)
                .amount(Money::from_cents(195_750))
                .as_of(ymd(2021, 1, 6))
                .build(),
            transactions,
        }
    }

    #[test]
    fn import_source_counts_outcomes() -> anyhow::Result<()> {
        let mut journal = recon_parser::parse(indoc! {"
            2021-01-05 PAYROLL
                Assets:Checking:TD  2000.00
                income:unknown
        "})?;
        let source = checking_source(vec![
            transaction("1", "TIM HORTONS", -425, ymd(2021, 1, 4), Kind::Debit),
            transaction("2", "PAYROLL", 200_000, ymd(2021, 1, 5), Kind::Credit),
        ]);

        let summary = import_source(&mut journal, &source)?;
        assert_eq!(
            summary,
            ImportSummary {
                duplicates: 0,
                associated: 1,
                created: 1,
                balances: 1,
            }
        );
        assert_eq!(journal.len(), 3);

        let again = import_source(&mut journal, &source)?;
        assert_eq!(
            again,
            ImportSummary {
                duplicates: 2,
                ..ImportSummary::default()
            }
        );
        assert_eq!(journal.len(), 3);
        Ok(())
    }

    #[test]
    fn assertions_are_not_importable() {
        let mut journal = Journal::default();
        let source = checking_source(vec![transaction(
            "3",
            "BALANCE",
            0,
            ymd(2021, 1, 4),
            Kind::Assertion,
        )]);
        assert!(import_source(&mut journal, &source).is_err());
        assert!(journal.is_empty());
    }

    #[test]
    fn import_into_sums_sources() -> anyhow::Result<()> {
        let mut journal = Journal::default();
        let sources = vec![
            checking_source(vec![transaction("1", "A", -100, ymd(2021, 1, 1), Kind::Debit)]),
            checking_source(vec![transaction("2", "B", -200, ymd(2021, 1, 2), Kind::Debit)]),
        ];
        let summary = import_into(&mut journal, &sources)?;
        assert_eq!(summary.created, 2);
        assert_eq!(summary.balances, 1);
        assert_eq!(summary.to_string(), "2 created, 0 associated, 0 duplicates, 1 balances");
        Ok(())
    }

    #[test]
    fn recategorize_rewrites_matching_legs() -> anyhow::Result<()> {
        let mut journal = recon_parser::parse(indoc! {"
            2021-01-04 TIM HORTONS
                Assets:Checking:TD  -4.25
                Expenses:Discretionary:Food  4.25

            2021-01-05 RENT
                Assets:Checking:TD  -1000.00
                Expenses:Housing  1000.00
        "})?;

        assert_eq!(recategorize(&mut journal, ":Discretionary:", ":"), 1);
        assert_eq!(
            journal.accounts(),
            vec!["Assets:Checking:TD", "Expenses:Food", "Expenses:Housing"]
        );
        assert_eq!(recategorize(&mut journal, "", "x"), 0);
        Ok(())
    }

    #[test]
    fn apply_rules_categorizes_phone_bill() -> anyhow::Result<()> {
        let mut journal = recon_parser::parse(indoc! {"
            2021-02-15 TELUS MOBILITY PREAUTH 123
                Assets:Checking:TD  -150.00 ; tid:TDChecking.9
                expenses:unknown  150.00

            2021-02-16 TIM HORTONS
                Assets:Checking:TD  -4.25
                Expenses:Food  4.25
        "})?;

        assert_eq!(apply_rules(&mut journal), 1);
        let bill = &journal.entries()[0];
        assert_eq!(bill.book_entries().len(), 3);
        assert!(bill.is_balanced());
        assert_eq!(apply_rules(&mut journal), 0);
        Ok(())
    }
}
