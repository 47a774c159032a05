use std::convert::Infallible;
use std::fs;

use chrono::NaiveDate;
use indoc::indoc;
use recon::recon_core::{Account, Balance, Journal, Kind, Money, Source, Transaction};
use recon::{import_source, Settings};

struct Export {
    transactions: Vec<Transaction>,
    balance: Balance,
}

impl Source for Export {
    type Error = Infallible;

    fn account(&self) -> Account {
        Account::AmericanExpress
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

fn settings(dir: &std::path::Path) -> Settings {
    Settings {
        journal_dir: dir.to_path_buf(),
        ..Settings::default()
    }
}

#[test]
fn import_round_trips_through_journal_dir() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("2021-01.journal"),
        indoc! {"
            2021-01-02 UBER EATS
                Liabilities:Amex  -23.10
                Expenses:Food
        "},
    )?;
    let settings = settings(dir.path());

    let mut journal = settings.load()?;
    assert_eq!(journal.len(), 1);

    let export = Export {
        transactions: vec![
            Transaction::builder()
                .transaction_id("320210020000000001")
                .account(Account::AmericanExpress)
                .payee("UBER EATS")
                .amount(Money::from_cents(-2310))
                .date(ymd(2021, 1, 2))
                .kind(Kind::Debit)
                .build(),
            Transaction::builder()
                .transaction_id("320210340000000002")
                .account(Account::AmericanExpress)
                .payee("AMAZON")
                .amount(Money::from_cents(-4999))
                .date(ymd(2021, 2, 3))
                .kind(Kind::Debit)
                .build(),
        ],
        balance: Balance::builder()
            .account(Account::AmericanExpress)
            .amount(Money::from_cents(-7309))
            .as_of(ymd(2021, 2, 4))
            .build(),
    };
    let summary = import_source(&mut journal, &export)?;
    assert_eq!((summary.associated, summary.created, summary.balances), (1, 1, 1));

    settings.save(&journal)?;
    assert_eq!(
        fs::read_to_string(dir.path().join("main.journal"))?,
        "include 2021-01.journal\ninclude 2021-02.journal\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("2021-02.journal"))?,
        indoc! {"
            2021-02-03 AMAZON
                Liabilities:Amex  -49.99 ; tid:AmericanExpress.320210340000000002
                expenses:unknown  49.99

            2021-02-04 BALANCE ASSERTION
                Liabilities:Amex  0.00 = -73.09 ; tid:AmericanExpress.20210204
        "}
    );

    let mut reread: Journal = settings.load()?;
    assert_eq!(reread.len(), journal.len());
    for entry in journal.entries() {
        assert!(reread.entries().contains(entry));
    }

    let again = import_source(&mut reread, &export)?;
    assert_eq!((again.duplicates, again.created, again.balances), (2, 0, 0));
    Ok(())
}
