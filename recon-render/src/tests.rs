use crate::{render, render_to_string, write_dir, CommandValidator, Layout};
use chrono::NaiveDate;
use indoc::indoc;
use recon_core::{Account, Balance, BookEntry, Journal, JournalEntry, Money, Validator};
use recon_parser::{parse, parse_dir};
use std::fs;

fn test_conversion(s: &str) -> anyhow::Result<()> {
    // First obtain the journal
    let journal = parse(s).unwrap();

    // Now render it
    let mut rendered = Vec::new();
    render(&mut rendered, &journal)?;
    let rendered = String::from_utf8(rendered).unwrap();

    // Parse again
    let journal_2 = parse(&rendered).unwrap();
    assert_eq!(journal_2, journal);

    // Render to test for equality
    let rendered_2 = render_to_string(&journal_2)?;

    // Check for equality
    assert_eq!(rendered_2, rendered);

    Ok(())
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(date: NaiveDate, description: &str, legs: &[(&str, i64)]) -> JournalEntry {
    JournalEntry::builder()
        .date(date)
        .description(description)
        .book_entries(
            legs.iter()
                .map(|(account, cents)| {
                    BookEntry::builder()
                        .account(*account)
                        .amount(Money::from_cents(*cents))
                        .build()
                })
                .collect(),
        )
        .build()
}

#[test]
fn test_plain_entry() -> anyhow::Result<()> {
    test_conversion(indoc! {"
        2021-01-04 TIM HORTONS
            Assets:Checking:TD  -4.25
            expenses:unknown  4.25
    "})?;
    Ok(())
}

#[test]
fn test_inferred_amount() -> anyhow::Result<()> {
    test_conversion(indoc! {"
        2021-01-04 TIM HORTONS
            Assets:Checking:TD  -4.25
            expenses:unknown
    "})?;
    Ok(())
}

#[test]
fn test_balance_assertion_and_id() -> anyhow::Result<()> {
    test_conversion(indoc! {"
        2021-01-01 BALANCE ASSERTION
            Assets:Reimbursements:Splitwise:Jacinthe  0.00 = -12.34 ; tid:SplitwiseJacinthe.20210101
    "})?;
    test_conversion(indoc! {"
        2021-01-02 UBER EATS
            Liabilities:Amex  -23.10 ; tid:AmericanExpress.320210020000000001
            Assets:Reimbursements:Splitwise:Jacinthe  11.55
            Expenses:Food  11.55
    "})?;
    Ok(())
}

#[test]
fn test_several_entries_and_comments() -> anyhow::Result<()> {
    test_conversion(indoc! {"
        # imported from the bank
        2021-01-04 TIM HORTONS
            Assets:Checking:TD  -4.25
            expenses:unknown  4.25

        2021-01-05 PAYROLL
            # pay day
            Assets:Checking:TD  2000.00
            income:unknown
    "})?;
    Ok(())
}

#[test]
fn test_exact_format() -> anyhow::Result<()> {
    let mut first = entry(
        ymd(2021, 1, 4),
        "TIM HORTONS",
        &[("Assets:Checking:TD", -425), ("expenses:unknown", 425)],
    );
    first.book_entries_mut()[0].id = Some("TDChecking.1".to_string());
    let assertion = JournalEntry::builder()
        .date(ymd(2021, 1, 5))
        .description("BALANCE ASSERTION")
        .book_entries(vec![BookEntry::builder()
            .account("Liabilities:LOC")
            .amount(Money::zero())
            .balance_assertion(Money::from_cents(-100_000))
            .build()])
        .build();

    let rendered = render_to_string(&Journal::new(vec![first, assertion]))?;
    assert_eq!(
        rendered,
        indoc! {"
            2021-01-04 TIM HORTONS
                Assets:Checking:TD  -4.25 ; tid:TDChecking.1
                expenses:unknown  4.25

            2021-01-05 BALANCE ASSERTION
                Liabilities:LOC  0.00 = -1000.00
        "}
    );
    Ok(())
}

#[test]
fn test_empty_journal() -> anyhow::Result<()> {
    assert_eq!(render_to_string(&Journal::default())?, "\n");
    Ok(())
}

#[test]
fn test_write_dir() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("main.journal"), "include stale.journal\n")?;

    let journal = Journal::new(vec![
        entry(ymd(2021, 2, 1), "FEB", &[("Assets:Checking:TD", 100), ("income:unknown", -100)]),
        entry(ymd(2021, 1, 31), "JAN", &[("Assets:Checking:TD", -200), ("expenses:unknown", 200)]),
        entry(ymd(2021, 2, 14), "FEB 2", &[("Liabilities:Amex", -300), ("expenses:unknown", 300)]),
    ]);
    write_dir(&journal, dir.path(), &Layout::default())?;

    assert_eq!(
        fs::read_to_string(dir.path().join("main.journal"))?,
        "include 2021-01.journal\ninclude 2021-02.journal\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("2021-01.journal"))?,
        indoc! {"
            2021-01-31 JAN
                Assets:Checking:TD  -2.00
                expenses:unknown  2.00
        "}
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("2021-02.journal"))?,
        indoc! {"
            2021-02-01 FEB
                Assets:Checking:TD  1.00
                income:unknown  -1.00

            2021-02-14 FEB 2
                Liabilities:Amex  -3.00
                expenses:unknown  3.00
        "}
    );

    let reread = parse_dir(dir.path(), "journal")?;
    assert_eq!(reread.len(), 3);
    Ok(())
}

#[test]
fn test_write_dir_custom_layout() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let layout = Layout {
        extension: "ledger".to_string(),
        index_file: "all.ledger".to_string(),
    };
    let journal = Journal::new(vec![entry(
        ymd(2020, 12, 25),
        "GIFT",
        &[("Assets:Checking:TD", -5000), ("expenses:unknown", 5000)],
    )]);
    write_dir(&journal, dir.path(), &layout)?;

    assert_eq!(
        fs::read_to_string(dir.path().join("all.ledger"))?,
        "include 2020-12.ledger\n"
    );
    assert!(dir.path().join("2020-12.ledger").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_command_validator() -> anyhow::Result<()> {
    let mut journal = Journal::new(vec![entry(
        ymd(2021, 1, 1),
        "A",
        &[("Assets:Checking:TD", 100), ("income:unknown", -100)],
    )]);
    let balance = Balance::builder()
        .account(Account::TdChecking)
        .amount(Money::from_cents(100))
        .as_of(ymd(2021, 1, 2))
        .build();

    assert!(CommandValidator::new("true").validate(&journal)?);
    assert!(!CommandValidator::new("false").validate(&journal)?);
    assert!(journal.assert_balance(&balance, &CommandValidator::new("true"))?);
    assert_eq!(journal.len(), 1);

    assert!(journal.import_balance(&balance));
    assert!(journal.is_valid(&CommandValidator::new("true"))?);
    Ok(())
}

#[test]
fn test_missing_validator_program() {
    let journal = Journal::default();
    let result = CommandValidator::new("recon-no-such-checker").validate(&journal);
    assert!(result.is_err());
}
