//! Parser for the plain-text journal format.
//!
//! ```text
//! # comments may appear on any line
//! 2021-01-04 TIM HORTONS
//!     Assets:Checking:TD  -4.25 ; tid:TDChecking.21206211949700010
//!     expenses:unknown
//! ```
//!
//! At most one leg of an entry may leave its amount out; it is inferred so that the entry sums
//! to zero.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser as PestParser;
use tracing::{debug, info};

use recon_core as rc;

use error::{ParseError, ParseResult};

pub mod error;

#[derive(PestParser)]
#[grammar = "ledger.pest"]
pub struct LedgerParser;

/// A leg as written, before the elided amount (if any) is filled in.
#[derive(Debug)]
struct UnbalancedBookEntry {
    account: String,
    amount: Option<rc::Money>,
    balance_assertion: Option<rc::Money>,
    id: Option<String>,
    line: usize,
}

impl UnbalancedBookEntry {
    fn into_book_entry(self, amount: rc::Money) -> rc::BookEntry {
        rc::BookEntry {
            account: self.account,
            amount,
            balance_assertion: self.balance_assertion,
            id: self.id,
        }
    }
}

fn optional_rule<'i>(rule: Rule, pairs: &mut Pairs<'i, Rule>) -> Option<Pair<'i, Rule>> {
    match pairs.peek() {
        Some(ref p) if p.as_rule() == rule => pairs.next(),
        _ => None,
    }
}

/// Parses the text of one journal file.
pub fn parse(input: &str) -> ParseResult<rc::Journal> {
    let parsed = LedgerParser::parse(Rule::file, input)?
        .next()
        .ok_or_else(|| ParseError::invalid_state("non-empty parse result"))?;

    let mut entries = Vec::new();
    for pair in parsed.into_inner() {
        match pair.as_rule() {
            Rule::entry => entries.push(journal_entry(pair)?),
            Rule::EOI => break,
            _ => {
                return Err(ParseError::invalid_state_with_span(
                    "journal entry",
                    pair.as_span(),
                ))
            }
        }
    }

    Ok(rc::Journal::new(entries))
}

pub fn parse_file(path: &Path) -> ParseResult<rc::Journal> {
    let input = fs::read_to_string(path).map_err(|err| ParseError::io(err, path))?;
    let journal = parse(&input).map_err(|err| err.with_path(path))?;
    debug!(path = %path.display(), entries = journal.len(), "parsed journal file");
    Ok(journal)
}

/// Parses every `YYYY-MM.<extension>` file in `dir` into one journal.
///
/// Files are read in the order the directory lists them.
pub fn parse_dir(dir: &Path, extension: &str) -> ParseResult<rc::Journal> {
    let mut journal = rc::Journal::default();
    let mut files = 0;

    for dir_entry in fs::read_dir(dir).map_err(|err| ParseError::io(err, dir))? {
        let dir_entry = dir_entry.map_err(|err| ParseError::io(err, dir))?;
        let is_month_file = dir_entry
            .file_name()
            .to_str()
            .map_or(false, |name| is_month_file(name, extension));
        if !is_month_file {
            continue;
        }

        journal.extend(parse_file(&dir_entry.path())?);
        files += 1;
    }

    if files == 0 {
        return Err(ParseError::no_journal_files(dir));
    }
    info!(dir = %dir.display(), files, entries = journal.len(), "parsed journal directory");
    Ok(journal)
}

fn is_month_file(name: &str, extension: &str) -> bool {
    match name.split_once('.') {
        Some((month, ext)) if ext == extension => {
            month.len() == 7
                && month.char_indices().all(|(i, c)| match i {
                    4 => c == '-',
                    _ => c.is_ascii_digit(),
                })
        }
        _ => false,
    }
}

fn journal_entry(pair: Pair<Rule>) -> ParseResult<rc::JournalEntry> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();

    let date = date(
        pairs
            .next()
            .ok_or_else(|| ParseError::invalid_state_with_span("date", span))?,
    )?;
    let description = pairs
        .next()
        .ok_or_else(|| ParseError::invalid_state_with_span("description", span))?
        .as_str()
        .to_string();

    let legs = pairs
        .map(unbalanced_book_entry)
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(rc::JournalEntry::builder()
        .date(date)
        .description(description)
        .book_entries(balance(legs)?)
        .build())
}

fn date(pair: Pair<Rule>) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(pair.as_str(), "%Y-%m-%d")
        .map_err(|err| ParseError::invalid_date(err, pair.as_span()))
}

fn money(pair: Pair<Rule>) -> ParseResult<rc::Money> {
    pair.as_str()
        .parse()
        .map_err(|err| ParseError::invalid_amount(err, pair.as_span()))
}

fn unbalanced_book_entry(pair: Pair<Rule>) -> ParseResult<UnbalancedBookEntry> {
    let span = pair.as_span();
    let line = span.start_pos().line_col().0;
    let mut pairs = pair.into_inner();

    if optional_rule(Rule::indent, &mut pairs).is_none() {
        return Err(ParseError::missing_indent(span));
    }
    let account = pairs
        .next()
        .ok_or_else(|| ParseError::invalid_state_with_span("account", span))?
        .as_str()
        .to_string();
    let amount = optional_rule(Rule::amount, &mut pairs)
        .map(money)
        .transpose()?;
    let balance_assertion = optional_rule(Rule::balance_assertion, &mut pairs)
        .map(|p| {
            let span = p.as_span();
            p.into_inner()
                .next()
                .ok_or_else(|| ParseError::invalid_state_with_span("asserted amount", span))
                .and_then(money)
        })
        .transpose()?;
    let id = optional_rule(Rule::transaction_id, &mut pairs)
        .map(|p| {
            let span = p.as_span();
            p.into_inner()
                .next()
                .map(|tid| tid.as_str().to_string())
                .ok_or_else(|| ParseError::invalid_state_with_span("transaction id", span))
        })
        .transpose()?;

    Ok(UnbalancedBookEntry {
        account,
        amount,
        balance_assertion,
        id,
        line,
    })
}

/// Fills in the one leg allowed to leave its amount out.
///
/// The inferred leg goes after the others.  A second leg without an amount is an error on that
/// leg's line, as is an inferred amount too large to represent.
fn balance(legs: Vec<UnbalancedBookEntry>) -> ParseResult<Vec<rc::BookEntry>> {
    let mut book_entries = Vec::with_capacity(legs.len());
    let mut elided = Vec::new();
    for leg in legs {
        match leg.amount {
            Some(amount) => book_entries.push(leg.into_book_entry(amount)),
            None => elided.push(leg),
        }
    }

    if elided.len() > 1 {
        return Err(ParseError::unbalanced(elided[1].line));
    }
    if let Some(leg) = elided.pop() {
        let amounts = book_entries.iter().map(|book_entry| book_entry.amount);
        let inferred = rc::Money::checked_sum(amounts)
            .and_then(rc::Money::checked_neg)
            .ok_or_else(|| ParseError::overflow(leg.line))?;
        book_entries.push(leg.into_book_entry(inferred));
    }
    Ok(book_entries)
}
