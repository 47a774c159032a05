use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use pest::Span;

use super::Rule;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Clone, Debug, PartialEq)]
pub enum ParseErrorKind {
    /// Input does not follow the journal grammar.
    InvalidInput { message: String },
    /// A leg line does not start with whitespace.
    MissingIndent,
    /// More than one leg of an entry leaves its amount out.
    Unbalanced,
    /// A date has the right shape but is not on the calendar.
    InvalidDate { message: String },
    /// An amount could not be represented.
    InvalidAmount { message: String },
    /// Parser has reached an invalid state (most likely a bug in the parser).
    InvalidParserState { message: String },
    /// A journal file or directory could not be read.
    Io { message: String },
    /// A journal directory holds no monthly files.
    NoJournalFiles,
}

#[derive(Debug)]
pub struct ParseError {
    /// The type of error.
    pub kind: ParseErrorKind,
    /// The 1-based (line, column) location of the error in the input, `(0, 0)` when there is
    /// none.
    pub location: (usize, usize),
    /// The file or directory being parsed, if any.
    pub path: Option<PathBuf>,
    source: Option<Box<dyn Error + 'static + Send + Sync>>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)?;
            }
            ParseErrorKind::MissingIndent => {
                write!(f, "Book entry must start with one or more spaces")?;
            }
            ParseErrorKind::Unbalanced => {
                write!(f, "Too many unbalanced book entries")?;
            }
            ParseErrorKind::InvalidDate { message } | ParseErrorKind::InvalidAmount { message } => {
                write!(f, "{}", message)?;
            }
            ParseErrorKind::InvalidParserState { message } => {
                write!(f, "Parser has reached an invalid state (please report this as a bug): expected {}", message)?;
            }
            ParseErrorKind::Io { message } => {
                write!(f, "Unable to read journal: {}", message)?;
            }
            ParseErrorKind::NoJournalFiles => {
                write!(f, "No monthly journal files found")?;
            }
        }
        if self.location.0 > 0 {
            write!(f, " at line {} column {}", self.location.0, self.location.1)?;
        }
        if let Some(path) = &self.path {
            write!(f, " in {}", path.display())?;
        }
        Ok(())
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl ParseError {
    pub fn line(&self) -> usize {
        self.location.0
    }

    pub(crate) fn with_path(mut self, path: &Path) -> ParseError {
        self.path.get_or_insert_with(|| path.to_path_buf());
        self
    }

    fn new(kind: ParseErrorKind, location: (usize, usize)) -> ParseError {
        ParseError {
            kind,
            location,
            path: None,
            source: None,
        }
    }

    pub(crate) fn invalid_state<T: ToString>(msg: T) -> ParseError {
        ParseError::new(
            ParseErrorKind::InvalidParserState {
                message: msg.to_string(),
            },
            (0, 0),
        )
    }

    pub(crate) fn invalid_state_with_span<T: ToString>(msg: T, span: Span) -> ParseError {
        ParseError::new(
            ParseErrorKind::InvalidParserState {
                message: msg.to_string(),
            },
            span.start_pos().line_col(),
        )
    }

    pub(crate) fn missing_indent(span: Span) -> ParseError {
        ParseError::new(ParseErrorKind::MissingIndent, span.start_pos().line_col())
    }

    pub(crate) fn unbalanced(line: usize) -> ParseError {
        ParseError::new(ParseErrorKind::Unbalanced, (line, 1))
    }

    pub(crate) fn invalid_date(err: chrono::ParseError, span: Span) -> ParseError {
        let message = format!("invalid date {}: {}", span.as_str(), err);
        ParseError {
            source: Some(Box::new(err)),
            ..ParseError::new(
                ParseErrorKind::InvalidDate { message },
                span.start_pos().line_col(),
            )
        }
    }

    pub(crate) fn invalid_amount(err: recon_core::MoneyError, span: Span) -> ParseError {
        let message = format!("invalid amount {}: {}", span.as_str(), err);
        ParseError {
            source: Some(Box::new(err)),
            ..ParseError::new(
                ParseErrorKind::InvalidAmount { message },
                span.start_pos().line_col(),
            )
        }
    }

    pub(crate) fn overflow(line: usize) -> ParseError {
        let err = recon_core::MoneyError::Overflow;
        let message = format!("inferred amount is out of range: {}", err);
        ParseError {
            source: Some(Box::new(err)),
            ..ParseError::new(ParseErrorKind::InvalidAmount { message }, (line, 1))
        }
    }

    pub(crate) fn io(err: std::io::Error, path: &Path) -> ParseError {
        let message = err.to_string();
        ParseError {
            path: Some(path.to_path_buf()),
            source: Some(Box::new(err)),
            ..ParseError::new(ParseErrorKind::Io { message }, (0, 0))
        }
    }

    pub(crate) fn no_journal_files(dir: &Path) -> ParseError {
        ParseError::new(ParseErrorKind::NoJournalFiles, (0, 0)).with_path(dir)
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let err = err.renamed_rules(|rule| {
            match *rule {
                Rule::EOI => "end of input",
                Rule::ws => "space or tab",
                Rule::rest_of_line => "rest of line",
                Rule::line_end => "end of line",
                Rule::date => "date (YYYY-MM-DD)",
                Rule::description => "description",
                Rule::indent => "indentation",
                Rule::account => "an account name",
                Rule::amount => "amount with two decimal digits",
                Rule::balance_assertion => "balance assertion",
                Rule::tid => "transaction id",
                Rule::transaction_id => "'; tid:' followed by a transaction id",
                Rule::amount_sep => "two spaces or a tab",
                Rule::leg => "book entry",
                Rule::comment => "comment",
                Rule::blank => "blank line",
                Rule::trailing => "trailing whitespace",
                Rule::entry => "journal entry",
                Rule::file => "journal file",
            }
            .to_string()
        });
        let location = match &err.line_col {
            pest::error::LineColLocation::Pos(ref p) => *p,
            pest::error::LineColLocation::Span(ref p, _) => *p,
        };
        let message = format!("{}", err);
        ParseError {
            source: Some(Box::new(err)),
            ..ParseError::new(ParseErrorKind::InvalidInput { message }, location)
        }
    }
}
