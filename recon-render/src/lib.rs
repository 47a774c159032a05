use recon_core::*;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{info, warn};

#[cfg(test)]
mod tests;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct BasicRenderer {}

impl BasicRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn render<W: Write>(w: &mut W, journal: &Journal) -> Result<(), BasicRendererError> {
    BasicRenderer::default().render(journal, w)
}

pub fn render_to_string(journal: &Journal) -> Result<String, BasicRendererError> {
    let mut rendered = Vec::new();
    render(&mut rendered, journal)?;
    String::from_utf8(rendered)
        .map_err(|e| BasicRendererError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[derive(Error, Debug)]
pub enum BasicRendererError {
    #[error("an io error occurred")]
    Io(#[from] io::Error),
    #[error("validator `{program}` did not exit normally")]
    Validator { program: String },
}

pub trait Renderer<T, W: Write> {
    type Error;
    fn render(&self, renderable: T, write: &mut W) -> Result<(), Self::Error>;
}

impl<'a, W: Write> Renderer<&'a Journal, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, journal: &'a Journal, w: &mut W) -> Result<(), Self::Error> {
        render_entries(self, w, journal.entries())
    }
}

/// Entries are separated by a blank line and the output ends with a newline.
fn render_entries<'a, W: Write>(
    renderer: &BasicRenderer,
    w: &mut W,
    entries: impl IntoIterator<Item = &'a JournalEntry>,
) -> Result<(), BasicRendererError> {
    for (i, entry) in entries.into_iter().enumerate() {
        if i > 0 {
            write!(w, "\n\n")?;
        }
        renderer.render(entry, w)?;
    }
    writeln!(w)?;
    Ok(())
}

impl<'a, W: Write> Renderer<&'a JournalEntry, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, entry: &'a JournalEntry, w: &mut W) -> Result<(), Self::Error> {
        write!(w, "{} {}", entry.date.format("%Y-%m-%d"), entry.description)?;
        for book_entry in entry.book_entries() {
            writeln!(w)?;
            self.render(book_entry, w)?;
        }
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a BookEntry, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, book_entry: &'a BookEntry, w: &mut W) -> Result<(), Self::Error> {
        write!(w, "    {}  ", book_entry.account)?;
        self.render(&book_entry.amount, w)?;
        if let Some(assertion) = &book_entry.balance_assertion {
            write!(w, " = ")?;
            self.render(assertion, w)?;
        }
        if let Some(id) = &book_entry.id {
            write!(w, " ; tid:{}", id)?;
        }
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Money, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, money: &'a Money, w: &mut W) -> Result<(), Self::Error> {
        write!(w, "{}", money)?;
        Ok(())
    }
}

/// Names of the files a journal directory is made of.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Layout {
    /// Extension of the monthly files, `journal` for `2021-01.journal`.
    pub extension: String,
    /// File that includes every monthly file.
    pub index_file: String,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            extension: "journal".to_string(),
            index_file: "main.journal".to_string(),
        }
    }
}

impl Layout {
    pub fn month_file(&self, month: &str) -> String {
        format!("{}.{}", month, self.extension)
    }
}

/// Writes one file per calendar month of `journal` into `dir` and an index file including them.
///
/// The index is emptied first.  Months are written in ascending order, each one added to the
/// index right after its file is written.
pub fn write_dir(journal: &Journal, dir: &Path, layout: &Layout) -> Result<(), BasicRendererError> {
    fs::create_dir_all(dir)?;
    let index_path = dir.join(&layout.index_file);
    File::create(&index_path)?;

    let mut months: BTreeMap<String, Vec<&JournalEntry>> = BTreeMap::new();
    for entry in journal.entries() {
        months
            .entry(entry.date.format("%Y-%m").to_string())
            .or_default()
            .push(entry);
    }

    let renderer = BasicRenderer::new();
    for (month, entries) in &months {
        let file_name = layout.month_file(month);
        let mut file = BufWriter::new(File::create(dir.join(&file_name))?);
        render_entries(&renderer, &mut file, entries.iter().copied())?;
        file.flush()?;

        let mut index = OpenOptions::new().append(true).open(&index_path)?;
        writeln!(index, "include {}", file_name)?;
    }

    info!(
        dir = %dir.display(),
        months = months.len(),
        entries = journal.len(),
        "wrote journal"
    );
    Ok(())
}

/// Validates a journal by rendering it to a temporary file and running
/// `<program> -f <file> check` on it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandValidator {
    program: String,
}

impl CommandValidator {
    pub fn new(program: impl Into<String>) -> Self {
        CommandValidator {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandValidator {
    fn default() -> Self {
        CommandValidator::new("hledger")
    }
}

impl Validator for CommandValidator {
    type Error = BasicRendererError;

    fn validate(&self, journal: &Journal) -> Result<bool, Self::Error> {
        let mut file = tempfile::Builder::new()
            .prefix("recon")
            .suffix(".journal")
            .tempfile()?;
        render(&mut file, journal)?;
        file.flush()?;

        let output = Command::new(&self.program)
            .arg("-f")
            .arg(file.path())
            .arg("check")
            .stdin(Stdio::null())
            .output()?;

        if output.status.code().is_none() {
            return Err(BasicRendererError::Validator {
                program: self.program.clone(),
            });
        }
        if !output.status.success() {
            warn!(
                program = %self.program,
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "journal failed validation"
            );
        }
        Ok(output.status.success())
    }
}
