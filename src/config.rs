use std::env;
use std::path::{Path, PathBuf};

use recon_core::Journal;
use recon_parser::error::ParseResult;
use recon_render::{BasicRendererError, CommandValidator, Layout};

pub const JOURNAL_DIR_VAR: &str = "RECON_JOURNAL_DIR";
pub const EXTENSION_VAR: &str = "RECON_EXTENSION";
pub const INDEX_FILE_VAR: &str = "RECON_INDEX_FILE";
pub const CHECKER_VAR: &str = "RECON_CHECKER";

/// Where the journal lives on disk and which tool validates it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    pub journal_dir: PathBuf,
    pub extension: String,
    pub index_file: String,
    pub checker_program: String,
}

impl Default for Settings {
    fn default() -> Self {
        let layout = Layout::default();
        Settings {
            journal_dir: PathBuf::from("."),
            extension: layout.extension,
            index_file: layout.index_file,
            checker_program: CommandValidator::default().program().to_string(),
        }
    }
}

impl Settings {
    /// Defaults overridden by the `RECON_*` environment variables that are set.
    pub fn from_env() -> Self {
        Settings::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let defaults = Settings::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Settings {
            journal_dir: non_empty(JOURNAL_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.journal_dir),
            extension: non_empty(EXTENSION_VAR).unwrap_or(defaults.extension),
            index_file: non_empty(INDEX_FILE_VAR).unwrap_or(defaults.index_file),
            checker_program: non_empty(CHECKER_VAR).unwrap_or(defaults.checker_program),
        }
    }

    pub fn layout(&self) -> Layout {
        Layout {
            extension: self.extension.clone(),
            index_file: self.index_file.clone(),
        }
    }

    pub fn validator(&self) -> CommandValidator {
        CommandValidator::new(self.checker_program.clone())
    }

    pub fn journal_dir(&self) -> &Path {
        &self.journal_dir
    }

    /// Reads every monthly file of the journal directory.
    pub fn load(&self) -> ParseResult<Journal> {
        recon_parser::parse_dir(&self.journal_dir, &self.extension)
    }

    /// Writes `journal` back to the journal directory.
    pub fn save(&self, journal: &Journal) -> Result<(), BasicRendererError> {
        recon_render::write_dir(journal, &self.journal_dir, &self.layout())
    }
}
