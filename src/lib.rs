//! Reconciles bank exports and shared-expense activity into a plain-text double-entry journal.
//!
//! The domain model lives in [`recon_core`], reading a journal in [`recon_parser`] and writing
//! one back in [`recon_render`].  [`import`] drives sources into a journal and [`config`] says
//! where it is kept.

pub use recon_core;
pub use recon_parser;
pub use recon_render;

pub mod config;
pub mod import;

pub use config::Settings;
pub use import::{apply_rules, import_into, import_source, recategorize, ImportSummary};
