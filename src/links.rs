//! Link snippet formatting and the cumulative link log.

use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Fixed relative path of the link log.
pub const LINK_LOG_PATH: &str = "links.txt";

/// Site section the generated pages are linked under.
const LINK_SECTION: &str = "linux";

/// Formats the HTML anchor snippet for one generated page.
///
/// The snippet closes with `</li>` and never emits a matching `</a>`;
/// every line already in the log carries the same unbalanced markup, so
/// it is preserved here verbatim.
#[must_use]
pub fn format_link(slug: &str, title: &str) -> String {
    format!(r#"<li><a href="/{LINK_SECTION}/{slug}/">{title}</li>"#)
}

/// Append-only log of generated link snippets.
///
/// The file is opened, written, and closed per entry. Runs are
/// cumulative: the log is never truncated, rotated, or deduplicated.
#[derive(Debug, Clone)]
pub struct LinkLog {
    path: PathBuf,
}

impl LinkLog {
    /// Creates a log handle for the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends one link line to the log, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn append(&self, link: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;

        writeln!(file, "{link}").map_err(|e| Error::io(&self.path, e))
    }
}
