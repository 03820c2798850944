//! Template loading and prompt composition.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Reads the HTML template file in full.
///
/// The template is read exactly once per run and appended verbatim to
/// every request's prompt; it is never parsed or rendered.
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be read.
pub fn read_template(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Appends the template to the request content as reference material.
#[must_use]
pub fn compose_prompt(content: &str, template: &str) -> String {
    format!("{content}Use this HTML template as a reference: {template}")
}
