//! Title-to-path-segment derivation.

use crate::error::{Error, Result};

/// Derives the URL path segment for a page title.
///
/// Titles containing a `-` are rejected outright; every other title is
/// lowercased with embedded spaces left intact. Both behaviors are kept
/// byte-for-byte in lockstep with the links already appended to the link
/// log — changing either would orphan the published history, so neither
/// is adjusted here.
///
/// # Errors
///
/// Returns [`Error::Slug`] when the title contains a hyphen.
pub fn path_part(title: &str) -> Result<String> {
    if title.contains('-') {
        return Err(Error::slug(title));
    }

    Ok(title.to_lowercase())
}
