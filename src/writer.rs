//! Artifact file writing.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Writes one generated page to its destination path.
///
/// Every missing ancestor directory is created first, then the file is
/// written in full, silently replacing any prior contents. The write is
/// not atomic and no backup of an overwritten file is kept.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or the file cannot
/// be written.
pub fn write_artifact(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    fs::write(path, content).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::fs;

    #[test]
    fn test_write_creates_parent_directories() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.child("linux/docker/index.html");

        write_artifact(target.path(), "<html></html>").unwrap();

        assert_eq!(fs::read_to_string(target.path()).unwrap(), "<html></html>");
    }

    #[test]
    fn test_write_overwrites_in_full() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.child("page.html");
        target.write_str("a much longer previous version").unwrap();

        write_artifact(target.path(), "short").unwrap();

        assert_eq!(fs::read_to_string(target.path()).unwrap(), "short");
    }
}
