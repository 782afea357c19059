use std::io::{Error, ErrorKind, Result};
use std::path::Path;

/// Fails unless `path` names an existing regular file.
///
/// # Returns:
/// - `Err` with `ErrorKind::NotFound` if nothing exists at `path`.
/// - `Err` with `ErrorKind::InvalidInput` if `path` is a directory or other
///   non-file.
pub fn verify_file_existence(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::new(
            ErrorKind::NotFound,
            format!("Storage file '{}' does not exist.", path.display()),
        ));
    }

    if !path.is_file() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("'{}' is not a valid file.", path.display()),
        ));
    }

    Ok(())
}
