use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Appends `ext` after any existing extension instead of replacing it.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use tidemark::utils::append_extension;
///
/// assert_eq!(append_extension(Path::new("metrics.bin"), "bk"), PathBuf::from("metrics.bin.bk"));
/// assert_eq!(append_extension(Path::new("metrics"), "bk"), PathBuf::from("metrics.bk"));
/// ```
pub fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut file_name = path.as_os_str().to_os_string();
    file_name.push(OsString::from(format!(".{ext}")));
    PathBuf::from(file_name)
}
