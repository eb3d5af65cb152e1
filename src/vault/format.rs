//! On-disk layout of a vault root.
//!
//! ```text
//! <root>/
//!   salt.bin          16 raw salt bytes, written once by `init`
//!   <name>.enc        one sealed payload per stored file
//!   .<random>.tmp     in-flight writes, never listed
//! ```
//!
//! Every file is written to a temporary sibling first and then renamed
//! into place, so readers only ever see complete files.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::errors::{FileVaultError, Result};

/// File name of the salt record inside the vault root.
pub const SALT_FILE_NAME: &str = "salt.bin";

/// Suffix that marks a file as a vault entry.
pub const ENTRY_SUFFIX: &str = ".enc";

/// Longest entry name accepted: the 255-byte filesystem limit minus the
/// entry suffix.
const MAX_NAME_LEN: usize = 255 - ENTRY_SUFFIX.len();

/// Validate that an entry name is a plain file name.
///
/// Rejects empty names, `.`/`..`, path separators, NUL, and names starting
/// with `.` (that prefix is reserved for temporary files).  This is what
/// keeps `retrieve` from ever writing outside its destination directory.
pub fn validate_entry_name(name: &str) -> Result<()> {
    let invalid = || FileVaultError::InvalidEntryName(name.to_string());

    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(invalid());
    }
    if name.starts_with('.') {
        return Err(invalid());
    }
    if name.chars().any(|c| c == '/' || c == '\\' || c == '\0') {
        return Err(invalid());
    }
    Ok(())
}

/// Map an entry name to its file name in the vault root.
pub fn entry_file_name(name: &str) -> String {
    format!("{name}{ENTRY_SUFFIX}")
}

/// Inverse of `entry_file_name`: returns `None` for anything that is not
/// an entry (salt record, temp files, foreign files).
pub fn entry_name_from_file(file_name: &str) -> Option<&str> {
    let name = file_name.strip_suffix(ENTRY_SUFFIX)?;
    validate_entry_name(name).ok()?;
    Some(name)
}

/// Write `data` to `path` **atomically**.
///
/// 1. Create a uniquely named temp file in the same directory.
/// 2. Write and fsync it.
/// 3. Rename it over `path` (or, with `no_clobber`, fail if `path` exists).
///
/// The temp file is deleted on every error path when it is dropped.
/// New files are created owner-read/write only.
pub fn write_atomic(path: &Path, data: &[u8], no_clobber: bool) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(parent)?;

    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    persist(tmp, path, no_clobber)
}

fn persist(tmp: NamedTempFile, path: &Path, no_clobber: bool) -> Result<()> {
    let result = if no_clobber {
        tmp.persist_noclobber(path)
    } else {
        tmp.persist(path)
    };
    // PersistError drops the temp file along with the error.
    result.map_err(|e| FileVaultError::Io(e.error))?;
    Ok(())
}

/// Create `dir` (and parents) with owner-only permissions on Unix.
pub fn create_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}
