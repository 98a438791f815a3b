//! File helpers: read, atomic write, backup, restore.

use std::path::{Path, PathBuf};

use crate::error::PatchError;

/// Suffix of the copy taken before a file is rewritten.
pub const BACKUP_SUFFIX: &str = ".linotp-backup";

/// Suffix of the advisory lock file kept next to the config file.
pub const LOCK_SUFFIX: &str = ".linotp-lock";

/// Suffix of the scratch file a rewrite goes through before the rename.
pub const TEMP_SUFFIX: &str = ".linotp-tmp";

/// `<path><suffix>`, keeping the original extension.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// The file a write to `path` must land on: symlinks resolved, or `path`
/// itself when it does not exist yet.
fn write_target(path: &Path) -> std::io::Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e),
    }
}

/// Write content atomically using temp-file + rename.
///
/// Readers never see a half-written file. A symlinked `path` is written
/// through to its target, and an existing file keeps its permission bits
/// (ownership is whatever the running user creates). On failure the temp
/// file is cleaned up best-effort.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let target = write_target(path)?;
    let temp_path = sibling_path(&target, TEMP_SUFFIX);

    let result = std::fs::write(&temp_path, content).and_then(|()| {
        if let Ok(meta) = std::fs::metadata(&target) {
            std::fs::set_permissions(&temp_path, meta.permissions())?;
        }
        std::fs::rename(&temp_path, &target)
    });
    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result
}

/// Read a whole text file, mapping a missing file to `FileNotFound`.
pub fn read_text(path: &Path) -> Result<String, PatchError> {
    std::fs::read_to_string(path).map_err(|e| PatchError::from_read(path, e))
}

/// Replace a file's content atomically.
pub fn write_text(path: &Path, content: &str) -> Result<(), PatchError> {
    atomic_write(path, content.as_bytes()).map_err(|e| PatchError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Copy `path` to `<path>.linotp-backup`, verify the copy, return its path.
pub fn backup_file(path: &Path) -> Result<PathBuf, PatchError> {
    let backup_path = sibling_path(path, BACKUP_SUFFIX);

    let original = std::fs::read(path).map_err(|e| PatchError::from_read(path, e))?;
    atomic_write(&backup_path, &original).map_err(|e| PatchError::Write {
        path: backup_path.clone(),
        reason: format!("backup write failed: {e}"),
    })?;

    let backed_up = std::fs::read(&backup_path)?;
    if original != backed_up {
        return Err(PatchError::Write {
            path: backup_path,
            reason: "backup verification failed: content mismatch".to_string(),
        });
    }

    Ok(backup_path)
}

/// Put the backup content back over `path` and remove the backup.
pub fn restore_file(path: &Path, backup_path: &Path) -> Result<(), PatchError> {
    let content = std::fs::read(backup_path)?;
    atomic_write(path, &content).map_err(|e| PatchError::Write {
        path: path.to_path_buf(),
        reason: format!("restore write failed: {e}"),
    })?;
    let _ = std::fs::remove_file(backup_path);
    Ok(())
}
