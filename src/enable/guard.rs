//! Lock + restore-on-failure guard for a multi-file apply.
//!
//! `ApplyGuard` holds an exclusive advisory flock on `<config>.linotp-lock`
//! for the whole apply and remembers every file it backed up. Unless
//! [`commit`](ApplyGuard::commit) is reached, dropping the guard copies each
//! backup back over its file, so a failure while writing the config file
//! does not leave a patched bootstrap file behind.
//!
//! The lock lives in a separate file because the patched files themselves are
//! replaced by rename, which changes their inode and would drop a lock held
//! on them.

use std::fs::File;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::files::{LOCK_SUFFIX, restore_file, sibling_path};
use crate::error::PatchError;

/// RAII guard for one apply run.
///
/// ```ignore
/// let mut guard = ApplyGuard::lock(&config_path)?;  // 1. acquire lock
/// let backup = backup_file(&path)?;                 // 2. back up
/// guard.record_backup(&path, &backup);              // 3. enable restore
/// write_text(&path, &patched)?;                     // 4. rewrite
/// guard.commit(false);                              // 5. keep the result
/// ```
pub struct ApplyGuard {
    /// Config file the lock is named after.
    config_path: PathBuf,
    /// `(file, backup)` pairs in the order they were taken.
    backups: Vec<(PathBuf, PathBuf)>,
    /// Holds the flock; released when dropped.
    _lock_file: File,
    /// Set once the apply succeeded or the backups were restored.
    settled: bool,
}

impl ApplyGuard {
    /// Acquire `flock(LOCK_EX | LOCK_NB)` on `<config_path>.linotp-lock`.
    ///
    /// Returns [`PatchError::Locked`] if another run holds the lock.
    pub fn lock(config_path: &Path) -> Result<Self, PatchError> {
        let lock_path = sibling_path(config_path, LOCK_SUFFIX);
        let lock_file = File::create(&lock_path)?;
        lock_file
            .try_lock_exclusive()
            .map_err(|_| PatchError::Locked {
                path: config_path.to_path_buf(),
            })?;

        tracing::debug!(lock = %lock_path.display(), "acquired config lock");

        Ok(Self {
            config_path: config_path.to_path_buf(),
            backups: Vec::new(),
            _lock_file: lock_file,
            settled: false,
        })
    }

    /// Remember that `path` was backed up to `backup_path`.
    pub fn record_backup(&mut self, path: &Path, backup_path: &Path) {
        self.backups
            .push((path.to_path_buf(), backup_path.to_path_buf()));
    }

    /// Keep the rewritten files and release the lock.
    ///
    /// Backups are removed best-effort unless `keep_backups` is set.
    pub fn commit(mut self, keep_backups: bool) {
        self.settled = true;
        if keep_backups {
            return;
        }
        for (_, backup) in &self.backups {
            if let Err(e) = std::fs::remove_file(backup) {
                tracing::warn!(backup = %backup.display(), error = %e, "failed to remove backup");
            }
        }
    }

    /// Copy every backup back over its file, newest first.
    ///
    /// Idempotent: only the first call restores. Every backup is attempted
    /// even if one fails; the first failure is returned.
    pub fn restore(&mut self) -> Result<(), PatchError> {
        if self.settled {
            return Ok(());
        }
        self.settled = true;

        let mut first_err = None;
        for (path, backup) in self.backups.iter().rev() {
            match restore_file(path, backup) {
                Ok(()) => tracing::info!(path = %path.display(), "restored original file"),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to restore file");
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }

        first_err.map_or(Ok(()), Err)
    }
}

impl Drop for ApplyGuard {
    fn drop(&mut self) {
        if !self.settled && !self.backups.is_empty() {
            tracing::warn!(
                config = %self.config_path.display(),
                "apply did not complete, restoring backups"
            );
        }
        let _ = self.restore();
        // The zero-byte lock file stays on disk: removing it would let a new
        // run lock a fresh inode while this handle still holds the old one.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enable::files::backup_file;

    #[test]
    fn test_lock_creates_lock_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.php");
        std::fs::write(&config_path, "<?php").unwrap();

        let guard = ApplyGuard::lock(&config_path).unwrap();
        assert!(dir.path().join("config.php.linotp-lock").exists());
        drop(guard);
    }

    #[test]
    fn test_lock_blocks_concurrent_lock() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.php");
        std::fs::write(&config_path, "<?php").unwrap();

        let guard = ApplyGuard::lock(&config_path).unwrap();
        let second = ApplyGuard::lock(&config_path);
        match second {
            Err(PatchError::Locked { path }) => assert_eq!(path, config_path),
            Err(other) => panic!("expected Locked, got: {other:?}"),
            Ok(_) => panic!("second lock() should fail while the first is held"),
        }

        drop(guard);
        assert!(ApplyGuard::lock(&config_path).is_ok());
    }

    #[test]
    fn test_drop_without_commit_restores_all() {
        let dir = tempfile::tempdir().unwrap();
        let bootstrap = dir.path().join("bootstrap.php");
        let config = dir.path().join("config.php");
        std::fs::write(&bootstrap, "bootstrap original").unwrap();
        std::fs::write(&config, "config original").unwrap();

        {
            let mut guard = ApplyGuard::lock(&config).unwrap();
            for path in [&bootstrap, &config] {
                let backup = backup_file(path).unwrap();
                guard.record_backup(path, &backup);
                std::fs::write(path, "patched").unwrap();
            }
        }

        assert_eq!(std::fs::read_to_string(&bootstrap).unwrap(), "bootstrap original");
        assert_eq!(std::fs::read_to_string(&config).unwrap(), "config original");
        assert!(!dir.path().join("bootstrap.php.linotp-backup").exists());
        assert!(!dir.path().join("config.php.linotp-backup").exists());
    }

    #[test]
    fn test_commit_keeps_changes_and_removes_backups() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.php");
        std::fs::write(&config, "original").unwrap();

        let mut guard = ApplyGuard::lock(&config).unwrap();
        let backup = backup_file(&config).unwrap();
        guard.record_backup(&config, &backup);
        std::fs::write(&config, "patched").unwrap();
        guard.commit(false);

        assert_eq!(std::fs::read_to_string(&config).unwrap(), "patched");
        assert!(!backup.exists());
    }

    #[test]
    fn test_commit_can_keep_backups() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.php");
        std::fs::write(&config, "original").unwrap();

        let mut guard = ApplyGuard::lock(&config).unwrap();
        let backup = backup_file(&config).unwrap();
        guard.record_backup(&config, &backup);
        std::fs::write(&config, "patched").unwrap();
        guard.commit(true);

        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "original");
    }

    #[test]
    fn test_restore_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.php");
        std::fs::write(&config, "original").unwrap();

        let mut guard = ApplyGuard::lock(&config).unwrap();
        let backup = backup_file(&config).unwrap();
        guard.record_backup(&config, &backup);
        std::fs::write(&config, "patched").unwrap();

        guard.restore().unwrap();
        assert_eq!(std::fs::read_to_string(&config).unwrap(), "original");

        // The backup is gone now; a second restore must not try again.
        std::fs::write(&config, "edited after restore").unwrap();
        guard.restore().unwrap();
        drop(guard);
        assert_eq!(
            std::fs::read_to_string(&config).unwrap(),
            "edited after restore"
        );
    }

    #[test]
    fn test_drop_without_backups_leaves_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.php");
        std::fs::write(&config, "original").unwrap();

        {
            let _guard = ApplyGuard::lock(&config).unwrap();
            std::fs::write(&config, "partially rewritten").unwrap();
        }

        assert_eq!(
            std::fs::read_to_string(&config).unwrap(),
            "partially rewritten"
        );
    }
}
