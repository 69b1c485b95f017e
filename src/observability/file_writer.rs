//! Size-rotated, append-only trace file.
//!
//! When the file grows past its limit it is shifted to `<name>.1`, older
//! backups move up by one (`.1` → `.2` and so on) and the oldest beyond the
//! retention count is dropped.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Rotating line writer shared by the exporter.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    /// Opened on first write.
    file: Mutex<Option<File>>,
}

impl RotatingFile {
    pub const fn new(path: PathBuf) -> Self {
        Self::with_limits(path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    pub const fn with_limits(path: PathBuf, max_bytes: u64, backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            backups,
            file: Mutex::new(None),
        }
    }

    /// Path of the n-th backup, `n >= 1`.
    fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    /// Appends one line, rotating first if the file is over its limit.
    ///
    /// # Errors
    ///
    /// Returns an error if rotation, opening or writing fails, or if the lock
    /// was poisoned.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|e| io::Error::other(format!("trace file lock poisoned: {e}")))?;

        if fs::metadata(&self.path).is_ok_and(|meta| meta.len() > self.max_bytes) {
            *file = None;
            self.rotate()?;
        }

        if file.is_none() {
            *file = Some(open_append(&self.path)?);
        }
        if let Some(handle) = file.as_mut() {
            writeln!(handle, "{line}")?;
            handle.flush()?;
        }
        Ok(())
    }

    fn rotate(&self) -> io::Result<()> {
        if self.backups == 0 {
            return fs::remove_file(&self.path);
        }

        let oldest = self.backup_path(self.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.backups).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("backups", &self.backups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rotates_and_keeps_bounded_backups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("traces.json");
        let writer = RotatingFile::with_limits(path.clone(), 8, 2);

        for i in 0..5 {
            writer.write_line(&format!("line-{i}-padding")).unwrap();
        }

        assert!(path.exists());
        assert!(writer.backup_path(1).exists());
        assert!(writer.backup_path(2).exists());
        assert!(!writer.backup_path(3).exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "line-4-padding\n");
        assert_eq!(
            fs::read_to_string(writer.backup_path(1)).unwrap(),
            "line-3-padding\n"
        );
    }

    #[test]
    fn small_files_are_appended() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("traces.json");
        let writer = RotatingFile::new(path.clone());

        writer.write_line("a").unwrap();
        writer.write_line("b").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "a\nb\n");
    }

    #[test]
    fn debug_output_names_the_path_only() {
        let writer = RotatingFile::new(PathBuf::from("/tmp/traces.json"));
        let rendered = format!("{writer:?}");
        assert!(rendered.starts_with("RotatingFile"));
        assert!(rendered.contains("/tmp/traces.json"));
        assert!(!rendered.contains("Mutex"));
    }
}
