//! Rotating file writer with size-based rotation and backup retention.
//!
//! Both the plain-text log and the OTLP trace file go through [`RotatingFile`],
//! so neither grows without bound while the dashboard owns the terminal.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// When the current file exceeds its size limit it is renamed with a
/// timestamp suffix and a fresh file is opened. Backups beyond the retention
/// limit are removed, newest kept first.
///
/// # Rotation Strategy
///
/// 1. Check file size before each write
/// 2. If size > limit, rotate:
///    - Rename current file to `<file name>.<timestamp>`
///    - Open a new empty file
///    - Remove the oldest backups beyond the retention limit
///
/// `&RotatingFile` implements [`io::Write`], so an `Arc<RotatingFile>` can be
/// handed straight to `tracing_subscriber::fmt::layer().with_writer(..)`.
///
/// # Example
///
/// ```rust
/// use ejiview::observability::RotatingFile;
///
/// let dir = std::env::temp_dir();
/// let writer = RotatingFile::new(dir.join("ejiview-doc.log"));
/// writer.write_line("dashboard started")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct RotatingFile {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Lazily opened on first write.
    writer: Mutex<Option<File>>,
}

impl RotatingFile {
    /// Creates a writer with the default limits (10 MB, 3 backups).
    ///
    /// The file is not opened until the first write.
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    /// Creates a writer with explicit rotation limits.
    #[must_use]
    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            writer: Mutex::new(None),
        }
    }

    /// Path of the live file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Writes `line` followed by a newline.
    ///
    /// # Errors
    ///
    /// Fails on rotation, open, or write errors, or if another writer
    /// panicked while holding the lock.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        self.write_bytes(buf.as_bytes())
    }

    /// Appends `bytes` as one write, rotating first if the file is over its
    /// limit.
    ///
    /// # Errors
    ///
    /// See [`RotatingFile::write_line`].
    pub fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::other(format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut writer)?;

        let file = match writer.as_mut() {
            Some(file) => file,
            None => writer.insert(OpenOptions::new().create(true).append(true).open(&self.file_path)?),
        };

        file.write_all(bytes)?;
        file.flush()
    }

    fn check_and_rotate(&self, writer: &mut Option<File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    /// Renames the live file to `<file name>.<timestamp>` and prunes backups.
    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f");
        let mut backup_name = self.file_name()?.to_string();
        backup_name.push_str(&format!(".{timestamp}"));
        let backup_path = self.file_path.with_file_name(backup_name);

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    /// Keeps the newest `max_backups` backups. Individual removal errors are
    /// ignored.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::other("No parent directory"))?;
        let prefix = format!("{}.", self.file_name()?);

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        // Timestamp suffixes sort chronologically.
        backups.sort_by(|a, b| b.file_name().cmp(&a.file_name()));

        for old_backup in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }

    fn file_name(&self) -> io::Result<&str> {
        self.file_path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| io::Error::other("Invalid file name"))
    }
}

impl Write for &RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backups_in(dir: &Path, name: &str) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|entry| {
                let file_name = entry.file_name();
                let file_name = file_name.to_string_lossy();
                file_name.starts_with(&format!("{name}.")) && file_name != name
            })
            .count()
    }

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFile::new(dir.path().join("ejiview.log"));

        writer.write_line("first").unwrap();
        writer.write_line("second").unwrap();

        let contents = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn rotates_when_over_limit() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFile::with_limits(dir.path().join("trace.json"), 8, 3);

        writer.write_line("0123456789").unwrap();
        writer.write_line("next").unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "next\n");
        assert_eq!(backups_in(dir.path(), "trace.json"), 1);
    }

    #[test]
    fn keeps_at_most_max_backups() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFile::with_limits(dir.path().join("trace.json"), 1, 2);

        for i in 0..5 {
            writer.write_line(&format!("line {i}")).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        assert!(backups_in(dir.path(), "trace.json") <= 2);
        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "line 4\n");
    }

    #[test]
    fn usable_as_io_write() {
        let dir = tempfile::tempdir().unwrap();
        let file = RotatingFile::new(dir.path().join("ejiview.log"));

        let mut handle = &file;
        write!(handle, "loaded {} counties", 3).unwrap();

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "loaded 3 counties");
    }
}
