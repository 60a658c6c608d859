//! Store writer: durable append and atomic replace
//!
//! Append:
//! 1. Encode and validate the record (nothing is written on failure)
//! 2. Open with create + append, creating the parent directory if needed
//! 3. Write one line, fsync
//!
//! Replace (the only way records are modified or removed):
//! 1. Encode every line up front
//! 2. Write to `<file>.tmp` in the same directory with the store file's
//!    permissions, fsync
//! 3. Rename over the store file (atomic on POSIX)
//! 4. fsync the directory so the rename is durable
//!
//! Any failure before step 3 leaves the store file exactly as it was and
//! removes the temp file.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};
use super::reader::StoredLine;
use super::record::{Record, RecordLayout};

pub struct StoreWriter {
    path: PathBuf,
    layout: RecordLayout,
}

impl StoreWriter {
    pub fn new(path: impl Into<PathBuf>, layout: RecordLayout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the sibling file used while replacing the store
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Appends one record. Returns the number of bytes written.
    pub fn append(&self, record: &Record) -> StoreResult<usize> {
        let line = self.layout.encode(record)?;
        self.ensure_parent_dir()?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                StoreError::write_failed(
                    format!("Failed to open store file: {}", self.path.display()),
                    e,
                )
            })?;

        // A hand-edited file may lack its final newline; never glue two records together
        let mut bytes = Vec::with_capacity(line.len() + 1);
        if Self::needs_leading_newline(&mut file).map_err(|e| {
            StoreError::write_failed(
                format!("Failed to inspect store file: {}", self.path.display()),
                e,
            )
        })? {
            bytes.push(b'\n');
        }
        bytes.extend_from_slice(line.as_bytes());

        file.write_all(&bytes).map_err(|e| {
            StoreError::write_failed(
                format!("Failed to append record: {}", self.path.display()),
                e,
            )
        })?;

        file.sync_all().map_err(|e| {
            StoreError::write_failed(
                format!("fsync failed after append: {}", self.path.display()),
                e,
            )
        })?;

        Ok(bytes.len())
    }

    /// Atomically replaces the store contents with `lines`.
    ///
    /// Lines that carry their original bytes are written back byte-for-byte;
    /// records built in memory are encoded with a `\n` terminator. The store
    /// file's permissions carry over to the new file.
    pub fn replace(&self, lines: &[StoredLine]) -> StoreResult<usize> {
        let mut contents = Vec::new();
        for line in lines {
            match line {
                StoredLine::Record {
                    original: Some(bytes),
                    ..
                } => contents.extend_from_slice(bytes),
                StoredLine::Record {
                    record,
                    original: None,
                } => contents.extend_from_slice(self.layout.encode(record)?.as_bytes()),
                StoredLine::Malformed(skipped) => contents.extend_from_slice(&skipped.to_bytes()),
            }
        }

        self.ensure_parent_dir()?;
        let temp_path = self.temp_path();

        if let Err(e) = self.write_temp(&temp_path, &contents) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::write_failed(
                format!("Failed to replace store file: {}", self.path.display()),
                e,
            ));
        }

        if let Some(parent) = self.parent_dir() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        Ok(contents.len())
    }

    /// Write and fsync the temp file, giving it the store file's permissions.
    fn write_temp(&self, temp_path: &Path, contents: &[u8]) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .map_err(|e| {
                StoreError::write_failed(
                    format!("Failed to create temp file: {}", temp_path.display()),
                    e,
                )
            })?;

        if let Ok(metadata) = fs::metadata(&self.path) {
            file.set_permissions(metadata.permissions()).map_err(|e| {
                StoreError::write_failed(
                    format!("Failed to copy permissions to temp file: {}", temp_path.display()),
                    e,
                )
            })?;
        }

        file.write_all(contents).map_err(|e| {
            StoreError::write_failed(
                format!("Failed to write temp file: {}", temp_path.display()),
                e,
            )
        })?;

        file.sync_all().map_err(|e| {
            StoreError::write_failed(
                format!("fsync failed on temp file: {}", temp_path.display()),
                e,
            )
        })
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn ensure_parent_dir(&self) -> StoreResult<()> {
        if let Some(parent) = self.parent_dir() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::write_failed(
                        format!("Failed to create directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }
        Ok(())
    }

    fn needs_leading_newline(file: &mut File) -> std::io::Result<bool> {
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(false);
        }
        file.seek(SeekFrom::Start(len - 1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::reader::{LineEnding, SkippedLine};
    use crate::store::{LineFault, StoreErrorCode};
    use tempfile::TempDir;

    #[test]
    fn test_append_creates_file_and_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("students.txt");
        let writer = StoreWriter::new(&path, RecordLayout::new(4));

        writer.append(&Record::from(["S001", "Jane Doe", "CS", "1"])).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "S001|Jane Doe|CS|1\n");
    }

    #[test]
    fn test_append_grows_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grades.txt");
        let writer = StoreWriter::new(&path, RecordLayout::new(3));

        writer.append(&Record::from(["Ana", "Databases", "91"])).unwrap();
        writer.append(&Record::from(["Ben", "Networking", "74"])).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Ana|Databases|91\nBen|Networking|74\n"
        );
    }

    #[test]
    fn test_append_repairs_missing_final_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grades.txt");
        fs::write(&path, "Ana|Databases|91").unwrap();

        StoreWriter::new(&path, RecordLayout::new(3))
            .append(&Record::from(["Ben", "Networking", "74"]))
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Ana|Databases|91\nBen|Networking|74\n"
        );
    }

    #[test]
    fn test_invalid_record_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grades.txt");
        let writer = StoreWriter::new(&path, RecordLayout::new(3));

        assert!(writer.append(&Record::from(["Ana|B", "Databases", "91"])).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_replace_keeps_malformed_lines_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pairs.txt");
        let writer = StoreWriter::new(&path, RecordLayout::new(2));

        let lines = vec![
            StoredLine::record(Record::from(["a", "1"])),
            StoredLine::Malformed(SkippedLine {
                line_number: 2,
                fault: LineFault::FieldCount { expected: 2, found: 1 },
                raw: b"garbage".to_vec(),
                ending: LineEnding::Lf,
            }),
        ];
        writer.replace(&lines).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a|1\ngarbage\n");
        assert!(!writer.temp_path().exists());
    }

    #[test]
    fn test_replace_with_invalid_record_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pairs.txt");
        fs::write(&path, "a|1\n").unwrap();
        let writer = StoreWriter::new(&path, RecordLayout::new(2));

        let lines = vec![StoredLine::record(Record::from(["a", "1|2"]))];
        assert!(writer.replace(&lines).is_err());

        assert_eq!(fs::read_to_string(&path).unwrap(), "a|1\n");
        assert!(!writer.temp_path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_replace_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.txt");
        fs::write(&path, "ana|hash1\nben|hash2\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        let writer = StoreWriter::new(&path, RecordLayout::new(2));

        writer
            .replace(&[StoredLine::record(Record::from(["ana", "hash1"]))])
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "ana|hash1\n");
    }

    #[test]
    fn test_replace_fails_when_temp_path_is_blocked() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pairs.txt");
        fs::write(&path, "a|1\nb|2\n").unwrap();
        let writer = StoreWriter::new(&path, RecordLayout::new(2));
        fs::create_dir(writer.temp_path()).unwrap();
        fs::write(writer.temp_path().join("keep"), "x").unwrap();

        let err = writer
            .replace(&[StoredLine::record(Record::from(["a", "1"]))])
            .unwrap_err();

        assert_eq!(err.code(), StoreErrorCode::WriteFailed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "a|1\nb|2\n");
        assert!(writer.temp_path().join("keep").exists());
    }

    #[test]
    fn test_append_fails_when_parent_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("data");
        fs::write(&blocker, "not a directory").unwrap();
        let writer = StoreWriter::new(blocker.join("grades.txt"), RecordLayout::new(3));

        let err = writer
            .append(&Record::from(["Ana", "Databases", "91"]))
            .unwrap_err();

        assert_eq!(err.code(), StoreErrorCode::WriteFailed);
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let writer = StoreWriter::new("/data/students.txt", RecordLayout::new(4));
        assert_eq!(writer.temp_path(), PathBuf::from("/data/students.txt.tmp"));
    }
}
