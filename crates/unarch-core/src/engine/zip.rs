//! Bundled ZIP decoding engine.
//!
//! Adapts the `zip` crate to the [`Engine`] boundary. Password handling
//! covers both ZipCrypto and AES entries:
//!
//! - reading the header of an encrypted entry with no password configured
//!   fails with [`EngineStatus::MissingPassword`], so a password-less probe
//!   detects protection on the first header read;
//! - decoding with a wrong password fails with the same status (AES verifies
//!   up front) or with [`EngineStatus::BadData`] when ZipCrypto only notices
//!   at checksum time.
//!
//! Handles hold an exclusive [`File`] and a cursor into the central
//! directory; each full traversal needs a fresh open.

use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;

use ::zip::ZipArchive;
use ::zip::result::ZipError;

use crate::types::EntryMetadata;

use super::Engine;
use super::EngineError;
use super::EngineHandle;
use super::EngineStatus;
use super::EntrySink;
use super::OpenMode;

/// ZIP-format decoding engine backed by the `zip` crate.
///
/// Stateless; every [`open`](Engine::open) produces an independent handle.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipEngine;

impl ZipEngine {
    /// Creates a new ZIP engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Engine for ZipEngine {
    fn open(
        &self,
        path: &Path,
        password: Option<&str>,
        mode: OpenMode,
    ) -> Result<Box<dyn EngineHandle>, EngineError> {
        let file = File::open(path).map_err(|e| {
            EngineError::new(
                EngineStatus::Open,
                format!("cannot open {}: {e}", path.display()),
            )
        })?;
        let archive = ZipArchive::new(file)
            .map_err(|e| engine_error(&e, &format!("cannot read {}", path.display())))?;
        Ok(Box::new(ZipHandle {
            archive,
            cursor: 0,
            pending: None,
            password: password.map(str::to_owned),
            mode,
        }))
    }
}

/// The entry announced by the last `read_header`, awaiting `process`.
struct Pending {
    index: usize,
    encrypted: bool,
}

struct ZipHandle {
    archive: ZipArchive<File>,
    cursor: usize,
    pending: Option<Pending>,
    password: Option<String>,
    mode: OpenMode,
}

impl ZipHandle {
    /// Whether the central directory marks this entry as encrypted.
    ///
    /// Probed by attempting a password-less read: the `zip` crate refuses
    /// encrypted entries with a password-required error before any data is
    /// touched.
    fn entry_requires_password(&mut self, index: usize) -> bool {
        match self.archive.by_index(index) {
            Err(ZipError::UnsupportedArchive(msg)) => msg.contains("Password required"),
            _ => false,
        }
    }
}

impl EngineHandle for ZipHandle {
    fn read_header(&mut self) -> Result<Option<EntryMetadata>, EngineError> {
        // Reading the next header abandons an unconsumed entry; skipping is
        // free in this format.
        self.pending = None;
        if self.cursor >= self.archive.len() {
            return Ok(None);
        }
        let index = self.cursor;
        self.cursor += 1;

        let meta = {
            let raw = self
                .archive
                .by_index_raw(index)
                .map_err(|e| engine_error(&e, "cannot read entry header"))?;
            EntryMetadata {
                path: raw.name().to_string(),
                is_directory: raw.is_dir(),
                size: raw.size(),
            }
        };

        let encrypted = !meta.is_directory && self.entry_requires_password(index);
        if encrypted && self.password.is_none() {
            return Err(EngineError::new(
                EngineStatus::MissingPassword,
                format!("entry {} is encrypted and no password is set", meta.path),
            ));
        }

        self.pending = Some(Pending { index, encrypted });
        Ok(Some(meta))
    }

    fn process(&mut self, sink: EntrySink<'_>) -> Result<(), EngineError> {
        let Some(pending) = self.pending.take() else {
            return Err(EngineError::new(
                EngineStatus::Unknown,
                "no entry pending; read_header must precede process",
            ));
        };
        if matches!(sink, EntrySink::Discard) {
            return Ok(());
        }
        if self.mode == OpenMode::ListOnly {
            return Err(EngineError::new(
                EngineStatus::Unknown,
                "handle was opened for listing only",
            ));
        }

        let mut entry = if pending.encrypted {
            let password = self.password.as_deref().ok_or_else(|| {
                EngineError::new(EngineStatus::MissingPassword, "entry is encrypted")
            })?;
            self.archive
                .by_index_decrypt(pending.index, password.as_bytes())
                .map_err(|e| engine_error(&e, "cannot decrypt entry"))?
        } else {
            self.archive
                .by_index(pending.index)
                .map_err(|e| engine_error(&e, "cannot read entry"))?
        };

        match sink {
            EntrySink::Discard => {}
            EntrySink::Memory(buf) => {
                buf.reserve(usize::try_from(entry.size()).unwrap_or(0));
                entry.read_to_end(buf).map_err(read_failure)?;
            }
            EntrySink::Chunked {
                buffer_size,
                deliver,
            } => {
                let mut chunk = vec![0u8; buffer_size.max(1)];
                loop {
                    let n = entry.read(&mut chunk).map_err(read_failure)?;
                    if n == 0 {
                        break;
                    }
                    deliver(&chunk[..n])?;
                }
            }
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), EngineError> {
        // The underlying file handle is released on drop; nothing can fail.
        Ok(())
    }
}

fn engine_error(err: &ZipError, context: &str) -> EngineError {
    let status = match err {
        ZipError::Io(io) if io.kind() == ErrorKind::InvalidData => EngineStatus::BadData,
        ZipError::Io(_) => EngineStatus::Read,
        ZipError::InvalidArchive(_) => EngineStatus::BadArchive,
        ZipError::UnsupportedArchive(msg) if msg.contains("Password required") => {
            EngineStatus::MissingPassword
        }
        ZipError::UnsupportedArchive(_) => EngineStatus::UnknownFormat,
        ZipError::InvalidPassword => EngineStatus::MissingPassword,
        ZipError::FileNotFound => EngineStatus::BadData,
        _ => EngineStatus::Unknown,
    };
    EngineError::new(status, format!("{context}: {err}"))
}

/// Decoded-stream read failures: checksum mismatches surface as damaged data,
/// everything else as a read failure.
fn read_failure(err: std::io::Error) -> EngineError {
    let status = if err.kind() == ErrorKind::InvalidData {
        EngineStatus::BadData
    } else {
        EngineStatus::Read
    };
    EngineError::new(status, format!("cannot decode entry data: {err}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::test_utils::ZipFixture;
    use tempfile::TempDir;

    fn fixture_path(temp: &TempDir, fixture: ZipFixture) -> std::path::PathBuf {
        let path = temp.path().join("fixture.zip");
        std::fs::write(&path, fixture.build()).unwrap();
        path
    }

    #[test]
    fn test_header_iteration_reaches_end() {
        let temp = TempDir::new().unwrap();
        let path = fixture_path(
            &temp,
            ZipFixture::new()
                .add_file("a.txt", b"alpha")
                .add_file("b.txt", b"beta"),
        );

        let mut handle = ZipEngine::new()
            .open(&path, None, OpenMode::ListOnly)
            .unwrap();
        let first = handle.read_header().unwrap().unwrap();
        assert_eq!(first.path, "a.txt");
        assert_eq!(first.size, 5);
        handle.process(EntrySink::Discard).unwrap();
        assert!(handle.read_header().unwrap().is_some());
        handle.process(EntrySink::Discard).unwrap();
        assert!(handle.read_header().unwrap().is_none());
        handle.close().unwrap();
    }

    #[test]
    fn test_process_without_header_fails() {
        let temp = TempDir::new().unwrap();
        let path = fixture_path(&temp, ZipFixture::new().add_file("a.txt", b"alpha"));

        let mut handle = ZipEngine::new()
            .open(&path, None, OpenMode::Extract)
            .unwrap();
        let err = handle.process(EntrySink::Discard).unwrap_err();
        assert_eq!(err.status(), EngineStatus::Unknown);
    }

    #[test]
    fn test_list_only_handle_refuses_data() {
        let temp = TempDir::new().unwrap();
        let path = fixture_path(&temp, ZipFixture::new().add_file("a.txt", b"alpha"));

        let mut handle = ZipEngine::new()
            .open(&path, None, OpenMode::ListOnly)
            .unwrap();
        handle.read_header().unwrap().unwrap();
        let mut buf = Vec::new();
        let err = handle.process(EntrySink::Memory(&mut buf)).unwrap_err();
        assert_eq!(err.status(), EngineStatus::Unknown);
    }

    #[test]
    fn test_encrypted_entry_without_password() {
        let temp = TempDir::new().unwrap();
        let path = fixture_path(
            &temp,
            ZipFixture::new().add_encrypted_file("secret.txt", b"hidden", "pw"),
        );

        let mut handle = ZipEngine::new()
            .open(&path, None, OpenMode::ListOnly)
            .unwrap();
        let err = handle.read_header().unwrap_err();
        assert_eq!(err.status(), EngineStatus::MissingPassword);
    }

    #[test]
    fn test_encrypted_entry_with_password_decodes() {
        let temp = TempDir::new().unwrap();
        let path = fixture_path(
            &temp,
            ZipFixture::new().add_encrypted_file("secret.txt", b"hidden", "pw"),
        );

        let mut handle = ZipEngine::new()
            .open(&path, Some("pw"), OpenMode::Extract)
            .unwrap();
        handle.read_header().unwrap().unwrap();
        let mut buf = Vec::new();
        handle.process(EntrySink::Memory(&mut buf)).unwrap();
        assert_eq!(buf, b"hidden");
    }

    #[test]
    fn test_garbage_file_is_bad_archive() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("garbage.zip");
        std::fs::write(&path, b"this is not a zip file at all").unwrap();

        let err = ZipEngine::new()
            .open(&path, None, OpenMode::ListOnly)
            .map(|_| ())
            .unwrap_err();
        assert_eq!(err.status(), EngineStatus::BadArchive);
    }
}
