//! Test utilities for building archive fixtures.
//!
//! Reusable helpers for creating in-memory ZIP archives, shared by unit,
//! integration, and property tests.
//!
//! # Panics
//!
//! Functions here may panic on I/O errors since they are designed for test
//! use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

use zip::unstable::write::FileOptionsExt;
use zip::write::SimpleFileOptions;
use zip::write::ZipWriter;

/// Builder for ZIP archive fixtures with plain, encrypted, and directory
/// entries.
///
/// Entries are stored uncompressed in insertion order, which is also the
/// order listing reports them in.
///
/// # Examples
///
/// ```
/// use unarch_core::test_utils::ZipFixture;
///
/// let bytes = ZipFixture::new()
///     .add_file("a.txt", b"alpha")
///     .add_directory("dir/")
///     .add_file("dir/b.txt", b"beta")
///     .build();
/// ```
pub struct ZipFixture {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipFixture {
    /// Creates an empty fixture.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644)
    }

    /// Adds a plain file entry.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        self.zip.start_file(path, Self::options()).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a password-protected file entry (legacy ZipCrypto).
    #[must_use]
    pub fn add_encrypted_file(mut self, path: &str, data: &[u8], password: &str) -> Self {
        let options = Self::options().with_deprecated_encryption(password.as_bytes());
        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory marker.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_builds_nonempty_archive() {
        let bytes = ZipFixture::new()
            .add_file("file.txt", b"content")
            .add_directory("dir/")
            .build();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_empty_fixture_is_valid() {
        let bytes = ZipFixture::new().build();
        assert!(!bytes.is_empty());
    }
}
