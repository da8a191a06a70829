//! Password probing and validation.
//!
//! Both probes run a throwaway open/close cycle and never mutate
//! caller-visible session state; the probe handle is always released, on
//! every path, by the guard's destructor.

use crate::engine::EntrySink;
use crate::engine::OpenMode;
use crate::session::ArchiveSession;

impl ArchiveSession {
    /// Whether the archive is password-protected.
    ///
    /// Probes with *no* password, regardless of what the session has
    /// configured: protection is a property of the archive, not of the
    /// current credentials. Returns `true` only when the open or the first
    /// header read fails with a missing-password condition; success or any
    /// other failure reads as unprotected.
    #[must_use]
    pub fn is_password_protected(&self) -> bool {
        let mut probe = match self.probe(None, OpenMode::ListOnly) {
            Ok(probe) => probe,
            Err(err) => return err.is_password_error(),
        };
        match probe.read_header() {
            Err(err) => err.is_password_error(),
            Ok(_) => false,
        }
    }

    /// Whether the configured password unlocks the archive.
    ///
    /// Decodes the first file entry's data — header reads alone do not
    /// always exercise decryption. Returns `true` on success (including
    /// archives that are not protected at all, whatever password is
    /// configured) and `false` on a credential failure or on any other
    /// error, since the question is strictly password correctness, not
    /// archive health. An archive with no file entries validates `true`.
    #[must_use]
    pub fn validate_password(&self) -> bool {
        let mut probe = match self.probe(self.password(), OpenMode::Extract) {
            Ok(probe) => probe,
            Err(_) => return false,
        };
        loop {
            match probe.read_header() {
                Ok(Some(meta)) if meta.is_directory => {
                    if probe.skip().is_err() {
                        return false;
                    }
                }
                Ok(Some(_)) => {
                    let mut data = Vec::new();
                    return probe.process(EntrySink::Memory(&mut data)).is_ok();
                }
                Ok(None) => return true,
                Err(_) => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::session::ArchiveSession;
    use crate::test_utils::ZipFixture;
    use tempfile::TempDir;

    fn write_fixture(temp: &TempDir, name: &str, fixture: ZipFixture) -> std::path::PathBuf {
        let path = temp.path().join(name);
        std::fs::write(&path, fixture.build()).unwrap();
        path
    }

    #[test]
    fn test_plain_archive_is_not_protected() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(&temp, "plain.zip", ZipFixture::new().add_file("a.txt", b"a"));
        let session = ArchiveSession::new(path);
        assert!(!session.is_password_protected());
    }

    #[test]
    fn test_encrypted_archive_is_protected_regardless_of_password() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(
            &temp,
            "locked.zip",
            ZipFixture::new().add_encrypted_file("secret.txt", b"s", "pw"),
        );

        let no_password = ArchiveSession::new(&path);
        assert!(no_password.is_password_protected());

        let with_password = ArchiveSession::with_password(&path, "pw");
        assert!(with_password.is_password_protected());
    }

    #[test]
    fn test_validate_correct_password() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(
            &temp,
            "locked.zip",
            ZipFixture::new().add_encrypted_file("secret.txt", b"payload", "pw"),
        );
        let session = ArchiveSession::with_password(path, "pw");
        assert!(session.validate_password());
    }

    #[test]
    fn test_validate_wrong_password() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(
            &temp,
            "locked.zip",
            ZipFixture::new().add_encrypted_file("secret.txt", b"payload", "pw"),
        );
        let session = ArchiveSession::with_password(path, "wrong");
        assert!(!session.validate_password());
    }

    #[test]
    fn test_validate_unprotected_ignores_password() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(&temp, "plain.zip", ZipFixture::new().add_file("a.txt", b"a"));
        let session = ArchiveSession::with_password(path, "anything");
        assert!(session.validate_password());
    }

    #[test]
    fn test_validate_missing_archive_is_false() {
        let session = ArchiveSession::new("/no/such/file.zip");
        assert!(!session.validate_password());
        assert!(!session.is_password_protected());
    }

    #[test]
    fn test_validate_empty_archive_is_true() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(&temp, "empty.zip", ZipFixture::new());
        let session = ArchiveSession::new(path);
        assert!(session.validate_password());
    }
}
