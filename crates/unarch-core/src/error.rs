//! Error taxonomy for archive operations.
//!
//! Every decoding-engine failure is mapped into [`ArchiveError`] at the call
//! site through the single `From<EngineError>` impl below; that impl is the only
//! place that understands the engine's numeric status space. Two conditions
//! are core-detected and never come from an engine: [`ArchiveError::ArchiveNotFound`]
//! (the path does not resolve to a readable file) and
//! [`ArchiveError::EntryNotFound`] (a single-entry extraction scanned to end
//! of archive without a match).

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;
use crate::engine::EngineStatus;

/// Result type alias using [`ArchiveError`].
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Numeric code reported for [`ArchiveError::ArchiveNotFound`].
pub const CODE_ARCHIVE_NOT_FOUND: i32 = 101;

/// Numeric code reported for [`ArchiveError::EntryNotFound`].
pub const CODE_ENTRY_NOT_FOUND: i32 = 102;

/// Errors produced by archive sessions.
///
/// A closed taxonomy: engine statuses map one-to-one onto the first twelve
/// variants, and the last two are detected by the core itself.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// End-of-archive reported outside normal header iteration. A signal
    /// turned error; only a misbehaving engine produces it.
    #[error("unexpected end of archive: {0}")]
    EndOfArchive(String),

    /// The engine ran out of memory while decoding.
    #[error("out of memory while reading archive: {0}")]
    NoMemory(String),

    /// Entry header or data is damaged.
    #[error("archive data is damaged: {0}")]
    BadData(String),

    /// The file is not a valid archive.
    #[error("not a valid archive: {0}")]
    BadArchive(String),

    /// The archive uses an unsupported format or version.
    #[error("unsupported archive format: {0}")]
    UnknownFormat(String),

    /// Failed to open the archive file.
    #[error("failed to open archive: {0}")]
    Open(String),

    /// Failed to create an extraction target, including the case where the
    /// destination already exists and overwriting was not requested.
    #[error("failed to create extraction target: {0}")]
    Create(String),

    /// Failed to close the archive.
    #[error("failed to close archive: {0}")]
    Close(String),

    /// Failed to read from the archive.
    #[error("failed to read archive: {0}")]
    Read(String),

    /// Failed to write extracted data.
    #[error("failed to write extracted data: {0}")]
    Write(String),

    /// An archive header exceeds the engine's buffer.
    #[error("archive header too large: {0}")]
    HeaderTooLarge(String),

    /// Unspecified failure, tagged with the engine's numeric code.
    #[error("archive operation failed (code {code}): {message}")]
    Unknown {
        /// The engine's raw status code.
        code: i32,
        /// Human-readable detail.
        message: String,
    },

    /// The archive requires a password that is missing or incorrect.
    #[error("archive password missing or incorrect: {0}")]
    MissingPassword(String),

    /// The configured path does not resolve to an existing readable file.
    /// Detected by the core before the engine is consulted.
    #[error("archive not found: {path}")]
    ArchiveNotFound {
        /// The path that failed to resolve.
        path: PathBuf,
    },

    /// No entry with the requested path exists in the archive.
    #[error("entry not found in archive: {name}")]
    EntryNotFound {
        /// The entry path that was searched for.
        name: String,
    },
}

impl ArchiveError {
    /// The numeric code underlying this error: the engine status code for
    /// engine-mapped variants, or one of the core-only codes
    /// ([`CODE_ARCHIVE_NOT_FOUND`], [`CODE_ENTRY_NOT_FOUND`]).
    #[must_use]
    pub fn underlying_code(&self) -> i32 {
        match self {
            Self::EndOfArchive(_) => EngineStatus::EndOfArchive.code(),
            Self::NoMemory(_) => EngineStatus::NoMemory.code(),
            Self::BadData(_) => EngineStatus::BadData.code(),
            Self::BadArchive(_) => EngineStatus::BadArchive.code(),
            Self::UnknownFormat(_) => EngineStatus::UnknownFormat.code(),
            Self::Open(_) => EngineStatus::Open.code(),
            Self::Create(_) => EngineStatus::Create.code(),
            Self::Close(_) => EngineStatus::Close.code(),
            Self::Read(_) => EngineStatus::Read.code(),
            Self::Write(_) => EngineStatus::Write.code(),
            Self::HeaderTooLarge(_) => EngineStatus::SmallBuffer.code(),
            Self::Unknown { code, .. } => *code,
            Self::MissingPassword(_) => EngineStatus::MissingPassword.code(),
            Self::ArchiveNotFound { .. } => CODE_ARCHIVE_NOT_FOUND,
            Self::EntryNotFound { .. } => CODE_ENTRY_NOT_FOUND,
        }
    }

    /// Returns `true` for credential failures (missing or wrong password).
    #[must_use]
    pub fn is_password_error(&self) -> bool {
        matches!(self, Self::MissingPassword(_))
    }

    /// Returns `true` if the archive or a requested entry was not found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ArchiveNotFound { .. } | Self::EntryNotFound { .. }
        )
    }
}

impl From<EngineError> for ArchiveError {
    fn from(err: EngineError) -> Self {
        let (status, detail) = err.into_parts();
        match status {
            EngineStatus::EndOfArchive => Self::EndOfArchive(detail),
            EngineStatus::NoMemory => Self::NoMemory(detail),
            EngineStatus::BadData => Self::BadData(detail),
            EngineStatus::BadArchive => Self::BadArchive(detail),
            EngineStatus::UnknownFormat => Self::UnknownFormat(detail),
            EngineStatus::Open => Self::Open(detail),
            EngineStatus::Create => Self::Create(detail),
            EngineStatus::Close => Self::Close(detail),
            EngineStatus::Read => Self::Read(detail),
            EngineStatus::Write => Self::Write(detail),
            EngineStatus::SmallBuffer => Self::HeaderTooLarge(detail),
            EngineStatus::Unknown => Self::Unknown {
                code: EngineStatus::Unknown.code(),
                message: detail,
            },
            EngineStatus::MissingPassword => Self::MissingPassword(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_status_maps_to_matching_variant() {
        let cases = [
            (EngineStatus::NoMemory, 11),
            (EngineStatus::BadData, 12),
            (EngineStatus::BadArchive, 13),
            (EngineStatus::UnknownFormat, 14),
            (EngineStatus::Open, 15),
            (EngineStatus::Create, 16),
            (EngineStatus::Close, 17),
            (EngineStatus::Read, 18),
            (EngineStatus::Write, 19),
            (EngineStatus::SmallBuffer, 20),
            (EngineStatus::Unknown, 21),
            (EngineStatus::MissingPassword, 22),
        ];
        for (status, code) in cases {
            let err: ArchiveError = EngineError::new(status, "detail").into();
            assert_eq!(err.underlying_code(), code, "status {status:?}");
        }
    }

    #[test]
    fn test_core_only_codes() {
        let err = ArchiveError::ArchiveNotFound {
            path: PathBuf::from("/missing.zip"),
        };
        assert_eq!(err.underlying_code(), CODE_ARCHIVE_NOT_FOUND);
        assert!(err.is_not_found());

        let err = ArchiveError::EntryNotFound {
            name: "a.txt".into(),
        };
        assert_eq!(err.underlying_code(), CODE_ENTRY_NOT_FOUND);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_password_classification() {
        let err: ArchiveError =
            EngineError::new(EngineStatus::MissingPassword, "entry is encrypted").into();
        assert!(err.is_password_error());
        assert!(!err.is_not_found());

        let err: ArchiveError = EngineError::new(EngineStatus::BadData, "crc mismatch").into();
        assert!(!err.is_password_error());
    }

    #[test]
    fn test_display_includes_detail() {
        let err: ArchiveError = EngineError::new(EngineStatus::BadArchive, "truncated header").into();
        let display = err.to_string();
        assert!(display.contains("not a valid archive"));
        assert!(display.contains("truncated header"));
    }

    #[test]
    fn test_not_found_display_includes_path() {
        let err = ArchiveError::ArchiveNotFound {
            path: PathBuf::from("/data/missing.zip"),
        };
        assert!(err.to_string().contains("/data/missing.zip"));
    }
}
