//! The decoding-engine boundary.
//!
//! A decoding engine owns the container-format parsing and decompression.
//! The core drives it through four primitives: open, read-next-header,
//! process-pending-entry, and close. Handles obey strict ordering: after a
//! successful [`EngineHandle::read_header`], the returned entry is *pending*
//! and must be consumed with [`EngineHandle::process`] (a [`EntrySink::Discard`]
//! sink skips its data) before the next header is meaningful.
//!
//! Engine failures carry an [`EngineStatus`] from a closed numeric space plus
//! a detail string. The core maps them into [`ArchiveError`] at every call
//! site; no status value crosses into caller-visible results.
//!
//! [`ArchiveError`]: crate::ArchiveError

pub mod zip;

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::types::EntryMetadata;

/// Status codes a decoding engine may report.
///
/// This is a closed enumeration; the discriminants are the stable numeric
/// codes exposed through [`ArchiveError::underlying_code`].
///
/// [`ArchiveError::underlying_code`]: crate::ArchiveError::underlying_code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum EngineStatus {
    /// No more headers to read. A signal, not a failure; well-behaved handles
    /// report it as `Ok(None)` from `read_header` instead.
    EndOfArchive = 10,
    /// The engine ran out of memory while decoding.
    NoMemory = 11,
    /// Entry header or data is damaged.
    BadData = 12,
    /// The file is not a valid archive of this format.
    BadArchive = 13,
    /// The archive uses an unsupported format version or method.
    UnknownFormat = 14,
    /// Failed to open the archive file.
    Open = 15,
    /// Failed to create an extraction target.
    Create = 16,
    /// Failed to close the archive.
    Close = 17,
    /// Failed to read from the archive.
    Read = 18,
    /// Failed to write decoded data.
    Write = 19,
    /// A header field exceeds the engine's buffer.
    SmallBuffer = 20,
    /// Unspecified engine failure.
    Unknown = 21,
    /// The archive requires a password that is missing or incorrect.
    MissingPassword = 22,
}

impl EngineStatus {
    /// The stable numeric code for this status.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// A failure reported by a decoding engine: status plus human-readable detail.
#[derive(Error, Debug)]
#[error("{detail}")]
pub struct EngineError {
    status: EngineStatus,
    detail: String,
}

impl EngineError {
    /// Creates an engine error from a status and a detail message.
    pub fn new(status: EngineStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// The status this error carries.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// The detail message.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub(crate) fn into_parts(self) -> (EngineStatus, String) {
        (self.status, self.detail)
    }
}

/// What a handle is opened for.
///
/// Listing reads headers only; extraction additionally decodes entry data.
/// Engines may reject data requests on a listing handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Headers only.
    ListOnly,
    /// Headers and entry data.
    Extract,
}

/// Destination for a pending entry's decoded bytes.
pub enum EntrySink<'a> {
    /// Decode and drop the data (or skip decoding entirely where the format
    /// allows it).
    Discard,
    /// Append all decoded bytes to the given buffer.
    Memory(&'a mut Vec<u8>),
    /// Deliver decoded bytes in bounded chunks, in stream order.
    ///
    /// `deliver` runs synchronously between reads, so a slow consumer blocks
    /// further decoding. Each chunk is at most `buffer_size` bytes; only the
    /// final chunk may be shorter.
    Chunked {
        /// Upper bound on each delivered chunk, in bytes.
        buffer_size: usize,
        /// Receives each chunk; an error aborts decoding and propagates.
        deliver: &'a mut dyn FnMut(&[u8]) -> Result<(), EngineError>,
    },
}

impl fmt::Debug for EntrySink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discard => f.write_str("Discard"),
            Self::Memory(buf) => f.debug_tuple("Memory").field(&buf.len()).finish(),
            Self::Chunked { buffer_size, .. } => f
                .debug_struct("Chunked")
                .field("buffer_size", buffer_size)
                .finish_non_exhaustive(),
        }
    }
}

/// A decoding engine for one container format.
///
/// Implementations are stateless factories; all per-archive state lives in
/// the handle. The bundled implementation is [`ZipEngine`](zip::ZipEngine).
pub trait Engine: fmt::Debug {
    /// Opens the archive at `path` and returns a fresh handle.
    ///
    /// Every full traversal requires its own open; handles are not rewindable.
    fn open(
        &self,
        path: &Path,
        password: Option<&str>,
        mode: OpenMode,
    ) -> Result<Box<dyn EngineHandle>, EngineError>;
}

/// An exclusively-owned open archive handle.
///
/// The handle cannot be copied; dropping it without [`close`](Self::close)
/// leaks nothing but loses the close status.
pub trait EngineHandle {
    /// Reads the next entry header, making that entry pending.
    ///
    /// Returns `Ok(None)` at end of archive. An empty archive yields `None`
    /// on the first call.
    fn read_header(&mut self) -> Result<Option<EntryMetadata>, EngineError>;

    /// Consumes the pending entry, routing its decoded bytes into `sink`.
    ///
    /// Fails if no entry is pending.
    fn process(&mut self, sink: EntrySink<'_>) -> Result<(), EngineError>;

    /// Releases the handle, reporting any close failure.
    fn close(self: Box<Self>) -> Result<(), EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(EngineStatus::EndOfArchive.code(), 10);
        assert_eq!(EngineStatus::BadData.code(), 12);
        assert_eq!(EngineStatus::SmallBuffer.code(), 20);
        assert_eq!(EngineStatus::MissingPassword.code(), 22);
    }

    #[test]
    fn engine_error_display_uses_detail() {
        let err = EngineError::new(EngineStatus::Open, "cannot open archive");
        assert_eq!(err.to_string(), "cannot open archive");
        assert_eq!(err.status(), EngineStatus::Open);
    }

    #[test]
    fn entry_sink_debug_is_terse() {
        let mut buf = Vec::new();
        let sink = EntrySink::Memory(&mut buf);
        assert_eq!(format!("{sink:?}"), "Memory(0)");
        assert_eq!(format!("{:?}", EntrySink::Discard), "Discard");
    }
}
