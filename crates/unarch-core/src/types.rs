//! Shared value types for archive traversal.

/// Metadata for one logical entry inside an archive.
///
/// Read from an entry header during a traversal; immutable afterwards and
/// never cached across traversals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Entry path relative to the archive root, exactly as stored.
    /// Directory entries keep their trailing separator.
    pub path: String,
    /// Whether the entry is a directory marker rather than a file.
    pub is_directory: bool,
    /// Uncompressed size in bytes. Zero for directories.
    pub size: u64,
}

/// Visitor verdict for entry traversal.
///
/// Returned by [`ArchiveSession::for_each_entry`] visitors to continue or end
/// iteration early. Stopping is caller-driven and not an error.
///
/// [`ArchiveSession::for_each_entry`]: crate::ArchiveSession::for_each_entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Keep iterating.
    Continue,
    /// End the traversal after this entry.
    Stop,
}
