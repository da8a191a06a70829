//! The three extraction strategies.
//!
//! All three share the same skeleton: open an extraction handle, iterate
//! headers, act on each entry, close. Any engine failure aborts the whole
//! operation; the handle is closed before the error reaches the caller.
//! Bulk extraction is not transactional: a failure partway through leaves a
//! partially-populated destination, so callers needing atomicity should
//! extract to a temporary location and rename on success.

use std::fs;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use crate::engine::EngineError;
use crate::engine::EngineStatus;
use crate::engine::EntrySink;
use crate::engine::OpenMode;
use crate::error::ArchiveError;
use crate::error::Result;
use crate::session::ArchiveSession;
use crate::types::Visit;

/// Fixed buffer for streaming entries to disk; bounds peak memory per entry.
const DISK_COPY_BUFFER: usize = 64 * 1024;

impl ArchiveSession {
    /// Extracts every entry beneath `dest`, recreating the archive's tree.
    ///
    /// Directory markers become directories; files are streamed to
    /// `dest/relative_path` through a bounded buffer. When a target file
    /// already exists and `overwrite` is `false`, the whole operation aborts
    /// with a [`ArchiveError::Create`] error on the first conflict — nothing
    /// is skipped, and the pre-existing file is left untouched.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::Create`] for directory-creation failures and
    /// destination conflicts, [`ArchiveError::Write`] for write failures,
    /// plus any engine error from decoding.
    pub fn extract_to_dir<P: AsRef<Path>>(&mut self, dest: P, overwrite: bool) -> Result<()> {
        let dest = dest.as_ref();
        let mut open = self.open(OpenMode::Extract)?;
        open.for_each_header(|open, meta| {
            let target = dest.join(&meta.path);
            if meta.is_directory {
                fs::create_dir_all(&target).map_err(|e| {
                    ArchiveError::Create(format!(
                        "cannot create directory {}: {e}",
                        target.display()
                    ))
                })?;
                open.skip()?;
                return Ok(Visit::Continue);
            }
            if !overwrite && target.exists() {
                return Err(ArchiveError::Create(format!(
                    "destination already exists: {}",
                    target.display()
                )));
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    ArchiveError::Create(format!(
                        "cannot create directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
            let mut file = File::create(&target).map_err(|e| {
                ArchiveError::Create(format!("cannot create file {}: {e}", target.display()))
            })?;
            let mut deliver = |chunk: &[u8]| -> std::result::Result<(), EngineError> {
                file.write_all(chunk).map_err(|e| {
                    EngineError::new(
                        EngineStatus::Write,
                        format!("cannot write {}: {e}", target.display()),
                    )
                })
            };
            open.process(EntrySink::Chunked {
                buffer_size: DISK_COPY_BUFFER,
                deliver: &mut deliver,
            })?;
            Ok(Visit::Continue)
        })?;
        open.close()
    }

    /// Decodes the entry at `entry_path` (exact match) fully into memory.
    ///
    /// Scans headers in archive order, decodes the first matching file
    /// entry, and closes the handle before returning the bytes.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::EntryNotFound`] when the scan reaches end of archive
    /// without a match, plus any engine error from decoding.
    pub fn extract_data(&mut self, entry_path: &str) -> Result<Vec<u8>> {
        let mut open = self.open(OpenMode::Extract)?;
        let mut found = None;
        open.for_each_header(|open, meta| {
            if meta.path == entry_path && !meta.is_directory {
                let mut data = Vec::new();
                open.process(EntrySink::Memory(&mut data))?;
                found = Some(data);
                Ok(Visit::Stop)
            } else {
                open.skip()?;
                Ok(Visit::Continue)
            }
        })?;
        open.close()?;
        found.ok_or_else(|| ArchiveError::EntryNotFound {
            name: entry_path.to_string(),
        })
    }

    /// Streams the entry at `entry_path` through `action` in bounded chunks.
    ///
    /// Peak memory is O(`buffer_size`) regardless of entry size, which is
    /// the reason this exists next to [`extract_data`](Self::extract_data).
    /// Chunks arrive in stream order, each at most `buffer_size` bytes with
    /// only the final chunk shorter. `action` runs synchronously between
    /// reads, so a slow handler blocks further decoding — backpressure by
    /// construction.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::EntryNotFound`] when no entry matches, plus any
    /// engine error from decoding.
    pub fn extract_buffered<F>(
        &mut self,
        entry_path: &str,
        buffer_size: usize,
        mut action: F,
    ) -> Result<()>
    where
        F: FnMut(&[u8]),
    {
        // A zero-sized buffer would never make progress.
        let buffer_size = buffer_size.max(1);
        let mut open = self.open(OpenMode::Extract)?;
        let mut found = false;
        open.for_each_header(|open, meta| {
            if meta.path == entry_path && !meta.is_directory {
                let mut deliver = |chunk: &[u8]| -> std::result::Result<(), EngineError> {
                    action(chunk);
                    Ok(())
                };
                open.process(EntrySink::Chunked {
                    buffer_size,
                    deliver: &mut deliver,
                })?;
                found = true;
                Ok(Visit::Stop)
            } else {
                open.skip()?;
                Ok(Visit::Continue)
            }
        })?;
        open.close()?;
        if found {
            Ok(())
        } else {
            Err(ArchiveError::EntryNotFound {
                name: entry_path.to_string(),
            })
        }
    }
}
