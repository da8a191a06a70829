//! Entry listing and whole-archive traversal.

use crate::engine::EntrySink;
use crate::engine::OpenMode;
use crate::error::Result;
use crate::session::ArchiveSession;
use crate::types::EntryMetadata;
use crate::types::Visit;

impl ArchiveSession {
    /// Lists every entry in archive order.
    ///
    /// Opens a fresh listing handle, reads headers to end of archive, and
    /// closes before returning. The order reflects on-disk entry order. An
    /// empty archive yields an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be opened or a header cannot
    /// be read; the handle is still closed on the failure path.
    pub fn list_entries(&mut self) -> Result<Vec<EntryMetadata>> {
        let mut open = self.open(OpenMode::ListOnly)?;
        let mut entries = Vec::new();
        open.for_each_header(|open, meta| {
            open.skip()?;
            entries.push(meta);
            Ok(Visit::Continue)
        })?;
        open.close()?;
        Ok(entries)
    }

    /// Decodes every file entry into memory and hands it to `visitor`.
    ///
    /// Directory markers are skipped. Returning [`Visit::Stop`] ends the
    /// traversal early without error. A decode failure aborts the whole
    /// operation; entries already delivered are not rolled back, so visitor
    /// side effects are the caller's responsibility.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use unarch_core::ArchiveSession;
    /// use unarch_core::Visit;
    ///
    /// # fn main() -> unarch_core::Result<()> {
    /// let mut session = ArchiveSession::new("bundle.zip");
    /// session.for_each_entry(|entry, data| {
    ///     println!("{}: {} bytes", entry.path, data.len());
    ///     Visit::Continue
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn for_each_entry<F>(&mut self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&EntryMetadata, Vec<u8>) -> Visit,
    {
        let mut open = self.open(OpenMode::Extract)?;
        open.for_each_header(|open, meta| {
            if meta.is_directory {
                open.skip()?;
                return Ok(Visit::Continue);
            }
            let mut data = Vec::new();
            open.process(EntrySink::Memory(&mut data))?;
            Ok(visitor(&meta, data))
        })?;
        open.close()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::session::ArchiveSession;
    use crate::test_utils::ZipFixture;
    use crate::types::Visit;
    use tempfile::TempDir;

    #[test]
    fn test_list_preserves_archive_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ordered.zip");
        std::fs::write(
            &path,
            ZipFixture::new()
                .add_file("zebra.txt", b"z")
                .add_file("alpha.txt", b"a")
                .add_file("mid/way.txt", b"m")
                .build(),
        )
        .unwrap();

        let mut session = ArchiveSession::new(&path);
        let names: Vec<String> = session
            .list_entries()
            .unwrap()
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert_eq!(names, ["zebra.txt", "alpha.txt", "mid/way.txt"]);
    }

    #[test]
    fn test_list_empty_archive() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.zip");
        std::fs::write(&path, ZipFixture::new().build()).unwrap();

        let mut session = ArchiveSession::new(&path);
        assert!(session.list_entries().unwrap().is_empty());
    }

    #[test]
    fn test_for_each_skips_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mixed.zip");
        std::fs::write(
            &path,
            ZipFixture::new()
                .add_directory("docs/")
                .add_file("docs/readme.md", b"# hi")
                .build(),
        )
        .unwrap();

        let mut session = ArchiveSession::new(&path);
        let mut seen = Vec::new();
        session
            .for_each_entry(|entry, data| {
                seen.push((entry.path.clone(), data));
                Visit::Continue
            })
            .unwrap();
        assert_eq!(seen, vec![("docs/readme.md".to_string(), b"# hi".to_vec())]);
    }
}
