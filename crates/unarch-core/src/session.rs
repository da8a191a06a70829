//! Archive session lifecycle.
//!
//! An [`ArchiveSession`] is the durable half of the state machine: the file
//! location, the configured password, and the engine to decode with. The
//! transient half is [`OpenSession`], a guard over one exclusively-owned
//! engine handle. Opening mutably borrows the session, so a second open while
//! one handle is live is a compile error rather than a runtime fault; the
//! guard's destructor closes the handle on every exit path, including errors,
//! as a safety net behind the explicit [`OpenSession::close`].

use std::marker::PhantomData;
use std::path::Path;
use std::path::PathBuf;

use crate::engine::Engine;
use crate::engine::EngineHandle;
use crate::engine::EntrySink;
use crate::engine::OpenMode;
use crate::engine::zip::ZipEngine;
use crate::error::ArchiveError;
use crate::error::Result;
use crate::types::EntryMetadata;
use crate::types::Visit;

/// One open-or-closed interaction with a specific archive file.
///
/// The password is mutable between operations and takes effect on the next
/// open. Distinct sessions over the same file are independent; one session
/// has one logical owner at a time.
///
/// # Examples
///
/// ```no_run
/// use unarch_core::ArchiveSession;
///
/// # fn main() -> unarch_core::Result<()> {
/// let mut session = ArchiveSession::new("photos.zip");
/// let entries = session.list_entries()?;
/// let data = session.extract_data(&entries[0].path)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ArchiveSession {
    engine: Box<dyn Engine>,
    path: PathBuf,
    password: Option<String>,
}

impl ArchiveSession {
    /// Creates a session over the archive at `path`, decoded by the bundled
    /// [`ZipEngine`].
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_engine(path, Box::new(ZipEngine::new()))
    }

    /// Creates a session with a password configured up front.
    pub fn with_password<P: AsRef<Path>>(path: P, password: impl Into<String>) -> Self {
        let mut session = Self::new(path);
        session.password = Some(password.into());
        session
    }

    /// Creates a session decoded by a caller-provided engine.
    pub fn with_engine<P: AsRef<Path>>(path: P, engine: Box<dyn Engine>) -> Self {
        Self {
            engine,
            path: path.as_ref().to_path_buf(),
            password: None,
        }
    }

    /// The path of the archive file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The final component of the archive path, when valid UTF-8.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    /// The currently configured password.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Replaces the configured password. An already-open handle is
    /// unaffected; the new value applies from the next open.
    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    /// Opens the archive, yielding an exclusive handle guard.
    ///
    /// Fails with [`ArchiveError::ArchiveNotFound`] before consulting the
    /// engine when the path does not resolve to an existing file.
    pub fn open(&mut self, mode: OpenMode) -> Result<OpenSession<'_>> {
        let handle = self.open_handle(self.password.as_deref(), mode)?;
        Ok(OpenSession {
            handle: Some(handle),
            _session: PhantomData,
        })
    }

    /// Opens a throwaway handle without touching session state. Used by the
    /// password probes, which must not leave a handle behind or observe the
    /// configured password unless asked to.
    pub(crate) fn probe(&self, password: Option<&str>, mode: OpenMode) -> Result<OpenSession<'_>> {
        let handle = self.open_handle(password, mode)?;
        Ok(OpenSession {
            handle: Some(handle),
            _session: PhantomData,
        })
    }

    fn open_handle(
        &self,
        password: Option<&str>,
        mode: OpenMode,
    ) -> Result<Box<dyn EngineHandle>> {
        if !self.path.is_file() {
            return Err(ArchiveError::ArchiveNotFound {
                path: self.path.clone(),
            });
        }
        Ok(self.engine.open(&self.path, password, mode)?)
    }
}

/// Guard over one open engine handle, borrowed from its session.
///
/// Dropping the guard closes the handle best-effort; call
/// [`close`](Self::close) to observe the close status.
pub struct OpenSession<'s> {
    handle: Option<Box<dyn EngineHandle>>,
    _session: PhantomData<&'s ArchiveSession>,
}

impl OpenSession<'_> {
    /// Reads the next entry header; `Ok(None)` at end of archive.
    pub fn read_header(&mut self) -> Result<Option<EntryMetadata>> {
        Ok(self.engine_handle()?.read_header()?)
    }

    /// Routes the pending entry's decoded bytes into `sink`.
    pub fn process(&mut self, sink: EntrySink<'_>) -> Result<()> {
        Ok(self.engine_handle()?.process(sink)?)
    }

    /// Consumes the pending entry without keeping its data.
    pub fn skip(&mut self) -> Result<()> {
        self.process(EntrySink::Discard)
    }

    /// Closes the handle, reporting any close failure. Consumes the guard,
    /// so close-after-close cannot be expressed.
    pub fn close(mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => Ok(handle.close()?),
            None => Ok(()),
        }
    }

    /// Runs `action` for every remaining header until end of archive or an
    /// early stop. The shared iteration skeleton of listing, traversal, and
    /// all three extraction strategies.
    pub(crate) fn for_each_header<F>(&mut self, mut action: F) -> Result<()>
    where
        F: FnMut(&mut Self, EntryMetadata) -> Result<Visit>,
    {
        while let Some(meta) = self.read_header()? {
            if action(self, meta)? == Visit::Stop {
                break;
            }
        }
        Ok(())
    }

    fn engine_handle(&mut self) -> Result<&mut (dyn EngineHandle + 'static)> {
        // Unreachable while the guard is alive; close() consumes self.
        self.handle
            .as_deref_mut()
            .ok_or_else(|| ArchiveError::Close("engine handle already released".into()))
    }
}

impl Drop for OpenSession<'_> {
    fn drop(&mut self) {
        // Best-effort release; a close failure on an abandoned handle has
        // nowhere to be reported.
        if let Some(handle) = self.handle.take() {
            let _ = handle.close();
        }
    }
}
