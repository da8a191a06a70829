//! Password-aware archive session and extraction library.
//!
//! `unarch-core` models one interaction with an archive file as an
//! [`ArchiveSession`]: the session owns the file location and the configured
//! password, and every operation (listing, extraction, password probing) runs
//! a full open/iterate/close cycle against a pluggable decoding engine.
//!
//! Three extraction modes are provided:
//!
//! - bulk-to-disk ([`ArchiveSession::extract_to_dir`])
//! - single-entry-to-memory ([`ArchiveSession::extract_data`])
//! - streamed through a bounded buffer ([`ArchiveSession::extract_buffered`])
//!
//! The actual container-format parsing lives behind the [`Engine`] trait; the
//! bundled [`ZipEngine`] adapts the `zip` crate, including ZipCrypto and AES
//! password handling. Every engine failure is mapped at the boundary into the
//! closed [`ArchiveError`] taxonomy, so callers never see raw status codes.
//!
//! # Examples
//!
//! ```no_run
//! use unarch_core::ArchiveSession;
//!
//! # fn main() -> unarch_core::Result<()> {
//! let mut session = ArchiveSession::with_password("backup.zip", "hunter2");
//! for entry in session.list_entries()? {
//!     println!("{} ({} bytes)", entry.path, entry.size);
//! }
//! session.extract_to_dir("/tmp/restore", false)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod session;
pub mod test_utils;
pub mod types;

mod catalog;
mod extract;
mod password;

// Re-export main API types
pub use engine::Engine;
pub use engine::EngineError;
pub use engine::EngineHandle;
pub use engine::EngineStatus;
pub use engine::EntrySink;
pub use engine::OpenMode;
pub use engine::zip::ZipEngine;
pub use error::ArchiveError;
pub use error::Result;
pub use session::ArchiveSession;
pub use session::OpenSession;
pub use types::EntryMetadata;
pub use types::Visit;
