//! The engine's private virtual filesystem.
//!
//! A [`Workspace`] owns a temporary directory for the lifetime of one engine.
//! Files are addressed by flat names (`input.mp3`, `output.mp4`); anything
//! that could escape the directory is rejected. The directory is removed when
//! the workspace is dropped.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use tempfile::TempDir;

/// Temporary directory addressed by flat file names.
///
/// # Example
///
/// ```no_run
/// use mf_av::Workspace;
///
/// # async fn example() -> mf_core::Result<()> {
/// let ws = Workspace::new()?;
/// ws.write("input.mp3", b"ID3...").await?;
/// let back = ws.read("input.mp3").await?;
/// assert_eq!(&back[..3], b"ID3");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    /// Create a fresh, empty workspace.
    pub fn new() -> mf_core::Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("mediaflip-")
            .tempdir()
            .map_err(|e| mf_core::Error::tool("workspace", format!("failed to create temp dir: {e}")))?;

        Ok(Self { temp_dir })
    }

    /// Path to the temporary directory.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Resolve a flat file name to its path inside the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`mf_core::Error::Validation`] for empty names, absolute paths,
    /// names with directory components, and `.`/`..`.
    pub fn path_of(&self, name: &str) -> mf_core::Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.temp_dir.path().join(name)),
            _ => Err(mf_core::Error::Validation(format!(
                "invalid virtual file name: {name:?}"
            ))),
        }
    }

    /// Write `data` under `name`, replacing any previous content.
    pub async fn write(&self, name: &str, data: &[u8]) -> mf_core::Result<()> {
        let path = self.path_of(name)?;
        tokio::fs::write(&path, data).await?;
        Ok(())
    }

    /// Read the file stored under `name`.
    pub async fn read(&self, name: &str) -> mf_core::Result<Bytes> {
        let path = self.path_of(name)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(mf_core::Error::not_found("file", name))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the file stored under `name`. Removing a missing file is not
    /// an error.
    pub async fn remove(&self, name: &str) -> mf_core::Result<()> {
        let path = self.path_of(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
