//! Media-domain types: the conversion mode, drop targets and selected files.
//!
//! Enums serialize in kebab-case and implement `Display` manually so the CLI,
//! the logs and JSON output agree on one spelling.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Direction of the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Audio plus a still image becomes a video.
    #[default]
    AudioToVideo,
    /// The audio stream of a video is extracted.
    VideoToAudio,
}

impl Mode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::AudioToVideo => Self::VideoToAudio,
            Self::VideoToAudio => Self::AudioToVideo,
        }
    }

    /// Text shown on the input/output headings and the direction switch.
    pub fn labels(self) -> ModeLabels {
        match self {
            Self::AudioToVideo => ModeLabels {
                input: "Audio File",
                output: "Video Output",
                left: "Audio",
                right: "Video",
            },
            Self::VideoToAudio => ModeLabels {
                input: "Video File",
                output: "Audio Output",
                left: "Video",
                right: "Audio",
            },
        }
    }

    /// Accepted-file-type filter for the primary picker.
    pub fn primary_accept(self) -> &'static str {
        match self {
            Self::AudioToVideo => "audio/*",
            Self::VideoToAudio => "video/*",
        }
    }

    /// Whether the image slot takes part in this mode.
    pub fn uses_image(self) -> bool {
        matches!(self, Self::AudioToVideo)
    }

    /// Kind of the file the primary slot holds in this mode.
    pub fn primary_kind(self) -> SlotKind {
        match self {
            Self::AudioToVideo => SlotKind::Audio,
            Self::VideoToAudio => SlotKind::Video,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AudioToVideo => write!(f, "audio-to-video"),
            Self::VideoToAudio => write!(f, "video-to-audio"),
        }
    }
}

/// Labels that change with the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeLabels {
    pub input: &'static str,
    pub output: &'static str,
    pub left: &'static str,
    pub right: &'static str,
}

// ---------------------------------------------------------------------------
// Slots and drop targets
// ---------------------------------------------------------------------------

/// The two drop zones on the surface.
///
/// `Primary` holds audio in [`Mode::AudioToVideo`] and video in
/// [`Mode::VideoToAudio`]; `Image` is only shown in audio-to-video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropTarget {
    Primary,
    Image,
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Image => write!(f, "image"),
        }
    }
}

impl std::str::FromStr for DropTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" | "audio" | "video" => Ok(Self::Primary),
            "image" => Ok(Self::Image),
            other => Err(format!("unknown drop target: {other}")),
        }
    }
}

/// Named holders for one selected file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Audio,
    Image,
    Video,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Kind of media a conversion produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Video,
    Audio,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

// ---------------------------------------------------------------------------
// SelectedFile
// ---------------------------------------------------------------------------

/// A file handed over by the user: a name and its raw bytes.
///
/// The bytes are never inspected; wrong-type files pass through unchanged and
/// are only rejected (if at all) by the engine.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, naming it after the final path component.
    pub async fn read(path: &Path) -> crate::Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => crate::Error::not_found("file", path.display()),
            _ => crate::Error::from(e),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
