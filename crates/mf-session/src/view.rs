//! Read-only presentation snapshots.
//!
//! A [`View`] is everything a front-end needs to draw the surface. The
//! session publishes a fresh one after every state change.

use std::fmt;

use mf_core::{Mode, ModeLabels, OutputKind};
use serde::Serialize;

use crate::blob::ObjectUrl;
use crate::lifecycle::EngineState;

/// Status text shown in the output region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusMessage {
    /// Nothing converted yet.
    Placeholder,
    /// The engine is loading; `size_mb` is the known download size.
    Loading { engine: String, size_mb: Option<u64> },
    Loaded { engine: String },
    LoadFailed { engine: String },
    Converting,
    ConversionFailed,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => write!(f, "Converted file will appear here"),
            Self::Loading {
                engine,
                size_mb: Some(mb),
            } => write!(f, "Loading {engine} (~{mb} MB)... This may take a moment."),
            Self::Loading {
                engine,
                size_mb: None,
            } => write!(f, "Loading {engine}... This may take a moment."),
            Self::Loaded { engine } => {
                write!(f, "{engine} loaded successfully! Ready to convert.")
            }
            Self::LoadFailed { engine } => {
                write!(f, "Failed to load {engine}. Please refresh and try again.")
            }
            Self::Converting => write!(f, "Converting..."),
            Self::ConversionFailed => write!(f, "Conversion failed. Please try again."),
        }
    }
}

/// Content of the output region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputRegion {
    Message { message: StatusMessage },
    /// An inline player bound to a transient URL.
    Player {
        kind: OutputKind,
        url: ObjectUrl,
        mime: &'static str,
    },
}

impl OutputRegion {
    pub fn message(message: StatusMessage) -> Self {
        Self::Message { message }
    }

    /// The status text, unless a player is shown.
    pub fn status(&self) -> Option<&StatusMessage> {
        match self {
            Self::Message { message } => Some(message),
            Self::Player { .. } => None,
        }
    }
}

impl Default for OutputRegion {
    fn default() -> Self {
        Self::message(StatusMessage::Placeholder)
    }
}

/// One drop zone as drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneView {
    pub label: String,
    pub dragover: bool,
}

/// Snapshot of the whole surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub mode: Mode,
    pub labels: ModeLabels,
    pub image_slot_visible: bool,
    /// Accepted-file-type filter of the primary picker.
    pub primary_accept: &'static str,
    pub primary_zone: ZoneView,
    pub image_zone: ZoneView,
    pub engine: EngineState,
    pub output: OutputRegion,
    pub download_visible: bool,
    /// Last blocking alert, until dismissed.
    pub alert: Option<String>,
    /// Whether a convert or load operation is in flight.
    pub busy: bool,
}
