//! Per-mode holders for the user's files.

use mf_core::{DropTarget, Mode, SelectedFile, SlotKind};

/// The audio, image and video slots.
///
/// Only the slots of the current mode are ever populated: [`Slots::store`]
/// routes by mode and the session clears everything on a mode change.
#[derive(Debug, Clone, Default)]
pub struct Slots {
    audio: Option<SelectedFile>,
    image: Option<SelectedFile>,
    video: Option<SelectedFile>,
}

impl Slots {
    /// Store a file dropped on `target` under `mode`.
    ///
    /// Returns the slot that received it, or `None` when the target takes
    /// no part in the mode (the image zone in video-to-audio).
    pub fn store(&mut self, mode: Mode, target: DropTarget, file: SelectedFile) -> Option<SlotKind> {
        let kind = match target {
            DropTarget::Primary => mode.primary_kind(),
            DropTarget::Image if mode.uses_image() => SlotKind::Image,
            DropTarget::Image => return None,
        };
        *self.slot_mut(kind) = Some(file);
        Some(kind)
    }

    pub fn get(&self, kind: SlotKind) -> Option<&SelectedFile> {
        match kind {
            SlotKind::Audio => self.audio.as_ref(),
            SlotKind::Image => self.image.as_ref(),
            SlotKind::Video => self.video.as_ref(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.image.is_none() && self.video.is_none()
    }

    /// The alert to show when `mode` cannot start because a slot is empty.
    pub fn missing_for(&self, mode: Mode) -> Option<&'static str> {
        match mode {
            Mode::AudioToVideo if self.audio.is_none() || self.image.is_none() => {
                Some("Please select both audio and image files")
            }
            Mode::VideoToAudio if self.video.is_none() => Some("Please select a video file"),
            _ => None,
        }
    }

    fn slot_mut(&mut self, kind: SlotKind) -> &mut Option<SelectedFile> {
        match kind {
            SlotKind::Audio => &mut self.audio,
            SlotKind::Image => &mut self.image,
            SlotKind::Video => &mut self.video,
        }
    }
}
