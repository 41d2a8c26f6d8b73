//! The two conversions mediaflip knows, as engine command recipes.
//!
//! A [`Recipe`] names the files to stage, the exact argument vector handed
//! to [`Engine::exec`](crate::Engine::exec), the file to read back, and how
//! the result is labelled for preview and download.

use mf_core::{Mode, OutputKind, SlotKind};

/// Audio bitrate used by both directions (constant bitrate).
pub const AUDIO_BITRATE: &str = "192k";

/// Virtual file names.
pub const AUDIO_INPUT: &str = "input.mp3";
pub const IMAGE_INPUT: &str = "input.jpg";
pub const VIDEO_INPUT: &str = "input.mp4";
pub const VIDEO_OUTPUT: &str = "output.mp4";
pub const AUDIO_OUTPUT: &str = "output.mp3";

/// A user file staged into the engine under a fixed name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagedInput {
    pub slot: SlotKind,
    pub name: &'static str,
}

/// Everything the orchestrator needs to run one conversion direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub mode: Mode,
    /// Files to stage, in staging order.
    pub inputs: Vec<StagedInput>,
    pub argv: Vec<String>,
    pub output: &'static str,
    pub output_kind: OutputKind,
    pub mime: &'static str,
    /// Suggested filename for the download action.
    pub download_name: &'static str,
}

impl Recipe {
    /// The recipe for `mode`.
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::AudioToVideo => Self::still_image_video(),
            Mode::VideoToAudio => Self::audio_extraction(),
        }
    }

    /// Loop a still image over the audio track: H.264 tuned for still
    /// images, AAC audio, 4:2:0 pixels, cut at the end of the audio.
    pub fn still_image_video() -> Self {
        #[rustfmt::skip]
        let argv = [
            "-loop", "1",
            "-i", IMAGE_INPUT,
            "-i", AUDIO_INPUT,
            "-c:v", "libx264",
            "-tune", "stillimage",
            "-c:a", "aac",
            "-b:a", AUDIO_BITRATE,
            "-pix_fmt", "yuv420p",
            "-shortest",
            VIDEO_OUTPUT,
        ];

        Self {
            mode: Mode::AudioToVideo,
            inputs: vec![
                StagedInput {
                    slot: SlotKind::Audio,
                    name: AUDIO_INPUT,
                },
                StagedInput {
                    slot: SlotKind::Image,
                    name: IMAGE_INPUT,
                },
            ],
            argv: argv.iter().map(|s| s.to_string()).collect(),
            output: VIDEO_OUTPUT,
            output_kind: OutputKind::Video,
            mime: "video/mp4",
            download_name: "converted_video.mp4",
        }
    }

    /// Drop the video stream and re-encode the audio as MP3.
    pub fn audio_extraction() -> Self {
        #[rustfmt::skip]
        let argv = [
            "-i", VIDEO_INPUT,
            "-vn",
            "-acodec", "mp3",
            "-ab", AUDIO_BITRATE,
            AUDIO_OUTPUT,
        ];

        Self {
            mode: Mode::VideoToAudio,
            inputs: vec![StagedInput {
                slot: SlotKind::Video,
                name: VIDEO_INPUT,
            }],
            argv: argv.iter().map(|s| s.to_string()).collect(),
            output: AUDIO_OUTPUT,
            output_kind: OutputKind::Audio,
            mime: "audio/mp3",
            download_name: "extracted_audio.mp3",
        }
    }

    /// Every virtual file this recipe touches.
    pub fn touched_files(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inputs
            .iter()
            .map(|i| i.name)
            .chain(std::iter::once(self.output))
    }
}
