//! Plain-text rendering of session views for the terminal front-end.

use std::fmt::Write as _;

use mf_core::Mode;
use mf_session::{ConversionResult, OutputRegion, View};
use serde::Serialize;

/// Render the whole surface as a few lines of text.
pub fn render_view(view: &View) -> String {
    let mut out = String::new();
    let labels = view.labels;

    let _ = writeln!(
        out,
        "Mode: {} -> {}   [{} | {}]",
        labels.left, labels.right, labels.left, labels.right
    );
    let _ = writeln!(out, "{}:", labels.input);
    let _ = writeln!(
        out,
        "  primary ({}): {}{}",
        view.primary_accept,
        view.primary_zone.label,
        dragover_marker(view.primary_zone.dragover)
    );
    if view.image_slot_visible {
        let _ = writeln!(
            out,
            "  image (image/*): {}{}",
            view.image_zone.label,
            dragover_marker(view.image_zone.dragover)
        );
    }

    let _ = writeln!(out, "{}:", labels.output);
    match &view.output {
        OutputRegion::Message { message } => {
            let _ = writeln!(out, "  {message}");
        }
        OutputRegion::Player { kind, url, mime } => {
            let _ = writeln!(out, "  [{kind} player] {url} ({mime})");
        }
    }
    if view.download_visible {
        let _ = writeln!(out, "  Download available (run `download`)");
    }
    if let Some(alert) = &view.alert {
        let _ = writeln!(out, "! {alert}");
    }

    out
}

fn dragover_marker(dragover: bool) -> &'static str {
    if dragover {
        "  <drop here>"
    } else {
        ""
    }
}

/// Machine-readable summary of a one-shot conversion.
#[derive(Debug, Serialize)]
pub struct ConversionReport<'a> {
    pub mode: Mode,
    pub path: &'a std::path::Path,
    #[serde(flatten)]
    pub result: &'a ConversionResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_session::{EngineState, StatusMessage, ZoneView};

    fn view(mode: Mode) -> View {
        View {
            mode,
            labels: mode.labels(),
            image_slot_visible: mode.uses_image(),
            primary_accept: mode.primary_accept(),
            primary_zone: ZoneView {
                label: "Selected: song.mp3".into(),
                dragover: false,
            },
            image_zone: ZoneView {
                label: "Drag & drop an image here or click to select".into(),
                dragover: true,
            },
            engine: EngineState::Unloaded,
            output: OutputRegion::default(),
            download_visible: false,
            alert: Some("Please select both audio and image files".into()),
            busy: false,
        }
    }

    #[test]
    fn renders_audio_to_video() {
        let text = render_view(&view(Mode::AudioToVideo));
        assert!(text.contains("Mode: Audio -> Video"));
        assert!(text.contains("Selected: song.mp3"));
        assert!(text.contains("image (image/*)"));
        assert!(text.contains("<drop here>"));
        assert!(text.contains(&StatusMessage::Placeholder.to_string()));
        assert!(text.contains("! Please select both audio and image files"));
    }

    #[test]
    fn hides_image_zone_in_video_to_audio() {
        let text = render_view(&view(Mode::VideoToAudio));
        assert!(text.contains("Mode: Video -> Audio"));
        assert!(!text.contains("image (image/*)"));
    }
}
