//! CLI end-to-end tests
//!
//! Tests for the mediaflip command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the mediaflip binary
#[allow(deprecated)]
fn mediaflip_cmd() -> Command {
    Command::cargo_bin("mediaflip").unwrap()
}

/// Get a command for the mediaflip binary that can be fed stdin
#[allow(deprecated)]
fn mediaflip_stdin_cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("mediaflip").unwrap()
}

/// True when ffmpeg and ffprobe are installed and ffmpeg has the encoders
/// both conversions use.
fn ffmpeg_with_encoders() -> bool {
    if which::which("ffmpeg").is_err() || which::which("ffprobe").is_err() {
        return false;
    }
    let Ok(output) = Command::new("ffmpeg").args(["-hide_banner", "-encoders"]).output() else {
        return false;
    };
    let encoders = String::from_utf8_lossy(&output.stdout);
    ["libx264", "libmp3lame", "aac"]
        .iter()
        .all(|e| encoders.contains(e))
}

/// Generate a small input with ffmpeg's synthetic sources.
fn generate(dir: &Path, name: &str, args: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let status = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y"])
        .args(args)
        .arg(&path)
        .status()
        .expect("failed to run ffmpeg");
    assert!(status.success(), "failed to generate {name}");
    path
}

/// Container duration in seconds and the codec type of every stream.
fn stream_info(path: &Path) -> (f64, Vec<String>) {
    let output = Command::new("ffprobe")
        .args(["-v", "error", "-show_entries", "format=duration:stream=codec_type"])
        .args(["-of", "json"])
        .arg(path)
        .output()
        .expect("failed to run ffprobe");
    assert!(output.status.success(), "ffprobe failed on {:?}", path);

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let duration = info["format"]["duration"]
        .as_str()
        .and_then(|d| d.parse().ok())
        .expect("no duration");
    let types = info["streams"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["codec_type"].as_str().unwrap().to_string())
        .collect();
    (duration, types)
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = mediaflip_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = mediaflip_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mediaflip"))
        .stdout(predicate::str::contains("to-video"))
        .stdout(predicate::str::contains("to-audio"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = mediaflip_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mediaflip"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = mediaflip_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = mediaflip_cmd();
    cmd.arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffmpeg"))
        .stdout(predicate::str::contains("ffprobe"));
}

#[test]
fn test_cli_check_tools_json() {
    let output = mediaflip_cmd()
        .args(["check-tools", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let tools: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = tools
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ffmpeg", "ffprobe"]);
}

#[test]
fn test_cli_validate_valid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("mediaflip.toml");
    fs::write(
        &config_path,
        "[tools]\ntimeout_secs = 30\n\n[output]\ndir = \"out\"\n",
    )
    .unwrap();

    let mut cmd = mediaflip_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"))
        .stdout(predicate::str::contains("Timeout: 30s"));
}

#[test]
fn test_cli_validate_reports_warnings() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("mediaflip.toml");
    fs::write(&config_path, "[tools]\nffmpeg_path = \"/nonexistent/ffmpeg\"\n").unwrap();

    let mut cmd = mediaflip_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("warning"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("bad.toml");
    fs::write(&config_path, "[tools\ntimeout_secs = ").unwrap();

    let mut cmd = mediaflip_cmd();
    cmd.arg("validate").arg(&config_path).assert().failure();
}

#[test]
fn test_cli_validate_missing_config() {
    let mut cmd = mediaflip_cmd();
    cmd.args(["validate", "/nonexistent/mediaflip.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_cli_to_video_missing_audio() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("cover.jpg");
    fs::write(&image, b"jpg").unwrap();

    let mut cmd = mediaflip_cmd();
    cmd.arg("to-video")
        .arg(dir.path().join("missing.mp3"))
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_to_video_requires_image() {
    let mut cmd = mediaflip_cmd();
    cmd.args(["to-video", "song.mp3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IMAGE"));
}

#[test]
fn test_cli_to_audio_missing_video() {
    let mut cmd = mediaflip_cmd();
    cmd.args(["to-audio", "/nonexistent/clip.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_to_audio_garbage_input_fails() {
    if which::which("ffmpeg").is_err() {
        eprintln!("Skipping: ffmpeg not installed");
        return;
    }
    let dir = tempdir().unwrap();
    let video = dir.path().join("clip.mp4");
    fs::write(&video, b"definitely not a video").unwrap();

    let mut cmd = mediaflip_cmd();
    cmd.arg("to-audio")
        .arg(&video)
        .arg("--out")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Conversion failed"));
    assert!(!dir.path().join("extracted_audio.mp3").exists());
}

#[test]
fn test_cli_shell_renders_mode_toggle() {
    let mut cmd = mediaflip_stdin_cmd();
    cmd.arg("shell")
        .write_stdin("status\ntoggle\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: Audio -> Video"))
        .stdout(predicate::str::contains("Mode: Video -> Audio"));
}

#[test]
fn test_cli_shell_alerts_on_missing_input() {
    let mut cmd = mediaflip_stdin_cmd();
    // The first press loads the engine (or fails to when ffmpeg is absent);
    // the second hits the empty slots.
    cmd.arg("shell")
        .write_stdin("convert\nconvert\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Please select both audio and image files")
                .or(predicate::str::contains("Failed to load FFmpeg")),
        );
}

#[test]
fn test_cli_full_round_trip() {
    if !ffmpeg_with_encoders() {
        eprintln!("Skipping: ffmpeg with libx264/libmp3lame/aac not installed");
        return;
    }
    let dir = tempdir().unwrap();
    let audio = generate(
        dir.path(),
        "tone.mp3",
        &["-f", "lavfi", "-i", "sine=frequency=440:duration=1"],
    );
    let image = generate(
        dir.path(),
        "cover.jpg",
        &["-f", "lavfi", "-i", "color=c=blue:s=64x64", "-frames:v", "1"],
    );
    let out = dir.path().join("out");

    let output = mediaflip_cmd()
        .arg("to-video")
        .arg(&audio)
        .arg(&image)
        .arg("--out")
        .arg(&out)
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "to-video failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["mode"], "audio-to-video");
    assert_eq!(report["mime"], "video/mp4");
    assert_eq!(report["file_name"], "converted_video.mp4");
    let video = out.join("converted_video.mp4");
    assert!(fs::metadata(&video).unwrap().len() > 0);

    // One still-image video track cut to the 1 s tone, plus its audio.
    let (duration, mut streams) = stream_info(&video);
    streams.sort();
    assert_eq!(streams, vec!["audio", "video"]);
    assert!(
        (duration - 1.0).abs() < 0.3,
        "video lasts {duration}s, expected about 1s"
    );

    let mut cmd = mediaflip_cmd();
    cmd.arg("to-audio")
        .arg(&video)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("extracted_audio.mp3"))
        .stdout(predicate::str::contains("audio/mp3"));
    let audio_out = out.join("extracted_audio.mp3");
    assert!(fs::metadata(&audio_out).unwrap().len() > 0);

    let (duration, streams) = stream_info(&audio_out);
    assert_eq!(streams, vec!["audio"], "extracted file has non-audio streams");
    assert!(
        (duration - 1.0).abs() < 0.3,
        "audio lasts {duration}s, expected about 1s"
    );
}
