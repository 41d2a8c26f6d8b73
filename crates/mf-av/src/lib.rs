//! # mf-av
//!
//! The transcoding engine boundary and its ffmpeg-backed implementation.
//!
//! This crate provides:
//!
//! - **Engine boundary** ([`Engine`], [`EngineFactory`], [`LogSink`]) --
//!   construct, attach a log sink, load, then write/exec/read against the
//!   engine's virtual filesystem.
//! - **FFmpeg engine** ([`FfmpegEngine`], [`FfmpegFactory`]) -- drives the
//!   `ffmpeg` executable inside a private temporary directory.
//! - **Tool discovery** ([`ToolRegistry`]) -- find ffmpeg/ffprobe via config
//!   overrides or `PATH`.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Virtual filesystem** ([`Workspace`]) -- flat-named files in a temp dir.
//! - **Recipes** ([`Recipe`]) -- the two conversion command lines.

pub mod command;
pub mod engine;
pub mod ffmpeg;
pub mod recipes;
pub mod tools;
pub mod workspace;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use engine::{Engine, EngineFactory, LogSink};
pub use ffmpeg::{FfmpegEngine, FfmpegFactory};
pub use recipes::{Recipe, StagedInput};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
pub use workspace::Workspace;
