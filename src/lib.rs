//! Mediaflip - audio + still image to video, and video to audio
//!
//! This library crate exposes the binary's helpers for integration testing.

pub mod config;
pub mod render;
