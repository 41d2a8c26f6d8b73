use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediaflip")]
#[command(author, version, about = "Audio + image to video, and video to audio, with ffmpeg")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Combine an audio file and a still image into a video
    ToVideo {
        /// Audio track
        #[arg(required = true)]
        audio: PathBuf,

        /// Image shown for the whole track
        #[arg(required = true)]
        image: PathBuf,

        /// Directory to save the video in (defaults to output.dir)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract the audio track of a video as MP3
    ToAudio {
        /// Video file
        #[arg(required = true)]
        video: PathBuf,

        /// Directory to save the audio in (defaults to output.dir)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the interactive converter
    Shell,

    /// Check that required external tools are available
    CheckTools {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
