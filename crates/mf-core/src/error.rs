//! Unified error type for mediaflip.
//!
//! All library crates funnel their failures into [`Error`]. The binary wraps
//! it in `anyhow` at the edges.

/// Unified error type covering all failure modes in mediaflip.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A conversion was triggered without the inputs the mode requires.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Another convert or load operation is still in flight.
    #[error("Busy: another operation is in progress")]
    Busy,

    /// The engine has not finished loading.
    #[error("Engine not ready")]
    EngineNotReady,

    /// The engine failed to initialize.
    #[error("Engine load failed: {0}")]
    EngineLoad(String),

    /// A file was looked up in the engine's virtual filesystem but is absent.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "file", "object url").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An external tool (ffmpeg, ffprobe) returned an error.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// A conversion pipeline step failed.
    #[error("Pipeline error [{step}]: {message}")]
    Pipeline {
        /// The pipeline step that failed.
        step: String,
        /// Human-readable error description.
        message: String,
    },

    /// Input data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Pipeline`].
    pub fn pipeline(step: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Pipeline {
            step: step.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
