//! The transcoding engine boundary.
//!
//! An [`Engine`] is constructed by an [`EngineFactory`], gets a [`LogSink`]
//! attached, is loaded once, and then serves any number of
//! write/exec/read cycles against its own virtual filesystem. Everything
//! behind this trait (decoding, encoding, container formats) is opaque to
//! the rest of mediaflip.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

/// Receiver for the engine's diagnostic log lines.
#[derive(Clone)]
pub struct LogSink {
    callback: Arc<dyn Fn(&str) + Send + Sync>,
}

impl LogSink {
    /// Create a new sink from the given callback.
    pub fn new(callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// A sink that discards every line.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// A sink forwarding lines to `tracing` at debug level.
    pub fn tracing() -> Self {
        Self::new(|line| tracing::debug!(target: "mf_av::engine", "{line}"))
    }

    /// Deliver one log line.
    pub fn send(&self, line: &str) {
        (self.callback)(line);
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::noop()
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink").finish_non_exhaustive()
    }
}

/// A transcoding engine with a private virtual filesystem.
///
/// File names are flat (`input.mp3`); `exec` receives the argument vector of
/// one transcode command that refers to those names.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Short name used in logs and messages (e.g. "FFmpeg").
    fn name(&self) -> &str;

    /// Attach the sink that receives diagnostic output. Called once, before
    /// [`Engine::load`].
    fn attach_log_sink(&mut self, sink: LogSink);

    /// Initialize the engine. Must succeed before any other async call.
    async fn load(&mut self) -> mf_core::Result<()>;

    /// Store `data` under `name`, replacing any previous file.
    async fn write_file(&self, name: &str, data: &[u8]) -> mf_core::Result<()>;

    /// Run one transcode command.
    async fn exec(&self, argv: &[String]) -> mf_core::Result<()>;

    /// Read back the file stored under `name`.
    async fn read_file(&self, name: &str) -> mf_core::Result<Bytes>;

    /// Remove the file stored under `name`; removing a missing file is fine.
    async fn delete_file(&self, name: &str) -> mf_core::Result<()>;
}

/// Constructs engine instances.
///
/// Every load attempt builds a fresh instance, so a failed attempt leaves
/// nothing behind.
pub trait EngineFactory: Send + Sync {
    /// Display name of the engines this factory builds.
    fn engine_name(&self) -> &str;

    /// Bytes that have to be brought in to load the engine, when known.
    fn download_size(&self) -> Option<u64>;

    /// Construct a new, unloaded engine.
    fn create(&self) -> Box<dyn Engine>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn log_sink_delivers_lines() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = seen.clone();
            LogSink::new(move |line| seen.lock().unwrap().push(line.to_string()))
        };
        let clone = sink.clone();
        sink.send("frame=  1");
        clone.send("video:12kB");
        assert_eq!(*seen.lock().unwrap(), vec!["frame=  1", "video:12kB"]);
    }

    #[test]
    fn noop_sink_is_silent() {
        LogSink::default().send("ignored");
        assert_eq!(format!("{:?}", LogSink::noop()), "LogSink { .. }");
    }
}
