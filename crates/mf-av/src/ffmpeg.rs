//! Engine backed by the `ffmpeg` executable.
//!
//! Loading resolves the binary (config override or `PATH`), checks that it
//! runs, and creates a private [`Workspace`] that serves as the virtual
//! filesystem. Each `exec` runs one ffmpeg process inside that workspace.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use mf_core::config::ToolsConfig;
use mf_core::Error;

use crate::engine::{Engine, EngineFactory, LogSink};
use crate::{ToolCommand, ToolRegistry, Workspace};

/// Flags prepended to every transcode command.
const BASE_ARGS: &[&str] = &["-hide_banner", "-nostdin", "-y"];

/// Builds [`FfmpegEngine`]s from the tools configuration.
#[derive(Debug, Clone)]
pub struct FfmpegFactory {
    tools: ToolsConfig,
}

impl FfmpegFactory {
    pub fn new(tools: ToolsConfig) -> Self {
        Self { tools }
    }
}

impl EngineFactory for FfmpegFactory {
    fn engine_name(&self) -> &str {
        "FFmpeg"
    }

    fn download_size(&self) -> Option<u64> {
        ToolRegistry::discover(&self.tools)
            .require("ffmpeg")
            .ok()
            .and_then(|tool| tool.size_bytes())
    }

    fn create(&self) -> Box<dyn Engine> {
        Box::new(FfmpegEngine::new(self.tools.clone()))
    }
}

/// An ffmpeg subprocess engine with a temp-dir virtual filesystem.
#[derive(Debug)]
pub struct FfmpegEngine {
    tools: ToolsConfig,
    loaded: Option<Loaded>,
    log: LogSink,
}

#[derive(Debug)]
struct Loaded {
    program: PathBuf,
    timeout: Duration,
    workspace: Workspace,
}

impl FfmpegEngine {
    pub fn new(tools: ToolsConfig) -> Self {
        Self {
            tools,
            loaded: None,
            log: LogSink::noop(),
        }
    }

    fn loaded(&self) -> mf_core::Result<&Loaded> {
        self.loaded.as_ref().ok_or(Error::EngineNotReady)
    }

    fn forward(&self, text: &str) {
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            self.log.send(line);
        }
    }
}

#[async_trait]
impl Engine for FfmpegEngine {
    fn name(&self) -> &str {
        "FFmpeg"
    }

    fn attach_log_sink(&mut self, sink: LogSink) {
        self.log = sink;
    }

    async fn load(&mut self) -> mf_core::Result<()> {
        if self.loaded.is_some() {
            return Ok(());
        }

        let registry = ToolRegistry::discover(&self.tools);
        let tool = registry
            .require("ffmpeg")
            .map_err(|e| Error::EngineLoad(e.to_string()))?;

        let output = ToolCommand::new(tool.path.clone())
            .arg("-hide_banner")
            .arg("-version")
            .timeout(tool.timeout)
            .execute()
            .await
            .map_err(|e| Error::EngineLoad(e.to_string()))?;
        self.forward(&output.stdout);

        let workspace = Workspace::new().map_err(|e| Error::EngineLoad(e.to_string()))?;
        tracing::debug!(
            "ffmpeg at {} using workspace {}",
            tool.path.display(),
            workspace.dir().display()
        );

        self.loaded = Some(Loaded {
            program: tool.path.clone(),
            timeout: tool.timeout,
            workspace,
        });
        Ok(())
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> mf_core::Result<()> {
        self.loaded()?.workspace.write(name, data).await
    }

    async fn exec(&self, argv: &[String]) -> mf_core::Result<()> {
        let loaded = self.loaded()?;

        let output = ToolCommand::new(loaded.program.clone())
            .args(BASE_ARGS.iter().copied())
            .args(argv.iter().cloned())
            .current_dir(loaded.workspace.dir())
            .timeout(loaded.timeout)
            .run()
            .await?;

        // ffmpeg reports progress and diagnostics on stderr.
        self.forward(&output.stderr);

        if !output.status.success() {
            let last = output
                .stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("no diagnostic output");
            return Err(Error::tool(
                "ffmpeg",
                format!("exited with status {}: {}", output.status, last.trim()),
            ));
        }
        Ok(())
    }

    async fn read_file(&self, name: &str) -> mf_core::Result<Bytes> {
        self.loaded()?.workspace.read(name).await
    }

    async fn delete_file(&self, name: &str) -> mf_core::Result<()> {
        self.loaded()?.workspace.remove(name).await
    }
}
