//! Lazy, load-once engine initialization.
//!
//! The lifecycle moves **Unloaded → Loading → Ready**. A failed load goes
//! back to Unloaded, so the next trigger starts over with a fresh engine.

use std::sync::Arc;

use mf_av::{Engine, EngineFactory, LogSink};
use serde::Serialize;

use crate::view::StatusMessage;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Readiness of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    #[default]
    Unloaded,
    Loading,
    Ready,
}

/// Owns the engine handle and its readiness.
pub struct EngineLifecycle {
    factory: Arc<dyn EngineFactory>,
    state: EngineState,
    engine: Option<Arc<dyn Engine>>,
}

impl EngineLifecycle {
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            factory,
            state: EngineState::Unloaded,
            engine: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == EngineState::Ready
    }

    /// The loaded engine, if ready.
    pub fn engine(&self) -> Option<Arc<dyn Engine>> {
        if self.is_ready() {
            self.engine.clone()
        } else {
            None
        }
    }

    /// Load the engine unless it is already ready.
    ///
    /// `report` is called on every state transition with the message to
    /// surface. Load errors are logged and swallowed; the return value says
    /// whether the engine ended up ready.
    pub async fn ensure_loaded<F>(&mut self, mut report: F) -> bool
    where
        F: FnMut(EngineState, StatusMessage) + Send,
    {
        if self.is_ready() {
            return true;
        }

        let name = self.factory.engine_name().to_string();
        self.state = EngineState::Loading;
        report(
            EngineState::Loading,
            StatusMessage::Loading {
                engine: name.clone(),
                size_mb: self.factory.download_size().map(to_mb),
            },
        );

        let mut engine = self.factory.create();
        engine.attach_log_sink(LogSink::tracing());

        match engine.load().await {
            Ok(()) => {
                tracing::info!("{name} engine loaded");
                self.engine = Some(Arc::from(engine));
                self.state = EngineState::Ready;
                report(EngineState::Ready, StatusMessage::Loaded { engine: name });
                true
            }
            Err(e) => {
                tracing::error!("Failed to load {name}: {e}");
                self.engine = None;
                self.state = EngineState::Unloaded;
                report(EngineState::Unloaded, StatusMessage::LoadFailed { engine: name });
                false
            }
        }
    }
}

impl std::fmt::Debug for EngineLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineLifecycle")
            .field("engine", &self.factory.engine_name())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Round a byte count to whole megabytes, never below 1.
fn to_mb(bytes: u64) -> u64 {
    ((bytes as f64 / BYTES_PER_MB).round() as u64).max(1)
}
