//! Shared test harness for session integration tests.
//!
//! Provides [`FakeFactory`], an [`EngineFactory`] whose engines keep their
//! virtual filesystem in memory, record every call and can be told to fail
//! at load or at any pipeline step. Optional [`Notify`] gates hold `load` or
//! `exec` open so tests can act while an operation is in flight.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use mf_av::{Engine, EngineFactory, LogSink};
use mf_core::{DropTarget, Error, Result, SelectedFile};
use mf_session::{MemorySource, Session};
use parking_lot::Mutex;
use tokio::sync::Notify;

/// Bytes every successful fake `exec` writes to the output file.
pub const ENCODED: &[u8] = b"fake encoded media";

/// Shared, inspectable state behind every engine a factory creates.
#[derive(Default)]
pub struct FakeState {
    pub calls: Mutex<Vec<String>>,
    pub files: Mutex<HashMap<String, Bytes>>,
    pub load_failures: AtomicUsize,
    pub fail_on: Mutex<Option<String>>,
    pub empty_output: Mutex<bool>,
    pub gate: Mutex<Option<Arc<Notify>>>,
    pub exec_started: Notify,
    pub load_gate: Mutex<Option<Arc<Notify>>>,
    pub load_started: Notify,
}

impl FakeState {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn step(&self, call: String, step: &str) -> Result<()> {
        self.calls.lock().push(call);
        if self.fail_on.lock().as_deref() == Some(step) {
            return Err(Error::tool("fake", format!("{step} failed")));
        }
        Ok(())
    }
}

pub struct FakeFactory {
    pub state: Arc<FakeState>,
    pub created: AtomicUsize,
}

impl FakeFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(FakeState::default()),
            created: AtomicUsize::new(0),
        })
    }

    /// Fail the next `n` loads.
    pub fn failing_loads(n: usize) -> Arc<Self> {
        let factory = Self::new();
        factory.state.load_failures.store(n, Ordering::SeqCst);
        factory
    }

    /// Fail the step named `step`: a staged file name, `exec` or `read`.
    pub fn fail_on(&self, step: &str) {
        *self.state.fail_on.lock() = Some(step.to_string());
    }

    /// Make `load` wait for the returned gate before finishing.
    pub fn hold_load(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.state.load_gate.lock() = Some(gate.clone());
        gate
    }

    /// Make `exec` wait for `gate` before finishing.
    pub fn hold_exec(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.state.gate.lock() = Some(gate.clone());
        gate
    }
}

impl EngineFactory for FakeFactory {
    fn engine_name(&self) -> &str {
        "FFmpeg"
    }

    fn download_size(&self) -> Option<u64> {
        Some(31 * 1024 * 1024)
    }

    fn create(&self) -> Box<dyn Engine> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Box::new(FakeEngine {
            state: self.state.clone(),
        })
    }
}

pub struct FakeEngine {
    state: Arc<FakeState>,
}

#[async_trait]
impl Engine for FakeEngine {
    fn name(&self) -> &str {
        "FFmpeg"
    }

    fn attach_log_sink(&mut self, _sink: LogSink) {}

    async fn load(&mut self) -> Result<()> {
        self.state.calls.lock().push("load".into());
        self.state.load_started.notify_one();
        let gate = self.state.load_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let failing = self
            .state
            .load_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(Error::EngineLoad("core fetch failed".into()));
        }
        Ok(())
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> Result<()> {
        self.state.step(format!("write {name}"), name)?;
        self.state
            .files
            .lock()
            .insert(name.to_string(), Bytes::copy_from_slice(data));
        Ok(())
    }

    async fn exec(&self, argv: &[String]) -> Result<()> {
        self.state.exec_started.notify_one();
        let gate = self.state.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.state.step(format!("exec {}", argv.join(" ")), "exec")?;
        let output = argv.last().cloned().unwrap_or_default();
        let bytes = if *self.state.empty_output.lock() {
            Bytes::new()
        } else {
            Bytes::from_static(ENCODED)
        };
        self.state.files.lock().insert(output, bytes);
        Ok(())
    }

    async fn read_file(&self, name: &str) -> Result<Bytes> {
        self.state.step(format!("read {name}"), "read")?;
        self.state
            .files
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found("file", name))
    }

    async fn delete_file(&self, name: &str) -> Result<()> {
        self.state.files.lock().remove(name);
        Ok(())
    }
}

pub fn file(name: &str) -> SelectedFile {
    SelectedFile::new(name, format!("contents of {name}").into_bytes())
}

/// Drop one in-memory file on `target`.
pub async fn drop_file(session: &Session, target: DropTarget, name: &str) {
    let mut source = MemorySource::new([file(name)]);
    session
        .drop_from(target, &mut source)
        .await
        .expect("memory source never fails");
}

/// A session whose engine has already been loaded.
pub async fn loaded_session(factory: &Arc<FakeFactory>) -> Session {
    let session = Session::new(factory.clone());
    assert!(session.ensure_loaded().await.unwrap());
    session
}
