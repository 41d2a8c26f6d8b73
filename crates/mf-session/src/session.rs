//! The session controller.
//!
//! [`Session`] is the only owner of mutable state: the mode, the slots, the
//! drop zones, the engine lifecycle and the current result. Front-ends call
//! its operations and render the [`View`] snapshots it publishes.
//!
//! Convert and load are mutually exclusive: while one is in flight a second
//! trigger fails with [`Error::Busy`] and changes nothing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mf_av::{EngineFactory, Recipe};
use mf_core::{DropTarget, Error, Mode, OutputKind, Result};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;

use crate::acquire::{DropZone, FileSource, ZoneEvent, ZoneOutcome};
use crate::blob::{Blob, BlobStore, ObjectUrl};
use crate::lifecycle::{EngineLifecycle, EngineState};
use crate::orchestrator;
use crate::slots::Slots;
use crate::view::{OutputRegion, StatusMessage, View, ZoneView};

/// A successful conversion, bound to a transient URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    pub url: ObjectUrl,
    pub kind: OutputKind,
    pub mime: &'static str,
    /// Suggested filename for the download action.
    pub file_name: &'static str,
    pub size: usize,
}

/// What a convert trigger did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertOutcome {
    /// The engine was not ready; this trigger only loaded it. Trigger again
    /// once `ready` is true.
    EngineLoading { ready: bool },
    Converted(ConversionResult),
    /// The pipeline failed; `detail` is for logs, not for the user.
    Failed { detail: String },
    /// The mode changed while converting, so the result was dropped.
    Discarded,
}

#[derive(Debug)]
struct State {
    mode: Mode,
    slots: Slots,
    primary: DropZone,
    image: DropZone,
    engine: EngineState,
    output: OutputRegion,
    result: Option<ConversionResult>,
    blobs: BlobStore,
    alert: Option<String>,
    busy: bool,
    /// Bumped on every mode change; stale conversions are dropped.
    generation: u64,
}

impl State {
    fn new() -> Self {
        Self {
            mode: Mode::default(),
            slots: Slots::default(),
            primary: DropZone::new(DropTarget::Primary),
            image: DropZone::new(DropTarget::Image),
            engine: EngineState::Unloaded,
            output: OutputRegion::default(),
            result: None,
            blobs: BlobStore::default(),
            alert: None,
            busy: false,
            generation: 0,
        }
    }

    fn zone_mut(&mut self, target: DropTarget) -> &mut DropZone {
        match target {
            DropTarget::Primary => &mut self.primary,
            DropTarget::Image => &mut self.image,
        }
    }

    /// Drop the current result and revoke its URL.
    fn release_result(&mut self) {
        if let Some(result) = self.result.take() {
            self.blobs.revoke(&result.url);
        }
    }

    fn snapshot(&self) -> View {
        View {
            mode: self.mode,
            labels: self.mode.labels(),
            image_slot_visible: self.mode.uses_image(),
            primary_accept: self.mode.primary_accept(),
            primary_zone: zone_view(&self.primary),
            image_zone: zone_view(&self.image),
            engine: self.engine,
            output: self.output.clone(),
            download_visible: self.result.is_some(),
            alert: self.alert.clone(),
            busy: self.busy,
        }
    }
}

fn zone_view(zone: &DropZone) -> ZoneView {
    ZoneView {
        label: zone.label().to_string(),
        dragover: zone.is_dragover(),
    }
}

/// Clears the busy flag when an operation ends, however it ends.
struct InFlight<'a> {
    session: &'a Session,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.session.update(|s| s.busy = false);
    }
}

/// One user's conversion session.
pub struct Session {
    state: Mutex<State>,
    lifecycle: tokio::sync::Mutex<EngineLifecycle>,
    view_tx: watch::Sender<View>,
}

impl Session {
    /// Create a session in audio-to-video mode with an unloaded engine.
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        let state = State::new();
        let (view_tx, _) = watch::channel(state.snapshot());
        Self {
            state: Mutex::new(state),
            lifecycle: tokio::sync::Mutex::new(EngineLifecycle::new(factory)),
            view_tx,
        }
    }

    /// Receive a fresh [`View`] after every change.
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.view_tx.subscribe()
    }

    /// The current snapshot.
    pub fn view(&self) -> View {
        self.state.lock().snapshot()
    }

    pub fn mode(&self) -> Mode {
        self.state.lock().mode
    }

    pub fn engine_state(&self) -> EngineState {
        self.state.lock().engine
    }

    /// The current result, if a conversion has succeeded.
    pub fn result(&self) -> Option<ConversionResult> {
        self.state.lock().result.clone()
    }

    /// Resolve a transient URL to its bytes, for preview players.
    pub fn blob(&self, url: &ObjectUrl) -> Option<Blob> {
        self.state.lock().blobs.get(url).cloned()
    }

    fn update<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.lock();
        let out = f(&mut state);
        self.view_tx.send_replace(state.snapshot());
        out
    }

    fn begin(&self) -> Result<InFlight<'_>> {
        self.update(|s| {
            if s.busy {
                return Err(Error::Busy);
            }
            s.busy = true;
            Ok(())
        })?;
        Ok(InFlight { session: self })
    }

    // -----------------------------------------------------------------------
    // Mode
    // -----------------------------------------------------------------------

    /// Flip the mode and reset the surface: labels, image slot visibility,
    /// accept filter, held files, zone labels, output and download.
    pub fn toggle_mode(&self) {
        self.update(|s| {
            s.mode = s.mode.toggled();
            s.generation += 1;
            s.slots.clear();
            s.primary.reset();
            s.image.reset();
            s.release_result();
            s.output = OutputRegion::default();
            s.alert = None;
            tracing::debug!("Mode switched to {}", s.mode);
        });
    }

    /// Switch to `mode`, toggling only if it differs.
    pub fn set_mode(&self, mode: Mode) {
        if self.mode() != mode {
            self.toggle_mode();
        }
    }

    // -----------------------------------------------------------------------
    // File acquisition
    // -----------------------------------------------------------------------

    /// Feed one surface event to a drop zone.
    ///
    /// A selected file is stored in the slot the current mode assigns to the
    /// zone. Events on the image zone are ignored while it is hidden.
    pub fn handle_zone_event(&self, target: DropTarget, event: ZoneEvent) -> ZoneOutcome {
        self.update(|s| {
            if target == DropTarget::Image && !s.mode.uses_image() {
                return ZoneOutcome::Ignored;
            }

            let outcome = s.zone_mut(target).handle(event);
            if let ZoneOutcome::Selected(ref file) = outcome {
                let mode = s.mode;
                if let Some(kind) = s.slots.store(mode, target, file.clone()) {
                    tracing::info!("Selected {} as {kind} ({} bytes)", file.name(), file.len());
                    s.zone_mut(target).show_selected(file.name());
                }
            }
            outcome
        })
    }

    /// Drop the files from `source` onto `target`.
    pub async fn drop_from<S>(&self, target: DropTarget, source: &mut S) -> Result<ZoneOutcome>
    where
        S: FileSource + ?Sized,
    {
        let files = source.files().await?;
        Ok(self.handle_zone_event(target, ZoneEvent::Drop(files)))
    }

    /// Select the files from `source` through the picker paired with `target`.
    pub async fn pick_from<S>(&self, target: DropTarget, source: &mut S) -> Result<ZoneOutcome>
    where
        S: FileSource + ?Sized,
    {
        let files = source.files().await?;
        Ok(self.handle_zone_event(target, ZoneEvent::PickerChanged(files)))
    }

    /// Clear the last alert.
    pub fn dismiss_alert(&self) {
        self.update(|s| s.alert = None);
    }

    // -----------------------------------------------------------------------
    // Engine
    // -----------------------------------------------------------------------

    /// Load the engine if needed. Returns whether it is ready.
    ///
    /// # Errors
    ///
    /// [`Error::Busy`] if a convert or load is already in flight.
    pub async fn ensure_loaded(&self) -> Result<bool> {
        let _guard = self.begin()?;
        Ok(self.load_engine().await)
    }

    async fn load_engine(&self) -> bool {
        let mut lifecycle = self.lifecycle.lock().await;
        lifecycle
            .ensure_loaded(|engine, message| {
                self.update(|s| {
                    s.engine = engine;
                    s.output = OutputRegion::message(message);
                })
            })
            .await
    }

    // -----------------------------------------------------------------------
    // Conversion
    // -----------------------------------------------------------------------

    /// The convert action.
    ///
    /// With an unloaded engine this only starts loading and returns
    /// [`ConvertOutcome::EngineLoading`]. Otherwise it checks the inputs of
    /// the current mode, runs the pipeline and publishes either a player
    /// bound to the new result or the generic failure message.
    ///
    /// # Errors
    ///
    /// [`Error::Busy`] if another operation is in flight,
    /// [`Error::MissingInput`] if the mode's slots are not filled (the alert
    /// is also set on the view).
    pub async fn convert(&self) -> Result<ConvertOutcome> {
        let _guard = self.begin()?;

        let engine = self.lifecycle.lock().await.engine();
        let Some(engine) = engine else {
            let ready = self.load_engine().await;
            return Ok(ConvertOutcome::EngineLoading { ready });
        };

        let (recipe, slots, generation) = self.update(|s| {
            if let Some(missing) = s.slots.missing_for(s.mode) {
                s.alert = Some(missing.to_string());
                return Err(Error::MissingInput(missing.to_string()));
            }
            s.alert = None;
            s.release_result();
            s.output = OutputRegion::message(StatusMessage::Converting);
            Ok((Recipe::for_mode(s.mode), s.slots.clone(), s.generation))
        })?;

        tracing::info!("Starting {} conversion", recipe.mode);
        let outcome = orchestrator::run(engine.as_ref(), &recipe, &slots).await;

        self.update(|s| {
            if s.generation != generation {
                tracing::info!("Mode changed during conversion; dropping the result");
                return Ok(ConvertOutcome::Discarded);
            }

            match outcome {
                Ok(bytes) => {
                    let size = bytes.len();
                    let url = s.blobs.create_object_url(Blob {
                        bytes,
                        mime: recipe.mime,
                    });
                    let result = ConversionResult {
                        url: url.clone(),
                        kind: recipe.output_kind,
                        mime: recipe.mime,
                        file_name: recipe.download_name,
                        size,
                    };
                    s.output = OutputRegion::Player {
                        kind: recipe.output_kind,
                        url,
                        mime: recipe.mime,
                    };
                    s.result = Some(result.clone());
                    tracing::info!("Conversion finished: {} ({size} bytes)", result.file_name);
                    Ok(ConvertOutcome::Converted(result))
                }
                Err(e) => {
                    tracing::error!("Conversion failed: {e}");
                    s.output = OutputRegion::message(StatusMessage::ConversionFailed);
                    Ok(ConvertOutcome::Failed {
                        detail: e.to_string(),
                    })
                }
            }
        })
    }

    /// The download action: save the current result into `dir` under its
    /// suggested filename and return the written path.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when there is nothing to download.
    pub async fn download(&self, dir: &Path) -> Result<PathBuf> {
        let (file_name, bytes) = {
            let state = self.state.lock();
            let result = state
                .result
                .as_ref()
                .ok_or_else(|| Error::Validation("no converted file to download".into()))?;
            let blob = state
                .blobs
                .get(&result.url)
                .ok_or_else(|| Error::not_found("object url", &result.url))?;
            (result.file_name, blob.bytes.clone())
        };

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!("Saved {}", path.display());
        Ok(path)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode())
            .field("engine", &self.engine_state())
            .finish_non_exhaustive()
    }
}
