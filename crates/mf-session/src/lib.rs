//! Session state and conversion orchestration for mediaflip.
//!
//! The [`Session`] controller owns the mode, the two drop zones and their
//! slots, the lazily loaded engine and the current result. Front-ends feed
//! it events and render the [`View`] snapshots it publishes.

pub mod acquire;
pub mod blob;
pub mod lifecycle;
pub mod orchestrator;
pub mod session;
pub mod slots;
pub mod view;

pub use acquire::{DropZone, FileSource, MemorySource, PathSource, ZoneEvent, ZoneOutcome};
pub use blob::{Blob, BlobStore, ObjectUrl};
pub use lifecycle::{EngineLifecycle, EngineState};
pub use session::{ConversionResult, ConvertOutcome, Session};
pub use slots::Slots;
pub use view::{OutputRegion, StatusMessage, View, ZoneView};
