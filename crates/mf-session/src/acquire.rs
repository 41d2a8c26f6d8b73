//! File acquisition: drop zones and the sources that feed them.
//!
//! A [`DropZone`] turns raw surface events (click, drag over/leave, drop,
//! picker change) into at most one [`ZoneOutcome`]. It never validates file
//! type or size; whatever the user hands over is passed on.

use std::path::PathBuf;

use async_trait::async_trait;
use mf_core::{DropTarget, SelectedFile};

/// A raw event on a drop zone or its paired picker.
#[derive(Debug, Clone)]
pub enum ZoneEvent {
    /// The zone was clicked.
    Click,
    /// A drag is hovering over the zone.
    DragOver,
    /// The drag left the zone without dropping.
    DragLeave,
    /// Files were dropped on the zone.
    Drop(Vec<SelectedFile>),
    /// The paired picker reported a selection.
    PickerChanged(Vec<SelectedFile>),
}

/// What the zone asks of its owner after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneOutcome {
    /// Nothing to do.
    Ignored,
    /// Open the paired file picker.
    OpenPicker,
    /// The user handed over this file.
    Selected(SelectedFile),
}

/// One drop target plus its paired picker.
#[derive(Debug, Clone)]
pub struct DropZone {
    target: DropTarget,
    label: String,
    dragover: bool,
}

impl DropZone {
    pub fn new(target: DropTarget) -> Self {
        Self {
            target,
            label: Self::prompt(target).to_string(),
            dragover: false,
        }
    }

    /// Label shown while the zone holds no file.
    pub fn prompt(target: DropTarget) -> &'static str {
        match target {
            DropTarget::Primary => "Drag & drop a file here or click to select",
            DropTarget::Image => "Drag & drop an image here or click to select",
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether a drag is currently over the zone.
    pub fn is_dragover(&self) -> bool {
        self.dragover
    }

    /// Apply one event.
    ///
    /// Only the first of several dropped or picked files is accepted; an
    /// empty drop is a no-op.
    pub fn handle(&mut self, event: ZoneEvent) -> ZoneOutcome {
        match event {
            ZoneEvent::Click => ZoneOutcome::OpenPicker,
            ZoneEvent::DragOver => {
                self.dragover = true;
                ZoneOutcome::Ignored
            }
            ZoneEvent::DragLeave => {
                self.dragover = false;
                ZoneOutcome::Ignored
            }
            ZoneEvent::Drop(files) => {
                self.dragover = false;
                first_of(files)
            }
            ZoneEvent::PickerChanged(files) => first_of(files),
        }
    }

    /// Reflect an accepted file in the label.
    pub fn show_selected(&mut self, name: &str) {
        self.label = format!("Selected: {name}");
    }

    /// Back to the empty prompt with no drag mark.
    pub fn reset(&mut self) {
        self.label = Self::prompt(self.target).to_string();
        self.dragover = false;
    }
}

fn first_of(files: Vec<SelectedFile>) -> ZoneOutcome {
    match files.into_iter().next() {
        Some(file) => ZoneOutcome::Selected(file),
        None => ZoneOutcome::Ignored,
    }
}

/// Something that hands over the files for a drop or a picker selection.
#[async_trait]
pub trait FileSource: Send {
    /// The files the user handed over, in order.
    async fn files(&mut self) -> mf_core::Result<Vec<SelectedFile>>;
}

/// Files read from disk paths.
#[derive(Debug, Clone, Default)]
pub struct PathSource {
    paths: Vec<PathBuf>,
}

impl PathSource {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl FileSource for PathSource {
    async fn files(&mut self) -> mf_core::Result<Vec<SelectedFile>> {
        let mut files = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            files.push(SelectedFile::read(path).await?);
        }
        Ok(files)
    }
}

/// Files already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: Vec<SelectedFile>,
}

impl MemorySource {
    pub fn new(files: impl IntoIterator<Item = SelectedFile>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }
}

#[async_trait]
impl FileSource for MemorySource {
    async fn files(&mut self) -> mf_core::Result<Vec<SelectedFile>> {
        Ok(std::mem::take(&mut self.files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> SelectedFile {
        SelectedFile::new(name, vec![0u8; 4])
    }

    #[test]
    fn click_requests_picker() {
        let mut zone = DropZone::new(DropTarget::Primary);
        assert_eq!(zone.handle(ZoneEvent::Click), ZoneOutcome::OpenPicker);
    }

    #[test]
    fn drag_marks_and_clears() {
        let mut zone = DropZone::new(DropTarget::Image);
        zone.handle(ZoneEvent::DragOver);
        assert!(zone.is_dragover());
        zone.handle(ZoneEvent::DragLeave);
        assert!(!zone.is_dragover());

        zone.handle(ZoneEvent::DragOver);
        zone.handle(ZoneEvent::Drop(vec![file("b.jpg")]));
        assert!(!zone.is_dragover());
    }

    #[test]
    fn empty_drop_is_noop() {
        let mut zone = DropZone::new(DropTarget::Primary);
        zone.handle(ZoneEvent::DragOver);
        assert_eq!(zone.handle(ZoneEvent::Drop(Vec::new())), ZoneOutcome::Ignored);
        assert!(!zone.is_dragover());
        assert_eq!(zone.handle(ZoneEvent::PickerChanged(Vec::new())), ZoneOutcome::Ignored);
    }

    #[test]
    fn only_first_file_accepted() {
        let mut zone = DropZone::new(DropTarget::Primary);
        let outcome = zone.handle(ZoneEvent::Drop(vec![file("a.mp3"), file("b.mp3"), file("c.mp3")]));
        assert_eq!(outcome, ZoneOutcome::Selected(file("a.mp3")));

        let outcome = zone.handle(ZoneEvent::PickerChanged(vec![file("x.wav"), file("y.wav")]));
        assert_eq!(outcome, ZoneOutcome::Selected(file("x.wav")));
    }

    #[test]
    fn label_shows_selection_and_resets() {
        let mut zone = DropZone::new(DropTarget::Primary);
        zone.show_selected("a.mp3");
        assert_eq!(zone.label(), "Selected: a.mp3");
        zone.reset();
        assert_eq!(zone.label(), DropZone::prompt(DropTarget::Primary));
    }

    #[tokio::test]
    async fn path_source_reads_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mp3");
        let b = dir.path().join("b.mp3");
        std::fs::write(&a, b"aa").unwrap();
        std::fs::write(&b, b"bbb").unwrap();

        let files = PathSource::new([&a, &b]).files().await.unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a.mp3", "b.mp3"]);
        assert_eq!(files[1].len(), 3);
    }

    #[tokio::test]
    async fn path_source_missing_file_errors() {
        let mut source = PathSource::new(["/nonexistent/clip.mp4"]);
        assert!(source.files().await.is_err());
    }

    #[tokio::test]
    async fn memory_source_hands_over_once() {
        let mut source = MemorySource::new([file("v.mp4")]);
        assert_eq!(source.files().await.unwrap().len(), 1);
        assert!(source.files().await.unwrap().is_empty());
    }
}
