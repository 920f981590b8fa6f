use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use super::Stage;
use crate::error::PipelineError;
use crate::session::Session;

pub const SELECTION_FILE: &str = "selection.png";

/// Saves shots and the selection as PNG files.
///
/// Failures are logged and skipped; a missing debug image never fails the
/// request.
pub struct StoreStage {
    directory: PathBuf,
}

impl StoreStage {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn write(&self, image: &RgbImage, name: &str) -> Option<PathBuf> {
        let path = self.directory.join(name);
        match image.save_with_format(&path, ImageFormat::Png) {
            Ok(()) => {
                log::debug!("stored {}", path.display());
                Some(path)
            }
            Err(err) => {
                log::warn!("failed to store {}: {err}", path.display());
                None
            }
        }
    }
}

pub fn shot_file_name(monitor: usize) -> String {
    format!("shot-{monitor}.png")
}

impl Stage for StoreStage {
    fn name(&self) -> &'static str {
        "store"
    }

    fn handle(&self, mut session: Session) -> Result<Session, PipelineError> {
        if let Err(err) = fs::create_dir_all(&self.directory) {
            log::warn!(
                "cannot create store directory {}: {err}",
                self.directory.display()
            );
            return Ok(session);
        }

        let mut written = Vec::new();
        for shot in session.shots() {
            if let Some(path) = self.write(&shot.image, &shot_file_name(shot.monitor)) {
                written.push(path);
            }
        }
        if let Some(image) = session.image() {
            if let Some(path) = self.write(image, SELECTION_FILE) {
                written.push(path);
            }
        }
        for path in &written {
            session.push_stored(path);
        }
        Ok(session)
    }
}
