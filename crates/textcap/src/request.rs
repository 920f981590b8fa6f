use std::io;
use std::path::{Path, PathBuf};

use crate::cli::RegionArg;
use crate::error::PipelineError;
use crate::session::{Mode, Session};
use textcap_types::{Region, ScreenPosition, Shot};

/// What a single invocation asks for.
#[derive(Debug, Clone, Default)]
pub struct CaptureRequest {
    pub mode: Mode,
    pub monitor: usize,
    pub region: Option<RegionArg>,
    /// Image files standing in for live screenshots.
    pub images: Vec<PathBuf>,
}

impl CaptureRequest {
    pub fn into_session(self) -> Result<Session, PipelineError> {
        let session = if self.images.is_empty() {
            Session::new(self.mode)
        } else {
            let shots = self
                .images
                .iter()
                .enumerate()
                .map(|(monitor, path)| load_shot(monitor, path))
                .collect::<Result<Vec<_>, _>>()?;
            Session::from_shots(self.mode, shots)
        };
        Ok(match self.region {
            Some(bounds) => session.with_region(Region::new(
                self.monitor,
                bounds.left,
                bounds.top,
                bounds.right,
                bounds.bottom,
            )),
            None => session,
        })
    }
}

fn load_shot(monitor: usize, path: &Path) -> Result<Shot, PipelineError> {
    let image = image::open(path)
        .map_err(|err| match err {
            image::ImageError::IoError(source) => source,
            other => io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: {other}", path.display()),
            ),
        })?
        .to_rgb8();
    let position = ScreenPosition::new(0, 0, image.width(), image.height());
    log::debug!(
        "loaded {} as monitor {monitor} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(Shot::new(monitor, image, position))
}
