use image::{DynamicImage, Rgb, RgbImage};

use super::Stage;
use crate::error::PipelineError;
use crate::session::Session;
use textcap_capture::{DynScreenGrabber, MonitorInfo};
use textcap_types::Shot;

pub const PLACEHOLDER_WIDTH: u32 = 60;
pub const PLACEHOLDER_HEIGHT: u32 = 30;
const PLACEHOLDER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Takes one screenshot per physical monitor.
pub struct CaptureStage {
    grabber: DynScreenGrabber,
}

impl CaptureStage {
    pub fn new(grabber: DynScreenGrabber) -> Self {
        Self { grabber }
    }

    fn grab(&self, monitor: &MonitorInfo) -> RgbImage {
        match self.grabber.grab(monitor) {
            Ok(frame) => DynamicImage::ImageRgba8(frame).to_rgb8(),
            Err(err) => {
                log::error!(
                    "screenshot of monitor {} ({}) failed: {err}",
                    monitor.index,
                    monitor.name
                );
                placeholder()
            }
        }
    }
}

/// Image standing in for a monitor whose grab failed.
pub fn placeholder() -> RgbImage {
    RgbImage::from_pixel(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, PLACEHOLDER_COLOR)
}

impl Stage for CaptureStage {
    fn name(&self) -> &'static str {
        "capture"
    }

    fn handle(&self, mut session: Session) -> Result<Session, PipelineError> {
        if session.test_mode() {
            log::info!(
                "test mode, keeping {} pre-seeded shot(s)",
                session.shots().len()
            );
            return Ok(session);
        }

        let monitors = self.grabber.physical_monitors()?;
        log::debug!(
            "{} reported {} physical monitor(s)",
            self.grabber.name(),
            monitors.len()
        );
        for (slot, monitor) in monitors.iter().enumerate() {
            let image = self.grab(monitor);
            session.push_shot(Shot::new(slot, image, monitor.position));
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::Mode;
    use textcap_capture::MockGrabber;

    #[test]
    fn one_shot_per_physical_monitor() {
        let stage = CaptureStage::new(Arc::new(MockGrabber::dual()));
        let session = stage.handle(Session::new(Mode::Parse)).unwrap();
        let sizes: Vec<_> = session.shots().iter().map(|s| s.image.dimensions()).collect();
        assert_eq!(sizes, vec![(640, 360), (320, 200)]);
        assert_eq!(session.shots()[1].monitor, 1);
        assert_eq!(session.shots()[1].position.left, 640);
    }

    #[test]
    fn failed_monitor_becomes_placeholder() {
        let stage = CaptureStage::new(Arc::new(MockGrabber::dual().with_failure(0)));
        let session = stage.handle(Session::new(Mode::Parse)).unwrap();
        assert_eq!(session.shots().len(), 2);

        let failed = &session.shots()[0].image;
        assert_eq!(failed.dimensions(), (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT));
        assert!(failed.pixels().all(|pixel| *pixel == PLACEHOLDER_COLOR));
        assert_eq!(session.shots()[1].image.dimensions(), (320, 200));
    }

    #[test]
    fn enumeration_failure_aborts() {
        let stage = CaptureStage::new(Arc::new(MockGrabber::new()));
        let err = stage.handle(Session::new(Mode::Parse)).unwrap_err();
        assert!(matches!(err, PipelineError::Capture(_)));
    }

    #[test]
    fn test_mode_keeps_seeded_shots() {
        let shot = Shot::new(0, placeholder(), Default::default());
        let stage = CaptureStage::new(Arc::new(MockGrabber::dual()));
        let session = stage
            .handle(Session::from_shots(Mode::Parse, vec![shot]))
            .unwrap();
        assert_eq!(session.shots().len(), 1);
    }
}
