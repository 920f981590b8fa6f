use image::imageops;

use super::Stage;
use crate::error::PipelineError;
use crate::session::Session;

/// Cuts the selected region out of its monitor's shot.
#[derive(Debug, Default)]
pub struct CropStage;

impl Stage for CropStage {
    fn name(&self) -> &'static str {
        "crop"
    }

    fn handle(&self, mut session: Session) -> Result<Session, PipelineError> {
        let Some(region) = session.region().copied() else {
            return Ok(session);
        };
        let shot = session
            .shots()
            .iter()
            .find(|shot| shot.monitor == region.monitor)
            .ok_or_else(|| {
                PipelineError::invalid_region(format!("no shot for monitor {}", region.monitor))
            })?;
        let (width, height) = shot.image.dimensions();
        let clamped = region.clamp_to(width, height).ok_or_else(|| {
            PipelineError::invalid_region(format!(
                "{},{},{},{} lies outside the {width}x{height} shot of monitor {}",
                region.left, region.top, region.right, region.bottom, region.monitor
            ))
        })?;
        if clamped != region {
            log::warn!(
                "region clamped to {},{},{},{}",
                clamped.left,
                clamped.top,
                clamped.right,
                clamped.bottom
            );
        }
        let cropped = imageops::crop_imm(
            &shot.image,
            clamped.left,
            clamped.top,
            clamped.width(),
            clamped.height(),
        )
        .to_image();
        session.set_image(cropped)?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;
    use crate::session::Mode;
    use textcap_types::{Region, ScreenPosition, Shot};

    fn session_with(region: Region) -> Session {
        let mut image = RgbImage::from_pixel(100, 50, Rgb([255, 255, 255]));
        image.put_pixel(10, 5, Rgb([1, 2, 3]));
        let shot = Shot::new(0, image, ScreenPosition::new(0, 0, 100, 50));
        Session::from_shots(Mode::Parse, vec![shot]).with_region(region)
    }

    #[test]
    fn crops_the_selected_rectangle() {
        let session = CropStage.handle(session_with(Region::new(0, 10, 5, 30, 25))).unwrap();
        let image = session.image().unwrap();
        assert_eq!(image.dimensions(), (20, 20));
        assert_eq!(*image.get_pixel(0, 0), Rgb([1, 2, 3]));
    }

    #[test]
    fn clamps_to_shot_bounds() {
        let session = CropStage
            .handle(session_with(Region::new(0, 90, 40, 200, 200)))
            .unwrap();
        assert_eq!(session.image().unwrap().dimensions(), (10, 10));
    }

    #[test]
    fn rejects_unknown_monitor_and_empty_rectangles() {
        let err = CropStage
            .handle(session_with(Region::new(3, 0, 0, 10, 10)))
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRegion { .. }));

        let err = CropStage
            .handle(session_with(Region::new(0, 150, 0, 160, 10)))
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRegion { .. }));
    }

    #[test]
    fn without_region_nothing_changes() {
        let shot = Shot::new(0, RgbImage::new(4, 4), ScreenPosition::default());
        let session = CropStage
            .handle(Session::from_shots(Mode::Parse, vec![shot]))
            .unwrap();
        assert!(session.image().is_none());
    }
}
