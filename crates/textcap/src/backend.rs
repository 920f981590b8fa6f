use std::str::FromStr;
use std::sync::Arc;

use textcap_capture::{Backend, CaptureError, Configuration, DynScreenGrabber};
use textcap_ocr::OcrEngine;

use crate::settings::{CaptureSettings, OcrSettings};

/// Capture configuration from the environment, overridden by settings.
pub fn capture_configuration(settings: &CaptureSettings) -> Result<Configuration, CaptureError> {
    let mut config = Configuration::from_env()?;
    if let Some(name) = settings.backend.as_deref() {
        config.backend = parse_backend(name)?;
    }

    let available = Configuration::available_backends();
    if !available.contains(&config.backend) {
        return Err(CaptureError::unsupported(config.backend.as_str()));
    }
    Ok(config)
}

pub fn create_grabber(settings: &CaptureSettings) -> Result<DynScreenGrabber, CaptureError> {
    let config = capture_configuration(settings)?;
    let grabber = config.create_grabber()?;
    log::info!("using capture backend '{}'", grabber.name());
    Ok(grabber)
}

pub fn parse_backend(value: &str) -> Result<Backend, CaptureError> {
    Backend::from_str(value.trim())
}

#[cfg(feature = "engine-tesseract")]
pub fn create_engine(settings: &OcrSettings) -> Arc<dyn OcrEngine> {
    Arc::new(
        textcap_ocr::TesseractOcrEngine::new(&settings.tesseract).with_enhance(settings.enhance()),
    )
}

#[cfg(not(feature = "engine-tesseract"))]
pub fn create_engine(_settings: &OcrSettings) -> Arc<dyn OcrEngine> {
    log::warn!("built without an OCR engine, recognition returns no text");
    Arc::new(textcap_ocr::NoopOcrEngine)
}

/// One line per physical monitor, in capture order.
pub fn describe_monitors(grabber: &DynScreenGrabber) -> Result<Vec<String>, CaptureError> {
    let monitors = grabber.physical_monitors()?;
    Ok(monitors
        .iter()
        .enumerate()
        .map(|(slot, monitor)| {
            let position = monitor.position;
            format!(
                "{slot}: {} {}x{} at {},{}{}",
                monitor.name,
                position.width,
                position.height,
                position.left,
                position.top,
                if monitor.primary { " (primary)" } else { "" }
            )
        })
        .collect())
}

pub fn display_available_backends() -> String {
    let names: Vec<&'static str> = Configuration::available_backends()
        .iter()
        .map(Backend::as_str)
        .collect();
    if names.is_empty() {
        "available backends: (none compiled)".to_string()
    } else {
        format!("available backends: {}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcap_capture::MockGrabber;

    #[test]
    fn settings_override_backend() {
        let settings = CaptureSettings {
            backend: Some("mock".to_string()),
        };
        let config = capture_configuration(&settings).unwrap();
        assert_eq!(config.backend, Backend::Mock);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let settings = CaptureSettings {
            backend: Some("gdi".to_string()),
        };
        assert!(matches!(
            capture_configuration(&settings),
            Err(CaptureError::Configuration { .. })
        ));
    }

    #[test]
    fn monitors_are_listed_in_capture_order() {
        let grabber: DynScreenGrabber = Arc::new(MockGrabber::dual());
        assert_eq!(
            describe_monitors(&grabber).unwrap(),
            vec!["0: mock-0 640x360 at 0,0 (primary)", "1: mock-1 320x200 at 640,0"]
        );
    }

    #[test]
    fn mock_backend_is_always_available() {
        assert!(display_available_backends().contains("mock"));
    }
}
