use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::core::{CaptureError, CaptureResult, DynScreenGrabber};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Xcap,
    Mock,
}

impl FromStr for Backend {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xcap" => Ok(Backend::Xcap),
            "mock" => Ok(Backend::Mock),
            other => Err(CaptureError::configuration(format!(
                "unknown capture backend '{other}'"
            ))),
        }
    }
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Xcap => "xcap",
            Backend::Mock => "mock",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn compiled_backends() -> Vec<Backend> {
    let mut backends = Vec::new();
    #[cfg(feature = "backend-xcap")]
    {
        backends.push(Backend::Xcap);
    }
    backends.push(Backend::Mock);
    backends
}

#[derive(Debug, Clone)]
pub struct Configuration {
    pub backend: Backend,
}

impl Default for Configuration {
    fn default() -> Self {
        let backend = compiled_backends()
            .into_iter()
            .next()
            .unwrap_or(Backend::Mock);
        Self { backend }
    }
}

impl Configuration {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub fn from_env() -> CaptureResult<Self> {
        let mut config = Configuration::default();
        if let Ok(backend) = env::var("TEXTCAP_CAPTURE_BACKEND") {
            config.backend = Backend::from_str(&backend)?;
        }
        Ok(config)
    }

    pub fn available_backends() -> Vec<Backend> {
        compiled_backends()
    }

    pub fn create_grabber(&self) -> CaptureResult<DynScreenGrabber> {
        match self.backend {
            Backend::Mock => Ok(Arc::new(crate::backends::mock::MockGrabber::dual())),
            Backend::Xcap => {
                #[cfg(feature = "backend-xcap")]
                {
                    Ok(Arc::new(crate::backends::xcap_backend::XcapGrabber::new()))
                }
                #[cfg(not(feature = "backend-xcap"))]
                {
                    Err(CaptureError::unsupported("xcap"))
                }
            }
        }
    }
}
