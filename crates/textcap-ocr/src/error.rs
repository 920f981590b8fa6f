use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("backend error: {message}")]
    Backend { message: String },

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{engine} exited with {status}: {stderr}")]
    EngineFailed {
        engine: &'static str,
        status: String,
        stderr: String,
    },

    #[error("language data for '{lang}' is not installed")]
    LanguageData { lang: String },

    #[error("failed to encode image for recognition: {0}")]
    Encode(#[from] image::ImageError),

    #[error("malformed engine output on line {line}: {reason}")]
    MalformedOutput { line: usize, reason: String },
}

impl OcrError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedOutput {
            line,
            reason: reason.into(),
        }
    }
}
