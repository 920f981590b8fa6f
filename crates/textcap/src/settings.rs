use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;

use crate::cli::{CliArgs, CliSources};
use crate::session::Mode;
use textcap_ocr::{EnhanceSettings, TessArgs};

const PROJECT_CONFIG_FILE: &str = "textcap.toml";
const DEFAULT_TESSERACT: &str = "tesseract";
const MAX_SCALE_FACTOR: f32 = 8.0;
const MAX_PADDING: u32 = 1024;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    capture: Option<CaptureFileConfig>,
    ocr: Option<OcrFileConfig>,
    output: Option<OutputFileConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CaptureFileConfig {
    backend: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OcrFileConfig {
    language: Option<String>,
    tessdata_dir: Option<String>,
    oem: Option<u32>,
    psm: Option<u32>,
    tesseract: Option<String>,
    parallel: Option<bool>,
    scale_factor: Option<f32>,
    padding: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OutputFileConfig {
    mode: Option<String>,
    store_dir: Option<String>,
    json: Option<bool>,
    compact: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct EffectiveSettings {
    pub capture: CaptureSettings,
    pub ocr: OcrSettings,
    pub output: OutputSettings,
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct CaptureSettings {
    pub backend: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OcrSettings {
    pub language: String,
    pub tessdata_dir: Option<PathBuf>,
    pub oem: u32,
    pub psm: u32,
    pub tesseract: PathBuf,
    pub parallel: bool,
    pub scale_factor: f32,
    pub padding: u32,
}

impl OcrSettings {
    pub fn tess_args(&self) -> TessArgs {
        TessArgs::new(
            self.tessdata_dir.clone(),
            self.language.clone(),
            self.oem,
            self.psm,
        )
    }

    pub fn enhance(&self) -> EnhanceSettings {
        EnhanceSettings {
            scale_factor: self.scale_factor,
            padding: self.padding,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutputSettings {
    pub mode: Mode,
    pub store_dir: Option<PathBuf>,
    pub json: bool,
    pub compact: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidValue {
        path: Option<PathBuf>,
        field: &'static str,
        value: String,
    },
    NotFound {
        path: PathBuf,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(
                    f,
                    "failed to read config file {}: {}",
                    path.display(),
                    source
                )
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "failed to parse config file {}: {}",
                    path.display(),
                    source
                )
            }
            ConfigError::InvalidValue { path, field, value } => {
                if let Some(path) = path {
                    write!(
                        f,
                        "invalid value '{}' for '{}' in {}",
                        value,
                        field,
                        path.display()
                    )
                } else {
                    write!(f, "invalid value '{}' for '{}'", value, field)
                }
            }
            ConfigError::NotFound { path } => {
                write!(f, "config file {} does not exist", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::InvalidValue { .. } => None,
            ConfigError::NotFound { .. } => None,
        }
    }
}

pub fn resolve_settings(
    cli: &CliArgs,
    sources: &CliSources,
) -> Result<EffectiveSettings, ConfigError> {
    let (file, config_path) = load_config(cli.config.as_deref())?;
    merge(cli, sources, file, config_path)
}

fn load_config(path_override: Option<&Path>) -> Result<(FileConfig, Option<PathBuf>), ConfigError> {
    if let Some(path) = path_override {
        let path = path.to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound { path });
        }
        return read_config(path);
    }

    let candidates = [project_config_path(), default_config_path()];
    for path in candidates.into_iter().flatten() {
        if path.exists() {
            return read_config(path);
        }
    }
    Ok((FileConfig::default(), None))
}

fn read_config(path: PathBuf) -> Result<(FileConfig, Option<PathBuf>), ConfigError> {
    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    log::debug!("loaded configuration from {}", path.display());
    Ok((config, Some(path)))
}

fn merge(
    cli: &CliArgs,
    sources: &CliSources,
    file: FileConfig,
    config_path: Option<PathBuf>,
) -> Result<EffectiveSettings, ConfigError> {
    let config_dir = config_path
        .as_ref()
        .and_then(|path| path.parent().map(|dir| dir.to_path_buf()));

    let FileConfig {
        capture: file_capture,
        ocr: file_ocr,
        output: file_output,
    } = file;
    let file_capture = file_capture.unwrap_or_default();
    let file_ocr = file_ocr.unwrap_or_default();
    let file_output = file_output.unwrap_or_default();

    let mut backend = normalize_string(cli.backend.clone());
    if backend.is_none() {
        backend = normalize_string(file_capture.backend);
    }

    let mut language = cli.lang.trim().to_string();
    if !sources.lang_from_cli {
        if let Some(value) = normalize_string(file_ocr.language) {
            validate_language(&value, config_path.as_ref())?;
            language = value;
        }
    }
    validate_language(&language, None)?;

    let tessdata_dir = match cli.tessdata_dir.clone() {
        Some(dir) => Some(expand_pathbuf(dir)),
        None => normalize_string(file_ocr.tessdata_dir)
            .and_then(|dir| resolve_path_from_config(dir, config_dir.as_deref())),
    };

    let mut oem = cli.oem;
    if !sources.oem_from_cli {
        if let Some(value) = file_ocr.oem {
            if value > 3 {
                return Err(invalid(config_path.as_ref(), "oem", value));
            }
            oem = value;
        }
    }

    let mut psm = cli.psm;
    if !sources.psm_from_cli {
        if let Some(value) = file_ocr.psm {
            if value > 13 {
                return Err(invalid(config_path.as_ref(), "psm", value));
            }
            psm = value;
        }
    }

    let tesseract = match cli.tesseract.clone() {
        Some(program) => expand_pathbuf(program),
        None => normalize_string(file_ocr.tesseract)
            .map(|program| {
                if program.contains('/') || program.contains('\\') {
                    resolve_path_from_config(program.clone(), config_dir.as_deref())
                        .unwrap_or_else(|| PathBuf::from(program))
                } else {
                    PathBuf::from(program)
                }
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TESSERACT)),
    };

    let parallel = if cli.sequential {
        false
    } else {
        file_ocr.parallel.unwrap_or(true)
    };

    let mut scale_factor = cli.scale_factor;
    if !valid_scale_factor(scale_factor) {
        return Err(invalid(None, "scale_factor", scale_factor));
    }
    if !sources.scale_factor_from_cli {
        if let Some(value) = file_ocr.scale_factor {
            if !valid_scale_factor(value) {
                return Err(invalid(config_path.as_ref(), "scale_factor", value));
            }
            scale_factor = value;
        }
    }

    let mut padding = cli.padding;
    if padding > MAX_PADDING {
        return Err(invalid(None, "padding", padding));
    }
    if !sources.padding_from_cli {
        if let Some(value) = file_ocr.padding {
            if value > MAX_PADDING {
                return Err(invalid(config_path.as_ref(), "padding", value));
            }
            padding = value;
        }
    }

    let mut mode = cli.mode;
    if !sources.mode_from_cli {
        if let Some(value) = normalize_string(file_output.mode) {
            mode = Mode::from_str(&value, true)
                .map_err(|_| invalid(config_path.as_ref(), "mode", &value))?;
        }
    }

    let store_dir = match cli.store_dir.clone() {
        Some(dir) => Some(expand_pathbuf(dir)),
        None => normalize_string(file_output.store_dir)
            .and_then(|dir| resolve_path_from_config(dir, config_dir.as_deref())),
    };

    let json = cli.json || file_output.json.unwrap_or(false);
    let compact = cli.compact || file_output.compact.unwrap_or(false);

    Ok(EffectiveSettings {
        capture: CaptureSettings { backend },
        ocr: OcrSettings {
            language,
            tessdata_dir,
            oem,
            psm,
            tesseract,
            parallel,
            scale_factor,
            padding,
        },
        output: OutputSettings {
            mode,
            store_dir,
            json,
            compact,
        },
        config_dir,
    })
}

fn invalid(path: Option<&PathBuf>, field: &'static str, value: impl fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        path: path.cloned(),
        field,
        value: value.to_string(),
    }
}

fn validate_language(value: &str, path: Option<&PathBuf>) -> Result<(), ConfigError> {
    let valid_part = |lang: &str| {
        !lang.is_empty() && lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    let valid = !value.is_empty() && value.split('+').all(valid_part);
    if valid {
        Ok(())
    } else {
        Err(invalid(path, "language", value))
    }
}

fn valid_scale_factor(value: f32) -> bool {
    value.is_finite() && (1.0..=MAX_SCALE_FACTOR).contains(&value)
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("rs", "textcap", "textcap")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    env::current_dir()
        .ok()
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
}

fn normalize_string(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn expand_pathbuf(path: PathBuf) -> PathBuf {
    match path.to_str() {
        Some(s) => expand_home_path(s),
        None => path,
    }
}

fn resolve_path_from_config(value: String, base: Option<&Path>) -> Option<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let expanded = expand_home_path(trimmed);
    match base {
        Some(base) if !expanded.is_absolute() => Some(base.join(expanded)),
        _ => Some(expanded),
    }
}

fn expand_home_path(value: &str) -> PathBuf {
    if value == "~" {
        if let Some(base) = BaseDirs::new() {
            return base.home_dir().to_path_buf();
        }
    } else if let Some(stripped) = value.strip_prefix("~/") {
        if let Some(base) = BaseDirs::new() {
            return base.home_dir().join(stripped);
        }
    }
    PathBuf::from(value)
}
