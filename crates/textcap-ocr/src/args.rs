use std::path::PathBuf;

/// Languages whose scripts do not separate words with spaces.
const LANGUAGES_WITHOUT_SPACES: &[&str] = &[
    "chi_sim",
    "chi_sim_vert",
    "chi_tra",
    "chi_tra_vert",
    "jpn",
    "jpn_vert",
];

/// Recognition engine parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TessArgs {
    /// Directory searched for language data; the engine default when unset.
    pub path: Option<PathBuf>,
    /// Language code, several joined with `+` (e.g. `eng+jpn`).
    pub lang: String,
    pub oem: u32,
    pub psm: u32,
}

impl Default for TessArgs {
    fn default() -> Self {
        Self {
            path: None,
            lang: "eng".to_string(),
            oem: 1,
            psm: 3,
        }
    }
}

impl TessArgs {
    pub fn new(path: Option<PathBuf>, lang: impl Into<String>, oem: u32, psm: u32) -> Self {
        Self {
            path,
            lang: lang.into(),
            oem,
            psm,
        }
    }

    pub fn is_language_without_spaces(&self) -> bool {
        self.lang
            .split('+')
            .any(|lang| LANGUAGES_WITHOUT_SPACES.contains(&lang.trim()))
    }

    /// Flags as a single configuration string, paths quoted.
    pub fn to_config_str(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        if let Some(path) = &self.path {
            parts.push(format!("--tessdata-dir \"{}\"", path.display()));
        }
        parts.push(format!("--oem {}", self.oem));
        parts.push(format!("--psm {}", self.psm));
        if self.is_language_without_spaces() {
            parts.push("-c preserve_interword_spaces=1".to_string());
        }
        parts.join(" ")
    }

    /// Flags as separate process arguments.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(8);
        if let Some(path) = &self.path {
            args.push("--tessdata-dir".to_string());
            args.push(path.display().to_string());
        }
        args.push("--oem".to_string());
        args.push(self.oem.to_string());
        args.push("--psm".to_string());
        args.push(self.psm.to_string());
        if self.is_language_without_spaces() {
            args.push("-c".to_string());
            args.push("preserve_interword_spaces=1".to_string());
        }
        args
    }
}
