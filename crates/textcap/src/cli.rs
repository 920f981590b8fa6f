use std::ffi::OsString;
use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};

use crate::session::Mode;

/// Rectangle given on the command line as `LEFT,TOP,RIGHT,BOTTOM`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RegionArg {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

fn parse_region(value: &str) -> Result<RegionArg, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [left, top, right, bottom] = parts.as_slice() else {
        return Err(format!(
            "expected LEFT,TOP,RIGHT,BOTTOM, got {} value(s)",
            parts.len()
        ));
    };
    let number = |raw: &str| {
        raw.parse::<u32>()
            .map_err(|err| format!("invalid coordinate '{raw}': {err}"))
    };
    let region = RegionArg {
        left: number(left)?,
        top: number(top)?,
        right: number(right)?,
        bottom: number(bottom)?,
    };
    if region.right <= region.left || region.bottom <= region.top {
        return Err("RIGHT and BOTTOM must be greater than LEFT and TOP".to_string());
    }
    Ok(region)
}

#[derive(Debug, Default)]
pub struct CliSources {
    pub lang_from_cli: bool,
    pub oem_from_cli: bool,
    pub psm_from_cli: bool,
    pub scale_factor_from_cli: bool,
    pub padding_from_cli: bool,
    pub mode_from_cli: bool,
}

impl CliSources {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            lang_from_cli: value_from_cli(matches, "lang"),
            oem_from_cli: value_from_cli(matches, "oem"),
            psm_from_cli: value_from_cli(matches, "psm"),
            scale_factor_from_cli: value_from_cli(matches, "scale_factor"),
            padding_from_cli: value_from_cli(matches, "padding"),
            mode_from_cli: value_from_cli(matches, "mode"),
        }
    }
}

fn value_from_cli(matches: &ArgMatches, id: &str) -> bool {
    matches
        .value_source(id)
        .is_some_and(|source| matches!(source, ValueSource::CommandLine))
}

pub fn parse_cli() -> (CliArgs, CliSources) {
    match parse_from(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(err) => err.exit(),
    }
}

pub fn parse_from<I, T>(args: I) -> Result<(CliArgs, CliSources), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = CliArgs::command().try_get_matches_from(args)?;
    let args = CliArgs::from_arg_matches(&matches)?;
    let sources = CliSources::from_matches(&matches);
    Ok((args, sources))
}

#[derive(Debug, Parser)]
#[command(
    name = "textcap",
    about = "Capture the screen, recognize its text and classify it",
    disable_help_subcommand = true
)]
pub struct CliArgs {
    /// Override the configuration file path
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Lock capture to a specific backend implementation
    #[arg(short = 'b', long = "backend")]
    pub backend: Option<String>,

    /// Print the monitors reported by the capture backend and exit
    #[arg(long = "list-monitors")]
    pub list_monitors: bool,

    /// Monitor the region belongs to
    #[arg(long = "monitor", default_value_t = 0)]
    pub monitor: usize,

    /// Restrict recognition to LEFT,TOP,RIGHT,BOTTOM on the chosen monitor
    #[arg(long = "region", value_name = "L,T,R,B", value_parser = parse_region)]
    pub region: Option<RegionArg>,

    /// Recognize an image file instead of the screen (repeatable)
    #[arg(long = "image", value_name = "FILE")]
    pub images: Vec<PathBuf>,

    /// Recognition language, several joined with '+'
    #[arg(short = 'l', long = "lang", id = "lang", default_value = "eng")]
    pub lang: String,

    /// Directory holding the language data files
    #[arg(long = "tessdata-dir")]
    pub tessdata_dir: Option<PathBuf>,

    /// OCR engine mode
    #[arg(
        long = "oem",
        id = "oem",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(0..=3)
    )]
    pub oem: u32,

    /// Page segmentation mode
    #[arg(
        long = "psm",
        id = "psm",
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(0..=13)
    )]
    pub psm: u32,

    /// Path of the tesseract executable
    #[arg(long = "tesseract", value_name = "PROGRAM")]
    pub tesseract: Option<PathBuf>,

    /// Recognize monitors one after another instead of in parallel
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Upscale factor applied before recognition
    #[arg(long = "scale-factor", id = "scale_factor", default_value_t = 2.0)]
    pub scale_factor: f32,

    /// Border added around the image before recognition, in pixels
    #[arg(long = "padding", id = "padding", default_value_t = 20)]
    pub padding: u32,

    /// Keep recognized lines as-is or apply the best matching transform
    #[arg(long = "mode", id = "mode", value_enum, default_value_t = Mode::Parse)]
    pub mode: Mode,

    /// Save screenshots and the selection into this directory
    #[arg(long = "store-dir")]
    pub store_dir: Option<PathBuf>,

    /// Print a JSON report instead of plain text
    #[arg(long = "json")]
    pub json: bool,

    /// Write the JSON report on a single line
    #[arg(long = "compact")]
    pub compact: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}
