use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use image::ImageFormat;

use crate::enhance::{EnhanceSettings, enhance};
use crate::{OcrEngine, OcrError, OcrRequest, OcrResponse, TessArgs};
use textcap_types::{Word, WordBox};

const ENGINE_NAME: &str = "tesseract";
const WORD_LEVEL: u32 = 5;
const TSV_COLUMNS: usize = 12;

/// Runs the `tesseract` command line tool and parses its TSV output.
#[derive(Debug, Clone)]
pub struct TesseractOcrEngine {
    program: PathBuf,
    enhance: EnhanceSettings,
}

impl Default for TesseractOcrEngine {
    fn default() -> Self {
        Self::new(ENGINE_NAME)
    }
}

impl TesseractOcrEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            enhance: EnhanceSettings::default(),
        }
    }

    pub fn with_enhance(mut self, enhance: EnhanceSettings) -> Self {
        self.enhance = enhance;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, args: &TessArgs) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(&args.lang)
            .args(args.to_args())
            .arg("tsv")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    fn spawn_error(&self, source: std::io::Error) -> OcrError {
        OcrError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

impl OcrEngine for TesseractOcrEngine {
    fn name(&self) -> &'static str {
        ENGINE_NAME
    }

    fn warm_up(&self) -> Result<(), OcrError> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .map_err(|err| self.spawn_error(err))?;
        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                engine: ENGINE_NAME,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let version = String::from_utf8_lossy(&output.stdout);
        log::debug!(
            "using {} ({})",
            self.program.display(),
            version.lines().next().unwrap_or("unknown version")
        );
        Ok(())
    }

    fn recognize(&self, request: &OcrRequest<'_>) -> Result<OcrResponse, OcrError> {
        let args = request.args();
        let image = enhance(request.image(), &self.enhance);

        let mut encoded = Vec::new();
        image.write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)?;

        log::debug!(
            "running {} -l {} {} on {}x{} image",
            self.program.display(),
            args.lang,
            args.to_config_str(),
            image.width(),
            image.height()
        );

        let mut child = self
            .command(args)
            .spawn()
            .map_err(|err| self.spawn_error(err))?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::backend("tesseract stdin was not captured"))?;
        let writer = thread::spawn(move || stdin.write_all(&encoded));

        let output = child
            .wait_with_output()
            .map_err(|err| self.spawn_error(err))?;
        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(err)) if output.status.success() => return Err(self.spawn_error(err)),
            Ok(Err(_)) => {}
            Err(_) => return Err(OcrError::backend("tesseract stdin writer panicked")),
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            if is_missing_language(&stderr) {
                return Err(OcrError::LanguageData {
                    lang: args.lang.clone(),
                });
            }
            return Err(OcrError::EngineFailed {
                engine: ENGINE_NAME,
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let words = parse_tsv(&stdout)?
            .into_iter()
            .map(|word| {
                let bbox = self.enhance.map_box(word.bbox);
                word.with_bbox(bbox)
            })
            .collect();
        Ok(OcrResponse::new(words))
    }
}

fn is_missing_language(stderr: &str) -> bool {
    stderr.contains("Failed loading language") || stderr.contains("Error opening data file")
}

/// Parse tesseract TSV output into word records.
///
/// Only word-level rows with visible text are kept.
pub fn parse_tsv(output: &str) -> Result<Vec<Word>, OcrError> {
    let mut words = Vec::new();
    for (index, row) in output.lines().enumerate() {
        let line = index + 1;
        if row.trim().is_empty() || row.starts_with("level") {
            continue;
        }
        let fields: Vec<&str> = row.splitn(TSV_COLUMNS, '\t').collect();
        if fields.len() < TSV_COLUMNS - 1 {
            return Err(OcrError::malformed(
                line,
                format!("expected {TSV_COLUMNS} columns, found {}", fields.len()),
            ));
        }
        let number = |column: usize| -> Result<u32, OcrError> {
            fields[column].trim().parse::<u32>().map_err(|err| {
                OcrError::malformed(line, format!("column {column} '{}': {err}", fields[column]))
            })
        };
        if number(0)? != WORD_LEVEL {
            continue;
        }
        let text = fields.get(11).map(|text| text.trim()).unwrap_or_default();
        if text.is_empty() {
            continue;
        }
        let confidence = fields[10].trim().parse::<f64>().map_err(|err| {
            OcrError::malformed(line, format!("confidence '{}': {err}", fields[10]))
        })?;
        let bbox = WordBox {
            left: number(6)?,
            top: number(7)?,
            width: number(8)?,
            height: number(9)?,
        };
        words.push(
            Word::new(number(2)?, number(3)?, number(4)?, text)
                .with_word_num(number(5)?)
                .with_confidence(confidence)
                .with_bbox(bbox),
        );
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t
2\t1\t1\t0\t0\t0\t36\t92\t582\t68\t-1\t
3\t1\t1\t1\t0\t0\t36\t92\t582\t68\t-1\t
4\t1\t1\t1\t1\t0\t36\t92\t582\t30\t-1\t
5\t1\t1\t1\t1\t1\t36\t92\t60\t24\t96.063751\tHello
5\t1\t1\t1\t1\t2\t104\t92\t80\t24\t95.110458\tworld
5\t1\t1\t1\t1\t3\t190\t92\t10\t24\t-1\t
5\t1\t2\t1\t1\t1\t36\t140\t200\t24\t88.5\tmail@example.com
";

    #[test]
    fn parses_word_rows_only() {
        let words = parse_tsv(SAMPLE).unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].text, "Hello");
        assert_eq!(words[0].word_num, 1);
        assert!((words[0].confidence - 96.063751).abs() < 1e-9);
        assert_eq!(
            words[1].bbox,
            WordBox {
                left: 104,
                top: 92,
                width: 80,
                height: 24,
            }
        );
        assert_eq!(words[2].block_num, 2);
        assert_eq!(words[2].text, "mail@example.com");
    }

    #[test]
    fn rejects_truncated_rows() {
        let err = parse_tsv("5\t1\t1\t1\n").unwrap_err();
        match err {
            OcrError::MalformedOutput { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_confidence() {
        let err = parse_tsv("5\t1\t1\t1\t1\t1\t0\t0\t1\t1\thigh\tword\n").unwrap_err();
        assert!(err.to_string().contains("confidence"));
    }

    #[test]
    fn recognizes_missing_language_messages() {
        assert!(is_missing_language(
            "Error opening data file /usr/share/tessdata/xyz.traineddata\nFailed loading language 'xyz'"
        ));
        assert!(!is_missing_language("Warning: Invalid resolution 0 dpi."));
    }

    #[test]
    fn command_line_follows_engine_arguments() {
        let engine = TesseractOcrEngine::new("/usr/bin/tesseract");
        let args = TessArgs::new(None, "eng", 1, 6);
        let command = engine.command(&args);
        let argv: Vec<String> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            argv,
            vec!["stdin", "stdout", "-l", "eng", "--oem", "1", "--psm", "6", "tsv"]
        );
    }
}
