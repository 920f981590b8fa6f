use std::io::Write;

use crate::output::error::OutputError;
use crate::output::types::Report;

pub fn render_report(report: &Report, pretty: bool) -> Result<Vec<u8>, OutputError> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(report)?
    } else {
        serde_json::to_vec(report)?
    };
    Ok(encoded)
}

pub fn write_report<W: Write>(
    writer: &mut W,
    report: &Report,
    pretty: bool,
) -> Result<(), OutputError> {
    let encoded = render_report(report, pretty)?;
    writer.write_all(&encoded)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magic::MagicScorer;
    use crate::session::{Mode, Session};
    use textcap_types::{Magic, OcrResult, Word};

    #[test]
    fn report_lists_scores_by_magic_name() {
        let mut session = Session::new(Mode::Parse);
        session
            .set_ocr_result(OcrResult::new(
                vec![Word::new(1, 1, 1, "hi").with_confidence(80.0)],
                false,
            ))
            .unwrap();
        let scores = MagicScorer::score_all(session.ocr().unwrap());
        session.record_magic_scores(scores).unwrap();
        session
            .set_final_text("hi".into(), Some(Magic::SingleLine))
            .unwrap();

        let report = Report::from_session(&session).unwrap();
        let mut buffer = Vec::new();
        write_report(&mut buffer, &report, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["text"], "hi");
        assert_eq!(value["magic"], "single_line");
        assert_eq!(value["mode"], "parse");
        assert_eq!(value["scores"]["single_line"], 0.5);
        assert_eq!(value["scores"]["fallback"], 0.01);
        assert_eq!(value["mean_conf"], 80.0);
        assert_eq!(value["num_lines"], 1);
    }

    #[test]
    fn compact_reports_fit_on_one_line() {
        let mut session = Session::new(Mode::Raw);
        session.set_ocr_result(OcrResult::default()).unwrap();
        session.set_final_text(String::new(), None).unwrap();
        let report = Report::from_session(&session).unwrap();

        let mut compact = Vec::new();
        write_report(&mut compact, &report, false).unwrap();
        let text = String::from_utf8(compact).unwrap();
        assert_eq!(text.matches('\n').count(), 1);
        assert!(text.ends_with("}\n"));

        let pretty = render_report(&report, true).unwrap();
        assert!(pretty.contains(&b'\n'));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["mode"], "raw");
    }

    #[test]
    fn unfinished_sessions_have_no_report() {
        assert!(Report::from_session(&Session::new(Mode::Parse)).is_none());
    }
}
