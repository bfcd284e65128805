use std::fmt::Write;

use kasane_types::OcrLine;

/// Plain-text view of a run: recognized text, then the translation
pub fn text_report(lines: &[OcrLine], translated_text: &str) -> String {
    let mut out = String::new();

    out.push_str("[Recognized text]\n");
    if lines.is_empty() {
        out.push_str("(no OCR data)\n");
    }
    for line in lines {
        let _ = writeln!(out, "{}", line.text);
    }

    out.push_str("\n[Translated text]\n");
    out.push_str(translated_text);
    if !translated_text.ends_with('\n') {
        out.push('\n');
    }

    out
}

/// Report for a run that ended with an error
pub fn error_report(message: &str) -> String {
    format!("[Error]\n{message}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_source_lines_then_translation() {
        let lines = vec![
            OcrLine {
                text: "Hello World".to_string(),
                left: 0,
                top: 0,
                width: 10,
                height: 10,
            },
            OcrLine {
                text: "Foo".to_string(),
                left: 0,
                top: 20,
                width: 10,
                height: 10,
            },
        ];

        let report = text_report(&lines, "안녕 세계\n푸");
        assert_eq!(
            report,
            "[Recognized text]\nHello World\nFoo\n\n[Translated text]\n안녕 세계\n푸\n"
        );
    }

    #[test]
    fn notes_missing_ocr_data() {
        let report = text_report(&[], "No text found");
        assert!(report.contains("(no OCR data)"));
        assert!(report.ends_with("No text found\n"));
    }
}
