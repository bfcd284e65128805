use kasane_types::{LineKey, OcrWord};

/// tesseract's level for word rows
const WORD_LEVEL: u32 = 5;

/// Parse tesseract `tsv` output into word tokens.
///
/// Only word-level rows with text are kept, in output order. Rows that
/// don't parse are skipped.
pub fn parse_words(tsv: &str) -> Vec<OcrWord> {
    let mut words = Vec::new();

    for (idx, row) in tsv.lines().enumerate() {
        if idx == 0 && row.starts_with("level") {
            continue;
        }
        if let Some(word) = parse_row(row) {
            words.push(word);
        }
    }

    words
}

fn parse_row(row: &str) -> Option<OcrWord> {
    let cols: Vec<&str> = row.split('\t').collect();
    if cols.len() < 12 {
        return None;
    }

    let level: u32 = cols[0].trim().parse().ok()?;
    if level != WORD_LEVEL {
        return None;
    }

    let text = cols[11].trim_end_matches(['\r', '\n']);
    if text.is_empty() {
        return None;
    }

    Some(OcrWord {
        text: text.to_string(),
        left: cols[6].trim().parse().ok()?,
        top: cols[7].trim().parse().ok()?,
        width: cols[8].trim().parse().ok()?,
        height: cols[9].trim().parse().ok()?,
        confidence: cols[10].trim().parse().unwrap_or(-1.0),
        key: LineKey {
            page: cols[1].trim().parse().ok()?,
            block: cols[2].trim().parse().ok()?,
            paragraph: cols[3].trim().parse().ok()?,
            line: cols[4].trim().parse().ok()?,
        },
    })
}
