use std::collections::HashMap;

use kasane_types::{LineKey, OcrLine, OcrWord};

/// Group word tokens into lines keyed by (page, block, paragraph, line).
///
/// Lines come out in the order their key is first seen, which is reading
/// order for tesseract output. Words keep their given order inside a line
/// and are joined with a single space. The line box is the union of the word
/// boxes. Lines that are blank after joining are dropped.
pub fn group_lines(words: &[OcrWord]) -> Vec<OcrLine> {
    let mut index: HashMap<LineKey, usize> = HashMap::new();
    let mut groups: Vec<Vec<&OcrWord>> = Vec::new();

    for word in words {
        let slot = *index.entry(word.key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(word);
    }

    groups.iter().filter_map(|group| build_line(group)).collect()
}

fn build_line(words: &[&OcrWord]) -> Option<OcrLine> {
    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if text.trim().is_empty() {
        return None;
    }

    let left = words.iter().map(|w| w.left).min()?;
    let top = words.iter().map(|w| w.top).min()?;
    let right = words.iter().map(|w| w.left + w.width).max()?;
    let bottom = words.iter().map(|w| w.top + w.height).max()?;

    Some(OcrLine {
        text,
        left,
        top,
        width: right - left,
        height: bottom - top,
    })
}

/// Text blob sent for translation, one OCR line per text line
pub fn full_text(lines: &[OcrLine]) -> String {
    lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, line: u32, left: i32, top: i32, width: i32, height: i32) -> OcrWord {
        OcrWord {
            text: text.to_string(),
            left,
            top,
            width,
            height,
            confidence: 90.0,
            key: LineKey {
                page: 1,
                block: 1,
                paragraph: 1,
                line,
            },
        }
    }

    #[test]
    fn groups_words_by_line_key() {
        let words = vec![
            word("Hello", 1, 10, 12, 50, 18),
            word("World", 1, 70, 10, 55, 22),
            word("Foo", 2, 12, 50, 30, 16),
        ];

        let lines = group_lines(&words);
        assert_eq!(lines.len(), 2);

        assert_eq!(
            lines[0],
            OcrLine {
                text: "Hello World".to_string(),
                left: 10,
                top: 10,
                width: 115,
                height: 22,
            }
        );
        assert_eq!(
            lines[1],
            OcrLine {
                text: "Foo".to_string(),
                left: 12,
                top: 50,
                width: 30,
                height: 16,
            }
        );
    }

    #[test]
    fn keeps_first_seen_order_for_interleaved_keys() {
        let words = vec![
            word("b1", 2, 0, 40, 10, 10),
            word("a1", 1, 0, 0, 10, 10),
            word("b2", 2, 20, 40, 10, 10),
        ];

        let texts: Vec<_> = group_lines(&words).into_iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["b1 b2", "a1"]);
    }

    #[test]
    fn distinguishes_blocks_with_same_line_number() {
        let mut other_block = word("there", 1, 0, 100, 40, 10);
        other_block.key.block = 2;
        let words = vec![word("hi", 1, 0, 0, 20, 10), other_block];

        assert_eq!(group_lines(&words).len(), 2);
    }

    #[test]
    fn drops_blank_lines() {
        let words = vec![
            word(" ", 1, 0, 0, 5, 5),
            word("", 1, 5, 0, 5, 5),
            word("kept", 2, 0, 20, 30, 10),
        ];

        let lines = group_lines(&words);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "kept");
    }

    #[test]
    fn no_words_means_no_lines() {
        assert!(group_lines(&[]).is_empty());
    }

    #[test]
    fn full_text_joins_with_newlines() {
        let words = vec![word("one", 1, 0, 0, 10, 10), word("two", 2, 0, 20, 10, 10)];
        assert_eq!(full_text(&group_lines(&words)), "one\ntwo");
    }
}
