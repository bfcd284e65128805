use std::sync::OnceLock;

use kasane_core::TextMeasure;

use crate::font::{FontFace, OVERLAY_FONTS};

/// Text metrics for sizing overlay boxes.
///
/// Advances come from the loaded font's `hmtx` table. Characters the font
/// has no glyph for, or every character when no font is loaded, fall back to
/// a per-class estimate: full-width scripts (CJK, kana, Hangul, full-width
/// forms) take one em, Latin is split into narrow, regular and wide shapes.
#[derive(Debug, Clone)]
pub struct GlyphMetrics {
    font: Option<FontFace>,
    pub line_height: f32,
}

impl Default for GlyphMetrics {
    /// Estimate only, no font lookup
    fn default() -> Self {
        Self {
            font: None,
            line_height: 1.2,
        }
    }
}

impl GlyphMetrics {
    pub fn with_font(font: FontFace) -> Self {
        Self {
            font: Some(font),
            ..Self::default()
        }
    }

    /// Metrics backed by the first installed font of the overlay stack,
    /// looked up once per process
    pub fn system() -> Self {
        static SYSTEM_FONT: OnceLock<Option<FontFace>> = OnceLock::new();

        let font = SYSTEM_FONT.get_or_init(|| match FontFace::resolve(OVERLAY_FONTS) {
            Ok(font) => {
                tracing::debug!(
                    "Measuring overlay text with {}",
                    font.family().unwrap_or("an unnamed font")
                );
                Some(font)
            }
            Err(e) => {
                tracing::warn!("{e:#}, estimating glyph widths");
                None
            }
        });

        font.clone().map(Self::with_font).unwrap_or_default()
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn char_width(&self, ch: char, font_size: f32) -> f32 {
        let em = self
            .font
            .as_ref()
            .and_then(|font| font.advances_em(ch.encode_utf8(&mut [0; 4])).pop().flatten())
            .unwrap_or_else(|| estimated_advance(ch));
        em * font_size
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let Some(font) = &self.font else {
            return text.chars().map(estimated_advance).sum::<f32>() * font_size;
        };

        font.advances_em(text)
            .into_iter()
            .zip(text.chars())
            .map(|(advance, ch)| advance.unwrap_or_else(|| estimated_advance(ch)))
            .sum::<f32>()
            * font_size
    }

    pub fn line_height_px(&self, font_size: u32) -> f32 {
        font_size as f32 * self.line_height
    }

    /// Greedy wrap. Explicit line breaks are kept, words move to the next
    /// line as a whole, full-width characters may break anywhere and words
    /// wider than the line are split by character.
    pub fn wrap(&self, text: &str, font_size: u32, max_width: f32) -> Vec<String> {
        let size = font_size as f32;
        text.split('\n')
            .flat_map(|paragraph| self.wrap_paragraph(paragraph.trim_end_matches('\r'), size, max_width))
            .collect()
    }

    fn wrap_paragraph(&self, paragraph: &str, size: f32, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut width = 0.0;

        for token in tokens(paragraph) {
            let token_width = self.text_width(token, size);

            if token.chars().all(char::is_whitespace) {
                if !current.is_empty() {
                    current.push_str(token);
                    width += token_width;
                }
                continue;
            }

            if width + token_width > max_width && !current.trim_end().is_empty() {
                lines.push(current.trim_end().to_string());
                current.clear();
                width = 0.0;
            }

            if token_width > max_width {
                for ch in token.chars() {
                    let ch_width = self.char_width(ch, size);
                    if width + ch_width > max_width && !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                        width = 0.0;
                    }
                    current.push(ch);
                    width += ch_width;
                }
            } else {
                current.push_str(token);
                width += token_width;
            }
        }

        if !current.trim_end().is_empty() || lines.is_empty() {
            lines.push(current.trim_end().to_string());
        }
        lines
    }
}

impl TextMeasure for GlyphMetrics {
    fn measure_text(&self, text: &str, font_size: u32, wrap_width: f32) -> Option<f32> {
        if font_size == 0 || !wrap_width.is_finite() || wrap_width <= 0.0 {
            return None;
        }
        let rows = self.wrap(text, font_size, wrap_width).len();
        Some(rows as f32 * self.line_height_px(font_size))
    }
}

/// Split into words, single whitespace chars and single full-width chars
fn tokens(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() || is_wide(ch) {
            if let Some(start) = word_start.take() {
                out.push(&text[start..idx]);
            }
            out.push(&text[idx..idx + ch.len_utf8()]);
        } else if word_start.is_none() {
            word_start = Some(idx);
        }
    }
    if let Some(start) = word_start {
        out.push(&text[start..]);
    }

    out
}

/// Advance in em when no font glyph is available
fn estimated_advance(ch: char) -> f32 {
    if is_wide(ch) {
        return 1.0;
    }
    match ch {
        c if c.is_whitespace() => 0.3,
        'i' | 'j' | 'l' | 'I' | '!' | '\'' | ',' | '.' | ':' | ';' | '|' | 'f' | 't' | 'r' | '(' | ')'
        | '[' | ']' => 0.3,
        'm' | 'w' | 'M' | 'W' | '@' => 0.9,
        c if c.is_ascii_uppercase() => 0.68,
        c if c.is_ascii_lowercase() || c.is_ascii_digit() => 0.56,
        c if c.is_ascii() => 0.4,
        _ => 0.6,
    }
}

fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
    )
}
