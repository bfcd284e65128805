//! Placement of translated lines over the captured image.
//!
//! Each translated line is drawn in a box spanning the horizontal extent of
//! the OCR line it replaces. Boxes are placed top to bottom in reading order;
//! a box sits at its line's natural position unless the previous box reaches
//! past it, in which case it is pushed down just below. Earlier boxes are
//! never moved back up, so a run of long translations can drift well below
//! the text it belongs to.

use kasane_types::{BoxKind, OcrLine, PlacementBox};

use crate::render::TextMeasure;
use crate::scale::ScaleContext;

pub const MIN_FONT_SIZE: u32 = 10;
pub const MAX_FONT_SIZE: u32 = 24;
/// Vertical padding above and below the text inside a box
pub const PADDING_Y: f32 = 8.0;
/// Minimum space between two consecutive boxes
pub const MIN_GAP: f32 = 2.0;
/// Font size is this fraction of the scaled line height
pub const FONT_SCALE: f32 = 0.8;
/// Text wraps at this fraction of the box width
pub const WRAP_RATIO: f32 = 0.95;

pub const FALLBACK_FONT_SIZE: u32 = 12;
pub const FALLBACK_WIDTH_RATIO: f32 = 0.9;
pub const MISMATCH_MARKER: &str = "[Line count mismatch] ";

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayLayout {
    /// One box per non-empty translated line
    Lines(Vec<PlacementBox>),
    /// Line counts disagreed, the whole translation is shown in one box
    Mismatch {
        ocr_lines: usize,
        translated_lines: usize,
        fallback: PlacementBox,
    },
}

impl OverlayLayout {
    pub fn boxes(&self) -> &[PlacementBox] {
        match self {
            OverlayLayout::Lines(boxes) => boxes,
            OverlayLayout::Mismatch { fallback, .. } => std::slice::from_ref(fallback),
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, OverlayLayout::Mismatch { .. })
    }
}

/// Split the translated blob on line breaks and lay it out against `lines`
pub fn layout_overlay<M: TextMeasure + ?Sized>(
    lines: &[OcrLine],
    translated_text: &str,
    scale: &ScaleContext,
    measure: &M,
) -> OverlayLayout {
    let translated: Vec<&str> = translated_text.split('\n').collect();

    if translated.len() != lines.len() {
        tracing::warn!(
            "Line count mismatch: {} OCR lines, {} translated lines",
            lines.len(),
            translated.len()
        );
        return OverlayLayout::Mismatch {
            ocr_lines: lines.len(),
            translated_lines: translated.len(),
            fallback: fallback_box(translated_text, scale, measure),
        };
    }

    OverlayLayout::Lines(place_lines(lines, &translated, scale, measure))
}

/// Greedy top-to-bottom placement. `lines` and `translated` must be the same length
pub fn place_lines<M: TextMeasure + ?Sized>(
    lines: &[OcrLine],
    translated: &[&str],
    scale: &ScaleContext,
    measure: &M,
) -> Vec<PlacementBox> {
    debug_assert_eq!(lines.len(), translated.len());

    let mut boxes = Vec::with_capacity(lines.len());
    let mut last_drawn_y_end = scale.origin_y;

    for (line, text) in lines.iter().zip(translated) {
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let bbox_x = scale.x(line.left);
        let bbox_y = scale.y(line.top);
        let bbox_width = scale.length(line.width);
        let bbox_height = scale.length(line.height);

        let font_size = font_size_for(bbox_height);
        let wrap_width = bbox_width * WRAP_RATIO;
        let text_height = measure
            .measure_text(text, font_size, wrap_width)
            .unwrap_or(bbox_height);

        let ideal_y_start = bbox_y - PADDING_Y;
        let safe_y_start = last_drawn_y_end + MIN_GAP;
        let y_start = ideal_y_start.max(safe_y_start);
        let y_end = y_start + text_height + PADDING_Y * 2.0;

        boxes.push(PlacementBox {
            x_start: bbox_x,
            y_start,
            x_end: bbox_x + bbox_width,
            y_end,
            font_size,
            text: text.to_string(),
            kind: BoxKind::Line,
        });
        last_drawn_y_end = y_end;
    }

    boxes
}

pub fn font_size_for(bbox_height: f32) -> u32 {
    let size = (bbox_height * FONT_SCALE).round();
    if size.is_nan() || size < MIN_FONT_SIZE as f32 {
        return MIN_FONT_SIZE;
    }
    (size as u32).min(MAX_FONT_SIZE)
}

fn fallback_box<M: TextMeasure + ?Sized>(
    translated_text: &str,
    scale: &ScaleContext,
    measure: &M,
) -> PlacementBox {
    let text = format!("{MISMATCH_MARKER}{translated_text}");
    let width = scale.width * FALLBACK_WIDTH_RATIO;
    let center_x = scale.origin_x + scale.width / 2.0;
    let y_start = scale.origin_y + scale.height / 4.0;
    let height = measure
        .measure_text(&text, FALLBACK_FONT_SIZE, width)
        .unwrap_or(FALLBACK_FONT_SIZE as f32);

    PlacementBox {
        x_start: center_x - width / 2.0,
        y_start,
        x_end: center_x + width / 2.0,
        y_end: y_start + height,
        font_size: FALLBACK_FONT_SIZE,
        text,
        kind: BoxKind::Mismatch,
    }
}
