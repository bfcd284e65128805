use kasane_types::{BoxKind, OcrLine, PlacementBox, RawImage};

use crate::layout::{OverlayLayout, layout_overlay};
use crate::scale::ScaleContext;

/// Text measurement needed by the layout engine
pub trait TextMeasure {
    /// Height of `text` wrapped to `wrap_width` at `font_size`.
    /// `None` when the text cannot be measured.
    fn measure_text(&self, text: &str, font_size: u32, wrap_width: f32) -> Option<f32>;
}

/// 2D drawing surface the overlay is painted on
pub trait Renderer: TextMeasure {
    fn draw_image(&mut self, image: &RawImage, scale: &ScaleContext);

    /// Opaque background behind a translated line
    fn draw_filled_rect(&mut self, placement: &PlacementBox);

    fn draw_text(&mut self, placement: &PlacementBox);
}

/// Draw the captured image and the translated lines on top of it.
///
/// Returns `None` without drawing anything when the canvas is too small.
pub fn paint_overlay<R: Renderer + ?Sized>(
    renderer: &mut R,
    image: &RawImage,
    lines: &[OcrLine],
    translated_text: &str,
    canvas_width: u32,
    canvas_height: u32,
) -> Option<OverlayLayout> {
    let scale = ScaleContext::fit(image.width, image.height, canvas_width, canvas_height)?;

    renderer.draw_image(image, &scale);

    let layout = layout_overlay(lines, translated_text, &scale, &*renderer);
    for placement in layout.boxes() {
        if placement.kind == BoxKind::Line {
            renderer.draw_filled_rect(placement);
        }
        renderer.draw_text(placement);
    }

    Some(layout)
}
