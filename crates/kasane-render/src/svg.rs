use std::fmt::Write;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use kasane_core::layout::WRAP_RATIO;
use kasane_core::{Renderer, ScaleContext, TextMeasure};
use kasane_types::{BoxKind, PlacementBox, RawImage};

use crate::font::{OVERLAY_FONTS, css_family_list};
use crate::metrics::GlyphMetrics;

/// Renderer that builds an SVG document
pub struct SvgCanvas {
    width: u32,
    height: u32,
    metrics: GlyphMetrics,
    font_family: String,
    body: String,
}

impl SvgCanvas {
    /// Measures with the installed overlay font when one is found
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_metrics(width, height, GlyphMetrics::system())
    }

    pub fn with_metrics(width: u32, height: u32, metrics: GlyphMetrics) -> Self {
        Self {
            width,
            height,
            metrics,
            font_family: css_family_list(OVERLAY_FONTS),
            body: String::new(),
        }
    }

    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect x="0" y="0" width="{w}" height="{h}" fill="black"/>{body}</svg>"#,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }

    fn write_text_lines(&mut self, rows: &[String], x: f32, first_baseline: f32, font_size: u32, fill: &str) {
        let line_height = self.metrics.line_height_px(font_size);
        let _ = write!(
            self.body,
            r#"<text x="{x:.1}" y="{first_baseline:.1}" font-family="{family}" font-size="{font_size}" font-weight="bold" fill="{fill}" text-anchor="middle">"#,
            family = self.font_family
        );
        for (idx, row) in rows.iter().enumerate() {
            let dy = if idx == 0 { 0.0 } else { line_height };
            let _ = write!(
                self.body,
                r#"<tspan x="{x:.1}" dy="{dy:.1}">{}</tspan>"#,
                escape(row)
            );
        }
        self.body.push_str("</text>");
    }
}

impl TextMeasure for SvgCanvas {
    fn measure_text(&self, text: &str, font_size: u32, wrap_width: f32) -> Option<f32> {
        self.metrics.measure_text(text, font_size, wrap_width)
    }
}

impl Renderer for SvgCanvas {
    fn draw_image(&mut self, image: &RawImage, scale: &ScaleContext) {
        let uri = match png_data_uri(image) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!("Skipping captured image in overlay: {e:#}");
                return;
            }
        };

        let _ = write!(
            self.body,
            r#"<image href="{uri}" xlink:href="{uri}" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" preserveAspectRatio="none"/>"#,
            scale.origin_x, scale.origin_y, scale.width, scale.height
        );
    }

    fn draw_filled_rect(&mut self, placement: &PlacementBox) {
        let _ = write!(
            self.body,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="white" stroke="white"/>"#,
            placement.x_start,
            placement.y_start,
            placement.width(),
            placement.height()
        );
    }

    fn draw_text(&mut self, placement: &PlacementBox) {
        let (center_x, center_y) = placement.center();

        match placement.kind {
            BoxKind::Line => {
                let rows = self
                    .metrics
                    .wrap(&placement.text, placement.font_size, placement.width() * WRAP_RATIO);
                let block = rows.len() as f32 * self.metrics.line_height_px(placement.font_size);
                let baseline = center_y - block / 2.0 + placement.font_size as f32;
                self.write_text_lines(&rows, center_x, baseline, placement.font_size, "black");
            }
            BoxKind::Mismatch => {
                let rows = self
                    .metrics
                    .wrap(&placement.text, placement.font_size, placement.width());
                let baseline = placement.y_start + placement.font_size as f32;
                self.write_text_lines(&rows, center_x, baseline, placement.font_size, "red");
            }
        }
    }
}

fn png_data_uri(image: &RawImage) -> Result<String> {
    let png = image.encode_png().context("Failed to encode PNG")?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
