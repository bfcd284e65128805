use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum AppEvent {
    ConfigChanged,
    /// Start one capture → OCR → translate run
    TriggerCapture(CaptureRequest),
    StatusUpdate {
        status: String,
        busy: bool,
    },
    ShowOverlay(Box<OverlayResult>),
    /// The capture itself with a message instead of a translation (e.g. no text found)
    ShowNotice {
        message: String,
        image: RawImage,
    },
    ShowError {
        message: String,
        image: Option<RawImage>,
    },
    Shutdown,
}

#[derive(Debug, Clone)]
pub enum CaptureRequest {
    /// Use the capture settings from config
    Configured,
    FullScreen,
    Region(CaptureRegion),
    /// An image already on disk, skips screen capture
    File(std::path::PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    #[default]
    Region,
    Full,
}

/// Raw RGBA8 pixels
#[derive(Clone)]
pub struct RawImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RawImage {
    /// PNG bytes, shared by the OCR input file and the overlay document
    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        use image::ImageEncoder;
        use image::error::{ParameterError, ParameterErrorKind};

        // The encoder panics on a short buffer
        if self.data.len() as u64 != u64::from(self.width) * u64::from(self.height) * 4 {
            return Err(image::ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            )));
        }

        let mut buffer = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buffer).write_image(
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(buffer)
    }
}

impl std::fmt::Debug for RawImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Hierarchical position of a word inside the OCR page layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineKey {
    pub page: u32,
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
}

/// Word-level token as reported by the OCR engine
#[derive(Debug, Clone, PartialEq)]
pub struct OcrWord {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f32,
    pub key: LineKey,
}

/// One recognized line in source-image pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    /// Per-line box, drawn on an opaque background
    Line,
    /// Whole-text box used when line counts disagree
    Mismatch,
}

/// Where and how large one translated line is drawn on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementBox {
    pub x_start: f32,
    pub y_start: f32,
    pub x_end: f32,
    pub y_end: f32,
    pub font_size: u32,
    pub text: String,
    pub kind: BoxKind,
}

impl PlacementBox {
    pub fn width(&self) -> f32 {
        self.x_end - self.x_start
    }

    pub fn height(&self) -> f32 {
        self.y_end - self.y_start
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.x_start + self.x_end) / 2.0,
            (self.y_start + self.y_end) / 2.0,
        )
    }
}

/// Everything needed to draw one finished run
#[derive(Debug, Clone)]
pub struct OverlayResult {
    pub image: RawImage,
    pub lines: Vec<OcrLine>,
    pub translated_text: String,
    pub target_lang: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> RawImage {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        RawImage { data, width, height }
    }

    #[test]
    fn png_keeps_pixels() {
        let image = checker(8, 6);
        let png = image.encode_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (8, 6));
        assert_eq!(decoded.into_raw(), image.data);
    }

    #[test]
    fn short_buffer_does_not_encode() {
        let bad = RawImage {
            data: vec![0; 10],
            width: 4,
            height: 4,
        };
        assert!(bad.encode_png().is_err());
    }
}
