/// Canvas smaller than this (in either dimension) is not drawn on
pub const MIN_CANVAS_SIZE: u32 = 10;

/// Maps source-image pixels onto the destination canvas.
///
/// `width`/`height` are the size of the scaled image on the canvas and
/// `origin_*` its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleContext {
    pub ratio: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScaleContext {
    /// Fit an image into a canvas preserving aspect ratio, centred.
    ///
    /// Returns `None` when the canvas is too small or the image is empty.
    pub fn fit(image_width: u32, image_height: u32, canvas_width: u32, canvas_height: u32) -> Option<Self> {
        if canvas_width < MIN_CANVAS_SIZE || canvas_height < MIN_CANVAS_SIZE {
            return None;
        }
        if image_width == 0 || image_height == 0 {
            return None;
        }

        let ratio_w = canvas_width as f32 / image_width as f32;
        let ratio_h = canvas_height as f32 / image_height as f32;
        let ratio = ratio_w.min(ratio_h);

        let new_width = (image_width as f32 * ratio) as u32;
        let new_height = (image_height as f32 * ratio) as u32;

        let origin_x = canvas_width.saturating_sub(new_width) / 2;
        let origin_y = canvas_height.saturating_sub(new_height) / 2;

        Some(Self {
            ratio,
            origin_x: origin_x as f32,
            origin_y: origin_y as f32,
            width: new_width as f32,
            height: new_height as f32,
        })
    }

    /// Identity mapping for an image drawn at its own size
    pub fn identity(image_width: u32, image_height: u32) -> Self {
        Self {
            ratio: 1.0,
            origin_x: 0.0,
            origin_y: 0.0,
            width: image_width as f32,
            height: image_height as f32,
        }
    }

    pub fn x(&self, source_x: i32) -> f32 {
        source_x as f32 * self.ratio + self.origin_x
    }

    pub fn y(&self, source_y: i32) -> f32 {
        source_y as f32 * self.ratio + self.origin_y
    }

    pub fn length(&self, source_len: i32) -> f32 {
        source_len as f32 * self.ratio
    }
}
