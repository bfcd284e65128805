mod capture;
mod error;
mod hotkey;
mod tesseract;
mod tsv;

pub use capture::{
    MIN_REGION_SIZE, capture_primary_screen, capture_screen_region, crop, load_image,
    validate_region,
};
pub use error::OcrError;
pub use hotkey::{HotkeyManager, to_global};
pub use tesseract::{OcrEngine, TesseractEngine};
pub use tsv::parse_words;
