mod font;
mod metrics;
mod report;
mod svg;

pub use font::{FontFace, OVERLAY_FONTS};
pub use metrics::GlyphMetrics;
pub use report::{error_report, text_report};
pub use svg::SvgCanvas;
