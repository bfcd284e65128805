pub mod grouping;
pub mod hotkey;
pub mod layout;
pub mod render;
pub mod scale;
pub mod state;

pub use grouping::{full_text, group_lines};
pub use layout::{OverlayLayout, layout_overlay};
pub use render::{Renderer, TextMeasure, paint_overlay};
pub use scale::ScaleContext;
