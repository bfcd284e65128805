use std::fmt;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use ttf_parser::{Face, name_id};

/// Family stack for overlay text, most preferred first
pub const OVERLAY_FONTS: &[&str] = &["Malgun Gothic", "Noto Sans CJK KR", "Noto Sans", "sans-serif"];

const GENERIC_FAMILIES: &[&str] = &["sans-serif", "serif", "monospace"];

/// CSS `font-family` value for a family stack
pub fn css_family_list(families: &[&str]) -> String {
    families
        .iter()
        .map(|name| {
            if GENERIC_FAMILIES.contains(name) {
                (*name).to_string()
            } else {
                format!("'{name}'")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// A parsed font file used to read real glyph advances
#[derive(Clone)]
pub struct FontFace {
    data: Arc<Vec<u8>>,
    face_index: u32,
    units_per_em: u16,
    space_advance: u16,
    family: Option<String>,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("face_index", &self.face_index)
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl FontFace {
    pub fn from_data(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let (units_per_em, space_advance, family) = {
            let face = Face::parse(&data, face_index)
                .map_err(|e| anyhow!("Failed to parse font face {face_index}: {e}"))?;
            let units_per_em = face.units_per_em().max(1);
            let space_advance = face
                .glyph_index(' ')
                .and_then(|id| face.glyph_hor_advance(id))
                .unwrap_or(units_per_em / 2);
            (units_per_em, space_advance, family_name(&face))
        };

        Ok(Self {
            data: Arc::new(data),
            face_index,
            units_per_em,
            space_advance,
            family,
        })
    }

    /// First installed font matching `families`, in order. Generic names
    /// (`sans-serif`, `serif`, `monospace`) map to fontdb's generic families
    pub fn resolve(families: &[&str]) -> Result<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let query_families: Vec<fontdb::Family<'_>> = families
            .iter()
            .map(|name| match *name {
                "sans-serif" => fontdb::Family::SansSerif,
                "serif" => fontdb::Family::Serif,
                "monospace" => fontdb::Family::Monospace,
                other => fontdb::Family::Name(other),
            })
            .collect();
        let query = fontdb::Query {
            families: &query_families,
            weight: fontdb::Weight::BOLD,
            ..Default::default()
        };

        let id = db
            .query(&query)
            .ok_or_else(|| anyhow!("No installed font among {}", families.join(", ")))?;
        let (data, face_index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| anyhow!("Failed to load font data"))?;

        Self::from_data(data, face_index)
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    /// Horizontal advance of each character in em. `None` where the face has no glyph
    pub fn advances_em(&self, text: &str) -> Vec<Option<f32>> {
        let Ok(face) = Face::parse(&self.data, self.face_index) else {
            return vec![None; text.chars().count()];
        };
        let units = f32::from(self.units_per_em);

        text.chars()
            .map(|ch| {
                if ch == ' ' {
                    return Some(f32::from(self.space_advance) / units);
                }
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map(|advance| f32::from(advance) / units)
            })
            .collect()
    }
}

fn family_name(face: &Face<'_>) -> Option<String> {
    let mut fallback = None;
    for name in face.names() {
        if name.name_id == name_id::TYPOGRAPHIC_FAMILY {
            if let Some(value) = name.to_string() {
                return Some(value);
            }
        } else if name.name_id == name_id::FAMILY && fallback.is_none() {
            fallback = name.to_string();
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_named_families_only() {
        assert_eq!(
            css_family_list(OVERLAY_FONTS),
            "'Malgun Gothic', 'Noto Sans CJK KR', 'Noto Sans', sans-serif"
        );
    }

    #[test]
    fn garbage_is_not_a_font() {
        assert!(FontFace::from_data(vec![0; 64], 0).is_err());
        assert!(FontFace::from_data(Vec::new(), 0).is_err());
    }

    #[test]
    fn installed_fonts_report_shape_dependent_advances() {
        // Only meaningful where a system font is installed
        let Ok(font) = FontFace::resolve(&["DejaVu Sans", "Liberation Sans", "Arial", "sans-serif"])
        else {
            return;
        };

        let advances = font.advances_em("Wi ");
        assert_eq!(advances.len(), 3);
        let (w, i) = (advances[0].unwrap(), advances[1].unwrap());
        assert!(w > i, "W ({w}) should be wider than i ({i})");
        assert!(advances[2].is_some());
    }
}
