//! Font descriptor for text shapes.

use super::attrs::{AttrKey, Attrs};

/// Font family, weight, and style of a text shape, resolved from its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "Monospace", "JetBrains Mono")
    pub family: String,

    /// Font weight (e.g., "normal", "bold", "light")
    pub weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    pub style: String,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            weight: "normal".to_string(),
            style: "normal".to_string(),
        }
    }
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, weight: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: weight.into(),
            style: style.into(),
        }
    }

    /// Reads `fontFamily`, `fontWeight` and `fontStyle`, falling back to defaults.
    pub fn from_attrs(attrs: &Attrs) -> Self {
        let fallback = Self::default();
        Self {
            family: attrs
                .text(AttrKey::FontFamily)
                .map(str::to_string)
                .unwrap_or(fallback.family),
            weight: attrs
                .text(AttrKey::FontWeight)
                .map(str::to_string)
                .unwrap_or(fallback.weight),
            style: attrs
                .text(AttrKey::FontStyle)
                .map(str::to_string)
                .unwrap_or(fallback.style),
        }
    }

    /// Converts this font descriptor to a Pango font description string.
    ///
    /// Format: "Family Style Weight Size", with normal style and weight omitted.
    /// Sizes are given in pixels.
    pub fn to_pango_string(&self, size: f64) -> String {
        let mut parts = vec![self.family.clone()];

        if !self.style.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.style));
        }

        if !self.weight.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.weight));
        }

        parts.push(format!("{}px", size.round() as i32));

        parts.join(" ")
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
