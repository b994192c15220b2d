//! Drawing attributes: a closed set of keys with typed values.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::math::Matrix;
use crate::path::{PathCommand, ResolvedPath, parse_absolute, resolve};
use crate::shape::ArrowSpec;

use super::color::{Color, Paint};

macro_rules! attr_keys {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Every attribute an element understands.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum AttrKey {
            $($variant),*
        }

        impl AttrKey {
            pub const ALL: &'static [AttrKey] = &[$(AttrKey::$variant),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(AttrKey::$variant => $name),*
                }
            }
        }
    };
}

attr_keys! {
    X => "x",
    Y => "y",
    R => "r",
    Rx => "rx",
    Ry => "ry",
    Width => "width",
    Height => "height",
    Radius => "radius",
    X1 => "x1",
    Y1 => "y1",
    X2 => "x2",
    Y2 => "y2",
    Points => "points",
    Path => "path",
    Symbol => "symbol",
    Text => "text",
    FontSize => "fontSize",
    FontFamily => "fontFamily",
    FontWeight => "fontWeight",
    FontStyle => "fontStyle",
    TextAlign => "textAlign",
    TextBaseline => "textBaseline",
    Fill => "fill",
    Stroke => "stroke",
    FillOpacity => "fillOpacity",
    StrokeOpacity => "strokeOpacity",
    Opacity => "opacity",
    LineWidth => "lineWidth",
    LineAppendWidth => "lineAppendWidth",
    LineDash => "lineDash",
    LineCap => "lineCap",
    LineJoin => "lineJoin",
    StartArrow => "startArrow",
    EndArrow => "endArrow",
    Matrix => "matrix",
}

impl fmt::Display for AttrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for attribute names outside the known set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown attribute '{0}'")]
pub struct UnknownAttr(pub String);

impl FromStr for AttrKey {
    type Err = UnknownAttr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttrKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownAttr(s.to_string()))
    }
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Number(f64),
    Text(String),
    Paint(Paint),
    Points(Vec<(f64, f64)>),
    Path(Vec<PathCommand>),
    /// `None` is an explicitly reset transform.
    Matrix(Option<Matrix>),
    Arrow(ArrowSpec),
    Dash(Vec<f64>),
}

impl AttrValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Strings given for paint and path keys are parsed into their typed form.
    /// Unparseable strings are kept as text and ignored when drawing.
    fn coerce(key: AttrKey, value: AttrValue) -> AttrValue {
        match (key, value) {
            (AttrKey::Fill | AttrKey::Stroke, AttrValue::Text(text)) => match text.parse::<Paint>() {
                Ok(paint) => AttrValue::Paint(paint),
                Err(err) => {
                    log::warn!("{key}: {err}");
                    AttrValue::Text(text)
                }
            },
            (AttrKey::Path, AttrValue::Text(text)) => match parse_absolute(&text) {
                Ok(path) => AttrValue::Path(path),
                Err(err) => {
                    log::warn!("{key}: {err}");
                    AttrValue::Text(text)
                }
            },
            (_, value) => value,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Number(f64::from(value))
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<Color> for AttrValue {
    fn from(value: Color) -> Self {
        AttrValue::Paint(Paint::Solid(value))
    }
}

impl From<Paint> for AttrValue {
    fn from(value: Paint) -> Self {
        AttrValue::Paint(value)
    }
}

impl From<Vec<(f64, f64)>> for AttrValue {
    fn from(value: Vec<(f64, f64)>) -> Self {
        AttrValue::Points(value)
    }
}

impl From<Vec<PathCommand>> for AttrValue {
    fn from(value: Vec<PathCommand>) -> Self {
        AttrValue::Path(value)
    }
}

impl From<Matrix> for AttrValue {
    fn from(value: Matrix) -> Self {
        AttrValue::Matrix(Some(value))
    }
}

impl From<Option<Matrix>> for AttrValue {
    fn from(value: Option<Matrix>) -> Self {
        AttrValue::Matrix(value)
    }
}

impl From<ArrowSpec> for AttrValue {
    fn from(value: ArrowSpec) -> Self {
        AttrValue::Arrow(value)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(value: Vec<f64>) -> Self {
        AttrValue::Dash(value)
    }
}

/// Attribute map of one element.
///
/// The resolved form of the `path` attribute is computed on first use and
/// kept until the attribute changes.
#[derive(Debug, Clone, Default)]
pub struct Attrs {
    values: BTreeMap<AttrKey, AttrValue>,
    resolved_path: OnceCell<ResolvedPath>,
}

impl PartialEq for Attrs {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: AttrKey, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Stores a value, returning the previous one.
    pub fn set(&mut self, key: AttrKey, value: impl Into<AttrValue>) -> Option<AttrValue> {
        self.touch(key);
        self.values.insert(key, AttrValue::coerce(key, value.into()))
    }

    pub fn remove(&mut self, key: AttrKey) -> Option<AttrValue> {
        self.touch(key);
        self.values.remove(&key)
    }

    fn touch(&mut self, key: AttrKey) {
        if key == AttrKey::Path {
            self.resolved_path.take();
        }
    }

    pub fn get(&self, key: AttrKey) -> Option<&AttrValue> {
        self.values.get(&key)
    }

    pub fn contains(&self, key: AttrKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = AttrKey> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttrKey, &AttrValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Copies every entry of `other` over this map.
    pub fn merge(&mut self, other: Attrs) {
        for (key, value) in other.values {
            self.touch(key);
            self.values.insert(key, value);
        }
    }

    pub fn number(&self, key: AttrKey) -> Option<f64> {
        self.get(key).and_then(AttrValue::as_number)
    }

    pub fn number_or(&self, key: AttrKey, default: f64) -> f64 {
        self.number(key).unwrap_or(default)
    }

    pub fn text(&self, key: AttrKey) -> Option<&str> {
        match self.get(key)? {
            AttrValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn paint(&self, key: AttrKey) -> Option<&Paint> {
        match self.get(key)? {
            AttrValue::Paint(paint) => Some(paint),
            _ => None,
        }
    }

    pub fn points(&self, key: AttrKey) -> Option<&[(f64, f64)]> {
        match self.get(key)? {
            AttrValue::Points(points) => Some(points),
            _ => None,
        }
    }

    pub fn path(&self) -> Option<&[PathCommand]> {
        match self.get(AttrKey::Path)? {
            AttrValue::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Segments of the `path` attribute, empty when it is missing.
    pub fn resolved_path(&self) -> &ResolvedPath {
        self.resolved_path
            .get_or_init(|| self.path().map(resolve).unwrap_or_default())
    }

    /// The element's own transform; absent and explicitly reset both read as `None`.
    pub fn matrix(&self) -> Option<&Matrix> {
        match self.get(AttrKey::Matrix)? {
            AttrValue::Matrix(matrix) => matrix.as_ref(),
            _ => None,
        }
    }

    pub fn arrow(&self, key: AttrKey) -> Option<&ArrowSpec> {
        match self.get(key)? {
            AttrValue::Arrow(arrow) => Some(arrow),
            _ => None,
        }
    }

    pub fn dash(&self) -> Option<&[f64]> {
        match self.get(AttrKey::LineDash)? {
            AttrValue::Dash(dash) => Some(dash),
            _ => None,
        }
    }

    /// Whether a stroke paint is set.
    pub fn has_stroke(&self) -> bool {
        self.paint(AttrKey::Stroke).is_some()
    }

    /// Whether a fill paint is set.
    pub fn has_fill(&self) -> bool {
        self.paint(AttrKey::Fill).is_some()
    }

    /// Width used for picking: line width plus the extra hit slop, or zero
    /// when nothing is stroked.
    pub fn hit_line_width(&self) -> f64 {
        if !self.has_stroke() {
            return 0.0;
        }
        self.number_or(AttrKey::LineWidth, 1.0) + self.number_or(AttrKey::LineAppendWidth, 0.0)
    }
}

impl FromIterator<(AttrKey, AttrValue)> for Attrs {
    fn from_iter<T: IntoIterator<Item = (AttrKey, AttrValue)>>(iter: T) -> Self {
        let mut attrs = Attrs::new();
        for (key, value) in iter {
            attrs.set(key, value);
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::RED;

    #[test]
    fn keys_round_trip_names() {
        for key in AttrKey::ALL {
            assert_eq!(key.as_str().parse::<AttrKey>().unwrap(), *key);
        }
        assert!("bogus".parse::<AttrKey>().is_err());
    }

    #[test]
    fn paint_strings_are_parsed() {
        let attrs = Attrs::new().with(AttrKey::Fill, "#ff0000");
        assert_eq!(attrs.paint(AttrKey::Fill), Some(&Paint::Solid(RED)));
    }

    #[test]
    fn path_strings_are_parsed() {
        let attrs = Attrs::new().with(AttrKey::Path, "M0 0 L10 10");
        assert_eq!(attrs.path().map(<[_]>::len), Some(2));
    }

    #[test]
    fn resolved_path_follows_path_changes() {
        let mut attrs = Attrs::new().with(AttrKey::Path, "M0 0 L10 10");
        let first: *const ResolvedPath = attrs.resolved_path();
        assert!(std::ptr::eq(first, attrs.resolved_path()));
        assert_eq!(attrs.resolved_path().segments.len(), 2);

        attrs.set(AttrKey::Fill, "#ff0000");
        assert_eq!(attrs.resolved_path().segments.len(), 2);

        attrs.set(AttrKey::Path, "M0 0 L10 0 L10 10 Z");
        assert_eq!(attrs.resolved_path().segments.len(), 4);

        attrs.remove(AttrKey::Path);
        assert!(attrs.resolved_path().is_empty());
    }

    #[test]
    fn bad_paint_stays_text() {
        let attrs = Attrs::new().with(AttrKey::Stroke, "not-a-color");
        assert!(!attrs.has_stroke());
        assert_eq!(attrs.text(AttrKey::Stroke), Some("not-a-color"));
    }

    #[test]
    fn hit_line_width_needs_stroke() {
        let attrs = Attrs::new()
            .with(AttrKey::LineWidth, 4.0)
            .with(AttrKey::LineAppendWidth, 2.0);
        assert_eq!(attrs.hit_line_width(), 0.0);
        let stroked = attrs.with(AttrKey::Stroke, RED);
        assert_eq!(stroked.hit_line_width(), 6.0);
    }

    #[test]
    fn reset_matrix_reads_as_none() {
        let attrs = Attrs::new().with(AttrKey::Matrix, None::<Matrix>);
        assert!(attrs.contains(AttrKey::Matrix));
        assert!(attrs.matrix().is_none());
    }
}
