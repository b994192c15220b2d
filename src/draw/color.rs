//! Colors and paints: solid RGBA plus linear and radial gradients.
//!
//! Paint strings follow the compact gradient notation:
//! - `l(<angle>) <offset>:<color> ...` for a linear gradient across the bbox
//! - `r(<fx>,<fy>,<fr>) <offset>:<color> ...` for a radial gradient

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use crate::math::BBox;

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use trellis::draw::Color;
/// let red: Color = "#ff0000".parse().unwrap();
/// assert_eq!(red, Color::new(1.0, 0.0, 0.0, 1.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from 0-255 channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0, 1.0)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Channel-wise linear interpolation, alpha included.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Looks up a CSS-style color keyword.
    pub fn from_name(name: &str) -> Option<Color> {
        let color = match name.trim().to_ascii_lowercase().as_str() {
            "red" => RED,
            "green" => GREEN,
            "blue" => BLUE,
            "yellow" => YELLOW,
            "orange" => ORANGE,
            "pink" | "magenta" => PINK,
            "white" => WHITE,
            "black" => BLACK,
            "gray" | "grey" => Color::new(0.5, 0.5, 0.5, 1.0),
            "transparent" => TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }
}

/// Error returned when a color or paint string cannot be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid color '{0}'")]
pub struct ColorParseError(pub String);

fn hex_digit(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let bytes = hex.as_bytes();
    let channel = |i: usize| Some(hex_digit(bytes[i])? * 16 + hex_digit(bytes[i + 1])?);
    match bytes.len() {
        3 => {
            let r = hex_digit(bytes[0])?;
            let g = hex_digit(bytes[1])?;
            let b = hex_digit(bytes[2])?;
            Some(Color::from_rgb8(r * 17, g * 17, b * 17))
        }
        6 => Some(Color::from_rgb8(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color::from_rgb8(channel(0)?, channel(2)?, channel(4)?).with_alpha(channel(6)? as f64 / 255.0)),
        _ => None,
    }
}

fn parse_functional(input: &str) -> Option<Color> {
    let (name, rest) = input.split_once('(')?;
    let body = rest.strip_suffix(')')?;
    let values: Vec<f64> = body
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match (name.trim(), values.as_slice()) {
        ("rgb", [r, g, b]) => Some(Color::new(r / 255.0, g / 255.0, b / 255.0, 1.0)),
        ("rgba", [r, g, b, a]) => Some(Color::new(r / 255.0, g / 255.0, b / 255.0, a.clamp(0.0, 1.0))),
        _ => None,
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = if let Some(hex) = trimmed.strip_prefix('#') {
            parse_hex(hex)
        } else if trimmed.contains('(') {
            parse_functional(&trimmed.to_ascii_lowercase())
        } else {
            Color::from_name(trimmed)
        };
        parsed.ok_or_else(|| ColorParseError(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let to8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(f, "rgba({}, {}, {}, {})", to8(self.r), to8(self.g), to8(self.b), self.a)
    }
}

pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);
pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0, 1.0);
pub const ORANGE: Color = Color::new(1.0, 0.5, 0.0, 1.0);
pub const PINK: Color = Color::new(1.0, 0.0, 1.0, 1.0);
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

/// One gradient stop: offset in `[0, 1]` and its color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

/// Fill or stroke paint.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Angle in degrees, measured from the +x axis toward +y.
    Linear { angle: f64, stops: Vec<ColorStop> },
    /// Focal point and focal radius, relative to the element bbox.
    Radial {
        fx: f64,
        fy: f64,
        fr: f64,
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    pub fn is_gradient(&self) -> bool {
        !matches!(self, Paint::Solid(_))
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Paint::Solid(color) => Some(*color),
            _ => None,
        }
    }

    /// Sets this paint as the Cairo source, resolving gradients against `bbox`.
    pub fn set_source(&self, ctx: &cairo::Context, bbox: &BBox, opacity: f64) -> Result<(), cairo::Error> {
        match self {
            Paint::Solid(color) => {
                ctx.set_source_rgba(color.r, color.g, color.b, color.a * opacity);
                Ok(())
            }
            Paint::Linear { angle, stops } => {
                let ((x0, y0), (x1, y1)) = linear_endpoints(*angle, bbox);
                let gradient = cairo::LinearGradient::new(x0, y0, x1, y1);
                for stop in stops {
                    let c = stop.color;
                    gradient.add_color_stop_rgba(stop.offset, c.r, c.g, c.b, c.a * opacity);
                }
                ctx.set_source(&gradient)
            }
            Paint::Radial { fx, fy, fr, stops } => {
                let w = bbox.width();
                let h = bbox.height();
                let r = (w * w + h * h).sqrt() / 2.0;
                let gradient = cairo::RadialGradient::new(
                    bbox.min_x + w * fx,
                    bbox.min_y + h * fy,
                    fr * r,
                    bbox.min_x + w / 2.0,
                    bbox.min_y + h / 2.0,
                    r,
                );
                for stop in stops {
                    let c = stop.color;
                    gradient.add_color_stop_rgba(stop.offset, c.r, c.g, c.b, c.a * opacity);
                }
                ctx.set_source(&gradient)
            }
        }
    }
}

/// Gradient axis for an angle: starts at the bbox corner opposite the
/// direction and ends at the projection of the far corner onto that direction.
fn linear_endpoints(angle_degrees: f64, bbox: &BBox) -> ((f64, f64), (f64, f64)) {
    let angle = (angle_degrees % 360.0).to_radians().rem_euclid(2.0 * PI);
    let (start, end) = if angle < FRAC_PI_2 {
        ((bbox.min_x, bbox.min_y), (bbox.max_x, bbox.max_y))
    } else if angle < PI {
        ((bbox.max_x, bbox.min_y), (bbox.min_x, bbox.max_y))
    } else if angle < PI + FRAC_PI_2 {
        ((bbox.max_x, bbox.max_y), (bbox.min_x, bbox.min_y))
    } else {
        ((bbox.min_x, bbox.max_y), (bbox.max_x, bbox.min_y))
    };
    let tan = angle.tan();
    let tan2 = tan * tan;
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let x = (dx + tan * dy) / (tan2 + 1.0) + start.0;
    let y = tan * (dx + tan * dy) / (tan2 + 1.0) + start.1;
    (start, (x, y))
}

fn parse_stops(text: &str) -> Option<Vec<ColorStop>> {
    text.split_whitespace()
        .map(|token| {
            let (offset, color) = token.split_once(':')?;
            Some(ColorStop {
                offset: offset.parse::<f64>().ok()?.clamp(0.0, 1.0),
                color: color.parse().ok()?,
            })
        })
        .collect()
}

impl FromStr for Paint {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ColorParseError(s.to_string());
        let gradient_head = |prefix: &str| -> Option<(Vec<f64>, Vec<ColorStop>)> {
            let rest = trimmed.strip_prefix(prefix)?.strip_prefix('(')?;
            let (args, stops) = rest.split_once(')')?;
            let args = args
                .split(',')
                .map(|a| a.trim().parse::<f64>().ok())
                .collect::<Option<Vec<_>>>()?;
            Some((args, parse_stops(stops)?))
        };

        if trimmed.starts_with("l(") || trimmed.starts_with("L(") {
            let (args, stops) = gradient_head("l").or_else(|| gradient_head("L")).ok_or_else(err)?;
            let [angle] = args.as_slice() else {
                return Err(err());
            };
            return Ok(Paint::Linear { angle: *angle, stops });
        }
        if trimmed.starts_with("r(") || trimmed.starts_with("R(") {
            let (args, stops) = gradient_head("r").or_else(|| gradient_head("R")).ok_or_else(err)?;
            let [fx, fy, fr] = args.as_slice() else {
                return Err(err());
            };
            return Ok(Paint::Radial {
                fx: *fx,
                fy: *fy,
                fr: *fr,
                stops,
            });
        }
        trimmed.parse::<Color>().map(Paint::Solid)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}
