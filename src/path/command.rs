//! Absolute path commands.

use std::fmt;

/// One absolute path command, mirroring the SVG path grammar.
///
/// Arc rotations are stored in degrees, as written in path data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    HorizontalTo { x: f64 },
    VerticalTo { y: f64 },
    CubicTo { x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64 },
    SmoothCubicTo { x2: f64, y2: f64, x: f64, y: f64 },
    QuadTo { x1: f64, y1: f64, x: f64, y: f64 },
    SmoothQuadTo { x: f64, y: f64 },
    ArcTo {
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    Close,
}

impl PathCommand {
    /// The uppercase SVG command letter.
    pub fn letter(&self) -> char {
        match self {
            PathCommand::MoveTo { .. } => 'M',
            PathCommand::LineTo { .. } => 'L',
            PathCommand::HorizontalTo { .. } => 'H',
            PathCommand::VerticalTo { .. } => 'V',
            PathCommand::CubicTo { .. } => 'C',
            PathCommand::SmoothCubicTo { .. } => 'S',
            PathCommand::QuadTo { .. } => 'Q',
            PathCommand::SmoothQuadTo { .. } => 'T',
            PathCommand::ArcTo { .. } => 'A',
            PathCommand::Close => 'Z',
        }
    }

    /// Number of numeric parameters the command letter takes.
    pub fn arity(letter: char) -> Option<usize> {
        match letter.to_ascii_uppercase() {
            'M' | 'L' | 'T' => Some(2),
            'H' | 'V' => Some(1),
            'C' => Some(6),
            'S' | 'Q' => Some(4),
            'A' => Some(7),
            'Z' => Some(0),
            _ => None,
        }
    }

    /// Numeric parameters in path-data order. Arc flags become 0.0/1.0.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            PathCommand::MoveTo { x, y }
            | PathCommand::LineTo { x, y }
            | PathCommand::SmoothQuadTo { x, y } => vec![x, y],
            PathCommand::HorizontalTo { x } => vec![x],
            PathCommand::VerticalTo { y } => vec![y],
            PathCommand::CubicTo { x1, y1, x2, y2, x, y } => vec![x1, y1, x2, y2, x, y],
            PathCommand::SmoothCubicTo { x2, y2, x, y } => vec![x2, y2, x, y],
            PathCommand::QuadTo { x1, y1, x, y } => vec![x1, y1, x, y],
            PathCommand::ArcTo {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                x,
                y,
            } => vec![
                rx,
                ry,
                rotation,
                f64::from(u8::from(large_arc)),
                f64::from(u8::from(sweep)),
                x,
                y,
            ],
            PathCommand::Close => Vec::new(),
        }
    }

    /// Builds a command from an uppercase letter and its parameters.
    pub fn from_parts(letter: char, p: &[f64]) -> Option<PathCommand> {
        if p.len() < Self::arity(letter)? {
            return None;
        }
        Some(match letter.to_ascii_uppercase() {
            'M' => PathCommand::MoveTo { x: p[0], y: p[1] },
            'L' => PathCommand::LineTo { x: p[0], y: p[1] },
            'H' => PathCommand::HorizontalTo { x: p[0] },
            'V' => PathCommand::VerticalTo { y: p[0] },
            'C' => PathCommand::CubicTo {
                x1: p[0],
                y1: p[1],
                x2: p[2],
                y2: p[3],
                x: p[4],
                y: p[5],
            },
            'S' => PathCommand::SmoothCubicTo {
                x2: p[0],
                y2: p[1],
                x: p[2],
                y: p[3],
            },
            'Q' => PathCommand::QuadTo {
                x1: p[0],
                y1: p[1],
                x: p[2],
                y: p[3],
            },
            'T' => PathCommand::SmoothQuadTo { x: p[0], y: p[1] },
            'A' => PathCommand::ArcTo {
                rx: p[0],
                ry: p[1],
                rotation: p[2],
                large_arc: p[3] != 0.0,
                sweep: p[4] != 0.0,
                x: p[5],
                y: p[6],
            },
            _ => PathCommand::Close,
        })
    }

    /// End point of the command, when it carries one explicitly.
    pub fn end_point(&self) -> Option<(f64, f64)> {
        match *self {
            PathCommand::MoveTo { x, y }
            | PathCommand::LineTo { x, y }
            | PathCommand::CubicTo { x, y, .. }
            | PathCommand::SmoothCubicTo { x, y, .. }
            | PathCommand::QuadTo { x, y, .. }
            | PathCommand::SmoothQuadTo { x, y }
            | PathCommand::ArcTo { x, y, .. } => Some((x, y)),
            PathCommand::HorizontalTo { .. } | PathCommand::VerticalTo { .. } | PathCommand::Close => None,
        }
    }

    /// Interpolates parameters toward `other` when both share a letter.
    ///
    /// Arc flags cannot be blended and take the target's value.
    pub fn lerp(&self, other: &PathCommand, t: f64) -> Option<PathCommand> {
        if self.letter() != other.letter() {
            return None;
        }
        let from = self.params();
        let to = other.params();
        let mixed: Vec<f64> = from
            .iter()
            .zip(to.iter())
            .enumerate()
            .map(|(i, (a, b))| {
                if other.letter() == 'A' && (i == 3 || i == 4) {
                    *b
                } else {
                    a + (b - a) * t
                }
            })
            .collect();
        PathCommand::from_parts(other.letter(), &mixed)
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())?;
        for value in self.params() {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

/// Formats commands back into path data.
pub fn to_path_string(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_and_parts_agree() {
        let arc = PathCommand::ArcTo {
            rx: 5.0,
            ry: 6.0,
            rotation: 30.0,
            large_arc: true,
            sweep: false,
            x: 1.0,
            y: 2.0,
        };
        assert_eq!(PathCommand::from_parts('A', &arc.params()), Some(arc));
    }

    #[test]
    fn lerp_requires_matching_letters() {
        let a = PathCommand::LineTo { x: 0.0, y: 0.0 };
        let b = PathCommand::LineTo { x: 10.0, y: 20.0 };
        assert_eq!(a.lerp(&b, 0.5), Some(PathCommand::LineTo { x: 5.0, y: 10.0 }));
        assert_eq!(a.lerp(&PathCommand::MoveTo { x: 1.0, y: 1.0 }, 0.5), None);
    }

    #[test]
    fn display_round_trips_letters() {
        let path = [PathCommand::MoveTo { x: 1.0, y: 2.0 }, PathCommand::Close];
        assert_eq!(to_path_string(&path), "M 1 2 Z");
    }
}
