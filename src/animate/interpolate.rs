//! Value-kind-aware attribute interpolation.

use crate::draw::attrs::{AttrKey, AttrValue, Attrs};
use crate::draw::color::Paint;
use crate::math::Matrix;
use crate::path::{PathCommand, align_paths};

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Value between `from` and `to` at eased progress `t`.
///
/// Values with no defined blend (text, arrows, gradients, mismatched kinds,
/// or no start value at all) snap to `to`.
pub fn interpolate(from: Option<&AttrValue>, to: &AttrValue, t: f64) -> AttrValue {
    let Some(from) = from else {
        return to.clone();
    };
    match (from, to) {
        (AttrValue::Number(a), AttrValue::Number(b)) => AttrValue::Number(lerp(*a, *b, t)),
        (AttrValue::Paint(a), AttrValue::Paint(b)) => match (a.as_color(), b.as_color()) {
            (Some(a), Some(b)) => AttrValue::Paint(Paint::Solid(a.lerp(&b, t))),
            _ => to.clone(),
        },
        (AttrValue::Matrix(a), AttrValue::Matrix(b)) => {
            let a = a.unwrap_or(Matrix::IDENTITY);
            let b = b.unwrap_or(Matrix::IDENTITY);
            AttrValue::Matrix(Some(a.lerp(&b, t)))
        }
        (AttrValue::Path(a), AttrValue::Path(b)) => match lerp_path(a, b, t) {
            Some(path) => AttrValue::Path(path),
            None => to.clone(),
        },
        (AttrValue::Points(a), AttrValue::Points(b)) => AttrValue::Points(lerp_points(a, b, t)),
        (AttrValue::Dash(a), AttrValue::Dash(b)) => {
            let dash = b
                .iter()
                .enumerate()
                .map(|(i, end)| lerp(a.get(i).copied().unwrap_or(*end), *end, t))
                .collect();
            AttrValue::Dash(dash)
        }
        _ => to.clone(),
    }
}

/// Blends every key of `to` against its start value in `from`.
pub fn interpolate_attrs(from: &Attrs, to: &Attrs, t: f64) -> Attrs {
    to.iter()
        .map(|(key, end)| (key, interpolate(from.get(key), end, t)))
        .collect()
}

/// Command-wise blend; `None` when the paths are not aligned.
fn lerp_path(from: &[PathCommand], to: &[PathCommand], t: f64) -> Option<Vec<PathCommand>> {
    if from.len() != to.len() {
        return None;
    }
    from.iter().zip(to).map(|(a, b)| a.lerp(b, t)).collect()
}

/// Point-wise blend; the shorter list is padded with its last point.
fn lerp_points(from: &[(f64, f64)], to: &[(f64, f64)], t: f64) -> Vec<(f64, f64)> {
    let len = from.len().max(to.len());
    let pick = |points: &[(f64, f64)], i: usize| points.get(i).or(points.last()).copied();
    (0..len)
        .filter_map(|i| {
            let end = pick(to, i)?;
            let start = pick(from, i).unwrap_or(end);
            Some((lerp(start.0, end.0, t), lerp(start.1, end.1, t)))
        })
        .collect()
}

/// Rewrites the start path of a morph so it lines up command for command
/// with the end path. Other keys are left alone.
pub fn prepare_from_attrs(from: &mut Attrs, to: &Attrs) {
    let (Some(start), Some(end)) = (from.path(), to.path()) else {
        return;
    };
    let misaligned =
        start.len() != end.len() || start.iter().zip(end).any(|(a, b)| a.letter() != b.letter());
    if misaligned {
        let aligned = align_paths(start, end);
        from.set(AttrKey::Path, aligned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLUE, Color, ColorStop, RED};
    use crate::path::parse_absolute;

    #[test]
    fn numbers_blend_linearly() {
        let value = interpolate(Some(&AttrValue::Number(50.0)), &AttrValue::Number(100.0), 0.5);
        assert_eq!(value, AttrValue::Number(75.0));
    }

    #[test]
    fn missing_start_snaps_to_end() {
        assert_eq!(interpolate(None, &AttrValue::Number(9.0), 0.1), AttrValue::Number(9.0));
    }

    #[test]
    fn solid_colors_blend_per_channel() {
        let value = interpolate(Some(&RED.into()), &BLUE.into(), 0.5);
        assert_eq!(value, AttrValue::Paint(Paint::Solid(Color::new(0.5, 0.0, 0.5, 1.0))));
    }

    #[test]
    fn gradients_snap() {
        let gradient = Paint::Linear {
            angle: 0.0,
            stops: vec![
                ColorStop {
                    offset: 0.0,
                    color: RED,
                },
                ColorStop {
                    offset: 1.0,
                    color: BLUE,
                },
            ],
        };
        let end = AttrValue::Paint(gradient);
        assert_eq!(interpolate(Some(&RED.into()), &end, 0.1), end);
    }

    #[test]
    fn missing_matrix_reads_as_identity() {
        let end = AttrValue::Matrix(Some(Matrix::translation(10.0, 20.0)));
        let value = interpolate(Some(&AttrValue::Matrix(None)), &end, 0.5);
        assert_eq!(value, AttrValue::Matrix(Some(Matrix::translation(5.0, 10.0))));
    }

    #[test]
    fn point_lists_pad_with_last_point() {
        let from = AttrValue::Points(vec![(0.0, 0.0)]);
        let to = AttrValue::Points(vec![(10.0, 0.0), (20.0, 10.0)]);
        assert_eq!(
            interpolate(Some(&from), &to, 0.5),
            AttrValue::Points(vec![(5.0, 0.0), (10.0, 5.0)])
        );
    }

    #[test]
    fn dashes_blend_element_wise() {
        let value = interpolate(Some(&AttrValue::Dash(vec![2.0])), &AttrValue::Dash(vec![4.0, 6.0]), 0.5);
        assert_eq!(value, AttrValue::Dash(vec![3.0, 6.0]));
    }

    #[test]
    fn text_snaps() {
        let end = AttrValue::Text("b".into());
        assert_eq!(interpolate(Some(&AttrValue::Text("a".into())), &end, 0.5), end);
    }

    #[test]
    fn aligned_paths_blend_command_wise() {
        let mut from = Attrs::new().with(AttrKey::Path, "M0 0 L10 0");
        let to = Attrs::new().with(AttrKey::Path, "M0 0 L10 0 L10 10 L0 10");
        prepare_from_attrs(&mut from, &to);
        assert_eq!(from.path().map(<[_]>::len), to.path().map(<[_]>::len));

        let mid = interpolate_attrs(&from, &to, 1.0);
        let end = parse_absolute("M0 0 L10 0 L10 10 L0 10").unwrap();
        assert_eq!(mid.path(), Some(end.as_slice()));
    }
}
