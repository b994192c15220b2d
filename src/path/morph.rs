//! Aligning two paths so they can be interpolated command by command.

use crate::geometry::bezier::split_cubic;

use super::command::PathCommand;

type Point = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Edit {
    Add,
    Del,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    cost: usize,
    edit: Option<Edit>,
}

/// Edit-distance table between two command lists. Equal commands cost
/// nothing; substitutions cost one and carry no edit marker.
fn levenshtein(source: &[PathCommand], target: &[PathCommand]) -> Vec<Vec<Cell>> {
    let rows = source.len() + 1;
    let cols = target.len() + 1;
    let mut table = vec![vec![Cell { cost: 0, edit: None }; cols]; rows];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = Cell { cost: i, edit: None };
    }
    for j in 0..cols {
        table[0][j] = Cell { cost: j, edit: None };
    }
    for i in 1..rows {
        for j in 1..cols {
            if source[i - 1] == target[j - 1] {
                table[i][j] = Cell {
                    cost: table[i - 1][j - 1].cost,
                    edit: None,
                };
                continue;
            }
            let del = table[i - 1][j].cost + 1;
            let add = table[i][j - 1].cost + 1;
            let modify = table[i - 1][j - 1].cost + 1;
            table[i][j] = if modify <= del && modify <= add {
                Cell { cost: modify, edit: None }
            } else if del <= add {
                Cell {
                    cost: del,
                    edit: Some(Edit::Del),
                }
            } else {
                Cell {
                    cost: add,
                    edit: Some(Edit::Add),
                }
            };
        }
    }
    table
}

/// Inserts and deletes commands in `source` so it lines up with `target`.
///
/// Commands are duplicated or dropped along the cheapest edit path; the tail
/// is then padded, duplicating before a trailing close so it stays last.
pub fn fill_path_by_diff(source: &[PathCommand], target: &[PathCommand]) -> Vec<PathCommand> {
    let mut out = source.to_vec();
    if source.is_empty() || target.is_empty() {
        return out;
    }
    let table = levenshtein(source, target);
    let source_len = source.len();
    let target_len = target.len();

    if table[source_len][target_len].cost != source_len {
        let mut changes = Vec::new();
        let mut column = 1;
        for i in 1..=source_len {
            // Rows longer than the target start scanning from its last column.
            let start = i.min(target_len);
            let mut best = table[i][start].cost;
            let mut best_column = start;
            for j in column..=target_len {
                if table[i][j].cost < best {
                    best = table[i][j].cost;
                    best_column = j;
                }
            }
            column = best_column;
            if let Some(edit) = table[i][column].edit {
                changes.push((i - 1, edit));
            }
        }
        for (index, edit) in changes.into_iter().rev() {
            match edit {
                Edit::Add => {
                    let command = out[index];
                    out.insert(index, command);
                }
                Edit::Del => {
                    out.remove(index);
                }
            }
        }
    }

    while !out.is_empty() && out.len() < target_len {
        let len = out.len();
        if out[len - 1] == PathCommand::Close && len >= 2 {
            let command = out[len - 2];
            out.insert(len - 2, command);
        } else {
            out.push(out[len - 1]);
        }
    }
    out
}

/// Expands H and V into absolute linetos so every command has an endpoint.
pub fn expand_axis_lines(commands: &[PathCommand]) -> Vec<PathCommand> {
    let mut current = (0.0, 0.0);
    let mut start = (0.0, 0.0);
    commands
        .iter()
        .map(|command| {
            let expanded = match *command {
                PathCommand::HorizontalTo { x } => PathCommand::LineTo { x, y: current.1 },
                PathCommand::VerticalTo { y } => PathCommand::LineTo { x: current.0, y },
                other => other,
            };
            match expanded {
                PathCommand::MoveTo { x, y } => {
                    current = (x, y);
                    start = (x, y);
                }
                PathCommand::Close => current = start,
                other => {
                    if let Some(point) = other.end_point() {
                        current = point;
                    }
                }
            }
            expanded
        })
        .collect()
}

fn control_points(command: &PathCommand) -> Vec<Point> {
    match *command {
        PathCommand::MoveTo { x, y }
        | PathCommand::LineTo { x, y }
        | PathCommand::SmoothQuadTo { x, y }
        | PathCommand::ArcTo { x, y, .. } => vec![(x, y)],
        PathCommand::QuadTo { x1, y1, x, y } => vec![(x1, y1), (x, y)],
        PathCommand::SmoothCubicTo { x2, y2, x, y } => vec![(x2, y2), (x, y)],
        PathCommand::CubicTo { x1, y1, x2, y2, x, y } => vec![(x1, y1), (x2, y2), (x, y)],
        PathCommand::HorizontalTo { .. } | PathCommand::VerticalTo { .. } | PathCommand::Close => Vec::new(),
    }
}

fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

/// Rewrites each command of `from` into the letter used at the same index in
/// `to`, keeping `from`'s geometry. Indices past the end of `from` are left
/// to the interpolator.
pub fn format_path(from: &[PathCommand], to: &[PathCommand]) -> Vec<PathCommand> {
    let mut out = Vec::with_capacity(from.len());
    let mut previous: Point = (0.0, 0.0);
    for (index, command) in from.iter().enumerate() {
        let Some(target) = to.get(index) else {
            out.push(*command);
            continue;
        };
        let points = control_points(command);
        let converted = if command.letter() == target.letter() {
            *command
        } else {
            convert(command, &points, target, previous)
        };
        if let Some(end) = points.last() {
            previous = *end;
        }
        out.push(converted);
    }
    out
}

fn convert(command: &PathCommand, points: &[Point], target: &PathCommand, previous: Point) -> PathCommand {
    let Some(&end) = points.last() else {
        return *target;
    };
    match *target {
        PathCommand::MoveTo { .. } => PathCommand::MoveTo { x: end.0, y: end.1 },
        PathCommand::LineTo { .. } => PathCommand::LineTo { x: end.0, y: end.1 },
        PathCommand::SmoothQuadTo { .. } => PathCommand::SmoothQuadTo { x: end.0, y: end.1 },
        PathCommand::HorizontalTo { .. } => PathCommand::HorizontalTo { x: end.0 },
        PathCommand::VerticalTo { .. } => PathCommand::VerticalTo { y: end.1 },
        PathCommand::ArcTo {
            rx,
            ry,
            rotation,
            large_arc,
            sweep,
            ..
        } => PathCommand::ArcTo {
            rx,
            ry,
            rotation,
            large_arc,
            sweep,
            x: end.0,
            y: end.1,
        },
        PathCommand::QuadTo { .. } | PathCommand::SmoothCubicTo { .. } => {
            let control = if points.len() >= 2 {
                points[points.len() - 2]
            } else {
                lerp_point(previous, end, 0.5)
            };
            PathCommand::from_parts(target.letter(), &[control.0, control.1, end.0, end.1])
                .unwrap_or(*target)
        }
        PathCommand::CubicTo { .. } => {
            let (c1, c2) = match (points.len(), command) {
                (3.., _) => (points[0], points[1]),
                (2, PathCommand::QuadTo { .. }) => {
                    let q = points[0];
                    (lerp_point(previous, q, 2.0 / 3.0), lerp_point(end, q, 2.0 / 3.0))
                }
                (2, _) => (lerp_point(previous, end, 1.0 / 3.0), points[0]),
                _ => (lerp_point(previous, end, 1.0 / 3.0), lerp_point(previous, end, 2.0 / 3.0)),
            };
            PathCommand::CubicTo {
                x1: c1.0,
                y1: c1.1,
                x2: c2.0,
                y2: c2.1,
                x: end.0,
                y: end.1,
            }
        }
        PathCommand::Close => PathCommand::Close,
    }
}

/// Brings `from` to the same command count and letters as `to`.
///
/// Returns the aligned source; the target needs no changes.
pub fn align_paths(from: &[PathCommand], to: &[PathCommand]) -> Vec<PathCommand> {
    let from = expand_axis_lines(from);
    if is_cubic_only(&from) && is_cubic_only(to) && from.len() < to.len() {
        return fill_path(&from, to);
    }
    let filled = fill_path_by_diff(&from, to);
    format_path(&filled, to)
}

fn is_cubic_only(commands: &[PathCommand]) -> bool {
    matches!(commands.first(), Some(PathCommand::MoveTo { .. }))
        && commands[1..]
            .iter()
            .all(|c| matches!(c, PathCommand::CubicTo { .. } | PathCommand::Close))
}

/// Subdivides the cubics of `source` until it has as many curves as `target`.
///
/// Both paths must be a moveto followed by cubics, optionally closed.
pub fn fill_path(source: &[PathCommand], target: &[PathCommand]) -> Vec<PathCommand> {
    let curves = |path: &[PathCommand]| {
        path.iter()
            .filter(|c| matches!(c, PathCommand::CubicTo { .. }))
            .count()
    };
    let source_curves = curves(source);
    let target_curves = curves(target);
    let Some(&head) = source.first() else {
        return Vec::new();
    };
    if source_curves == 0 || target_curves <= source_curves {
        return source.to_vec();
    }

    let mut counts = vec![0usize; source_curves];
    let ratio = source_curves as f64 / target_curves as f64;
    for i in 0..target_curves {
        let index = ((ratio * i as f64).floor() as usize).min(source_curves - 1);
        counts[index] += 1;
    }

    let mut out = vec![head];
    let mut current = head.end_point().unwrap_or((0.0, 0.0));
    let mut curve_index = 0;
    for command in &source[1..] {
        let PathCommand::CubicTo { x1, y1, x2, y2, x, y } = *command else {
            continue;
        };
        let mut rest = [current, (x1, y1), (x2, y2), (x, y)];
        let pieces = counts[curve_index].max(1);
        for piece in 0..pieces {
            let remaining = pieces - piece;
            let (left, right) = if remaining == 1 {
                (rest, rest)
            } else {
                split_cubic(rest, 1.0 / remaining as f64)
            };
            out.push(PathCommand::CubicTo {
                x1: left[1].0,
                y1: left[1].1,
                x2: left[2].0,
                y2: left[2].1,
                x: left[3].0,
                y: left[3].1,
            });
            rest = right;
        }
        current = (x, y);
        curve_index += 1;
    }
    if target.last() == Some(&PathCommand::Close) || source.last() == Some(&PathCommand::Close) {
        out.push(PathCommand::Close);
    }
    out
}
