//! SVG-style path data: parsing, segment resolution, and morph alignment.

pub mod command;
pub mod morph;
pub mod parse;
pub mod segment;

pub use command::{PathCommand, to_path_string};
pub use morph::{align_paths, fill_path, fill_path_by_diff, format_path};
pub use parse::{RawCommand, parse_absolute, parse_path, to_absolute};
pub use segment::{ResolvedPath, Segment, SegmentKind, resolve};
