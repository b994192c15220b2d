//! Axis-aligned bounding boxes.

use super::matrix::Matrix;

/// Axis-aligned bounding box stored by its extents.
///
/// `x`/`y`/`width`/`height` views are derived from the extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    pub fn from_min_max(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every point; `None` for an empty slice.
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = Self::from_min_max(first.0, first.1, first.0, first.1);
        for &(x, y) in rest {
            bbox.include_point(x, y);
        }
        Some(bbox)
    }

    pub fn x(&self) -> f64 {
        self.min_x
    }

    pub fn y(&self) -> f64 {
        self.min_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when the box has a non-zero area. Degenerate boxes contribute
    /// nothing to refresh regions.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    pub fn include_point(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Overlap of two boxes, `None` when they are disjoint.
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x);
        let max_y = self.max_y.min(other.max_y);
        if min_x > max_x || min_y > max_y {
            None
        } else {
            Some(BBox::from_min_max(min_x, min_y, max_x, max_y))
        }
    }

    /// Edge-inclusive overlap test.
    pub fn intersects(&self, other: &BBox) -> bool {
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    /// Grows the box by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> BBox {
        BBox {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }

    /// Bounding box of the four transformed corners.
    pub fn transform(&self, matrix: &Matrix) -> BBox {
        let corners = [
            matrix.apply(self.min_x, self.min_y),
            matrix.apply(self.max_x, self.min_y),
            matrix.apply(self.min_x, self.max_y),
            matrix.apply(self.max_x, self.max_y),
        ];
        let mut out = BBox::from_min_max(corners[0].0, corners[0].1, corners[0].0, corners[0].1);
        for &(x, y) in &corners[1..] {
            out.include_point(x, y);
        }
        out
    }

    /// Expands the box outward to whole pixels.
    pub fn snap_out(&self) -> BBox {
        BBox {
            min_x: self.min_x.floor(),
            min_y: self.min_y.floor(),
            max_x: self.max_x.ceil(),
            max_y: self.max_y.ceil(),
        }
    }

    /// Union of every box in the iterator, `None` when it is empty.
    pub fn merge<I>(boxes: I) -> Option<BBox>
    where
        I: IntoIterator<Item = BBox>,
    {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }
}
