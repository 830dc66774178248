//! Running axis-aligned extent of visited points.

use glam::DVec2;

/// An axis-aligned box with `min <= max` on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BoundingBox {
    pub fn from_point(point: DVec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    pub fn union_point(self, point: DVec2) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Grows the box by `margin` on every side.
    pub fn inflate(self, margin: f64) -> Self {
        Self {
            min: self.min - DVec2::splat(margin),
            max: self.max + DVec2::splat(margin),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Folds points into a min/max box.
///
/// Starts empty; [`rect`](Self::rect) returns `None` until the first point is observed.
/// After that `min <= max` holds on both axes, with equality for collinear or
/// single-point geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    rect: Option<BoundingBox>,
}

impl Bounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, point: DVec2) {
        self.rect = Some(match self.rect {
            Some(rect) => rect.union_point(point),
            None => BoundingBox::from_point(point),
        });
    }

    pub fn observe_all(&mut self, points: impl IntoIterator<Item = DVec2>) {
        for point in points {
            self.observe(point);
        }
    }

    /// Combines two accumulators without regard to where their points came from.
    pub fn merge(&mut self, other: &Bounds) {
        if let Some(rect) = other.rect {
            self.observe(rect.min);
            self.observe(rect.max);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rect.is_none()
    }

    pub fn rect(&self) -> Option<BoundingBox> {
        self.rect
    }

    pub fn min(&self) -> Option<DVec2> {
        self.rect.map(|r| r.min)
    }

    pub fn max(&self) -> Option<DVec2> {
        self.rect.map(|r| r.max)
    }

    pub fn width(&self) -> f64 {
        self.rect.map_or(0.0, |r| r.width())
    }

    pub fn height(&self) -> f64 {
        self.rect.map_or(0.0, |r| r.height())
    }
}

impl FromIterator<DVec2> for Bounds {
    fn from_iter<T: IntoIterator<Item = DVec2>>(iter: T) -> Self {
        let mut bounds = Self::new();
        bounds.observe_all(iter);
        bounds
    }
}
