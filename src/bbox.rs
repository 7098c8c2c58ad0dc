use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Axis-aligned bounding box, left-top-right-bottom corners in pixel
/// coordinates. The image origin is top-left, y grows downward.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BBox {
    #[inline]
    pub fn ltrb(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box from center point and width-height.
    #[inline]
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        }
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    #[inline(always)]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    #[inline]
    pub fn center(&self) -> na::Point2<f32> {
        na::Point2::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Anchor used for side-of-line evaluation.
    #[inline]
    pub fn bottom_center(&self) -> na::Point2<f32> {
        na::Point2::new((self.x1 + self.x2) / 2.0, self.y2)
    }

    /// A box with inverted corners or zero area cannot take part in matching.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Same box translated by `v`.
    #[inline]
    pub fn shifted(&self, v: na::Vector2<f32>) -> Self {
        Self {
            x1: self.x1 + v.x,
            y1: self.y1 + v.y,
            x2: self.x2 + v.x,
            y2: self.y2 + v.y,
        }
    }

    /// Intersection-over-union with `other`, in [0, 1].
    pub fn iou(&self, other: &BBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - inter;

        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let b = BBox::ltrb(10.0, 20.0, 110.0, 220.0);
        assert!((b.iou(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = BBox::ltrb(0.0, 0.0, 10.0, 10.0);
        let b = BBox::ltrb(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn iou_of_partial_overlap() {
        let a = BBox::ltrb(0.0, 0.0, 10.0, 10.0);
        let b = BBox::ltrb(5.0, 0.0, 15.0, 10.0);
        // intersection 50, union 150
        assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_boxes() {
        assert!(BBox::ltrb(10.0, 10.0, 10.0, 20.0).is_degenerate());
        assert!(BBox::ltrb(10.0, 10.0, 5.0, 20.0).is_degenerate());
        assert!(!BBox::ltrb(0.0, 0.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn anchors() {
        let b = BBox::ltrb(0.0, 0.0, 10.0, 20.0);
        assert_eq!(b.center(), nalgebra::Point2::new(5.0, 10.0));
        assert_eq!(b.bottom_center(), nalgebra::Point2::new(5.0, 20.0));
    }
}
