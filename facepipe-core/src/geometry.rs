//! Box geometry for face-region crops.
//!
//! The annotated bounding boxes are arbitrary rectangles; the classifiers
//! downstream expect square inputs, so the shorter dimension is grown until
//! the box is square, keeping the original region centered.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in source-image pixel coordinates.
///
/// Coordinates are signed because padding to a square may push the origin
/// past the image edge; `width` and `height` stay positive throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Region {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true when the box already has equal sides.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

/// Grow the shorter side of `region` until width equals height.
///
/// The extension is centered on the original box: half the difference is
/// subtracted from the origin of the shorter axis (floor division, so the
/// origin may go negative) and the full difference added to its extent.
/// Square inputs are returned unchanged, which also makes the operation
/// idempotent. No clamping against image bounds happens here; the cropper
/// fills out-of-bounds areas when realizing the crop.
pub fn pad_to_square(region: Region) -> Region {
    let Region {
        mut x,
        mut y,
        mut width,
        mut height,
    } = region;

    if width > height {
        let diff = width - height;
        y -= diff / 2;
        height += diff;
    } else if height > width {
        let diff = height - width;
        x -= diff / 2;
        width += diff;
    }

    Region {
        x,
        y,
        width,
        height,
    }
}
