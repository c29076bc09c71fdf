//! The four QR-bill output backends.
//!
//! Each backend maps modules through [`Plan::for_qr_bill`], so the same matrix produces identical
//! module coordinates in every format, and places the Swiss cross at the center of the 1265x1265
//! square at its native 166x166 size.
//!
//! - [`raster`]: RGBA image buffer with the PNG cross composited on top.
//! - [`svg`]: SVG 1.1 document with the SVG cross inlined.
//! - [`eps`]: EPS 3.0 document.
//! - [`pdf`]: single page PDF drawing a Form XObject.
use crate::error::Error;
use crate::geometry::Plan;
use crate::matrix::BitMatrix;

pub mod eps;
pub mod pdf;
pub mod raster;
pub mod svg;

/// Light modules required around the symbol.
pub const DEFAULT_QUIET_ZONE: u32 = 4;

/// One rectangle of the vector Swiss cross, relative to the cross origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CrossRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub white: bool,
}

// Literal cross geometry for the EPS and PDF backends, independent of the SVG and PNG assets.
pub(crate) const SWISS_CROSS_RECTS: [CrossRect; 4] = [
    CrossRect { x: 0, y: 0, width: 166, height: 166, white: true },
    CrossRect { x: 12, y: 12, width: 142, height: 142, white: false },
    CrossRect { x: 36, y: 66, width: 94, height: 28, white: true },
    CrossRect { x: 68, y: 34, width: 30, height: 92, white: true },
];

/// Plans the 1265x1265 layout, rejecting matrices without modules.
pub(crate) fn plan_for(matrix: &BitMatrix, quiet_zone: u32) -> Result<Plan, Error> {
    if matrix.is_empty() {
        return Err(Error::EmptyMatrix);
    }
    Ok(Plan::for_qr_bill(matrix, quiet_zone))
}
