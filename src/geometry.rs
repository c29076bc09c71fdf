//! Pixel layout shared by every output format.
//!
//! All four renderers place modules through [`plan`] so that a given matrix lands on exactly the
//! same coordinates in the raster, SVG, EPS and PDF outputs.
use crate::matrix::BitMatrix;

/// Edge length of the Swiss cross asset in pixels.
pub const SWISS_CROSS_EDGE_PX: u32 = 166;

/// Physical edge length of the Swiss cross in millimetres.
pub const SWISS_CROSS_EDGE_MM: u32 = 7;

/// Physical edge length of the QR code including its white border, in millimetres.
pub const QR_CODE_EDGE_MM: u32 = 42 + 13;

/// Edge length of the full QR code graphic in pixels, at the resolution of the Swiss cross asset.
pub const QR_CODE_EDGE_PX: u32 = SWISS_CROSS_EDGE_PX / SWISS_CROSS_EDGE_MM * QR_CODE_EDGE_MM;

/// Offset of the Swiss cross overlay on both axes.
pub const SWISS_CROSS_OFFSET_PX: u32 = (QR_CODE_EDGE_PX - SWISS_CROSS_EDGE_PX) / 2;

/// Module-to-pixel mapping for one matrix at one requested output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub matrix_width: u32,
    pub matrix_height: u32,
    /// Edge length of a single module in pixels.
    pub multiple: u32,
    pub left_padding: u32,
    pub top_padding: u32,
    pub output_width: u32,
    pub output_height: u32,
}

/// Pixel square covered by one dark module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleRect {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

/// Computes the layout for a `matrix_width` x `matrix_height` matrix.
///
/// The output is never smaller than the matrix plus its quiet zone. Padding covers both the quiet
/// zone and any extra pixels needed to reach the requested size: a 25x25 matrix with a quiet zone
/// of 4 is 33x33 modules, so a 200x160 request yields a multiple of 4 and centers the 100x100
/// pixel symbol inside 200x160.
///
/// # Arguments
///
/// * `matrix_width`, `matrix_height` - Dimensions of the bit matrix, without quiet zone.
/// * `requested_width`, `requested_height` - Desired output size in pixels.
/// * `quiet_zone` - Number of light modules required on each side.
///
/// # Panics
///
/// Panics if both the matrix and the quiet zone are zero-sized along an axis.
///
/// # Example
///
/// ```rust
/// use qrbill::geometry::plan;
///
/// let p = plan(25, 25, 1265, 1265, 4);
/// assert_eq!(p.multiple, 38);
/// assert_eq!(p.left_padding, (1265 - 25 * 38) / 2);
/// ```
pub fn plan(
    matrix_width: u32,
    matrix_height: u32,
    requested_width: u32,
    requested_height: u32,
    quiet_zone: u32,
) -> Plan {
    let qr_width = matrix_width + quiet_zone * 2;
    let qr_height = matrix_height + quiet_zone * 2;
    let output_width = qr_width.max(requested_width);
    let output_height = qr_height.max(requested_height);

    let multiple = (output_width / qr_width).min(output_height / qr_height);
    let left_padding = (output_width - matrix_width * multiple) / 2;
    let top_padding = (output_height - matrix_height * multiple) / 2;

    let p = Plan {
        matrix_width,
        matrix_height,
        multiple,
        left_padding,
        top_padding,
        output_width,
        output_height,
    };
    tracing::debug!(?p, "planned QR geometry");
    p
}

impl Plan {
    /// Layout for `matrix` scaled onto the canonical 1265x1265 QR-bill square.
    pub fn for_qr_bill(matrix: &BitMatrix, quiet_zone: u32) -> Self {
        plan(
            matrix.width(),
            matrix.height(),
            QR_CODE_EDGE_PX,
            QR_CODE_EDGE_PX,
            quiet_zone,
        )
    }

    /// Pixel square of module `(x, y)`.
    pub fn module_rect(&self, x: u32, y: u32) -> ModuleRect {
        ModuleRect {
            x: self.left_padding + x * self.multiple,
            y: self.top_padding + y * self.multiple,
            size: self.multiple,
        }
    }

    /// Module covering pixel `(px, py)`, or `None` if the pixel lies in the padding.
    pub fn module_at(&self, px: u32, py: u32) -> Option<(u32, u32)> {
        if px < self.left_padding || py < self.top_padding {
            return None;
        }
        let x = (px - self.left_padding) / self.multiple;
        let y = (py - self.top_padding) / self.multiple;
        if x >= self.matrix_width || y >= self.matrix_height {
            return None;
        }
        Some((x, y))
    }

    /// Pixel squares of all dark modules of `matrix`, row by row.
    pub fn dark_modules<'a>(
        &'a self,
        matrix: &'a BitMatrix,
    ) -> impl Iterator<Item = ModuleRect> + 'a {
        (0..self.matrix_height).flat_map(move |y| {
            (0..self.matrix_width)
                .filter(move |&x| matrix.get(x, y))
                .map(move |x| self.module_rect(x, y))
        })
    }
}
