use image::{imageops, ImageBuffer, Rgba, RgbaImage};

use crate::assets::AssetCatalog;
use crate::error::Error;
use crate::geometry::SWISS_CROSS_OFFSET_PX;
use crate::matrix::BitMatrix;

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Renders `matrix` into an RGBA image and overlays the Swiss cross raster.
///
/// The cross replaces the pixels under it as they are, no blending.
///
/// # Arguments
///
/// * `matrix` - The QR bit matrix, without quiet zone.
/// * `quiet_zone` - Minimum number of light modules around the symbol.
///
/// # Errors
///
/// Returns [`Error::EmptyMatrix`] when `matrix` has no modules.
///
/// # Example
///
/// ```rust
/// use qrbill::matrix::BitMatrix;
/// use qrbill::render::raster;
///
/// let matrix = BitMatrix::from_fn(25, 25, |x, y| (x + y) % 2 == 0);
/// let img = raster::render(&matrix, 4).unwrap();
/// assert_eq!(img.dimensions(), (1265, 1265));
/// ```
pub fn render(matrix: &BitMatrix, quiet_zone: u32) -> Result<RgbaImage, Error> {
    let plan = super::plan_for(matrix, quiet_zone)?;
    let mut img: RgbaImage = ImageBuffer::new(plan.output_width, plan.output_height);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = match plan.module_at(x, y) {
            Some((mx, my)) if matrix.get(mx, my) => DARK,
            _ => LIGHT,
        };
    }

    let cross = AssetCatalog::global().swiss_cross_image();
    imageops::replace(
        &mut img,
        cross,
        i64::from(SWISS_CROSS_OFFSET_PX),
        i64::from(SWISS_CROSS_OFFSET_PX),
    );

    tracing::debug!(
        width = img.width(),
        height = img.height(),
        multiple = plan.multiple,
        "rendered raster QR code"
    );
    Ok(img)
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Plan;

    fn corner_matrix() -> BitMatrix {
        // Only the four corner modules are dark, the center stays light.
        BitMatrix::from_fn(25, 25, |x, y| (x == 0 || x == 24) && (y == 0 || y == 24))
    }

    #[test]
    fn test_dimensions() {
        let img = render(&corner_matrix(), 4).unwrap();
        assert_eq!(img.dimensions(), (1265, 1265));
    }

    #[test]
    fn test_modules_follow_plan() {
        let matrix = corner_matrix();
        let img = render(&matrix, 4).unwrap();
        let plan = Plan::for_qr_bill(&matrix, 4);

        let r = plan.module_rect(0, 0);
        assert_eq!(*img.get_pixel(r.x, r.y), DARK);
        assert_eq!(*img.get_pixel(r.x + r.size - 1, r.y + r.size - 1), DARK);
        assert_eq!(*img.get_pixel(r.x - 1, r.y), LIGHT);
        assert_eq!(*img.get_pixel(r.x + r.size, r.y), LIGHT);

        let r = plan.module_rect(24, 24);
        assert_eq!(*img.get_pixel(r.x, r.y), DARK);
        assert_eq!(*img.get_pixel(r.x + r.size, r.y + r.size), LIGHT);
    }

    #[test]
    fn test_cross_overwrites_modules() {
        let matrix = BitMatrix::from_fn(25, 25, |_, _| true);
        let img = render(&matrix, 4).unwrap();
        let cross = AssetCatalog::global().swiss_cross_image();

        for (x, y) in [(0, 0), (165, 165), (20, 20), (83, 83), (40, 80)] {
            assert_eq!(
                img.get_pixel(549 + x, 549 + y),
                cross.get_pixel(x, y),
                "pixel ({x}, {y}) of the cross"
            );
        }
        // Outside the cross the modules are untouched.
        assert_eq!(*img.get_pixel(548, 600), DARK);
        assert_eq!(*img.get_pixel(549 + 166, 600), DARK);
    }

    #[test]
    fn test_empty_matrix() {
        assert!(matches!(
            render(&BitMatrix::new(0, 0), 4),
            Err(Error::EmptyMatrix)
        ));
    }
}
