use crate::error::Error;
use crate::geometry::{QR_CODE_EDGE_PX, SWISS_CROSS_OFFSET_PX};
use crate::matrix::BitMatrix;

use super::SWISS_CROSS_RECTS;

/// Renders `matrix` as an Encapsulated PostScript 3.0 document.
///
/// The coordinate system is flipped to run top-down like the SVG and raster outputs, so module
/// coordinates are identical across all backends. Lines stay well below the 255 character limit
/// of the EPS format.
///
/// # Errors
///
/// Returns [`Error::EmptyMatrix`] when `matrix` has no modules.
pub fn render(matrix: &BitMatrix, quiet_zone: u32) -> Result<Vec<u8>, Error> {
    let plan = super::plan_for(matrix, quiet_zone)?;
    let edge = QR_CODE_EDGE_PX;

    let mut eps = String::new();
    eps += "%!PS-Adobe-3.0 EPSF-3.0\n";
    eps += "%%Creator: qrbill\n";
    eps += "%%Title: QR-Bill\n";
    eps += &format!("%%CreationDate: {}\n", chrono::Local::now().format("%Y-%m-%d"));
    // lower-left x, lower-left y, upper-right x, upper-right y
    eps += &format!("%%BoundingBox: 0 0 {edge} {edge}\n");
    eps += "%%EndComments\n";
    eps += "/F { rectfill } def\n";

    eps += &format!("0 {edge} translate\n");
    eps += "1 -1 scale\n";

    eps += "1 1 1 setrgbcolor\n";
    eps += &format!("0 0 {edge} {edge} F\n");

    eps += "0 0 0 setrgbcolor\n";
    for r in plan.dark_modules(matrix) {
        eps += &format!("{} {} {2} {2} F\n", r.x, r.y, r.size);
    }

    eps += &format!("{SWISS_CROSS_OFFSET_PX} {SWISS_CROSS_OFFSET_PX} translate\n");
    let mut white = None;
    for r in SWISS_CROSS_RECTS {
        if white != Some(r.white) {
            eps += if r.white { "1 1 1 setrgbcolor\n" } else { "0 0 0 setrgbcolor\n" };
            white = Some(r.white);
        }
        eps += &format!("{} {} {} {} F\n", r.x, r.y, r.width, r.height);
    }

    eps += "%%EOF";

    tracing::debug!(bytes = eps.len(), "rendered EPS QR code");
    Ok(eps.into_bytes())
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    fn render_str(matrix: &BitMatrix) -> String {
        String::from_utf8(render(matrix, 4).unwrap()).unwrap()
    }

    #[test]
    fn test_header() {
        let eps = render_str(&BitMatrix::from_fn(21, 21, |_, _| true));
        let lines: Vec<&str> = eps.lines().collect();
        assert_eq!(lines[0], "%!PS-Adobe-3.0 EPSF-3.0");
        assert!(lines.contains(&"%%BoundingBox: 0 0 1265 1265"));
        assert!(eps.contains("0 1265 translate\n1 -1 scale\n"));
        assert!(eps.ends_with("%%EOF"));
    }

    #[test]
    fn test_modules() {
        let matrix = BitMatrix::from_fn(21, 21, |x, y| x == 1 && y == 0);
        let eps = render_str(&matrix);
        // 1265 / 29 = 43, padding 181.
        assert!(eps.contains("\n224 181 43 43 F\n"));
    }

    #[test]
    fn test_cross() {
        let eps = render_str(&BitMatrix::from_fn(21, 21, |_, _| false));
        let want = "549 549 translate\n\
                    1 1 1 setrgbcolor\n\
                    0 0 166 166 F\n\
                    0 0 0 setrgbcolor\n\
                    12 12 142 142 F\n\
                    1 1 1 setrgbcolor\n\
                    36 66 94 28 F\n\
                    68 34 30 92 F\n\
                    %%EOF";
        assert!(eps.ends_with(want), "{eps}");
    }

    #[test]
    fn test_lines_are_short() {
        let eps = render_str(&BitMatrix::from_fn(177, 177, |x, y| (x ^ y) & 1 == 0));
        assert!(eps.lines().all(|l| l.len() <= 255));
    }
}
