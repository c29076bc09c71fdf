//! QR bit matrices and the encoders that produce them.
//!
//! The QR symbol construction itself (Reed-Solomon, masking, module placement) lives behind the
//! [`QrMatrixEncoder`] trait so the renderers only ever see a plain grid of dark and light modules.
use qrcodegen::{QrCode, QrCodeEcc, QrSegment, Version};

use crate::error::EncodingError;

/// A rectangular grid of QR modules, `true` meaning dark.
///
/// The grid is stored row-major and never contains a quiet zone; renderers add it themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl BitMatrix {
    /// Creates an all-light matrix of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Creates a matrix by asking `f` for the value of every module `(x, y)`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qrbill::matrix::BitMatrix;
    ///
    /// let diagonal = BitMatrix::from_fn(3, 3, |x, y| x == y);
    /// assert!(diagonal.get(1, 1));
    /// assert!(!diagonal.get(0, 2));
    /// ```
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Self { width, height, bits }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true when the matrix has no modules at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the module at `(x, y)`. Coordinates outside the matrix are light.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[self.index(x, y)]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Turns text into a QR bit matrix.
///
/// Implementations must encode at error correction level M and treat the input as UTF-8. They are
/// shared between requests, hence the `Send + Sync` bound.
pub trait QrMatrixEncoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<BitMatrix, EncodingError>;
}

/// The default [`QrMatrixEncoder`], backed by the `qrcodegen` crate.
///
/// Every symbol starts with an ECI designator for UTF-8 so readers do not fall back to
/// ISO 8859-1 for the byte segments. Picks the smallest version that holds the payload and never
/// boosts the error correction level above M, so the symbol density stays what the QR-bill
/// standard expects.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrCodeGenEncoder;

/// ECI assignment number of UTF-8.
const UTF8_ECI: u32 = 26;

impl QrMatrixEncoder for QrCodeGenEncoder {
    fn encode(&self, text: &str) -> Result<BitMatrix, EncodingError> {
        let mut segments = vec![QrSegment::make_eci(UTF8_ECI)];
        segments.extend(QrSegment::make_segments(text));
        let qr = QrCode::encode_segments_advanced(
            &segments,
            QrCodeEcc::Medium,
            Version::MIN,
            Version::MAX,
            None,
            false,
        )
        .map_err(|err| EncodingError::DataTooLong(err.to_string()))?;

        let size = qr.size() as u32;
        tracing::trace!(version = qr.version().value(), size, "encoded QR symbol");
        Ok(BitMatrix::from_fn(size, size, |x, y| qr.get_module(x as i32, y as i32)))
    }
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_is_row_major() {
        let m = BitMatrix::from_fn(4, 2, |x, y| x == 3 && y == 1);
        assert_eq!(m.width(), 4);
        assert_eq!(m.height(), 2);
        assert!(m.get(3, 1));
        assert!(!m.get(1, 3));
    }

    #[test]
    fn test_out_of_bounds_is_light() {
        let m = BitMatrix::from_fn(2, 2, |_, _| true);
        assert!(!m.get(2, 0));
        assert!(!m.get(0, 2));
    }

    #[test]
    fn test_new_is_all_light() {
        let m = BitMatrix::new(5, 5);
        assert!((0..5).all(|y| (0..5).all(|x| !m.get(x, y))));
    }

    #[test]
    fn test_empty() {
        assert!(BitMatrix::new(0, 0).is_empty());
        assert!(BitMatrix::new(3, 0).is_empty());
        assert!(!BitMatrix::new(1, 1).is_empty());
    }

    #[test]
    fn test_qrcodegen_encoder_produces_square_symbol() {
        let m = QrCodeGenEncoder.encode("SPC\n0200\n1\n").unwrap();
        assert_eq!(m.width(), m.height());
        // Version 1 is 21 modules wide, every further version adds 4.
        assert_eq!((m.width() - 21) % 4, 0);
        // Top left finder pattern corner is always dark.
        assert!(m.get(0, 0));
    }

    #[test]
    fn test_qrcodegen_encoder_declares_utf8() {
        // 14 bytes fill version 1-M exactly; the 12 bit ECI header pushes them into version 2.
        let text = "abcdefghijklmn";
        let plain = QrCode::encode_text(text, QrCodeEcc::Medium).unwrap();
        assert_eq!(plain.size(), 21);
        let m = QrCodeGenEncoder.encode(text).unwrap();
        assert_eq!(m.width(), 25);

        let m = QrCodeGenEncoder.encode("8005 Zürich").unwrap();
        assert_eq!(m.width(), m.height());
    }

    #[test]
    fn test_qrcodegen_encoder_rejects_oversized_text() {
        let text = "x".repeat(5000);
        let err = QrCodeGenEncoder.encode(&text).unwrap_err();
        assert!(matches!(err, EncodingError::DataTooLong(_)));
    }
}
