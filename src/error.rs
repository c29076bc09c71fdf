//! Error types for QR-bill encoding and rendering.
//!
//! Validation never fails, so the only runtime failure is the QR matrix encoder rejecting the
//! payload. Everything else here signals a broken invariant rather than bad user input.

/// Failure to turn a canonical payload into a QR bit matrix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// The QR backend could not fit the payload at error correction level M.
    #[error("payload does not fit into a QR code: {0}")]
    DataTooLong(String),

    /// The canonical payload exceeds the maximum length allowed for a QR-bill.
    #[error("payload is {len} characters long, a QR-bill allows at most {max}")]
    PayloadTooLong { len: usize, max: usize },
}

/// Top level error returned by the fallible operations of this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// A renderer received a matrix without any modules.
    #[error("QR bit matrix is empty")]
    EmptyMatrix,

    #[error("failed to encode raster image: {0}")]
    Image(#[from] image::ImageError),
}

/// An embedded asset failed its startup integrity check.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset {0} is not embedded")]
    Missing(&'static str),

    #[error("asset {name} cannot be decoded: {source}")]
    Decode {
        name: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error("asset {name} is {width}x{height}, expected {expected}x{expected}")]
    Dimensions {
        name: &'static str,
        width: u32,
        height: u32,
        expected: u32,
    },

    #[error("asset {0} is not a valid SVG fragment")]
    InvalidSvg(&'static str),
}
