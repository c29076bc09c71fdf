//! Canonical QR-bill payload and the [`Bill`] value it produces.
use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::error::{EncodingError, Error};
use crate::matrix::{BitMatrix, QrCodeGenEncoder, QrMatrixEncoder};
use crate::model::PaymentRecord;
use crate::render::{self, DEFAULT_QUIET_ZONE};

/// Maximum length of a QR-bill payload in characters.
pub const MAX_PAYLOAD_CHARS: usize = 997;

/// Number of lines in every canonical payload.
pub const PAYLOAD_FIELDS: usize = 31;

impl PaymentRecord {
    /// Validates the record and encodes it with the default QR backend.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qrbill::model::PaymentRecord;
    ///
    /// let mut record = PaymentRecord::default();
    /// record.creditor_info.iban = "CH0209000000870913543".to_string();
    ///
    /// let bill = record.encode().unwrap();
    /// assert_eq!(bill.as_str().lines().count(), 31);
    /// ```
    pub fn encode(&self) -> Result<Bill, Error> {
        self.encode_with(&QrCodeGenEncoder)
    }

    /// Validates the record and encodes it with `encoder`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::PayloadTooLong`] when the canonical payload exceeds
    /// [`MAX_PAYLOAD_CHARS`], or whatever error `encoder` reports.
    pub fn encode_with<E>(&self, encoder: &E) -> Result<Bill, Error>
    where
        E: QrMatrixEncoder + ?Sized,
    {
        let payload = canonical_payload(&self.validate());

        let len = payload.chars().count();
        if len > MAX_PAYLOAD_CHARS {
            return Err(EncodingError::PayloadTooLong {
                len,
                max: MAX_PAYLOAD_CHARS,
            }
            .into());
        }

        let matrix = encoder.encode(&payload)?;
        tracing::debug!(
            chars = len,
            width = matrix.width(),
            height = matrix.height(),
            "encoded QR-bill payload"
        );
        Ok(Bill { payload, matrix })
    }
}

/// Joins the fields of an already validated record, one per line.
fn canonical_payload(f: &PaymentRecord) -> String {
    let mut fields: Vec<&str> = Vec::with_capacity(PAYLOAD_FIELDS);
    fields.extend([
        f.header.qr_type.as_str(),
        f.header.version.as_str(),
        f.header.coding_type.as_str(),
        f.creditor_info.iban.as_str(),
    ]);
    fields.extend(f.creditor_info.creditor.fields());
    fields.extend(f.ultimate_creditor.fields());
    fields.extend([f.amount_info.amount.as_str(), f.amount_info.currency.as_str()]);
    fields.extend(f.ultimate_debtor.fields());
    fields.extend([
        f.remittance_info.reference_type.as_str(),
        f.remittance_info.reference.as_str(),
        f.remittance_info.unstructured_message.as_str(),
        f.remittance_info.trailer.as_str(),
    ]);
    debug_assert_eq!(fields.len(), PAYLOAD_FIELDS);

    let mut payload = fields.join("\n");
    payload.push('\n');
    payload
}

/// An encoded QR-bill: the canonical payload text and its QR bit matrix.
///
/// Only [`PaymentRecord::encode`] creates bills. Rendering never modifies the bill, so one bill
/// can be rendered to several formats, from several threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bill {
    payload: String,
    matrix: BitMatrix,
}

impl Bill {
    /// The canonical payload, 31 newline-terminated lines.
    pub fn as_str(&self) -> &str {
        &self.payload
    }

    pub fn matrix(&self) -> &BitMatrix {
        &self.matrix
    }

    /// Renders the QR code with the Swiss cross as a 1265x1265 RGBA image.
    pub fn render_raster(&self) -> Result<RgbaImage, Error> {
        render::raster::render(&self.matrix, DEFAULT_QUIET_ZONE)
    }

    /// Renders the raster image and encodes it as PNG.
    pub fn render_png(&self) -> Result<Vec<u8>, Error> {
        let image = self.render_raster()?;
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    pub fn render_svg(&self) -> Result<Vec<u8>, Error> {
        render::svg::render(&self.matrix, DEFAULT_QUIET_ZONE)
    }

    pub fn render_eps(&self) -> Result<Vec<u8>, Error> {
        render::eps::render(&self.matrix, DEFAULT_QUIET_ZONE)
    }

    pub fn render_pdf(&self) -> Result<Vec<u8>, Error> {
        render::pdf::render(&self.matrix, DEFAULT_QUIET_ZONE)
    }
}

impl std::fmt::Display for Bill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.payload)
    }
}
