//! # qrbill
//!
//! A Rust library implementing the Swiss QR-bill standard: it normalizes payment data into the
//! canonical QR-bill payload and renders the resulting QR code, Swiss cross included.
//!
//! The implementation follows the Swiss Implementation Guidelines QR-bill version 2.x. QRR and
//! SCOR reference checksums are not implemented; references are only cleaned and truncated.
//!
//! ## Features
//!
//! - Lenient validation: overlong fields are truncated and disallowed characters dropped, never
//!   rejected.
//! - Canonical 31 line payload in the order mandated by the standard.
//! - Pluggable QR matrix backend through the [`matrix::QrMatrixEncoder`] trait.
//! - Output as RGBA image buffer, PNG, SVG, EPS and PDF, all with identical module geometry.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrbill = "0.1"
//! ```
//!
//! ## Example
//!
//! ```rust
//! use qrbill::model::{Address, AddressType, PaymentRecord};
//!
//! let mut record = PaymentRecord::default();
//! record.creditor_info.iban = "CH02 0900 0008 7091 3543".to_string();
//! record.creditor_info.creditor = Address {
//!     address_type: Some(AddressType::Combined),
//!     name: "Legalize it!".to_string(),
//!     address_line1: "Quellenstrasse 25".to_string(),
//!     address_line2: "8005 Zürich".to_string(),
//!     country: "CH".to_string(),
//!     ..Address::default()
//! };
//! record.amount_info.currency = "CHF".to_string();
//! record.remittance_info.reference_type = "NON".to_string();
//! record.remittance_info.unstructured_message = "Spende".to_string();
//!
//! let bill = record.encode().expect("payload fits into a QR code");
//! let svg = bill.render_svg().expect("matrix is not empty");
//! assert!(String::from_utf8(svg).unwrap().contains("<svg x=\"549\" y=\"549\""));
//! ```
//!
//! ## Modules
//!
//! - [`model`]: Payment record types and validation.
//! - [`bill`]: Canonical payload encoding and the [`Bill`] value.
//! - [`matrix`]: QR bit matrices and the QR encoder seam.
//! - [`geometry`]: Module-to-pixel layout shared by all outputs.
//! - [`render`]: Raster, SVG, EPS and PDF backends.
//! - [`assets`]: Embedded Swiss cross assets.

pub mod assets;
pub mod bill;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod model;
pub mod render;

pub use bill::Bill;
pub use error::{EncodingError, Error};
pub use model::PaymentRecord;
