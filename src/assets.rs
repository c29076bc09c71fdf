//! Embedded Swiss cross assets.
//!
//! The catalog is built once per process on first use (or eagerly through [`init`]) and is
//! read-only afterwards. A corrupt asset is a build defect, so loading panics instead of
//! returning an error to every request.
use std::collections::HashMap;
use std::sync::LazyLock;

use image::{ImageFormat, RgbaImage};

use crate::error::AssetError;
use crate::geometry::SWISS_CROSS_EDGE_PX;

/// Name of the 166x166 pixel Swiss cross raster, 7mm at its native resolution.
pub const SWISS_CROSS_PNG: &str = "swisscross.png";

/// Name of the Swiss cross SVG document, 166x166 user units.
pub const SWISS_CROSS_SVG: &str = "swisscross.svg";

const EMBEDDED: [(&str, &[u8]); 2] = [
    (SWISS_CROSS_PNG, include_bytes!("../assets/swisscross.png")),
    (SWISS_CROSS_SVG, include_bytes!("../assets/swisscross.svg")),
];

static CATALOG: LazyLock<AssetCatalog> = LazyLock::new(|| match AssetCatalog::load() {
    Ok(catalog) => catalog,
    Err(err) => panic!("embedded assets are corrupt: {err}"),
});

/// Loads the process-wide catalog now rather than on the first render.
pub fn init() -> &'static AssetCatalog {
    AssetCatalog::global()
}

/// Immutable table of the embedded blobs plus their decoded forms.
#[derive(Debug)]
pub struct AssetCatalog {
    blobs: HashMap<&'static str, &'static [u8]>,
    swiss_cross: RgbaImage,
    swiss_cross_svg: String,
}

impl AssetCatalog {
    pub fn global() -> &'static AssetCatalog {
        &CATALOG
    }

    fn load() -> Result<Self, AssetError> {
        let blobs: HashMap<_, _> = EMBEDDED.into_iter().collect();

        let png = *blobs
            .get(SWISS_CROSS_PNG)
            .ok_or(AssetError::Missing(SWISS_CROSS_PNG))?;
        let swiss_cross = image::load_from_memory_with_format(png, ImageFormat::Png)
            .map_err(|source| AssetError::Decode {
                name: SWISS_CROSS_PNG,
                source,
            })?
            .to_rgba8();
        if swiss_cross.dimensions() != (SWISS_CROSS_EDGE_PX, SWISS_CROSS_EDGE_PX) {
            return Err(AssetError::Dimensions {
                name: SWISS_CROSS_PNG,
                width: swiss_cross.width(),
                height: swiss_cross.height(),
                expected: SWISS_CROSS_EDGE_PX,
            });
        }

        let svg = *blobs
            .get(SWISS_CROSS_SVG)
            .ok_or(AssetError::Missing(SWISS_CROSS_SVG))?;
        let swiss_cross_svg = std::str::from_utf8(svg)
            .ok()
            .and_then(strip_xml_declaration)
            .ok_or(AssetError::InvalidSvg(SWISS_CROSS_SVG))?
            .to_string();

        tracing::debug!(assets = blobs.len(), "loaded embedded assets");
        Ok(Self {
            blobs,
            swiss_cross,
            swiss_cross_svg,
        })
    }

    /// Raw bytes of the embedded asset `name`.
    pub fn get(&self, name: &str) -> Option<&'static [u8]> {
        self.blobs.get(name).copied()
    }

    /// Decoded Swiss cross raster.
    pub fn swiss_cross_image(&self) -> &RgbaImage {
        &self.swiss_cross
    }

    /// The Swiss cross SVG without its XML declaration, starting at the root `<svg` element.
    pub fn swiss_cross_svg(&self) -> &str {
        &self.swiss_cross_svg
    }
}

// A nested <svg> element cannot carry its own XML declaration.
fn strip_xml_declaration(doc: &str) -> Option<&str> {
    let body = match doc.trim_start().strip_prefix("<?xml") {
        Some(rest) => &rest[rest.find("?>")? + 2..],
        None => doc,
    };
    let body = body.trim_start();
    body.starts_with("<svg").then_some(body)
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = AssetCatalog::global();
        assert!(catalog.get(SWISS_CROSS_PNG).is_some());
        assert!(catalog.get(SWISS_CROSS_SVG).is_some());
        assert!(catalog.get("missing.png").is_none());
        assert_eq!(catalog.swiss_cross_image().dimensions(), (166, 166));
    }

    #[test]
    fn test_swiss_cross_raster_colors() {
        let cross = AssetCatalog::global().swiss_cross_image();
        // White border, black square, white cross arm in the middle.
        assert_eq!(cross.get_pixel(2, 2).0, [255, 255, 255, 255]);
        assert_eq!(cross.get_pixel(20, 20).0, [0, 0, 0, 255]);
        assert_eq!(cross.get_pixel(83, 83).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_svg_fragment_has_no_declaration() {
        let svg = AssetCatalog::global().swiss_cross_svg();
        assert!(svg.starts_with("<svg "));
        assert!(!svg.contains("<?xml"));
    }

    #[test]
    fn test_strip_xml_declaration() {
        assert_eq!(
            strip_xml_declaration("<?xml version=\"1.0\"?>\n<svg/>"),
            Some("<svg/>")
        );
        assert_eq!(strip_xml_declaration("<svg/>"), Some("<svg/>"));
        assert_eq!(strip_xml_declaration("<?xml version=\"1.0\"?><html/>"), None);
        assert_eq!(strip_xml_declaration("<?xml broken"), None);
    }
}
