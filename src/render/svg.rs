use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::assets::AssetCatalog;
use crate::error::Error;
use crate::geometry::{SWISS_CROSS_EDGE_PX, SWISS_CROSS_OFFSET_PX};
use crate::matrix::BitMatrix;

static ROOT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<svg\b[^>]*>").expect("valid regex"));
static PLACEMENT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(x|y|width|height)="[^"]*""#).expect("valid regex"));

/// Renders `matrix` as an SVG 1.1 document with the Swiss cross inlined.
///
/// Modules are drawn as individual black squares inside a `crispEdges` group; the cross is the
/// embedded SVG asset nested as an `<svg>` element at `(549, 549)`.
///
/// # Errors
///
/// Returns [`Error::EmptyMatrix`] when `matrix` has no modules.
pub fn render(matrix: &BitMatrix, quiet_zone: u32) -> Result<Vec<u8>, Error> {
    let plan = super::plan_for(matrix, quiet_zone)?;
    let (width, height) = (plan.output_width, plan.output_height);

    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += &format!(
        "<svg width=\"{width}\" height=\"{height}\" version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );
    result += &format!(
        "<rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" style=\"fill:white;stroke:white\"/>\n"
    );
    result += "<g shape-rendering=\"crispEdges\">\n";
    for r in plan.dark_modules(matrix) {
        result += &format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{2}\" height=\"{2}\" style=\"fill:black;stroke:none\"/>\n",
            r.x, r.y, r.size
        );
    }
    result += &place_fragment(
        AssetCatalog::global().swiss_cross_svg(),
        SWISS_CROSS_OFFSET_PX,
        SWISS_CROSS_OFFSET_PX,
        SWISS_CROSS_EDGE_PX,
    );
    result += "</g>\n";
    result += "</svg>\n";

    tracing::debug!(bytes = result.len(), "rendered SVG QR code");
    Ok(result.into_bytes())
}

/// Rewrites position and size of the fragment's root `<svg>` element, leaving its children alone.
fn place_fragment(fragment: &str, x: u32, y: u32, edge: u32) -> String {
    let Some(root) = ROOT_TAG.find(fragment) else {
        return fragment.to_string();
    };
    let tag = PLACEMENT_ATTR.replace_all(root.as_str(), |caps: &Captures| {
        let value = match &caps[1] {
            "x" => x,
            "y" => y,
            _ => edge,
        };
        format!("{}=\"{}\"", &caps[1], value)
    });

    let mut placed = String::with_capacity(fragment.len() + 8);
    placed += &tag;
    placed += &fragment[root.end()..];
    if !placed.ends_with('\n') {
        placed.push('\n');
    }
    placed
}
