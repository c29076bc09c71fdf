use chrono::{Datelike, Local, Timelike};
use pdf_writer::types::ProcSet;
use pdf_writer::{Content, Date, Finish, Name, Pdf, Rect, Ref, TextStr};

use crate::error::Error;
use crate::geometry::{QR_CODE_EDGE_PX, SWISS_CROSS_OFFSET_PX};
use crate::matrix::BitMatrix;

use super::SWISS_CROSS_RECTS;

/// Scale applied when placing the 1265 unit QR code on the page.
///
/// 1265 * 0.12 = 151.8pt, which is not quite the 55mm (155.9pt) the QR-bill standard asks for.
pub const PAGE_SCALE: f32 = 0.12;

/// DIN A4 in points.
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;

const XOBJECT_NAME: Name<'static> = Name(b"qr");

/// Object ids of the fixed document layout, handed out in serialization order.
struct ObjectIds {
    next: i32,
}

impl ObjectIds {
    fn new() -> Self {
        Self { next: 1 }
    }

    fn alloc(&mut self) -> Ref {
        let id = Ref::new(self.next);
        self.next += 1;
        id
    }
}

/// Renders `matrix` as a single page PDF.
///
/// The QR code and the cross form one Form XObject with a 1265x1265 bounding box, drawn in the
/// lower left corner of an A4 page scaled by [`PAGE_SCALE`].
///
/// # Errors
///
/// Returns [`Error::EmptyMatrix`] when `matrix` has no modules.
pub fn render(matrix: &BitMatrix, quiet_zone: u32) -> Result<Vec<u8>, Error> {
    let plan = super::plan_for(matrix, quiet_zone)?;
    let edge = QR_CODE_EDGE_PX as f32;

    let mut qr = Content::new();
    qr.save_state();
    // Flip the y axis so that coordinates run top-down like in the SVG output.
    qr.transform([1.0, 0.0, 0.0, -1.0, 0.0, edge]);
    qr.set_fill_gray(0.0);
    for r in plan.dark_modules(matrix) {
        qr.rect(r.x as f32, r.y as f32, r.size as f32, r.size as f32);
    }
    // A single fill for all modules. Filling every rectangle on its own leaves hairline seams
    // between adjacent modules in some viewers.
    qr.fill_nonzero();

    let offset = SWISS_CROSS_OFFSET_PX as f32;
    qr.transform([1.0, 0.0, 0.0, 1.0, offset, offset]);
    for r in SWISS_CROSS_RECTS {
        qr.set_fill_gray(if r.white { 1.0 } else { 0.0 });
        qr.rect(r.x as f32, r.y as f32, r.width as f32, r.height as f32);
        qr.fill_nonzero();
    }
    qr.restore_state();
    let qr = qr.finish();

    let mut page_content = Content::new();
    page_content.save_state();
    page_content.transform([PAGE_SCALE, 0.0, 0.0, PAGE_SCALE, 0.0, 0.0]);
    page_content.x_object(XOBJECT_NAME);
    page_content.restore_state();
    let page_content = page_content.finish();

    let mut ids = ObjectIds::new();
    let catalog_id = ids.alloc();
    let page_tree_id = ids.alloc();
    let page_id = ids.alloc();
    let content_id = ids.alloc();
    let xobject_id = ids.alloc();
    let info_id = ids.alloc();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources().x_objects().pair(XOBJECT_NAME, xobject_id);
    page.finish();

    pdf.stream(content_id, &page_content);

    let mut form = pdf.form_xobject(xobject_id, &qr);
    form.bbox(Rect::new(0.0, 0.0, edge, edge));
    form.matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    form.resources().proc_sets([ProcSet::Pdf]);
    form.finish();

    let now = Local::now();
    let created = Date::new(now.year() as u16)
        .month(now.month() as u8)
        .day(now.day() as u8)
        .hour(now.hour() as u8)
        .minute(now.minute() as u8)
        .second(now.second() as u8);
    pdf.document_info(info_id)
        .title(TextStr("QR-Bill"))
        .producer(TextStr("qrbill"))
        .creation_date(created);

    let bytes = pdf.finish();
    tracing::debug!(bytes = bytes.len(), "rendered PDF QR code");
    Ok(bytes)
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    fn render_str(matrix: &BitMatrix) -> String {
        String::from_utf8_lossy(&render(matrix, 4).unwrap()).into_owned()
    }

    #[test]
    fn test_document_structure() {
        let pdf = render_str(&BitMatrix::from_fn(21, 21, |x, y| x == y));
        assert!(pdf.starts_with("%PDF-"));
        assert!(pdf.trim_end().ends_with("%%EOF"));
        assert!(pdf.contains("/Type /Catalog"));
        assert!(pdf.contains("/Subtype /Form"));
        assert!(pdf.contains("/qr Do"));
        assert!(pdf.contains("(QR-Bill)"));
    }

    #[test]
    fn test_form_declares_resources() {
        let pdf = render_str(&BitMatrix::from_fn(21, 21, |x, y| x == y));
        let form = pdf.find("/Subtype /Form").unwrap();
        let stream = form + pdf[form..].find("stream").unwrap();
        let resources = &pdf[form..stream];
        assert!(resources.contains("/Resources"), "{resources}");
        assert!(resources.contains("/ProcSet [/PDF]"), "{resources}");
    }

    #[test]
    fn test_modules_are_filled_once() {
        let matrix = BitMatrix::from_fn(21, 21, |x, y| x == y);
        let pdf = render_str(&matrix);
        assert_eq!(pdf.matches(" re\n").count(), 21 + SWISS_CROSS_RECTS.len());
        // One fill for all modules plus one per cross rectangle.
        assert_eq!(pdf.matches("\nf\n").count(), 1 + SWISS_CROSS_RECTS.len());
        assert!(pdf.contains("1 0 0 -1 0 1265 cm"));
        assert!(pdf.contains("1 0 0 1 549 549 cm"));
    }

    #[test]
    fn test_object_ids_are_sequential() {
        let mut ids = ObjectIds::new();
        assert_eq!(ids.alloc(), Ref::new(1));
        assert_eq!(ids.alloc(), Ref::new(2));
    }
}
