//! PDF serialisation: laid-out pages → a single PDF byte buffer.
//!
//! Uses `pdf-writer`, which only emits objects and never touches a native
//! library. Text is drawn with the standard Helvetica / Helvetica-Bold Type 1
//! fonts in `WinAnsiEncoding`, so no font program is embedded.
//!
//! Object numbering is fixed and no timestamps are written, which keeps the
//! output byte-for-byte reproducible for identical inputs.

use crate::pipeline::embed::{EmbeddedImage, ImageEncoding};
use crate::pipeline::layout::{Element, ImageSlot, Page, PageGeometry, TextRun};
use crate::pipeline::metrics::{to_winansi, FontStyle, FontWeight, MM_PER_PT};
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

const PRODUCER: &str = concat!("edgequake-md2pdf ", env!("CARGO_PKG_VERSION"));

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");
const IMAGE_NAME: Name<'static> = Name(b"Im1");

const CATALOG_ID: Ref = Ref::new(1);
const PAGE_TREE_ID: Ref = Ref::new(2);
const INFO_ID: Ref = Ref::new(3);
const REGULAR_ID: Ref = Ref::new(4);
const BOLD_ID: Ref = Ref::new(5);
const IMAGE_ID: Ref = Ref::new(6);
const SMASK_ID: Ref = Ref::new(7);
const FIRST_PAGE_ID: i32 = 8;

fn pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

/// Serialise `pages` into a complete PDF document.
///
/// `image` must be provided whenever a page contains an [`Element::Image`].
pub fn write_pdf(
    pages: &[Page],
    geometry: &PageGeometry,
    image: Option<&EmbeddedImage>,
    title: &str,
    compress: bool,
) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let page_w = pt(geometry.page_width_mm);
    let page_h = pt(geometry.page_height_mm);

    let page_ids: Vec<Ref> = (0..pages.len())
        .map(|i| Ref::new(FIRST_PAGE_ID + 2 * i as i32))
        .collect();
    let content_ids: Vec<Ref> = page_ids.iter().map(|r| Ref::new(r.get() + 1)).collect();

    pdf.catalog(CATALOG_ID).pages(PAGE_TREE_ID);
    pdf.pages(PAGE_TREE_ID)
        .kids(page_ids.iter().copied())
        .count(pages.len() as i32);
    pdf.document_info(INFO_ID)
        .title(TextStr(title))
        .producer(TextStr(PRODUCER));

    for (id, weight) in [(REGULAR_ID, FontWeight::Regular), (BOLD_ID, FontWeight::Bold)] {
        let base = FontStyle::helvetica(weight, 0.0).base_font();
        pdf.type1_font(id)
            .base_font(Name(base.as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    if let Some(img) = image {
        write_image(&mut pdf, img);
    }

    for (i, page) in pages.iter().enumerate() {
        let mut content = Content::new();
        let mut uses_image = false;
        for element in &page.elements {
            match element {
                Element::Text(run) => draw_text(&mut content, run, page_h),
                Element::Image(slot) => {
                    draw_image(&mut content, slot, page_h);
                    uses_image = true;
                }
            }
        }

        let raw = content.finish();
        if compress {
            let compressed = compress_to_vec_zlib(&raw, 6);
            pdf.stream(content_ids[i], &compressed)
                .filter(Filter::FlateDecode);
        } else {
            pdf.stream(content_ids[i], &raw);
        }

        let mut pdf_page = pdf.page(page_ids[i]);
        pdf_page
            .media_box(Rect::new(0.0, 0.0, page_w, page_h))
            .parent(PAGE_TREE_ID)
            .contents(content_ids[i]);
        let mut resources = pdf_page.resources();
        resources
            .fonts()
            .pair(FONT_REGULAR, REGULAR_ID)
            .pair(FONT_BOLD, BOLD_ID);
        if uses_image && image.is_some() {
            resources.x_objects().pair(IMAGE_NAME, IMAGE_ID);
        }
    }

    let bytes = pdf.finish();
    debug!("Serialised {} pages → {} bytes", pages.len(), bytes.len());
    bytes
}

fn draw_text(content: &mut Content, run: &TextRun, page_h: f32) {
    let font = match run.font.weight {
        FontWeight::Regular => FONT_REGULAR,
        FontWeight::Bold => FONT_BOLD,
    };
    content.set_fill_gray(f32::from(run.gray) / 255.0);
    content.begin_text();
    content.set_font(font, run.font.size_pt);
    content.next_line(pt(run.x_mm), page_h - pt(run.baseline_mm));
    content.show(Str(&to_winansi(&run.text)));
    content.end_text();
}

fn draw_image(content: &mut Content, slot: &ImageSlot, page_h: f32) {
    let (w, h) = (pt(slot.width_mm), pt(slot.height_mm));
    let bottom = page_h - pt(slot.y_mm + slot.height_mm);
    content.save_state();
    content.transform([w, 0.0, 0.0, h, pt(slot.x_mm), bottom]);
    content.x_object(IMAGE_NAME);
    content.restore_state();
}

fn write_image(pdf: &mut Pdf, img: &EmbeddedImage) {
    let (w, h) = (img.pixel_width as i32, img.pixel_height as i32);
    match &img.encoding {
        ImageEncoding::Dct { data, components } => {
            let mut xobj = pdf.image_xobject(IMAGE_ID, data);
            xobj.filter(Filter::DctDecode);
            xobj.width(w);
            xobj.height(h);
            if *components == 1 {
                xobj.color_space().device_gray();
            } else {
                xobj.color_space().device_rgb();
            }
            xobj.bits_per_component(8);
        }
        ImageEncoding::Flate { rgb, alpha } => {
            if let Some(alpha) = alpha {
                let mut mask = pdf.image_xobject(SMASK_ID, alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w);
                mask.height(h);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
            }
            let mut xobj = pdf.image_xobject(IMAGE_ID, rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w);
            xobj.height(h);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if alpha.is_some() {
                xobj.s_mask(SMASK_ID);
            }
        }
    }
}
