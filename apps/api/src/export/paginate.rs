//! Tiling a tall raster across fixed-size PDF pages.
//!
//! The image is scaled to the page width and placed whole on every page.
//! Page `k` (0-based) places the image's top edge at `-k * page_height`, so the
//! page window shows the band `[k * page_height, (k + 1) * page_height)`.
//! Pages are added while unplaced height remains, giving
//! `ceil(image_height / page_height)` pages, and never fewer than one.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use thiserror::Error;

const JPEG_QUALITY: u8 = 92;
const IMAGE_NAME: &str = "Im0";
/// Leftover height below this is float noise, not a page worth of content.
const REMAINDER_EPSILON_MM: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width_mm: 210.0,
        height_mm: 297.0,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub page: PageSize,
    pub image_width_mm: f32,
    pub image_height_mm: f32,
    /// One entry per page: vertical offset of the image top from the page top, in mm.
    pub offsets_mm: Vec<f32>,
}

impl PagePlan {
    pub fn page_count(&self) -> usize {
        self.offsets_mm.len()
    }
}

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub fn plan_pages(px_width: u32, px_height: u32, page: PageSize) -> PagePlan {
    let image_width_mm = page.width_mm;
    let image_height_mm = if px_width == 0 {
        0.0
    } else {
        px_height as f32 * image_width_mm / px_width as f32
    };

    let mut offsets_mm = vec![0.0];
    let mut offset = 0.0;
    let mut remaining = image_height_mm - page.height_mm;
    while remaining > REMAINDER_EPSILON_MM {
        offset -= page.height_mm;
        offsets_mm.push(offset);
        remaining -= page.height_mm;
    }

    PagePlan {
        page,
        image_width_mm,
        image_height_mm,
        offsets_mm,
    }
}

fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

/// Builds the PDF: the raster is JPEG-encoded once and shared by every page.
pub fn assemble_pdf(image: &RgbImage, plan: &PagePlan) -> Result<Vec<u8>, PdfError> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(image)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width() as i64,
            "Height" => image.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    );
    let image_id = doc.add_object(image_stream);
    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! { IMAGE_NAME => image_id },
    });

    let page_w = mm_to_pt(plan.page.width_mm);
    let page_h = mm_to_pt(plan.page.height_mm);
    let img_w = mm_to_pt(plan.image_width_mm);
    let img_h = mm_to_pt(plan.image_height_mm);

    let mut page_ids = Vec::with_capacity(plan.page_count());
    for offset in &plan.offsets_mm {
        // PDF space is bottom-up: place the image's lower-left corner.
        let bottom = page_h - (mm_to_pt(*offset) + img_h);
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        img_w.into(),
                        0.into(),
                        0.into(),
                        img_h.into(),
                        0.into(),
                        bottom.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page_w.into(), page_h.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn expected_pages(image_height_mm: f32) -> usize {
        ((image_height_mm / PageSize::A4.height_mm).ceil() as usize).max(1)
    }

    #[test]
    fn test_short_image_fits_one_page() {
        let plan = plan_pages(794, 600, PageSize::A4);
        assert_eq!(plan.offsets_mm, vec![0.0]);
        assert!((plan.image_width_mm - 210.0).abs() < 1e-4);
    }

    #[test]
    fn test_2000px_tall_element_spans_multiple_pages() {
        let plan = plan_pages(794, 2000, PageSize::A4);
        assert!(plan.page_count() > 1);
        assert_eq!(plan.page_count(), expected_pages(plan.image_height_mm));
        assert_eq!(plan.page_count(), 2);
    }

    #[test]
    fn test_page_count_matches_ceiling_across_heights() {
        for height in [1, 500, 1122, 1123, 1124, 2000, 2246, 3000, 10_000, 40_000] {
            let plan = plan_pages(794, height, PageSize::A4);
            assert_eq!(
                plan.page_count(),
                expected_pages(plan.image_height_mm),
                "height {height}px → {}mm",
                plan.image_height_mm
            );
        }
    }

    #[test]
    fn test_exact_multiple_adds_no_empty_page() {
        // 210 px wide maps 1 px to 1 mm, so 891 px is exactly three pages.
        let plan = plan_pages(210, 891, PageSize::A4);
        assert_eq!(plan.offsets_mm, vec![0.0, -297.0, -594.0]);
    }

    #[test]
    fn test_offsets_step_by_one_page_height() {
        let plan = plan_pages(794, 5000, PageSize::A4);
        for (k, offset) in plan.offsets_mm.iter().enumerate() {
            assert!((offset + k as f32 * 297.0).abs() < 1e-3);
        }
        // Last page still shows part of the image, and nothing lies beyond it.
        let last_top = -plan.offsets_mm.last().unwrap();
        assert!(last_top < plan.image_height_mm);
        assert!(last_top + 297.0 >= plan.image_height_mm - REMAINDER_EPSILON_MM);
    }

    #[test]
    fn test_degenerate_dimensions_yield_one_page() {
        assert_eq!(plan_pages(0, 100, PageSize::A4).page_count(), 1);
        assert_eq!(plan_pages(100, 0, PageSize::A4).page_count(), 1);
    }

    #[test]
    fn test_assembled_pdf_has_one_page_per_offset() {
        let image = RgbImage::from_pixel(200, 700, Rgb([255, 255, 255]));
        let plan = plan_pages(image.width(), image.height(), PageSize::A4);
        assert_eq!(plan.page_count(), 3);

        let bytes = assemble_pdf(&image, &plan).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 3);
    }

    #[test]
    fn test_image_is_embedded_once() {
        let image = RgbImage::from_pixel(100, 600, Rgb([10, 20, 30]));
        let plan = plan_pages(image.width(), image.height(), PageSize::A4);
        let bytes = assemble_pdf(&image, &plan).unwrap();

        let parsed = Document::load_mem(&bytes).unwrap();
        let images = parsed
            .objects
            .values()
            .filter(|obj| match obj {
                Object::Stream(s) => s
                    .dict
                    .get(b"Subtype")
                    .and_then(|v| v.as_name())
                    .map(|n| n == b"Image")
                    .unwrap_or(false),
                _ => false,
            })
            .count();
        assert_eq!(images, 1);
        assert!(plan.page_count() > 1);
    }
}
