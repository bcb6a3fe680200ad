use image::{DynamicImage, ImageFormat, imageops};
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};

use crate::domain::export::{
  AssembledDocument, DocumentAssembler, ExportError, PageLayout, page_label,
};

const LAYER_NAME: &str = "Invoice";
const PAGE_LABEL_FONT_SIZE_PT: f32 = 9.0;
const MM_PER_PT: f64 = 25.4 / 72.0;
// Average Helvetica glyph width as a fraction of the font size
const HELVETICA_AVG_WIDTH: f64 = 0.5;

/// Tiles a PNG raster top-down over fixed-size PDF pages and stamps
/// `Page i of N` centered in each page's bottom margin.
#[derive(Debug, Default, Clone, Copy)]
pub struct PaginatedPdfAssembler;

impl PaginatedPdfAssembler {
  pub fn new() -> Self {
    Self
  }
}

impl DocumentAssembler for PaginatedPdfAssembler {
  fn assemble(
    &self,
    title: &str,
    raster: &[u8],
    layout: &PageLayout,
  ) -> Result<AssembledDocument, ExportError> {
    if raster.is_empty() {
      return Err(ExportError::NothingToExport("raster is empty".to_string()));
    }

    let image = image::load_from_memory_with_format(raster, ImageFormat::Png)
      .map_err(|e| ExportError::PdfAssemblyFailed(format!("cannot decode raster: {}", e)))?
      .to_rgb8();
    let (width_px, height_px) = image.dimensions();
    let pagination = layout.paginate(width_px, height_px)?;
    let page_count = pagination.page_count();

    let page_width = Mm(layout.page_width_mm as f32);
    let page_height = Mm(layout.page_height_mm as f32);
    let (doc, first_page, first_layer) = PdfDocument::new(title, page_width, page_height, LAYER_NAME);
    let font = doc
      .add_builtin_font(BuiltinFont::Helvetica)
      .map_err(|e| ExportError::PdfAssemblyFailed(format!("cannot load font: {}", e)))?;

    // Image spans the full page width
    let dpi = (f64::from(width_px) * 25.4 / layout.page_width_mm) as f32;

    for slice in &pagination.slices {
      let (page, layer) = if slice.page_number == 1 {
        (first_page, first_layer)
      } else {
        doc.add_page(page_width, page_height, LAYER_NAME)
      };
      let current = doc.get_page(page).get_layer(layer);

      let tile = imageops::crop_imm(&image, 0, slice.top_px, width_px, slice.height_px).to_image();
      let tile_height_mm = f64::from(slice.height_px) * pagination.mm_per_px;
      Image::from_dynamic_image(&DynamicImage::ImageRgb8(tile)).add_to_layer(
        current.clone(),
        ImageTransform {
          translate_x: Some(Mm(0.0)),
          translate_y: Some(Mm((layout.page_height_mm - tile_height_mm) as f32)),
          dpi: Some(dpi),
          ..Default::default()
        },
      );

      let label = page_label(slice.page_number, page_count);
      let (x, y) = label_position(&label, layout);
      current.use_text(label, PAGE_LABEL_FONT_SIZE_PT, Mm(x), Mm(y), &font);
    }

    let bytes = doc
      .save_to_bytes()
      .map_err(|e| ExportError::PdfAssemblyFailed(format!("cannot write PDF: {}", e)))?;

    tracing::debug!(
      pages = page_count,
      width_px,
      height_px,
      "Assembled paginated PDF"
    );

    Ok(AssembledDocument { bytes, page_count })
  }
}

// Baseline roughly centered in the bottom margin, text centered horizontally
fn label_position(label: &str, layout: &PageLayout) -> (f32, f32) {
  let font_mm = f64::from(PAGE_LABEL_FONT_SIZE_PT) * MM_PER_PT;
  let text_width = label.chars().count() as f64 * font_mm * HELVETICA_AVG_WIDTH;
  let x = ((layout.page_width_mm - text_width) / 2.0).max(0.0);
  let y = ((layout.bottom_margin_mm - font_mm) / 2.0).max(1.0);
  (x as f32, y as f32)
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};
  use std::io::Cursor;

  fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |_, y| {
      if y % 2 == 0 {
        Rgb([255, 255, 255])
      } else {
        Rgb([30, 30, 30])
      }
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
      .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
      .unwrap();
    bytes
  }

  #[test]
  fn test_single_page() {
    let document = PaginatedPdfAssembler::new()
      .assemble("Invoice", &png(210, 200), &PageLayout::a4())
      .unwrap();
    assert_eq!(document.page_count, 1);
    assert!(document.bytes.starts_with(b"%PDF"));
  }

  #[test]
  fn test_tall_raster_spans_pages() {
    // 1 px per mm: 282 rows fit on each page
    let document = PaginatedPdfAssembler::new()
      .assemble("Invoice", &png(210, 600), &PageLayout::a4())
      .unwrap();
    assert_eq!(document.page_count, 3);
    assert!(document.bytes.starts_with(b"%PDF"));
  }

  #[test]
  fn test_garbage_raster_fails() {
    let result = PaginatedPdfAssembler::new().assemble("Invoice", b"not a png", &PageLayout::a4());
    assert!(matches!(result, Err(ExportError::PdfAssemblyFailed(_))));
  }

  #[test]
  fn test_empty_raster_is_nothing_to_export() {
    let result = PaginatedPdfAssembler::new().assemble("Invoice", &[], &PageLayout::a4());
    assert!(matches!(result, Err(ExportError::NothingToExport(_))));
  }

  #[test]
  fn test_label_is_centered_in_margin() {
    let layout = PageLayout::a4();
    let (x, y) = label_position("Page 1 of 2", &layout);
    assert!(x > 90.0 && x < 105.0);
    assert!(y > 0.0 && y < layout.bottom_margin_mm as f32);
  }
}
