use serde::{Deserialize, Serialize};

use super::errors::ExportError;
use crate::domain::invoice::value_objects::InvoiceNumber;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
const FILENAME_PLACEHOLDER: &str = "draft";

/// Physical page geometry in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
  pub page_width_mm: f64,
  pub page_height_mm: f64,
  /// Reserved at the bottom of every page for the page-number stamp.
  pub bottom_margin_mm: f64,
}

/// Rows `[top_px, top_px + height_px)` of the raster placed on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
  pub page_number: u32,
  pub top_px: u32,
  pub height_px: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
  /// Millimetres per raster pixel once the image is scaled to the page width.
  pub mm_per_px: f64,
  pub slices: Vec<PageSlice>,
}

impl Pagination {
  pub fn page_count(&self) -> u32 {
    self.slices.len() as u32
  }
}

impl PageLayout {
  pub fn a4() -> Self {
    Self {
      page_width_mm: 210.0,
      page_height_mm: 297.0,
      bottom_margin_mm: 15.0,
    }
  }

  pub fn usable_height_mm(&self) -> f64 {
    self.page_height_mm - self.bottom_margin_mm
  }

  pub fn validate(&self) -> Result<(), ExportError> {
    let sane = self.page_width_mm > 0.0
      && self.page_height_mm > 0.0
      && self.bottom_margin_mm >= 0.0
      && self.usable_height_mm() > 0.0;
    if !sane {
      return Err(ExportError::PdfAssemblyFailed(format!(
        "invalid page layout {}x{} mm with {} mm bottom margin",
        self.page_width_mm, self.page_height_mm, self.bottom_margin_mm
      )));
    }
    Ok(())
  }

  /// Splits a raster of the given pixel size into per-page slices.
  ///
  /// The image is scaled to the page width; the page count is
  /// `ceil(scaled_height / usable_height)`.
  pub fn paginate(&self, width_px: u32, height_px: u32) -> Result<Pagination, ExportError> {
    self.validate()?;
    if width_px == 0 || height_px == 0 {
      return Err(ExportError::NothingToExport(
        "rendered image is empty".to_string(),
      ));
    }

    let mm_per_px = self.page_width_mm / f64::from(width_px);
    let rows_per_page = self.usable_height_mm() / mm_per_px;
    if rows_per_page < 1.0 {
      return Err(ExportError::PdfAssemblyFailed(format!(
        "page holds less than one pixel row at {} px wide",
        width_px
      )));
    }
    // Absorb float noise so an exact fit does not spill onto an extra page
    let page_count = ((f64::from(height_px) / rows_per_page) - 1e-9).ceil().max(1.0) as u32;

    // Boundaries are floored and the last page runs to the bottom of the
    // raster, so every page gets at least one row
    let boundary = |i: u32| {
      if i >= page_count {
        height_px
      } else {
        ((f64::from(i) * rows_per_page).floor() as u32).min(height_px)
      }
    };
    let slices = (0..page_count)
      .map(|i| {
        let top = boundary(i);
        PageSlice {
          page_number: i + 1,
          top_px: top,
          height_px: boundary(i + 1) - top,
        }
      })
      .collect::<Vec<_>>();

    Ok(Pagination { mm_per_px, slices })
  }
}

impl Default for PageLayout {
  fn default() -> Self {
    Self::a4()
  }
}

/// `Page 2 of 5`
pub fn page_label(page_number: u32, page_count: u32) -> String {
  format!("Page {} of {}", page_number, page_count)
}

/// `invoice_<number>.pdf`, or `invoice_draft.pdf` when no number was assigned.
pub fn export_filename(number: Option<&InvoiceNumber>) -> String {
  format!(
    "invoice_{}.pdf",
    number.map_or(FILENAME_PLACEHOLDER, |n| n.value())
  )
}

#[derive(Debug, Clone)]
pub struct ExportedDocument {
  pub filename: String,
  pub content_type: &'static str,
  pub bytes: Vec<u8>,
  pub page_count: u32,
}

#[cfg(test)]
mod tests {
  use super::*;

  // 1 px == 1 mm, 282 mm usable per page
  fn square_pixels() -> PageLayout {
    PageLayout::a4()
  }

  #[test]
  fn test_usable_height() {
    assert_eq!(PageLayout::a4().usable_height_mm(), 282.0);
  }

  #[test]
  fn test_page_count_is_ceiling() {
    let layout = square_pixels();
    assert_eq!(layout.paginate(210, 1).unwrap().page_count(), 1);
    assert_eq!(layout.paginate(210, 282).unwrap().page_count(), 1);
    assert_eq!(layout.paginate(210, 283).unwrap().page_count(), 2);
    assert_eq!(layout.paginate(210, 846).unwrap().page_count(), 3);
  }

  #[test]
  fn test_page_count_after_scaling() {
    // 420 px wide => 0.5 mm per px => 564 px per page
    let pagination = square_pixels().paginate(420, 1200).unwrap();
    assert_eq!(pagination.mm_per_px, 0.5);
    assert_eq!(pagination.page_count(), 3);
    assert_eq!(pagination.slices[2].top_px, 1128);
    assert_eq!(pagination.slices[2].height_px, 72);
  }

  #[test]
  fn test_fractional_page_height_keeps_last_row() {
    // 282.6 px usable per page
    let layout = PageLayout {
      page_height_mm: 297.6,
      ..PageLayout::a4()
    };
    let pagination = layout.paginate(210, 283).unwrap();
    assert_eq!(pagination.page_count(), 2);
    assert_eq!(pagination.slices[0].height_px, 282);
    assert_eq!(pagination.slices[1].top_px, 282);
    assert_eq!(pagination.slices[1].height_px, 1);

    let pagination = layout.paginate(210, 848).unwrap();
    assert_eq!(pagination.page_count(), 4);
    assert!(pagination.slices.iter().all(|slice| slice.height_px > 0));
  }

  #[test]
  fn test_slices_cover_image_without_overlap() {
    let pagination = square_pixels().paginate(794, 3000).unwrap();
    let mut expected_top = 0;
    for (i, slice) in pagination.slices.iter().enumerate() {
      assert_eq!(slice.page_number, i as u32 + 1);
      assert_eq!(slice.top_px, expected_top);
      expected_top += slice.height_px;
    }
    assert_eq!(expected_top, 3000);
  }

  #[test]
  fn test_empty_raster_is_nothing_to_export() {
    assert!(matches!(
      square_pixels().paginate(0, 100),
      Err(ExportError::NothingToExport(_))
    ));
    assert!(matches!(
      square_pixels().paginate(100, 0),
      Err(ExportError::NothingToExport(_))
    ));
  }

  #[test]
  fn test_margin_larger_than_page_is_rejected() {
    let layout = PageLayout {
      bottom_margin_mm: 400.0,
      ..PageLayout::a4()
    };
    assert!(layout.paginate(100, 100).is_err());
  }

  #[test]
  fn test_filenames() {
    let number = InvoiceNumber::new("FAC032025RT042".to_string()).unwrap();
    assert_eq!(export_filename(Some(&number)), "invoice_FAC032025RT042.pdf");
    assert_eq!(export_filename(None), "invoice_draft.pdf");
    assert_eq!(page_label(2, 5), "Page 2 of 5");
  }
}
