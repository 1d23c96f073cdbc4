//! ROI records and display extraction.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in raw (non-flipped) image coordinates.
///
/// The composite matrix is mirrored along the width axis for display; boxes
/// are not, so overlay consumers compensate for the flip themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    /// Minimum x (column) coordinate.
    pub min_x: f64,
    /// Minimum y (row) coordinate.
    pub min_y: f64,
    /// Maximum x (column) coordinate.
    pub max_x: f64,
    /// Maximum y (row) coordinate.
    pub max_y: f64,
}

impl BoundingBox {
    /// Creates a bounding box from corner coordinates.
    #[inline]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Box width along x.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Box height along y.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A labeled region of interest supplied alongside the raw planes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoiRecord {
    /// Classification label (e.g. "track", "shower").
    pub label: String,
    /// Bounding boxes, one per plane/view, in raw coordinates.
    pub boxes: Vec<BoundingBox>,
}

impl RoiRecord {
    /// Creates a record from a label and its boxes.
    pub fn new(label: impl Into<String>, boxes: Vec<BoundingBox>) -> Self {
        Self {
            label: label.into(),
            boxes,
        }
    }
}

/// Display-ready ROI: the record's label and its boxes, preserved as given.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayRoi {
    /// Classification label carried over from the record.
    pub label: String,
    /// Ordered box list, untransformed.
    pub bbox: Vec<BoundingBox>,
}

/// Extracts display ROIs from the supplied records.
///
/// Records with zero boxes are dropped; surviving records keep their full
/// ordered box list unmodified. Output order matches input order.
#[must_use]
pub fn extract_display_rois(records: &[RoiRecord]) -> Vec<DisplayRoi> {
    records
        .iter()
        .filter(|record| !record.boxes.is_empty())
        .map(|record| DisplayRoi {
            label: record.label.clone(),
            bbox: record.boxes.clone(),
        })
        .collect()
}
