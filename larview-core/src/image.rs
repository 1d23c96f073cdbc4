//! Event image: raw planes plus the cached display matrices.

use ndarray::Array3;

use crate::composition::ImageComposition;
use crate::error::Result;
use crate::plane::RawPlane;
use crate::roi::{extract_display_rois, DisplayRoi, RoiRecord};

/// One event's display state: the raw planes, the composition strategy, the
/// eagerly built composite matrix, and the single-slot threshold cache.
///
/// Planes and ROI records are immutable once supplied. The composite is
/// built exactly once, at construction; each [`threshold`](Self::threshold)
/// call replaces the previous thresholded matrix rather than appending to a
/// history.
#[derive(Debug, Clone)]
pub struct EventImage<S> {
    strategy: S,
    planes: Vec<RawPlane>,
    rois: Vec<RoiRecord>,
    composite: Array3<f32>,
    thresholded: Option<Array3<f32>>,
}

impl<S: ImageComposition> EventImage<S> {
    /// Builds an event image from raw planes.
    ///
    /// The strategy's composition step runs here, synchronously; the
    /// thresholded slot starts unset.
    ///
    /// # Errors
    /// Propagates the strategy's validation failures (empty plane sequence,
    /// shape mismatch, out-of-range plane reference).
    pub fn new(strategy: S, planes: Vec<RawPlane>) -> Result<Self> {
        let composite = strategy.build_composite(&planes)?;
        Ok(Self {
            strategy,
            planes,
            rois: Vec::new(),
            composite,
            thresholded: None,
        })
    }

    /// Attaches ROI records for overlay extraction.
    #[must_use]
    pub fn with_rois(mut self, rois: Vec<RoiRecord>) -> Self {
        self.rois = rois;
        self
    }

    /// The cached composite matrix, (height, width, 3).
    #[inline]
    pub fn composite(&self) -> &Array3<f32> {
        &self.composite
    }

    /// Re-thresholds the composite for the (imin, imax) display window.
    ///
    /// Overwrites the previous thresholded matrix. The composite itself is
    /// never mutated. No ordering constraint is enforced on the bounds;
    /// `imin > imax` produces the strategy's documented degenerate clip.
    pub fn threshold(&mut self, imin: f32, imax: f32) -> &Array3<f32> {
        let matrix = self
            .strategy
            .apply_threshold(&self.composite, imin, imax);
        self.thresholded.insert(matrix)
    }

    /// The most recent thresholded matrix, if any threshold call has run.
    #[inline]
    pub fn thresholded(&self) -> Option<&Array3<f32>> {
        self.thresholded.as_ref()
    }

    /// Display ROIs extracted from the attached records.
    ///
    /// Zero-box records are dropped; box coordinates stay in the raw
    /// (non-flipped) frame.
    #[must_use]
    pub fn display_rois(&self) -> Vec<DisplayRoi> {
        extract_display_rois(&self.rois)
    }

    /// The raw plane sequence.
    #[inline]
    pub fn planes(&self) -> &[RawPlane] {
        &self.planes
    }

    /// The attached ROI records.
    #[inline]
    pub fn rois(&self) -> &[RoiRecord] {
        &self.rois
    }

    /// The composition strategy.
    #[inline]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Image dimensions as (height, width).
    #[inline]
    pub fn dim(&self) -> (usize, usize) {
        let (rows, cols, _) = self.composite.dim();
        (rows, cols)
    }
}
