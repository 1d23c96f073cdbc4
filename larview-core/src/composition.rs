//! Composition strategies: raw planes in, display matrix out.

use ndarray::{s, Array3, Axis};

use crate::error::{Error, Result};
use crate::plane::{uniform_shape, ChannelMap, RawPlane, DISPLAY_CHANNELS};

/// Trait for display-matrix composition strategies.
///
/// A strategy builds the composite matrix from the raw plane sequence and
/// produces clipped copies of it on demand. Strategies are stateless; the
/// owning [`EventImage`](crate::image::EventImage) holds the cached matrices.
pub trait ImageComposition: Send + Sync {
    /// Strategy name.
    fn name(&self) -> &'static str;

    /// Builds the (height, width, 3) display matrix from the raw planes.
    ///
    /// # Errors
    /// Fails fast on an empty plane sequence, inconsistent plane shapes, or
    /// a mapping that references a plane outside the sequence. No partial
    /// matrix is produced.
    fn build_composite(&self, planes: &[RawPlane]) -> Result<Array3<f32>>;

    /// Returns a clipped copy of `composite` for the (imin, imax) window.
    ///
    /// Elements strictly below `imin` become 0; elements strictly above
    /// `imax` become `imax`. The rules apply independently in that order, so
    /// `imin > imax` degenerates to an all-zero or fully-clipped matrix
    /// rather than erroring. The input matrix is never mutated.
    fn apply_threshold(&self, composite: &Array3<f32>, imin: f32, imax: f32) -> Array3<f32>;
}

/// Two-rule clip shared by the concrete strategies.
fn clip_to_window(composite: &Array3<f32>, imin: f32, imax: f32) -> Array3<f32> {
    let mut clipped = composite.clone();
    clipped.mapv_inplace(|v| if v < imin { 0.0 } else { v });
    clipped.mapv_inplace(|v| if v > imax { imax } else { v });
    clipped
}

/// Three-channel false-color strategy.
///
/// Maps up to three raw planes onto the RGB channels of the composite,
/// suppresses lower-precedence channels wherever a higher one is active
/// (channel 2 dominates 1 dominates 0), and mirrors the result along the
/// width axis for the display orientation convention. ROI bounding boxes are
/// not mirrored; overlay consumers account for the flip.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelComposite {
    channels: ChannelMap,
}

impl ChannelComposite {
    /// Creates a strategy with the identity channel map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a strategy with a custom channel map.
    #[must_use]
    pub fn with_channels(channels: ChannelMap) -> Self {
        Self { channels }
    }

    /// Returns the channel map.
    #[inline]
    pub fn channels(&self) -> &ChannelMap {
        &self.channels
    }
}

impl ImageComposition for ChannelComposite {
    fn name(&self) -> &'static str {
        "ChannelComposite"
    }

    fn build_composite(&self, planes: &[RawPlane]) -> Result<Array3<f32>> {
        let (rows, cols) = uniform_shape(planes)?;

        let mut mat = Array3::<f32>::zeros((rows, cols, DISPLAY_CHANNELS));
        for (channel, slot) in self.channels.slots().iter().enumerate() {
            let Some(plane) = *slot else {
                continue;
            };
            let raw = planes.get(plane).ok_or_else(|| Error::PlaneOutOfRange {
                plane,
                count: planes.len(),
            })?;
            mat.slice_mut(s![.., .., channel]).assign(&raw.view());
        }

        // Fixed precedence: channel 2 dominates 1 dominates 0 wherever more
        // than one channel is active at a pixel.
        for mut pixel in mat.lanes_mut(Axis(2)) {
            if pixel[2] > 0.0 {
                pixel[0] = 0.0;
                pixel[1] = 0.0;
            } else if pixel[1] > 0.0 {
                pixel[0] = 0.0;
            }
        }

        // Display orientation convention: mirror along the width axis.
        mat.invert_axis(Axis(1));
        Ok(mat)
    }

    fn apply_threshold(&self, composite: &Array3<f32>, imin: f32, imax: f32) -> Array3<f32> {
        clip_to_window(composite, imin, imax)
    }
}

/// Single-plane grayscale strategy.
///
/// Replicates one source plane across all three display channels, with the
/// same width-axis mirror and clip behavior as [`ChannelComposite`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GrayscaleComposite {
    plane: usize,
}

impl GrayscaleComposite {
    /// Creates a strategy reading from `plane`.
    #[must_use]
    pub fn new(plane: usize) -> Self {
        Self { plane }
    }

    /// Returns the source plane index.
    #[inline]
    pub fn plane(&self) -> usize {
        self.plane
    }
}

impl ImageComposition for GrayscaleComposite {
    fn name(&self) -> &'static str {
        "Grayscale"
    }

    fn build_composite(&self, planes: &[RawPlane]) -> Result<Array3<f32>> {
        let (rows, cols) = uniform_shape(planes)?;
        let raw = planes.get(self.plane).ok_or_else(|| Error::PlaneOutOfRange {
            plane: self.plane,
            count: planes.len(),
        })?;

        let mut mat = Array3::<f32>::zeros((rows, cols, DISPLAY_CHANNELS));
        for channel in 0..DISPLAY_CHANNELS {
            mat.slice_mut(s![.., .., channel]).assign(&raw.view());
        }

        mat.invert_axis(Axis(1));
        Ok(mat)
    }

    fn apply_threshold(&self, composite: &Array3<f32>, imin: f32, imax: f32) -> Array3<f32> {
        clip_to_window(composite, imin, imax)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use ndarray::array;

    fn unflipped(composite: &Array3<f32>) -> Array3<f32> {
        let mut mat = composite.clone();
        mat.invert_axis(Axis(1));
        mat
    }

    #[test]
    fn test_composite_shape() {
        let planes = vec![RawPlane::zeros(4, 6); 3];
        let mat = ChannelComposite::new().build_composite(&planes).unwrap();
        assert_eq!(mat.dim(), (4, 6, 3));
    }

    #[test]
    fn test_unmapped_channels_stay_zero() {
        let planes = vec![RawPlane::new(array![[1.0, 2.0], [3.0, 4.0]])];
        let strategy =
            ChannelComposite::with_channels(ChannelMap::new([Some(0), None, None]));
        let mat = strategy.build_composite(&planes).unwrap();

        assert!(mat.slice(s![.., .., 1]).iter().all(|&v| v == 0.0));
        assert!(mat.slice(s![.., .., 2]).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_mapped_channel_is_mirrored_plane() {
        let planes = vec![RawPlane::new(array![[1.0, 2.0], [3.0, 4.0]])];
        let strategy =
            ChannelComposite::with_channels(ChannelMap::new([Some(0), None, None]));
        let mat = strategy.build_composite(&planes).unwrap();

        assert_eq!(
            mat.slice(s![.., .., 0]),
            array![[2.0, 1.0], [4.0, 3.0]].view()
        );
    }

    #[test]
    fn test_flip_round_trip_restores_mapped_matrix() {
        // No pixel has more than one active channel, so the exclusivity pass
        // is the identity and un-flipping recovers the mapped matrix.
        let planes = vec![
            RawPlane::new(array![[5.0, 0.0], [0.0, 0.0]]),
            RawPlane::new(array![[0.0, 0.0], [7.0, 0.0]]),
        ];
        let strategy =
            ChannelComposite::with_channels(ChannelMap::new([Some(0), Some(1), None]));
        let mat = unflipped(&strategy.build_composite(&planes).unwrap());

        assert_eq!(mat.slice(s![.., .., 0]), planes[0].view());
        assert_eq!(mat.slice(s![.., .., 1]), planes[1].view());
    }

    #[test]
    fn test_channel_exclusivity_precedence() {
        // One pixel, all three channels active: only channel 2 survives.
        // A second pixel with channels 0 and 1 active: channel 1 survives.
        let planes = vec![
            RawPlane::new(array![[1.0, 1.0]]),
            RawPlane::new(array![[2.0, 2.0]]),
            RawPlane::new(array![[3.0, 0.0]]),
        ];
        let mat = unflipped(
            &ChannelComposite::new().build_composite(&planes).unwrap(),
        );

        assert_eq!(mat[[0, 0, 0]], 0.0);
        assert_eq!(mat[[0, 0, 1]], 0.0);
        assert_eq!(mat[[0, 0, 2]], 3.0);

        assert_eq!(mat[[0, 1, 0]], 0.0);
        assert_eq!(mat[[0, 1, 1]], 2.0);
        assert_eq!(mat[[0, 1, 2]], 0.0);
    }

    #[test]
    fn test_exclusivity_ignores_negative_values() {
        // Suppression triggers on strictly positive values only.
        let planes = vec![
            RawPlane::new(array![[4.0]]),
            RawPlane::new(array![[-1.0]]),
            RawPlane::new(array![[0.0]]),
        ];
        let mat = unflipped(
            &ChannelComposite::new().build_composite(&planes).unwrap(),
        );

        assert_eq!(mat[[0, 0, 0]], 4.0);
        assert_eq!(mat[[0, 0, 1]], -1.0);
    }

    #[test]
    fn test_shape_mismatch_fails_fast() {
        let planes = vec![RawPlane::zeros(2, 2), RawPlane::zeros(2, 3)];
        let result = ChannelComposite::new().build_composite(&planes);
        assert!(matches!(result, Err(Error::ShapeMismatch { plane: 1, .. })));
    }

    #[test]
    fn test_empty_plane_set_rejected() {
        let result = ChannelComposite::new().build_composite(&[]);
        assert!(matches!(result, Err(Error::EmptyPlaneSet)));
    }

    #[test]
    fn test_plane_out_of_range_rejected() {
        let planes = vec![RawPlane::zeros(2, 2)];
        let strategy =
            ChannelComposite::with_channels(ChannelMap::new([Some(0), Some(1), None]));
        let result = strategy.build_composite(&planes);
        assert!(matches!(
            result,
            Err(Error::PlaneOutOfRange { plane: 1, count: 1 })
        ));
    }

    #[test]
    fn test_threshold_clips_to_window() {
        let planes = vec![RawPlane::new(array![[0.5, 2.0], [10.0, 4.0]])];
        let strategy =
            ChannelComposite::with_channels(ChannelMap::new([Some(0), None, None]));
        let mat = strategy.build_composite(&planes).unwrap();

        let clipped = strategy.apply_threshold(&mat, 1.0, 5.0);
        for &v in clipped.iter() {
            assert!(v == 0.0 || (1.0..=5.0).contains(&v), "element {v} escaped the window");
        }
        // Below imin dropped to zero, above imax clipped to imax.
        let ch0 = clipped.slice(s![.., .., 0]);
        assert_eq!(ch0, array![[2.0, 0.0], [4.0, 5.0]].view());
    }

    #[test]
    fn test_threshold_does_not_mutate_composite() {
        let planes = vec![RawPlane::new(array![[0.5, 2.0], [10.0, 4.0]])];
        let strategy =
            ChannelComposite::with_channels(ChannelMap::new([Some(0), None, None]));
        let mat = strategy.build_composite(&planes).unwrap();
        let before = mat.clone();

        let _ = strategy.apply_threshold(&mat, 1.0, 5.0);
        let _ = strategy.apply_threshold(&mat, 3.0, 3.5);
        assert_eq!(mat, before);
    }

    #[test]
    fn test_degenerate_threshold_window() {
        let planes = vec![RawPlane::new(array![[3.0, 8.0]])];
        let strategy =
            ChannelComposite::with_channels(ChannelMap::new([Some(0), None, None]));
        let mat = strategy.build_composite(&planes).unwrap();

        // imin > imax with non-negative imax: everything below imin zeroes,
        // the rest clips to imax.
        let clipped = strategy.apply_threshold(&mat, 5.0, 4.0);
        let ch0 = clipped.slice(s![.., .., 0]);
        assert_eq!(ch0, array![[4.0, 0.0]].view());

        // Negative imax: zeroed elements subsequently clip to imax too.
        let clipped = strategy.apply_threshold(&mat, 5.0, -1.0);
        assert!(clipped.iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_grayscale_replicates_plane() {
        let planes = vec![
            RawPlane::new(array![[1.0, 2.0], [3.0, 4.0]]),
            RawPlane::new(array![[9.0, 9.0], [9.0, 9.0]]),
        ];
        let strategy = GrayscaleComposite::new(0);
        let mat = strategy.build_composite(&planes).unwrap();

        let mirrored = array![[2.0, 1.0], [4.0, 3.0]];
        for channel in 0..DISPLAY_CHANNELS {
            assert_eq!(mat.slice(s![.., .., channel]), mirrored.view());
        }
    }

    #[test]
    fn test_grayscale_out_of_range_rejected() {
        let planes = vec![RawPlane::zeros(2, 2)];
        let result = GrayscaleComposite::new(3).build_composite(&planes);
        assert!(matches!(
            result,
            Err(Error::PlaneOutOfRange { plane: 3, count: 1 })
        ));
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(ChannelComposite::new().name(), "ChannelComposite");
        assert_eq!(GrayscaleComposite::new(0).name(), "Grayscale");
    }
}
