//! Raw plane and channel-map types.

use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of display channels in a composite matrix.
pub const DISPLAY_CHANNELS: usize = 3;

/// One raw 2D intensity plane for a single detector view.
///
/// Planes are read-only once received; a `Vec<RawPlane>` forms the ordered
/// per-event plane sequence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawPlane {
    data: Array2<f32>,
}

impl RawPlane {
    /// Creates a plane from an intensity array.
    #[inline]
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    /// Creates a zero-filled plane.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Returns the plane dimensions as (rows, cols).
    #[inline]
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Returns the number of rows (image height).
    #[inline]
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Returns the number of columns (image width).
    #[inline]
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Returns a read-only view of the intensity values.
    #[inline]
    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }

    /// Consumes the plane and returns the underlying array.
    #[inline]
    pub fn into_inner(self) -> Array2<f32> {
        self.data
    }
}

impl From<Array2<f32>> for RawPlane {
    fn from(data: Array2<f32>) -> Self {
        Self::new(data)
    }
}

/// Maps each display-channel slot to a source plane index.
///
/// `None` is the sentinel for "no plane assigned"; that channel stays zero
/// in the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelMap {
    slots: [Option<usize>; DISPLAY_CHANNELS],
}

impl ChannelMap {
    /// Creates a channel map from explicit slot assignments.
    #[inline]
    pub fn new(slots: [Option<usize>; DISPLAY_CHANNELS]) -> Self {
        Self { slots }
    }

    /// Maps plane `i` onto channel `i` for each slot.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            slots: [Some(0), Some(1), Some(2)],
        }
    }

    /// Reassign a single channel slot.
    ///
    /// Slots past the channel count are left unchanged.
    #[must_use]
    pub fn with_slot(mut self, channel: usize, plane: Option<usize>) -> Self {
        if let Some(slot) = self.slots.get_mut(channel) {
            *slot = plane;
        }
        self
    }

    /// Returns the plane index assigned to `channel`, if any.
    #[inline]
    pub fn slot(&self, channel: usize) -> Option<usize> {
        self.slots.get(channel).copied().flatten()
    }

    /// Returns all slot assignments in channel order.
    #[inline]
    pub fn slots(&self) -> &[Option<usize>; DISPLAY_CHANNELS] {
        &self.slots
    }
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self::identity()
    }
}

/// Validates that all planes share one (rows, cols) shape and returns it.
///
/// Fails fast with [`Error::ShapeMismatch`] on the first inconsistent plane;
/// an empty sequence is [`Error::EmptyPlaneSet`].
pub fn uniform_shape(planes: &[RawPlane]) -> Result<(usize, usize)> {
    let first = planes.first().ok_or(Error::EmptyPlaneSet)?;
    let (expected_rows, expected_cols) = first.dim();
    for (plane, raw) in planes.iter().enumerate().skip(1) {
        let (rows, cols) = raw.dim();
        if (rows, cols) != (expected_rows, expected_cols) {
            return Err(Error::ShapeMismatch {
                plane,
                rows,
                cols,
                expected_rows,
                expected_cols,
            });
        }
    }
    Ok((expected_rows, expected_cols))
}
